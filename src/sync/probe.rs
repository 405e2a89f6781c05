use std::time::Duration;

const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Returns true if `url` answers an HTTP GET with a success status.
pub async fn check_server(url: &str) -> bool {
    check_server_with(&reqwest::Client::new(), url).await
}

pub async fn check_server_with(client: &reqwest::Client, url: &str) -> bool {
    match client.get(url).timeout(PROBE_TIMEOUT).send().await {
        Ok(response) => response.status().is_success(),
        Err(e) => {
            tracing::debug!("Connectivity probe to {} failed: {}", url, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{direct_client, serve_once};

    #[tokio::test]
    async fn test_reachable() {
        let (url, _server) = serve_once(200, "{}").await;
        assert!(check_server_with(&direct_client(), &url).await);
    }

    #[tokio::test]
    async fn test_error_status_is_unreachable() {
        let (url, _server) = serve_once(503, "{}").await;
        assert!(!check_server_with(&direct_client(), &url).await);
    }

    #[tokio::test]
    async fn test_unreachable() {
        assert!(!check_server_with(&direct_client(), "http://127.0.0.1:1").await);
    }
}
