use thiserror::Error;

/// Failure to obtain a complete devotional for a day.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("Content generator not configured. Set gemini.api_key or DAILYBREAD_GEMINI_API_KEY.")]
    NotConfigured,

    #[error("Content request failed: {0}")]
    Http(String),

    #[error("Content generator returned no content")]
    EmptyResponse,

    #[error("Malformed devotional payload: {0}")]
    MalformedPayload(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Http(e.to_string())
    }
}
