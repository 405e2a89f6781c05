use clap::{Args, Subcommand};

use super::OutputFormat;
use dailybread::config::Config;

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl ConfigCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(config)?);
                    }
                    OutputFormat::Text => print_text(config),
                }
                Ok(())
            }
        }
    }
}

fn print_text(config: &Config) {
    println!("Configuration");
    println!("=============\n");

    if let Some(path) = &config.config_file {
        println!("Config file: {}", path.display());
    } else {
        println!(
            "Config file: {} (not found)",
            Config::default_config_path().display()
        );
    }
    println!();

    println!("data_dir: {}", config.data_dir.value.display());
    println!("  source: {}", config.data_dir.source);
    println!();

    println!("profile_id: {}", config.profile_id.value);
    println!("  source: {}", config.profile_id.source);
    println!();

    println!("gemini:");
    println!(
        "  api_key: {}",
        if config.gemini.is_configured() {
            "(set)"
        } else {
            "(not set)"
        }
    );
    println!("  model: {}", config.gemini.model);
    println!("  base_url: {}", config.gemini.base_url);
    println!();

    println!("scripture:");
    println!("  base_url: {}", config.scripture.base_url);
    println!("  translation: {}", config.scripture.translation);
    println!();

    println!("remote:");
    println!("  latency_ms: {}", config.remote.latency_ms);
    if let Some(url) = &config.remote.health_url {
        println!("  health_url: {}", url);
    }
    println!();

    println!("offline: {}", config.offline);
}
