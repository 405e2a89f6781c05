use clap::Args;

use super::OutputFormat;
use dailybread::{DateKey, DevotionalSession, Theme};

/// Toggle the read mark for a day
#[derive(Args)]
pub struct CompleteCommand {
    /// Day to toggle (YYYY-MM-DD or "Wed Jan 01 2026")
    date: DateKey,
}

impl CompleteCommand {
    pub fn run(&self, session: &mut DevotionalSession) {
        if session.toggle_completion(self.date) {
            println!("Marked {} as read.", self.date);
        } else {
            println!("Cleared read mark for {}.", self.date);
        }
    }
}

/// Show reading progress and preferences
#[derive(Args)]
pub struct ProgressCommand {
    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    format: OutputFormat,
}

impl ProgressCommand {
    pub fn run(&self, session: &DevotionalSession) -> Result<(), Box<dyn std::error::Error>> {
        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(session.profile())?);
            }
            OutputFormat::Text => {
                print!("{}", session.profile());
                println!("Sync: {}", session.sync_status());
            }
        }
        Ok(())
    }
}

/// Set the reading theme
#[derive(Args)]
pub struct ThemeCommand {
    /// Theme (light, dark, sepia)
    theme: Theme,
}

impl ThemeCommand {
    pub fn run(&self, session: &mut DevotionalSession) {
        session.set_theme(self.theme);
        println!("Theme set to {}.", self.theme);
    }
}
