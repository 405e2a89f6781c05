use clap::Args;
use serde_json::json;

use super::OutputFormat;
use dailybread::{DateKey, DevotionalContent, DevotionalSession};

/// Read the devotional for a day
#[derive(Args)]
pub struct ReadCommand {
    /// Day to read (YYYY-MM-DD or "Wed Jan 01 2026"); defaults to today
    #[arg(long, short)]
    date: Option<DateKey>,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Also look up the full scripture text for both references
    #[arg(long)]
    lookup: bool,
}

impl ReadCommand {
    pub async fn run(
        &self,
        session: &mut DevotionalSession,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let key = self.date.unwrap_or_else(DateKey::today);
        let content = session.load_content(key).await?;
        let complete = session.profile().progress.is_complete(&key);

        let (passage, verse) = if self.lookup {
            (
                session.lookup_passage().await,
                session.lookup_related_verse().await,
            )
        } else {
            (None, None)
        };

        match self.format {
            OutputFormat::Json => {
                let output = json!({
                    "content": content,
                    "completed": complete,
                    "passageLookup": passage,
                    "relatedVerseLookup": verse,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text => print_text(&content, complete, passage, verse),
        }

        Ok(())
    }
}

pub(super) fn print_text(
    content: &DevotionalContent,
    complete: bool,
    passage: Option<String>,
    verse: Option<String>,
) {
    print!("{}", content);
    if let Some(text) = passage {
        println!();
        println!("{} (full text)", content.passage_reference);
        println!("{}", text);
    }
    if let Some(text) = verse {
        println!();
        println!("{} (full text)", content.related_verse_reference);
        println!("{}", text);
    }
    println!();
    if complete {
        println!("Marked as read.");
    } else {
        println!("Not yet marked as read. Run 'dailybread complete {}'.", content.date);
    }
}
