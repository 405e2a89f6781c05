//! Interactive reading session.
//!
//! Fetches run in the background so the reader can keep moving between days;
//! results for days no longer selected are cached without being shown.

use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use dailybread::{
    DateKey, DevotionalField, DevotionalPatch, DevotionalSession, FetchError, FetchOutcome,
    FetchTicket, GeneratedDevotional, LoadState, Selection, Theme,
};

type FetchResult = (FetchTicket, Result<GeneratedDevotional, FetchError>);

/// Start an interactive reading session
#[derive(Args)]
pub struct SessionCommand {
    /// Day to open first; defaults to today
    #[arg(long, short)]
    date: Option<DateKey>,
}

enum Flow {
    Continue,
    Quit,
}

impl SessionCommand {
    pub async fn run(
        &self,
        session: &mut DevotionalSession,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let (tx, mut rx) = mpsc::unbounded_channel::<FetchResult>();
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        print_help();
        open(session, self.date.unwrap_or_else(DateKey::today), &tx);

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        break;
                    };
                    match handle(session, line.trim(), &tx).await {
                        Ok(Flow::Quit) => break,
                        Ok(Flow::Continue) => {}
                        Err(e) => eprintln!("Error: {}", e),
                    }
                    session.pump();
                }
                Some((ticket, result)) = rx.recv() => {
                    let key = ticket.key();
                    match session.complete(ticket, result) {
                        FetchOutcome::Displayed => show(session),
                        FetchOutcome::CachedOnly => println!("(Loaded {} in the background)", key),
                        FetchOutcome::Failed => {
                            println!("Could not load {}: {}", key, session.state());
                            println!("Type 'retry' to try again.");
                        }
                        FetchOutcome::Ignored => {}
                    }
                }
            }
        }

        Ok(())
    }
}

async fn handle(
    session: &mut DevotionalSession,
    line: &str,
    tx: &mpsc::UnboundedSender<FetchResult>,
) -> Result<Flow, Box<dyn std::error::Error>> {
    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    match command {
        "" => {}
        "open" => {
            let key = parse_day(rest)?;
            open(session, key, tx);
        }
        "retry" => {
            let failed = matches!(session.state(), LoadState::Error(_));
            match (failed, session.selected()) {
                (true, Some(key)) => open(session, key, tx),
                _ => println!("Nothing to retry."),
            }
        }
        "edit" => {
            let (field, text) = rest
                .split_once(' ')
                .ok_or("Usage: edit <passage|verse|reflection|morning|evening|quote> <text>")?;
            let field: DevotionalField = field.parse()?;
            session.edit(&DevotionalPatch::field(field, text.trim()))?;
            println!("Updated {}.", field);
        }
        "search" => {
            let results = session.search(rest);
            if results.is_empty() {
                println!("No matches.");
            }
            for content in results {
                println!("  {}  {}", content.date, content.passage_reference);
            }
        }
        "lookup" => match session.lookup_passage().await {
            Some(text) => println!("{}", text),
            None => println!("No scripture text available."),
        },
        "complete" => {
            let key = match rest {
                "" => session.selected().ok_or("No day selected")?,
                day => parse_day(day)?,
            };
            if session.toggle_completion(key) {
                println!("Marked {} as read.", key);
            } else {
                println!("Cleared read mark for {}.", key);
            }
        }
        "theme" => {
            let theme: Theme = rest.parse()?;
            session.set_theme(theme);
            println!("Theme set to {}.", theme);
        }
        "online" => session.set_online(true),
        "offline" => session.set_online(false),
        "status" => {
            match session.selected() {
                Some(key) => println!("Selected: {} ({})", key, session.state()),
                None => println!("Selected: none"),
            }
            println!("Cached days: {}", session.cache().len());
            println!("Sync: {}", session.sync_status());
        }
        "help" => print_help(),
        "quit" | "exit" => return Ok(Flow::Quit),
        other => println!("Unknown command '{}'. Type 'help'.", other),
    }

    Ok(Flow::Continue)
}

fn parse_day(arg: &str) -> Result<DateKey, Box<dyn std::error::Error>> {
    match arg {
        "" | "today" => Ok(DateKey::today()),
        day => Ok(day.parse()?),
    }
}

fn open(session: &mut DevotionalSession, key: DateKey, tx: &mpsc::UnboundedSender<FetchResult>) {
    match session.select(key) {
        Selection::Cached(_) => show(session),
        Selection::InFlight => println!("Loading {}...", key.descriptor()),
        Selection::Fetch(ticket) => {
            println!("Loading {}...", key.descriptor());
            let fetcher = session.fetcher();
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = fetcher.fetch(ticket.key()).await;
                let _ = tx.send((ticket, result));
            });
        }
    }
}

fn show(session: &DevotionalSession) {
    if let Some(content) = session.displayed() {
        let complete = session.profile().progress.is_complete(&content.date);
        super::read::print_text(content, complete, None, None);
    }
}

fn print_help() {
    println!("Commands:");
    println!("  open [DATE|today]        Show a day's devotional");
    println!("  retry                    Retry a failed load");
    println!("  edit <FIELD> <TEXT>      Replace a field of the shown day");
    println!("  search <QUERY>           Search days read this session");
    println!("  lookup                   Look up the full passage text");
    println!("  complete [DATE]          Toggle the read mark");
    println!("  theme <light|dark|sepia> Set the reading theme");
    println!("  online | offline         Simulate connectivity changes");
    println!("  status                   Show session and sync status");
    println!("  quit                     Leave the session");
}
