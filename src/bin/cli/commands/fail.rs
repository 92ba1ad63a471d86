use anyhow::{Context, Result};

use flash10_lib::review::{Payload, ReviewError, WordData};

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, word: &str, format: &OutputFormat) -> Result<()> {
    // Keep the stored card content; fall back to the bare word
    let payload = app
        .scheduler
        .get(word)
        .context("Failed to read review data")?
        .map(|item| item.payload)
        .unwrap_or_else(|| Payload::from_word(&WordData::new(word.trim())));

    let item = match app.scheduler.record_failed(word, payload) {
        Ok(item) => item,
        Err(ReviewError::PersistenceWrite { attempted, source }) => {
            eprintln!("Warning: reset of '{}' was not saved: {}", word.trim(), source);
            attempted
        }
        Err(e) => return Err(e).context("Failed to record failure"),
    };

    match (format, item) {
        (OutputFormat::Json, Some(item)) => {
            println!("{}", serde_json::to_string_pretty(&app.item_json(&item))?)
        }
        (OutputFormat::Json, None) => println!("null"),
        (OutputFormat::Plain, Some(item)) => {
            println!("Reset '{}' to stage {}", item.identity, item.stage)
        }
        (OutputFormat::Plain, None) => println!("'{}' is not being reviewed.", word.trim()),
    }

    Ok(())
}
