use anyhow::{Context, Result};

use flash10_lib::review::intervals::format_interval_ms;
use flash10_lib::review::{Payload, ReviewError, WordData};

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, word: &str, payload: Option<&str>, format: &OutputFormat) -> Result<()> {
    let payload = match payload {
        Some(raw) => Payload::from(
            serde_json::from_str::<serde_json::Value>(raw).context("--payload is not valid JSON")?,
        ),
        None => Payload::from_word(&WordData::new(word.trim())),
    };

    let item = match app.scheduler.record_mastered(word, payload) {
        Ok(item) => item,
        Err(ReviewError::PersistenceWrite { attempted: Some(item), source }) => {
            eprintln!("Warning: progress for '{}' was not saved: {}", item.identity, source);
            item
        }
        Err(e) => return Err(e).context("Failed to record mastery"),
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&app.item_json(&item))?),
        OutputFormat::Plain => println!(
            "Mastered '{}': stage {}, next review in {}",
            item.identity,
            item.stage,
            format_interval_ms(item.next_due_at - item.last_transition_at)
        ),
    }

    Ok(())
}
