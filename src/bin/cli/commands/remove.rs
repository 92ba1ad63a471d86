use anyhow::{Context, Result};

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, word: &str, format: &OutputFormat) -> Result<()> {
    let removed = app
        .scheduler
        .remove(word)
        .with_context(|| format!("Failed to remove '{}'", word.trim()))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::json!({ "removed": removed })),
        OutputFormat::Plain if removed => println!("Removed '{}'", word.trim()),
        OutputFormat::Plain => println!("'{}' is not being reviewed.", word.trim()),
    }

    Ok(())
}
