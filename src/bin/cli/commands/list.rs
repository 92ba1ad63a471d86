use anyhow::{Context, Result};

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let items = app.scheduler.list().context("Failed to list review data")?;

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> =
                items.iter().map(|item| app.item_json(item)).collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if items.is_empty() {
                println!("No words under review.");
                return Ok(());
            }
            for item in &items {
                println!("{}", app.item_line(item, use_color));
            }
            println!("\n{} words total", items.len());
        }
    }

    Ok(())
}
