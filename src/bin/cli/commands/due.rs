use anyhow::{Context, Result};

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let due = app.scheduler.due_now().context("Failed to query due words")?;

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> =
                due.iter().map(|item| app.item_json(item)).collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if due.is_empty() {
                println!("Nothing to review right now.");
                return Ok(());
            }
            for item in &due {
                println!("{}", app.item_line(item, use_color));
            }
            println!("\n{} words due", due.len());
        }
    }

    Ok(())
}
