use anyhow::{Context, Result};

use flash10_lib::review::intervals::{format_interval_ms, interval_ms};

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat) -> Result<()> {
    let now = app.scheduler.now_ms();
    let stats = app.scheduler.stats(now).context("Failed to compute stats")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Plain => {
            println!("Words:  {}", stats.total_items);
            println!("Due:    {}", stats.due_items);
            for (stage, count) in stats.items_per_stage.iter().enumerate().skip(1) {
                println!(
                    "  stage {} ({:>3}): {}",
                    stage,
                    format_interval_ms(interval_ms(stage as u8)),
                    count
                );
            }
            if let Some(next) = stats.next_due_at {
                println!("Next:   in {}", format_interval_ms(next - now));
            }
        }
    }

    Ok(())
}
