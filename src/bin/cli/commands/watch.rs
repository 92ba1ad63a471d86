use std::time::Duration;

use anyhow::Result;

use flash10_lib::review::intervals::interval_duration;

use crate::app::App;

/// Poll the due set until interrupted.
///
/// Re-arms a reminder for every tracked word on start, since timers from
/// earlier runs do not survive a restart.
pub async fn run(app: &App, every_secs: u64) -> Result<()> {
    let every = Duration::from_secs(every_secs.max(1));

    if app.config.reminders_enabled {
        let now = app.scheduler.now_ms();
        for item in app.scheduler.list()? {
            let remaining = (item.next_due_at - now).max(0) as u64;
            let delay = Duration::from_millis(remaining).min(interval_duration(item.stage));
            if let Some(reminders) = app.scheduler.reminders() {
                reminders.schedule(&item, delay);
            }
        }
    }

    let mut last_due = None;
    loop {
        match app.scheduler.due_now() {
            Ok(due) => {
                if last_due != Some(due.len()) {
                    println!("{} words due", due.len());
                    last_due = Some(due.len());
                }
            }
            Err(e) => log::error!("Due check failed: {}", e),
        }

        tokio::select! {
            _ = tokio::time::sleep(every) => {}
            _ = tokio::signal::ctrl_c() => {
                log::info!("Watch: shutting down");
                break;
            }
        }
    }

    Ok(())
}
