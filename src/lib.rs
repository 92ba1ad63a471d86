//! Flash10 review engine: spaced-repetition scheduling for learned vocabulary.

pub mod config;
pub mod content;
pub mod review;

use std::sync::Arc;

use config::ReviewConfig;
use content::{Category, ContentSource, GenerationError};
use review::{
    JsonFileStore, LogSink, ReminderDispatcher, ReminderSink, ReviewScheduler, ReviewSession,
};

/// Scheduler over the on-disk store, as the app runs it
pub type AppScheduler = ReviewScheduler<JsonFileStore>;

/// Build the scheduler described by `config`, delivering reminders to `sink`
pub fn build_scheduler(
    config: &ReviewConfig,
    sink: Arc<dyn ReminderSink>,
) -> Result<AppScheduler, config::ConfigError> {
    let data_dir = config.resolve_data_dir()?;
    log::info!("Review data directory: {}", data_dir.display());

    let scheduler = ReviewScheduler::new(JsonFileStore::new(data_dir));
    if !config.reminders_enabled {
        return Ok(scheduler);
    }

    let dispatcher = ReminderDispatcher::new(sink, config.reminder.clone());
    Ok(scheduler.with_reminders(Arc::new(dispatcher)))
}

/// Build the scheduler with reminders written to the log
pub fn build_default_scheduler(config: &ReviewConfig) -> Result<AppScheduler, config::ConfigError> {
    build_scheduler(config, Arc::new(LogSink))
}

/// Fetch a batch of `config.batch_size` words and open a learning session over it
pub async fn start_learning_session(
    source: &dyn ContentSource,
    category: Category,
    config: &ReviewConfig,
) -> Result<ReviewSession, GenerationError> {
    let count = config.batch_size.max(1);
    log::debug!("Requesting {} {} words", count, category);
    let words = content::validate_batch(source.fetch_batch(category, count).await?)?;
    Ok(ReviewSession::learning(words))
}
