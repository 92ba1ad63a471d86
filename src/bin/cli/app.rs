use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, TimeZone};

use flash10_lib::config::{ReviewConfig, CONFIG_FILE_NAME};
use flash10_lib::review::intervals::format_interval_ms;
use flash10_lib::review::ReviewItem;
use flash10_lib::AppScheduler;

/// ANSI color codes
pub struct Color;

impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const GRAY: &str = "\x1b[90m";
}

/// Shared application state for CLI commands
pub struct App {
    pub config: ReviewConfig,
    pub scheduler: AppScheduler,
}

impl App {
    /// Load config from the data directory and open the review store
    pub fn new(data_dir: Option<PathBuf>) -> Result<Self> {
        let base_dir = match data_dir {
            Some(dir) => dir,
            None => ReviewConfig::default()
                .resolve_data_dir()
                .context("Failed to get data directory")?,
        };

        let config_path = base_dir.join(CONFIG_FILE_NAME);
        let mut config = ReviewConfig::load(&config_path)
            .with_context(|| format!("Failed to load {}", config_path.display()))?;
        if config.data_dir.is_none() {
            config.data_dir = Some(base_dir);
        }

        let scheduler = flash10_lib::build_default_scheduler(&config)
            .context("Failed to open review store")?;

        Ok(Self { config, scheduler })
    }

    pub fn item_json(&self, item: &ReviewItem) -> serde_json::Value {
        let now = self.scheduler.now_ms();
        serde_json::json!({
            "identity": item.identity,
            "stage": item.stage,
            "lastTransitionAt": item.last_transition_at,
            "nextDueAt": item.next_due_at,
            "due": item.is_due_at(now),
            "payload": item.payload,
        })
    }

    /// One-line plain rendering of an item
    pub fn item_line(&self, item: &ReviewItem, use_color: bool) -> String {
        let now = self.scheduler.now_ms();
        let when = if item.is_due_at(now) {
            "due now".to_string()
        } else {
            format!("in {}", format_interval_ms(item.next_due_at - now))
        };
        let at = Local
            .timestamp_millis_opt(item.next_due_at)
            .single()
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();

        if use_color {
            let color = if item.is_due_at(now) { Color::YELLOW } else { Color::GRAY };
            format!(
                "{}{}{}  stage {}  {}{} ({}){}",
                Color::BOLD,
                item.identity,
                Color::RESET,
                item.stage,
                color,
                when,
                at,
                Color::RESET
            )
        } else {
            format!("{}  stage {}  {} ({})", item.identity, item.stage, when, at)
        }
    }
}
