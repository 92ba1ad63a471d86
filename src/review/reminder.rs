//! Best-effort review reminders
//!
//! Arms one-shot tokio timers that surface a local notification when an item
//! comes due. Timers live only in memory; a restart drops them. The due query
//! remains the source of truth and never looks at reminder state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use super::models::ReviewItem;

/// Host notification permission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Permission {
    Granted,
    Denied,
    /// The host has no notification support at all
    Unsupported,
}

/// Where reminders are delivered. Delivery is fire-and-forget.
pub trait ReminderSink: Send + Sync + 'static {
    fn request_permission(&self) -> Permission;

    fn notify(&self, title: &str, body: &str);
}

/// Sink that writes reminders to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ReminderSink for LogSink {
    fn request_permission(&self) -> Permission {
        Permission::Granted
    }

    fn notify(&self, title: &str, body: &str) {
        log::info!("{} {}", title, body);
    }
}

/// Text of a reminder. `{word}` in the body is replaced by the item identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReminderTexts {
    pub title: String,
    pub body: String,
}

impl Default for ReminderTexts {
    fn default() -> Self {
        Self {
            title: "Flash10 复习时间到！".to_string(),
            body: "单词 \"{word}\" 需要复习了，点击开始速记。".to_string(),
        }
    }
}

impl ReminderTexts {
    pub fn render(&self, identity: &str) -> (String, String) {
        (self.title.clone(), self.body.replace("{word}", identity))
    }
}

/// Arms and cancels per-item reminder timers
pub struct ReminderDispatcher {
    sink: Arc<dyn ReminderSink>,
    texts: ReminderTexts,
    permission: Permission,
    timers: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl ReminderDispatcher {
    /// Create a dispatcher, asking the host for permission once
    pub fn new(sink: Arc<dyn ReminderSink>, texts: ReminderTexts) -> Self {
        let permission = sink.request_permission();
        if permission != Permission::Granted {
            log::info!("Review reminders disabled: permission {:?}", permission);
        }
        Self {
            sink,
            texts,
            permission,
            timers: Mutex::new(HashMap::new()),
        }
    }

    pub fn permission(&self) -> Permission {
        self.permission
    }

    /// Arm a reminder for `item` after `delay`, replacing any pending one.
    ///
    /// Silently does nothing without permission or outside a tokio runtime.
    pub fn schedule(&self, item: &ReviewItem, delay: Duration) {
        if self.permission != Permission::Granted {
            log::debug!("Skipping reminder for '{}': no permission", item.identity);
            return;
        }
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            log::debug!("Skipping reminder for '{}': no async runtime", item.identity);
            return;
        };
        let Ok(mut timers) = self.timers.lock() else {
            return;
        };

        timers.retain(|_, handle| !handle.is_finished());
        if let Some(stale) = timers.remove(&item.identity) {
            stale.abort();
        }

        let sink = Arc::clone(&self.sink);
        let (title, body) = self.texts.render(&item.identity);
        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            sink.notify(&title, &body);
        });

        log::debug!("Reminder for '{}' armed in {:?}", item.identity, delay);
        timers.insert(item.identity.clone(), handle);
    }

    /// Cancel the pending reminder for an identity, if any
    pub fn cancel(&self, identity: &str) {
        if let Ok(mut timers) = self.timers.lock() {
            if let Some(handle) = timers.remove(identity) {
                handle.abort();
            }
        }
    }

    pub fn cancel_all(&self) {
        if let Ok(mut timers) = self.timers.lock() {
            for (_, handle) in timers.drain() {
                handle.abort();
            }
        }
    }

    /// Number of reminders still waiting to fire
    pub fn pending(&self) -> usize {
        self.timers
            .lock()
            .map(|timers| timers.values().filter(|h| !h.is_finished()).count())
            .unwrap_or(0)
    }
}

impl Drop for ReminderDispatcher {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
