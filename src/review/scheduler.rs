//! Review scheduler
//!
//! Applies mastered/failed outcomes to review items and answers due queries.
//! Each mutation is a full load, apply, save cycle under one lock, so two
//! callers can never interleave and lose each other's update.
//!
//! Transitions:
//! - mastered, absent: create at stage 1
//! - mastered, present at s: stage min(s + 1, MAX_STAGE)
//! - failed, present: reset to a fresh stage 1 item
//! - failed, absent: no-op

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;

use super::clock::{Clock, SystemClock};
use super::intervals::{interval_duration, next_stage, STAGE_COUNT};
use super::models::{Outcome, Payload, ReviewItem, ReviewStats};
use super::reminder::ReminderDispatcher;
use super::store::{ReviewStore, StoreError};

#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("Identity must not be empty")]
    EmptyIdentity,

    /// The store still holds the previous state. `attempted` is the item as
    /// it would have been saved, for callers that continue in memory.
    #[error("Failed to persist review data: {source}")]
    PersistenceWrite {
        attempted: Option<ReviewItem>,
        source: StoreError,
    },

    #[error("Review store lock poisoned")]
    Poisoned,
}

pub type Result<T> = std::result::Result<T, ReviewError>;

type ItemIndex = BTreeMap<String, ReviewItem>;

/// Spaced-repetition scheduler over an injected review store
pub struct ReviewScheduler<S: ReviewStore, C: Clock = SystemClock> {
    store: Mutex<S>,
    clock: C,
    reminders: Option<Arc<ReminderDispatcher>>,
}

impl<S: ReviewStore> ReviewScheduler<S, SystemClock> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: ReviewStore, C: Clock> ReviewScheduler<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self {
            store: Mutex::new(store),
            clock,
            reminders: None,
        }
    }

    /// Arm a reminder through `dispatcher` whenever an item changes stage
    pub fn with_reminders(mut self, dispatcher: Arc<ReminderDispatcher>) -> Self {
        self.reminders = Some(dispatcher);
        self
    }

    pub fn reminders(&self) -> Option<&Arc<ReminderDispatcher>> {
        self.reminders.as_ref()
    }

    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    // ==================== Outcomes ====================

    /// Record that `identity` was recalled correctly.
    ///
    /// Creates the item at stage 1 or advances it one stage, saturating at
    /// the top of the interval table. The payload is replaced either way.
    pub fn record_mastered(&self, identity: &str, payload: Payload) -> Result<ReviewItem> {
        let identity = normalize_identity(identity)?;
        let mut store = self.lock_store()?;
        let mut items = index_items(store.load());
        let now = self.clock.now_ms();

        let item = match items.get(&identity) {
            Some(existing) => {
                let mut item = existing.clone();
                item.payload = payload;
                item.transition(next_stage(existing.stage), now);
                item
            }
            None => ReviewItem::new(identity.clone(), payload, now),
        };

        items.insert(identity, item.clone());
        persist(&mut *store, &items, Some(&item))?;
        drop(store);

        log::info!(
            "Mastered '{}': stage {}, due at {}",
            item.identity,
            item.stage,
            item.next_due_at
        );
        self.arm_reminder(&item);
        Ok(item)
    }

    /// Record that `identity` was not recalled during a review.
    ///
    /// A tracked item loses all progress and restarts at stage 1. Unknown
    /// identities are left alone and nothing is written.
    pub fn record_failed(
        &self,
        identity: &str,
        payload: Payload,
    ) -> Result<Option<ReviewItem>> {
        let identity = normalize_identity(identity)?;
        let mut store = self.lock_store()?;
        let mut items = index_items(store.load());

        if items.remove(&identity).is_none() {
            log::debug!("Ignoring failure for untracked '{}'", identity);
            return Ok(None);
        }

        let item = ReviewItem::new(identity.clone(), payload, self.clock.now_ms());
        items.insert(identity, item.clone());
        persist(&mut *store, &items, Some(&item))?;
        drop(store);

        log::info!("Reset '{}' to stage {}", item.identity, item.stage);
        self.arm_reminder(&item);
        Ok(Some(item))
    }

    /// Apply an outcome. Returns the updated item, or `None` for a failure
    /// on an untracked identity.
    pub fn record(
        &self,
        identity: &str,
        payload: Payload,
        outcome: Outcome,
    ) -> Result<Option<ReviewItem>> {
        match outcome {
            Outcome::Mastered => self.record_mastered(identity, payload).map(Some),
            Outcome::Failed => self.record_failed(identity, payload),
        }
    }

    /// Stop tracking `identity`. Returns whether anything was removed.
    pub fn remove(&self, identity: &str) -> Result<bool> {
        let identity = normalize_identity(identity)?;
        let mut store = self.lock_store()?;
        let mut items = index_items(store.load());

        if items.remove(&identity).is_none() {
            return Ok(false);
        }

        persist(&mut *store, &items, None)?;
        drop(store);

        if let Some(reminders) = &self.reminders {
            reminders.cancel(&identity);
        }
        log::info!("Removed '{}' from review", identity);
        Ok(true)
    }

    // ==================== Queries ====================

    /// Items with `next_due_at <= now_ms`, earliest first
    pub fn query_due(&self, now_ms: i64) -> Result<Vec<ReviewItem>> {
        let store = self.lock_store()?;
        let mut due: Vec<ReviewItem> = index_items(store.load())
            .into_values()
            .filter(|item| item.is_due_at(now_ms))
            .collect();

        due.sort_by(|a, b| {
            a.next_due_at
                .cmp(&b.next_due_at)
                .then_with(|| a.identity.cmp(&b.identity))
        });
        Ok(due)
    }

    /// Items due according to the scheduler's clock
    pub fn due_now(&self) -> Result<Vec<ReviewItem>> {
        self.query_due(self.clock.now_ms())
    }

    pub fn get(&self, identity: &str) -> Result<Option<ReviewItem>> {
        let identity = normalize_identity(identity)?;
        let store = self.lock_store()?;
        Ok(index_items(store.load()).remove(&identity))
    }

    /// All tracked items, ordered by identity
    pub fn list(&self) -> Result<Vec<ReviewItem>> {
        let store = self.lock_store()?;
        Ok(index_items(store.load()).into_values().collect())
    }

    pub fn stats(&self, now_ms: i64) -> Result<ReviewStats> {
        let items = self.list()?;

        let mut stats = ReviewStats {
            total_items: items.len(),
            items_per_stage: vec![0; STAGE_COUNT],
            ..ReviewStats::default()
        };

        for item in &items {
            if let Some(count) = stats.items_per_stage.get_mut(usize::from(item.stage)) {
                *count += 1;
            }
            if item.is_due_at(now_ms) {
                stats.due_items += 1;
            } else {
                stats.next_due_at = Some(
                    stats
                        .next_due_at
                        .map_or(item.next_due_at, |next| next.min(item.next_due_at)),
                );
            }
        }

        Ok(stats)
    }

    /// Run `f` against the underlying store while holding the scheduler lock
    pub fn with_store<R>(&self, f: impl FnOnce(&S) -> R) -> Result<R> {
        let store = self.lock_store()?;
        Ok(f(&store))
    }

    fn lock_store(&self) -> Result<MutexGuard<'_, S>> {
        self.store.lock().map_err(|_| ReviewError::Poisoned)
    }

    fn arm_reminder(&self, item: &ReviewItem) {
        if let Some(reminders) = &self.reminders {
            reminders.schedule(item, interval_duration(item.stage));
        }
    }
}

fn normalize_identity(identity: &str) -> Result<String> {
    let identity = identity.trim();
    if identity.is_empty() {
        return Err(ReviewError::EmptyIdentity);
    }
    Ok(identity.to_string())
}

/// Key loaded items by identity. A duplicate identity keeps its last entry.
fn index_items(items: Vec<ReviewItem>) -> ItemIndex {
    items
        .into_iter()
        .map(|item| (item.identity.clone(), item))
        .collect()
}

fn persist<S: ReviewStore + ?Sized>(
    store: &mut S,
    items: &ItemIndex,
    attempted: Option<&ReviewItem>,
) -> Result<()> {
    let snapshot: Vec<ReviewItem> = items.values().cloned().collect();
    store.save(&snapshot).map_err(|source| {
        log::warn!("Review data not saved ({} items): {}", snapshot.len(), source);
        ReviewError::PersistenceWrite {
            attempted: attempted.cloned(),
            source,
        }
    })
}
