//! Spaced-repetition review for Flash10
//!
//! This module provides:
//! - The fixed-stage interval table
//! - Review item storage (JSON file or in-memory)
//! - The scheduler that applies mastered/failed outcomes and answers due queries
//! - Best-effort reminder timers
//! - Learning and review session flow

pub mod clock;
pub mod intervals;
pub mod models;
pub mod reminder;
pub mod scheduler;
pub mod session;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use models::*;
pub use reminder::{LogSink, Permission, ReminderDispatcher, ReminderSink, ReminderTexts};
pub use scheduler::{ReviewError, ReviewScheduler};
pub use session::{AnswerReport, ReviewSession, SessionMode, SessionSummary};
pub use store::{JsonFileStore, MemoryStore, ReviewStore, StoreError};
