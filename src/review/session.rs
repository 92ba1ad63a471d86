//! Learning and review sessions
//!
//! A session walks through a batch of words one card at a time and turns each
//! mastered/not-mastered judgment into scheduler calls. In a learning session
//! a miss is not recorded; in a review session a miss resets the item.
//! Storage failures never stop a session.

use serde::{Deserialize, Serialize};

use super::clock::Clock;
use super::models::{Outcome, Payload, ReviewItem, WordData};
use super::scheduler::{ReviewError, ReviewScheduler};
use super::store::ReviewStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionMode {
    /// Fresh words from the content service
    Learning,
    /// Words that came due
    Review,
}

/// Result of answering one card
#[derive(Debug)]
pub struct AnswerReport {
    pub word: WordData,
    /// Outcome sent to the scheduler, if any
    pub recorded: Option<Outcome>,
    /// Item after the transition. On a failed write this is the state that
    /// could not be saved.
    pub item: Option<ReviewItem>,
    /// Set when the scheduler could not apply the outcome
    pub warning: Option<ReviewError>,
    pub finished: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub mode: SessionMode,
    pub score: usize,
    pub total: usize,
    pub mastered: Vec<WordData>,
}

/// One card: the tracked identity, what is shown, and what is stored
struct Card {
    identity: String,
    word: WordData,
    payload: Payload,
}

pub struct ReviewSession {
    mode: SessionMode,
    cards: Vec<Card>,
    index: usize,
    mastered: Vec<WordData>,
}

impl ReviewSession {
    pub fn learning(words: Vec<WordData>) -> Self {
        let cards = words
            .into_iter()
            .map(|word| Card {
                identity: word.word.clone(),
                payload: Payload::from_word(&word),
                word,
            })
            .collect();
        Self::with_mode(SessionMode::Learning, cards)
    }

    /// Start a review over everything due at `now_ms`.
    /// Returns `None` when nothing is due.
    pub fn review<S: ReviewStore, C: Clock>(
        scheduler: &ReviewScheduler<S, C>,
        now_ms: i64,
    ) -> Result<Option<Self>, ReviewError> {
        let due = scheduler.query_due(now_ms)?;
        if due.is_empty() {
            return Ok(None);
        }

        // Outcomes go to the stored identity, whatever the payload says
        let cards = due
            .into_iter()
            .map(|item| Card {
                word: item
                    .payload
                    .to_word()
                    .unwrap_or_else(|| WordData::new(item.identity.clone())),
                identity: item.identity,
                payload: item.payload,
            })
            .collect();
        Ok(Some(Self::with_mode(SessionMode::Review, cards)))
    }

    fn with_mode(mode: SessionMode, cards: Vec<Card>) -> Self {
        Self {
            mode,
            cards,
            index: 0,
            mastered: Vec::new(),
        }
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn current(&self) -> Option<&WordData> {
        self.cards.get(self.index).map(|card| &card.word)
    }

    /// Zero-based index of the current card and the batch size
    pub fn position(&self) -> (usize, usize) {
        (self.index.min(self.cards.len()), self.cards.len())
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.cards.len()
    }

    /// Judge the current card and move to the next one.
    /// Returns `None` once every card has been answered.
    pub fn answer<S: ReviewStore, C: Clock>(
        &mut self,
        scheduler: &ReviewScheduler<S, C>,
        mastered: bool,
    ) -> Option<AnswerReport> {
        let card = self.cards.get(self.index)?;
        let identity = card.identity.clone();
        let word = card.word.clone();
        let payload = card.payload.clone();

        let recorded = match (mastered, self.mode) {
            (true, _) => Some(Outcome::Mastered),
            (false, SessionMode::Review) => Some(Outcome::Failed),
            (false, SessionMode::Learning) => None,
        };

        let (item, warning) = match recorded {
            Some(outcome) => match scheduler.record(&identity, payload, outcome) {
                Ok(item) => (item, None),
                Err(e) => {
                    log::warn!("Could not record '{}': {}", identity, e);
                    let attempted = match &e {
                        ReviewError::PersistenceWrite { attempted, .. } => attempted.clone(),
                        _ => None,
                    };
                    (attempted, Some(e))
                }
            },
            None => (None, None),
        };

        if mastered {
            self.mastered.push(word.clone());
        }
        self.index += 1;

        Some(AnswerReport {
            word,
            recorded,
            item,
            warning,
            finished: self.is_finished(),
        })
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            mode: self.mode,
            score: self.mastered.len(),
            total: self.cards.len(),
            mastered: self.mastered.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::review::clock::FixedClock;
    use crate::review::store::MemoryStore;

    const T0: i64 = 1_700_000_000_000;
    const HOUR: i64 = 3_600_000;

    fn words(list: &[&str]) -> Vec<WordData> {
        list.iter().map(|w| WordData::new(*w)).collect()
    }

    fn create_test_scheduler() -> (ReviewScheduler<MemoryStore, Arc<FixedClock>>, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(T0));
        (ReviewScheduler::with_clock(MemoryStore::new(), Arc::clone(&clock)), clock)
    }

    #[test]
    fn test_learning_session_records_only_mastered() {
        let (scheduler, _clock) = create_test_scheduler();
        let mut session = ReviewSession::learning(words(&["apple", "pear"]));

        let first = session.answer(&scheduler, true).unwrap();
        assert_eq!(first.recorded, Some(Outcome::Mastered));
        assert_eq!(first.item.unwrap().stage, 1);
        assert!(!first.finished);

        let second = session.answer(&scheduler, false).unwrap();
        assert_eq!(second.recorded, None);
        assert!(second.finished);

        assert!(session.answer(&scheduler, true).is_none());
        assert!(scheduler.get("pear").unwrap().is_none());

        let summary = session.summary();
        assert_eq!(summary.score, 1);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.mastered, words(&["apple"]));
    }

    #[test]
    fn test_review_session_starts_from_due_items() {
        let (scheduler, clock) = create_test_scheduler();
        assert!(ReviewSession::review(&scheduler, T0).unwrap().is_none());

        let mut apple = WordData::new("apple");
        apple.translation = "苹果".to_string();
        scheduler.record_mastered("apple", Payload::from_word(&apple)).unwrap();
        scheduler.record_mastered("kiwi", Payload::default()).unwrap();

        clock.advance(HOUR);
        let session = ReviewSession::review(&scheduler, clock.now_ms()).unwrap().unwrap();
        assert_eq!(session.mode(), SessionMode::Review);
        assert_eq!(session.position(), (0, 2));
        assert_eq!(session.current(), Some(&apple));
    }

    #[test]
    fn test_review_miss_resets_item() {
        let (scheduler, clock) = create_test_scheduler();
        for _ in 0..3 {
            scheduler.record_mastered("apple", Payload::default()).unwrap();
        }

        clock.advance(4 * 24 * HOUR);
        let mut session = ReviewSession::review(&scheduler, clock.now_ms()).unwrap().unwrap();
        let report = session.answer(&scheduler, false).unwrap();

        assert_eq!(report.recorded, Some(Outcome::Failed));
        assert_eq!(report.item.unwrap().stage, 1);
        assert_eq!(session.summary().score, 0);
    }

    #[test]
    fn test_review_records_against_stored_identity() {
        let (scheduler, clock) = create_test_scheduler();
        let shown = Payload::from_word(&WordData::new("Apple"));
        for _ in 0..3 {
            scheduler.record_mastered("apple", shown.clone()).unwrap();
        }

        clock.advance(4 * 24 * HOUR);
        let mut session = ReviewSession::review(&scheduler, clock.now_ms()).unwrap().unwrap();
        assert_eq!(session.current().unwrap().word, "Apple");

        let report = session.answer(&scheduler, false).unwrap();
        assert_eq!(report.item.unwrap().identity, "apple");
        assert_eq!(scheduler.get("apple").unwrap().unwrap().stage, 1);
        assert!(scheduler.get("Apple").unwrap().is_none());

        clock.advance(2 * HOUR);
        let mut session = ReviewSession::review(&scheduler, clock.now_ms()).unwrap().unwrap();
        session.answer(&scheduler, true).unwrap();
        assert_eq!(scheduler.list().unwrap().len(), 1);
        assert_eq!(scheduler.get("apple").unwrap().unwrap().stage, 2);
    }

    #[test]
    fn test_review_keeps_opaque_payload() {
        let (scheduler, clock) = create_test_scheduler();
        let opaque = Payload::from(serde_json::json!(["not", "a", "word"]));
        scheduler.record_mastered("kiwi", opaque.clone()).unwrap();

        clock.advance(HOUR);
        let mut session = ReviewSession::review(&scheduler, clock.now_ms()).unwrap().unwrap();
        assert_eq!(session.current().unwrap().word, "kiwi");

        session.answer(&scheduler, true).unwrap();
        assert_eq!(scheduler.get("kiwi").unwrap().unwrap().payload, opaque);
    }

    #[test]
    fn test_write_failure_does_not_stop_session() {
        let clock = Arc::new(FixedClock::new(T0));
        let mut store = MemoryStore::new();
        store.fail_writes(true);
        let scheduler = ReviewScheduler::with_clock(store, clock);
        let mut session = ReviewSession::learning(words(&["apple", "pear"]));

        let report = session.answer(&scheduler, true).unwrap();
        assert!(matches!(report.warning, Some(ReviewError::PersistenceWrite { .. })));
        assert_eq!(report.item.unwrap().stage, 1);

        assert!(session.answer(&scheduler, true).unwrap().finished);
        assert_eq!(session.summary().score, 2);
    }
}
