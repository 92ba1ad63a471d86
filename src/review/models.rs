//! Data models for the review scheduler

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::intervals::{interval_ms, Stage, FIRST_STAGE};

/// One example sentence with its translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordExample {
    pub en: String,
    pub zh: String,
}

/// A synonym and its translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Synonym {
    pub word: String,
    pub translation: String,
}

/// A generated vocabulary record, as shown on a flashcard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordData {
    pub word: String,
    #[serde(default)]
    pub phonetic: String,
    #[serde(default)]
    pub translation: String,
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub examples: Vec<WordExample>,
    #[serde(default)]
    pub synonyms: Vec<Synonym>,
    #[serde(default)]
    pub mnemonic: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl WordData {
    pub fn new(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            phonetic: String::new(),
            translation: String::new(),
            definition: String::new(),
            examples: Vec::new(),
            synonyms: Vec::new(),
            mnemonic: String::new(),
            image_url: None,
        }
    }
}

/// Displayable content attached to a review item.
///
/// The scheduler copies it in and out but never looks inside.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(pub serde_json::Value);

impl Payload {
    pub fn from_word(word: &WordData) -> Self {
        // A struct of strings and vecs always serializes
        Self(serde_json::to_value(word).unwrap_or_default())
    }

    /// Interpret the payload as a vocabulary record, if it is one
    pub fn to_word(&self) -> Option<WordData> {
        serde_json::from_value(self.0.clone()).ok()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_null()
    }
}

impl From<serde_json::Value> for Payload {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

impl From<&WordData> for Payload {
    fn from(word: &WordData) -> Self {
        Self::from_word(word)
    }
}

/// A learned unit under spaced-repetition tracking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewItem {
    /// Canonical text of the learned word; unique within the store
    pub identity: String,
    #[serde(default)]
    pub payload: Payload,
    pub stage: Stage,
    /// Epoch milliseconds of the last stage change
    pub last_transition_at: i64,
    /// Epoch milliseconds; always `last_transition_at + interval(stage)`
    pub next_due_at: i64,
}

impl ReviewItem {
    /// Create an item at the first stage, as on first mastery
    pub fn new(identity: String, payload: Payload, now_ms: i64) -> Self {
        Self::at_stage(identity, payload, FIRST_STAGE, now_ms)
    }

    pub(crate) fn at_stage(identity: String, payload: Payload, stage: Stage, now_ms: i64) -> Self {
        Self {
            identity,
            payload,
            stage,
            last_transition_at: now_ms,
            next_due_at: now_ms + interval_ms(stage),
        }
    }

    /// Move to `stage` at `now_ms`, recomputing the due time with it
    pub(crate) fn transition(&mut self, stage: Stage, now_ms: i64) {
        self.stage = stage;
        self.last_transition_at = now_ms;
        self.next_due_at = now_ms + interval_ms(stage);
    }

    /// Check if the item is due at `now_ms` (inclusive)
    pub fn is_due_at(&self, now_ms: i64) -> bool {
        self.next_due_at <= now_ms
    }

    pub fn due_date(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.next_due_at).single()
    }

    pub fn last_transition_date(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.last_transition_at).single()
    }
}

/// Binary judgment reported by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Outcome {
    Mastered,
    Failed,
}

/// Snapshot statistics over the whole store
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub total_items: usize,
    pub due_items: usize,
    /// Item count per stage, indexed by stage
    pub items_per_stage: Vec<usize>,
    /// Earliest due time among items that are not yet due
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_due_at: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_item_is_stage_one() {
        let item = ReviewItem::new("apple".to_string(), Payload::default(), 1_000);
        assert_eq!(item.stage, 1);
        assert_eq!(item.last_transition_at, 1_000);
        assert_eq!(item.next_due_at, 1_000 + 3_600_000);
    }

    #[test]
    fn test_due_boundary_is_inclusive() {
        let item = ReviewItem::new("apple".to_string(), Payload::default(), 0);
        assert!(!item.is_due_at(3_599_999));
        assert!(item.is_due_at(3_600_000));
    }

    #[test]
    fn test_item_serializes_camel_case() {
        let item = ReviewItem::new("apple".to_string(), Payload::default(), 5);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["identity"], "apple");
        assert_eq!(json["stage"], 1);
        assert_eq!(json["lastTransitionAt"], 5);
        assert_eq!(json["nextDueAt"], 3_600_005);
    }

    #[test]
    fn test_payload_word_conversion() {
        let mut word = WordData::new("apple");
        word.translation = "苹果".to_string();
        word.image_url = Some("https://example.com/apple.png".to_string());

        let payload = Payload::from_word(&word);
        assert_eq!(payload.0["imageUrl"], "https://example.com/apple.png");
        assert_eq!(payload.to_word(), Some(word));
    }

    #[test]
    fn test_opaque_payload_is_not_a_word() {
        let payload = Payload::from(serde_json::json!([1, 2, 3]));
        assert!(payload.to_word().is_none());
        assert!(Payload::default().is_empty());
    }

    #[test]
    fn test_word_data_defaults_missing_fields() {
        let word: WordData = serde_json::from_str(r#"{"word":"apple"}"#).unwrap();
        assert_eq!(word, WordData::new("apple"));
    }
}
