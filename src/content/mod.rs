//! Content generation boundary
//!
//! The generation service produces vocabulary batches for a category. It is
//! an external collaborator: this module only defines the contract the
//! presentation layer implements. The scheduler never calls it; only the
//! resulting words are handed to review sessions.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::review::WordData;

/// Default number of words per generated batch
pub const DEFAULT_BATCH_SIZE: usize = 5;

/// Vocabulary category offered by the app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "TOEFL")]
    Toefl,
    #[serde(rename = "IELTS")]
    Ielts,
    #[serde(rename = "GRE")]
    Gre,
    #[serde(rename = "SAT")]
    Sat,
    General,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Toefl,
        Category::Ielts,
        Category::Gre,
        Category::Sat,
        Category::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Toefl => "TOEFL",
            Category::Ielts => "IELTS",
            Category::Gre => "GRE",
            Category::Sat => "SAT",
            Category::General => "General",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GenerationError::UnknownCategory(s.to_string()))
    }
}

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Generation service returned no words")]
    EmptyResponse,

    #[error("Malformed generation response: {0}")]
    Malformed(String),

    #[error("Generation service error: {0}")]
    Upstream(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),
}

/// Source of freshly generated vocabulary
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch_batch(
        &self,
        category: Category,
        count: usize,
    ) -> Result<Vec<WordData>, GenerationError>;
}

/// Check a generated batch before it reaches a session
pub fn validate_batch(words: Vec<WordData>) -> Result<Vec<WordData>, GenerationError> {
    if words.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    if let Some(pos) = words.iter().position(|w| w.word.trim().is_empty()) {
        return Err(GenerationError::Malformed(format!("word {} has no text", pos)));
    }
    Ok(words)
}

/// Parse a raw JSON generation response into a validated batch
pub fn parse_batch(raw: &str) -> Result<Vec<WordData>, GenerationError> {
    let words: Vec<WordData> =
        serde_json::from_str(raw).map_err(|e| GenerationError::Malformed(e.to_string()))?;
    validate_batch(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSource(Vec<WordData>);

    #[async_trait]
    impl ContentSource for FixedSource {
        async fn fetch_batch(
            &self,
            _category: Category,
            count: usize,
        ) -> Result<Vec<WordData>, GenerationError> {
            validate_batch(self.0.iter().take(count).cloned().collect())
        }
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("toefl".parse::<Category>().unwrap(), Category::Toefl);
        assert_eq!(" General ".parse::<Category>().unwrap(), Category::General);
        assert!("TOEIC".parse::<Category>().is_err());
        assert_eq!(serde_json::to_string(&Category::Gre).unwrap(), "\"GRE\"");
    }

    #[test]
    fn test_parse_batch() {
        let words = parse_batch(r#"[{"word": "apple", "translation": "苹果"}]"#).unwrap();
        assert_eq!(words[0].word, "apple");

        assert!(matches!(parse_batch("[]"), Err(GenerationError::EmptyResponse)));
        assert!(matches!(parse_batch("{}"), Err(GenerationError::Malformed(_))));
        assert!(matches!(
            parse_batch(r#"[{"word": " "}]"#),
            Err(GenerationError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn test_source_contract() {
        let source = FixedSource(vec![WordData::new("apple"), WordData::new("pear")]);
        let batch = source.fetch_batch(Category::Sat, 1).await.unwrap();
        assert_eq!(batch.len(), 1);

        let empty = FixedSource(Vec::new());
        assert!(empty.fetch_batch(Category::Sat, DEFAULT_BATCH_SIZE).await.is_err());
    }
}
