//! Records persisted by the service. Field names serialize in camelCase so the
//! stored files and API payloads keep the browser-facing layout.

use chrono::{NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Fresh opaque record id.
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Current UTC calendar date, the partition key for "today's content".
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// `YYYY-MM-DD` form of a date, as stored in `dateAdded`.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyWord {
    pub id: String,
    pub word: String,
    pub meaning: String,
    pub synonym: String,
    pub example: String,
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_example: Option<String>,
    #[serde(default)]
    pub learned: bool,
    #[serde(default)]
    pub difficult: bool,
    pub date_added: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Idiom {
    pub id: String,
    pub idiom: String,
    pub meaning: String,
    pub example: String,
    pub context: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_sentence: Option<String>,
    #[serde(default)]
    pub practiced: bool,
    #[serde(default)]
    pub mastered: bool,
    pub date_added: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GKQuestion {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    pub correct: String,
    pub explanation: String,
    pub topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answered_correctly: Option<bool>,
    pub date_added: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub is_read: bool,
    pub date_added: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    High,
    #[default]
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GKFact {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub importance: Importance,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub related_topics: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default)]
    pub learned: bool,
    pub date_added: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PracticeKind {
    Vocabulary,
    Idiom,
}

/// Model feedback on a practice sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PracticeEvaluation {
    #[serde(default)]
    pub grammar: String,
    #[serde(default)]
    pub clarity: String,
    #[serde(default)]
    pub usage: String,
    #[serde(default, deserialize_with = "crate::content::string_or_list")]
    #[schemars(with = "Vec<String>")]
    pub suggestions: Vec<String>,
    #[serde(default = "default_practice_score", deserialize_with = "crate::content::lenient_score")]
    #[schemars(with = "u8")]
    pub score: u8,
}

pub(crate) fn default_practice_score() -> u8 {
    5
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeSession {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: PracticeKind,
    pub target_word: String,
    pub user_sentence: String,
    pub evaluation: PracticeEvaluation,
    pub score: u8,
    /// RFC 3339 timestamp
    pub date: String,
}

/// Feedback on a learner's own example sentence for a vocabulary word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SentenceEvaluation {
    #[serde(deserialize_with = "crate::content::lenient_score")]
    #[schemars(with = "u8")]
    pub score: u8,
    pub feedback: String,
    #[serde(default, deserialize_with = "crate::content::string_or_list")]
    #[schemars(with = "Vec<String>")]
    pub suggestions: Vec<String>,
}

/// Feedback on a sentence written with an idiom; `score` is out of 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct IdiomEvaluation {
    pub is_correct: bool,
    pub feedback: String,
    #[serde(deserialize_with = "crate::content::lenient_score")]
    #[schemars(with = "u8")]
    pub score: u8,
}
