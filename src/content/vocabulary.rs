use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, warn};

use super::or_default;
use crate::core::{ContentGenerator, LowLevelClient};
use crate::models::{generate_id, VocabularyWord};
use crate::storage::{names, DailyContent};

/// Words generated per day.
pub const DAILY_COUNT: usize = 10;

impl DailyContent for VocabularyWord {
    const COLLECTION: &'static str = names::VOCABULARY;
    const NOUN: &'static str = "Word";

    fn id(&self) -> &str {
        &self.id
    }

    fn date_added(&self) -> &str {
        &self.date_added
    }
}

/// A word as the model returns it.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct WordDraft {
    #[serde(default)]
    pub word: Option<String>,
    #[serde(default)]
    pub meaning: Option<String>,
    #[serde(default)]
    pub synonym: Option<String>,
    #[serde(default)]
    pub example: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
}

pub fn prompt(count: usize) -> String {
    format!(
        r#"Generate exactly {count} advanced English vocabulary words suitable for SSC CGL preparation.
For each word, provide:
1. Word
2. Meaning (concise definition)
3. Synonym
4. Example sentence using the word
5. Field of usage (formal, academic, literary, etc.)

Return the response as a valid JSON array with objects containing: word, meaning, synonym, example, field.
Ensure words are challenging but relevant for competitive exams.

Example format:
[
  {{
    "word": "Example",
    "meaning": "A representative form or pattern",
    "synonym": "Sample",
    "example": "This is an example sentence.",
    "field": "academic"
  }}
]"#
    )
}

impl WordDraft {
    pub fn into_record(self, date: &str) -> VocabularyWord {
        VocabularyWord {
            id: generate_id(),
            word: self.word.unwrap_or_default(),
            meaning: self.meaning.unwrap_or_default(),
            synonym: self.synonym.unwrap_or_default(),
            example: self.example.unwrap_or_default(),
            field: or_default(self.field, "general"),
            user_example: None,
            learned: false,
            difficult: false,
            date_added: date.to_string(),
        }
    }
}

/// Ask the model for today's words; any failure yields the fallback list.
pub async fn generate<C: LowLevelClient>(generator: &ContentGenerator<C>, date: &str) -> Vec<VocabularyWord> {
    match generator.generate_list::<WordDraft>(prompt(DAILY_COUNT)).await {
        Ok(drafts) if !drafts.is_empty() => {
            if drafts.len() < DAILY_COUNT {
                warn!(returned = drafts.len(), expected = DAILY_COUNT, "model returned fewer words than requested");
            }
            info!(count = drafts.len().min(DAILY_COUNT), "generated vocabulary");
            drafts.into_iter().take(DAILY_COUNT).map(|d| d.into_record(date)).collect()
        }
        Ok(_) => {
            warn!("model returned an empty word list; using fallback vocabulary");
            fallback(date)
        }
        Err(e) => {
            warn!(error = %e, "vocabulary generation failed; using fallback vocabulary");
            fallback(date)
        }
    }
}

const FALLBACK: &[(&str, &str, &str, &str, &str)] = &[
    (
        "Perspicacious",
        "Having keen insight or discernment",
        "Perceptive",
        "The perspicacious detective quickly solved the complex case.",
        "formal",
    ),
    (
        "Ubiquitous",
        "Present, appearing, or found everywhere",
        "Omnipresent",
        "Smartphones have become ubiquitous in modern society.",
        "academic",
    ),
    (
        "Fastidious",
        "Very attentive to accuracy and detail; hard to please",
        "Meticulous",
        "She was fastidious about keeping her workspace organized.",
        "formal",
    ),
    (
        "Ephemeral",
        "Lasting for a very short time",
        "Transient",
        "The beauty of cherry blossoms is ephemeral but memorable.",
        "literary",
    ),
    (
        "Sagacious",
        "Having or showing keen mental discernment and good judgment",
        "Wise",
        "The sagacious leader made decisions that benefited everyone.",
        "formal",
    ),
    (
        "Mellifluous",
        "Sweet or musical; pleasant to hear",
        "Melodious",
        "Her mellifluous voice captivated the entire audience.",
        "literary",
    ),
    (
        "Pragmatic",
        "Dealing with things sensibly and realistically",
        "Practical",
        "A pragmatic approach to problem-solving often yields the best results.",
        "academic",
    ),
    (
        "Tenacious",
        "Tending to keep a firm hold of something; persistent",
        "Persistent",
        "Her tenacious spirit helped her overcome many obstacles.",
        "formal",
    ),
    (
        "Sanguine",
        "Optimistic or positive, especially in a difficult situation",
        "Hopeful",
        "Despite the setbacks, he remained sanguine about the project's success.",
        "formal",
    ),
    (
        "Equanimity",
        "Mental calmness and composure, especially in difficult situations",
        "Composure",
        "She faced the crisis with remarkable equanimity.",
        "formal",
    ),
];

pub fn fallback(date: &str) -> Vec<VocabularyWord> {
    FALLBACK
        .iter()
        .map(|&(word, meaning, synonym, example, field)| VocabularyWord {
            id: generate_id(),
            word: word.to_string(),
            meaning: meaning.to_string(),
            synonym: synonym.to_string(),
            example: example.to_string(),
            field: field.to_string(),
            user_example: None,
            learned: false,
            difficult: false,
            date_added: date.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::mock::{MockClient, MockResponse};

    #[test]
    fn fallback_has_a_full_day() {
        let words = fallback("2024-03-01");
        assert_eq!(words.len(), DAILY_COUNT);
        assert_eq!(words[0].word, "Perspicacious");
        assert!(words.iter().all(|w| w.date_added == "2024-03-01" && !w.learned));
    }

    #[tokio::test]
    async fn extra_words_are_trimmed_and_defaults_applied() {
        let drafts: Vec<String> = (0..12).map(|i| format!(r#"{{"word": "w{i}", "meaning": "m"}}"#)).collect();
        let raw = format!("Here are the words: [{}]", drafts.join(","));
        let (client, _) = MockClient::with_responses(vec![MockResponse::Success(raw)]);
        let words = generate(&ContentGenerator::new(client), "2024-03-01").await;
        assert_eq!(words.len(), DAILY_COUNT);
        assert_eq!(words[9].word, "w9");
        assert_eq!(words[0].field, "general");
        assert_eq!(words[0].synonym, "");
    }

    #[tokio::test]
    async fn malformed_output_uses_fallback() {
        let (client, _) =
            MockClient::with_responses(vec![MockResponse::Success("[{\"word\": \"oops\",]".to_string())]);
        let words = generate(&ContentGenerator::new(client), "2024-03-01").await;
        assert_eq!(words[0].word, "Perspicacious");
    }
}
