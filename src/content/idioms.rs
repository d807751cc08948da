use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, warn};

use super::or_default;
use crate::core::{ContentGenerator, LowLevelClient};
use crate::models::{generate_id, Idiom};
use crate::storage::{names, DailyContent};

pub const DAILY_COUNT: usize = 5;

/// Idiom evaluations at or above this score mark the idiom mastered.
pub const MASTERY_SCORE: u8 = 80;

impl DailyContent for Idiom {
    const COLLECTION: &'static str = names::IDIOMS;
    const NOUN: &'static str = "Idiom";

    fn id(&self) -> &str {
        &self.id
    }

    fn date_added(&self) -> &str {
        &self.date_added
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct IdiomDraft {
    #[serde(default)]
    pub idiom: Option<String>,
    #[serde(default)]
    pub meaning: Option<String>,
    #[serde(default)]
    pub example: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
}

impl IdiomDraft {
    pub fn into_record(self, date: &str) -> Idiom {
        Idiom {
            id: generate_id(),
            idiom: self.idiom.unwrap_or_default(),
            meaning: self.meaning.unwrap_or_default(),
            example: self.example.unwrap_or_default(),
            context: or_default(self.context, "general"),
            user_sentence: None,
            practiced: false,
            mastered: false,
            date_added: date.to_string(),
        }
    }
}

pub fn prompt(count: usize) -> String {
    format!(
        "Generate {count} useful English idioms and phrases for SSC CGL preparation.
For each idiom, provide:
1. Idiom/Phrase
2. Meaning
3. Example sentence
4. Context where it's commonly used

Return as valid JSON array with objects containing: idiom, meaning, example, context."
    )
}

pub async fn generate<C: LowLevelClient>(generator: &ContentGenerator<C>, date: &str) -> Vec<Idiom> {
    match generator.generate_list::<IdiomDraft>(prompt(DAILY_COUNT)).await {
        Ok(drafts) if !drafts.is_empty() => {
            info!(count = drafts.len(), "generated idioms");
            drafts.into_iter().map(|d| d.into_record(date)).collect()
        }
        Ok(_) => {
            warn!("model returned no idioms; using fallback idioms");
            fallback(date)
        }
        Err(e) => {
            warn!(error = %e, "idiom generation failed; using fallback idioms");
            fallback(date)
        }
    }
}

const FALLBACK: &[(&str, &str, &str, &str)] = &[
    (
        "Break the ice",
        "To initiate conversation in a social setting",
        "He told a joke to break the ice at the meeting.",
        "social situations",
    ),
    (
        "A blessing in disguise",
        "Something that seems bad at first but turns out to be good",
        "Missing the train was a blessing in disguise, as he met his future business partner at the station.",
        "everyday conversation",
    ),
    (
        "Burn the midnight oil",
        "To work or study late into the night",
        "Aspirants often burn the midnight oil in the weeks before the exam.",
        "work and study",
    ),
    (
        "Hit the nail on the head",
        "To describe exactly what is causing a situation or problem",
        "The report hit the nail on the head by blaming poor planning for the delay.",
        "discussions and analysis",
    ),
    (
        "Once in a blue moon",
        "Very rarely",
        "He visits his hometown only once in a blue moon.",
        "everyday conversation",
    ),
];

pub fn fallback(date: &str) -> Vec<Idiom> {
    FALLBACK
        .iter()
        .map(|&(idiom, meaning, example, context)| Idiom {
            id: generate_id(),
            idiom: idiom.to_string(),
            meaning: meaning.to_string(),
            example: example.to_string(),
            context: context.to_string(),
            user_sentence: None,
            practiced: false,
            mastered: false,
            date_added: date.to_string(),
        })
        .collect()
}
