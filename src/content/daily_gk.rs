use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, warn};

use super::{or_default, string_or_list};
use crate::core::{ContentGenerator, LowLevelClient};
use crate::models::{generate_id, Difficulty, GKFact, Importance};
use crate::storage::{names, DailyContent};

/// Facts requested per day.
pub const DAILY_COUNT: usize = 8;
/// A generated batch smaller than this is padded from the fallback set.
pub const MIN_FACTS: usize = 5;

impl DailyContent for GKFact {
    const COLLECTION: &'static str = names::GK_FACTS;
    const NOUN: &'static str = "Fact";

    fn id(&self) -> &str {
        &self.id
    }

    fn date_added(&self) -> &str {
        &self.date_added
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FactDraft {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub importance: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default, deserialize_with = "string_or_list")]
    #[schemars(with = "Vec<String>")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "string_or_list")]
    #[schemars(with = "Vec<String>")]
    pub related_topics: Vec<String>,
}

fn parse_importance(raw: Option<&str>) -> Importance {
    match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        Some("high") => Importance::High,
        Some("low") => Importance::Low,
        _ => Importance::Medium,
    }
}

fn parse_difficulty(raw: Option<&str>) -> Difficulty {
    match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        Some("easy") => Difficulty::Easy,
        Some("hard") => Difficulty::Hard,
        _ => Difficulty::Medium,
    }
}

impl FactDraft {
    pub fn into_record(self, date: &str) -> GKFact {
        GKFact {
            id: generate_id(),
            title: or_default(self.title, "General Knowledge Fact"),
            description: or_default(self.description, "Important information for competitive exams."),
            category: or_default(self.category, "General"),
            importance: parse_importance(self.importance.as_deref()),
            difficulty: parse_difficulty(self.difficulty.as_deref()),
            tags: if self.tags.is_empty() { vec!["general".to_string()] } else { self.tags },
            related_topics: self.related_topics,
            source: Some("AI Generated".to_string()),
            learned: false,
            date_added: date.to_string(),
        }
    }
}

pub fn prompt(count: usize) -> String {
    format!(
        r#"Generate {count} important and current General Knowledge facts for SSC CGL preparation.
Focus on recent developments, current affairs, and important static GK.

Categories to cover:
- Current Affairs (recent events, awards, appointments)
- Indian History & Culture
- Geography (India & World)
- Science & Technology
- Economy & Finance
- Polity & Governance
- Environment & Ecology
- Sports & Entertainment

For each fact, provide:
- A clear, concise title
- Detailed description (2-3 sentences)
- Category
- Importance level (high/medium/low)
- Difficulty level (easy/medium/hard)
- 2-3 relevant tags
- Related topics (optional)

Return only a JSON array with this exact structure:
[
  {{
    "title": "Title of the fact",
    "description": "Detailed explanation of the fact",
    "category": "Category name",
    "importance": "high/medium/low",
    "difficulty": "easy/medium/hard",
    "tags": ["tag1", "tag2", "tag3"],
    "relatedTopics": ["topic1", "topic2"]
  }}
]"#
    )
}

pub async fn generate<C: LowLevelClient>(generator: &ContentGenerator<C>, date: &str) -> Vec<GKFact> {
    let drafts = match generator.generate_list::<FactDraft>(prompt(DAILY_COUNT)).await {
        Ok(drafts) => drafts,
        Err(e) => {
            warn!(error = %e, "GK fact generation failed; using fallback facts");
            return fallback(date);
        }
    };

    let mut facts: Vec<GKFact> = drafts.into_iter().map(|d| d.into_record(date)).collect();
    info!(count = facts.len(), "generated GK facts");
    pad_with_fallback(&mut facts, date);
    facts
}

/// Top up `facts` from the fallback set until it holds `MIN_FACTS`.
pub fn pad_with_fallback(facts: &mut Vec<GKFact>, date: &str) {
    if facts.len() >= MIN_FACTS {
        return;
    }
    let needed = MIN_FACTS - facts.len();
    warn!(have = facts.len(), needed, "padding GK facts from fallback set");
    facts.extend(fallback(date).into_iter().take(needed));
}

struct FallbackFact {
    title: &'static str,
    description: &'static str,
    category: &'static str,
    importance: Importance,
    difficulty: Difficulty,
    tags: &'static [&'static str],
    related_topics: &'static [&'static str],
    source: &'static str,
}

const FALLBACK: &[FallbackFact] = &[
    FallbackFact {
        title: "Supreme Court of India",
        description: "The Supreme Court of India is the highest judicial authority in the country, established on January 26, 1950. It has 34 judges including the Chief Justice of India.",
        category: "Polity & Governance",
        importance: Importance::High,
        difficulty: Difficulty::Medium,
        tags: &["judiciary", "constitution", "governance"],
        related_topics: &["Constitutional Law", "Indian Judiciary"],
        source: "Static GK",
    },
    FallbackFact {
        title: "Green Revolution in India",
        description: "The Green Revolution was a period of agricultural transformation in India during the 1960s-70s, led by scientist M.S. Swaminathan, which significantly increased food grain production.",
        category: "Economy & Agriculture",
        importance: Importance::High,
        difficulty: Difficulty::Medium,
        tags: &["agriculture", "economy", "history"],
        related_topics: &["Agricultural Development", "Food Security"],
        source: "Static GK",
    },
    FallbackFact {
        title: "Chandrayaan-3 Mission Success",
        description: "India successfully landed Chandrayaan-3 on the lunar south pole in August 2023, making India the fourth country to achieve a soft landing on the Moon and the first to land near the south pole.",
        category: "Science & Technology",
        importance: Importance::High,
        difficulty: Difficulty::Easy,
        tags: &["space", "isro", "achievement"],
        related_topics: &["Space Technology", "Indian Achievements"],
        source: "Current Affairs",
    },
    FallbackFact {
        title: "Digital India Initiative",
        description: "Digital India is a flagship programme launched in 2015 to transform India into a digitally empowered society and knowledge economy. It focuses on digital infrastructure, governance, and services.",
        category: "Economy & Technology",
        importance: Importance::High,
        difficulty: Difficulty::Easy,
        tags: &["technology", "governance", "development"],
        related_topics: &["Government Schemes", "Technology Development"],
        source: "Static GK",
    },
    FallbackFact {
        title: "Unified Payments Interface (UPI)",
        description: "UPI is a real-time payment system developed by NPCI that facilitates inter-bank peer-to-peer and person-to-merchant transactions. India leads the world in digital payments through UPI.",
        category: "Economy & Technology",
        importance: Importance::High,
        difficulty: Difficulty::Easy,
        tags: &["fintech", "digital payments", "innovation"],
        related_topics: &["Digital Economy", "Financial Technology"],
        source: "Current Affairs",
    },
    FallbackFact {
        title: "Bharat Stage VI (BS-VI) Emission Norms",
        description: "BS-VI emission norms came into effect from April 1, 2020, across India. These norms are equivalent to Euro VI standards and aim to reduce vehicular pollution significantly.",
        category: "Environment & Policy",
        importance: Importance::Medium,
        difficulty: Difficulty::Medium,
        tags: &["environment", "pollution", "standards"],
        related_topics: &["Environmental Protection", "Automotive Industry"],
        source: "Static GK",
    },
    FallbackFact {
        title: "Largest River Island - Majuli",
        description: "Majuli in Assam is the world's largest river island, formed by the Brahmaputra River. It is known for its unique culture, Satras (monasteries), and is a UNESCO World Heritage Site nominee.",
        category: "Geography",
        importance: Importance::Medium,
        difficulty: Difficulty::Medium,
        tags: &["geography", "assam", "culture"],
        related_topics: &["Indian Geography", "Cultural Heritage"],
        source: "Static GK",
    },
    FallbackFact {
        title: "National Education Policy 2020",
        description: "NEP 2020 is a comprehensive framework for education reform in India, emphasizing multidisciplinary learning, flexibility in subject choices, and integration of technology in education.",
        category: "Education & Policy",
        importance: Importance::High,
        difficulty: Difficulty::Easy,
        tags: &["education", "policy", "reform"],
        related_topics: &["Education System", "Government Policies"],
        source: "Current Affairs",
    },
];

pub fn fallback(date: &str) -> Vec<GKFact> {
    FALLBACK
        .iter()
        .map(|f| GKFact {
            id: generate_id(),
            title: f.title.to_string(),
            description: f.description.to_string(),
            category: f.category.to_string(),
            importance: f.importance,
            difficulty: f.difficulty,
            tags: f.tags.iter().map(|t| t.to_string()).collect(),
            related_topics: f.related_topics.iter().map(|t| t.to_string()).collect(),
            source: Some(f.source.to_string()),
            learned: false,
            date_added: date.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::mock::{MockClient, MockResponse};

    #[tokio::test]
    async fn short_batches_are_padded_to_minimum() {
        let raw = r#"[{"title": "Kaziranga", "importance": "HIGH", "difficulty": "unknown", "tags": "wildlife"},
                      {"description": "No title here"}]"#;
        let (client, _) = MockClient::with_responses(vec![MockResponse::Success(raw.to_string())]);
        let facts = generate(&ContentGenerator::new(client), "2024-08-15").await;

        assert_eq!(facts.len(), MIN_FACTS);
        assert_eq!(facts[0].title, "Kaziranga");
        assert_eq!(facts[0].importance, Importance::High);
        assert_eq!(facts[0].difficulty, Difficulty::Medium);
        assert_eq!(facts[0].tags, vec!["wildlife"]);
        assert_eq!(facts[0].source.as_deref(), Some("AI Generated"));
        assert_eq!(facts[1].title, "General Knowledge Fact");
        assert_eq!(facts[1].tags, vec!["general"]);
        assert_eq!(facts[2].title, "Supreme Court of India");
    }

    #[tokio::test]
    async fn model_failure_serves_all_fallback_facts() {
        let (client, _) = MockClient::with_responses(vec![MockResponse::Error("offline".to_string())]);
        let facts = generate(&ContentGenerator::new(client), "2024-08-15").await;
        assert_eq!(facts.len(), DAILY_COUNT);
        assert!(facts.iter().all(|f| f.date_added == "2024-08-15"));
    }
}
