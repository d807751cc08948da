use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{list_or_map, or_default};
use crate::core::{ContentGenerator, LowLevelClient};
use crate::models::{generate_id, GKQuestion};
use crate::storage::{names, DailyContent};

pub const DAILY_COUNT: usize = 5;

impl DailyContent for GKQuestion {
    const COLLECTION: &'static str = names::GK_QUESTIONS;
    const NOUN: &'static str = "Question";

    fn id(&self) -> &str {
        &self.id
    }

    fn date_added(&self) -> &str {
        &self.date_added
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct QuestionDraft {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default, deserialize_with = "list_or_map")]
    #[schemars(with = "Vec<String>")]
    pub options: Vec<String>,
    #[serde(default)]
    pub correct: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
}

impl QuestionDraft {
    pub fn into_record(self, date: &str) -> GKQuestion {
        GKQuestion {
            id: generate_id(),
            question: self.question.unwrap_or_default(),
            options: self.options,
            correct: or_default(self.correct, "A"),
            explanation: self.explanation.unwrap_or_default(),
            topic: or_default(self.topic, "General Knowledge"),
            user_answer: None,
            answered_correctly: None,
            date_added: date.to_string(),
        }
    }
}

/// Result of checking a submitted answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOutcome {
    pub correct: bool,
    pub correct_answer: String,
    pub explanation: String,
}

impl AnswerOutcome {
    pub fn message(&self) -> &'static str {
        if self.correct {
            "Correct answer!"
        } else {
            "Incorrect answer"
        }
    }
}

/// Record `answer` on the question and report whether it matches the key.
/// Letters compare case-insensitively and ignore surrounding whitespace.
pub fn record_answer(question: &mut GKQuestion, answer: &str) -> AnswerOutcome {
    let correct = question.correct.trim().eq_ignore_ascii_case(answer.trim());
    question.user_answer = Some(answer.to_string());
    question.answered_correctly = Some(correct);
    AnswerOutcome {
        correct,
        correct_answer: question.correct.clone(),
        explanation: question.explanation.clone(),
    }
}

pub fn prompt(count: usize) -> String {
    format!(
        "Generate {count} multiple choice questions for SSC CGL General Knowledge preparation.
Cover topics like: History, Geography, Politics, Science, Current Affairs, Sports, Literature.

For each question, provide:
1. Question text
2. Four options (A, B, C, D)
3. Correct answer (letter)
4. Explanation
5. Topic/Category

Return as valid JSON array with objects containing: question, options, correct, explanation, topic."
    )
}

pub async fn generate<C: LowLevelClient>(generator: &ContentGenerator<C>, date: &str) -> Vec<GKQuestion> {
    match generator.generate_list::<QuestionDraft>(prompt(DAILY_COUNT)).await {
        Ok(drafts) if !drafts.is_empty() => {
            info!(count = drafts.len(), "generated quiz questions");
            drafts.into_iter().map(|d| d.into_record(date)).collect()
        }
        Ok(_) => {
            warn!("model returned no questions; using fallback quiz");
            fallback(date)
        }
        Err(e) => {
            warn!(error = %e, "quiz generation failed; using fallback quiz");
            fallback(date)
        }
    }
}

struct FallbackQuestion {
    question: &'static str,
    options: [&'static str; 4],
    correct: &'static str,
    explanation: &'static str,
    topic: &'static str,
}

const FALLBACK: &[FallbackQuestion] = &[
    FallbackQuestion {
        question: "Who was the first President of India?",
        options: ["Dr. Rajendra Prasad", "Dr. A.P.J. Abdul Kalam", "Dr. Sarvepalli Radhakrishnan", "Zakir Hussain"],
        correct: "A",
        explanation: "Dr. Rajendra Prasad was the first President of India, serving from 1950 to 1962.",
        topic: "History",
    },
    FallbackQuestion {
        question: "Which river is known as the 'Sorrow of Bihar'?",
        options: ["Ganga", "Kosi", "Son", "Gandak"],
        correct: "B",
        explanation: "The Kosi frequently changes course and floods north Bihar, earning it the name 'Sorrow of Bihar'.",
        topic: "Geography",
    },
    FallbackQuestion {
        question: "Which Article of the Indian Constitution abolishes untouchability?",
        options: ["Article 14", "Article 15", "Article 17", "Article 21"],
        correct: "C",
        explanation: "Article 17 abolishes untouchability and forbids its practice in any form.",
        topic: "Polity",
    },
    FallbackQuestion {
        question: "What is the chemical symbol for sodium?",
        options: ["So", "Sd", "S", "Na"],
        correct: "D",
        explanation: "Sodium's symbol Na comes from its Latin name, natrium.",
        topic: "Science",
    },
    FallbackQuestion {
        question: "Who wrote the national song 'Vande Mataram'?",
        options: ["Bankim Chandra Chattopadhyay", "Rabindranath Tagore", "Sarojini Naidu", "Muhammad Iqbal"],
        correct: "A",
        explanation: "Bankim Chandra Chattopadhyay wrote 'Vande Mataram', which appeared in his novel Anandamath (1882).",
        topic: "Literature",
    },
];

pub fn fallback(date: &str) -> Vec<GKQuestion> {
    FALLBACK
        .iter()
        .map(|q| GKQuestion {
            id: generate_id(),
            question: q.question.to_string(),
            options: q.options.iter().map(|o| o.to_string()).collect(),
            correct: q.correct.to_string(),
            explanation: q.explanation.to_string(),
            topic: q.topic.to_string(),
            user_answer: None,
            answered_correctly: None,
            date_added: date.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers_compare_case_insensitively() {
        let mut question = fallback("2024-02-02").remove(0);
        let outcome = record_answer(&mut question, " a ");
        assert!(outcome.correct);
        assert_eq!(outcome.message(), "Correct answer!");
        assert_eq!(question.answered_correctly, Some(true));

        let outcome = record_answer(&mut question, "C");
        assert!(!outcome.correct);
        assert_eq!(outcome.correct_answer, "A");
        assert_eq!(question.user_answer.as_deref(), Some("C"));
        assert_eq!(question.answered_correctly, Some(false));
    }

    #[test]
    fn labelled_options_are_accepted() {
        let draft: QuestionDraft = serde_json::from_str(
            r#"{"question": "Q?", "options": {"A": "one", "B": "two", "C": "three", "D": "four"}}"#,
        )
        .unwrap();
        let q = draft.into_record("2024-02-02");
        assert_eq!(q.options, vec!["one", "two", "three", "four"]);
        assert_eq!(q.correct, "A");
        assert_eq!(q.topic, "General Knowledge");
    }
}
