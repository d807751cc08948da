use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{generate_id, PracticeEvaluation, PracticeKind, PracticeSession};
use crate::storage::{names, DailyContent};

impl DailyContent for PracticeSession {
    const COLLECTION: &'static str = names::PRACTICE_SESSIONS;
    const NOUN: &'static str = "Practice session";

    fn id(&self) -> &str {
        &self.id
    }

    /// The calendar-date prefix of the session timestamp.
    fn date_added(&self) -> &str {
        self.date.get(..10).unwrap_or(&self.date)
    }
}

impl std::str::FromStr for PracticeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vocabulary" => Ok(PracticeKind::Vocabulary),
            "idiom" | "idioms" => Ok(PracticeKind::Idiom),
            other => Err(format!("Unknown practice type '{other}'. Expected vocabulary or idiom")),
        }
    }
}

pub fn new_session(
    kind: PracticeKind,
    target_word: &str,
    user_sentence: &str,
    evaluation: PracticeEvaluation,
    at: DateTime<Utc>,
) -> PracticeSession {
    PracticeSession {
        id: generate_id(),
        kind,
        target_word: target_word.to_string(),
        user_sentence: user_sentence.to_string(),
        score: evaluation.score,
        evaluation,
        date: at.to_rfc3339(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeSummary {
    pub today_sessions: Vec<PracticeSession>,
    pub total_sessions: usize,
    pub average_score: f64,
}

/// Today's sessions plus the mean score across every session ever recorded.
pub fn summarize(sessions: Vec<PracticeSession>, today: &str) -> PracticeSummary {
    let total_sessions = sessions.len();
    let average_score = if total_sessions == 0 {
        0.0
    } else {
        sessions.iter().map(|s| f64::from(s.score)).sum::<f64>() / total_sessions as f64
    };
    let today_sessions = sessions.into_iter().filter(|s| s.date.starts_with(today)).collect();
    PracticeSummary { today_sessions, total_sessions, average_score }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn session(score: u8, at: DateTime<Utc>) -> PracticeSession {
        let evaluation = PracticeEvaluation {
            grammar: "ok".into(),
            clarity: "ok".into(),
            usage: "ok".into(),
            suggestions: vec![],
            score,
        };
        new_session(PracticeKind::Vocabulary, "Ephemeral", "Fame is ephemeral.", evaluation, at)
    }

    #[test]
    fn summary_averages_all_sessions_and_filters_today() {
        let yesterday = Utc.with_ymd_and_hms(2024, 4, 9, 22, 0, 0).unwrap();
        let today = Utc.with_ymd_and_hms(2024, 4, 10, 8, 30, 0).unwrap();
        let summary = summarize(vec![session(6, yesterday), session(9, today)], "2024-04-10");
        assert_eq!(summary.total_sessions, 2);
        assert_eq!(summary.average_score, 7.5);
        assert_eq!(summary.today_sessions.len(), 1);
        assert_eq!(summary.today_sessions[0].date_added(), "2024-04-10");
    }

    #[test]
    fn empty_history_averages_zero() {
        let summary = summarize(Vec::new(), "2024-04-10");
        assert_eq!(summary.average_score, 0.0);
        assert!(summary.today_sessions.is_empty());
    }

    #[test]
    fn practice_kind_parses_loosely() {
        assert_eq!("Idioms".parse::<PracticeKind>(), Ok(PracticeKind::Idiom));
        assert!("grammar".parse::<PracticeKind>().is_err());
    }
}
