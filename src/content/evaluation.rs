//! Free-text answer scoring. Each evaluator asks the model for a JSON object
//! and degrades to a fixed, encouraging evaluation when that fails.

use tracing::{info, warn};

use crate::core::{ContentGenerator, LowLevelClient};
use crate::error::GenerationError;
use crate::models::{default_practice_score, IdiomEvaluation, PracticeEvaluation, SentenceEvaluation};

pub fn practice_prompt(user_sentence: &str, target_word: &str) -> String {
    format!(
        r#"Evaluate this sentence for grammar, clarity, and correct usage of the word "{target_word}":

Sentence: "{user_sentence}"

Provide feedback on:
1. Grammar correctness
2. Clarity and flow
3. Appropriate usage of the target word
4. Suggestions for improvement
5. Overall score (1-10)

Return as valid JSON with: grammar, clarity, usage, suggestions, score."#
    )
}

pub fn practice_fallback() -> PracticeEvaluation {
    PracticeEvaluation {
        grammar: "Unable to evaluate".to_string(),
        clarity: "Unable to evaluate".to_string(),
        usage: "Unable to evaluate".to_string(),
        suggestions: vec!["Please try again".to_string()],
        score: 5,
    }
}

/// Score a practice sentence out of 10.
pub async fn evaluate_practice<C: LowLevelClient>(
    generator: &ContentGenerator<C>,
    user_sentence: &str,
    target_word: &str,
) -> PracticeEvaluation {
    match generator
        .generate_object::<PracticeEvaluation>(practice_prompt(user_sentence, target_word))
        .await
    {
        Ok(mut evaluation) => {
            // A zero score means the model gave none, not the lowest grade.
            evaluation.score = match evaluation.score {
                0 => default_practice_score(),
                score => score.min(10),
            };
            info!(score = evaluation.score, target_word, "practice sentence evaluated");
            evaluation
        }
        Err(e) => {
            warn!(error = %e, "practice evaluation failed; using fallback evaluation");
            practice_fallback()
        }
    }
}

pub fn sentence_prompt(word: &str, sentence: &str, word_meaning: Option<&str>) -> String {
    let meaning = word_meaning.unwrap_or("not provided");
    format!(
        r#"Evaluate this sentence for the word "{word}" (meaning: {meaning}):

Sentence: "{sentence}"

Please evaluate based on:
1. Correct usage of the word in context
2. Grammar and sentence structure
3. Creativity and clarity
4. Appropriateness for SSC CGL preparation

Return a JSON response with:
{{
  "score": number (1-5),
  "feedback": "detailed feedback on the sentence",
  "suggestions": ["suggestion1", "suggestion2"] (if score < 4)
}}

Be encouraging but honest. For scores 4-5, focus on what they did well. For scores 1-3, provide constructive suggestions."#
    )
}

/// Served when the model answered but not with a usable evaluation.
pub fn sentence_unparsed_fallback() -> SentenceEvaluation {
    SentenceEvaluation {
        score: 3,
        feedback: "Good effort! Keep practicing to improve your sentence construction.".to_string(),
        suggestions: vec![
            "Try to make the sentence more specific".to_string(),
            "Consider using more descriptive words".to_string(),
        ],
    }
}

/// Served when the model could not be reached.
pub fn sentence_unavailable_fallback() -> SentenceEvaluation {
    SentenceEvaluation {
        score: 3,
        feedback: "Unable to evaluate at the moment, but great job on creating your own example!".to_string(),
        suggestions: Vec::new(),
    }
}

/// Score a learner's example sentence out of 5.
pub async fn evaluate_sentence<C: LowLevelClient>(
    generator: &ContentGenerator<C>,
    word: &str,
    sentence: &str,
    word_meaning: Option<&str>,
) -> SentenceEvaluation {
    match generator
        .generate_object::<SentenceEvaluation>(sentence_prompt(word, sentence, word_meaning))
        .await
    {
        Ok(mut evaluation) => {
            evaluation.score = evaluation.score.clamp(1, 5);
            info!(score = evaluation.score, word, "example sentence evaluated");
            evaluation
        }
        Err(GenerationError::Ai(e)) => {
            warn!(error = %e, "sentence evaluation unavailable");
            sentence_unavailable_fallback()
        }
        Err(e) => {
            warn!(error = %e, "sentence evaluation unparseable");
            sentence_unparsed_fallback()
        }
    }
}

pub fn idiom_prompt(idiom: &str, meaning: &str, user_sentence: &str) -> String {
    format!(
        r#"A student preparing for SSC CGL wrote a sentence using the idiom "{idiom}" (meaning: {meaning}).

Sentence: "{user_sentence}"

Judge whether the idiom is used correctly and naturally, and whether the sentence is grammatical.

Return only a JSON object:
{{
  "isCorrect": true or false,
  "feedback": "two or three sentences of specific, encouraging feedback",
  "score": number (0-100)
}}"#
    )
}

pub fn idiom_fallback() -> IdiomEvaluation {
    IdiomEvaluation {
        is_correct: false,
        feedback: "Unable to evaluate right now. Your sentence has been saved for practice.".to_string(),
        score: 50,
    }
}

/// Score a sentence written with an idiom out of 100.
pub async fn evaluate_idiom_usage<C: LowLevelClient>(
    generator: &ContentGenerator<C>,
    idiom: &str,
    meaning: &str,
    user_sentence: &str,
) -> IdiomEvaluation {
    match generator
        .generate_object::<IdiomEvaluation>(idiom_prompt(idiom, meaning, user_sentence))
        .await
    {
        Ok(mut evaluation) => {
            evaluation.score = evaluation.score.min(100);
            info!(score = evaluation.score, idiom, "idiom usage evaluated");
            evaluation
        }
        Err(e) => {
            warn!(error = %e, "idiom evaluation failed; using fallback evaluation");
            idiom_fallback()
        }
    }
}
