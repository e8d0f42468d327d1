//! FAQ entity and keyword matching
//!
//! FAQs are flat records attached to a workflow with no relation to the
//! graph. The enhanced chat variant pre-selects FAQs by naive keyword
//! overlap against the user message; the basic variant hands all of them to
//! the model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::store::Document;

/// A question/answer pair attached to a workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Faq {
    id: String,
    pub question: String,
    pub answer: String,
    pub workflow_id: String,
    pub user_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Faq {
    pub fn new(
        workflow_id: impl Into<String>,
        user_id: impl Into<String>,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            question: question.into(),
            answer: answer.into(),
            workflow_id: workflow_id.into(),
            user_id: user_id.into(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn update(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.question = question.into();
        self.answer = answer.into();
        self.updated_at = Utc::now();
    }
}

impl Document for Faq {
    type Key = String;

    fn key(&self) -> &Self::Key {
        &self.id
    }
}

/// Words too common to carry signal in overlap scoring
const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "is", "are", "was", "were", "do", "does", "did", "can",
    "i", "my", "me", "you", "your", "it", "to", "of", "in", "on", "for",
    "and", "or", "what", "how", "when", "where", "why", "who",
];

fn keywords(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 1 && !STOP_WORDS.contains(w))
        .map(str::to_string)
        .collect()
}

/// Scores a FAQ question against a user message by keyword overlap.
/// Whole-phrase containment counts extra.
pub fn match_score(question: &str, message: &str) -> usize {
    let message_lower = message.to_lowercase();
    let question_lower = question.to_lowercase();
    let message_words = keywords(message);

    let mut score = keywords(question)
        .iter()
        .filter(|w| message_words.contains(w))
        .count();

    if !question_lower.is_empty()
        && (message_lower.contains(&question_lower) || question_lower.contains(&message_lower))
    {
        score += 3;
    }

    score
}

/// Selects the FAQs most relevant to a message, best first. Ties keep the
/// stored order. Returns an empty vec when nothing overlaps.
pub fn select_matching_faqs<'a>(faqs: &'a [Faq], message: &str, limit: usize) -> Vec<&'a Faq> {
    let mut scored: Vec<(usize, &Faq)> = faqs
        .iter()
        .map(|f| (match_score(&f.question, message), f))
        .filter(|(score, _)| *score > 0)
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().take(limit).map(|(_, f)| f).collect()
}
