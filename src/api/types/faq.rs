//! FAQ endpoint request/response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::faq::Faq;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateFaqBody {
    pub workflow_id: String,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateFaqBody {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FaqBody {
    pub id: String,
    pub workflow_id: String,
    pub question: String,
    pub answer: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Faq> for FaqBody {
    fn from(faq: &Faq) -> Self {
        Self {
            id: faq.id().to_string(),
            workflow_id: faq.workflow_id.clone(),
            question: faq.question.clone(),
            answer: faq.answer.clone(),
            created_at: faq.created_at(),
            updated_at: faq.updated_at(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FaqResponse {
    pub success: bool,
    pub faq: FaqBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListFaqsResponse {
    pub success: bool,
    pub faqs: Vec<FaqBody>,
}

/// `?workflow_id=` query for the FAQ list
#[derive(Debug, Clone, Deserialize)]
pub struct FaqListQuery {
    pub workflow_id: String,
}
