//! Widget-domain endpoint request/response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::widget::WidgetDomain;

#[derive(Debug, Clone, Deserialize)]
pub struct AddDomainBody {
    pub workflow_id: String,
    pub domain: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DomainBody {
    pub id: String,
    pub workflow_id: String,
    pub domain: String,
    pub created_at: DateTime<Utc>,
}

impl From<&WidgetDomain> for DomainBody {
    fn from(domain: &WidgetDomain) -> Self {
        Self {
            id: domain.id().to_string(),
            workflow_id: domain.workflow_id.clone(),
            domain: domain.domain.clone(),
            created_at: domain.created_at(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DomainResponse {
    pub success: bool,
    pub domain: DomainBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListDomainsResponse {
    pub success: bool,
    pub domains: Vec<DomainBody>,
}

/// `?workflow_id=` query for the domain list
#[derive(Debug, Clone, Deserialize)]
pub struct DomainListQuery {
    pub workflow_id: String,
}
