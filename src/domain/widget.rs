//! Widget embedding: allowed-domain records and the origin gate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::store::Document;

/// An allow-listed domain for a workflow's embedded widget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetDomain {
    id: String,
    pub workflow_id: String,
    pub domain: String,
    created_at: DateTime<Utc>,
}

impl WidgetDomain {
    pub fn new(workflow_id: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            workflow_id: workflow_id.into(),
            domain: normalize_domain(&domain.into()),
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Document for WidgetDomain {
    type Key = String;

    fn key(&self) -> &Self::Key {
        &self.id
    }
}

/// Strips scheme/path noise users paste into the domain field
pub fn normalize_domain(input: &str) -> String {
    let trimmed = input.trim().trim_end_matches('/');

    if let Ok(url) = Url::parse(trimmed) {
        if let Some(host) = url.host_str() {
            return host.to_lowercase();
        }
    }

    trimmed
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .split('/')
        .next()
        .unwrap_or("")
        .to_lowercase()
}

/// Decides whether a widget request `Origin` may use a workflow.
///
/// Allowed when: no domains are configured (open), the origin host exactly
/// matches an allowed domain, or the host is a subdomain of one. A missing
/// `Origin` header is allowed (development compromise, not hardened), as is
/// the product's own primary domain.
pub fn origin_allowed(
    allowed_domains: &[String],
    origin: Option<&str>,
    primary_domain: &str,
) -> bool {
    if allowed_domains.is_empty() {
        return true;
    }

    let Some(origin) = origin else {
        return true;
    };

    let Some(host) = origin_host(origin) else {
        return false;
    };

    if host == primary_domain || host.ends_with(&format!(".{}", primary_domain)) {
        return true;
    }

    allowed_domains.iter().any(|domain| {
        let domain = domain.to_lowercase();
        host == domain || host.ends_with(&format!(".{}", domain))
    })
}

fn origin_host(origin: &str) -> Option<String> {
    Url::parse(origin)
        .ok()
        .and_then(|u| u.host_str().map(str::to_lowercase))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRIMARY: &str = "botflow.app";

    fn domains(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_configured_domains_allows_anything() {
        assert!(origin_allowed(&[], Some("https://evil.example"), PRIMARY));
        assert!(origin_allowed(&[], None, PRIMARY));
    }

    #[test]
    fn test_exact_match() {
        let allowed = domains(&["shop.example.com"]);
        assert!(origin_allowed(&allowed, Some("https://shop.example.com"), PRIMARY));
        assert!(!origin_allowed(&allowed, Some("https://other.example.com"), PRIMARY));
    }

    #[test]
    fn test_subdomain_match() {
        let allowed = domains(&["example.com"]);
        assert!(origin_allowed(&allowed, Some("https://www.example.com"), PRIMARY));
        assert!(origin_allowed(&allowed, Some("https://a.b.example.com"), PRIMARY));
        // Suffix of the registrable name is not a subdomain.
        assert!(!origin_allowed(&allowed, Some("https://notexample.com"), PRIMARY));
    }

    #[test]
    fn test_primary_domain_bypass() {
        let allowed = domains(&["example.com"]);
        assert!(origin_allowed(&allowed, Some("https://botflow.app"), PRIMARY));
        assert!(origin_allowed(&allowed, Some("https://app.botflow.app"), PRIMARY));
    }

    #[test]
    fn test_missing_origin_allowed_when_configured() {
        let allowed = domains(&["example.com"]);
        assert!(origin_allowed(&allowed, None, PRIMARY));
    }

    #[test]
    fn test_unparseable_origin_denied() {
        let allowed = domains(&["example.com"]);
        assert!(!origin_allowed(&allowed, Some("not a url"), PRIMARY));
    }

    #[test]
    fn test_normalize_domain() {
        assert_eq!(normalize_domain("https://Shop.Example.com/"), "shop.example.com");
        assert_eq!(normalize_domain("example.com/path"), "example.com");
        assert_eq!(normalize_domain("  example.com  "), "example.com");
    }
}
