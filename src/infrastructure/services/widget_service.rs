//! Widget service - allowed-domain management and the embeddable script

use std::sync::Arc;

use crate::domain::store::DocumentStore;
use crate::domain::widget::{normalize_domain, origin_allowed, WidgetDomain};
use crate::domain::{DomainError, Workflow, WorkflowId};

pub struct WidgetService {
    widget_domains: Arc<dyn DocumentStore<WidgetDomain>>,
    workflows: Arc<dyn DocumentStore<Workflow>>,
    primary_domain: String,
}

impl std::fmt::Debug for WidgetService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetService")
            .field("primary_domain", &self.primary_domain)
            .finish()
    }
}

impl WidgetService {
    pub fn new(
        widget_domains: Arc<dyn DocumentStore<WidgetDomain>>,
        workflows: Arc<dyn DocumentStore<Workflow>>,
        primary_domain: impl Into<String>,
    ) -> Self {
        Self {
            widget_domains,
            workflows,
            primary_domain: primary_domain.into(),
        }
    }

    pub async fn add_domain(
        &self,
        user_id: &str,
        workflow_id: &str,
        domain: &str,
    ) -> Result<WidgetDomain, DomainError> {
        self.require_owned_workflow(user_id, workflow_id).await?;

        let normalized = normalize_domain(domain);
        if normalized.is_empty() {
            return Err(DomainError::validation(format!(
                "'{}' is not a valid domain",
                domain
            )));
        }

        let existing = self.domains_for(workflow_id).await?;
        if existing.iter().any(|d| d.domain == normalized) {
            return Err(DomainError::conflict(format!(
                "Domain '{}' is already allowed for this workflow",
                normalized
            )));
        }

        self.widget_domains
            .save(WidgetDomain::new(workflow_id, normalized))
            .await
    }

    pub async fn list_domains(
        &self,
        user_id: &str,
        workflow_id: &str,
    ) -> Result<Vec<WidgetDomain>, DomainError> {
        self.require_owned_workflow(user_id, workflow_id).await?;
        self.domains_for(workflow_id).await
    }

    pub async fn remove_domain(&self, user_id: &str, domain_id: &str) -> Result<(), DomainError> {
        let domain = self
            .widget_domains
            .get(&domain_id.to_string())
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Domain '{}' not found", domain_id)))?;

        self.require_owned_workflow(user_id, &domain.workflow_id)
            .await?;

        self.widget_domains.delete(&domain_id.to_string()).await?;
        Ok(())
    }

    /// Gate for widget and chat traffic. An empty allow-list leaves the
    /// workflow open.
    pub async fn check_origin(
        &self,
        workflow_id: &str,
        origin: Option<&str>,
    ) -> Result<(), DomainError> {
        let allowed: Vec<String> = self
            .domains_for(workflow_id)
            .await?
            .into_iter()
            .map(|d| d.domain)
            .collect();

        if origin_allowed(&allowed, origin, &self.primary_domain) {
            Ok(())
        } else {
            Err(DomainError::unauthorized(format!(
                "Origin '{}' is not allowed to embed this workflow",
                origin.unwrap_or("")
            )))
        }
    }

    /// The embeddable loader script served to allowed origins
    pub fn widget_script(&self, workflow_id: &str, base_url: &str) -> String {
        format!(
            r#"(function () {{
  var WORKFLOW_ID = "{workflow_id}";
  var API_BASE = "{base_url}";

  var button = document.createElement("button");
  button.id = "botflow-widget-button";
  button.textContent = "Chat with us";
  button.style.cssText =
    "position:fixed;bottom:20px;right:20px;z-index:99999;" +
    "padding:12px 20px;border:none;border-radius:24px;" +
    "background:#2563eb;color:#fff;cursor:pointer;font-size:14px;";

  var frame = null;
  button.addEventListener("click", function () {{
    if (frame) {{
      frame.remove();
      frame = null;
      return;
    }}
    frame = document.createElement("iframe");
    frame.src = API_BASE + "/widget-frame?workflow_id=" + WORKFLOW_ID;
    frame.style.cssText =
      "position:fixed;bottom:70px;right:20px;z-index:99999;" +
      "width:360px;height:520px;border:none;border-radius:12px;" +
      "box-shadow:0 8px 30px rgba(0,0,0,0.2);";
    document.body.appendChild(frame);
  }});

  document.body.appendChild(button);
}})();
"#,
            workflow_id = workflow_id,
            base_url = base_url,
        )
    }

    async fn domains_for(&self, workflow_id: &str) -> Result<Vec<WidgetDomain>, DomainError> {
        let mut domains: Vec<WidgetDomain> = self
            .widget_domains
            .list()
            .await?
            .into_iter()
            .filter(|d| d.workflow_id == workflow_id)
            .collect();

        domains.sort_by_key(|d| d.created_at());
        Ok(domains)
    }

    async fn require_owned_workflow(
        &self,
        user_id: &str,
        workflow_id: &str,
    ) -> Result<Workflow, DomainError> {
        let id = WorkflowId::new(workflow_id)?;

        self.workflows
            .get(&id)
            .await?
            .filter(|w| w.user_id() == user_id)
            .ok_or_else(|| {
                DomainError::not_found(format!("Workflow '{}' not found", workflow_id))
            })
    }
}
