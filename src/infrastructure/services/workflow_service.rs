//! Workflow service - save/load/list/delete for the editor

use std::sync::Arc;

use tracing::info;

use crate::domain::faq::Faq;
use crate::domain::graph::{Edge, Node};
use crate::domain::store::{Document, DocumentStore};
use crate::domain::widget::WidgetDomain;
use crate::domain::{DomainError, Workflow, WorkflowId};
use crate::infrastructure::cache::WorkflowCache;

/// Editor save payload: the whole graph every time
#[derive(Debug, Clone)]
pub struct SaveWorkflowRequest {
    pub id: Option<String>,
    pub name: String,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub context: Option<String>,
}

pub struct WorkflowService {
    workflows: Arc<dyn DocumentStore<Workflow>>,
    faqs: Arc<dyn DocumentStore<Faq>>,
    widget_domains: Arc<dyn DocumentStore<WidgetDomain>>,
    cache: WorkflowCache,
}

impl std::fmt::Debug for WorkflowService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowService").finish()
    }
}

impl WorkflowService {
    pub fn new(
        workflows: Arc<dyn DocumentStore<Workflow>>,
        faqs: Arc<dyn DocumentStore<Faq>>,
        widget_domains: Arc<dyn DocumentStore<WidgetDomain>>,
        cache: WorkflowCache,
    ) -> Self {
        Self {
            workflows,
            faqs,
            widget_domains,
            cache,
        }
    }

    /// Creates or wholesale-replaces a workflow. Last write wins.
    pub async fn save(
        &self,
        user_id: &str,
        request: SaveWorkflowRequest,
    ) -> Result<Workflow, DomainError> {
        if request.name.trim().is_empty() {
            return Err(DomainError::validation("Workflow name cannot be empty"));
        }

        let workflow = match request.id.clone() {
            Some(id) => {
                let workflow_id = WorkflowId::new(id)?;
                match self.owned(user_id, &workflow_id).await? {
                    Some(mut existing) => {
                        existing.replace_contents(
                            request.name,
                            request.nodes,
                            request.edges,
                            request.context,
                        );
                        existing
                    }
                    None => build_workflow(workflow_id, user_id, request),
                }
            }
            None => build_workflow(WorkflowId::generate(), user_id, request),
        };

        let saved = self.workflows.save(workflow).await?;
        self.cache.invalidate(saved.id()).await;

        info!(workflow_id = %saved.id(), "Workflow saved");
        Ok(saved)
    }

    /// Loads a workflow owned by the user
    pub async fn get(&self, user_id: &str, id: &str) -> Result<Workflow, DomainError> {
        let workflow_id = WorkflowId::new(id)?;

        self.owned(user_id, &workflow_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Workflow '{}' not found", id)))
    }

    /// Loads a workflow for widget/chat traffic, via the TTL cache. No
    /// ownership check; widget access is gated by origin instead.
    pub async fn load_cached(&self, id: &str) -> Result<Arc<Workflow>, DomainError> {
        let workflow_id = WorkflowId::new(id)?;

        if let Some(cached) = self.cache.get(&workflow_id).await {
            return Ok(cached);
        }

        let workflow = self
            .workflows
            .get(&workflow_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Workflow '{}' not found", id)))?;

        Ok(self.cache.put(workflow).await)
    }

    /// All workflows owned by the user, most recently updated first
    pub async fn list(&self, user_id: &str) -> Result<Vec<Workflow>, DomainError> {
        let mut workflows: Vec<Workflow> = self
            .workflows
            .list()
            .await?
            .into_iter()
            .filter(|w| w.user_id() == user_id)
            .collect();

        workflows.sort_by(|a, b| b.updated_at().cmp(&a.updated_at()));
        Ok(workflows)
    }

    /// Deletes a workflow along with its FAQs and widget domains
    pub async fn delete(&self, user_id: &str, id: &str) -> Result<(), DomainError> {
        let workflow_id = WorkflowId::new(id)?;

        if self.owned(user_id, &workflow_id).await?.is_none() {
            return Err(DomainError::not_found(format!(
                "Workflow '{}' not found",
                id
            )));
        }

        for faq in self.faqs.list().await? {
            if faq.workflow_id == workflow_id.as_str() {
                self.faqs.delete(faq.key()).await?;
            }
        }

        for domain in self.widget_domains.list().await? {
            if domain.workflow_id == workflow_id.as_str() {
                self.widget_domains.delete(domain.key()).await?;
            }
        }

        self.workflows.delete(&workflow_id).await?;
        self.cache.invalidate(&workflow_id).await;

        info!(workflow_id = %workflow_id, "Workflow deleted");
        Ok(())
    }

    async fn owned(
        &self,
        user_id: &str,
        id: &WorkflowId,
    ) -> Result<Option<Workflow>, DomainError> {
        Ok(self
            .workflows
            .get(id)
            .await?
            .filter(|w| w.user_id() == user_id))
    }
}

fn build_workflow(id: WorkflowId, user_id: &str, request: SaveWorkflowRequest) -> Workflow {
    let mut workflow =
        Workflow::new(id, request.name, user_id).with_graph(request.nodes, request.edges);

    if let Some(context) = request.context {
        workflow = workflow.with_context(context);
    }

    workflow
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::graph::EdgeHandle;
    use crate::infrastructure::store::InMemoryStore;

    fn service() -> WorkflowService {
        WorkflowService::new(
            Arc::new(InMemoryStore::new()),
            Arc::new(InMemoryStore::new()),
            Arc::new(InMemoryStore::new()),
            WorkflowCache::default(),
        )
    }

    fn save_request(id: Option<&str>) -> SaveWorkflowRequest {
        SaveWorkflowRequest {
            id: id.map(str::to_string),
            name: "Support".to_string(),
            nodes: vec![Node::start("s1", "Start"), Node::decision("d1", "Late?")],
            edges: vec![Edge::new("s1", "d1").with_handle(EdgeHandle::Yes)],
            context: Some("We sell widgets".to_string()),
        }
    }

    #[tokio::test]
    async fn test_save_without_id_generates_one() {
        let service = service();

        let saved = service.save("user-1", save_request(None)).await.unwrap();

        assert_eq!(saved.name(), "Support");
        assert_eq!(saved.user_id(), "user-1");
        assert_eq!(saved.nodes().len(), 2);
    }

    #[tokio::test]
    async fn test_save_replaces_existing() {
        let service = service();

        let first = service
            .save("user-1", save_request(Some("wf-1")))
            .await
            .unwrap();

        let mut update = save_request(Some("wf-1"));
        update.name = "Renamed".to_string();
        update.nodes = vec![];
        update.edges = vec![];
        let second = service.save("user-1", update).await.unwrap();

        assert_eq!(second.id(), first.id());
        assert_eq!(second.name(), "Renamed");
        assert!(second.nodes().is_empty());
        assert_eq!(service.list("user-1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_save_rejects_empty_name() {
        let service = service();

        let mut request = save_request(None);
        request.name = "  ".to_string();

        assert!(matches!(
            service.save("user-1", request).await,
            Err(DomainError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_get_enforces_ownership() {
        let service = service();
        service
            .save("user-1", save_request(Some("wf-1")))
            .await
            .unwrap();

        assert!(service.get("user-1", "wf-1").await.is_ok());
        assert!(matches!(
            service.get("user-2", "wf-1").await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_is_per_user() {
        let service = service();
        service.save("user-1", save_request(None)).await.unwrap();
        service.save("user-2", save_request(None)).await.unwrap();

        assert_eq!(service.list("user-1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_cascades() {
        let service = service();
        service
            .save("user-1", save_request(Some("wf-1")))
            .await
            .unwrap();

        service
            .faqs
            .save(Faq::new("wf-1", "user-1", "q", "a"))
            .await
            .unwrap();
        service
            .faqs
            .save(Faq::new("wf-other", "user-1", "q", "a"))
            .await
            .unwrap();
        service
            .widget_domains
            .save(WidgetDomain::new("wf-1", "example.com"))
            .await
            .unwrap();

        service.delete("user-1", "wf-1").await.unwrap();

        assert!(matches!(
            service.get("user-1", "wf-1").await,
            Err(DomainError::NotFound { .. })
        ));
        let remaining = service.faqs.list().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].workflow_id, "wf-other");
        assert!(service.widget_domains.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_cached_serves_saved_workflow() {
        let service = service();
        service
            .save("user-1", save_request(Some("wf-1")))
            .await
            .unwrap();

        let cached = service.load_cached("wf-1").await.unwrap();
        assert_eq!(cached.name(), "Support");

        // A save must evict the cached copy.
        let mut update = save_request(Some("wf-1"));
        update.name = "Fresh".to_string();
        service.save("user-1", update).await.unwrap();

        let reloaded = service.load_cached("wf-1").await.unwrap();
        assert_eq!(reloaded.name(), "Fresh");
    }
}
