//! FAQ service - per-workflow question/answer management

use std::sync::Arc;

use crate::domain::faq::Faq;
use crate::domain::store::DocumentStore;
use crate::domain::{DomainError, Workflow, WorkflowId};

pub struct FaqService {
    faqs: Arc<dyn DocumentStore<Faq>>,
    workflows: Arc<dyn DocumentStore<Workflow>>,
}

impl std::fmt::Debug for FaqService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaqService").finish()
    }
}

impl FaqService {
    pub fn new(
        faqs: Arc<dyn DocumentStore<Faq>>,
        workflows: Arc<dyn DocumentStore<Workflow>>,
    ) -> Self {
        Self { faqs, workflows }
    }

    pub async fn create(
        &self,
        user_id: &str,
        workflow_id: &str,
        question: &str,
        answer: &str,
    ) -> Result<Faq, DomainError> {
        validate_faq_fields(question, answer)?;
        self.require_owned_workflow(user_id, workflow_id).await?;

        let faq = Faq::new(workflow_id, user_id, question.trim(), answer.trim());
        self.faqs.save(faq).await
    }

    /// FAQs of one workflow owned by the user, oldest first
    pub async fn list(&self, user_id: &str, workflow_id: &str) -> Result<Vec<Faq>, DomainError> {
        self.require_owned_workflow(user_id, workflow_id).await?;

        let mut faqs: Vec<Faq> = self
            .faqs
            .list()
            .await?
            .into_iter()
            .filter(|f| f.workflow_id == workflow_id && f.user_id == user_id)
            .collect();

        faqs.sort_by_key(|f| f.created_at());
        Ok(faqs)
    }

    /// All FAQs of a workflow regardless of owner, for the chat pipeline
    pub async fn list_for_chat(&self, workflow_id: &str) -> Result<Vec<Faq>, DomainError> {
        let mut faqs: Vec<Faq> = self
            .faqs
            .list()
            .await?
            .into_iter()
            .filter(|f| f.workflow_id == workflow_id)
            .collect();

        faqs.sort_by_key(|f| f.created_at());
        Ok(faqs)
    }

    pub async fn update(
        &self,
        user_id: &str,
        faq_id: &str,
        question: &str,
        answer: &str,
    ) -> Result<Faq, DomainError> {
        validate_faq_fields(question, answer)?;

        let mut faq = self.require_owned_faq(user_id, faq_id).await?;
        faq.update(question.trim(), answer.trim());
        self.faqs.save(faq).await
    }

    pub async fn delete(&self, user_id: &str, faq_id: &str) -> Result<(), DomainError> {
        let faq = self.require_owned_faq(user_id, faq_id).await?;
        self.faqs.delete(&faq.id().to_string()).await?;
        Ok(())
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

    async fn require_owned_faq(&self, user_id: &str, faq_id: &str) -> Result<Faq, DomainError> {
        self.faqs
            .get(&faq_id.to_string())
            .await?
            .filter(|f| f.user_id == user_id)
            .ok_or_else(|| DomainError::not_found(format!("FAQ '{}' not found", faq_id)))
    }
}

fn validate_faq_fields(question: &str, answer: &str) -> Result<(), DomainError> {
    if question.trim().is_empty() {
        return Err(DomainError::validation("FAQ question cannot be empty"));
    }
    if answer.trim().is_empty() {
        return Err(DomainError::validation("FAQ answer cannot be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::store::InMemoryStore;

    async fn service_with_workflow() -> FaqService {
        let workflows: Arc<dyn DocumentStore<Workflow>> = Arc::new(InMemoryStore::new());
        workflows
            .save(Workflow::new(
                WorkflowId::new("wf-1").unwrap(),
                "Support",
                "user-1",
            ))
            .await
            .unwrap();

        FaqService::new(Arc::new(InMemoryStore::new()), workflows)
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let service = service_with_workflow().await;

        service
            .create("user-1", "wf-1", "How do I return?", "Within 30 days")
            .await
            .unwrap();

        let faqs = service.list("user-1", "wf-1").await.unwrap();
        assert_eq!(faqs.len(), 1);
        assert_eq!(faqs[0].question, "How do I return?");
    }

    #[tokio::test]
    async fn test_create_requires_owned_workflow() {
        let service = service_with_workflow().await;

        let result = service.create("user-2", "wf-1", "q", "a").await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_create_rejects_blank_fields() {
        let service = service_with_workflow().await;

        assert!(service.create("user-1", "wf-1", " ", "a").await.is_err());
        assert!(service.create("user-1", "wf-1", "q", "").await.is_err());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let service = service_with_workflow().await;

        let faq = service.create("user-1", "wf-1", "q", "a").await.unwrap();

        let updated = service
            .update("user-1", faq.id(), "q2", "a2")
            .await
            .unwrap();
        assert_eq!(updated.question, "q2");

        service.delete("user-1", faq.id()).await.unwrap();
        assert!(service.list("user-1", "wf-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_enforces_ownership() {
        let service = service_with_workflow().await;
        let faq = service.create("user-1", "wf-1", "q", "a").await.unwrap();

        let result = service.update("user-2", faq.id(), "q2", "a2").await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }
}
