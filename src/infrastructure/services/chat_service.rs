//! Chat service - the full message pipeline
//!
//! One turn: load the workflow (cached), gate the origin, assemble the
//! system prompt from context + decision flows + FAQs, charge the rate
//! limiter, forward to the provider, settle the token charge with the
//! provider-reported usage.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::faq::select_matching_faqs;
use crate::domain::graph::extract_decision_flows;
use crate::domain::llm::{LlmProvider, LlmRequest, Message, Usage};
use crate::domain::prompt::assemble_system_prompt;
use crate::domain::rate_limit::estimate_request_tokens;
use crate::domain::DomainError;
use crate::infrastructure::rate_limit::UsageService;
use crate::infrastructure::services::{
    FaqService, SubscriptionService, WidgetService, WorkflowService,
};

/// How many keyword-matched FAQs go into the prompt before falling back to
/// all of them
const MAX_MATCHED_FAQS: usize = 5;

#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub workflow_id: String,
    pub message: String,
    pub history: Vec<Message>,
    pub origin: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub response: String,
    pub usage: Option<Usage>,
}

pub struct ChatService {
    workflows: Arc<WorkflowService>,
    faqs: Arc<FaqService>,
    widgets: Arc<WidgetService>,
    subscriptions: Arc<SubscriptionService>,
    usage: Arc<UsageService>,
    provider: Arc<dyn LlmProvider>,
    settings: ChatSettings,
}

impl std::fmt::Debug for ChatService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatService")
            .field("settings", &self.settings)
            .finish()
    }
}

impl ChatService {
    pub fn new(
        workflows: Arc<WorkflowService>,
        faqs: Arc<FaqService>,
        widgets: Arc<WidgetService>,
        subscriptions: Arc<SubscriptionService>,
        usage: Arc<UsageService>,
        provider: Arc<dyn LlmProvider>,
        settings: ChatSettings,
    ) -> Self {
        Self {
            workflows,
            faqs,
            widgets,
            subscriptions,
            usage,
            provider,
            settings,
        }
    }

    pub async fn chat(&self, turn: ChatTurn) -> Result<ChatReply, DomainError> {
        if turn.message.trim().is_empty() {
            return Err(DomainError::validation("Message cannot be empty"));
        }

        let request_id = uuid::Uuid::new_v4();

        let workflow = self.workflows.load_cached(&turn.workflow_id).await?;
        let owner = workflow.user_id();
        self.widgets
            .check_origin(&turn.workflow_id, turn.origin.as_deref())
            .await?;

        let all_faqs = self.faqs.list_for_chat(&turn.workflow_id).await?;
        let matched = select_matching_faqs(&all_faqs, &turn.message, MAX_MATCHED_FAQS);
        // No keyword overlap: hand the model everything and let it decide.
        let selected: Vec<&_> = if matched.is_empty() {
            all_faqs.iter().collect()
        } else {
            matched
        };

        let flows = extract_decision_flows(workflow.nodes(), workflow.edges());
        let system_prompt =
            assemble_system_prompt(workflow.context(), &flows, &selected, workflow.name());

        debug!(
            request_id = %request_id,
            workflow_id = %turn.workflow_id,
            user_id = %owner,
            flows = flows.len(),
            faqs = selected.len(),
            "Assembled chat prompt"
        );

        let tier = self.subscriptions.tier_for(owner).await?;
        let estimated = estimate_request_tokens(&turn.message, &turn.history);

        let decision = self.usage.check_and_consume(owner, tier, estimated).await?;
        if !decision.allowed {
            return Err(DomainError::rate_limited(
                decision
                    .reason
                    .unwrap_or_else(|| "Rate limit exceeded".to_string()),
            ));
        }

        let mut messages = Vec::with_capacity(turn.history.len() + 2);
        messages.push(Message::system(system_prompt));
        messages.extend(turn.history);
        messages.push(Message::user(turn.message));

        let request = LlmRequest::new(messages)
            .with_temperature(self.settings.temperature)
            .with_max_tokens(self.settings.max_tokens);

        let response = self.provider.chat(&self.settings.model, request).await?;

        if let Some(usage) = response.usage {
            self.usage
                .settle(owner, estimated, u64::from(usage.total()))
                .await?;
        }

        info!(
            request_id = %request_id,
            workflow_id = %turn.workflow_id,
            user_id = %owner,
            model = %response.model,
            "Chat turn completed"
        );

        Ok(ChatReply {
            response: response.content,
            usage: response.usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::graph::{Edge, EdgeHandle, Node};
    use crate::domain::llm::mock::MockLlmProvider;
    use crate::domain::llm::LlmResponse;
    use crate::domain::rate_limit::Tier;
    use crate::domain::store::DocumentStore;
    use crate::infrastructure::cache::WorkflowCache;
    use crate::infrastructure::services::workflow_service::SaveWorkflowRequest;
    use crate::infrastructure::store::InMemoryStore;

    struct Fixture {
        service: ChatService,
        provider: Arc<MockLlmProvider>,
        usage: Arc<UsageService>,
        widgets: Arc<WidgetService>,
    }

    async fn fixture(provider: MockLlmProvider) -> Fixture {
        let workflows: Arc<InMemoryStore<crate::domain::Workflow>> =
            Arc::new(InMemoryStore::new());
        let faqs: Arc<InMemoryStore<crate::domain::faq::Faq>> = Arc::new(InMemoryStore::new());
        let widget_domains: Arc<InMemoryStore<crate::domain::widget::WidgetDomain>> =
            Arc::new(InMemoryStore::new());

        let workflow_service = Arc::new(WorkflowService::new(
            workflows.clone(),
            faqs.clone(),
            widget_domains.clone(),
            WorkflowCache::default(),
        ));
        let faq_service = Arc::new(FaqService::new(faqs, workflows.clone()));
        let widget_service = Arc::new(WidgetService::new(
            widget_domains,
            workflows,
            "botflow.app",
        ));
        let subscription_service =
            Arc::new(SubscriptionService::new(Arc::new(InMemoryStore::new())));
        let usage = Arc::new(UsageService::new(Arc::new(InMemoryStore::new())));
        let provider = Arc::new(provider);

        let service = ChatService::new(
            workflow_service.clone(),
            faq_service,
            widget_service.clone(),
            subscription_service,
            usage.clone(),
            provider.clone(),
            ChatSettings {
                model: "gpt-4o-mini".to_string(),
                temperature: 0.7,
                max_tokens: 500,
            },
        );

        workflow_service
            .save(
                "owner-1",
                SaveWorkflowRequest {
                    id: Some("wf-1".to_string()),
                    name: "Acme Support".to_string(),
                    nodes: vec![
                        Node::start("s1", "Start"),
                        Node::decision("d1", "Is order late?"),
                        Node::scenario("sc1", "Customer asks about delivery"),
                        Node::action("a1", "Offer a discount code"),
                    ],
                    edges: vec![
                        Edge::new("s1", "d1"),
                        Edge::new("sc1", "d1"),
                        Edge::new("d1", "a1").with_handle(EdgeHandle::Yes),
                    ],
                    context: Some("Acme sells garden gnomes.".to_string()),
                },
            )
            .await
            .unwrap();

        Fixture {
            service,
            provider,
            usage,
            widgets: widget_service,
        }
    }

    fn reply() -> LlmResponse {
        LlmResponse::new("r-1", "gpt-4o-mini", "Happy to help!").with_usage(Usage::new(120, 30))
    }

    fn turn(message: &str) -> ChatTurn {
        ChatTurn {
            workflow_id: "wf-1".to_string(),
            message: message.to_string(),
            history: Vec::new(),
            origin: None,
        }
    }

    #[tokio::test]
    async fn test_chat_returns_reply_with_usage() {
        let fixture = fixture(MockLlmProvider::new().with_response(reply())).await;

        let reply = fixture.service.chat(turn("Where is my order?")).await.unwrap();

        assert_eq!(reply.response, "Happy to help!");
        assert_eq!(reply.usage, Some(Usage::new(120, 30)));
    }

    #[tokio::test]
    async fn test_prompt_carries_context_and_flows() {
        let fixture = fixture(MockLlmProvider::new().with_response(reply())).await;

        fixture.service.chat(turn("My order is late")).await.unwrap();

        let prompt = fixture.provider.last_system_prompt().unwrap();
        assert!(prompt.contains("Acme Support"));
        assert!(prompt.contains("Acme sells garden gnomes."));
        assert!(prompt.contains("Is order late?"));
        assert!(prompt.contains("Offer a discount code"));
    }

    #[tokio::test]
    async fn test_empty_message_rejected() {
        let fixture = fixture(MockLlmProvider::new().with_response(reply())).await;

        let result = fixture.service.chat(turn("   ")).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_unknown_workflow_not_found() {
        let fixture = fixture(MockLlmProvider::new().with_response(reply())).await;

        let mut t = turn("hello");
        t.workflow_id = "absent".to_string();

        assert!(matches!(
            fixture.service.chat(t).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_disallowed_origin_rejected() {
        let fixture = fixture(MockLlmProvider::new().with_response(reply())).await;
        fixture
            .widgets
            .add_domain("owner-1", "wf-1", "shop.example.com")
            .await
            .unwrap();

        let mut t = turn("hello");
        t.origin = Some("https://evil.example".to_string());

        assert!(matches!(
            fixture.service.chat(t).await,
            Err(DomainError::Unauthorized { .. })
        ));
    }

    #[tokio::test]
    async fn test_rate_limited_owner_denied() {
        let fixture = fixture(MockLlmProvider::new().with_response(reply())).await;

        // Exhaust the owner's free-tier minute budget up front.
        fixture
            .usage
            .check_and_consume("owner-1", Tier::Free, 3_900)
            .await
            .unwrap();

        let result = fixture.service.chat(turn("hello")).await;
        assert!(matches!(result, Err(DomainError::RateLimited { .. })));
    }

    #[tokio::test]
    async fn test_settles_to_provider_reported_usage() {
        let fixture = fixture(MockLlmProvider::new().with_response(reply())).await;

        fixture.service.chat(turn("Where is my order?")).await.unwrap();

        let counters = fixture.usage.usage_for("owner-1").await.unwrap();
        assert_eq!(counters.daily_tokens, 150);
        assert_eq!(counters.daily_requests, 1);
    }

    #[tokio::test]
    async fn test_provider_error_surfaces() {
        let fixture = fixture(MockLlmProvider::new().with_error("model overloaded")).await;

        let result = fixture.service.chat(turn("hello")).await;
        assert!(matches!(result, Err(DomainError::Provider { .. })));
    }
}
