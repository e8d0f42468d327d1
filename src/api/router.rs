use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::state::AppState;
use super::{chat, crawl, faqs, health, usage, webhooks, widget, workflows};

/// Builds the full application router.
///
/// The widget script and chat endpoints are public (origin-gated per
/// workflow); everything else under /api requires a bearer token. CORS is
/// permissive because the widget runs on customer sites.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/chat", post(chat::chat))
        .route("/api/save-workflow", post(workflows::save_workflow))
        .route("/api/load-workflow", get(workflows::load_workflow))
        .route("/api/workflows", get(workflows::list_workflows))
        .route("/api/delete-workflow", delete(workflows::delete_workflow))
        .route("/api/faqs", get(faqs::list_faqs).post(faqs::create_faq))
        .route("/api/faqs/{id}", put(faqs::update_faq).delete(faqs::delete_faq))
        .route(
            "/api/widget-domains",
            get(widget::list_domains).post(widget::add_domain),
        )
        .route("/api/widget-domains/{id}", delete(widget::remove_domain))
        .route("/api/widget/{workflow_id}", get(widget::widget_script))
        .route("/api/discover-urls", post(crawl::discover_urls))
        .route("/api/crawl", post(crawl::crawl))
        .route("/api/usage", get(usage::usage))
        .route("/api/webhooks/dodo", post(webhooks::dodo_webhook))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::util::ServiceExt;

    use super::*;
    use crate::domain::crawler::mock::MockContentFetcher;
    use crate::domain::llm::mock::MockLlmProvider;
    use crate::infrastructure::auth::StaticTokenAuth;
    use crate::infrastructure::cache::WorkflowCache;
    use crate::infrastructure::rate_limit::UsageService;
    use crate::infrastructure::services::{
        ChatService, ChatSettings, FaqService, SubscriptionService, WidgetService, WorkflowService,
    };
    use crate::infrastructure::store::InMemoryStore;

    fn test_state() -> AppState {
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
        let usage_service = Arc::new(UsageService::new(Arc::new(InMemoryStore::new())));

        let auth = StaticTokenAuth::new();
        auth.insert("test-token", "user-1").unwrap();

        let chat_service = Arc::new(ChatService::new(
            workflow_service.clone(),
            faq_service.clone(),
            widget_service.clone(),
            subscription_service.clone(),
            usage_service.clone(),
            Arc::new(MockLlmProvider::new()),
            ChatSettings {
                model: "gpt-4o-mini".to_string(),
                temperature: 0.7,
                max_tokens: 500,
            },
        ));

        AppState {
            workflow_service,
            faq_service,
            widget_service,
            chat_service,
            subscription_service,
            usage_service,
            content_fetcher: Arc::new(MockContentFetcher::new()),
            auth_service: Arc::new(auth),
            public_base_url: "https://botflow.app".to_string(),
        }
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let router = create_router(test_state());

        let response = router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_workflows_require_auth() {
        let router = create_router(test_state());

        let response = router
            .oneshot(Request::get("/api/workflows").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_workflows_with_token() {
        let router = create_router(test_state());

        let response = router
            .oneshot(
                Request::get("/api/workflows")
                    .header("authorization", "Bearer test-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_widget_is_not_found() {
        let router = create_router(test_state());

        let response = router
            .oneshot(
                Request::get("/api/widget/absent")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_webhook_acknowledges_unknown_event() {
        let router = create_router(test_state());

        let response = router
            .oneshot(
                Request::post("/api/webhooks/dodo")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"type": "ping", "data": {}}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
