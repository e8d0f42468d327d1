//! Application state shared across handlers

use std::sync::Arc;

use crate::domain::crawler::ContentFetcher;
use crate::infrastructure::auth::AuthService;
use crate::infrastructure::rate_limit::UsageService;
use crate::infrastructure::services::{
    ChatService, FaqService, SubscriptionService, WidgetService, WorkflowService,
};

#[derive(Clone)]
pub struct AppState {
    pub workflow_service: Arc<WorkflowService>,
    pub faq_service: Arc<FaqService>,
    pub widget_service: Arc<WidgetService>,
    pub chat_service: Arc<ChatService>,
    pub subscription_service: Arc<SubscriptionService>,
    pub usage_service: Arc<UsageService>,
    pub content_fetcher: Arc<dyn ContentFetcher>,
    pub auth_service: Arc<dyn AuthService>,
    /// Public base URL baked into the widget script
    pub public_base_url: String,
}
