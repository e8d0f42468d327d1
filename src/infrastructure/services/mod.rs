//! Application services wiring domain logic to collaborators

pub mod chat_service;
pub mod faq_service;
pub mod subscription_service;
pub mod widget_service;
pub mod workflow_service;

pub use chat_service::{ChatReply, ChatService, ChatSettings, ChatTurn};
pub use faq_service::FaqService;
pub use subscription_service::SubscriptionService;
pub use widget_service::WidgetService;
pub use workflow_service::{SaveWorkflowRequest, WorkflowService};
