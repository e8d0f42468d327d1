//! HTTP API layer

pub mod chat;
pub mod crawl;
pub mod faqs;
pub mod health;
pub mod middleware;
pub mod router;
pub mod state;
pub mod types;
pub mod usage;
pub mod webhooks;
pub mod widget;
pub mod workflows;

pub use router::create_router;
pub use state::AppState;
