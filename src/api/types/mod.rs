//! API request/response types

pub mod chat;
pub mod crawl;
pub mod error;
pub mod faq;
pub mod json;
pub mod webhook;
pub mod widget;
pub mod workflow;

pub use error::{ApiError, ErrorEnvelope};
pub use json::Json;
