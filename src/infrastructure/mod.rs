//! Infrastructure implementations of the domain's collaborator surfaces

pub mod auth;
pub mod cache;
pub mod crawler;
pub mod llm;
pub mod logging;
pub mod rate_limit;
pub mod services;
pub mod store;
