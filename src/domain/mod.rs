//! Domain layer: entities, pure logic and the traits infrastructure
//! implements. Nothing in here performs I/O.

pub mod crawler;
pub mod error;
pub mod faq;
pub mod graph;
pub mod llm;
pub mod prompt;
pub mod rate_limit;
pub mod store;
pub mod subscription;
pub mod widget;
pub mod workflow;

pub use error::DomainError;
pub use workflow::{Workflow, WorkflowId};
