//! LLM provider abstraction

mod message;
mod provider;
mod request;
mod response;

pub use message::{Message, MessageRole};
pub use provider::LlmProvider;
pub use request::LlmRequest;
pub use response::{LlmResponse, Usage};

#[cfg(test)]
pub use provider::mock;
