//! Client for the copilot question-answering service.

mod client;
mod types;

#[cfg(test)]
pub use client::MockAskService;
pub use client::{ASK_PATH, AskService, CopilotClient, HEALTH_PATH};
pub use types::{Answer, AskRequest};
