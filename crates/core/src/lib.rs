//! # MarketScout Core
//!
//! Domain types, traits, and error definitions for the MarketScout research
//! agent. This crate has **zero framework dependencies** — it defines the
//! domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every seam is defined as a trait here (`Provider`, `Tool`).
//! Implementations live in their respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with scripted providers
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod message;
pub mod provider;
pub mod session;
pub mod template;
pub mod tool;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export key types at crate root for ergonomics
pub use error::{Error, ProviderError, Result, TemplateError, ToolError};
pub use message::{Conversation, ConversationId, Message, Role};
pub use provider::{
    Provider, ProviderRequest, ProviderResponse, ResponseFormat, ToolCall, ToolChoice,
    ToolDefinition, Usage,
};
pub use session::{ModelSettings, Scratch, Session};
pub use template::{Template, TemplateStore};
pub use tool::{Tool, ToolRegistry, parse_arguments};
