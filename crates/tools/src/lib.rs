//! Built-in research tools for MarketScout.
//!
//! Tools give an agent its moves on each turn: think about the
//! conversation, answer the user, query the web, read pages, and turn the
//! collected research into a report.

pub mod extract;
pub mod reasoning;
pub mod report;
pub mod respond;
pub mod search;
pub mod tavily;

#[cfg(test)]
mod test_helpers;

pub use extract::ExtractTool;
pub use reasoning::ReasoningTool;
pub use report::{Outline, ReportTool, Section};
pub use respond::{DEFAULT_RESPONSE_TYPES, RespondTool};
pub use search::SearchTool;
pub use tavily::{DEFAULT_TAVILY_URL, SearchBackend, SearchError, TavilyClient};
