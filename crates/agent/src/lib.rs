//! The MarketScout agent loop.
//!
//! An agent repeatedly asks the model to **select** one of its tools, then
//! **executes** it against the shared session:
//!
//! 1. A terminating tool's output is the answer.
//! 2. Any other tool's output is fed back as an observation message.
//! 3. When the turn budget is spent, the fallback tool answers.
//!
//! Agents are tools too, which is how the research agent runs inside the
//! main agent.

pub mod agent;
pub mod wiring;

pub use agent::{Agent, DEFAULT_MAX_TURNS, observation};
pub use wiring::{
    MAIN_AGENT_NAME, RESEARCH_AGENT_NAME, main_agent, required_templates, research_agent,
};
