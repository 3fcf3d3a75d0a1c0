use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use marketscout_core::message::Conversation;
use marketscout_core::session::{ModelSettings, Session};
use marketscout_core::template::TemplateStore;
use marketscout_core::testing::SequentialMockProvider;

use crate::tavily::{SearchBackend, SearchError};

/// A search backend that answers every call with the same payload.
pub struct StaticBackend {
    outcome: Result<serde_json::Value, String>,
    queries: Mutex<Vec<String>>,
    extracted: Mutex<Vec<Vec<String>>>,
}

impl StaticBackend {
    pub fn ok(payload: serde_json::Value) -> Self {
        Self::with_outcome(Ok(payload))
    }

    pub fn failing(reason: &str) -> Self {
        Self::with_outcome(Err(reason.to_string()))
    }

    fn with_outcome(outcome: Result<serde_json::Value, String>) -> Self {
        Self {
            outcome,
            queries: Mutex::new(Vec::new()),
            extracted: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub fn extracted(&self) -> Vec<Vec<String>> {
        self.extracted.lock().unwrap().clone()
    }

    fn answer(&self) -> Result<serde_json::Value, SearchError> {
        self.outcome.clone().map_err(SearchError::Network)
    }
}

#[async_trait]
impl SearchBackend for StaticBackend {
    async fn search(&self, query: &str) -> Result<serde_json::Value, SearchError> {
        self.queries.lock().unwrap().push(query.to_string());
        self.answer()
    }

    async fn extract(&self, urls: &[String]) -> Result<serde_json::Value, SearchError> {
        self.extracted.lock().unwrap().push(urls.to_vec());
        self.answer()
    }
}

/// A session whose provider has nothing scripted.
pub fn empty_session() -> Session {
    session_with(Arc::new(SequentialMockProvider::new(vec![])))
}

pub fn session_with(provider: Arc<SequentialMockProvider>) -> Session {
    Session::with_conversation(
        provider,
        ModelSettings::new("mock-model"),
        Conversation::with_system_prompt("You are a market research assistant."),
    )
}

/// A template store over a temporary directory holding `files`.
pub fn template_store(files: &[(&str, &str)]) -> (tempfile::TempDir, Arc<TemplateStore>) {
    let dir = tempfile::tempdir().unwrap();
    for (name, body) in files {
        std::fs::write(dir.path().join(format!("{name}.md")), body).unwrap();
    }
    let store = Arc::new(TemplateStore::new(dir.path()));
    (dir, store)
}
