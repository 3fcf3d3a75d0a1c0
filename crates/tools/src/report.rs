//! Report tool — writes a structured, multi-section report.
//!
//! Two phases:
//! 1. **Outline** — the model plans a title and an ordered list of sections,
//!    returned as structured JSON.
//! 2. **Sections** — each section is written in turn on a fork of the
//!    session, with the outline and the report so far in the prompt.
//!
//! The caller's conversation is left exactly as it was found.

use std::sync::Arc;
use async_trait::async_trait;
use marketscout_core::error::{ProviderError, Result};
use marketscout_core::message::Message;
use marketscout_core::provider::{ResponseFormat, ToolChoice};
use marketscout_core::session::Session;
use marketscout_core::template::{TemplateStore, names};
use marketscout_core::tool::Tool;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outline {
    pub title: String,
    pub sections: Vec<Section>,
}

impl Outline {
    /// JSON Schema for structured outline output (strict mode compatible).
    pub fn json_schema() -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "title": { "type": "string" },
                "sections": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "description": { "type": "string" }
                        },
                        "required": ["title", "description"],
                        "additionalProperties": false
                    }
                }
            },
            "required": ["title", "sections"],
            "additionalProperties": false
        })
    }

    /// Plain-text rendering used inside section prompts.
    pub fn to_prompt_text(&self) -> String {
        let mut text = format!("Title: {}\n", self.title);
        for (i, section) in self.sections.iter().enumerate() {
            text.push_str(&format!(
                "{}. {}: {}\n",
                i + 1,
                section.title,
                section.description
            ));
        }
        text
    }
}

impl Section {
    fn to_prompt_text(&self) -> String {
        format!("{}: {}", self.title, self.description)
    }
}

pub struct ReportTool {
    templates: Arc<TemplateStore>,
    terminating: bool,
}

impl ReportTool {
    pub fn new(templates: Arc<TemplateStore>) -> Self {
        Self {
            templates,
            terminating: true,
        }
    }

    pub fn terminating(mut self, terminating: bool) -> Self {
        self.terminating = terminating;
        self
    }

    /// Ask the model for the report structure.
    pub async fn generate_outline(&self, session: &mut Session) -> Result<Outline> {
        info!("Planning a structure for the report");
        let prompt = self.templates.render(names::REPORT_OUTLINE, &[])?;

        let response = {
            let scratch = session.scratch(Message::user(prompt));
            scratch
                .get_response(
                    ToolChoice::None,
                    None,
                    Some(ResponseFormat::JsonSchema {
                        name: "outline".into(),
                        schema: Outline::json_schema(),
                    }),
                )
                .await?
        };

        let outline: Outline = serde_json::from_str(response.text()).map_err(|e| {
            ProviderError::InvalidResponse(format!("report outline is not valid JSON: {e}"))
        })?;
        Ok(outline)
    }

    /// Write every section of `outline` in order and return the full report.
    pub async fn write_report(&self, session: &Session, outline: &Outline) -> Result<String> {
        let mut report_session = session.fork();
        let outline_text = outline.to_prompt_text();
        let mut report_so_far = format!("# {}\n\n", outline.title);

        for section in &outline.sections {
            info!(section = %section.title, "Writing section: {}", section.title);
            let current_section = section.to_prompt_text();
            let prompt = self.templates.render(
                names::WRITE_REPORT,
                &[
                    ("outline", outline_text.as_str()),
                    ("current_section", current_section.as_str()),
                    ("report_so_far", report_so_far.as_str()),
                ],
            )?;

            report_session.push(Message::user(prompt));
            let response = report_session
                .get_response(ToolChoice::None, None, None)
                .await?;
            report_so_far.push_str(response.text());
            report_so_far.push_str("\n\n");
        }

        Ok(report_so_far)
    }
}

#[async_trait]
impl Tool for ReportTool {
    fn name(&self) -> &str {
        "report"
    }

    fn description(&self) -> &str {
        "Generate a comprehensive report based on the research."
    }

    fn is_terminating(&self) -> bool {
        self.terminating
    }

    async fn run(&self, session: &mut Session, _arguments: serde_json::Value) -> Result<String> {
        let outline = self.generate_outline(session).await?;
        self.write_report(session, &outline).await
    }
}
