//! Prompt templates — named text files with `{{ placeholder }}` slots.
//!
//! Templates live as `<dir>/<name>.md`. Every lookup goes back to the file
//! system, but the parsed text is cached per name and only re-read when the
//! file's modification time changes, so edits are picked up without a
//! restart.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::SystemTime;
use tracing::debug;

use crate::error::TemplateError;

/// Template file extension.
pub const TEMPLATE_EXTENSION: &str = "md";

/// Well-known template names.
pub mod names {
    pub const SYSTEM_MESSAGE: &str = "system_message";
    pub const REASONING: &str = "reasoning";
    pub const RESPOND: &str = "respond";
    pub const CLARIFICATION: &str = "clarification";
    pub const REPORT_OUTLINE: &str = "report_outline";
    pub const WRITE_REPORT: &str = "write_report";

    /// Everything the default agent wiring renders at some point.
    pub const ALL: &[&str] = &[
        SYSTEM_MESSAGE,
        REASONING,
        RESPOND,
        CLARIFICATION,
        REPORT_OUTLINE,
        WRITE_REPORT,
    ];
}

/// A loaded template body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub name: String,
    pub body: String,
}

impl Template {
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
        }
    }

    /// Substitute `{{ key }}` slots (whitespace inside the braces is ignored).
    ///
    /// Slots with no matching variable render as the empty string; an
    /// unterminated `{{` is kept verbatim.
    pub fn render(&self, vars: &[(&str, &str)]) -> String {
        let mut out = String::with_capacity(self.body.len());
        let mut rest = self.body.as_str();

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after_open = &rest[start + 2..];
            let Some(end) = after_open.find("}}") else {
                out.push_str(&rest[start..]);
                return out;
            };
            let key = after_open[..end].trim();
            if let Some((_, value)) = vars.iter().find(|(k, _)| *k == key) {
                out.push_str(value);
            }
            rest = &after_open[end + 2..];
        }

        out.push_str(rest);
        out
    }
}

#[derive(Debug, Clone)]
struct CachedTemplate {
    modified: Option<SystemTime>,
    template: Template,
}

/// Resolves template names to files under one directory.
#[derive(Debug)]
pub struct TemplateStore {
    dir: PathBuf,
    cache: Mutex<HashMap<String, CachedTemplate>>,
}

impl TemplateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The file a template name resolves to.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{TEMPLATE_EXTENSION}"))
    }

    /// Load a template, re-reading the file if it changed since last time.
    pub fn load(&self, name: &str) -> Result<Template, TemplateError> {
        let path = self.path_for(name);
        let metadata = std::fs::metadata(&path).map_err(|_| TemplateError::NotFound {
            name: name.to_string(),
            path: path.display().to_string(),
        })?;
        let modified = metadata.modified().ok();

        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(cached) = cache.get(name) {
            if modified.is_some() && cached.modified == modified {
                return Ok(cached.template.clone());
            }
        }

        let body = std::fs::read_to_string(&path).map_err(|e| TemplateError::ReadFailed {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        debug!(template = name, path = %path.display(), "Loaded template");

        let template = Template::new(name, body);
        cache.insert(
            name.to_string(),
            CachedTemplate {
                modified,
                template: template.clone(),
            },
        );
        Ok(template)
    }

    /// Load and render in one step.
    pub fn render(&self, name: &str, vars: &[(&str, &str)]) -> Result<String, TemplateError> {
        Ok(self.load(name)?.render(vars))
    }

    /// Check that every named template can be loaded.
    pub fn verify<S: AsRef<str>>(&self, names: &[S]) -> Result<(), TemplateError> {
        for name in names {
            self.load(name.as_ref())?;
        }
        Ok(())
    }
}
