//! `{{name}}` placeholder templates.

use super::{PageError, PageResult};
use crate::model::record::Record;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::path::Path;

static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("valid placeholder regex")
});

/// Built-in page layout used when no template file is configured.
pub const DEFAULT_TEMPLATE: &str = "<!DOCTYPE html>
<html>
<head>
    <meta charset=\"utf-8\">
    <title>{{ title }}</title>
</head>
<body>
    <h1>{{ title }}</h1>
    <div class=\"content\">{{ content }}</div>
</body>
</html>
";

/// Parsed page template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTemplate {
    source: String,
}

impl PageTemplate {
    /// Reads a template file.
    pub fn load(path: impl AsRef<Path>) -> PageResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| PageError::TemplateIo {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_source(source))
    }

    pub fn from_source(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Placeholder names in order of first appearance.
    pub fn placeholders(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for caps in PLACEHOLDER_RE.captures_iter(&self.source) {
            let name = &caps[1];
            if !names.iter().any(|existing| existing == name) {
                names.push(name.to_string());
            }
        }
        names
    }

    /// Substitutes every placeholder with the escaped column value.
    pub fn render(&self, record: &Record) -> String {
        PLACEHOLDER_RE
            .replace_all(&self.source, |caps: &Captures<'_>| {
                record
                    .get(&caps[1])
                    .map(|value| escape_html(&value.to_string()))
                    .unwrap_or_default()
            })
            .into_owned()
    }
}

impl Default for PageTemplate {
    fn default() -> Self {
        Self::from_source(DEFAULT_TEMPLATE)
    }
}

/// Escapes `& < > " '` for HTML text and attribute contexts.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
