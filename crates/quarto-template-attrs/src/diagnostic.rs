/*
 * diagnostic.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Diagnostic messages produced while evaluating attributes.
//!
//! Attribute evaluation never aborts a render. Problems are reported as
//! [`AttrDiagnostic`] values, which are turned into tidyverse-style
//! [`DiagnosticMessage`]s (title, problem statement, bulleted details) with a
//! stable error code from the catalog.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The kind of diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticKind {
    /// An error that prevents completion
    Error,
    /// A warning that doesn't prevent completion but indicates a problem
    Warning,
    /// Informational message
    Info,
    /// A note providing additional context
    Note,
}

impl DiagnosticKind {
    fn label(self) -> &'static str {
        match self {
            DiagnosticKind::Error => "Error",
            DiagnosticKind::Warning => "Warning",
            DiagnosticKind::Info => "Info",
            DiagnosticKind::Note => "Note",
        }
    }
}

/// How a detail item is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailKind {
    /// ✖ bullet
    Error,
    /// ℹ bullet
    Info,
    /// plain bullet
    Note,
}

impl DetailKind {
    fn bullet(self) -> &'static str {
        match self {
            DetailKind::Error => "✖",
            DetailKind::Info => "ℹ",
            DetailKind::Note => "•",
        }
    }
}

/// A bulleted detail in a diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailItem {
    pub kind: DetailKind,
    pub content: String,
}

/// A structured diagnostic message.
///
/// Structure:
/// 1. **Code**: optional error code (e.g., "Q-12-1") for searchability
/// 2. **Title**: brief message
/// 3. **Kind**: error, warning, info, note
/// 4. **Problem**: what went wrong
/// 5. **Details**: specific information, one bullet each
/// 6. **Hints**: optional guidance for fixing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub title: String,
    pub kind: DiagnosticKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub details: Vec<DetailItem>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub hints: Vec<String>,
}

impl DiagnosticMessage {
    /// Create a diagnostic message with just a kind and title.
    pub fn new(kind: DiagnosticKind, title: impl Into<String>) -> Self {
        Self {
            code: None,
            title: title.into(),
            kind,
            problem: None,
            details: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Error, title)
    }

    pub fn warning(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Warning, title)
    }

    /// Set the error code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Set the problem statement.
    pub fn with_problem(mut self, problem: impl Into<String>) -> Self {
        self.problem = Some(problem.into());
        self
    }

    /// Add an info detail bullet.
    pub fn add_info(mut self, content: impl Into<String>) -> Self {
        self.details.push(DetailItem {
            kind: DetailKind::Info,
            content: content.into(),
        });
        self
    }

    /// Add a hint.
    pub fn add_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    /// Documentation URL for this diagnostic's code, if the catalog has one.
    pub fn docs_url(&self) -> Option<&'static str> {
        self.code
            .as_deref()
            .and_then(crate::catalog::get_docs_url)
    }

    /// Render as text.
    ///
    /// ```text
    /// Warning [Q-12-1]: title
    /// Problem statement
    /// ℹ Detail
    /// ? Hint
    /// ```
    pub fn to_text(&self) -> String {
        let mut lines = Vec::new();
        lines.push(match &self.code {
            Some(code) => format!("{} [{}]: {}", self.kind.label(), code, self.title),
            None => format!("{}: {}", self.kind.label(), self.title),
        });
        if let Some(problem) = &self.problem {
            lines.push(problem.clone());
        }
        for detail in &self.details {
            lines.push(format!("{} {}", detail.kind.bullet(), detail.content));
        }
        for hint in &self.hints {
            lines.push(format!("? {}", hint));
        }
        lines.join("\n")
    }

    /// Render as a JSON value.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// The recoverable problems attribute evaluation can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttrDiagnostic {
    /// An attribute was bound to a template that declares no argument to receive it.
    #[error("passed {expected} arg(s) to template {instance_name} with {actual} declared arg(s)")]
    ArgumentCountMismatch {
        expected: usize,
        actual: usize,
        instance_name: String,
    },

    /// A writer of the requested kind could not be constructed.
    #[error("cannot construct a writer of kind {writer_kind}")]
    WriterConstructionIssue {
        writer_kind: String,
        fallback_kind: String,
    },
}

impl AttrDiagnostic {
    /// The catalog code for this diagnostic.
    pub fn code(&self) -> &'static str {
        match self {
            AttrDiagnostic::ArgumentCountMismatch { .. } => "Q-12-1",
            AttrDiagnostic::WriterConstructionIssue { .. } => "Q-12-2",
        }
    }

    /// Build the structured message for this diagnostic.
    pub fn to_message(&self, kind: DiagnosticKind) -> DiagnosticMessage {
        let code = self.code();
        let title = crate::catalog::get_error_info(code)
            .map(|info| info.title.clone())
            .unwrap_or_else(|| code.to_string());
        let message = DiagnosticMessage::new(kind, title)
            .with_code(code)
            .with_problem(self.to_string());

        match self {
            AttrDiagnostic::ArgumentCountMismatch { instance_name, .. } => message
                .add_info(format!("Template `{}` declares no formal arguments", instance_name))
                .add_hint(format!("Declare an argument on `{}`?", instance_name)),
            AttrDiagnostic::WriterConstructionIssue { fallback_kind, .. } => message.add_info(
                format!("Rendering continues with the `{}` writer", fallback_kind),
            ),
        }
    }
}
