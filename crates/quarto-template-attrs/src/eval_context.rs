/*
 * eval_context.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Evaluation context for attribute rendering.
//!
//! This module provides [`EvalContext`], which is threaded through the
//! pipeline, the binder and string coercion to support:
//!
//! 1. **Diagnostics**: collect recoverable problems without aborting
//! 2. **State tracking**: nesting depth and early-evaluation marking
//! 3. **Configuration**: strict mode for treating warnings as errors

use crate::diagnostic::{AttrDiagnostic, DiagnosticKind, DiagnosticMessage};
use crate::options::RenderOptions;

/// Collector for diagnostic messages during evaluation.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<DiagnosticMessage>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    /// Add a diagnostic message.
    pub fn add(&mut self, diagnostic: DiagnosticMessage) {
        self.diagnostics.push(diagnostic);
    }

    /// Check if any errors were collected (warnings don't count).
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::Error)
    }

    pub fn diagnostics(&self) -> &[DiagnosticMessage] {
        &self.diagnostics
    }

    /// Consume the collector and return the diagnostics in report order.
    pub fn into_diagnostics(self) -> Vec<DiagnosticMessage> {
        self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Context for attribute evaluation.
#[derive(Debug)]
pub struct EvalContext {
    /// Diagnostic collector for errors and warnings.
    pub diagnostics: DiagnosticCollector,

    /// Current nesting depth of values rendered inside values.
    pub depth: usize,

    /// Maximum nesting depth; deeper values render nothing.
    pub max_depth: usize,

    /// Strict mode: report diagnostics as errors.
    pub strict_mode: bool,

    /// Set for nested renders performed only to obtain a string.
    pub early_eval: bool,
}

impl Default for EvalContext {
    fn default() -> Self {
        Self::new()
    }
}

impl EvalContext {
    pub fn new() -> Self {
        Self {
            diagnostics: DiagnosticCollector::new(),
            depth: 0,
            max_depth: 64,
            strict_mode: false,
            early_eval: false,
        }
    }

    /// Create a context configured from render options.
    pub fn with_options(options: &RenderOptions) -> Self {
        Self::new()
            .with_strict_mode(options.strict_mode)
            .with_max_depth(options.max_depth)
    }

    pub fn with_strict_mode(mut self, strict: bool) -> Self {
        self.strict_mode = strict;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Create a child context for a nested evaluation.
    ///
    /// The child has fresh diagnostics but inherits depth, configuration and
    /// the early-evaluation flag.
    pub fn child(&self) -> EvalContext {
        EvalContext {
            diagnostics: DiagnosticCollector::new(),
            depth: self.depth,
            max_depth: self.max_depth,
            strict_mode: self.strict_mode,
            early_eval: self.early_eval,
        }
    }

    /// Create a child context marked as early evaluation.
    pub fn early_eval_child(&self) -> EvalContext {
        let mut child = self.child();
        child.early_eval = true;
        child
    }

    /// Merge diagnostics from a child context into this context.
    pub fn merge_diagnostics(&mut self, child: EvalContext) {
        for diag in child.diagnostics.into_diagnostics() {
            self.diagnostics.add(diag);
        }
    }

    /// Report an attribute diagnostic: an error in strict mode, a warning otherwise.
    pub fn report(&mut self, diagnostic: AttrDiagnostic) {
        let kind = if self.strict_mode {
            DiagnosticKind::Error
        } else {
            DiagnosticKind::Warning
        };
        self.diagnostics.add(diagnostic.to_message(kind));
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }

    /// Consume the context and return collected diagnostics.
    pub fn into_diagnostics(self) -> Vec<DiagnosticMessage> {
        self.diagnostics.into_diagnostics()
    }
}
