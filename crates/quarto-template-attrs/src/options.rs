/*
 * options.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Render options.

use serde::{Deserialize, Serialize};

use crate::error::AttrResult;
use crate::writer::AUTO_INDENT_WRITER;

/// Configuration for attribute rendering.
///
/// Every field has a default, so a partial document is valid:
///
/// ```json
/// { "debug": true, "default-writer": "no-indent" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct RenderOptions {
    /// Record render events in the pipeline.
    pub debug: bool,

    /// Report attribute diagnostics as errors instead of warnings.
    pub strict_mode: bool,

    /// Writer kind used for top-level output and as the fallback target.
    /// Applied through [`WriterRegistry::with_options`](crate::writer::WriterRegistry::with_options).
    pub default_writer: String,

    /// Maximum nesting of values rendered inside values.
    pub max_depth: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            debug: false,
            strict_mode: false,
            default_writer: AUTO_INDENT_WRITER.to_string(),
            max_depth: 64,
        }
    }
}

impl RenderOptions {
    /// Parse options from a JSON document.
    pub fn from_json(source: &str) -> AttrResult<Self> {
        Ok(serde_json::from_str(source)?)
    }
}
