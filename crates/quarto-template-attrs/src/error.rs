/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for the few fallible entry points.
//!
//! Attribute evaluation itself does not fail; see [`crate::diagnostic`].

use thiserror::Error;

/// Errors returned by lookups and configuration loading.
#[derive(Debug, Error)]
pub enum AttrError {
    /// No accessor has this name.
    #[error("Unknown accessor: {name}")]
    UnknownAccessor { name: String },

    /// No writer constructor is registered for this kind.
    #[error("Unknown writer kind: {kind}")]
    UnknownWriterKind { kind: String },

    /// Render options could not be parsed.
    #[error("Invalid render options: {0}")]
    InvalidOptions(#[from] serde_json::Error),
}

/// Result type for attribute operations.
pub type AttrResult<T> = Result<T, AttrError>;
