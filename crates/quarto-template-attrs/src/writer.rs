/*
 * writer.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Output writers.
//!
//! Rendering writes into an [`AttrWriter`]. Writers keep their own in-memory
//! buffer and may apply indentation. Each writer reports a kind identifier,
//! and a [`WriterRegistry`] maps kind identifiers to constructors so that a
//! fresh writer "of the same kind" as an existing one can be built without
//! any runtime type introspection.

use std::collections::HashMap;

use crate::error::{AttrError, AttrResult};
use crate::options::RenderOptions;

/// Kind identifier of [`AutoIndentWriter`], the default writer.
pub const AUTO_INDENT_WRITER: &str = "auto-indent";

/// Kind identifier of [`NoIndentWriter`].
pub const NO_INDENT_WRITER: &str = "no-indent";

/// A sink for rendered text.
pub trait AttrWriter {
    /// Kind identifier used to look up this writer's constructor.
    fn kind(&self) -> &str;

    /// Push an indentation level applied at the start of each following line.
    fn push_indentation(&mut self, indent: &str);

    /// Pop the innermost indentation level.
    fn pop_indentation(&mut self) -> Option<String>;

    /// Write text, returning the number of characters emitted (including
    /// indentation).
    fn write_str(&mut self, s: &str) -> usize;

    /// Number of characters written so far.
    fn index(&self) -> usize;

    /// The text written so far.
    fn output(&self) -> &str;

    /// Consume the writer and return its buffer.
    fn into_output(self: Box<Self>) -> String;
}

/// Writer that indents every line with the current indentation stack.
///
/// Indentation is emitted lazily, right before the first character of a
/// line, so a trailing newline does not leave dangling whitespace.
#[derive(Debug)]
pub struct AutoIndentWriter {
    buffer: String,
    indents: Vec<String>,
    at_line_start: bool,
    char_index: usize,
}

impl Default for AutoIndentWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl AutoIndentWriter {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            indents: Vec::new(),
            at_line_start: true,
            char_index: 0,
        }
    }

    fn indent(&mut self) -> usize {
        let mut n = 0;
        for indent in &self.indents {
            self.buffer.push_str(indent);
            n += indent.chars().count();
        }
        n
    }
}

impl AttrWriter for AutoIndentWriter {
    fn kind(&self) -> &str {
        AUTO_INDENT_WRITER
    }

    fn push_indentation(&mut self, indent: &str) {
        self.indents.push(indent.to_string());
    }

    fn pop_indentation(&mut self) -> Option<String> {
        self.indents.pop()
    }

    fn write_str(&mut self, s: &str) -> usize {
        let mut n = 0;
        for ch in s.chars() {
            if ch == '\n' {
                self.at_line_start = true;
            } else if self.at_line_start {
                n += self.indent();
                self.at_line_start = false;
            }
            self.buffer.push(ch);
            n += 1;
        }
        self.char_index += n;
        n
    }

    fn index(&self) -> usize {
        self.char_index
    }

    fn output(&self) -> &str {
        &self.buffer
    }

    fn into_output(self: Box<Self>) -> String {
        self.buffer
    }
}

/// Writer that ignores indentation.
#[derive(Debug, Default)]
pub struct NoIndentWriter {
    buffer: String,
    indents: Vec<String>,
    char_index: usize,
}

impl NoIndentWriter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AttrWriter for NoIndentWriter {
    fn kind(&self) -> &str {
        NO_INDENT_WRITER
    }

    fn push_indentation(&mut self, indent: &str) {
        self.indents.push(indent.to_string());
    }

    fn pop_indentation(&mut self) -> Option<String> {
        self.indents.pop()
    }

    fn write_str(&mut self, s: &str) -> usize {
        self.buffer.push_str(s);
        let n = s.chars().count();
        self.char_index += n;
        n
    }

    fn index(&self) -> usize {
        self.char_index
    }

    fn output(&self) -> &str {
        &self.buffer
    }

    fn into_output(self: Box<Self>) -> String {
        self.buffer
    }
}

/// Builds a fresh writer over an empty in-memory buffer.
pub type WriterConstructor = fn() -> Box<dyn AttrWriter>;

/// Registered writer constructors, keyed by writer kind.
///
/// The registry also names a default kind, used for top-level output and
/// whenever a writer of some other kind cannot be built.
#[derive(Debug, Clone)]
pub struct WriterRegistry {
    constructors: HashMap<String, WriterConstructor>,
    default_kind: String,
}

impl Default for WriterRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(AUTO_INDENT_WRITER, || Box::new(AutoIndentWriter::new()));
        registry.register(NO_INDENT_WRITER, || Box::new(NoIndentWriter::new()));
        registry
    }
}

impl WriterRegistry {
    /// A registry with the built-in writer kinds.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in writer kinds and the configured default.
    pub fn with_options(options: &RenderOptions) -> Self {
        Self::new().with_default_kind(&options.default_writer)
    }

    /// A registry with no writer kinds at all.
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
            default_kind: AUTO_INDENT_WRITER.to_string(),
        }
    }

    pub fn with_default_kind(mut self, kind: impl Into<String>) -> Self {
        self.default_kind = kind.into();
        self
    }

    pub fn default_kind(&self) -> &str {
        &self.default_kind
    }

    /// Register (or replace) the constructor for a writer kind.
    pub fn register(&mut self, kind: impl Into<String>, constructor: WriterConstructor) {
        self.constructors.insert(kind.into(), constructor);
    }

    /// Build a fresh writer of the given kind.
    pub fn build(&self, kind: &str) -> AttrResult<Box<dyn AttrWriter>> {
        self.constructors
            .get(kind)
            .map(|constructor| constructor())
            .ok_or_else(|| AttrError::UnknownWriterKind {
                kind: kind.to_string(),
            })
    }

    /// Build a fresh writer of the default kind.
    pub fn build_default(&self) -> AttrResult<Box<dyn AttrWriter>> {
        self.build(&self.default_kind)
    }

    /// Build a fresh writer of the same kind as `reference`.
    pub fn build_like(&self, reference: &dyn AttrWriter) -> AttrResult<Box<dyn AttrWriter>> {
        self.build(reference.kind())
    }
}
