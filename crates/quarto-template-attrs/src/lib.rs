/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Uniform multi-value attribute model for Quarto templates.
//!
//! Templates bind arbitrary values to attributes: strings, numbers, lists,
//! maps, lazily produced sequences, nested templates, or nothing at all. This
//! crate gives all of them one set of semantics:
//!
//! - [`normalize`]: every value is absent, a single scalar, or a sequence
//! - [`accessors`]: `first`, `last`, `rest`, `trunc`, `strip`, `reverse`, `length`
//! - [`materialize`]: flatten attributes into one list for repeated sections
//! - [`binder`]: bind a value as a template's first argument
//! - [`coerce`]: render any value to a string through the [`RenderPipeline`]
//!
//! Nothing here aborts a render. Problems are collected as diagnostics on the
//! [`EvalContext`].
//!
//! # Example
//!
//! ```ignore
//! use quarto_template_attrs::{AttrValue, accessors};
//!
//! let names = AttrValue::List(vec!["a".into(), AttrValue::Null, "b".into()]);
//! assert_eq!(accessors::first(&names), "a".into());
//! assert_eq!(accessors::length(&names), 3);
//! assert_eq!(accessors::length(&"x".into()), 1);
//! ```

pub mod accessors;
pub mod binder;
pub mod catalog;
pub mod coerce;
pub mod diagnostic;
pub mod error;
pub mod eval_context;
pub mod instance;
pub mod materialize;
pub mod normalize;
pub mod options;
pub mod pipeline;
pub mod value;
pub mod writer;

// Re-export main types at crate root
pub use accessors::Accessor;
pub use binder::{Binding, set_first_argument};
pub use coerce::to_string;
pub use diagnostic::{AttrDiagnostic, DetailItem, DetailKind, DiagnosticKind, DiagnosticMessage};
pub use error::{AttrError, AttrResult};
pub use eval_context::{DiagnosticCollector, EvalContext};
pub use instance::{Chunk, IMPLICIT_ARG_NAME, Instance, TemplateInstance};
pub use materialize::{add_to_list, to_list};
pub use normalize::{Cursor, Normalized, normalize};
pub use options::RenderOptions;
pub use pipeline::{DefaultPipeline, RenderEvent, RenderPipeline};
pub use value::{AttrValue, HostObject, LazySeq};
pub use writer::{
    AUTO_INDENT_WRITER, AttrWriter, AutoIndentWriter, NO_INDENT_WRITER, NoIndentWriter,
    WriterConstructor, WriterRegistry,
};
