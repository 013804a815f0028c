/*
 * pipeline.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The rendering pipeline.
//!
//! A [`RenderPipeline`] turns an attribute value into text on a writer,
//! recursively rendering sequences and host objects (nested templates render
//! their bodies back through the same pipeline).

use crate::eval_context::EvalContext;
use crate::normalize::{Normalized, normalize};
use crate::options::RenderOptions;
use crate::value::AttrValue;
use crate::writer::AttrWriter;

/// Renders attribute values into writers.
pub trait RenderPipeline {
    /// Whether debug instrumentation is enabled.
    fn is_debug(&self) -> bool;

    /// Fully render `value` into `out`, returning the number of characters
    /// written.
    fn write_value(
        &mut self,
        out: &mut dyn AttrWriter,
        ctx: &mut EvalContext,
        value: &AttrValue,
    ) -> usize;
}

/// A render pass recorded in debug mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderEvent {
    /// Kind of the rendered value (see [`AttrValue::kind_name`]).
    pub value_kind: String,
    /// Writer index before the value was rendered.
    pub start: usize,
    /// Writer index after the value was rendered.
    pub stop: usize,
    /// Nesting depth of the value.
    pub depth: usize,
}

/// The standard pipeline.
///
/// Null renders nothing, primitive scalars render their text, sequences
/// render their items back to back, and host objects render themselves.
/// Values nested deeper than the context's `max_depth` are skipped.
#[derive(Debug, Default)]
pub struct DefaultPipeline {
    debug: bool,
    events: Vec<RenderEvent>,
}

impl DefaultPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pipeline configured from render options.
    pub fn with_options(options: &RenderOptions) -> Self {
        Self::new().with_debug(options.debug)
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Events recorded so far (debug mode only).
    pub fn events(&self) -> &[RenderEvent] {
        &self.events
    }

    /// Drain the recorded events.
    pub fn take_events(&mut self) -> Vec<RenderEvent> {
        std::mem::take(&mut self.events)
    }
}

impl RenderPipeline for DefaultPipeline {
    fn is_debug(&self) -> bool {
        self.debug
    }

    fn write_value(
        &mut self,
        out: &mut dyn AttrWriter,
        ctx: &mut EvalContext,
        value: &AttrValue,
    ) -> usize {
        if ctx.depth >= ctx.max_depth {
            tracing::trace!(
                depth = ctx.depth,
                kind = value.kind_name(),
                "max render depth reached; skipping value"
            );
            return 0;
        }

        let start = out.index();
        ctx.depth += 1;
        let written = match normalize(value) {
            Normalized::Absent => 0,
            Normalized::Scalar(AttrValue::Object(obj)) => obj.render(self, out, ctx),
            Normalized::Scalar(scalar) => match scalar.scalar_text() {
                Some(text) => out.write_str(&text),
                None => 0,
            },
            Normalized::Sequence(items) => {
                let mut n = 0;
                for item in items {
                    n += self.write_value(out, ctx, &item);
                }
                n
            }
        };
        ctx.depth -= 1;

        if self.debug && !ctx.early_eval {
            self.events.push(RenderEvent {
                value_kind: value.kind_name().to_string(),
                start,
                stop: out.index(),
                depth: ctx.depth,
            });
        }
        written
    }
}
