/*
 * coerce.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Coercing attribute values to strings.

use crate::diagnostic::AttrDiagnostic;
use crate::eval_context::EvalContext;
use crate::pipeline::RenderPipeline;
use crate::value::AttrValue;
use crate::writer::{AttrWriter, AutoIndentWriter, WriterRegistry};

/// Render `value` to a string.
///
/// Null yields `None` and strings are returned as-is without touching the
/// pipeline. Anything else is rendered by `pipeline` into a fresh writer of
/// the same kind as `out`. If the registry cannot build that kind, the
/// registry's default kind is used instead (an [`AutoIndentWriter`] when that
/// is missing too) and a `WriterConstructionIssue` is reported.
///
/// In debug mode the render happens in an early-eval child context, so it is
/// not recorded as a top-level render pass.
pub fn to_string(
    pipeline: &mut dyn RenderPipeline,
    registry: &WriterRegistry,
    out: &dyn AttrWriter,
    ctx: &mut EvalContext,
    value: &AttrValue,
) -> Option<String> {
    match value {
        AttrValue::Null => return None,
        AttrValue::String(s) => return Some(s.clone()),
        _ => {}
    }

    let mut writer = match registry.build_like(out) {
        Ok(writer) => writer,
        Err(err) => {
            let fallback: Box<dyn AttrWriter> = match registry.build_default() {
                Ok(writer) => writer,
                Err(_) => Box::new(AutoIndentWriter::new()),
            };
            tracing::debug!(%err, fallback = fallback.kind(), "falling back to the default writer");
            ctx.report(AttrDiagnostic::WriterConstructionIssue {
                writer_kind: out.kind().to_string(),
                fallback_kind: fallback.kind().to_string(),
            });
            fallback
        }
    };

    if pipeline.is_debug() && !ctx.early_eval {
        let mut early = ctx.early_eval_child();
        pipeline.write_value(writer.as_mut(), &mut early, value);
        ctx.merge_diagnostics(early);
    } else {
        pipeline.write_value(writer.as_mut(), ctx, value);
    }

    tracing::trace!(kind = value.kind_name(), "coerced attribute to string");
    Some(writer.into_output())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticKind;
    use crate::pipeline::DefaultPipeline;
    use crate::writer::{AUTO_INDENT_WRITER, NO_INDENT_WRITER, NoIndentWriter};
    use pretty_assertions::assert_eq;

    /// Pipeline stub that counts calls and writes a marker.
    #[derive(Default)]
    struct CountingPipeline {
        debug: bool,
        calls: usize,
        early_eval_seen: Vec<bool>,
    }

    impl RenderPipeline for CountingPipeline {
        fn is_debug(&self) -> bool {
            self.debug
        }

        fn write_value(
            &mut self,
            out: &mut dyn AttrWriter,
            ctx: &mut EvalContext,
            _value: &AttrValue,
        ) -> usize {
            self.calls += 1;
            self.early_eval_seen.push(ctx.early_eval);
            let kind = out.kind().to_string();
            out.write_str(&kind)
        }
    }

    /// A writer whose kind nobody registered.
    struct UnregisteredWriter;

    impl AttrWriter for UnregisteredWriter {
        fn kind(&self) -> &str {
            "unregistered"
        }
        fn push_indentation(&mut self, _indent: &str) {}
        fn pop_indentation(&mut self) -> Option<String> {
            None
        }
        fn write_str(&mut self, _s: &str) -> usize {
            0
        }
        fn index(&self) -> usize {
            0
        }
        fn output(&self) -> &str {
            ""
        }
        fn into_output(self: Box<Self>) -> String {
            String::new()
        }
    }

    #[test]
    fn test_null_is_none() {
        let mut pipeline = CountingPipeline::default();
        let mut ctx = EvalContext::new();
        let out = AutoIndentWriter::new();
        let result = to_string(
            &mut pipeline,
            &WriterRegistry::new(),
            &out,
            &mut ctx,
            &AttrValue::Null,
        );
        assert_eq!(result, None);
        assert_eq!(pipeline.calls, 0);
    }

    #[test]
    fn test_string_skips_pipeline() {
        let mut pipeline = CountingPipeline::default();
        let mut ctx = EvalContext::new();
        let out = AutoIndentWriter::new();
        let result = to_string(
            &mut pipeline,
            &WriterRegistry::new(),
            &out,
            &mut ctx,
            &AttrValue::string("already text"),
        );
        assert_eq!(result.as_deref(), Some("already text"));
        assert_eq!(pipeline.calls, 0);
    }

    #[test]
    fn test_uses_writer_of_same_kind() {
        let mut pipeline = CountingPipeline::default();
        let mut ctx = EvalContext::new();
        let out = NoIndentWriter::new();
        let result = to_string(
            &mut pipeline,
            &WriterRegistry::new(),
            &out,
            &mut ctx,
            &AttrValue::Int(3),
        );
        assert_eq!(result.as_deref(), Some(NO_INDENT_WRITER));
        assert_eq!(pipeline.calls, 1);
        assert!(ctx.diagnostics.is_empty());
    }

    #[test]
    fn test_unknown_writer_falls_back() {
        let mut pipeline = CountingPipeline::default();
        let mut ctx = EvalContext::new();
        let result = to_string(
            &mut pipeline,
            &WriterRegistry::new(),
            &UnregisteredWriter,
            &mut ctx,
            &AttrValue::Int(3),
        );
        // Rendering still happens, on the default writer
        assert_eq!(result.as_deref(), Some("auto-indent"));

        let diagnostics = ctx.into_diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code.as_deref(), Some("Q-12-2"));
        assert_eq!(diagnostics[0].kind, DiagnosticKind::Warning);
        assert_eq!(
            diagnostics[0].problem.as_deref(),
            Some("cannot construct a writer of kind unregistered")
        );
    }

    #[test]
    fn test_fallback_uses_configured_default_kind() {
        let mut pipeline = CountingPipeline::default();
        let mut ctx = EvalContext::new();
        let registry = WriterRegistry::new().with_default_kind(NO_INDENT_WRITER);
        let result = to_string(
            &mut pipeline,
            &registry,
            &UnregisteredWriter,
            &mut ctx,
            &AttrValue::Int(3),
        );
        assert_eq!(result.as_deref(), Some(NO_INDENT_WRITER));

        let diagnostics = ctx.into_diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].details[0].content,
            "Rendering continues with the `no-indent` writer"
        );
    }

    #[test]
    fn test_fallback_without_default_kind_uses_auto_indent() {
        let mut pipeline = CountingPipeline::default();
        let mut ctx = EvalContext::new();
        let registry = WriterRegistry::empty().with_default_kind(NO_INDENT_WRITER);
        let result = to_string(
            &mut pipeline,
            &registry,
            &UnregisteredWriter,
            &mut ctx,
            &AttrValue::Int(3),
        );
        assert_eq!(result.as_deref(), Some(AUTO_INDENT_WRITER));
        assert_eq!(ctx.into_diagnostics().len(), 1);
    }

    #[test]
    fn test_debug_mode_marks_early_eval() {
        let mut pipeline = CountingPipeline {
            debug: true,
            ..CountingPipeline::default()
        };
        let mut ctx = EvalContext::new();
        let out = AutoIndentWriter::new();
        to_string(
            &mut pipeline,
            &WriterRegistry::new(),
            &out,
            &mut ctx,
            &AttrValue::Bool(true),
        );
        assert_eq!(pipeline.early_eval_seen, vec![true]);
        assert!(!ctx.early_eval);
    }

    #[test]
    fn test_non_debug_mode_uses_context_directly() {
        let mut pipeline = CountingPipeline::default();
        let mut ctx = EvalContext::new();
        let out = AutoIndentWriter::new();
        to_string(
            &mut pipeline,
            &WriterRegistry::new(),
            &out,
            &mut ctx,
            &AttrValue::Bool(true),
        );
        assert_eq!(pipeline.early_eval_seen, vec![false]);
    }

    #[test]
    fn test_default_pipeline_renders_lists() {
        let mut pipeline = DefaultPipeline::new().with_debug(true);
        let mut ctx = EvalContext::new();
        let out = AutoIndentWriter::new();
        let value = AttrValue::List(vec![
            AttrValue::string("a"),
            AttrValue::Null,
            AttrValue::Int(1),
        ]);
        let result = to_string(&mut pipeline, &WriterRegistry::new(), &out, &mut ctx, &value);
        assert_eq!(result.as_deref(), Some("a1"));
        // Early evaluation is not recorded as a render pass
        assert!(pipeline.events().is_empty());
    }
}
