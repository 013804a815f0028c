/*
 * binder.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Binding an attribute as a template's first argument.

use crate::diagnostic::AttrDiagnostic;
use crate::eval_context::EvalContext;
use crate::instance::{IMPLICIT_ARG_NAME, TemplateInstance};
use crate::value::AttrValue;

/// Where a bound value ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// Added under [`IMPLICIT_ARG_NAME`].
    Implicit,
    /// Stored in argument slot 0.
    FirstSlot,
    /// Not bound; an argument-count mismatch was reported.
    Rejected,
}

/// Bind `value` as the first argument of `instance`.
///
/// Templates without an argument contract receive the value as the implicit
/// `it` attribute. Templates with declared arguments receive it in slot 0.
/// A template whose contract declares no arguments cannot receive it: an
/// `ArgumentCountMismatch` is reported and the instance is left untouched.
pub fn set_first_argument(
    ctx: &mut EvalContext,
    instance: &mut dyn TemplateInstance,
    value: AttrValue,
) -> Binding {
    if !instance.has_formal_args() && instance.formal_args().is_none() {
        instance.add(IMPLICIT_ARG_NAME, value);
        return Binding::Implicit;
    }

    let declared = instance.formal_args().map_or(0, <[String]>::len);
    if declared > 0 {
        if let Some(slot) = instance.locals_mut().first_mut() {
            *slot = value;
            return Binding::FirstSlot;
        }
    }

    tracing::debug!(
        template = instance.name(),
        declared,
        "cannot bind first argument"
    );
    ctx.report(AttrDiagnostic::ArgumentCountMismatch {
        expected: 1,
        actual: instance.locals().len(),
        instance_name: instance.name().to_string(),
    });
    Binding::Rejected
}
