/*
 * instance.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template instances as seen by the attribute layer.
//!
//! Compiling templates is not this crate's job. The binder only needs the
//! accessors in [`TemplateInstance`]; [`Instance`] is a concrete instance with
//! a tiny body (literal text and attribute references) so that nested
//! templates can be bound and rendered.

use std::collections::BTreeMap;

use crate::accessors::Accessor;
use crate::eval_context::EvalContext;
use crate::pipeline::RenderPipeline;
use crate::value::{AttrValue, HostObject};
use crate::writer::AttrWriter;

/// Name of the attribute that receives a value bound to a template without
/// an argument contract.
pub const IMPLICIT_ARG_NAME: &str = "it";

/// What the binder needs to know about a template instance.
pub trait TemplateInstance {
    fn name(&self) -> &str;

    /// Whether the template declares a formal-argument contract.
    fn has_formal_args(&self) -> bool;

    /// The declared formal arguments, or `None` if none were ever declared.
    fn formal_args(&self) -> Option<&[String]>;

    /// Argument slots, indexed by formal-argument position.
    fn locals(&self) -> &[AttrValue];

    fn locals_mut(&mut self) -> &mut [AttrValue];

    /// Add a value to a named attribute.
    fn add(&mut self, name: &str, value: AttrValue);
}

/// A piece of an instance body.
#[derive(Debug, Clone, PartialEq)]
pub enum Chunk {
    /// Literal text.
    Text(String),
    /// The value of an argument or attribute.
    Attr(String),
    /// An accessor applied to an argument or attribute (`$names:first()$`).
    Apply(Accessor, String),
}

/// A template instance with argument slots and ad-hoc attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    name: String,
    has_formal_args: bool,
    formal_args: Option<Vec<String>>,
    locals: Vec<AttrValue>,
    attributes: BTreeMap<String, AttrValue>,
    body: Vec<Chunk>,
}

impl Instance {
    /// Create an instance. `locals` gets one slot per formal argument.
    pub fn new(
        name: impl Into<String>,
        has_formal_args: bool,
        formal_args: Option<Vec<String>>,
    ) -> Self {
        let slots = formal_args.as_ref().map_or(0, Vec::len);
        Self {
            name: name.into(),
            has_formal_args,
            formal_args,
            locals: vec![AttrValue::Null; slots],
            attributes: BTreeMap::new(),
            body: Vec::new(),
        }
    }

    /// An instance without any argument contract (values go to `it`).
    pub fn untyped(name: impl Into<String>) -> Self {
        Self::new(name, false, None)
    }

    /// An instance declaring the given formal arguments.
    pub fn with_args<I, S>(name: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, true, Some(args.into_iter().map(Into::into).collect()))
    }

    /// An instance with an argument contract that declares nothing.
    pub fn without_args(name: impl Into<String>) -> Self {
        Self::new(name, true, None)
    }

    pub fn with_body(mut self, body: Vec<Chunk>) -> Self {
        self.body = body;
        self
    }

    /// Look up an argument or attribute by name. Formal arguments win.
    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        let slot = self
            .formal_args
            .as_ref()
            .and_then(|args| args.iter().position(|arg| arg == name));
        match slot {
            Some(i) => self.locals.get(i),
            None => self.attributes.get(name),
        }
    }
}

impl TemplateInstance for Instance {
    fn name(&self) -> &str {
        &self.name
    }

    fn has_formal_args(&self) -> bool {
        self.has_formal_args
    }

    fn formal_args(&self) -> Option<&[String]> {
        self.formal_args.as_deref()
    }

    fn locals(&self) -> &[AttrValue] {
        &self.locals
    }

    fn locals_mut(&mut self) -> &mut [AttrValue] {
        &mut self.locals
    }

    /// The first add stores the value; adding to the same name again turns
    /// the attribute into a list of everything added.
    fn add(&mut self, name: &str, value: AttrValue) {
        match self.attributes.get_mut(name) {
            None => {
                self.attributes.insert(name.to_string(), value);
            }
            Some(AttrValue::List(items)) => items.push(value),
            Some(existing) => {
                let previous = std::mem::take(existing);
                *existing = AttrValue::List(vec![previous, value]);
            }
        }
    }
}

impl HostObject for Instance {
    fn kind(&self) -> &str {
        "template"
    }

    fn render(
        &self,
        pipeline: &mut dyn RenderPipeline,
        out: &mut dyn AttrWriter,
        ctx: &mut EvalContext,
    ) -> usize {
        let mut n = 0;
        for chunk in &self.body {
            n += match chunk {
                Chunk::Text(text) => out.write_str(text),
                Chunk::Attr(name) => match self.get(name) {
                    Some(value) => pipeline.write_value(out, ctx, value),
                    None => 0,
                },
                Chunk::Apply(accessor, name) => {
                    let value = self.get(name).cloned().unwrap_or_default();
                    pipeline.write_value(out, ctx, &accessor.apply(&value))
                }
            };
        }
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_slots_follow_formal_args() {
        let instance = Instance::with_args("row", ["a", "b"]);
        assert_eq!(instance.locals().len(), 2);
        assert!(instance.has_formal_args());
        assert_eq!(instance.formal_args().map(<[String]>::len), Some(2));
    }

    #[test]
    fn test_untyped_and_without_args_differ() {
        let untyped = Instance::untyped("t");
        assert!(!untyped.has_formal_args());
        assert!(untyped.formal_args().is_none());

        let without = Instance::without_args("t");
        assert!(without.has_formal_args());
        assert!(without.formal_args().is_none());
    }

    #[test]
    fn test_add_accumulates() {
        let mut instance = Instance::untyped("t");
        instance.add("x", AttrValue::Int(1));
        assert_eq!(instance.get("x"), Some(&AttrValue::Int(1)));

        instance.add("x", AttrValue::Int(2));
        instance.add("x", AttrValue::Int(3));
        assert_eq!(
            instance.get("x"),
            Some(&AttrValue::List(vec![
                AttrValue::Int(1),
                AttrValue::Int(2),
                AttrValue::Int(3),
            ]))
        );
    }

    #[test]
    fn test_get_prefers_formal_args() {
        let mut instance = Instance::with_args("t", ["x"]);
        instance.add("x", AttrValue::string("attribute"));
        instance.locals_mut()[0] = AttrValue::string("slot");
        assert_eq!(instance.get("x"), Some(&AttrValue::string("slot")));
        assert_eq!(instance.get("missing"), None);
    }
}
