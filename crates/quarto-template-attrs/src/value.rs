/*
 * value.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Attribute value types.
//!
//! An [`AttrValue`] is whatever a caller binds to a template attribute. The
//! variants form a closed set: `Null` is the absent value, `List`, `Map` and
//! `Lazy` are sequence-like, and everything else is a single value that is
//! never decomposed (strings are not sequences of characters).

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use crate::eval_context::EvalContext;
use crate::pipeline::RenderPipeline;
use crate::writer::AttrWriter;

/// An opaque host object bound as an attribute.
///
/// The multi-value model treats host objects as scalars. How they turn into
/// text is up to the object itself; nested templates are host objects that
/// render their body back through the pipeline.
pub trait HostObject: fmt::Debug + Send + Sync {
    /// Short name of the concrete kind, used in diagnostics and debug events.
    fn kind(&self) -> &str;

    /// Render this object into `out`, returning the number of characters written.
    fn render(
        &self,
        pipeline: &mut dyn RenderPipeline,
        out: &mut dyn AttrWriter,
        ctx: &mut EvalContext,
    ) -> usize;
}

type BoxedIter = Box<dyn Iterator<Item = AttrValue> + Send>;

/// A single-pass source of attribute values, such as a generator.
///
/// Clones share the same underlying source. The iterator is handed out
/// exactly once; afterwards the sequence reads as empty.
#[derive(Clone)]
pub struct LazySeq {
    source: Arc<Mutex<Option<BoxedIter>>>,
    len: Option<usize>,
}

impl LazySeq {
    /// Wrap an iterator as a one-shot attribute sequence.
    pub fn new<I>(items: I) -> Self
    where
        I: IntoIterator<Item = AttrValue>,
        I::IntoIter: Send + 'static,
    {
        Self {
            source: Arc::new(Mutex::new(Some(Box::new(items.into_iter())))),
            len: None,
        }
    }

    /// Wrap an exactly-sized iterator, recording its length up front.
    ///
    /// Only sequences built this way report their length without being
    /// traversed; `size_hint` is never trusted for that.
    pub fn sized<I>(items: I) -> Self
    where
        I: IntoIterator<Item = AttrValue>,
        I::IntoIter: ExactSizeIterator + Send + 'static,
    {
        let iter = items.into_iter();
        let len = iter.len();
        Self {
            source: Arc::new(Mutex::new(Some(Box::new(iter)))),
            len: Some(len),
        }
    }

    /// The length recorded at construction, if any.
    pub fn known_len(&self) -> Option<usize> {
        self.len
    }

    /// Take the underlying iterator, leaving this source consumed.
    pub(crate) fn take(&self) -> Option<BoxedIter> {
        // A poisoned lock still guards a usable Option.
        let mut guard = self
            .source
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.take()
    }

    /// Whether the iterator has already been handed out.
    pub fn is_consumed(&self) -> bool {
        self.source
            .lock()
            .map(|guard| guard.is_none())
            .unwrap_or(true)
    }
}

impl fmt::Debug for LazySeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazySeq")
            .field("consumed", &self.is_consumed())
            .finish()
    }
}

impl PartialEq for LazySeq {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.source, &other.source)
    }
}

/// A value bound to a template attribute.
#[derive(Debug, Clone)]
pub enum AttrValue {
    /// No value.
    Null,

    /// Text. Always a single value.
    String(String),

    /// A boolean value.
    Bool(bool),

    /// An integer value.
    Int(i64),

    /// A floating point value.
    Float(f64),

    /// An ordered, indexable list of values.
    List(Vec<AttrValue>),

    /// A map of string keys to values. As a sequence it yields its keys.
    Map(BTreeMap<String, AttrValue>),

    /// A single-pass sequence.
    Lazy(LazySeq),

    /// An opaque host object, including nested template instances.
    Object(Arc<dyn HostObject>),
}

impl AttrValue {
    /// Build a string value.
    pub fn string(s: impl Into<String>) -> Self {
        AttrValue::String(s.into())
    }

    /// Build a one-shot sequence from an iterator.
    pub fn lazy<I>(items: I) -> Self
    where
        I: IntoIterator<Item = AttrValue>,
        I::IntoIter: Send + 'static,
    {
        AttrValue::Lazy(LazySeq::new(items))
    }

    /// Build a one-shot sequence whose length is known without traversal.
    pub fn lazy_sized<I>(items: I) -> Self
    where
        I: IntoIterator<Item = AttrValue>,
        I::IntoIter: ExactSizeIterator + Send + 'static,
    {
        AttrValue::Lazy(LazySeq::sized(items))
    }

    /// Wrap a host object.
    pub fn object(obj: impl HostObject + 'static) -> Self {
        AttrValue::Object(Arc::new(obj))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttrValue::Null)
    }

    /// Get the text if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Name of the variant, or of the host object's kind.
    pub fn kind_name(&self) -> &str {
        match self {
            AttrValue::Null => "null",
            AttrValue::String(_) => "string",
            AttrValue::Bool(_) => "bool",
            AttrValue::Int(_) => "int",
            AttrValue::Float(_) => "float",
            AttrValue::List(_) => "list",
            AttrValue::Map(_) => "map",
            AttrValue::Lazy(_) => "lazy",
            AttrValue::Object(obj) => obj.kind(),
        }
    }

    /// Text form of a primitive scalar.
    ///
    /// Returns `None` for null, sequences and host objects, which need the
    /// rendering pipeline.
    pub fn scalar_text(&self) -> Option<Cow<'_, str>> {
        match self {
            AttrValue::String(s) => Some(Cow::Borrowed(s)),
            AttrValue::Bool(b) => Some(Cow::Owned(b.to_string())),
            AttrValue::Int(i) => Some(Cow::Owned(i.to_string())),
            AttrValue::Float(f) => Some(Cow::Owned(f.to_string())),
            _ => None,
        }
    }
}

impl Default for AttrValue {
    fn default() -> Self {
        AttrValue::Null
    }
}

impl PartialEq for AttrValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (AttrValue::Null, AttrValue::Null) => true,
            (AttrValue::String(a), AttrValue::String(b)) => a == b,
            (AttrValue::Bool(a), AttrValue::Bool(b)) => a == b,
            (AttrValue::Int(a), AttrValue::Int(b)) => a == b,
            (AttrValue::Float(a), AttrValue::Float(b)) => a == b,
            (AttrValue::List(a), AttrValue::List(b)) => a == b,
            (AttrValue::Map(a), AttrValue::Map(b)) => a == b,
            (AttrValue::Lazy(a), AttrValue::Lazy(b)) => a == b,
            // Host objects compare by identity.
            (AttrValue::Object(a), AttrValue::Object(b)) => {
                std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            _ => false,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::String(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::String(s)
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        AttrValue::Bool(b)
    }
}

impl From<i64> for AttrValue {
    fn from(i: i64) -> Self {
        AttrValue::Int(i)
    }
}

impl From<f64> for AttrValue {
    fn from(f: f64) -> Self {
        AttrValue::Float(f)
    }
}

impl From<Vec<AttrValue>> for AttrValue {
    fn from(items: Vec<AttrValue>) -> Self {
        AttrValue::List(items)
    }
}

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(AttrValue::Null, Into::into)
    }
}

impl From<serde_json::Value> for AttrValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => AttrValue::Null,
            Value::Bool(b) => AttrValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => AttrValue::Int(i),
                None => AttrValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => AttrValue::String(s),
            Value::Array(items) => AttrValue::List(items.into_iter().map(Into::into).collect()),
            Value::Object(map) => {
                AttrValue::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}
