/*
 * normalize.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Normalization of attribute values into iteration handles.
//!
//! Every [`AttrValue`] normalizes to exactly one of three shapes: absent, a
//! single scalar, or a sequence. A sequence is a [`Cursor`], which is consumed
//! by value. Code that needs to look at the items twice must call
//! [`Cursor::materialize`] and work on the owned list.

use std::borrow::Cow;
use std::collections::btree_map;
use std::fmt;
use std::slice;

use crate::value::AttrValue;

/// The normalized form of an attribute value.
#[derive(Debug)]
pub enum Normalized<'a> {
    /// The value was null.
    Absent,

    /// A single value that is never decomposed.
    Scalar(&'a AttrValue),

    /// Zero or more values, read once, in order.
    Sequence(Cursor<'a>),
}

enum Source<'a> {
    Slice(slice::Iter<'a, AttrValue>),
    Keys(btree_map::Keys<'a, String, AttrValue>),
    OneShot {
        iter: Box<dyn Iterator<Item = AttrValue> + Send>,
        remaining: Option<usize>,
    },
}

/// A single-pass cursor over the items of a sequence.
pub struct Cursor<'a> {
    source: Source<'a>,
}

impl<'a> Cursor<'a> {
    /// The remaining item count, when the source can report it without
    /// being traversed.
    ///
    /// One-shot sources only know their length when it was recorded at
    /// construction ([`LazySeq::sized`](crate::value::LazySeq::sized)).
    pub fn exact_len(&self) -> Option<usize> {
        match &self.source {
            Source::Slice(iter) => Some(iter.len()),
            Source::Keys(iter) => Some(iter.len()),
            Source::OneShot { remaining, .. } => *remaining,
        }
    }

    /// The remaining items as a slice, for indexable sources.
    pub fn as_slice(&self) -> Option<&'a [AttrValue]> {
        match &self.source {
            Source::Slice(iter) => Some(iter.as_slice()),
            _ => None,
        }
    }

    /// Copy the remaining items into an owned list.
    pub fn materialize(self) -> Vec<AttrValue> {
        match self.source {
            Source::Slice(iter) => iter.as_slice().to_vec(),
            source => Cursor { source }.map(Cow::into_owned).collect(),
        }
    }
}

impl<'a> Iterator for Cursor<'a> {
    type Item = Cow<'a, AttrValue>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.source {
            Source::Slice(iter) => iter.next().map(Cow::Borrowed),
            Source::Keys(iter) => iter
                .next()
                .map(|key| Cow::Owned(AttrValue::String(key.clone()))),
            Source::OneShot { iter, remaining } => {
                let item = iter.next()?;
                if let Some(n) = remaining {
                    *n = n.saturating_sub(1);
                }
                Some(Cow::Owned(item))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.source {
            Source::Slice(iter) => iter.size_hint(),
            Source::Keys(iter) => iter.size_hint(),
            Source::OneShot { iter, .. } => iter.size_hint(),
        }
    }
}

impl fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.source {
            Source::Slice(_) => "slice",
            Source::Keys(_) => "keys",
            Source::OneShot { .. } => "one-shot",
        };
        f.debug_struct("Cursor")
            .field("source", &kind)
            .field("exact_len", &self.exact_len())
            .finish()
    }
}

/// Normalize an attribute value.
///
/// Lists iterate their elements, maps iterate their keys in key order, and
/// lazy sequences hand over their iterator. A lazy sequence that was already
/// consumed normalizes to an empty sequence.
pub fn normalize(value: &AttrValue) -> Normalized<'_> {
    let source = match value {
        AttrValue::Null => return Normalized::Absent,
        AttrValue::List(items) => Source::Slice(items.iter()),
        AttrValue::Map(map) => Source::Keys(map.keys()),
        AttrValue::Lazy(seq) => match seq.take() {
            Some(iter) => Source::OneShot {
                iter,
                remaining: seq.known_len(),
            },
            None => {
                tracing::warn!("single-pass attribute sequence was already consumed");
                Source::OneShot {
                    iter: Box::new(std::iter::empty()),
                    remaining: Some(0),
                }
            }
        },
        other => return Normalized::Scalar(other),
    };
    Normalized::Sequence(Cursor { source })
}
