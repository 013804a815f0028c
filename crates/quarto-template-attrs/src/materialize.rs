/*
 * materialize.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Flattening attribute values into concrete lists.
//!
//! Used when assembling the inputs of a repeated section: each attribute
//! contributes its items (one level deep) or itself.

use std::borrow::Cow;

use crate::normalize::{Normalized, normalize};
use crate::value::AttrValue;

/// Append `value` to `list`.
///
/// A sequence contributes each of its items in order; items that are
/// themselves sequences are appended as single items. Anything else,
/// including null, is appended as one item.
pub fn add_to_list(list: &mut Vec<AttrValue>, value: &AttrValue) {
    match normalize(value) {
        Normalized::Sequence(items) => list.extend(items.map(Cow::into_owned)),
        Normalized::Scalar(v) => list.push(v.clone()),
        Normalized::Absent => list.push(AttrValue::Null),
    }
}

/// Materialize `value` into a fresh list.
pub fn to_list(value: &AttrValue) -> Vec<AttrValue> {
    let mut list = Vec::new();
    add_to_list(&mut list, value);
    list
}
