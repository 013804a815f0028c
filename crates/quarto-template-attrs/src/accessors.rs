/*
 * accessors.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Multi-value accessors.
//!
//! These are the operations behind template expressions such as
//! `$names:first()$`. They treat every attribute as a sequence of zero, one
//! or many values, so a template never has to check whether an attribute is
//! "really" a list:
//!
//! | accessor  | null | scalar `x` | sequence                          |
//! |-----------|------|------------|-----------------------------------|
//! | `first`   | null | `x`        | first item, or null when empty    |
//! | `last`    | null | `x`        | last item, or null when empty     |
//! | `rest`    | null | null       | all but the first; null if <= 1   |
//! | `trunc`   | null | null       | all but the last; null if <= 1    |
//! | `strip`   | null | `x`        | items with nulls removed          |
//! | `reverse` | null | `x`        | items reversed, nulls kept        |
//! | `length`  | 0    | 1          | item count                        |

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::error::AttrError;
use crate::normalize::{Normalized, normalize};
use crate::value::AttrValue;

/// Return the first item of a multi-valued attribute, or the attribute itself.
pub fn first(value: &AttrValue) -> AttrValue {
    match normalize(value) {
        Normalized::Absent => AttrValue::Null,
        Normalized::Scalar(v) => v.clone(),
        Normalized::Sequence(mut items) => items.next().map(Cow::into_owned).unwrap_or_default(),
    }
}

/// Return the last item of a multi-valued attribute, or the attribute itself.
///
/// Lists are indexed directly. Other sequences are walked to the end.
pub fn last(value: &AttrValue) -> AttrValue {
    match normalize(value) {
        Normalized::Absent => AttrValue::Null,
        Normalized::Scalar(v) => v.clone(),
        Normalized::Sequence(items) => match items.as_slice() {
            Some(slice) => slice.last().cloned().unwrap_or_default(),
            None => items.last().map(Cow::into_owned).unwrap_or_default(),
        },
    }
}

/// Return everything but the first item. Null for scalars.
pub fn rest(value: &AttrValue) -> AttrValue {
    match normalize(value) {
        Normalized::Absent | Normalized::Scalar(_) => AttrValue::Null,
        Normalized::Sequence(mut items) => {
            if let Some(slice) = items.as_slice() {
                return match slice {
                    [] | [_] => AttrValue::Null,
                    [_, tail @ ..] => AttrValue::List(tail.to_vec()),
                };
            }
            if items.next().is_none() {
                return AttrValue::Null;
            }
            let tail: Vec<AttrValue> = items.map(Cow::into_owned).collect();
            if tail.is_empty() {
                AttrValue::Null
            } else {
                AttrValue::List(tail)
            }
        }
    }
}

/// Return everything but the last item. Null for scalars.
pub fn trunc(value: &AttrValue) -> AttrValue {
    match normalize(value) {
        Normalized::Absent | Normalized::Scalar(_) => AttrValue::Null,
        Normalized::Sequence(items) => {
            if let Some(slice) = items.as_slice() {
                return match slice {
                    [] | [_] => AttrValue::Null,
                    [init @ .., _] => AttrValue::List(init.to_vec()),
                };
            }
            let mut all = items.materialize();
            if all.len() <= 1 {
                return AttrValue::Null;
            }
            all.pop();
            AttrValue::List(all)
        }
    }
}

/// Return the items without null values. A scalar is returned unchanged.
pub fn strip(value: &AttrValue) -> AttrValue {
    match normalize(value) {
        Normalized::Absent => AttrValue::Null,
        Normalized::Scalar(v) => v.clone(),
        Normalized::Sequence(items) => AttrValue::List(
            items
                .filter(|item| !item.is_null())
                .map(Cow::into_owned)
                .collect(),
        ),
    }
}

/// Return the items in reverse order.
///
/// Null items are kept; use `reverse(strip(v))` to drop them.
pub fn reverse(value: &AttrValue) -> AttrValue {
    match normalize(value) {
        Normalized::Absent => AttrValue::Null,
        Normalized::Scalar(v) => v.clone(),
        Normalized::Sequence(items) => {
            let mut all = items.materialize();
            all.reverse();
            AttrValue::List(all)
        }
    }
}

/// Return the number of items: 0 for null, 1 for a scalar.
///
/// Lists, maps and lazy sequences built with a recorded length report their
/// size directly; anything else is counted in one pass.
pub fn length(value: &AttrValue) -> usize {
    match normalize(value) {
        Normalized::Absent => 0,
        Normalized::Scalar(_) => 1,
        Normalized::Sequence(items) => match items.exact_len() {
            Some(len) => len,
            None => items.count(),
        },
    }
}

/// A multi-value accessor, addressable by the name templates use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Accessor {
    First,
    Last,
    Rest,
    Trunc,
    Strip,
    Reverse,
    Length,
}

impl Accessor {
    /// All accessors, in documentation order.
    pub const ALL: [Accessor; 7] = [
        Accessor::First,
        Accessor::Last,
        Accessor::Rest,
        Accessor::Trunc,
        Accessor::Strip,
        Accessor::Reverse,
        Accessor::Length,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Accessor::First => "first",
            Accessor::Last => "last",
            Accessor::Rest => "rest",
            Accessor::Trunc => "trunc",
            Accessor::Strip => "strip",
            Accessor::Reverse => "reverse",
            Accessor::Length => "length",
        }
    }

    /// Apply this accessor. `length` produces an `Int`.
    pub fn apply(self, value: &AttrValue) -> AttrValue {
        match self {
            Accessor::First => first(value),
            Accessor::Last => last(value),
            Accessor::Rest => rest(value),
            Accessor::Trunc => trunc(value),
            Accessor::Strip => strip(value),
            Accessor::Reverse => reverse(value),
            Accessor::Length => {
                AttrValue::Int(i64::try_from(length(value)).unwrap_or(i64::MAX))
            }
        }
    }
}

impl fmt::Display for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Accessor {
    type Err = AttrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Accessor::ALL
            .into_iter()
            .find(|accessor| accessor.name() == s)
            .ok_or_else(|| AttrError::UnknownAccessor {
                name: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn s(text: &str) -> AttrValue {
        AttrValue::string(text)
    }

    fn list(items: &[&str]) -> AttrValue {
        AttrValue::List(items.iter().map(|t| s(t)).collect())
    }

    #[test]
    fn test_absent() {
        let null = AttrValue::Null;
        assert_eq!(first(&null), AttrValue::Null);
        assert_eq!(last(&null), AttrValue::Null);
        assert_eq!(rest(&null), AttrValue::Null);
        assert_eq!(trunc(&null), AttrValue::Null);
        assert_eq!(strip(&null), AttrValue::Null);
        assert_eq!(reverse(&null), AttrValue::Null);
        assert_eq!(length(&null), 0);
    }

    #[test]
    fn test_scalar() {
        let x = s("x");
        assert_eq!(first(&x), x);
        assert_eq!(last(&x), x);
        assert_eq!(rest(&x), AttrValue::Null);
        assert_eq!(trunc(&x), AttrValue::Null);
        assert_eq!(strip(&x), x);
        assert_eq!(reverse(&x), x);
        assert_eq!(length(&x), 1);
    }

    #[test]
    fn test_empty_string_is_still_one_value() {
        let empty = s("");
        assert_eq!(strip(&empty), empty);
        assert_eq!(length(&empty), 1);
    }

    #[test]
    fn test_list_with_nulls() {
        let v = AttrValue::List(vec![s("A"), AttrValue::Null, s("B"), s("C")]);
        assert_eq!(first(&v), s("A"));
        assert_eq!(last(&v), s("C"));
        assert_eq!(strip(&v), list(&["A", "B", "C"]));
        assert_eq!(
            reverse(&v),
            AttrValue::List(vec![s("C"), s("B"), AttrValue::Null, s("A")])
        );
        assert_eq!(
            trunc(&v),
            AttrValue::List(vec![s("A"), AttrValue::Null, s("B")])
        );
        assert_eq!(
            rest(&v),
            AttrValue::List(vec![AttrValue::Null, s("B"), s("C")])
        );
        assert_eq!(length(&v), 4);
    }

    #[test]
    fn test_single_item_list() {
        let v = list(&["only"]);
        assert_eq!(first(&v), s("only"));
        assert_eq!(last(&v), s("only"));
        assert_eq!(rest(&v), AttrValue::Null);
        assert_eq!(trunc(&v), AttrValue::Null);
    }

    #[test]
    fn test_empty_list() {
        let v = AttrValue::List(vec![]);
        assert_eq!(first(&v), AttrValue::Null);
        assert_eq!(last(&v), AttrValue::Null);
        assert_eq!(rest(&v), AttrValue::Null);
        assert_eq!(trunc(&v), AttrValue::Null);
        assert_eq!(strip(&v), AttrValue::List(vec![]));
        assert_eq!(reverse(&v), AttrValue::List(vec![]));
        assert_eq!(length(&v), 0);
    }

    #[test]
    fn test_empty_lazy_last_is_absent() {
        let v = AttrValue::lazy(Vec::new());
        assert_eq!(last(&v), AttrValue::Null);
    }

    #[test]
    fn test_lazy_sequences() {
        let items = || vec![s("a"), s("b"), s("c")];
        assert_eq!(first(&AttrValue::lazy(items())), s("a"));
        assert_eq!(last(&AttrValue::lazy(items())), s("c"));
        assert_eq!(rest(&AttrValue::lazy(items())), list(&["b", "c"]));
        assert_eq!(trunc(&AttrValue::lazy(items())), list(&["a", "b"]));
        assert_eq!(reverse(&AttrValue::lazy(items())), list(&["c", "b", "a"]));
        assert_eq!(rest(&AttrValue::lazy(vec![s("a")])), AttrValue::Null);
        assert_eq!(trunc(&AttrValue::lazy(vec![s("a")])), AttrValue::Null);
    }

    #[test]
    fn test_length_counts_unsized_lazy() {
        let v = AttrValue::lazy((1..=9).filter(|i| i % 3 == 0).map(AttrValue::Int));
        assert_eq!(length(&v), 3);
    }

    /// Yields two items while claiming an exact size of five.
    struct MisreportedSize(usize);

    impl Iterator for MisreportedSize {
        type Item = AttrValue;

        fn next(&mut self) -> Option<AttrValue> {
            if self.0 == 0 {
                return None;
            }
            self.0 -= 1;
            Some(AttrValue::Int(self.0 as i64))
        }

        fn size_hint(&self) -> (usize, Option<usize>) {
            (5, Some(5))
        }
    }

    #[test]
    fn test_length_ignores_size_hint() {
        assert_eq!(length(&AttrValue::lazy(MisreportedSize(2))), 2);
    }

    #[test]
    fn test_length_of_sized_lazy() {
        assert_eq!(length(&AttrValue::lazy_sized(vec![s("a"), s("b")])), 2);
    }

    #[test]
    fn test_strip_lazy() {
        let v = AttrValue::lazy(vec![s("a"), AttrValue::Null, s("b")]);
        assert_eq!(strip(&v), list(&["a", "b"]));
    }

    #[test]
    fn test_map_accessors_use_keys() {
        let mut map = BTreeMap::new();
        map.insert("x".to_string(), AttrValue::Int(1));
        map.insert("y".to_string(), AttrValue::Int(2));
        let v = AttrValue::Map(map);
        assert_eq!(length(&v), 2);
        assert_eq!(first(&v), s("x"));
        assert_eq!(last(&v), s("y"));
    }

    #[test]
    fn test_nested_lists_are_items() {
        let inner = list(&["a", "b"]);
        let v = AttrValue::List(vec![inner.clone(), s("c")]);
        assert_eq!(first(&v), inner);
        assert_eq!(length(&v), 2);
    }

    #[test]
    fn test_accessor_names_round_trip() {
        for accessor in Accessor::ALL {
            assert_eq!(accessor.name().parse::<Accessor>().unwrap(), accessor);
        }
        assert!(matches!(
            "middle".parse::<Accessor>(),
            Err(AttrError::UnknownAccessor { name }) if name == "middle"
        ));
    }

    #[test]
    fn test_accessor_apply() {
        let v = list(&["a", "b"]);
        assert_eq!(Accessor::Length.apply(&v), AttrValue::Int(2));
        assert_eq!(Accessor::Last.apply(&v), s("b"));
        assert_eq!(Accessor::Length.apply(&AttrValue::Null), AttrValue::Int(0));
    }
}
