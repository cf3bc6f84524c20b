//! Library of reusable processors.
//!
//! Batch reducers ([`Identity`], [`TakeFirst`], [`Join`], [`Take`],
//! [`TakeOne`], [`RegexExtract`]) work on a whole batch. The remaining
//! processors use single/multiple dispatch: a list input is processed element
//! by element (null elements dropped, results not flattened), `Null` stays
//! `Null`, and any other scalar is processed directly.

mod links;
mod markup;
mod pattern;
mod select;
mod take;
mod text;

pub use links::{JoinCanonicalizeUrl, canonicalize_url};
pub use markup::{RemoveTag, ReplaceTag, remove_tags, remove_tags_with_content, replace_tags};
pub use pattern::{RegexExtract, Replace, Split};
pub use select::SelectExtract;
pub use take::{Identity, Join, Take, TakeFirst, TakeOne};
pub use text::Strip;

use gleaner_model::{LoaderError, Result, Value};

/// Apply `f` to one value or to every non-null element of a list.
pub(crate) fn map_single<F>(value: Value, mut f: F) -> Result<Value>
where
    F: FnMut(Value) -> Result<Value>,
{
    match value {
        Value::Null => Ok(Value::Null),
        Value::List(items) => items
            .into_iter()
            .filter(|item| !item.is_null())
            .map(&mut f)
            .collect::<Result<Vec<_>>>()
            .map(Value::List),
        scalar => f(scalar),
    }
}

/// Borrow the text of a value or report a type mismatch.
pub(crate) fn expect_text<'a>(processor: &'static str, value: &'a Value) -> Result<&'a str> {
    value.as_str().ok_or(LoaderError::TypeMismatch {
        processor,
        expected: "text",
        found: value.kind(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_single_drops_null_elements() {
        let out = map_single(Value::list([Value::from("a"), Value::Null]), |v| {
            Ok(Value::from(format!("{}!", v.as_str().unwrap())))
        })
        .unwrap();
        assert_eq!(out, Value::list(["a!"]));
    }

    #[test]
    fn map_single_keeps_null_scalar() {
        let out = map_single(Value::Null, |_| Ok(Value::from("never"))).unwrap();
        assert_eq!(out, Value::Null);
    }
}
