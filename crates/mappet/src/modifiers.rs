//! Built-in modifiers and filters
//!
//! Ready-made [`Modifier`]s and [`Filter`]s for the common cases. Anything
//! else is a closure passed to [`SchemaEntry::modifier`](crate::SchemaEntry::modifier)
//! or [`SchemaEntry::filter`](crate::SchemaEntry::filter).

use crate::schema::{Filter, Modifier};
use crate::{Error, Result};
use chrono::NaiveDate;
use mappet_path::Path;
use regex::Regex;
use serde_json::Value;
use std::fmt::Write as _;
use std::sync::Arc;

static NULL: Value = Value::Null;

/// Wrap a closure as a shared [`Modifier`].
pub fn modifier_from(
    f: impl Fn(&Value, &Value) -> Result<Value> + Send + Sync + 'static,
) -> Modifier {
    Arc::new(f)
}

/// Wrap a closure as a shared [`Filter`].
pub fn filter_from(f: impl Fn(&Value, &Value) -> bool + Send + Sync + 'static) -> Filter {
    Arc::new(f)
}

/// Returns the value unchanged. Default for entries without a modifier.
#[must_use]
pub fn identity() -> Modifier {
    modifier_from(|value, _| Ok(value.clone()))
}

/// Accepts every value. Default for entries without a filter.
#[must_use]
pub fn accept() -> Filter {
    filter_from(|_, _| true)
}

/// Convert string to uppercase; `null` passes through.
#[must_use]
pub fn uppercase() -> Modifier {
    map_string("uppercase", str::to_uppercase)
}

/// Convert string to lowercase; `null` passes through.
#[must_use]
pub fn lowercase() -> Modifier {
    map_string("lowercase", str::to_lowercase)
}

/// Trim surrounding whitespace; `null` passes through.
#[must_use]
pub fn trim() -> Modifier {
    map_string("trim", |s| s.trim().to_string())
}

fn map_string(op: &'static str, f: fn(&str) -> String) -> Modifier {
    modifier_from(move |value, _| match value {
        Value::String(s) => Ok(Value::String(f(s))),
        Value::Null => Ok(Value::Null),
        other => Err(Error::modifier(format!(
            "{op} expects a string, found {}",
            kind(other)
        ))),
    })
}

/// Turn empty strings into `null`.
#[must_use]
pub fn null_if_empty() -> Modifier {
    modifier_from(|value, _| match value {
        Value::String(s) if s.is_empty() => Ok(Value::Null),
        other => Ok(other.clone()),
    })
}

/// Ignore the value and always produce `constant`.
#[must_use]
pub fn constant(constant: Value) -> Modifier {
    modifier_from(move |_, _| Ok(constant.clone()))
}

/// Replace `null` with `fallback`.
#[must_use]
pub fn default_to(fallback: Value) -> Modifier {
    modifier_from(move |value, _| {
        if value.is_null() {
            Ok(fallback.clone())
        } else {
            Ok(value.clone())
        }
    })
}

/// Reformat a date string using `chrono` format specifiers.
///
/// `null` passes through; anything that does not parse with `from` is a
/// modifier error.
#[must_use]
pub fn date_format(from: impl Into<String>, to: impl Into<String>) -> Modifier {
    let from = from.into();
    let to = to.into();
    modifier_from(move |value, _| {
        let input = match value {
            Value::String(s) => s,
            Value::Null => return Ok(Value::Null),
            other => {
                return Err(Error::modifier(format!(
                    "date_format expects a string, found {}",
                    kind(other)
                )));
            }
        };
        let date = NaiveDate::parse_from_str(input, &from).map_err(|e| {
            Error::modifier(format!("cannot parse '{input}' with format '{from}': {e}"))
        })?;
        let mut formatted = String::new();
        write!(formatted, "{}", date.format(&to))
            .map_err(|_| Error::modifier(format!("invalid output format '{to}'")))?;
        Ok(Value::String(formatted))
    })
}

/// Apply modifiers left to right, feeding each output into the next.
#[must_use]
pub fn chain(modifiers: Vec<Modifier>) -> Modifier {
    modifier_from(move |value, source| {
        modifiers
            .iter()
            .try_fold(value.clone(), |current, modifier| modifier(&current, source))
    })
}

/// Apply `modifier` to every element of an array; `null` passes through.
#[must_use]
pub fn each(modifier: Modifier) -> Modifier {
    modifier_from(move |value, source| match value {
        Value::Array(items) => items
            .iter()
            .map(|item| modifier(item, source))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        Value::Null => Ok(Value::Null),
        other => Err(Error::modifier(format!(
            "each expects an array, found {}",
            kind(other)
        ))),
    })
}

/// Reject `null` values (including values missing from the source).
#[must_use]
pub fn not_null() -> Filter {
    filter_from(|value, _| !value.is_null())
}

/// Accept values that are truthy: not `null`, `false`, `0`, or `""`.
#[must_use]
pub fn is_truthy() -> Filter {
    filter_from(|value, _| truthy(value))
}

/// Accept values equal to `expected`.
#[must_use]
pub fn equals(expected: Value) -> Filter {
    filter_from(move |value, _| *value == expected)
}

/// Accept string values matching `pattern`.
///
/// # Errors
///
/// Returns an error if `pattern` is not a valid regular expression.
pub fn matches(pattern: &str) -> Result<Filter> {
    let regex = Regex::new(pattern)
        .map_err(|e| Error::Parse(format!("invalid pattern '{pattern}': {e}")))?;
    Ok(filter_from(move |value, _| {
        value.as_str().is_some_and(|s| regex.is_match(s))
    }))
}

/// Run `filter` against the value found at `path` in the source instead of
/// the entry's own value.
#[must_use]
pub fn on_source(path: Path, filter: Filter) -> Filter {
    filter_from(move |_, source| {
        let value = mappet_path::get(source, &path).unwrap_or(&NULL);
        filter(value, source)
    })
}

/// Accept when the value at `path` in the source is truthy.
#[must_use]
pub fn source_flag(path: Path) -> Filter {
    on_source(path, is_truthy())
}

/// Invert a filter.
#[must_use]
pub fn not(filter: Filter) -> Filter {
    filter_from(move |value, source| !filter(value, source))
}

/// Accept when every filter accepts.
#[must_use]
pub fn all(filters: Vec<Filter>) -> Filter {
    filter_from(move |value, source| filters.iter().all(|filter| filter(value, source)))
}

/// Accept when any filter accepts.
#[must_use]
pub fn any(filters: Vec<Filter>) -> Filter {
    filter_from(move |value, source| filters.iter().any(|filter| filter(value, source)))
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

pub(crate) fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
