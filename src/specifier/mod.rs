// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Taint and toleration specifiers
//!
//! A specifier is the compact single-line form accepted on the command line
//! and shown in reports:
//!
//! - taint: `key[=value][:effect]`, e.g. `dedicated=gpu:NoSchedule`
//! - toleration: `[Operator(]key[=value][:effect][)]`, e.g. `Exists(dedicated:NoSchedule)`
//!
//! Both share the `key[=value][:effect]` body, parsed by [`parse_body`] and
//! rendered by [`write_body`].

mod effect;
mod error;
mod taint;
mod toleration;

use std::fmt;

pub use effect::{Effect, Operator, validate_effect};
pub use error::{SpecifierError, SpecifierResult};
pub use taint::{Taint, parse_taint, print_taints};
pub use toleration::{Toleration, parse_toleration, print_tolerations};

/// Shown in place of an empty list
pub const NONE_SENTINEL: &str = "none";

/// Separator between rendered entries of one resource
const ENTRY_SEPARATOR: &str = ",\n";

/// The `key[=value][:effect]` part shared by taints and tolerations
#[derive(Debug, Default)]
struct Body<'a> {
    key: &'a str,
    value: &'a str,
    effect: Option<Effect>,
}

/// Parse `key[=value][:effect]`.
///
/// `what` names the specifier kind and `text` is the full user input; both
/// end up in the error message when the body has too many separators. The
/// effect is validated before the key/value split, so `a=b=c:Bad` reports the
/// effect.
fn parse_body<'a>(body: &'a str, what: &str, text: &str) -> SpecifierResult<Body<'a>> {
    let malformed = || SpecifierError::MalformedSpecifier(format!("invalid {}: {}", what, text));

    let segments: Vec<&str> = body.split(':').collect();
    let (key_value, effect) = match segments.as_slice() {
        [key_value] => (*key_value, None),
        [key_value, effect] => (*key_value, Some(validate_effect(effect)?)),
        _ => return Err(malformed()),
    };

    let parts: Vec<&str> = key_value.split('=').collect();
    let (key, value) = match parts.as_slice() {
        [key] => (*key, ""),
        [key, value] => (*key, *value),
        _ => return Err(malformed()),
    };

    Ok(Body { key, value, effect })
}

/// Write `key[=value][:effect]`, skipping empty parts
fn write_body(
    f: &mut fmt::Formatter<'_>,
    key: &str,
    value: &str,
    effect: Option<Effect>,
) -> fmt::Result {
    f.write_str(key)?;
    if !value.is_empty() {
        write!(f, "={}", value)?;
    }
    if let Some(effect) = effect {
        write!(f, ":{}", effect)?;
    }
    Ok(())
}

/// Render a list one entry per line, or the sentinel when empty
fn print_entries<T: fmt::Display>(items: &[T]) -> String {
    if items.is_empty() {
        return NONE_SENTINEL.to_string();
    }
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(ENTRY_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_body_key_only() {
        let body = parse_body("key", "taint", "key").unwrap();
        assert_eq!(body.key, "key");
        assert_eq!(body.value, "");
        assert_eq!(body.effect, None);
    }

    #[test]
    fn test_parse_body_full() {
        let body = parse_body("key=value:NoExecute", "taint", "key=value:NoExecute").unwrap();
        assert_eq!(body.key, "key");
        assert_eq!(body.value, "value");
        assert_eq!(body.effect, Some(Effect::NoExecute));
    }

    #[test]
    fn test_parse_body_empty_value_after_equals() {
        let body = parse_body("key=", "taint", "key=").unwrap();
        assert_eq!(body.key, "key");
        assert_eq!(body.value, "");
    }

    #[test]
    fn test_parse_body_reports_original_text() {
        let err = parse_body("a:b:c", "toleration", "Exists(a:b:c)").unwrap_err();
        assert_eq!(
            err,
            SpecifierError::MalformedSpecifier("invalid toleration: Exists(a:b:c)".to_string())
        );
    }

    #[test]
    fn test_parse_body_validates_effect_first() {
        let err = parse_body("a=b=c:Bad", "taint", "a=b=c:Bad").unwrap_err();
        assert_eq!(err, SpecifierError::InvalidEffect("Bad".to_string()));
    }

    #[test]
    fn test_print_entries_empty() {
        let items: Vec<String> = vec![];
        assert_eq!(print_entries(&items), "none");
    }

    #[test]
    fn test_print_entries_joins_without_trailing_separator() {
        let items = vec!["a".to_string(), "b".to_string()];
        assert_eq!(print_entries(&items), "a,\nb");
    }
}
