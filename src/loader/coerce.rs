//! `autotrue` coercion: {yes,on,1,true} -> "1", {no,off,0,false} -> "0".
//!
//! Triggers on value text, not key name (documented Open Question
//! resolution: value-text matching is what §4.1 references "at leaf values",
//! and is unambiguous to test without inventing a second pattern language
//! for key names).

use crate::value::Value;

/// Returns the coerced scalar if `text` case-insensitively matches one of
/// the recognized truthy/falsy tokens, or `None` if it should pass through
/// unchanged.
pub fn coerce(text: &str) -> Option<&'static str> {
    let lower = text.to_ascii_lowercase();
    match lower.as_str() {
        "yes" | "on" | "1" | "true" => Some("1"),
        "no" | "off" | "0" | "false" => Some("0"),
        _ => None,
    }
}

/// Applies `coerce` at every scalar leaf, recursing into list elements so
/// an array value (`flag [ yes no on ]`) is coerced element-wise rather
/// than only at the top level.
pub fn apply(value: Value) -> Value {
    match value {
        Value::Scalar(s) => match coerce(&s) {
            Some(c) => Value::Scalar(c.to_string()),
            None => Value::Scalar(s),
        },
        Value::List(items) => Value::List(items.into_iter().map(apply).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthy_tokens_coerce_to_one() {
        for tok in ["yes", "Yes", "ON", "1", "TRUE"] {
            assert_eq!(coerce(tok), Some("1"), "token: {tok}");
        }
    }

    #[test]
    fn falsy_tokens_coerce_to_zero() {
        for tok in ["no", "No", "OFF", "0", "FALSE"] {
            assert_eq!(coerce(tok), Some("0"), "token: {tok}");
        }
    }

    #[test]
    fn other_text_passes_through() {
        assert_eq!(coerce("stein"), None);
        assert_eq!(coerce(""), None);
    }

    #[test]
    fn apply_recurses_into_list_elements() {
        let input = Value::List(vec![
            Value::Scalar("yes".to_string()),
            Value::Scalar("stein".to_string()),
            Value::Scalar("off".to_string()),
        ]);
        let coerced = apply(input);
        assert_eq!(
            coerced,
            Value::List(vec![
                Value::Scalar("1".to_string()),
                Value::Scalar("stein".to_string()),
                Value::Scalar("0".to_string()),
            ])
        );
    }
}
