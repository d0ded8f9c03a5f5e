//! `flagbits`: pipe-separated tokens coerced into a predefined flag mapping.
//!
//! Flag-name matching against the split tokens is case-sensitive (documented
//! Open Question resolution, per spec §9's explicit default).

use indexmap::IndexMap;

use crate::value::Value;

/// Expands a raw `"CLEAR | UNSECURE"`-style value against `flags` (the
/// predefined `{flagName -> flagValue}` table for this option), producing a
/// mapping with every predefined flag name present: matched flags set to
/// their configured value, unmatched ones set to `Value::Null`.
pub fn expand(raw: &str, flags: &IndexMap<String, String>) -> Value {
    let set: std::collections::HashSet<&str> = raw.split('|').map(|s| s.trim()).collect();
    let mut table = IndexMap::new();
    for (flag_name, flag_value) in flags {
        if set.contains(flag_name.as_str()) {
            table.insert(flag_name.clone(), Value::Scalar(flag_value.clone()));
        } else {
            table.insert(flag_name.clone(), Value::Null);
        }
    }
    Value::Table(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_multiple_flags_case_sensitively() {
        let mut flags = IndexMap::new();
        flags.insert("CLEAR".to_string(), "1".to_string());
        flags.insert("STRONG".to_string(), "1".to_string());
        flags.insert("UNSECURE".to_string(), "32bit".to_string());

        let result = expand("CLEAR | UNSECURE", &flags);
        let table = result.as_table().unwrap();
        assert_eq!(table.get("CLEAR").unwrap(), &Value::Scalar("1".to_string()));
        assert_eq!(table.get("UNSECURE").unwrap(), &Value::Scalar("32bit".to_string()));
        assert_eq!(table.get("STRONG").unwrap(), &Value::Null);
    }

    #[test]
    fn lowercase_token_does_not_match_uppercase_flag_name() {
        let mut flags = IndexMap::new();
        flags.insert("CLEAR".to_string(), "1".to_string());
        let result = expand("clear", &flags);
        assert_eq!(result.as_table().unwrap().get("CLEAR").unwrap(), &Value::Null);
    }
}
