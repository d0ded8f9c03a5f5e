//! Variable interpolation: `$name` and `${name}` substitution against an
//! explicit scope chain (innermost first), with optional environment
//! fallback.
//!
//! Bounded to a single left-to-right scan: a substituted value's own text is
//! never re-scanned for further `$name` references, so `a $a` cannot loop.
//! This one-pass bound is implicit in spec §4.6 ("interpolation runs after
//! unescape, before coercion" describes one ordered pass) but is worth
//! stating explicitly since a naive recursive-replace would not share it.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::errors::{Error, Result};
use crate::value::Value;

pub type Scope = Rc<RefCell<IndexMap<String, Value>>>;

/// Looks up `name` in the scope chain, innermost (end of slice) first, then
/// falls back to `env` if `interpolateenv`.
fn lookup(name: &str, scope_chain: &[Scope], env: &HashMap<String, String>, interpolateenv: bool) -> Option<String> {
    for scope in scope_chain.iter().rev() {
        if let Some(value) = scope.borrow().get(name) {
            if let Value::Scalar(s) = value {
                return Some(s.clone());
            }
        }
    }
    if interpolateenv {
        return env.get(name).cloned();
    }
    None
}

#[allow(clippy::too_many_arguments)]
pub fn interpolate(
    text: &str,
    scope_chain: &[Scope],
    env: &HashMap<String, String>,
    interpolateenv: bool,
    strictvars: bool,
    source_id: &str,
    line: usize,
) -> Result<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::new();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] != '$' {
            out.push(chars[i]);
            i += 1;
            continue;
        }

        if chars.get(i + 1) == Some(&'{') {
            let start = i + 2;
            let mut j = start;
            while j < chars.len() && chars[j] != '}' {
                j += 1;
            }
            if j < chars.len() {
                let name: String = chars[start..j].iter().collect();
                out.push_str(&resolve(&name, scope_chain, env, interpolateenv, strictvars, source_id, line)?);
                i = j + 1;
                continue;
            }
            // Unterminated `${`: fall through, treat '$' literally.
            out.push('$');
            i += 1;
            continue;
        }

        if chars.get(i + 1).is_some_and(|c| c.is_alphanumeric() || *c == '_') {
            let start = i + 1;
            let mut j = start;
            while j < chars.len() && (chars[j].is_alphanumeric() || chars[j] == '_') {
                j += 1;
            }
            let name: String = chars[start..j].iter().collect();
            out.push_str(&resolve(&name, scope_chain, env, interpolateenv, strictvars, source_id, line)?);
            i = j;
            continue;
        }

        out.push('$');
        i += 1;
    }
    Ok(out)
}

#[allow(clippy::too_many_arguments)]
fn resolve(
    name: &str,
    scope_chain: &[Scope],
    env: &HashMap<String, String>,
    interpolateenv: bool,
    strictvars: bool,
    source_id: &str,
    line: usize,
) -> Result<String> {
    match lookup(name, scope_chain, env, interpolateenv) {
        Some(value) => Ok(value),
        None if strictvars => Err(Error::UndefinedVariable {
            name: name.to_string(),
            source_id: source_id.to_string(),
            line,
        }),
        None => Ok(format!("${name}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope_with(pairs: &[(&str, &str)]) -> Scope {
        let mut map = IndexMap::new();
        for (k, v) in pairs {
            map.insert(k.to_string(), Value::Scalar(v.to_string()));
        }
        Rc::new(RefCell::new(map))
    }

    #[test]
    fn braced_and_bare_forms_resolve() {
        let chain = vec![scope_with(&[("a", "foo")])];
        let env = HashMap::new();
        let out = interpolate("${a}/bar", &chain, &env, false, true, "s", 1).unwrap();
        assert_eq!(out, "foo/bar");
        let out = interpolate("$a/bar", &chain, &env, false, true, "s", 1).unwrap();
        assert_eq!(out, "foo/bar");
    }

    #[test]
    fn innermost_scope_shadows_outer() {
        let chain = vec![scope_with(&[("a", "outer")]), scope_with(&[("a", "inner")])];
        let env = HashMap::new();
        let out = interpolate("$a", &chain, &env, false, true, "s", 1).unwrap();
        assert_eq!(out, "inner");
    }

    #[test]
    fn undefined_fails_under_strictvars() {
        let chain: Vec<Scope> = vec![];
        let env = HashMap::new();
        let err = interpolate("$missing", &chain, &env, false, true, "s", 5).unwrap_err();
        assert!(matches!(err, Error::UndefinedVariable { .. }));
    }

    #[test]
    fn undefined_left_literal_without_strictvars() {
        let chain: Vec<Scope> = vec![];
        let env = HashMap::new();
        let out = interpolate("$missing", &chain, &env, false, false, "s", 5).unwrap();
        assert_eq!(out, "$missing");
    }

    #[test]
    fn env_fallback_used_when_enabled() {
        let chain: Vec<Scope> = vec![];
        let mut env = HashMap::new();
        env.insert("HOME".to_string(), "/home/x".to_string());
        let out = interpolate("$HOME/bin", &chain, &env, true, true, "s", 1).unwrap();
        assert_eq!(out, "/home/x/bin");
    }

    #[test]
    fn self_reference_does_not_loop() {
        let chain = vec![scope_with(&[("a", "$a")])];
        let env = HashMap::new();
        let out = interpolate("$a", &chain, &env, false, true, "s", 1).unwrap();
        assert_eq!(out, "$a");
    }
}
