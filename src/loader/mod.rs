//! Loader: walks an AST into a value tree.
//!
//! One conceptually single "interpret the parsed tree" responsibility split
//! into single-purpose files (`interpolate`, `merge`, `flagbits`, `coerce`)
//! the way the teacher splits `src/interpreter/` into `variable.rs`,
//! `arithmetic.rs`, `control_flow.rs`, ... rather than one monolithic file.

pub mod coerce;
pub mod flagbits;
pub mod interpolate;
pub mod merge;

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use indexmap::IndexMap;

use crate::ast::types::{Block, Config, Include, OptionNode, OptionValue, Statement};
use crate::cache::AstCache;
use crate::errors::{Error, Result};
use crate::lexer::lexer::{tokenize, LexerConfig};
use crate::options::Options;
use crate::parser::parse;
use crate::reader::{Reader, ReaderError};
use crate::value::Value;

use interpolate::Scope;

/// Parses `root_filename` (resolved against `root_base` by `reader`) and
/// loads it into a value tree.
pub fn load(options: &Options, reader: &dyn Reader, root_filename: &str, root_base: &str) -> Result<Value> {
    let (canonical_id, text) = reader
        .read(root_filename, root_base)
        .map_err(|e| Error::IncludeIo { path: root_filename.to_string(), source: e })?;
    let base_dir = reader.parent_dir(&canonical_id);
    load_text(options, reader, &canonical_id, &text, &base_dir)
}

/// Loads already-in-memory text under `canonical_id`, with `base_dir` as the
/// directory relative includes resolve against.
pub fn load_text(
    options: &Options,
    reader: &dyn Reader,
    canonical_id: &str,
    text: &str,
    base_dir: &str,
) -> Result<Value> {
    let mut loader = Loader::new(options, reader);
    let config = loader.get_or_parse(canonical_id, text)?;
    loader.visited.insert(canonical_id.to_string());

    let root_scope: Scope = Rc::new(RefCell::new(IndexMap::new()));
    let mut scope_chain = vec![root_scope];
    loader.walk_statements(&config.statements, &mut scope_chain, canonical_id, base_dir)?;
    let top = Rc::try_unwrap(scope_chain.pop().unwrap())
        .expect("root scope has no outstanding references after the walk completes")
        .into_inner();

    let mut result = Value::Table(top);
    if let Some(defaults) = &options.defaultconfig {
        result = merge::merge_defaults(result, defaults.clone());
    }
    Ok(result)
}

struct Loader<'a> {
    options: &'a Options,
    reader: &'a dyn Reader,
    cache: AstCache,
    /// Canonical ids already walked; gates `includeagain`.
    visited: HashSet<String>,
    env: HashMap<String, String>,
}

impl<'a> Loader<'a> {
    fn new(options: &'a Options, reader: &'a dyn Reader) -> Self {
        Loader {
            options,
            reader,
            cache: AstCache::new(),
            visited: HashSet::new(),
            env: std::env::vars().collect(),
        }
    }

    fn get_or_parse(&mut self, canonical_id: &str, text: &str) -> Result<Rc<Config>> {
        if let Some(cached) = self.cache.get(canonical_id) {
            return Ok(cached);
        }
        let lexer_config = LexerConfig {
            ccomments: self.options.ccomments,
            noescape: self.options.noescape,
            useapacheinclude: self.options.useapacheinclude,
        };
        let tokens = tokenize(text, lexer_config)?;
        let config = parse(tokens, self.options.namedblocks)?;
        let rc = Rc::new(config);
        self.cache.insert(canonical_id.to_string(), rc.clone());
        Ok(rc)
    }

    fn walk_statements(
        &mut self,
        statements: &[Statement],
        scope_chain: &mut Vec<Scope>,
        source_id: &str,
        base_dir: &str,
    ) -> Result<()> {
        let current_scope = scope_chain.last().unwrap().clone();
        for stmt in statements {
            match stmt {
                Statement::Comment(_) => {}
                Statement::Option(node) => {
                    self.process_option(node, &current_scope, scope_chain, source_id)?
                }
                Statement::Block(block) => {
                    self.process_block(block, &current_scope, scope_chain, source_id, base_dir)?
                }
                Statement::Include(inc) => {
                    self.process_include(inc, source_id, base_dir, scope_chain)?
                }
            }
        }
        Ok(())
    }

    fn process_option(
        &mut self,
        node: &OptionNode,
        current_scope: &Scope,
        scope_chain: &[Scope],
        source_id: &str,
    ) -> Result<()> {
        let mut name = node.name.clone();
        if self.options.lowercasenames {
            name = name.to_lowercase();
        }

        let materialized = self.materialize_value(&node.value, scope_chain, source_id, node.line)?;

        let value = if let Some(flags) = self.options.flagbits.get(&name) {
            match &materialized {
                Value::Scalar(raw) => flagbits::expand(raw, flags),
                _ => materialized,
            }
        } else if self.options.autotrue {
            coerce::apply(materialized)
        } else {
            materialized
        };

        let mut map = current_scope.borrow_mut();
        merge::insert(
            &mut map,
            name,
            value,
            merge::Origin::Option,
            self.options.allowmultioptions,
            self.options.mergeduplicateblocks,
            self.options.mergeduplicateoptions,
            source_id,
            node.line,
        )
    }

    fn materialize_value(
        &self,
        value: &OptionValue,
        scope_chain: &[Scope],
        source_id: &str,
        line: usize,
    ) -> Result<Value> {
        match value {
            OptionValue::Empty => Ok(Value::Scalar(String::new())),
            OptionValue::Bare(raw) => {
                let mut s = unescape(raw, self.options.noescape);
                if !self.options.nostripvalues {
                    s = s.trim_end().to_string();
                }
                if self.options.interpolatevars {
                    s = interpolate::interpolate(
                        &s,
                        scope_chain,
                        &self.env,
                        self.options.interpolateenv,
                        self.options.strictvars,
                        source_id,
                        line,
                    )?;
                }
                Ok(Value::Scalar(s))
            }
            OptionValue::Quoted { single, raw, trailing } => {
                let can_interpolate = if *single {
                    self.options.allowsinglequoteinterpolation
                } else {
                    self.options.interpolatevars
                };
                let mut s = unescape(raw, self.options.noescape);
                if can_interpolate {
                    s = interpolate::interpolate(
                        &s,
                        scope_chain,
                        &self.env,
                        self.options.interpolateenv,
                        self.options.strictvars,
                        source_id,
                        line,
                    )?;
                }
                if !trailing.is_empty() {
                    let mut t = unescape(trailing, self.options.noescape);
                    if can_interpolate {
                        t = interpolate::interpolate(
                            &t,
                            scope_chain,
                            &self.env,
                            self.options.interpolateenv,
                            self.options.strictvars,
                            source_id,
                            line,
                        )?;
                    }
                    s.push_str(&t);
                }
                Ok(Value::Scalar(s))
            }
            OptionValue::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(self.materialize_value(item, scope_chain, source_id, line)?);
                }
                Ok(Value::List(out))
            }
        }
    }

    fn process_block(
        &mut self,
        block: &Block,
        current_scope: &Scope,
        scope_chain: &mut Vec<Scope>,
        source_id: &str,
        base_dir: &str,
    ) -> Result<()> {
        let tag = if self.options.lowercasenames { block.tag.to_lowercase() } else { block.tag.clone() };
        let name = if self.options.lowercasenames {
            block.name.as_ref().map(|n| n.to_lowercase())
        } else {
            block.name.clone()
        };

        let inner_scope: Scope = Rc::new(RefCell::new(IndexMap::new()));
        scope_chain.push(inner_scope.clone());
        self.walk_statements(&block.children, scope_chain, source_id, base_dir)?;
        scope_chain.pop();
        let inner_map = Rc::try_unwrap(inner_scope)
            .expect("block scope has no outstanding references once its children are walked")
            .into_inner();

        let mut map = current_scope.borrow_mut();
        match name {
            Some(name) => {
                let tag_table = get_or_create_tag_table(
                    &mut map,
                    &tag,
                    self.options.mergeduplicateblocks,
                    source_id,
                    block.line,
                )?;
                merge::insert(
                    tag_table,
                    name,
                    Value::Table(inner_map),
                    merge::Origin::Block,
                    self.options.allowmultioptions,
                    self.options.mergeduplicateblocks,
                    self.options.mergeduplicateoptions,
                    source_id,
                    block.line,
                )
            }
            None => merge::insert(
                &mut map,
                tag,
                Value::Table(inner_map),
                merge::Origin::Block,
                self.options.allowmultioptions,
                self.options.mergeduplicateblocks,
                self.options.mergeduplicateoptions,
                source_id,
                block.line,
            ),
        }
    }

    /// Search directories tried in order for a relative include path.
    /// `includerelative` prepends the includer's own directory; otherwise
    /// `configpath` alone is searched, falling back to `base_dir` itself
    /// when `configpath` is empty so a default-options include still
    /// resolves against the includer's location.
    fn search_bases(&self, base_dir: &str) -> Vec<String> {
        if self.options.includerelative {
            let mut bases = vec![base_dir.to_string()];
            bases.extend(self.options.configpath.iter().cloned());
            bases
        } else if !self.options.configpath.is_empty() {
            self.options.configpath.clone()
        } else {
            vec![base_dir.to_string()]
        }
    }

    fn candidates_at_base(
        &self,
        filename: &str,
        base: &str,
        glob_applicable: bool,
    ) -> std::result::Result<Vec<(String, String)>, ReaderError> {
        if glob_applicable {
            let matches = self.reader.glob(filename, base)?;
            let mut out = Vec::with_capacity(matches.len());
            for m in matches {
                out.push(self.reader.read(&m, ".")?);
            }
            return Ok(out);
        }
        if self.options.includedirectories && self.reader.is_directory(filename, base) {
            let mut entries = self.reader.read_dir(filename, base)?;
            entries.sort();
            let mut out = Vec::with_capacity(entries.len());
            for entry in entries {
                out.push(self.reader.read(&entry, ".")?);
            }
            return Ok(out);
        }
        Ok(vec![self.reader.read(filename, base)?])
    }

    fn process_include(
        &mut self,
        inc: &Include,
        current_id: &str,
        base_dir: &str,
        scope_chain: &mut Vec<Scope>,
    ) -> Result<()> {
        let (proceed, filename, base) = match &self.options.pre_open {
            Some(hook) => hook(&inc.path, base_dir),
            None => (true, inc.path.clone(), base_dir.to_string()),
        };
        if !proceed {
            return Ok(());
        }

        let glob_applicable = self.options.includeglob && has_glob_meta(&filename);
        let bases = self.search_bases(&base);

        let mut candidates: Vec<(String, String)> = Vec::new();
        let mut last_err: Option<ReaderError> = None;
        for b in &bases {
            match self.candidates_at_base(&filename, b, glob_applicable) {
                Ok(found) if !found.is_empty() => {
                    candidates = found;
                    break;
                }
                Ok(_) => continue,
                Err(e) => {
                    last_err = Some(e);
                    continue;
                }
            }
        }

        if candidates.is_empty() {
            // includeglob's "missing matches are silent success" applies
            // even for a non-optional include; IncludeOptional is silent
            // regardless of cause.
            if inc.optional || glob_applicable {
                return Ok(());
            }
            return Err(match last_err {
                Some(e) => Error::IncludeIo { path: inc.path.clone(), source: e },
                None => Error::include(current_id, Some(inc.line), format!("include not found: {}", inc.path)),
            });
        }

        for (canonical_id, raw_text) in candidates {
            if !self.options.includeagain && self.visited.contains(&canonical_id) {
                continue;
            }
            let text = match &self.options.pre_read {
                Some(hook) => {
                    let (proceed, _source, text) = hook(&canonical_id, &raw_text);
                    if !proceed {
                        continue;
                    }
                    text
                }
                None => raw_text,
            };

            let config = self.get_or_parse(&canonical_id, &text)?;
            self.visited.insert(canonical_id.clone());
            let next_base = self.reader.parent_dir(&canonical_id);
            self.walk_statements(&config.statements, scope_chain, &canonical_id, &next_base)?;
        }
        Ok(())
    }
}

fn get_or_create_tag_table<'m>(
    map: &'m mut IndexMap<String, Value>,
    tag: &str,
    mergeduplicateblocks: bool,
    source_id: &str,
    line: usize,
) -> Result<&'m mut IndexMap<String, Value>> {
    let needs_reset = match map.get(tag) {
        None => true,
        Some(Value::Table(_)) => false,
        Some(_) if mergeduplicateblocks => true,
        Some(_) => {
            return Err(Error::DuplicateKey { key: tag.to_string(), source_id: source_id.to_string(), line });
        }
    };
    if needs_reset {
        map.insert(tag.to_string(), Value::empty_table());
    }
    Ok(map.get_mut(tag).unwrap().as_table_mut().unwrap())
}

fn has_glob_meta(s: &str) -> bool {
    s.contains(['*', '?', '['])
}

/// Collapses `\n \t \\ \" \' \<any>` to the escaped character, unless
/// `noescape` (in which case backslashes are left as literal characters).
fn unescape(text: &str, noescape: bool) -> String {
    if noescape {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::MemoryReader;

    fn load_default(input: &str) -> Value {
        let options = Options::new();
        let reader = MemoryReader::new(input);
        load(&options, &reader, crate::reader::MEMORY_ROOT_ID, ".").expect("load failed")
    }

    #[test]
    fn unescape_collapses_known_sequences() {
        assert_eq!(unescape("a\\nb\\tc\\\\d\\\"e", false), "a\nb\tc\\d\"e");
    }

    #[test]
    fn unescape_is_noop_under_noescape() {
        assert_eq!(unescape(r"a\nb", true), r"a\nb");
    }

    #[test]
    fn nested_block_materializes_to_table() {
        let value = load_default("<cops>\n  name stein\n  age 25\n  <colors>\n    color \\#000000\n  </colors>\n</cops>\n");
        let cops = value.as_table().unwrap().get("cops").unwrap().as_table().unwrap();
        assert_eq!(cops.get("name").unwrap().as_scalar(), Some("stein"));
        assert_eq!(cops.get("age").unwrap().as_scalar(), Some("25"));
        let colors = cops.get("colors").unwrap().as_table().unwrap();
        assert_eq!(colors.get("color").unwrap().as_scalar(), Some("#000000"));
    }

    #[test]
    fn duplicate_options_collect_into_list() {
        let value = load_default("x 1\nx 2\n");
        let list = value.as_table().unwrap().get("x").unwrap().as_list().unwrap();
        assert_eq!(list[0].as_scalar(), Some("1"));
        assert_eq!(list[1].as_scalar(), Some("2"));
    }

    #[test]
    fn mergeduplicateoptions_overwrites() {
        let options = Options::new().with_mergeduplicateoptions(true);
        let reader = MemoryReader::new("x 1\nx 2\n");
        let value = load(&options, &reader, crate::reader::MEMORY_ROOT_ID, ".").unwrap();
        assert_eq!(value.as_table().unwrap().get("x").unwrap().as_scalar(), Some("2"));
    }

    #[test]
    fn autotrue_coerces_every_array_element() {
        let options = Options::new().with_autotrue(true);
        let reader = MemoryReader::new("flags [ yes stein off ]\n");
        let value = load(&options, &reader, crate::reader::MEMORY_ROOT_ID, ".").unwrap();
        let list = value.as_table().unwrap().get("flags").unwrap().as_list().unwrap();
        assert_eq!(list[0].as_scalar(), Some("1"));
        assert_eq!(list[1].as_scalar(), Some("stein"));
        assert_eq!(list[2].as_scalar(), Some("0"));
    }

    #[test]
    fn interpolation_substitutes_sibling_value() {
        let options = Options::new().with_interpolatevars(true);
        let reader = MemoryReader::new("a foo\nb ${a}/bar\n");
        let value = load(&options, &reader, crate::reader::MEMORY_ROOT_ID, ".").unwrap();
        let table = value.as_table().unwrap();
        assert_eq!(table.get("a").unwrap().as_scalar(), Some("foo"));
        assert_eq!(table.get("b").unwrap().as_scalar(), Some("foo/bar"));
    }

    #[test]
    fn flagbits_emits_full_flag_set() {
        let mut flags = IndexMap::new();
        flags.insert("CLEAR".to_string(), "1".to_string());
        flags.insert("STRONG".to_string(), "1".to_string());
        flags.insert("UNSECURE".to_string(), "32bit".to_string());
        let mut flagbits = IndexMap::new();
        flagbits.insert("mode".to_string(), flags);

        let options = Options::new().with_flagbits(flagbits);
        let reader = MemoryReader::new("mode CLEAR | UNSECURE\n");
        let value = load(&options, &reader, crate::reader::MEMORY_ROOT_ID, ".").unwrap();
        let mode = value.as_table().unwrap().get("mode").unwrap().as_table().unwrap();
        assert_eq!(mode.get("CLEAR"), Some(&Value::Scalar("1".to_string())));
        assert_eq!(mode.get("UNSECURE"), Some(&Value::Scalar("32bit".to_string())));
        assert_eq!(mode.get("STRONG"), Some(&Value::Null));
    }

    #[test]
    fn self_closing_block_is_empty_table() {
        let value = load_default("<empty />\n");
        let empty = value.as_table().unwrap().get("empty").unwrap();
        assert!(empty.is_table());
        assert!(empty.as_table().unwrap().is_empty());
    }

    #[test]
    fn include_optional_missing_file_is_silent() {
        let options = Options::new();
        let reader = MemoryReader::new("IncludeOptional /nonexistent-apache-config-test\n");
        let value = load(&options, &reader, crate::reader::MEMORY_ROOT_ID, ".").unwrap();
        assert!(value.as_table().unwrap().is_empty());
    }

    #[test]
    fn named_block_keys_by_tag_then_name() {
        let value = load_default("<user alice>\n  age 30\n</user>\n<user bob>\n  age 40\n</user>\n");
        let users = value.as_table().unwrap().get("user").unwrap().as_table().unwrap();
        assert_eq!(users.get("alice").unwrap().as_table().unwrap().get("age").unwrap().as_scalar(), Some("30"));
        assert_eq!(users.get("bob").unwrap().as_table().unwrap().get("age").unwrap().as_scalar(), Some("40"));
    }

    #[test]
    fn defaultconfig_is_merged_underneath() {
        let mut defaults_map = IndexMap::new();
        defaults_map.insert("x".to_string(), Value::Scalar("default".to_string()));
        defaults_map.insert("y".to_string(), Value::Scalar("only-default".to_string()));
        let options = Options::new().with_defaultconfig(Value::Table(defaults_map));
        let reader = MemoryReader::new("x fromfile\n");
        let value = load(&options, &reader, crate::reader::MEMORY_ROOT_ID, ".").unwrap();
        let table = value.as_table().unwrap();
        assert_eq!(table.get("x").unwrap().as_scalar(), Some("fromfile"));
        assert_eq!(table.get("y").unwrap().as_scalar(), Some("only-default"));
    }

    #[test]
    fn duplicate_key_without_policy_errors() {
        let options = Options::new().with_allowmultioptions(false);
        let reader = MemoryReader::new("x 1\nx 2\n");
        let err = load(&options, &reader, crate::reader::MEMORY_ROOT_ID, ".").unwrap_err();
        assert!(matches!(err, Error::DuplicateKey { .. }));
    }
}
