//! Options: the sole configuration surface threaded through every layer.
//!
//! An immutable, `Clone`-able record with a `Default` impl carrying the
//! documented defaults and a builder-style `with_*` setter per field, the
//! same shape as the teacher's `BashOptions` (`src/bash.rs`) rather than a
//! runtime config map. `plug`'s hooks mirror the teacher's
//! `fs: Option<Arc<dyn FileSystem>>` injection point: stateless function
//! values, not an inheritance hierarchy.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::value::Value;

pub type PreOpenHook = Arc<dyn Fn(&str, &str) -> (bool, String, String) + Send + Sync>;
pub type PreReadHook = Arc<dyn Fn(&str, &str) -> (bool, String, String) + Send + Sync>;

/// `{optName -> {flagName -> flagValue}}`, per `flagbits`. `IndexMap` so the
/// predefined flag names are emitted in their definition order (spec's
/// end-to-end scenario 5 emits `CLEAR`, `UNSECURE`, `STRONG` in the order
/// they appear in the configured table, not sorted).
pub type FlagBitsMap = IndexMap<String, IndexMap<String, String>>;

#[derive(Clone)]
pub struct Options {
    pub allowmultioptions: bool,
    pub forcearray: bool,
    pub lowercasenames: bool,
    pub useapacheinclude: bool,
    pub includeagain: bool,
    pub includerelative: bool,
    pub includedirectories: bool,
    pub includeglob: bool,
    pub configpath: Vec<String>,
    pub mergeduplicateblocks: bool,
    pub mergeduplicateoptions: bool,
    pub autotrue: bool,
    pub flagbits: FlagBitsMap,
    pub defaultconfig: Option<Value>,
    pub interpolatevars: bool,
    pub interpolateenv: bool,
    pub allowsinglequoteinterpolation: bool,
    pub strictvars: bool,
    pub ccomments: bool,
    pub nostripvalues: bool,
    pub noescape: bool,
    pub namedblocks: bool,
    pub pre_open: Option<PreOpenHook>,
    pub pre_read: Option<PreReadHook>,
}

impl std::fmt::Debug for Options {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Options")
            .field("allowmultioptions", &self.allowmultioptions)
            .field("forcearray", &self.forcearray)
            .field("lowercasenames", &self.lowercasenames)
            .field("useapacheinclude", &self.useapacheinclude)
            .field("includeagain", &self.includeagain)
            .field("includerelative", &self.includerelative)
            .field("includedirectories", &self.includedirectories)
            .field("includeglob", &self.includeglob)
            .field("configpath", &self.configpath)
            .field("mergeduplicateblocks", &self.mergeduplicateblocks)
            .field("mergeduplicateoptions", &self.mergeduplicateoptions)
            .field("autotrue", &self.autotrue)
            .field("flagbits", &self.flagbits)
            .field("interpolatevars", &self.interpolatevars)
            .field("interpolateenv", &self.interpolateenv)
            .field("allowsinglequoteinterpolation", &self.allowsinglequoteinterpolation)
            .field("strictvars", &self.strictvars)
            .field("ccomments", &self.ccomments)
            .field("nostripvalues", &self.nostripvalues)
            .field("noescape", &self.noescape)
            .field("namedblocks", &self.namedblocks)
            .field("pre_open", &self.pre_open.is_some())
            .field("pre_read", &self.pre_read.is_some())
            .finish()
    }
}

impl Default for Options {
    fn default() -> Self {
        Options::new()
    }
}

impl Options {
    /// Documented defaults from the options table: `allowmultioptions`,
    /// `useapacheinclude`, `strictvars`, `ccomments`, `nostripvalues`, and
    /// `namedblocks` default on; everything else defaults off/empty.
    pub fn new() -> Self {
        Options {
            allowmultioptions: true,
            forcearray: false,
            lowercasenames: false,
            useapacheinclude: true,
            includeagain: false,
            includerelative: false,
            includedirectories: false,
            includeglob: false,
            configpath: Vec::new(),
            mergeduplicateblocks: false,
            mergeduplicateoptions: false,
            autotrue: false,
            flagbits: IndexMap::new(),
            defaultconfig: None,
            interpolatevars: false,
            interpolateenv: false,
            allowsinglequoteinterpolation: false,
            strictvars: true,
            ccomments: true,
            nostripvalues: true,
            noescape: false,
            namedblocks: true,
            pre_open: None,
            pre_read: None,
        }
    }

    pub fn with_allowmultioptions(mut self, v: bool) -> Self {
        self.allowmultioptions = v;
        self
    }

    pub fn with_forcearray(mut self, v: bool) -> Self {
        self.forcearray = v;
        self
    }

    pub fn with_lowercasenames(mut self, v: bool) -> Self {
        self.lowercasenames = v;
        self
    }

    pub fn with_useapacheinclude(mut self, v: bool) -> Self {
        self.useapacheinclude = v;
        self
    }

    pub fn with_includeagain(mut self, v: bool) -> Self {
        self.includeagain = v;
        self
    }

    pub fn with_includerelative(mut self, v: bool) -> Self {
        self.includerelative = v;
        self
    }

    pub fn with_includedirectories(mut self, v: bool) -> Self {
        self.includedirectories = v;
        self
    }

    pub fn with_includeglob(mut self, v: bool) -> Self {
        self.includeglob = v;
        self
    }

    pub fn with_configpath(mut self, paths: Vec<String>) -> Self {
        self.configpath = paths;
        self
    }

    pub fn with_mergeduplicateblocks(mut self, v: bool) -> Self {
        self.mergeduplicateblocks = v;
        self
    }

    pub fn with_mergeduplicateoptions(mut self, v: bool) -> Self {
        self.mergeduplicateoptions = v;
        self
    }

    pub fn with_autotrue(mut self, v: bool) -> Self {
        self.autotrue = v;
        self
    }

    pub fn with_flagbits(mut self, map: FlagBitsMap) -> Self {
        self.flagbits = map;
        self
    }

    pub fn with_defaultconfig(mut self, tree: Value) -> Self {
        self.defaultconfig = Some(tree);
        self
    }

    pub fn with_defaultconfig_opt(mut self, tree: Option<Value>) -> Self {
        self.defaultconfig = tree;
        self
    }

    pub fn with_interpolatevars(mut self, v: bool) -> Self {
        self.interpolatevars = v;
        self
    }

    /// Implies `interpolatevars`, per the documented default behavior.
    pub fn with_interpolateenv(mut self, v: bool) -> Self {
        self.interpolateenv = v;
        if v {
            self.interpolatevars = true;
        }
        self
    }

    pub fn with_allowsinglequoteinterpolation(mut self, v: bool) -> Self {
        self.allowsinglequoteinterpolation = v;
        self
    }

    pub fn with_strictvars(mut self, v: bool) -> Self {
        self.strictvars = v;
        self
    }

    pub fn with_ccomments(mut self, v: bool) -> Self {
        self.ccomments = v;
        self
    }

    pub fn with_nostripvalues(mut self, v: bool) -> Self {
        self.nostripvalues = v;
        self
    }

    pub fn with_noescape(mut self, v: bool) -> Self {
        self.noescape = v;
        self
    }

    pub fn with_namedblocks(mut self, v: bool) -> Self {
        self.namedblocks = v;
        self
    }

    pub fn with_pre_open(mut self, hook: PreOpenHook) -> Self {
        self.pre_open = Some(hook);
        self
    }

    pub fn with_pre_read(mut self, hook: PreReadHook) -> Self {
        self.pre_read = Some(hook);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_table() {
        let o = Options::new();
        assert!(o.allowmultioptions);
        assert!(o.useapacheinclude);
        assert!(o.strictvars);
        assert!(o.ccomments);
        assert!(o.nostripvalues);
        assert!(o.namedblocks);
        assert!(!o.forcearray);
        assert!(!o.lowercasenames);
        assert!(!o.autotrue);
        assert!(o.flagbits.is_empty());
        assert!(o.configpath.is_empty());
    }

    #[test]
    fn interpolateenv_implies_interpolatevars() {
        let o = Options::new().with_interpolateenv(true);
        assert!(o.interpolatevars);
        assert!(o.interpolateenv);
    }

    #[test]
    fn builder_setters_compose() {
        let o = Options::new().with_forcearray(true).with_lowercasenames(true).with_autotrue(true);
        assert!(o.forcearray);
        assert!(o.lowercasenames);
        assert!(o.autotrue);
    }
}
