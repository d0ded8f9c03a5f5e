//! AST cache, scoped to one `load`/`loads` call.
//!
//! A plain `HashMap<String, Rc<ast::Config>>` (single-threaded per the
//! concurrency model, so `Rc` not `Arc`), constructed fresh per call and
//! dropped at the end of that call — a local variable threaded through the
//! Loader rather than global state, consistent with the teacher's avoidance
//! of `static` interpreter state.

use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::types::Config;

#[derive(Debug, Default)]
pub struct AstCache {
    entries: HashMap<String, Rc<Config>>,
}

impl AstCache {
    pub fn new() -> Self {
        AstCache { entries: HashMap::new() }
    }

    pub fn get(&self, canonical_id: &str) -> Option<Rc<Config>> {
        self.entries.get(canonical_id).cloned()
    }

    pub fn contains(&self, canonical_id: &str) -> bool {
        self.entries.contains_key(canonical_id)
    }

    pub fn insert(&mut self, canonical_id: String, config: Rc<Config>) {
        self.entries.insert(canonical_id, config);
    }
}
