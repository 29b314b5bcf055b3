use indexmap::IndexMap;
use tracing::debug;

use crate::catalog::{FuncId, FunctionDef, TextEncoding};

/// Case-insensitive catalog of scalar and aggregate function definitions.
///
/// Several definitions may share a name (different arity or preferred
/// encoding); lookups pick the best-scoring one.
#[derive(Debug, Default, Clone)]
pub struct FunctionCatalog {
    defs: Vec<FunctionDef>,
    by_name: IndexMap<String, Vec<FuncId>>,
}

impl FunctionCatalog {
    pub fn new() -> Self { Self::default() }

    pub fn register(&mut self, def: FunctionDef) -> FuncId {
        let id = FuncId(self.defs.len());
        debug!(name = %def.name, n_arg = def.n_arg, kind = ?def.kind, "registering function");
        self.by_name.entry(def.name.to_ascii_lowercase()).or_default().push(id);
        self.defs.push(def);
        id
    }

    pub fn get(&self, id: FuncId) -> Option<&FunctionDef> {
        self.defs.get(id.0)
    }

    pub fn list(&self) -> Vec<String> {
        let mut v: Vec<_> = self.by_name.keys().cloned().collect();
        v.sort();
        v
    }

    /// Whether a defined function of any arity exists under `name`.
    pub fn has_name(&self, name: &str) -> bool {
        self.by_name
            .get(&name.to_ascii_lowercase())
            .is_some_and(|ids| ids.iter().any(|id| self.defs[id.0].is_defined()))
    }

    fn best_match(&self, name: &str, n_arg: i32, enc: TextEncoding) -> (Option<FuncId>, u8) {
        let mut best = (None, 0);
        for id in self.by_name.get(&name.to_ascii_lowercase()).into_iter().flatten() {
            let quality = self.defs[id.0].match_quality(n_arg, enc);
            if quality > best.1 {
                best = (Some(*id), quality);
            }
        }
        best
    }

    /// Read-only lookup; blank definitions are never returned.
    pub fn lookup(&self, name: &str, n_arg: i32, enc: TextEncoding) -> Option<FuncId> {
        let n_arg = n_arg.max(-1);
        self.best_match(name, n_arg, enc)
            .0
            .filter(|id| self.defs[id.0].is_defined())
    }

    /// Finds the best definition for `name`, registering a blank one under
    /// (name, n_arg, enc) when `create` is set and no exact match exists.
    pub fn find_function(&mut self, name: &str, n_arg: i32, enc: TextEncoding, create: bool) -> Option<FuncId> {
        if !create {
            return self.lookup(name, n_arg, enc);
        }
        let n_arg = n_arg.max(-1);
        match self.best_match(name, n_arg, enc) {
            (Some(id), 6) => Some(id),
            _ => Some(self.register(FunctionDef::blank(name, n_arg, enc))),
        }
    }

    /// Catalog preloaded with the standard scalar and aggregate functions.
    pub fn with_builtins() -> Self {
        let mut catalog = Self::new();
        for (name, n_arg) in [("count", 0), ("count", 1), ("sum", 1), ("total", 1), ("avg", 1)] {
            catalog.register(FunctionDef::aggregate(name, n_arg));
        }
        catalog.register(FunctionDef::aggregate("min", 1).needing_coll_seq());
        catalog.register(FunctionDef::aggregate("max", 1).needing_coll_seq());
        catalog.register(FunctionDef::scalar("min", -1).needing_coll_seq());
        catalog.register(FunctionDef::scalar("max", -1).needing_coll_seq());
        for (name, n_arg) in [
            ("abs", 1),
            ("length", 1),
            ("lower", 1),
            ("upper", 1),
            ("substr", 3),
            ("round", 1),
            ("round", 2),
            ("coalesce", -1),
            ("ifnull", 2),
            ("nullif", 2),
            ("like", 2),
            ("like", 3),
            ("glob", 2),
            ("typeof", 1),
            ("quote", 1),
            ("random", -1),
            ("current_time", 0),
            ("current_date", 0),
            ("current_timestamp", 0),
        ] {
            catalog.register(FunctionDef::scalar(name, n_arg));
        }
        catalog
    }
}
