use crate::catalog::Table;

/// Outcome of a column read authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthDecision {
    Allow,
    /// Read as NULL instead of the column value.
    Ignore,
    Deny,
}

/// Hook consulted for every successfully resolved column reference.
pub trait ColumnAuthorizer {
    fn authorize_read(&self, table: &Table, column: &str) -> AuthDecision;
}

/// Authorizer that allows everything.
pub struct AllowAll;

impl ColumnAuthorizer for AllowAll {
    fn authorize_read(&self, _table: &Table, _column: &str) -> AuthDecision {
        AuthDecision::Allow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        analyzer::AnalysisContext,
        catalog::{CompileConfig, FunctionCatalog, Schema},
    };

    #[test]
    fn contexts_allow_every_read_by_default() {
        let schema = Schema::default();
        let functions = FunctionCatalog::new();
        let config = CompileConfig::new();
        let ctx = AnalysisContext::new(&schema, &functions, &config);
        let table = Table::new("t").with_column("secret", None);
        assert_eq!(ctx.authorizer.authorize_read(&table, "secret"), AuthDecision::Allow);
    }
}
