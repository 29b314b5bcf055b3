use tracing::debug;

use crate::{
    analyzer::{AnalyzerError, NameContext},
    catalog::{AllowAll, ColumnAuthorizer, CompileConfig, FunctionCatalog, Schema, TableId},
};

/// Trigger being compiled: `new.` and `old.` resolve against its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerScope {
    pub table: TableId,
    /// Cursor holding the `new` row (INSERT/UPDATE triggers).
    pub new_cursor: Option<i32>,
    /// Cursor holding the `old` row (UPDATE/DELETE triggers).
    pub old_cursor: Option<i32>,
}

/// Everything name resolution needs besides the scope chain.
pub struct AnalysisContext<'a> {
    pub schema: &'a Schema,
    pub functions: &'a FunctionCatalog,
    pub config: &'a CompileConfig,
    pub authorizer: &'a dyn ColumnAuthorizer,
    pub trigger: Option<TriggerScope>,
    /// Errors in the order they were found.
    pub errors: Vec<AnalyzerError>,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(schema: &'a Schema, functions: &'a FunctionCatalog, config: &'a CompileConfig) -> Self {
        Self { schema, functions, config, authorizer: &AllowAll, trigger: None, errors: Vec::new() }
    }

    pub fn with_authorizer(mut self, authorizer: &'a dyn ColumnAuthorizer) -> Self {
        self.authorizer = authorizer;
        self
    }

    pub fn with_trigger(mut self, trigger: TriggerScope) -> Self {
        self.trigger = Some(trigger);
        self
    }

    /// Records an error and counts it on `nc`.
    pub fn record_error(&mut self, nc: &NameContext, error: AnalyzerError) {
        debug!(%error, "name resolution error");
        nc.count_error();
        self.errors.push(error);
    }

    pub fn take_errors(&mut self) -> Vec<AnalyzerError> {
        std::mem::take(&mut self.errors)
    }
}
