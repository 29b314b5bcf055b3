use crate::{
    ast::{Expr, ExprKind},
    catalog::FuncId,
};

/// One accumulator slot of an aggregate query.
#[derive(Debug, PartialEq)]
pub struct AggEntry {
    /// Set for aggregate calls, `None` for plain column references.
    pub func: Option<FuncId>,
    /// Copy of the expression the slot was created for.
    pub expr: Expr,
}

impl AggEntry {
    pub fn is_aggregate(&self) -> bool {
        self.func.is_some()
    }
}

/// Accumulator layout built by the aggregate classifier for one query block.
#[derive(Debug, Default, PartialEq)]
pub struct AggInfo {
    pub entries: Vec<AggEntry>,
}

impl AggInfo {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn get(&self, index: usize) -> Option<&AggEntry> {
        self.entries.get(index)
    }

    /// Slot of a plain column reference reading (cursor, column).
    pub fn find_column(&self, cursor: i32, column: i32) -> Option<usize> {
        self.entries.iter().position(|entry| {
            !entry.is_aggregate()
                && matches!(entry.expr.kind, ExprKind::Column(c) if c.cursor == cursor && c.column == column)
        })
    }

    /// Slot of an aggregate call structurally equal to `expr`.
    pub fn find_aggregate(&self, expr: &Expr) -> Option<usize> {
        self.entries.iter().position(|entry| entry.is_aggregate() && entry.expr.compare(expr))
    }

    pub fn push(&mut self, func: Option<FuncId>, expr: Expr) -> usize {
        self.entries.push(AggEntry { func, expr });
        self.entries.len() - 1
    }

    pub fn aggregates(&self) -> impl Iterator<Item = &AggEntry> {
        self.entries.iter().filter(|e| e.is_aggregate())
    }
}
