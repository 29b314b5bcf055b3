use std::cell::Cell;

use crate::{
    analyzer::AnalyzerError,
    ast::{Expr, ExprList},
    catalog::{Schema, TableId},
};

/// Bit `i` set when column `i` is read; columns past 63 share the top bit.
pub type ColumnMask = u64;

/// One table in a FROM clause, bound to a cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct SrcItem {
    pub database: Option<String>,
    pub name: String,
    pub alias: Option<String>,
    pub table: Option<TableId>,
    pub cursor: i32,
    pub col_used: Cell<ColumnMask>,
}

impl SrcItem {
    pub fn new(name: &str, table: Option<TableId>, cursor: i32) -> Self {
        Self { database: None, name: name.to_string(), alias: None, table, cursor, col_used: Cell::new(0) }
    }

    /// Binds `name` to its schema table; fails with `no such table`.
    pub fn bind(schema: &Schema, name: &str, alias: Option<&str>, cursor: i32) -> Result<Self, AnalyzerError> {
        let table = schema.find_table(name, None).ok_or_else(|| AnalyzerError::UnknownTable(name.to_string()))?;
        let mut item = Self::new(name, Some(table), cursor);
        item.alias = alias.map(str::to_string);
        if let Some(t) = schema.table(table) {
            item.database = Some(t.database.clone());
        }
        Ok(item)
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.to_string());
        self
    }

    /// Name that qualifiers are matched against.
    pub fn visible_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    pub fn mark_column_used(&self, column: i32) {
        let bit = column.clamp(0, 63) as u32;
        self.col_used.set(self.col_used.get() | (1u64 << bit));
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SrcList {
    pub items: Vec<SrcItem>,
}

impl SrcList {
    pub fn new(items: Vec<SrcItem>) -> Self { Self { items } }

    pub fn contains_cursor(&self, cursor: i32) -> bool {
        self.items.iter().any(|i| i.cursor == cursor)
    }

    pub fn len(&self) -> usize { self.items.len() }

    pub fn is_empty(&self) -> bool { self.items.is_empty() }
}

/// The parts of a SELECT that contain expressions. Compiling the SELECT
/// itself is left to a [`SelectCoder`](crate::codegen::SelectCoder).
#[derive(Debug, PartialEq)]
pub struct Select {
    pub result: ExprList,
    pub src: SrcList,
    pub where_clause: Option<Box<Expr>>,
    pub group_by: Option<ExprList>,
    pub having: Option<Box<Expr>>,
    pub order_by: Option<ExprList>,
    pub distinct: bool,
}

impl Select {
    pub fn new(result: ExprList, src: SrcList) -> Self {
        Self { result, src, where_clause: None, group_by: None, having: None, order_by: None, distinct: false }
    }

    pub fn with_where(mut self, expr: Expr) -> Self {
        self.where_clause = Some(Box::new(expr));
        self
    }

    pub fn with_group_by(mut self, list: ExprList) -> Self {
        self.group_by = Some(list);
        self
    }

    pub fn with_having(mut self, expr: Expr) -> Self {
        self.having = Some(Box::new(expr));
        self
    }

    pub fn with_order_by(mut self, list: ExprList) -> Self {
        self.order_by = Some(list);
        self
    }

    pub fn dup(&self) -> Select {
        Select {
            result: self.result.dup(),
            src: self.src.clone(),
            where_clause: self.where_clause.as_ref().map(|e| Box::new(e.dup())),
            group_by: self.group_by.as_ref().map(ExprList::dup),
            having: self.having.as_ref().map(|e| Box::new(e.dup())),
            order_by: self.order_by.as_ref().map(ExprList::dup),
            distinct: self.distinct,
        }
    }

    /// Every top-level expression of the SELECT: result columns, WHERE,
    /// GROUP BY, HAVING, ORDER BY.
    pub fn exprs_mut(&mut self) -> Vec<&mut Expr> {
        let mut out: Vec<&mut Expr> = self.result.iter_mut().collect();
        if let Some(w) = self.where_clause.as_deref_mut() {
            out.push(w);
        }
        if let Some(g) = self.group_by.as_mut() {
            out.extend(g.iter_mut());
        }
        if let Some(h) = self.having.as_deref_mut() {
            out.push(h);
        }
        if let Some(o) = self.order_by.as_mut() {
            out.extend(o.iter_mut());
        }
        out
    }
}
