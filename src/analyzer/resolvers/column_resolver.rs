use tracing::{debug, warn};

use crate::{
    analyzer::{AnalysisContext, AnalyzerError, NameContext},
    ast::{is_rowid_name, ColumnRef, Expr, ExprKind, LiteralKind, SrcItem},
    catalog::{Affinity, AuthDecision, CollSeqId, TableId},
};

/// A column reference as written: `col`, `tab.col` or `db.tab.col`.
#[derive(Debug, Clone, PartialEq)]
pub struct QualifiedName {
    pub database: Option<String>,
    pub table: Option<String>,
    pub column: String,
    /// Came from a double-quoted token, which falls back to a string literal.
    pub double_quoted: bool,
}

impl QualifiedName {
    pub fn bare(column: &str) -> Self {
        Self { database: None, table: None, column: column.to_string(), double_quoted: false }
    }

    pub fn qualified(database: Option<&str>, table: &str, column: &str) -> Self {
        Self {
            database: database.map(str::to_string),
            table: Some(table.to_string()),
            column: column.to_string(),
            double_quoted: false,
        }
    }

    pub fn display(&self) -> String {
        match (&self.database, &self.table) {
            (Some(db), Some(tab)) => format!("{}.{}.{}", db, tab, self.column),
            (_, Some(tab)) => format!("{}.{}", tab, self.column),
            _ => self.column.clone(),
        }
    }
}

/// Where a name landed while scanning the scope chain.
#[derive(Clone, Copy)]
struct Binding<'s> {
    cursor: i32,
    column: i32,
    table: Option<TableId>,
    affinity: Option<Affinity>,
    coll: Option<CollSeqId>,
    item: Option<&'s SrcItem>,
}

impl Binding<'_> {
    fn unbound() -> Self {
        Self { cursor: -1, column: 0, table: None, affinity: None, coll: None, item: None }
    }
}

pub struct ColumnResolver;

impl ColumnResolver {
    /// Binds `expr` to the column `name` names, searching `nc` and then its
    /// parents. The node becomes a `Column` (or an `Alias` when it names a
    /// result column). Returns true on success.
    pub fn lookup_name(expr: &mut Expr, name: &QualifiedName, nc: &NameContext, ctx: &mut AnalysisContext) -> bool {
        let schema = ctx.schema;
        let mut cnt = 0;
        let mut binding = Binding::unbound();

        for scope in nc.scopes() {
            scope.count_ref();
            let mut cnt_tab = 0;

            for item in &scope.src.items {
                let Some(table_id) = item.table else { continue };
                let Some(table) = schema.table(table_id) else { continue };
                if let Some(qualifier) = &name.table {
                    match &item.alias {
                        Some(alias) if !alias.eq_ignore_ascii_case(qualifier) => continue,
                        Some(_) => {}
                        None => {
                            if !table.name.eq_ignore_ascii_case(qualifier) {
                                continue;
                            }
                            if name.database.as_ref().is_some_and(|db| !table.database.eq_ignore_ascii_case(db)) {
                                continue;
                            }
                        }
                    }
                }
                cnt_tab += 1;
                if cnt_tab == 1 {
                    binding = Binding { cursor: item.cursor, table: Some(table_id), item: Some(item), ..Binding::unbound() };
                }
                if let Some(j) = table.column_index(&name.column) {
                    cnt += 1;
                    let column = &table.columns[j];
                    binding = Binding {
                        cursor: item.cursor,
                        column: if table.ipk == Some(j) { ColumnRef::ROWID } else { j as i32 },
                        table: Some(table_id),
                        affinity: Some(column.affinity),
                        coll: column.coll,
                        item: Some(item),
                    };
                }
            }

            if cnt == 0 && name.database.is_none() {
                if let (Some(qualifier), Some(trigger)) = (&name.table, ctx.trigger) {
                    let cursor = if qualifier.eq_ignore_ascii_case("new") {
                        trigger.new_cursor
                    } else if qualifier.eq_ignore_ascii_case("old") {
                        trigger.old_cursor
                    } else {
                        None
                    };
                    if let (Some(cursor), Some(table)) = (cursor, schema.table(trigger.table)) {
                        cnt_tab += 1;
                        binding = Binding { cursor, table: Some(trigger.table), ..Binding::unbound() };
                        if let Some(j) = table.column_index(&name.column) {
                            cnt += 1;
                            binding.column = if table.ipk == Some(j) { ColumnRef::ROWID } else { j as i32 };
                            binding.affinity = Some(table.columns[j].affinity);
                            binding.coll = table.columns[j].coll;
                        }
                    }
                }
            }

            if cnt == 0 && cnt_tab == 1 && is_rowid_name(&name.column) {
                cnt = 1;
                binding.column = ColumnRef::ROWID;
                binding.affinity = Some(Affinity::Integer);
            }

            if cnt == 0 && name.table.is_none() {
                if let Some(result) = scope.result {
                    let alias_match = result.items.iter().enumerate().find(|(_, item)| {
                        item.alias.as_deref().is_some_and(|a| a.eq_ignore_ascii_case(&name.column))
                    });
                    if let Some((index, item)) = alias_match {
                        debug!(alias = %name.column, index, "resolved result alias");
                        expr.kind = ExprKind::Alias { index, expr: Box::new(item.expr.dup()) };
                        return true;
                    }
                }
            }

            if cnt > 0 {
                break;
            }
        }

        if cnt == 0 && name.double_quoted && name.table.is_none() {
            return true;
        }

        if cnt != 1 {
            let display = name.display();
            let error = if cnt == 0 {
                AnalyzerError::UnknownColumn(display)
            } else {
                AnalyzerError::AmbiguousColumn(display)
            };
            ctx.record_error(nc, error);
            expr.flags.error = true;
        }

        if binding.column >= 0 {
            if let Some(item) = binding.item {
                item.mark_column_used(binding.column);
            }
        }

        expr.kind = ExprKind::Column(ColumnRef { cursor: binding.cursor, column: binding.column, table: binding.table });
        expr.affinity = binding.affinity;
        expr.coll = binding.coll;
        expr.token = Some(name.column.clone());

        if cnt == 1 {
            debug!(name = %name.display(), cursor = binding.cursor, column = binding.column, "resolved column");
            Self::authorize(expr, binding, nc, ctx);
        }
        cnt == 1
    }

    fn authorize(expr: &mut Expr, binding: Binding, nc: &NameContext, ctx: &mut AnalysisContext) {
        let authorizer = ctx.authorizer;
        let schema = ctx.schema;
        let Some(table) = binding.table.and_then(|id| schema.table(id)) else { return };
        let index = usize::try_from(binding.column).ok().or(table.ipk);
        let column = index.and_then(|j| table.column(j)).map_or("ROWID", |c| c.name.as_str());
        match authorizer.authorize_read(table, column) {
            AuthDecision::Allow => {}
            AuthDecision::Ignore => {
                expr.kind = ExprKind::Literal(LiteralKind::Null);
                expr.affinity = None;
                expr.coll = None;
            }
            AuthDecision::Deny => {
                warn!(table = %table.name, column, "column read denied");
                let error = AnalyzerError::AccessDenied { table: table.name.clone(), column: column.to_string() };
                ctx.record_error(nc, error);
                expr.flags.error = true;
            }
        }
    }
}
