use crate::{
    analyzer::{AnalysisContext, AnalyzerError, ColumnResolver, FunctionResolver, NameContext, QualifiedName},
    ast::{dequote, is_double_quoted, walk_expr, Expr, ExprKind, LiteralKind, Select, WalkControl},
};

pub struct NameResolver;

impl NameResolver {
    /// Resolves every identifier and function call in `expr` against `nc`
    /// and its parents. Returns the number of errors found.
    pub fn resolve(expr: &mut Expr, nc: &NameContext, ctx: &mut AnalysisContext) -> usize {
        let before = nc.n_err();
        Self::walk(expr, nc, ctx);
        let errors = nc.n_err() - before;
        if errors > 0 {
            expr.flags.error = true;
        }
        errors
    }

    pub(crate) fn walk(expr: &mut Expr, nc: &NameContext, ctx: &mut AnalysisContext) {
        walk_expr(expr, &mut |e: &mut Expr| Self::step(e, nc, ctx));
    }

    fn step(expr: &mut Expr, nc: &NameContext, ctx: &mut AnalysisContext) -> WalkControl {
        if expr.flags.resolved {
            return WalkControl::SkipChildren;
        }
        expr.flags.resolved = true;

        let name = match &expr.kind {
            ExprKind::Literal(LiteralKind::String) if is_double_quoted(expr.name()) => {
                Some(QualifiedName { double_quoted: true, ..QualifiedName::bare(&dequote(expr.name())) })
            }
            ExprKind::Id => Some(QualifiedName::bare(expr.name())),
            ExprKind::Dot { left, right } => match &right.kind {
                ExprKind::Dot { left: table, right: column } => {
                    Some(QualifiedName::qualified(Some(left.name()), table.name(), column.name()))
                }
                _ => Some(QualifiedName::qualified(None, left.name(), right.name())),
            },
            _ => None,
        };
        if let Some(name) = name {
            ColumnResolver::lookup_name(expr, &name, nc, ctx);
            return WalkControl::SkipChildren;
        }

        if matches!(expr.kind, ExprKind::Function { .. }) {
            return FunctionResolver::resolve_function(expr, nc, ctx);
        }

        if let Some(select) = expr.select_mut() {
            let n_ref = nc.n_ref();
            let errors = Self::resolve_select(select, Some(nc), ctx);
            nc.add_errors(errors);
            if nc.n_ref() != n_ref {
                expr.flags.correlated = true;
            }
        }
        WalkControl::Continue
    }

    /// Resolves the expressions of a SELECT in a new scope nested in `outer`.
    ///
    /// The result list is resolved first; WHERE, GROUP BY, HAVING and ORDER BY
    /// then see its `AS` names. Aggregates are refused in WHERE and GROUP BY,
    /// and in HAVING and ORDER BY unless the query is an aggregate query.
    /// Returns the number of errors found in this query block.
    pub fn resolve_select(select: &mut Select, outer: Option<&NameContext>, ctx: &mut AnalysisContext) -> usize {
        let Select { result, src, where_clause, group_by, having, order_by, .. } = select;

        let mut first = NameContext::new(src);
        if let Some(outer) = outer {
            first = first.with_parent(outer);
        }
        for e in result.iter_mut() {
            Self::resolve(e, &first, ctx);
        }
        let is_agg = group_by.is_some() || first.has_agg();
        if having.is_some() && !is_agg {
            ctx.record_error(&first, AnalyzerError::HavingWithoutGroupBy);
        }

        let mut nc = NameContext::new(src).with_result(result).continuing(&first).allowing_aggregates(false);
        if let Some(outer) = outer {
            nc = nc.with_parent(outer);
        }
        if let Some(w) = where_clause.as_deref_mut() {
            Self::resolve(w, &nc, ctx);
        }
        for e in group_by.iter_mut().flat_map(|g| g.iter_mut()) {
            Self::resolve(e, &nc, ctx);
        }
        nc.set_allow_agg(is_agg);
        if let Some(h) = having.as_deref_mut() {
            Self::resolve(h, &nc, ctx);
        }
        for e in order_by.iter_mut().flat_map(|o| o.iter_mut()) {
            Self::resolve(e, &nc, ctx);
        }
        nc.n_err()
    }
}
