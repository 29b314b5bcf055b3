use crate::{
    analyzer::{AggInfo, AnalysisContext, AnalyzerError, NameContext},
    ast::{walk_expr, AggSlot, Expr, ExprKind, WalkControl},
};

pub struct AggregateResolver;

impl AggregateResolver {
    /// Assigns accumulator slots in `agg_info` to the aggregate calls and the
    /// columns of `nc`'s FROM clause found in `expr`. Must run after name
    /// resolution. Returns the number of new errors.
    pub fn classify(expr: &mut Expr, nc: &NameContext, agg_info: &mut AggInfo, ctx: &mut AnalysisContext) -> usize {
        let before = ctx.errors.len();
        Self::walk(expr, nc, 0, agg_info, ctx);
        ctx.errors.len() - before
    }

    fn walk(expr: &mut Expr, nc: &NameContext, depth: usize, agg_info: &mut AggInfo, ctx: &mut AnalysisContext) {
        walk_expr(expr, &mut |e: &mut Expr| Self::step(e, nc, depth, agg_info, ctx));
    }

    fn step(expr: &mut Expr, nc: &NameContext, depth: usize, agg_info: &mut AggInfo, ctx: &mut AnalysisContext) -> WalkControl {
        match &expr.kind {
            ExprKind::Column(col) => {
                let col = *col;
                if nc.src.contains_cursor(col.cursor) {
                    let index = match agg_info.find_column(col.cursor, col.column) {
                        Some(index) => index,
                        None => agg_info.push(None, expr.dup()),
                    };
                    expr.agg = Some(AggSlot { index, depth });
                }
                return WalkControl::SkipChildren;
            }
            ExprKind::Function { aggregate: true, def, args } if depth == 0 => {
                let (def, n_arg) = (*def, args.len() as i32);
                let index = match agg_info.find_aggregate(expr) {
                    Some(index) => index,
                    None => {
                        let func = def.or_else(|| ctx.functions.lookup(expr.name(), n_arg, ctx.config.encoding));
                        if func.is_none() {
                            ctx.record_error(nc, AnalyzerError::FunctionNotFound(expr.name().to_string()));
                        }
                        agg_info.push(func, expr.dup())
                    }
                };
                expr.agg = Some(AggSlot { index, depth: 0 });
                return WalkControl::SkipChildren;
            }
            _ => {}
        }
        if let Some(select) = expr.select_mut() {
            for e in select.exprs_mut() {
                Self::walk(e, nc, depth + 1, agg_info, ctx);
            }
        }
        WalkControl::Continue
    }
}
