use crate::{
    analyzer::{AnalysisContext, AnalyzerError, NameContext, NameResolver},
    ast::{Expr, ExprKind, WalkControl},
};

pub struct FunctionResolver;

impl FunctionResolver {
    /// Binds a call to its definition and resolves the arguments.
    ///
    /// Aggregates are only accepted where `nc` allows them, and may not be
    /// nested inside each other's arguments.
    pub fn resolve_function(expr: &mut Expr, nc: &NameContext, ctx: &mut AnalysisContext) -> WalkControl {
        let name = expr.name().to_string();
        let ExprKind::Function { args, aggregate, def } = &mut expr.kind else {
            return WalkControl::Continue;
        };
        let functions = ctx.functions;
        let enc = ctx.config.encoding;

        let mut is_agg = false;
        match functions.lookup(&name, args.len() as i32, enc) {
            Some(id) => {
                *def = Some(id);
                is_agg = functions.get(id).is_some_and(|d| d.is_aggregate());
            }
            None if functions.has_name(&name) => {
                ctx.record_error(nc, AnalyzerError::FunctionArgMismatch(name.clone()));
            }
            None => ctx.record_error(nc, AnalyzerError::FunctionNotFound(name.clone())),
        }
        if is_agg && !nc.allow_agg() {
            ctx.record_error(nc, AnalyzerError::AggregateMisuse(name.clone()));
            is_agg = false;
        }
        if is_agg {
            *aggregate = true;
            nc.mark_has_agg();
        }

        let saved = is_agg.then(|| nc.set_allow_agg(false));
        for arg in args.iter_mut() {
            NameResolver::walk(arg, nc, ctx);
        }
        if let Some(saved) = saved {
            nc.set_allow_agg(saved);
        }
        WalkControl::SkipChildren
    }
}
