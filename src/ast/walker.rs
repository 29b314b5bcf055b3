use crate::ast::{Expr, ExprKind, ExprList, InRhs};

/// Visitor verdict for a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkControl {
    Continue,
    SkipChildren,
    Abort,
}

/// Pre-order walk over an expression tree. Sub-selects are not entered.
///
/// Returns `true` when the visitor aborted the walk.
pub fn walk_expr<F>(expr: &mut Expr, f: &mut F) -> bool
where
    F: FnMut(&mut Expr) -> WalkControl,
{
    match f(expr) {
        WalkControl::Abort => return true,
        WalkControl::SkipChildren => return false,
        WalkControl::Continue => {}
    }
    match &mut expr.kind {
        ExprKind::Dot { left, right } | ExprKind::Binary { left, right, .. } => {
            walk_expr(left, f) || walk_expr(right, f)
        }
        ExprKind::Alias { expr, .. } => walk_expr(expr, f),
        ExprKind::Unary { operand, .. } => walk_expr(operand, f),
        ExprKind::Function { args, .. } => walk_list(args, f),
        ExprKind::Case { base, arms, otherwise } => {
            base.as_deref_mut().is_some_and(|b| walk_expr(b, f))
                || arms.iter_mut().any(|arm| walk_expr(&mut arm.when, f) || walk_expr(&mut arm.then, f))
                || otherwise.as_deref_mut().is_some_and(|e| walk_expr(e, f))
        }
        ExprKind::Between { operand, bounds } => {
            walk_expr(operand, f) || bounds.iter_mut().any(|b| walk_expr(b, f))
        }
        ExprKind::In { operand, rhs, .. } => {
            walk_expr(operand, f)
                || match rhs {
                    InRhs::List(list) => walk_list(list, f),
                    InRhs::Select(_) => false,
                }
        }
        _ => false,
    }
}

pub fn walk_list<F>(list: &mut ExprList, f: &mut F) -> bool
where
    F: FnMut(&mut Expr) -> WalkControl,
{
    list.iter_mut().any(|e| walk_expr(e, f))
}

/// Read-only counterpart of [`walk_expr`].
pub fn walk_expr_ref<F>(expr: &Expr, f: &mut F) -> bool
where
    F: FnMut(&Expr) -> WalkControl,
{
    match f(expr) {
        WalkControl::Abort => return true,
        WalkControl::SkipChildren => return false,
        WalkControl::Continue => {}
    }
    match &expr.kind {
        ExprKind::Dot { left, right } | ExprKind::Binary { left, right, .. } => {
            walk_expr_ref(left, f) || walk_expr_ref(right, f)
        }
        ExprKind::Alias { expr, .. } => walk_expr_ref(expr, f),
        ExprKind::Unary { operand, .. } => walk_expr_ref(operand, f),
        ExprKind::Function { args, .. } => args.iter().any(|e| walk_expr_ref(e, f)),
        ExprKind::Case { base, arms, otherwise } => {
            base.as_deref().is_some_and(|b| walk_expr_ref(b, f))
                || arms.iter().any(|arm| walk_expr_ref(&arm.when, f) || walk_expr_ref(&arm.then, f))
                || otherwise.as_deref().is_some_and(|e| walk_expr_ref(e, f))
        }
        ExprKind::Between { operand, bounds } => {
            walk_expr_ref(operand, f) || bounds.iter().any(|b| walk_expr_ref(b, f))
        }
        ExprKind::In { operand, rhs, .. } => {
            walk_expr_ref(operand, f)
                || match rhs {
                    InRhs::List(list) => list.iter().any(|e| walk_expr_ref(e, f)),
                    InRhs::Select(_) => false,
                }
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOp, ExprList, Select, SrcList};

    fn names(expr: &Expr) -> Vec<String> {
        let mut seen = Vec::new();
        walk_expr_ref(expr, &mut |e: &Expr| {
            if let ExprKind::Id = e.kind {
                seen.push(e.name().to_string());
            }
            WalkControl::Continue
        });
        seen
    }

    #[test]
    fn visits_in_pre_order() {
        let e = Expr::binary(
            BinaryOp::Plus,
            Expr::function("f", vec![Expr::id("a"), Expr::id("b")]),
            Expr::between(Expr::id("c"), Expr::id("d"), Expr::id("e")),
        );
        assert_eq!(names(&e), ["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn skip_children_and_abort() {
        let mut e = Expr::binary(BinaryOp::And, Expr::function("f", vec![Expr::id("a")]), Expr::id("b"));
        let mut visited = 0;
        let aborted = walk_expr(&mut e, &mut |n: &mut Expr| {
            visited += 1;
            match n.kind {
                ExprKind::Function { .. } => WalkControl::SkipChildren,
                _ => WalkControl::Continue,
            }
        });
        assert!(!aborted);
        assert_eq!(visited, 3);

        let mut visited = 0;
        let aborted = walk_expr(&mut e, &mut |_: &mut Expr| {
            visited += 1;
            WalkControl::Abort
        });
        assert!(aborted);
        assert_eq!(visited, 1);
    }

    #[test]
    fn sub_selects_are_not_entered() {
        let select = Select::new(ExprList::from_exprs(vec![Expr::id("inner")]), SrcList::default());
        let e = Expr::in_select(Expr::id("outer"), select);
        assert_eq!(names(&e), ["outer"]);
    }

    #[test]
    fn visitor_can_rewrite_nodes() {
        let mut e = Expr::binary(BinaryOp::Plus, Expr::id("a"), Expr::id("b"));
        walk_expr(&mut e, &mut |n: &mut Expr| {
            if let ExprKind::Id = n.kind {
                *n = Expr::integer(1);
            }
            WalkControl::Continue
        });
        assert!(e.compare(&Expr::binary(BinaryOp::Plus, Expr::integer(1), Expr::integer(1))));
    }
}
