use crate::ast::Expr;

#[derive(Debug, PartialEq)]
pub struct ExprItem {
    pub expr: Expr,
    /// `AS` name of a result column.
    pub alias: Option<String>,
}

/// Ordered list of expressions: function arguments, result columns, GROUP BY terms.
#[derive(Debug, PartialEq, Default)]
pub struct ExprList {
    pub items: Vec<ExprItem>,
}

impl ExprList {
    pub fn new() -> Self { Self::default() }

    pub fn from_exprs(exprs: Vec<Expr>) -> Self {
        Self { items: exprs.into_iter().map(|expr| ExprItem { expr, alias: None }).collect() }
    }

    pub fn push(&mut self, expr: Expr, alias: Option<&str>) {
        self.items.push(ExprItem { expr, alias: alias.map(str::to_string) });
    }

    pub fn with(mut self, expr: Expr, alias: Option<&str>) -> Self {
        self.push(expr, alias);
        self
    }

    pub fn len(&self) -> usize { self.items.len() }

    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    pub fn first(&self) -> Option<&Expr> {
        self.items.first().map(|i| &i.expr)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Expr> {
        self.items.iter().map(|i| &i.expr)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Expr> {
        self.items.iter_mut().map(|i| &mut i.expr)
    }

    /// Deep copy; unlike [`Expr::dup`] the span of each top-level item is kept.
    pub fn dup(&self) -> ExprList {
        let items = self
            .items
            .iter()
            .map(|item| {
                let mut expr = item.expr.dup();
                expr.span = item.expr.span.clone();
                ExprItem { expr, alias: item.alias.clone() }
            })
            .collect();
        ExprList { items }
    }

    pub fn compare(&self, other: &ExprList) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a.compare(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dup_preserves_top_level_spans_and_aliases() {
        let list = ExprList::new()
            .with(Expr::id("a").with_span("a"), Some("x"))
            .with(Expr::integer(1).with_span("1"), None);
        let copy = list.dup();
        assert_eq!(copy.items[0].expr.span.as_deref(), Some("a"));
        assert_eq!(copy.items[0].alias.as_deref(), Some("x"));
        assert!(list.compare(&copy));
    }

    #[test]
    fn compare_requires_same_length() {
        let a = ExprList::from_exprs(vec![Expr::integer(1)]);
        let b = ExprList::from_exprs(vec![Expr::integer(1), Expr::integer(2)]);
        assert!(!a.compare(&b));
        assert_eq!(b.first().and_then(|e| e.as_integer()), Some(1));
    }
}
