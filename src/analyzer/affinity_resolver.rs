use crate::{
    analyzer::AnalyzerError,
    ast::{Expr, ExprKind, InRhs},
    catalog::{Affinity, CollSeqId, Schema},
};

pub struct AffinityResolver;

impl AffinityResolver {
    /// Affinity of an expression, `None` when it has none.
    pub fn affinity(expr: &Expr) -> Option<Affinity> {
        match &expr.kind {
            ExprKind::Alias { expr, .. } => Self::affinity(expr),
            ExprKind::Subquery { select, .. } => select.result.first().and_then(Self::affinity),
            _ => expr.affinity,
        }
    }

    /// Affinity used when `expr` is compared with a value of affinity `other`.
    ///
    /// With both present INTEGER dominates NUMERIC, which dominates the rest
    /// (giving NONE). With only one present that one is used.
    pub fn compare_affinity(expr: &Expr, other: Option<Affinity>) -> Affinity {
        match (Self::affinity(expr), other) {
            (Some(a), Some(b)) => {
                if a == Affinity::Integer || b == Affinity::Integer {
                    Affinity::Integer
                } else if a == Affinity::Numeric || b == Affinity::Numeric {
                    Affinity::Numeric
                } else {
                    Affinity::None
                }
            }
            (Some(a), None) | (None, Some(a)) => a,
            (None, None) => Affinity::None,
        }
    }

    /// Affinity applied by a comparison or IN node to its operands.
    pub fn comparison_affinity(cmp: &Expr) -> Affinity {
        let (left, right) = match &cmp.kind {
            ExprKind::Binary { left, right, .. } => (left.as_ref(), Some(right.as_ref())),
            ExprKind::In { operand, rhs: InRhs::Select(select), .. } => (operand.as_ref(), select.result.first()),
            ExprKind::In { operand, .. } => (operand.as_ref(), None),
            _ => return Self::affinity(cmp).unwrap_or(Affinity::Numeric),
        };
        let aff = Self::affinity(left);
        match right {
            Some(right) => Self::compare_affinity(right, aff),
            None => aff.unwrap_or(Affinity::Numeric),
        }
    }

    /// Whether an index with `index_affinity` can serve the comparison `cmp`.
    pub fn index_affinity_ok(cmp: &Expr, index_affinity: Affinity) -> bool {
        match Self::comparison_affinity(cmp) {
            Affinity::None => true,
            aff if aff.is_numeric() => index_affinity.is_numeric(),
            aff => aff == index_affinity,
        }
    }

    /// Explicit collation of an expression, looking through aliases.
    pub fn expr_collation(expr: &Expr, schema: &Schema) -> Result<Option<CollSeqId>, AnalyzerError> {
        let coll = match (&expr.kind, expr.coll) {
            (ExprKind::Alias { expr: inner, .. }, None) => return Self::expr_collation(inner, schema),
            (_, coll) => coll,
        };
        match coll.and_then(|id| schema.collation(id)) {
            Some(seq) if !seq.available => Err(AnalyzerError::UnknownCollation(seq.name.clone())),
            _ => Ok(coll),
        }
    }

    /// Collation for a binary comparison: left operand's, else right's, else the default.
    pub fn binary_compare_collation(left: &Expr, right: &Expr, schema: &Schema) -> Result<CollSeqId, AnalyzerError> {
        if let Some(coll) = Self::expr_collation(left, schema)? {
            return Ok(coll);
        }
        Ok(Self::expr_collation(right, schema)?.unwrap_or(schema.default_collation()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ast::{BinaryOp, ExprList, Select, SrcList},
        catalog::CollSeq,
    };

    const ALL: [Option<Affinity>; 6] = [
        None,
        Some(Affinity::None),
        Some(Affinity::Text),
        Some(Affinity::Numeric),
        Some(Affinity::Integer),
        Some(Affinity::Blob),
    ];

    fn with_aff(aff: Option<Affinity>) -> Expr {
        let mut e = Expr::column(0, 0);
        e.affinity = aff;
        e
    }

    #[test]
    fn compare_affinity_dominance_table() {
        for a in ALL {
            for b in ALL {
                let got = AffinityResolver::compare_affinity(&with_aff(a), b);
                let expected = match (a, b) {
                    (None, None) => Affinity::None,
                    (Some(x), None) | (None, Some(x)) => x,
                    (Some(x), Some(y)) if x == Affinity::Integer || y == Affinity::Integer => Affinity::Integer,
                    (Some(x), Some(y)) if x == Affinity::Numeric || y == Affinity::Numeric => Affinity::Numeric,
                    _ => Affinity::None,
                };
                assert_eq!(got, expected, "{:?} vs {:?}", a, b);
                // symmetric
                assert_eq!(got, AffinityResolver::compare_affinity(&with_aff(b), a));
            }
        }
    }

    #[test]
    fn affinity_looks_through_alias_and_subquery() {
        let alias = Expr::new(ExprKind::Alias { index: 0, expr: Box::new(with_aff(Some(Affinity::Text))) });
        assert_eq!(AffinityResolver::affinity(&alias), Some(Affinity::Text));

        let select = Select::new(ExprList::from_exprs(vec![with_aff(Some(Affinity::Integer))]), SrcList::default());
        assert_eq!(AffinityResolver::affinity(&Expr::subquery(select)), Some(Affinity::Integer));
    }

    #[test]
    fn comparison_affinity_defaults_to_numeric() {
        let cmp = Expr::binary(BinaryOp::Eq, Expr::integer(1), Expr::integer(2));
        assert_eq!(AffinityResolver::comparison_affinity(&cmp), Affinity::None);

        let in_list = Expr::in_list(Expr::integer(1), vec![Expr::integer(2)]);
        assert_eq!(AffinityResolver::comparison_affinity(&in_list), Affinity::Numeric);

        let in_text = Expr::in_list(with_aff(Some(Affinity::Text)), vec![Expr::integer(2)]);
        assert_eq!(AffinityResolver::comparison_affinity(&in_text), Affinity::Text);

        let select = Select::new(ExprList::from_exprs(vec![with_aff(Some(Affinity::Integer))]), SrcList::default());
        let in_select = Expr::in_select(with_aff(Some(Affinity::Text)), select);
        assert_eq!(AffinityResolver::comparison_affinity(&in_select), Affinity::Integer);
    }

    #[test]
    fn index_affinity_compatibility() {
        let numeric = Expr::binary(BinaryOp::Lt, with_aff(Some(Affinity::Numeric)), Expr::integer(1));
        assert!(AffinityResolver::index_affinity_ok(&numeric, Affinity::Integer));
        assert!(AffinityResolver::index_affinity_ok(&numeric, Affinity::Numeric));
        assert!(!AffinityResolver::index_affinity_ok(&numeric, Affinity::Text));

        let none = Expr::binary(BinaryOp::Lt, Expr::integer(1), Expr::integer(2));
        assert!(AffinityResolver::index_affinity_ok(&none, Affinity::Text));

        let text = Expr::binary(BinaryOp::Eq, with_aff(Some(Affinity::Text)), Expr::string("x"));
        assert!(AffinityResolver::index_affinity_ok(&text, Affinity::Text));
        assert!(!AffinityResolver::index_affinity_ok(&text, Affinity::Integer));
    }

    #[test]
    fn collation_prefers_left_then_right_then_default() {
        let mut schema = Schema::default();
        let nocase = schema.find_collation("NOCASE").unwrap();
        let rtrim = schema.find_collation("RTRIM").unwrap();
        let mut l = Expr::column(0, 0);
        let mut r = Expr::column(0, 1);
        assert_eq!(AffinityResolver::binary_compare_collation(&l, &r, &schema).unwrap(), schema.default_collation());
        r.coll = Some(rtrim);
        assert_eq!(AffinityResolver::binary_compare_collation(&l, &r, &schema).unwrap(), rtrim);
        l.coll = Some(nocase);
        assert_eq!(AffinityResolver::binary_compare_collation(&l, &r, &schema).unwrap(), nocase);

        let missing = schema.register_collation(CollSeq::missing("klingon"));
        l.coll = Some(missing);
        let err = AffinityResolver::binary_compare_collation(&l, &r, &schema).unwrap_err();
        assert_eq!(err.to_string(), "no such collation sequence: klingon");
    }
}
