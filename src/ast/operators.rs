#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Eq, Ne, Lt, Le, Gt, Ge,
    And, Or,
    Plus, Minus, Star, Slash, Rem,
    BitAnd, BitOr, LShift, RShift,
    Concat,
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 18] = [
        BinaryOp::Eq, BinaryOp::Ne, BinaryOp::Lt, BinaryOp::Le, BinaryOp::Gt, BinaryOp::Ge,
        BinaryOp::And, BinaryOp::Or,
        BinaryOp::Plus, BinaryOp::Minus, BinaryOp::Star, BinaryOp::Slash, BinaryOp::Rem,
        BinaryOp::BitAnd, BinaryOp::BitOr, BinaryOp::LShift, BinaryOp::RShift,
        BinaryOp::Concat,
    ];

    pub fn is_comparison(self) -> bool {
        matches!(self, BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Not,
    BitNot,
    Negate,
    Plus,
    IsNull,
    NotNull,
}

impl UnaryOp {
    pub const ALL: [UnaryOp; 6] = [
        UnaryOp::Not, UnaryOp::BitNot, UnaryOp::Negate, UnaryOp::Plus, UnaryOp::IsNull, UnaryOp::NotNull,
    ];
}

/// Any operator that can label an expression node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Binary(BinaryOp),
    Unary(UnaryOp),
}

impl Operator {
    pub fn all() -> impl Iterator<Item = Operator> {
        BinaryOp::ALL
            .into_iter()
            .map(Operator::Binary)
            .chain(UnaryOp::ALL.into_iter().map(Operator::Unary))
    }
}
