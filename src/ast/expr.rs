use crate::{
    ast::{quote_string, walk_expr_ref, BinaryOp, ExprList, LiteralKind, Select, UnaryOp, WalkControl},
    catalog::{Affinity, CollSeqId, FuncId, TableId},
};

/// Annotations set by name resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExprFlags {
    pub resolved: bool,
    pub error: bool,
    /// Sub-select that references a column of an enclosing query.
    pub correlated: bool,
}

/// Binding of a column reference to an open cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRef {
    pub cursor: i32,
    /// Column index in the table, or [`ColumnRef::ROWID`].
    pub column: i32,
    pub table: Option<TableId>,
}

impl ColumnRef {
    pub const ROWID: i32 = -1;

    pub fn is_rowid(&self) -> bool {
        self.column < 0
    }
}

/// Slot in the aggregate accumulator assigned by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggSlot {
    pub index: usize,
    /// Subquery nesting depth at which the slot lives (0 = current query).
    pub depth: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaiseAction {
    Ignore,
    Rollback,
    Abort,
    Fail,
}

impl RaiseAction {
    /// Conflict-resolution code carried by `Halt`.
    pub fn code(self) -> i32 {
        match self {
            RaiseAction::Rollback => 1,
            RaiseAction::Abort => 2,
            RaiseAction::Fail => 3,
            RaiseAction::Ignore => 4,
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct CaseArm {
    pub when: Expr,
    pub then: Expr,
}

#[derive(Debug, PartialEq)]
pub enum InRhs {
    List(ExprList),
    Select(Box<Select>),
}

#[derive(Debug, PartialEq)]
pub enum ExprKind {
    /// Unresolved bare identifier; the name is the node's token.
    Id,
    /// Unresolved `table.column`; `db.table.column` nests as `Dot { db, Dot { table, column } }`.
    Dot { left: Box<Expr>, right: Box<Expr> },
    Column(ColumnRef),
    /// Reference to result column `index`, carrying a copy of that expression.
    Alias { index: usize, expr: Box<Expr> },
    Literal(LiteralKind),
    Variable { slot: usize },
    /// Value cached in memory cell `slot`.
    Register { slot: usize },
    Unary { op: UnaryOp, operand: Box<Expr> },
    Binary { op: BinaryOp, left: Box<Expr>, right: Box<Expr> },
    Function { args: ExprList, aggregate: bool, def: Option<FuncId> },
    Case { base: Option<Box<Expr>>, arms: Vec<CaseArm>, otherwise: Option<Box<Expr>> },
    Between { operand: Box<Expr>, bounds: Box<[Expr; 2]> },
    In { operand: Box<Expr>, rhs: InRhs, cursor: Option<i32> },
    Exists { select: Box<Select>, mem: Option<usize> },
    Subquery { select: Box<Select>, mem: Option<usize> },
    /// `RAISE(action, message)`; the message is the node's token.
    Raise { action: RaiseAction },
}

#[derive(Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    /// Source text of the node: identifier, literal text or function name.
    pub token: Option<String>,
    /// Source text of the whole subtree, kept for result-column naming.
    pub span: Option<String>,
    pub affinity: Option<Affinity>,
    pub coll: Option<CollSeqId>,
    pub flags: ExprFlags,
    pub agg: Option<AggSlot>,
}

pub fn is_rowid_name(name: &str) -> bool {
    ["_ROWID_", "ROWID", "OID"].iter().any(|r| r.eq_ignore_ascii_case(name))
}

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        Self { kind, token: None, span: None, affinity: None, coll: None, flags: ExprFlags::default(), agg: None }
    }

    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    pub fn with_span(mut self, span: &str) -> Self {
        self.span = Some(span.to_string());
        self
    }

    pub fn id(name: &str) -> Self {
        Self::new(ExprKind::Id).with_token(name)
    }

    pub fn qualified(table: &str, column: &str) -> Self {
        Self::new(ExprKind::Dot { left: Box::new(Self::id(table)), right: Box::new(Self::id(column)) })
    }

    pub fn qualified_db(database: &str, table: &str, column: &str) -> Self {
        Self::new(ExprKind::Dot {
            left: Box::new(Self::id(database)),
            right: Box::new(Self::qualified(table, column)),
        })
    }

    pub fn integer(value: i64) -> Self {
        Self::integer_text(&value.to_string())
    }

    /// Integer literal from source text, which may exceed 64 bits.
    pub fn integer_text(text: &str) -> Self {
        Self::new(ExprKind::Literal(LiteralKind::Integer)).with_token(text)
    }

    pub fn float(text: &str) -> Self {
        Self::new(ExprKind::Literal(LiteralKind::Float)).with_token(text)
    }

    pub fn string(value: &str) -> Self {
        Self::new(ExprKind::Literal(LiteralKind::String)).with_token(&quote_string(value))
    }

    /// Double-quoted token: a column name if one matches, otherwise a string.
    pub fn quoted(text: &str) -> Self {
        let token = format!("\"{}\"", text.replace('"', "\"\""));
        Self::new(ExprKind::Literal(LiteralKind::String)).with_token(&token)
    }

    pub fn blob(hex: &str) -> Self {
        Self::new(ExprKind::Literal(LiteralKind::Blob)).with_token(&format!("x'{}'", hex))
    }

    pub fn null() -> Self {
        Self::new(ExprKind::Literal(LiteralKind::Null))
    }

    /// Host parameter (`?`, `?NNN`, `:name`, `$name`); numbered by [`VariableNumbering`](crate::ast::VariableNumbering).
    pub fn variable(token: &str) -> Self {
        Self::new(ExprKind::Variable { slot: 0 }).with_token(token)
    }

    /// Already-resolved column reference.
    pub fn column(cursor: i32, column: i32) -> Self {
        let mut e = Self::new(ExprKind::Column(ColumnRef { cursor, column, table: None }));
        e.flags.resolved = true;
        e
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Self::new(ExprKind::Unary { op, operand: Box::new(operand) })
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Self::new(ExprKind::Binary { op, left: Box::new(left), right: Box::new(right) })
    }

    pub fn function(name: &str, args: Vec<Expr>) -> Self {
        Self::new(ExprKind::Function { args: ExprList::from_exprs(args), aggregate: false, def: None })
            .with_token(name)
    }

    /// `count(*)`, represented as a call with no arguments.
    pub fn count_star() -> Self {
        Self::function("count", Vec::new())
    }

    pub fn case(base: Option<Expr>, arms: Vec<(Expr, Expr)>, otherwise: Option<Expr>) -> Self {
        Self::new(ExprKind::Case {
            base: base.map(Box::new),
            arms: arms.into_iter().map(|(when, then)| CaseArm { when, then }).collect(),
            otherwise: otherwise.map(Box::new),
        })
    }

    pub fn between(operand: Expr, low: Expr, high: Expr) -> Self {
        Self::new(ExprKind::Between { operand: Box::new(operand), bounds: Box::new([low, high]) })
    }

    pub fn in_list(operand: Expr, items: Vec<Expr>) -> Self {
        Self::new(ExprKind::In {
            operand: Box::new(operand),
            rhs: InRhs::List(ExprList::from_exprs(items)),
            cursor: None,
        })
    }

    pub fn in_select(operand: Expr, select: Select) -> Self {
        Self::new(ExprKind::In { operand: Box::new(operand), rhs: InRhs::Select(Box::new(select)), cursor: None })
    }

    pub fn exists(select: Select) -> Self {
        Self::new(ExprKind::Exists { select: Box::new(select), mem: None })
    }

    pub fn subquery(select: Select) -> Self {
        Self::new(ExprKind::Subquery { select: Box::new(select), mem: None })
    }

    pub fn raise(action: RaiseAction, message: &str) -> Self {
        Self::new(ExprKind::Raise { action }).with_token(&quote_string(message))
    }

    /// Joins two optional predicates with AND.
    pub fn and(left: Option<Expr>, right: Option<Expr>) -> Option<Expr> {
        match (left, right) {
            (Some(l), Some(r)) => Some(Self::binary(BinaryOp::And, l, r)),
            (l, None) => l,
            (None, r) => r,
        }
    }

    pub fn name(&self) -> &str {
        self.token.as_deref().unwrap_or("")
    }

    /// The sub-select owned by this node, if any.
    pub fn select(&self) -> Option<&Select> {
        match &self.kind {
            ExprKind::Exists { select, .. }
            | ExprKind::Subquery { select, .. }
            | ExprKind::In { rhs: InRhs::Select(select), .. } => Some(select),
            _ => None,
        }
    }

    pub fn select_mut(&mut self) -> Option<&mut Select> {
        match &mut self.kind {
            ExprKind::Exists { select, .. }
            | ExprKind::Subquery { select, .. }
            | ExprKind::In { rhs: InRhs::Select(select), .. } => Some(select),
            _ => None,
        }
    }

    /// Deep copy. The token is kept and the span dropped.
    pub fn dup(&self) -> Expr {
        Expr {
            kind: self.kind.dup(),
            token: self.token.clone(),
            span: None,
            affinity: self.affinity,
            coll: self.coll,
            flags: self.flags,
            agg: self.agg,
        }
    }

    /// Structural equality used to deduplicate aggregates.
    ///
    /// Any node owning a sub-select compares unequal. Token text is compared
    /// case-insensitively except on resolved columns, which are identified by
    /// cursor and column index alone.
    pub fn compare(&self, other: &Expr) -> bool {
        use ExprKind::*;

        let tokens_match = matches!(self.kind, Column(_))
            || match (&self.token, &other.token) {
                (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
                (None, None) => true,
                _ => false,
            };
        if !tokens_match {
            return false;
        }
        match (&self.kind, &other.kind) {
            (Id, Id) => true,
            (Dot { left: la, right: ra }, Dot { left: lb, right: rb }) => la.compare(lb) && ra.compare(rb),
            (Column(a), Column(b)) => a.cursor == b.cursor && a.column == b.column,
            (Alias { index: ia, expr: a }, Alias { index: ib, expr: b }) => ia == ib && a.compare(b),
            (Literal(a), Literal(b)) => a == b,
            (Variable { slot: a }, Variable { slot: b }) | (Register { slot: a }, Register { slot: b }) => a == b,
            (Unary { op: oa, operand: a }, Unary { op: ob, operand: b }) => oa == ob && a.compare(b),
            (Binary { op: oa, left: la, right: ra }, Binary { op: ob, left: lb, right: rb }) => {
                oa == ob && la.compare(lb) && ra.compare(rb)
            }
            (Function { args: a, aggregate: ga, .. }, Function { args: b, aggregate: gb, .. }) => {
                ga == gb && a.compare(b)
            }
            (
                Case { base: ba, arms: aa, otherwise: ea },
                Case { base: bb, arms: ab, otherwise: eb },
            ) => {
                compare_opt(ba, bb)
                    && compare_opt(ea, eb)
                    && aa.len() == ab.len()
                    && aa.iter().zip(ab).all(|(x, y)| x.when.compare(&y.when) && x.then.compare(&y.then))
            }
            (Between { operand: a, bounds: ba }, Between { operand: b, bounds: bb }) => {
                a.compare(b) && ba[0].compare(&bb[0]) && ba[1].compare(&bb[1])
            }
            (
                In { operand: a, rhs: InRhs::List(la), cursor: ca },
                In { operand: b, rhs: InRhs::List(lb), cursor: cb },
            ) => ca == cb && a.compare(b) && la.compare(lb),
            (Raise { action: a }, Raise { action: b }) => a == b,
            _ => false,
        }
    }

    /// True when the tree contains no column reference, identifier,
    /// function call or sub-select.
    pub fn is_constant(&self) -> bool {
        let mut constant = true;
        walk_expr_ref(self, &mut |e: &Expr| match &e.kind {
            ExprKind::Id
            | ExprKind::Dot { .. }
            | ExprKind::Column(_)
            | ExprKind::Function { .. }
            | ExprKind::Exists { .. }
            | ExprKind::Subquery { .. }
            | ExprKind::In { rhs: InRhs::Select(_), .. } => {
                constant = false;
                WalkControl::Abort
            }
            _ => WalkControl::Continue,
        });
        constant
    }

    /// Value of an integer literal that fits in 32 bits, looking through unary `+`/`-`.
    pub fn as_integer(&self) -> Option<i32> {
        match &self.kind {
            ExprKind::Literal(LiteralKind::Integer) => self.token.as_deref()?.parse::<i32>().ok(),
            ExprKind::Unary { op: UnaryOp::Plus, operand } => operand.as_integer(),
            ExprKind::Unary { op: UnaryOp::Negate, operand } => operand.as_integer()?.checked_neg(),
            _ => None,
        }
    }
}

fn compare_opt(a: &Option<Box<Expr>>, b: &Option<Box<Expr>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.compare(b),
        (None, None) => true,
        _ => false,
    }
}

impl ExprKind {
    fn dup(&self) -> ExprKind {
        use ExprKind::*;

        let boxed = |e: &Expr| Box::new(e.dup());
        match self {
            Id => Id,
            Dot { left, right } => Dot { left: boxed(left), right: boxed(right) },
            Column(c) => Column(*c),
            Alias { index, expr } => Alias { index: *index, expr: boxed(expr) },
            Literal(k) => Literal(*k),
            Variable { slot } => Variable { slot: *slot },
            Register { slot } => Register { slot: *slot },
            Unary { op, operand } => Unary { op: *op, operand: boxed(operand) },
            Binary { op, left, right } => Binary { op: *op, left: boxed(left), right: boxed(right) },
            Function { args, aggregate, def } => Function { args: args.dup(), aggregate: *aggregate, def: *def },
            Case { base, arms, otherwise } => Case {
                base: base.as_deref().map(boxed),
                arms: arms.iter().map(|a| CaseArm { when: a.when.dup(), then: a.then.dup() }).collect(),
                otherwise: otherwise.as_deref().map(boxed),
            },
            Between { operand, bounds } => Between {
                operand: boxed(operand),
                bounds: Box::new([bounds[0].dup(), bounds[1].dup()]),
            },
            In { operand, rhs, cursor } => In {
                operand: boxed(operand),
                rhs: match rhs {
                    InRhs::List(list) => InRhs::List(list.dup()),
                    InRhs::Select(select) => InRhs::Select(Box::new(select.dup())),
                },
                cursor: *cursor,
            },
            Exists { select, mem } => Exists { select: Box::new(select.dup()), mem: *mem },
            Subquery { select, mem } => Subquery { select: Box::new(select.dup()), mem: *mem },
            Raise { action } => Raise { action: *action },
        }
    }
}
