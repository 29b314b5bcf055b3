use serde::{Deserialize, Serialize};

use crate::ast::{BinaryOp, Operator, UnaryOp};

/// Instructions of the stack machine that runs compiled expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Opcode {
    // push a value
    Integer,
    Real,
    String8,
    HexBlob,
    Null,
    Variable,
    MemLoad,
    MemStore,
    Column,
    Rowid,
    AggGet,

    // compare the top two values, jump to p2 when true
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // test the top value for NULL
    IsNull,
    NotNull,

    // arithmetic and logic
    And,
    Or,
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    BitAnd,
    BitOr,
    ShiftLeft,
    ShiftRight,
    Concat,
    Not,
    BitNot,
    Negative,

    // stack shuffling
    Dup,
    Pull,
    Pop,
    AddImm,

    // control flow
    Goto,
    If,
    IfNot,
    Halt,
    ContextPop,

    // function calls
    Function,
    CollSeq,

    // ephemeral key sets
    OpenTemp,
    SetNumColumns,
    MakeRecord,
    PutStrKey,
    Found,
    AggContextPush,
    AggContextPop,
}

impl Opcode {
    pub const ALL: [Opcode; 52] = [
        Opcode::Integer, Opcode::Real, Opcode::String8, Opcode::HexBlob, Opcode::Null, Opcode::Variable,
        Opcode::MemLoad, Opcode::MemStore, Opcode::Column, Opcode::Rowid, Opcode::AggGet,
        Opcode::Eq, Opcode::Ne, Opcode::Lt, Opcode::Le, Opcode::Gt, Opcode::Ge, Opcode::IsNull, Opcode::NotNull,
        Opcode::And, Opcode::Or, Opcode::Add, Opcode::Subtract, Opcode::Multiply, Opcode::Divide,
        Opcode::Remainder, Opcode::BitAnd, Opcode::BitOr, Opcode::ShiftLeft, Opcode::ShiftRight,
        Opcode::Concat, Opcode::Not, Opcode::BitNot, Opcode::Negative,
        Opcode::Dup, Opcode::Pull, Opcode::Pop, Opcode::AddImm,
        Opcode::Goto, Opcode::If, Opcode::IfNot, Opcode::Halt, Opcode::ContextPop,
        Opcode::Function, Opcode::CollSeq,
        Opcode::OpenTemp, Opcode::SetNumColumns, Opcode::MakeRecord, Opcode::PutStrKey, Opcode::Found,
        Opcode::AggContextPush, Opcode::AggContextPop,
    ];

    pub fn for_binary(op: BinaryOp) -> Opcode {
        match op {
            BinaryOp::Eq => Opcode::Eq,
            BinaryOp::Ne => Opcode::Ne,
            BinaryOp::Lt => Opcode::Lt,
            BinaryOp::Le => Opcode::Le,
            BinaryOp::Gt => Opcode::Gt,
            BinaryOp::Ge => Opcode::Ge,
            BinaryOp::And => Opcode::And,
            BinaryOp::Or => Opcode::Or,
            BinaryOp::Plus => Opcode::Add,
            BinaryOp::Minus => Opcode::Subtract,
            BinaryOp::Star => Opcode::Multiply,
            BinaryOp::Slash => Opcode::Divide,
            BinaryOp::Rem => Opcode::Remainder,
            BinaryOp::BitAnd => Opcode::BitAnd,
            BinaryOp::BitOr => Opcode::BitOr,
            BinaryOp::LShift => Opcode::ShiftLeft,
            BinaryOp::RShift => Opcode::ShiftRight,
            BinaryOp::Concat => Opcode::Concat,
        }
    }

    /// Unary plus compiles to nothing and has no opcode.
    pub fn for_unary(op: UnaryOp) -> Option<Opcode> {
        match op {
            UnaryOp::Not => Some(Opcode::Not),
            UnaryOp::BitNot => Some(Opcode::BitNot),
            UnaryOp::Negate => Some(Opcode::Negative),
            UnaryOp::IsNull => Some(Opcode::IsNull),
            UnaryOp::NotNull => Some(Opcode::NotNull),
            UnaryOp::Plus => None,
        }
    }

    pub fn for_operator(op: Operator) -> Option<Opcode> {
        match op {
            Operator::Binary(op) => Some(Self::for_binary(op)),
            Operator::Unary(op) => Self::for_unary(op),
        }
    }

    /// The operator this opcode implements, if any.
    pub fn operator(self) -> Option<Operator> {
        let op = match self {
            Opcode::Eq => Operator::Binary(BinaryOp::Eq),
            Opcode::Ne => Operator::Binary(BinaryOp::Ne),
            Opcode::Lt => Operator::Binary(BinaryOp::Lt),
            Opcode::Le => Operator::Binary(BinaryOp::Le),
            Opcode::Gt => Operator::Binary(BinaryOp::Gt),
            Opcode::Ge => Operator::Binary(BinaryOp::Ge),
            Opcode::And => Operator::Binary(BinaryOp::And),
            Opcode::Or => Operator::Binary(BinaryOp::Or),
            Opcode::Add => Operator::Binary(BinaryOp::Plus),
            Opcode::Subtract => Operator::Binary(BinaryOp::Minus),
            Opcode::Multiply => Operator::Binary(BinaryOp::Star),
            Opcode::Divide => Operator::Binary(BinaryOp::Slash),
            Opcode::Remainder => Operator::Binary(BinaryOp::Rem),
            Opcode::BitAnd => Operator::Binary(BinaryOp::BitAnd),
            Opcode::BitOr => Operator::Binary(BinaryOp::BitOr),
            Opcode::ShiftLeft => Operator::Binary(BinaryOp::LShift),
            Opcode::ShiftRight => Operator::Binary(BinaryOp::RShift),
            Opcode::Concat => Operator::Binary(BinaryOp::Concat),
            Opcode::Not => Operator::Unary(UnaryOp::Not),
            Opcode::BitNot => Operator::Unary(UnaryOp::BitNot),
            Opcode::Negative => Operator::Unary(UnaryOp::Negate),
            Opcode::IsNull => Operator::Unary(UnaryOp::IsNull),
            Opcode::NotNull => Operator::Unary(UnaryOp::NotNull),
            _ => return None,
        };
        Some(op)
    }

    /// Opcode that jumps exactly when `self` would not.
    pub fn negated(self) -> Option<Opcode> {
        match self {
            Opcode::Eq => Some(Opcode::Ne),
            Opcode::Ne => Some(Opcode::Eq),
            Opcode::Lt => Some(Opcode::Ge),
            Opcode::Ge => Some(Opcode::Lt),
            Opcode::Le => Some(Opcode::Gt),
            Opcode::Gt => Some(Opcode::Le),
            Opcode::IsNull => Some(Opcode::NotNull),
            Opcode::NotNull => Some(Opcode::IsNull),
            _ => None,
        }
    }

    pub fn is_comparison(self) -> bool {
        matches!(self, Opcode::Eq | Opcode::Ne | Opcode::Lt | Opcode::Le | Opcode::Gt | Opcode::Ge)
    }

    /// Opcodes whose `p2` is a jump target.
    pub fn jumps(self) -> bool {
        self.is_comparison()
            || matches!(self, Opcode::IsNull | Opcode::NotNull | Opcode::Goto | Opcode::If | Opcode::IfNot | Opcode::Found)
    }
}
