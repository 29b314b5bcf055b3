use ordered_float::NotNan;
use serde::{Deserialize, Serialize};

use crate::{
    catalog::{Affinity, CollSeqId, FuncId},
    codegen::Opcode,
};

/// Key layout of an ephemeral index: one collation per field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct KeyInfo {
    pub n_field: usize,
    pub collations: Vec<Option<CollSeqId>>,
}

/// Typed operand carried next to `p1`/`p2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum P4 {
    #[default]
    None,
    Int64(i64),
    Real(NotNan<f64>),
    Text(String),
    Blob(Vec<u8>),
    CollSeq(CollSeqId),
    FuncDef(FuncId),
    KeyInfo(KeyInfo),
    Affinity(Affinity),
    /// Affinity and collation applied by a comparison opcode.
    Compare { affinity: Affinity, coll: CollSeqId },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Instruction {
    pub opcode: Opcode,
    pub p1: i32,
    /// Jump target for branching opcodes.
    pub p2: i32,
    pub p4: P4,
}

impl Instruction {
    pub fn new(opcode: Opcode, p1: i32, p2: i32) -> Self {
        Self { opcode, p1, p2, p4: P4::None }
    }

    pub fn with_p4(mut self, p4: P4) -> Self {
        self.p4 = p4;
        self
    }
}
