use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::codegen::{CodegenError, Instruction, Opcode, P4};

/// Forward jump target, resolved to an address once known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label(usize);

impl Label {
    /// Placeholder `p2` value patched by [`ProgramBuilder::finish`].
    pub fn as_p2(self) -> i32 {
        -1 - self.0 as i32
    }

    fn from_p2(p2: i32) -> Option<usize> {
        (p2 < 0).then(|| (-1 - p2) as usize)
    }
}

/// Append-only instruction buffer with label support.
#[derive(Debug, Default)]
pub struct ProgramBuilder {
    ops: Vec<Instruction>,
    labels: Vec<Option<usize>>,
}

impl ProgramBuilder {
    pub fn new() -> Self { Self::default() }

    /// Appends an instruction and returns its address.
    pub fn add_op(&mut self, opcode: Opcode, p1: i32, p2: i32) -> usize {
        self.add_op4(opcode, p1, p2, P4::None)
    }

    pub fn add_op4(&mut self, opcode: Opcode, p1: i32, p2: i32, p4: P4) -> usize {
        let addr = self.ops.len();
        trace!(addr, ?opcode, p1, p2, ?p4, "emit");
        self.ops.push(Instruction::new(opcode, p1, p2).with_p4(p4));
        addr
    }

    pub fn add_jump(&mut self, opcode: Opcode, p1: i32, label: Label) -> usize {
        self.add_op(opcode, p1, label.as_p2())
    }

    pub fn make_label(&mut self) -> Label {
        self.labels.push(None);
        Label(self.labels.len() - 1)
    }

    /// Points `label` at the next instruction to be emitted.
    pub fn resolve_label(&mut self, label: Label) {
        if let Some(slot) = self.labels.get_mut(label.0) {
            *slot = Some(self.ops.len());
        }
    }

    /// Address of the next instruction.
    pub fn current_addr(&self) -> usize {
        self.ops.len()
    }

    pub fn change_p2(&mut self, addr: usize, p2: i32) {
        if let Some(op) = self.ops.get_mut(addr) {
            op.p2 = p2;
        }
    }

    pub fn change_p4(&mut self, addr: usize, p4: P4) {
        if let Some(op) = self.ops.get_mut(addr) {
            op.p4 = p4;
        }
    }

    pub fn op(&self, addr: usize) -> Option<&Instruction> {
        self.ops.get(addr)
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.ops
    }

    /// Replaces label placeholders with addresses.
    pub fn finish(self) -> Result<Program, CodegenError> {
        let Self { mut ops, labels } = self;
        for op in ops.iter_mut().filter(|op| op.opcode.jumps()) {
            if let Some(label) = Label::from_p2(op.p2) {
                let addr = labels.get(label).copied().flatten().ok_or(CodegenError::UnresolvedLabel(label))?;
                op.p2 = addr as i32;
            }
        }
        debug!(instructions = ops.len(), labels = labels.len(), "program finished");
        Ok(Program { instructions: ops })
    }
}

/// A finished instruction sequence.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Program {
    pub instructions: Vec<Instruction>,
}

impl Program {
    pub fn len(&self) -> usize { self.instructions.len() }

    pub fn is_empty(&self) -> bool { self.instructions.is_empty() }

    pub fn opcodes(&self) -> Vec<Opcode> {
        self.instructions.iter().map(|i| i.opcode).collect()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
