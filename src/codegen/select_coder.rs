use crate::{
    ast::Select,
    catalog::Affinity,
    codegen::{CodegenError, ProgramBuilder},
};

/// Where a sub-select delivers its rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectDest {
    /// Insert each row as a key into the ephemeral table on `cursor`.
    Set { cursor: i32, affinity: Affinity },
    /// Store the first column of the first row in memory cell `n`.
    Mem(usize),
    /// Store 1 in memory cell `n` if any row exists.
    Exists(usize),
}

/// Compiles a full SELECT statement. Implemented by the query compiler that
/// embeds this crate.
pub trait SelectCoder {
    fn code_select(&mut self, program: &mut ProgramBuilder, select: &Select, dest: SelectDest) -> Result<(), CodegenError>;
}
