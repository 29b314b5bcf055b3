pub mod codegen_error;
pub use codegen_error::*;

pub mod opcode;
pub use opcode::*;

pub mod instruction;
pub use instruction::*;

pub mod program;
pub use program::*;

pub mod select_coder;
pub use select_coder::*;

pub mod codegen_context;
pub use codegen_context::*;

pub mod expr_coder;
pub use expr_coder::*;

pub mod branch_coder;
pub use branch_coder::*;

pub mod subquery_coder;
pub use subquery_coder::*;
