pub mod operators;
pub use operators::*;

pub mod literal;
pub use literal::*;

pub mod expr;
pub use expr::*;

pub mod expr_list;
pub use expr_list::*;

pub mod select;
pub use select::*;

pub mod walker;
pub use walker::*;

pub mod variable_numbering;
pub use variable_numbering::*;
