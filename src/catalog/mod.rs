pub mod affinity;
pub use affinity::*;

pub mod text_encoding;
pub use text_encoding::*;

pub mod coll_seq;
pub use coll_seq::*;

pub mod table;
pub use table::*;

pub mod schema;
pub use schema::*;

pub mod function_def;
pub use function_def::*;

pub mod function_catalog;
pub use function_catalog::*;

pub mod authorizer;
pub use authorizer::*;

pub mod compile_config;
pub use compile_config::*;
