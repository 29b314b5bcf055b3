pub mod column_resolver;
pub use column_resolver::*;

pub mod function_resolver;
pub use function_resolver::*;

pub mod name_resolver;
pub use name_resolver::*;

pub mod aggregate_resolver;
pub use aggregate_resolver::*;
