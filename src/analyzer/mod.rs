pub mod analyzer_error;
pub use analyzer_error::*;

pub mod analysis_context;
pub use analysis_context::*;

pub mod name_context;
pub use name_context::*;

pub mod agg_info;
pub use agg_info::*;

pub mod affinity_resolver;
pub use affinity_resolver::*;

pub mod resolvers;
pub use resolvers::*;
