pub mod catalog;
pub use catalog::{CompileConfig, FunctionCatalog, Schema};

pub mod ast;

pub mod analyzer;
pub use analyzer::{AggInfo, AnalysisContext, AnalyzerError, NameContext};

pub mod codegen;
pub use codegen::{CodegenContext, CodegenError, Program, SelectCoder};
