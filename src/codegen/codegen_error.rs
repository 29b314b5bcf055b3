use std::fmt;

use crate::analyzer::AnalyzerError;

#[derive(Debug, Clone, PartialEq)]
pub enum CodegenError {
    NonConstantInList,
    RaiseOutsideTrigger,
    /// Identifier left unresolved by name resolution.
    Unresolved(String),
    UnknownFunction(String),
    /// Aggregate call without an accumulator slot.
    UnclassifiedAggregate(String),
    MalformedLiteral(String),
    UnresolvedLabel(usize),
    NotASubquery,
    Analyzer(AnalyzerError),
    /// Failure reported by the [`SelectCoder`](crate::codegen::SelectCoder).
    Select(String),
}

impl fmt::Display for CodegenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodegenError::NonConstantInList => write!(f, "right-hand side of IN operator must be constant"),
            CodegenError::RaiseOutsideTrigger => write!(f, "RAISE() may only be used within a trigger-program"),
            CodegenError::Unresolved(name) => write!(f, "unresolved identifier: {}", name),
            CodegenError::UnknownFunction(name) => write!(f, "no such function: {}", name),
            CodegenError::UnclassifiedAggregate(name) => write!(f, "aggregate {}() has no accumulator slot", name),
            CodegenError::MalformedLiteral(text) => write!(f, "malformed literal: {}", text),
            CodegenError::UnresolvedLabel(label) => write!(f, "label {} was never resolved", label),
            CodegenError::NotASubquery => write!(f, "expression does not own a subquery"),
            CodegenError::Analyzer(e) => write!(f, "{}", e),
            CodegenError::Select(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for CodegenError {}

impl From<AnalyzerError> for CodegenError {
    fn from(e: AnalyzerError) -> Self {
        CodegenError::Analyzer(e)
    }
}
