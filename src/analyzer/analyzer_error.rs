use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum AnalyzerError {
    UnknownTable(String),
    /// Name as written: `col`, `tab.col` or `db.tab.col`.
    UnknownColumn(String),
    AmbiguousColumn(String),
    FunctionNotFound(String),
    FunctionArgMismatch(String),
    AggregateMisuse(String),
    AccessDenied { table: String, column: String },
    UnknownCollation(String),
    HavingWithoutGroupBy,
    VariableOutOfRange { max: usize },
}

impl fmt::Display for AnalyzerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalyzerError::UnknownTable(name) => write!(f, "no such table: {}", name),
            AnalyzerError::UnknownColumn(name) => write!(f, "no such column: {}", name),
            AnalyzerError::AmbiguousColumn(name) => write!(f, "ambiguous column name: {}", name),
            AnalyzerError::FunctionNotFound(name) => write!(f, "no such function: {}", name),
            AnalyzerError::FunctionArgMismatch(name) => write!(f, "wrong number of arguments to function {}()", name),
            AnalyzerError::AggregateMisuse(name) => write!(f, "misuse of aggregate function {}()", name),
            AnalyzerError::AccessDenied { table, column } => write!(f, "access to {}.{} is prohibited", table, column),
            AnalyzerError::UnknownCollation(name) => write!(f, "no such collation sequence: {}", name),
            AnalyzerError::HavingWithoutGroupBy => write!(f, "a GROUP BY clause is required before HAVING"),
            AnalyzerError::VariableOutOfRange { max } => write!(f, "variable number must be between ?1 and ?{}", max),
        }
    }
}

impl std::error::Error for AnalyzerError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(AnalyzerError::UnknownColumn("t.x".into()).to_string(), "no such column: t.x");
        assert_eq!(AnalyzerError::AmbiguousColumn("id".into()).to_string(), "ambiguous column name: id");
        assert_eq!(AnalyzerError::FunctionArgMismatch("abs".into()).to_string(), "wrong number of arguments to function abs()");
        assert_eq!(AnalyzerError::AggregateMisuse("count".into()).to_string(), "misuse of aggregate function count()");
        assert_eq!(
            AnalyzerError::AccessDenied { table: "t1".into(), column: "a".into() }.to_string(),
            "access to t1.a is prohibited"
        );
    }
}
