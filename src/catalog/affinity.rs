use std::fmt;

use serde::{Deserialize, Serialize};

/// Type affinity attached to columns and used to coerce comparison operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Affinity {
    None,
    Text,
    Numeric,
    Integer,
    Blob,
}

impl Affinity {
    /// Single-character code carried in record-building instructions.
    pub fn code(self) -> char {
        match self {
            Affinity::None => 'o',
            Affinity::Text => 't',
            Affinity::Numeric => 'n',
            Affinity::Integer => 'i',
            Affinity::Blob => 'b',
        }
    }

    /// Derives an affinity from a declared column type.
    ///
    /// Rules are applied in order: `INT` gives integer, `CHAR`/`CLOB`/`TEXT`
    /// give text, `BLOB` gives blob, a missing type gives none and anything
    /// else is numeric.
    pub fn from_declared_type(declared: Option<&str>) -> Affinity {
        let Some(declared) = declared.map(|d| d.to_ascii_uppercase()) else {
            return Affinity::None;
        };
        if declared.trim().is_empty() {
            Affinity::None
        } else if declared.contains("INT") {
            Affinity::Integer
        } else if ["CHAR", "CLOB", "TEXT"].iter().any(|k| declared.contains(k)) {
            Affinity::Text
        } else if declared.contains("BLOB") {
            Affinity::Blob
        } else {
            Affinity::Numeric
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Affinity::Numeric | Affinity::Integer)
    }
}

impl fmt::Display for Affinity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
