use serde::{Deserialize, Serialize};

/// Index of a collating sequence registered in a [`Schema`](crate::catalog::Schema).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct CollSeqId(pub usize);

/// Named collating sequence. `available` is false when the name is known
/// (e.g. declared on a column) but no comparison routine is installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollSeq {
    pub name: String,
    pub available: bool,
}

impl CollSeq {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string(), available: true }
    }

    pub fn missing(name: &str) -> Self {
        Self { name: name.to_string(), available: false }
    }
}
