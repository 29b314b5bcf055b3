use crate::catalog::{Affinity, CollSeqId};

/// Index of a table registered in a [`Schema`](crate::catalog::Schema).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableId(pub usize);

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub affinity: Affinity,
    pub coll: Option<CollSeqId>,
}

/// Table definition as seen by name resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    pub database: String,
    pub columns: Vec<Column>,
    /// Column declared `INTEGER PRIMARY KEY`; references to it read the rowid.
    pub ipk: Option<usize>,
}

impl Table {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string(), database: "main".to_string(), columns: Vec::new(), ipk: None }
    }

    pub fn in_database(mut self, database: &str) -> Self {
        self.database = database.to_string();
        self
    }

    pub fn with_column(mut self, name: &str, declared_type: Option<&str>) -> Self {
        self.columns.push(Column {
            name: name.to_string(),
            affinity: Affinity::from_declared_type(declared_type),
            coll: None,
        });
        self
    }

    pub fn with_collated_column(mut self, name: &str, declared_type: Option<&str>, coll: CollSeqId) -> Self {
        self.columns.push(Column {
            name: name.to_string(),
            affinity: Affinity::from_declared_type(declared_type),
            coll: Some(coll),
        });
        self
    }

    /// Declares `name` as the table's `INTEGER PRIMARY KEY`.
    pub fn with_integer_primary_key(mut self, name: &str) -> Self {
        self.columns.push(Column { name: name.to_string(), affinity: Affinity::Integer, coll: None });
        self.ipk = Some(self.columns.len() - 1);
        self
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }
}
