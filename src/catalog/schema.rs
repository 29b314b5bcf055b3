use indexmap::IndexMap;

use crate::catalog::{CollSeq, CollSeqId, CompileConfig, Table, TableId};

/// Tables and collating sequences visible to one compilation.
#[derive(Debug, Clone)]
pub struct Schema {
    tables: Vec<Table>,
    /// lower-cased name -> collation; the map index is the `CollSeqId`
    collations: IndexMap<String, CollSeq>,
    default_collation: CollSeqId,
}

impl Default for Schema {
    fn default() -> Self {
        Self::new(&CompileConfig::default())
    }
}

impl Schema {
    /// Creates an empty schema with the built-in `BINARY`, `NOCASE` and
    /// `RTRIM` collations plus the configured default collation.
    pub fn new(config: &CompileConfig) -> Self {
        let mut schema = Self { tables: Vec::new(), collations: IndexMap::new(), default_collation: CollSeqId(0) };
        for name in ["BINARY", "NOCASE", "RTRIM"] {
            schema.register_collation(CollSeq::new(name));
        }
        schema.default_collation = schema
            .find_collation(&config.default_collation)
            .unwrap_or_else(|| schema.register_collation(CollSeq::new(&config.default_collation)));
        schema
    }

    pub fn add_table(&mut self, table: Table) -> TableId {
        self.tables.push(table);
        TableId(self.tables.len() - 1)
    }

    pub fn table(&self, id: TableId) -> Option<&Table> {
        self.tables.get(id.0)
    }

    /// Finds a table by name, optionally restricted to one database.
    pub fn find_table(&self, name: &str, database: Option<&str>) -> Option<TableId> {
        self.tables
            .iter()
            .position(|t| {
                t.name.eq_ignore_ascii_case(name)
                    && database.is_none_or(|db| t.database.eq_ignore_ascii_case(db))
            })
            .map(TableId)
    }

    /// Registers a collation, replacing any previous one with the same name.
    pub fn register_collation(&mut self, coll: CollSeq) -> CollSeqId {
        let key = coll.name.to_ascii_lowercase();
        let (index, _) = self.collations.insert_full(key, coll);
        CollSeqId(index)
    }

    pub fn find_collation(&self, name: &str) -> Option<CollSeqId> {
        self.collations.get_index_of(&name.to_ascii_lowercase()).map(CollSeqId)
    }

    pub fn collation(&self, id: CollSeqId) -> Option<&CollSeq> {
        self.collations.get_index(id.0).map(|(_, c)| c)
    }

    pub fn default_collation(&self) -> CollSeqId {
        self.default_collation
    }
}
