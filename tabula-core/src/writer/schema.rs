use crate::FieldDef;
use std::collections::BTreeMap;

/// How a backend hands out values for an incrementing key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncrementStrategy {
    /// A sequence object created together with the column (`SERIAL`).
    SequenceObject,
    /// A counter owned by the column itself (`AUTO_INCREMENT`).
    IncrementColumn,
    /// The file-local row id counter kept in `sqlite_sequence`.
    RowIdCounter,
    /// A reseedable `IDENTITY` column.
    Identity,
    /// A standalone sequence whose `NEXTVAL` is written into every insert.
    ManualSequence,
}

/// How the key assigned by the database comes back after an insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratedKey {
    /// `INSERT ... RETURNING key`
    Returning,
    /// `INSERT ... OUTPUT INSERTED.key VALUES ...`
    Output,
    /// A separate query after the insert (`LAST_INSERT_ID()`, `CURRVAL`, ...).
    Query,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceSpec {
    pub table: String,
    pub field: String,
    pub start: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSpec {
    pub table: String,
    pub unique: bool,
    /// Participant columns in field declaration order.
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ForeignKeySpec {
    pub from_table: String,
    pub from_field: String,
    pub ref_table: String,
    pub ref_field: String,
}

impl ForeignKeySpec {
    pub fn new(
        from_table: impl Into<String>,
        from_field: impl Into<String>,
        ref_table: impl Into<String>,
        ref_field: impl Into<String>,
    ) -> Self {
        Self {
            from_table: from_table.into(),
            from_field: from_field.into(),
            ref_table: ref_table.into(),
            ref_field: ref_field.into(),
        }
    }

    /// `fk_<fromTable>_<refTable>_<refField>`
    pub fn name(&self) -> String {
        foreign_key_name(&self.from_table, &self.ref_table, &self.ref_field)
    }
}

pub fn foreign_key_name(from_table: &str, ref_table: &str, ref_field: &str) -> String {
    format!("fk_{from_table}_{ref_table}_{ref_field}")
}

/// A persisted field with its backend column type and full column definition.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaField {
    pub field: FieldDef,
    pub column_type: String,
    /// `"name" TYPE ...` as it appears inside `CREATE TABLE`, also used by `ALTER TABLE`.
    pub definition: String,
}

/// Everything produced from one entity by [`SqlWriter::build_schema`](crate::SqlWriter::build_schema).
#[derive(Default, Debug, Clone, PartialEq)]
pub struct SchemaBuild {
    pub table: String,
    /// The `CREATE TABLE` statement, terminated by `;`.
    pub create_sql: String,
    pub fields: Vec<SchemaField>,
    pub sequences: Vec<SequenceSpec>,
    pub indexes: BTreeMap<String, IndexSpec>,
    pub foreign_keys: Vec<ForeignKeySpec>,
    pub primary_key: Vec<String>,
}

impl SchemaBuild {
    pub fn field(&self, storage_name: &str) -> Option<&SchemaField> {
        self.fields
            .iter()
            .find(|f| f.field.storage_name == storage_name)
    }
}
