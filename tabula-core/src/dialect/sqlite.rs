use crate::{Error, FieldDef, ForeignKeySpec, IncrementStrategy, Result, SqlWriter, Value};
use std::fmt::Write;

pub struct SqliteSqlWriter {
    pub string_length: u32,
}

impl SqliteSqlWriter {
    fn write_sequence_reset(&self, out: &mut String, name: &str, seq: i64) {
        self.write_drop_sequence(out, name);
        out.push_str("\nINSERT INTO sqlite_sequence (name, seq) VALUES (");
        self.write_value_string(out, name);
        let _ = write!(out, ", {seq});");
    }
}

impl SqlWriter for SqliteSqlWriter {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn increment_strategy(&self) -> IncrementStrategy {
        IncrementStrategy::RowIdCounter
    }

    fn write_column_type(&self, out: &mut String, value: &Value, _increment: bool) -> Result<()> {
        out.push_str(match value {
            Value::Boolean(..)
            | Value::Int8(..)
            | Value::Int16(..)
            | Value::Int32(..)
            | Value::Int64(..)
            | Value::UInt8(..)
            | Value::UInt16(..)
            | Value::UInt32(..)
            | Value::UInt64(..) => "INTEGER",
            Value::Float32(..) | Value::Float64(..) => "REAL",
            Value::Decimal(..) => "NUMERIC",
            Value::Varchar(..)
            | Value::Date(..)
            | Value::Time(..)
            | Value::Timestamp(..)
            | Value::TimestampWithTimezone(..)
            | Value::Uuid(..) => "TEXT",
            Value::Blob(..) => "BLOB",
            Value::Null => return Err(Error::msg("Unmapped type")),
        });
        Ok(())
    }

    fn write_value_bool(&self, out: &mut String, value: bool) {
        out.push(['0', '1'][value as usize]);
    }

    fn write_value_infinity(&self, out: &mut String, negative: bool) {
        if negative {
            out.push('-');
        }
        out.push_str("1.0e+10000");
    }

    fn write_column_increment(&self, out: &mut String, _start: Option<i64>) {
        out.push_str(" PRIMARY KEY AUTOINCREMENT");
    }

    fn inline_increment_key(&self) -> bool {
        true
    }

    fn inline_foreign_keys(&self) -> bool {
        true
    }

    fn write_exists_table(&self, out: &mut String, table: &str) {
        out.push_str("SELECT COUNT(*) FROM sqlite_master\nWHERE type = 'table' AND name = ");
        self.write_value_string(out, table);
        out.push(';');
    }

    fn write_exists_column(&self, out: &mut String, table: &str, column: &str) {
        out.push_str("SELECT COUNT(*) FROM pragma_table_info(");
        self.write_value_string(out, table);
        out.push_str(")\nWHERE name = ");
        self.write_value_string(out, column);
        out.push(';');
    }

    /// One statement per column.
    fn write_alter_add_columns(&self, table: &str, definitions: &[&str]) -> Vec<String> {
        definitions
            .iter()
            .map(|definition| {
                let mut out = String::with_capacity(64 + definition.len());
                out.push_str("ALTER TABLE ");
                self.write_identifier_quoted(&mut out, table);
                out.push_str(" ADD COLUMN ");
                out.push_str(definition);
                out.push(';');
                out
            })
            .collect()
    }

    fn write_create_sequence(&self, out: &mut String, name: &str, start: i64) {
        self.write_sequence_reset(out, name, start - 1);
    }

    fn write_alter_sequence_start(&self, out: &mut String, name: &str, start: i64) {
        self.write_sequence_reset(out, name, start - 1);
    }

    fn write_exists_sequence(&self, out: &mut String, name: &str) {
        out.push_str("SELECT COUNT(*) FROM sqlite_master\nWHERE type = 'table' AND name = ");
        self.write_value_string(out, name);
        out.push_str(" AND sql LIKE '%AUTOINCREMENT%';");
    }

    fn write_drop_sequence(&self, out: &mut String, name: &str) {
        out.push_str("DELETE FROM sqlite_sequence WHERE name = ");
        self.write_value_string(out, name);
        out.push(';');
    }

    fn write_next_sequence_value(&self, out: &mut String, name: &str) {
        out.push_str("SELECT COALESCE((SELECT seq FROM sqlite_sequence WHERE name = ");
        self.write_value_string(out, name);
        out.push_str("), 0) + 1;");
    }

    fn write_exists_index(&self, out: &mut String, table: &str, name: &str) {
        out.push_str("SELECT COUNT(*) FROM sqlite_master\nWHERE type = 'index' AND tbl_name = ");
        self.write_value_string(out, table);
        out.push_str(" AND name = ");
        self.write_value_string(out, name);
        out.push(';');
    }

    fn write_create_foreign_key(&self, _out: &mut String, spec: &ForeignKeySpec) -> Result<()> {
        Err(Error::msg(format!(
            "Cannot add foreign key `{}` to existing table `{}`, sqlite declares foreign keys only in CREATE TABLE",
            spec.name(),
            spec.from_table
        )))
    }

    fn write_drop_foreign_key(&self, _out: &mut String, table: &str, name: &str) -> Result<()> {
        Err(Error::msg(format!(
            "Cannot drop foreign key `{name}` from table `{table}`, sqlite cannot alter constraints"
        )))
    }

    fn write_exists_foreign_key_by_name(&self, out: &mut String, table: &str, name: &str) {
        out.push_str("SELECT COUNT(*) FROM sqlite_master\nWHERE type = 'table' AND name = ");
        self.write_value_string(out, table);
        out.push_str(" AND instr(sql, ");
        let mut quoted = String::with_capacity(name.len() + 2);
        self.write_identifier_quoted(&mut quoted, name);
        self.write_value_string(out, &quoted);
        out.push_str(") > 0;");
    }

    fn write_exists_foreign_key_by_fields(&self, out: &mut String, spec: &ForeignKeySpec) {
        out.push_str("SELECT COUNT(*) FROM pragma_foreign_key_list(");
        self.write_value_string(out, &spec.from_table);
        out.push_str(")\nWHERE \"from\" = ");
        self.write_value_string(out, &spec.from_field);
        out.push_str(" AND \"table\" = ");
        self.write_value_string(out, &spec.ref_table);
        out.push_str(" AND \"to\" = ");
        self.write_value_string(out, &spec.ref_field);
        out.push(';');
    }

    fn auto_assign_placeholder(&self, _table: &str, _field: &FieldDef) -> Option<String> {
        None
    }

    fn use_default_placeholder(&self) -> Option<&'static str> {
        None
    }

    fn write_generated_key_query(&self, out: &mut String, _table: &str, _field: &FieldDef) {
        out.push_str("SELECT last_insert_rowid();");
    }

    fn write_paging(&self, out: &mut String, limit: Option<u64>, offset: Option<u64>) {
        match (limit, offset) {
            (None, None) => {}
            (Some(limit), None) => {
                let _ = write!(out, "\nLIMIT {limit}");
            }
            (limit, Some(offset)) => {
                match limit {
                    Some(limit) => {
                        let _ = write!(out, "\nLIMIT {limit}");
                    }
                    None => out.push_str("\nLIMIT -1"),
                }
                let _ = write!(out, "\nOFFSET {offset}");
            }
        }
    }
}
