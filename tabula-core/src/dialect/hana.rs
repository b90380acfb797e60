use crate::{FieldDef, ForeignKeySpec, IncrementStrategy, Result, SqlWriter, Value};
use std::fmt::Write;

pub struct HanaSqlWriter {
    pub string_length: u32,
}

impl HanaSqlWriter {
    fn write_sequence_reference(&self, out: &mut String, name: &str, member: &str) {
        self.write_identifier_quoted(out, name);
        out.push('.');
        out.push_str(member);
    }
}

impl SqlWriter for HanaSqlWriter {
    fn name(&self) -> &'static str {
        "hana"
    }

    fn increment_strategy(&self) -> IncrementStrategy {
        IncrementStrategy::ManualSequence
    }

    fn write_create_table_prefix(&self, out: &mut String) {
        out.push_str("CREATE COLUMN TABLE ");
    }

    fn write_column_type(&self, out: &mut String, value: &Value, _increment: bool) -> Result<()> {
        match value {
            Value::Boolean(..) => out.push_str("BOOLEAN"),
            Value::Int8(..) | Value::Int16(..) | Value::UInt8(..) => out.push_str("SMALLINT"),
            Value::Int32(..) | Value::UInt16(..) => out.push_str("INTEGER"),
            Value::Int64(..) | Value::UInt32(..) => out.push_str("BIGINT"),
            Value::UInt64(..) => out.push_str("DECIMAL(20,0)"),
            Value::Float32(..) => out.push_str("REAL"),
            Value::Float64(..) => out.push_str("DOUBLE"),
            Value::Decimal(..) => out.push_str("DECIMAL"),
            Value::Varchar(..) => {
                let _ = write!(out, "NVARCHAR({})", self.string_length);
            }
            Value::Blob(..) => out.push_str("BLOB"),
            Value::Date(..) => out.push_str("DATE"),
            Value::Time(..) => out.push_str("TIME"),
            Value::Timestamp(..) | Value::TimestampWithTimezone(..) => out.push_str("TIMESTAMP"),
            Value::Uuid(..) => out.push_str("NVARCHAR(36)"),
            Value::Null => return Err(crate::Error::msg("Unmapped type")),
        }
        Ok(())
    }

    fn write_value_infinity(&self, out: &mut String, _negative: bool) {
        self.write_value_none(out);
    }

    fn write_value_nan(&self, out: &mut String) {
        self.write_value_none(out);
    }

    fn write_exists_table(&self, out: &mut String, table: &str) {
        out.push_str("SELECT COUNT(*) FROM TABLES\nWHERE SCHEMA_NAME = CURRENT_SCHEMA AND TABLE_NAME = ");
        self.write_value_string(out, table);
        out.push(';');
    }

    fn write_exists_column(&self, out: &mut String, table: &str, column: &str) {
        out.push_str(
            "SELECT COUNT(*) FROM TABLE_COLUMNS\nWHERE SCHEMA_NAME = CURRENT_SCHEMA AND TABLE_NAME = ",
        );
        self.write_value_string(out, table);
        out.push_str(" AND COLUMN_NAME = ");
        self.write_value_string(out, column);
        out.push(';');
    }

    fn write_alter_add_columns(&self, table: &str, definitions: &[&str]) -> Vec<String> {
        let mut out = String::with_capacity(64 + definitions.len() * 48);
        out.push_str("ALTER TABLE ");
        self.write_identifier_quoted(&mut out, table);
        out.push_str(" ADD (");
        out.push_str(&definitions.join(", "));
        out.push_str(");");
        vec![out]
    }

    fn sequence_name(&self, table: &str, field: &str) -> String {
        format!("{table}_{field}_seq")
    }

    fn write_create_sequence(&self, out: &mut String, name: &str, start: i64) {
        out.push_str("CREATE SEQUENCE ");
        self.write_identifier_quoted(out, name);
        let _ = write!(out, " START WITH {start};");
    }

    fn write_alter_sequence_start(&self, out: &mut String, name: &str, start: i64) {
        out.push_str("ALTER SEQUENCE ");
        self.write_identifier_quoted(out, name);
        let _ = write!(out, " RESTART WITH {start};");
    }

    fn write_exists_sequence(&self, out: &mut String, name: &str) {
        out.push_str(
            "SELECT COUNT(*) FROM SEQUENCES\nWHERE SCHEMA_NAME = CURRENT_SCHEMA AND SEQUENCE_NAME = ",
        );
        self.write_value_string(out, name);
        out.push(';');
    }

    fn write_drop_sequence(&self, out: &mut String, name: &str) {
        out.push_str("DROP SEQUENCE ");
        self.write_identifier_quoted(out, name);
        out.push(';');
    }

    fn write_next_sequence_value(&self, out: &mut String, name: &str) {
        out.push_str("SELECT ");
        self.write_sequence_reference(out, name, "NEXTVAL");
        out.push_str(" FROM DUMMY;");
    }

    fn write_exists_index(&self, out: &mut String, table: &str, name: &str) {
        out.push_str("SELECT COUNT(*) FROM INDEXES\nWHERE SCHEMA_NAME = CURRENT_SCHEMA AND TABLE_NAME = ");
        self.write_value_string(out, table);
        out.push_str(" AND INDEX_NAME = ");
        self.write_value_string(out, name);
        out.push(';');
    }

    fn write_exists_foreign_key_by_name(&self, out: &mut String, table: &str, name: &str) {
        out.push_str(
            "SELECT COUNT(*) FROM REFERENTIAL_CONSTRAINTS\nWHERE SCHEMA_NAME = CURRENT_SCHEMA AND TABLE_NAME = ",
        );
        self.write_value_string(out, table);
        out.push_str(" AND CONSTRAINT_NAME = ");
        self.write_value_string(out, name);
        out.push(';');
    }

    fn write_exists_foreign_key_by_fields(&self, out: &mut String, spec: &ForeignKeySpec) {
        out.push_str(
            "SELECT COUNT(*) FROM REFERENTIAL_CONSTRAINTS\nWHERE SCHEMA_NAME = CURRENT_SCHEMA AND TABLE_NAME = ",
        );
        self.write_value_string(out, &spec.from_table);
        out.push_str(" AND COLUMN_NAME = ");
        self.write_value_string(out, &spec.from_field);
        out.push_str(" AND REFERENCED_TABLE_NAME = ");
        self.write_value_string(out, &spec.ref_table);
        out.push_str(" AND REFERENCED_COLUMN_NAME = ");
        self.write_value_string(out, &spec.ref_field);
        out.push(';');
    }

    fn auto_assign_placeholder(&self, table: &str, field: &FieldDef) -> Option<String> {
        let mut out = String::new();
        self.write_sequence_reference(
            &mut out,
            &self.sequence_name(table, field.storage_name),
            "NEXTVAL",
        );
        Some(out)
    }

    fn use_default_placeholder(&self) -> Option<&'static str> {
        None
    }

    fn write_generated_key_query(&self, out: &mut String, table: &str, field: &FieldDef) {
        out.push_str("SELECT ");
        self.write_sequence_reference(
            out,
            &self.sequence_name(table, field.storage_name),
            "CURRVAL",
        );
        out.push_str(" FROM DUMMY;");
    }

    fn write_paging(&self, out: &mut String, limit: Option<u64>, offset: Option<u64>) {
        match (limit, offset) {
            (None, None) => {}
            (limit, offset) => {
                let _ = write!(out, "\nLIMIT {}", limit.unwrap_or(i32::MAX as u64));
                if let Some(offset) = offset {
                    let _ = write!(out, "\nOFFSET {offset}");
                }
            }
        }
    }
}
