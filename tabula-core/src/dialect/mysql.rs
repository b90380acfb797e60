use crate::{FieldDef, ForeignKeySpec, IncrementStrategy, Result, SqlWriter, Value};
use std::fmt::Write;

pub struct MySqlSqlWriter {
    pub string_length: u32,
}

impl SqlWriter for MySqlSqlWriter {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn increment_strategy(&self) -> IncrementStrategy {
        IncrementStrategy::IncrementColumn
    }

    fn write_identifier_quoted(&self, out: &mut String, value: &str) {
        out.push('`');
        self.write_escaped(out, value, '`', "``");
        out.push('`');
    }

    fn write_value_string(&self, out: &mut String, value: &str) {
        out.push('\'');
        for c in value.chars() {
            match c {
                '\'' => out.push_str("''"),
                '\\' => out.push_str("\\\\"),
                c => out.push(c),
            }
        }
        out.push('\'');
    }

    fn write_column_type(&self, out: &mut String, value: &Value, _increment: bool) -> Result<()> {
        match value {
            Value::Boolean(..) => out.push_str("BOOLEAN"),
            Value::Int8(..) => out.push_str("TINYINT"),
            Value::Int16(..) => out.push_str("SMALLINT"),
            Value::Int32(..) => out.push_str("INT"),
            Value::Int64(..) => out.push_str("BIGINT"),
            Value::UInt8(..) => out.push_str("TINYINT UNSIGNED"),
            Value::UInt16(..) => out.push_str("SMALLINT UNSIGNED"),
            Value::UInt32(..) => out.push_str("INT UNSIGNED"),
            Value::UInt64(..) => out.push_str("BIGINT UNSIGNED"),
            Value::Float32(..) => out.push_str("FLOAT"),
            Value::Float64(..) => out.push_str("DOUBLE"),
            Value::Decimal(..) => out.push_str("DECIMAL(38,10)"),
            Value::Varchar(..) => {
                let _ = write!(out, "VARCHAR({})", self.string_length);
            }
            Value::Blob(..) => out.push_str("BLOB"),
            Value::Date(..) => out.push_str("DATE"),
            Value::Time(..) => out.push_str("TIME(6)"),
            Value::Timestamp(..) | Value::TimestampWithTimezone(..) => out.push_str("DATETIME(6)"),
            Value::Uuid(..) => out.push_str("CHAR(36)"),
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

    fn write_column_increment(&self, out: &mut String, _start: Option<i64>) {
        out.push_str(" AUTO_INCREMENT");
    }

    fn write_exists_table(&self, out: &mut String, table: &str) {
        out.push_str(
            "SELECT COUNT(*) FROM information_schema.tables\nWHERE table_schema = DATABASE() AND table_name = ",
        );
        self.write_value_string(out, table);
        out.push(';');
    }

    fn write_exists_column(&self, out: &mut String, table: &str, column: &str) {
        out.push_str(
            "SELECT COUNT(*) FROM information_schema.columns\nWHERE table_schema = DATABASE() AND table_name = ",
        );
        self.write_value_string(out, table);
        out.push_str(" AND column_name = ");
        self.write_value_string(out, column);
        out.push(';');
    }

    /// The counter lives on the table.
    fn write_create_sequence(&self, out: &mut String, name: &str, start: i64) {
        self.write_alter_sequence_start(out, name, start);
    }

    fn write_alter_sequence_start(&self, out: &mut String, name: &str, start: i64) {
        out.push_str("ALTER TABLE ");
        self.write_identifier_quoted(out, name);
        let _ = write!(out, " AUTO_INCREMENT = {start};");
    }

    fn write_exists_sequence(&self, out: &mut String, name: &str) {
        out.push_str(
            "SELECT COUNT(*) FROM information_schema.tables\nWHERE table_schema = DATABASE() AND auto_increment IS NOT NULL AND table_name = ",
        );
        self.write_value_string(out, name);
        out.push(';');
    }

    /// Resets the counter, the column keeps incrementing.
    fn write_drop_sequence(&self, out: &mut String, name: &str) {
        self.write_alter_sequence_start(out, name, 1);
    }

    fn write_next_sequence_value(&self, out: &mut String, name: &str) {
        out.push_str(
            "SELECT auto_increment FROM information_schema.tables\nWHERE table_schema = DATABASE() AND table_name = ",
        );
        self.write_value_string(out, name);
        out.push(';');
    }

    fn write_drop_index(&self, out: &mut String, table: &str, name: &str) {
        out.push_str("DROP INDEX ");
        self.write_identifier_quoted(out, name);
        out.push_str(" ON ");
        self.write_identifier_quoted(out, table);
        out.push(';');
    }

    fn write_exists_index(&self, out: &mut String, table: &str, name: &str) {
        out.push_str(
            "SELECT COUNT(*) FROM information_schema.statistics\nWHERE table_schema = DATABASE() AND table_name = ",
        );
        self.write_value_string(out, table);
        out.push_str(" AND index_name = ");
        self.write_value_string(out, name);
        out.push(';');
    }

    fn write_drop_foreign_key(&self, out: &mut String, table: &str, name: &str) -> Result<()> {
        out.push_str("ALTER TABLE ");
        self.write_identifier_quoted(out, table);
        out.push_str(" DROP FOREIGN KEY ");
        self.write_identifier_quoted(out, name);
        out.push(';');
        Ok(())
    }

    fn write_exists_foreign_key_by_name(&self, out: &mut String, table: &str, name: &str) {
        out.push_str(
            "SELECT COUNT(*) FROM information_schema.table_constraints\nWHERE constraint_type = 'FOREIGN KEY' AND table_schema = DATABASE() AND table_name = ",
        );
        self.write_value_string(out, table);
        out.push_str(" AND constraint_name = ");
        self.write_value_string(out, name);
        out.push(';');
    }

    fn write_exists_foreign_key_by_fields(&self, out: &mut String, spec: &ForeignKeySpec) {
        out.push_str(
            "SELECT COUNT(*) FROM information_schema.key_column_usage\nWHERE table_schema = DATABASE() AND table_name = ",
        );
        self.write_value_string(out, &spec.from_table);
        out.push_str(" AND column_name = ");
        self.write_value_string(out, &spec.from_field);
        out.push_str(" AND referenced_table_name = ");
        self.write_value_string(out, &spec.ref_table);
        out.push_str(" AND referenced_column_name = ");
        self.write_value_string(out, &spec.ref_field);
        out.push(';');
    }

    fn write_generated_key_query(&self, out: &mut String, _table: &str, _field: &FieldDef) {
        out.push_str("SELECT LAST_INSERT_ID();");
    }

    fn write_paging(&self, out: &mut String, limit: Option<u64>, offset: Option<u64>) {
        match (limit, offset) {
            (None, None) => {}
            (limit, offset) => {
                let _ = write!(out, "\nLIMIT {}", limit.unwrap_or(u64::MAX));
                if let Some(offset) = offset {
                    let _ = write!(out, "\nOFFSET {offset}");
                }
            }
        }
    }
}
