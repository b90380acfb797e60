use crate::{
    FieldDef, ForeignKeySpec, GeneratedKey, IncrementStrategy, Result, SqlWriter, Value,
    writer::Context,
};
use std::fmt::Write;
use time::OffsetDateTime;

pub struct PostgresSqlWriter {
    pub string_length: u32,
}

impl SqlWriter for PostgresSqlWriter {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn increment_strategy(&self) -> IncrementStrategy {
        IncrementStrategy::SequenceObject
    }

    fn generated_key(&self) -> GeneratedKey {
        GeneratedKey::Returning
    }

    fn write_column_type(&self, out: &mut String, value: &Value, increment: bool) -> Result<()> {
        if increment {
            out.push_str(match value {
                Value::Int64(..) | Value::UInt32(..) | Value::UInt64(..) => "BIGSERIAL",
                _ => "SERIAL",
            });
            return Ok(());
        }
        match value {
            Value::Boolean(..) => out.push_str("BOOLEAN"),
            Value::Int8(..) | Value::Int16(..) | Value::UInt8(..) => out.push_str("SMALLINT"),
            Value::Int32(..) | Value::UInt16(..) => out.push_str("INTEGER"),
            Value::Int64(..) | Value::UInt32(..) => out.push_str("BIGINT"),
            Value::UInt64(..) => out.push_str("NUMERIC(20)"),
            Value::Float32(..) => out.push_str("REAL"),
            Value::Float64(..) => out.push_str("DOUBLE PRECISION"),
            Value::Decimal(..) => out.push_str("NUMERIC"),
            Value::Varchar(..) => {
                let _ = write!(out, "VARCHAR({})", self.string_length);
            }
            Value::Blob(..) => out.push_str("BYTEA"),
            Value::Date(..) => out.push_str("DATE"),
            Value::Time(..) => out.push_str("TIME"),
            Value::Timestamp(..) => out.push_str("TIMESTAMP"),
            Value::TimestampWithTimezone(..) => out.push_str("TIMESTAMPTZ"),
            Value::Uuid(..) => out.push_str("UUID"),
            Value::Null => return Err(crate::Error::msg("Unmapped type")),
        }
        Ok(())
    }

    fn write_value_blob(&self, out: &mut String, value: &[u8]) {
        out.push_str("'\\x");
        out.push_str(&hex::encode(value));
        out.push('\'');
    }

    fn write_value_timestamptz(&self, out: &mut String, value: &OffsetDateTime) {
        let _ = write!(
            out,
            "'{:04}-{:02}-{:02} {:02}:{:02}:{:02}.{:06}{:+03}:{:02}'",
            value.year(),
            value.month() as u8,
            value.day(),
            value.hour(),
            value.minute(),
            value.second(),
            value.microsecond(),
            value.offset().whole_hours(),
            value.offset().minutes_past_hour().abs(),
        );
    }

    fn write_placeholder(&self, context: &mut Context, out: &mut String, value: Value) {
        let position = context.bind(value);
        let _ = write!(out, "${position}");
    }

    fn write_end_of_time(&self, out: &mut String) {
        out.push_str("'infinity'");
    }

    fn write_exists_table(&self, out: &mut String, table: &str) {
        out.push_str(
            "SELECT COUNT(*) FROM information_schema.tables\nWHERE table_schema = current_schema() AND table_name = ",
        );
        self.write_value_string(out, table);
        out.push(';');
    }

    fn write_exists_column(&self, out: &mut String, table: &str, column: &str) {
        out.push_str(
            "SELECT COUNT(*) FROM information_schema.columns\nWHERE table_schema = current_schema() AND table_name = ",
        );
        self.write_value_string(out, table);
        out.push_str(" AND column_name = ");
        self.write_value_string(out, column);
        out.push(';');
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
        out.push_str("SELECT COUNT(*) FROM pg_class\nWHERE relkind = 'S' AND relname = ");
        self.write_value_string(out, name);
        out.push(';');
    }

    fn write_drop_sequence(&self, out: &mut String, name: &str) {
        out.push_str("DROP SEQUENCE ");
        self.write_identifier_quoted(out, name);
        out.push(';');
    }

    fn write_next_sequence_value(&self, out: &mut String, name: &str) {
        out.push_str("SELECT nextval(");
        self.write_value_string(out, name);
        out.push_str(");");
    }

    fn write_exists_index(&self, out: &mut String, table: &str, name: &str) {
        out.push_str("SELECT COUNT(*) FROM pg_indexes\nWHERE schemaname = current_schema() AND tablename = ");
        self.write_value_string(out, table);
        out.push_str(" AND indexname = ");
        self.write_value_string(out, name);
        out.push(';');
    }

    fn write_exists_foreign_key_by_name(&self, out: &mut String, table: &str, name: &str) {
        out.push_str(
            "SELECT COUNT(*) FROM information_schema.table_constraints\nWHERE constraint_type = 'FOREIGN KEY' AND table_schema = current_schema() AND table_name = ",
        );
        self.write_value_string(out, table);
        out.push_str(" AND constraint_name = ");
        self.write_value_string(out, name);
        out.push(';');
    }

    fn write_exists_foreign_key_by_fields(&self, out: &mut String, spec: &ForeignKeySpec) {
        out.push_str(
            "SELECT COUNT(*) FROM information_schema.table_constraints tc\n\
             JOIN information_schema.key_column_usage kcu ON tc.constraint_name = kcu.constraint_name AND tc.table_schema = kcu.table_schema\n\
             JOIN information_schema.constraint_column_usage ccu ON tc.constraint_name = ccu.constraint_name AND tc.table_schema = ccu.table_schema\n\
             WHERE tc.constraint_type = 'FOREIGN KEY' AND tc.table_schema = current_schema() AND tc.table_name = ",
        );
        self.write_value_string(out, &spec.from_table);
        out.push_str(" AND kcu.column_name = ");
        self.write_value_string(out, &spec.from_field);
        out.push_str(" AND ccu.table_name = ");
        self.write_value_string(out, &spec.ref_table);
        out.push_str(" AND ccu.column_name = ");
        self.write_value_string(out, &spec.ref_field);
        out.push(';');
    }

    fn write_generated_key_query(&self, out: &mut String, table: &str, field: &FieldDef) {
        out.push_str("SELECT currval(");
        self.write_value_string(out, &self.sequence_name(table, field.storage_name));
        out.push_str(");");
    }
}
