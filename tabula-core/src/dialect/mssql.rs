use crate::{
    Directives, FieldDef, ForeignKeySpec, GeneratedKey, IncrementStrategy, Result, SqlWriter,
    Value, writer::Context,
};
use std::fmt::Write;
use time::OffsetDateTime;

pub struct MssqlSqlWriter {
    pub string_length: u32,
}

impl SqlWriter for MssqlSqlWriter {
    fn name(&self) -> &'static str {
        "mssql"
    }

    fn increment_strategy(&self) -> IncrementStrategy {
        IncrementStrategy::Identity
    }

    fn generated_key(&self) -> GeneratedKey {
        GeneratedKey::Output
    }

    fn write_identifier_quoted(&self, out: &mut String, value: &str) {
        out.push('[');
        self.write_escaped(out, value, ']', "]]");
        out.push(']');
    }

    fn write_value_string(&self, out: &mut String, value: &str) {
        out.push_str("N'");
        self.write_escaped(out, value, '\'', "''");
        out.push('\'');
    }

    fn write_value_bool(&self, out: &mut String, value: bool) {
        out.push(['0', '1'][value as usize]);
    }

    fn write_value_blob(&self, out: &mut String, value: &[u8]) {
        out.push_str("0x");
        out.push_str(&hex::encode_upper(value));
    }

    fn write_value_infinity(&self, out: &mut String, _negative: bool) {
        self.write_value_none(out);
    }

    fn write_value_nan(&self, out: &mut String) {
        self.write_value_none(out);
    }

    fn write_value_timestamptz(&self, out: &mut String, value: &OffsetDateTime) {
        let _ = write!(
            out,
            "'{:04}-{:02}-{:02} {:02}:{:02}:{:02}.{:07}{:+03}:{:02}'",
            value.year(),
            value.month() as u8,
            value.day(),
            value.hour(),
            value.minute(),
            value.second(),
            value.nanosecond() / 100,
            value.offset().whole_hours(),
            value.offset().minutes_past_hour().abs(),
        );
    }

    fn write_column_type(&self, out: &mut String, value: &Value, _increment: bool) -> Result<()> {
        match value {
            Value::Boolean(..) => out.push_str("BIT"),
            Value::Int8(..) | Value::Int16(..) | Value::UInt8(..) => out.push_str("SMALLINT"),
            Value::Int32(..) | Value::UInt16(..) => out.push_str("INT"),
            Value::Int64(..) | Value::UInt32(..) => out.push_str("BIGINT"),
            Value::UInt64(..) => out.push_str("DECIMAL(20,0)"),
            Value::Float32(..) => out.push_str("REAL"),
            Value::Float64(..) => out.push_str("FLOAT"),
            Value::Decimal(..) => out.push_str("DECIMAL(38,10)"),
            Value::Varchar(..) => {
                let _ = write!(out, "NVARCHAR({})", self.string_length);
            }
            Value::Blob(..) => out.push_str("VARBINARY(MAX)"),
            Value::Date(..) => out.push_str("DATE"),
            Value::Time(..) => out.push_str("TIME"),
            Value::Timestamp(..) => out.push_str("DATETIME2"),
            Value::TimestampWithTimezone(..) => out.push_str("DATETIMEOFFSET"),
            Value::Uuid(..) => out.push_str("UNIQUEIDENTIFIER"),
            Value::Null => return Err(crate::Error::msg("Unmapped type")),
        }
        Ok(())
    }

    fn write_column_increment(&self, out: &mut String, start: Option<i64>) {
        let _ = write!(out, " IDENTITY({},1)", start.unwrap_or(1));
    }

    fn write_placeholder(&self, context: &mut Context, out: &mut String, value: Value) {
        let position = context.bind(value);
        let _ = write!(out, "@p{position}");
    }

    fn write_current_timestamp(&self, out: &mut String) {
        out.push_str("GETDATE()");
    }

    fn write_exists_table(&self, out: &mut String, table: &str) {
        out.push_str("SELECT COUNT(*) FROM INFORMATION_SCHEMA.TABLES\nWHERE TABLE_NAME = ");
        self.write_value_string(out, table);
        out.push(';');
    }

    fn write_exists_column(&self, out: &mut String, table: &str, column: &str) {
        out.push_str("SELECT COUNT(*) FROM INFORMATION_SCHEMA.COLUMNS\nWHERE TABLE_NAME = ");
        self.write_value_string(out, table);
        out.push_str(" AND COLUMN_NAME = ");
        self.write_value_string(out, column);
        out.push(';');
    }

    fn write_alter_add_columns(&self, table: &str, definitions: &[&str]) -> Vec<String> {
        let mut out = String::with_capacity(64 + definitions.len() * 48);
        out.push_str("ALTER TABLE ");
        self.write_identifier_quoted(&mut out, table);
        out.push_str(" ADD ");
        out.push_str(&definitions.join(", "));
        out.push(';');
        vec![out]
    }

    /// The identity seed is the value handed out next on a fresh table.
    fn write_create_sequence(&self, out: &mut String, name: &str, start: i64) {
        out.push_str("DBCC CHECKIDENT (");
        self.write_value_string(out, name);
        let _ = write!(out, ", RESEED, {start});");
    }

    /// After rows were inserted the next value is the reseed value plus one.
    fn write_alter_sequence_start(&self, out: &mut String, name: &str, start: i64) {
        out.push_str("DBCC CHECKIDENT (");
        self.write_value_string(out, name);
        let _ = write!(out, ", RESEED, {});", start - 1);
    }

    fn write_exists_sequence(&self, out: &mut String, name: &str) {
        out.push_str("SELECT COUNT(*) FROM sys.identity_columns\nWHERE OBJECT_NAME(object_id) = ");
        self.write_value_string(out, name);
        out.push(';');
    }

    fn write_drop_sequence(&self, out: &mut String, name: &str) {
        out.push_str("DBCC CHECKIDENT (");
        self.write_value_string(out, name);
        out.push_str(", RESEED, 0);");
    }

    fn write_next_sequence_value(&self, out: &mut String, name: &str) {
        out.push_str("SELECT CAST(IDENT_CURRENT(");
        self.write_value_string(out, name);
        out.push_str(") + IDENT_INCR(");
        self.write_value_string(out, name);
        out.push_str(") AS BIGINT);");
    }

    fn write_drop_index(&self, out: &mut String, table: &str, name: &str) {
        out.push_str("DROP INDEX ");
        self.write_identifier_quoted(out, name);
        out.push_str(" ON ");
        self.write_identifier_quoted(out, table);
        out.push(';');
    }

    fn write_exists_index(&self, out: &mut String, table: &str, name: &str) {
        out.push_str("SELECT COUNT(*) FROM sys.indexes\nWHERE object_id = OBJECT_ID(");
        self.write_value_string(out, table);
        out.push_str(") AND name = ");
        self.write_value_string(out, name);
        out.push(';');
    }

    fn write_exists_foreign_key_by_name(&self, out: &mut String, table: &str, name: &str) {
        out.push_str("SELECT COUNT(*) FROM sys.foreign_keys\nWHERE parent_object_id = OBJECT_ID(");
        self.write_value_string(out, table);
        out.push_str(") AND name = ");
        self.write_value_string(out, name);
        out.push(';');
    }

    fn write_exists_foreign_key_by_fields(&self, out: &mut String, spec: &ForeignKeySpec) {
        out.push_str(
            "SELECT COUNT(*) FROM sys.foreign_key_columns fkc\n\
             WHERE fkc.parent_object_id = OBJECT_ID(",
        );
        self.write_value_string(out, &spec.from_table);
        out.push_str(") AND COL_NAME(fkc.parent_object_id, fkc.parent_column_id) = ");
        self.write_value_string(out, &spec.from_field);
        out.push_str(" AND fkc.referenced_object_id = OBJECT_ID(");
        self.write_value_string(out, &spec.ref_table);
        out.push_str(") AND COL_NAME(fkc.referenced_object_id, fkc.referenced_column_id) = ");
        self.write_value_string(out, &spec.ref_field);
        out.push(';');
    }

    fn auto_assign_placeholder(&self, _table: &str, _field: &FieldDef) -> Option<String> {
        None
    }

    fn write_generated_key_query(&self, out: &mut String, _table: &str, _field: &FieldDef) {
        out.push_str("SELECT CAST(SCOPE_IDENTITY() AS BIGINT);");
    }

    fn write_select_top(&self, out: &mut String, directives: &Directives) {
        if let (Some(limit), None) = (directives.limit, directives.offset) {
            let _ = write!(out, "TOP ({limit}) ");
        }
    }

    fn write_paging(&self, out: &mut String, limit: Option<u64>, offset: Option<u64>) {
        if let Some(offset) = offset {
            let _ = write!(out, "\nOFFSET {offset} ROWS");
            if let Some(limit) = limit {
                let _ = write!(out, "\nFETCH NEXT {limit} ROWS ONLY");
            }
        }
    }
}
