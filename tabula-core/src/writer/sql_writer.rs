use crate::{
    Connector, Directives, Error, FieldDef, ForeignKeySpec, GeneratedKey, IncrementStrategy,
    IndexSpec, Predicate, Result, SchemaBuild, SchemaField, SequenceSpec, TableRef, Value,
    separated_by, writer::Context,
};
use anyhow::Context as _;
use std::fmt::Write;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};

macro_rules! write_integer {
    ($out:ident, $value:expr) => {{
        let mut buffer = itoa::Buffer::new();
        $out.push_str(buffer.format($value));
    }};
}
macro_rules! write_float {
    ($this:ident, $out:ident, $value:expr) => {{
        if $value.is_infinite() {
            $this.write_value_infinity($out, $value.is_sign_negative());
        } else if $value.is_nan() {
            $this.write_value_nan($out);
        } else {
            let mut buffer = ryu::Buffer::new();
            $out.push_str(buffer.format($value));
        }
    }};
}

/// Value emitted for one column of an INSERT or UPDATE.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    /// The database assigns the value (incrementing key).
    AutoAssign,
    /// The declared default applies, holds the default expression.
    UseDefault(&'static str),
    Literal(Value),
}

/// Dialect printer turning entity metadata into concrete SQL.
///
/// Default methods produce the ANSI flavor, every backend overrides the
/// fragments where it differs (quoting, type map, increment strategy, paging).
pub trait SqlWriter: Send + Sync {
    /// Backend identifier, the same one reported by the executor.
    fn name(&self) -> &'static str;

    fn increment_strategy(&self) -> IncrementStrategy;

    fn generated_key(&self) -> GeneratedKey {
        GeneratedKey::Query
    }

    /// Escape occurrences of `search` char with `replace` while copying into buffer.
    fn write_escaped(&self, out: &mut String, value: &str, search: char, replace: &str) {
        let mut position = 0;
        for (i, c) in value.char_indices() {
            if c == search {
                out.push_str(&value[position..i]);
                out.push_str(replace);
                position = i + c.len_utf8();
            }
        }
        out.push_str(&value[position..]);
    }

    /// Quote identifiers ("name") doubling inner quotes.
    fn write_identifier_quoted(&self, out: &mut String, value: &str) {
        out.push('"');
        self.write_escaped(out, value, '"', "\"\"");
        out.push('"');
    }

    /// Backend column type of a value prototype.
    fn write_column_type(&self, out: &mut String, value: &Value, increment: bool) -> Result<()>;

    fn write_value(&self, out: &mut String, value: &Value) {
        match value {
            v if v.is_null() => self.write_value_none(out),
            Value::Boolean(Some(v)) => self.write_value_bool(out, *v),
            Value::Int8(Some(v)) => write_integer!(out, *v),
            Value::Int16(Some(v)) => write_integer!(out, *v),
            Value::Int32(Some(v)) => write_integer!(out, *v),
            Value::Int64(Some(v)) => write_integer!(out, *v),
            Value::UInt8(Some(v)) => write_integer!(out, *v),
            Value::UInt16(Some(v)) => write_integer!(out, *v),
            Value::UInt32(Some(v)) => write_integer!(out, *v),
            Value::UInt64(Some(v)) => write_integer!(out, *v),
            Value::Float32(Some(v)) => write_float!(self, out, *v),
            Value::Float64(Some(v)) => write_float!(self, out, *v),
            Value::Decimal(Some(v)) => {
                let _ = write!(out, "{v}");
            }
            Value::Varchar(Some(v)) => self.write_value_string(out, v),
            Value::Blob(Some(v)) => self.write_value_blob(out, v),
            Value::Date(Some(v)) => self.write_value_date(out, v),
            Value::Time(Some(v)) => self.write_value_time(out, v),
            Value::Timestamp(Some(v)) => self.write_value_timestamp(out, v),
            Value::TimestampWithTimezone(Some(v)) => self.write_value_timestamptz(out, v),
            Value::Uuid(Some(v)) => self.write_value_string(out, &v.to_string()),
            _ => self.write_value_none(out),
        }
    }

    fn write_value_none(&self, out: &mut String) {
        out.push_str("NULL");
    }

    fn write_value_bool(&self, out: &mut String, value: bool) {
        out.push_str(["FALSE", "TRUE"][value as usize]);
    }

    fn write_value_infinity(&self, out: &mut String, negative: bool) {
        out.push_str(if negative { "'-Infinity'" } else { "'Infinity'" });
    }

    fn write_value_nan(&self, out: &mut String) {
        out.push_str("'NaN'");
    }

    /// Single quoted string literal, inner quotes doubled.
    fn write_value_string(&self, out: &mut String, value: &str) {
        out.push('\'');
        self.write_escaped(out, value, '\'', "''");
        out.push('\'');
    }

    fn write_value_blob(&self, out: &mut String, value: &[u8]) {
        out.push_str("X'");
        out.push_str(&hex::encode_upper(value));
        out.push('\'');
    }

    fn write_value_date(&self, out: &mut String, value: &Date) {
        out.push('\'');
        write_date(out, value);
        out.push('\'');
    }

    fn write_value_time(&self, out: &mut String, value: &Time) {
        out.push('\'');
        write_time(out, value);
        out.push('\'');
    }

    /// Timestamp literal, `'YYYY-MM-DD HH:MM:SS[.fraction]'`.
    fn write_value_timestamp(&self, out: &mut String, value: &PrimitiveDateTime) {
        out.push('\'');
        write_date(out, &value.date());
        out.push(' ');
        write_time(out, &value.time());
        out.push('\'');
    }

    /// Backends without a zoned type store the UTC instant.
    fn write_value_timestamptz(&self, out: &mut String, value: &OffsetDateTime) {
        let value = value.to_utc();
        self.write_value_timestamp(out, &PrimitiveDateTime::new(value.date(), value.time()));
    }

    /// Bind a parameter and write its placeholder, `?` by default.
    fn write_placeholder(&self, context: &mut Context, out: &mut String, value: Value) {
        context.bind(value);
        out.push('?');
    }

    fn write_current_timestamp(&self, out: &mut String) {
        out.push_str("CURRENT_TIMESTAMP");
    }

    /// The `eot` default token.
    fn write_end_of_time(&self, out: &mut String) {
        out.push_str("'9999-12-31 23:59:59'");
    }

    /// Translate an annotation default expression into a default clause value.
    fn write_default_expression(
        &self,
        out: &mut String,
        field: &FieldDef,
        expression: &str,
    ) -> Result<()> {
        match expression {
            "now()" => self.write_current_timestamp(out),
            "eot" => self.write_end_of_time(out),
            _ => {
                let unquoted = expression
                    .strip_prefix('\'')
                    .and_then(|v| v.strip_suffix('\''))
                    .or_else(|| {
                        expression
                            .strip_prefix('"')
                            .and_then(|v| v.strip_suffix('"'))
                    });
                match &field.value {
                    Value::Boolean(..) => {
                        let value = <bool as crate::AsValue>::parse(unquoted.unwrap_or(expression))
                            .with_context(|| {
                                format!("Invalid boolean default for `{}`", field.storage_name)
                            })?;
                        self.write_value_bool(out, value);
                    }
                    Value::Varchar(..)
                    | Value::Date(..)
                    | Value::Time(..)
                    | Value::Timestamp(..)
                    | Value::TimestampWithTimezone(..)
                    | Value::Uuid(..) => {
                        self.write_value_string(out, unquoted.unwrap_or(expression))
                    }
                    _ => out.push_str(unquoted.unwrap_or(expression)),
                }
            }
        }
        Ok(())
    }

    fn write_create_table_prefix(&self, out: &mut String) {
        out.push_str("CREATE TABLE ");
    }

    /// Column modifier making a key incrementing, written right after the type.
    fn write_column_increment(&self, _out: &mut String, _start: Option<i64>) {}

    /// The incrementing key is declared on its column instead of a table level
    /// `PRIMARY KEY` clause, which then rules out composite incrementing keys.
    fn inline_increment_key(&self) -> bool {
        false
    }

    /// Foreign keys can only be declared inside `CREATE TABLE`.
    fn inline_foreign_keys(&self) -> bool {
        false
    }

    /// One column definition, recording every artifact the field asks for.
    fn write_column_definition(
        &self,
        out: &mut String,
        table: &str,
        field: &FieldDef,
        result: &mut SchemaBuild,
    ) -> Result<String> {
        let increment = field.is_increment();
        self.write_identifier_quoted(out, field.storage_name);
        out.push(' ');
        let position = out.len();
        self.write_column_type(out, &field.value, increment)
            .with_context(|| {
                format!(
                    "Field `{}` of type `{}` cannot be mapped to a {} column",
                    field.name,
                    field.declared_type,
                    self.name()
                )
            })?;
        let column_type = out[position..].to_string();
        if increment {
            let start = field.start();
            self.write_column_increment(out, start);
            result.sequences.push(SequenceSpec {
                table: table.into(),
                field: field.storage_name.into(),
                start,
            });
        }
        for (name, value) in &field.attributes {
            match *name {
                "primary_key" => {
                    if !value.is_empty() && *value != "inc" {
                        return Err(Error::msg(format!(
                            "Invalid primary key mode `{value}` on `{}`, expected `inc` or nothing",
                            field.storage_name
                        )));
                    }
                    result.primary_key.push(field.storage_name.into());
                }
                "start" => {
                    if value.parse::<i64>().is_err() {
                        return Err(Error::msg(format!(
                            "Invalid start value `{value}` on `{}`",
                            field.storage_name
                        )));
                    }
                    if !increment {
                        return Err(Error::msg(format!(
                            "Field `{}` declares a start value but it is not an incrementing key",
                            field.storage_name
                        )));
                    }
                }
                "default" => {
                    out.push_str(" DEFAULT ");
                    self.write_default_expression(out, field, value)?;
                }
                "nullable" => match *value {
                    "false" => out.push_str(" NOT NULL"),
                    "true" => {}
                    _ => {
                        return Err(Error::msg(format!(
                            "Invalid nullable value `{value}` on `{}`",
                            field.storage_name
                        )));
                    }
                },
                "constraint" => {
                    if *value != "unique" {
                        return Err(Error::msg(format!(
                            "Unknown constraint `{value}` on `{}`",
                            field.storage_name
                        )));
                    }
                    out.push_str(" UNIQUE");
                }
                "index" => {
                    let (name, unique) = match *value {
                        "unique" => (format!("idx_{}", field.storage_name), true),
                        "non-unique" => (format!("idx_{}", field.storage_name), false),
                        name => (name.to_string(), false),
                    };
                    result
                        .indexes
                        .entry(name)
                        .or_insert_with(|| IndexSpec {
                            table: table.into(),
                            unique,
                            columns: Vec::new(),
                        })
                        .columns
                        .push(field.storage_name.into());
                }
                "fkey" => {
                    let (ref_table, ref_field) = crate::parse_foreign_key_target(value)
                        .ok_or_else(|| {
                            Error::msg(format!(
                                "Invalid foreign key target `{value}` on `{}`, expected `table(column)`",
                                field.storage_name
                            ))
                        })?;
                    result.foreign_keys.push(ForeignKeySpec::new(
                        table,
                        field.storage_name,
                        ref_table,
                        ref_field,
                    ));
                }
                other => {
                    return Err(Error::msg(format!(
                        "Unknown attribute `{other}` on `{}`",
                        field.storage_name
                    )));
                }
            }
        }
        Ok(column_type)
    }

    /// Build the `CREATE TABLE` statement and the artifacts it needs.
    fn build_schema(&self, table: &str, fields: &[FieldDef]) -> Result<SchemaBuild> {
        if table.is_empty() {
            return Err(Error::msg("Cannot build a schema without a table name"));
        }
        let persisted = fields.iter().filter(|f| f.persisted);
        let increments = persisted.clone().filter(|f| f.is_increment()).count();
        let keys = persisted.clone().filter(|f| f.is_primary_key()).count();
        if increments > 1 {
            return Err(Error::msg(format!(
                "Table `{table}` declares more than one incrementing key"
            )));
        }
        if increments == 1 && keys > 1 && self.inline_increment_key() {
            return Err(Error::msg(format!(
                "Table `{table}` has a composite primary key with an incrementing field, {} does not support it",
                self.name()
            )));
        }
        let mut result = SchemaBuild {
            table: table.into(),
            ..Default::default()
        };
        for field in persisted {
            let mut definition = String::with_capacity(64);
            let column_type =
                self.write_column_definition(&mut definition, table, field, &mut result)?;
            result.fields.push(SchemaField {
                field: field.clone(),
                column_type,
                definition,
            });
        }
        let mut out = String::with_capacity(128 + result.fields.len() * 48);
        self.write_create_table_prefix(&mut out);
        self.write_identifier_quoted(&mut out, table);
        out.push_str(" (\n");
        separated_by(
            &mut out,
            &result.fields,
            |out, v| out.push_str(&v.definition),
            ",\n",
        );
        let table_keys = result
            .fields
            .iter()
            .filter(|f| f.field.is_primary_key())
            .filter(|f| !(self.inline_increment_key() && f.field.is_increment()))
            .map(|f| f.field.storage_name)
            .collect::<Vec<_>>();
        if !table_keys.is_empty() {
            out.push_str(",\nPRIMARY KEY (");
            separated_by(
                &mut out,
                table_keys,
                |out, v| self.write_identifier_quoted(out, v),
                ", ",
            );
            out.push(')');
        }
        if self.inline_foreign_keys() {
            for fk in &result.foreign_keys {
                out.push_str(",\n");
                self.write_foreign_key_constraint(&mut out, fk);
            }
        }
        out.push_str("\n);");
        result.create_sql = out;
        Ok(result)
    }

    /// `CONSTRAINT "fk_.." FOREIGN KEY ("col") REFERENCES "table" ("col")`
    fn write_foreign_key_constraint(&self, out: &mut String, spec: &ForeignKeySpec) {
        out.push_str("CONSTRAINT ");
        self.write_identifier_quoted(out, &spec.name());
        out.push_str(" FOREIGN KEY (");
        self.write_identifier_quoted(out, &spec.from_field);
        out.push_str(") REFERENCES ");
        self.write_identifier_quoted(out, &spec.ref_table);
        out.push_str(" (");
        self.write_identifier_quoted(out, &spec.ref_field);
        out.push(')');
    }

    /// ` CONSTRAINT "fk_.." REFERENCES "table" ("col")` appended to a column definition.
    fn write_column_references(&self, out: &mut String, spec: &ForeignKeySpec) {
        out.push_str(" CONSTRAINT ");
        self.write_identifier_quoted(out, &spec.name());
        out.push_str(" REFERENCES ");
        self.write_identifier_quoted(out, &spec.ref_table);
        out.push_str(" (");
        self.write_identifier_quoted(out, &spec.ref_field);
        out.push(')');
    }

    fn write_drop_table(&self, out: &mut String, table: &str) {
        out.push_str("DROP TABLE ");
        self.write_identifier_quoted(out, table);
        out.push(';');
    }

    fn write_exists_table(&self, out: &mut String, table: &str);

    fn write_exists_column(&self, out: &mut String, table: &str, column: &str);

    /// Statements adding the given column definitions, one statement by default.
    fn write_alter_add_columns(&self, table: &str, definitions: &[&str]) -> Vec<String> {
        let mut out = String::with_capacity(64 + definitions.len() * 48);
        out.push_str("ALTER TABLE ");
        self.write_identifier_quoted(&mut out, table);
        out.push(' ');
        separated_by(
            &mut out,
            definitions,
            |out, v| {
                out.push_str("ADD COLUMN ");
                out.push_str(v);
            },
            ", ",
        );
        out.push(';');
        vec![out]
    }

    /// Name of the counter behind an incrementing field.
    fn sequence_name(&self, table: &str, _field: &str) -> String {
        table.to_string()
    }

    fn write_create_sequence(&self, out: &mut String, name: &str, start: i64);

    fn write_alter_sequence_start(&self, out: &mut String, name: &str, start: i64);

    fn write_exists_sequence(&self, out: &mut String, name: &str);

    fn write_drop_sequence(&self, out: &mut String, name: &str);

    fn write_next_sequence_value(&self, out: &mut String, name: &str);

    fn write_create_index(&self, out: &mut String, name: &str, spec: &IndexSpec) {
        out.push_str("CREATE ");
        if spec.unique {
            out.push_str("UNIQUE ");
        }
        out.push_str("INDEX ");
        self.write_identifier_quoted(out, name);
        out.push_str(" ON ");
        self.write_identifier_quoted(out, &spec.table);
        out.push_str(" (");
        separated_by(
            out,
            &spec.columns,
            |out, v| self.write_identifier_quoted(out, v),
            ", ",
        );
        out.push_str(");");
    }

    fn write_drop_index(&self, out: &mut String, _table: &str, name: &str) {
        out.push_str("DROP INDEX ");
        self.write_identifier_quoted(out, name);
        out.push(';');
    }

    fn write_exists_index(&self, out: &mut String, table: &str, name: &str);

    fn write_create_foreign_key(&self, out: &mut String, spec: &ForeignKeySpec) -> Result<()> {
        out.push_str("ALTER TABLE ");
        self.write_identifier_quoted(out, &spec.from_table);
        out.push_str(" ADD ");
        self.write_foreign_key_constraint(out, spec);
        out.push(';');
        Ok(())
    }

    fn write_drop_foreign_key(&self, out: &mut String, table: &str, name: &str) -> Result<()> {
        out.push_str("ALTER TABLE ");
        self.write_identifier_quoted(out, table);
        out.push_str(" DROP CONSTRAINT ");
        self.write_identifier_quoted(out, name);
        out.push(';');
        Ok(())
    }

    fn write_exists_foreign_key_by_name(&self, out: &mut String, table: &str, name: &str);

    fn write_exists_foreign_key_by_fields(&self, out: &mut String, spec: &ForeignKeySpec);

    /// Value making the database assign the key, `None` leaves the column out.
    fn auto_assign_placeholder(&self, _table: &str, _field: &FieldDef) -> Option<String> {
        Some("DEFAULT".into())
    }

    /// Keyword selecting the declared default, `None` leaves the column out of
    /// inserts and writes the default expression in updates.
    fn use_default_placeholder(&self) -> Option<&'static str> {
        Some("DEFAULT")
    }

    /// Query reading back the key assigned by the last insert.
    fn write_generated_key_query(&self, out: &mut String, table: &str, field: &FieldDef);

    fn write_returning(&self, out: &mut String, key: &FieldDef) {
        out.push_str(" RETURNING ");
        self.write_identifier_quoted(out, key.storage_name);
    }

    fn write_output_inserted(&self, out: &mut String, key: &FieldDef) {
        out.push_str(" OUTPUT INSERTED.");
        self.write_identifier_quoted(out, key.storage_name);
    }

    fn write_insert(
        &self,
        out: &mut String,
        table: &str,
        columns: &[(&FieldDef, ColumnValue)],
        returning: Option<&FieldDef>,
    ) -> Result<()> {
        let mut names = Vec::with_capacity(columns.len());
        let mut values = Vec::with_capacity(columns.len());
        for (field, value) in columns {
            let mut rendered = String::new();
            match value {
                ColumnValue::AutoAssign => match self.auto_assign_placeholder(table, field) {
                    Some(v) => rendered.push_str(&v),
                    None => continue,
                },
                ColumnValue::UseDefault(..) => match self.use_default_placeholder() {
                    Some(v) => rendered.push_str(v),
                    None => continue,
                },
                ColumnValue::Literal(v) => self.write_value(&mut rendered, v),
            }
            names.push(field.storage_name);
            values.push(rendered);
        }
        out.reserve(128 + columns.len() * 48);
        out.push_str("INSERT INTO ");
        self.write_identifier_quoted(out, table);
        if !names.is_empty() {
            out.push_str(" (");
            separated_by(
                out,
                &names,
                |out, v| self.write_identifier_quoted(out, v),
                ", ",
            );
            out.push(')');
        }
        let key = returning.filter(|_| self.generated_key() != GeneratedKey::Query);
        if let Some(key) = key
            && self.generated_key() == GeneratedKey::Output
        {
            self.write_output_inserted(out, key);
        }
        if names.is_empty() {
            out.push_str(" DEFAULT VALUES");
        } else {
            out.push_str(" VALUES\n(");
            separated_by(out, &values, |out, v| out.push_str(v), ", ");
            out.push(')');
        }
        if let Some(key) = key
            && self.generated_key() == GeneratedKey::Returning
        {
            self.write_returning(out, key);
        }
        out.push(';');
        Ok(())
    }

    /// `"a" = 1 AND "b" = 'x'`
    fn write_key_condition(&self, out: &mut String, keys: &[(&FieldDef, Value)]) -> Result<()> {
        if keys.is_empty() {
            return Err(Error::msg("The entity does not declare a primary key"));
        }
        separated_by(
            out,
            keys,
            |out, (field, value)| {
                self.write_identifier_quoted(out, field.storage_name);
                out.push_str(" = ");
                self.write_value(out, value);
            },
            " AND ",
        );
        Ok(())
    }

    fn write_update(
        &self,
        out: &mut String,
        table: &str,
        columns: &[(&FieldDef, ColumnValue)],
        keys: &[(&FieldDef, Value)],
    ) -> Result<()> {
        if columns.is_empty() {
            return Err(Error::msg(format!(
                "Table `{table}` has no column to update beside its primary key"
            )));
        }
        out.reserve(128 + columns.len() * 48);
        out.push_str("UPDATE ");
        self.write_identifier_quoted(out, table);
        out.push_str(" SET ");
        let mut result = Ok(());
        separated_by(
            out,
            columns,
            |out, (field, value)| {
                self.write_identifier_quoted(out, field.storage_name);
                out.push_str(" = ");
                match value {
                    ColumnValue::AutoAssign => out.push_str("DEFAULT"),
                    ColumnValue::UseDefault(expression) => match self.use_default_placeholder() {
                        Some(v) => out.push_str(v),
                        None => {
                            if let Err(e) = self.write_default_expression(out, field, expression) {
                                result = Err(e);
                            }
                        }
                    },
                    ColumnValue::Literal(v) => self.write_value(out, v),
                }
            },
            ", ",
        );
        result?;
        out.push_str("\nWHERE ");
        self.write_key_condition(out, keys)?;
        out.push(';');
        Ok(())
    }

    fn write_delete(&self, out: &mut String, table: &str, keys: &[(&FieldDef, Value)]) -> Result<()> {
        out.push_str("DELETE FROM ");
        self.write_identifier_quoted(out, table);
        out.push_str("\nWHERE ");
        self.write_key_condition(out, keys)?;
        out.push(';');
        Ok(())
    }

    fn write_select_columns(&self, out: &mut String, table: &TableRef) {
        separated_by(
            out,
            table.persisted(),
            |out, v| self.write_identifier_quoted(out, v.storage_name),
            ", ",
        );
    }

    fn write_select_by_key(
        &self,
        out: &mut String,
        table: &TableRef,
        keys: &[(&FieldDef, Value)],
    ) -> Result<()> {
        out.push_str("SELECT ");
        self.write_select_columns(out, table);
        out.push_str("\nFROM ");
        self.write_identifier_quoted(out, table.name);
        out.push_str("\nWHERE ");
        self.write_key_condition(out, keys)?;
        out.push(';');
        Ok(())
    }

    /// Written right after `SELECT`, only backends paging with `TOP` use it.
    fn write_select_top(&self, _out: &mut String, _directives: &Directives) {}

    /// Paging clause after `ORDER BY`.
    fn write_paging(&self, out: &mut String, limit: Option<u64>, offset: Option<u64>) {
        if let Some(limit) = limit {
            out.push_str("\nLIMIT ");
            write_integer!(out, limit);
        }
        if let Some(offset) = offset {
            out.push_str("\nOFFSET ");
            write_integer!(out, offset);
        }
    }

    /// Dynamic query, predicate values are bound as parameters in `context`.
    fn write_select(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &TableRef,
        predicates: &[Predicate],
        directives: &Directives,
    ) -> Result<()> {
        let mut conditions = Vec::with_capacity(predicates.len());
        for predicate in predicates {
            let field = table.field(&predicate.field).ok_or_else(|| {
                Error::msg(format!(
                    "Field `{}` does not exist in table `{}`",
                    predicate.field, table.name
                ))
            })?;
            conditions.push((field, predicate));
        }
        out.reserve(128 + conditions.len() * 32);
        out.push_str("SELECT ");
        if directives.count {
            out.push_str("COUNT(*)");
        } else {
            self.write_select_top(out, directives);
            self.write_select_columns(out, table);
        }
        out.push_str("\nFROM ");
        self.write_identifier_quoted(out, table.name);
        if !conditions.is_empty() {
            out.push_str("\nWHERE ");
            let mut connector = None;
            for (field, predicate) in conditions {
                if let Some(connector) = connector {
                    out.push_str(match connector {
                        Connector::And => " AND ",
                        Connector::Or => " OR ",
                    });
                }
                self.write_identifier_quoted(out, field.storage_name);
                out.push(' ');
                out.push_str(predicate.operator.as_sql());
                out.push(' ');
                self.write_placeholder(context, out, predicate.value.clone());
                connector = Some(predicate.connector.unwrap_or_default());
            }
        }
        if !directives.count {
            let order = match &directives.order_by {
                Some(name) => vec![table.field(name).ok_or_else(|| {
                    Error::msg(format!(
                        "Cannot order by `{name}`, it does not exist in table `{}`",
                        table.name
                    ))
                })?],
                None => table.primary_key().collect(),
            };
            let order = if order.is_empty() {
                table.persisted().take(1).collect()
            } else {
                order
            };
            if !order.is_empty() {
                out.push_str("\nORDER BY ");
                let direction = if directives.descending { " DESC" } else { " ASC" };
                separated_by(
                    out,
                    order,
                    |out, v| {
                        self.write_identifier_quoted(out, v.storage_name);
                        out.push_str(direction);
                    },
                    ", ",
                );
            }
            self.write_paging(out, directives.limit, directives.offset);
        }
        out.push(';');
        Ok(())
    }
}

/// `YYYY-MM-DD`
pub fn write_date(out: &mut String, value: &Date) {
    let _ = write!(
        out,
        "{:04}-{:02}-{:02}",
        value.year(),
        value.month() as u8,
        value.day()
    );
}

/// `HH:MM:SS` followed by the significant fractional digits, if any.
pub fn write_time(out: &mut String, value: &Time) {
    let _ = write!(
        out,
        "{:02}:{:02}:{:02}",
        value.hour(),
        value.minute(),
        value.second()
    );
    let mut subsecond = value.nanosecond();
    if subsecond != 0 {
        let mut width = 9;
        while subsecond % 10 == 0 {
            subsecond /= 10;
            width -= 1;
        }
        let _ = write!(out, ".{:0width$}", subsecond);
    }
}
