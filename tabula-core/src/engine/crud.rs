use crate::{
    AsValue, ColumnValue, Engine, Entity, Error, Executor, FieldDef, GeneratedKey, Result,
    TableRef, Value, engine::first_value,
};
use anyhow::Context as _;
use log::Level;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CrudMode {
    Create,
    Update,
}

/// State of one CRUD call, discarded when the call returns.
#[derive(Debug)]
struct CrudContext {
    table: TableRef,
    /// Columns written by INSERT or UPDATE ... SET, in field order.
    columns: Vec<(&'static FieldDef, ColumnValue)>,
    /// Primary key values identifying the row.
    keys: Vec<(&'static FieldDef, Value)>,
    increment: Option<&'static FieldDef>,
}

impl CrudContext {
    fn new<T: Entity>(mode: CrudMode, entity: &T) -> Self {
        let table = T::table_ref();
        let mut columns = Vec::with_capacity(table.fields.len());
        let mut keys = Vec::new();
        let mut increment = None;
        for (field, value) in table.fields.iter().zip(entity.values()) {
            if !field.persisted {
                continue;
            }
            if field.is_increment() {
                increment = Some(field);
            }
            if field.is_primary_key() {
                match mode {
                    CrudMode::Update => {
                        keys.push((field, value));
                        continue;
                    }
                    CrudMode::Create if !field.is_increment() => keys.push((field, value.clone())),
                    CrudMode::Create => {}
                }
            }
            columns.push((field, column_value(field, value)));
        }
        Self {
            table,
            columns,
            keys,
            increment,
        }
    }
}

/// What to write for a field, first match wins: incrementing key, declared
/// default over a zero value, zero literal for an absent non-nullable value,
/// the value itself.
fn column_value(field: &FieldDef, value: Value) -> ColumnValue {
    if field.is_increment() {
        return ColumnValue::AutoAssign;
    }
    if let Some(default) = field.default()
        && value.is_zero()
    {
        return ColumnValue::UseDefault(default);
    }
    if field.is_not_null() && value.is_null() {
        return ColumnValue::Literal(value.zero());
    }
    ColumnValue::Literal(value)
}

fn key_values<T: Entity>(entity: &T) -> Vec<(&'static FieldDef, Value)> {
    T::fields()
        .iter()
        .zip(entity.values())
        .filter(|(f, _)| f.is_primary_key())
        .collect()
}

fn missing_key_error(table: &str) -> Error {
    let error = Error::msg(format!(
        "Entity of table `{table}` does not declare a primary key"
    ));
    log::error!("{error:#}");
    error
}

impl<E: Executor> Engine<E> {
    /// Insert the entity, then reset it to its zero state and read back the
    /// stored row, so that generated keys and defaults are reflected.
    ///
    /// An entity without primary key is inserted but not read back.
    pub async fn create<T: Entity>(&mut self, entity: &mut T) -> Result<()> {
        let mut context = CrudContext::new(CrudMode::Create, entity);
        let table = context.table.name;
        let mut sql = String::with_capacity(128 + context.columns.len() * 32);
        self.writer
            .write_insert(&mut sql, table, &context.columns, context.increment)
            .inspect_err(|e| log::error!("{e:#}"))?;
        if let Some(key) = context.increment {
            let id = match self.writer.generated_key() {
                GeneratedKey::Returning | GeneratedKey::Output => {
                    first_value(self.fetch_one(sql.into()).await?)
                }
                GeneratedKey::Query => match self.execute(sql).await?.last_affected_id {
                    Some(id) => Some(Value::Int64(Some(id))),
                    None => {
                        let mut sql = String::with_capacity(64);
                        self.writer.write_generated_key_query(&mut sql, table, key);
                        first_value(self.fetch_one(sql.into()).await?)
                    }
                },
            };
            let id = id
                .ok_or_else(|| Error::msg("The database did not return the generated key"))
                .and_then(i64::try_from_value)
                .with_context(|| format!("While reading the key `{}` of `{table}`", key.name))
                .inspect_err(|e| log::error!("{e:#}"))?;
            context.keys.push((key, Value::Int64(Some(id))));
        } else {
            self.execute(sql).await?;
        }
        if context.keys.is_empty() {
            return Ok(());
        }
        *entity = T::zeroed();
        if !self.read_by_key(&context.table, &context.keys, entity).await? {
            let error = Error::msg(format!(
                "The row inserted into `{table}` could not be read back"
            ));
            log::error!("{error:#}");
            return Err(error);
        }
        Ok(())
    }

    /// Update every non key field of the row identified by the entity keys,
    /// then reset the entity and read the row back.
    pub async fn update<T: Entity>(&mut self, entity: &mut T) -> Result<()> {
        let context = CrudContext::new(CrudMode::Update, entity);
        let table = context.table.name;
        if context.keys.is_empty() {
            return Err(missing_key_error(table));
        }
        let mut sql = String::with_capacity(128 + context.columns.len() * 32);
        self.writer
            .write_update(&mut sql, table, &context.columns, &context.keys)
            .inspect_err(|e| log::error!("{e:#}"))?;
        self.execute(sql).await?;
        *entity = T::zeroed();
        if !self.read_by_key(&context.table, &context.keys, entity).await? {
            let error = Error::msg(format!(
                "Updated row of `{table}` not found by its primary key"
            ));
            log::error!("{error:#}");
            return Err(error);
        }
        Ok(())
    }

    /// Delete the row identified by the entity keys, exactly one row must go.
    pub async fn delete<T: Entity>(&mut self, entity: &T) -> Result<()> {
        let table = T::table_name();
        let keys = key_values(entity);
        if keys.is_empty() {
            return Err(missing_key_error(table));
        }
        let mut sql = String::with_capacity(128);
        self.writer.write_delete(&mut sql, table, &keys)?;
        let affected = self.execute(sql).await?;
        if affected.rows_affected != 1 {
            let error = Error::msg(format!(
                "The query deleted {} rows from `{table}` instead of the expected 1",
                affected.rows_affected
            ));
            log::log!(
                if affected.rows_affected == 0 {
                    Level::Info
                } else {
                    Level::Error
                },
                "{error}"
            );
            return Err(error);
        }
        Ok(())
    }

    /// Load the row identified by the primary key already set in the entity.
    ///
    /// Returns `false` and leaves the entity untouched when the row does not exist.
    pub async fn get_entity<T: Entity>(&mut self, entity: &mut T) -> Result<bool> {
        let table = T::table_ref();
        let keys = key_values(entity);
        if keys.is_empty() {
            return Err(missing_key_error(table.name));
        }
        self.read_by_key(&table, &keys, entity).await
    }

    async fn read_by_key<T: Entity>(
        &mut self,
        table: &TableRef,
        keys: &[(&'static FieldDef, Value)],
        entity: &mut T,
    ) -> Result<bool> {
        let mut sql = String::with_capacity(128 + table.fields.len() * 16);
        self.writer.write_select_by_key(&mut sql, table, keys)?;
        let Some(row) = self.fetch_one(sql.into()).await? else {
            return Ok(false);
        };
        entity
            .load(&row)
            .with_context(|| format!("While reading a row of `{}`", table.name))
            .inspect_err(|e| log::error!("{e:#}"))?;
        Ok(true)
    }
}
