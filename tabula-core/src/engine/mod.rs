mod crud;
mod foreign_key;
mod index;
mod migration;
mod select;
mod sequence;

use crate::{
    AsValue, EngineConfig, Executor, Query, Result, RowLabeled, RowsAffected, SqlWriter, Value,
    truncate_long, writer_for,
};

/// Schema, migration, CRUD and query operations over one executor.
///
/// The engine holds no state besides its collaborators: every call derives
/// what it needs from the entity metadata and the live database.
pub struct Engine<E: Executor> {
    executor: E,
    writer: Box<dyn SqlWriter>,
    config: EngineConfig,
}

impl<E: Executor> Engine<E> {
    pub fn new(executor: E) -> Result<Self> {
        Self::with_config(executor, EngineConfig::default())
    }

    /// The dialect is selected from [`Executor::name`].
    pub fn with_config(executor: E, config: EngineConfig) -> Result<Self> {
        let writer = writer_for(executor.name(), &config).inspect_err(|e| log::error!("{e:#}"))?;
        Ok(Self {
            executor,
            writer,
            config,
        })
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn executor_mut(&mut self) -> &mut E {
        &mut self.executor
    }

    pub fn into_inner(self) -> E {
        self.executor
    }

    pub fn writer(&self) -> &dyn SqlWriter {
        self.writer.as_ref()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn log_statement(&self, sql: &str) {
        if self.config.log_statements {
            log::debug!("{}", truncate_long!(sql));
        }
    }

    pub(crate) async fn execute(&mut self, sql: String) -> Result<RowsAffected> {
        self.log_statement(&sql);
        let result = self.executor.execute(sql.clone()).await;
        result.inspect_err(|e| log::error!("{e:#}\nwhile executing:\n{}", truncate_long!(sql)))
    }

    pub(crate) async fn fetch_one(&mut self, query: Query) -> Result<Option<RowLabeled>> {
        self.log_statement(&query.sql);
        let sql = query.sql.clone();
        let result = self.executor.fetch_one(query).await;
        result.inspect_err(|e| log::error!("{e:#}\nwhile executing:\n{}", truncate_long!(sql)))
    }

    pub(crate) async fn fetch_all(&mut self, query: Query) -> Result<Vec<RowLabeled>> {
        self.log_statement(&query.sql);
        let sql = query.sql.clone();
        let result = self.executor.fetch_all(query).await;
        result.inspect_err(|e| log::error!("{e:#}\nwhile executing:\n{}", truncate_long!(sql)))
    }

    /// First column of the first row as an integer, `None` without rows.
    pub(crate) async fn fetch_integer(&mut self, sql: String) -> Result<Option<i64>> {
        let Some(row) = self.fetch_one(sql.into()).await? else {
            return Ok(None);
        };
        match row.values.first() {
            Some(v) if !v.is_null() => Ok(Some(i64::try_from_value(v.clone())?)),
            _ => Ok(None),
        }
    }

    /// Catalog lookups answer with a count, a missing row means zero.
    pub(crate) async fn fetch_exists(&mut self, sql: String) -> Result<bool> {
        Ok(self.fetch_integer(sql).await?.unwrap_or(0) > 0)
    }
}

/// First column of a row, used to read back generated keys.
pub(crate) fn first_value(row: Option<RowLabeled>) -> Option<Value> {
    row.and_then(|v| v.values.into_vec().into_iter().next())
        .filter(|v| !v.is_null())
}
