use crate::{Query, Result, RowLabeled, RowsAffected};
use std::future::Future;

/// Connection collaborator, the only way the engine reaches the database.
///
/// Connection management, pooling and driver registration stay outside of this
/// crate: an implementation wraps an already established connection and exposes
/// these four primitives.
pub trait Executor: Send {
    /// Backend identifier: `postgres`, `mysql`, `sqlite`, `mssql` or `hana`.
    fn name(&self) -> &'static str;

    /// Run a statement that produces no rows.
    fn execute(&mut self, sql: String) -> impl Future<Output = Result<RowsAffected>> + Send;

    /// Run a query and return its first row, if any.
    fn fetch_one(
        &mut self,
        query: Query,
    ) -> impl Future<Output = Result<Option<RowLabeled>>> + Send;

    /// Run a query and return all its rows.
    fn fetch_all(&mut self, query: Query) -> impl Future<Output = Result<Vec<RowLabeled>>> + Send;
}
