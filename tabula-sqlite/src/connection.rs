use crate::{
    CBox,
    bind::bind_params,
    error_message_from_ptr,
    extract::{extract_name, extract_value},
};
use libsqlite3_sys::{
    SQLITE_BUSY, SQLITE_DONE, SQLITE_OK, SQLITE_OPEN_CREATE, SQLITE_OPEN_READWRITE,
    SQLITE_OPEN_URI, SQLITE_ROW, sqlite3, sqlite3_close, sqlite3_column_count, sqlite3_errmsg,
    sqlite3_finalize, sqlite3_last_insert_rowid, sqlite3_open_v2, sqlite3_prepare_v2,
    sqlite3_step, sqlite3_total_changes64,
};
use std::{
    ffi::{CStr, CString, c_char},
    ptr,
    sync::Arc,
};
use tabula_core::{
    Context, Error, Executor, Query, Result, RowLabeled, RowNames, RowsAffected, truncate_long,
};
use tokio::task::spawn_blocking;

/// An open sqlite database, the executor behind an `Engine` for the `sqlite` dialect.
pub struct SqliteConnection {
    pub(crate) connection: CBox<*mut sqlite3>,
}

impl SqliteConnection {
    /// Open `sqlite://<path>[?<uri parameters>]`, for example
    /// `sqlite://../target/debug/tests.sqlite?mode=rwc`.
    ///
    /// Foreign key enforcement is turned on for the connection.
    pub async fn connect(url: impl AsRef<str>) -> Result<SqliteConnection> {
        let url = url.as_ref();
        let Some(path) = url.strip_prefix("sqlite://") else {
            let error = Error::msg(format!(
                "Expected sqlite connection url to start with `sqlite://`, found `{url}`"
            ));
            log::error!("{error:#}");
            return Err(error);
        };
        let context = || format!("Error while decoding connection URL: `{url}`");
        let uri = CString::new(format!("file:{path}")).with_context(context)?;
        let connection = spawn_blocking(move || unsafe {
            let mut connection = CBox::new(ptr::null_mut(), |p| {
                sqlite3_close(p);
            });
            let rc = sqlite3_open_v2(
                uri.as_ptr(),
                &mut *connection,
                SQLITE_OPEN_URI | SQLITE_OPEN_READWRITE | SQLITE_OPEN_CREATE,
                ptr::null(),
            );
            if rc != SQLITE_OK {
                let message = if connection.is_null() {
                    "Out of memory while opening the database".to_string()
                } else {
                    error_message_from_ptr(sqlite3_errmsg(*connection)).to_string()
                };
                return Err(Error::msg(message));
            }
            Ok(connection)
        })
        .await?
        .with_context(context)
        .inspect_err(|e| log::error!("{e:#}"))?;
        let mut result = Self { connection };
        result.execute("PRAGMA foreign_keys = ON;".into()).await?;
        Ok(result)
    }

    /// Run every statement of the query, parameters bind to the first one.
    async fn run(&mut self, query: Query, first_only: bool) -> Result<(Vec<RowLabeled>, RowsAffected)> {
        let connection = CBox::new(*self.connection, |_| {});
        spawn_blocking(move || unsafe { run_blocking(*connection, query, first_only) }).await?
    }
}

unsafe fn run_blocking(
    connection: *mut sqlite3,
    query: Query,
    first_only: bool,
) -> Result<(Vec<RowLabeled>, RowsAffected)> {
    let sql = CString::new(query.sql.as_bytes()).with_context(|| {
        format!(
            "Could not create a CString from the query:\n{}",
            truncate_long!(query.sql)
        )
    })?;
    let error = |connection: *mut sqlite3| unsafe {
        let error = Error::msg(error_message_from_ptr(sqlite3_errmsg(connection)).to_string())
            .context(format!(
                "While executing the query:\n{}",
                truncate_long!(query.sql)
            ));
        log::error!("{error:#}");
        error
    };
    let mut rows = Vec::new();
    let mut affected = RowsAffected::default();
    let mut tail: *const c_char = sql.as_ptr();
    let mut first = true;
    unsafe {
        while !CStr::from_ptr(tail)
            .to_bytes()
            .iter()
            .all(u8::is_ascii_whitespace)
        {
            let mut statement = CBox::new(ptr::null_mut(), |p| {
                sqlite3_finalize(p);
            });
            let mut next = ptr::null();
            if sqlite3_prepare_v2(connection, tail, -1, &mut *statement, &mut next) != SQLITE_OK {
                return Err(error(connection));
            }
            tail = next;
            if statement.is_null() {
                continue;
            }
            if first {
                bind_params(*statement, &query.params)?;
                first = false;
            }
            let count = sqlite3_column_count(*statement);
            let labels: RowNames = (0..count)
                .map(|i| extract_name(*statement, i))
                .collect::<Result<Arc<[_]>>>()?;
            let changes = sqlite3_total_changes64(connection);
            loop {
                match sqlite3_step(*statement) {
                    SQLITE_BUSY => continue,
                    SQLITE_DONE => break,
                    SQLITE_ROW => {
                        if first_only && !rows.is_empty() {
                            continue;
                        }
                        rows.push(RowLabeled::new(
                            labels.clone(),
                            (0..count)
                                .map(|i| extract_value(*statement, i))
                                .collect::<Result<_>>()?,
                        ));
                    }
                    _ => return Err(error(connection)),
                }
            }
            let changes = sqlite3_total_changes64(connection) - changes;
            if changes > 0 {
                affected.rows_affected += changes as u64;
                affected.last_affected_id = Some(sqlite3_last_insert_rowid(connection));
            }
        }
    }
    Ok((rows, affected))
}

impl Executor for SqliteConnection {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn execute(&mut self, sql: String) -> Result<RowsAffected> {
        self.run(sql.into(), false).await.map(|(_, v)| v)
    }

    async fn fetch_one(&mut self, query: Query) -> Result<Option<RowLabeled>> {
        self.run(query, true)
            .await
            .map(|(rows, _)| rows.into_iter().next())
    }

    async fn fetch_all(&mut self, query: Query) -> Result<Vec<RowLabeled>> {
        self.run(query, false).await.map(|(rows, _)| rows)
    }
}
