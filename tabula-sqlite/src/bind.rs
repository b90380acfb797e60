use crate::error_message_from_ptr;
use libsqlite3_sys::*;
use rust_decimal::prelude::ToPrimitive;
use std::{
    ffi::{CStr, c_int},
    os::raw::{c_char, c_void},
};
use tabula_core::{
    Error, Result, Value, truncate_long,
    writer::{write_date, write_time},
};
use time::PrimitiveDateTime;

unsafe fn bind_text(statement: *mut sqlite3_stmt, index: c_int, value: &str) -> c_int {
    unsafe {
        sqlite3_bind_text(
            statement,
            index,
            value.as_ptr() as *const c_char,
            value.len() as c_int,
            SQLITE_TRANSIENT(),
        )
    }
}

/// Same text the SQL writer produces for temporal literals.
fn timestamp_text(value: &PrimitiveDateTime) -> String {
    let mut out = String::with_capacity(32);
    write_date(&mut out, &value.date());
    out.push(' ');
    write_time(&mut out, &value.time());
    out
}

/// Bind the parameters in order to the placeholders of the statement.
pub(crate) fn bind_params(statement: *mut sqlite3_stmt, params: &[Value]) -> Result<()> {
    for (i, value) in params.iter().enumerate() {
        let index = (i + 1) as c_int;
        unsafe {
            let rc = match value {
                v if v.is_null() => sqlite3_bind_null(statement, index),
                Value::Boolean(Some(v)) => sqlite3_bind_int(statement, index, *v as c_int),
                Value::Int8(Some(v)) => sqlite3_bind_int(statement, index, *v as c_int),
                Value::Int16(Some(v)) => sqlite3_bind_int(statement, index, *v as c_int),
                Value::Int32(Some(v)) => sqlite3_bind_int(statement, index, *v as c_int),
                Value::Int64(Some(v)) => sqlite3_bind_int64(statement, index, *v),
                Value::UInt8(Some(v)) => sqlite3_bind_int(statement, index, *v as c_int),
                Value::UInt16(Some(v)) => sqlite3_bind_int(statement, index, *v as c_int),
                Value::UInt32(Some(v)) => sqlite3_bind_int64(statement, index, *v as i64),
                Value::UInt64(Some(v)) => {
                    let v = i64::try_from(*v).map_err(|_| {
                        Error::msg(format!(
                            "Cannot bind u64 value `{v}` into sqlite integer because it's out of bounds"
                        ))
                    })?;
                    sqlite3_bind_int64(statement, index, v)
                }
                Value::Float32(Some(v)) => sqlite3_bind_double(statement, index, *v as f64),
                Value::Float64(Some(v)) => sqlite3_bind_double(statement, index, *v),
                Value::Decimal(Some(v)) => sqlite3_bind_double(
                    statement,
                    index,
                    v.to_f64().ok_or_else(|| {
                        Error::msg(format!("Cannot convert the Decimal value `{v}` to f64"))
                    })?,
                ),
                Value::Varchar(Some(v)) => bind_text(statement, index, v),
                Value::Blob(Some(v)) => sqlite3_bind_blob(
                    statement,
                    index,
                    v.as_ptr() as *const c_void,
                    v.len() as c_int,
                    SQLITE_TRANSIENT(),
                ),
                Value::Date(Some(v)) => {
                    let mut out = String::with_capacity(10);
                    write_date(&mut out, v);
                    bind_text(statement, index, &out)
                }
                Value::Time(Some(v)) => {
                    let mut out = String::with_capacity(18);
                    write_time(&mut out, v);
                    bind_text(statement, index, &out)
                }
                Value::Timestamp(Some(v)) => bind_text(statement, index, &timestamp_text(v)),
                Value::TimestampWithTimezone(Some(v)) => {
                    let v = v.to_utc();
                    let v = PrimitiveDateTime::new(v.date(), v.time());
                    bind_text(statement, index, &timestamp_text(&v))
                }
                Value::Uuid(Some(v)) => bind_text(statement, index, &v.to_string()),
                _ => sqlite3_bind_null(statement, index),
            };
            if rc != SQLITE_OK {
                let db = sqlite3_db_handle(statement);
                let query = sqlite3_sql(statement);
                let query = if query.is_null() {
                    Default::default()
                } else {
                    CStr::from_ptr(query).to_string_lossy()
                };
                let error = Error::msg(error_message_from_ptr(sqlite3_errmsg(db)).to_string())
                    .context(format!(
                        "Cannot bind parameter {index} to query:\n{}",
                        truncate_long!(query)
                    ));
                log::error!("{error:#}");
                return Err(error);
            }
        }
    }
    Ok(())
}
