use libsqlite3_sys::*;
use std::{
    ffi::{CStr, c_int},
    slice,
};
use tabula_core::{AsValue, Error, Result, Value};

unsafe fn column_bytes<'a>(ptr: *const u8, len: c_int) -> &'a [u8] {
    if ptr.is_null() || len <= 0 {
        &[]
    } else {
        unsafe { slice::from_raw_parts(ptr, len as usize) }
    }
}

pub(crate) fn extract_value(statement: *mut sqlite3_stmt, index: c_int) -> Result<Value> {
    unsafe {
        let column_type = sqlite3_column_type(statement, index);
        Ok(match column_type {
            SQLITE_NULL => Value::Null,
            SQLITE_INTEGER => sqlite3_column_int64(statement, index).as_value(),
            SQLITE_FLOAT => sqlite3_column_double(statement, index).as_value(),
            SQLITE_BLOB => {
                let ptr = sqlite3_column_blob(statement, index) as *const u8;
                let len = sqlite3_column_bytes(statement, index);
                Value::Blob(Some(column_bytes(ptr, len).into()))
            }
            SQLITE_TEXT => {
                let ptr = sqlite3_column_text(statement, index);
                let len = sqlite3_column_bytes(statement, index);
                std::str::from_utf8(column_bytes(ptr, len))?
                    .to_string()
                    .as_value()
            }
            _ => {
                return Err(Error::msg(format!(
                    "Unexpected column type {column_type}"
                )));
            }
        })
    }
}

pub(crate) fn extract_name(statement: *mut sqlite3_stmt, index: c_int) -> Result<String> {
    unsafe {
        let name = sqlite3_column_name(statement, index);
        if name.is_null() {
            return Err(Error::msg(format!("Column {index} has no name")));
        }
        Ok(CStr::from_ptr(name).to_str()?.into())
    }
}
