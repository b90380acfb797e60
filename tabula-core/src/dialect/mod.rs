mod hana;
mod mssql;
mod mysql;
mod postgres;
mod sqlite;

pub use hana::*;
pub use mssql::*;
pub use mysql::*;
pub use postgres::*;
pub use sqlite::*;

use crate::{EngineConfig, Error, Result, SqlWriter};

/// Names accepted by [`writer_for`].
pub const BACKENDS: &[&str] = &["postgres", "mysql", "sqlite", "mssql", "hana"];

/// The SQL writer of a backend, selected by name.
pub fn writer_for(name: &str, config: &EngineConfig) -> Result<Box<dyn SqlWriter>> {
    let string_length = config.string_length;
    Ok(match name.to_ascii_lowercase().as_str() {
        "postgres" | "postgresql" => Box::new(PostgresSqlWriter { string_length }),
        "mysql" => Box::new(MySqlSqlWriter { string_length }),
        "sqlite" | "sqlite3" => Box::new(SqliteSqlWriter { string_length }),
        "mssql" | "sqlserver" => Box::new(MssqlSqlWriter { string_length }),
        "hana" => Box::new(HanaSqlWriter { string_length }),
        _ => {
            return Err(Error::msg(format!(
                "Unknown backend `{name}`, expected one of: {}",
                BACKENDS.join(", ")
            )));
        }
    })
}
