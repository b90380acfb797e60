mod annotation;
mod as_value;
mod config;
mod decode_type;
mod dialect;
mod engine;
mod entity;
mod executor;
mod field;
mod query;
mod select;
mod util;
mod value;
pub mod writer;

pub use ::anyhow::Context;
pub use annotation::*;
pub use as_value::*;
pub use config::*;
pub use decode_type::*;
pub use dialect::*;
pub use engine::*;
pub use entity::*;
pub use executor::*;
pub use field::*;
pub use query::*;
pub use select::*;
pub use util::*;
pub use value::*;
pub use writer::{
    ColumnValue, ForeignKeySpec, GeneratedKey, IncrementStrategy, IndexSpec, SchemaBuild,
    SchemaField, SequenceSpec, SqlWriter, foreign_key_name,
};

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
