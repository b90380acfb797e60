mod context;
mod schema;
mod sql_writer;

pub use context::*;
pub use schema::*;
pub use sql_writer::*;
