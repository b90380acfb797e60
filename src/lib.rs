//! Declarative schema migration and CRUD over entity metadata.
//!
//! Entities derive [`Entity`], an [`Engine`] wraps an [`Executor`] and picks
//! the SQL dialect from the executor name.
pub use tabula_core::*;
pub use tabula_macros::Entity;
