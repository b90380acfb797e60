use crate::{FieldDef, Result, RowLabeled, TableRef, Value};

/// A record type mapped to one table.
///
/// Implemented by `#[derive(Entity)]`, the derive generates the field metadata
/// at compile time, embedded entities are flattened into the parent in
/// declaration order.
pub trait Entity: Sized {
    fn table_name() -> &'static str;

    /// Every field, not persisted ones included.
    fn fields() -> &'static [FieldDef];

    /// Current values aligned with [`Entity::fields`], `NULL` for not persisted fields.
    fn values(&self) -> Vec<Value>;

    /// Assign every persisted field found in the row, by storage name.
    fn load(&mut self, row: &RowLabeled) -> Result<()>;

    /// The zero state: numbers `0`, strings empty, options `None`, temporal
    /// values `0001-01-01 00:00:00`, not persisted fields `Default`.
    fn zeroed() -> Self;

    fn table_ref() -> TableRef {
        TableRef {
            name: Self::table_name(),
            fields: Self::fields(),
        }
    }

    fn primary_key_fields() -> impl Iterator<Item = &'static FieldDef> {
        Self::fields().iter().filter(|f| f.is_primary_key())
    }
}
