use crate::decode_field::{FieldMetadata, decode_field};
use syn::{Data, DeriveInput, Error, Fields, Ident, LitStr, Result, spanned::Spanned};
use tabula_core::storage_name;

pub(crate) struct EntityMetadata {
    pub(crate) ident: Ident,
    pub(crate) table: String,
    pub(crate) fields: Vec<FieldMetadata>,
}

pub(crate) fn decode_entity(input: &DeriveInput) -> Result<EntityMetadata> {
    let Data::Struct(data) = &input.data else {
        return Err(Error::new(input.span(), "not a record type"));
    };
    let Fields::Named(named) = &data.fields else {
        return Err(Error::new(data.fields.span(), "not a record type"));
    };
    if !input.generics.params.is_empty() {
        return Err(Error::new(
            input.generics.span(),
            "Generic entities are not supported",
        ));
    }
    let mut table = None;
    for attr in input.attrs.iter().filter(|v| v.path().is_ident("tabula")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("table") {
                let value: LitStr = meta.value()?.parse()?;
                if value.value().is_empty() {
                    return Err(meta.error("The table name cannot be empty"));
                }
                table = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("Unknown entity attribute, expected `table = \"..\"`"))
            }
        })?;
    }
    let ident = input.ident.clone();
    let table = table.unwrap_or_else(|| storage_name(&ident.to_string()));
    let fields = named
        .named
        .iter()
        .map(decode_field)
        .collect::<Result<Vec<_>>>()?;
    Ok(EntityMetadata {
        ident,
        table,
        fields,
    })
}
