use proc_macro2::Span;
use quote::ToTokens;
use syn::{Error, Field, Ident, LitStr, Result, Type, spanned::Spanned};
use tabula_core::{
    Annotation, TypeDecoded, Value, decode_type, parse_annotation, storage_name,
    validate_attributes,
};

pub(crate) enum FieldKind {
    /// Maps to one column.
    Column(TypeDecoded),
    /// Another entity whose fields are flattened into this one.
    Embedded,
    NotPersisted,
}

pub(crate) struct FieldMetadata {
    pub(crate) ident: Ident,
    pub(crate) ty: Type,
    pub(crate) name: String,
    pub(crate) storage_name: String,
    pub(crate) declared_type: String,
    pub(crate) kind: FieldKind,
    pub(crate) annotation: Annotation,
}

fn decode_annotation(field: &Field) -> Result<Option<(Annotation, Span)>> {
    let mut result = None;
    for attr in field.attrs.iter().filter(|v| v.path().is_ident("tabula")) {
        if result.is_some() {
            return Err(Error::new(
                attr.span(),
                "Field declares more than one #[tabula(..)] annotation",
            ));
        }
        let value: LitStr = attr.parse_args()?;
        result = Some((parse_annotation(&value.value()), value.span()));
    }
    Ok(result)
}

pub(crate) fn decode_field(field: &Field) -> Result<FieldMetadata> {
    let ident = field
        .ident
        .clone()
        .ok_or_else(|| Error::new(field.span(), "not a record type"))?;
    let name = ident.to_string().trim_start_matches("r#").to_string();
    let declared_type = field.ty.to_token_stream().to_string().replace(' ', "");
    let (annotation, span) = decode_annotation(field)?.unwrap_or_else(|| {
        (
            Annotation {
                persisted: true,
                attributes: Vec::new(),
            },
            field.span(),
        )
    });
    validate_attributes(
        annotation
            .attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str())),
    )
    .map_err(|e| Error::new(span, format!("Field `{name}`: {e}")))?;
    let kind = if !annotation.persisted {
        FieldKind::NotPersisted
    } else if let Some(decoded) = decode_type(&field.ty) {
        let increment = annotation
            .attributes
            .iter()
            .any(|(k, v)| k == "primary_key" && v == "inc");
        if increment
            && (decoded.nullable
                || !matches!(
                    decoded.value,
                    Value::Int8(..)
                        | Value::Int16(..)
                        | Value::Int32(..)
                        | Value::Int64(..)
                        | Value::UInt8(..)
                        | Value::UInt16(..)
                        | Value::UInt32(..)
                        | Value::UInt64(..)
                ))
        {
            return Err(Error::new(
                span,
                format!("Field `{name}` is an incrementing key, it must have an integer type"),
            ));
        }
        FieldKind::Column(decoded)
    } else {
        if let Type::Path(path) = &field.ty
            && path
                .path
                .segments
                .last()
                .is_some_and(|v| v.ident == "Option")
        {
            return Err(Error::new(
                field.ty.span(),
                format!("Field `{name}` has unmapped type `{declared_type}`"),
            ));
        }
        if !annotation.attributes.is_empty() {
            return Err(Error::new(
                span,
                format!(
                    "Field `{name}` is an embedded entity, it can only be annotated with `-`"
                ),
            ));
        }
        FieldKind::Embedded
    };
    Ok(FieldMetadata {
        ident,
        ty: field.ty.clone(),
        storage_name: storage_name(&name),
        name,
        declared_type,
        kind,
        annotation,
    })
}
