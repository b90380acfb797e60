use crate::{Value, matches_path};
use syn::{GenericArgument, PathArguments, Type, TypePath};

/// Compile time view of a field type.
#[derive(Clone)]
pub struct TypeDecoded {
    /// Prototype of the mapped type.
    pub value: Value,
    /// Declared as `Option<T>`.
    pub nullable: bool,
    /// The type with the `Option` wrapper removed.
    pub inner: Type,
}

fn first_generic(path: &syn::Path) -> Option<&Type> {
    let PathArguments::AngleBracketed(arguments) = &path.segments.last()?.arguments else {
        return None;
    };
    arguments.args.iter().find_map(|v| match v {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    })
}

fn decode_scalar(ty: &Type) -> Option<Value> {
    let Type::Path(TypePath { path, qself: None }) = ty else {
        return None;
    };
    if let Some(ident) = path.get_ident() {
        let value = match ident.to_string().as_str() {
            "bool" => Value::Boolean(None),
            "i8" => Value::Int8(None),
            "i16" => Value::Int16(None),
            "i32" => Value::Int32(None),
            "i64" => Value::Int64(None),
            "u8" => Value::UInt8(None),
            "u16" => Value::UInt16(None),
            "u32" => Value::UInt32(None),
            "u64" => Value::UInt64(None),
            "f32" => Value::Float32(None),
            "f64" => Value::Float64(None),
            _ => Value::Null,
        };
        if !matches!(value, Value::Null) {
            return Some(value);
        }
    }
    Some(if matches_path(path, &["std", "string", "String"]) {
        Value::Varchar(None)
    } else if matches_path(path, &["rust_decimal", "Decimal"]) {
        Value::Decimal(None)
    } else if matches_path(path, &["time", "Date"]) {
        Value::Date(None)
    } else if matches_path(path, &["time", "Time"]) {
        Value::Time(None)
    } else if matches_path(path, &["time", "PrimitiveDateTime"]) {
        Value::Timestamp(None)
    } else if matches_path(path, &["time", "OffsetDateTime"]) {
        Value::TimestampWithTimezone(None)
    } else if matches_path(path, &["uuid", "Uuid"]) {
        Value::Uuid(None)
    } else if matches_path(path, &["std", "vec", "Vec"])
        && first_generic(path).is_some_and(|v| matches!(decode_scalar(v), Some(Value::UInt8(..))))
    {
        Value::Blob(None)
    } else {
        return None;
    })
}

/// Map a field type to its value prototype.
///
/// Returns `None` for types outside the mapped set, the derive treats those
/// as embedded entities.
pub fn decode_type(ty: &Type) -> Option<TypeDecoded> {
    if let Type::Path(TypePath { path, qself: None }) = ty
        && matches_path(path, &["std", "option", "Option"])
    {
        let inner = first_generic(path)?;
        return decode_scalar(inner).map(|value| TypeDecoded {
            value,
            nullable: true,
            inner: inner.clone(),
        });
    }
    decode_scalar(ty).map(|value| TypeDecoded {
        value,
        nullable: false,
        inner: ty.clone(),
    })
}
