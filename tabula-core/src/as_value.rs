use crate::{Error, Result, Value, ZERO_TIMESTAMP, consume_while, truncate_long};
use anyhow::Context;
use atoi::{FromRadix10, FromRadix10Signed};
use fast_float::parse_partial;
use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use std::any;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time, format_description::parse_borrowed};
use uuid::Uuid;

/// Conversion between native field types and the dynamic [`Value`].
///
/// # Parsing contract
/// - `parse` delegates to `extract` then verifies the slice is exhausted.
/// - `extract` updates the input slice only on success.
///
/// Drivers are free to hand back textual data for typed columns, or even raw
/// byte sequences. `try_from_value` accepts both and parses them.
///
/// ```rust
/// use tabula_core::{AsValue, Value};
/// let v = 42i32.as_value();
/// assert!(matches!(v, Value::Int32(Some(42))));
/// let n: i32 = AsValue::try_from_value(v).unwrap();
/// assert_eq!(n, 42);
/// ```
pub trait AsValue {
    /// Typed `NULL` of this type, used as the type prototype.
    fn as_empty_value() -> Value;
    fn as_value(self) -> Value;
    fn try_from_value(value: Value) -> Result<Self>
    where
        Self: Sized;
    /// Parse the whole input, trailing characters are an error.
    fn parse(input: impl AsRef<str>) -> Result<Self>
    where
        Self: Sized,
    {
        let mut value = input.as_ref();
        let result = Self::extract(&mut value)?;
        if !value.is_empty() {
            return Err(Error::msg(format!(
                "Value `{}` parsed correctly as {} but it did not consume all the input (remaining: `{}`)",
                truncate_long!(input.as_ref()),
                any::type_name::<Self>(),
                truncate_long!(value),
            )));
        }
        Ok(result)
    }
    fn extract(value: &mut &str) -> Result<Self>
    where
        Self: Sized,
    {
        Err(Error::msg(format!(
            "Cannot parse '{value}' as {}",
            any::type_name::<Self>()
        )))
    }
}

/// The zero state of a field type, what a field holds right after
/// [`Entity::zeroed`](crate::Entity::zeroed).
pub trait ZeroValue {
    fn zero_value() -> Self;
}

impl<T: AsValue> From<T> for Value {
    fn from(value: T) -> Self {
        value.as_value()
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Varchar(Some(value.into()))
    }
}

/// Bytes returned where a textual or numeric value was expected.
fn parse_bytes<T: AsValue>(bytes: &[u8]) -> Result<T> {
    let text = std::str::from_utf8(bytes).with_context(|| {
        format!(
            "Cannot convert a byte sequence of length {} to {}",
            bytes.len(),
            any::type_name::<T>()
        )
    })?;
    T::parse(text.trim())
}

macro_rules! impl_as_value {
    ($source:ty, $destination:path $(, $pat_rest:pat => $expr_rest:expr)* $(,)?) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $destination(None)
            }
            fn as_value(self) -> Value {
                $destination(Some(self as _))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                match value {
                    $destination(Some(v)) => Ok(v as _),
                    $($pat_rest => $expr_rest,)*
                    #[allow(unreachable_patterns)]
                    Value::Int32(Some(v)) => {
                        if (v as i128).clamp(<$source>::MIN as _, <$source>::MAX as _) != v as i128 {
                            return Err(Error::msg(format!(
                                "Value {v}: i32 is out of range for {}",
                                any::type_name::<Self>(),
                            )));
                        }
                        Ok(v as $source)
                    }
                    #[allow(unreachable_patterns)]
                    Value::Int64(Some(v)) => {
                        if (v as i128).clamp(<$source>::MIN as _, <$source>::MAX as _) != v as i128 {
                            return Err(Error::msg(format!(
                                "Value {v}: i64 is out of range for {}",
                                any::type_name::<Self>(),
                            )));
                        }
                        Ok(v as $source)
                    }
                    #[allow(unreachable_patterns)]
                    Value::Decimal(Some(v)) => {
                        let error = Error::msg(format!(
                            "Value {v}: Decimal does not fit into {}",
                            any::type_name::<Self>()
                        ));
                        if !v.is_integer() {
                            return Err(error.context("The value is not a integer"));
                        }
                        v.to_i128()
                            .filter(|n| (*n).clamp(<$source>::MIN as _, <$source>::MAX as _) == *n)
                            .map(|n| n as $source)
                            .ok_or(error)
                    }
                    Value::Varchar(Some(ref v)) => Self::parse(v.trim()),
                    Value::Blob(Some(ref v)) => parse_bytes(v),
                    _ => Err(Error::msg(format!(
                        "Cannot convert {value:?} to {}",
                        any::type_name::<Self>(),
                    ))),
                }
            }
            fn extract(input: &mut &str) -> Result<Self> {
                let value = *input;
                #[allow(unused_comparisons)]
                let is_signed = <$source>::MIN < 0;
                let (num, len) = if is_signed {
                    i128::from_radix_10_signed(value.as_bytes())
                } else {
                    let (num, len) = u128::from_radix_10(value.as_bytes());
                    (num as i128, len)
                };
                if len == 0 || (len == 1 && value.starts_with(['-', '+'])) {
                    return Err(Error::msg(format!(
                        "Cannot extract {} from `{}`",
                        any::type_name::<Self>(),
                        truncate_long!(value),
                    )));
                }
                if num < <$source>::MIN as i128 || num > <$source>::MAX as i128 {
                    return Err(Error::msg(format!(
                        "Parsed integer {} is out of range for {}",
                        &value[..len],
                        any::type_name::<Self>(),
                    )));
                }
                *input = &value[len..];
                Ok(num as $source)
            }
        }
        impl ZeroValue for $source {
            fn zero_value() -> Self {
                0 as _
            }
        }
    };
}
impl_as_value!(
    i8,
    Value::Int8,
    Value::UInt8(Some(v)) => i8::try_from(v).map_err(|_| Error::msg(format!("Value {v}: u8 is out of range for i8"))),
    Value::Int16(Some(v)) => i8::try_from(v).map_err(|_| Error::msg(format!("Value {v}: i16 is out of range for i8"))),
);
impl_as_value!(
    i16,
    Value::Int16,
    Value::Int8(Some(v)) => Ok(v as _),
    Value::UInt16(Some(v)) => i16::try_from(v).map_err(|_| Error::msg(format!("Value {v}: u16 is out of range for i16"))),
    Value::UInt8(Some(v)) => Ok(v as _),
);
impl_as_value!(
    i32,
    Value::Int32,
    Value::Int16(Some(v)) => Ok(v as _),
    Value::Int8(Some(v)) => Ok(v as _),
    Value::UInt32(Some(v)) => i32::try_from(v).map_err(|_| Error::msg(format!("Value {v}: u32 is out of range for i32"))),
    Value::UInt16(Some(v)) => Ok(v as _),
    Value::UInt8(Some(v)) => Ok(v as _),
);
impl_as_value!(
    i64,
    Value::Int64,
    Value::Int32(Some(v)) => Ok(v as _),
    Value::Int16(Some(v)) => Ok(v as _),
    Value::Int8(Some(v)) => Ok(v as _),
    Value::UInt64(Some(v)) => i64::try_from(v).map_err(|_| Error::msg(format!("Value {v}: u64 is out of range for i64"))),
    Value::UInt32(Some(v)) => Ok(v as _),
    Value::UInt16(Some(v)) => Ok(v as _),
    Value::UInt8(Some(v)) => Ok(v as _),
);
impl_as_value!(
    u8,
    Value::UInt8,
    Value::Int8(Some(v)) => u8::try_from(v).map_err(|_| Error::msg(format!("Value {v}: i8 is out of range for u8"))),
    Value::Int16(Some(v)) => u8::try_from(v).map_err(|_| Error::msg(format!("Value {v}: i16 is out of range for u8"))),
);
impl_as_value!(
    u16,
    Value::UInt16,
    Value::UInt8(Some(v)) => Ok(v as _),
    Value::Int16(Some(v)) => u16::try_from(v).map_err(|_| Error::msg(format!("Value {v}: i16 is out of range for u16"))),
);
impl_as_value!(
    u32,
    Value::UInt32,
    Value::UInt16(Some(v)) => Ok(v as _),
    Value::UInt8(Some(v)) => Ok(v as _),
);
impl_as_value!(
    u64,
    Value::UInt64,
    Value::UInt32(Some(v)) => Ok(v as _),
    Value::UInt16(Some(v)) => Ok(v as _),
    Value::UInt8(Some(v)) => Ok(v as _),
);

macro_rules! impl_as_value {
    ($source:ty, $destination:path, $zero:expr, $extract:expr $(, $pat_rest:pat $(if $guard:expr)? => $expr_rest:expr)* $(,)?) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $destination(None)
            }
            fn as_value(self) -> Value {
                $destination(Some(self.into()))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                match value {
                    $destination(Some(v)) => Ok(v.into()),
                    $($pat_rest $(if $guard)? => $expr_rest,)*
                    #[allow(unreachable_patterns)]
                    Value::Varchar(Some(ref v)) => <Self as AsValue>::parse(v),
                    #[allow(unreachable_patterns)]
                    Value::Blob(Some(ref v)) => parse_bytes(v),
                    _ => Err(Error::msg(format!(
                        "Cannot convert {value:?} to {}",
                        any::type_name::<Self>(),
                    ))),
                }
            }
            fn extract(value: &mut &str) -> Result<Self> {
                $extract(value)
            }
        }
        impl ZeroValue for $source {
            fn zero_value() -> Self {
                $zero
            }
        }
    };
}
impl_as_value!(
    bool,
    Value::Boolean,
    false,
    |input: &mut &str| {
        let mut value = *input;
        let result = consume_while(&mut value, |v| v.is_alphanumeric() || *v == '_');
        let result = match result {
            x if x.eq_ignore_ascii_case("true") || x.eq_ignore_ascii_case("t") || x.eq("1") => Ok(true),
            x if x.eq_ignore_ascii_case("false") || x.eq_ignore_ascii_case("f") || x.eq("0") => Ok(false),
            _ => return Err(Error::msg(format!("Cannot parse boolean from '{input}'"))),
        };
        *input = value;
        result
    },
    Value::Int8(Some(v)) => Ok(v != 0),
    Value::Int16(Some(v)) => Ok(v != 0),
    Value::Int32(Some(v)) => Ok(v != 0),
    Value::Int64(Some(v)) => Ok(v != 0),
    Value::UInt8(Some(v)) => Ok(v != 0),
    Value::UInt16(Some(v)) => Ok(v != 0),
    Value::UInt32(Some(v)) => Ok(v != 0),
    Value::UInt64(Some(v)) => Ok(v != 0),
);

macro_rules! extract_float {
    ($input:expr) => {{
        let mut value = *$input;
        let context = || {
            format!(
                "Cannot extract a floating point value from `{}`",
                truncate_long!($input)
            )
        };
        let (num, tail) = parse_partial(value).with_context(context)?;
        value = &value[tail..];
        *$input = value;
        Ok(num)
    }};
}
impl_as_value!(
    f32,
    Value::Float32,
    0.0,
    |input: &mut &str| extract_float!(input),
    Value::Float64(Some(v)) => Ok(v as _),
    Value::Int64(Some(v)) => Ok(v as _),
    Value::Int32(Some(v)) => Ok(v as _),
    Value::Decimal(Some(v)) => v
        .to_f32()
        .ok_or_else(|| Error::msg(format!("Value {v}: Decimal does not fit into f32"))),
);
impl_as_value!(
    f64,
    Value::Float64,
    0.0,
    |input: &mut &str| extract_float!(input),
    Value::Float32(Some(v)) => Ok(v as _),
    Value::Int64(Some(v)) => Ok(v as _),
    Value::Int32(Some(v)) => Ok(v as _),
    Value::Decimal(Some(v)) => v
        .to_f64()
        .ok_or_else(|| Error::msg(format!("Value {v}: Decimal does not fit into f64"))),
);
impl_as_value!(
    String,
    Value::Varchar,
    String::new(),
    |input: &mut &str| {
        let result = input.to_string();
        *input = "";
        Ok(result)
    },
    Value::Blob(Some(v)) => String::from_utf8(v.into_vec())
        .map_err(|e| Error::new(e).context("Cannot convert a byte sequence to String")),
    Value::Uuid(Some(v)) => Ok(v.to_string()),
);
impl_as_value!(
    Uuid,
    Value::Uuid,
    Uuid::nil(),
    |input: &mut &str| {
        let value = *input;
        let context = || {
            format!(
                "Cannot extract a uuid value from `{}`",
                truncate_long!(input)
            )
        };
        let len = value.len().min(36);
        let head = value.get(..len).with_context(context)?;
        let uuid = Uuid::parse_str(head).with_context(context)?;
        *input = &value[len..];
        Ok(uuid)
    },
    Value::Blob(Some(v)) if v.len() == 16 => Uuid::from_slice(&v).map_err(Error::new),
);

macro_rules! parse_time {
    ($value: ident, $($formats:literal),+ $(,)?) => {
        'value: {
            for format in [$($formats,)+] {
                let format = parse_borrowed::<2>(format)?;
                let mut parsed = time::parsing::Parsed::new();
                let remaining = parsed.parse_items($value.as_bytes(), &format);
                if let Ok(remaining) = remaining {
                    let result = parsed.try_into()?;
                    *$value = &$value[($value.len() - remaining.len())..];
                    break 'value Ok(result);
                }
            }
            Err(Error::msg(format!(
                "Cannot extract from `{}` as {}",
                $value,
                any::type_name::<Self>()
            )))
        }
    }
}

impl_as_value!(
    Date,
    Value::Date,
    ZERO_TIMESTAMP.date(),
    |v: &mut &str| {
        let result: Date = parse_time!(v, "[year]-[month]-[day]")?;
        Ok(result)
    },
    Value::Timestamp(Some(v)) => Ok(v.date()),
);
impl_as_value!(
    Time,
    Value::Time,
    Time::MIDNIGHT,
    |v: &mut &str| {
        let result: Time = parse_time!(
            v,
            "[hour]:[minute]:[second].[subsecond]",
            "[hour]:[minute]:[second]",
            "[hour]:[minute]",
        )?;
        Ok(result)
    },
);
impl_as_value!(
    PrimitiveDateTime,
    Value::Timestamp,
    ZERO_TIMESTAMP,
    |v: &mut &str| {
        let result: PrimitiveDateTime = parse_time!(
            v,
            "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]",
            "[year]-[month]-[day]T[hour]:[minute]:[second]",
            "[year]-[month]-[day]T[hour]:[minute]",
            "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]",
            "[year]-[month]-[day] [hour]:[minute]:[second]",
            "[year]-[month]-[day] [hour]:[minute]",
        )?;
        Ok(result)
    },
    Value::TimestampWithTimezone(Some(v)) => {
        let v = v.to_utc();
        Ok(PrimitiveDateTime::new(v.date(), v.time()))
    },
    Value::Date(Some(v)) => Ok(v.midnight()),
);
impl_as_value!(
    OffsetDateTime,
    Value::TimestampWithTimezone,
    ZERO_TIMESTAMP.assume_utc(),
    |v: &mut &str| {
        let result: OffsetDateTime = parse_time!(
            v,
            "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond][offset_hour sign:mandatory]:[offset_minute]",
            "[year]-[month]-[day]T[hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]",
            "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond][offset_hour sign:mandatory]:[offset_minute]",
            "[year]-[month]-[day] [hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]",
            "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond][offset_hour sign:mandatory]",
            "[year]-[month]-[day] [hour]:[minute]:[second][offset_hour sign:mandatory]",
        )
        .or_else(|_: Error| <PrimitiveDateTime as AsValue>::extract(v).map(|v| v.assume_utc()))?;
        Ok(result)
    },
    Value::Timestamp(Some(v)) => Ok(v.assume_utc()),
);

impl AsValue for Decimal {
    fn as_empty_value() -> Value {
        Value::Decimal(None)
    }
    fn as_value(self) -> Value {
        Value::Decimal(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Decimal(Some(v)) => Ok(v),
            Value::Int8(Some(v)) => Ok(Decimal::new(v as i64, 0)),
            Value::Int16(Some(v)) => Ok(Decimal::new(v as i64, 0)),
            Value::Int32(Some(v)) => Ok(Decimal::new(v as i64, 0)),
            Value::Int64(Some(v)) => Ok(Decimal::new(v, 0)),
            Value::UInt8(Some(v)) => Ok(Decimal::new(v as i64, 0)),
            Value::UInt16(Some(v)) => Ok(Decimal::new(v as i64, 0)),
            Value::UInt32(Some(v)) => Ok(Decimal::new(v as i64, 0)),
            Value::UInt64(Some(v)) => Ok(Decimal::from(v)),
            Value::Float32(Some(v)) => Decimal::from_f32(v)
                .ok_or_else(|| Error::msg(format!("Cannot convert {v} to Decimal"))),
            Value::Float64(Some(v)) => Decimal::from_f64(v)
                .ok_or_else(|| Error::msg(format!("Cannot convert {v} to Decimal"))),
            Value::Varchar(Some(ref v)) => Self::parse(v.trim()),
            Value::Blob(Some(ref v)) => parse_bytes(v),
            _ => Err(Error::msg(format!("Cannot convert {value:?} to Decimal"))),
        }
    }
    fn extract(input: &mut &str) -> Result<Self> {
        let mut value = *input;
        let (mut n, len) = i128::from_radix_10_signed(value.as_bytes());
        if len == 0 {
            return Err(Error::msg(format!(
                "Cannot extract a Decimal from `{}`",
                truncate_long!(input)
            )));
        }
        let negative = value.starts_with('-');
        value = &value[len..];
        let n = if value.starts_with('.') {
            value = &value[1..];
            let (dec, len) = i128::from_radix_10(value.as_bytes());
            let scaled = n * 10i128.pow(len as _);
            n = if negative { scaled - dec } else { scaled + dec };
            value = &value[len..];
            Decimal::try_from_i128_with_scale(n, len as _)
                .map_err(|_| Error::msg(format!("Could not create a Decimal from {n}")))
        } else {
            Decimal::from_i128(n)
                .ok_or_else(|| Error::msg(format!("Could not create a Decimal from {n}")))
        }?;
        *input = value;
        Ok(n)
    }
}

impl ZeroValue for Decimal {
    fn zero_value() -> Self {
        Decimal::ZERO
    }
}

impl AsValue for Vec<u8> {
    fn as_empty_value() -> Value {
        Value::Blob(None)
    }
    fn as_value(self) -> Value {
        Value::Blob(Some(self.into_boxed_slice()))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Blob(Some(v)) => Ok(v.into_vec()),
            Value::Varchar(Some(v)) => Self::parse(&v),
            _ => Err(Error::msg(format!("Cannot convert {value:?} to Vec<u8>"))),
        }
    }
    fn extract(input: &mut &str) -> Result<Self> {
        let mut value = *input;
        if value.len() >= 2 && value[0..2].eq_ignore_ascii_case("\\x") {
            value = &value[2..];
        }
        let hex = consume_while(&mut value, char::is_ascii_hexdigit);
        let result = hex::decode(hex).with_context(|| {
            format!(
                "While decoding `{}` as {}",
                truncate_long!(input),
                any::type_name::<Self>()
            )
        })?;
        *input = value;
        Ok(result)
    }
}

impl ZeroValue for Vec<u8> {
    fn zero_value() -> Self {
        Vec::new()
    }
}

impl<T: AsValue> AsValue for Option<T> {
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => T::as_empty_value(),
        }
    }
    fn try_from_value(value: Value) -> Result<Self> {
        Ok(if value.is_null() {
            None
        } else {
            Some(<T as AsValue>::try_from_value(value)?)
        })
    }
    fn extract(input: &mut &str) -> Result<Self>
    where
        Self: Sized,
    {
        let mut value = *input;
        let result = consume_while(&mut value, |v| v.is_alphanumeric() || *v == '_');
        if result.eq_ignore_ascii_case("null") {
            *input = value;
            return Ok(None);
        };
        T::extract(input).map(Some)
    }
}

impl<T> ZeroValue for Option<T> {
    fn zero_value() -> Self {
        None
    }
}

/// Decode one column of a row into a field, `NULL` becomes the zero state.
pub fn decode_field<T: AsValue + ZeroValue>(value: &Value, field: &str) -> Result<T> {
    if value.is_null() {
        return Ok(T::zero_value());
    }
    T::try_from_value(value.clone()).with_context(|| format!("While decoding field `{field}`"))
}
