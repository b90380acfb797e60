#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use tabula_core::{AsValue, Value, ZERO_TIMESTAMP, ZeroValue, decode_field};
    use time::{Date, Month, PrimitiveDateTime, Time};
    use uuid::Uuid;

    #[test]
    fn value_null() {
        assert_eq!(Value::Null, Value::Null);
        assert_ne!(Value::Float32(Some(1.0)), Value::Null);
        assert!(Value::Int32(None).is_null());
        assert!(Value::Int32(None).is_zero());
        assert!(!Value::Int32(Some(1)).is_zero());
        assert_eq!(Value::Varchar(None).zero(), Value::Varchar(Some(String::new())));
    }

    #[test]
    fn value_bool() {
        let val: Value = true.into();
        assert_eq!(val, Value::Boolean(Some(true)));
        assert_ne!(val, Value::Varchar(Some("true".into())));
        assert!(bool::try_from_value(val).unwrap());
        assert!(bool::try_from_value(1i8.into()).unwrap());
        assert!(!bool::try_from_value(0i64.into()).unwrap());
        assert!(bool::try_from_value(Value::Varchar(Some("T".into()))).unwrap());
        assert!(!bool::parse("false").unwrap());
        assert!(bool::try_from_value(0.5f32.into()).is_err());
    }

    #[test]
    fn value_integers() {
        assert_eq!(i8::try_from_value(99u8.into()).unwrap(), 99);
        assert!(i8::try_from_value(200u8.into()).is_err());
        assert_eq!(i32::try_from_value(Value::Int64(Some(-7))).unwrap(), -7);
        assert!(i32::try_from_value(Value::Int64(Some(i64::MAX))).is_err());
        assert_eq!(u64::try_from_value(Value::Int64(Some(12))).unwrap(), 12);
        assert!(u16::try_from_value(Value::Int64(Some(-1))).is_err());
        assert_eq!(
            i64::try_from_value(Value::Decimal(Some(Decimal::new(4200, 2)))).unwrap(),
            42
        );
        assert!(i64::try_from_value(Value::Decimal(Some(Decimal::new(4201, 2)))).is_err());
        assert_eq!(i16::try_from_value(Value::Varchar(Some(" 31 ".into()))).unwrap(), 31);
        assert!(i32::try_from_value(Value::Float64(Some(0.1))).is_err());
        assert!(i32::parse("12abc").is_err());
    }

    #[test]
    fn value_bytes() {
        // Drivers returning untyped data hand back raw bytes
        assert_eq!(
            i64::try_from_value(Value::Blob(Some(b"90000000".to_vec().into()))).unwrap(),
            90000000
        );
        assert_eq!(
            Vec::<u8>::try_from_value(Value::Varchar(Some("\\xCAFE".into()))).unwrap(),
            [0xCA, 0xFE]
        );
        assert_eq!(
            Vec::<u8>::try_from_value(Value::Blob(Some([1u8, 2, 3].into()))).unwrap(),
            [1, 2, 3]
        );
        assert!(f64::try_from_value(Value::Blob(Some([0xFFu8, 0xFE].into()))).is_err());
    }

    #[test]
    fn value_decimal() {
        let value = Decimal::new(-1250, 3);
        assert_eq!(Value::from(value), Value::Decimal(Some(value)));
        assert_eq!(Decimal::parse("-1.250").unwrap(), value);
        assert_eq!(
            Decimal::try_from_value(Value::Float64(Some(12.5))).unwrap(),
            Decimal::new(125, 1)
        );
        assert_eq!(Decimal::zero_value(), Decimal::ZERO);
    }

    #[test]
    fn value_temporal() {
        let date = Date::from_calendar_date(2025, Month::July, 14).unwrap();
        assert_eq!(<Date as AsValue>::parse("2025-07-14").unwrap(), date);
        assert_eq!(
            <PrimitiveDateTime as AsValue>::parse("2025-07-14T10:20:30.5").unwrap(),
            PrimitiveDateTime::new(date, Time::from_hms_milli(10, 20, 30, 500).unwrap())
        );
        assert_eq!(
            PrimitiveDateTime::try_from_value(Value::Varchar(Some("2025-07-14 10:20".into())))
                .unwrap(),
            PrimitiveDateTime::new(date, Time::from_hms(10, 20, 0).unwrap())
        );
        assert_eq!(
            PrimitiveDateTime::try_from_value(Value::Date(Some(date))).unwrap(),
            date.midnight()
        );
        assert_eq!(PrimitiveDateTime::zero_value(), ZERO_TIMESTAMP);
        assert_eq!(
            <Time as AsValue>::parse("08:15").unwrap(),
            Time::from_hms(8, 15, 0).unwrap()
        );
        assert!(<Date as AsValue>::parse("14/07/2025").is_err());
    }

    #[test]
    fn value_uuid() {
        let uuid = Uuid::from_u128(0x1234);
        assert_eq!(
            Uuid::try_from_value(Value::Varchar(Some(uuid.to_string()))).unwrap(),
            uuid
        );
        assert_eq!(
            Uuid::try_from_value(Value::Blob(Some(uuid.as_bytes().to_vec().into()))).unwrap(),
            uuid
        );
        assert_eq!(String::try_from_value(uuid.as_value()).unwrap(), uuid.to_string());
        assert_eq!(Uuid::zero_value(), Uuid::nil());
        let text = format!("{}é{}", "a".repeat(35), "bbbb");
        assert!(Uuid::try_from_value(Value::Varchar(Some(text))).is_err());
        assert!(Uuid::try_from_value(Value::Varchar(Some("not a uuid".into()))).is_err());
    }

    #[test]
    fn decode_fields() {
        let value: Option<i32> = decode_field(&Value::Null, "reading").unwrap();
        assert_eq!(value, None);
        let value: String = decode_field(&Value::Varchar(None), "label").unwrap();
        assert_eq!(value, "");
        let error = decode_field::<u8>(&Value::Int64(Some(300)), "level").unwrap_err();
        assert!(format!("{error:#}").contains("level"));
    }
}
