#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use std::sync::Arc;
    use tabula::{Entity, RowLabeled, Value, ZERO_TIMESTAMP};
    use time::PrimitiveDateTime;
    use uuid::Uuid;

    #[derive(Entity, Debug, PartialEq)]
    struct Coordinates {
        latitude: f64,
        longitude: f64,
    }

    #[allow(non_snake_case)]
    #[derive(Entity, Debug, PartialEq)]
    #[tabula(table = "weather_station")]
    struct Station {
        #[tabula("primary_key:inc;start:100")]
        id: u32,
        #[tabula("index:unique")]
        stationCode: String,
        position: Coordinates,
        #[tabula("nullable:false;default:0")]
        elevation: Option<i32>,
        installed: PrimitiveDateTime,
        calibration: Option<Decimal>,
        serial: Uuid,
        #[tabula("-")]
        cache: Vec<String>,
    }

    #[test]
    fn metadata() {
        assert_eq!(Station::table_name(), "weather_station");
        assert_eq!(Coordinates::table_name(), "coordinates");
        let fields = Station::fields();
        let names: Vec<_> = fields.iter().map(|f| f.storage_name).collect();
        assert_eq!(
            names,
            [
                "id",
                "station_code",
                "latitude",
                "longitude",
                "elevation",
                "installed",
                "calibration",
                "serial",
                "cache",
            ]
        );
        assert_eq!(fields[1].name, "stationCode");

        let id = &fields[0];
        assert!(id.is_primary_key());
        assert!(id.is_increment());
        assert_eq!(id.start(), Some(100));
        assert!(matches!(id.value, Value::UInt32(None)));
        assert_eq!(id.declared_type, "u32");

        let elevation = &fields[4];
        assert!(elevation.nullable_type);
        assert!(elevation.is_not_null());
        assert_eq!(elevation.default(), Some("0"));
        assert!(matches!(elevation.value, Value::Int32(None)));
        assert_eq!(
            elevation.attributes,
            [("nullable", "false"), ("default", "0")]
        );

        assert!(matches!(fields[6].value, Value::Decimal(None)));
        assert!(matches!(fields[7].value, Value::Uuid(None)));

        let cache = &fields[8];
        assert!(!cache.persisted);
        assert!(!cache.is_primary_key());
        assert_eq!(Station::primary_key_fields().count(), 1);
        assert_eq!(Station::table_ref().persisted().count(), 8);
    }

    #[test]
    fn values_and_zero() {
        let station = Station::zeroed();
        assert_eq!(
            station,
            Station {
                id: 0,
                stationCode: String::new(),
                position: Coordinates {
                    latitude: 0.0,
                    longitude: 0.0,
                },
                elevation: None,
                installed: ZERO_TIMESTAMP,
                calibration: None,
                serial: Uuid::nil(),
                cache: Vec::new(),
            }
        );
        let values = Station {
            elevation: Some(1200),
            cache: vec!["kept in memory".into()],
            ..Station::zeroed()
        }
        .values();
        assert_eq!(values.len(), Station::fields().len());
        assert_eq!(values[4], Value::Int32(Some(1200)));
        assert!(values[8].is_null());
    }

    #[test]
    fn load() {
        let labels: Arc<[String]> = [
            "id",
            "STATION_CODE",
            "latitude",
            "longitude",
            "elevation",
            "installed",
            "calibration",
        ]
        .into_iter()
        .map(String::from)
        .collect();
        let row = RowLabeled::new(
            labels,
            vec![
                Value::Int64(Some(101)),
                Value::Varchar(Some("TRN".into())),
                Value::Float64(Some(45.07)),
                Value::Varchar(Some("7.69".into())),
                Value::Null,
                Value::Varchar(Some("2024-05-01 08:30:00".into())),
                Value::Float64(Some(0.5)),
            ]
            .into(),
        );
        let mut station = Station::zeroed();
        station.serial = Uuid::from_u128(42);
        station.load(&row).expect("Failed to load the row");
        assert_eq!(station.id, 101);
        assert_eq!(station.stationCode, "TRN");
        assert_eq!(station.position.latitude, 45.07);
        assert_eq!(station.position.longitude, 7.69);
        assert_eq!(station.elevation, None);
        assert_eq!(
            station.installed,
            time::macros::datetime!(2024-05-01 08:30:00)
        );
        assert_eq!(station.calibration, Some(Decimal::new(5, 1)));
        // Columns missing from the row are left untouched
        assert_eq!(station.serial, Uuid::from_u128(42));

        let row = RowLabeled::new(
            ["id"].into_iter().map(String::from).collect(),
            vec![Value::Varchar(Some("not a number".into()))].into(),
        );
        assert!(station.load(&row).is_err());
    }
}
