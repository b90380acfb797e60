use crate::silent_logs;
use tabula::{Engine, Entity, Executor};
use time::{Date, Month};

pub async fn indexes<E: Executor>(engine: &mut Engine<E>) {
    #[derive(Entity, Debug)]
    struct SensorReading {
        #[tabula("primary_key:inc")]
        id: i64,
        #[tabula("index:idx_reading_sensor_day")]
        sensor: String,
        #[tabula("index:idx_reading_sensor_day")]
        day: Date,
        #[tabula("index:unique")]
        serial: String,
        value: f64,
    }

    let table = SensorReading::table_ref();
    let schema = engine
        .build_schema(&table)
        .expect("Failed to build the sensor_reading schema");
    let composite = schema
        .indexes
        .get("idx_reading_sensor_day")
        .expect("Missing composite index");
    assert!(!composite.unique);
    assert_eq!(composite.columns, ["sensor", "day"]);
    assert!(schema.indexes["idx_serial"].unique);

    // Setup
    engine
        .destructive_reset_tables(&[table])
        .await
        .expect("Failed to reset sensor_reading");
    for name in ["idx_reading_sensor_day", "idx_serial"] {
        assert!(
            engine
                .exists_index("sensor_reading", name)
                .await
                .expect("Failed to check the index"),
            "Index {name} should exist"
        );
    }

    let day = Date::from_calendar_date(2025, Month::March, 3).expect("Invalid date");
    let mut reading = SensorReading {
        id: 0,
        sensor: "north".into(),
        day,
        serial: "SN-001".into(),
        value: 11.5,
    };
    engine
        .create(&mut reading)
        .await
        .expect("Failed to create a reading");
    let mut clash = SensorReading {
        id: 0,
        sensor: "south".into(),
        day,
        serial: "SN-001".into(),
        value: 3.0,
    };
    silent_logs! {
        assert!(engine.create(&mut clash).await.is_err(), "The serial is unique");
    }

    // Without the unique index the clash goes through
    engine
        .drop_index("sensor_reading", "idx_serial")
        .await
        .expect("Failed to drop idx_serial");
    assert!(
        !engine
            .exists_index("sensor_reading", "idx_serial")
            .await
            .expect("Failed to check idx_serial")
    );
    engine
        .create(&mut clash)
        .await
        .expect("Failed to create a reading with a repeated serial");
    assert_eq!(clash.sensor, "south");
}
