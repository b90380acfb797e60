use rust_decimal::Decimal;
use tabula::{Engine, Entity, Executor};

pub async fn nullability<E: Executor>(engine: &mut Engine<E>) {
    #[derive(Entity, Debug, PartialEq)]
    struct Measurement {
        #[tabula("primary_key")]
        id: i32,
        reading: Option<f64>,
        comment: Option<String>,
        #[tabula("nullable:false")]
        unit: Option<String>,
        amount: Option<Decimal>,
        flagged: Option<bool>,
    }

    // Setup
    engine
        .destructive_reset_tables(&[Measurement::table_ref()])
        .await
        .expect("Failed to reset measurement");

    let mut empty = Measurement {
        id: 1,
        reading: None,
        comment: None,
        unit: None,
        amount: None,
        flagged: None,
    };
    engine
        .create(&mut empty)
        .await
        .expect("Failed to create an empty measurement");
    assert_eq!(
        empty,
        Measurement {
            id: 1,
            reading: None,
            comment: None,
            // Not nullable, the zero value is written instead
            unit: Some(String::new()),
            amount: None,
            flagged: None,
        }
    );

    let mut full = Measurement {
        id: 2,
        reading: Some(-3.25),
        comment: Some("calibrated".into()),
        unit: Some("kPa".into()),
        amount: Some(Decimal::new(125, 1)),
        flagged: Some(false),
    };
    engine
        .create(&mut full)
        .await
        .expect("Failed to create a full measurement");
    assert_eq!(full.reading, Some(-3.25));
    assert_eq!(full.comment.as_deref(), Some("calibrated"));
    assert_eq!(full.unit.as_deref(), Some("kPa"));
    assert_eq!(full.amount, Some(Decimal::new(125, 1)));
    assert_eq!(full.flagged, Some(false));

    // Back to null
    full.reading = None;
    full.comment = None;
    engine
        .update(&mut full)
        .await
        .expect("Failed to update the measurement");
    assert_eq!(full.reading, None);
    assert_eq!(full.comment, None);
    assert_eq!(full.unit.as_deref(), Some("kPa"));
}
