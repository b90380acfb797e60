use crate::silent_logs;
use tabula::{Engine, Entity, Executor};
use uuid::Uuid;

pub async fn crud<E: Executor>(engine: &mut Engine<E>) {
    #[derive(Entity, Debug, PartialEq, Clone)]
    struct Shipment {
        #[tabula("primary_key")]
        tracking: Uuid,
        #[tabula("primary_key")]
        leg: i16,
        destination: String,
        weight_kg: f64,
        delivered: bool,
        payload: Vec<u8>,
    }

    // Setup
    engine
        .destructive_reset_tables(&[Shipment::table_ref()])
        .await
        .expect("Failed to reset shipment");

    let tracking = Uuid::new_v4();
    let mut shipment = Shipment {
        tracking,
        leg: 1,
        destination: "Rotterdam".into(),
        weight_kg: 1250.5,
        delivered: false,
        payload: vec![0xCA, 0xFE, 0x00, 0x01],
    };
    let original = shipment.clone();
    engine
        .create(&mut shipment)
        .await
        .expect("Failed to create the shipment");
    assert_eq!(shipment, original);

    let mut next_leg = Shipment {
        leg: 2,
        destination: "Hamburg".into(),
        ..original.clone()
    };
    engine
        .create(&mut next_leg)
        .await
        .expect("Failed to create the second leg");

    // Duplicate key
    let mut duplicate = original.clone();
    assert!(engine.create(&mut duplicate).await.is_err());

    // Update
    shipment.destination = "Antwerp".into();
    shipment.delivered = true;
    engine
        .update(&mut shipment)
        .await
        .expect("Failed to update the shipment");
    assert_eq!(shipment.destination, "Antwerp");
    assert!(shipment.delivered);
    assert_eq!(shipment.payload, original.payload);

    // Get
    let mut found = Shipment {
        tracking,
        leg: 2,
        destination: String::new(),
        weight_kg: 0.0,
        delivered: false,
        payload: Vec::new(),
    };
    assert!(
        engine
            .get_entity(&mut found)
            .await
            .expect("Failed to get the second leg")
    );
    assert_eq!(found, next_leg);
    let mut missing = Shipment {
        leg: 3,
        ..found.clone()
    };
    assert!(
        !engine
            .get_entity(&mut missing)
            .await
            .expect("Failed to look for a missing leg")
    );
    assert_eq!(missing.destination, "Hamburg");

    // Delete
    engine
        .delete(&shipment)
        .await
        .expect("Failed to delete the shipment");
    silent_logs! {
        assert!(engine.delete(&shipment).await.is_err());
    }
    let mut gone = shipment.clone();
    assert!(
        !engine
            .get_entity(&mut gone)
            .await
            .expect("Failed to look for the deleted shipment")
    );
    assert!(
        engine
            .get_entity(&mut found)
            .await
            .expect("Failed to get the second leg")
    );
}
