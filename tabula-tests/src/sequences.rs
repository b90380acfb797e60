use crate::depot::Depot;
use tabula::{Engine, Entity, Executor, IncrementStrategy};

pub async fn sequences<E: Executor>(engine: &mut Engine<E>) {
    let table = Depot::table_ref();
    // Setup
    engine
        .destructive_reset_tables(&[table])
        .await
        .expect("Failed to reset depot");
    let name = engine
        .writer()
        .sequence_name(Depot::table_name(), "depot_num");
    assert!(
        engine
            .exists_sequence(&name)
            .await
            .expect("Failed to check the depot sequence")
    );
    assert!(
        !engine
            .exists_sequence("no_such_sequence")
            .await
            .expect("Failed to check a missing sequence")
    );

    let mut depot = Depot {
        depot_num: 0,
        region: "YEG".into(),
        visits: 0,
    };
    engine
        .create(&mut depot)
        .await
        .expect("Failed to create a depot");
    assert_eq!(depot.depot_num, 90000000);
    let next = engine
        .next_sequence_value(&name)
        .await
        .expect("Failed to read the next depot number");
    assert!(next > 90000000, "Next value {next} must follow the last key");

    // Restart
    engine
        .alter_sequence_start(&name, 95000000)
        .await
        .expect("Failed to restart the depot sequence");
    let mut depot = Depot {
        depot_num: 0,
        region: "YEG".into(),
        visits: 0,
    };
    engine
        .create(&mut depot)
        .await
        .expect("Failed to create a depot");
    assert_eq!(depot.depot_num, 95000000);

    // Standalone sequences
    if engine.writer().increment_strategy() == IncrementStrategy::ManualSequence {
        engine
            .create_sequence("invoice_number_seq", 500)
            .await
            .expect("Failed to create invoice_number_seq");
        assert_eq!(
            engine
                .next_sequence_value("invoice_number_seq")
                .await
                .expect("Failed to read invoice_number_seq"),
            500
        );
        engine
            .drop_sequence("invoice_number_seq")
            .await
            .expect("Failed to drop invoice_number_seq");
        assert!(
            !engine
                .exists_sequence("invoice_number_seq")
                .await
                .expect("Failed to check invoice_number_seq")
        );
    }
}
