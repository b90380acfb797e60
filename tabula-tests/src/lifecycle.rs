use tabula::{Directives, Engine, Entity, Executor};

pub async fn lifecycle<E: Executor>(engine: &mut Engine<E>) {
    #[derive(Entity, Debug)]
    struct LifecycleItem {
        #[tabula("primary_key")]
        code: String,
        label: String,
    }
    let tables = [LifecycleItem::table_ref()];
    assert_eq!(LifecycleItem::table_name(), "lifecycle_item");

    engine
        .drop_tables(&tables)
        .await
        .expect("Failed to drop lifecycle_item");
    assert!(
        !engine
            .exists_table("lifecycle_item")
            .await
            .expect("Failed to check lifecycle_item")
    );

    // Create
    engine
        .create_tables(&tables)
        .await
        .expect("Failed to create lifecycle_item");
    assert!(
        engine
            .exists_table("lifecycle_item")
            .await
            .expect("Failed to check lifecycle_item")
    );
    assert!(
        engine
            .exists_column("lifecycle_item", "label")
            .await
            .expect("Failed to check lifecycle_item.label")
    );
    assert!(
        !engine
            .exists_column("lifecycle_item", "missing")
            .await
            .expect("Failed to check lifecycle_item.missing")
    );

    // Dropping twice is harmless
    engine
        .drop_tables(&tables)
        .await
        .expect("Failed to drop lifecycle_item");
    engine
        .drop_tables(&tables)
        .await
        .expect("Failed to drop lifecycle_item again");
    assert!(
        !engine
            .exists_table("lifecycle_item")
            .await
            .expect("Failed to check lifecycle_item")
    );

    // Destructive reset, twice
    for _ in 0..2 {
        engine
            .destructive_reset_tables(&tables)
            .await
            .expect("Failed to reset lifecycle_item");
        assert!(
            engine
                .exists_table("lifecycle_item")
                .await
                .expect("Failed to check lifecycle_item")
        );
        assert_eq!(
            engine
                .count::<LifecycleItem>(&[])
                .await
                .expect("Failed to count lifecycle_item"),
            0
        );
        let mut item = LifecycleItem {
            code: "A-1".into(),
            label: "first".into(),
        };
        engine
            .create(&mut item)
            .await
            .expect("Failed to create a lifecycle_item");
        assert_eq!(item.code, "A-1");
        assert_eq!(item.label, "first");
    }
    let items = engine
        .entities::<LifecycleItem>(&[], &Directives::new())
        .await
        .expect("Failed to select lifecycle_item");
    assert_eq!(items.len(), 1);
}
