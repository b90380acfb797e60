use tabula::{Engine, Entity, Executor};

#[derive(Entity, Debug, PartialEq)]
pub struct Depot {
    #[tabula("primary_key:inc;start:90000000")]
    pub depot_num: i64,
    #[tabula("default:YYC")]
    pub region: String,
    #[tabula("-")]
    pub visits: u32,
}

pub async fn depot<E: Executor>(engine: &mut Engine<E>) {
    let tables = [Depot::table_ref()];
    engine
        .destructive_reset_tables(&tables)
        .await
        .expect("Failed to reset depot");

    let mut first = Depot {
        depot_num: 0,
        region: String::new(),
        visits: 5,
    };
    engine
        .create(&mut first)
        .await
        .expect("Failed to create the first depot");
    assert_eq!(
        first,
        Depot {
            depot_num: 90000000,
            region: "YYC".into(),
            // Not persisted, the whole entity is reset before being read back
            visits: 0,
        }
    );

    let mut second = Depot {
        depot_num: 0,
        region: "YUL".into(),
        visits: 0,
    };
    engine
        .create(&mut second)
        .await
        .expect("Failed to create the second depot");
    assert_eq!(second.depot_num, 90000001);
    assert_eq!(second.region, "YUL");

    // Any key value supplied is ignored, the database assigns it
    let mut third = Depot {
        depot_num: 12,
        region: "YVR".into(),
        visits: 0,
    };
    engine
        .create(&mut third)
        .await
        .expect("Failed to create the third depot");
    assert_eq!(third.depot_num, 90000002);

    let mut found = Depot {
        depot_num: 90000001,
        region: String::new(),
        visits: 9,
    };
    assert!(
        engine
            .get_entity(&mut found)
            .await
            .expect("Failed to get the depot")
    );
    assert_eq!(found.region, "YUL");
    assert_eq!(found.visits, 9);
}
