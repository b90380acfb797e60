use crate::silent_logs;
use tabula::{Engine, Entity, Executor};

pub async fn alter<E: Executor>(engine: &mut Engine<E>) {
    #[derive(Entity, Debug)]
    #[tabula(table = "memo")]
    struct MemoV1 {
        #[tabula("primary_key")]
        id: i32,
        text: String,
    }
    #[derive(Entity, Debug)]
    #[tabula(table = "memo")]
    struct MemoV2 {
        #[tabula("primary_key")]
        id: i32,
        text: String,
        #[tabula("default:draft")]
        status: String,
        #[tabula("index:non-unique")]
        tag: Option<String>,
    }
    #[derive(Entity, Debug)]
    #[tabula(table = "memo")]
    struct MemoWithNewKey {
        #[tabula("primary_key")]
        id: i32,
        #[tabula("primary_key")]
        revision: i32,
        text: String,
    }
    #[derive(Entity, Debug)]
    struct Owner {
        #[tabula("primary_key")]
        id: i64,
        name: String,
    }
    #[derive(Entity, Debug)]
    #[tabula(table = "pet")]
    struct PetV1 {
        #[tabula("primary_key")]
        id: i64,
        name: String,
    }
    #[derive(Entity, Debug)]
    #[tabula(table = "pet")]
    struct PetV2 {
        #[tabula("primary_key")]
        id: i64,
        name: String,
        #[tabula("fkey:owner(id)")]
        owner_id: Option<i64>,
    }
    #[derive(Entity, Debug)]
    struct MemoAttachment {
        #[tabula("primary_key")]
        file_name: String,
        size: u32,
    }

    // Setup
    engine
        .drop_tables(&[MemoAttachment::table_ref()])
        .await
        .expect("Failed to drop memo_attachment");
    engine
        .destructive_reset_tables(&[MemoV1::table_ref()])
        .await
        .expect("Failed to reset memo");
    let mut memo = MemoV1 {
        id: 1,
        text: "remember the milk".into(),
    };
    engine
        .create(&mut memo)
        .await
        .expect("Failed to create a memo");
    assert!(
        !engine
            .exists_column("memo", "status")
            .await
            .expect("Failed to check memo.status")
    );

    // Adds the missing columns, the index and the missing table
    for _ in 0..2 {
        engine
            .alter_tables(&[MemoV2::table_ref(), MemoAttachment::table_ref()])
            .await
            .expect("Failed to alter memo");
    }
    for column in ["status", "tag"] {
        assert!(
            engine
                .exists_column("memo", column)
                .await
                .expect("Failed to check the new column"),
            "Column {column} should have been added"
        );
    }
    assert!(
        engine
            .exists_index("memo", "idx_tag")
            .await
            .expect("Failed to check idx_tag")
    );
    assert!(
        engine
            .exists_table("memo_attachment")
            .await
            .expect("Failed to check memo_attachment")
    );

    // The existing row survives and picks up the column default
    let mut memo = MemoV2 {
        id: 1,
        text: String::new(),
        status: String::new(),
        tag: None,
    };
    assert!(
        engine
            .get_entity(&mut memo)
            .await
            .expect("Failed to get the memo")
    );
    assert_eq!(memo.text, "remember the milk");
    assert_eq!(memo.status, "draft");
    assert_eq!(memo.tag, None);

    // A new primary key column cannot be added
    silent_logs! {
        assert!(
            engine
                .alter_tables(&[MemoWithNewKey::table_ref()])
                .await
                .is_err()
        );
    }
    assert!(
        !engine
            .exists_column("memo", "revision")
            .await
            .expect("Failed to check memo.revision")
    );

    // An added column keeps its foreign key
    engine
        .drop_tables(&[Owner::table_ref(), PetV1::table_ref()])
        .await
        .expect("Failed to drop pet and owner");
    engine
        .create_tables(&[Owner::table_ref(), PetV1::table_ref()])
        .await
        .expect("Failed to create pet and owner");
    let mut owner = Owner {
        id: 1,
        name: "Ada".into(),
    };
    engine
        .create(&mut owner)
        .await
        .expect("Failed to create the owner");
    for _ in 0..2 {
        let pending = engine
            .alter_tables(&[Owner::table_ref(), PetV2::table_ref()])
            .await
            .expect("Failed to alter pet");
        assert!(pending.is_empty());
    }
    assert!(
        engine
            .exists_foreign_key_by_fields("pet", "owner", "owner_id", "id")
            .await
            .expect("Failed to check the pet foreign key")
    );
    let mut pet = PetV2 {
        id: 1,
        name: "Rex".into(),
        owner_id: Some(1),
    };
    engine
        .create(&mut pet)
        .await
        .expect("Failed to create the pet");
    assert_eq!(pet.owner_id, Some(1));
    let mut stray = PetV2 {
        id: 2,
        name: "Tom".into(),
        owner_id: Some(99),
    };
    silent_logs! {
        assert!(engine.create(&mut stray).await.is_err());
    }
    engine
        .drop_tables(&[Owner::table_ref(), PetV2::table_ref()])
        .await
        .expect("Failed to drop pet and owner");
}
