use crate::silent_logs;
use tabula::{Engine, Entity, Executor, foreign_key_name};

pub async fn foreign_keys<E: Executor>(engine: &mut Engine<E>) {
    #[derive(Entity, Debug)]
    struct Author {
        #[tabula("primary_key")]
        id: i64,
        name: String,
    }
    #[derive(Entity, Debug)]
    struct Book {
        #[tabula("primary_key")]
        isbn: String,
        #[tabula("fkey:author(id)")]
        author_id: i64,
        title: String,
    }

    let schema = engine
        .build_schema(&Book::table_ref())
        .expect("Failed to build the book schema");
    assert_eq!(schema.foreign_keys.len(), 1);
    assert_eq!(schema.foreign_keys[0].name(), "fk_book_author_id");

    // Referencing table first, its foreign key waits for the referenced one
    engine
        .drop_tables(&[Author::table_ref(), Book::table_ref()])
        .await
        .expect("Failed to drop author and book");
    let pending = engine
        .create_tables(&[Book::table_ref()])
        .await
        .expect("Failed to create book");
    if engine.writer().inline_foreign_keys() {
        assert!(pending.is_empty());
    } else {
        assert_eq!(pending, schema.foreign_keys);
    }
    let pending = engine
        .create_tables(&[Author::table_ref()])
        .await
        .expect("Failed to create author");
    assert!(pending.is_empty());
    let pending = engine
        .create_foreign_keys(schema.foreign_keys.clone())
        .await
        .expect("Failed to create the pending foreign keys");
    assert!(pending.is_empty());

    let name = foreign_key_name("book", "author", "id");
    assert!(
        engine
            .exists_foreign_key_by_name("book", &name)
            .await
            .expect("Failed to check the foreign key by name")
    );
    assert!(
        engine
            .exists_foreign_key_by_fields("book", "author", "author_id", "id")
            .await
            .expect("Failed to check the foreign key by fields")
    );
    assert!(
        !engine
            .exists_foreign_key_by_fields("book", "author", "title", "id")
            .await
            .expect("Failed to check a missing foreign key")
    );

    // The constraint is enforced
    let mut orphan = Book {
        isbn: "978-0000000001".into(),
        author_id: 404,
        title: "Nobody wrote this".into(),
    };
    silent_logs! {
        assert!(engine.create(&mut orphan).await.is_err());
    }
    let mut author = Author {
        id: 1,
        name: "Italo Calvino".into(),
    };
    engine
        .create(&mut author)
        .await
        .expect("Failed to create the author");
    let mut book = Book {
        isbn: "978-8804668237".into(),
        author_id: 1,
        title: "Le citta invisibili".into(),
    };
    engine
        .create(&mut book)
        .await
        .expect("Failed to create the book");

    if engine.writer().inline_foreign_keys() {
        silent_logs! {
            assert!(
                engine
                    .create_foreign_key("book", "author", "author_id", "id")
                    .await
                    .is_err()
            );
            assert!(engine.drop_foreign_key("book", "author", "id").await.is_err());
        }
    } else {
        engine
            .drop_foreign_key("book", "author", "id")
            .await
            .expect("Failed to drop the foreign key");
        assert!(
            !engine
                .exists_foreign_key_by_name("book", &name)
                .await
                .expect("Failed to check the foreign key by name")
        );
        engine
            .create_foreign_key("book", "author", "author_id", "id")
            .await
            .expect("Failed to create the foreign key");
        assert!(
            engine
                .exists_foreign_key_by_name("book", &name)
                .await
                .expect("Failed to check the foreign key by name")
        );
    }

    // Referencing tables are dropped first
    engine
        .drop_tables(&[Author::table_ref(), Book::table_ref()])
        .await
        .expect("Failed to drop author and book");
    assert!(
        !engine
            .exists_table("author")
            .await
            .expect("Failed to check author")
    );
}
