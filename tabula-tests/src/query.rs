use tabula::{Directives, Engine, Entity, Executor, Operator, Predicate, Selection};

pub async fn query<E: Executor>(engine: &mut Engine<E>) {
    #[derive(Entity, Debug)]
    struct Ticket {
        #[tabula("primary_key")]
        number: i32,
        title: String,
        priority: u8,
    }

    // Setup
    engine
        .destructive_reset_tables(&[Ticket::table_ref()])
        .await
        .expect("Failed to reset ticket");
    for number in 0..8 {
        let mut ticket = Ticket {
            number,
            title: format!("ticket {number}"),
            priority: (number % 3) as u8,
        };
        engine
            .create(&mut ticket)
            .await
            .expect("Failed to create a ticket");
    }

    async fn numbers<E: Executor>(
        engine: &mut Engine<E>,
        predicates: &[Predicate],
        directives: Directives,
    ) -> Vec<i32> {
        engine
            .entities::<Ticket>(predicates, &directives)
            .await
            .expect("Failed to select the tickets")
            .into_iter()
            .map(|v| v.number)
            .collect()
    }

    // Ordered by primary key
    assert_eq!(
        numbers(engine, &[], Directives::new()).await,
        [0, 1, 2, 3, 4, 5, 6, 7]
    );
    assert_eq!(
        numbers(engine, &[], Directives::new().limit(4).descending()).await,
        [7, 6, 5, 4]
    );
    assert_eq!(
        numbers(engine, &[], Directives::new().limit(3).offset(2)).await,
        [2, 3, 4]
    );
    assert_eq!(
        numbers(engine, &[], Directives::new().offset(5)).await,
        [5, 6, 7]
    );
    assert_eq!(
        numbers(
            engine,
            &[],
            Directives::new().order_by("title").descending().limit(1)
        )
        .await,
        [7]
    );

    // Count ignores paging
    let count = engine
        .select_entities::<Ticket>(&[], &Directives::new().limit(2).count())
        .await
        .expect("Failed to count the tickets");
    assert!(matches!(count, Selection::Count(8)));
    assert_eq!(
        engine
            .count::<Ticket>(&[Predicate::new("number", Operator::GreaterEqual, 6)])
            .await
            .expect("Failed to count the tickets"),
        2
    );

    // Predicates
    assert_eq!(
        numbers(
            engine,
            &[Predicate::new("number", Operator::Greater, 5)],
            Directives::new()
        )
        .await,
        [6, 7]
    );
    assert_eq!(
        numbers(
            engine,
            &[Predicate::new("title", Operator::Like, "ticket 1%")],
            Directives::new()
        )
        .await,
        [1]
    );
    assert_eq!(
        numbers(
            engine,
            &[
                Predicate::equal("priority", 0u8).or(),
                Predicate::equal("number", 1),
            ],
            Directives::new()
        )
        .await,
        [0, 1, 3, 6]
    );
    assert_eq!(
        numbers(
            engine,
            &[
                Predicate::new("priority", Operator::NotEqual, 0u8),
                Predicate::new("number", Operator::Less, 5),
            ],
            Directives::new().descending()
        )
        .await,
        [4, 2, 1]
    );

    // Directives from textual pairs
    let directives = Directives::parse([("limit", "2"), ("orderby", "number"), ("desc", "")])
        .expect("Failed to parse the directives");
    assert_eq!(numbers(engine, &[], directives).await, [7, 6]);

    // Unknown field
    assert!(
        engine
            .entities::<Ticket>(&[Predicate::equal("missing", 1)], &Directives::new())
            .await
            .is_err()
    );
}
