#[cfg(test)]
mod tests {
    use indoc::indoc;
    use tabula::{
        Connector, Directives, EngineConfig, Entity, Operator, Predicate, Query, Value,
        writer::Context, writer_for,
    };

    #[derive(Entity)]
    struct Ticket {
        #[tabula("primary_key")]
        number: i32,
        title: String,
        priority: u8,
    }

    #[derive(Entity)]
    struct LogLine {
        message: String,
        level: u8,
    }

    fn render(backend: &str, predicates: &[Predicate], directives: &Directives) -> Query {
        let writer = writer_for(backend, &EngineConfig::default()).expect("Unknown backend");
        let mut context = Context::new();
        let mut sql = String::new();
        writer
            .write_select(
                &mut context,
                &mut sql,
                &Ticket::table_ref(),
                predicates,
                directives,
            )
            .expect("Failed to write the select");
        context.into_query(sql)
    }

    fn predicates() -> Vec<Predicate> {
        vec![
            Predicate::new("number", Operator::Greater, 5).or(),
            Predicate::new("title", Operator::Like, "urgent%"),
        ]
    }

    #[test]
    fn placeholders() {
        let directives = Directives::new().limit(4).offset(2).descending();
        let query = render("postgres", &predicates(), &directives);
        assert_eq!(
            query.sql,
            indoc! {r#"
                SELECT "number", "title", "priority"
                FROM "ticket"
                WHERE "number" > $1 OR "title" LIKE $2
                ORDER BY "number" DESC
                LIMIT 4
                OFFSET 2;
            "#}
            .trim()
        );
        assert_eq!(
            query.params,
            [Value::Int32(Some(5)), Value::Varchar(Some("urgent%".into()))]
        );

        let query = render("mysql", &predicates(), &directives);
        assert!(query.sql.contains("WHERE `number` > ? OR `title` LIKE ?"));
        let query = render("mssql", &predicates(), &directives);
        assert!(query.sql.contains("WHERE [number] > @p1 OR [title] LIKE @p2"));
    }

    #[test]
    fn paging() {
        let limit = Directives::new().limit(10);
        let offset = Directives::new().offset(20);
        let both = Directives::new().limit(10).offset(20);
        let cases = [
            ("postgres", &limit, "\nLIMIT 10;"),
            ("postgres", &offset, "\nOFFSET 20;"),
            ("sqlite", &offset, "\nLIMIT -1\nOFFSET 20;"),
            ("mysql", &offset, "\nLIMIT 18446744073709551615\nOFFSET 20;"),
            ("hana", &offset, "\nLIMIT 2147483647\nOFFSET 20;"),
            ("hana", &both, "\nLIMIT 10\nOFFSET 20;"),
            ("mssql", &offset, "\nOFFSET 20 ROWS;"),
            ("mssql", &both, "\nOFFSET 20 ROWS\nFETCH NEXT 10 ROWS ONLY;"),
        ];
        for (backend, directives, tail) in cases {
            let query = render(backend, &[], directives);
            assert!(
                query.sql.ends_with(tail),
                "{backend}: `{}` should end with `{tail}`",
                query.sql
            );
        }
        let query = render("mssql", &[], &limit);
        assert_eq!(
            query.sql,
            indoc! {"
                SELECT TOP (10) [number], [title], [priority]
                FROM [ticket]
                ORDER BY [number] ASC;
            "}
            .trim()
        );
    }

    #[test]
    fn count_and_order() {
        let query = render(
            "sqlite",
            &predicates(),
            &Directives::new().limit(3).order_by("title").count(),
        );
        assert_eq!(
            query.sql,
            indoc! {r#"
                SELECT COUNT(*)
                FROM "ticket"
                WHERE "number" > ? OR "title" LIKE ?;
            "#}
            .trim()
        );
        let query = render("sqlite", &[], &Directives::new().order_by("priority"));
        assert!(query.sql.ends_with("ORDER BY \"priority\" ASC;"));

        // Without a primary key the first column orders the rows
        let writer = writer_for("sqlite", &EngineConfig::default()).expect("Unknown backend");
        let mut sql = String::new();
        writer
            .write_select(
                &mut Context::new(),
                &mut sql,
                &LogLine::table_ref(),
                &[],
                &Directives::new(),
            )
            .expect("Failed to write the select");
        assert!(sql.ends_with("ORDER BY \"message\" ASC;"));
    }

    #[test]
    fn unknown_fields() {
        let writer = writer_for("postgres", &EngineConfig::default()).expect("Unknown backend");
        let mut sql = String::new();
        assert!(
            writer
                .write_select(
                    &mut Context::new(),
                    &mut sql,
                    &Ticket::table_ref(),
                    &[Predicate::equal("owner", "me")],
                    &Directives::new(),
                )
                .is_err()
        );
        let mut sql = String::new();
        assert!(
            writer
                .write_select(
                    &mut Context::new(),
                    &mut sql,
                    &Ticket::table_ref(),
                    &[],
                    &Directives::new().order_by("owner"),
                )
                .is_err()
        );
    }

    #[test]
    fn parse_directives() {
        let directives = Directives::parse([
            ("limit", "5"),
            ("offset", "10"),
            ("orderby", "title"),
            ("desc", "true"),
        ])
        .expect("Failed to parse the directives");
        assert_eq!(
            directives,
            Directives::new()
                .limit(5)
                .offset(10)
                .order_by("title")
                .descending()
        );
        let directives =
            Directives::parse([("count", "1")]).expect("Failed to parse the directives");
        assert!(directives.count);
        assert!(Directives::parse([("limit", "many")]).is_err());
        assert!(Directives::parse([("shuffle", "")]).is_err());
    }

    #[test]
    fn parse_operators() {
        let cases = [
            ("=", Operator::Equal),
            ("!=", Operator::NotEqual),
            ("<>", Operator::NotEqual),
            ("<=", Operator::LessEqual),
            (">", Operator::Greater),
            ("LIKE", Operator::Like),
            ("NOT LIKE", Operator::NotLike),
        ];
        for (text, expected) in cases {
            let operator: Operator = text.parse().expect("Failed to parse the operator");
            assert_eq!(operator, expected);
        }
        assert!("~".parse::<Operator>().is_err());
        assert_eq!("or".parse::<Connector>().ok(), Some(Connector::Or));
        assert_eq!(Connector::default(), Connector::And);
    }
}
