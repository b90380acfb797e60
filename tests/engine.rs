#[cfg(test)]
mod tests {
    use indoc::indoc;
    use std::sync::Arc;
    use tabula::{
        Directives, Engine, Entity, Executor, Predicate, Query, Result, RowLabeled, RowsAffected,
        Value,
    };

    #[derive(Entity, Debug, PartialEq)]
    struct Depot {
        #[tabula("primary_key:inc;start:90000000")]
        depot_num: i64,
        #[tabula("default:YYC")]
        region: String,
        #[tabula("-")]
        visits: u32,
    }

    #[derive(Entity, Debug)]
    struct Parcel {
        #[tabula("primary_key")]
        code: String,
        #[tabula("fkey:depot(depot_num);index:non-unique")]
        depot: i64,
    }

    /// Records every statement, fetches are answered by the first canned
    /// result whose fragment the SQL contains.
    struct RecordingExecutor {
        backend: &'static str,
        statements: Vec<String>,
        answers: Vec<(&'static str, Vec<RowLabeled>)>,
        affected: RowsAffected,
    }

    impl RecordingExecutor {
        fn new(backend: &'static str) -> Self {
            Self {
                backend,
                statements: Vec::new(),
                answers: Vec::new(),
                affected: RowsAffected {
                    rows_affected: 1,
                    last_affected_id: None,
                },
            }
        }
        fn answer(mut self, fragment: &'static str, rows: Vec<RowLabeled>) -> Self {
            self.answers.push((fragment, rows));
            self
        }
    }

    impl Executor for RecordingExecutor {
        fn name(&self) -> &'static str {
            self.backend
        }
        async fn execute(&mut self, sql: String) -> Result<RowsAffected> {
            self.statements.push(sql);
            Ok(self.affected)
        }
        async fn fetch_one(&mut self, query: Query) -> Result<Option<RowLabeled>> {
            Ok(self.fetch_all(query).await?.into_iter().next())
        }
        async fn fetch_all(&mut self, query: Query) -> Result<Vec<RowLabeled>> {
            let rows = self
                .answers
                .iter()
                .find(|(fragment, _)| query.sql.contains(fragment))
                .map(|(_, rows)| rows.clone())
                .unwrap_or_default();
            self.statements.push(query.sql);
            Ok(rows)
        }
    }

    fn row(labels: &[&str], values: Vec<Value>) -> RowLabeled {
        RowLabeled::new(
            labels.iter().map(|v| v.to_string()).collect::<Arc<[String]>>(),
            values.into(),
        )
    }

    fn count(n: i64) -> Vec<RowLabeled> {
        vec![row(&["count"], vec![Value::Int64(Some(n))])]
    }

    fn depot_row(num: i64, region: &str) -> Vec<RowLabeled> {
        vec![row(
            &["depot_num", "region"],
            vec![Value::Int64(Some(num)), Value::Varchar(Some(region.into()))],
        )]
    }

    #[tokio::test]
    async fn unknown_backend() {
        assert!(Engine::new(RecordingExecutor::new("oracle")).is_err());
        assert!(Engine::new(RecordingExecutor::new("PostgreSQL")).is_ok());
    }

    #[tokio::test]
    async fn postgres_create_tables() {
        let mut engine =
            Engine::new(RecordingExecutor::new("postgres")).expect("Failed to create the engine");
        let pending = engine
            .create_tables(&[Depot::table_ref()])
            .await
            .expect("Failed to create depot");
        assert!(pending.is_empty());
        assert_eq!(
            engine.executor().statements,
            [
                indoc! {r#"
                    CREATE TABLE "depot" (
                    "depot_num" BIGSERIAL,
                    "region" VARCHAR(255) DEFAULT 'YYC',
                    PRIMARY KEY ("depot_num")
                    );
                "#}
                .trim(),
                r#"ALTER SEQUENCE "depot_depot_num_seq" RESTART WITH 90000000;"#,
            ]
        );
    }

    #[tokio::test]
    async fn postgres_deferred_foreign_key() {
        let mut engine =
            Engine::new(RecordingExecutor::new("postgres")).expect("Failed to create the engine");
        let pending = engine
            .create_tables(&[Parcel::table_ref()])
            .await
            .expect("Failed to create parcel");
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].name(), "fk_parcel_depot_depot_num");
        let statements = &engine.executor().statements;
        assert_eq!(statements.len(), 3);
        assert_eq!(statements[1], r#"CREATE INDEX "idx_depot" ON "parcel" ("depot");"#);
        assert!(statements[2].contains("table_name = 'depot'"));

        // Once the referenced table exists
        let executor = engine
            .into_inner()
            .answer("table_name = 'depot'", count(1));
        let mut engine = Engine::new(executor).expect("Failed to create the engine");
        let pending = engine
            .create_foreign_keys(pending)
            .await
            .expect("Failed to create the foreign keys");
        assert!(pending.is_empty());
        assert_eq!(
            engine.executor().statements.last().map(String::as_str),
            Some(
                r#"ALTER TABLE "parcel" ADD CONSTRAINT "fk_parcel_depot_depot_num" FOREIGN KEY ("depot") REFERENCES "depot" ("depot_num");"#
            )
        );
    }

    #[tokio::test]
    async fn postgres_create_reads_back() {
        let executor = RecordingExecutor::new("postgres")
            .answer("RETURNING", depot_row(90000000, ""))
            .answer(r#"WHERE "depot_num" = 90000000"#, depot_row(90000000, "YYC"));
        let mut engine = Engine::new(executor).expect("Failed to create the engine");
        let mut depot = Depot {
            depot_num: 0,
            region: String::new(),
            visits: 3,
        };
        engine
            .create(&mut depot)
            .await
            .expect("Failed to create the depot");
        assert_eq!(
            depot,
            Depot {
                depot_num: 90000000,
                region: "YYC".into(),
                visits: 0,
            }
        );
        assert_eq!(
            engine.executor().statements,
            [
                indoc! {r#"
                    INSERT INTO "depot" ("depot_num", "region") VALUES
                    (DEFAULT, DEFAULT) RETURNING "depot_num";
                "#}
                .trim(),
                indoc! {r#"
                    SELECT "depot_num", "region"
                    FROM "depot"
                    WHERE "depot_num" = 90000000;
                "#}
                .trim(),
            ]
        );
    }

    #[tokio::test]
    async fn create_fails_when_not_read_back() {
        let executor =
            RecordingExecutor::new("postgres").answer("RETURNING", depot_row(90000000, ""));
        let mut engine = Engine::new(executor).expect("Failed to create the engine");
        let mut depot = Depot::zeroed();
        assert!(engine.create(&mut depot).await.is_err());
    }

    #[tokio::test]
    async fn mysql_generated_key() {
        let mut executor = RecordingExecutor::new("mysql")
            .answer("WHERE `depot_num` = 7", depot_row(7, "YUL"));
        executor.affected.last_affected_id = Some(7);
        let mut engine = Engine::new(executor).expect("Failed to create the engine");
        let mut depot = Depot {
            depot_num: 0,
            region: "YUL".into(),
            visits: 0,
        };
        engine
            .create(&mut depot)
            .await
            .expect("Failed to create the depot");
        assert_eq!(depot.depot_num, 7);
        assert_eq!(engine.executor().statements.len(), 2);

        // Without the driver reporting it, the key is queried
        let executor = RecordingExecutor::new("mysql")
            .answer("LAST_INSERT_ID()", count(8))
            .answer("WHERE `depot_num` = 8", depot_row(8, "YUL"));
        let mut engine = Engine::new(executor).expect("Failed to create the engine");
        engine
            .create(&mut depot)
            .await
            .expect("Failed to create the depot");
        assert_eq!(depot.depot_num, 8);
        assert_eq!(engine.executor().statements[1], "SELECT LAST_INSERT_ID();");
    }

    #[tokio::test]
    async fn mssql_identity() {
        let executor = RecordingExecutor::new("mssql")
            .answer("OUTPUT INSERTED", depot_row(90000000, ""))
            .answer("WHERE [depot_num] = 90000000", depot_row(90000000, "YYC"));
        let mut engine = Engine::new(executor).expect("Failed to create the engine");
        engine
            .create_tables(&[Depot::table_ref()])
            .await
            .expect("Failed to create depot");
        assert_eq!(engine.executor().statements.len(), 1);
        let mut depot = Depot::zeroed();
        engine
            .create(&mut depot)
            .await
            .expect("Failed to create the depot");
        assert_eq!(depot.depot_num, 90000000);
        assert_eq!(
            engine.executor().statements[1],
            indoc! {"
                INSERT INTO [depot] ([region]) OUTPUT INSERTED.[depot_num] VALUES
                (DEFAULT);
            "}
            .trim()
        );
    }

    #[tokio::test]
    async fn hana_drop_tables() {
        let executor = RecordingExecutor::new("hana")
            .answer("FROM TABLES", count(1))
            .answer("FROM SEQUENCES", count(1));
        let mut engine = Engine::new(executor).expect("Failed to create the engine");
        engine
            .drop_tables(&[Depot::table_ref()])
            .await
            .expect("Failed to drop depot");
        let statements = &engine.executor().statements;
        assert_eq!(statements[1], r#"DROP TABLE "depot";"#);
        assert_eq!(statements[3], r#"DROP SEQUENCE "depot_depot_num_seq";"#);
    }

    #[tokio::test]
    async fn hana_create_tables() {
        let mut engine =
            Engine::new(RecordingExecutor::new("hana")).expect("Failed to create the engine");
        engine
            .create_tables(&[Depot::table_ref()])
            .await
            .expect("Failed to create depot");
        let statements = &engine.executor().statements;
        assert_eq!(statements.len(), 3);
        assert!(statements[1].contains("SEQUENCE_NAME = 'depot_depot_num_seq'"));
        assert_eq!(
            statements[2],
            r#"CREATE SEQUENCE "depot_depot_num_seq" START WITH 90000000;"#
        );
    }

    #[tokio::test]
    async fn postgres_alter_tables() {
        let executor = RecordingExecutor::new("postgres")
            .answer("table_name = 'depot' AND column_name = 'depot_num'", count(1))
            .answer("information_schema.tables", count(1));
        let mut engine = Engine::new(executor).expect("Failed to create the engine");
        engine
            .alter_tables(&[Depot::table_ref()])
            .await
            .expect("Failed to alter depot");
        assert_eq!(
            engine.executor().statements.last().map(String::as_str),
            Some(r#"ALTER TABLE "depot" ADD COLUMN "region" VARCHAR(255) DEFAULT 'YYC';"#)
        );
    }

    #[derive(Entity)]
    #[tabula(table = "depot")]
    struct CodedDepot {
        #[tabula("primary_key:inc")]
        depot_num: i64,
        region: String,
        code: String,
    }

    #[derive(Entity)]
    struct Shipment {
        #[tabula("primary_key")]
        id: i64,
        #[tabula("fkey:depot(code)")]
        depot_code: String,
    }

    #[tokio::test]
    async fn postgres_alter_tables_foreign_keys_last() {
        let executor = RecordingExecutor::new("postgres")
            .answer("table_name = 'depot' AND column_name = 'depot_num'", count(1))
            .answer("table_name = 'depot' AND column_name = 'region'", count(1))
            .answer("table_name = 'depot';", count(1));
        let mut engine = Engine::new(executor).expect("Failed to create the engine");
        let pending = engine
            .alter_tables(&[CodedDepot::table_ref(), Shipment::table_ref()])
            .await
            .expect("Failed to alter the tables");
        assert!(pending.is_empty());
        let statements = &engine.executor().statements;
        let position = |fragment: &str| {
            statements
                .iter()
                .position(|v| v.starts_with(fragment))
                .unwrap_or_else(|| panic!("Missing statement `{fragment}`"))
        };
        let create = position(r#"CREATE TABLE "shipment""#);
        let column = position(r#"ALTER TABLE "depot" ADD COLUMN "code""#);
        let foreign_key = position(r#"ALTER TABLE "shipment" ADD CONSTRAINT"#);
        assert!(create < column);
        assert!(column < foreign_key);
        assert_eq!(
            statements[foreign_key],
            r#"ALTER TABLE "shipment" ADD CONSTRAINT "fk_shipment_depot_code" FOREIGN KEY ("depot_code") REFERENCES "depot" ("code");"#
        );
    }

    #[tokio::test]
    async fn sqlite_added_column_references() {
        let executor = RecordingExecutor::new("sqlite")
            .answer("pragma_table_info('shipment')\nWHERE name = 'id'", count(1))
            .answer("instr(sql, '\"fk_shipment_depot_code\"') > 0", count(1))
            .answer("type = 'table' AND name = 'shipment';", count(1));
        let mut engine = Engine::new(executor).expect("Failed to create the engine");
        let pending = engine
            .alter_tables(&[Shipment::table_ref()])
            .await
            .expect("Failed to alter shipment");
        assert!(pending.is_empty());
        assert!(engine.executor().statements.contains(
            &r#"ALTER TABLE "shipment" ADD COLUMN "depot_code" TEXT CONSTRAINT "fk_shipment_depot_code" REFERENCES "depot" ("code");"#
                .to_string()
        ));
    }

    #[tokio::test]
    async fn sqlite_existing_column_without_foreign_key() {
        let executor = RecordingExecutor::new("sqlite")
            .answer("pragma_table_info", count(1))
            .answer("type = 'table' AND name = 'shipment';", count(1));
        let mut engine = Engine::new(executor).expect("Failed to create the engine");
        assert!(
            engine
                .alter_tables(&[Shipment::table_ref()])
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn delete_expects_one_row() {
        let mut executor = RecordingExecutor::new("sqlite");
        executor.affected.rows_affected = 0;
        let mut engine = Engine::new(executor).expect("Failed to create the engine");
        let depot = Depot {
            depot_num: 5,
            region: String::new(),
            visits: 0,
        };
        assert!(engine.delete(&depot).await.is_err());
        engine.executor_mut().affected.rows_affected = 1;
        engine.delete(&depot).await.expect("Failed to delete the depot");
        assert_eq!(
            engine.executor().statements[1],
            "DELETE FROM \"depot\"\nWHERE \"depot_num\" = 5;"
        );
    }

    #[tokio::test]
    async fn select_binds_parameters() {
        let executor = RecordingExecutor::new("postgres").answer("COUNT(*)", count(5));
        let mut engine = Engine::new(executor).expect("Failed to create the engine");
        let n = engine
            .count::<Depot>(&[Predicate::equal("region", "YYC")])
            .await
            .expect("Failed to count");
        assert_eq!(n, 5);
        let depots = engine
            .entities::<Depot>(&[], &Directives::new().limit(1))
            .await
            .expect("Failed to select");
        assert!(depots.is_empty());
        assert_eq!(
            engine.executor().statements,
            [
                "SELECT COUNT(*)\nFROM \"depot\"\nWHERE \"region\" = $1;",
                "SELECT \"depot_num\", \"region\"\nFROM \"depot\"\nORDER BY \"depot_num\" ASC\nLIMIT 1;",
            ]
        );
    }
}
