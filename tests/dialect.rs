#[cfg(test)]
mod tests {
    use indoc::indoc;
    use tabula::{
        ColumnValue, EngineConfig, Entity, ForeignKeySpec, HanaSqlWriter, MssqlSqlWriter,
        MySqlSqlWriter, PostgresSqlWriter, SqlWriter, SqliteSqlWriter, Value, writer_for,
    };

    #[derive(Entity)]
    struct Depot {
        #[tabula("primary_key:inc;start:90000000")]
        depot_num: i64,
        #[tabula("default:YYC")]
        region: String,
        #[tabula("-")]
        _visits: u32,
    }

    #[derive(Entity)]
    struct Parcel {
        #[tabula("primary_key")]
        code: String,
        #[tabula("fkey:depot(depot_num);index:non-unique")]
        depot: i64,
        #[tabula("nullable:false")]
        note: Option<String>,
        #[tabula("constraint:unique")]
        barcode: String,
    }

    fn depot_insert(writer: &dyn SqlWriter) -> String {
        let fields = Depot::fields();
        let columns = [
            (&fields[0], ColumnValue::AutoAssign),
            (&fields[1], ColumnValue::UseDefault("YYC")),
        ];
        let mut out = String::new();
        writer
            .write_insert(&mut out, "depot", &columns, Some(&fields[0]))
            .expect("Failed to write the insert");
        out
    }

    #[test]
    fn postgres() {
        let writer = PostgresSqlWriter { string_length: 255 };
        let schema = writer
            .build_schema(Depot::table_name(), Depot::fields())
            .expect("Failed to build the schema");
        assert_eq!(
            schema.create_sql,
            indoc! {r#"
                CREATE TABLE "depot" (
                "depot_num" BIGSERIAL,
                "region" VARCHAR(255) DEFAULT 'YYC',
                PRIMARY KEY ("depot_num")
                );
            "#}
            .trim()
        );
        assert_eq!(schema.sequences.len(), 1);
        assert_eq!(schema.sequences[0].start, Some(90000000));
        assert_eq!(
            writer.sequence_name("depot", "depot_num"),
            "depot_depot_num_seq"
        );
        assert_eq!(
            depot_insert(&writer),
            indoc! {r#"
                INSERT INTO "depot" ("depot_num", "region") VALUES
                (DEFAULT, DEFAULT) RETURNING "depot_num";
            "#}
            .trim()
        );

        let schema = writer
            .build_schema(Parcel::table_name(), Parcel::fields())
            .expect("Failed to build the schema");
        assert_eq!(
            schema.create_sql,
            indoc! {r#"
                CREATE TABLE "parcel" (
                "code" VARCHAR(255),
                "depot" BIGINT,
                "note" VARCHAR(255) NOT NULL,
                "barcode" VARCHAR(255) UNIQUE,
                PRIMARY KEY ("code")
                );
            "#}
            .trim()
        );
        assert_eq!(
            schema.foreign_keys,
            [ForeignKeySpec::new("parcel", "depot", "depot", "depot_num")]
        );
        let mut out = String::new();
        writer
            .write_create_foreign_key(&mut out, &schema.foreign_keys[0])
            .expect("Failed to write the foreign key");
        assert_eq!(
            out,
            r#"ALTER TABLE "parcel" ADD CONSTRAINT "fk_parcel_depot_depot_num" FOREIGN KEY ("depot") REFERENCES "depot" ("depot_num");"#
        );
        let mut out = String::new();
        writer.write_create_index(&mut out, "idx_depot", &schema.indexes["idx_depot"]);
        assert_eq!(out, r#"CREATE INDEX "idx_depot" ON "parcel" ("depot");"#);
    }

    #[test]
    fn mysql() {
        let writer = MySqlSqlWriter { string_length: 64 };
        let schema = writer
            .build_schema(Depot::table_name(), Depot::fields())
            .expect("Failed to build the schema");
        assert_eq!(
            schema.create_sql,
            indoc! {"
                CREATE TABLE `depot` (
                `depot_num` BIGINT AUTO_INCREMENT,
                `region` VARCHAR(64) DEFAULT 'YYC',
                PRIMARY KEY (`depot_num`)
                );
            "}
            .trim()
        );
        assert_eq!(
            depot_insert(&writer),
            indoc! {"
                INSERT INTO `depot` (`depot_num`, `region`) VALUES
                (DEFAULT, DEFAULT);
            "}
            .trim()
        );
        let mut out = String::new();
        writer.write_value(&mut out, &Value::Varchar(Some(r"it's C:\".into())));
        assert_eq!(out, r"'it''s C:\\'");
    }

    #[test]
    fn sqlite() {
        let writer = SqliteSqlWriter { string_length: 255 };
        let schema = writer
            .build_schema(Depot::table_name(), Depot::fields())
            .expect("Failed to build the schema");
        assert_eq!(
            schema.create_sql,
            indoc! {r#"
                CREATE TABLE "depot" (
                "depot_num" INTEGER PRIMARY KEY AUTOINCREMENT,
                "region" TEXT DEFAULT 'YYC'
                );
            "#}
            .trim()
        );
        assert_eq!(depot_insert(&writer), r#"INSERT INTO "depot" DEFAULT VALUES;"#);

        let schema = writer
            .build_schema(Parcel::table_name(), Parcel::fields())
            .expect("Failed to build the schema");
        assert_eq!(
            schema.create_sql,
            indoc! {r#"
                CREATE TABLE "parcel" (
                "code" TEXT,
                "depot" INTEGER,
                "note" TEXT NOT NULL,
                "barcode" TEXT UNIQUE,
                PRIMARY KEY ("code"),
                CONSTRAINT "fk_parcel_depot_depot_num" FOREIGN KEY ("depot") REFERENCES "depot" ("depot_num")
                );
            "#}
            .trim()
        );
        let mut out = String::new();
        assert!(
            writer
                .write_create_foreign_key(&mut out, &schema.foreign_keys[0])
                .is_err()
        );
        assert_eq!(
            writer.write_alter_add_columns("parcel", &[r#""a" TEXT"#, r#""b" INTEGER"#]),
            [
                r#"ALTER TABLE "parcel" ADD COLUMN "a" TEXT;"#,
                r#"ALTER TABLE "parcel" ADD COLUMN "b" INTEGER;"#,
            ]
        );
        let mut out = String::new();
        writer.write_exists_foreign_key_by_name(&mut out, "parcel", "fk_parcel_depot_depot_num");
        assert_eq!(
            out,
            indoc! {r#"
                SELECT COUNT(*) FROM sqlite_master
                WHERE type = 'table' AND name = 'parcel' AND instr(sql, '"fk_parcel_depot_depot_num"') > 0;
            "#}
            .trim()
        );
    }

    #[test]
    fn mssql() {
        let writer = MssqlSqlWriter { string_length: 255 };
        let schema = writer
            .build_schema(Depot::table_name(), Depot::fields())
            .expect("Failed to build the schema");
        assert_eq!(
            schema.create_sql,
            indoc! {"
                CREATE TABLE [depot] (
                [depot_num] BIGINT IDENTITY(90000000,1),
                [region] NVARCHAR(255) DEFAULT N'YYC',
                PRIMARY KEY ([depot_num])
                );
            "}
            .trim()
        );
        assert_eq!(
            depot_insert(&writer),
            indoc! {"
                INSERT INTO [depot] ([region]) OUTPUT INSERTED.[depot_num] VALUES
                (DEFAULT);
            "}
            .trim()
        );
        let mut out = String::new();
        writer.write_value(&mut out, &Value::Boolean(Some(true)));
        assert_eq!(out, "1");
    }

    #[test]
    fn hana() {
        let writer = HanaSqlWriter { string_length: 255 };
        let schema = writer
            .build_schema(Depot::table_name(), Depot::fields())
            .expect("Failed to build the schema");
        assert_eq!(
            schema.create_sql,
            indoc! {r#"
                CREATE COLUMN TABLE "depot" (
                "depot_num" BIGINT,
                "region" NVARCHAR(255) DEFAULT 'YYC',
                PRIMARY KEY ("depot_num")
                );
            "#}
            .trim()
        );
        assert_eq!(
            depot_insert(&writer),
            indoc! {r#"
                INSERT INTO "depot" ("depot_num") VALUES
                ("depot_depot_num_seq".NEXTVAL);
            "#}
            .trim()
        );
        let mut out = String::new();
        writer.write_next_sequence_value(&mut out, "depot_depot_num_seq");
        assert_eq!(out, r#"SELECT "depot_depot_num_seq".NEXTVAL FROM DUMMY;"#);
    }

    #[test]
    fn invalid_schemas() {
        #[derive(Entity)]
        struct TwoCounters {
            #[tabula("primary_key:inc")]
            a: i32,
            #[tabula("primary_key:inc")]
            b: i32,
        }
        #[derive(Entity)]
        struct CompositeCounter {
            #[tabula("primary_key:inc")]
            a: i32,
            #[tabula("primary_key")]
            b: i32,
        }
        #[derive(Entity)]
        struct StartWithoutCounter {
            #[tabula("primary_key;start:10")]
            a: i32,
        }
        let config = EngineConfig::default();
        for backend in tabula::BACKENDS {
            let writer = writer_for(backend, &config).expect("Unknown backend");
            assert!(
                writer
                    .build_schema(TwoCounters::table_name(), TwoCounters::fields())
                    .is_err()
            );
            assert!(
                writer
                    .build_schema(StartWithoutCounter::table_name(), StartWithoutCounter::fields())
                    .is_err()
            );
            assert!(writer.build_schema("", Depot::fields()).is_err());
            let composite =
                writer.build_schema(CompositeCounter::table_name(), CompositeCounter::fields());
            assert_eq!(composite.is_err(), writer.inline_increment_key(), "{backend}");
        }
        assert!(writer_for("oracle", &config).is_err());
        assert_eq!(
            writer_for("PostgreSQL", &config)
                .expect("Alias not recognized")
                .name(),
            "postgres"
        );
    }
}
