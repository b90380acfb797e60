#[cfg(test)]
mod tests {
    use std::{path::Path, sync::Mutex};
    use tabula_sqlite::SqliteConnection;
    use tabula_tests::{execute_tests, init_logs, silent_logs};
    use tokio::fs;

    static MUTEX: Mutex<()> = Mutex::new(());

    #[tokio::test]
    async fn sqlite() {
        init_logs();
        const DB_PATH: &'static str = "../target/debug/tests.sqlite";
        let _guard = MUTEX.lock().unwrap();
        if Path::new(DB_PATH).exists() {
            fs::remove_file(DB_PATH).await.expect(
                format!("Failed to remove existing test database file {}", DB_PATH).as_str(),
            );
        }
        let connection = SqliteConnection::connect(format!("sqlite://{}?mode=rwc", DB_PATH))
            .await
            .expect("Could not open the database");
        assert!(
            Path::new(DB_PATH).exists(),
            "Database file should be created after connection"
        );
        execute_tests(connection).await;
    }

    #[tokio::test]
    async fn wrong_url() {
        silent_logs! {
            assert!(
                SqliteConnection::connect("postgres://localhost/db")
                    .await
                    .is_err()
            );
        };
    }

    #[tokio::test]
    async fn read_only_missing_file() {
        const DB_PATH: &'static str = "../target/debug/missing.sqlite";
        let _guard = MUTEX.lock().unwrap();
        if Path::new(DB_PATH).exists() {
            fs::remove_file(DB_PATH)
                .await
                .expect("Failed to remove the database file");
        }
        silent_logs! {
            assert!(
                SqliteConnection::connect(format!("sqlite://{}?mode=ro", DB_PATH))
                    .await
                    .is_err(),
                "Should not be able to open in read only a database that does not exist"
            );
        };
    }
}
