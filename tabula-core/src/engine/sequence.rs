use crate::{Engine, Error, Executor, Result};

/// Counters behind incrementing keys, named by [`SqlWriter::sequence_name`](crate::SqlWriter::sequence_name).
///
/// Backends without a sequence object emulate these on the table counter, so
/// `name` is the table name there.
impl<E: Executor> Engine<E> {
    pub async fn create_sequence(&mut self, name: &str, start: i64) -> Result<()> {
        let mut sql = String::with_capacity(64);
        self.writer.write_create_sequence(&mut sql, name, start);
        self.execute(sql).await.map(|_| ())
    }

    /// The next value handed out will be `start`.
    pub async fn alter_sequence_start(&mut self, name: &str, start: i64) -> Result<()> {
        let mut sql = String::with_capacity(64);
        self.writer.write_alter_sequence_start(&mut sql, name, start);
        self.execute(sql).await.map(|_| ())
    }

    pub async fn exists_sequence(&mut self, name: &str) -> Result<bool> {
        let mut sql = String::with_capacity(128);
        self.writer.write_exists_sequence(&mut sql, name);
        self.fetch_exists(sql).await
    }

    pub async fn drop_sequence(&mut self, name: &str) -> Result<()> {
        let mut sql = String::with_capacity(64);
        self.writer.write_drop_sequence(&mut sql, name);
        self.execute(sql).await.map(|_| ())
    }

    pub async fn next_sequence_value(&mut self, name: &str) -> Result<i64> {
        let mut sql = String::with_capacity(128);
        self.writer.write_next_sequence_value(&mut sql, name);
        self.fetch_integer(sql).await?.ok_or_else(|| {
            let error = Error::msg(format!("Sequence `{name}` returned no value"));
            log::error!("{error:#}");
            error
        })
    }
}
