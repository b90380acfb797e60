use crate::{Engine, Executor, IndexSpec, Result};

impl<E: Executor> Engine<E> {
    /// Columns keep the order of `spec.columns`.
    pub async fn create_index(&mut self, name: &str, spec: &IndexSpec) -> Result<()> {
        let mut sql = String::with_capacity(64 + spec.columns.len() * 16);
        self.writer.write_create_index(&mut sql, name, spec);
        self.execute(sql).await.map(|_| ())
    }

    pub async fn drop_index(&mut self, table: &str, name: &str) -> Result<()> {
        let mut sql = String::with_capacity(64);
        self.writer.write_drop_index(&mut sql, table, name);
        self.execute(sql).await.map(|_| ())
    }

    pub async fn exists_index(&mut self, table: &str, name: &str) -> Result<bool> {
        let mut sql = String::with_capacity(128);
        self.writer.write_exists_index(&mut sql, table, name);
        self.fetch_exists(sql).await
    }
}
