use crate::{Engine, Executor, ForeignKeySpec, Result, foreign_key_name};

impl<E: Executor> Engine<E> {
    /// Add the constraint `fk_<from_table>_<ref_table>_<ref_field>`.
    pub async fn create_foreign_key(
        &mut self,
        from_table: &str,
        ref_table: &str,
        from_field: &str,
        ref_field: &str,
    ) -> Result<()> {
        let spec = ForeignKeySpec::new(from_table, from_field, ref_table, ref_field);
        let mut sql = String::with_capacity(128);
        self.writer
            .write_create_foreign_key(&mut sql, &spec)
            .inspect_err(|e| log::error!("{e:#}"))?;
        self.execute(sql).await.map(|_| ())
    }

    pub async fn drop_foreign_key(
        &mut self,
        from_table: &str,
        ref_table: &str,
        ref_field: &str,
    ) -> Result<()> {
        let name = foreign_key_name(from_table, ref_table, ref_field);
        let mut sql = String::with_capacity(128);
        self.writer
            .write_drop_foreign_key(&mut sql, from_table, &name)
            .inspect_err(|e| log::error!("{e:#}"))?;
        self.execute(sql).await.map(|_| ())
    }

    pub async fn exists_foreign_key_by_name(&mut self, table: &str, name: &str) -> Result<bool> {
        let mut sql = String::with_capacity(128);
        self.writer
            .write_exists_foreign_key_by_name(&mut sql, table, name);
        self.fetch_exists(sql).await
    }

    /// Matches any constraint linking these columns, whatever its name.
    pub async fn exists_foreign_key_by_fields(
        &mut self,
        from_table: &str,
        ref_table: &str,
        from_field: &str,
        ref_field: &str,
    ) -> Result<bool> {
        let spec = ForeignKeySpec::new(from_table, from_field, ref_table, ref_field);
        let mut sql = String::with_capacity(256);
        self.writer
            .write_exists_foreign_key_by_fields(&mut sql, &spec);
        self.fetch_exists(sql).await
    }

    /// Create the pending foreign keys whose referenced table exists.
    ///
    /// The others are logged and returned, a failure creating a foreign key
    /// between two existing tables is an error.
    pub async fn create_foreign_keys(
        &mut self,
        pending: Vec<ForeignKeySpec>,
    ) -> Result<Vec<ForeignKeySpec>> {
        let mut deferred = Vec::new();
        for spec in pending {
            if !self.exists_table(&spec.ref_table).await? {
                log::warn!(
                    "Foreign key `{}` deferred, table `{}` does not exist yet",
                    spec.name(),
                    spec.ref_table
                );
                deferred.push(spec);
                continue;
            }
            if self
                .exists_foreign_key_by_name(&spec.from_table, &spec.name())
                .await?
            {
                continue;
            }
            self.create_foreign_key(
                &spec.from_table,
                &spec.ref_table,
                &spec.from_field,
                &spec.ref_field,
            )
            .await?;
        }
        Ok(deferred)
    }
}
