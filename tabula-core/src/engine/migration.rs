use crate::{
    Engine, Error, Executor, ForeignKeySpec, IncrementStrategy, Result, SchemaBuild, TableRef,
};

impl<E: Executor> Engine<E> {
    pub async fn exists_table(&mut self, table: &str) -> Result<bool> {
        let mut sql = String::with_capacity(128);
        self.writer.write_exists_table(&mut sql, table);
        self.fetch_exists(sql).await
    }

    pub async fn exists_column(&mut self, table: &str, column: &str) -> Result<bool> {
        let mut sql = String::with_capacity(128);
        self.writer.write_exists_column(&mut sql, table, column);
        self.fetch_exists(sql).await
    }

    /// Schema of one table in this engine's dialect.
    pub fn build_schema(&self, table: &TableRef) -> Result<SchemaBuild> {
        self.writer
            .build_schema(table.name, table.fields)
            .inspect_err(|e| log::error!("{e:#}"))
    }

    /// Create the tables in order, together with their sequences, indexes and
    /// foreign keys.
    ///
    /// Foreign keys referencing a table that does not exist yet are returned,
    /// pass them to [`Engine::create_foreign_keys`] once that table exists.
    pub async fn create_tables(&mut self, tables: &[TableRef]) -> Result<Vec<ForeignKeySpec>> {
        let pending = self.create_tables_only(tables).await?;
        self.create_foreign_keys(pending).await
    }

    /// Tables, sequences and indexes, returns the foreign keys left to create.
    async fn create_tables_only(&mut self, tables: &[TableRef]) -> Result<Vec<ForeignKeySpec>> {
        let mut pending = Vec::new();
        for table in tables {
            let schema = self.build_schema(table)?;
            self.execute(schema.create_sql.clone()).await?;
            self.apply_sequences(&schema).await?;
            for (name, spec) in &schema.indexes {
                self.create_index(name, spec).await?;
            }
            if !self.writer.inline_foreign_keys() {
                pending.extend(schema.foreign_keys);
            }
        }
        Ok(pending)
    }

    /// Bring the counter of every incrementing key to its declared start.
    async fn apply_sequences(&mut self, schema: &SchemaBuild) -> Result<()> {
        let strategy = self.writer.increment_strategy();
        for sequence in &schema.sequences {
            let name = self
                .writer
                .sequence_name(&sequence.table, &sequence.field);
            match (strategy, sequence.start) {
                (IncrementStrategy::ManualSequence, start) => {
                    if !self.exists_sequence(&name).await? {
                        self.create_sequence(&name, start.unwrap_or(1)).await?;
                    } else if let Some(start) = start {
                        self.alter_sequence_start(&name, start).await?;
                    }
                }
                // Seeded by the column definition.
                (IncrementStrategy::Identity, _) => {}
                (_, Some(start)) => self.alter_sequence_start(&name, start).await?,
                (_, None) => {}
            }
        }
        Ok(())
    }

    /// Create the missing tables and add the missing columns, indexes and
    /// foreign keys of the existing ones. Nothing is ever removed.
    ///
    /// Foreign keys of both groups are created last, once every column exists.
    /// Returns the foreign keys still waiting for their referenced table.
    pub async fn alter_tables(&mut self, tables: &[TableRef]) -> Result<Vec<ForeignKeySpec>> {
        let mut create = Vec::new();
        let mut alter = Vec::new();
        for table in tables {
            if self.exists_table(table.name).await? {
                alter.push(*table);
            } else {
                create.push(*table);
            }
        }
        let mut pending = self.create_tables_only(&create).await?;
        for table in alter {
            let schema = self.build_schema(&table)?;
            let mut missing = Vec::new();
            for field in &schema.fields {
                if self
                    .exists_column(table.name, field.field.storage_name)
                    .await?
                {
                    continue;
                }
                if field.field.is_primary_key() {
                    let error = Error::msg(format!(
                        "Cannot add primary key column `{}` to existing table `{}`",
                        field.field.storage_name, table.name
                    ));
                    log::error!("{error:#}");
                    return Err(error);
                }
                let mut definition = field.definition.clone();
                if self.writer.inline_foreign_keys()
                    && let Some(spec) = schema
                        .foreign_keys
                        .iter()
                        .find(|v| v.from_field == field.field.storage_name)
                {
                    self.writer.write_column_references(&mut definition, spec);
                }
                missing.push(definition);
            }
            if !missing.is_empty() {
                let missing = missing.iter().map(String::as_str).collect::<Vec<_>>();
                for sql in self.writer.write_alter_add_columns(table.name, &missing) {
                    self.execute(sql).await?;
                }
            }
            for (name, spec) in &schema.indexes {
                if !self.exists_index(&spec.table, name).await? {
                    self.create_index(name, spec).await?;
                }
            }
            if !self.writer.inline_foreign_keys() {
                pending.extend(schema.foreign_keys);
                continue;
            }
            // Inline constraints cannot be added to a column that already exists.
            for spec in &schema.foreign_keys {
                if !self
                    .exists_foreign_key_by_name(&spec.from_table, &spec.name())
                    .await?
                {
                    let error = Error::msg(format!(
                        "Cannot add foreign key `{}` to existing column `{}` of `{}`, {} declares foreign keys only with the column",
                        spec.name(),
                        spec.from_field,
                        spec.from_table,
                        self.writer.name()
                    ));
                    log::error!("{error:#}");
                    return Err(error);
                }
            }
        }
        self.create_foreign_keys(pending).await
    }

    /// Drop the existing tables in reverse order, so that referencing tables go
    /// first. Standalone sequences are dropped with their table.
    pub async fn drop_tables(&mut self, tables: &[TableRef]) -> Result<()> {
        for table in tables.iter().rev() {
            if !self.exists_table(table.name).await? {
                continue;
            }
            let mut sql = String::with_capacity(64);
            self.writer.write_drop_table(&mut sql, table.name);
            self.execute(sql).await?;
            if self.writer.increment_strategy() == IncrementStrategy::ManualSequence {
                for field in table.fields.iter().filter(|f| f.is_increment()) {
                    let name = self.writer.sequence_name(table.name, field.storage_name);
                    if self.exists_sequence(&name).await? {
                        self.drop_sequence(&name).await?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Drop then create, every row is lost.
    pub async fn destructive_reset_tables(
        &mut self,
        tables: &[TableRef],
    ) -> Result<Vec<ForeignKeySpec>> {
        self.drop_tables(tables).await?;
        self.create_tables(tables).await
    }
}
