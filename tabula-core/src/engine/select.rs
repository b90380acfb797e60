use crate::{
    AsValue, Directives, Engine, Entity, Executor, Predicate, Result, Selection, writer::Context,
};
use anyhow::Context as _;

impl<E: Executor> Engine<E> {
    /// Run a dynamic query over the table of `T`.
    ///
    /// Predicates are joined in order, by `AND` unless they ask otherwise. With
    /// `count` set the number of matching rows is returned and ordering and
    /// paging are ignored.
    pub async fn select_entities<T: Entity>(
        &mut self,
        predicates: &[Predicate],
        directives: &Directives,
    ) -> Result<Selection<T>> {
        let table = T::table_ref();
        let mut context = Context::new();
        let mut sql = String::with_capacity(256);
        self.writer
            .write_select(&mut context, &mut sql, &table, predicates, directives)
            .inspect_err(|e| log::error!("{e:#}"))?;
        let query = context.into_query(sql);
        if directives.count {
            let row = self.fetch_one(query).await?;
            let count = match row.as_ref().and_then(|v| v.values.first()) {
                Some(v) if !v.is_null() => u64::try_from_value(v.clone())
                    .with_context(|| format!("While counting the rows of `{}`", table.name))?,
                _ => 0,
            };
            return Ok(Selection::Count(count));
        }
        let rows = self.fetch_all(query).await?;
        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            let mut entity = T::zeroed();
            entity
                .load(&row)
                .with_context(|| format!("While reading a row of `{}`", table.name))
                .inspect_err(|e| log::error!("{e:#}"))?;
            result.push(entity);
        }
        Ok(Selection::Entities(result))
    }

    /// The entities matching the predicates.
    pub async fn entities<T: Entity>(
        &mut self,
        predicates: &[Predicate],
        directives: &Directives,
    ) -> Result<Vec<T>> {
        let directives = Directives {
            count: false,
            ..directives.clone()
        };
        match self.select_entities(predicates, &directives).await? {
            Selection::Entities(v) => Ok(v),
            Selection::Count(..) => Ok(Vec::new()),
        }
    }

    /// The number of rows matching the predicates.
    pub async fn count<T: Entity>(&mut self, predicates: &[Predicate]) -> Result<u64> {
        let directives = Directives::new().count();
        match self.select_entities::<T>(predicates, &directives).await? {
            Selection::Count(v) => Ok(v),
            Selection::Entities(v) => Ok(v.len() as u64),
        }
    }
}
