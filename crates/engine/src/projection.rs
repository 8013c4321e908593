use crate::{
    config::{BatchConfig, BatchConfigBuilder, ProjectionConfig},
    error::ConfigError,
    source::QuerySource,
};
use model::{core::value::Value, pagination::cursor::Cursor};
use query::seek::seek_predicate;
use tracing::debug;

/// Walks a query source in fixed-size pages of projected scalar tuples.
///
/// Pages are always fetched eagerly (a projection has no identity to defer),
/// so the enumerator knows from each fetch whether anything was left, and an
/// empty source yields nothing at all.
pub struct ProjectionBatchEnumerator<S: QuerySource> {
    base: S,
    config: ProjectionConfig,
    cursor: Option<Cursor>,
    done: bool,
}

impl<S: QuerySource> ProjectionBatchEnumerator<S> {
    pub fn new(
        source: S,
        config: BatchConfigBuilder,
        columns: Vec<String>,
    ) -> Result<Self, ConfigError> {
        let batch = config.build(&source)?;
        Self::from_batch(source, &batch, columns)
    }

    pub(crate) fn from_batch(
        source: S,
        batch: &BatchConfig,
        columns: Vec<String>,
    ) -> Result<Self, ConfigError> {
        let config = ProjectionConfig::from_batch(batch, columns)?;
        let base = source
            .disable_result_caching()
            .order_by(&config.keys, config.order)
            .limit(config.batch_size);

        Ok(ProjectionBatchEnumerator {
            base,
            config,
            cursor: None,
            done: false,
        })
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// The next page of projected rows, or `None` once the source is
    /// exhausted. Unlike the deferred row mode, a page is only yielded when
    /// the fetch returned rows.
    pub async fn next_page(&mut self) -> Result<Option<Vec<Vec<Value>>>, S::Error> {
        if self.done {
            return Ok(None);
        }

        let current = match &self.cursor {
            Some(cursor) => self
                .base
                .filter(seek_predicate(&self.config.keys, cursor, self.config.order)),
            None => self.base.clone(),
        };
        let rows = current.fetch_projected(&self.config.columns).await?;

        if rows.is_empty() {
            debug!("source exhausted");
            self.done = true;
            return Ok(None);
        }

        if rows.len() < self.config.batch_size {
            // A short page proves no further rows exist.
            self.done = true;
        } else if let Some(last) = rows.last() {
            // Key values are already in the projected row; no probe needed.
            self.cursor = Some(Cursor::from_projected(last, &self.config.key_indexes));
        }

        debug!("projected page of {} rows", rows.len());
        Ok(Some(rows))
    }

    /// Feeds every projected row of the scan to `f`.
    pub async fn each_row<F>(mut self, mut f: F) -> Result<(), S::Error>
    where
        F: FnMut(Vec<Value>),
    {
        while let Some(page) = self.next_page().await? {
            for row in page {
                f(row);
            }
        }
        Ok(())
    }
}
