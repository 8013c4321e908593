use crate::{
    config::{BatchConfig, BatchConfigBuilder},
    error::ConfigError,
    page::BatchPage,
    projection::ProjectionBatchEnumerator,
    source::QuerySource,
};
use model::{pagination::cursor::Cursor, records::row::RowData};
use query::seek::seek_predicate;
use tracing::debug;

/// Walks a query source in fixed-size pages ordered by the configured keys,
/// filtering each page to rows strictly after the previous page's last row.
///
/// The sequence is finite and not restartable; construct a fresh enumerator
/// to scan again from the start.
pub struct RowBatchEnumerator<S: QuerySource> {
    source: S,
    /// Ordered, bounded, cache-disabled scope every page derives from.
    base: S,
    config: BatchConfig,
    /// Filter anchor for the next page; `None` until the first advance.
    cursor: Option<Cursor>,
    /// Most recently yielded deferred page, still awaiting its cursor probe.
    pending_probe: Option<S>,
    done: bool,
}

impl<S: QuerySource> RowBatchEnumerator<S> {
    pub fn new(source: S, config: BatchConfigBuilder) -> Result<Self, ConfigError> {
        let config = config.build(&source)?;
        let base = source
            .disable_result_caching()
            .order_by(&config.keys, config.order)
            .limit(config.batch_size);

        Ok(RowBatchEnumerator {
            source,
            base,
            config,
            cursor: None,
            pending_probe: None,
            done: false,
        })
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// The next page of the scan, or `None` once the source is exhausted.
    pub async fn next_page(&mut self) -> Result<Option<BatchPage<S>>, S::Error> {
        if self.done {
            return Ok(None);
        }

        if self.config.load_eagerly {
            self.next_loaded().await
        } else {
            self.next_deferred().await
        }
    }

    /// Feeds every record of the scan to `f`, executing deferred pages.
    pub async fn each_record<F>(mut self, mut f: F) -> Result<(), S::Error>
    where
        F: FnMut(RowData),
    {
        while let Some(page) = self.next_page().await? {
            for row in page.rows().await? {
                f(row);
            }
        }
        Ok(())
    }

    /// A projection-batch enumerator over the same base source, ordering,
    /// and batch size, restricted to `columns`.
    pub fn project_columns<I, C>(
        &self,
        columns: I,
    ) -> Result<ProjectionBatchEnumerator<S>, ConfigError>
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        let columns = columns.into_iter().map(Into::into).collect();
        ProjectionBatchEnumerator::from_batch(self.source.clone(), &self.config, columns)
    }

    async fn next_loaded(&mut self) -> Result<Option<BatchPage<S>>, S::Error> {
        let rows = self.current().fetch_rows().await?;

        if rows.is_empty() {
            debug!("source exhausted");
            self.done = true;
            return Ok(None);
        }

        if rows.len() < self.config.batch_size {
            // A short page proves no further rows exist.
            self.done = true;
        } else if let Some(last) = rows.last() {
            // Stored key values of the in-memory last row; no extra query.
            self.cursor = Some(Cursor::from_row(last, &self.config.keys));
        }

        debug!("materialized page of {} rows", rows.len());
        Ok(Some(BatchPage::Loaded(rows)))
    }

    async fn next_deferred(&mut self) -> Result<Option<BatchPage<S>>, S::Error> {
        if let Some(previous) = self.pending_probe.take() {
            match self.probe_cursor(&previous).await? {
                Some(cursor) => self.cursor = Some(cursor),
                None => {
                    // The previous page held fewer than batch_size rows, so
                    // it was the final one with data.
                    debug!("cursor probe found no tail row, stopping");
                    self.done = true;
                    return Ok(None);
                }
            }
        }

        // The page goes out unexecuted; whether it holds rows is unknown
        // until a query runs, and this path runs none.
        let page = self.current();
        self.pending_probe = Some(page.clone());
        Ok(Some(BatchPage::Deferred(page)))
    }

    /// Reads the ordering-key values at the tail position of `page`, the
    /// lightweight probe that stands in for materializing the page.
    async fn probe_cursor(&self, page: &S) -> Result<Option<Cursor>, S::Error> {
        let tail = page
            .offset(self.config.batch_size - 1)
            .limit(1)
            .fetch_projected(&self.config.keys)
            .await?;

        Ok(tail.into_iter().next().map(Cursor::new))
    }

    fn current(&self) -> S {
        match &self.cursor {
            Some(cursor) => self
                .base
                .filter(seek_predicate(&self.config.keys, cursor, self.config.order)),
            None => self.base.clone(),
        }
    }
}
