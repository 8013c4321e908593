use crate::source::QuerySource;
use model::records::row::RowData;

/// One yielded step of a row-batch scan.
#[derive(Debug, Clone)]
pub enum BatchPage<S> {
    /// The bounded query describing this page, not yet executed. The caller
    /// decides if and when it runs.
    Deferred(S),
    /// Rows the enumerator already materialized.
    Loaded(Vec<RowData>),
}

impl<S: QuerySource> BatchPage<S> {
    /// Executes a deferred page; a loaded page hands back its rows as-is.
    pub async fn rows(self) -> Result<Vec<RowData>, S::Error> {
        match self {
            BatchPage::Deferred(source) => source.fetch_rows().await,
            BatchPage::Loaded(rows) => Ok(rows),
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, BatchPage::Loaded(_))
    }
}
