use async_trait::async_trait;
use model::{core::value::Value, records::row::RowData};
use query::ast::{common::OrderDir, expr::Expr};

/// An ordered, filterable provider of rows, the one capability the batch
/// enumerators consume.
///
/// The composition methods are pure: each returns a new source describing
/// the narrowed query, and nothing executes until one of the fetch methods
/// runs. Implementations decide what a predicate or an ordering means for
/// their store; the enumerators only ever hand over [`Expr`] trees built
/// from the configured ordering keys.
#[async_trait]
pub trait QuerySource: Clone + Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Restricts the source to rows matching `predicate`, AND-ed onto any
    /// restriction already in place.
    fn filter(&self, predicate: Expr) -> Self;

    fn order_by(&self, keys: &[String], direction: OrderDir) -> Self;

    fn limit(&self, n: usize) -> Self;

    /// Skips `n` rows of the current ordering. Used only for the
    /// single-row cursor probe.
    fn offset(&self, n: usize) -> Self;

    /// Returns a source whose fetches always see live rows. A cached result
    /// would feed the cursor probe rows from a previous page.
    fn disable_result_caching(&self) -> Self;

    async fn fetch_rows(&self) -> Result<Vec<RowData>, Self::Error>;

    /// Fetches only `columns`, as one scalar tuple per row, in column order.
    async fn fetch_projected(&self, columns: &[String]) -> Result<Vec<Vec<Value>>, Self::Error>;

    fn primary_key(&self) -> String;

    /// The columns this source is already restricted to returning, if it
    /// restricts any. `None` means all columns come back.
    fn selected_columns(&self) -> Option<Vec<String>>;
}
