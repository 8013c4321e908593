use crate::source::QuerySource;
use async_trait::async_trait;
use model::{
    core::value::Value,
    records::row::{FieldValue, RowData},
};
use query::ast::{
    common::OrderDir,
    expr::{BinaryOperator, Expr},
};
use std::{
    cmp::Ordering,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering as AtomicOrdering},
    },
};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("memory source failure: {0}")]
pub struct MemoryError(pub String);

/// In-memory stand-in for a real store. Interprets filter predicates over
/// its rows, sorts with `Value::compare`, and counts executed fetches so
/// tests can prove which queries actually ran.
#[derive(Clone, Debug)]
pub struct MemorySource {
    rows: Arc<Vec<RowData>>,
    primary_key: String,
    selected: Option<Vec<String>>,
    filter: Option<Expr>,
    order: Option<(Vec<String>, OrderDir)>,
    limit: Option<usize>,
    offset: usize,
    fetches: Arc<AtomicUsize>,
    /// Fail every fetch once this many have executed.
    fail_after: Option<usize>,
}

impl MemorySource {
    pub fn new(rows: Vec<RowData>) -> Self {
        MemorySource {
            rows: Arc::new(rows),
            primary_key: "id".to_string(),
            selected: None,
            filter: None,
            order: None,
            limit: None,
            offset: 0,
            fetches: Arc::new(AtomicUsize::new(0)),
            fail_after: None,
        }
    }

    pub fn with_selected(mut self, columns: &[&str]) -> Self {
        self.selected = Some(columns.iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn fail_after(mut self, fetches: usize) -> Self {
        self.fail_after = Some(fetches);
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(AtomicOrdering::SeqCst)
    }

    fn record_fetch(&self) -> Result<(), MemoryError> {
        let count = self.fetches.fetch_add(1, AtomicOrdering::SeqCst);
        if let Some(limit) = self.fail_after
            && count >= limit
        {
            return Err(MemoryError(format!("injected failure on fetch {count}")));
        }
        Ok(())
    }

    fn run_query(&self) -> Vec<RowData> {
        let mut rows: Vec<RowData> = self
            .rows
            .iter()
            .filter(|row| match &self.filter {
                Some(predicate) => truthy(&eval(row, predicate)),
                None => true,
            })
            .cloned()
            .collect();

        if let Some((keys, direction)) = &self.order {
            rows.sort_by(|a, b| {
                for key in keys {
                    let ord = a
                        .get_value(key)
                        .compare(&b.get_value(key))
                        .unwrap_or(Ordering::Equal);
                    let ord = match direction {
                        OrderDir::Asc => ord,
                        OrderDir::Desc => ord.reverse(),
                    };
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                Ordering::Equal
            });
        }

        rows.into_iter()
            .skip(self.offset)
            .take(self.limit.unwrap_or(usize::MAX))
            .collect()
    }
}

#[async_trait]
impl QuerySource for MemorySource {
    type Error = MemoryError;

    fn filter(&self, predicate: Expr) -> Self {
        let mut next = self.clone();
        next.filter = Some(match next.filter.take() {
            Some(existing) => existing.and(predicate),
            None => predicate,
        });
        next
    }

    fn order_by(&self, keys: &[String], direction: OrderDir) -> Self {
        let mut next = self.clone();
        next.order = Some((keys.to_vec(), direction));
        next
    }

    fn limit(&self, n: usize) -> Self {
        let mut next = self.clone();
        next.limit = Some(n);
        next
    }

    fn offset(&self, n: usize) -> Self {
        let mut next = self.clone();
        next.offset = n;
        next
    }

    fn disable_result_caching(&self) -> Self {
        // nothing is ever cached here
        self.clone()
    }

    async fn fetch_rows(&self) -> Result<Vec<RowData>, MemoryError> {
        self.record_fetch()?;
        Ok(self.run_query())
    }

    async fn fetch_projected(&self, columns: &[String]) -> Result<Vec<Vec<Value>>, MemoryError> {
        self.record_fetch()?;
        Ok(self
            .run_query()
            .iter()
            .map(|row| columns.iter().map(|col| row.get_value(col)).collect())
            .collect())
    }

    fn primary_key(&self) -> String {
        self.primary_key.clone()
    }

    fn selected_columns(&self) -> Option<Vec<String>> {
        self.selected.clone()
    }
}

fn truthy(value: &Value) -> bool {
    matches!(value, Value::Boolean(true))
}

fn eval(row: &RowData, expr: &Expr) -> Value {
    match expr {
        Expr::Identifier(id) => row.get_value(&id.name),
        Expr::Value(v) => v.clone(),
        Expr::BinaryOp(op) => {
            let left = eval(row, &op.left);
            let right = eval(row, &op.right);
            let result = match op.op {
                BinaryOperator::Eq => left.equal(&right),
                BinaryOperator::Gt => left.compare(&right) == Some(Ordering::Greater),
                BinaryOperator::Lt => left.compare(&right) == Some(Ordering::Less),
                BinaryOperator::And => truthy(&left) && truthy(&right),
                BinaryOperator::Or => truthy(&left) || truthy(&right),
            };
            Value::Boolean(result)
        }
    }
}

/// `n` rows of `{id, name}` with ids `1..=n`.
pub fn users(n: usize) -> Vec<RowData> {
    (1..=n as i64)
        .map(|id| {
            RowData::new(
                "users",
                vec![
                    FieldValue::new("id", Value::Int(id)),
                    FieldValue::new("name", Value::String(format!("user{id}"))),
                ],
            )
        })
        .collect()
}

/// Rows of `{enabled_at, id}` where `enabled_at` carries duplicates, so
/// ordering by it alone would tie.
pub fn events(enabled_ats: &[i64]) -> Vec<RowData> {
    enabled_ats
        .iter()
        .enumerate()
        .map(|(idx, &at)| {
            RowData::new(
                "events",
                vec![
                    FieldValue::new("enabled_at", Value::Int(at)),
                    FieldValue::new("id", Value::Int(idx as i64 + 1)),
                ],
            )
        })
        .collect()
}

pub fn ids_of(rows: &[RowData]) -> Vec<i64> {
    rows.iter()
        .map(|row| match row.get_value("id") {
            Value::Int(id) => id,
            other => panic!("unexpected id value: {other:?}"),
        })
        .collect()
}

pub fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
