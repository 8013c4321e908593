use crate::{error::ConfigError, source::QuerySource};
use model::core::value::Value;
use query::ast::common::OrderDir;
use std::str::FromStr;

pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Normalized batch-scan configuration. Immutable for the lifetime of the
/// enumerator built from it.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub batch_size: usize,
    pub order: OrderDir,
    /// Ordering keys; the last one is always the source's primary key.
    pub keys: Vec<String>,
    pub load_eagerly: bool,
}

impl BatchConfig {
    pub fn builder() -> BatchConfigBuilder {
        BatchConfigBuilder::new()
    }
}

/// Collects raw, loosely typed inputs and normalizes them against a query
/// source. All validation happens in [`build`](Self::build), before any
/// iteration begins.
#[derive(Debug, Clone)]
pub struct BatchConfigBuilder {
    batch_size: Value,
    order: String,
    keys: Vec<String>,
    load_eagerly: bool,
}

impl BatchConfigBuilder {
    fn new() -> Self {
        BatchConfigBuilder {
            batch_size: Value::Int(DEFAULT_BATCH_SIZE as i64),
            order: OrderDir::Asc.to_string(),
            keys: Vec::new(),
            load_eagerly: false,
        }
    }

    pub fn batch_size(mut self, size: impl Into<Value>) -> Self {
        self.batch_size = size.into();
        self
    }

    /// Accepts `"asc"`/`"desc"` in any casing, or an [`OrderDir`] token.
    pub fn order(mut self, order: impl ToString) -> Self {
        self.order = order.to_string();
        self
    }

    /// Ordering keys, outermost first. When omitted, the source's primary
    /// key is used on its own.
    pub fn keys<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Materialize each page inside the enumerator instead of yielding
    /// deferred queries.
    pub fn load_eagerly(mut self, load: bool) -> Self {
        self.load_eagerly = load;
        self
    }

    pub fn build<S: QuerySource>(self, source: &S) -> Result<BatchConfig, ConfigError> {
        let batch_size = validate_batch_size(&self.batch_size)?;
        let order =
            OrderDir::from_str(&self.order).map_err(|()| ConfigError::Order(self.order.clone()))?;
        let keys = validate_keys(self.keys, source)?;

        Ok(BatchConfig {
            batch_size,
            order,
            keys,
            load_eagerly: self.load_eagerly,
        })
    }
}

/// Projection-scan configuration: a batch configuration plus the projected
/// column list and the precomputed position of each ordering key within it.
#[derive(Debug, Clone)]
pub struct ProjectionConfig {
    pub batch_size: usize,
    pub order: OrderDir,
    pub keys: Vec<String>,
    pub columns: Vec<String>,
    /// For each ordering key, its index into `columns`. Built once here so
    /// cursor derivation never searches the projection per page.
    pub key_indexes: Vec<usize>,
}

impl ProjectionConfig {
    /// Checked at construction, not at iteration time: every ordering key
    /// must be retrievable from the projected row.
    pub fn from_batch(batch: &BatchConfig, columns: Vec<String>) -> Result<Self, ConfigError> {
        let key_indexes = batch
            .keys
            .iter()
            .map(|key| {
                columns
                    .iter()
                    .position(|col| col.eq_ignore_ascii_case(key))
                    .ok_or_else(|| ConfigError::KeyNotProjected(key.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ProjectionConfig {
            batch_size: batch.batch_size,
            order: batch.order,
            keys: batch.keys.clone(),
            columns,
            key_indexes,
        })
    }
}

fn validate_batch_size(raw: &Value) -> Result<usize, ConfigError> {
    match raw {
        Value::Int(n) if *n > 0 => Ok(*n as usize),
        Value::Uint(n) if *n > 0 => Ok(*n as usize),
        // fractional floats, zero, negatives, nulls, strings: all rejected
        _ => Err(ConfigError::BatchSize(raw.clone())),
    }
}

fn validate_keys<S: QuerySource>(keys: Vec<String>, source: &S) -> Result<Vec<String>, ConfigError> {
    let primary_key = source.primary_key();

    let keys = if keys.is_empty() {
        vec![primary_key.clone()]
    } else {
        keys
    };

    // Any ordering without the primary key as final tie-breaker may contain
    // ties, and a tied cursor skips or repeats rows.
    if let Some(last) = keys.last()
        && !last.eq_ignore_ascii_case(&primary_key)
    {
        return Err(ConfigError::NonDeterministicOrder {
            last: last.clone(),
            primary_key,
        });
    }

    if let Some(selected) = source.selected_columns() {
        for key in &keys {
            if !selected.iter().any(|col| col.eq_ignore_ascii_case(key)) {
                return Err(ConfigError::KeyNotSelected(key.clone()));
            }
        }
    }

    Ok(keys)
}
