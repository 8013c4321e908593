use model::core::value::Value;
use thiserror::Error;

/// Rejected pagination configuration.
///
/// Raised synchronously at enumerator construction, never mid-scan; fix the
/// configuration and construct a fresh enumerator. Failures coming out of
/// the query source itself are not represented here; they propagate from
/// the fetch exactly as the source raised them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("batch size must be a positive integer, got {0}")]
    BatchSize(Value),

    #[error("order must be 'asc' or 'desc', got '{0}'")]
    Order(String),

    #[error(
        "ordering is not deterministic: the primary key '{primary_key}' must be the final ordering key, got '{last}'"
    )]
    NonDeterministicOrder { last: String, primary_key: String },

    #[error("ordering key '{0}' is not among the columns selected by the source")]
    KeyNotSelected(String),

    #[error("ordering key '{0}' is missing from the projected columns")]
    KeyNotProjected(String),
}
