use crate::ast::expr::BinaryOperator;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Direction applied to every ordering key of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderDir {
    Asc,
    Desc,
}

impl OrderDir {
    /// The per-key comparison selecting rows strictly after a cursor value
    /// in this direction.
    pub fn seek_operator(self) -> BinaryOperator {
        match self {
            OrderDir::Asc => BinaryOperator::Gt,
            OrderDir::Desc => BinaryOperator::Lt,
        }
    }
}

impl FromStr for OrderDir {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(OrderDir::Asc),
            "desc" => Ok(OrderDir::Desc),
            _ => Err(()),
        }
    }
}

impl fmt::Display for OrderDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderDir::Asc => write!(f, "asc"),
            OrderDir::Desc => write!(f, "desc"),
        }
    }
}
