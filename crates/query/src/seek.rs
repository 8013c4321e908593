//! Composite seek predicate for keyset pagination.

use crate::{
    ast::{
        common::OrderDir,
        expr::{BinaryOperator, Expr},
    },
    ident, value,
};
use model::{core::value::Value, pagination::cursor::Cursor};

/// Builds the filter selecting rows ordered strictly after `cursor` under
/// the key sequence `keys` and direction `order`:
///
/// `(k1 ⋄ v1) OR (k1 = v1 AND k2 ⋄ v2) OR ... OR (k1 = v1 AND ... AND kn ⋄ vn)`
///
/// where `⋄` is `>` for ascending and `<` for descending order. This is
/// lexicographic comparison of the key tuple; independent per-column
/// inequalities would skip or repeat rows whose leading keys tie. A single
/// key degenerates to the plain scalar inequality.
///
/// `Null` cursor values pass through as `Value::Null`; how the store orders
/// nulls is the query source's concern.
pub fn seek_predicate(keys: &[String], cursor: &Cursor, order: OrderDir) -> Expr {
    let seek = order.seek_operator();
    let values = cursor.values();

    let mut branches = Vec::with_capacity(keys.len());
    for (pos, (key, val)) in keys.iter().zip(values).enumerate() {
        // kn ⋄ vn
        let mut branch = Expr::binary(ident(key), seek, value(val.clone()));

        // k1 = v1 AND ... AND k(n-1) = v(n-1), wrapped around the inequality
        for (eq_key, eq_val) in keys[..pos].iter().zip(values).rev() {
            let tie = Expr::binary(ident(eq_key), BinaryOperator::Eq, value(eq_val.clone()));
            branch = tie.and(branch);
        }

        branches.push(branch);
    }

    branches
        .into_iter()
        .reduce(Expr::or)
        // validation rejects empty key lists before a scan ever starts
        .unwrap_or_else(|| value(Value::Boolean(true)))
}
