use crate::ast::expr::{Expr, Ident};
use model::core::value::Value;

pub mod ast;
pub mod seek;

pub fn ident(name: &str) -> Expr {
    Expr::Identifier(Ident {
        qualifier: None,
        name: name.to_string(),
    })
}

pub fn value(val: Value) -> Expr {
    Expr::Value(val)
}
