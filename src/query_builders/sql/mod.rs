// src/query_builders/sql/mod.rs
//! SQL statement builders

pub mod count;
pub mod select;

pub use count::count_statement;
pub use select::{PagedSelect, SortOrder};

use sqlx::query::{QueryAs, QueryScalar};
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{FromRow, Sqlite};

use crate::query_builders::filters::BindValue;

/// Statement text plus the values for its `$n` placeholders, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<BindValue>,
}

impl Statement {
    /// Prepares a row-mapping query with every parameter bound.
    pub fn query_as<'q, O>(&'q self) -> QueryAs<'q, Sqlite, O, SqliteArguments<'q>>
    where
        O: for<'r> FromRow<'r, SqliteRow>,
    {
        self.params
            .iter()
            .fold(sqlx::query_as::<Sqlite, O>(&self.sql), |query, param| match param {
                BindValue::Text(value) => query.bind(value.as_str()),
                BindValue::Bool(value) => query.bind(*value),
                BindValue::Int(value) => query.bind(*value),
            })
    }

    /// Prepares a single-column query with every parameter bound.
    pub fn query_scalar<'q, O>(&'q self) -> QueryScalar<'q, Sqlite, O, SqliteArguments<'q>>
    where
        (O,): for<'r> FromRow<'r, SqliteRow>,
    {
        self.params
            .iter()
            .fold(sqlx::query_scalar::<Sqlite, O>(&self.sql), |query, param| match param {
                BindValue::Text(value) => query.bind(value.as_str()),
                BindValue::Bool(value) => query.bind(*value),
                BindValue::Int(value) => query.bind(*value),
            })
    }
}
