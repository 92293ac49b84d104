// src/query_builders/sql/select.rs
//! Paginated SELECT statements

use strum::{AsRefStr, Display};

use crate::pagination::PageCursor;
use crate::query_builders::filters::{BindValue, WhereClause};
use crate::query_builders::sql::Statement;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
pub enum SortOrder {
    #[strum(serialize = "ASC")]
    Asc,
    #[strum(serialize = "DESC")]
    Desc,
}

/// Builds `SELECT <columns> FROM <table> [WHERE ..] ORDER BY .. LIMIT $n OFFSET $n+1`.
///
/// LIMIT and OFFSET take the two placeholders that follow the filter
/// clause's own, and are bound after the filter values.
pub struct PagedSelect<'a> {
    table: &'static str,
    columns: &'static str,
    filter: &'a WhereClause,
    order_by: Option<(&'static str, SortOrder)>,
}

impl<'a> PagedSelect<'a> {
    pub fn new(table: &'static str, columns: &'static str, filter: &'a WhereClause) -> Self {
        Self {
            table,
            columns,
            filter,
            order_by: None,
        }
    }

    pub fn order_by(mut self, column: &'static str, order: SortOrder) -> Self {
        self.order_by = Some((column, order));
        self
    }

    pub fn build(&self, cursor: PageCursor) -> Statement {
        let mut sql = format!("SELECT {} FROM {}{}", self.columns, self.table, self.filter.sql);

        if let Some((column, order)) = self.order_by {
            sql.push_str(&format!(" ORDER BY {} {}", column, order));
        }

        let limit_index = self.filter.next_placeholder();
        sql.push_str(&format!(" LIMIT ${} OFFSET ${}", limit_index, limit_index + 1));

        let mut params = self.filter.params.clone();
        params.push(BindValue::Int(cursor.limit));
        params.push(BindValue::Int(cursor.offset()));

        Statement { sql, params }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_builders::filters::UserFilters;

    #[test]
    fn test_select_without_filters() {
        let filter = WhereClause::default();
        let statement = PagedSelect::new("users", "id, email", &filter)
            .order_by("created_at", SortOrder::Desc)
            .build(PageCursor { page: 1, limit: 10 });

        assert_eq!(
            statement.sql,
            "SELECT id, email FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        );
        assert_eq!(statement.params, vec![BindValue::Int(10), BindValue::Int(0)]);
    }

    #[test]
    fn test_limit_offset_follow_filter_placeholders() {
        let filter = UserFilters::from_raw(Some("Kano"), Some("Fagge"), None).where_clause();
        let statement = PagedSelect::new("users", "id", &filter)
            .build(PageCursor { page: 2, limit: 10 });

        assert_eq!(
            statement.sql,
            "SELECT id FROM users WHERE state = $1 AND lga = $2 LIMIT $3 OFFSET $4"
        );
        assert_eq!(statement.params.len(), 4);
        assert_eq!(statement.params[2], BindValue::Int(10));
        assert_eq!(statement.params[3], BindValue::Int(10));
    }

    #[test]
    fn test_sort_order_sql() {
        assert_eq!(SortOrder::Asc.to_string(), "ASC");
        assert_eq!(SortOrder::Desc.as_ref(), "DESC");
    }
}
