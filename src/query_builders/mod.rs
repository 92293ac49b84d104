// src/query_builders/mod.rs
//! Query builders for parameterized list queries

pub mod filters;
pub mod sql;

pub use filters::{build_where, BindValue, Predicate, UserFilters, WhereClause};
pub use sql::{count_statement, PagedSelect, SortOrder, Statement};

use crate::models::USER_COLUMNS;
use crate::pagination::PageCursor;

const USERS_TABLE: &str = "users";

/// The page query and its matching count query for one user-list request.
#[derive(Debug, Clone, PartialEq)]
pub struct UserPageQuery {
    pub select: Statement,
    pub count: Statement,
    pub cursor: PageCursor,
}

impl UserPageQuery {
    pub fn build(filters: &UserFilters, cursor: PageCursor) -> Self {
        let filter = filters.where_clause();

        let select = PagedSelect::new(USERS_TABLE, USER_COLUMNS, &filter)
            .order_by("created_at", SortOrder::Desc)
            .build(cursor);
        let count = count_statement(USERS_TABLE, &filter);

        Self { select, count, cursor }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_page_query_without_filters() {
        let query = UserPageQuery::build(&UserFilters::default(), PageCursor::default());

        assert_eq!(
            query.select.sql,
            format!(
                "SELECT {} FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2",
                USER_COLUMNS
            )
        );
        assert_eq!(query.select.params, vec![BindValue::Int(10), BindValue::Int(0)]);
        assert_eq!(query.count.sql, "SELECT COUNT(*) FROM users");
        assert!(query.count.params.is_empty());
    }

    #[test]
    fn test_user_page_query_with_filters() {
        let filters = UserFilters::from_raw(Some("Lagos"), Some("Ikeja"), Some("true"));
        let query = UserPageQuery::build(&filters, PageCursor { page: 2, limit: 10 });

        assert!(query
            .select
            .sql
            .ends_with(" WHERE state = $1 AND lga = $2 AND has_pvc = $3 ORDER BY created_at DESC LIMIT $4 OFFSET $5"));
        assert_eq!(query.select.params[3], BindValue::Int(10));
        assert_eq!(query.select.params[4], BindValue::Int(10));

        // Count query binds the same leading values, nothing else
        assert_eq!(query.count.params, query.select.params[..3].to_vec());
        assert_eq!(
            query.count.sql,
            "SELECT COUNT(*) FROM users WHERE state = $1 AND lga = $2 AND has_pvc = $3"
        );
    }

    #[test]
    fn test_projection_never_selects_password() {
        let query = UserPageQuery::build(&UserFilters::default(), PageCursor::default());
        assert!(!query.select.sql.contains('*'));
        assert!(!query.select.sql.contains("password"));
    }
}
