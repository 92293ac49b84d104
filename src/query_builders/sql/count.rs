// src/query_builders/sql/count.rs
//! COUNT statements that mirror a paginated SELECT's filter

use crate::query_builders::filters::WhereClause;
use crate::query_builders::sql::Statement;

/// `SELECT COUNT(*) FROM <table>` with exactly the same WHERE clause and
/// leading parameters as the page query it accompanies, minus LIMIT/OFFSET.
pub fn count_statement(table: &'static str, filter: &WhereClause) -> Statement {
    Statement {
        sql: format!("SELECT COUNT(*) FROM {}{}", table, filter.sql),
        params: filter.params.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_builders::filters::{BindValue, UserFilters};

    #[test]
    fn test_count_without_conditions() {
        let statement = count_statement("users", &WhereClause::default());
        assert_eq!(statement.sql, "SELECT COUNT(*) FROM users");
        assert!(!statement.sql.contains("WHERE"));
        assert!(statement.params.is_empty());
    }

    #[test]
    fn test_count_reuses_clause_and_params() {
        let filter = UserFilters::from_raw(Some("Oyo"), None, Some("true")).where_clause();
        let statement = count_statement("users", &filter);

        assert_eq!(statement.sql, "SELECT COUNT(*) FROM users WHERE state = $1 AND has_pvc = $2");
        assert_eq!(
            statement.params,
            vec![BindValue::Text("Oyo".into()), BindValue::Bool(true)]
        );
        assert!(!statement.sql.contains("LIMIT"));
    }
}
