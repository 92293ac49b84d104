// src/query_builders/filters/mod.rs
//! Equality filters for list endpoints.
//!
//! Values are only ever bound as parameters; column names come from
//! `&'static str` constants, so nothing caller-supplied reaches the SQL text.

/// A value bound to a positional placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Text(String),
    Bool(bool),
    Int(i64),
}

/// `column = $n` for some placeholder index assigned at fold time.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub column: &'static str,
    pub value: BindValue,
}

impl Predicate {
    pub fn eq(column: &'static str, value: BindValue) -> Self {
        Self { column, value }
    }
}

/// A rendered WHERE clause plus the parameters its placeholders refer to.
///
/// `sql` is either empty or starts with `" WHERE "`, so it can be appended
/// to any base statement unchanged.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WhereClause {
    pub sql: String,
    pub params: Vec<BindValue>,
}

impl WhereClause {
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Index of the first placeholder after this clause's own.
    pub fn next_placeholder(&self) -> usize {
        self.params.len() + 1
    }
}

/// Folds predicates into a clause, numbering placeholders `$1..=$n` in order.
pub fn build_where(predicates: Vec<Predicate>) -> WhereClause {
    let (conditions, params) = predicates.into_iter().enumerate().fold(
        (Vec::new(), Vec::new()),
        |(mut conditions, mut params), (index, predicate)| {
            conditions.push(format!("{} = ${}", predicate.column, index + 1));
            params.push(predicate.value);
            (conditions, params)
        },
    );

    if conditions.is_empty() {
        return WhereClause::default();
    }

    WhereClause {
        sql: format!(" WHERE {}", conditions.join(" AND ")),
        params,
    }
}

// ==================== USER FILTERS ====================

const STATE_COLUMN: &str = "state";
const LGA_COLUMN: &str = "lga";
const HAS_PVC_COLUMN: &str = "has_pvc";

/// Recognised filters for the user listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilters {
    pub state: Option<String>,
    pub lga: Option<String>,
    pub has_pvc: Option<bool>,
}

impl UserFilters {
    /// Empty `state`/`lga` impose no constraint. A present `hasPVC` is true
    /// only for the exact token `"true"`; every other string means false.
    pub fn from_raw(state: Option<&str>, lga: Option<&str>, has_pvc: Option<&str>) -> Self {
        let non_empty = |value: Option<&str>| value.filter(|v| !v.is_empty()).map(str::to_string);

        Self {
            state: non_empty(state),
            lga: non_empty(lga),
            has_pvc: has_pvc.map(|value| value == "true"),
        }
    }

    /// Predicates in the fixed order state, lga, has_pvc.
    pub fn predicates(&self) -> Vec<Predicate> {
        let candidates = [
            self.state
                .as_ref()
                .map(|state| Predicate::eq(STATE_COLUMN, BindValue::Text(state.clone()))),
            self.lga
                .as_ref()
                .map(|lga| Predicate::eq(LGA_COLUMN, BindValue::Text(lga.clone()))),
            self.has_pvc
                .map(|has_pvc| Predicate::eq(HAS_PVC_COLUMN, BindValue::Bool(has_pvc))),
        ];

        candidates.into_iter().flatten().collect()
    }

    pub fn where_clause(&self) -> WhereClause {
        build_where(self.predicates())
    }
}
