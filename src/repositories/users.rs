// src/repositories/users.rs
use sqlx::SqlitePool;

use crate::error::{ApiError, ApiResult};
use crate::models::{NewUser, User, UserListResponse, USER_COLUMNS};
use crate::pagination::PaginationMeta;
use crate::query_builders::UserPageQuery;

pub async fn email_exists(pool: &SqlitePool, email: &str) -> ApiResult<bool> {
    let existing: Option<(String,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    Ok(existing.is_some())
}

/// Inserts the user and returns the stored row without its password.
///
/// A duplicate email that slipped past [`email_exists`] (two concurrent
/// creations) is caught by the UNIQUE constraint and reported as a conflict.
pub async fn insert_user(pool: &SqlitePool, user: &NewUser) -> ApiResult<User> {
    let sql = format!(
        "INSERT INTO users (id, full_name, email, phone, password, state, lga, ward, has_pvc, role, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
         RETURNING {}",
        USER_COLUMNS
    );

    sqlx::query_as::<_, User>(&sql)
        .bind(&user.id)
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.password_hash)
        .bind(&user.state)
        .bind(&user.lga)
        .bind(&user.ward)
        .bind(user.has_pvc)
        .bind(&user.role)
        .bind(user.created_at)
        .fetch_one(pool)
        .await
        .map_err(ApiError::from)
        .map_err(|err| {
            if err.is_unique_violation() {
                ApiError::email_already_exists()
            } else {
                err
            }
        })
}

/// Runs the page query and its count query. Either failing fails the whole call.
pub async fn fetch_user_page(pool: &SqlitePool, query: &UserPageQuery) -> ApiResult<UserListResponse> {
    let users: Vec<User> = query.select.query_as::<User>().fetch_all(pool).await?;
    let total: i64 = query.count.query_scalar::<i64>().fetch_one(pool).await?;

    Ok(UserListResponse {
        users,
        pagination: PaginationMeta::new(total, query.cursor),
    })
}

#[cfg(test)]
pub async fn count_users(pool: &SqlitePool) -> ApiResult<i64> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    Ok(total)
}
