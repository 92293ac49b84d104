// src/user_handlers.rs - Admin-only user listing and creation
use actix_web::{web, HttpRequest, HttpResponse};
use std::sync::Arc;
use validator::Validate;

use crate::auth::AuthService;
use crate::error::{ApiError, ApiResult};
use crate::models::{CreateUserRequest, UserCreatedResponse};
use crate::pagination::PageCursor;
use crate::query_builders::{UserFilters, UserPageQuery};
use crate::repositories::users;
use crate::AppState;

const FETCH_USERS_FAILED: &str = "Failed to fetch users";
const CREATE_USER_FAILED: &str = "Failed to create user";

/// Raw listing parameters. Everything stays text so malformed values degrade
/// to defaults instead of rejecting the request.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct UserListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub state: Option<String>,
    pub lga: Option<String>,
    pub has_pvc: Option<String>,
}

impl UserListParams {
    /// Reads the recognised keys from a raw query string. When a key repeats,
    /// the first value wins; unknown keys are ignored.
    pub fn from_query_string(query: &str) -> ApiResult<Self> {
        let pairs = web::Query::<Vec<(String, String)>>::from_query(query)
            .map_err(|err| ApiError::BadRequest(format!("Invalid query parameters: {}", err)))?
            .into_inner();

        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "page" => &mut params.page,
                "limit" => &mut params.limit,
                "state" => &mut params.state,
                "lga" => &mut params.lga,
                "hasPVC" => &mut params.has_pvc,
                _ => continue,
            };
            slot.get_or_insert(value);
        }

        Ok(params)
    }
}

/// Logs the underlying failure and replaces it with a generic 500.
fn internal(context: &'static str) -> impl Fn(ApiError) -> ApiError {
    move |err| {
        log::error!("{}: {}", context, err);
        ApiError::InternalServerError(context.to_string())
    }
}

pub async fn get_users(
    app_state: web::Data<Arc<AppState>>,
    auth_service: web::Data<Arc<AuthService>>,
    http_request: HttpRequest,
) -> ApiResult<HttpResponse> {
    auth_service.require_admin(&http_request)?;

    let query = UserListParams::from_query_string(http_request.query_string())?;
    let cursor = PageCursor::from_raw(query.page.as_deref(), query.limit.as_deref());
    let filters = UserFilters::from_raw(
        query.state.as_deref(),
        query.lga.as_deref(),
        query.has_pvc.as_deref(),
    );

    let page_query = UserPageQuery::build(&filters, cursor);
    let response = users::fetch_user_page(&app_state.db_pool, &page_query)
        .await
        .map_err(internal(FETCH_USERS_FAILED))?;

    Ok(HttpResponse::Ok().json(response))
}

pub async fn create_user(
    app_state: web::Data<Arc<AppState>>,
    auth_service: web::Data<Arc<AuthService>>,
    body: web::Bytes,
    http_request: HttpRequest,
) -> ApiResult<HttpResponse> {
    // Nothing about the body is looked at until the caller is known to be an admin
    auth_service.require_admin(&http_request)?;

    let request: CreateUserRequest = serde_json::from_slice(&body)
        .map_err(|err| ApiError::BadRequest(format!("Invalid JSON body: {}", err)))?;
    let (_, email, password) = request.required_fields()?;
    request.validate()?;

    if users::email_exists(&app_state.db_pool, email)
        .await
        .map_err(internal(CREATE_USER_FAILED))?
    {
        return Err(ApiError::email_already_exists());
    }

    // bcrypt is CPU-bound; keep it off the async workers
    let password = password.to_string();
    let hasher = auth_service.get_ref().clone();
    let password_hash = web::block(move || hasher.hash_password(&password))
        .await
        .map_err(|err| internal(CREATE_USER_FAILED)(ApiError::from(err)))?
        .map_err(|err| internal(CREATE_USER_FAILED)(ApiError::InternalServerError(err.to_string())))?;

    let new_user = request.into_new_user(password_hash)?;
    let user = users::insert_user(&app_state.db_pool, &new_user)
        .await
        .map_err(|err| match err {
            ApiError::Conflict(_) => err,
            other => internal(CREATE_USER_FAILED)(other),
        })?;

    log::info!("User created: {} ({})", user.email, user.id);

    Ok(HttpResponse::Ok().json(UserCreatedResponse {
        message: "User created successfully".to_string(),
        user,
    }))
}
