// src/event_handlers.rs - Public upcoming-events listing
use actix_web::{web, HttpResponse};
use chrono::Utc;
use std::sync::Arc;

use crate::models::{EventsFailureResponse, UpcomingEventsResponse, UPCOMING_EVENTS_LIMIT};
use crate::repositories::events;
use crate::AppState;

/// Next few events from now, earliest first. Failures keep the
/// `{success, message, error}` envelope; the raw cause is only echoed
/// outside production.
pub async fn get_upcoming_events(app_state: web::Data<Arc<AppState>>) -> HttpResponse {
    match events::fetch_upcoming_events(&app_state.db_pool, Utc::now(), UPCOMING_EVENTS_LIMIT).await {
        Ok(events) => HttpResponse::Ok().json(UpcomingEventsResponse {
            success: true,
            events,
        }),
        Err(err) => {
            log::error!("Error fetching upcoming events: {}", err);

            let error = if app_state.config.is_production() {
                "Internal server error".to_string()
            } else {
                err.to_string()
            };

            HttpResponse::InternalServerError().json(EventsFailureResponse {
                success: false,
                message: "Failed to fetch upcoming events".to_string(),
                error,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppMode;
    use crate::repositories::events::insert_event;
    use crate::routes::{configure, testing::*};
    use actix_web::{http::StatusCode, test, App};
    use chrono::Duration;
    use serde_json::Value;

    #[actix_rt::test]
    async fn test_upcoming_events_capped_and_ordered() {
        let state = app_state(AppMode::Development).await;
        let now = Utc::now();
        for days in [9, -3, 1, 4, 2] {
            insert_event(&state.db_pool, &format!("day {}", days), now + Duration::days(days)).await;
        }

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(configure),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/api/events").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], true);
        let titles: Vec<&str> = body["events"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["day 1", "day 2", "day 4"]);
    }

    #[actix_rt::test]
    async fn test_no_upcoming_events_is_success() {
        let state = app_state(AppMode::Development).await;
        insert_event(&state.db_pool, "gone", Utc::now() - Duration::days(1)).await;

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(configure),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/api/events").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, serde_json::json!({ "success": true, "events": [] }));
    }

    #[actix_rt::test]
    async fn test_failure_hides_cause_in_production() {
        let state = app_state(AppMode::Production).await;
        state.db_pool.close().await;

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(configure),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/api/events").to_request()).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Failed to fetch upcoming events");
        assert_eq!(body["error"], "Internal server error");
    }

    #[actix_rt::test]
    async fn test_failure_shows_cause_in_development() {
        let state = app_state(AppMode::Development).await;
        state.db_pool.close().await;

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(configure),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/api/events").to_request()).await;
        let body: Value = test::read_body_json(resp).await;
        assert_ne!(body["error"], "Internal server error");
        assert!(body["error"].as_str().unwrap().starts_with("Database Error"));
    }
}
