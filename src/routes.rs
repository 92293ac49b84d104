// src/routes.rs - Route table shared by the server and handler tests
use actix_web::{web, HttpResponse};

use crate::event_handlers::get_upcoming_events;
use crate::monitoring::{health_check, liveness_probe, metrics_endpoint};
use crate::user_handlers::{create_user, get_users};

pub fn configure(cfg: &mut web::ServiceConfig) {
    // Process host probe: answered before anything else runs
    cfg.route("/start", web::get().to(liveness_probe))
        .service(
            web::scope("/health")
                .route("", web::get().to(health_check))
                .route("/metrics", web::get().to(metrics_endpoint)),
        )
        .service(
            web::scope("/api")
                .route("/events", web::get().to(get_upcoming_events))
                .service(
                    web::resource("/users")
                        .route(web::get().to(get_users))
                        .route(web::post().to(create_user)),
                ),
        )
        .default_service(web::route().to(not_found));
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "Not found" }))
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::config::AppMode;
    use crate::monitoring::Metrics;
    use actix_web::{http::StatusCode, test, App};

    #[actix_rt::test]
    async fn test_unknown_path_is_json_404() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(app_state(AppMode::Development).await))
                .app_data(web::Data::new(auth_service()))
                .app_data(web::Data::new(Metrics::new()))
                .configure(configure),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/api/nothing").to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Not found");
    }

    #[actix_rt::test]
    async fn test_malformed_json_keeps_error_shape() {
        let auth = auth_service();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(app_state(AppMode::Development).await))
                .app_data(web::Data::new(auth.clone()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/users")
            .insert_header(("Authorization", admin_bearer(&auth)))
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON body"));
    }
}
