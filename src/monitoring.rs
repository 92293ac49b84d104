// src/monitoring.rs
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::future::{ready, Future, Ready};
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use crate::AppState;

const RESPONSE_TIME_WINDOW: usize = 1000;

#[derive(Debug)]
pub struct Metrics {
    started_at: Instant,
    request_count: AtomicU64,
    error_count: AtomicU64,
    response_times: Mutex<VecDeque<u64>>,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            request_count: AtomicU64::new(0),
            error_count: AtomicU64::new(0),
            response_times: Mutex::new(VecDeque::with_capacity(RESPONSE_TIME_WINDOW)),
        }
    }

    pub fn increment_requests(&self) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_errors(&self) {
        self.error_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_response_time(&self, time_ms: u64) {
        if let Ok(mut times) = self.response_times.lock() {
            if times.len() == RESPONSE_TIME_WINDOW {
                times.pop_front();
            }
            times.push_back(time_ms);
        }
    }

    pub fn requests_total(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    pub fn errors_total(&self) -> u64 {
        self.error_count.load(Ordering::Relaxed)
    }

    /// Mean over the most recent responses only.
    pub fn avg_response_time_ms(&self) -> f64 {
        match self.response_times.lock() {
            Ok(times) if !times.is_empty() => times.iter().sum::<u64>() as f64 / times.len() as f64,
            _ => 0.0,
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

#[derive(Serialize)]
pub struct MetricsResponse {
    pub requests_total: u64,
    pub errors_total: u64,
    pub avg_response_time_ms: f64,
    pub uptime_seconds: u64,
    pub database_connections: u32,
    pub database_idle_connections: usize,
}

/// Probe hit by the process host; answers before any other work.
pub async fn liveness_probe() -> HttpResponse {
    HttpResponse::Ok().content_type("text/plain; charset=utf-8").body("ok")
}

pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn metrics_endpoint(
    metrics: web::Data<Metrics>,
    app_state: web::Data<Arc<AppState>>,
) -> HttpResponse {
    HttpResponse::Ok().json(MetricsResponse {
        requests_total: metrics.requests_total(),
        errors_total: metrics.errors_total(),
        avg_response_time_ms: metrics.avg_response_time_ms(),
        uptime_seconds: metrics.uptime_seconds(),
        database_connections: app_state.db_pool.size(),
        database_idle_connections: app_state.db_pool.num_idle(),
    })
}

// ======== REQUEST METRICS MIDDLEWARE ========

pub struct RequestLogger {
    metrics: Arc<Metrics>,
}

impl RequestLogger {
    pub fn new(metrics: Arc<Metrics>) -> Self {
        Self { metrics }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RequestLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLoggerMiddleware {
            service,
            metrics: self.metrics.clone(),
        }))
    }
}

pub struct RequestLoggerMiddleware<S> {
    service: S,
    metrics: Arc<Metrics>,
}

impl<S, B> Service<ServiceRequest> for RequestLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    actix_web::dev::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start_time = Instant::now();
        let metrics = self.metrics.clone();
        let method = req.method().to_string();
        let path = req.path().to_string();
        let fut = self.service.call(req);

        Box::pin(async move {
            metrics.increment_requests();
            let res = fut.await;
            let elapsed = start_time.elapsed().as_millis() as u64;
            metrics.record_response_time(elapsed);

            match &res {
                Ok(response) => {
                    let status = response.status();
                    if status.is_client_error() || status.is_server_error() {
                        metrics.increment_errors();
                    }
                    tracing::debug!(%method, %path, status = status.as_u16(), latency_ms = elapsed, "request handled");
                }
                Err(err) => {
                    metrics.increment_errors();
                    tracing::debug!(%method, %path, error = %err, latency_ms = elapsed, "request failed");
                }
            }
            res
        })
    }
}
