// src/models/event.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Upper bound on how many upcoming events the listing returns.
pub const UPCOMING_EVENTS_LIMIT: i64 = 3;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub event_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct UpcomingEventsResponse {
    pub success: bool,
    pub events: Vec<Event>,
}

#[derive(Debug, Serialize)]
pub struct EventsFailureResponse {
    pub success: bool,
    pub message: String,
    pub error: String,
}
