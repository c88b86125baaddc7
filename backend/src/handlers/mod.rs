pub mod appointments;
pub mod calendars;
pub mod me;
pub mod schedules;

use axum::http::HeaderMap;
use axum::Json;

/// Auth probe. Session handling lives in middleware fronting this service;
/// the data layer only confirms it is reachable.
pub async fn login_probe() -> Json<bool> {
    Json(true)
}

/// Resolves the acting subscriber from the `x-subscriber-id` header,
/// falling back to the first account. Stands in for the auth middleware
/// until that layer fronts this service.
pub fn current_subscriber_id(headers: &HeaderMap) -> i32 {
    headers
        .get("x-subscriber-id")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
        .unwrap_or(1)
}
