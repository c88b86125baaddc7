//! End-to-end tests driving the router against a live Postgres.
//!
//! These are ignored by default; they need a migrated database. Run with:
//!
//! ```text
//! DATABASE_URL=postgres://... DB_SECRET=... cargo test -p backend -- --ignored
//! ```

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use backend::crypto::FieldCipher;
use backend::db::{self, AppState};
use backend::error::ApiError;
use backend::routes;
use shared::api::AttendeeInput;
use shared::models::{random_slug, BookingStatus, ExternalConnectionType};

fn test_state() -> AppState {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let secret =
        std::env::var("DB_SECRET").unwrap_or_else(|_| "integration-test-secret".to_string());

    AppState {
        pool: db::establish_connection_pool(&database_url).expect("failed to build pool"),
        cipher: Arc::new(FieldCipher::new(&secret)),
        event_cache: None,
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("request failed");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("failed to read body")
        .to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("body was not JSON")
    };

    (status, body)
}

fn post_json(uri: &str, subscriber_id: Option<i32>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(id) = subscriber_id {
        builder = builder.header("x-subscriber-id", id.to_string());
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

fn get(uri: &str, subscriber_id: Option<i32>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(id) = subscriber_id {
        builder = builder.header("x-subscriber-id", id.to_string());
    }
    builder.body(Body::empty()).expect("failed to build request")
}

/// Creates a subscriber with a unique username and returns its id.
async fn create_subscriber(app: &Router) -> (i32, String) {
    let username = format!("ww-{}", &random_slug()[..8]);
    let email = format!("{}@example.com", username);
    let (status, body) = send(
        app,
        post_json(
            "/me/",
            None,
            &json!({
                "username": username,
                "email": email,
                "name": "Diana",
                "level": 2,
                "timezone": "-1",
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "create subscriber: {}", body);
    assert_eq!(body["username"], username.as_str());
    assert_eq!(body["email"], email.as_str());
    assert_eq!(body["name"], "Diana");
    assert_eq!(body["level"], 2);
    assert_eq!(body["timezone"], "-1");
    assert!(body["id"].is_i64());
    assert_eq!(body["calendars"], json!([]));

    (body["id"].as_i64().expect("id") as i32, username)
}

async fn create_calendar(app: &Router, subscriber_id: i32) -> i32 {
    let (status, body) = send(
        app,
        post_json(
            "/calendars/",
            Some(subscriber_id),
            &json!({
                "url": "https://example.com",
                "user": "ww1984",
                "password": "d14n4",
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "create calendar: {}", body);
    assert_eq!(body["url"], "https://example.com");
    assert_eq!(body["user"], "ww1984");
    assert_eq!(body["password"], "d14n4");
    assert_eq!(body["owner_id"], subscriber_id);
    assert!(body["id"].is_i64());

    body["id"].as_i64().expect("id") as i32
}

#[tokio::test]
#[ignore = "needs a migrated Postgres via DATABASE_URL"]
async fn login_probe_answers_true() {
    let app = routes::router(test_state());

    let (status, body) = send(&app, get("/login/", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(true));
}

#[tokio::test]
#[ignore = "needs a migrated Postgres via DATABASE_URL"]
async fn subscriber_and_calendar_lifecycle() {
    let app = routes::router(test_state());

    let (subscriber_id, username) = create_subscriber(&app).await;
    let calendar_id = create_calendar(&app, subscriber_id).await;

    // the owner reads their account back with the calendar attached
    let (status, body) = send(&app, get("/me/", Some(subscriber_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], username.as_str());
    assert_eq!(body["calendars"].as_array().expect("calendars").len(), 1);

    let (status, body) = send(&app, get("/me/calendars/", Some(subscriber_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["user"], "ww1984");
    assert_eq!(body[0]["owner_id"], subscriber_id);

    let (status, body) = send(&app, get(&format!("/calendars/{}", calendar_id), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"], "https://example.com");
    assert_eq!(body["user"], "ww1984");
    assert_eq!(body["password"], "d14n4");

    // absent rows are not_found, never a generic failure
    let (status, body) = send(&app, get("/calendars/999999999", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
#[ignore = "needs a migrated Postgres via DATABASE_URL"]
async fn duplicate_username_is_a_conflict() {
    let app = routes::router(test_state());

    let (_, username) = create_subscriber(&app).await;
    let (status, body) = send(
        &app,
        post_json(
            "/me/",
            None,
            &json!({
                "username": username,
                "email": format!("{}-other@example.com", username),
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT, "{}", body);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
#[ignore = "needs a migrated Postgres via DATABASE_URL"]
async fn schedule_creation_validates_before_storage() {
    let app = routes::router(test_state());

    let (subscriber_id, _) = create_subscriber(&app).await;
    let calendar_id = create_calendar(&app, subscriber_id).await;

    let (status, body) = send(
        &app,
        post_json(
            "/schedules/",
            Some(subscriber_id),
            &json!({
                "name": "Office hours",
                "calendar_id": calendar_id,
                "slot_duration": 5,
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert_eq!(body["error"], "validation_error");

    let (status, body) = send(
        &app,
        post_json(
            "/schedules/",
            Some(subscriber_id),
            &json!({
                "name": "Office hours",
                "calendar_id": calendar_id,
                "slot_duration": 15,
                "start_time": "09:00:00",
                "end_time": "17:00:00",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["slot_duration"], 15);
    assert_eq!(body["weekdays"], json!([1, 2, 3, 4, 5]));
    assert_eq!(body["earliest_booking"], 1440);
    assert_eq!(body["calendar"]["connected"], false);
}

#[tokio::test]
#[ignore = "needs a migrated Postgres via DATABASE_URL"]
async fn public_appointment_shape_omits_calendar_linkage() {
    let app = routes::router(test_state());

    let (subscriber_id, _) = create_subscriber(&app).await;
    let calendar_id = create_calendar(&app, subscriber_id).await;

    let (status, body) = send(
        &app,
        post_json(
            "/appointments/",
            Some(subscriber_id),
            &json!({
                "appointment": {
                    "title": "Coffee chat",
                    "calendar_id": calendar_id,
                    "duration": 45,
                },
                "slots": [
                    { "start": "2025-09-01T09:00:00Z", "duration": 45 },
                    { "start": "2025-09-01T10:00:00Z", "duration": 45 },
                ],
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);

    let slug = body["slug"].as_str().expect("slug").to_string();
    assert_eq!(slug.len(), 32);
    assert_eq!(body["slots"].as_array().expect("slots").len(), 2);

    let (status, body) = send(&app, get(&format!("/appointments/{}", slug), None)).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["title"], "Coffee chat");
    assert_eq!(body["owner_name"], "Diana");
    assert_eq!(body["slot_duration"], 45);
    assert_eq!(body["slots"].as_array().expect("slots").len(), 2);

    let object = body.as_object().expect("object");
    assert!(!object.contains_key("calendar_id"));
    assert!(!object.contains_key("uuid"));
    assert!(!object.contains_key("status"));

    let (status, _) = send(&app, get(&format!("/appointments/{}", random_slug()), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "needs a migrated Postgres via DATABASE_URL"]
async fn booking_request_and_confirmation_flow() {
    let state = test_state();
    let app = routes::router(state.clone());

    let (subscriber_id, _) = create_subscriber(&app).await;
    let calendar_id = create_calendar(&app, subscriber_id).await;

    let (status, body) = send(
        &app,
        post_json(
            "/appointments/",
            Some(subscriber_id),
            &json!({
                "appointment": { "title": "Interview", "calendar_id": calendar_id },
                "slots": [{ "start": "2025-09-02T13:00:00Z", "duration": 30 }],
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let slot_id = body["slots"][0]["id"].as_i64().expect("slot id") as i32;

    let mut conn = state.pool.get().await.expect("connection");
    let token = random_slug();
    let expires = chrono::Utc::now() + chrono::Duration::minutes(30);

    let slot = db::slots::request_booking(&mut conn, &state.cipher, slot_id, &token, expires)
        .await
        .expect("request booking");
    assert_eq!(slot.booking_status, BookingStatus::Requested);
    assert!(slot.booking_tkn.is_some());

    let attendee = db::attendees::create(
        &mut conn,
        &state.cipher,
        &AttendeeInput {
            email: "steve@example.com".into(),
            name: Some("Steve".into()),
            timezone: None,
        },
    )
    .await
    .expect("create attendee");

    // a wrong token never books the slot
    let denied =
        db::slots::confirm_booking(&mut conn, &state.cipher, slot_id, "bogus", attendee.id).await;
    assert!(matches!(denied, Err(ApiError::Conflict(_))));

    let slot =
        db::slots::confirm_booking(&mut conn, &state.cipher, slot_id, &token, attendee.id)
            .await
            .expect("confirm booking");
    assert_eq!(slot.booking_status, BookingStatus::Booked);
    assert_eq!(slot.attendee_id, Some(attendee.id));
    assert_eq!(slot.booking_tkn, None);

    // a booked slot refuses a second request
    let refused =
        db::slots::request_booking(&mut conn, &state.cipher, slot_id, &random_slug(), expires)
            .await;
    assert!(matches!(refused, Err(ApiError::Conflict(_))));
}

#[tokio::test]
#[ignore = "needs a migrated Postgres via DATABASE_URL"]
async fn invite_assignment_respects_availability() {
    let state = test_state();
    let app = routes::router(state.clone());

    let (subscriber_id, _) = create_subscriber(&app).await;
    let (other_id, _) = create_subscriber(&app).await;

    let mut conn = state.pool.get().await.expect("connection");
    let invites = db::invites::generate(&mut conn, &state.cipher, 2)
        .await
        .expect("generate invites");
    assert!(invites.iter().all(|invite| invite.is_available()));

    let assigned = db::invites::assign(&mut conn, &state.cipher, invites[0].id, subscriber_id)
        .await
        .expect("assign invite");
    assert!(assigned.is_used());
    assert!(!assigned.is_available());

    // taken codes cannot be handed to someone else
    let refused = db::invites::assign(&mut conn, &state.cipher, invites[0].id, other_id).await;
    assert!(matches!(refused, Err(ApiError::Conflict(_))));

    let revoked = db::invites::revoke(&mut conn, &state.cipher, invites[1].id)
        .await
        .expect("revoke invite");
    assert!(revoked.is_revoked());
    let refused = db::invites::assign(&mut conn, &state.cipher, invites[1].id, other_id).await;
    assert!(matches!(refused, Err(ApiError::Conflict(_))));

    let found = db::invites::get_by_code(&mut conn, &state.cipher, &assigned.code)
        .await
        .expect("lookup by code");
    assert_eq!(found.id, assigned.id);
}

#[tokio::test]
#[ignore = "needs a migrated Postgres via DATABASE_URL"]
async fn connections_and_availabilities_round_trip() {
    let state = test_state();
    let app = routes::router(state.clone());

    let (subscriber_id, _) = create_subscriber(&app).await;
    let calendar_id = create_calendar(&app, subscriber_id).await;

    let mut conn = state.pool.get().await.expect("connection");

    let request = serde_json::from_value(json!({
        "owner_id": subscriber_id,
        "name": "Zoom",
        "type": 1,
        "type_id": "zoom-abc",
        "token": "zoom-token",
    }))
    .expect("request shape");
    db::external_connections::create(&mut conn, &state.cipher, &request)
        .await
        .expect("create connection");

    let connections =
        db::external_connections::list_by_owner(&mut conn, &state.cipher, subscriber_id)
            .await
            .expect("list connections");
    let found =
        shared::models::first_connection_of_type(&connections, ExternalConnectionType::Zoom)
            .expect("zoom connection");
    assert_eq!(found.token, "zoom-token");
    assert!(shared::models::first_connection_of_type(
        &connections,
        ExternalConnectionType::Fxa
    )
    .is_none());

    let (status, body) = send(
        &app,
        post_json(
            "/schedules/",
            Some(subscriber_id),
            &json!({ "name": "Office hours", "calendar_id": calendar_id }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let schedule_id = body["id"].as_i64().expect("schedule id") as i32;

    let input = serde_json::from_value(json!({
        "schedule_id": schedule_id,
        "day_of_week": 3,
        "start_time": "10:00:00",
        "end_time": "12:00:00",
        "min_time_before_meeting": 60,
        "slot_duration": 15,
    }))
    .expect("availability shape");
    let availability = db::availabilities::create(&mut conn, &state.cipher, &input)
        .await
        .expect("create availability");
    assert_eq!(availability.min_time_before_meeting, 60);

    let (status, body) = send(&app, get(&format!("/schedules/{}", schedule_id), None)).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["availabilities"].as_array().expect("list").len(), 1);
    assert_eq!(body["availabilities"][0]["day_of_week"], 3);
}

#[tokio::test]
#[ignore = "needs a migrated Postgres via DATABASE_URL"]
async fn slug_collisions_get_one_regenerated_retry() {
    let state = test_state();
    let app = routes::router(state.clone());

    let (subscriber_id, _) = create_subscriber(&app).await;
    let calendar_id = create_calendar(&app, subscriber_id).await;

    let slug = random_slug();
    let request = |title: &str| {
        serde_json::from_value(json!({
            "title": title,
            "calendar_id": calendar_id,
            "slug": slug,
        }))
        .expect("request shape")
    };

    let mut conn = state.pool.get().await.expect("connection");
    let first = db::appointments::create(&mut conn, &state.cipher, &request("First"))
        .await
        .expect("first create");
    assert_eq!(first.slug, slug);

    let second = db::appointments::create(&mut conn, &state.cipher, &request("Second"))
        .await
        .expect("second create retries with a fresh slug");
    assert_ne!(second.slug, slug);
    assert_eq!(second.slug.len(), 32);
}
