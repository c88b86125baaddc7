use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::db::AppState;
use crate::handlers;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/login/", get(handlers::login_probe))
        .route("/me/", get(handlers::me::read_me).post(handlers::me::create_me))
        .route("/me/calendars/", get(handlers::me::list_my_calendars))
        .route("/me/appointments/", get(handlers::me::list_my_appointments))
        .route("/calendars/", post(handlers::calendars::create_calendar))
        .route(
            "/calendars/:id",
            get(handlers::calendars::read_calendar).delete(handlers::calendars::delete_calendar),
        )
        .route(
            "/appointments/",
            post(handlers::appointments::create_appointment),
        )
        .route(
            "/appointments/:slug",
            get(handlers::appointments::read_public_appointment),
        )
        .route("/schedules/", post(handlers::schedules::create_schedule))
        .route("/schedules/:id", get(handlers::schedules::read_schedule))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
