use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use validator::Validate;

use shared::api::{
    AppointmentResponse, CalendarListing, CalendarResponse, ConnectCalendarRequest,
    ScheduleResponse, SlotResponse,
};

use crate::db::{self, AppState};
use crate::error::ApiResult;

pub async fn create_calendar(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ConnectCalendarRequest>,
) -> ApiResult<Json<CalendarResponse>> {
    payload.validate()?;

    let owner_id = super::current_subscriber_id(&headers);
    let mut conn = state.pool.get().await?;
    let calendar = db::calendars::create(&mut conn, &state.cipher, owner_id, &payload).await?;

    Ok(Json(CalendarResponse::from_calendar(
        calendar,
        vec![],
        vec![],
    )))
}

pub async fn read_calendar(
    State(state): State<AppState>,
    Path(calendar_id): Path<i32>,
) -> ApiResult<Json<CalendarResponse>> {
    let mut conn = state.pool.get().await?;
    let calendar = db::calendars::get(&mut conn, &state.cipher, calendar_id).await?;
    let listing = CalendarListing::from(&calendar);

    let mut appointments = Vec::new();
    for appointment in
        db::appointments::list_by_calendar(&mut conn, &state.cipher, calendar_id).await?
    {
        let slots = db::slots::list_by_appointment(&mut conn, &state.cipher, appointment.id)
            .await?
            .into_iter()
            .map(|slot| SlotResponse::from_slot(slot, None))
            .collect();
        appointments.push(AppointmentResponse::from_appointment(appointment, slots));
    }

    let mut schedules = Vec::new();
    for schedule in
        db::schedules::list_by_calendar(&mut conn, &state.cipher, calendar_id).await?
    {
        let availabilities =
            db::availabilities::list_by_schedule(&mut conn, &state.cipher, schedule.id)
                .await?
                .into_iter()
                .map(Into::into)
                .collect();
        schedules.push(ScheduleResponse::from_schedule(
            schedule,
            availabilities,
            listing.clone(),
        ));
    }

    Ok(Json(CalendarResponse::from_calendar(
        calendar,
        appointments,
        schedules,
    )))
}

pub async fn delete_calendar(
    State(state): State<AppState>,
    Path(calendar_id): Path<i32>,
) -> ApiResult<StatusCode> {
    let mut conn = state.pool.get().await?;
    db::calendars::delete(&mut conn, calendar_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
