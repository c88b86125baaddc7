use axum::{
    extract::{Path, State},
    Json,
};
use validator::Validate;

use shared::api::{CalendarListing, CreateScheduleRequest, ScheduleResponse};

use crate::db::{self, AppState};
use crate::error::ApiResult;

pub async fn create_schedule(
    State(state): State<AppState>,
    Json(payload): Json<CreateScheduleRequest>,
) -> ApiResult<Json<ScheduleResponse>> {
    payload.validate()?;

    let mut conn = state.pool.get().await?;
    let calendar =
        db::calendars::get(&mut conn, &state.cipher, payload.schedule.calendar_id).await?;
    let schedule = db::schedules::create(&mut conn, &state.cipher, &payload.schedule).await?;

    Ok(Json(ScheduleResponse::from_schedule(
        schedule,
        vec![],
        CalendarListing::from(&calendar),
    )))
}

pub async fn read_schedule(
    State(state): State<AppState>,
    Path(schedule_id): Path<i32>,
) -> ApiResult<Json<ScheduleResponse>> {
    let mut conn = state.pool.get().await?;
    let schedule = db::schedules::get(&mut conn, &state.cipher, schedule_id).await?;
    let calendar = db::calendars::get(&mut conn, &state.cipher, schedule.calendar_id).await?;
    let availabilities =
        db::availabilities::list_by_schedule(&mut conn, &state.cipher, schedule_id)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

    Ok(Json(ScheduleResponse::from_schedule(
        schedule,
        availabilities,
        CalendarListing::from(&calendar),
    )))
}
