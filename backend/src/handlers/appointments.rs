use axum::{
    extract::{Path, State},
    Json,
};
use validator::Validate;

use shared::api::{
    AppointmentResponse, AppointmentSlotsRequest, PublicAppointmentResponse, PublicSlotResponse,
    SlotResponse,
};

use crate::db::{self, AppState};
use crate::error::ApiResult;

pub async fn create_appointment(
    State(state): State<AppState>,
    Json(payload): Json<AppointmentSlotsRequest>,
) -> ApiResult<Json<AppointmentResponse>> {
    payload.validate()?;

    let mut conn = state.pool.get().await?;
    // the owning calendar has to exist before anything hangs off it
    db::calendars::get(&mut conn, &state.cipher, payload.appointment.calendar_id).await?;

    let appointment =
        db::appointments::create(&mut conn, &state.cipher, &payload.appointment).await?;
    let slots =
        db::slots::add_for_appointment(&mut conn, &state.cipher, appointment.id, &payload.slots)
            .await?
            .into_iter()
            .map(|slot| SlotResponse::from_slot(slot, None))
            .collect();

    Ok(Json(AppointmentResponse::from_appointment(
        appointment,
        slots,
    )))
}

/// Public booking page lookup by slug; serves the redacted shape only.
pub async fn read_public_appointment(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<PublicAppointmentResponse>> {
    let mut conn = state.pool.get().await?;

    let appointment = db::appointments::get_by_slug(&mut conn, &state.cipher, &slug).await?;
    let calendar = db::calendars::get(&mut conn, &state.cipher, appointment.calendar_id).await?;
    let owner = db::subscribers::get(&mut conn, &state.cipher, calendar.owner_id).await?;
    let slots = db::slots::list_by_appointment(&mut conn, &state.cipher, appointment.id)
        .await?
        .iter()
        .map(PublicSlotResponse::from)
        .collect();

    Ok(Json(PublicAppointmentResponse::from_appointment(
        &appointment,
        owner.name,
        slots,
    )))
}
