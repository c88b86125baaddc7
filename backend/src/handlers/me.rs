use axum::{extract::State, http::HeaderMap, Json};
use validator::Validate;

use shared::api::{
    AppointmentResponse, AppointmentWithCalendarResponse, CalendarResponse, SlotResponse,
    SubscriberAccount, SubscriberResponse,
};

use crate::db::{self, AppState};
use crate::error::ApiResult;

pub async fn create_me(
    State(state): State<AppState>,
    Json(payload): Json<SubscriberAccount>,
) -> ApiResult<Json<SubscriberResponse>> {
    payload.validate()?;

    let mut conn = state.pool.get().await?;
    let subscriber = db::subscribers::create(&mut conn, &state.cipher, &payload).await?;

    Ok(Json(SubscriberResponse::from_subscriber(
        subscriber,
        vec![],
        vec![],
    )))
}

pub async fn read_me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<SubscriberResponse>> {
    let subscriber_id = super::current_subscriber_id(&headers);
    let mut conn = state.pool.get().await?;

    let subscriber = db::subscribers::get(&mut conn, &state.cipher, subscriber_id).await?;
    let calendars = db::calendars::list_by_owner(&mut conn, &state.cipher, subscriber_id)
        .await?
        .into_iter()
        .map(|calendar| CalendarResponse::from_calendar(calendar, vec![], vec![]))
        .collect();
    let slots = db::slots::list_by_subscriber(&mut conn, &state.cipher, subscriber_id)
        .await?
        .into_iter()
        .map(|slot| SlotResponse::from_slot(slot, None))
        .collect();

    Ok(Json(SubscriberResponse::from_subscriber(
        subscriber, calendars, slots,
    )))
}

pub async fn list_my_calendars(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<CalendarResponse>>> {
    let subscriber_id = super::current_subscriber_id(&headers);
    let mut conn = state.pool.get().await?;

    let calendars = db::calendars::list_by_owner(&mut conn, &state.cipher, subscriber_id)
        .await?
        .into_iter()
        .map(|calendar| CalendarResponse::from_calendar(calendar, vec![], vec![]))
        .collect();

    Ok(Json(calendars))
}

pub async fn list_my_appointments(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<AppointmentWithCalendarResponse>>> {
    let subscriber_id = super::current_subscriber_id(&headers);
    let mut conn = state.pool.get().await?;

    let mut appointments = Vec::new();
    for calendar in db::calendars::list_by_owner(&mut conn, &state.cipher, subscriber_id).await? {
        for appointment in
            db::appointments::list_by_calendar(&mut conn, &state.cipher, calendar.id).await?
        {
            let slots =
                db::slots::list_by_appointment(&mut conn, &state.cipher, appointment.id)
                    .await?
                    .into_iter()
                    .map(|slot| SlotResponse::from_slot(slot, None))
                    .collect();

            appointments.push(AppointmentWithCalendarResponse {
                appointment: AppointmentResponse::from_appointment(appointment, slots),
                calendar_title: calendar.title.clone(),
                calendar_color: calendar.color.clone(),
            });
        }
    }

    Ok(Json(appointments))
}
