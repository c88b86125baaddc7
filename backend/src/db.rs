//! Connection pool plus one query module per entity.
//!
//! Every function borrows a pooled connection and the field cipher, and
//! returns decrypted domain values. Cascade deletes are declared on the
//! foreign keys in the migrations; nothing here re-implements them.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use diesel_async::{
    pooled_connection::{deadpool::Pool, AsyncDieselConnectionManager},
    AsyncPgConnection, RunQueryDsl,
};

use shared::api::{
    AttendeeInput, AvailabilityInput, ConnectCalendarRequest, CreateAppointmentRequest,
    ExternalConnectionRequest, ScheduleInput, SlotInput, SubscriberAccount, SubscriberProfile,
};
use shared::models::{
    random_slug, Appointment, AppointmentStatus, Attendee, Availability, BookingStatus, Calendar,
    ExternalConnection, ExternalConnectionType, Invite, Schedule, Slot, Subscriber,
};

use crate::cache::EventCache;
use crate::crypto::FieldCipher;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    AppointmentRow, AttendeeRow, AvailabilityRow, CalendarRow, ExternalConnectionRow, InviteRow,
    NewAppointmentRow, NewAttendeeRow, NewAvailabilityRow, NewCalendarRow,
    NewExternalConnectionRow, NewInviteRow, NewScheduleRow, NewSlotRow, NewSubscriberRow,
    ScheduleRow, SlotRow, SubscriberRow,
};

pub type DbPool = Pool<AsyncPgConnection>;

/// Everything a request handler needs: the pool, the column cipher, and the
/// event cache when Redis is configured.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub cipher: Arc<FieldCipher>,
    pub event_cache: Option<Arc<EventCache>>,
}

pub fn establish_connection_pool(database_url: &str) -> anyhow::Result<DbPool> {
    let config = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
    let pool = Pool::builder(config).build()?;

    Ok(pool)
}

// Subscriber database operations
pub mod subscribers {
    use super::*;

    pub async fn create(
        conn: &mut AsyncPgConnection,
        cipher: &FieldCipher,
        account: &SubscriberAccount,
    ) -> ApiResult<Subscriber> {
        use crate::schema::subscribers::dsl::*;

        let new_row = NewSubscriberRow::from_account(cipher, account)?;
        let row = diesel::insert_into(subscribers)
            .values(new_row)
            .get_result::<SubscriberRow>(conn)
            .await?;

        Ok(row.decrypt(cipher)?)
    }

    pub async fn get(
        conn: &mut AsyncPgConnection,
        cipher: &FieldCipher,
        subscriber_id: i32,
    ) -> ApiResult<Subscriber> {
        use crate::schema::subscribers::dsl::*;

        let row = subscribers
            .filter(id.eq(subscriber_id))
            .first::<SubscriberRow>(conn)
            .await
            .optional()?
            .ok_or_else(|| ApiError::not_found("subscriber"))?;

        Ok(row.decrypt(cipher)?)
    }

    /// Equality over the encrypted column works because the cipher is
    /// deterministic for a given plaintext.
    pub async fn get_by_username(
        conn: &mut AsyncPgConnection,
        cipher: &FieldCipher,
        username_val: &str,
    ) -> ApiResult<Option<Subscriber>> {
        use crate::schema::subscribers::dsl::*;

        let row = subscribers
            .filter(username.eq(cipher.encrypt(username_val)?))
            .first::<SubscriberRow>(conn)
            .await
            .optional()?;

        Ok(row.map(|r| r.decrypt(cipher)).transpose()?)
    }

    pub async fn get_by_email(
        conn: &mut AsyncPgConnection,
        cipher: &FieldCipher,
        email_val: &str,
    ) -> ApiResult<Option<Subscriber>> {
        use crate::schema::subscribers::dsl::*;

        let row = subscribers
            .filter(email.eq(cipher.encrypt(email_val)?))
            .first::<SubscriberRow>(conn)
            .await
            .optional()?;

        Ok(row.map(|r| r.decrypt(cipher)).transpose()?)
    }

    pub async fn update_profile(
        conn: &mut AsyncPgConnection,
        cipher: &FieldCipher,
        subscriber_id: i32,
        profile: &SubscriberProfile,
    ) -> ApiResult<Subscriber> {
        use crate::schema::subscribers::dsl::*;

        let row = diesel::update(subscribers.filter(id.eq(subscriber_id)))
            .set((
                username.eq(cipher.encrypt(&profile.username)?),
                name.eq(cipher.encrypt_opt(profile.name.as_deref())?),
                timezone.eq(cipher.encrypt_opt(profile.timezone.as_deref())?),
                avatar_url.eq(cipher.encrypt_opt(profile.avatar_url.as_deref())?),
                time_updated.eq(Utc::now()),
            ))
            .get_result::<SubscriberRow>(conn)
            .await?;

        Ok(row.decrypt(cipher)?)
    }

    /// Invalidates tokens issued before now, e.g. after a credential reset.
    pub async fn reset_token_floor(
        conn: &mut AsyncPgConnection,
        cipher: &FieldCipher,
        subscriber_id: i32,
    ) -> ApiResult<Subscriber> {
        use crate::schema::subscribers::dsl::*;

        let row = diesel::update(subscribers.filter(id.eq(subscriber_id)))
            .set((
                minimum_valid_iat_time.eq(Some(cipher.encrypt_datetime(Utc::now())?)),
                time_updated.eq(Utc::now()),
            ))
            .get_result::<SubscriberRow>(conn)
            .await?;

        Ok(row.decrypt(cipher)?)
    }

    pub async fn delete(conn: &mut AsyncPgConnection, subscriber_id: i32) -> ApiResult<()> {
        use crate::schema::subscribers::dsl::*;

        diesel::delete(subscribers.filter(id.eq(subscriber_id)))
            .execute(conn)
            .await?;

        Ok(())
    }
}

// Calendar database operations
pub mod calendars {
    use super::*;

    pub async fn create(
        conn: &mut AsyncPgConnection,
        cipher: &FieldCipher,
        owner_id_val: i32,
        request: &ConnectCalendarRequest,
    ) -> ApiResult<Calendar> {
        use crate::schema::calendars::dsl::*;

        let new_row = NewCalendarRow::from_request(cipher, owner_id_val, request)?;
        let row = diesel::insert_into(calendars)
            .values(new_row)
            .get_result::<CalendarRow>(conn)
            .await?;

        Ok(row.decrypt(cipher)?)
    }

    pub async fn get(
        conn: &mut AsyncPgConnection,
        cipher: &FieldCipher,
        calendar_id: i32,
    ) -> ApiResult<Calendar> {
        use crate::schema::calendars::dsl::*;

        let row = calendars
            .filter(id.eq(calendar_id))
            .first::<CalendarRow>(conn)
            .await
            .optional()?
            .ok_or_else(|| ApiError::not_found("calendar"))?;

        Ok(row.decrypt(cipher)?)
    }

    pub async fn list_by_owner(
        conn: &mut AsyncPgConnection,
        cipher: &FieldCipher,
        owner_id_val: i32,
    ) -> ApiResult<Vec<Calendar>> {
        use crate::schema::calendars::dsl::*;

        let rows = calendars
            .filter(owner_id.eq(owner_id_val))
            .order_by(time_created.asc())
            .load::<CalendarRow>(conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| row.decrypt(cipher))
            .collect::<Result<_, _>>()?)
    }

    pub async fn mark_connected(
        conn: &mut AsyncPgConnection,
        cipher: &FieldCipher,
        calendar_id: i32,
    ) -> ApiResult<Calendar> {
        use crate::schema::calendars::dsl::*;

        let row = diesel::update(calendars.filter(id.eq(calendar_id)))
            .set((
                connected.eq(true),
                connected_at.eq(Some(Utc::now())),
                time_updated.eq(Utc::now()),
            ))
            .get_result::<CalendarRow>(conn)
            .await?;

        Ok(row.decrypt(cipher)?)
    }

    pub async fn delete(conn: &mut AsyncPgConnection, calendar_id: i32) -> ApiResult<()> {
        use crate::schema::calendars::dsl::*;

        let deleted = diesel::delete(calendars.filter(id.eq(calendar_id)))
            .execute(conn)
            .await?;
        if deleted == 0 {
            return Err(ApiError::not_found("calendar"));
        }

        Ok(())
    }
}

// Appointment database operations
pub mod appointments {
    use super::*;

    /// Inserts with the requested slug or a fresh random one. The slug space
    /// is large enough that collisions are negligible, but a unique-index
    /// violation still gets one retry with a regenerated value.
    pub async fn create(
        conn: &mut AsyncPgConnection,
        cipher: &FieldCipher,
        request: &CreateAppointmentRequest,
    ) -> ApiResult<Appointment> {
        use crate::schema::appointments::dsl::*;

        let mut slug_val = request
            .appointment
            .slug
            .clone()
            .unwrap_or_else(random_slug);
        let mut retried = false;

        loop {
            let new_row = NewAppointmentRow::from_request(cipher, request, &slug_val)?;
            match diesel::insert_into(appointments)
                .values(new_row)
                .get_result::<AppointmentRow>(conn)
                .await
            {
                Ok(row) => return Ok(row.decrypt(cipher)?),
                Err(diesel::result::Error::DatabaseError(
                    DatabaseErrorKind::UniqueViolation,
                    _,
                )) if !retried => {
                    tracing::warn!("appointment slug collision, regenerating");
                    retried = true;
                    slug_val = random_slug();
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    pub async fn get(
        conn: &mut AsyncPgConnection,
        cipher: &FieldCipher,
        appointment_id: i32,
    ) -> ApiResult<Appointment> {
        use crate::schema::appointments::dsl::*;

        let row = appointments
            .filter(id.eq(appointment_id))
            .first::<AppointmentRow>(conn)
            .await
            .optional()?
            .ok_or_else(|| ApiError::not_found("appointment"))?;

        Ok(row.decrypt(cipher)?)
    }

    pub async fn get_by_slug(
        conn: &mut AsyncPgConnection,
        cipher: &FieldCipher,
        slug_val: &str,
    ) -> ApiResult<Appointment> {
        use crate::schema::appointments::dsl::*;

        let row = appointments
            .filter(slug.eq(cipher.encrypt(slug_val)?))
            .first::<AppointmentRow>(conn)
            .await
            .optional()?
            .ok_or_else(|| ApiError::not_found("appointment"))?;

        Ok(row.decrypt(cipher)?)
    }

    pub async fn list_by_calendar(
        conn: &mut AsyncPgConnection,
        cipher: &FieldCipher,
        calendar_id_val: i32,
    ) -> ApiResult<Vec<Appointment>> {
        use crate::schema::appointments::dsl::*;

        let rows = appointments
            .filter(calendar_id.eq(calendar_id_val))
            .order_by(time_created.desc())
            .load::<AppointmentRow>(conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| row.decrypt(cipher))
            .collect::<Result<_, _>>()?)
    }

    pub async fn update_status(
        conn: &mut AsyncPgConnection,
        cipher: &FieldCipher,
        appointment_id: i32,
        status_val: AppointmentStatus,
    ) -> ApiResult<Appointment> {
        use crate::schema::appointments::dsl::*;

        let row = diesel::update(appointments.filter(id.eq(appointment_id)))
            .set((
                status.eq(status_val.as_str()),
                time_updated.eq(Utc::now()),
            ))
            .get_result::<AppointmentRow>(conn)
            .await?;

        Ok(row.decrypt(cipher)?)
    }

    pub async fn delete(conn: &mut AsyncPgConnection, appointment_id: i32) -> ApiResult<()> {
        use crate::schema::appointments::dsl::*;

        let deleted = diesel::delete(appointments.filter(id.eq(appointment_id)))
            .execute(conn)
            .await?;
        if deleted == 0 {
            return Err(ApiError::not_found("appointment"));
        }

        Ok(())
    }
}

// Schedule database operations
pub mod schedules {
    use super::*;

    pub async fn create(
        conn: &mut AsyncPgConnection,
        cipher: &FieldCipher,
        input: &ScheduleInput,
    ) -> ApiResult<Schedule> {
        use crate::schema::schedules::dsl::*;

        let new_row = NewScheduleRow::from_input(cipher, input)?;
        let row = diesel::insert_into(schedules)
            .values(new_row)
            .get_result::<ScheduleRow>(conn)
            .await?;

        Ok(row.decrypt(cipher)?)
    }

    pub async fn get(
        conn: &mut AsyncPgConnection,
        cipher: &FieldCipher,
        schedule_id: i32,
    ) -> ApiResult<Schedule> {
        use crate::schema::schedules::dsl::*;

        let row = schedules
            .filter(id.eq(schedule_id))
            .first::<ScheduleRow>(conn)
            .await
            .optional()?
            .ok_or_else(|| ApiError::not_found("schedule"))?;

        Ok(row.decrypt(cipher)?)
    }

    pub async fn list_by_calendar(
        conn: &mut AsyncPgConnection,
        cipher: &FieldCipher,
        calendar_id_val: i32,
    ) -> ApiResult<Vec<Schedule>> {
        use crate::schema::schedules::dsl::*;

        let rows = schedules
            .filter(calendar_id.eq(calendar_id_val))
            .order_by(time_created.asc())
            .load::<ScheduleRow>(conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| row.decrypt(cipher))
            .collect::<Result<_, _>>()?)
    }

    pub async fn update(
        conn: &mut AsyncPgConnection,
        cipher: &FieldCipher,
        schedule_id: i32,
        input: &ScheduleInput,
    ) -> ApiResult<Schedule> {
        use crate::schema::schedules::dsl::*;

        let new_row = NewScheduleRow::from_input(cipher, input)?;
        let row = diesel::update(schedules.filter(id.eq(schedule_id)))
            .set((
                calendar_id.eq(new_row.calendar_id),
                active.eq(new_row.active),
                name.eq(new_row.name),
                location_type.eq(new_row.location_type),
                location_url.eq(new_row.location_url),
                details.eq(new_row.details),
                start_date.eq(new_row.start_date),
                end_date.eq(new_row.end_date),
                start_time.eq(new_row.start_time),
                end_time.eq(new_row.end_time),
                earliest_booking.eq(new_row.earliest_booking),
                farthest_booking.eq(new_row.farthest_booking),
                weekdays.eq(new_row.weekdays),
                slot_duration.eq(new_row.slot_duration),
                meeting_link_provider.eq(new_row.meeting_link_provider),
                time_updated.eq(Utc::now()),
            ))
            .get_result::<ScheduleRow>(conn)
            .await?;

        Ok(row.decrypt(cipher)?)
    }

    pub async fn delete(conn: &mut AsyncPgConnection, schedule_id: i32) -> ApiResult<()> {
        use crate::schema::schedules::dsl::*;

        let deleted = diesel::delete(schedules.filter(id.eq(schedule_id)))
            .execute(conn)
            .await?;
        if deleted == 0 {
            return Err(ApiError::not_found("schedule"));
        }

        Ok(())
    }
}

// Availability database operations
pub mod availabilities {
    use super::*;

    pub async fn create(
        conn: &mut AsyncPgConnection,
        cipher: &FieldCipher,
        input: &AvailabilityInput,
    ) -> ApiResult<Availability> {
        use crate::schema::availabilities::dsl::*;

        let new_row = NewAvailabilityRow::from_input(cipher, input)?;
        let row = diesel::insert_into(availabilities)
            .values(new_row)
            .get_result::<AvailabilityRow>(conn)
            .await?;

        Ok(row.decrypt(cipher)?)
    }

    pub async fn list_by_schedule(
        conn: &mut AsyncPgConnection,
        cipher: &FieldCipher,
        schedule_id_val: i32,
    ) -> ApiResult<Vec<Availability>> {
        use crate::schema::availabilities::dsl::*;

        let rows = availabilities
            .filter(schedule_id.eq(schedule_id_val))
            .order_by(time_created.asc())
            .load::<AvailabilityRow>(conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| row.decrypt(cipher))
            .collect::<Result<_, _>>()?)
    }
}

// Attendee database operations
pub mod attendees {
    use super::*;

    pub async fn create(
        conn: &mut AsyncPgConnection,
        cipher: &FieldCipher,
        input: &AttendeeInput,
    ) -> ApiResult<Attendee> {
        use crate::schema::attendees::dsl::*;

        let new_row = NewAttendeeRow::from_input(cipher, input)?;
        let row = diesel::insert_into(attendees)
            .values(new_row)
            .get_result::<AttendeeRow>(conn)
            .await?;

        Ok(row.decrypt(cipher)?)
    }

    pub async fn get(
        conn: &mut AsyncPgConnection,
        cipher: &FieldCipher,
        attendee_id: i32,
    ) -> ApiResult<Attendee> {
        use crate::schema::attendees::dsl::*;

        let row = attendees
            .filter(id.eq(attendee_id))
            .first::<AttendeeRow>(conn)
            .await
            .optional()?
            .ok_or_else(|| ApiError::not_found("attendee"))?;

        Ok(row.decrypt(cipher)?)
    }
}

// Slot database operations
pub mod slots {
    use super::*;

    /// A slot belongs to an appointment or a schedule, never both; each
    /// insert path sets only its own parent key.
    pub async fn add_for_appointment(
        conn: &mut AsyncPgConnection,
        cipher: &FieldCipher,
        appointment_id_val: i32,
        inputs: &[SlotInput],
    ) -> ApiResult<Vec<Slot>> {
        use crate::schema::slots::dsl::*;

        let mut created = Vec::with_capacity(inputs.len());
        for input in inputs {
            let mut new_row = NewSlotRow::from_input(cipher, input)?;
            new_row.appointment_id = Some(appointment_id_val);

            let row = diesel::insert_into(slots)
                .values(new_row)
                .get_result::<SlotRow>(conn)
                .await?;
            created.push(row.decrypt(cipher)?);
        }

        Ok(created)
    }

    pub async fn add_for_schedule(
        conn: &mut AsyncPgConnection,
        cipher: &FieldCipher,
        schedule_id_val: i32,
        inputs: &[SlotInput],
    ) -> ApiResult<Vec<Slot>> {
        use crate::schema::slots::dsl::*;

        let mut created = Vec::with_capacity(inputs.len());
        for input in inputs {
            let mut new_row = NewSlotRow::from_input(cipher, input)?;
            new_row.schedule_id = Some(schedule_id_val);

            let row = diesel::insert_into(slots)
                .values(new_row)
                .get_result::<SlotRow>(conn)
                .await?;
            created.push(row.decrypt(cipher)?);
        }

        Ok(created)
    }

    pub async fn get(
        conn: &mut AsyncPgConnection,
        cipher: &FieldCipher,
        slot_id: i32,
    ) -> ApiResult<Slot> {
        use crate::schema::slots::dsl::*;

        let row = slots
            .filter(id.eq(slot_id))
            .first::<SlotRow>(conn)
            .await
            .optional()?
            .ok_or_else(|| ApiError::not_found("slot"))?;

        Ok(row.decrypt(cipher)?)
    }

    pub async fn list_by_appointment(
        conn: &mut AsyncPgConnection,
        cipher: &FieldCipher,
        appointment_id_val: i32,
    ) -> ApiResult<Vec<Slot>> {
        use crate::schema::slots::dsl::*;

        let rows = slots
            .filter(appointment_id.eq(appointment_id_val))
            .order_by(start.asc())
            .load::<SlotRow>(conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| row.decrypt(cipher))
            .collect::<Result<_, _>>()?)
    }

    pub async fn list_by_schedule(
        conn: &mut AsyncPgConnection,
        cipher: &FieldCipher,
        schedule_id_val: i32,
    ) -> ApiResult<Vec<Slot>> {
        use crate::schema::slots::dsl::*;

        let rows = slots
            .filter(schedule_id.eq(schedule_id_val))
            .order_by(start.asc())
            .load::<SlotRow>(conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| row.decrypt(cipher))
            .collect::<Result<_, _>>()?)
    }

    pub async fn list_by_subscriber(
        conn: &mut AsyncPgConnection,
        cipher: &FieldCipher,
        subscriber_id_val: i32,
    ) -> ApiResult<Vec<Slot>> {
        use crate::schema::slots::dsl::*;

        let rows = slots
            .filter(subscriber_id.eq(subscriber_id_val))
            .order_by(start.asc())
            .load::<SlotRow>(conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| row.decrypt(cipher))
            .collect::<Result<_, _>>()?)
    }

    /// Marks a slot as requested and stores the confirmation token.
    /// An already booked slot is a conflict, not an overwrite.
    pub async fn request_booking(
        conn: &mut AsyncPgConnection,
        cipher: &FieldCipher,
        slot_id: i32,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> ApiResult<Slot> {
        use crate::schema::slots::dsl::*;

        let current = get(conn, cipher, slot_id).await?;
        if current.booking_status == BookingStatus::Booked {
            return Err(ApiError::conflict("slot is already booked"));
        }

        let row = diesel::update(slots.filter(id.eq(slot_id)))
            .set((
                booking_tkn.eq(Some(cipher.encrypt(token)?)),
                booking_expires_at.eq(Some(expires_at)),
                booking_status.eq(BookingStatus::Requested.as_str()),
                time_updated.eq(Utc::now()),
            ))
            .get_result::<SlotRow>(conn)
            .await?;

        Ok(row.decrypt(cipher)?)
    }

    /// Turns a pending request into a booking. Requires a live, unexpired
    /// token and the matching `requested` state; the status/attendee
    /// consistency the schema leaves open is enforced right here.
    pub async fn confirm_booking(
        conn: &mut AsyncPgConnection,
        cipher: &FieldCipher,
        slot_id: i32,
        token: &str,
        attendee_id_val: i32,
    ) -> ApiResult<Slot> {
        use crate::schema::slots::dsl::*;

        let current = get(conn, cipher, slot_id).await?;
        if current.booking_status != BookingStatus::Requested {
            return Err(ApiError::conflict("slot has no pending booking request"));
        }
        match current.booking_tkn.as_deref() {
            Some(stored) if stored == token => {}
            _ => return Err(ApiError::conflict("booking token does not match")),
        }
        if matches!(current.booking_expires_at, Some(expiry) if expiry < Utc::now()) {
            return Err(ApiError::conflict("booking token expired"));
        }

        let row = diesel::update(slots.filter(id.eq(slot_id)))
            .set((
                attendee_id.eq(Some(attendee_id_val)),
                booking_status.eq(BookingStatus::Booked.as_str()),
                booking_tkn.eq(None::<String>),
                booking_expires_at.eq(None::<DateTime<Utc>>),
                time_updated.eq(Utc::now()),
            ))
            .get_result::<SlotRow>(conn)
            .await?;

        Ok(row.decrypt(cipher)?)
    }

    pub async fn cancel_booking(
        conn: &mut AsyncPgConnection,
        cipher: &FieldCipher,
        slot_id: i32,
    ) -> ApiResult<Slot> {
        use crate::schema::slots::dsl::*;

        let row = diesel::update(slots.filter(id.eq(slot_id)))
            .set((
                attendee_id.eq(None::<i32>),
                booking_tkn.eq(None::<String>),
                booking_expires_at.eq(None::<DateTime<Utc>>),
                booking_status.eq(BookingStatus::Empty.as_str()),
                time_updated.eq(Utc::now()),
            ))
            .get_result::<SlotRow>(conn)
            .await?;

        Ok(row.decrypt(cipher)?)
    }

    pub async fn delete(conn: &mut AsyncPgConnection, slot_id: i32) -> ApiResult<()> {
        use crate::schema::slots::dsl::*;

        diesel::delete(slots.filter(id.eq(slot_id)))
            .execute(conn)
            .await?;

        Ok(())
    }
}

// External connection database operations
pub mod external_connections {
    use super::*;

    pub async fn create(
        conn: &mut AsyncPgConnection,
        cipher: &FieldCipher,
        request: &ExternalConnectionRequest,
    ) -> ApiResult<ExternalConnection> {
        use crate::schema::external_connections::dsl::*;

        let new_row = NewExternalConnectionRow::from_request(cipher, request)?;
        let row = diesel::insert_into(external_connections)
            .values(new_row)
            .get_result::<ExternalConnectionRow>(conn)
            .await?;

        Ok(row.decrypt(cipher)?)
    }

    pub async fn list_by_owner(
        conn: &mut AsyncPgConnection,
        cipher: &FieldCipher,
        owner_id_val: i32,
    ) -> ApiResult<Vec<ExternalConnection>> {
        use crate::schema::external_connections::dsl::*;

        let rows = external_connections
            .filter(owner_id.eq(owner_id_val))
            .order_by(time_created.asc())
            .load::<ExternalConnectionRow>(conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| row.decrypt(cipher))
            .collect::<Result<_, _>>()?)
    }

    pub async fn delete_by_type(
        conn: &mut AsyncPgConnection,
        owner_id_val: i32,
        kind_val: ExternalConnectionType,
    ) -> ApiResult<()> {
        use crate::schema::external_connections::dsl::*;

        diesel::delete(
            external_connections
                .filter(owner_id.eq(owner_id_val))
                .filter(kind.eq(kind_val.as_str())),
        )
        .execute(conn)
        .await?;

        Ok(())
    }
}

// Invite database operations
pub mod invites {
    use super::*;

    /// Mints a batch of fresh, active codes.
    pub async fn generate(
        conn: &mut AsyncPgConnection,
        cipher: &FieldCipher,
        count: usize,
    ) -> ApiResult<Vec<Invite>> {
        use crate::schema::invites::dsl::*;

        let mut created = Vec::with_capacity(count);
        for _ in 0..count {
            let new_row = NewInviteRow::new(cipher, &random_slug())?;
            let row = diesel::insert_into(invites)
                .values(new_row)
                .get_result::<InviteRow>(conn)
                .await?;
            created.push(row.decrypt(cipher)?);
        }

        Ok(created)
    }

    pub async fn get_by_code(
        conn: &mut AsyncPgConnection,
        cipher: &FieldCipher,
        code_val: &str,
    ) -> ApiResult<Invite> {
        use crate::schema::invites::dsl::*;

        let row = invites
            .filter(code.eq(cipher.encrypt(code_val)?))
            .first::<InviteRow>(conn)
            .await
            .optional()?
            .ok_or_else(|| ApiError::not_found("invite"))?;

        Ok(row.decrypt(cipher)?)
    }

    pub async fn list(
        conn: &mut AsyncPgConnection,
        cipher: &FieldCipher,
    ) -> ApiResult<Vec<Invite>> {
        use crate::schema::invites::dsl::*;

        let rows = invites
            .order_by(time_created.asc())
            .load::<InviteRow>(conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| row.decrypt(cipher))
            .collect::<Result<_, _>>()?)
    }

    /// Assigns an available code to a subscriber. A used or revoked code is
    /// a conflict; reassignment requires releasing it first.
    pub async fn assign(
        conn: &mut AsyncPgConnection,
        cipher: &FieldCipher,
        invite_id: i32,
        subscriber_id_val: i32,
    ) -> ApiResult<Invite> {
        use crate::schema::invites::dsl::*;

        let row = invites
            .filter(id.eq(invite_id))
            .first::<InviteRow>(conn)
            .await
            .optional()?
            .ok_or_else(|| ApiError::not_found("invite"))?;
        let current = row.decrypt(cipher)?;
        if !current.is_available() {
            return Err(ApiError::conflict("invite code is not available"));
        }

        let row = diesel::update(invites.filter(id.eq(invite_id)))
            .set((
                subscriber_id.eq(Some(subscriber_id_val)),
                time_updated.eq(Utc::now()),
            ))
            .get_result::<InviteRow>(conn)
            .await?;

        Ok(row.decrypt(cipher)?)
    }

    pub async fn revoke(
        conn: &mut AsyncPgConnection,
        cipher: &FieldCipher,
        invite_id: i32,
    ) -> ApiResult<Invite> {
        use crate::schema::invites::dsl::*;

        let row = diesel::update(invites.filter(id.eq(invite_id)))
            .set((
                status.eq(shared::models::InviteStatus::Revoked.as_str()),
                time_updated.eq(Utc::now()),
            ))
            .get_result::<InviteRow>(conn)
            .await?;

        Ok(row.decrypt(cipher)?)
    }
}
