//! Diesel row structs and their mapping to domain values.
//!
//! Rows hold ciphertext for the sensitive columns; the conversion to and
//! from `shared::models` types is the single place where the cipher runs.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use shared::api::{
    AttendeeInput, AvailabilityInput, ConnectCalendarRequest, CreateAppointmentRequest,
    ExternalConnectionRequest, ScheduleInput, SlotInput, SubscriberAccount,
    DEFAULT_EARLIEST_BOOKING, DEFAULT_FARTHEST_BOOKING, DEFAULT_SLOT_DURATION,
};
use shared::models::{
    Appointment, AppointmentStatus, Attendee, Availability, BookingStatus, Calendar,
    CalendarProvider, DayOfWeek, ExternalConnection, ExternalConnectionType, Invite, InviteStatus,
    LocationType, MeetingLinkProviderType, Schedule, Slot, Subscriber, SubscriberLevel,
};

use crate::crypto::FieldCipher;

fn unknown(kind: &str, value: &str) -> anyhow::Error {
    anyhow!("unknown {}: {}", kind, value)
}

// ============================================================================
// Subscribers
// ============================================================================

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::subscribers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SubscriberRow {
    pub id: i32,
    pub username: String,
    pub password: Option<String>,
    pub email: String,
    pub name: Option<String>,
    pub level: String,
    pub timezone: Option<String>,
    pub avatar_url: Option<String>,
    pub short_link_hash: Option<String>,
    pub minimum_valid_iat_time: Option<String>,
    pub time_created: DateTime<Utc>,
    pub time_updated: DateTime<Utc>,
}

impl SubscriberRow {
    pub fn decrypt(self, cipher: &FieldCipher) -> Result<Subscriber> {
        Ok(Subscriber {
            id: self.id,
            username: cipher.decrypt(&self.username)?,
            password: cipher.decrypt_opt(self.password.as_deref())?,
            email: cipher.decrypt(&self.email)?,
            name: cipher.decrypt_opt(self.name.as_deref())?,
            level: SubscriberLevel::from_str(&self.level)
                .ok_or_else(|| unknown("subscriber level", &self.level))?,
            timezone: cipher.decrypt_opt(self.timezone.as_deref())?,
            avatar_url: cipher.decrypt_opt(self.avatar_url.as_deref())?,
            short_link_hash: cipher.decrypt_opt(self.short_link_hash.as_deref())?,
            minimum_valid_iat_time: self
                .minimum_valid_iat_time
                .as_deref()
                .map(|blob| cipher.decrypt_datetime(blob))
                .transpose()?,
            time_created: self.time_created,
            time_updated: self.time_updated,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::subscribers)]
pub struct NewSubscriberRow {
    pub username: String,
    pub email: String,
    pub name: Option<String>,
    pub level: String,
    pub timezone: Option<String>,
    pub avatar_url: Option<String>,
}

impl NewSubscriberRow {
    pub fn from_account(cipher: &FieldCipher, account: &SubscriberAccount) -> Result<Self> {
        Ok(NewSubscriberRow {
            username: cipher.encrypt(&account.profile.username)?,
            email: cipher.encrypt(&account.email)?,
            name: cipher.encrypt_opt(account.profile.name.as_deref())?,
            level: account.level.as_str().to_string(),
            timezone: cipher.encrypt_opt(account.profile.timezone.as_deref())?,
            avatar_url: cipher.encrypt_opt(account.profile.avatar_url.as_deref())?,
        })
    }
}

// ============================================================================
// Calendars
// ============================================================================

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::calendars)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CalendarRow {
    pub id: i32,
    pub owner_id: i32,
    pub provider: String,
    pub title: Option<String>,
    pub color: Option<String>,
    pub url: String,
    pub user: String,
    pub password: String,
    pub connected: bool,
    pub connected_at: Option<DateTime<Utc>>,
    pub time_created: DateTime<Utc>,
    pub time_updated: DateTime<Utc>,
}

impl CalendarRow {
    pub fn decrypt(self, cipher: &FieldCipher) -> Result<Calendar> {
        Ok(Calendar {
            id: self.id,
            owner_id: self.owner_id,
            provider: CalendarProvider::from_str(&self.provider)
                .ok_or_else(|| unknown("calendar provider", &self.provider))?,
            title: cipher.decrypt_opt(self.title.as_deref())?,
            color: cipher.decrypt_opt(self.color.as_deref())?,
            url: cipher.decrypt(&self.url)?,
            user: cipher.decrypt(&self.user)?,
            password: cipher.decrypt(&self.password)?,
            connected: self.connected,
            connected_at: self.connected_at,
            time_created: self.time_created,
            time_updated: self.time_updated,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::calendars)]
pub struct NewCalendarRow {
    pub owner_id: i32,
    pub provider: String,
    pub title: Option<String>,
    pub color: Option<String>,
    pub url: String,
    pub user: String,
    pub password: String,
    pub connected: bool,
}

impl NewCalendarRow {
    pub fn from_request(
        cipher: &FieldCipher,
        owner_id: i32,
        request: &ConnectCalendarRequest,
    ) -> Result<Self> {
        Ok(NewCalendarRow {
            owner_id,
            provider: request.connection.provider.as_str().to_string(),
            title: cipher.encrypt_opt(request.listing.title.as_deref())?,
            color: cipher.encrypt_opt(request.listing.color.as_deref())?,
            url: cipher.encrypt(&request.connection.url)?,
            user: cipher.encrypt(&request.connection.user)?,
            password: cipher.encrypt(&request.password)?,
            connected: request.listing.connected.unwrap_or(false),
        })
    }
}

// ============================================================================
// Appointments
// ============================================================================

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::appointments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AppointmentRow {
    pub id: i32,
    pub uuid: Uuid,
    pub calendar_id: i32,
    pub duration: Option<i32>,
    pub title: String,
    pub location_type: String,
    pub location_suggestions: Option<String>,
    pub location_selected: Option<i32>,
    pub location_name: Option<String>,
    pub location_url: Option<String>,
    pub location_phone: Option<String>,
    pub details: Option<String>,
    pub slug: String,
    pub keep_open: bool,
    pub status: String,
    pub meeting_link_provider: String,
    pub time_created: DateTime<Utc>,
    pub time_updated: DateTime<Utc>,
}

impl AppointmentRow {
    pub fn decrypt(self, cipher: &FieldCipher) -> Result<Appointment> {
        let meeting_link_provider = cipher.decrypt(&self.meeting_link_provider)?;
        Ok(Appointment {
            id: self.id,
            uuid: self.uuid,
            calendar_id: self.calendar_id,
            duration: self.duration,
            title: cipher.decrypt(&self.title)?,
            location_type: LocationType::from_str(&self.location_type)
                .ok_or_else(|| unknown("location type", &self.location_type))?,
            location_suggestions: self.location_suggestions,
            location_selected: self.location_selected,
            location_name: cipher.decrypt_opt(self.location_name.as_deref())?,
            location_url: cipher.decrypt_opt(self.location_url.as_deref())?,
            location_phone: cipher.decrypt_opt(self.location_phone.as_deref())?,
            details: cipher.decrypt_opt(self.details.as_deref())?,
            slug: cipher.decrypt(&self.slug)?,
            keep_open: self.keep_open,
            status: AppointmentStatus::from_str(&self.status)
                .ok_or_else(|| unknown("appointment status", &self.status))?,
            meeting_link_provider: MeetingLinkProviderType::from_str(&meeting_link_provider)
                .ok_or_else(|| unknown("meeting link provider", &meeting_link_provider))?,
            time_created: self.time_created,
            time_updated: self.time_updated,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::appointments)]
pub struct NewAppointmentRow {
    pub uuid: Uuid,
    pub calendar_id: i32,
    pub duration: Option<i32>,
    pub title: String,
    pub location_type: String,
    pub location_suggestions: Option<String>,
    pub location_selected: Option<i32>,
    pub location_name: Option<String>,
    pub location_url: Option<String>,
    pub location_phone: Option<String>,
    pub details: Option<String>,
    pub slug: String,
    pub keep_open: bool,
    pub status: String,
    pub meeting_link_provider: String,
}

impl NewAppointmentRow {
    pub fn from_request(
        cipher: &FieldCipher,
        request: &CreateAppointmentRequest,
        slug: &str,
    ) -> Result<Self> {
        let location_type = request.location_type.unwrap_or(LocationType::InPerson);
        let status = request.status.unwrap_or(AppointmentStatus::Draft);
        let meeting_link_provider = request
            .meeting_link_provider
            .unwrap_or(MeetingLinkProviderType::None);

        Ok(NewAppointmentRow {
            uuid: Uuid::new_v4(),
            calendar_id: request.calendar_id,
            duration: request.duration,
            title: cipher.encrypt(&request.appointment.title)?,
            location_type: location_type.as_str().to_string(),
            location_suggestions: request.location_suggestions.clone(),
            location_selected: request.location_selected,
            location_name: cipher.encrypt_opt(request.location_name.as_deref())?,
            location_url: cipher.encrypt_opt(request.appointment.location_url.as_deref())?,
            location_phone: cipher.encrypt_opt(request.location_phone.as_deref())?,
            details: cipher.encrypt_opt(request.appointment.details.as_deref())?,
            slug: cipher.encrypt(slug)?,
            keep_open: request.keep_open,
            status: status.as_str().to_string(),
            meeting_link_provider: cipher.encrypt(meeting_link_provider.as_str())?,
        })
    }
}

// ============================================================================
// Attendees
// ============================================================================

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::attendees)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AttendeeRow {
    pub id: i32,
    pub email: String,
    pub name: Option<String>,
    pub timezone: Option<String>,
    pub time_created: DateTime<Utc>,
    pub time_updated: DateTime<Utc>,
}

impl AttendeeRow {
    pub fn decrypt(self, cipher: &FieldCipher) -> Result<Attendee> {
        Ok(Attendee {
            id: self.id,
            email: cipher.decrypt(&self.email)?,
            name: cipher.decrypt_opt(self.name.as_deref())?,
            timezone: self.timezone,
            time_created: self.time_created,
            time_updated: self.time_updated,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::attendees)]
pub struct NewAttendeeRow {
    pub email: String,
    pub name: Option<String>,
    pub timezone: Option<String>,
}

impl NewAttendeeRow {
    pub fn from_input(cipher: &FieldCipher, input: &AttendeeInput) -> Result<Self> {
        Ok(NewAttendeeRow {
            email: cipher.encrypt(&input.email)?,
            name: cipher.encrypt_opt(input.name.as_deref())?,
            timezone: input.timezone.clone(),
        })
    }
}

// ============================================================================
// Slots
// ============================================================================

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::slots)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SlotRow {
    pub id: i32,
    pub appointment_id: Option<i32>,
    pub schedule_id: Option<i32>,
    pub attendee_id: Option<i32>,
    pub subscriber_id: Option<i32>,
    pub start: DateTime<Utc>,
    pub duration: Option<i32>,
    pub meeting_link_id: Option<String>,
    pub meeting_link_url: Option<String>,
    pub booking_tkn: Option<String>,
    pub booking_expires_at: Option<DateTime<Utc>>,
    pub booking_status: String,
    pub time_created: DateTime<Utc>,
    pub time_updated: DateTime<Utc>,
}

impl SlotRow {
    pub fn decrypt(self, cipher: &FieldCipher) -> Result<Slot> {
        Ok(Slot {
            id: self.id,
            appointment_id: self.appointment_id,
            schedule_id: self.schedule_id,
            attendee_id: self.attendee_id,
            subscriber_id: self.subscriber_id,
            start: self.start,
            duration: self.duration,
            meeting_link_id: cipher.decrypt_opt(self.meeting_link_id.as_deref())?,
            meeting_link_url: cipher.decrypt_opt(self.meeting_link_url.as_deref())?,
            booking_tkn: cipher.decrypt_opt(self.booking_tkn.as_deref())?,
            booking_expires_at: self.booking_expires_at,
            booking_status: BookingStatus::from_str(&self.booking_status)
                .ok_or_else(|| unknown("booking status", &self.booking_status))?,
            time_created: self.time_created,
            time_updated: self.time_updated,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::slots)]
pub struct NewSlotRow {
    pub appointment_id: Option<i32>,
    pub schedule_id: Option<i32>,
    pub attendee_id: Option<i32>,
    pub subscriber_id: Option<i32>,
    pub start: DateTime<Utc>,
    pub duration: Option<i32>,
    pub meeting_link_id: Option<String>,
    pub meeting_link_url: Option<String>,
    pub booking_tkn: Option<String>,
    pub booking_expires_at: Option<DateTime<Utc>>,
    pub booking_status: String,
}

impl NewSlotRow {
    /// Builds an unparented slot row; the query layer assigns exactly one of
    /// the appointment or schedule foreign keys.
    pub fn from_input(cipher: &FieldCipher, input: &SlotInput) -> Result<Self> {
        let booking_status = input.booking_status.unwrap_or(BookingStatus::Empty);
        Ok(NewSlotRow {
            appointment_id: None,
            schedule_id: None,
            attendee_id: input.attendee_id,
            subscriber_id: None,
            start: input.start,
            duration: input.duration,
            meeting_link_id: cipher.encrypt_opt(input.meeting_link_id.as_deref())?,
            meeting_link_url: cipher.encrypt_opt(input.meeting_link_url.as_deref())?,
            booking_tkn: cipher.encrypt_opt(input.booking_tkn.as_deref())?,
            booking_expires_at: input.booking_expires_at,
            booking_status: booking_status.as_str().to_string(),
        })
    }
}

// ============================================================================
// Schedules
// ============================================================================

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::schedules)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ScheduleRow {
    pub id: i32,
    pub calendar_id: i32,
    pub active: bool,
    pub name: String,
    pub location_type: String,
    pub location_url: Option<String>,
    pub details: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub earliest_booking: i32,
    pub farthest_booking: i32,
    pub weekdays: String,
    pub slot_duration: i32,
    pub meeting_link_provider: String,
    pub time_created: DateTime<Utc>,
    pub time_updated: DateTime<Utc>,
}

impl ScheduleRow {
    pub fn decrypt(self, cipher: &FieldCipher) -> Result<Schedule> {
        let meeting_link_provider = cipher.decrypt(&self.meeting_link_provider)?;
        let weekdays: Vec<DayOfWeek> = serde_json::from_str(&self.weekdays)
            .with_context(|| format!("malformed weekday list: {}", self.weekdays))?;

        Ok(Schedule {
            id: self.id,
            calendar_id: self.calendar_id,
            active: self.active,
            name: cipher.decrypt(&self.name)?,
            location_type: LocationType::from_str(&self.location_type)
                .ok_or_else(|| unknown("location type", &self.location_type))?,
            location_url: cipher.decrypt_opt(self.location_url.as_deref())?,
            details: cipher.decrypt_opt(self.details.as_deref())?,
            start_date: self
                .start_date
                .as_deref()
                .map(|blob| cipher.decrypt_date(blob))
                .transpose()?,
            end_date: self
                .end_date
                .as_deref()
                .map(|blob| cipher.decrypt_date(blob))
                .transpose()?,
            start_time: self
                .start_time
                .as_deref()
                .map(|blob| cipher.decrypt_time(blob))
                .transpose()?,
            end_time: self
                .end_time
                .as_deref()
                .map(|blob| cipher.decrypt_time(blob))
                .transpose()?,
            earliest_booking: self.earliest_booking,
            farthest_booking: self.farthest_booking,
            weekdays,
            slot_duration: self.slot_duration,
            meeting_link_provider: MeetingLinkProviderType::from_str(&meeting_link_provider)
                .ok_or_else(|| unknown("meeting link provider", &meeting_link_provider))?,
            time_created: self.time_created,
            time_updated: self.time_updated,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::schedules)]
pub struct NewScheduleRow {
    pub calendar_id: i32,
    pub active: bool,
    pub name: String,
    pub location_type: String,
    pub location_url: Option<String>,
    pub details: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub earliest_booking: i32,
    pub farthest_booking: i32,
    pub weekdays: String,
    pub slot_duration: i32,
    pub meeting_link_provider: String,
}

impl NewScheduleRow {
    pub fn from_input(cipher: &FieldCipher, input: &ScheduleInput) -> Result<Self> {
        let location_type = input.location_type.unwrap_or(LocationType::InPerson);
        let meeting_link_provider = input
            .meeting_link_provider
            .unwrap_or(MeetingLinkProviderType::None);

        Ok(NewScheduleRow {
            calendar_id: input.calendar_id,
            active: input.active,
            name: cipher.encrypt(&input.name)?,
            location_type: location_type.as_str().to_string(),
            location_url: cipher.encrypt_opt(input.location_url.as_deref())?,
            details: cipher.encrypt_opt(input.details.as_deref())?,
            start_date: input
                .start_date
                .map(|date| cipher.encrypt_date(date))
                .transpose()?,
            end_date: input
                .end_date
                .map(|date| cipher.encrypt_date(date))
                .transpose()?,
            start_time: input
                .start_time
                .map(|time| cipher.encrypt_time(time))
                .transpose()?,
            end_time: input
                .end_time
                .map(|time| cipher.encrypt_time(time))
                .transpose()?,
            earliest_booking: input.earliest_booking.unwrap_or(DEFAULT_EARLIEST_BOOKING),
            farthest_booking: input.farthest_booking.unwrap_or(DEFAULT_FARTHEST_BOOKING),
            weekdays: serde_json::to_string(&input.weekdays)?,
            slot_duration: input.slot_duration.unwrap_or(DEFAULT_SLOT_DURATION),
            meeting_link_provider: cipher.encrypt(meeting_link_provider.as_str())?,
        })
    }
}

// ============================================================================
// Availabilities
// ============================================================================

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::availabilities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AvailabilityRow {
    pub id: i32,
    pub schedule_id: i32,
    pub day_of_week: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub min_time_before_meeting: String,
    pub slot_duration: Option<i32>,
    pub time_created: DateTime<Utc>,
    pub time_updated: DateTime<Utc>,
}

impl AvailabilityRow {
    pub fn decrypt(self, cipher: &FieldCipher) -> Result<Availability> {
        let day_of_week = cipher.decrypt(&self.day_of_week)?;
        let min_time_before_meeting = cipher.decrypt(&self.min_time_before_meeting)?;

        Ok(Availability {
            id: self.id,
            schedule_id: self.schedule_id,
            day_of_week: DayOfWeek::from_str(&day_of_week)
                .ok_or_else(|| unknown("day of week", &day_of_week))?,
            start_time: self
                .start_time
                .as_deref()
                .map(|blob| cipher.decrypt_time(blob))
                .transpose()?,
            end_time: self
                .end_time
                .as_deref()
                .map(|blob| cipher.decrypt_time(blob))
                .transpose()?,
            min_time_before_meeting: min_time_before_meeting
                .parse()
                .with_context(|| format!("malformed lead time: {}", min_time_before_meeting))?,
            slot_duration: self.slot_duration,
            time_created: self.time_created,
            time_updated: self.time_updated,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::availabilities)]
pub struct NewAvailabilityRow {
    pub schedule_id: i32,
    pub day_of_week: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub min_time_before_meeting: String,
    pub slot_duration: Option<i32>,
}

impl NewAvailabilityRow {
    pub fn from_input(cipher: &FieldCipher, input: &AvailabilityInput) -> Result<Self> {
        Ok(NewAvailabilityRow {
            schedule_id: input.schedule_id,
            day_of_week: cipher.encrypt(input.day_of_week.as_str())?,
            start_time: input
                .start_time
                .map(|time| cipher.encrypt_time(time))
                .transpose()?,
            end_time: input
                .end_time
                .map(|time| cipher.encrypt_time(time))
                .transpose()?,
            min_time_before_meeting: cipher
                .encrypt(&input.min_time_before_meeting.to_string())?,
            slot_duration: input.slot_duration,
        })
    }
}

// ============================================================================
// External connections
// ============================================================================

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::external_connections)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ExternalConnectionRow {
    pub id: i32,
    pub owner_id: i32,
    pub name: String,
    pub kind: String,
    pub type_id: String,
    pub token: String,
    pub time_created: DateTime<Utc>,
    pub time_updated: DateTime<Utc>,
}

impl ExternalConnectionRow {
    pub fn decrypt(self, cipher: &FieldCipher) -> Result<ExternalConnection> {
        Ok(ExternalConnection {
            id: self.id,
            owner_id: self.owner_id,
            name: cipher.decrypt(&self.name)?,
            kind: ExternalConnectionType::from_str(&self.kind)
                .ok_or_else(|| unknown("external connection type", &self.kind))?,
            type_id: cipher.decrypt(&self.type_id)?,
            token: cipher.decrypt(&self.token)?,
            time_created: self.time_created,
            time_updated: self.time_updated,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::external_connections)]
pub struct NewExternalConnectionRow {
    pub owner_id: i32,
    pub name: String,
    pub kind: String,
    pub type_id: String,
    pub token: String,
}

impl NewExternalConnectionRow {
    pub fn from_request(cipher: &FieldCipher, request: &ExternalConnectionRequest) -> Result<Self> {
        Ok(NewExternalConnectionRow {
            owner_id: request.owner_id,
            name: cipher.encrypt(&request.name)?,
            kind: request.kind.as_str().to_string(),
            type_id: cipher.encrypt(&request.type_id)?,
            token: cipher.encrypt(&request.token)?,
        })
    }
}

// ============================================================================
// Invites
// ============================================================================

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::invites)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct InviteRow {
    pub id: i32,
    pub subscriber_id: Option<i32>,
    pub code: String,
    pub status: String,
    pub time_created: DateTime<Utc>,
    pub time_updated: DateTime<Utc>,
}

impl InviteRow {
    pub fn decrypt(self, cipher: &FieldCipher) -> Result<Invite> {
        Ok(Invite {
            id: self.id,
            subscriber_id: self.subscriber_id,
            code: cipher.decrypt(&self.code)?,
            status: InviteStatus::from_str(&self.status)
                .ok_or_else(|| unknown("invite status", &self.status))?,
            time_created: self.time_created,
            time_updated: self.time_updated,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::invites)]
pub struct NewInviteRow {
    pub code: String,
    pub status: String,
}

impl NewInviteRow {
    pub fn new(cipher: &FieldCipher, code: &str) -> Result<Self> {
        Ok(NewInviteRow {
            code: cipher.encrypt(code)?,
            status: InviteStatus::Active.as_str().to_string(),
        })
    }
}
