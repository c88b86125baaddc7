use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::{
    self, random_slug, AppointmentStatus, BookingStatus, CalendarProvider, DayOfWeek,
    ExternalConnectionType, InviteStatus, LocationType, MeetingLinkProviderType, SubscriberLevel,
};

/// Storage default for a schedule's minimum booking lead, in minutes (24h).
pub const DEFAULT_EARLIEST_BOOKING: i32 = 1440;
/// Storage default for a schedule's maximum booking lead, in minutes (2 weeks).
pub const DEFAULT_FARTHEST_BOOKING: i32 = 20160;
/// Storage default for a schedule's slot length, in minutes.
pub const DEFAULT_SLOT_DURATION: i32 = 30;
/// Floor applied to slot length at schedule creation.
pub const MIN_SLOT_DURATION: i32 = 10;

fn default_true() -> bool {
    true
}

fn default_slug() -> Option<String> {
    Some(random_slug())
}

// ============================================================================
// Attendee
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AttendeeInput {
    #[validate(email)]
    pub email: String,
    pub name: Option<String>,
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendeeResponse {
    #[serde(flatten)]
    pub attendee: AttendeeInput,
    pub id: i32,
}

impl From<models::Attendee> for AttendeeResponse {
    fn from(attendee: models::Attendee) -> Self {
        AttendeeResponse {
            attendee: AttendeeInput {
                email: attendee.email,
                name: attendee.name,
                timezone: attendee.timezone,
            },
            id: attendee.id,
        }
    }
}

// ============================================================================
// Slot
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotInput {
    pub start: DateTime<Utc>,
    pub duration: Option<i32>,
    pub attendee_id: Option<i32>,
    pub booking_tkn: Option<String>,
    pub booking_expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub booking_status: Option<BookingStatus>,
    pub meeting_link_id: Option<String>,
    pub meeting_link_url: Option<String>,
}

impl From<&models::Slot> for SlotInput {
    fn from(slot: &models::Slot) -> Self {
        SlotInput {
            start: slot.start,
            duration: slot.duration,
            attendee_id: slot.attendee_id,
            booking_tkn: slot.booking_tkn.clone(),
            booking_expires_at: slot.booking_expires_at,
            booking_status: Some(slot.booking_status),
            meeting_link_id: slot.meeting_link_id.clone(),
            meeting_link_url: slot.meeting_link_url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotResponse {
    #[serde(flatten)]
    pub slot: SlotInput,
    pub id: i32,
    pub appointment_id: Option<i32>,
    pub schedule_id: Option<i32>,
    pub subscriber_id: Option<i32>,
    pub time_updated: Option<DateTime<Utc>>,
    pub attendee: Option<AttendeeResponse>,
}

impl SlotResponse {
    pub fn from_slot(slot: models::Slot, attendee: Option<models::Attendee>) -> Self {
        SlotResponse {
            id: slot.id,
            appointment_id: slot.appointment_id,
            schedule_id: slot.schedule_id,
            subscriber_id: slot.subscriber_id,
            time_updated: Some(slot.time_updated),
            attendee: attendee.map(Into::into),
            slot: SlotInput::from(&slot),
        }
    }
}

/// Slot shape shown on public appointment pages; no internal linkage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicSlotResponse {
    #[serde(flatten)]
    pub slot: SlotInput,
    pub id: Option<i32>,
}

impl From<&models::Slot> for PublicSlotResponse {
    fn from(slot: &models::Slot) -> Self {
        PublicSlotResponse {
            slot: SlotInput::from(slot),
            id: Some(slot.id),
        }
    }
}

/// Books a concrete slot on a one-off appointment.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BookingRequest {
    pub slot_id: i32,
    #[validate]
    pub attendee: AttendeeInput,
}

/// Requests a slot computed from a schedule's availability.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AvailabilityBookingRequest {
    pub slot: SlotInput,
    #[validate]
    pub attendee: AttendeeInput,
}

/// Confirms or denies a pending booking via the emailed token link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfirmationRequest {
    pub slot_id: i32,
    pub slot_token: String,
    pub owner_url: String,
    #[serde(default)]
    pub confirmed: bool,
}

// ============================================================================
// Appointment
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AppointmentInput {
    #[validate(length(min = 1))]
    pub title: String,
    pub details: Option<String>,
    #[serde(default = "default_slug")]
    pub slug: Option<String>,
    /// Needed for ical creation.
    pub location_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CreateAppointmentRequest {
    #[serde(flatten)]
    #[validate]
    pub appointment: AppointmentInput,
    pub calendar_id: i32,
    pub duration: Option<i32>,
    #[serde(default)]
    pub location_type: Option<LocationType>,
    pub location_suggestions: Option<String>,
    pub location_selected: Option<i32>,
    pub location_name: Option<String>,
    pub location_phone: Option<String>,
    #[serde(default = "default_true")]
    pub keep_open: bool,
    #[serde(default)]
    pub status: Option<AppointmentStatus>,
    #[serde(default)]
    pub meeting_link_provider: Option<MeetingLinkProviderType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentResponse {
    #[serde(flatten)]
    pub appointment: CreateAppointmentRequest,
    pub id: i32,
    pub uuid: Uuid,
    pub time_created: Option<DateTime<Utc>>,
    pub time_updated: Option<DateTime<Utc>>,
    pub slots: Vec<SlotResponse>,
}

impl AppointmentResponse {
    pub fn from_appointment(appointment: models::Appointment, slots: Vec<SlotResponse>) -> Self {
        AppointmentResponse {
            id: appointment.id,
            uuid: appointment.uuid,
            time_created: Some(appointment.time_created),
            time_updated: Some(appointment.time_updated),
            slots,
            appointment: CreateAppointmentRequest {
                appointment: AppointmentInput {
                    title: appointment.title,
                    details: appointment.details,
                    slug: Some(appointment.slug),
                    location_url: appointment.location_url,
                },
                calendar_id: appointment.calendar_id,
                duration: appointment.duration,
                location_type: Some(appointment.location_type),
                location_suggestions: appointment.location_suggestions,
                location_selected: appointment.location_selected,
                location_name: appointment.location_name,
                location_phone: appointment.location_phone,
                keep_open: appointment.keep_open,
                status: Some(appointment.status),
                meeting_link_provider: Some(appointment.meeting_link_provider),
            },
        }
    }
}

/// For the subscriber's own appointment overview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentWithCalendarResponse {
    #[serde(flatten)]
    pub appointment: AppointmentResponse,
    pub calendar_title: Option<String>,
    pub calendar_color: Option<String>,
}

/// The appointment shape served on public booking pages. Calendar linkage
/// and internal fields are absent by construction, not blanked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicAppointmentResponse {
    #[serde(flatten)]
    pub appointment: AppointmentInput,
    pub id: Option<i32>,
    pub owner_name: Option<String>,
    pub slots: Vec<PublicSlotResponse>,
    pub slot_duration: i32,
}

impl PublicAppointmentResponse {
    pub fn from_appointment(
        appointment: &models::Appointment,
        owner_name: Option<String>,
        slots: Vec<PublicSlotResponse>,
    ) -> Self {
        PublicAppointmentResponse {
            appointment: AppointmentInput {
                title: appointment.title.clone(),
                details: appointment.details.clone(),
                slug: Some(appointment.slug.clone()),
                location_url: appointment.location_url.clone(),
            },
            id: Some(appointment.id),
            owner_name,
            slots,
            slot_duration: appointment.duration.unwrap_or(DEFAULT_SLOT_DURATION),
        }
    }
}

/// Creates an appointment together with its initial slots.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AppointmentSlotsRequest {
    #[validate]
    pub appointment: CreateAppointmentRequest,
    #[serde(default)]
    pub slots: Vec<SlotInput>,
}

// ============================================================================
// Schedule
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AvailabilityInput {
    pub schedule_id: i32,
    pub day_of_week: DayOfWeek,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub min_time_before_meeting: i32,
    pub slot_duration: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    #[serde(flatten)]
    pub availability: AvailabilityInput,
    pub id: i32,
    pub time_created: Option<DateTime<Utc>>,
    pub time_updated: Option<DateTime<Utc>>,
}

impl From<models::Availability> for AvailabilityResponse {
    fn from(availability: models::Availability) -> Self {
        AvailabilityResponse {
            id: availability.id,
            time_created: Some(availability.time_created),
            time_updated: Some(availability.time_updated),
            availability: AvailabilityInput {
                schedule_id: availability.schedule_id,
                day_of_week: availability.day_of_week,
                start_time: availability.start_time,
                end_time: availability.end_time,
                min_time_before_meeting: availability.min_time_before_meeting,
                slot_duration: availability.slot_duration,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ScheduleInput {
    #[serde(default = "default_true")]
    pub active: bool,
    #[validate(length(min = 1))]
    pub name: String,
    pub calendar_id: i32,
    #[serde(default)]
    pub location_type: Option<LocationType>,
    pub location_url: Option<String>,
    pub details: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub earliest_booking: Option<i32>,
    pub farthest_booking: Option<i32>,
    #[serde(default = "DayOfWeek::weekdays")]
    pub weekdays: Vec<DayOfWeek>,
    pub slot_duration: Option<i32>,
    #[serde(default)]
    pub meeting_link_provider: Option<MeetingLinkProviderType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResponse {
    #[serde(flatten)]
    pub schedule: ScheduleInput,
    pub id: i32,
    pub time_created: Option<DateTime<Utc>>,
    pub time_updated: Option<DateTime<Utc>>,
    pub availabilities: Vec<AvailabilityResponse>,
    pub calendar: CalendarListing,
}

impl ScheduleResponse {
    pub fn from_schedule(
        schedule: models::Schedule,
        availabilities: Vec<AvailabilityResponse>,
        calendar: CalendarListing,
    ) -> Self {
        ScheduleResponse {
            id: schedule.id,
            time_created: Some(schedule.time_created),
            time_updated: Some(schedule.time_updated),
            availabilities,
            calendar,
            schedule: ScheduleInput {
                active: schedule.active,
                name: schedule.name,
                calendar_id: schedule.calendar_id,
                location_type: Some(schedule.location_type),
                location_url: schedule.location_url,
                details: schedule.details,
                start_date: schedule.start_date,
                end_date: schedule.end_date,
                start_time: schedule.start_time,
                end_time: schedule.end_time,
                earliest_booking: Some(schedule.earliest_booking),
                farthest_booking: Some(schedule.farthest_booking),
                weekdays: schedule.weekdays,
                slot_duration: Some(schedule.slot_duration),
                meeting_link_provider: Some(schedule.meeting_link_provider),
            },
        }
    }
}

/// Schedule creation body: the shared shape plus a floor on slot length.
/// The base shape carries no lower bound; this endpoint does.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_slot_duration_floor"))]
pub struct CreateScheduleRequest {
    #[serde(flatten)]
    #[validate]
    pub schedule: ScheduleInput,
}

fn validate_slot_duration_floor(request: &CreateScheduleRequest) -> Result<(), ValidationError> {
    let slot_duration = request
        .schedule
        .slot_duration
        .unwrap_or(DEFAULT_SLOT_DURATION);
    if slot_duration < MIN_SLOT_DURATION {
        return Err(ValidationError::new("slot_duration_below_minimum"));
    }
    Ok(())
}

// ============================================================================
// Calendar
// ============================================================================

/// The minimal calendar shape safe for any audience.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalendarListing {
    pub title: Option<String>,
    pub color: Option<String>,
    pub connected: Option<bool>,
}

impl From<&models::Calendar> for CalendarListing {
    fn from(calendar: &models::Calendar) -> Self {
        CalendarListing {
            title: calendar.title.clone(),
            color: calendar.color.clone(),
            connected: Some(calendar.connected),
        }
    }
}

fn default_provider() -> CalendarProvider {
    CalendarProvider::CalDav
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarConnectionDetails {
    #[serde(default = "default_provider")]
    pub provider: CalendarProvider,
    pub url: String,
    pub user: String,
}

/// Connection info without the password; what the owner sees back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarConnectionResponse {
    #[serde(flatten)]
    pub listing: CalendarListing,
    #[serde(flatten)]
    pub connection: CalendarConnectionDetails,
}

impl From<&models::Calendar> for CalendarConnectionResponse {
    fn from(calendar: &models::Calendar) -> Self {
        CalendarConnectionResponse {
            listing: CalendarListing::from(calendar),
            connection: CalendarConnectionDetails {
                provider: calendar.provider,
                url: calendar.url.clone(),
                user: calendar.user.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ConnectCalendarRequest {
    #[serde(flatten)]
    pub listing: CalendarListing,
    #[serde(flatten)]
    pub connection: CalendarConnectionDetails,
    pub password: String,
}

/// The owner's full calendar record, relations included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarResponse {
    #[serde(flatten)]
    pub listing: CalendarListing,
    #[serde(flatten)]
    pub connection: CalendarConnectionDetails,
    pub password: String,
    pub id: i32,
    pub owner_id: i32,
    #[serde(default)]
    pub appointments: Vec<AppointmentResponse>,
    #[serde(default)]
    pub schedules: Vec<ScheduleResponse>,
}

impl CalendarResponse {
    pub fn from_calendar(
        calendar: models::Calendar,
        appointments: Vec<AppointmentResponse>,
        schedules: Vec<ScheduleResponse>,
    ) -> Self {
        CalendarResponse {
            listing: CalendarListing::from(&calendar),
            connection: CalendarConnectionDetails {
                provider: calendar.provider,
                url: calendar.url,
                user: calendar.user,
            },
            password: calendar.password,
            id: calendar.id,
            owner_id: calendar.owner_id,
            appointments,
            schedules,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarSummaryResponse {
    #[serde(flatten)]
    pub listing: CalendarListing,
    pub id: i32,
}

impl From<&models::Calendar> for CalendarSummaryResponse {
    fn from(calendar: &models::Calendar) -> Self {
        CalendarSummaryResponse {
            listing: CalendarListing::from(calendar),
            id: calendar.id,
        }
    }
}

// ============================================================================
// Invite
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InviteResponse {
    pub subscriber_id: Option<i32>,
    pub code: String,
    pub status: InviteStatus,
    pub time_created: Option<DateTime<Utc>>,
    pub time_updated: Option<DateTime<Utc>>,
}

impl From<models::Invite> for InviteResponse {
    fn from(invite: models::Invite) -> Self {
        InviteResponse {
            subscriber_id: invite.subscriber_id,
            code: invite.code,
            status: invite.status,
            time_created: Some(invite.time_created),
            time_updated: Some(invite.time_updated),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendInviteRequest {
    #[validate(length(min = 1))]
    pub email: String,
}

// ============================================================================
// Subscriber
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SubscriberProfile {
    #[validate(length(min = 1))]
    pub username: String,
    pub name: Option<String>,
    pub timezone: Option<String>,
    pub avatar_url: Option<String>,
}

fn default_level() -> SubscriberLevel {
    SubscriberLevel::Basic
}

/// The account shape accepted at signup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SubscriberAccount {
    #[serde(flatten)]
    #[validate]
    pub profile: SubscriberProfile,
    #[validate(email)]
    pub email: String,
    #[serde(default = "default_level")]
    pub level: SubscriberLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriberResponse {
    #[serde(flatten)]
    pub account: SubscriberAccount,
    pub short_link_hash: Option<String>,
    pub id: i32,
    #[serde(default)]
    pub calendars: Vec<CalendarResponse>,
    #[serde(default)]
    pub slots: Vec<SlotResponse>,
}

impl SubscriberResponse {
    pub fn from_subscriber(
        subscriber: models::Subscriber,
        calendars: Vec<CalendarResponse>,
        slots: Vec<SlotResponse>,
    ) -> Self {
        SubscriberResponse {
            account: SubscriberAccount {
                profile: SubscriberProfile {
                    username: subscriber.username,
                    name: subscriber.name,
                    timezone: subscriber.timezone,
                    avatar_url: subscriber.avatar_url,
                },
                email: subscriber.email,
                level: subscriber.level,
            },
            short_link_hash: subscriber.short_link_hash,
            id: subscriber.id,
            calendars,
            slots,
        }
    }
}

/// Admin overview row; adds the invite backreference and the created stamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminSubscriberResponse {
    #[serde(flatten)]
    pub subscriber: SubscriberResponse,
    pub invite: Option<InviteResponse>,
    pub time_created: DateTime<Utc>,
}

// ============================================================================
// External connections
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ExternalConnectionRequest {
    pub owner_id: i32,
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ExternalConnectionType,
    pub type_id: String,
    pub token: String,
}

/// Token omitted; kind flattened to its stable name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalConnectionResponse {
    pub owner_id: i32,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub type_id: String,
}

impl From<&models::ExternalConnection> for ExternalConnectionResponse {
    fn from(connection: &models::ExternalConnection) -> Self {
        ExternalConnectionResponse {
            owner_id: connection.owner_id,
            name: connection.name.clone(),
            kind: connection.kind.as_str().to_string(),
            type_id: connection.type_id.clone(),
        }
    }
}

// ============================================================================
// Events (computed calendar entries, cacheable)
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventLocation {
    #[serde(rename = "type")]
    pub kind: Option<LocationType>,
    pub suggestions: Option<String>,
    pub selected: Option<String>,
    pub name: Option<String>,
    pub url: Option<String>,
    pub phone: Option<String>,
}

/// A calendar event as computed from a remote calendar, the unit stored in
/// the encrypted event cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub all_day: bool,
    #[serde(default)]
    pub tentative: bool,
    pub description: Option<String>,
    pub calendar_title: Option<String>,
    pub calendar_color: Option<String>,
    pub location: Option<EventLocation>,
    pub uuid: Option<Uuid>,
}

// ============================================================================
// Misc boundary shapes
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileDownloadResponse {
    pub name: String,
    pub content_type: String,
    pub data: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SupportRequest {
    #[validate(length(min = 1))]
    pub topic: String,
    pub details: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: Option<String>,
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenData {
    pub username: String,
}

// ============================================================================
// Error body
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(
        error: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: Some(details),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_calendar() -> models::Calendar {
        models::Calendar {
            id: 4,
            owner_id: 1,
            provider: CalendarProvider::CalDav,
            title: Some("Work".into()),
            color: Some("#0a84ff".into()),
            url: "https://caldav.example.com".into(),
            user: "ww1984".into(),
            password: "d14n4".into(),
            connected: true,
            connected_at: Some(Utc::now()),
            time_created: Utc::now(),
            time_updated: Utc::now(),
        }
    }

    #[test]
    fn connection_response_never_carries_the_password() {
        let calendar = sample_calendar();
        let value =
            serde_json::to_value(CalendarConnectionResponse::from(&calendar)).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(|k| k.as_str()).collect();

        assert!(!keys.contains(&"password"));
        assert!(keys.contains(&"url"));
        assert!(keys.contains(&"user"));
    }

    #[test]
    fn summary_response_exposes_only_listing_fields_and_id() {
        let calendar = sample_calendar();
        let value = serde_json::to_value(CalendarSummaryResponse::from(&calendar)).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 4);
        for key in ["title", "color", "connected", "id"] {
            assert!(object.contains_key(key), "missing {}", key);
        }
        for key in ["password", "user", "url", "owner_id", "provider"] {
            assert!(!object.contains_key(key), "leaked {}", key);
        }
    }

    #[test]
    fn full_calendar_response_keeps_connection_secrets() {
        let calendar = sample_calendar();
        let value =
            serde_json::to_value(CalendarResponse::from_calendar(calendar, vec![], vec![]))
                .unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object["password"], "d14n4");
        assert_eq!(object["owner_id"], 1);
        assert_eq!(object["provider"], 1);
    }

    #[test]
    fn schedule_creation_enforces_the_slot_duration_floor() {
        let body = serde_json::json!({
            "name": "Office hours",
            "calendar_id": 1,
            "slot_duration": 5,
        });
        let request: CreateScheduleRequest = serde_json::from_value(body).unwrap();
        assert!(request.validate().is_err());

        let body = serde_json::json!({
            "name": "Office hours",
            "calendar_id": 1,
            "slot_duration": 30,
        });
        let request: CreateScheduleRequest = serde_json::from_value(body).unwrap();
        assert!(request.validate().is_ok());

        // absent slot_duration falls back to the storage default, above floor
        let body = serde_json::json!({ "name": "Office hours", "calendar_id": 1 });
        let request: CreateScheduleRequest = serde_json::from_value(body).unwrap();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn schedule_base_shape_has_no_slot_duration_floor() {
        let body = serde_json::json!({
            "name": "Office hours",
            "calendar_id": 1,
            "slot_duration": 5,
        });
        let input: ScheduleInput = serde_json::from_value(body).unwrap();
        assert!(input.validate().is_ok());
        assert_eq!(input.weekdays, DayOfWeek::weekdays());
    }

    #[test]
    fn schedule_name_must_be_non_empty() {
        let body = serde_json::json!({ "name": "", "calendar_id": 1 });
        let input: ScheduleInput = serde_json::from_value(body).unwrap();
        assert!(input.validate().is_err());
    }

    #[test]
    fn appointment_input_defaults_a_fresh_slug() {
        let a: AppointmentInput =
            serde_json::from_value(serde_json::json!({ "title": "Coffee chat" })).unwrap();
        let b: AppointmentInput =
            serde_json::from_value(serde_json::json!({ "title": "Coffee chat" })).unwrap();

        let slug_a = a.slug.unwrap();
        assert_eq!(slug_a.len(), 32);
        assert_ne!(Some(slug_a), b.slug);
    }

    #[test]
    fn attendee_input_requires_a_well_formed_email() {
        let attendee: AttendeeInput =
            serde_json::from_value(serde_json::json!({ "email": "not-an-email" })).unwrap();
        assert!(attendee.validate().is_err());

        let attendee: AttendeeInput =
            serde_json::from_value(serde_json::json!({ "email": "diana@example.com" })).unwrap();
        assert!(attendee.validate().is_ok());
    }

    #[test]
    fn subscriber_account_round_trips_with_level_as_integer() {
        let body = serde_json::json!({
            "username": "ww",
            "email": "wonderwoman@example.com",
            "name": "Diana",
            "level": 2,
            "timezone": "-1",
        });
        let account: SubscriberAccount = serde_json::from_value(body).unwrap();
        assert_eq!(account.level, SubscriberLevel::Plus);
        assert_eq!(account.profile.username, "ww");

        let value = serde_json::to_value(&account).unwrap();
        assert_eq!(value["level"], 2);
        assert_eq!(value["username"], "ww");
        assert_eq!(value["timezone"], "-1");
    }

    #[test]
    fn booking_requests_validate_their_attendee() {
        let request: BookingRequest = serde_json::from_value(serde_json::json!({
            "slot_id": 9,
            "attendee": { "email": "not-an-email" },
        }))
        .unwrap();
        assert!(request.validate().is_err());

        let request: BookingConfirmationRequest = serde_json::from_value(serde_json::json!({
            "slot_id": 9,
            "slot_token": "tkn",
            "owner_url": "https://book.example.com/ww",
        }))
        .unwrap();
        assert!(!request.confirmed);
    }

    #[test]
    fn admin_subscriber_response_carries_the_invite_backreference() {
        let now = Utc::now();
        let subscriber = models::Subscriber {
            id: 1,
            username: "ww".into(),
            password: None,
            email: "wonderwoman@example.com".into(),
            name: Some("Diana".into()),
            level: SubscriberLevel::Plus,
            timezone: None,
            avatar_url: None,
            short_link_hash: None,
            minimum_valid_iat_time: None,
            time_created: now,
            time_updated: now,
        };
        let invite = models::Invite {
            id: 3,
            subscriber_id: Some(1),
            code: "code".into(),
            status: InviteStatus::Active,
            time_created: now,
            time_updated: now,
        };

        let response = AdminSubscriberResponse {
            subscriber: SubscriberResponse::from_subscriber(subscriber, vec![], vec![]),
            invite: Some(InviteResponse::from(invite)),
            time_created: now,
        };
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["username"], "ww");
        assert_eq!(value["invite"]["status"], 1);
        assert_eq!(value["invite"]["subscriber_id"], 1);
        // the password hash never crosses the boundary in any subscriber shape
        assert!(!value.as_object().unwrap().contains_key("password"));
    }

    #[test]
    fn send_invite_request_rejects_an_empty_email() {
        let request: SendInviteRequest =
            serde_json::from_value(serde_json::json!({ "email": "" })).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn external_connection_response_omits_the_token() {
        let connection = models::ExternalConnection {
            id: 1,
            owner_id: 1,
            name: "Zoom".into(),
            kind: ExternalConnectionType::Zoom,
            type_id: "zoom-abc".into(),
            token: "super-secret".into(),
            time_created: Utc::now(),
            time_updated: Utc::now(),
        };
        let value = serde_json::to_value(ExternalConnectionResponse::from(&connection)).unwrap();
        let object = value.as_object().unwrap();

        assert!(!object.contains_key("token"));
        assert_eq!(object["type"], "zoom");
    }
}
