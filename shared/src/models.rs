use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Subscription tier of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum SubscriberLevel {
    Basic = 1,
    Plus = 2,
    Pro = 3,
    Admin = 99,
}

impl SubscriberLevel {
    pub fn as_str(&self) -> &str {
        match self {
            SubscriberLevel::Basic => "basic",
            SubscriberLevel::Plus => "plus",
            SubscriberLevel::Pro => "pro",
            SubscriberLevel::Admin => "admin",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "basic" => Some(SubscriberLevel::Basic),
            "plus" => Some(SubscriberLevel::Plus),
            "pro" => Some(SubscriberLevel::Pro),
            "admin" => Some(SubscriberLevel::Admin),
            _ => None,
        }
    }
}

impl From<SubscriberLevel> for i32 {
    fn from(level: SubscriberLevel) -> i32 {
        level as i32
    }
}

impl TryFrom<i32> for SubscriberLevel {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(SubscriberLevel::Basic),
            2 => Ok(SubscriberLevel::Plus),
            3 => Ok(SubscriberLevel::Pro),
            99 => Ok(SubscriberLevel::Admin),
            other => Err(format!("unknown subscriber level: {}", other)),
        }
    }
}

/// Lifecycle of a one-off appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum AppointmentStatus {
    /// Created but not published yet.
    Draft = 1,
    /// Published and waiting for attendees.
    Opened = 2,
    /// Fulfilled or manually closed for attendees.
    Closed = 3,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            AppointmentStatus::Draft => "draft",
            AppointmentStatus::Opened => "opened",
            AppointmentStatus::Closed => "closed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(AppointmentStatus::Draft),
            "opened" => Some(AppointmentStatus::Opened),
            "closed" => Some(AppointmentStatus::Closed),
            _ => None,
        }
    }
}

impl From<AppointmentStatus> for i32 {
    fn from(status: AppointmentStatus) -> i32 {
        status as i32
    }
}

impl TryFrom<i32> for AppointmentStatus {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(AppointmentStatus::Draft),
            2 => Ok(AppointmentStatus::Opened),
            3 => Ok(AppointmentStatus::Closed),
            other => Err(format!("unknown appointment status: {}", other)),
        }
    }
}

/// Booking state of a slot. `Empty` means the parent object holds the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum BookingStatus {
    Empty = 1,
    Requested = 2,
    Booked = 3,
}

impl BookingStatus {
    pub fn as_str(&self) -> &str {
        match self {
            BookingStatus::Empty => "none",
            BookingStatus::Requested => "requested",
            BookingStatus::Booked => "booked",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "none" => Some(BookingStatus::Empty),
            "requested" => Some(BookingStatus::Requested),
            "booked" => Some(BookingStatus::Booked),
            _ => None,
        }
    }
}

impl From<BookingStatus> for i32 {
    fn from(status: BookingStatus) -> i32 {
        status as i32
    }
}

impl TryFrom<i32> for BookingStatus {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(BookingStatus::Empty),
            2 => Ok(BookingStatus::Requested),
            3 => Ok(BookingStatus::Booked),
            other => Err(format!("unknown booking status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum LocationType {
    InPerson = 1,
    Online = 2,
}

impl LocationType {
    pub fn as_str(&self) -> &str {
        match self {
            LocationType::InPerson => "inperson",
            LocationType::Online => "online",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "inperson" => Some(LocationType::InPerson),
            "online" => Some(LocationType::Online),
            _ => None,
        }
    }
}

impl From<LocationType> for i32 {
    fn from(location: LocationType) -> i32 {
        location as i32
    }
}

impl TryFrom<i32> for LocationType {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(LocationType::InPerson),
            2 => Ok(LocationType::Online),
            other => Err(format!("unknown location type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum CalendarProvider {
    /// Served via CalDAV.
    CalDav = 1,
    /// Google, via its own REST API.
    Google = 2,
}

impl CalendarProvider {
    pub fn as_str(&self) -> &str {
        match self {
            CalendarProvider::CalDav => "caldav",
            CalendarProvider::Google => "google",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "caldav" => Some(CalendarProvider::CalDav),
            "google" => Some(CalendarProvider::Google),
            _ => None,
        }
    }
}

impl From<CalendarProvider> for i32 {
    fn from(provider: CalendarProvider) -> i32 {
        provider as i32
    }
}

impl TryFrom<i32> for CalendarProvider {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(CalendarProvider::CalDav),
            2 => Ok(CalendarProvider::Google),
            other => Err(format!("unknown calendar provider: {}", other)),
        }
    }
}

/// ISO 8601 day of week, Monday = 1 through Sunday = 7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum DayOfWeek {
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
    Sunday = 7,
}

impl DayOfWeek {
    pub fn as_str(&self) -> &str {
        match self {
            DayOfWeek::Monday => "monday",
            DayOfWeek::Tuesday => "tuesday",
            DayOfWeek::Wednesday => "wednesday",
            DayOfWeek::Thursday => "thursday",
            DayOfWeek::Friday => "friday",
            DayOfWeek::Saturday => "saturday",
            DayOfWeek::Sunday => "sunday",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "monday" => Some(DayOfWeek::Monday),
            "tuesday" => Some(DayOfWeek::Tuesday),
            "wednesday" => Some(DayOfWeek::Wednesday),
            "thursday" => Some(DayOfWeek::Thursday),
            "friday" => Some(DayOfWeek::Friday),
            "saturday" => Some(DayOfWeek::Saturday),
            "sunday" => Some(DayOfWeek::Sunday),
            _ => None,
        }
    }

    /// Monday through Friday, the default working week.
    pub fn weekdays() -> Vec<DayOfWeek> {
        vec![
            DayOfWeek::Monday,
            DayOfWeek::Tuesday,
            DayOfWeek::Wednesday,
            DayOfWeek::Thursday,
            DayOfWeek::Friday,
        ]
    }
}

impl From<DayOfWeek> for i32 {
    fn from(day: DayOfWeek) -> i32 {
        day as i32
    }
}

impl TryFrom<i32> for DayOfWeek {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(DayOfWeek::Monday),
            2 => Ok(DayOfWeek::Tuesday),
            3 => Ok(DayOfWeek::Wednesday),
            4 => Ok(DayOfWeek::Thursday),
            5 => Ok(DayOfWeek::Friday),
            6 => Ok(DayOfWeek::Saturday),
            7 => Ok(DayOfWeek::Sunday),
            other => Err(format!("day of week out of range: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum ExternalConnectionType {
    Zoom = 1,
    Google = 2,
    Fxa = 3,
}

impl ExternalConnectionType {
    pub fn as_str(&self) -> &str {
        match self {
            ExternalConnectionType::Zoom => "zoom",
            ExternalConnectionType::Google => "google",
            ExternalConnectionType::Fxa => "fxa",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "zoom" => Some(ExternalConnectionType::Zoom),
            "google" => Some(ExternalConnectionType::Google),
            "fxa" => Some(ExternalConnectionType::Fxa),
            _ => None,
        }
    }
}

impl From<ExternalConnectionType> for i32 {
    fn from(kind: ExternalConnectionType) -> i32 {
        kind as i32
    }
}

impl TryFrom<i32> for ExternalConnectionType {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ExternalConnectionType::Zoom),
            2 => Ok(ExternalConnectionType::Google),
            3 => Ok(ExternalConnectionType::Fxa),
            other => Err(format!("unknown external connection type: {}", other)),
        }
    }
}

/// Which meeting link gets generated once a meeting is booked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingLinkProviderType {
    #[default]
    None,
    Zoom,
    GoogleMeet,
}

impl MeetingLinkProviderType {
    pub fn as_str(&self) -> &str {
        match self {
            MeetingLinkProviderType::None => "none",
            MeetingLinkProviderType::Zoom => "zoom",
            MeetingLinkProviderType::GoogleMeet => "google_meet",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "none" => Some(MeetingLinkProviderType::None),
            "zoom" => Some(MeetingLinkProviderType::Zoom),
            "google_meet" => Some(MeetingLinkProviderType::GoogleMeet),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum InviteStatus {
    /// Still valid. May be already used or still to be used.
    Active = 1,
    /// No longer valid, cannot be used for sign up anymore.
    Revoked = 2,
}

impl InviteStatus {
    pub fn as_str(&self) -> &str {
        match self {
            InviteStatus::Active => "active",
            InviteStatus::Revoked => "revoked",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(InviteStatus::Active),
            "revoked" => Some(InviteStatus::Revoked),
            _ => None,
        }
    }
}

impl From<InviteStatus> for i32 {
    fn from(status: InviteStatus) -> i32 {
        status as i32
    }
}

impl TryFrom<i32> for InviteStatus {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(InviteStatus::Active),
            2 => Ok(InviteStatus::Revoked),
            other => Err(format!("unknown invite status: {}", other)),
        }
    }
}

/// A 32-character identifier for public appointment links: a v4 UUID with
/// the separators stripped. Uniqueness is enforced by the slug column's
/// unique index; creation retries with a fresh value on a collision.
pub fn random_slug() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Entities carrying the shared audit stamps.
pub trait Timestamped {
    fn time_updated_mut(&mut self) -> &mut DateTime<Utc>;

    /// Moves the "updated" stamp to now. Does not persist the change.
    fn touch(&mut self) {
        *self.time_updated_mut() = Utc::now();
    }
}

macro_rules! impl_timestamped {
    ($($entity:ty),+ $(,)?) => {$(
        impl Timestamped for $entity {
            fn time_updated_mut(&mut self) -> &mut DateTime<Utc> {
                &mut self.time_updated
            }
        }
    )+};
}

/// An account. Credential hash and PII live in encrypted columns; the
/// decrypted values are what this struct holds in memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscriber {
    pub id: i32,
    pub username: String,
    /// Hashed by the auth layer before it ever reaches storage.
    pub password: Option<String>,
    pub email: String,
    pub name: Option<String>,
    pub level: SubscriberLevel,
    pub timezone: Option<String>,
    pub avatar_url: Option<String>,
    pub short_link_hash: Option<String>,
    /// Tokens issued before this point are rejected after a credential reset.
    pub minimum_valid_iat_time: Option<DateTime<Utc>>,
    pub time_created: DateTime<Utc>,
    pub time_updated: DateTime<Utc>,
}

/// A connection to an external calendar source, owned by one subscriber.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calendar {
    pub id: i32,
    pub owner_id: i32,
    pub provider: CalendarProvider,
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

/// A one-off bookable event definition, owned by one calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i32,
    /// Public-facing identifier, distinct from the primary key.
    pub uuid: Uuid,
    pub calendar_id: i32,
    pub duration: Option<i32>,
    pub title: String,
    pub location_type: LocationType,
    pub location_suggestions: Option<String>,
    pub location_selected: Option<i32>,
    pub location_name: Option<String>,
    pub location_url: Option<String>,
    pub location_phone: Option<String>,
    pub details: Option<String>,
    /// Globally unique, used in public links.
    pub slug: String,
    /// Allow multiple bookings on the same appointment.
    pub keep_open: bool,
    pub status: AppointmentStatus,
    pub meeting_link_provider: MeetingLinkProviderType,
    pub time_created: DateTime<Utc>,
    pub time_updated: DateTime<Utc>,
}

/// A recurring-availability template bound to a calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: i32,
    pub calendar_id: i32,
    pub active: bool,
    pub name: String,
    pub location_type: LocationType,
    pub location_url: Option<String>,
    pub details: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    /// Minimum lead before a booking, in minutes.
    pub earliest_booking: i32,
    /// Maximum lead before a booking, in minutes.
    pub farthest_booking: i32,
    pub weekdays: Vec<DayOfWeek>,
    pub slot_duration: i32,
    pub meeting_link_provider: MeetingLinkProviderType,
    pub time_created: DateTime<Utc>,
    pub time_updated: DateTime<Utc>,
}

impl Schedule {
    /// Start time-of-day re-expressed in the owner's timezone.
    ///
    /// The stored time is attached to the date the record was last saved,
    /// stamped as UTC and converted. Around a daylight-saving transition the
    /// result can be off by an hour; display convenience only, never a
    /// scheduling authority.
    pub fn start_time_local(&self, tz: Tz) -> Option<NaiveTime> {
        self.start_time.and_then(|t| self.localize(t, tz))
    }

    /// End time-of-day re-expressed in the owner's timezone.
    pub fn end_time_local(&self, tz: Tz) -> Option<NaiveTime> {
        self.end_time.and_then(|t| self.localize(t, tz))
    }

    fn localize(&self, time: NaiveTime, tz: Tz) -> Option<NaiveTime> {
        let saved = self
            .time_updated
            .date_naive()
            .and_hms_opt(time.hour(), time.minute(), 0)?;
        Some(saved.and_utc().with_timezone(&tz).time())
    }
}

/// Per-day override of a schedule's booking window. Not consulted by any
/// booking flow yet; modeled for custom per-weekday availability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Availability {
    pub id: i32,
    pub schedule_id: i32,
    pub day_of_week: DayOfWeek,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    /// Can't book if it's less than this many minutes before start.
    pub min_time_before_meeting: i32,
    pub slot_duration: Option<i32>,
    pub time_created: DateTime<Utc>,
    pub time_updated: DateTime<Utc>,
}

/// A non-account participant, identified by email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendee {
    pub id: i32,
    pub email: String,
    pub name: Option<String>,
    pub timezone: Option<String>,
    pub time_created: DateTime<Utc>,
    pub time_updated: DateTime<Utc>,
}

/// The atomic bookable unit, produced from an appointment or a schedule.
///
/// `appointment_id` and `schedule_id` are mutually exclusive; the query layer
/// refuses to set both. `Requested` implies a live token and no attendee;
/// `Booked` implies an attendee is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub id: i32,
    pub appointment_id: Option<i32>,
    pub schedule_id: Option<i32>,
    pub attendee_id: Option<i32>,
    pub subscriber_id: Option<i32>,
    pub start: DateTime<Utc>,
    pub duration: Option<i32>,
    /// Provider-specific id usable to query against their service.
    pub meeting_link_id: Option<String>,
    /// Overrides the appointment's or schedule's location url once booked.
    pub meeting_link_url: Option<String>,
    /// Opaque secret confirming or cancelling a pending booking via link.
    pub booking_tkn: Option<String>,
    pub booking_expires_at: Option<DateTime<Utc>>,
    pub booking_status: BookingStatus,
    pub time_created: DateTime<Utc>,
    pub time_updated: DateTime<Utc>,
}

/// An OAuth/token link from a subscriber to an external service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalConnection {
    pub id: i32,
    pub owner_id: i32,
    pub name: String,
    pub kind: ExternalConnectionType,
    pub type_id: String,
    pub token: String,
    pub time_created: DateTime<Utc>,
    pub time_updated: DateTime<Utc>,
}

/// First of a subscriber's loaded connections matching `kind`, or `None`.
/// Linear scan; n is bounded by the enumerated connection types.
pub fn first_connection_of_type(
    connections: &[ExternalConnection],
    kind: ExternalConnectionType,
) -> Option<&ExternalConnection> {
    connections.iter().find(|connection| connection.kind == kind)
}

/// A signup gate code, assignable to at most one subscriber at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invite {
    pub id: i32,
    pub subscriber_id: Option<i32>,
    pub code: String,
    pub status: InviteStatus,
    pub time_created: DateTime<Utc>,
    pub time_updated: DateTime<Utc>,
}

impl Invite {
    /// True if the code is assigned to a subscriber, whatever its status.
    pub fn is_used(&self) -> bool {
        self.subscriber_id.is_some()
    }

    pub fn is_revoked(&self) -> bool {
        self.status == InviteStatus::Revoked
    }

    /// True if the code is neither assigned nor revoked.
    pub fn is_available(&self) -> bool {
        self.subscriber_id.is_none() && self.status == InviteStatus::Active
    }
}

impl_timestamped!(
    Subscriber,
    Calendar,
    Appointment,
    Schedule,
    Availability,
    Attendee,
    Slot,
    ExternalConnection,
    Invite,
);

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_invite() -> Invite {
        Invite {
            id: 1,
            subscriber_id: None,
            code: random_slug(),
            status: InviteStatus::Active,
            time_created: Utc::now(),
            time_updated: Utc::now(),
        }
    }

    fn sample_schedule(time_updated: DateTime<Utc>) -> Schedule {
        Schedule {
            id: 1,
            calendar_id: 1,
            active: true,
            name: "Office hours".into(),
            location_type: LocationType::Online,
            location_url: None,
            details: None,
            start_date: None,
            end_date: None,
            start_time: NaiveTime::from_hms_opt(16, 0, 0),
            end_time: NaiveTime::from_hms_opt(17, 30, 0),
            earliest_booking: 1440,
            farthest_booking: 20160,
            weekdays: DayOfWeek::weekdays(),
            slot_duration: 30,
            meeting_link_provider: MeetingLinkProviderType::None,
            time_created: time_updated,
            time_updated,
        }
    }

    #[test]
    fn touch_only_moves_the_updated_stamp() {
        let mut invite = sample_invite();
        let before = invite.clone();
        invite.touch();

        assert!(invite.time_updated > before.time_updated);
        assert_eq!(invite.time_created, before.time_created);
        assert_eq!(invite.code, before.code);
        assert_eq!(invite.status, before.status);
        assert_eq!(invite.subscriber_id, before.subscriber_id);
    }

    #[test]
    fn invite_predicates() {
        let mut invite = sample_invite();
        assert!(invite.is_available());
        assert!(!invite.is_used());
        assert!(!invite.is_revoked());

        invite.subscriber_id = Some(7);
        assert!(invite.is_used());
        assert!(!invite.is_available());

        // used is independent of status; available and used never coincide
        invite.status = InviteStatus::Revoked;
        assert!(invite.is_used());
        assert!(invite.is_revoked());
        assert!(!invite.is_available());

        invite.subscriber_id = None;
        assert!(!invite.is_used());
        assert!(!invite.is_available());
    }

    #[test]
    fn slugs_are_32_hex_chars_and_distinct() {
        let a = random_slug();
        let b = random_slug();

        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn schedule_times_localize_against_the_saved_date() {
        // January: New York is UTC-5, so 16:00 UTC is 11:00 local.
        let winter = Utc.with_ymd_and_hms(2025, 1, 15, 9, 30, 0).unwrap();
        let schedule = sample_schedule(winter);
        let tz: Tz = "America/New_York".parse().unwrap();

        assert_eq!(
            schedule.start_time_local(tz),
            NaiveTime::from_hms_opt(11, 0, 0)
        );
        assert_eq!(
            schedule.end_time_local(tz),
            NaiveTime::from_hms_opt(12, 30, 0)
        );

        // July: daylight saving shifts the same stored time to 12:00 local.
        let summer = Utc.with_ymd_and_hms(2025, 7, 15, 9, 30, 0).unwrap();
        let schedule = sample_schedule(summer);
        assert_eq!(
            schedule.start_time_local(tz),
            NaiveTime::from_hms_opt(12, 0, 0)
        );
    }

    #[test]
    fn schedule_times_localize_in_fixed_offset_zones() {
        // Phoenix does not observe daylight saving; always UTC-7.
        let tz: Tz = "America/Phoenix".parse().unwrap();
        for month in [1, 7] {
            let stamp = Utc.with_ymd_and_hms(2025, month, 15, 9, 30, 0).unwrap();
            let schedule = sample_schedule(stamp);
            assert_eq!(
                schedule.start_time_local(tz),
                NaiveTime::from_hms_opt(9, 0, 0)
            );
        }
    }

    #[test]
    fn first_connection_scan_returns_the_first_match() {
        let now = Utc::now();
        let connection = |id, kind| ExternalConnection {
            id,
            owner_id: 1,
            name: format!("conn-{}", id),
            kind,
            type_id: format!("ext-{}", id),
            token: "tok".into(),
            time_created: now,
            time_updated: now,
        };
        let connections = vec![
            connection(1, ExternalConnectionType::Fxa),
            connection(2, ExternalConnectionType::Zoom),
            connection(3, ExternalConnectionType::Zoom),
        ];

        let found = first_connection_of_type(&connections, ExternalConnectionType::Zoom);
        assert_eq!(found.map(|c| c.id), Some(2));
        assert!(first_connection_of_type(&connections, ExternalConnectionType::Google).is_none());
    }

    #[test]
    fn enum_wire_forms_are_stable() {
        assert_eq!(serde_json::to_string(&SubscriberLevel::Plus).unwrap(), "2");
        assert_eq!(serde_json::to_string(&SubscriberLevel::Admin).unwrap(), "99");
        assert_eq!(serde_json::to_string(&BookingStatus::Empty).unwrap(), "1");
        assert_eq!(serde_json::to_string(&DayOfWeek::Sunday).unwrap(), "7");
        assert_eq!(
            serde_json::to_string(&MeetingLinkProviderType::GoogleMeet).unwrap(),
            "\"google_meet\""
        );

        let level: SubscriberLevel = serde_json::from_str("3").unwrap();
        assert_eq!(level, SubscriberLevel::Pro);
        assert!(serde_json::from_str::<SubscriberLevel>("4").is_err());
        assert!(serde_json::from_str::<DayOfWeek>("8").is_err());

        assert_eq!(BookingStatus::from_str("none"), Some(BookingStatus::Empty));
        assert_eq!(AppointmentStatus::Draft.as_str(), "draft");
        assert_eq!(
            MeetingLinkProviderType::from_str("google_meet"),
            Some(MeetingLinkProviderType::GoogleMeet)
        );
    }
}
