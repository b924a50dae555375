use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One bookable time unit at one court, after vendor normalization.
///
/// `(date_time, resource_name)` is the de-duplication key within one
/// aggregation response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedSlot {
    pub resource_id: String,
    pub resource_name: String,
    pub availability_count: u32,
    /// ISO-8601 timestamp; passed through verbatim where the vendor supplies one.
    pub bookable_from: String,
    /// Only "Available" (case-insensitive on ingress) counts as bookable.
    pub status: String,
    /// Opaque vendor slot id, may be empty.
    pub external_reference: String,
    pub date_time: DateTime<Utc>,
}

impl NormalizedSlot {
    pub fn dedup_key(&self) -> (DateTime<Utc>, &str) {
        (self.date_time, &self.resource_name)
    }
}

/// The three vendor backend kinds this service aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VendorKind {
    /// Structured JSON timetable API; answers a single instant per call.
    TimetableApi,
    /// HTML-rendered booking calendar; one page covers a whole day.
    BookingPage,
    /// Venue-availability JSON API; one call covers a whole day.
    VenueApi,
}

impl VendorKind {
    pub fn granularity(self) -> ProbeGranularity {
        match self {
            VendorKind::TimetableApi => ProbeGranularity::TwoHourly,
            VendorKind::BookingPage | VendorKind::VenueApi => ProbeGranularity::Daily,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VendorKind::TimetableApi => "timetable-api",
            VendorKind::BookingPage => "booking-page",
            VendorKind::VenueApi => "venue-api",
        }
    }
}

/// How densely a vendor is probed across the 14-day window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeGranularity {
    /// One probe per calendar day; the vendor returns the whole day's slots.
    Daily,
    /// One probe every 2 hours, 07:00-21:00 inclusive.
    TwoHourly,
}
