use crate::core::aggregator::Aggregation;
use crate::domain::model::NormalizedSlot;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Success payload served to the external consumer (the UI).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub success: bool,
    pub data: Vec<NormalizedSlot>,
    pub location: String,
    pub last_updated: DateTime<Utc>,
    pub total_slots: usize,
}

/// Client-error payload for a location key outside the configured set.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationError {
    pub success: bool,
    pub error: String,
    pub available_locations: Vec<String>,
}

pub fn success(aggregation: Aggregation) -> AvailabilityResponse {
    let total_slots = aggregation.slots.len();
    AvailabilityResponse {
        success: true,
        data: aggregation.slots,
        location: aggregation.location,
        last_updated: aggregation.generated_at,
        total_slots,
    }
}

pub fn unknown_location(known: Vec<String>) -> LocationError {
    LocationError {
        success: false,
        error: "Invalid location specified".to_string(),
        available_locations: known,
    }
}
