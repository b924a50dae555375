use crate::adapters::slugify;
use crate::domain::model::NormalizedSlot;
use crate::domain::ports::VendorAdapter;
use crate::utils::error::{AggregateError, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

/// Venue-availability JSON API. One call returns a whole day's slots for
/// every court at the venue, so the aggregator probes it once per day.
pub struct VenueAdapter {
    client: Client,
    base_url: String,
    venue_id: String,
    resource_prefix: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VenueResponse {
    venue_details: Option<Vec<VenueCourt>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VenueCourt {
    name: String,
    #[serde(default)]
    available_slots: Vec<VenueSlot>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VenueSlot {
    start_time: String,
    #[serde(default)]
    slot_id: Option<String>,
}

impl VenueAdapter {
    pub fn new(client: Client, base_url: String, venue_id: String, resource_prefix: String) -> Self {
        Self {
            client,
            base_url,
            venue_id,
            resource_prefix,
        }
    }

    async fn try_fetch(&self, probe: DateTime<Utc>) -> Result<Vec<NormalizedSlot>> {
        let date = probe.format("%Y-%m-%d").to_string();
        tracing::debug!("Venue request: {} date={}", self.base_url, date);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("venueid", self.venue_id.as_str()), ("date", date.as_str())])
            .send()
            .await?
            .error_for_status()?;

        let body: VenueResponse = response.json().await?;
        let courts = body.venue_details.ok_or_else(|| AggregateError::ShapeMismatch {
            vendor: "venue-api",
            reason: "response is missing venueDetails".to_string(),
        })?;

        let mut slots = Vec::new();
        for court in courts {
            for slot in court.available_slots {
                let Some(instant) = parse_instant(&slot.start_time) else {
                    tracing::warn!(
                        "Venue slot for '{}' has unparseable startTime '{}', skipping",
                        court.name,
                        slot.start_time
                    );
                    continue;
                };
                slots.push(NormalizedSlot {
                    resource_id: format!("{}-{}", self.resource_prefix, slugify(&court.name)),
                    resource_name: court.name.clone(),
                    availability_count: 1,
                    bookable_from: slot.start_time,
                    status: "Available".to_string(),
                    external_reference: slot.slot_id.unwrap_or_default(),
                    date_time: instant,
                });
            }
        }

        Ok(slots)
    }
}

/// The vendor emits RFC 3339 timestamps, with the zone suffix sometimes
/// absent. Zoneless values are taken as UTC.
fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

#[async_trait]
impl VendorAdapter for VenueAdapter {
    async fn fetch(&self, probe: DateTime<Utc>) -> Vec<NormalizedSlot> {
        match self.try_fetch(probe).await {
            Ok(slots) => slots,
            Err(e) => {
                tracing::warn!("Venue fetch failed for {}: {}", probe, e);
                Vec::new()
            }
        }
    }
}
