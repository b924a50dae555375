use crate::domain::model::NormalizedSlot;
use crate::domain::ports::VendorAdapter;
use crate::utils::error::{AggregateError, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use serde::Deserialize;

/// Structured JSON timetable API. The endpoint answers availability for a
/// single instant per call, so the aggregator probes it on a two-hourly grid.
pub struct TimetableAdapter {
    client: Client,
    base_url: String,
    activity_id: String,
    site_id: String,
    location_id: String,
}

#[derive(Debug, Deserialize)]
struct TimetableResponse {
    success: bool,
    #[serde(default)]
    data: Option<Vec<TimetableEntry>>,
    #[serde(default)]
    errors: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimetableEntry {
    location_id: String,
    location_name: String,
    availability: u32,
    bookable_from: String,
    status: String,
    #[serde(default)]
    slot_references_in_centre: String,
}

impl TimetableAdapter {
    pub fn new(
        client: Client,
        base_url: String,
        activity_id: String,
        site_id: String,
        location_id: String,
    ) -> Self {
        Self {
            client,
            base_url,
            activity_id,
            site_id,
            location_id,
        }
    }

    async fn try_fetch(&self, probe: DateTime<Utc>) -> Result<Vec<NormalizedSlot>> {
        let start_date = probe.to_rfc3339_opts(SecondsFormat::Millis, true);
        tracing::debug!("Timetable request: {} startDate={}", self.base_url, start_date);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("activityId", self.activity_id.as_str()),
                ("siteId", self.site_id.as_str()),
                ("locationId", self.location_id.as_str()),
                ("startDate", start_date.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: TimetableResponse = response.json().await?;
        if !body.success {
            return Err(AggregateError::ShapeMismatch {
                vendor: "timetable-api",
                reason: format!("upstream reported failure: {:?}", body.errors),
            });
        }

        let slots = body
            .data
            .unwrap_or_default()
            .into_iter()
            .filter(|entry| entry.availability > 0 && entry.status.eq_ignore_ascii_case("available"))
            .map(|entry| NormalizedSlot {
                resource_id: entry.location_id,
                resource_name: entry.location_name,
                availability_count: entry.availability,
                bookable_from: entry.bookable_from,
                status: entry.status,
                external_reference: entry.slot_references_in_centre,
                // The query answers one instant; stamp every entry with it.
                date_time: probe,
            })
            .collect();

        Ok(slots)
    }
}

#[async_trait]
impl VendorAdapter for TimetableAdapter {
    async fn fetch(&self, probe: DateTime<Utc>) -> Vec<NormalizedSlot> {
        match self.try_fetch(probe).await {
            Ok(slots) => slots,
            Err(e) => {
                tracing::warn!("Timetable fetch failed for {}: {}", probe, e);
                Vec::new()
            }
        }
    }
}
