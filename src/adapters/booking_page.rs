use crate::adapters::slugify;
use crate::domain::model::NormalizedSlot;
use crate::domain::ports::VendorAdapter;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;
use reqwest::Client;

// The upstream markup is inconsistent across time segments, so extraction is
// a priority-ordered list of passes: a direct court+time+button scan first,
// then a per-time-segment scan when the first finds nothing. Best-effort by
// nature; a layout change upstream degrades to zero slots, not an error.
const COURT_WITH_TIME_PATTERN: &str = r#"(?s)<td[^>]*>\s*(Tennis Court \d+)\s*</td>.*?<strong>(\d+)<sup>(\d+)</sup></strong>.*?class="btn btn-success btn-sm""#;
const TIME_SEGMENT_PATTERN: &str =
    r#"(?s)<h6>.*?<strong>(\d+)<sup>(\d+)</sup></strong>.*?</h6>(.*?)</ul>"#;
const COURT_IN_SEGMENT_PATTERN: &str =
    r#"(?s)<td[^>]*>\s*(Tennis Court \d+)\s*</td>.*?class="btn btn-success btn-sm""#;

/// HTML-rendered booking calendar. One page lists a whole day, so the
/// aggregator probes it once per day.
pub struct BookingPageAdapter {
    client: Client,
    base_url: String,
    facility_id: String,
    sport_id: String,
    resource_prefix: String,
    court_with_time: Regex,
    time_segment: Regex,
    court_in_segment: Regex,
}

impl BookingPageAdapter {
    pub fn new(
        client: Client,
        base_url: String,
        facility_id: String,
        sport_id: String,
        resource_prefix: String,
    ) -> Self {
        Self {
            client,
            base_url,
            facility_id,
            sport_id,
            resource_prefix,
            court_with_time: Regex::new(COURT_WITH_TIME_PATTERN).unwrap(),
            time_segment: Regex::new(TIME_SEGMENT_PATTERN).unwrap(),
            court_in_segment: Regex::new(COURT_IN_SEGMENT_PATTERN).unwrap(),
        }
    }

    async fn try_fetch(&self, probe: DateTime<Utc>) -> Result<Vec<NormalizedSlot>> {
        let date = probe.format("%Y-%m-%d").to_string();
        tracing::debug!("Booking page request: {} date={}", self.base_url, date);

        let html = self
            .client
            .get(&self.base_url)
            .query(&[
                ("facility", self.facility_id.as_str()),
                ("date", date.as_str()),
                ("sport", self.sport_id.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let mut slots = self.extract_direct(&html, probe);
        if slots.is_empty() {
            tracing::debug!("Direct extraction found nothing for {}, trying segmented pass", date);
            slots = self.extract_segmented(&html, probe);
        }

        Ok(slots)
    }

    /// Primary pass: court label, hour/minute pair and success booking
    /// button co-located in one fragment.
    fn extract_direct(&self, html: &str, probe: DateTime<Utc>) -> Vec<NormalizedSlot> {
        self.court_with_time
            .captures_iter(html)
            .filter_map(|caps| {
                let hour = caps[2].parse().ok()?;
                let minute = caps[3].parse().ok()?;
                self.slot_at(probe, hour, minute, &caps[1])
            })
            .collect()
    }

    /// Fallback pass: segment the document by time header, then scan each
    /// segment for court labels with a booking button.
    fn extract_segmented(&self, html: &str, probe: DateTime<Utc>) -> Vec<NormalizedSlot> {
        let mut slots = Vec::new();
        for segment in self.time_segment.captures_iter(html) {
            let (Ok(hour), Ok(minute)) = (segment[1].parse(), segment[2].parse()) else {
                continue;
            };
            for court in self.court_in_segment.captures_iter(&segment[3]) {
                if let Some(slot) = self.slot_at(probe, hour, minute, &court[1]) {
                    slots.push(slot);
                }
            }
        }
        slots
    }

    fn slot_at(
        &self,
        probe: DateTime<Utc>,
        hour: u32,
        minute: u32,
        name: &str,
    ) -> Option<NormalizedSlot> {
        let instant = probe.date_naive().and_hms_opt(hour, minute, 0)?.and_utc();
        Some(NormalizedSlot {
            resource_id: format!("{}-{}", self.resource_prefix, slugify(name)),
            resource_name: name.to_string(),
            availability_count: 1,
            bookable_from: instant.to_rfc3339_opts(SecondsFormat::Millis, true),
            status: "Available".to_string(),
            external_reference: String::new(),
            date_time: instant,
        })
    }
}

#[async_trait]
impl VendorAdapter for BookingPageAdapter {
    async fn fetch(&self, probe: DateTime<Utc>) -> Vec<NormalizedSlot> {
        match self.try_fetch(probe).await {
            Ok(slots) => slots,
            Err(e) => {
                tracing::warn!("Booking page fetch failed for {}: {}", probe, e);
                Vec::new()
            }
        }
    }
}
