use crate::adapters::{BookingPageAdapter, TimetableAdapter, VenueAdapter};
use crate::config::locations::{LocationRegistry, VendorConfig};
use crate::config::Endpoints;
use crate::core::cache::{ProbeCache, ProbeKey};
use crate::core::window;
use crate::domain::model::NormalizedSlot;
use crate::domain::ports::VendorAdapter;
use crate::utils::error::{AggregateError, Result};
use chrono::{DateTime, Utc};
use futures::future;
use reqwest::Client;
use std::collections::HashSet;
use std::sync::Arc;

/// The unified slot list for one location, plus generation metadata.
#[derive(Debug, Clone)]
pub struct Aggregation {
    pub location: String,
    pub slots: Vec<NormalizedSlot>,
    pub generated_at: DateTime<Utc>,
}

/// Fans one location's probe window out across its vendor adapter, flattens
/// the results and removes duplicate slots.
pub struct Aggregator {
    client: Client,
    registry: LocationRegistry,
    endpoints: Endpoints,
}

impl Aggregator {
    pub fn new(registry: LocationRegistry, endpoints: Endpoints) -> Self {
        Self {
            client: Client::new(),
            registry,
            endpoints,
        }
    }

    pub fn registry(&self) -> &LocationRegistry {
        &self.registry
    }

    pub async fn aggregate(&self, location: &str) -> Result<Aggregation> {
        self.aggregate_at(location, Utc::now()).await
    }

    /// Like [`aggregate`](Self::aggregate), with an injectable window start.
    pub async fn aggregate_at(&self, location: &str, now: DateTime<Utc>) -> Result<Aggregation> {
        let config = self
            .registry
            .get(location)
            .ok_or_else(|| AggregateError::UnknownLocation {
                location: location.to_string(),
                known: self.registry.keys(),
            })?;
        let kind = config.kind();
        let probes = window::probe_instants(now, kind.granularity());
        tracing::info!(
            "🔍 {}: probing {} with {} instants over {} days",
            location,
            kind.as_str(),
            probes.len(),
            window::WINDOW_DAYS
        );

        let adapter = self.adapter_for(location, config);
        // Run-scoped: created per aggregation, dropped on return.
        let cache = Arc::new(ProbeCache::new());

        // Full fan-out, join-all: every probe settles (success or
        // empty-on-error) before the run completes. No timeout here; the
        // caller imposes the deadline.
        let fetches = probes.into_iter().map(|probe| {
            let adapter = Arc::clone(&adapter);
            let cache = Arc::clone(&cache);
            let key = ProbeKey::new(kind, location, probe);
            async move {
                cache
                    .get_or_fetch(key, async move { adapter.fetch(probe).await })
                    .await
            }
        });
        let results = future::join_all(fetches).await;

        let mut seen: HashSet<(DateTime<Utc>, String)> = HashSet::new();
        let mut slots: Vec<NormalizedSlot> = Vec::new();
        for slot in results.into_iter().flatten() {
            // First occurrence wins when two probes report the same
            // (instant, court) pair.
            if seen.insert((slot.date_time, slot.resource_name.clone())) {
                slots.push(slot);
            }
        }
        slots.sort_by_key(|slot| slot.date_time);
        cache.clear().await;

        tracing::info!("✅ {}: {} unique bookable slots", location, slots.len());
        Ok(Aggregation {
            location: location.to_string(),
            slots,
            generated_at: Utc::now(),
        })
    }

    fn adapter_for(&self, location: &str, config: &VendorConfig) -> Arc<dyn VendorAdapter> {
        match config {
            VendorConfig::TimetableApi {
                activity_id,
                site_id,
                location_id,
            } => Arc::new(TimetableAdapter::new(
                self.client.clone(),
                self.endpoints.timetable.clone(),
                activity_id.clone(),
                site_id.clone(),
                location_id.clone(),
            )),
            VendorConfig::BookingPage {
                facility_id,
                sport_id,
            } => Arc::new(BookingPageAdapter::new(
                self.client.clone(),
                self.endpoints.booking_page.clone(),
                facility_id.clone(),
                sport_id.clone(),
                location.to_string(),
            )),
            VendorConfig::VenueApi { venue_id } => Arc::new(VenueAdapter::new(
                self.client.clone(),
                self.endpoints.venue.clone(),
                venue_id.clone(),
                location.to_string(),
            )),
        }
    }
}
