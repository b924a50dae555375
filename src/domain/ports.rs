use crate::domain::model::NormalizedSlot;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Uniform fetch contract for one vendor backend.
///
/// Implementations are fail-open: transport, parse and shape errors are
/// logged and reported as zero slots for that probe, never as an error. A
/// broken vendor must not abort the aggregation run.
#[async_trait]
pub trait VendorAdapter: Send + Sync {
    async fn fetch(&self, probe: DateTime<Utc>) -> Vec<NormalizedSlot>;
}
