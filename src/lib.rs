pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::config::locations::{LocationRegistry, VendorConfig};
pub use crate::config::Endpoints;
pub use crate::core::aggregator::{Aggregation, Aggregator};
pub use crate::core::envelope::{self, AvailabilityResponse, LocationError};
pub use crate::domain::model::{NormalizedSlot, VendorKind};
pub use crate::utils::error::{AggregateError, Result};
