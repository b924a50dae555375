pub mod aggregator;
pub mod cache;
pub mod envelope;
pub mod window;

pub use crate::domain::model::{NormalizedSlot, ProbeGranularity, VendorKind};
pub use crate::domain::ports::VendorAdapter;
pub use crate::utils::error::Result;
