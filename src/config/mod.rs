pub mod locations;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;

pub const TIMETABLE_URL: &str =
    "https://www.placesleisure.org/umbraco/api/timetables/getgladstoneavailability";
pub const BOOKING_PAGE_URL: &str = "https://www.matchi.se/book/listSlots";
pub const VENUE_URL: &str = "https://www.lta.org.uk/api/courtdetail/availability";

/// Outbound vendor endpoint bases. Overridable for tests and proxies; the
/// vendor-specific query parameters are appended by each adapter.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub timetable: String,
    pub booking_page: String,
    pub venue: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            timetable: TIMETABLE_URL.to_string(),
            booking_page: BOOKING_PAGE_URL.to_string(),
            venue: VENUE_URL.to_string(),
        }
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "courtwatch")]
#[command(about = "Aggregates court availability from third-party booking backends")]
pub struct CliConfig {
    #[arg(long, default_value = "triangle-padel")]
    pub location: String,

    #[arg(long, default_value = TIMETABLE_URL)]
    pub timetable_url: String,

    #[arg(long, default_value = BOOKING_PAGE_URL)]
    pub booking_page_url: String,

    #[arg(long, default_value = VENUE_URL)]
    pub venue_url: String,

    #[arg(long, help = "Print the full response envelope as JSON")]
    pub json: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn endpoints(&self) -> Endpoints {
        Endpoints {
            timetable: self.timetable_url.clone(),
            booking_page: self.booking_page_url.clone(),
            venue: self.venue_url.clone(),
        }
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("location", &self.location)?;
        validation::validate_url("timetable_url", &self.timetable_url)?;
        validation::validate_url("booking_page_url", &self.booking_page_url)?;
        validation::validate_url("venue_url", &self.venue_url)?;
        Ok(())
    }
}
