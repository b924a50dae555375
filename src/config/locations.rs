use crate::domain::model::VendorKind;

/// Static per-location vendor descriptor: which backend serves a location
/// and the identifiers its endpoint expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VendorConfig {
    TimetableApi {
        activity_id: String,
        site_id: String,
        location_id: String,
    },
    BookingPage {
        facility_id: String,
        sport_id: String,
    },
    VenueApi {
        venue_id: String,
    },
}

impl VendorConfig {
    pub fn kind(&self) -> VendorKind {
        match self {
            VendorConfig::TimetableApi { .. } => VendorKind::TimetableApi,
            VendorConfig::BookingPage { .. } => VendorKind::BookingPage,
            VendorConfig::VenueApi { .. } => VendorKind::VenueApi,
        }
    }
}

/// Fixed mapping from location key to vendor descriptor. Lookup order is
/// also the order keys are reported back on an unknown-location error.
#[derive(Debug, Clone)]
pub struct LocationRegistry {
    locations: Vec<(String, VendorConfig)>,
}

impl LocationRegistry {
    pub fn new(locations: Vec<(String, VendorConfig)>) -> Self {
        Self { locations }
    }

    pub fn get(&self, key: &str) -> Option<&VendorConfig> {
        self.locations
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, config)| config)
    }

    pub fn keys(&self) -> Vec<String> {
        self.locations.iter().map(|(k, _)| k.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

impl Default for LocationRegistry {
    fn default() -> Self {
        Self::new(vec![
            (
                "triangle-padel".to_string(),
                VendorConfig::TimetableApi {
                    activity_id: "149A001015".to_string(),
                    site_id: "149".to_string(),
                    location_id: "149ZPAD001".to_string(),
                },
            ),
            (
                "triangle-tennis".to_string(),
                VendorConfig::TimetableApi {
                    activity_id: "149A000010".to_string(),
                    site_id: "149".to_string(),
                    location_id: "MultipleLocation_a9001c36-c5a8-42f0-9ac2-c33cfd0671d0"
                        .to_string(),
                },
            ),
            (
                "hove-tennis".to_string(),
                VendorConfig::BookingPage {
                    facility_id: "2668".to_string(),
                    sport_id: "1".to_string(),
                },
            ),
            (
                "patcham-tennis".to_string(),
                VendorConfig::VenueApi {
                    venue_id: "883bec85-55c3-4765-82e9-87c94210abde".to_string(),
                },
            ),
        ])
    }
}
