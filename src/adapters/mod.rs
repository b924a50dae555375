// Adapters layer: one fetch-and-normalize implementation per vendor backend.
pub mod booking_page;
pub mod timetable;
pub mod venue;

pub use booking_page::BookingPageAdapter;
pub use timetable::TimetableAdapter;
pub use venue::VenueAdapter;

/// Stable resource-id fragment from a vendor's human label.
pub(crate) fn slugify(label: &str) -> String {
    label
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}
