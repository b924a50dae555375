use chrono::{DateTime, Utc};
use courtwatch::{envelope, AggregateError, Aggregator, Endpoints, LocationRegistry};
use httpmock::prelude::*;
use std::collections::HashSet;

fn endpoints(server: &MockServer) -> Endpoints {
    Endpoints {
        timetable: server.url("/timetable"),
        booking_page: server.url("/listSlots"),
        venue: server.url("/venue"),
    }
}

fn window_start() -> DateTime<Utc> {
    "2025-08-10T08:00:00Z".parse().unwrap()
}

#[tokio::test]
async fn test_unknown_location_fails_without_network_calls() {
    let server = MockServer::start();
    let any_call = server.mock(|when, then| {
        when.method(GET);
        then.status(200).json_body(serde_json::json!({}));
    });

    let aggregator = Aggregator::new(LocationRegistry::default(), endpoints(&server));
    let result = aggregator.aggregate("brighton-squash").await;

    match result {
        Err(AggregateError::UnknownLocation { location, known }) => {
            assert_eq!(location, "brighton-squash");
            assert_eq!(
                known,
                vec![
                    "triangle-padel",
                    "triangle-tennis",
                    "hove-tennis",
                    "patcham-tennis"
                ]
            );
        }
        other => panic!("expected UnknownLocation, got {:?}", other),
    }
    assert_eq!(any_call.hits(), 0);
}

#[tokio::test]
async fn test_day_granularity_vendor_is_called_once_per_day() {
    let server = MockServer::start();
    // Same payload for every date: two courts, one slot each.
    let venue_mock = server.mock(|when, then| {
        when.method(GET).path("/venue");
        then.status(200).json_body(serde_json::json!({
            "venueDetails": [
                {
                    "name": "Court 1",
                    "availableSlots": [{"startTime": "2025-08-14T08:00:00Z", "slotId": "s-1"}]
                },
                {
                    "name": "Court 2",
                    "availableSlots": [{"startTime": "2025-08-14T09:00:00Z", "slotId": "s-2"}]
                }
            ]
        }));
    });

    let aggregator = Aggregator::new(LocationRegistry::default(), endpoints(&server));
    let aggregation = aggregator
        .aggregate_at("patcham-tennis", window_start())
        .await
        .unwrap();

    // 14 daily probes, one underlying call each.
    assert_eq!(venue_mock.hits(), 14);
    // Every day reported the same two (dateTime, court) pairs; duplicates
    // collapse to the first occurrence.
    assert_eq!(aggregation.slots.len(), 2);
    let names: Vec<&str> = aggregation
        .slots
        .iter()
        .map(|s| s.resource_name.as_str())
        .collect();
    assert_eq!(names, vec!["Court 1", "Court 2"]);
}

#[tokio::test]
async fn test_fine_granularity_vendor_probes_full_two_hourly_grid() {
    let server = MockServer::start();
    let timetable_mock = server.mock(|when, then| {
        when.method(GET).path("/timetable");
        then.status(200).json_body(serde_json::json!({
            "success": true,
            "data": [
                {
                    "locationId": "149ZPAD001",
                    "locationName": "Padel Court 1",
                    "availability": 1,
                    "bookableFrom": "2025-08-03T09:00:00.000Z",
                    "status": "Available",
                    "slotReferencesInCentre": ""
                }
            ],
            "errors": []
        }));
    });

    let aggregator = Aggregator::new(LocationRegistry::default(), endpoints(&server));
    let aggregation = aggregator
        .aggregate_at("triangle-padel", window_start())
        .await
        .unwrap();

    // 8 probes/day x 14 days, each a distinct cache key.
    assert_eq!(timetable_mock.hits(), 112);
    // Each probe stamps the court with its own instant, so nothing collapses.
    assert_eq!(aggregation.slots.len(), 112);

    let mut pairs = HashSet::new();
    for slot in &aggregation.slots {
        assert!(
            pairs.insert((slot.date_time, slot.resource_name.clone())),
            "duplicate (dateTime, resourceName) pair in response"
        );
    }

    let mut sorted = aggregation.slots.clone();
    sorted.sort_by_key(|s| s.date_time);
    assert_eq!(aggregation.slots, sorted);
}

#[tokio::test]
async fn test_total_vendor_outage_yields_empty_success() {
    let server = MockServer::start();
    let venue_mock = server.mock(|when, then| {
        when.method(GET).path("/venue");
        then.status(500);
    });

    let aggregator = Aggregator::new(LocationRegistry::default(), endpoints(&server));
    let aggregation = aggregator
        .aggregate_at("patcham-tennis", window_start())
        .await
        .unwrap();

    assert_eq!(venue_mock.hits(), 14);
    assert!(aggregation.slots.is_empty());

    let response = envelope::success(aggregation);
    assert!(response.success);
    assert_eq!(response.total_slots, 0);
}

#[tokio::test]
async fn test_success_envelope_carries_count_and_location() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/venue");
        then.status(200).json_body(serde_json::json!({
            "venueDetails": [
                {
                    "name": "Court 1",
                    "availableSlots": [{"startTime": "2025-08-11T18:00:00Z", "slotId": "s-9"}]
                }
            ]
        }));
    });

    let aggregator = Aggregator::new(LocationRegistry::default(), endpoints(&server));
    let aggregation = aggregator
        .aggregate_at("patcham-tennis", window_start())
        .await
        .unwrap();
    let response = envelope::success(aggregation);

    assert!(response.success);
    assert_eq!(response.location, "patcham-tennis");
    assert_eq!(response.total_slots, response.data.len());
    assert_eq!(response.total_slots, 1);
}
