use std::sync::Arc;

use time::macros::date;

use crate::helpers::{
    get_page_request, lookup_request, portland, sample, send, spawn_app, MockArchiveStub,
    MockGeocoderStub, MockStoreStub,
};
use climatrends::MemoryStore;

#[tokio::test]
async fn get_renders_the_empty_state() {
    // None of the collaborators may be touched on a plain page load
    let app = spawn_app(
        Arc::new(MockGeocoderStub::new()),
        Arc::new(MockArchiveStub::new()),
        Arc::new(MockStoreStub::new()),
    );

    let (status, html) = send(&app, get_page_request()).await;

    assert!(status.is_success());
    assert!(html.contains("Month extremes"));
    assert!(html.contains("None"));
    assert!(html.contains("Preset locations"));
    assert!(html.contains("No location selected."));
}

#[tokio::test]
async fn unresolvable_location_renders_empty_and_leaves_storage_untouched() {
    let mut geocoder = MockGeocoderStub::new();
    geocoder
        .expect_lookup()
        .times(1)
        .returning(|_| Ok(None));

    // No expectations on archive or store: any call would panic the test
    let app = spawn_app(
        Arc::new(geocoder),
        Arc::new(MockArchiveStub::new()),
        Arc::new(MockStoreStub::new()),
    );

    let (status, html) = send(&app, lookup_request("location=atlantis&preset=none")).await;

    assert!(status.is_success());
    assert!(html.contains("Month extremes"));
    assert!(html.contains("No location selected."));
}

#[tokio::test]
async fn preset_takes_precedence_over_free_text() {
    let mut geocoder = MockGeocoderStub::new();
    geocoder
        .expect_lookup()
        .withf(|query| query == "Tokyo, Japan")
        .times(1)
        .returning(|_| Ok(None));

    let app = spawn_app(
        Arc::new(geocoder),
        Arc::new(MockArchiveStub::new()),
        Arc::new(MockStoreStub::new()),
    );

    let (status, _) = send(
        &app,
        lookup_request("location=ignored+text&preset=Tokyo%2C+Japan"),
    )
    .await;
    assert!(status.is_success());
}

#[tokio::test]
async fn successful_lookup_renders_address_month_and_series() {
    let mut geocoder = MockGeocoderStub::new();
    geocoder
        .expect_lookup()
        .times(1)
        .returning(|_| Ok(Some(portland())));

    let mut archive = MockArchiveStub::new();
    archive.expect_daily_range().times(1).returning(|_, _, _| {
        Ok(vec![
            sample(date!(2000 - 01 - 03), 45.1, 30.3),
            sample(date!(2000 - 01 - 20), 52.8, 28.4),
            sample(date!(2000 - 02 - 05), 49.9, 33.7),
        ])
    });

    // Real end-to-end through the in-memory backend
    let app = spawn_app(
        Arc::new(geocoder),
        Arc::new(archive),
        Arc::new(MemoryStore::new()),
    );

    let (status, html) = send(&app, lookup_request("location=portland&preset=none")).await;

    assert!(status.is_success());
    assert!(html.contains("February extremes"));
    assert!(html.contains("Multnomah County"));
    // Chart series carries both months
    assert!(html.contains("2000-01"));
    assert!(html.contains("2000-02"));
    // Two months of history cannot have a year-over-year number
    assert!(html.contains("no year-over-year data yet"));
}

#[tokio::test]
async fn geocoder_failure_becomes_a_generic_500() {
    let mut geocoder = MockGeocoderStub::new();
    geocoder.expect_lookup().times(1).returning(|_| {
        Err(climatrends::geocode::Error::Malformed(String::from(
            "north-ish",
        )))
    });

    let app = spawn_app(
        Arc::new(geocoder),
        Arc::new(MockArchiveStub::new()),
        Arc::new(MockStoreStub::new()),
    );

    let (status, body) = send(&app, lookup_request("location=portland&preset=none")).await;

    assert_eq!(status, hyper::StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("internal server error"));
}
