use std::sync::Arc;

use mockall::Sequence;
use time::macros::date;

use crate::helpers::{
    lookup_request, portland, record, sample, send, spawn_app, MockArchiveStub, MockGeocoderStub,
    MockStoreStub,
};
use climatrends::HISTORY_START;

/// One stored month with a partial day count, plus a fetch returning more
/// days for it and two new months: exactly one update (the anchor month) and
/// one insert with exactly the two new months.
#[tokio::test]
async fn incremental_sync_updates_anchor_and_inserts_only_new_months() {
    let coord = portland().coord;

    let mut geocoder = MockGeocoderStub::new();
    geocoder
        .expect_lookup()
        .times(1)
        .returning(|_| Ok(Some(portland())));

    let mut archive = MockArchiveStub::new();
    archive
        .expect_daily_range()
        // The fetch resumes from the first day of the anchor month
        .withf(|_, start, _| *start == date!(2024 - 01 - 01))
        .times(1)
        .returning(|_, _, _| {
            Ok(vec![
                sample(date!(2024 - 01 - 03), 50.2, 30.1),
                sample(date!(2024 - 01 - 25), 55.6, 28.4),
                sample(date!(2024 - 02 - 10), 60.0, 35.5),
                sample(date!(2024 - 03 - 02), 65.3, 40.9),
            ])
        });

    let mut store = MockStoreStub::new();
    let mut seq = Sequence::new();

    let coord_for_first = coord.clone();
    store
        .expect_select()
        .times(1)
        .in_sequence(&mut seq)
        .returning(move |_, _| {
            // January was stored from a sync that only saw its first days
            Ok(vec![record(&coord_for_first, "2024-01", 50.2, 30.1)])
        });

    store
        .expect_update()
        .withf(|r| {
            r.month.to_string() == "2024-01" && r.max_temp == 55.6 && r.min_temp == 28.4
        })
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));

    store
        .expect_insert()
        .withf(|records| {
            records.len() == 2
                && records[0].month.to_string() == "2024-02"
                && records[1].month.to_string() == "2024-03"
        })
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));

    let coord_for_last = coord.clone();
    store
        .expect_select()
        .times(1)
        .in_sequence(&mut seq)
        .returning(move |_, _| {
            Ok(vec![
                record(&coord_for_last, "2024-01", 55.6, 28.4),
                record(&coord_for_last, "2024-02", 60.0, 35.5),
                record(&coord_for_last, "2024-03", 65.3, 40.9),
            ])
        });

    let app = spawn_app(Arc::new(geocoder), Arc::new(archive), Arc::new(store));

    let (status, html) = send(&app, lookup_request("location=portland&preset=none")).await;

    assert!(status.is_success());
    assert!(html.contains("March extremes"));
    assert!(html.contains("65.3"));
}

#[tokio::test]
async fn first_sync_fetches_full_history_and_bulk_inserts() {
    let coord = portland().coord;

    let mut geocoder = MockGeocoderStub::new();
    geocoder
        .expect_lookup()
        .times(1)
        .returning(|_| Ok(Some(portland())));

    let mut archive = MockArchiveStub::new();
    archive
        .expect_daily_range()
        .withf(|_, start, _| *start == HISTORY_START)
        .times(1)
        .returning(|_, _, _| {
            Ok(vec![
                sample(date!(2000 - 01 - 05), 45.0, 29.8),
                sample(date!(2000 - 02 - 14), 49.3, 31.0),
            ])
        });

    let mut store = MockStoreStub::new();
    let mut seq = Sequence::new();

    store
        .expect_select()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(Vec::new()));

    // No update expectation: any update call would fail the test
    store
        .expect_insert()
        .withf(|records| {
            records.len() == 2
                && records[0].month.to_string() == "2000-01"
                && records[1].month.to_string() == "2000-02"
        })
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));

    let coord_for_last = coord.clone();
    store
        .expect_select()
        .times(1)
        .in_sequence(&mut seq)
        .returning(move |_, _| {
            Ok(vec![
                record(&coord_for_last, "2000-01", 45.0, 29.8),
                record(&coord_for_last, "2000-02", 49.3, 31.0),
            ])
        });

    let app = spawn_app(Arc::new(geocoder), Arc::new(archive), Arc::new(store));

    let (status, html) = send(&app, lookup_request("location=portland&preset=none")).await;

    assert!(status.is_success());
    assert!(html.contains("February extremes"));
}
