use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::Request,
    Router,
};
use climatrends::{
    app, archive, db, geocode, AppState, CoordKey, DailyArchive, DailySample, Geocoder, MonthKey,
    MonthlyRecord, ResolvedPlace, SyncService, WeatherStore,
};
use hyper::{header, Method};
use mockall::mock;
use time::Date;
use tower::ServiceExt;

mock! {
    pub GeocoderStub {}

    #[async_trait]
    impl Geocoder for GeocoderStub {
        async fn lookup(&self, query: &str) -> Result<Option<ResolvedPlace>, geocode::Error>;
    }
}

mock! {
    pub ArchiveStub {}

    #[async_trait]
    impl DailyArchive for ArchiveStub {
        async fn daily_range(
            &self,
            coord: &CoordKey,
            start: Date,
            end: Date,
        ) -> Result<Vec<DailySample>, archive::Error>;
    }
}

mock! {
    pub StoreStub {}

    #[async_trait]
    impl WeatherStore for StoreStub {
        async fn select(
            &self,
            coord: &CoordKey,
            month: Option<MonthKey>,
        ) -> Result<Vec<MonthlyRecord>, db::Error>;
        async fn insert(&self, records: &[MonthlyRecord]) -> Result<(), db::Error>;
        async fn update(&self, record: &MonthlyRecord) -> Result<(), db::Error>;
    }
}

/// Assemble the router exactly as the binary does, with the collaborators
/// swapped for whatever the test provides.
pub fn spawn_app(
    geocoder: Arc<dyn Geocoder>,
    archive: Arc<dyn DailyArchive>,
    store: Arc<dyn WeatherStore>,
) -> Router {
    let sync = Arc::new(SyncService::new(geocoder, archive, store));
    app(AppState {
        static_dir: String::from("./static"),
        sync,
    })
}

pub fn get_page_request() -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri("/")
        .header(header::ACCEPT, "text/html")
        .body(Body::empty())
        .unwrap()
}

pub fn lookup_request(form_body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form_body.to_string()))
        .unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> (hyper::StatusCode, String) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to execute request.");

    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

pub fn portland() -> ResolvedPlace {
    ResolvedPlace {
        coord: CoordKey::new(45.5202471, -122.674194),
        address: String::from("Portland, Multnomah County, Oregon, United States"),
    }
}

pub fn sample(date: Date, max_temp: f64, min_temp: f64) -> DailySample {
    DailySample {
        date,
        max_temp,
        min_temp,
    }
}

pub fn record(coord: &CoordKey, month: &str, max_temp: f64, min_temp: f64) -> MonthlyRecord {
    MonthlyRecord {
        coord: coord.clone(),
        month: month.parse().unwrap(),
        max_temp,
        min_temp,
    }
}
