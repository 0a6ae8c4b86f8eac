use std::sync::Arc;

use anyhow::anyhow;
use axum::{
    body::Body,
    extract::Request,
    middleware::{self, Next},
    response::IntoResponse,
    routing::get,
    Router,
};
use hyper::{
    header::{ACCEPT, CONTENT_TYPE},
    Method,
};
use log::info;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};

use crate::{
    archive::OpenMeteoClient,
    db::{self, Backend},
    geocode::NominatimClient,
    routes::{index_handler, lookup_handler},
    sync::SyncService,
};

pub struct AppState {
    pub static_dir: String,
    pub sync: Arc<SyncService>,
}

pub async fn build_app_state(
    static_dir: String,
    data_dir: String,
    backend: Backend,
) -> Result<AppState, anyhow::Error> {
    let store = db::connect(backend, &data_dir)
        .await
        .map_err(|e| anyhow!("error setting up storage: {}", e))?;

    let geocoder = Arc::new(NominatimClient::new()?);
    let archive = Arc::new(OpenMeteoClient::new()?);
    let sync = Arc::new(SyncService::new(geocoder, archive, store));

    Ok(AppState { static_dir, sync })
}

pub fn app(app_state: AppState) -> Router {
    let serve_static = ServeDir::new(&app_state.static_dir);
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([ACCEPT, CONTENT_TYPE])
        .allow_origin(Any);

    Router::new()
        .route("/", get(index_handler).post(lookup_handler))
        .with_state(Arc::new(app_state))
        .layer(middleware::from_fn(log_request))
        .nest_service("/static", serve_static)
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or_default();
    info!(target: "http_request", "new request, {} {}", request.method().as_str(), path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    info!(target: "http_response", "response, code: {}, time: {}", response.status().as_str(), response_time);

    response
}
