use std::sync::Arc;

use axum::{extract::State, response::Html, Form};
use serde::Deserialize;

use super::AppError;
use crate::display::{graph_series, month_name, widget_summary};
use crate::templates::{weather_page, WeatherView};
use crate::AppState;

/// Preset locations offered in the dropdown next to the free-text input.
pub const PRESET_LOCATIONS: &[&str] = &[
    "Portland, Oregon",
    "Seattle, Washington",
    "San Francisco, California",
    "Denver, Colorado",
    "New York, New York",
    "London, England",
    "Tokyo, Japan",
    "Sydney, Australia",
];

/// Handler for the initial page load (GET /): the empty state.
pub async fn index_handler(State(_state): State<Arc<AppState>>) -> Html<String> {
    Html(weather_page(PRESET_LOCATIONS, None).into_string())
}

#[derive(Debug, Deserialize)]
pub struct LookupForm {
    #[serde(default)]
    pub location: String,
    #[serde(default = "preset_none")]
    pub preset: String,
}

fn preset_none() -> String {
    String::from("none")
}

/// Handler for a lookup submission (POST /).
///
/// A chosen preset wins over the free text. An unresolvable location (or one
/// the archive has nothing for) falls back to the empty state; any other
/// failure becomes a generic 500 via [`AppError`].
pub async fn lookup_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LookupForm>,
) -> Result<Html<String>, AppError> {
    let location = if form.preset != "none" {
        form.preset
    } else {
        form.location
    };

    let Some(synced) = state.sync.sync_location(&location).await? else {
        return Ok(Html(weather_page(PRESET_LOCATIONS, None).into_string()));
    };

    let (Some(widget), Some(last)) = (widget_summary(&synced.records), synced.records.last())
    else {
        return Ok(Html(weather_page(PRESET_LOCATIONS, None).into_string()));
    };

    let view = WeatherView {
        address: synced.place.address.clone(),
        month_name: month_name(u8::from(last.month.month)),
        widget,
        series: graph_series(&synced.records),
        location,
    };

    Ok(Html(weather_page(PRESET_LOCATIONS, Some(&view)).into_string()))
}
