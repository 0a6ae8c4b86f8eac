pub mod aggregate;
pub mod archive;
pub mod db;
pub mod display;
pub mod geocode;
pub mod models;
pub mod routes;
pub mod startup;
pub mod sync;
pub mod templates;
pub mod utils;

pub use aggregate::monthly_extremes;
pub use archive::{DailyArchive, OpenMeteoClient};
pub use db::{Backend, MemoryStore, SqliteStore, WeatherStore};
pub use display::{graph_series, month_name, widget_summary, GraphSeries, WidgetSummary};
pub use geocode::{Geocoder, NominatimClient, ResolvedPlace};
pub use models::{CoordKey, DailySample, MonthKey, MonthlyRecord};
pub use startup::{app, build_app_state, AppState};
pub use sync::{SyncService, SyncedLocation, HISTORY_START};
pub use utils::{get_config_info, get_log_level, setup_logger, Cli};
