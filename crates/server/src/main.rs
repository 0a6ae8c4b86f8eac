use anyhow::anyhow;
use axum::serve;
use climatrends::{app, build_app_state, get_config_info, get_log_level, setup_logger};
use futures::TryFutureExt;
use log::{error, info};
use std::{net::SocketAddr, str::FromStr};
use tokio::{net::TcpListener, signal};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = get_config_info();
    let log_level = get_log_level(&cli);

    setup_logger()
        .level(log_level)
        .level_for("climatrends", log_level)
        .level_for("sqlx", log::LevelFilter::Warn)
        .level_for("http_response", log_level)
        .level_for("http_request", log_level)
        .apply()?;

    let host = cli.host();
    let port = cli.port();
    let data_dir = cli.data_dir();
    let static_dir = cli.static_dir();
    let backend = cli.backend()?;

    let socket_addr = SocketAddr::from_str(&format!("{}:{}", host, port))
        .map_err(|e| anyhow!("invalid address: {}", e))?;

    let listener = TcpListener::bind(socket_addr)
        .map_err(|e| anyhow!("error binding to socket: {}", e))
        .await?;

    info!("Climatrends starting...");
    info!("  Listen: http://{}", socket_addr);
    info!("  Data dir: {}", data_dir);
    info!("  Static: {}", static_dir);
    info!("  Backend: {:?}", backend);

    let app_state = build_app_state(static_dir, data_dir, backend)
        .await
        .map_err(|e| {
            error!("error building app: {}", e);
            e
        })?;

    let app = app(app_state);

    serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
