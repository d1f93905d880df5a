mod config;
mod cronjobs;
mod database;
mod modules;
mod server;

use config::app_config;
use signal_hook::{
    consts::{SIGINT, SIGTERM},
    iterator::Signals,
};
use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    time::Duration,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cfg = app_config();

    database::db::run_migrations(&cfg.database_url);

    let db_conn_pool = database::db::get_connection_pool(&cfg.database_url).await;

    cronjobs::start_clear_sessions_cronjob(db_conn_pool.clone(), Duration::from_secs(5 * 60));

    let mut signals = Signals::new([SIGINT, SIGTERM]).expect("failed to setup signals hook");

    let db_conn_pool_shutdown_ref = db_conn_pool.clone();

    tokio::spawn(async move {
        for sig in signals.forever() {
            if !cfg.is_development {
                info!("[APP] received signal: {}, shutting down", sig);

                info!("[APP] closing postgres connections");
                db_conn_pool_shutdown_ref.close();
            }

            std::process::exit(sig)
        }
    });

    let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)), cfg.http_port);
    info!("[WEB] listening on {}", addr);

    let app = server::controller::new(db_conn_pool);

    axum::Server::bind(&addr)
        .serve(app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .unwrap();
}
