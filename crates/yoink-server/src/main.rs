use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use yoink_server::config::ServerConfig;
use yoink_server::dictionary::load_dictionary;
use yoink_server::{build_app, spawn_room_reaper};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = ServerConfig::load();
    config.validate();
    let listen_addr = config.listen_addr.clone();

    // Dictionary loads to completion before any traffic is accepted.
    let dictionary = Arc::new(load_dictionary(&config.dictionary).await);

    let (app, state) = build_app(config, dictionary);
    spawn_room_reaper(state);

    let listener = match tokio::net::TcpListener::bind(&listen_addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind to {listen_addr}: {e}");
            std::process::exit(1);
        },
    };

    tracing::info!("Yoink server listening on {listen_addr}");

    axum::serve(listener, app).await.expect("Server error");
}
