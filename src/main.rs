use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use shortscout::config::constants::DEFAULT_PORT;
use shortscout::ops::telemetry;
use shortscout::server::{self, ServerState};
use shortscout::surface::{ChromiumProvider, LaunchProfile};

#[tokio::main]
async fn main() {
    telemetry::init_tracing();

    // * Browser strategy is resolved exactly once, at process start
    let profile = LaunchProfile::resolve();
    let provider = Arc::new(ChromiumProvider::new(profile));

    let port = std::env::var("PORT")
        .ok()
        .and_then(|raw| raw.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);

    let static_dir = std::env::var("STATIC_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("public"));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let state = Arc::new(ServerState::new(provider, static_dir));

    if let Err(e) = server::serve(addr, state).await {
        tracing::error!(error = %e, "Server terminated");
        std::process::exit(1);
    }
}
