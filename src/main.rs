use std::sync::Arc;

use tracing::{error, info};

use tombola_server::config::Config;
use tombola_server::state::ServerState;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env();
    info!("starting tombola server...");

    let state = match ServerState::new(&config).await {
        Ok(state) => Arc::new(state),
        Err(e) => {
            error!("failed to initialize server state: {}", e);
            std::process::exit(1);
        }
    };

    let routes = tombola_server::app(state);

    info!("server listening on port {}", config.port);
    warp::serve(routes).run(([0, 0, 0, 0], config.port)).await;
}
