mod api;
mod blockchain;
mod config;
mod consensus;
mod error;
mod node;
mod transaction;

use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use log::info;

use api::AppState;
use config::NodeConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let config = NodeConfig::from_env();
    let state = AppState::from_config(&config).map_err(std::io::Error::other)?;

    println!(
        "⛓️ Starting ledger node {} at http://{}:{}",
        state.node_id(),
        config.host,
        config.port
    );
    info!(
        "difficulty={} mining_timeout={:?} peer_timeout={:?}",
        config.difficulty, config.mining_timeout, config.peer_timeout
    );

    let state = web::Data::new(state);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
