mod chain;
mod health;
pub mod models;
mod peers;
mod tx;

use actix_web::web::{self, ServiceConfig};

pub use models::AppState;

pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(health::health_check)
            .service(chain::get_chain)
            .service(chain::is_valid)
            .service(chain::mine_block)
            .service(chain::replace_chain)
            .service(tx::add_transaction)
            .service(tx::get_pending)
            .service(peers::connect_node),
    );
}
