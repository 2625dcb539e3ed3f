use actix_web::{HttpResponse, post, web};

use super::models::{AppState, ConnectNodesRequest, ConnectNodesResponse};

/// Register peer nodes used by `/replace_chain`.
#[post("/connect_node")]
pub async fn connect_node(
    state: web::Data<AppState>,
    body: web::Json<ConnectNodesRequest>,
) -> HttpResponse {
    let total_nodes = state.connect_nodes(&body.nodes);
    HttpResponse::Created().json(ConnectNodesResponse {
        message: "All the nodes are now connected".to_string(),
        total_nodes,
    })
}
