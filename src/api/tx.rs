use actix_web::{HttpResponse, get, post, web};
use log::debug;

use super::models::{AppState, MessageResponse, PendingResponse};
use crate::error::NodeError;
use crate::transaction::Transaction;

/// Queue a transaction for the next block.
#[post("/add_transaction")]
pub async fn add_transaction(
    state: web::Data<AppState>,
    body: web::Json<Transaction>,
) -> Result<HttpResponse, NodeError> {
    let tx = body.into_inner();
    debug!(
        "POST /add_transaction - {} -> {} ({})",
        tx.sender, tx.receiver, tx.amount
    );
    let index = state.add_transaction(tx)?;
    Ok(HttpResponse::Created().json(MessageResponse {
        message: format!("This transaction will be added to block {index}"),
    }))
}

/// List transactions waiting for the next block.
#[get("/pending")]
pub async fn get_pending(state: web::Data<AppState>) -> HttpResponse {
    let pending = state.pending();
    HttpResponse::Ok().json(PendingResponse {
        size: pending.len(),
        transactions: &pending,
    })
}
