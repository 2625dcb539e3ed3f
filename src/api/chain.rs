use actix_web::{HttpResponse, Responder, get, web};
use log::info;

use super::models::{AppState, MessageResponse, MineResponse, ReplaceChainResponse};
use crate::consensus::PeerChain;
use crate::error::NodeError;

/// Get the full blockchain.
#[get("/get_chain")]
pub async fn get_chain(state: web::Data<AppState>) -> impl Responder {
    let chain = state.chain().to_vec();
    HttpResponse::Ok().json(PeerChain {
        length: chain.len(),
        chain,
    })
}

/// Report whether the local chain is valid end to end.
#[get("/is_valid")]
pub async fn is_valid(state: web::Data<AppState>) -> impl Responder {
    let message = if state.is_valid() {
        "All good. The Blockchain is valid."
    } else {
        "Houston, we have a problem. The Blockchain is not valid."
    };
    HttpResponse::Ok().json(MessageResponse {
        message: message.to_string(),
    })
}

/// Mine a new block from the pending buffer.
#[get("/mine_block")]
pub async fn mine_block(state: web::Data<AppState>) -> Result<HttpResponse, NodeError> {
    let block = state.mine_block().await?;
    Ok(HttpResponse::Ok().json(MineResponse {
        message: "Congratulations, you just mined a block!".to_string(),
        block,
    }))
}

/// Replace the local chain by the longest valid one among peers.
#[get("/replace_chain")]
pub async fn replace_chain(state: web::Data<AppState>) -> impl Responder {
    let outcome = state.replace_chain().await;
    let message = if outcome.replaced {
        info!("REPLACE - now at {} blocks", outcome.chain.len());
        "The nodes had different chains so the chain was replaced by the longest one."
    } else {
        "All good. The chain is the largest one."
    };
    HttpResponse::Ok().json(ReplaceChainResponse {
        message: message.to_string(),
        replaced: outcome.replaced,
        chain: &outcome.chain,
    })
}
