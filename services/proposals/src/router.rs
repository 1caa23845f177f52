use axum::{
    Router,
    routing::{get, post},
};

use proposta_core::middleware::{request_id_layer, trace_layer};

use crate::handlers::{
    decision::{accept_proposal, reject_proposal},
    health::{healthz, readyz},
    proposal::{create_proposal, get_proposal, get_proposals, preview_proposal},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Proposals
        .route("/proposals", post(create_proposal))
        .route("/proposals", get(get_proposals))
        .route("/proposals/preview", post(preview_proposal))
        .route("/proposals/{id}", get(get_proposal))
        // Decisions
        .route("/proposals/{id}/accept", get(accept_proposal))
        .route("/proposals/{id}/reject", get(reject_proposal))
        .layer(trace_layer())
        .layer(request_id_layer())
        .with_state(state)
}
