use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers::{docs, quote};
use crate::service::QuoteService;

/// Shared handler state; the service owns the storage handle.
#[derive(Clone)]
pub struct QuoteState {
    pub service: QuoteService,
}

impl QuoteState {
    pub fn new(service: QuoteService) -> Self {
        Self { service }
    }
}

pub fn quote_router(state: QuoteState) -> Router {
    Router::new()
        .route("/quote", post(quote::add_quote))
        .route("/quote/search", get(quote::search_quotes))
        .route("/quote/search/{hours}", get(quote::search_quotes_in_past_hours))
        .route("/quote/latest", get(quote::latest_quote))
        .route("/premiums", get(quote::premiums_this_month))
        .route("/docs/openapi.json", get(docs::openapi_document))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
