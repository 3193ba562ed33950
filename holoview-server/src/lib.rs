//! HTTP API for the Holoview license ledger.
//!
//! Two routes: a read path for license lookups and a write path for
//! purchase-completion events. Payment-provider authentication happens
//! upstream — by the time an event reaches this surface it is trusted.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use holoview_catalog::ProductId;
use holoview_ledger::{LedgerStore, LicenseRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::info;

/// A completed-purchase notification from the payment collaborator.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CheckoutCompleted {
    /// Raw serial as entered at checkout.
    pub serial: String,
    /// Purchased products. Unknown product names fail deserialization and
    /// are rejected at the edge.
    pub products: Vec<ProductId>,
}

async fn get_license(
    State(store): State<Arc<LedgerStore>>,
    Path(serial): Path<String>,
) -> Result<Json<LicenseRecord>, StatusCode> {
    match store.query(&serial).await {
        Some(record) => Ok(Json(record)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

async fn checkout_completed(
    State(store): State<Arc<LedgerStore>>,
    Json(event): Json<CheckoutCompleted>,
) -> StatusCode {
    let features: BTreeSet<_> = event
        .products
        .iter()
        .flat_map(|product| product.features())
        .copied()
        .collect();

    match store.activate(&event.serial, &features).await {
        Some(record) => info!(
            "Activated {} with {} features",
            record.serial,
            record.active_features.len()
        ),
        None => info!("Checkout event without a serial, acknowledged and dropped"),
    }

    // Always acknowledge: the in-memory ledger is already authoritative, and
    // a redelivery could not be told apart from a duplicate purchase.
    StatusCode::OK
}

/// Builds the HTTP API router over the given ledger store.
pub fn build_router(store: Arc<LedgerStore>) -> Router {
    Router::new()
        .route("/api/v1/license/{serial}", get(get_license))
        .route("/api/v1/events/checkout-completed", post(checkout_completed))
        .with_state(store)
}
