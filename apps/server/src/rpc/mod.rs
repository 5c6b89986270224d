//! Procedure routing.
//!
//! Every POS operation is a named procedure POSTed to
//! `/rpc/{procedure}` with a JSON body. This module owns the dispatch
//! table; the procedure implementations live in the submodules by
//! aggregate (users, products, sales, stock, reports).
//!
//! ```text
//!   POST /rpc/createSale         POST /rpc/getSalesReport
//!        │                            │
//!        ▼                            ▼
//!   ┌────────────────── dispatch ──────────────────┐
//!   │ parse body → (authenticate) → handler → JSON │
//!   └──────────────────────────────────────────────┘
//! ```
//!
//! A missing body reads as `{}`; malformed JSON is a validation error
//! before any handler runs; an unknown procedure is NotFound.

pub mod products;
pub mod reports;
pub mod sales;
pub mod stock;
pub mod users;

use crate::auth;
use crate::error::ApiError;
use crate::AppState;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::debug;

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/rpc/{procedure}", post(dispatch))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// `healthcheck` response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// Liveness probe backed by a trivial database query
pub async fn healthcheck(state: &AppState) -> HealthResponse {
    let status = if state.db.health_check().await {
        "ok"
    } else {
        "degraded"
    };
    HealthResponse {
        status,
        timestamp: Utc::now(),
    }
}

/// Decode a procedure input, treating an absent body as `{}`
fn parse<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    let slice: &[u8] = if body.is_empty() { b"{}" } else { body };
    serde_json::from_slice(slice).map_err(|e| ApiError::validation(format!("invalid input: {e}")))
}

fn json<T: Serialize>(value: T) -> Response {
    Json(value).into_response()
}

/// The single RPC entry point
async fn dispatch(
    State(state): State<Arc<AppState>>,
    Path(procedure): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    debug!(procedure = %procedure, "rpc call");

    let response = match procedure.as_str() {
        "healthcheck" => json(healthcheck(&state).await),

        "createUser" => json(users::create_user(&state, parse(&body)?).await?),
        "loginUser" => json(users::login_user(&state, parse(&body)?).await?),
        "getUsers" => json(users::get_users(&state).await?),
        "setUserActive" => json(users::set_user_active(&state, parse(&body)?).await?),

        "createProduct" => json(products::create_product(&state, parse(&body)?).await?),
        "getProducts" => json(products::get_products(&state).await?),
        "updateProduct" => json(products::update_product(&state, parse(&body)?).await?),
        "getProductByBarcode" => {
            json(products::get_product_by_barcode(&state, parse(&body)?).await?)
        }
        "getLowStockProducts" => json(products::get_low_stock_products(&state).await?),

        "createSale" => {
            let ctx = auth::authenticate(&headers, &state.jwt)?;
            json(sales::create_sale(&state, &ctx, parse(&body)?).await?)
        }
        "generateReceipt" => json(sales::generate_receipt(&state, parse(&body)?).await?),
        "getTransactions" => json(sales::get_transactions(&state, parse(&body)?).await?),

        "createStockAdjustment" => {
            let ctx = auth::authenticate(&headers, &state.jwt)?;
            json(stock::create_stock_adjustment(&state, &ctx, parse(&body)?).await?)
        }
        "getStockAdjustments" => json(stock::get_stock_adjustments(&state, parse(&body)?).await?),

        "getSalesReport" => json(reports::get_sales_report(&state, parse(&body)?).await?),
        "getProfitLossReport" => json(reports::get_profit_loss_report(&state, parse(&body)?).await?),

        _ => return Err(ApiError::not_found("Procedure", &procedure)),
    };

    Ok(response)
}
