//! Stock adjustment procedures.

use crate::auth::RequestContext;
use crate::error::ApiError;
use crate::AppState;
use chrono::Utc;
use serde::Deserialize;
use till_core::{validation, AdjustmentType, StockAdjustment};
use tracing::info;
use uuid::Uuid;

/// `createStockAdjustment` input
#[derive(Debug, Deserialize)]
pub struct CreateStockAdjustmentInput {
    pub product_id: String,
    pub adjustment_type: AdjustmentType,
    pub quantity_change: i64,
    pub reason: String,
}

/// `getStockAdjustments` input. The filter key is camelCase on the
/// wire, unlike every other input field; existing clients depend on it.
#[derive(Debug, Default, Deserialize)]
pub struct GetStockAdjustmentsInput {
    #[serde(default, rename = "productId")]
    pub product_id: Option<String>,
}

/// Record a manual stock movement for the authenticated user.
///
/// The audit row keeps the signed quantity_change as submitted; the
/// product's stock gets the clamped result.
pub async fn create_stock_adjustment(
    state: &AppState,
    ctx: &RequestContext,
    input: CreateStockAdjustmentInput,
) -> Result<StockAdjustment, ApiError> {
    validation::validate_id("product_id", &input.product_id)?;
    validation::validate_reason(&input.reason)?;

    let adjustment = StockAdjustment {
        id: Uuid::new_v4().to_string(),
        product_id: input.product_id,
        user_id: ctx.user_id.clone(),
        adjustment_type: input.adjustment_type,
        quantity_change: input.quantity_change,
        reason: input.reason.trim().to_string(),
        created_at: Utc::now(),
    };

    state.db.stock().apply(&adjustment).await?;

    info!(
        product_id = %adjustment.product_id,
        kind = ?adjustment.adjustment_type,
        change = adjustment.quantity_change,
        by = %ctx.username,
        "stock adjusted"
    );
    Ok(adjustment)
}

/// Adjustments, optionally filtered to one product, newest first
pub async fn get_stock_adjustments(
    state: &AppState,
    input: GetStockAdjustmentsInput,
) -> Result<Vec<StockAdjustment>, ApiError> {
    Ok(state.db.stock().list(input.product_id.as_deref()).await?)
}
