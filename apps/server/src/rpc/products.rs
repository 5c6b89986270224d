//! Product catalogue procedures.

use crate::error::ApiError;
use crate::AppState;
use chrono::Utc;
use serde::{Deserialize, Deserializer};
use till_core::{validation, Product};
use tracing::info;
use uuid::Uuid;

/// For partial updates: the outer `Option` is key presence, the inner
/// is nullability. serde only invokes this when the key exists in the
/// body, so `#[serde(default)]` supplies the outer `None` for omitted
/// keys and an explicit JSON `null` arrives as `Some(None)`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Trim and drop empty barcodes so "" and absent store the same way.
fn normalize_barcode(barcode: Option<String>) -> Option<String> {
    barcode
        .map(|code| code.trim().to_string())
        .filter(|code| !code.is_empty())
}

/// `createProduct` input
#[derive(Debug, Deserialize)]
pub struct CreateProductInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub cost_cents: i64,
    pub price_cents: i64,
    #[serde(default)]
    pub stock_quantity: i64,
    #[serde(default)]
    pub min_stock_level: i64,
    #[serde(default)]
    pub category: Option<String>,
}

/// `updateProduct` input. Everything but the id is optional; for the
/// nullable columns an explicit `null` clears the stored value while an
/// omitted key keeps it.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductInput {
    pub product_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub barcode: Option<Option<String>>,
    #[serde(default)]
    pub cost_cents: Option<i64>,
    #[serde(default)]
    pub price_cents: Option<i64>,
    #[serde(default)]
    pub stock_quantity: Option<i64>,
    #[serde(default)]
    pub min_stock_level: Option<i64>,
    #[serde(default, deserialize_with = "double_option")]
    pub category: Option<Option<String>>,
}

/// `getProductByBarcode` input
#[derive(Debug, Deserialize)]
pub struct GetProductByBarcodeInput {
    pub barcode: String,
}

/// Create a product. A duplicate barcode surfaces as Conflict from the
/// unique index; products without a barcode never conflict.
pub async fn create_product(
    state: &AppState,
    input: CreateProductInput,
) -> Result<Product, ApiError> {
    validation::validate_product_name(&input.name)?;
    validation::validate_non_negative_cents("cost_cents", input.cost_cents)?;
    validation::validate_non_negative_cents("price_cents", input.price_cents)?;
    validation::validate_stock_level("stock_quantity", input.stock_quantity)?;
    validation::validate_stock_level("min_stock_level", input.min_stock_level)?;

    let barcode = normalize_barcode(input.barcode);
    if let Some(code) = barcode.as_deref() {
        validation::validate_barcode(code)?;
    }

    let now = Utc::now();
    let product = Product {
        id: Uuid::new_v4().to_string(),
        name: input.name.trim().to_string(),
        description: input.description,
        barcode,
        cost_cents: input.cost_cents,
        price_cents: input.price_cents,
        stock_quantity: input.stock_quantity,
        min_stock_level: input.min_stock_level,
        category: input.category,
        created_at: now,
        updated_at: now,
    };

    state.db.products().insert(&product).await?;

    info!(name = %product.name, id = %product.id, "product created");
    Ok(product)
}

/// All products, name order
pub async fn get_products(state: &AppState) -> Result<Vec<Product>, ApiError> {
    Ok(state.db.products().list().await?)
}

/// Merge the present fields into the stored row and refresh updated_at.
pub async fn update_product(
    state: &AppState,
    input: UpdateProductInput,
) -> Result<Product, ApiError> {
    validation::validate_id("product_id", &input.product_id)?;

    let mut product = state.db.products().get_by_id(&input.product_id).await?;

    if let Some(name) = input.name {
        validation::validate_product_name(&name)?;
        product.name = name.trim().to_string();
    }
    if let Some(description) = input.description {
        product.description = description;
    }
    if let Some(barcode) = input.barcode {
        let barcode = normalize_barcode(barcode);
        if let Some(code) = barcode.as_deref() {
            validation::validate_barcode(code)?;
        }
        product.barcode = barcode;
    }
    if let Some(cost_cents) = input.cost_cents {
        validation::validate_non_negative_cents("cost_cents", cost_cents)?;
        product.cost_cents = cost_cents;
    }
    if let Some(price_cents) = input.price_cents {
        validation::validate_non_negative_cents("price_cents", price_cents)?;
        product.price_cents = price_cents;
    }
    if let Some(stock_quantity) = input.stock_quantity {
        validation::validate_stock_level("stock_quantity", stock_quantity)?;
        product.stock_quantity = stock_quantity;
    }
    if let Some(min_stock_level) = input.min_stock_level {
        validation::validate_stock_level("min_stock_level", min_stock_level)?;
        product.min_stock_level = min_stock_level;
    }
    if let Some(category) = input.category {
        product.category = category;
    }
    product.updated_at = Utc::now();

    state.db.products().update(&product).await?;

    info!(id = %product.id, "product updated");
    Ok(product)
}

/// Exact barcode lookup. A blank barcode is a miss, never an error.
pub async fn get_product_by_barcode(
    state: &AppState,
    input: GetProductByBarcodeInput,
) -> Result<Option<Product>, ApiError> {
    let barcode = input.barcode.trim();
    if barcode.is_empty() {
        return Ok(None);
    }
    Ok(state.db.products().get_by_barcode(barcode).await?)
}

/// Products at or below their reorder threshold
pub async fn get_low_stock_products(state: &AppState) -> Result<Vec<Product>, ApiError> {
    Ok(state.db.products().low_stock().await?)
}
