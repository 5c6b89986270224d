//! Sale procedures: checkout, receipts, transaction history.
//!
//! `createSale` is the hot path. The handler validates and prices the
//! cart, then hands the storage layer one atomic unit: transaction row,
//! item rows, stock decrements. Oversell and unknown products reject
//! the whole sale; there is no partial fulfillment.

use crate::auth::RequestContext;
use crate::config::BusinessInfo;
use crate::error::ApiError;
use crate::AppState;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use till_core::{
    validation, DateRange, Money, PaymentMethod, SaleLine, SaleTotals, TaxRate, Transaction,
    TransactionItem, TransactionStatus,
};
use till_db::ReceiptLine;
use tracing::info;
use uuid::Uuid;

/// One cart line of a `createSale` request
#[derive(Debug, Deserialize)]
pub struct SaleItemInput {
    pub product_id: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

/// `createSale` input
#[derive(Debug, Deserialize)]
pub struct CreateSaleInput {
    pub items: Vec<SaleItemInput>,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub discount_cents: i64,
    #[serde(default)]
    pub tax_rate_bps: u32,
}

/// `generateReceipt` input
#[derive(Debug, Deserialize)]
pub struct GenerateReceiptInput {
    pub transaction_id: String,
}

/// `getTransactions` input; both bounds optional
#[derive(Debug, Default, Deserialize)]
pub struct GetTransactionsInput {
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

/// A printable receipt: the business header, the transaction, and its
/// lines joined with product names
#[derive(Debug, Serialize)]
pub struct Receipt {
    pub business: BusinessInfo,
    pub transaction: Transaction,
    pub items: Vec<ReceiptLine>,
}

/// `RCP-YYYYMMDD-HHMMSS-nnnn`: UTC wall clock plus a 4-digit subsecond
/// component. The UNIQUE index on receipt_number is the collision
/// backstop; a clash surfaces as Conflict and the client retries.
fn receipt_number(at: DateTime<Utc>) -> String {
    format!(
        "RCP-{}-{:04}",
        at.format("%Y%m%d-%H%M%S"),
        at.timestamp_subsec_micros() % 10_000
    )
}

/// Process a sale for the authenticated cashier.
pub async fn create_sale(
    state: &AppState,
    ctx: &RequestContext,
    input: CreateSaleInput,
) -> Result<Transaction, ApiError> {
    validation::validate_sale_item_count(input.items.len())?;
    for item in &input.items {
        validation::validate_id("product_id", &item.product_id)?;
        validation::validate_quantity(item.quantity)?;
        validation::validate_positive_cents("unit_price_cents", item.unit_price_cents)?;
    }
    validation::validate_non_negative_cents("discount_cents", input.discount_cents)?;
    validation::validate_tax_rate(input.tax_rate_bps)?;

    let lines: Vec<SaleLine> = input
        .items
        .iter()
        .map(|item| SaleLine {
            quantity: item.quantity,
            unit_price: Money::from_cents(item.unit_price_cents),
        })
        .collect();
    let totals = SaleTotals::compute(
        &lines,
        TaxRate::from_bps(input.tax_rate_bps),
        Money::from_cents(input.discount_cents),
    );

    let now = Utc::now();
    let transaction = Transaction {
        id: Uuid::new_v4().to_string(),
        user_id: ctx.user_id.clone(),
        receipt_number: receipt_number(now),
        status: TransactionStatus::Completed,
        total_cents: totals.total.cents(),
        tax_cents: totals.tax.cents(),
        discount_cents: input.discount_cents,
        payment_method: input.payment_method,
        created_at: now,
        updated_at: now,
    };
    let items: Vec<TransactionItem> = input
        .items
        .iter()
        .map(|item| TransactionItem {
            id: Uuid::new_v4().to_string(),
            transaction_id: transaction.id.clone(),
            product_id: item.product_id.clone(),
            quantity: item.quantity,
            unit_price_cents: item.unit_price_cents,
            line_total_cents: item.quantity * item.unit_price_cents,
            created_at: now,
        })
        .collect();

    state.db.sales().create(&transaction, &items).await?;

    info!(
        receipt = %transaction.receipt_number,
        total_cents = transaction.total_cents,
        items = items.len(),
        cashier = %ctx.username,
        "sale completed"
    );
    Ok(transaction)
}

/// Assemble a receipt for a past transaction. A transaction without
/// items yields an empty line list, not an error.
pub async fn generate_receipt(
    state: &AppState,
    input: GenerateReceiptInput,
) -> Result<Receipt, ApiError> {
    validation::validate_id("transaction_id", &input.transaction_id)?;

    let transaction = state.db.sales().get_by_id(&input.transaction_id).await?;
    let items = state.db.sales().receipt_lines(&transaction.id).await?;

    Ok(Receipt {
        business: state.business.clone(),
        transaction,
        items,
    })
}

/// Transaction history, newest first, optionally bounded by calendar
/// dates (end date inclusive through 23:59:59.999)
pub async fn get_transactions(
    state: &AppState,
    input: GetTransactionsInput,
) -> Result<Vec<Transaction>, ApiError> {
    let range = DateRange::from_dates(input.start_date, input.end_date);
    Ok(state.db.sales().list(range).await?)
}
