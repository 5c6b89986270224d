//! One repository per aggregate. Each wraps a pool clone and exposes
//! typed async methods; no SQL escapes this module tree.

mod product;
mod report;
mod sale;
mod stock;
mod user;

pub use product::ProductRepository;
pub use report::{
    PaymentMethodSummary, ProfitLossReport, ReportRepository, SalesReport, TopProduct,
};
pub use sale::{ReceiptLine, SaleRepository};
pub use stock::StockRepository;
pub use user::UserRepository;
