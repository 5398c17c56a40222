pub mod insight;
pub mod product;
pub mod sale;
pub mod stats;

pub use insight::{AIInsight, InsightDisplay, InsightType};
pub use product::{format_money, Category, Product, ProductDisplay};
pub use sale::{subtotal_of, total_with_tax, LineItem, LineItemDisplay, Sale, SaleDisplay, TAX_RATE};
pub use stats::{DashboardStats, WEEKLY_SALES};
