use chrono::{DateTime, Local, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::product::{format_money, Category, Product};

/// Fixed 8% surcharge applied on top of every subtotal.
pub const TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

const SALE_ID_LEN: usize = 9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub price: Decimal,
    pub sku: String,
    pub image: String,
    pub quantity: u32,
}

impl LineItem {
    /// Snapshot of the product at the moment it lands in the cart.
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            category: product.category,
            price: product.price,
            sku: product.sku.clone(),
            image: product.image.clone(),
            quantity: 1,
        }
    }

    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

pub fn subtotal_of(items: &[LineItem]) -> Decimal {
    items.iter().map(LineItem::line_total).sum()
}

pub fn total_with_tax(subtotal: Decimal) -> Decimal {
    subtotal * (Decimal::ONE + TAX_RATE)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sale {
    id: String,
    timestamp: DateTime<Utc>,
    items: Vec<LineItem>,
    total: Decimal,
}

impl Sale {
    pub fn new(items: Vec<LineItem>) -> Self {
        let total = total_with_tax(subtotal_of(&items));
        Self {
            id: generate_sale_id(),
            timestamp: Utc::now(),
            items,
            total,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn total(&self) -> Decimal {
        self.total
    }
}

fn generate_sale_id() -> String {
    Uuid::new_v4().simple().to_string()[..SALE_ID_LEN].to_string()
}

// Template-friendly sale struct
#[derive(Debug, Serialize)]
pub struct SaleDisplay {
    pub order_number: String,
    pub timestamp: String,
    pub total: String,
    pub item_count: usize,
}

impl From<&Sale> for SaleDisplay {
    fn from(sale: &Sale) -> Self {
        Self {
            order_number: sale.id.to_uppercase(),
            timestamp: sale
                .timestamp
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            total: format_money(sale.total),
            item_count: sale.items.len(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LineItemDisplay {
    pub id: String,
    pub name: String,
    pub price: String,
    pub quantity: u32,
    pub line_total: String,
    pub image: String,
}

impl From<&LineItem> for LineItemDisplay {
    fn from(item: &LineItem) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            price: format_money(item.price),
            quantity: item.quantity,
            line_total: format_money(item.line_total()),
            image: item.image.clone(),
        }
    }
}
