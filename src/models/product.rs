use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Whiskey,
    Wine,
    Beer,
    Vodka,
    Tequila,
    Gin,
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Whiskey,
        Category::Wine,
        Category::Beer,
        Category::Vodka,
        Category::Tequila,
        Category::Gin,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Whiskey => "Whiskey",
            Category::Wine => "Wine",
            Category::Beer => "Beer",
            Category::Vodka => "Vodka",
            Category::Tequila => "Tequila",
            Category::Gin => "Gin",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown category: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub price: Decimal,
    pub stock: u32,
    pub sku: String,
    pub description: String,
    pub image: String,
}

/// Badge shown next to a stock figure. Anything at or under ten units is flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    Healthy,
    Low,
}

const HEALTHY_STOCK_FLOOR: u32 = 10;

impl Product {
    pub fn stock_status(&self) -> StockStatus {
        if self.stock > HEALTHY_STOCK_FLOOR {
            StockStatus::Healthy
        } else {
            StockStatus::Low
        }
    }
}

// Template-friendly product struct
#[derive(Debug, Serialize)]
pub struct ProductDisplay {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: String,
    pub stock: u32,
    pub sku: String,
    pub description: String,
    pub image: String,
    pub is_healthy: bool,
}

impl From<&Product> for ProductDisplay {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            category: product.category.to_string(),
            price: format_money(product.price),
            stock: product.stock,
            sku: product.sku.clone(),
            description: product.description.clone(),
            image: product.image.clone(),
            is_healthy: product.stock_status() == StockStatus::Healthy,
        }
    }
}

/// Formats an amount as `$12.34`, rounded to cents.
pub fn format_money(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}
