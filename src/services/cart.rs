use rust_decimal::Decimal;

use crate::models::{subtotal_of, total_with_tax, LineItem, Product, TAX_RATE};

/// Line items accumulated at the checkout counter, in the order they were first added.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one unit. Price and display fields are captured on first add only.
    pub fn add(&mut self, product: &Product) {
        match self.items.iter_mut().find(|item| item.id == product.id) {
            Some(item) => item.quantity = item.quantity.saturating_add(1),
            None => self.items.push(LineItem::from_product(product)),
        }
    }

    pub fn remove(&mut self, id: &str) {
        self.items.retain(|item| item.id != id);
    }

    /// Quantity never drops below one; use `remove` to drop the line.
    pub fn change_quantity(&mut self, id: &str, delta: i64) {
        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            let next = i64::from(item.quantity)
                .saturating_add(delta)
                .clamp(1, i64::from(u32::MAX));
            item.quantity = next as u32;
        }
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn unit_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    pub fn subtotal(&self) -> Decimal {
        subtotal_of(&self.items)
    }

    pub fn tax(&self) -> Decimal {
        self.subtotal() * TAX_RATE
    }

    pub fn total(&self) -> Decimal {
        total_with_tax(self.subtotal())
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
