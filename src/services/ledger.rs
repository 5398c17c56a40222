use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::models::{Category, Sale};
use crate::services::catalog::Catalog;

/// Completed sales, newest first. Entries are never edited or removed.
#[derive(Debug, Clone, Default)]
pub struct SalesLedger {
    sales: Vec<Sale>,
}

impl SalesLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, sale: Sale) {
        self.sales.insert(0, sale);
    }

    pub fn sales(&self) -> &[Sale] {
        &self.sales
    }

    pub fn latest(&self) -> Option<&Sale> {
        self.sales.first()
    }

    pub fn len(&self) -> usize {
        self.sales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sales.is_empty()
    }

    pub fn total_revenue(&self) -> Decimal {
        self.sales.iter().map(Sale::total).sum()
    }

    /// Pre-tax revenue per category, using the category captured on each line item.
    pub fn revenue_by_category(&self) -> HashMap<Category, Decimal> {
        let mut revenue = HashMap::new();
        for item in self.sales.iter().flat_map(|sale| sale.items()) {
            *revenue.entry(item.category).or_insert(Decimal::ZERO) += item.line_total();
        }
        revenue
    }

    /// Best-selling category by revenue; falls back to the best-stocked
    /// category by product count when nothing has sold yet.
    pub fn top_category(&self, catalog: &Catalog) -> Option<Category> {
        let revenue = self.revenue_by_category();
        if !revenue.is_empty() {
            return pick_max(revenue);
        }

        let mut counts: HashMap<Category, Decimal> = HashMap::new();
        for product in catalog.products() {
            *counts.entry(product.category).or_insert(Decimal::ZERO) += Decimal::ONE;
        }
        pick_max(counts)
    }
}

// Ties go to the category listed first in `Category::ALL`.
fn pick_max(scores: HashMap<Category, Decimal>) -> Option<Category> {
    let mut best: Option<(Category, Decimal)> = None;
    for category in Category::ALL {
        if let Some(&score) = scores.get(&category) {
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((category, score));
            }
        }
    }
    best.map(|(category, _)| category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LineItem;

    fn line(product_id: &str, catalog: &Catalog, quantity: u32) -> LineItem {
        let mut item = LineItem::from_product(catalog.get(product_id).unwrap());
        item.quantity = quantity;
        item
    }

    #[test]
    fn newest_sale_comes_first() {
        let catalog = Catalog::seeded();
        let mut ledger = SalesLedger::new();
        let first = Sale::new(vec![line("1", &catalog, 1)]);
        let second = Sale::new(vec![line("2", &catalog, 1)]);
        let (first_id, second_id) = (first.id().to_string(), second.id().to_string());

        ledger.record(first);
        ledger.record(second);

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.sales()[0].id(), second_id);
        assert_eq!(ledger.sales()[1].id(), first_id);
        assert_eq!(ledger.latest().map(|s| s.id().to_string()), Some(second_id));
    }

    #[test]
    fn revenue_sums_taxed_totals() {
        let catalog = Catalog::seeded();
        let mut ledger = SalesLedger::new();
        ledger.record(Sale::new(vec![line("2", &catalog, 2)]));
        ledger.record(Sale::new(vec![line("5", &catalog, 1)]));

        // (69.00 + 39.99) * 1.08
        assert_eq!(ledger.total_revenue(), Decimal::new(1177092, 4));
    }

    #[test]
    fn top_category_prefers_sales_revenue() {
        let catalog = Catalog::seeded();
        let mut ledger = SalesLedger::new();
        ledger.record(Sale::new(vec![line("4", &catalog, 1), line("2", &catalog, 3)]));

        assert_eq!(ledger.top_category(&catalog), Some(Category::Tequila));
    }

    #[test]
    fn top_category_without_sales_uses_product_count() {
        let catalog = Catalog::seeded();
        let ledger = SalesLedger::new();

        // Whiskey and Wine both have two products; Whiskey is listed first.
        assert_eq!(ledger.top_category(&catalog), Some(Category::Whiskey));
        assert_eq!(ledger.top_category(&Catalog::default()), None);
    }
}
