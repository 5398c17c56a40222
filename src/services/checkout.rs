use log::{info, warn};
use std::collections::HashMap;
use thiserror::Error;

use crate::models::{LineItem, Sale};
use crate::services::catalog::Catalog;
use crate::services::ledger::SalesLedger;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("Cart is empty")]
    EmptyCart,

    #[error("Product not found in catalog: {0}")]
    UnknownProduct(String),

    #[error("Insufficient stock for {id}: requested {requested}, available {available}")]
    InsufficientStock {
        id: String,
        requested: u32,
        available: u32,
    },
}

/// How strictly a checkout treats items the catalog can't fully cover.
///
/// The lenient default sells anyway: oversold stock clamps to zero and
/// items missing from the catalog are recorded without a stock change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutPolicy {
    pub allow_oversell: bool,
    pub allow_unknown_products: bool,
}

impl Default for CheckoutPolicy {
    fn default() -> Self {
        Self {
            allow_oversell: true,
            allow_unknown_products: true,
        }
    }
}

impl CheckoutPolicy {
    pub fn strict() -> Self {
        Self {
            allow_oversell: false,
            allow_unknown_products: false,
        }
    }
}

/// Turns the finalized line items into a stock adjustment plus a ledger entry.
///
/// Every item is checked against the policy before anything is touched, so
/// a rejected checkout leaves both the catalog and the ledger as they were.
/// An empty slice produces no sale.
pub fn complete_sale(
    items: &[LineItem],
    catalog: &mut Catalog,
    ledger: &mut SalesLedger,
    policy: &CheckoutPolicy,
) -> Result<Option<Sale>, CheckoutError> {
    if items.is_empty() {
        return Ok(None);
    }

    // Lines for the same product are checked against stock together.
    let mut requested: HashMap<&str, u64> = HashMap::new();
    for item in items {
        *requested.entry(item.id.as_str()).or_insert(0) += u64::from(item.quantity);
    }

    for item in items {
        let total = requested.get(item.id.as_str()).copied().unwrap_or_default();
        match catalog.get(&item.id) {
            None if !policy.allow_unknown_products => {
                return Err(CheckoutError::UnknownProduct(item.id.clone()));
            }
            Some(product) if !policy.allow_oversell && total > u64::from(product.stock) => {
                return Err(CheckoutError::InsufficientStock {
                    id: item.id.clone(),
                    requested: u32::try_from(total).unwrap_or(u32::MAX),
                    available: product.stock,
                });
            }
            _ => {}
        }
    }

    for item in items {
        match catalog.get_mut(&item.id) {
            Some(product) => {
                if item.quantity > product.stock {
                    warn!(
                        "Overselling {}: {} requested, {} on hand",
                        product.sku, item.quantity, product.stock
                    );
                }
                product.stock = product.stock.saturating_sub(item.quantity);
            }
            None => warn!("Sold item {} is no longer in the catalog; stock left untouched", item.id),
        }
    }

    let sale = Sale::new(items.to_vec());
    info!(
        "Sale {} completed: {} line(s), total {}",
        sale.id(),
        sale.items().len(),
        sale.total().round_dp(2)
    );
    ledger.record(sale.clone());
    Ok(Some(sale))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn line(catalog: &Catalog, id: &str, quantity: u32) -> LineItem {
        let mut item = LineItem::from_product(catalog.get(id).unwrap());
        item.quantity = quantity;
        item
    }

    fn ghost_line() -> LineItem {
        let mut catalog = Catalog::seeded();
        catalog.get_mut("1").unwrap().id = "ghost".to_string();
        line(&catalog, "ghost", 1)
    }

    #[test]
    fn sale_total_and_stock_update() {
        let mut catalog = Catalog::seeded();
        let mut ledger = SalesLedger::new();
        let items = vec![line(&catalog, "1", 2), line(&catalog, "2", 1)];

        let sale = complete_sale(&items, &mut catalog, &mut ledger, &CheckoutPolicy::default())
            .unwrap()
            .unwrap();

        assert_eq!(sale.total(), Decimal::new(2229984, 4));
        assert_eq!(sale.items(), items.as_slice());
        assert_eq!(catalog.get("1").unwrap().stock, 10);
        assert_eq!(catalog.get("2").unwrap().stock, 23);
        assert_eq!(catalog.get("3").unwrap().stock, 8);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.sales()[0], sale);
    }

    #[test]
    fn overselling_clamps_stock_to_zero() {
        let mut catalog = Catalog::seeded();
        let mut ledger = SalesLedger::new();
        let items = vec![line(&catalog, "4", 10)];

        let sale = complete_sale(&items, &mut catalog, &mut ledger, &CheckoutPolicy::default()).unwrap();

        assert!(sale.is_some());
        assert_eq!(catalog.get("4").unwrap().stock, 0);
    }

    #[test]
    fn empty_items_produce_no_sale() {
        let mut catalog = Catalog::seeded();
        let mut ledger = SalesLedger::new();

        let sale = complete_sale(&[], &mut catalog, &mut ledger, &CheckoutPolicy::default()).unwrap();

        assert!(sale.is_none());
        assert!(ledger.is_empty());
    }

    #[test]
    fn unknown_product_is_recorded_without_stock_change() {
        let mut catalog = Catalog::seeded();
        let before = catalog.products().to_vec();
        let mut ledger = SalesLedger::new();

        let sale = complete_sale(&[ghost_line()], &mut catalog, &mut ledger, &CheckoutPolicy::default())
            .unwrap()
            .unwrap();

        assert_eq!(sale.items()[0].id, "ghost");
        assert_eq!(catalog.products(), before.as_slice());
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn strict_policy_rejects_oversell_without_side_effects() {
        let mut catalog = Catalog::seeded();
        let mut ledger = SalesLedger::new();
        let items = vec![line(&catalog, "1", 1), line(&catalog, "7", 3)];

        let err = complete_sale(&items, &mut catalog, &mut ledger, &CheckoutPolicy::strict()).unwrap_err();

        assert_eq!(
            err,
            CheckoutError::InsufficientStock {
                id: "7".to_string(),
                requested: 3,
                available: 2,
            }
        );
        assert_eq!(catalog.get("1").unwrap().stock, 12);
        assert!(ledger.is_empty());
    }

    #[test]
    fn strict_policy_sums_repeated_lines_for_one_product() {
        let mut catalog = Catalog::seeded();
        let mut ledger = SalesLedger::new();
        let items = vec![line(&catalog, "7", 2), line(&catalog, "7", 2)];

        let err = complete_sale(&items, &mut catalog, &mut ledger, &CheckoutPolicy::strict()).unwrap_err();

        assert_eq!(
            err,
            CheckoutError::InsufficientStock {
                id: "7".to_string(),
                requested: 4,
                available: 2,
            }
        );
        assert_eq!(catalog.get("7").unwrap().stock, 2);
        assert!(ledger.is_empty());
    }

    #[test]
    fn strict_policy_accepts_repeated_lines_within_stock() {
        let mut catalog = Catalog::seeded();
        let mut ledger = SalesLedger::new();
        let items = vec![line(&catalog, "1", 5), line(&catalog, "1", 7)];

        complete_sale(&items, &mut catalog, &mut ledger, &CheckoutPolicy::strict()).unwrap();

        assert_eq!(catalog.get("1").unwrap().stock, 0);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn strict_policy_rejects_unknown_product() {
        let mut catalog = Catalog::seeded();
        let mut ledger = SalesLedger::new();

        let err = complete_sale(&[ghost_line()], &mut catalog, &mut ledger, &CheckoutPolicy::strict()).unwrap_err();

        assert_eq!(err, CheckoutError::UnknownProduct("ghost".to_string()));
        assert!(ledger.is_empty());
    }

    #[test]
    fn strict_policy_allows_exact_stock() {
        let mut catalog = Catalog::seeded();
        let mut ledger = SalesLedger::new();
        let items = vec![line(&catalog, "7", 2)];

        complete_sale(&items, &mut catalog, &mut ledger, &CheckoutPolicy::strict()).unwrap();

        assert_eq!(catalog.get("7").unwrap().stock, 0);
    }
}
