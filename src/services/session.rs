use thiserror::Error;

use crate::models::{DashboardStats, Product, Sale};
use crate::services::cart::Cart;
use crate::services::catalog::Catalog;
use crate::services::checkout::{complete_sale, CheckoutError, CheckoutPolicy};
use crate::services::ledger::SalesLedger;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Product not found: {0}")]
    ProductNotFound(String),
}

/// Everything a single register owns: the shelf, the open cart and the day's sales.
#[derive(Debug, Clone)]
pub struct Session {
    catalog: Catalog,
    cart: Cart,
    ledger: SalesLedger,
    policy: CheckoutPolicy,
    low_stock_threshold: u32,
}

impl Session {
    pub fn new(catalog: Catalog, policy: CheckoutPolicy, low_stock_threshold: u32) -> Self {
        Self {
            catalog,
            cart: Cart::new(),
            ledger: SalesLedger::new(),
            policy,
            low_stock_threshold,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn ledger(&self) -> &SalesLedger {
        &self.ledger
    }

    pub fn products_snapshot(&self) -> Vec<Product> {
        self.catalog.products().to_vec()
    }

    pub fn add_to_cart(&mut self, product_id: &str) -> Result<(), SessionError> {
        let product = self
            .catalog
            .get(product_id)
            .ok_or_else(|| SessionError::ProductNotFound(product_id.to_string()))?;
        self.cart.add(product);
        Ok(())
    }

    pub fn remove_from_cart(&mut self, product_id: &str) {
        self.cart.remove(product_id);
    }

    pub fn update_quantity(&mut self, product_id: &str, delta: i64) {
        self.cart.change_quantity(product_id, delta);
    }

    /// Sells the open cart. The cart is only cleared once the sale is recorded.
    pub fn checkout(&mut self) -> Result<Sale, CheckoutError> {
        let sale = complete_sale(
            self.cart.items(),
            &mut self.catalog,
            &mut self.ledger,
            &self.policy,
        )?
        .ok_or(CheckoutError::EmptyCart)?;
        self.cart.clear();
        Ok(sale)
    }

    pub fn stats(&self) -> DashboardStats {
        DashboardStats {
            total_revenue: self.ledger.total_revenue(),
            total_orders: self.ledger.len(),
            product_count: self.catalog.len(),
            low_stock_count: self.catalog.low_stock(self.low_stock_threshold).len(),
            top_category: self.ledger.top_category(&self.catalog),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use rust_decimal::Decimal;

    fn session() -> Session {
        Session::new(Catalog::seeded(), CheckoutPolicy::default(), 5)
    }

    #[test]
    fn checkout_clears_cart_and_records_sale() {
        let mut session = session();
        session.add_to_cart("1").unwrap();
        session.add_to_cart("1").unwrap();
        session.add_to_cart("2").unwrap();

        let sale = session.checkout().unwrap();

        assert!(session.cart().is_empty());
        assert_eq!(session.ledger().len(), 1);
        assert_eq!(session.ledger().sales()[0].id(), sale.id());
        assert_eq!(sale.total(), Decimal::new(2229984, 4));
        assert_eq!(session.catalog().get("1").unwrap().stock, 10);
    }

    #[test]
    fn empty_cart_is_rejected() {
        let mut session = session();
        assert_eq!(session.checkout().unwrap_err(), CheckoutError::EmptyCart);
        assert!(session.ledger().is_empty());
    }

    #[test]
    fn ledger_grows_newest_first() {
        let mut session = session();
        let mut ids = Vec::new();
        for product in ["1", "2", "3"] {
            session.add_to_cart(product).unwrap();
            ids.push(session.checkout().unwrap().id().to_string());
        }

        let recorded: Vec<_> = session.ledger().sales().iter().map(|s| s.id().to_string()).collect();
        ids.reverse();
        assert_eq!(recorded, ids);
    }

    #[test]
    fn clearing_the_cart_leaves_catalog_and_ledger_alone() {
        let mut session = session();
        session.add_to_cart("3").unwrap();
        session.checkout().unwrap();
        let catalog_before = session.catalog().products().to_vec();

        session.add_to_cart("5").unwrap();
        session.cart.clear();

        assert_eq!(session.catalog().products(), catalog_before.as_slice());
        assert_eq!(session.ledger().len(), 1);
    }

    #[test]
    fn rejected_checkout_keeps_the_cart() {
        let mut session = Session::new(Catalog::seeded(), CheckoutPolicy::strict(), 5);
        session.add_to_cart("7").unwrap();
        session.update_quantity("7", 5);

        let err = session.checkout().unwrap_err();

        assert!(matches!(err, CheckoutError::InsufficientStock { .. }));
        assert_eq!(session.cart().len(), 1);
        assert_eq!(session.catalog().get("7").unwrap().stock, 2);
    }

    #[test]
    fn unknown_product_cannot_be_added() {
        let mut session = session();
        assert_eq!(
            session.add_to_cart("99"),
            Err(SessionError::ProductNotFound("99".to_string()))
        );
    }

    #[test]
    fn stats_reflect_sales_and_stock() {
        let mut session = session();
        let opening = session.stats();
        assert_eq!(opening.total_orders, 0);
        assert_eq!(opening.total_revenue, Decimal::ZERO);
        assert_eq!(opening.product_count, 7);
        assert_eq!(opening.low_stock_count, 2);

        session.add_to_cart("6").unwrap();
        session.update_quantity("6", 1);
        session.checkout().unwrap();

        let after = session.stats();
        assert_eq!(after.total_orders, 1);
        assert_eq!(after.total_revenue, Decimal::new(2376, 1));
        assert_eq!(after.low_stock_count, 3);
        assert_eq!(after.top_category, Some(Category::Whiskey));
    }
}
