pub mod advisory;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod ledger;
pub mod sequencer;
pub mod session;

pub use advisory::{AdvisoryClient, GeminiClient};
pub use cart::Cart;
pub use catalog::Catalog;
pub use checkout::{CheckoutError, CheckoutPolicy};
pub use sequencer::LatestResult;
pub use session::Session;
