//! Domain model for the mandi street-food supply marketplace.
//!
//! Everything here is plain data plus the rules that govern it. The HTTP
//! service in `mandi-server` wraps a [`marketplace::Marketplace`] behind a
//! lock and maps [`error::MarketError`] onto status codes.

mod ids;

pub mod cart;
pub mod catalog;
pub mod currency;
pub mod demo;
pub mod error;
pub mod identity;
pub mod location;
pub mod marketplace;
pub mod message;
pub mod notification;
pub mod order;
pub mod pricing;
pub mod product;
pub mod rating;
pub mod session;
pub mod vendor;

pub use error::{MarketError, MarketResult};
pub use ids::IdMint;
pub use marketplace::Marketplace;
