use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{MarketError, MarketResult};
use crate::identity::UserId;
use crate::ids::string_id;
use crate::order::OrderId;

string_id!(
    /// Unique supplier rating identifier.
    RatingId
);

/// Rating shown for a supplier nobody has rated yet.
pub const DEFAULT_SUPPLIER_RATING: f64 = 4.5;

/// How many recent ratings a supplier summary carries.
pub const RECENT_RATINGS: usize = 5;

/// A vendor's verdict on a supplier, tied to one fulfilled order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierRating {
    pub id: RatingId,
    pub supplier_id: UserId,
    pub vendor_id: UserId,
    pub vendor_name: String,
    pub rating: u8,
    pub comment: String,
    pub order_id: OrderId,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SupplierRatingDraft {
    pub order_id: OrderId,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
}

/// Star ratings run 1..=5.
pub fn validate_stars(rating: u8) -> MarketResult<u8> {
    if (1..=5).contains(&rating) {
        Ok(rating)
    } else {
        Err(MarketError::InvalidRating(rating))
    }
}

/// Mean of the supplier's ratings, or [`DEFAULT_SUPPLIER_RATING`].
pub fn supplier_average<'a>(
    ratings: impl IntoIterator<Item = &'a SupplierRating>,
    supplier: &UserId,
) -> f64 {
    let (sum, count) = ratings
        .into_iter()
        .filter(|r| r.supplier_id == *supplier)
        .fold((0u32, 0u32), |(sum, count), r| {
            (sum + u32::from(r.rating), count + 1)
        });
    if count == 0 {
        DEFAULT_SUPPLIER_RATING
    } else {
        f64::from(sum) / f64::from(count)
    }
}

/// Supplier dashboard figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplierSummary {
    pub supplier_id: UserId,
    pub product_count: usize,
    pub total_stock: u64,
    /// Σ stock × list price, in paise.
    pub inventory_value_paise: u64,
    pub average_rating: f64,
    pub rating_count: usize,
    /// Newest first.
    pub recent_ratings: Vec<SupplierRating>,
}
