use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{MarketError, MarketResult};
use crate::identity::UserId;
use crate::ids::string_id;
use crate::pricing::{self, BulkDiscount};

string_id!(
    /// Unique product identifier (timestamp-based, monotonically increasing).
    ProductId
);

string_id!(
    /// Identifier of a single product review.
    ProductRatingId
);

/// Category of raw material. Serialized as its plain name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProductCategory {
    Vegetables,
    Spices,
    Grains,
    Dairy,
    Oils,
    Other(String),
}

impl ProductCategory {
    pub fn as_str(&self) -> &str {
        match self {
            ProductCategory::Vegetables => "Vegetables",
            ProductCategory::Spices => "Spices",
            ProductCategory::Grains => "Grains",
            ProductCategory::Dairy => "Dairy",
            ProductCategory::Oils => "Oils",
            ProductCategory::Other(name) => name,
        }
    }
}

impl From<String> for ProductCategory {
    fn from(name: String) -> Self {
        match name.as_str() {
            "Vegetables" => ProductCategory::Vegetables,
            "Spices" => ProductCategory::Spices,
            "Grains" => ProductCategory::Grains,
            "Dairy" => ProductCategory::Dairy,
            "Oils" => ProductCategory::Oils,
            _ => ProductCategory::Other(name),
        }
    }
}

impl From<ProductCategory> for String {
    fn from(category: ProductCategory) -> Self {
        category.as_str().to_string()
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an order reaches the vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    /// Supplier delivers to the vendor's address.
    Online,
    /// Vendor picks up from the supplier.
    Offline,
}

/// A vendor's review of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRating {
    pub id: ProductRatingId,
    pub user_id: UserId,
    pub user_name: String,
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// A product listed by a supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: ProductCategory,
    pub price_paise: u64,
    pub unit: String,
    pub stock: u32,
    #[serde(default)]
    pub image: String,
    pub supplier_id: UserId,
    pub supplier_name: String,
    pub supplier_rating: f64,
    /// Static distance shown to vendors; never computed.
    pub distance_km: f64,
    pub delivery_modes: Vec<DeliveryMode>,
    #[serde(default)]
    pub description: String,
    pub min_order: u32,
    #[serde(default)]
    pub bulk_discounts: Vec<BulkDiscount>,
    #[serde(default)]
    pub ratings: Vec<ProductRating>,
    #[serde(default)]
    pub average_rating: Option<f64>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn supports(&self, mode: DeliveryMode) -> bool {
        self.delivery_modes.contains(&mode)
    }

    /// Discount percentage for buying `quantity` units.
    pub fn discount_for(&self, quantity: u32) -> f64 {
        pricing::resolve_discount(&self.bulk_discounts, quantity)
    }

    /// Unit price in paise after the bulk discount for `quantity`.
    pub fn unit_price_for(&self, quantity: u32) -> u64 {
        pricing::discounted_unit_price(self.price_paise, self.discount_for(quantity))
    }

    pub fn line_total(&self, quantity: u32) -> MarketResult<u64> {
        pricing::line_total(self.price_paise, &self.bulk_discounts, quantity)
    }

    /// Append a review and refresh the average.
    pub fn add_rating(&mut self, rating: ProductRating) {
        self.ratings.push(rating);
        let sum: u32 = self.ratings.iter().map(|r| u32::from(r.rating)).sum();
        self.average_rating = Some(f64::from(sum) / self.ratings.len() as f64);
    }
}

/// Everything a supplier provides when listing a product. Identity,
/// ownership and timestamps are filled in by the marketplace.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub category: ProductCategory,
    pub price_paise: u64,
    pub unit: String,
    pub stock: u32,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub distance_km: f64,
    pub delivery_modes: Vec<DeliveryMode>,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_min_order")]
    pub min_order: u32,
    #[serde(default)]
    pub bulk_discounts: Vec<BulkDiscount>,
}

/// Highest list price accepted for one unit: ₹10 crore.
pub const MAX_PRICE_PAISE: u64 = 10_000_000_000;

fn default_min_order() -> u32 {
    1
}

/// Partial product update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub category: Option<ProductCategory>,
    pub price_paise: Option<u64>,
    pub unit: Option<String>,
    pub stock: Option<u32>,
    pub image: Option<String>,
    pub distance_km: Option<f64>,
    pub delivery_modes: Option<Vec<DeliveryMode>>,
    pub description: Option<String>,
    pub min_order: Option<u32>,
    pub bulk_discounts: Option<Vec<BulkDiscount>>,
}

impl ProductPatch {
    /// Apply onto `product`, validating the result before committing.
    pub fn apply_to(self, product: &mut Product) -> MarketResult<()> {
        let mut next = product.clone();
        if let Some(name) = self.name {
            next.name = name;
        }
        if let Some(category) = self.category {
            next.category = category;
        }
        if let Some(price) = self.price_paise {
            next.price_paise = price;
        }
        if let Some(unit) = self.unit {
            next.unit = unit;
        }
        if let Some(stock) = self.stock {
            next.stock = stock;
        }
        if let Some(image) = self.image {
            next.image = image;
        }
        if let Some(distance) = self.distance_km {
            next.distance_km = distance;
        }
        if let Some(modes) = self.delivery_modes {
            next.delivery_modes = modes;
        }
        if let Some(description) = self.description {
            next.description = description;
        }
        if let Some(min_order) = self.min_order {
            next.min_order = min_order;
        }
        if let Some(tiers) = self.bulk_discounts {
            next.bulk_discounts = pricing::normalize_tiers(tiers)?;
        }
        validate_listing(
            &next.name,
            &next.unit,
            next.price_paise,
            &next.delivery_modes,
            next.min_order,
        )?;
        *product = next;
        Ok(())
    }
}

pub(crate) fn validate_listing(
    name: &str,
    unit: &str,
    price_paise: u64,
    delivery_modes: &[DeliveryMode],
    min_order: u32,
) -> MarketResult<()> {
    if name.trim().is_empty() {
        return Err(MarketError::Validation("product name is required".into()));
    }
    if unit.trim().is_empty() {
        return Err(MarketError::Validation("unit is required".into()));
    }
    if price_paise > MAX_PRICE_PAISE {
        return Err(MarketError::TooLarge("price"));
    }
    if delivery_modes.is_empty() {
        return Err(MarketError::Validation(
            "at least one delivery mode is required".into(),
        ));
    }
    if min_order == 0 {
        return Err(MarketError::Validation("minimum order must be at least 1".into()));
    }
    Ok(())
}
