use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{MarketError, MarketResult};
use crate::identity::UserId;
use crate::product::{DeliveryMode, Product, ProductId};

/// Delivery filter used when browsing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryFilter {
    #[default]
    All,
    Online,
    Offline,
}

impl DeliveryFilter {
    fn admits(self, product: &Product) -> bool {
        match self {
            DeliveryFilter::All => true,
            DeliveryFilter::Online => product.supports(DeliveryMode::Online),
            DeliveryFilter::Offline => product.supports(DeliveryMode::Offline),
        }
    }
}

/// Sort order for browse results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Nearest first.
    #[default]
    Distance,
    /// Cheapest first.
    Price,
    /// Best-rated supplier first.
    Rating,
}

/// Vendor-side product search.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrowseQuery {
    /// Case-insensitive match against product or supplier name.
    #[serde(default)]
    pub search: Option<String>,
    /// A category name, or `All`/absent for every category.
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub delivery: DeliveryFilter,
    #[serde(default)]
    pub sort: SortBy,
}

impl BrowseQuery {
    fn matches(&self, product: &Product) -> bool {
        let matches_search = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                product.name.to_lowercase().contains(&term)
                    || product.supplier_name.to_lowercase().contains(&term)
            }
        };
        let matches_category = match self.category.as_deref() {
            None | Some("All") | Some("") => true,
            Some(name) => product.category.as_str() == name,
        };
        matches_search && matches_category && self.delivery.admits(product)
    }
}

/// All listed products, keyed by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    products: BTreeMap<ProductId, Product>,
}

impl Catalog {
    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn get(&self, id: &ProductId) -> MarketResult<&Product> {
        self.products
            .get(id)
            .ok_or_else(|| MarketError::ProductNotFound(id.clone()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }

    pub(crate) fn insert(&mut self, product: Product) -> &Product {
        let id = product.id.clone();
        self.products.insert(id.clone(), product);
        &self.products[&id]
    }

    /// Mutable access for the owning supplier only.
    pub(crate) fn owned_mut(&mut self, owner: &UserId, id: &ProductId) -> MarketResult<&mut Product> {
        let product = self
            .products
            .get_mut(id)
            .ok_or_else(|| MarketError::ProductNotFound(id.clone()))?;
        if product.supplier_id != *owner {
            return Err(MarketError::NotOwner {
                user: owner.clone(),
                what: format!("product {id}"),
            });
        }
        Ok(product)
    }

    pub(crate) fn get_mut(&mut self, id: &ProductId) -> MarketResult<&mut Product> {
        self.products
            .get_mut(id)
            .ok_or_else(|| MarketError::ProductNotFound(id.clone()))
    }

    pub(crate) fn remove_owned(&mut self, owner: &UserId, id: &ProductId) -> MarketResult<Product> {
        self.owned_mut(owner, id)?;
        self.products
            .remove(id)
            .ok_or_else(|| MarketError::ProductNotFound(id.clone()))
    }

    pub fn by_supplier(&self, supplier: &UserId) -> Vec<&Product> {
        self.products
            .values()
            .filter(|p| p.supplier_id == *supplier)
            .collect()
    }

    pub(crate) fn by_supplier_mut<'a>(
        &'a mut self,
        supplier: &'a UserId,
    ) -> impl Iterator<Item = &'a mut Product> + 'a {
        self.products
            .values_mut()
            .filter(move |p| p.supplier_id == *supplier)
    }

    /// Filter then sort. Ties keep listing order.
    pub fn browse(&self, query: &BrowseQuery) -> Vec<&Product> {
        let mut found: Vec<&Product> = self.products.values().filter(|p| query.matches(p)).collect();
        match query.sort {
            SortBy::Distance => found.sort_by(|a, b| cmp_f64(a.distance_km, b.distance_km)),
            SortBy::Price => found.sort_by_key(|p| p.price_paise),
            SortBy::Rating => found.sort_by(|a, b| cmp_f64(b.supplier_rating, a.supplier_rating)),
        }
        found
    }
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}
