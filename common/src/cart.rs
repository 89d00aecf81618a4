use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::{MarketError, MarketResult};
use crate::identity::UserId;
use crate::pricing;
use crate::product::ProductId;

/// One product and how many units of it the vendor wants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// A vendor's cart. Lines keep the order in which products were first added.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add units of a product, merging into an existing line.
    /// Returns the line's new quantity.
    pub fn add(&mut self, product_id: ProductId, quantity: u32) -> MarketResult<u32> {
        if quantity == 0 {
            return Err(MarketError::ZeroQuantity);
        }
        match self.lines.iter_mut().find(|l| l.product_id == product_id) {
            Some(line) => {
                line.quantity = line
                    .quantity
                    .checked_add(quantity)
                    .ok_or(MarketError::TooLarge("cart quantity"))?;
                Ok(line.quantity)
            }
            None => {
                self.lines.push(CartLine {
                    product_id,
                    quantity,
                });
                Ok(quantity)
            }
        }
    }

    /// Replace a line's quantity. Zero removes the line.
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: u32) -> MarketResult<()> {
        if quantity == 0 {
            return self.remove(product_id);
        }
        let line = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == *product_id)
            .ok_or_else(|| MarketError::NotInCart(product_id.clone()))?;
        line.quantity = quantity;
        Ok(())
    }

    pub fn remove(&mut self, product_id: &ProductId) -> MarketResult<()> {
        let before = self.lines.len();
        self.lines.retain(|l| l.product_id != *product_id);
        if self.lines.len() == before {
            return Err(MarketError::NotInCart(product_id.clone()));
        }
        Ok(())
    }

    /// Drop a product if present; used when a listing disappears.
    pub(crate) fn forget(&mut self, product_id: &ProductId) {
        self.lines.retain(|l| l.product_id != *product_id);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn total_items(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Resolve every line against the catalog with its bulk discount.
    pub fn price(&self, catalog: &Catalog) -> MarketResult<PricedCart> {
        let lines = self
            .lines
            .iter()
            .map(|line| {
                let product = catalog.get(&line.product_id)?;
                let discount_percent = product.discount_for(line.quantity);
                let unit_price_paise = product.unit_price_for(line.quantity);
                let line_total_paise = unit_price_paise
                    .checked_mul(u64::from(line.quantity))
                    .ok_or(MarketError::TooLarge("line total"))?;
                Ok(PricedLine {
                    product_id: product.id.clone(),
                    product_name: product.name.clone(),
                    supplier_id: product.supplier_id.clone(),
                    supplier_name: product.supplier_name.clone(),
                    quantity: line.quantity,
                    min_order: product.min_order,
                    unit: product.unit.clone(),
                    list_price_paise: product.price_paise,
                    discount_percent,
                    unit_price_paise,
                    line_total_paise,
                })
            })
            .collect::<MarketResult<Vec<_>>>()?;

        Ok(PricedCart {
            total_items: self.total_items(),
            total_paise: pricing::total_paise(lines.iter().map(|l| l.line_total_paise))?,
            lines,
        })
    }
}

/// A cart line with its resolved price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedLine {
    pub product_id: ProductId,
    pub product_name: String,
    pub supplier_id: UserId,
    pub supplier_name: String,
    pub quantity: u32,
    pub min_order: u32,
    pub unit: String,
    pub list_price_paise: u64,
    pub discount_percent: f64,
    pub unit_price_paise: u64,
    pub line_total_paise: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedCart {
    pub lines: Vec<PricedLine>,
    pub total_items: u64,
    pub total_paise: u64,
}

/// The part of a cart that one supplier fulfils.
#[derive(Debug, Clone, PartialEq)]
pub struct SupplierBatch {
    pub supplier_id: UserId,
    pub supplier_name: String,
    pub lines: Vec<PricedLine>,
}

impl SupplierBatch {
    pub fn total_paise(&self) -> MarketResult<u64> {
        pricing::total_paise(self.lines.iter().map(|l| l.line_total_paise))
    }
}

/// Partition priced lines by supplier, suppliers in order of first appearance.
pub fn split_by_supplier(lines: Vec<PricedLine>) -> Vec<SupplierBatch> {
    let mut batches: Vec<SupplierBatch> = Vec::new();
    for line in lines {
        match batches.iter_mut().find(|b| b.supplier_id == line.supplier_id) {
            Some(batch) => batch.lines.push(line),
            None => batches.push(SupplierBatch {
                supplier_id: line.supplier_id.clone(),
                supplier_name: line.supplier_name.clone(),
                lines: vec![line],
            }),
        }
    }
    batches
}
