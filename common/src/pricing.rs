//! Bulk-discount pricing.
//!
//! A product may carry discount tiers: buying at least `min_quantity` units
//! unlocks `percent` off the unit price. The tier that applies is the one
//! with the highest threshold not exceeding the quantity bought.

use serde::{Deserialize, Serialize};

use crate::error::{MarketError, MarketResult};

/// Quantity threshold unlocking a percentage price reduction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BulkDiscount {
    pub min_quantity: u32,
    pub percent: f64,
}

impl BulkDiscount {
    pub fn new(min_quantity: u32, percent: f64) -> Self {
        Self {
            min_quantity,
            percent,
        }
    }
}

/// Validate tiers and put them in canonical order: ascending by threshold,
/// one tier per threshold (the one listed last wins).
pub fn normalize_tiers(tiers: Vec<BulkDiscount>) -> MarketResult<Vec<BulkDiscount>> {
    for tier in &tiers {
        if tier.min_quantity == 0 {
            return Err(MarketError::InvalidDiscount(
                "threshold must be at least 1".into(),
            ));
        }
        if !tier.percent.is_finite() || !(0.0..=100.0).contains(&tier.percent) {
            return Err(MarketError::InvalidDiscount(format!(
                "{}% is outside 0..=100",
                tier.percent
            )));
        }
    }

    let mut normalized: Vec<BulkDiscount> = Vec::with_capacity(tiers.len());
    for tier in tiers {
        match normalized
            .iter_mut()
            .find(|t| t.min_quantity == tier.min_quantity)
        {
            Some(existing) => *existing = tier,
            None => normalized.push(tier),
        }
    }
    normalized.sort_by_key(|t| t.min_quantity);
    Ok(normalized)
}

/// Percentage off for `quantity` units. 0 when no tier is reached.
///
/// Works on unsorted input too: among tiers sharing the winning threshold,
/// the later one wins.
pub fn resolve_discount(tiers: &[BulkDiscount], quantity: u32) -> f64 {
    tiers
        .iter()
        .filter(|t| t.min_quantity <= quantity)
        .fold(None::<&BulkDiscount>, |best, t| match best {
            Some(b) if b.min_quantity > t.min_quantity => Some(b),
            _ => Some(t),
        })
        .map_or(0.0, |t| t.percent)
}

/// Unit price after `percent` off, rounded to the nearest paisa.
pub fn discounted_unit_price(price_paise: u64, percent: f64) -> u64 {
    let factor = (100.0 - percent.clamp(0.0, 100.0)) / 100.0;
    (price_paise as f64 * factor).round() as u64
}

/// Discounted price of `quantity` units.
pub fn line_total(price_paise: u64, tiers: &[BulkDiscount], quantity: u32) -> MarketResult<u64> {
    let unit = discounted_unit_price(price_paise, resolve_discount(tiers, quantity));
    unit.checked_mul(u64::from(quantity))
        .ok_or(MarketError::TooLarge("line total"))
}

/// Sum of amounts in paise, refusing to wrap.
pub fn total_paise(amounts: impl IntoIterator<Item = u64>) -> MarketResult<u64> {
    amounts.into_iter().try_fold(0u64, |acc, a| {
        acc.checked_add(a).ok_or(MarketError::TooLarge("total"))
    })
}
