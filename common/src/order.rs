use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::SupplierBatch;
use crate::error::{MarketError, MarketResult};
use crate::identity::{User, UserId};
use crate::ids::string_id;
use crate::notification::NotificationKind;
use crate::product::{DeliveryMode, ProductId};

string_id!(
    /// Unique order identifier.
    OrderId
);

/// Order lifecycle. `Rejected` and `Completed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Placed, waiting for the supplier.
    Pending,
    /// Supplier agreed to fulfil.
    Accepted,
    /// Supplier declined.
    Rejected,
    /// Supplier handed the goods over.
    Delivered,
    /// Vendor confirmed receipt.
    Completed,
}

impl OrderStatus {
    /// Returns true if transitioning from self to `next` is valid.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Accepted)
                | (OrderStatus::Pending, OrderStatus::Rejected)
                | (OrderStatus::Accepted, OrderStatus::Delivered)
                | (OrderStatus::Delivered, OrderStatus::Completed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Rejected | OrderStatus::Completed)
    }

    /// Whether the supplier (as opposed to the vendor) drives the move into `self`.
    pub fn is_supplier_move(self) -> bool {
        matches!(
            self,
            OrderStatus::Accepted | OrderStatus::Rejected | OrderStatus::Delivered
        )
    }

    /// Notification sent to the vendor when an order enters this status.
    pub fn vendor_notice(self) -> Option<(NotificationKind, &'static str)> {
        match self {
            OrderStatus::Accepted => {
                Some((NotificationKind::Success, "Your order has been accepted"))
            }
            OrderStatus::Rejected => Some((NotificationKind::Error, "Your order has been rejected")),
            OrderStatus::Delivered => {
                Some((NotificationKind::Success, "Your order has been delivered"))
            }
            OrderStatus::Pending | OrderStatus::Completed => None,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Accepted => "accepted",
            OrderStatus::Rejected => "rejected",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Completed => "completed",
        };
        f.write_str(s)
    }
}

/// A product line within an order, priced at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    /// Unit price after the bulk discount.
    pub unit_price_paise: u64,
    pub unit: String,
}

impl LineItem {
    pub fn total_paise(&self) -> MarketResult<u64> {
        self.unit_price_paise
            .checked_mul(u64::from(self.quantity))
            .ok_or(MarketError::TooLarge("line total"))
    }
}

/// Vendor's delivery choices at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutDetails {
    pub delivery_mode: DeliveryMode,
    /// Preferred delivery time, or pickup time for `Offline`.
    #[serde(default)]
    pub requested_time: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// An order from one vendor to one supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub vendor_id: UserId,
    pub vendor_name: String,
    pub supplier_id: UserId,
    pub supplier_name: String,
    pub items: Vec<LineItem>,
    pub total_paise: u64,
    pub delivery_mode: DeliveryMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_time: Option<String>,
    pub status: OrderStatus,
    pub ordered_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Order {
    /// Build the pending order for one supplier's share of a cart.
    pub fn from_batch(
        id: OrderId,
        vendor: &User,
        batch: SupplierBatch,
        details: &CheckoutDetails,
        now: DateTime<Utc>,
    ) -> MarketResult<Self> {
        let total_paise = batch.total_paise()?;
        let items = batch
            .lines
            .into_iter()
            .map(|line| LineItem {
                product_id: line.product_id,
                product_name: line.product_name,
                quantity: line.quantity,
                unit_price_paise: line.unit_price_paise,
                unit: line.unit,
            })
            .collect();

        let online = details.delivery_mode == DeliveryMode::Online;
        Ok(Order {
            id,
            vendor_id: vendor.id.clone(),
            vendor_name: vendor.name.clone(),
            supplier_id: batch.supplier_id,
            supplier_name: batch.supplier_name,
            items,
            total_paise,
            delivery_mode: details.delivery_mode,
            delivery_address: online.then(|| vendor.location.address.clone()),
            delivery_time: details.requested_time.clone().filter(|_| online),
            pickup_time: details.requested_time.clone().filter(|_| !online),
            status: OrderStatus::Pending,
            ordered_at: now,
            notes: details.notes.clone().filter(|n| !n.trim().is_empty()),
        })
    }

    /// Whether `user` is the vendor or the supplier on this order.
    pub fn involves(&self, user: &UserId) -> bool {
        self.vendor_id == *user || self.supplier_id == *user
    }
}
