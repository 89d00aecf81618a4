//! The complete marketplace state and every operation on it.
//!
//! Operations take the acting user's id and resolve it against the live
//! sessions; role and ownership checks happen here, not in the HTTP layer.
//! Side effects (notifications, cart cleanup, rating refresh) are applied in
//! the same call as the change that causes them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::{split_by_supplier, Cart, PricedCart};
use crate::catalog::{BrowseQuery, Catalog};
use crate::currency::format_rupees;
use crate::error::{MarketError, MarketResult};
use crate::identity::{User, UserId, UserPatch, UserRole};
use crate::ids::IdMint;
use crate::message::{self, Conversation, Message, MessageDraft, MessageId};
use crate::notification::{Inbox, Notification, NotificationId, NotificationKind};
use crate::order::{CheckoutDetails, Order, OrderId, OrderStatus};
use crate::pricing::normalize_tiers;
use crate::product::{
    validate_listing, DeliveryMode, Product, ProductDraft, ProductId, ProductPatch,
    ProductRating, ProductRatingId,
};
use crate::rating::{
    supplier_average, validate_stars, RatingId, SupplierRating, SupplierRatingDraft,
    SupplierSummary, DEFAULT_SUPPLIER_RATING, RECENT_RATINGS,
};
use crate::session::{Session, Sessions, LOYALTY_POINTS_PER_CHECKOUT};

/// Counts reported by the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarketStats {
    pub sessions: usize,
    pub products: usize,
    pub orders: usize,
    pub messages: usize,
    pub notifications: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Marketplace {
    #[serde(default)]
    ids: IdMint,
    #[serde(default)]
    sessions: Sessions,
    #[serde(default)]
    catalog: Catalog,
    #[serde(default)]
    carts: BTreeMap<UserId, Cart>,
    #[serde(default)]
    orders: BTreeMap<OrderId, Order>,
    #[serde(default)]
    messages: Vec<Message>,
    #[serde(default)]
    inbox: Inbox,
    #[serde(default)]
    supplier_ratings: Vec<SupplierRating>,
}

impl Marketplace {
    pub fn stats(&self) -> MarketStats {
        MarketStats {
            sessions: self.sessions.len(),
            products: self.catalog.len(),
            orders: self.orders.len(),
            messages: self.messages.len(),
            notifications: self.inbox.len(),
        }
    }

    // ─── Sessions ───────────────────────────────────────────────────────────

    pub fn login(&mut self, user: User, role: UserRole, now: DateTime<Utc>) -> &Session {
        self.sessions.login(user, role, now)
    }

    /// End the session and throw away the user's cart.
    pub fn logout(&mut self, user: &UserId) -> MarketResult<Session> {
        let session = self.sessions.logout(user)?;
        self.carts.remove(user);
        Ok(session)
    }

    pub fn session(&self, user: &UserId) -> MarketResult<&Session> {
        self.sessions.get(user)
    }

    /// Update the profile. A supplier's new name shows on its listings.
    pub fn update_user(&mut self, user: &UserId, patch: UserPatch) -> MarketResult<&Session> {
        let session = self.sessions.get_mut(user)?;
        session.user.apply(patch);
        if session.role == UserRole::Supplier {
            let name = session.user.name.clone();
            for product in self.catalog.by_supplier_mut(user) {
                product.supplier_name = name.clone();
            }
        }
        self.sessions.get(user)
    }

    /// Credit loyalty points. Returns the new balance.
    pub fn add_points(&mut self, user: &UserId, points: u32) -> MarketResult<u32> {
        let session = self.sessions.get_mut(user)?;
        session.loyalty_points = session.loyalty_points.saturating_add(points);
        Ok(session.loyalty_points)
    }

    fn acting_as(&self, user: &UserId, role: UserRole) -> MarketResult<&Session> {
        self.sessions.get(user)?.require(role)
    }

    // ─── Catalog ────────────────────────────────────────────────────────────

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn product(&self, id: &ProductId) -> MarketResult<&Product> {
        self.catalog.get(id)
    }

    pub fn browse(&self, query: &BrowseQuery) -> Vec<&Product> {
        self.catalog.browse(query)
    }

    pub fn products_by_supplier(&self, supplier: &UserId) -> Vec<&Product> {
        self.catalog.by_supplier(supplier)
    }

    /// List a new product for the acting supplier.
    pub fn add_product(
        &mut self,
        actor: &UserId,
        draft: ProductDraft,
        now: DateTime<Utc>,
    ) -> MarketResult<&Product> {
        let supplier = self.acting_as(actor, UserRole::Supplier)?.user.clone();
        validate_listing(
            &draft.name,
            &draft.unit,
            draft.price_paise,
            &draft.delivery_modes,
            draft.min_order,
        )?;
        let bulk_discounts = normalize_tiers(draft.bulk_discounts)?;
        let supplier_rating = self.listing_rating(actor, supplier.rating);

        let product = Product {
            id: ProductId(self.ids.mint("p", now)),
            name: draft.name.trim().to_string(),
            category: draft.category,
            price_paise: draft.price_paise,
            unit: draft.unit,
            stock: draft.stock,
            image: draft.image,
            supplier_id: supplier.id,
            supplier_name: supplier.name,
            supplier_rating,
            distance_km: draft.distance_km,
            delivery_modes: draft.delivery_modes,
            description: draft.description,
            min_order: draft.min_order,
            bulk_discounts,
            ratings: Vec::new(),
            average_rating: None,
            updated_at: now,
        };
        Ok(self.catalog.insert(product))
    }

    pub fn update_product(
        &mut self,
        actor: &UserId,
        id: &ProductId,
        patch: ProductPatch,
        now: DateTime<Utc>,
    ) -> MarketResult<&Product> {
        self.acting_as(actor, UserRole::Supplier)?;
        let product = self.catalog.owned_mut(actor, id)?;
        patch.apply_to(product)?;
        product.updated_at = now;
        Ok(&*product)
    }

    /// Remove a listing. Existing orders keep their line items; carts drop it.
    pub fn delete_product(&mut self, actor: &UserId, id: &ProductId) -> MarketResult<Product> {
        self.acting_as(actor, UserRole::Supplier)?;
        let removed = self.catalog.remove_owned(actor, id)?;
        for cart in self.carts.values_mut() {
            cart.forget(id);
        }
        Ok(removed)
    }

    pub fn rate_product(
        &mut self,
        actor: &UserId,
        id: &ProductId,
        stars: u8,
        comment: String,
        now: DateTime<Utc>,
    ) -> MarketResult<&Product> {
        let user_name = self.sessions.get(actor)?.user.name.clone();
        let stars = validate_stars(stars)?;
        if self.catalog.get(id)?.supplier_id == *actor {
            return Err(MarketError::Validation(
                "suppliers cannot rate their own products".into(),
            ));
        }
        let rating = ProductRating {
            id: ProductRatingId(self.ids.mint("pr", now)),
            user_id: actor.clone(),
            user_name,
            rating: stars,
            comment: comment.trim().to_string(),
            created_at: now,
        };
        let product = self.catalog.get_mut(id)?;
        product.add_rating(rating);
        Ok(&*product)
    }

    /// Rating shown on a supplier's listings: the mean of received ratings,
    /// else the profile rating, else the default.
    fn listing_rating(&self, supplier: &UserId, profile: Option<f64>) -> f64 {
        if self.supplier_ratings.iter().any(|r| r.supplier_id == *supplier) {
            supplier_average(&self.supplier_ratings, supplier)
        } else {
            profile.unwrap_or(DEFAULT_SUPPLIER_RATING)
        }
    }

    // ─── Cart ───────────────────────────────────────────────────────────────

    pub fn cart(&self, actor: &UserId) -> MarketResult<PricedCart> {
        self.acting_as(actor, UserRole::Vendor)?;
        match self.carts.get(actor) {
            Some(cart) => cart.price(&self.catalog),
            None => Cart::default().price(&self.catalog),
        }
    }

    pub fn add_to_cart(
        &mut self,
        actor: &UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> MarketResult<PricedCart> {
        self.acting_as(actor, UserRole::Vendor)?;
        self.catalog.get(&product_id)?;
        let mut next = self.carts.get(actor).cloned().unwrap_or_default();
        next.add(product_id, quantity)?;
        self.commit_cart(actor, next)
    }

    pub fn set_cart_quantity(
        &mut self,
        actor: &UserId,
        product_id: &ProductId,
        quantity: u32,
    ) -> MarketResult<PricedCart> {
        self.acting_as(actor, UserRole::Vendor)?;
        let mut next = self
            .carts
            .get(actor)
            .cloned()
            .ok_or_else(|| MarketError::NotInCart(product_id.clone()))?;
        next.set_quantity(product_id, quantity)?;
        self.commit_cart(actor, next)
    }

    /// Store `cart` only if it can still be priced.
    fn commit_cart(&mut self, actor: &UserId, cart: Cart) -> MarketResult<PricedCart> {
        let priced = cart.price(&self.catalog)?;
        self.carts.insert(actor.clone(), cart);
        Ok(priced)
    }

    pub fn remove_from_cart(
        &mut self,
        actor: &UserId,
        product_id: &ProductId,
    ) -> MarketResult<PricedCart> {
        self.set_cart_quantity(actor, product_id, 0)
    }

    pub fn clear_cart(&mut self, actor: &UserId) -> MarketResult<()> {
        self.acting_as(actor, UserRole::Vendor)?;
        self.carts.remove(actor);
        Ok(())
    }

    /// Turn the vendor's cart into one pending order per supplier.
    ///
    /// Nothing changes unless every line passes: the products exist, offer
    /// the chosen delivery mode, and meet their minimum order.
    pub fn checkout(
        &mut self,
        actor: &UserId,
        details: CheckoutDetails,
        now: DateTime<Utc>,
    ) -> MarketResult<Vec<Order>> {
        let vendor = self.acting_as(actor, UserRole::Vendor)?.user.clone();
        let cart = self
            .carts
            .get(actor)
            .filter(|c| !c.is_empty())
            .ok_or(MarketError::EmptyCart)?;
        let priced = cart.price(&self.catalog)?;

        for line in &priced.lines {
            if line.quantity < line.min_order {
                return Err(MarketError::BelowMinimumOrder {
                    product: line.product_id.clone(),
                    min_order: line.min_order,
                    requested: line.quantity,
                });
            }
            if !self.catalog.get(&line.product_id)?.supports(details.delivery_mode) {
                let mode = match details.delivery_mode {
                    DeliveryMode::Online => "delivery",
                    DeliveryMode::Offline => "pickup",
                };
                return Err(MarketError::Validation(format!(
                    "{} is not available for {mode}",
                    line.product_name
                )));
            }
        }

        let orders = split_by_supplier(priced.lines)
            .into_iter()
            .map(|batch| {
                Order::from_batch(
                    OrderId(self.ids.mint("o", now)),
                    &vendor,
                    batch,
                    &details,
                    now,
                )
            })
            .collect::<MarketResult<Vec<_>>>()?;

        let mut placed = Vec::new();
        for order in orders {
            self.notify(
                order.supplier_id.clone(),
                NotificationKind::Info,
                "New Order Received",
                format!(
                    "New order from {} for {}",
                    order.vendor_name,
                    format_rupees(order.total_paise)
                ),
                now,
            );
            self.orders.insert(order.id.clone(), order.clone());
            placed.push(order);
        }

        self.carts.remove(actor);
        self.add_points(actor, LOYALTY_POINTS_PER_CHECKOUT)?;
        Ok(placed)
    }

    // ─── Orders ─────────────────────────────────────────────────────────────

    /// Orders where `user` is the buyer (vendor) or the seller (supplier).
    pub fn orders_by_user(&self, user: &UserId, role: UserRole) -> Vec<&Order> {
        self.orders
            .values()
            .filter(|o| match role {
                UserRole::Vendor => o.vendor_id == *user,
                UserRole::Supplier => o.supplier_id == *user,
            })
            .collect()
    }

    /// The acting user's orders, optionally narrowed to one status.
    pub fn orders_for(
        &self,
        actor: &UserId,
        status: Option<OrderStatus>,
    ) -> MarketResult<Vec<&Order>> {
        let role = self.sessions.get(actor)?.role;
        Ok(self
            .orders_by_user(actor, role)
            .into_iter()
            .filter(|o| status.map_or(true, |s| o.status == s))
            .collect())
    }

    pub fn order(&self, actor: &UserId, id: &OrderId) -> MarketResult<&Order> {
        self.sessions.get(actor)?;
        let order = self
            .orders
            .get(id)
            .ok_or_else(|| MarketError::OrderNotFound(id.clone()))?;
        if !order.involves(actor) {
            return Err(MarketError::NotOwner {
                user: actor.clone(),
                what: format!("order {id}"),
            });
        }
        Ok(order)
    }

    /// Move an order to `next`, notifying the vendor when the supplier acts.
    pub fn transition_order(
        &mut self,
        actor: &UserId,
        id: &OrderId,
        next: OrderStatus,
        now: DateTime<Utc>,
    ) -> MarketResult<&Order> {
        let role = self.sessions.get(actor)?.role;
        let order = self
            .orders
            .get(id)
            .ok_or_else(|| MarketError::OrderNotFound(id.clone()))?;

        let allowed = if next.is_supplier_move() {
            role == UserRole::Supplier && order.supplier_id == *actor
        } else {
            role == UserRole::Vendor && order.vendor_id == *actor
        };
        if !allowed {
            return Err(MarketError::NotOwner {
                user: actor.clone(),
                what: format!("order {id}"),
            });
        }
        if !order.status.can_transition_to(next) {
            return Err(MarketError::InvalidTransition {
                from: order.status,
                to: next,
            });
        }

        let vendor_id = order.vendor_id.clone();
        if let Some((kind, text)) = next.vendor_notice() {
            self.notify(vendor_id, kind, "Order Status Update", text.to_string(), now);
        }
        let order = self
            .orders
            .get_mut(id)
            .ok_or_else(|| MarketError::OrderNotFound(id.clone()))?;
        order.status = next;
        Ok(&*order)
    }

    // ─── Messages ───────────────────────────────────────────────────────────

    pub fn send_message(
        &mut self,
        actor: &UserId,
        draft: MessageDraft,
        now: DateTime<Utc>,
    ) -> MarketResult<&Message> {
        let from_name = self.sessions.get(actor)?.user.name.clone();
        let body = draft.body.trim();
        if body.is_empty() {
            return Err(MarketError::Validation("message body is empty".into()));
        }
        if draft.to_id == *actor {
            return Err(MarketError::Validation("cannot message yourself".into()));
        }

        let message = Message {
            id: MessageId(self.ids.mint("m", now)),
            from_id: actor.clone(),
            to_id: draft.to_id.clone(),
            from_name: from_name.clone(),
            to_name: draft.to_name,
            body: body.to_string(),
            sent_at: now,
            read: false,
        };
        self.notify(
            draft.to_id,
            NotificationKind::Info,
            "New Message",
            format!("New message from {from_name}"),
            now,
        );
        self.messages.push(message);
        Ok(&self.messages[self.messages.len() - 1])
    }

    /// Only the recipient can mark a message read.
    pub fn mark_message_read(&mut self, actor: &UserId, id: &MessageId) -> MarketResult<&Message> {
        self.sessions.get(actor)?;
        let message = self
            .messages
            .iter_mut()
            .find(|m| m.id == *id)
            .ok_or_else(|| MarketError::MessageNotFound(id.clone()))?;
        if message.to_id != *actor {
            return Err(MarketError::NotOwner {
                user: actor.clone(),
                what: format!("message {id}"),
            });
        }
        message.read = true;
        Ok(&*message)
    }

    pub fn messages_by_user(&self, user: &UserId) -> Vec<&Message> {
        self.messages.iter().filter(|m| m.involves(user)).collect()
    }

    pub fn conversations(&self, user: &UserId) -> Vec<Conversation> {
        message::conversations(&self.messages, user)
    }

    // ─── Notifications ──────────────────────────────────────────────────────

    /// Append a notification for `user_id`.
    pub fn notify(
        &mut self,
        user_id: UserId,
        kind: NotificationKind,
        title: &str,
        message: String,
        now: DateTime<Utc>,
    ) -> NotificationId {
        let id = NotificationId(self.ids.mint("n", now));
        self.inbox.push(Notification {
            id: id.clone(),
            kind,
            title: title.to_string(),
            message,
            user_id,
            created_at: now,
            read: false,
        });
        id
    }

    pub fn notifications_for(&self, user: &UserId) -> Vec<&Notification> {
        self.inbox.for_user(user).collect()
    }

    pub fn unread_count(&self, user: &UserId) -> usize {
        self.inbox.unread_count(user)
    }

    pub fn mark_notification_read(
        &mut self,
        actor: &UserId,
        id: &NotificationId,
    ) -> MarketResult<()> {
        self.sessions.get(actor)?;
        self.inbox.mark_read(actor, id)
    }

    pub fn remove_notification(
        &mut self,
        actor: &UserId,
        id: &NotificationId,
    ) -> MarketResult<Notification> {
        self.sessions.get(actor)?;
        self.inbox.remove(actor, id)
    }

    // ─── Supplier ratings ───────────────────────────────────────────────────

    /// Rate the supplier of one of the vendor's delivered or completed orders.
    pub fn rate_supplier(
        &mut self,
        actor: &UserId,
        draft: SupplierRatingDraft,
        now: DateTime<Utc>,
    ) -> MarketResult<&SupplierRating> {
        let vendor_name = self.acting_as(actor, UserRole::Vendor)?.user.name.clone();
        let stars = validate_stars(draft.rating)?;
        let order = self
            .orders
            .get(&draft.order_id)
            .ok_or_else(|| MarketError::OrderNotFound(draft.order_id.clone()))?;
        if order.vendor_id != *actor {
            return Err(MarketError::NotOwner {
                user: actor.clone(),
                what: format!("order {}", order.id),
            });
        }
        if !matches!(order.status, OrderStatus::Delivered | OrderStatus::Completed) {
            return Err(MarketError::OrderNotRateable {
                order: order.id.clone(),
                status: order.status,
            });
        }
        if self
            .supplier_ratings
            .iter()
            .any(|r| r.order_id == draft.order_id)
        {
            return Err(MarketError::AlreadyRated(draft.order_id));
        }

        let supplier_id = order.supplier_id.clone();
        self.supplier_ratings.push(SupplierRating {
            id: RatingId(self.ids.mint("r", now)),
            supplier_id: supplier_id.clone(),
            vendor_id: actor.clone(),
            vendor_name,
            rating: stars,
            comment: draft.comment.trim().to_string(),
            order_id: draft.order_id,
            created_at: now,
        });

        let average = supplier_average(&self.supplier_ratings, &supplier_id);
        for product in self.catalog.by_supplier_mut(&supplier_id) {
            product.supplier_rating = average;
        }
        Ok(&self.supplier_ratings[self.supplier_ratings.len() - 1])
    }

    pub fn supplier_rating(&self, supplier: &UserId) -> f64 {
        supplier_average(&self.supplier_ratings, supplier)
    }

    pub fn supplier_ratings(&self, supplier: &UserId) -> Vec<&SupplierRating> {
        self.supplier_ratings
            .iter()
            .filter(|r| r.supplier_id == *supplier)
            .collect()
    }

    pub fn supplier_summary(&self, supplier: &UserId) -> SupplierSummary {
        let products = self.catalog.by_supplier(supplier);
        let ratings = self.supplier_ratings(supplier);
        SupplierSummary {
            supplier_id: supplier.clone(),
            product_count: products.len(),
            total_stock: products.iter().map(|p| u64::from(p.stock)).sum(),
            inventory_value_paise: products
                .iter()
                .map(|p| u64::from(p.stock).saturating_mul(p.price_paise))
                .fold(0, u64::saturating_add),
            average_rating: self.supplier_rating(supplier),
            rating_count: ratings.len(),
            recent_ratings: ratings
                .iter()
                .rev()
                .take(RECENT_RATINGS)
                .map(|r| (*r).clone())
                .collect(),
        }
    }

    /// Insert a fully formed product, minting its id. Used for demo data.
    pub(crate) fn list_seed_product(
        &mut self,
        mut product: Product,
        now: DateTime<Utc>,
    ) -> MarketResult<&Product> {
        product.bulk_discounts = normalize_tiers(product.bulk_discounts)?;
        product.id = ProductId(self.ids.mint("p", now));
        product.updated_at = now;
        Ok(self.catalog.insert(product))
    }
}
