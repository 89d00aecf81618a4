use thiserror::Error;

use crate::identity::{UserId, UserRole};
use crate::message::MessageId;
use crate::notification::NotificationId;
use crate::order::{OrderId, OrderStatus};
use crate::product::ProductId;

/// Everything a marketplace operation can refuse to do.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MarketError {
    #[error("user {0} is not logged in")]
    NotLoggedIn(UserId),

    #[error("this action requires the {required} role")]
    WrongRole { required: UserRole },

    #[error("user {user} does not own {what}")]
    NotOwner { user: UserId, what: String },

    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    #[error("order {0} not found")]
    OrderNotFound(OrderId),

    #[error("message {0} not found")]
    MessageNotFound(MessageId),

    #[error("notification {0} not found")]
    NotificationNotFound(NotificationId),

    #[error("product {0} is not in the cart")]
    NotInCart(ProductId),

    #[error("cart is empty")]
    EmptyCart,

    #[error("quantity must be at least 1")]
    ZeroQuantity,

    #[error("{product} needs a minimum order of {min_order}, got {requested}")]
    BelowMinimumOrder {
        product: ProductId,
        min_order: u32,
        requested: u32,
    },

    #[error("invalid discount tier: {0}")]
    InvalidDiscount(String),

    #[error("rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),

    #[error("{0}")]
    Validation(String),

    #[error("{0} is too large")]
    TooLarge(&'static str),

    #[error("cannot move order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("order {order} cannot be rated while {status}")]
    OrderNotRateable { order: OrderId, status: OrderStatus },

    #[error("order {0} has already been rated")]
    AlreadyRated(OrderId),
}

pub type MarketResult<T> = Result<T, MarketError>;
