//! Mocked login. A session is just "this user id is present, acting in this
//! role". There are no credentials and nothing to verify.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{MarketError, MarketResult};
use crate::identity::{User, UserId, UserRole};

/// Loyalty points a vendor earns per checkout.
pub const LOYALTY_POINTS_PER_CHECKOUT: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
    pub role: UserRole,
    pub loyalty_points: u32,
    pub logged_in_at: DateTime<Utc>,
}

impl Session {
    /// Fails unless the session acts in `role`.
    pub fn require(&self, role: UserRole) -> MarketResult<&Self> {
        if self.role == role {
            Ok(self)
        } else {
            Err(MarketError::WrongRole { required: role })
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sessions {
    live: BTreeMap<UserId, Session>,
}

impl Sessions {
    /// Start (or replace) the session for `user`. Logging in again in the
    /// same role keeps the loyalty points earned so far.
    pub fn login(&mut self, user: User, role: UserRole, now: DateTime<Utc>) -> &Session {
        let id = user.id.clone();
        let loyalty_points = self
            .live
            .get(&id)
            .filter(|s| s.role == role)
            .map_or(0, |s| s.loyalty_points);
        self.live.insert(
            id.clone(),
            Session {
                user,
                role,
                loyalty_points,
                logged_in_at: now,
            },
        );
        &self.live[&id]
    }

    pub fn logout(&mut self, id: &UserId) -> MarketResult<Session> {
        self.live
            .remove(id)
            .ok_or_else(|| MarketError::NotLoggedIn(id.clone()))
    }

    pub fn get(&self, id: &UserId) -> MarketResult<&Session> {
        self.live
            .get(id)
            .ok_or_else(|| MarketError::NotLoggedIn(id.clone()))
    }

    pub fn get_mut(&mut self, id: &UserId) -> MarketResult<&mut Session> {
        self.live
            .get_mut(id)
            .ok_or_else(|| MarketError::NotLoggedIn(id.clone()))
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}
