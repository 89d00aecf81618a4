use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{MarketError, MarketResult};
use crate::identity::UserId;
use crate::ids::string_id;

string_id!(
    /// Unique notification identifier.
    NotificationId
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Error,
    Warning,
}

/// A notice addressed to exactly one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}

/// Every user's notifications, newest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inbox {
    notifications: VecDeque<Notification>,
}

impl Inbox {
    pub fn push(&mut self, notification: Notification) {
        self.notifications.push_front(notification);
    }

    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    pub fn for_user<'a>(&'a self, user: &UserId) -> impl Iterator<Item = &'a Notification> + 'a {
        let user = user.clone();
        self.notifications.iter().filter(move |n| n.user_id == user)
    }

    pub fn unread_count(&self, user: &UserId) -> usize {
        self.for_user(user).filter(|n| !n.read).count()
    }

    /// Mark one of `user`'s notifications as read.
    pub fn mark_read(&mut self, user: &UserId, id: &NotificationId) -> MarketResult<()> {
        self.owned_mut(user, id)?.read = true;
        Ok(())
    }

    /// Delete one of `user`'s notifications.
    pub fn remove(&mut self, user: &UserId, id: &NotificationId) -> MarketResult<Notification> {
        self.owned_mut(user, id)?;
        let pos = self
            .notifications
            .iter()
            .position(|n| n.id == *id)
            .ok_or_else(|| MarketError::NotificationNotFound(id.clone()))?;
        self.notifications
            .remove(pos)
            .ok_or_else(|| MarketError::NotificationNotFound(id.clone()))
    }

    fn owned_mut(&mut self, user: &UserId, id: &NotificationId) -> MarketResult<&mut Notification> {
        let notification = self
            .notifications
            .iter_mut()
            .find(|n| n.id == *id)
            .ok_or_else(|| MarketError::NotificationNotFound(id.clone()))?;
        if notification.user_id != *user {
            return Err(MarketError::NotOwner {
                user: user.clone(),
                what: format!("notification {id}"),
            });
        }
        Ok(notification)
    }
}
