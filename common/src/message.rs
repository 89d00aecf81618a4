use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::UserId;
use crate::ids::string_id;

string_id!(
    /// Unique message identifier.
    MessageId
);

/// A direct message between two users. Messages are append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub from_id: UserId,
    pub to_id: UserId,
    pub from_name: String,
    pub to_name: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub read: bool,
}

impl Message {
    pub fn involves(&self, user: &UserId) -> bool {
        self.from_id == *user || self.to_id == *user
    }
}

/// What a sender provides; identity and timestamps come from the marketplace.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageDraft {
    pub to_id: UserId,
    pub to_name: String,
    pub body: String,
}

/// All messages exchanged with one other user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversation {
    pub contact_id: UserId,
    pub contact_name: String,
    pub messages: Vec<Message>,
    /// Messages addressed to the viewer that are still unread.
    pub unread: usize,
}

impl Conversation {
    fn latest(&self) -> Option<DateTime<Utc>> {
        self.messages.last().map(|m| m.sent_at)
    }
}

/// Group `user`'s messages by the other party, most recently active first.
pub fn conversations<'a>(
    messages: impl IntoIterator<Item = &'a Message>,
    user: &UserId,
) -> Vec<Conversation> {
    let mut threads: Vec<Conversation> = Vec::new();
    for message in messages.into_iter().filter(|m| m.involves(user)) {
        let outgoing = message.from_id == *user;
        let (contact_id, contact_name) = if outgoing {
            (&message.to_id, &message.to_name)
        } else {
            (&message.from_id, &message.from_name)
        };

        let idx = match threads.iter().position(|c| c.contact_id == *contact_id) {
            Some(idx) => idx,
            None => {
                threads.push(Conversation {
                    contact_id: contact_id.clone(),
                    contact_name: contact_name.clone(),
                    messages: Vec::new(),
                    unread: 0,
                });
                threads.len() - 1
            }
        };
        let thread = &mut threads[idx];
        if !outgoing && !message.read {
            thread.unread += 1;
        }
        thread.messages.push(message.clone());
    }
    threads.sort_by(|a, b| b.latest().cmp(&a.latest()));
    threads
}
