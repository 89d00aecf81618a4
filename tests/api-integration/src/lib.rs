//! End-to-end tests for the marketplace API.
//!
//! [`harness::TestHarness`] boots the real router on an ephemeral port with
//! the demo catalog and a cast of logged-in participants.

pub mod harness;

use chrono::Utc;
use mandi_common::identity::{User, UserId};
use mandi_common::location::{GeoLocation, Location};

/// A plausible user profile for `id`.
pub fn make_user(id: &str, name: &str, address: &str) -> User {
    User {
        id: UserId::from(id),
        name: name.to_string(),
        email: format!("{id}@example.in"),
        phone: "+91 90000 00000".to_string(),
        location: Location {
            address: address.to_string(),
            coordinates: GeoLocation::new(13.0827, 80.2707),
        },
        profile_image: None,
        verified: true,
        rating: None,
        joined_at: Utc::now(),
    }
}
