use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Declares a string newtype identifier with `Display` and `From<&str>`.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

pub(crate) use string_id;

/// Mints timestamp-based ids: `"<prefix>-<unix millis>-<sequence>"`.
///
/// The sequence never repeats within one marketplace, so ids minted in the
/// same millisecond stay distinct and still sort in mint order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdMint {
    next: u64,
}

impl IdMint {
    pub fn mint(&mut self, prefix: &str, now: DateTime<Utc>) -> String {
        self.next += 1;
        format!("{prefix}-{}-{:06}", now.timestamp_millis(), self.next)
    }
}
