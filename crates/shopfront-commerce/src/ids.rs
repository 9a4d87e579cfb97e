//! Newtype IDs for type-safe identifiers.
//!
//! The backend keys every record with an integer primary key. Wrapping them
//! keeps a `CartItemId` from being passed where a `ProductId` is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Macro to generate integer newtype ID structs.
macro_rules! define_id {
    ($name:ident) => {
        /// A backend record identifier.
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw backend id.
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the raw id.
            pub const fn get(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<i64>().map(Self)
            }
        }
    };
}

define_id!(ProductId);
define_id!(CategoryId);
define_id!(ColorId);
define_id!(CuratedEntryId);
define_id!(CartId);
define_id!(CartItemId);
define_id!(OrderId);
define_id!(NotificationId);
define_id!(TrackingCodeId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id = ProductId::new(42);
        assert_eq!(id.get(), 42);
    }

    #[test]
    fn test_id_serde_is_transparent() {
        let id: ProductId = serde_json::from_str("17").unwrap();
        assert_eq!(id, ProductId::new(17));
        assert_eq!(serde_json::to_string(&id).unwrap(), "17");
    }

    #[test]
    fn test_id_from_str() {
        assert_eq!(" 9 ".parse::<OrderId>().unwrap(), OrderId::new(9));
        assert!("abc".parse::<OrderId>().is_err());
    }

    #[test]
    fn test_id_display() {
        assert_eq!(format!("{}", CartItemId::new(789)), "789");
    }
}
