//! Newtype IDs for type-safe identifiers.
//!
//! Ids are assigned by the catalog source; the core never mints them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(
    /// Catalog product identifier.
    ProductId
);
define_id!(
    /// Category slug (e.g. `"electronics"`).
    CategoryId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id = ProductId::new("prod-123");
        assert_eq!(id.as_str(), "prod-123");
    }

    #[test]
    fn test_id_from_string() {
        let id: ProductId = "prod-456".into();
        assert_eq!(id.as_str(), "prod-456");
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = ProductId::new("7");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"7\"");
        let back: ProductId = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(back, id);
    }
}
