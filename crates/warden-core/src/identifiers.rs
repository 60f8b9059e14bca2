//! Identifier types
//!
//! Policy, organization and user ids are issued by the server as opaque
//! strings (GUIDs in practice). They are kept opaque here and never parsed.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a server-issued id
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the raw id
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Identity of a single policy document
    PolicyId
);

string_id!(
    /// Identity of an organization
    OrganizationId
);

string_id!(
    /// Identity of a user account
    UserId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_transparent_in_json() {
        let id = OrganizationId::new("org-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"org-1\"");
        let back: OrganizationId = serde_json::from_str("\"org-1\"").unwrap();
        assert_eq!(back, id);
        assert_eq!(id.to_string(), "org-1");
    }
}
