//! Opaque identifiers for every persisted record.
//!
//! Ids are UUID v4 strings when generated by this service, but any non-empty
//! string coming back from the store or a request path is accepted as-is.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generate a fresh random id.
            #[must_use]
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

define_id!(
    /// Identifier of a workspace (tenant).
    WorkspaceId
);
define_id!(
    /// Identifier of a board inside a workspace.
    BoardId
);
define_id!(
    /// Identifier of a group (column/section) inside a board.
    GroupId
);
define_id!(
    /// Identifier of an item or subitem.
    ItemId
);
define_id!(
    /// Identifier of an authenticated user, as issued by the auth service.
    UserId
);
