//! Newtype identifiers for everything deskfs tracks.
//!
//! Item and document ids are opaque strings minted by the remote storage
//! backend, so they wrap `String`. Comment ids are minted locally and wrap
//! [`uuid::Uuid`]. Distinct types keep a `DocumentId` from being passed
//! where an `ItemId` is expected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sentinel key of the synthetic root folder.
pub const ROOT_KEY: &str = "root";

/// Macro to define a newtype ID wrapper around `Uuid`.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Return the inner UUID value.
            pub fn into_uuid(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

/// Macro to define a newtype ID wrapper around an opaque backend string.
macro_rules! define_opaque_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Borrow the raw identifier.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self::from(s))
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::from(s.to_string())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_opaque_id!(
    /// Identifier of a file or folder assigned by remote storage.
    ///
    /// The empty string and `"root"` both denote the synthetic root folder
    /// and normalise to [`ItemId::root`].
    ItemId
);

define_opaque_id!(
    /// Identifier of a remote JSON document.
    DocumentId
);

define_id!(
    /// Unique identifier for a comment.
    CommentId
);

impl ItemId {
    /// The synthetic root folder.
    pub fn root() -> Self {
        Self(ROOT_KEY.to_string())
    }

    /// Whether this id denotes the synthetic root.
    pub fn is_root(&self) -> bool {
        self.0 == ROOT_KEY
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        if s.is_empty() {
            Self::root()
        } else {
            Self(s)
        }
    }
}

impl From<String> for DocumentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}
