//! Entity identifiers.
//!
//! Every persisted record is keyed by a random UUID. Each entity gets its own
//! newtype so a `CategoryId` can never be passed where an `EventId` is
//! expected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error returned when an identifier fails to parse from a path segment or
/// session value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("identifier must be a valid UUID")]
pub struct InvalidId;

macro_rules! define_entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Mint a fresh random identifier.
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID, typically read back from storage.
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = InvalidId;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                if s.trim() != s {
                    return Err(InvalidId);
                }
                Uuid::parse_str(s).map(Self).map_err(|_| InvalidId)
            }
        }

        impl From<$name> for Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

define_entity_id!(
    /// Account identifier.
    UserId
);
define_entity_id!(UserProfileId);
define_entity_id!(UserHistoryId);
define_entity_id!(CategoryId);
define_entity_id!(
    /// Identifier of a posted eco-action.
    EcoActionId
);
define_entity_id!(UploadId);
define_entity_id!(FeedbackId);
define_entity_id!(VisitId);
define_entity_id!(ContactMessageId);
define_entity_id!(TeamMemberId);
define_entity_id!(SearchLogId);
define_entity_id!(LoginActivityId);
define_entity_id!(
    /// Identifier of a community event.
    EventId
);
