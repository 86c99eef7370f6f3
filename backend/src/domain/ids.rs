//! Strongly typed identifiers for scheduling entities.
//!
//! Every entity is keyed by an opaque UUID. Wrapping each one in its own type
//! keeps a `SlotId` from being passed where a `MemberId` is expected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a new random identifier.
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Access the underlying UUID.
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(value.trim()).map(Self)
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }
    };
}

define_id! {
    /// Identifier of a [`Schedule`](crate::domain::Schedule).
    ScheduleId
}

define_id! {
    /// Identifier of a [`Slot`](crate::domain::Slot).
    SlotId
}

define_id! {
    /// Identifier of an [`Assignment`](crate::domain::Assignment).
    AssignmentId
}

define_id! {
    /// Identifier of a member managed by the membership subsystem.
    MemberId
}

define_id! {
    /// Identifier of the acting user, resolved by the identity layer.
    ActorId
}

define_id! {
    /// Identifier of a [`MemberAvailability`](crate::domain::MemberAvailability) rule.
    AvailabilityId
}

define_id! {
    /// Identifier of a [`ScheduleException`](crate::domain::ScheduleException).
    ExceptionId
}
