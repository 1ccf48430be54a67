//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Every roster entity has a strongly-typed ID so that a unit ID can never
//! be passed where a person ID is expected. IDs minted by the day-advance
//! pipeline are built from random bytes drawn from the campaign RNG so that
//! two runs from the same seed produce the same identifiers; [`new`] exists
//! for tests and hand-built rosters.
//!
//! [`new`]: PersonId::new

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Build an identifier from 16 caller-supplied random bytes.
            ///
            /// The version and variant bits are overwritten, so any byte
            /// pattern yields a valid v4 UUID.
            pub const fn from_random_bytes(bytes: [u8; 16]) -> Self {
                Self(uuid::Builder::from_random_bytes(bytes).into_uuid())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a person on the campaign roster.
    PersonId
}

define_id! {
    /// Unique identifier for an equipment unit.
    UnitId
}

define_id! {
    /// Unique identifier for a part (installed or spare).
    PartId
}

define_id! {
    /// Unique identifier for a force in the table of organization.
    ForceId
}

define_id! {
    /// Unique identifier for a contract.
    ContractId
}

define_id! {
    /// Unique identifier for a scenario generated under a contract.
    ScenarioId
}

define_id! {
    /// Unique identifier for a market listing (applicant or unit offer).
    OfferId
}
