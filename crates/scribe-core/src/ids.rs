use std::fmt;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(SmolStr);

        impl $name {
            #[inline]
            pub fn new(value: impl AsRef<str>) -> Self {
                Self(SmolStr::new(value))
            }

            #[inline]
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.0.as_str())
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(SmolStr::from(value))
            }
        }
    };
}

string_id!(
    /// Identity of a hint producer.
    ///
    /// Every hint in the editor's registry is owned by exactly one producer, and
    /// producers only ever remove their own hints.
    OwnerId
);

string_id!(
    /// Identifier the editor assigns to a single change event.
    ///
    /// Hint registry mutations carry it so the registry can map locations from the
    /// event's document snapshot to the current one.
    RunId
);

string_id!(
    /// Identity of the governing context of a document (the body that holds the
    /// session being edited). Entity data is only valid for one scope at a time.
    ScopeKey
);

/// Marker attached to a document mutation naming the producer that caused it.
///
/// A change event carrying an originator equal to a producer's own [`OwnerId`]
/// was caused by that producer and must not re-trigger it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Originator {
    pub who: OwnerId,
}

impl Originator {
    pub fn new(who: OwnerId) -> Self {
        Self { who }
    }

    #[inline]
    pub fn is(&self, owner: &OwnerId) -> bool {
        &self.who == owner
    }
}
