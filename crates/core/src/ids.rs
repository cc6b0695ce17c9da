use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// UUIDv7 newtype, stored as a 16-byte blob.
macro_rules! uuid_id {
    ($name:ident) => {
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn from_bytes(bytes: [u8; 16]) -> Self {
                Self(Uuid::from_bytes(bytes))
            }

            pub fn as_bytes(&self) -> &[u8; 16] {
                self.0.as_bytes()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), &self.0.to_string()[..8])
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
    };
}

uuid_id!(UserId);
uuid_id!(InventoryId);
uuid_id!(OverrideId);
uuid_id!(HistoryId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_roundtrip_preserves_identity() {
        let user = UserId::new();
        assert_eq!(UserId::from_bytes(*user.as_bytes()), user);
    }

    #[test]
    fn debug_is_abbreviated() {
        let id = InventoryId::new();
        let debug = format!("{id:?}");
        assert!(debug.starts_with("InventoryId("));
        assert_eq!(debug.len(), "InventoryId(".len() + 8 + 1);
    }
}
