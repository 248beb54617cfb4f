//! Strongly-typed identifiers for externally visible records
//!
//! Newtype wrappers around UUIDs keep a bill's external identity from being
//! confused with any other UUID-shaped value (user references, request ids).
//! Identifiers display as the bare UUID because that is the form exchanged
//! with clients; the prefix is only used by [`tagged`](BillId::tagged) for logs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::CoreError;

macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates a new time-ordered identifier (v7)
            pub fn new_v7() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates from an existing UUID
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Returns the identifier prefix used in log output
            pub fn prefix() -> &'static str {
                $prefix
            }

            /// Parses only the canonical form this identifier displays as
            ///
            /// Unlike [`FromStr`], which also accepts the prefixed form and
            /// surrounding whitespace, this requires the exact lowercase
            /// hyphenated UUID.
            pub fn parse_exact(s: &str) -> Result<Self, CoreError> {
                let uuid = Uuid::try_parse(s)
                    .map_err(|e| CoreError::invalid_identifier(format!("{}: {}", s, e)))?;
                if uuid.hyphenated().to_string() != s {
                    return Err(CoreError::invalid_identifier(format!(
                        "{}: not a canonical uuid",
                        s
                    )));
                }
                Ok(Self(uuid))
            }

            /// Returns the prefixed form, e.g. `BILL-<uuid>`
            pub fn tagged(&self) -> String {
                format!("{}-{}", $prefix, self.0)
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
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                let uuid_str = trimmed
                    .strip_prefix(concat!($prefix, "-"))
                    .unwrap_or(trimmed);
                Uuid::parse_str(uuid_str)
                    .map(Self)
                    .map_err(|e| CoreError::invalid_identifier(format!("{}: {}", s, e)))
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Uuid {
                id.0
            }
        }
    };
}

// External identity of a bill
define_id!(BillId, "BILL");

// Identity of an outbound notification message
define_id!(NotificationId, "NTF");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bill_id_display_is_bare_uuid() {
        let id = BillId::new();
        assert_eq!(id.to_string(), id.as_uuid().to_string());
        assert!(id.tagged().starts_with("BILL-"));
    }

    #[test]
    fn test_id_parsing_accepts_both_forms() {
        let original = BillId::new();
        let bare: BillId = original.to_string().parse().unwrap();
        let tagged: BillId = original.tagged().parse().unwrap();
        assert_eq!(original, bare);
        assert_eq!(original, tagged);
    }

    #[test]
    fn test_exact_parsing_accepts_only_canonical_form() {
        let id = BillId::new();
        let canonical = id.to_string();

        assert_eq!(BillId::parse_exact(&canonical).unwrap(), id);
        assert!(BillId::parse_exact(&id.tagged()).is_err());
        assert!(BillId::parse_exact(&format!(" {} ", canonical)).is_err());
        assert!(BillId::parse_exact(&canonical.to_uppercase()).is_err());
        assert!(BillId::parse_exact(&id.as_uuid().simple().to_string()).is_err());
        assert!(BillId::parse_exact("").is_err());
    }

    #[test]
    fn test_id_parsing_rejects_garbage() {
        let result = "not-a-uuid".parse::<BillId>();
        assert!(matches!(result, Err(CoreError::InvalidIdentifier(_))));
    }

    #[test]
    fn test_uuid_conversion() {
        let uuid = Uuid::new_v4();
        let bill_id = BillId::from(uuid);
        let back: Uuid = bill_id.into();
        assert_eq!(uuid, back);
    }
}
