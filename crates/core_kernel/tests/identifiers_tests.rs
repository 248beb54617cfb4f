//! Unit tests for the identifiers module
//!
//! Tests cover creation, parsing, conversion, and display formatting
//! of the bill and notification identifiers.

use core_kernel::{BillId, NotificationId, CoreError};
use proptest::prelude::*;
use uuid::Uuid;

mod bill_id_tests {
    use super::*;

    #[test]
    fn test_new_generates_unique_ids() {
        let id1 = BillId::new();
        let id2 = BillId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_new_is_random_v4() {
        let id = BillId::new();
        assert_eq!(id.as_uuid().get_version_num(), 4);
    }

    #[test]
    fn test_new_v7_generates_time_ordered_ids() {
        let id1 = BillId::new_v7();
        std::thread::sleep(std::time::Duration::from_millis(1));
        let id2 = BillId::new_v7();
        assert!(id1 < id2);
    }

    #[test]
    fn test_prefix() {
        assert_eq!(BillId::prefix(), "BILL");
        assert_eq!(NotificationId::prefix(), "NTF");
    }

    #[test]
    fn test_from_str_trims_whitespace() {
        let original = BillId::new();
        let parsed: BillId = format!("  {}  ", original).parse().unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_from_str_empty_is_error() {
        assert!(matches!("".parse::<BillId>(), Err(CoreError::InvalidIdentifier(_))));
    }

    #[test]
    fn test_serde_is_transparent() {
        let id = BillId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.as_uuid()));
    }
}

proptest! {
    #[test]
    fn prop_display_parse_roundtrip(bytes in any::<[u8; 16]>()) {
        let id = BillId::from_uuid(Uuid::from_bytes(bytes));
        let parsed: BillId = id.to_string().parse().unwrap();
        prop_assert_eq!(id, parsed);
    }
}
