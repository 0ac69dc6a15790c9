//! Canonical serialization for deterministic fingerprints.
//!
//! Graph fingerprints, rule-set fingerprints and the persistence cache all
//! hash through here, so the same content always yields the same key.
//!
//! ## Determinism Guarantees
//!
//! - Stable field order: struct fields serialize in declaration order
//! - Stable map order: hashed data only uses `BTreeMap`/`BTreeSet`
//! - Stable sequence order: vectors serialize in index order

use serde::Serialize;
use xxhash_rust::xxh64::xxh64;

/// Serialize a value to canonical JSON bytes for hashing.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(value)
}

/// Compute the canonical hash of a serializable value.
pub fn canonical_hash<T: Serialize>(value: &T) -> Result<u64, serde_json::Error> {
    Ok(content_hash(&to_canonical_bytes(value)?))
}

/// Compute the canonical hash and return it as a 16-digit hex string.
pub fn canonical_hash_hex<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    Ok(format!("{:016x}", canonical_hash(value)?))
}

/// Hash raw bytes (e.g. a file's contents).
pub fn content_hash(bytes: &[u8]) -> u64 {
    xxh64(bytes, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    struct TestStruct {
        name: String,
        attributes: BTreeMap<String, i32>,
    }

    fn make_struct(order: &[(&str, i32)]) -> TestStruct {
        TestStruct {
            name: ":app".to_string(),
            attributes: order.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    #[test]
    fn test_determinism() {
        let s = make_struct(&[("degree", 2)]);
        assert_eq!(canonical_hash(&s).unwrap(), canonical_hash(&s).unwrap());
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let a = make_struct(&[("a", 1), ("b", 2)]);
        let b = make_struct(&[("b", 2), ("a", 1)]);
        assert_eq!(canonical_hash_hex(&a).unwrap(), canonical_hash_hex(&b).unwrap());
    }

    #[test]
    fn test_hex_is_sixteen_digits() {
        let hex = canonical_hash_hex(&make_struct(&[])).unwrap();
        assert_eq!(hex.len(), 16);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
