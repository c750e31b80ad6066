//! Serde support: vectors encode as `key -> value` maps.
//!
//! The encoded form carries no slot order, so data files may list keys in any
//! order and decoding rebuilds the mask from the keys it sees.

use core::fmt;
use core::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::SparseValueVector;
use crate::flags::FlagKey;

impl<K: FlagKey + Serialize> Serialize for SparseValueVector<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(&key, &value)?;
        }
        map.end()
    }
}

impl<'de, K: FlagKey + Deserialize<'de>> Deserialize<'de> for SparseValueVector<K> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(VectorVisitor(PhantomData))
    }
}

struct VectorVisitor<K>(PhantomData<fn() -> K>);

impl<'de, K: FlagKey + Deserialize<'de>> Visitor<'de> for VectorVisitor<K> {
    type Value = SparseValueVector<K>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of stat keys to numbers")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut failure = None;
        let entries = core::iter::from_fn(|| match access.next_entry::<K, f32>() {
            Ok(entry) => entry,
            Err(err) => {
                failure = Some(err);
                None
            }
        });
        let vector = SparseValueVector::from_pairs(entries);
        match failure {
            Some(err) => Err(err),
            None => Ok(vector),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::flags::FlagKey;
    use crate::vector::SparseValueVector;

    /// Key space reaching the upper half of the mask.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
    #[serde(transparent)]
    struct Channel(u8);

    impl FlagKey for Channel {
        fn bit(self) -> u8 {
            self.0
        }

        fn from_bit(bit: u8) -> Option<Self> {
            (bit < 64).then_some(Channel(bit))
        }
    }

    #[test]
    fn high_bits_round_trip_through_json() {
        let vector = SparseValueVector::from_pairs([
            (Channel(50), 10.0),
            (Channel(40), 506.0),
            (Channel(35), 123124.0),
        ]);

        let json = serde_json::to_string(&vector).unwrap();
        let decoded: SparseValueVector<Channel> = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded.types(), vector.types());
        for (key, value) in vector.iter() {
            assert!((decoded.get(key) - value).abs() < 1e-3);
        }
    }

    #[test]
    fn decoding_ignores_entry_order() {
        let decoded: SparseValueVector<crate::keys::StatType> =
            serde_json::from_str(r#"{"Speed": 2.0, "Hp": 5.0}"#).unwrap();
        assert_eq!(decoded.values(), &[5.0, 2.0]);
    }

    #[test]
    fn repeated_keys_keep_the_last_value() {
        let decoded: SparseValueVector<Channel> =
            serde_json::from_str(r#"{"40": 1.0, "35": 2.0, "40": 3.0}"#).unwrap();
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded.get(Channel(40)), 3.0);
    }

    #[test]
    fn malformed_entries_are_rejected() {
        let decoded = serde_json::from_str::<SparseValueVector<Channel>>(r#"{"40": "high"}"#);
        assert!(decoded.is_err());
    }
}
