//! Condition queries - bit-flag activation gates.
//!
//! Passives and abilities declare the conditions they need as a
//! [`ConditionQuery`]: a `u64` mask over condition ids `0..64`. Queries are
//! evaluated on every combat tick, so they stay `Copy`, branch-light and free of
//! allocation. Combining an id outside the domain fails instead of wrapping.
//!
//! What a condition *means* (HP below half, target stunned, ...) is decided by
//! the actor layer through a [`ConditionResolver`].

mod resolver;

use core::fmt;
use core::ops::{BitAnd, BitOr, BitOrAssign};

use crate::config::StatConfig;
use crate::error::{StatError, StatResult};
use crate::flags::{BitFlagSet, FlagKey, Flags};

pub use resolver::{ConditionResolver, MatchMode};

/// Identifier of one condition, guaranteed to be in `0..64`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u32", into = "u32"))]
pub struct ConditionId(u8);

impl ConditionId {
    /// Validates `id` against the condition domain.
    ///
    /// # Errors
    ///
    /// Returns [`StatError::ConditionOutOfRange`] for ids `>= 64`.
    pub fn new(id: u32) -> StatResult<Self> {
        if id < StatConfig::CONDITION_DOMAIN {
            Ok(Self(id as u8))
        } else {
            Err(StatError::ConditionOutOfRange { id })
        }
    }

    /// Numeric id.
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl FlagKey for ConditionId {
    #[inline]
    fn bit(self) -> u8 {
        self.0
    }

    #[inline]
    fn from_bit(bit: u8) -> Option<Self> {
        ConditionId::new(u32::from(bit)).ok()
    }
}

impl TryFrom<u32> for ConditionId {
    type Error = StatError;

    fn try_from(id: u32) -> StatResult<Self> {
        Self::new(id)
    }
}

impl From<ConditionId> for u32 {
    fn from(id: ConditionId) -> u32 {
        u32::from(id.0)
    }
}

impl fmt::Display for ConditionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Validated set of condition ids with a cached highest id.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ConditionQuery {
    flags: BitFlagSet<ConditionId>,
    last: Option<ConditionId>,
}

impl ConditionQuery {
    /// The query with no conditions.
    pub const EMPTY: Self = Self {
        flags: BitFlagSet::EMPTY,
        last: None,
    };

    /// Creates an empty query.
    pub const fn empty() -> Self {
        Self::EMPTY
    }

    /// Creates a query holding exactly `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StatError::ConditionOutOfRange`] for ids `>= 64`.
    pub fn from_id(id: u32) -> StatResult<Self> {
        Ok(Self::from(ConditionId::new(id)?))
    }

    /// Creates a query from several ids, failing on the first out-of-range id.
    pub fn from_ids(ids: impl IntoIterator<Item = u32>) -> StatResult<Self> {
        ids.into_iter().try_fold(Self::EMPTY, |mut query, id| {
            query.insert(id)?;
            Ok(query)
        })
    }

    fn from_flags(flags: BitFlagSet<ConditionId>) -> Self {
        Self {
            flags,
            last: flags.last(),
        }
    }

    /// Adds `id` to the query.
    ///
    /// # Errors
    ///
    /// Returns [`StatError::ConditionOutOfRange`] for ids `>= 64`; the query is
    /// left unchanged.
    pub fn insert(&mut self, id: u32) -> StatResult<()> {
        let id = ConditionId::new(id)?;
        self.insert_id(id);
        Ok(())
    }

    /// Adds an already validated id.
    pub fn insert_id(&mut self, id: ConditionId) {
        self.flags.insert(id);
        if self.last.is_none_or(|last| id > last) {
            self.last = Some(id);
        }
    }

    /// Returns a copy of the query with `id` added.
    pub fn with(mut self, id: u32) -> StatResult<Self> {
        self.insert(id)?;
        Ok(self)
    }

    /// Returns true if condition `id` is part of the query. Ids outside the
    /// domain are never part of a query.
    #[inline]
    pub fn has(&self, id: u32) -> bool {
        ConditionId::new(id).is_ok_and(|id| self.flags.has(id))
    }

    /// Number of conditions in the query.
    #[inline]
    pub fn count(&self) -> usize {
        self.flags.count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Highest condition id of the query.
    #[inline]
    pub fn last(&self) -> Option<ConditionId> {
        self.last
    }

    /// Raw mask.
    #[inline]
    pub fn bits(&self) -> u64 {
        self.flags.bits()
    }

    /// Underlying flag set.
    pub fn flags(&self) -> BitFlagSet<ConditionId> {
        self.flags
    }

    /// Iterates the ids of the query in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = ConditionId> {
        self.flags.keys()
    }

    /// Evaluates the query against `resolver`.
    ///
    /// The empty query always passes. `argument` is forwarded untouched to the
    /// resolver for every condition.
    pub fn evaluate<R>(&self, resolver: &R, argument: &str, mode: MatchMode) -> bool
    where
        R: ConditionResolver + ?Sized,
    {
        if self.is_empty() {
            return true;
        }
        match mode {
            MatchMode::All => self.iter().all(|id| resolver.resolve(id, argument)),
            MatchMode::Any => self.iter().any(|id| resolver.resolve(id, argument)),
        }
    }
}

impl From<ConditionId> for ConditionQuery {
    fn from(id: ConditionId) -> Self {
        Self {
            flags: BitFlagSet::from_key(id),
            last: Some(id),
        }
    }
}

impl BitOr for ConditionQuery {
    type Output = Self;

    /// Both operands only hold in-domain ids, so their union is always valid.
    fn bitor(self, rhs: Self) -> Self {
        Self::from_flags(self.flags | rhs.flags)
    }
}

impl BitOrAssign for ConditionQuery {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = *self | rhs;
    }
}

impl BitOrAssign<ConditionId> for ConditionQuery {
    fn bitor_assign(&mut self, rhs: ConditionId) {
        self.insert_id(rhs);
    }
}

impl BitAnd for ConditionQuery {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self::from_flags(self.flags & rhs.flags)
    }
}

impl IntoIterator for ConditionQuery {
    type Item = (u8, ConditionId);
    type IntoIter = Flags<ConditionId>;

    fn into_iter(self) -> Self::IntoIter {
        self.flags.iter()
    }
}

impl fmt::Debug for ConditionQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(ConditionId::get)).finish()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ConditionQuery {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter().map(u32::from))
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ConditionQuery {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let ids = Vec::<u32>::deserialize(deserializer)?;
        Self::from_ids(ids).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_id_query() {
        let query = ConditionQuery::from_id(12).unwrap();
        assert_eq!(query.count(), 1);
        assert_eq!(query.bits(), 1u64 << 12);
        assert!(query.has(12));
        assert_eq!(query.last().map(ConditionId::get), Some(12));
    }

    #[test]
    fn high_flags_intersect_to_exact_set() {
        let mut a = ConditionQuery::from_id(45).unwrap();
        a.insert(63).unwrap();

        let mut b = ConditionQuery::from_ids([45, 63]).unwrap();
        assert_eq!(
            b.insert(100),
            Err(StatError::ConditionOutOfRange { id: 100 })
        );
        assert_eq!(b.count(), 2);

        let both = a & b;
        assert_eq!(both.count(), 2);
        assert!(both.has(45));
        assert!(both.has(63));
        assert!(!both.has(100));
        assert_eq!(both.last().map(ConditionId::get), Some(63));
    }

    #[test]
    fn out_of_domain_ids_fail_deterministically() {
        for id in [64, 65, 100, u32::MAX] {
            assert!(ConditionQuery::from_id(id).is_err());
            let mut query = ConditionQuery::from_id(3).unwrap();
            let before = query;
            assert!(query.insert(id).is_err());
            assert_eq!(query, before);
        }
        assert!(ConditionQuery::from_ids([1, 2, 64]).is_err());
    }

    #[test]
    fn last_tracks_highest_id() {
        let mut query = ConditionQuery::empty();
        assert_eq!(query.last(), None);
        query.insert(7).unwrap();
        query.insert(2).unwrap();
        assert_eq!(query.last().map(ConditionId::get), Some(7));

        let lower = query & ConditionQuery::from_id(2).unwrap();
        assert_eq!(lower.last().map(ConditionId::get), Some(2));

        let disjoint = query & ConditionQuery::from_id(40).unwrap();
        assert!(disjoint.is_empty());
        assert_eq!(disjoint.last(), None);
    }

    #[test]
    fn union_of_queries_is_total() {
        let a = ConditionQuery::from_ids([0, 1]).unwrap();
        let mut b = ConditionQuery::from_id(63).unwrap();
        b |= a;
        assert_eq!(b.count(), 3);
        assert_eq!(b.last().map(ConditionId::get), Some(63));
        assert_eq!((a | b).bits(), b.bits());
    }
}
