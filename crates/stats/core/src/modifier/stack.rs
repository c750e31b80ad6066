//! Ordered, dirty-tracked aggregation of modifiers.

use std::rc::Rc;

use tracing::{debug, trace};

use super::{ModifierHandle, handle_id};
use crate::error::{StatError, StatResult};
use crate::flags::FlagKey;
use crate::vector::SparseValueVector;

/// A registered modifier together with the order it was sorted by and the
/// revision this stack last aggregated.
struct Registration<K: FlagKey> {
    order: i32,
    seen: u64,
    handle: ModifierHandle<K>,
}

impl<K: FlagKey> Registration<K> {
    fn is_stale(&self) -> bool {
        let modifier = self.handle.borrow();
        modifier.is_dirty() || modifier.revision() != self.seen
    }
}

/// Aggregates a baseline vector through an ordered list of modifiers.
///
/// One stack belongs to one stat-bearing entity. The stack holds handles, not
/// modifiers: dropping it drops the registrations and leaves the modifiers to
/// their owners.
///
/// # State machine
///
/// ```text
/// Clean ──add/remove/changed modifier/rebase──▶ Dirty ──update()──▶ Clean
/// ```
///
/// A modifier counts as changed for this stack when it is dirty or its
/// revision moved since this stack last aggregated it. Stacks sharing a handle
/// therefore each pick up its changes, whichever recomputes first.
///
/// Reads (`value`, `aggregate`) run `update()` first, so callers never see a
/// stale aggregate.
///
/// # Single pass
///
/// A recomputation applies each registered modifier exactly once, in ascending
/// `order` (registration order breaks ties), and then clears every dirty flag.
/// Modifiers only get shared access while a pass runs, so they cannot mark
/// each other dirty mid-pass; owners that change a modifier between reads
/// trigger the next pass.
///
/// # Panics
///
/// Reads borrow every registered modifier. Holding a `borrow_mut` of a
/// registered modifier across a read of its stack panics.
pub struct ModifierStack<K: FlagKey> {
    original: SparseValueVector<K>,
    aggregate: SparseValueVector<K>,
    registrations: Vec<Registration<K>>,
    /// Set when the registration list or the baseline changed.
    structurally_dirty: bool,
}

impl<K: FlagKey> ModifierStack<K> {
    /// Creates a clean stack whose aggregate equals `original`.
    pub fn new(original: SparseValueVector<K>) -> Self {
        Self {
            aggregate: original.clone(),
            original,
            registrations: Vec::new(),
            structurally_dirty: false,
        }
    }

    /// Registers `modifier`, keeping registrations sorted by order.
    ///
    /// The modifier is placed after every registration with an order lower
    /// than or equal to its own. The order is sampled once, here.
    ///
    /// Returns `self` so registrations can be chained with `?`:
    ///
    /// ```
    /// # use stat_core::modifier::{FlatModifier, ModifierStack, handle};
    /// # use stat_core::{SparseValueVector, StatType};
    /// # fn main() -> Result<(), stat_core::StatError> {
    /// let base = SparseValueVector::from_pairs([(StatType::Hp, 10.0)]);
    /// let ring = handle(FlatModifier::from_pairs("ring", 0, [(StatType::Hp, 5.0)]));
    /// let helm = handle(FlatModifier::from_pairs("helm", 1, [(StatType::Hp, 2.0)]));
    ///
    /// let mut stack = ModifierStack::new(base);
    /// stack.add_modifier(ring)?.add_modifier(helm)?;
    /// assert_eq!(stack.value(StatType::Hp), 17.0);
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`StatError::ModifierAlreadyRegistered`] if this exact handle is
    /// already on the stack.
    pub fn add_modifier(&mut self, modifier: ModifierHandle<K>) -> StatResult<&mut Self> {
        if self.position(&modifier).is_some() {
            return Err(StatError::ModifierAlreadyRegistered {
                name: modifier.borrow().name().to_owned(),
            });
        }

        let (order, seen) = {
            let modifier = modifier.borrow();
            (modifier.order(), modifier.revision())
        };
        let index = self.registrations.partition_point(|r| r.order <= order);
        trace!(
            target: "stat_core::stack",
            modifier = modifier.borrow().name(),
            order,
            index,
            "registering modifier"
        );
        self.registrations.insert(
            index,
            Registration {
                order,
                seen,
                handle: modifier,
            },
        );
        self.structurally_dirty = true;
        Ok(self)
    }

    /// Unregisters `modifier`.
    ///
    /// The next read recomputes even if no remaining modifier is dirty, since
    /// the removed contribution must disappear from the aggregate.
    ///
    /// # Errors
    ///
    /// Returns [`StatError::ModifierNotRegistered`] if the handle is not on the
    /// stack.
    pub fn remove_modifier(&mut self, modifier: &ModifierHandle<K>) -> StatResult<&mut Self> {
        let index = self
            .position(modifier)
            .ok_or_else(|| StatError::ModifierNotRegistered {
                name: modifier.borrow().name().to_owned(),
            })?;

        let removed = self.registrations.remove(index);
        trace!(
            target: "stat_core::stack",
            modifier = removed.handle.borrow().name(),
            order = removed.order,
            "unregistering modifier"
        );
        self.structurally_dirty = true;
        Ok(self)
    }

    /// Drops every registration.
    pub fn clear_modifiers(&mut self) {
        if !self.registrations.is_empty() {
            self.registrations.clear();
            self.structurally_dirty = true;
        }
    }

    /// Returns true if this exact handle is registered.
    pub fn contains(&self, modifier: &ModifierHandle<K>) -> bool {
        self.position(modifier).is_some()
    }

    /// Replaces the baseline. The aggregate is rebuilt on the next read.
    pub fn set_original(&mut self, original: SparseValueVector<K>) {
        self.original = original;
        self.structurally_dirty = true;
    }

    /// Baseline the aggregate is computed from.
    pub fn original(&self) -> &SparseValueVector<K> {
        &self.original
    }

    /// Returns true if the next read will recompute.
    pub fn is_dirty(&self) -> bool {
        self.structurally_dirty || self.registrations.iter().any(Registration::is_stale)
    }

    /// Recomputes the aggregate if the stack is dirty.
    ///
    /// Returns true if a recomputation happened. Calling it on a clean stack
    /// only costs the dirty check.
    pub fn update(&mut self) -> bool {
        if !self.is_dirty() {
            return false;
        }

        let mut aggregate = self.original.clone();
        for registration in &self.registrations {
            registration
                .handle
                .borrow()
                .update_values(&self.original, &mut aggregate);
        }
        for registration in &mut self.registrations {
            let mut modifier = registration.handle.borrow_mut();
            modifier.mark_clean();
            registration.seen = modifier.revision();
        }

        self.aggregate = aggregate;
        self.structurally_dirty = false;
        debug!(
            target: "stat_core::stack",
            modifiers = self.registrations.len(),
            keys = self.aggregate.len(),
            "recomputed aggregate"
        );
        true
    }

    /// Aggregated value of `key`, or `0.0` if the aggregate does not track it.
    pub fn value(&mut self, key: K) -> f32 {
        self.update();
        self.aggregate.get(key)
    }

    /// Up-to-date aggregate.
    pub fn aggregate(&mut self) -> &SparseValueVector<K> {
        self.update();
        &self.aggregate
    }

    /// Aggregate as of the last recomputation, without updating.
    pub fn cached(&self) -> &SparseValueVector<K> {
        &self.aggregate
    }

    /// Number of registered modifiers.
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Orders of the registered modifiers, in evaluation order.
    pub fn orders(&self) -> impl Iterator<Item = i32> + '_ {
        self.registrations.iter().map(|r| r.order)
    }

    fn position(&self, modifier: &ModifierHandle<K>) -> Option<usize> {
        let id = handle_id(modifier);
        self.registrations
            .iter()
            .position(|r| handle_id(&r.handle) == id)
    }
}

impl<K: FlagKey> Clone for ModifierStack<K> {
    /// Clones share the registered handles, not the modifiers.
    fn clone(&self) -> Self {
        Self {
            original: self.original.clone(),
            aggregate: self.aggregate.clone(),
            registrations: self
                .registrations
                .iter()
                .map(|r| Registration {
                    order: r.order,
                    seen: r.seen,
                    handle: Rc::clone(&r.handle),
                })
                .collect(),
            structurally_dirty: self.structurally_dirty,
        }
    }
}

impl<K: FlagKey> core::fmt::Debug for ModifierStack<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ModifierStack")
            .field("original", &self.original)
            .field("aggregate", &self.aggregate)
            .field("modifiers", &self.registrations.len())
            .field("structurally_dirty", &self.structurally_dirty)
            .finish()
    }
}
