//! Modifiers that only apply while a condition query holds.

use super::Modifier;
use crate::condition::{ConditionQuery, ConditionResolver, MatchMode};
use crate::flags::FlagKey;
use crate::vector::SparseValueVector;

/// Wraps a modifier behind a [`ConditionQuery`] activation gate.
///
/// The gate is not evaluated during aggregation: the actor layer calls
/// [`refresh`](Self::refresh) when the conditions may have changed (start of a
/// combat tick, after a status change). Flipping the gate marks the modifier
/// dirty so the owning stack picks up the change on its next read.
#[derive(Clone, Debug)]
pub struct GatedModifier<M> {
    inner: M,
    query: ConditionQuery,
    mode: MatchMode,
    open: bool,
    gate_changed: bool,
    gate_flips: u64,
}

impl<M> GatedModifier<M> {
    /// Creates a gate in front of `inner`.
    ///
    /// The gate starts closed until the first [`refresh`](Self::refresh),
    /// except for the empty query, which always holds.
    pub fn new(inner: M, query: ConditionQuery, mode: MatchMode) -> Self {
        Self {
            inner,
            query,
            mode,
            open: query.is_empty(),
            gate_changed: false,
            gate_flips: 0,
        }
    }

    /// Re-evaluates the gate. Returns true if it is open afterwards.
    pub fn refresh<R>(&mut self, resolver: &R, argument: &str) -> bool
    where
        R: ConditionResolver + ?Sized,
    {
        let open = self.query.evaluate(resolver, argument, self.mode);
        if open != self.open {
            self.open = open;
            self.gate_changed = true;
            self.gate_flips += 1;
        }
        self.open
    }

    /// Whether the wrapped modifier currently contributes.
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn query(&self) -> ConditionQuery {
        self.query
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }

    /// Mutable access to the wrapped modifier. Its own dirty tracking still
    /// applies.
    pub fn inner_mut(&mut self) -> &mut M {
        &mut self.inner
    }
}

impl<K: FlagKey, M: Modifier<K>> Modifier<K> for GatedModifier<M> {
    fn order(&self) -> i32 {
        self.inner.order()
    }

    fn is_dirty(&self) -> bool {
        self.gate_changed || (self.open && self.inner.is_dirty())
    }

    fn revision(&self) -> u64 {
        self.inner.revision().wrapping_add(self.gate_flips)
    }

    fn update_values(&self, original: &SparseValueVector<K>, aggregate: &mut SparseValueVector<K>) {
        if self.open {
            self.inner.update_values(original, aggregate);
        }
    }

    fn mark_clean(&mut self) {
        self.gate_changed = false;
        self.inner.mark_clean();
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
