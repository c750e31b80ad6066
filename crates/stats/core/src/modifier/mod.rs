//! Modifiers and the stack that aggregates them.
//!
//! A [`Modifier`] contributes to an aggregate [`SparseValueVector`] computed
//! from a baseline. Modifiers are owned by whoever created them (an equipped
//! item, an abnormal status, a research upgrade) and are registered on a
//! [`ModifierStack`] through a shared [`ModifierHandle`]:
//!
//! ```text
//! original ──clone──▶ aggregate ──m(order -5)──▶ ──m(order 0)──▶ ──m(order 10)──▶ result
//! ```
//!
//! The stack recomputes lazily, only when it changed structurally or a
//! registered modifier reports itself dirty.
//!
//! [`SparseValueVector`]: crate::vector::SparseValueVector

mod gated;
mod kinds;
mod stack;

use std::cell::RefCell;
use std::rc::Rc;

use crate::flags::FlagKey;
use crate::vector::SparseValueVector;

pub use gated::GatedModifier;
pub use kinds::{FlatModifier, ScaleModifier};
pub use stack::ModifierStack;

/// A pluggable, ordered contributor to an aggregate value vector.
///
/// # Implementation Rules
/// 1. `update_values` must be a pure function of `original`, the running
///    `aggregate` and the modifier's own state
/// 2. Reading a key the aggregate does not track yields `0.0`
/// 3. Any state change that alters the contribution must raise `is_dirty`
///    and advance `revision`
/// 4. Only stacks clear the dirty flag, through `mark_clean`
///
/// A handle may be registered on several stacks (cloned stacks share every
/// handle). The dirty flag is cleared by whichever stack recomputes first, so
/// each stack also remembers the `revision` it last aggregated.
pub trait Modifier<K: FlagKey> {
    /// Evaluation order. Lower values run first; ties keep registration order.
    fn order(&self) -> i32 {
        0
    }

    /// Whether the contribution changed since the last aggregation.
    fn is_dirty(&self) -> bool;

    /// Change counter. Advances every time the modifier becomes dirty and
    /// never goes back.
    fn revision(&self) -> u64;

    /// Applies this modifier on top of the running aggregate.
    fn update_values(&self, original: &SparseValueVector<K>, aggregate: &mut SparseValueVector<K>);

    /// Clears the dirty flag after the stack consumed the contribution.
    fn mark_clean(&mut self);

    /// Name used in logs and errors.
    fn name(&self) -> &str {
        "modifier"
    }
}

impl<K: FlagKey, M: Modifier<K> + ?Sized> Modifier<K> for Box<M> {
    fn order(&self) -> i32 {
        (**self).order()
    }

    fn is_dirty(&self) -> bool {
        (**self).is_dirty()
    }

    fn revision(&self) -> u64 {
        (**self).revision()
    }

    fn update_values(&self, original: &SparseValueVector<K>, aggregate: &mut SparseValueVector<K>) {
        (**self).update_values(original, aggregate);
    }

    fn mark_clean(&mut self) {
        (**self).mark_clean();
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Shared handle through which a stack refers to a modifier it does not own.
pub type ModifierHandle<K> = Rc<RefCell<dyn Modifier<K>>>;

/// Wraps a modifier in a fresh handle.
///
/// Keep the concrete `Rc<RefCell<M>>` to mutate the modifier later; it coerces
/// to [`ModifierHandle`] when registered.
pub fn handle<M>(modifier: M) -> Rc<RefCell<M>> {
    Rc::new(RefCell::new(modifier))
}

/// Identity of a handle: the address of its allocation.
pub(crate) fn handle_id<K: FlagKey>(handle: &ModifierHandle<K>) -> *const () {
    Rc::as_ptr(handle).cast::<()>()
}
