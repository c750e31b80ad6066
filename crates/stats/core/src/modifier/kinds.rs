//! Built-in modifier kinds.
//!
//! - [`FlatModifier`]: adds a fixed vector (equipment, flat buffs)
//! - [`ScaleModifier`]: adds a percentage of the baseline (research upgrades)

use super::Modifier;
use crate::error::StatResult;
use crate::flags::{BitFlagSet, FlagKey};
use crate::vector::SparseValueVector;

/// Adds a fixed value vector to the aggregate.
///
/// Keys the aggregate does not track yet are added to it.
#[derive(Clone, Debug)]
pub struct FlatModifier<K: FlagKey> {
    name: String,
    order: i32,
    values: SparseValueVector<K>,
    dirty: bool,
    revision: u64,
}

impl<K: FlagKey> FlatModifier<K> {
    /// Creates a dirty modifier contributing `values`.
    pub fn new(name: impl Into<String>, order: i32, values: SparseValueVector<K>) -> Self {
        Self {
            name: name.into(),
            order,
            values,
            dirty: true,
            revision: 0,
        }
    }

    /// Creates a modifier from `(key, amount)` pairs.
    pub fn from_pairs(
        name: impl Into<String>,
        order: i32,
        pairs: impl IntoIterator<Item = (K, f32)>,
    ) -> Self {
        Self::new(name, order, SparseValueVector::from_pairs(pairs))
    }

    /// Contributed values.
    pub fn values(&self) -> &SparseValueVector<K> {
        &self.values
    }

    /// Replaces the contributed values.
    pub fn set_values(&mut self, values: SparseValueVector<K>) {
        self.values = values;
        self.touch();
    }

    /// Changes the amount of a key this modifier already contributes.
    ///
    /// # Errors
    ///
    /// Returns [`StatError::KeyNotPresent`](crate::StatError::KeyNotPresent) if
    /// the modifier does not contribute `key`.
    pub fn set(&mut self, key: K, amount: f32) -> StatResult<()> {
        self.values.set(key, amount)?;
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.dirty = true;
        self.revision += 1;
    }
}

impl<K: FlagKey> Modifier<K> for FlatModifier<K> {
    fn order(&self) -> i32 {
        self.order
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn revision(&self) -> u64 {
        self.revision
    }

    fn update_values(&self, _original: &SparseValueVector<K>, aggregate: &mut SparseValueVector<K>) {
        *aggregate = &*aggregate + &self.values;
    }

    fn mark_clean(&mut self) {
        self.dirty = false;
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Adds `percent`% of the baseline value of each of its keys.
///
/// `percent = 20` turns a baseline of 50 into a contribution of +10. The
/// baseline, not the running aggregate, is scaled, so several scale modifiers
/// stack additively.
#[derive(Clone, Debug)]
pub struct ScaleModifier<K: FlagKey> {
    name: String,
    order: i32,
    types: BitFlagSet<K>,
    percent: f32,
    dirty: bool,
    revision: u64,
}

impl<K: FlagKey> ScaleModifier<K> {
    /// Creates a dirty modifier scaling every key of `types`.
    pub fn new(name: impl Into<String>, order: i32, types: BitFlagSet<K>, percent: f32) -> Self {
        Self {
            name: name.into(),
            order,
            types,
            percent,
            dirty: true,
            revision: 0,
        }
    }

    /// Scaled keys.
    pub fn types(&self) -> BitFlagSet<K> {
        self.types
    }

    pub fn percent(&self) -> f32 {
        self.percent
    }

    /// Changes the percentage. Unchanged values keep the modifier clean.
    pub fn set_percent(&mut self, percent: f32) {
        if self.percent != percent {
            self.percent = percent;
            self.dirty = true;
            self.revision += 1;
        }
    }
}

impl<K: FlagKey> Modifier<K> for ScaleModifier<K> {
    fn order(&self) -> i32 {
        self.order
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn revision(&self) -> u64 {
        self.revision
    }

    fn update_values(&self, original: &SparseValueVector<K>, aggregate: &mut SparseValueVector<K>) {
        let mut bonus = SparseValueVector::new(self.types);
        for (slot, (_, key)) in self.types.iter().enumerate() {
            bonus.set_at(slot, original.get(key) * self.percent / 100.0);
        }
        *aggregate = &*aggregate + &bonus;
    }

    fn mark_clean(&mut self) {
        self.dirty = false;
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::StatType;
    use crate::modifier::{ModifierStack, handle};

    fn baseline() -> SparseValueVector<StatType> {
        SparseValueVector::from_pairs([(StatType::Hp, 50.0), (StatType::Attack, 10.0)])
    }

    #[test]
    fn flat_modifier_adds_new_keys() {
        let mut stack = ModifierStack::new(baseline());
        stack
            .add_modifier(handle(FlatModifier::from_pairs(
                "boots",
                0,
                [(StatType::Speed, 3.0)],
            )))
            .unwrap();

        assert_eq!(stack.value(StatType::Speed), 3.0);
        assert_eq!(stack.value(StatType::Hp), 50.0);
    }

    #[test]
    fn changing_flat_amount_marks_dirty() {
        let sword = handle(FlatModifier::from_pairs("sword", 0, [(StatType::Attack, 4.0)]));
        let mut stack = ModifierStack::new(baseline());
        stack.add_modifier(sword.clone()).unwrap();
        assert_eq!(stack.value(StatType::Attack), 14.0);

        sword.borrow_mut().set(StatType::Attack, 6.0).unwrap();
        assert!(stack.is_dirty());
        assert_eq!(stack.value(StatType::Attack), 16.0);
        assert!(sword.borrow_mut().set(StatType::Hp, 1.0).is_err());
    }

    #[test]
    fn scale_uses_baseline_not_running_total() {
        let flat = handle(FlatModifier::from_pairs("flat", 0, [(StatType::Hp, 50.0)]));
        let scale = handle(ScaleModifier::new(
            "vigor",
            10,
            BitFlagSet::from_key(StatType::Hp),
            20.0,
        ));

        let mut stack = ModifierStack::new(baseline());
        stack.add_modifier(flat).unwrap().add_modifier(scale.clone()).unwrap();
        // 50 + 50 + 20% of 50
        assert!((stack.value(StatType::Hp) - 110.0).abs() < 1e-4);

        scale.borrow_mut().set_percent(20.0);
        assert!(!stack.is_dirty());
        scale.borrow_mut().set_percent(-10.0);
        assert!((stack.value(StatType::Hp) - 95.0).abs() < 1e-4);
    }

    #[test]
    fn debug_output_names_the_modifier() {
        let sword = FlatModifier::from_pairs("sword", 0, [(StatType::Attack, 4.0)]);
        let vigor = ScaleModifier::new("vigor", 1, BitFlagSet::from_key(StatType::Hp), 5.0);
        assert!(format!("{sword:?}").contains("sword"));
        assert!(format!("{vigor:?}").contains("Hp"));
    }
}
