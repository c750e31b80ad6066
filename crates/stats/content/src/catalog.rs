//! Static content definitions: actor baselines and modifier templates.
//!
//! Definitions are plain data. Building a definition produces fresh runtime
//! objects, so every actor gets its own stack and its own modifier instances.

use stat_core::modifier::handle;
use stat_core::{
    BitFlagSet, ConditionQuery, Currency, FlatModifier, GatedModifier, MatchMode, Modifier,
    ModifierStack, ScaleModifier, SparseValueVector, StatResult, StatType, Wallet,
};
use std::cell::RefCell;
use std::rc::Rc;

/// Modifier built from content. Ungated templates carry an empty, always-open
/// gate; gated ones must be refreshed against the owner's conditions.
pub type ContentModifier = GatedModifier<Box<dyn Modifier<StatType>>>;

/// Shared handle to a [`ContentModifier`].
pub type ContentModifierHandle = Rc<RefCell<ContentModifier>>;

/// Baseline stats and starting wallet of an actor template.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaselineSpec {
    pub name: String,
    pub stats: SparseValueVector<StatType>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub wallet: SparseValueVector<Currency>,
}

impl BaselineSpec {
    /// Fresh modifier stack seeded with this baseline.
    pub fn stack(&self) -> ModifierStack<StatType> {
        ModifierStack::new(self.stats.clone())
    }

    /// Fresh wallet holding the starting balances.
    pub fn wallet(&self) -> Wallet<Currency> {
        Wallet::from_balances(self.wallet.clone())
    }
}

/// How a modifier template contributes.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModifierKindSpec {
    /// Adds fixed amounts.
    Flat(SparseValueVector<StatType>),
    /// Adds `percent`% of the baseline of each listed stat.
    Scale { stats: Vec<StatType>, percent: f32 },
}

/// Named modifier template.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModifierSpec {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub order: i32,
    pub kind: ModifierKindSpec,
    /// Condition ids gating the modifier. Empty means always active.
    #[cfg_attr(feature = "serde", serde(default))]
    pub conditions: Vec<u32>,
    /// Overrides the configured match mode for this modifier.
    #[cfg_attr(feature = "serde", serde(default))]
    pub match_mode: Option<MatchMode>,
}

impl ModifierSpec {
    /// Validated condition query of this template.
    ///
    /// # Errors
    ///
    /// Fails if any condition id is outside `0..64`.
    pub fn query(&self) -> StatResult<ConditionQuery> {
        ConditionQuery::from_ids(self.conditions.iter().copied())
    }

    /// Builds a fresh modifier instance.
    ///
    /// `default_mode` applies when the template does not set its own.
    pub fn build(&self, default_mode: MatchMode) -> StatResult<ContentModifierHandle> {
        let inner: Box<dyn Modifier<StatType>> = match &self.kind {
            ModifierKindSpec::Flat(values) => Box::new(FlatModifier::new(
                self.name.clone(),
                self.order,
                values.clone(),
            )),
            ModifierKindSpec::Scale { stats, percent } => Box::new(ScaleModifier::new(
                self.name.clone(),
                self.order,
                stats.iter().copied().collect::<BitFlagSet<StatType>>(),
                *percent,
            )),
        };

        let mode = self.match_mode.unwrap_or(default_mode);
        Ok(handle(GatedModifier::new(inner, self.query()?, mode)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stat_core::{ConditionId, ModifierHandle, StatError};

    fn flat(name: &str, conditions: Vec<u32>) -> ModifierSpec {
        ModifierSpec {
            name: name.into(),
            order: 0,
            kind: ModifierKindSpec::Flat(SparseValueVector::from_pairs([(StatType::Attack, 3.0)])),
            conditions,
            match_mode: None,
        }
    }

    #[test]
    fn built_modifiers_are_independent_instances() {
        let spec = flat("sword", vec![]);
        let a = spec.build(MatchMode::All).unwrap();
        let b = spec.build(MatchMode::All).unwrap();
        assert!(!Rc::ptr_eq(&a, &b));

        let baseline = BaselineSpec {
            name: "warrior".into(),
            stats: SparseValueVector::from_pairs([(StatType::Attack, 1.0)]),
            wallet: SparseValueVector::default(),
        };
        let mut stack = baseline.stack();
        let a: ModifierHandle<StatType> = a;
        stack.add_modifier(a).unwrap();
        assert_eq!(stack.value(StatType::Attack), 4.0);
    }

    #[test]
    fn gated_template_waits_for_refresh() {
        let spec = flat("ambush", vec![7]);
        let modifier = spec.build(MatchMode::All).unwrap();
        assert!(!modifier.borrow().is_open());

        let resolver = |id: ConditionId, _: &str| id.get() == 7;
        assert!(modifier.borrow_mut().refresh(&resolver, ""));
    }

    #[test]
    fn invalid_condition_ids_are_rejected() {
        let spec = flat("broken", vec![3, 70]);
        assert!(matches!(
            spec.build(MatchMode::All),
            Err(StatError::ConditionOutOfRange { id: 70 })
        ));
    }
}
