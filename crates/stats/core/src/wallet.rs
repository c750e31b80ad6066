//! Currency balances backed by a sparse vector.

use crate::config::StatConfig;
use crate::error::{StatError, StatResult};
use crate::flags::{BitFlagSet, FlagKey};
use crate::vector::SparseValueVector;

/// Balances of the currencies an owner holds.
///
/// Costs and rewards are sparse vectors over the same key space. Spending is
/// all-or-nothing: a cost that cannot be covered leaves the wallet untouched.
///
/// Affordability is checked with an absolute tolerance so that balances built
/// from many fractional deposits still cover a cost they equal on paper.
/// Balances never go below zero through [`spend`](Self::spend).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(
        serialize = "K: FlagKey + serde::Serialize",
        deserialize = "K: FlagKey + serde::Deserialize<'de>"
    ))
)]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Wallet<K: FlagKey> {
    balances: SparseValueVector<K>,
    #[cfg_attr(feature = "serde", serde(skip, default = "default_tolerance"))]
    tolerance: f32,
}

#[cfg(feature = "serde")]
fn default_tolerance() -> f32 {
    StatConfig::DEFAULT_FLOAT_TOLERANCE
}

impl<K: FlagKey> Wallet<K> {
    /// Creates an empty wallet tracking `currencies`.
    pub fn new(currencies: BitFlagSet<K>) -> Self {
        Self::from_balances(SparseValueVector::new(currencies))
    }

    /// Wraps existing balances.
    pub fn from_balances(balances: SparseValueVector<K>) -> Self {
        Self {
            balances,
            tolerance: StatConfig::DEFAULT_FLOAT_TOLERANCE,
        }
    }

    /// Uses `tolerance` for affordability checks.
    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Uses the configured float tolerance.
    pub fn with_config(self, config: &StatConfig) -> Self {
        self.with_tolerance(config.float_tolerance)
    }

    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    /// Balance of `currency`, `0.0` if it was never held.
    pub fn balance(&self, currency: K) -> f32 {
        self.balances.get(currency)
    }

    pub fn balances(&self) -> &SparseValueVector<K> {
        &self.balances
    }

    /// Adds `amounts`, starting to track currencies seen for the first time.
    pub fn deposit(&mut self, amounts: &SparseValueVector<K>) {
        self.balances = &self.balances + amounts;
    }

    /// Returns true if every currency of `cost` is covered.
    pub fn can_afford(&self, cost: &SparseValueVector<K>) -> bool {
        self.shortfall(cost).is_none()
    }

    /// Pays `cost`.
    ///
    /// # Errors
    ///
    /// Returns [`StatError::InsufficientFunds`] for the first currency (in bit
    /// order) the wallet cannot cover. Nothing is deducted in that case.
    pub fn spend(&mut self, cost: &SparseValueVector<K>) -> StatResult<()> {
        if let Some(err) = self.shortfall(cost) {
            return Err(err);
        }
        let mut balances = &self.balances - cost;
        // Covered within tolerance: settle at zero.
        for (currency, _) in cost.iter() {
            if let Some(slot) = balances.index_of(currency) {
                if balances.value_at(slot) < 0.0 {
                    balances.set_at(slot, 0.0);
                }
            }
        }
        self.balances = balances;
        Ok(())
    }

    pub fn into_inner(self) -> SparseValueVector<K> {
        self.balances
    }

    fn shortfall(&self, cost: &SparseValueVector<K>) -> Option<StatError> {
        cost.iter().find_map(|(currency, required)| {
            let available = self.balance(currency);
            (available + self.tolerance < required).then(|| StatError::InsufficientFunds {
                bit: currency.bit(),
                required,
                available,
            })
        })
    }
}
