//! Concrete key spaces used by the actor layer.
//!
//! Each enum is `#[repr(u8)]` with discriminants equal to the bit index the key
//! occupies in a mask. Adding a variant therefore never reorders existing data.

use strum::{EnumCount, EnumIter, FromRepr, IntoStaticStr};

/// Implements [`FlagKey`](crate::flags::FlagKey) for a `#[repr(u8)]` enum deriving `FromRepr`.
#[macro_export]
macro_rules! impl_flag_key {
    ($ty:ty) => {
        impl $crate::flags::FlagKey for $ty {
            #[inline]
            fn bit(self) -> u8 {
                self as u8
            }

            #[inline]
            fn from_bit(bit: u8) -> Option<Self> {
                <$ty>::from_repr(bit)
            }
        }
    };
}

/// Combat and display stats of an actor.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumCount, FromRepr, IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum StatType {
    // ========================================================================
    // Vitals
    // ========================================================================
    Hp = 0,
    Shield = 1,
    Energy = 2,

    // ========================================================================
    // Offense
    // ========================================================================
    Attack = 8,
    CritChance = 9,
    CritDamage = 10,
    Accuracy = 11,

    // ========================================================================
    // Defense
    // ========================================================================
    Armor = 16,
    Evasion = 17,
    Resistance = 18,

    // ========================================================================
    // Tempo
    // ========================================================================
    Speed = 24,
    Initiative = 25,
    CardDraw = 26,
}

impl_flag_key!(StatType);

/// Currencies tracked by an actor or player wallet.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumCount, FromRepr, IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Currency {
    Gold = 0,
    Gem = 1,
    ResearchPoint = 2,
    Essence = 3,
    Ticket = 4,
}

impl_flag_key!(Currency);

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;
    use crate::flags::FlagKey;

    #[test]
    fn every_key_round_trips_through_its_bit() {
        for stat in StatType::iter() {
            assert!(stat.bit() < 64);
            assert_eq!(StatType::from_bit(stat.bit()), Some(stat));
        }
        for currency in Currency::iter() {
            assert_eq!(Currency::from_bit(currency.bit()), Some(currency));
        }
        assert_eq!(StatType::from_bit(3), None);
    }

    #[test]
    fn keys_expose_static_names() {
        let name: &'static str = StatType::CritChance.into();
        assert_eq!(name, "CritChance");
    }
}
