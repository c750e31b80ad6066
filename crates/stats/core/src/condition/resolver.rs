use super::ConditionId;

/// Resolves individual conditions for the actor that owns a query.
///
/// Implemented by the actor/combat layer. The `argument` string is opaque to
/// this crate (a target tag, a threshold, ...) and is passed through as-is.
///
/// Any `Fn(ConditionId, &str) -> bool` closure is a resolver.
pub trait ConditionResolver {
    /// Returns true if condition `id` currently holds.
    fn resolve(&self, id: ConditionId, argument: &str) -> bool;
}

impl<F> ConditionResolver for F
where
    F: Fn(ConditionId, &str) -> bool,
{
    fn resolve(&self, id: ConditionId, argument: &str) -> bool {
        self(id, argument)
    }
}

/// How the conditions of a multi-flag query combine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MatchMode {
    /// Every condition must hold.
    #[default]
    All,
    /// At least one condition must hold.
    Any,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::ConditionQuery;

    #[test]
    fn closures_resolve_conditions() {
        let low_hp = |id: ConditionId, _: &str| id.get() == 3;
        let query = ConditionQuery::from_ids([3, 9]).unwrap();

        assert!(!query.evaluate(&low_hp, "", MatchMode::All));
        assert!(query.evaluate(&low_hp, "", MatchMode::Any));
        assert!(ConditionQuery::empty().evaluate(&low_hp, "", MatchMode::Any));
    }

    #[test]
    fn argument_is_forwarded() {
        let tagged = |_: ConditionId, arg: &str| arg == "undead";
        let query = ConditionQuery::from_id(1).unwrap();

        assert!(query.evaluate(&tagged, "undead", MatchMode::All));
        assert!(!query.evaluate(&tagged, "beast", MatchMode::All));
    }
}
