//! End-to-end aggregation scenarios for an actor's stat sheet.
//!
//! These tests drive the public API the way the actor layer does: a baseline
//! from static data, modifiers pushed and popped by gameplay events, and
//! activation gates resolved against the actor's current state.

use std::cell::Cell;

use stat_core::modifier::handle;
use stat_core::{
    AccessorCache, BitFlagSet, ConditionId, ConditionQuery, FlatModifier, GatedModifier,
    MatchMode, ModifierHandle, ModifierStack, ScaleModifier, SparseValueVector, StatConfig,
    StatError, StatType,
};

const EPS: f32 = StatConfig::DEFAULT_FLOAT_TOLERANCE;

fn warrior() -> SparseValueVector<StatType> {
    SparseValueVector::from_pairs([
        (StatType::Hp, 10.0),
        (StatType::Attack, 1.0),
        (StatType::Armor, 5.0),
    ])
}

#[test]
fn potion_push_and_pop() {
    let mut stack = ModifierStack::new(warrior());
    let potion = handle(FlatModifier::from_pairs("potion", 0, [(StatType::Hp, 10.0)]));
    let potion_handle: ModifierHandle<StatType> = potion.clone();

    stack.add_modifier(potion_handle.clone()).unwrap();
    assert_eq!(stack.value(StatType::Hp), 20.0);

    stack.remove_modifier(&potion_handle).unwrap();
    assert_eq!(stack.value(StatType::Hp), 10.0);

    // The modifier outlives its registration.
    assert_eq!(potion.borrow().values().get(StatType::Hp), 10.0);
}

#[test]
fn equipment_research_and_status_layers() {
    let sword = handle(FlatModifier::from_pairs(
        "iron sword",
        0,
        [(StatType::Attack, 4.0), (StatType::CritChance, 0.05)],
    ));
    let research = handle(ScaleModifier::new(
        "toughness research",
        10,
        BitFlagSet::from_key(StatType::Hp) | StatType::Armor,
        50.0,
    ));
    let weakened = handle(FlatModifier::from_pairs("weakened", 20, [(StatType::Attack, -2.0)]));

    let mut stack = ModifierStack::new(warrior());
    stack
        .add_modifier(weakened.clone())
        .unwrap()
        .add_modifier(research)
        .unwrap()
        .add_modifier(sword)
        .unwrap();

    assert_eq!(stack.orders().collect::<Vec<_>>(), vec![0, 10, 20]);

    let sheet = stack.aggregate().clone();
    assert!((sheet.get(StatType::Hp) - 15.0).abs() < EPS);
    assert!((sheet.get(StatType::Armor) - 7.5).abs() < EPS);
    assert!((sheet.get(StatType::Attack) - 3.0).abs() < EPS);
    assert!((sheet.get(StatType::CritChance) - 0.05).abs() < EPS);
    assert_eq!(sheet.get(StatType::Speed), 0.0);

    // Status expires.
    let weakened: ModifierHandle<StatType> = weakened;
    stack.remove_modifier(&weakened).unwrap();
    assert!((stack.value(StatType::Attack) - 5.0).abs() < EPS);
}

#[test]
fn passive_gated_by_conditions() {
    const TARGET_STUNNED: u32 = 45;
    const FULL_ENERGY: u32 = 63;

    let stunned = Cell::new(false);
    let energy_full = Cell::new(true);
    let resolver = |id: ConditionId, _: &str| match u32::from(id) {
        TARGET_STUNNED => stunned.get(),
        FULL_ENERGY => energy_full.get(),
        _ => false,
    };

    let query = ConditionQuery::from_ids([TARGET_STUNNED, FULL_ENERGY]).unwrap();
    let executioner = handle(GatedModifier::new(
        FlatModifier::from_pairs("executioner", 5, [(StatType::CritDamage, 1.5)]),
        query,
        MatchMode::All,
    ));

    let mut stack = ModifierStack::new(warrior());
    stack.add_modifier(executioner.clone()).unwrap();

    executioner.borrow_mut().refresh(&resolver, "");
    assert_eq!(stack.value(StatType::CritDamage), 0.0);

    stunned.set(true);
    executioner.borrow_mut().refresh(&resolver, "");
    assert_eq!(stack.value(StatType::CritDamage), 1.5);
}

#[test]
fn cached_accessors_read_the_aggregate() {
    let mut stack = ModifierStack::new(warrior());
    stack
        .add_modifier(handle(FlatModifier::from_pairs("ring", 0, [(StatType::Armor, 1.0)])))
        .unwrap();

    let aggregate = stack.aggregate();
    let mut cache = AccessorCache::for_vector(aggregate);
    for _ in 0..3 {
        assert_eq!(cache.get(aggregate, StatType::Armor), 6.0);
    }
    assert_eq!(cache.len(), 1);
}

#[test]
fn vector_algebra_properties() {
    let x = warrior();
    let y = SparseValueVector::from_pairs([(StatType::Hp, 2.5), (StatType::Speed, 7.0)]);

    let sum = &x + &y;
    assert_eq!(sum.types(), x.types() | y.types());
    for key in sum.types().keys() {
        assert!((sum[key] - (x.get(key) + y.get(key))).abs() < EPS);
    }

    let restored = &sum - &y;
    assert!(restored.approx_eq(&x.widened(y.types()), EPS));

    let once = &x | StatType::Energy;
    assert_eq!(&once | StatType::Energy, once);
}

#[test]
fn domain_violations_fail_loudly() {
    let mut vector = warrior();
    assert!(matches!(
        vector.set(StatType::Evasion, 1.0),
        Err(StatError::KeyNotPresent { .. })
    ));

    let mut query = ConditionQuery::from_id(45).unwrap();
    assert_eq!(
        query.insert(64),
        Err(StatError::ConditionOutOfRange { id: 64 })
    );
    assert_eq!(query.count(), 1);
}
