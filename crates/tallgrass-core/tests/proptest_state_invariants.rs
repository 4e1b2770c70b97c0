//! Property-based invariant tests for streams and the game state stores.
//!
//! 1. Listeners only ever see values after the first push.
//! 2. Every listener sees every push, in order, exactly once.
//! 3. A mapped stream observes `project(v)` for every pushed `v`.
//! 4. Bag entries stay unique by name and quantities track adds and uses.
//! 5. The party never exceeds six members and the active index stays valid.
//! 6. Leveling leaves exp below the next threshold and hp at max on level-up.

use proptest::prelude::*;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tallgrass_core::{
    Creature, InventoryStore, Item, ItemEffect, PartyStore, Stream, MAX_PARTY_SIZE,
};

// ── Helpers ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum BagOp {
    Add(usize, u32),
    Use(usize),
}

#[derive(Debug, Clone)]
enum PartyOp {
    Add,
    Switch(usize),
    Exp(u32),
}

const NAMES: [&str; 4] = ["Potion", "Pokeball", "Ether", "Antidote"];

fn bag_op_strategy() -> impl Strategy<Value = BagOp> {
    prop_oneof![
        (0..NAMES.len(), 0u32..5).prop_map(|(i, q)| BagOp::Add(i, q)),
        (0..NAMES.len()).prop_map(BagOp::Use),
    ]
}

fn party_op_strategy() -> impl Strategy<Value = PartyOp> {
    prop_oneof![
        Just(PartyOp::Add),
        (0usize..8).prop_map(PartyOp::Switch),
        (0u32..200).prop_map(PartyOp::Exp),
    ]
}

fn item(index: usize) -> Item {
    Item::new(NAMES[index], ItemEffect::Heal, 10)
}

// ── Streams ─────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn listeners_see_every_push_in_order(
        values in proptest::collection::vec(any::<i32>(), 0..40),
        listeners in 1usize..5,
    ) {
        let stream: Stream<i32> = Stream::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        for id in 0..listeners {
            let log = Rc::clone(&log);
            let _sub = stream.subscribe(move |v: &i32| log.borrow_mut().push((id, *v)));
        }
        prop_assert!(log.borrow().is_empty());

        for v in &values {
            stream.push(*v);
        }

        let expected: Vec<(usize, i32)> = values
            .iter()
            .flat_map(|v| (0..listeners).map(move |id| (id, *v)))
            .collect();
        prop_assert_eq!(&*log.borrow(), &expected);
    }

    #[test]
    fn late_subscriber_gets_latest(values in proptest::collection::vec(any::<i32>(), 1..20)) {
        let stream: Stream<i32> = Stream::new();
        for v in &values {
            stream.push(*v);
        }

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _sub = stream.subscribe(move |v: &i32| sink.borrow_mut().push(*v));
        prop_assert_eq!(&*seen.borrow(), &vec![*values.last().unwrap()]);
    }

    #[test]
    fn map_observes_projection(values in proptest::collection::vec(-1000i32..1000, 0..40)) {
        let source: Stream<i32> = Stream::new();
        let projected = source.map(|v| i64::from(*v) * 3 - 1);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _sub = projected.subscribe(move |v: &i64| sink.borrow_mut().push(*v));

        for v in &values {
            source.push(*v);
        }

        let expected: Vec<i64> = values.iter().map(|v| i64::from(*v) * 3 - 1).collect();
        prop_assert_eq!(&*seen.borrow(), &expected);
    }
}

// ── Stores ──────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn bag_tracks_quantities(ops in proptest::collection::vec(bag_op_strategy(), 0..60)) {
        let mut store = InventoryStore::new();
        let mut model: HashMap<&str, u32> = HashMap::new();

        for op in ops {
            match op {
                BagOp::Add(i, q) => {
                    store.add_item(item(i), q);
                    *model.entry(NAMES[i]).or_insert(0) += q;
                }
                BagOp::Use(i) => {
                    let held = model.get(NAMES[i]).copied().unwrap_or(0);
                    prop_assert_eq!(store.use_item(NAMES[i]), held > 0);
                    if held > 0 {
                        model.insert(NAMES[i], held - 1);
                    }
                }
            }
        }

        let state = store.state();
        prop_assert_eq!(state.len(), model.len());
        for (name, quantity) in &model {
            prop_assert_eq!(state.quantity(name), *quantity);
        }
    }

    #[test]
    fn party_invariants_hold(ops in proptest::collection::vec(party_op_strategy(), 0..60)) {
        let mut store = PartyStore::new();
        let mut added = 0;

        for op in ops {
            match op {
                PartyOp::Add => {
                    let creature = Creature::new(format!("c{added}"), "Sprout", 20, 5);
                    added += 1;
                    store.add_creature(creature);
                }
                PartyOp::Switch(index) => {
                    let before = store.state().active_index();
                    let switched = store.switch_active(index);
                    prop_assert_eq!(switched, index < store.state().len());
                    if !switched {
                        prop_assert_eq!(store.state().active_index(), before);
                    }
                }
                PartyOp::Exp(amount) => {
                    let before = store.state().active().cloned();
                    let applied = store.gain_exp(amount);
                    prop_assert_eq!(applied, before.is_some());
                    if let (Some(before), Some(after)) = (before, store.state().active()) {
                        prop_assert!(after.exp < after.exp_to_next_level());
                        prop_assert!(after.level >= before.level);
                        if after.level > before.level {
                            prop_assert_eq!(after.hp, after.max_hp);
                            let gained = after.level - before.level;
                            prop_assert_eq!(after.max_hp, before.max_hp + 5 * gained);
                            prop_assert_eq!(after.attack, before.attack + gained);
                        }
                    }
                }
            }

            let state = store.state();
            prop_assert!(state.len() <= MAX_PARTY_SIZE);
            if !state.is_empty() {
                prop_assert!(state.active_index() < state.len());
            }
        }
    }
}
