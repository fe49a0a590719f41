//! Cart store persistence over random operation sequences.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;

use movenpick_core::Money;
use movenpick_storefront::cart::{CartStore, Removal};
use movenpick_storefront::storage::{MemoryStorage, Storage, keys};
use proptest::prelude::*;
use proptest::test_runner::Config;

const NAMES: [&str; 4] = ["Burger", "Fries", "Brochette", "Fanta"];

#[derive(Debug, Clone)]
enum Op {
    Add { name: usize, price: u64 },
    Increment(usize),
    Decrement(usize),
    Remove { index: usize, confirm: bool },
    Clear,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..NAMES.len(), 0u64..20_000).prop_map(|(name, price)| Op::Add { name, price }),
        2 => (0usize..5).prop_map(Op::Increment),
        2 => (0usize..5).prop_map(Op::Decrement),
        2 => (0usize..5, any::<bool>()).prop_map(|(index, confirm)| Op::Remove { index, confirm }),
        1 => Just(Op::Clear),
    ]
}

fn apply(store: &mut CartStore, op: &Op) {
    match *op {
        Op::Add { name, price } => {
            store.add_item(NAMES[name], Money::new(price)).unwrap();
        }
        // Out-of-range positions are rejected without touching the cart.
        Op::Increment(index) => {
            let _ = store.increment_at(index);
        }
        Op::Decrement(index) => {
            let _ = store.decrement_at(index);
        }
        Op::Remove { index, confirm } => {
            let before = store.cart().len();
            if let Ok(removal) = store.remove_at(index, &mut |_: &str| confirm) {
                let expected = if confirm { before - 1 } else { before };
                assert_eq!(store.cart().len(), expected);
                assert_eq!(matches!(removal, Removal::Cancelled), !confirm);
            }
        }
        Op::Clear => store.clear(),
    }
}

proptest! {
    #![proptest_config(Config::with_cases(128))]

    #[test]
    fn reload_restores_every_cart(
        ops in prop::collection::vec(op(), 0..40),
        fee in 0u64..5_000,
    ) {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = CartStore::load(storage.clone(), Money::new(fee));
        let updates = store.subscribe();

        for op in &ops {
            apply(&mut store, op);

            let reloaded = CartStore::load(storage.clone(), Money::new(fee));
            prop_assert_eq!(reloaded.cart(), store.cart());
            prop_assert_eq!(reloaded.compute_totals(), store.compute_totals());

            let totals = store.compute_totals();
            prop_assert_eq!(totals.total, totals.subtotal + Money::new(fee));

            let latest = updates.borrow().clone();
            prop_assert_eq!(latest.items.as_slice(), store.cart().items());
            prop_assert_eq!(latest.totals, totals);
        }

        if store.cart().is_empty() {
            prop_assert!(
                storage.get(keys::CART).unwrap().is_none_or(|raw| raw == "[]"),
                "an empty cart leaves no items behind"
            );
        }
    }
}
