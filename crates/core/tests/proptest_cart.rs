//! Cart invariants over random operation sequences.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use movenpick_core::{Adjustment, Cart, CartError, Money};
use proptest::prelude::*;
use proptest::test_runner::Config;

const NAMES: [&str; 5] = ["Burger", "Fries", "Brochette", "Isombe", "Passion Juice"];

#[derive(Debug, Clone)]
enum Op {
    Add { name: usize, price: u64 },
    Increment(usize),
    Decrement(usize),
    Remove(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..NAMES.len(), 0u64..20_000).prop_map(|(name, price)| Op::Add { name, price }),
        1 => (0usize..7).prop_map(Op::Increment),
        1 => (0usize..7).prop_map(Op::Decrement),
        1 => (0usize..7).prop_map(Op::Remove),
    ]
}

/// Expected cart contents: `(name, unit price, quantity)` in display order.
type Model = Vec<(&'static str, u64, u32)>;

fn apply(cart: &mut Cart, model: &mut Model, op: &Op) {
    match *op {
        Op::Add { name, price } => {
            let name = NAMES[name];
            cart.add(name, Money::new(price)).unwrap();
            match model.iter_mut().find(|line| line.0 == name) {
                Some(line) => line.2 += 1,
                None => model.push((name, price, 1)),
            }
        }
        Op::Increment(index) => match cart.id_at(index) {
            Ok(id) => {
                model[index].2 += 1;
                assert_eq!(cart.increment(id).unwrap(), Adjustment::Changed(model[index].2));
            }
            Err(e) => assert_out_of_range(&e, index, model),
        },
        Op::Decrement(index) => match cart.id_at(index) {
            Ok(id) => {
                let adjustment = cart.decrement(id).unwrap();
                if model[index].2 == 1 {
                    assert_eq!(adjustment, Adjustment::Refused);
                } else {
                    model[index].2 -= 1;
                    assert_eq!(adjustment, Adjustment::Changed(model[index].2));
                }
            }
            Err(e) => assert_out_of_range(&e, index, model),
        },
        Op::Remove(index) => match cart.id_at(index) {
            Ok(id) => {
                assert_eq!(cart.remove(id).unwrap().name(), model.remove(index).0);
            }
            Err(e) => assert_out_of_range(&e, index, model),
        },
    }
}

fn assert_out_of_range(err: &CartError, index: usize, model: &Model) {
    assert!(index >= model.len());
    assert_eq!(
        *err,
        CartError::OutOfRange {
            index,
            len: model.len()
        }
    );
}

fn contents(cart: &Cart) -> Vec<(String, u64, u32)> {
    cart.items()
        .iter()
        .map(|item| (item.name().to_string(), item.unit_price().amount(), item.quantity()))
        .collect()
}

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn add_sequences_merge_by_name(names in prop::collection::vec(0..NAMES.len(), 0..40)) {
        let mut cart = Cart::new();
        for &name in &names {
            cart.add(NAMES[name], Money::new(1000)).unwrap();
        }

        let mut distinct = names.clone();
        distinct.sort_unstable();
        distinct.dedup();
        prop_assert_eq!(cart.len(), distinct.len());

        for item in cart.items() {
            let adds = names.iter().filter(|&&n| NAMES[n] == item.name()).count();
            prop_assert_eq!(item.quantity() as usize, adds);
        }
        prop_assert_eq!(cart.item_count() as usize, names.len());
    }

    #[test]
    fn mutations_keep_cart_invariants(
        ops in prop::collection::vec(op(), 0..60),
        fee in 0u64..5_000,
    ) {
        let mut cart = Cart::new();
        let mut model = Model::new();

        for op in &ops {
            apply(&mut cart, &mut model, op);

            let expected: Vec<(String, u64, u32)> = model
                .iter()
                .map(|&(name, price, quantity)| (name.to_string(), price, quantity))
                .collect();
            prop_assert_eq!(contents(&cart), expected);

            let names: Vec<&str> = cart.items().iter().map(|item| item.name()).collect();
            for (i, name) in names.iter().enumerate() {
                prop_assert!(!names[..i].contains(name), "duplicate line {}", name);
            }
            prop_assert!(cart.items().iter().all(|item| item.quantity() >= 1));

            let totals = cart.totals(Money::new(fee));
            let subtotal: u64 = model
                .iter()
                .map(|&(_, price, quantity)| price * u64::from(quantity))
                .sum();
            prop_assert_eq!(totals.subtotal, Money::new(subtotal));
            prop_assert_eq!(totals.delivery_fee, Money::new(fee));
            prop_assert_eq!(totals.total, totals.subtotal + totals.delivery_fee);
        }

        let json = serde_json::to_string(&cart).unwrap();
        let restored: Cart = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(restored, cart);
    }
}
