//! Property-based tests for the payment allocator.

use bursar_shared::types::FeeStructureId;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::allocator::PaymentAllocator;
use super::error::PaymentError;
use super::types::SelectedItem;

/// Selected items plus a total between 0.01 and the sum of their balances.
fn valid_request() -> impl Strategy<Value = (Vec<SelectedItem>, Decimal)> {
    prop::collection::vec(0i64..1_000_000i64, 1..10)
        .prop_filter("need something to pay", |cents| cents.iter().sum::<i64>() > 0)
        .prop_flat_map(|cents| {
            let max = cents.iter().sum::<i64>();
            (Just(cents), 1i64..=max)
        })
        .prop_map(|(cents, total_cents)| {
            let items = cents
                .into_iter()
                .map(|c| SelectedItem {
                    fee_structure_id: FeeStructureId::new(),
                    balance_as_known: Decimal::new(c, 2),
                })
                .collect();
            (items, Decimal::new(total_cents, 2))
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The collected amount is fully applied, never beyond any balance.
    #[test]
    fn prop_allocation_conserves_amount((items, total) in valid_request()) {
        prop_assert!(PaymentAllocator::validate(&items, total).is_ok());
        let plan = PaymentAllocator::allocate(&items, total);

        let applied: Decimal = plan.allocations.iter().map(|a| a.amount).sum();
        prop_assert_eq!(applied, total);
        prop_assert_eq!(plan.total_amount, total);
        for alloc in &plan.allocations {
            prop_assert!(alloc.amount > Decimal::ZERO);
            prop_assert!(alloc.amount <= alloc.balance_before);
        }
    }

    /// Everything before the frontier is fully paid; at most one item is partial.
    #[test]
    fn prop_front_loading((items, total) in valid_request()) {
        let plan = PaymentAllocator::allocate(&items, total);

        let partial = plan
            .allocations
            .iter()
            .filter(|a| a.amount < a.balance_before)
            .count();
        prop_assert!(partial <= 1);
        if let Some((last, rest)) = plan.allocations.split_last() {
            prop_assert!(rest.iter().all(|a| a.amount == a.balance_before));
            let frontier = items
                .iter()
                .position(|i| i.fee_structure_id == last.fee_structure_id)
                .unwrap();
            for skipped in &items[..frontier] {
                let allocated = plan
                    .allocations
                    .iter()
                    .find(|a| a.fee_structure_id == skipped.fee_structure_id)
                    .map_or(Decimal::ZERO, |a| a.amount);
                prop_assert_eq!(allocated, skipped.balance_as_known);
            }
        }
    }

    /// Same input, same plan.
    #[test]
    fn prop_allocation_is_deterministic((items, total) in valid_request()) {
        let first = PaymentAllocator::allocate(&items, total);
        let second = PaymentAllocator::allocate(&items, total);
        prop_assert_eq!(first, second);
    }

    /// Totals above the selected balances are always rejected.
    #[test]
    fn prop_overpayment_rejected(
        (items, _) in valid_request(),
        excess_cents in 1i64..100_000i64,
    ) {
        let selected: Decimal = items.iter().map(|i| i.balance_as_known).sum();
        let total = selected + Decimal::new(excess_cents, 2);
        let result = PaymentAllocator::validate(&items, total);
        prop_assert!(matches!(result, Err(PaymentError::InvalidAmount(_))));
    }
}
