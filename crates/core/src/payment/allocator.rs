//! Oldest-due-first payment allocation.
//!
//! The collected amount is walked across the selected obligations in the
//! order the caller submitted them, each taking `min(balance, remaining)`.
//! Every obligation before the frontier ends fully paid, at most one is
//! partially paid, and the rest receive nothing.

use std::collections::{HashMap, HashSet};

use bursar_shared::types::{FeeStructureId, MONEY_SCALE};
use rust_decimal::Decimal;

use super::error::PaymentError;
use super::types::{AllocationPlan, CollectPaymentInput, PlannedAllocation, SelectedItem};

/// Payment allocation rules.
pub struct PaymentAllocator;

impl PaymentAllocator {
    /// Validates a request before any transaction is opened.
    ///
    /// # Errors
    ///
    /// Returns `NoItemsSelected` for an empty selection, `DuplicateItem` for
    /// a repeated obligation and `InvalidAmount` for negative balances or a
    /// total that is non-positive, over-precise or above the selected balances.
    pub fn validate(items: &[SelectedItem], total_amount: Decimal) -> Result<(), PaymentError> {
        if items.is_empty() {
            return Err(PaymentError::NoItemsSelected);
        }

        let mut seen = HashSet::with_capacity(items.len());
        for item in items {
            if !seen.insert(item.fee_structure_id) {
                return Err(PaymentError::DuplicateItem(item.fee_structure_id));
            }
            if item.balance_as_known < Decimal::ZERO {
                return Err(PaymentError::InvalidAmount(format!(
                    "balance for {} cannot be negative",
                    item.fee_structure_id
                )));
            }
        }

        if total_amount <= Decimal::ZERO {
            return Err(PaymentError::InvalidAmount(
                "amount must be greater than zero".to_string(),
            ));
        }
        if total_amount.normalize().scale() > MONEY_SCALE {
            return Err(PaymentError::InvalidAmount(format!(
                "amount {total_amount} has more than {MONEY_SCALE} decimal places"
            )));
        }

        let selected: Decimal = items.iter().map(|i| i.balance_as_known).sum();
        if total_amount > selected {
            return Err(PaymentError::InvalidAmount(format!(
                "amount {total_amount} exceeds selected balance {selected}"
            )));
        }

        Ok(())
    }

    /// Splits `total_amount` across `items` in order.
    ///
    /// Assumes the input passed [`Self::validate`]; zero allocations are
    /// dropped.
    #[must_use]
    pub fn allocate(items: &[SelectedItem], total_amount: Decimal) -> AllocationPlan {
        let mut remaining = total_amount;
        let mut allocations = Vec::new();

        for item in items {
            if remaining.is_zero() {
                break;
            }
            let pay = item.balance_as_known.min(remaining);
            if pay > Decimal::ZERO {
                allocations.push(PlannedAllocation {
                    fee_structure_id: item.fee_structure_id,
                    amount: pay,
                    balance_before: item.balance_as_known,
                });
                remaining -= pay;
            }
        }

        AllocationPlan {
            total_amount: total_amount - remaining,
            allocations,
        }
    }

    /// Validates and allocates a collection request.
    ///
    /// # Errors
    ///
    /// See [`Self::validate`].
    pub fn plan(input: &CollectPaymentInput) -> Result<AllocationPlan, PaymentError> {
        Self::validate(&input.items, input.total_amount)?;
        Ok(Self::allocate(&input.items, input.total_amount))
    }

    /// Compares submitted balances with balances read inside the write
    /// transaction.
    ///
    /// A fresh balance larger than the submitted one is accepted; allocation
    /// never exceeds the submitted balance.
    ///
    /// # Errors
    ///
    /// Returns `UnknownObligation` when an item has no fresh balance and
    /// `StaleBalance` when a fresh balance is smaller than submitted.
    pub fn check_fresh_balances(
        items: &[SelectedItem],
        fresh: &HashMap<FeeStructureId, Decimal>,
    ) -> Result<(), PaymentError> {
        for item in items {
            let actual = fresh
                .get(&item.fee_structure_id)
                .copied()
                .ok_or(PaymentError::UnknownObligation(item.fee_structure_id))?;
            if actual < item.balance_as_known {
                return Err(PaymentError::StaleBalance {
                    fee_structure_id: item.fee_structure_id,
                    expected: item.balance_as_known,
                    actual,
                });
            }
        }
        Ok(())
    }
}
