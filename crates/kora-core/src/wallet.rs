//! # Wallet Ledger
//!
//! Plans the customer-row update that accompanies a sale.
//!
//! ```text
//! wallet          += delta            (delta from the payment resolver, ≤ 0)
//! purchase_value  += total
//! last_sale_on     = today, even for a backdated sale
//! ```
//!
//! CREDIT and PARTIAL may push a wallet further below zero. Only ADVANCE
//! carries a guard: the live wallet must still cover the total at commit.

use chrono::NaiveDate;

use crate::money::Money;
use crate::payment::PaymentResolution;
use crate::types::Customer;

/// One customer-row update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletPosting {
    pub customer_id: String,
    pub delta: Money,
    pub purchase_value: Money,
    pub last_sale_on: NaiveDate,
    /// When set, the update only applies if `wallet >= guard`.
    pub guard: Option<Money>,
}

impl WalletPosting {
    /// Plans the posting for `customer`, or `None` for anonymous sales.
    pub fn plan(
        customer: Option<&Customer>,
        resolution: &PaymentResolution,
        total: Money,
        today: NaiveDate,
    ) -> Option<Self> {
        customer.map(|c| WalletPosting {
            customer_id: c.id.clone(),
            delta: resolution.wallet_delta,
            purchase_value: total,
            last_sale_on: today,
            guard: resolution.wallet_guard,
        })
    }

    /// Applies the posting to a wallet value, honouring the guard.
    ///
    /// Returns `None` when the guard rejects the posting.
    pub fn apply_to(&self, wallet: Money) -> Option<Money> {
        match self.guard {
            Some(required) if wallet < required => None,
            _ => wallet.checked_add(self.delta),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payment::{resolve, PaymentInput};

    fn customer(wallet: i64) -> Customer {
        Customer {
            id: "cust-1".to_string(),
            business_id: "biz-1".to_string(),
            name: "Ada".to_string(),
            wallet,
            purchase_value: 10_000,
            last_sale_on: None,
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, 4).unwrap()
    }

    #[test]
    fn test_anonymous_sale_has_no_posting() {
        let total = Money::from_minor(500);
        let res = resolve(&PaymentInput::Cash, total, None, None).unwrap();
        assert_eq!(WalletPosting::plan(None, &res, total, day()), None);
    }

    #[test]
    fn test_cash_sale_only_updates_bookkeeping() {
        let c = customer(0);
        let total = Money::from_minor(500);
        let res = resolve(&PaymentInput::Cash, total, Some(&c), None).unwrap();

        let posting = WalletPosting::plan(Some(&c), &res, total, day()).unwrap();
        assert_eq!(posting.delta, Money::zero());
        assert_eq!(posting.purchase_value, total);
        assert_eq!(posting.last_sale_on, day());
    }

    #[test]
    fn test_credit_deepens_existing_debt() {
        let c = customer(-300);
        let total = Money::from_minor(1_000);
        let res = resolve(&PaymentInput::Credit, total, Some(&c), None).unwrap();

        let posting = WalletPosting::plan(Some(&c), &res, total, day()).unwrap();
        assert_eq!(posting.guard, None);
        assert_eq!(posting.apply_to(c.wallet()), Some(Money::from_minor(-1_300)));
    }

    #[test]
    fn test_advance_guard() {
        let c = customer(1_500);
        let total = Money::from_minor(1_500);
        let res = resolve(&PaymentInput::Advance, total, Some(&c), None).unwrap();

        let posting = WalletPosting::plan(Some(&c), &res, total, day()).unwrap();
        assert_eq!(posting.apply_to(Money::from_minor(1_500)), Some(Money::zero()));
        // Another sale drained the wallet in between.
        assert_eq!(posting.apply_to(Money::from_minor(1_000)), None);
    }
}
