//! # Payment Method Resolver
//!
//! The single source of payment semantics. No other module derives a
//! balance, a wallet delta, or decides whether a payment record exists.
//!
//! ## Decision Table
//! ```text
//! ┌──────────┬──────────┬───────────┬──────────┬──────────────┬──────────────┬────────────────┐
//! │ Method   │ Customer │ Bank      │ Due date │ Balance      │ Wallet delta │ PaymentRecord  │
//! ├──────────┼──────────┼───────────┼──────────┼──────────────┼──────────────┼────────────────┤
//! │ CASH     │    -     │     -     │    -     │ 0            │ 0            │ total, CASH    │
//! │ BANK     │    -     │ required  │    -     │ 0            │ 0            │ total, BANK    │
//! │ MYCLIQ   │    -     │     -     │    -     │ 0            │ 0            │ total, MYCLIQ  │
//! │ CREDIT   │ required │     -     │ required │ total        │ −total       │ none           │
//! │ PARTIAL  │ required │ if BANK   │ required │ total − paid │ −balance     │ paid, sub-meth │
//! │ ADVANCE  │ required │     -     │    -     │ 0            │ −total       │ none           │
//! └──────────┴──────────┴───────────┴──────────┴──────────────┴──────────────┴────────────────┘
//! ```
//!
//! ADVANCE additionally requires `wallet ≥ total`, checked here against the
//! snapshot and again by the unit of work against the live row.
//!
//! ## Two Phases
//! 1. [`check_fields`] - presence of method-specific fields (no lookups)
//! 2. [`resolve`] - amounts, once the cart total and customer are known

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{Customer, PartialMethod, PaymentMethod, PaymentStatus};
use crate::validation::{validate_payment_amount, ValidationResult};

// =============================================================================
// Method Rules
// =============================================================================

/// What a method collects at the till.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    /// The whole total is collected now.
    Full,
    /// Only `amount_paid` is collected now.
    Partial,
    /// Nothing is collected (credit, or funds already held in the wallet).
    Nothing,
}

/// One row of the decision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodRule {
    pub method: PaymentMethod,
    pub requires_customer: bool,
    pub requires_bank: bool,
    pub requires_due_date: bool,
    pub collection: Collection,
}

const RULES: [MethodRule; 6] = [
    MethodRule {
        method: PaymentMethod::Cash,
        requires_customer: false,
        requires_bank: false,
        requires_due_date: false,
        collection: Collection::Full,
    },
    MethodRule {
        method: PaymentMethod::Bank,
        requires_customer: false,
        requires_bank: true,
        requires_due_date: false,
        collection: Collection::Full,
    },
    MethodRule {
        method: PaymentMethod::Mycliq,
        requires_customer: false,
        requires_bank: false,
        requires_due_date: false,
        collection: Collection::Full,
    },
    MethodRule {
        method: PaymentMethod::Credit,
        requires_customer: true,
        requires_bank: false,
        requires_due_date: true,
        collection: Collection::Nothing,
    },
    MethodRule {
        method: PaymentMethod::Partial,
        requires_customer: true,
        // Depends on the sub-method; see check_fields.
        requires_bank: false,
        requires_due_date: true,
        collection: Collection::Partial,
    },
    MethodRule {
        method: PaymentMethod::Advance,
        requires_customer: true,
        requires_bank: false,
        requires_due_date: false,
        collection: Collection::Nothing,
    },
];

/// Looks up the decision-table row for `method`.
pub fn rule(method: PaymentMethod) -> &'static MethodRule {
    match method {
        PaymentMethod::Cash => &RULES[0],
        PaymentMethod::Bank => &RULES[1],
        PaymentMethod::Mycliq => &RULES[2],
        PaymentMethod::Credit => &RULES[3],
        PaymentMethod::Partial => &RULES[4],
        PaymentMethod::Advance => &RULES[5],
    }
}

// =============================================================================
// Phase 1: Field Checks
// =============================================================================

/// Method-specific fields as they arrived on the request.
#[derive(Debug, Clone, Copy)]
pub struct PaymentFields {
    pub method: PaymentMethod,
    pub amount_paid: Option<i64>,
    pub partial_method: Option<PartialMethod>,
    pub has_customer: bool,
    pub has_bank: bool,
    pub has_due_date: bool,
}

/// A payment method with the fields it needs, already present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentInput {
    Cash,
    Bank,
    Mycliq,
    Credit,
    Partial {
        amount_paid: Money,
        via: PartialMethod,
    },
    Advance,
}

impl PaymentInput {
    pub fn method(&self) -> PaymentMethod {
        match self {
            PaymentInput::Cash => PaymentMethod::Cash,
            PaymentInput::Bank => PaymentMethod::Bank,
            PaymentInput::Mycliq => PaymentMethod::Mycliq,
            PaymentInput::Credit => PaymentMethod::Credit,
            PaymentInput::Partial { .. } => PaymentMethod::Partial,
            PaymentInput::Advance => PaymentMethod::Advance,
        }
    }

    pub fn partial_method(&self) -> Option<PartialMethod> {
        match self {
            PaymentInput::Partial { via, .. } => Some(*via),
            _ => None,
        }
    }
}

/// Checks that every field the method needs is present.
///
/// ## Example
/// ```rust
/// use kora_core::payment::{check_fields, PaymentFields};
/// use kora_core::PaymentMethod;
///
/// let fields = PaymentFields {
///     method: PaymentMethod::Credit,
///     amount_paid: None,
///     partial_method: None,
///     has_customer: false,
///     has_bank: false,
///     has_due_date: true,
/// };
/// assert!(check_fields(&fields).is_err());
/// ```
pub fn check_fields(fields: &PaymentFields) -> ValidationResult<PaymentInput> {
    let rule = rule(fields.method);

    if rule.requires_customer && !fields.has_customer {
        return Err(ValidationError::required("customerId"));
    }
    if rule.requires_due_date && !fields.has_due_date {
        return Err(ValidationError::required("dueDate"));
    }
    if rule.requires_bank && !fields.has_bank {
        return Err(ValidationError::required("bankId"));
    }

    if rule.collection != Collection::Partial {
        if fields.amount_paid.is_some() {
            return Err(not_allowed("amountPaid", fields.method));
        }
        if fields.partial_method.is_some() {
            return Err(not_allowed("partialMethod", fields.method));
        }
    }

    Ok(match fields.method {
        PaymentMethod::Cash => PaymentInput::Cash,
        PaymentMethod::Bank => PaymentInput::Bank,
        PaymentMethod::Mycliq => PaymentInput::Mycliq,
        PaymentMethod::Credit => PaymentInput::Credit,
        PaymentMethod::Advance => PaymentInput::Advance,
        PaymentMethod::Partial => {
            let amount_paid = fields
                .amount_paid
                .ok_or_else(|| ValidationError::required("amountPaid"))?;
            validate_payment_amount(amount_paid)?;

            let via = fields
                .partial_method
                .ok_or_else(|| ValidationError::required("partialMethod"))?;
            if via == PartialMethod::Bank && !fields.has_bank {
                return Err(ValidationError::required("bankId"));
            }

            PaymentInput::Partial {
                amount_paid: Money::from_minor(amount_paid),
                via,
            }
        }
    })
}

fn not_allowed(field: &str, method: PaymentMethod) -> ValidationError {
    ValidationError::NotAllowed {
        field: field.to_string(),
        reason: format!("only PARTIAL sales accept it, got {method:?}"),
    }
}

// =============================================================================
// Phase 2: Resolution
// =============================================================================

/// The payment record a sale will write, minus identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRecordSpec {
    pub amount: Money,
    /// The tender actually used.
    pub method: PaymentMethod,
    pub bank_id: Option<String>,
}

/// Everything the payment method decides about a sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentResolution {
    pub balance: Money,
    pub payment_status: PaymentStatus,
    /// Zero or negative; applied to the customer's wallet.
    pub wallet_delta: Money,
    /// ADVANCE only: the wallet must still hold this much at commit.
    pub wallet_guard: Option<Money>,
    pub payment_record: Option<PaymentRecordSpec>,
}

/// Computes balance, wallet effect and payment record for a priced cart.
///
/// `customer` is the snapshot fetched for this request, if one was named.
///
/// ## Errors
/// - `AmountExceedsTotal` when a PARTIAL sale pays more than `total`
/// - `InsufficientWalletBalance` when an ADVANCE wallet is below `total`
/// - `Validation(Required)` when the method needs a customer and none was found
pub fn resolve(
    input: &PaymentInput,
    total: Money,
    customer: Option<&Customer>,
    bank_id: Option<&str>,
) -> CoreResult<PaymentResolution> {
    let rule = rule(input.method());
    if rule.requires_customer && customer.is_none() {
        return Err(ValidationError::required("customerId").into());
    }

    let bank_id = bank_id.map(str::to_string);
    let full_record = |method: PaymentMethod| PaymentRecordSpec {
        amount: total,
        method,
        bank_id: bank_id.clone(),
    };

    let resolution = match *input {
        PaymentInput::Cash | PaymentInput::Bank | PaymentInput::Mycliq => PaymentResolution {
            balance: Money::zero(),
            payment_status: PaymentStatus::Paid,
            wallet_delta: Money::zero(),
            wallet_guard: None,
            payment_record: Some(full_record(input.method())),
        },
        PaymentInput::Credit => PaymentResolution {
            balance: total,
            payment_status: PaymentStatus::from_balance(total),
            wallet_delta: -total,
            wallet_guard: None,
            payment_record: None,
        },
        PaymentInput::Partial { amount_paid, via } => {
            if amount_paid > total {
                return Err(CoreError::AmountExceedsTotal {
                    amount_paid: amount_paid.minor(),
                    total: total.minor(),
                });
            }
            let balance = total - amount_paid;
            PaymentResolution {
                balance,
                payment_status: PaymentStatus::from_balance(balance),
                wallet_delta: -balance,
                wallet_guard: None,
                payment_record: Some(PaymentRecordSpec {
                    amount: amount_paid,
                    method: via.into(),
                    bank_id: bank_id.clone(),
                }),
            }
        }
        PaymentInput::Advance => {
            // Presence checked against the rule above.
            if let Some(customer) = customer {
                if customer.wallet() < total {
                    return Err(CoreError::InsufficientWalletBalance {
                        customer_id: customer.id.clone(),
                        wallet: customer.wallet,
                        required: total.minor(),
                    });
                }
            }
            PaymentResolution {
                balance: Money::zero(),
                payment_status: PaymentStatus::Paid,
                wallet_delta: -total,
                wallet_guard: Some(total),
                payment_record: None,
            }
        }
    };

    Ok(resolution)
}

// =============================================================================
// Unit Tests
// =============================================================================
