//! Finance ledger and daily roll-forward for the campaign simulation.
//!
//! Every C-bill the campaign earns or spends is recorded here. The ledger
//! never panics and never overdraws; it returns errors.
//!
//! # Modules
//!
//! - [`ledger`] -- The [`Finances`] struct: balance, loans, fiscal years and
//!   the [`Finances::new_day`] roll-forward.
//! - [`transaction`] -- The [`TransactionBuilder`] for validated entries.
//!
//! # Usage
//!
//! ```
//! use campaign_finances::{Finances, MonthlyObligations};
//! use chrono::NaiveDate;
//! use rust_decimal::Decimal;
//!
//! let jan31 = NaiveDate::from_ymd_opt(3025, 1, 31).unwrap_or_default();
//! let feb1 = NaiveDate::from_ymd_opt(3025, 2, 1).unwrap_or_default();
//! let mut finances = Finances::with_opening_balance(jan31, Decimal::new(1000, 0))
//!     .unwrap_or_default();
//!
//! let obligations = MonthlyObligations {
//!     payroll: Decimal::new(400, 0),
//!     contract_payments: Vec::new(),
//! };
//! let messages = finances.new_day(jan31, feb1, &obligations).unwrap_or_default();
//!
//! assert_eq!(messages.len(), 1);
//! assert_eq!(finances.balance(), Decimal::new(600, 0));
//! ```

pub mod ledger;
pub mod transaction;

pub use ledger::{Finances, FiscalYearSummary, Loan, MonthlyObligations};
pub use transaction::{Transaction, TransactionBuilder, TransactionType};

use rust_decimal::Decimal;

/// Errors that can occur when booking ledger entries.
#[derive(Debug, thiserror::Error)]
pub enum FinanceError {
    /// Amount must be non-zero.
    #[error("transaction amount must be non-zero")]
    ZeroAmount,

    /// Amount must not be negative.
    #[error("transaction amount must be positive, got {amount}")]
    NegativeAmount {
        /// The invalid amount.
        amount: Decimal,
    },

    /// A required field was not set on the builder.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Income booked as an expense or vice versa.
    #[error("{kind:?} cannot be booked in this direction")]
    WrongDirection {
        /// The transaction type used.
        kind: TransactionType,
    },

    /// The balance cannot cover a payment.
    #[error("insufficient funds: {needed} needed, {available} available")]
    InsufficientFunds {
        /// Amount of the payment.
        needed: Decimal,
        /// Balance at the time.
        available: Decimal,
    },

    /// An internal error that should not occur in normal operation.
    #[error("internal finance error: {0}")]
    InternalError(&'static str),
}
