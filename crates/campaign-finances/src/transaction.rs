//! Transaction types and the validating builder for the finance ledger.
//!
//! Every cash movement is recorded as a signed [`Transaction`]: income is
//! positive, expenses are negative. The [`TransactionBuilder`] takes an
//! unsigned amount and applies the sign implied by the
//! [`TransactionType`], so a caller can never book rent as income.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::FinanceError;

/// Category of a ledger transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    /// Opening balance of a fiscal year.
    CarryOver,
    /// Monthly contract payment from an employer.
    ContractPayment,
    /// Any other income.
    Miscellaneous,
    /// Monthly personnel salaries.
    Salaries,
    /// Facility rent (hospital beds, kitchens, holding cells).
    FacilityRent,
    /// Repair bay rent.
    BayRent,
    /// Part and unit purchases.
    Purchase,
    /// Loan repayment.
    LoanPayment,
}

impl TransactionType {
    /// Whether transactions of this type add money.
    pub const fn is_income(self) -> bool {
        matches!(
            self,
            Self::CarryOver | Self::ContractPayment | Self::Miscellaneous
        )
    }
}

/// A single signed entry in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Position in the ledger; strictly increasing.
    pub sequence: u64,
    /// Day the transaction was booked.
    pub date: NaiveDate,
    /// Category.
    pub kind: TransactionType,
    /// Signed amount: positive for income, negative for expenses.
    pub amount: Decimal,
    /// Human-readable description.
    pub description: String,
}

/// Builder for validated [`Transaction`] values.
///
/// # Examples
///
/// ```
/// use campaign_finances::{TransactionBuilder, TransactionType};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let date = NaiveDate::from_ymd_opt(3025, 1, 1).unwrap_or_default();
/// let entry = TransactionBuilder::new(date, TransactionType::BayRent)
///     .amount(Decimal::new(250, 0))
///     .description("Bay rent for 2 units")
///     .build(7);
///
/// assert!(entry.is_ok_and(|t| t.amount == Decimal::new(-250, 0)));
/// ```
#[derive(Debug)]
pub struct TransactionBuilder {
    date: NaiveDate,
    kind: TransactionType,
    amount: Option<Decimal>,
    description: Option<String>,
}

impl TransactionBuilder {
    /// Start building a transaction of `kind` booked on `date`.
    pub const fn new(date: NaiveDate, kind: TransactionType) -> Self {
        Self {
            date,
            kind,
            amount: None,
            description: None,
        }
    }

    /// Set the unsigned amount; the sign is derived from the type.
    #[must_use]
    pub const fn amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Set the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Validate inputs and produce a [`Transaction`] with the given sequence.
    ///
    /// # Errors
    ///
    /// Returns [`FinanceError::MissingField`] if amount or description is
    /// unset, [`FinanceError::ZeroAmount`] for a zero amount and
    /// [`FinanceError::NegativeAmount`] for a negative one. A carry-over is
    /// the only type allowed to be negative (a year closed in debt).
    pub fn build(self, sequence: u64) -> Result<Transaction, FinanceError> {
        let amount = self.amount.ok_or(FinanceError::MissingField("amount"))?;
        let description = self
            .description
            .ok_or(FinanceError::MissingField("description"))?;

        if amount.is_zero() {
            return Err(FinanceError::ZeroAmount);
        }
        if amount.is_sign_negative() && self.kind != TransactionType::CarryOver {
            return Err(FinanceError::NegativeAmount { amount });
        }

        let signed = if self.kind.is_income() {
            amount
        } else {
            Decimal::ZERO.saturating_sub(amount)
        };

        Ok(Transaction {
            sequence,
            date: self.date,
            kind: self.kind,
            amount: signed,
            description,
        })
    }
}
