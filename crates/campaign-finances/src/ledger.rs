//! The campaign's finance ledger and its daily roll-forward.
//!
//! [`Finances`] holds every transaction of the current fiscal year plus
//! summaries of closed years and outstanding loans. The day-advance
//! pipeline calls [`Finances::new_day`] once per tick with yesterday's and
//! today's dates; all calendar-driven bookkeeping (fiscal year close,
//! monthly payroll, contract income, loan repayments) happens there.
//!
//! # Design
//!
//! - **Append-only** within a fiscal year: entries are never edited.
//! - **Signed amounts**: the balance is the plain sum of all entries.
//! - **No overdraft**: [`Finances::debit`] refuses payments the balance
//!   cannot cover; callers report the shortfall and skip the payment.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::FinanceError;
use crate::transaction::{Transaction, TransactionBuilder, TransactionType};

/// Totals of a closed fiscal year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalYearSummary {
    /// Calendar year closed.
    pub year: i32,
    /// Sum of positive entries (carry-over excluded).
    pub income: Decimal,
    /// Sum of negative entries, as a positive number.
    pub expenses: Decimal,
    /// Balance at close.
    pub closing_balance: Decimal,
}

/// An outstanding loan repaid on the first of each month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    /// Lender or loan name.
    pub name: String,
    /// Payment due each month.
    pub monthly_payment: Decimal,
    /// Payments left, including the next one.
    pub payments_remaining: u32,
    /// Missed payments so far.
    pub missed_payments: u32,
}

/// Amounts owed or owing on the first of a month.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthlyObligations {
    /// Total salaries due.
    pub payroll: Decimal,
    /// Contract payments receivable: (contract name, amount).
    pub contract_payments: Vec<(String, Decimal)>,
}

/// The finance ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finances {
    /// Current fiscal year's entries, in booking order.
    transactions: Vec<Transaction>,
    /// Closed fiscal years, oldest first.
    history: Vec<FiscalYearSummary>,
    /// Outstanding loans.
    loans: Vec<Loan>,
    /// Next sequence number.
    next_sequence: u64,
}

impl Finances {
    /// Create an empty ledger.
    pub const fn new() -> Self {
        Self {
            transactions: Vec::new(),
            history: Vec::new(),
            loans: Vec::new(),
            next_sequence: 0,
        }
    }

    /// Create a ledger holding `amount` as its opening balance.
    ///
    /// # Errors
    ///
    /// Returns [`FinanceError`] if the amount is zero.
    pub fn with_opening_balance(date: NaiveDate, amount: Decimal) -> Result<Self, FinanceError> {
        let mut finances = Self::new();
        finances.book(
            TransactionBuilder::new(date, TransactionType::CarryOver)
                .amount(amount)
                .description("Starting funds"),
        )?;
        Ok(finances)
    }

    /// Current balance.
    pub fn balance(&self) -> Decimal {
        self.transactions.iter().map(|t| t.amount).sum()
    }

    /// Entries of the current fiscal year.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Closed fiscal years.
    pub fn history(&self) -> &[FiscalYearSummary] {
        &self.history
    }

    /// Outstanding loans.
    pub fn loans(&self) -> &[Loan] {
        &self.loans
    }

    /// Take out a loan; the principal is credited immediately.
    ///
    /// # Errors
    ///
    /// Returns [`FinanceError`] if the principal or payment is invalid.
    pub fn take_loan(
        &mut self,
        date: NaiveDate,
        name: impl Into<String>,
        principal: Decimal,
        monthly_payment: Decimal,
        payments: u32,
    ) -> Result<(), FinanceError> {
        let name = name.into();
        if monthly_payment <= Decimal::ZERO {
            return Err(FinanceError::ZeroAmount);
        }
        self.credit(
            date,
            TransactionType::Miscellaneous,
            principal,
            format!("Loan principal from {name}"),
        )?;
        self.loans.push(Loan {
            name,
            monthly_payment,
            payments_remaining: payments,
            missed_payments: 0,
        });
        Ok(())
    }

    /// Book income.
    ///
    /// # Errors
    ///
    /// Returns [`FinanceError`] if validation fails or `kind` is an expense.
    pub fn credit(
        &mut self,
        date: NaiveDate,
        kind: TransactionType,
        amount: Decimal,
        description: impl Into<String>,
    ) -> Result<&Transaction, FinanceError> {
        if !kind.is_income() {
            return Err(FinanceError::WrongDirection { kind });
        }
        self.book(
            TransactionBuilder::new(date, kind)
                .amount(amount)
                .description(description),
        )
    }

    /// Book an expense, refusing it if the balance cannot cover it.
    ///
    /// # Errors
    ///
    /// Returns [`FinanceError::InsufficientFunds`] on a shortfall, or a
    /// validation error from the builder.
    pub fn debit(
        &mut self,
        date: NaiveDate,
        kind: TransactionType,
        amount: Decimal,
        description: impl Into<String>,
    ) -> Result<&Transaction, FinanceError> {
        if kind.is_income() {
            return Err(FinanceError::WrongDirection { kind });
        }
        let available = self.balance();
        if amount > available {
            return Err(FinanceError::InsufficientFunds {
                needed: amount,
                available,
            });
        }
        self.book(
            TransactionBuilder::new(date, kind)
                .amount(amount)
                .description(description),
        )
    }

    /// Roll the ledger forward from `yesterday` to `today`.
    ///
    /// Closes the fiscal year when the year changes, then on the first of
    /// the month books contract payments, loan repayments and payroll in
    /// that order. Shortfalls are not errors: they come back as messages
    /// for the finances report channel.
    ///
    /// # Errors
    ///
    /// Returns [`FinanceError`] only for invalid amounts (for example a
    /// negative payroll).
    pub fn new_day(
        &mut self,
        yesterday: NaiveDate,
        today: NaiveDate,
        obligations: &MonthlyObligations,
    ) -> Result<Vec<String>, FinanceError> {
        let mut messages = Vec::new();

        if today.year() != yesterday.year() {
            messages.push(self.close_fiscal_year(yesterday.year(), today)?);
        }

        if today.day() == 1 {
            for (contract, amount) in &obligations.contract_payments {
                if amount.is_zero() {
                    continue;
                }
                self.credit(
                    today,
                    TransactionType::ContractPayment,
                    *amount,
                    format!("Monthly payment for {contract}"),
                )?;
                messages.push(format!("Received {amount} C-bills from {contract}."));
            }

            messages.extend(self.pay_loans(today)?);

            if obligations.payroll.is_sign_negative() {
                return Err(FinanceError::NegativeAmount {
                    amount: obligations.payroll,
                });
            }
            if !obligations.payroll.is_zero() {
                let paid = self
                    .debit(
                        today,
                        TransactionType::Salaries,
                        obligations.payroll,
                        "Monthly salaries",
                    )
                    .map(|_| ());
                match paid {
                    Ok(()) => messages.push(format!(
                        "Paid {} C-bills in salaries.",
                        obligations.payroll
                    )),
                    Err(FinanceError::InsufficientFunds { needed, available }) => messages.push(
                        format!("Cannot pay salaries: {needed} due, {available} available."),
                    ),
                    Err(other) => return Err(other),
                }
            }
        }

        debug!(%today, balance = %self.balance(), "Finances rolled forward");
        Ok(messages)
    }

    fn pay_loans(&mut self, today: NaiveDate) -> Result<Vec<String>, FinanceError> {
        let mut messages = Vec::new();
        let mut loans = std::mem::take(&mut self.loans);
        for loan in &mut loans {
            let paid = self
                .debit(
                    today,
                    TransactionType::LoanPayment,
                    loan.monthly_payment,
                    format!("Loan payment to {}", loan.name),
                )
                .map(|_| ());
            match paid {
                Ok(()) => {
                    loan.payments_remaining = loan.payments_remaining.saturating_sub(1);
                    if loan.payments_remaining == 0 {
                        messages.push(format!("Loan from {} paid off.", loan.name));
                    }
                }
                Err(FinanceError::InsufficientFunds { .. }) => {
                    loan.missed_payments = loan.missed_payments.saturating_add(1);
                    messages.push(format!("Missed loan payment to {}.", loan.name));
                }
                Err(other) => {
                    self.loans = loans;
                    return Err(other);
                }
            }
        }
        loans.retain(|loan| loan.payments_remaining > 0);
        self.loans = loans;
        Ok(messages)
    }

    fn close_fiscal_year(&mut self, year: i32, today: NaiveDate) -> Result<String, FinanceError> {
        let mut income = Decimal::ZERO;
        let mut expenses = Decimal::ZERO;
        for tx in &self.transactions {
            if tx.kind == TransactionType::CarryOver {
                continue;
            }
            if tx.amount.is_sign_negative() {
                expenses = expenses.saturating_add(tx.amount.abs());
            } else {
                income = income.saturating_add(tx.amount);
            }
        }
        let closing_balance = self.balance();
        self.history.push(FiscalYearSummary {
            year,
            income,
            expenses,
            closing_balance,
        });
        self.transactions.clear();
        if !closing_balance.is_zero() {
            self.book(
                TransactionBuilder::new(today, TransactionType::CarryOver)
                    .amount(closing_balance)
                    .description(format!("Carried over from {year}")),
            )?;
        }
        info!(year, %closing_balance, "Fiscal year closed");
        Ok(format!(
            "Fiscal year {year} closed with a balance of {closing_balance} C-bills."
        ))
    }

    fn book(&mut self, builder: TransactionBuilder) -> Result<&Transaction, FinanceError> {
        let tx = builder.build(self.next_sequence)?;
        self.next_sequence = self.next_sequence.saturating_add(1);
        self.transactions.push(tx);
        self.transactions
            .last()
            .ok_or(FinanceError::InternalError("failed to retrieve entry after append"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn funded(amount: i64) -> Finances {
        Finances::with_opening_balance(date(3025, 1, 1), Decimal::new(amount, 0)).unwrap()
    }

    #[test]
    fn opening_balance() {
        assert_eq!(funded(1000).balance(), Decimal::new(1000, 0));
    }

    #[test]
    fn debit_refuses_overdraft() {
        let mut finances = funded(100);
        let result = finances.debit(
            date(3025, 1, 2),
            TransactionType::BayRent,
            Decimal::new(150, 0),
            "Bay rent",
        );
        assert!(matches!(result, Err(FinanceError::InsufficientFunds { .. })));
        assert_eq!(finances.balance(), Decimal::new(100, 0));
    }

    #[test]
    fn credit_rejects_expense_type() {
        let mut finances = funded(100);
        let result = finances.credit(
            date(3025, 1, 2),
            TransactionType::Salaries,
            Decimal::ONE,
            "Backwards",
        );
        assert!(matches!(result, Err(FinanceError::WrongDirection { .. })));
    }

    #[test]
    fn mid_month_day_books_nothing() {
        let mut finances = funded(1000);
        let obligations = MonthlyObligations {
            payroll: Decimal::new(300, 0),
            contract_payments: vec![(String::from("Garrison"), Decimal::new(500, 0))],
        };
        let messages = finances
            .new_day(date(3025, 1, 14), date(3025, 1, 15), &obligations)
            .unwrap();
        assert!(messages.is_empty());
        assert_eq!(finances.transactions().len(), 1);
    }

    #[test]
    fn first_of_month_books_income_before_payroll() {
        let mut finances = funded(100);
        let obligations = MonthlyObligations {
            payroll: Decimal::new(300, 0),
            contract_payments: vec![(String::from("Garrison"), Decimal::new(500, 0))],
        };
        let messages = finances
            .new_day(date(3025, 1, 31), date(3025, 2, 1), &obligations)
            .unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(finances.balance(), Decimal::new(300, 0));
    }

    #[test]
    fn payroll_shortfall_is_reported_not_raised() {
        let mut finances = funded(100);
        let obligations = MonthlyObligations {
            payroll: Decimal::new(300, 0),
            contract_payments: Vec::new(),
        };
        let messages = finances
            .new_day(date(3025, 1, 31), date(3025, 2, 1), &obligations)
            .unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("Cannot pay salaries"));
        assert_eq!(finances.balance(), Decimal::new(100, 0));
    }

    #[test]
    fn year_change_closes_fiscal_year_with_carry_over() {
        let mut finances = funded(1000);
        finances
            .debit(date(3025, 6, 1), TransactionType::Purchase, Decimal::new(200, 0), "Parts")
            .unwrap();
        let messages = finances
            .new_day(date(3025, 12, 31), date(3026, 1, 1), &MonthlyObligations::default())
            .unwrap();
        assert!(messages[0].contains("3025"));
        assert_eq!(finances.history().len(), 1);
        assert_eq!(finances.history()[0].expenses, Decimal::new(200, 0));
        assert_eq!(finances.transactions().len(), 1);
        assert_eq!(finances.balance(), Decimal::new(800, 0));
    }

    #[test]
    fn loans_are_repaid_and_removed() {
        let mut finances = funded(1000);
        finances
            .take_loan(date(3025, 1, 1), "Bank", Decimal::new(500, 0), Decimal::new(100, 0), 1)
            .unwrap();
        let messages = finances
            .new_day(date(3025, 1, 31), date(3025, 2, 1), &MonthlyObligations::default())
            .unwrap();
        assert!(messages[0].contains("paid off"));
        assert!(finances.loans().is_empty());
        assert_eq!(finances.balance(), Decimal::new(1400, 0));
    }

    #[test]
    fn missed_loan_payment_is_counted() {
        let mut finances = Finances::new();
        finances
            .take_loan(date(3025, 1, 1), "Bank", Decimal::new(50, 0), Decimal::new(100, 0), 3)
            .unwrap();
        finances
            .new_day(date(3025, 1, 31), date(3025, 2, 1), &MonthlyObligations::default())
            .unwrap();
        assert_eq!(finances.loans()[0].missed_payments, 1);
        assert_eq!(finances.loans()[0].payments_remaining, 3);
    }
}
