//! Daily ledger roll-forward.

use campaign_finances::MonthlyObligations;
use campaign_types::{PersonnelStatus, ReportCategory};
use rust_decimal::Decimal;

use super::{PhaseError, TickContext};
use crate::report::ReportSink;
use crate::state::CampaignState;

/// Roll the ledger from yesterday to today.
///
/// Payroll covers everyone still drawing pay (on duty, on leave or at an
/// academy); contract payments cover every contract in force today. The
/// ledger itself decides whether today is a payday.
///
/// # Errors
///
/// Returns [`PhaseError::Finance`] when the ledger rejects an amount.
pub fn roll_forward(state: &mut CampaignState, ctx: &TickContext) -> Result<(), PhaseError> {
    let obligations = obligations(state, ctx);
    let messages = state
        .finances
        .new_day(ctx.yesterday, ctx.today, &obligations)?;
    for message in messages {
        state.report(ReportCategory::Finances, message);
    }
    Ok(())
}

fn obligations(state: &CampaignState, ctx: &TickContext) -> MonthlyObligations {
    let payroll = state
        .personnel
        .values()
        .filter(|person| {
            matches!(
                person.status,
                PersonnelStatus::Active | PersonnelStatus::OnLeave | PersonnelStatus::Student
            )
        })
        .fold(Decimal::ZERO, |sum, person| sum.saturating_add(person.salary));
    let contract_payments = state
        .contracts
        .values()
        .filter(|contract| contract.is_active_on(ctx.today))
        .map(|contract| (contract.name.clone(), contract.monthly_payment))
        .collect();
    MonthlyObligations {
        payroll,
        contract_payments,
    }
}
