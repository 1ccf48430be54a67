//! Facility capacity and rent.

use campaign_finances::{FinanceError, TransactionType};
use campaign_types::{PersonnelRole, ReportCategory};
use rust_decimal::Decimal;
use tracing::debug;

use super::{PhaseError, TickContext};
use crate::report::ReportSink;
use crate::state::CampaignState;

/// Recompute hospital and technical capacity from the roster.
///
/// Must run before personnel processing, which consumes hospital beds.
pub fn recompute_capacity(state: &mut CampaignState, ctx: &TickContext) {
    let doctors = state.count_active(PersonnelRole::is_doctor);
    let techs = state.count_active(PersonnelRole::is_tech);

    let treated = doctors.saturating_mul(ctx.options.medical.patients_per_doctor);
    state.capacity.hospital_beds = treated.saturating_add(ctx.options.finances.hospital_beds);
    state.capacity.beds_in_use = 0;
    state.capacity.tech_minutes = techs.saturating_mul(ctx.options.personnel.tech_daily_minutes);

    debug!(
        beds = state.capacity.hospital_beds,
        tech_minutes = state.capacity.tech_minutes,
        "Facility capacity recomputed"
    );
}

/// Pay the monthly rent for hospital beds, kitchens and holding cells.
///
/// # Errors
///
/// Returns [`PhaseError::Finance`] if the ledger rejects the entry for a
/// reason other than a shortfall.
pub fn pay_facility_rent(state: &mut CampaignState, ctx: &TickContext) -> Result<(), PhaseError> {
    let rent = &ctx.options.finances;
    let total = [
        (rent.hospital_beds, rent.bed_rent),
        (rent.kitchens, rent.kitchen_rent),
        (rent.holding_cells, rent.cell_rent),
    ]
    .into_iter()
    .fold(Decimal::ZERO, |sum, (count, price)| {
        sum.saturating_add(Decimal::from(count).saturating_mul(Decimal::from(price)))
    });

    pay(state, ctx, TransactionType::FacilityRent, total, "facility rent")
}

/// Pay the weekly rent for every present unit in a rented repair bay.
///
/// # Errors
///
/// Returns [`PhaseError::Finance`] if the ledger rejects the entry for a
/// reason other than a shortfall.
pub fn pay_bay_rent(state: &mut CampaignState, ctx: &TickContext) -> Result<(), PhaseError> {
    let occupied = state
        .units
        .values()
        .filter(|unit| unit.in_rented_bay && unit.is_present())
        .count();
    let total = Decimal::from(occupied)
        .saturating_mul(Decimal::from(ctx.options.finances.bay_rent));

    pay(state, ctx, TransactionType::BayRent, total, "repair bay rent")
}

fn pay(
    state: &mut CampaignState,
    ctx: &TickContext,
    kind: TransactionType,
    total: Decimal,
    what: &str,
) -> Result<(), PhaseError> {
    if total <= Decimal::ZERO {
        return Ok(());
    }
    let paid = state
        .finances
        .debit(ctx.today, kind, total, format!("Paid {what}"))
        .map(|_| ());
    match paid {
        Ok(()) => {
            state.report(
                ReportCategory::Finances,
                format!("Paid {total} C-bills in {what}."),
            );
            Ok(())
        }
        Err(FinanceError::InsufficientFunds { needed, available }) => {
            state.report(
                ReportCategory::Finances,
                format!("Cannot pay {what}: {needed} due, {available} available."),
            );
            Ok(())
        }
        Err(source) => Err(source.into()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::{CampaignOptions, OptionsSnapshot};
    use crate::triggers::TriggerFlags;
    use campaign_types::{Person, PersonId, Unit, UnitId};
    use chrono::NaiveDate;

    fn context(options: &CampaignOptions) -> TickContext {
        let today = NaiveDate::from_ymd_opt(3025, 3, 1).unwrap();
        TickContext {
            yesterday: today.pred_opt().unwrap(),
            today,
            triggers: TriggerFlags::evaluate(today),
            options: OptionsSnapshot::capture(options),
            location: campaign_types::Location::planetside("Galatea", "MERC"),
        }
    }

    fn person(role: PersonnelRole) -> Person {
        let born = NaiveDate::from_ymd_opt(3000, 1, 1).unwrap();
        Person::new(PersonId::new(), "Crew", role, born, born)
    }

    #[test]
    fn capacity_scales_with_doctors_and_techs() {
        let options = CampaignOptions::default();
        let mut state = CampaignState::new(options.clone());
        state.add_person(person(PersonnelRole::Doctor));
        state.add_person(person(PersonnelRole::Tech));
        state.add_person(person(PersonnelRole::Tech));
        state.capacity.beds_in_use = 9;

        recompute_capacity(&mut state, &context(&options));
        assert_eq!(state.capacity.hospital_beds, 25);
        assert_eq!(state.capacity.beds_in_use, 0);
        assert_eq!(state.capacity.tech_minutes, 960);
    }

    #[test]
    fn facility_rent_is_debited() {
        let mut options = CampaignOptions::default();
        options.finances.kitchens = 2;
        options.finances.kitchen_rent = 1_000;
        let mut state = CampaignState::new(options.clone());

        pay_facility_rent(&mut state, &context(&options)).unwrap();
        assert_eq!(state.finances.balance(), Decimal::from(4_998_000));
        assert_eq!(state.reports().entries(ReportCategory::Finances).len(), 1);
    }

    #[test]
    fn bay_rent_shortfall_is_reported_and_skipped() {
        let mut options = CampaignOptions::default();
        options.campaign.starting_funds = 100;
        options.finances.bay_rent = 500;
        let mut state = CampaignState::new(options.clone());
        let mut unit = Unit::new(UnitId::new(), "Atlas", Some(String::from("AS7-D")));
        unit.in_rented_bay = true;
        state.add_unit(unit);

        pay_bay_rent(&mut state, &context(&options)).unwrap();
        assert_eq!(state.finances.balance(), Decimal::from(100));
        let entries = state.reports().entries(ReportCategory::Finances);
        assert!(entries[0].starts_with("Cannot pay repair bay rent"));
    }

    #[test]
    fn no_rent_configured_books_nothing() {
        let options = CampaignOptions::default();
        let mut state = CampaignState::new(options.clone());
        pay_facility_rent(&mut state, &context(&options)).unwrap();
        pay_bay_rent(&mut state, &context(&options)).unwrap();
        assert_eq!(state.finances.transactions().len(), 1);
        assert!(state.reports().is_empty());
    }
}
