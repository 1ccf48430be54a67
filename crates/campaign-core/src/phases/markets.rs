//! Personnel and unit markets.
//!
//! Listings expire daily. Applicants are regenerated on Mondays, unit
//! offers on the first of the month. An active contract brings one extra
//! applicant each week.

use campaign_types::{Applicant, OfferId, PersonnelRole, ReportCategory, UnitOffer};
use rust_decimal::Decimal;
use tracing::debug;

use super::TickContext;
use crate::report::ReportSink;
use crate::state::CampaignState;

const GIVEN_NAMES: [&str; 12] = [
    "Alexi", "Brenna", "Cassius", "Dana", "Eliot", "Farah", "Gideon", "Hana", "Ivo", "Jun",
    "Kaja", "Lorne",
];

const FAMILY_NAMES: [&str; 10] = [
    "Ambrose", "Baranov", "Castellan", "Drake", "Esterhaus", "Fong", "Garrison", "Halloran",
    "Ishikawa", "Jaeger",
];

const APPLICANT_ROLES: [PersonnelRole; 8] = [
    PersonnelRole::MekWarrior,
    PersonnelRole::AeroPilot,
    PersonnelRole::VehicleCrew,
    PersonnelRole::Soldier,
    PersonnelRole::Tech,
    PersonnelRole::Doctor,
    PersonnelRole::AdminLogistics,
    PersonnelRole::AdminHr,
];

const CHASSIS: [&str; 8] = [
    "Locust LCT-1V",
    "Commando COM-2D",
    "Phoenix Hawk PXH-1",
    "Shadow Hawk SHD-2H",
    "Griffin GRF-1N",
    "Warhammer WHM-6R",
    "Marauder MAD-3R",
    "Atlas AS7-D",
];

/// A random full name drawn from the campaign stream.
pub fn random_name(state: &mut CampaignState) -> String {
    let given = state
        .random_index(GIVEN_NAMES.len())
        .and_then(|i| GIVEN_NAMES.get(i))
        .copied()
        .unwrap_or("Alexi");
    let family = state
        .random_index(FAMILY_NAMES.len())
        .and_then(|i| FAMILY_NAMES.get(i))
        .copied()
        .unwrap_or("Ambrose");
    format!("{given} {family}")
}

/// Expire and regenerate market listings.
pub fn refresh(state: &mut CampaignState, ctx: &TickContext) {
    let markets = &ctx.options.markets;

    if markets.personnel_market_enabled {
        state.applicants.retain(|applicant| applicant.expires_on >= ctx.today);
        if ctx.triggers.is_monday {
            let mut count = markets.applicants_per_week;
            if state.has_active_contract {
                count = count.saturating_add(1);
            }
            for _ in 0..count {
                let applicant = generate_applicant(state, ctx);
                state.applicants.push(applicant);
            }
            state.report(
                ReportCategory::Personnel,
                format!(
                    "{} applicants are available in the personnel market.",
                    state.applicants.len()
                ),
            );
        }
    }

    if markets.unit_market_enabled {
        state.unit_offers.retain(|offer| offer.expires_on >= ctx.today);
        if ctx.triggers.is_first_of_month {
            for _ in 0..markets.offers_per_month {
                let offer = generate_offer(state, ctx);
                state.unit_offers.push(offer);
            }
            state.report(
                ReportCategory::Acquisitions,
                format!("{} units are for sale in the unit market.", state.unit_offers.len()),
            );
        }
    }

    debug!(
        applicants = state.applicants.len(),
        offers = state.unit_offers.len(),
        "Markets refreshed"
    );
}

fn generate_applicant(state: &mut CampaignState, ctx: &TickContext) -> Applicant {
    let id = OfferId::from_random_bytes(state.mint_bytes());
    let name = random_name(state);
    let role = state
        .random_index(APPLICANT_ROLES.len())
        .and_then(|i| APPLICANT_ROLES.get(i))
        .copied()
        .unwrap_or(PersonnelRole::Soldier);
    Applicant {
        id,
        name,
        role,
        expires_on: ctx.days_from_today(ctx.options.markets.applicant_days),
    }
}

fn generate_offer(state: &mut CampaignState, ctx: &TickContext) -> UnitOffer {
    let id = OfferId::from_random_bytes(state.mint_bytes());
    let chassis = state
        .random_index(CHASSIS.len())
        .and_then(|i| CHASSIS.get(i))
        .copied()
        .unwrap_or("Locust LCT-1V");
    let price = state.random_between(1_000, 9_000);
    UnitOffer {
        id,
        chassis: String::from(chassis),
        price: Decimal::from(price).saturating_mul(Decimal::from(1_000)),
        expires_on: ctx.days_from_today(ctx.options.markets.offer_days),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::{CampaignOptions, OptionsSnapshot};
    use crate::triggers::TriggerFlags;
    use campaign_types::Location;
    use chrono::NaiveDate;

    fn context(options: &CampaignOptions, today: NaiveDate) -> TickContext {
        TickContext {
            yesterday: today.pred_opt().unwrap(),
            today,
            triggers: TriggerFlags::evaluate(today),
            options: OptionsSnapshot::capture(options),
            location: Location::planetside("Galatea", "MERC"),
        }
    }

    #[test]
    fn monday_generates_applicants_with_contract_bonus() {
        let options = CampaignOptions::default();
        let mut state = CampaignState::new(options.clone());
        state.has_active_contract = true;
        // 2025-09-01 is a Monday.
        let today = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();

        refresh(&mut state, &context(&options, today));
        assert_eq!(state.applicants.len(), 5);
        assert_eq!(state.unit_offers.len(), 3);
        assert!(state.applicants.iter().all(|a| a.expires_on > today));
    }

    #[test]
    fn expired_listings_are_dropped() {
        let options = CampaignOptions::default();
        let mut state = CampaignState::new(options.clone());
        let monday = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        refresh(&mut state, &context(&options, monday));

        let later = NaiveDate::from_ymd_opt(2025, 9, 20).unwrap();
        refresh(&mut state, &context(&options, later));
        assert!(state.applicants.is_empty());
        assert_eq!(state.unit_offers.len(), 3);
    }

    #[test]
    fn disabled_markets_are_untouched() {
        let mut options = CampaignOptions::default();
        options.markets.personnel_market_enabled = false;
        options.markets.unit_market_enabled = false;
        let mut state = CampaignState::new(options.clone());
        let monday = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        refresh(&mut state, &context(&options, monday));
        assert!(state.applicants.is_empty());
        assert!(state.reports().is_empty());
    }
}
