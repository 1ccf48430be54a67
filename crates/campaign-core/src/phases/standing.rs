//! Reputation, faction standing and inter-faction relations.

use campaign_types::{ContractStatus, FactionStanding, ReportCategory};
use tracing::{debug, info};

use super::TickContext;
use crate::report::ReportSink;
use crate::state::{CampaignState, Reputation};

/// Recompute the reputation score and letter rating.
///
/// Completed contracts add five points, breached ones cost ten, and every
/// four operational units add one.
pub fn recompute_reputation(state: &mut CampaignState) {
    let (completed, breached) =
        state
            .contracts
            .values()
            .fold((0_i32, 0_i32), |(done, broken), contract| match contract.status {
                ContractStatus::Completed => (done.saturating_add(1), broken),
                ContractStatus::Breached => (done, broken.saturating_add(1)),
                ContractStatus::Pending | ContractStatus::Active => (done, broken),
            });
    let operational = state
        .units
        .values()
        .filter(|unit| unit.is_present() && unit.is_in_service() && !unit.unsalvageable)
        .count();
    let readiness = i32::try_from(operational / 4).unwrap_or(i32::MAX);

    let score = completed
        .saturating_mul(5)
        .saturating_sub(breached.saturating_mul(10))
        .saturating_add(readiness);
    let rating = match score {
        40.. => 'A',
        25..=39 => 'B',
        10..=24 => 'C',
        0..=9 => 'D',
        _ => 'F',
    };

    if rating != state.reputation.rating {
        info!(score, %rating, "Reputation rating changed");
        state.report(
            ReportCategory::General,
            format!("The unit's reputation rating is now {rating}."),
        );
    }
    state.reputation = Reputation { score, rating };
}

/// Daily and calendar-gated faction standing checks.
///
/// Employers gain regard every day a contract is in force. Mondays check
/// for censure, the first of the year delivers ultimatums from factions at
/// the floor, and the first of the month grants accolades and lets regard
/// drift toward neutral.
pub fn check_faction_standing(state: &mut CampaignState, ctx: &TickContext) {
    let factions = &ctx.options.factions;
    let employers: Vec<String> = state
        .contracts
        .values()
        .filter(|contract| contract.is_active_on(ctx.today))
        .map(|contract| contract.employer.clone())
        .collect();

    let ceiling = factions.accolade_threshold.saturating_mul(2);
    for employer in employers {
        let standing = state
            .standings
            .entry(employer.clone())
            .or_insert_with(|| FactionStanding::neutral(employer));
        standing.regard = standing
            .regard
            .saturating_add(factions.employer_daily_regard)
            .min(ceiling)
            .max(factions.regard_floor);
    }

    let mut notices = Vec::new();
    for standing in state.standings.values_mut() {
        let censurable = !standing.censured && standing.regard <= factions.censure_threshold;
        if ctx.triggers.is_monday && censurable {
            standing.censured = true;
            notices.push(format!("{} has formally censured the unit.", standing.faction));
        }

        if ctx.triggers.is_first_of_year && standing.regard <= factions.regard_floor {
            notices.push(format!(
                "{} has issued an ultimatum: leave its space or face the consequences.",
                standing.faction
            ));
        }

        if ctx.triggers.is_first_of_month {
            if standing.regard >= factions.accolade_threshold {
                standing.accolades = standing.accolades.saturating_add(1);
                notices.push(format!("{} has granted the unit an accolade.", standing.faction));
            }
            standing.regard = drift_toward_zero(standing.regard, factions.climate_drift);
            if standing.censured && standing.regard > factions.censure_threshold {
                standing.censured = false;
            }
        }
    }

    for notice in notices {
        state.report(ReportCategory::Politics, notice);
    }
    debug!(factions = state.standings.len(), "Faction standing checked");
}

const fn drift_toward_zero(regard: i32, drift: i32) -> i32 {
    if regard > 0 {
        let next = regard.saturating_sub(drift);
        if next < 0 { 0 } else { next }
    } else if regard < 0 {
        let next = regard.saturating_add(drift);
        if next > 0 { 0 } else { next }
    } else {
        0
    }
}

/// Monthly bulletin on the relations between every pair of tracked factions.
pub fn report_faction_relations(state: &mut CampaignState) {
    let standings: Vec<(String, i32)> = state
        .standings
        .values()
        .map(|standing| (standing.faction.clone(), standing.regard))
        .collect();

    let mut notices = Vec::new();
    for (position, (first, first_regard)) in standings.iter().enumerate() {
        for (second, second_regard) in standings.iter().skip(position.saturating_add(1)) {
            let climate = match (first_regard.signum(), second_regard.signum()) {
                (1, 1) => "cordial",
                (-1, -1) => "hostile",
                (0, 0) => "neutral",
                _ => "tense",
            };
            notices.push(format!("Relations between {first} and {second} are {climate}."));
        }
    }
    for notice in notices {
        state.report(ReportCategory::Politics, notice);
    }
}
