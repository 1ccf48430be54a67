//! Contract and scenario lifecycle.
//!
//! Pending contracts start during the daily status refresh, before the
//! markets run. The lifecycle itself runs only when a contract-driven mode
//! is enabled, and its sub-steps are ordered by their own calendar triggers:
//!
//! 1. Monday: ship search, enemy morale check, resupply, scenario generation.
//! 2. Daily: scenario deployment, then batchalls for newly deployed
//!    scenarios, then completion of contracts past their end date.
//! 3. First of month: early termination when morale hits an extreme.
//!
//! The active-contract flag is recounted once the lifecycle has finished.

use campaign_types::{
    ContractId, ContractStatus, MoraleLevel, Part, PartId, PersonnelRole, ReportCategory,
    Scenario, ScenarioId, ScenarioStatus,
};
use tracing::{debug, info};

use super::TickContext;
use crate::report::ReportSink;
use crate::state::CampaignState;

const RESUPPLY_CRATE: &str = "Resupply crate";

/// Run the contract lifecycle for today.
pub fn run_lifecycle(state: &mut CampaignState, ctx: &TickContext) {
    if ctx.triggers.is_monday {
        search_for_ships(state, ctx);
        check_morale(state, ctx);
        resupply(state, ctx);
        generate_scenarios(state, ctx);
    }

    deploy_scenarios(state, ctx);
    if ctx.options.contracts.batchalls {
        issue_batchalls(state);
    }
    complete_expired(state, ctx);

    if ctx.triggers.is_first_of_month {
        check_early_termination(state);
    }
    recount_active(state, ctx);
}

/// Start pending contracts whose start date has come, then record whether
/// any contract is in force today.
///
/// Returns the start notices. The caller writes them once the report
/// channels have been cleared.
pub fn refresh_active_status(state: &mut CampaignState, ctx: &TickContext) -> Vec<String> {
    let started = activate_pending(state, ctx);
    recount_active(state, ctx);
    started
}

fn recount_active(state: &mut CampaignState, ctx: &TickContext) {
    state.has_active_contract = state
        .contracts
        .values()
        .any(|contract| contract.is_active_on(ctx.today));
}

/// Contracts in force today, in ID order.
fn active_contracts(state: &CampaignState, ctx: &TickContext) -> Vec<ContractId> {
    state
        .contracts
        .values()
        .filter(|contract| contract.is_active_on(ctx.today))
        .map(|contract| contract.id)
        .collect()
}

fn activate_pending(state: &mut CampaignState, ctx: &TickContext) -> Vec<String> {
    let mut notices = Vec::new();
    for contract in state.contracts.values_mut() {
        if contract.status == ContractStatus::Pending && contract.start <= ctx.today {
            contract.status = ContractStatus::Active;
            info!(contract = %contract.name, "Contract started");
            notices.push(format!("Contract {} has begun.", contract.name));
        }
    }
    notices
}

fn search_for_ships(state: &mut CampaignState, ctx: &TickContext) {
    let searching: Vec<ContractId> = state
        .contracts
        .values()
        .filter(|contract| contract.ship_search_active)
        .map(|contract| contract.id)
        .collect();

    for id in searching {
        if !state.roll_percent(ctx.options.contracts.ship_search_percent) {
            continue;
        }
        let Some(contract) = state.contracts.get_mut(&id) else {
            continue;
        };
        contract.ship_search_active = false;
        let notice = format!("A transport ship has been found for {}.", contract.name);
        state.report(ReportCategory::General, notice);
    }
}

fn check_morale(state: &mut CampaignState, ctx: &TickContext) {
    for id in active_contracts(state, ctx) {
        if !state.roll_percent(ctx.options.contracts.morale_swing_percent) {
            continue;
        }
        let rising = state.roll_percent(50);
        let Some(contract) = state.contracts.get_mut(&id) else {
            continue;
        };
        let before = contract.morale;
        contract.morale = if rising {
            before.higher()
        } else {
            before.lower()
        };
        if contract.morale != before {
            let notice = format!(
                "Enemy morale on {} is now {:?}.",
                contract.name, contract.morale
            );
            state.report(ReportCategory::Battle, notice);
        }
    }
}

fn resupply(state: &mut CampaignState, ctx: &TickContext) {
    let active = active_contracts(state, ctx);
    if active.is_empty() {
        return;
    }
    if !state.has_active(PersonnelRole::AdminLogistics) {
        state.report(
            ReportCategory::Acquisitions,
            "No logistics administrator is available; this week's resupply is skipped.",
        );
        return;
    }

    for id in active {
        let Some(name) = state.contracts.get(&id).map(|c| c.name.clone()) else {
            continue;
        };
        let mut part = Part::spare(
            PartId::from_random_bytes(state.mint_bytes()),
            RESUPPLY_CRATE,
            3,
            1,
        );
        part.days_to_arrival = ctx.options.logistics.delivery_days;
        state.add_part(part);
        state.report(
            ReportCategory::Acquisitions,
            format!("Resupply for {name} is on its way."),
        );
    }
}

fn generate_scenarios(state: &mut CampaignState, ctx: &TickContext) {
    for id in active_contracts(state, ctx) {
        let offset = state.random_between(0, 6);
        let scenario_id = ScenarioId::from_random_bytes(state.mint_bytes());
        let date = ctx.days_from_today(offset);
        let Some(contract) = state.contracts.get_mut(&id) else {
            continue;
        };
        let number = contract.scenarios.len().saturating_add(1);
        let scenario = Scenario {
            id: scenario_id,
            name: format!("{} engagement {number}", contract.name),
            date,
            status: ScenarioStatus::Pending,
            batchall_issued: false,
        };
        let notice = format!("New scenario {} scheduled for {date}.", scenario.name);
        contract.scenarios.push(scenario);
        state.report(ReportCategory::Battle, notice);
    }
}

fn deploy_scenarios(state: &mut CampaignState, ctx: &TickContext) {
    let mut notices = Vec::new();
    for contract in state.contracts.values_mut() {
        for scenario in &mut contract.scenarios {
            if scenario.status == ScenarioStatus::Pending && scenario.date == ctx.today {
                scenario.status = ScenarioStatus::Deployed;
                notices.push(format!("Forces deploy for {}.", scenario.name));
            }
        }
    }
    for notice in notices {
        state.report(ReportCategory::Battle, notice);
    }
}

fn issue_batchalls(state: &mut CampaignState) {
    let mut notices = Vec::new();
    for contract in state.contracts.values_mut() {
        if !contract.clan_opponent {
            continue;
        }
        for scenario in &mut contract.scenarios {
            if scenario.status == ScenarioStatus::Deployed && !scenario.batchall_issued {
                scenario.batchall_issued = true;
                notices.push(format!(
                    "{} issues a batchall for {}.",
                    contract.enemy, scenario.name
                ));
            }
        }
    }
    for notice in notices {
        state.report(ReportCategory::Battle, notice);
    }
}

fn complete_expired(state: &mut CampaignState, ctx: &TickContext) {
    let mut notices = Vec::new();
    for contract in state.contracts.values_mut() {
        if contract.status == ContractStatus::Active && contract.end < ctx.today {
            contract.status = ContractStatus::Completed;
            info!(contract = %contract.name, "Contract completed");
            notices.push(format!("Contract {} has been completed.", contract.name));
        }
    }
    for notice in notices {
        state.report(ReportCategory::Battle, notice);
    }
}

fn check_early_termination(state: &mut CampaignState) {
    let mut notices = Vec::new();
    for contract in state.contracts.values_mut() {
        if contract.status != ContractStatus::Active {
            continue;
        }
        match contract.morale {
            MoraleLevel::Rout => {
                contract.status = ContractStatus::Completed;
                notices.push(format!(
                    "The enemy has been routed; contract {} ends early.",
                    contract.name
                ));
            }
            MoraleLevel::Overwhelming => {
                contract.status = ContractStatus::Breached;
                notices.push(format!(
                    "The enemy is overwhelming; contract {} has been terminated.",
                    contract.name
                ));
            }
            _ => {}
        }
    }
    for notice in notices {
        state.report(ReportCategory::Battle, notice);
    }
}

/// Record the result of a scenario.
///
/// A victory lowers enemy morale, a defeat raises it. Returns `false` when
/// no unresolved scenario with that ID exists.
pub fn resolve_scenario(state: &mut CampaignState, scenario: ScenarioId, victory: bool) -> bool {
    for contract in state.contracts.values_mut() {
        let Some(found) = contract
            .scenarios
            .iter_mut()
            .find(|s| s.id == scenario && s.status.is_unresolved())
        else {
            continue;
        };
        found.status = if victory {
            ScenarioStatus::Victory
        } else {
            ScenarioStatus::Defeat
        };
        contract.morale = if victory {
            contract.morale.lower()
        } else {
            contract.morale.higher()
        };
        debug!(%scenario, victory, "Scenario resolved");
        return true;
    }
    false
}
