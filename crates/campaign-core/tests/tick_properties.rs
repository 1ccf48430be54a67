//! Behavioural properties of the daily tick, exercised end to end through
//! [`DayAdvancer`].

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use campaign_core::phases::Phase;
use campaign_core::phases::contracts::resolve_scenario;
use campaign_core::phases::maintenance::assign_repair;
use campaign_core::{
    CampaignOptions, CampaignState, DayAdvancer, PendingScenarioVeto, ReportSink, TickError,
    TickOutcome, TickStage, TickSummary,
};
use campaign_types::{
    Contract, ContractId, ContractMode, ContractStatus, MoraleLevel, Part, PartId, Person,
    PersonId, PersonnelRole, PersonnelStatus, ReportCategory, Scenario, ScenarioId,
    ScenarioStatus, Unit, UnitId,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn options_starting(start: NaiveDate) -> CampaignOptions {
    let mut options = CampaignOptions::default();
    options.campaign.start_date = start;
    options
}

fn person(state: &mut CampaignState, name: &str, role: PersonnelRole) -> PersonId {
    let person = Person::new(PersonId::new(), name, role, date(2990, 6, 15), date(2020, 1, 1));
    let id = person.id;
    state.add_person(person);
    id
}

fn unit(state: &mut CampaignState, name: &str, chassis: Option<&str>) -> UnitId {
    let unit = Unit::new(UnitId::new(), name, chassis.map(String::from));
    let id = unit.id;
    state.add_unit(unit);
    id
}

fn contract(start: NaiveDate, end: NaiveDate) -> Contract {
    Contract {
        id: ContractId::new(),
        name: String::from("Garrison Duty"),
        employer: String::from("FS"),
        enemy: String::from("CC"),
        clan_opponent: false,
        start,
        end,
        status: ContractStatus::Active,
        morale: MoraleLevel::Normal,
        monthly_payment: Decimal::from(25_000),
        ship_search_active: false,
        scenarios: Vec::new(),
    }
}

fn commit(advancer: &mut DayAdvancer, state: &mut CampaignState) -> TickSummary {
    match advancer.advance_one_day(state).expect("tick succeeds") {
        TickOutcome::Committed(summary) => summary,
        TickOutcome::Vetoed { reason } => panic!("unexpected veto: {reason}"),
    }
}

/// A campaign with enough moving parts to touch every phase.
fn busy_campaign(start: NaiveDate) -> CampaignState {
    let mut options = options_starting(start);
    options.contracts.mode = ContractMode::StratCon;
    options.medical.disease_enabled = true;
    options.logistics.auto_stock_up = true;
    options.logistics.maintenance_cycle_days = 2;
    let mut state = CampaignState::new(options);
    state.location.disease_risk = 5;

    let tech = person(&mut state, "Jenna Ambrose", PersonnelRole::Tech);
    person(&mut state, "Dr. Fong", PersonnelRole::Doctor);
    person(&mut state, "Quartermaster Drake", PersonnelRole::AdminLogistics);
    let pilot = person(&mut state, "Cassius Jaeger", PersonnelRole::MekWarrior);
    state.personnel.get_mut(&pilot).unwrap().hits = 2;
    state.personnel.get_mut(&pilot).unwrap().salary = Decimal::from(1_200);

    let griffin = unit(&mut state, "Griffin", Some("GRF-1N"));
    let shadow = unit(&mut state, "Shadow Hawk", Some("SHD-2H"));
    for id in [griffin, shadow] {
        state.units.get_mut(&id).unwrap().tech = Some(tech);
    }
    state.personnel.get_mut(&pilot).unwrap().unit = Some(griffin);

    let mut arm = Part::spare(PartId::new(), "Griffin arm", 3, 1);
    arm.unit = Some(griffin);
    let arm_id = arm.id;
    state.add_part(arm);
    assign_repair(&mut state, arm_id, tech, 700);

    state.add_contract(contract(start, date(3030, 1, 1)));
    state
}

// ---------------------------------------------------------------------------
// Clock and report channels
// ---------------------------------------------------------------------------

#[test]
fn committed_tick_advances_exactly_one_day() {
    let mut state = CampaignState::new(options_starting(date(2025, 12, 31)));
    let mut advancer = DayAdvancer::new();

    let summary = commit(&mut advancer, &mut state);
    assert_eq!(summary.previous_date, date(2025, 12, 31));
    assert_eq!(summary.date, date(2026, 1, 1));
    assert_eq!(state.today(), date(2026, 1, 1));
    assert!(summary.triggers.is_first_of_year);
}

#[test]
fn untouched_entities_are_unchanged() {
    let mut state = CampaignState::new(options_starting(date(3025, 3, 10)));
    let spare = Part::spare(PartId::new(), "Heat Sink", 4, 6);
    let spare_id = spare.id;
    state.add_part(spare);
    let before = state.parts[&spare_id].clone();

    commit(&mut DayAdvancer::new(), &mut state);
    assert_eq!(state.parts[&spare_id], before);
}

#[test]
fn report_channels_never_leak_across_ticks() {
    let mut state = CampaignState::new(options_starting(date(3025, 3, 10)));
    assert!(state.reports().is_empty());

    state.report(ReportCategory::Battle, "Written outside any tick");
    commit(&mut DayAdvancer::new(), &mut state);
    assert!(state.reports().entries(ReportCategory::Battle).is_empty());
}

#[test]
fn known_monday_sets_monday_flag() {
    // 2025-09-07 is a Sunday.
    let mut state = CampaignState::new(options_starting(date(2025, 9, 7)));
    let summary = commit(&mut DayAdvancer::new(), &mut state);
    assert!(summary.triggers.is_monday);

    // Same Monday reached after an out-of-band date change.
    let mut state = CampaignState::new(options_starting(date(3025, 1, 1)));
    state.clock.set_date(date(2025, 9, 7));
    let summary = commit(&mut DayAdvancer::new(), &mut state);
    assert!(summary.triggers.is_monday);
}

// ---------------------------------------------------------------------------
// Veto
// ---------------------------------------------------------------------------

#[test]
fn vetoed_tick_is_a_no_op() {
    let start = date(3025, 3, 10);
    let mut state = busy_campaign(start);
    state.turnover_log.push(String::from("Sgt. Hale has retired."));
    let scenario_id = ScenarioId::new();
    let contract = state.contracts.values_mut().next().unwrap();
    contract.scenarios.push(Scenario {
        id: scenario_id,
        name: String::from("Night Raid"),
        date: start,
        status: ScenarioStatus::Deployed,
        batchall_issued: false,
    });
    let before = state.snapshot();

    let mut advancer = DayAdvancer::new();
    advancer.listeners_mut().on_before_day(PendingScenarioVeto);
    let outcome = advancer.advance_one_day(&mut state).unwrap();

    assert!(matches!(outcome, TickOutcome::Vetoed { .. }));
    assert_eq!(state.today(), start);
    assert_eq!(state.snapshot(), before);

    assert!(resolve_scenario(&mut state, scenario_id, true));
    let summary = commit(&mut advancer, &mut state);
    assert_eq!(summary.date, date(3025, 3, 11));
}

// ---------------------------------------------------------------------------
// Fault isolation and maintenance ordering
// ---------------------------------------------------------------------------

#[test]
fn one_broken_unit_yields_one_diagnostic() {
    let mut options = options_starting(date(3025, 3, 10));
    options.logistics.maintenance_cycle_days = 1;
    let mut state = CampaignState::new(options);
    let tech = person(&mut state, "Jenna", PersonnelRole::Tech);
    let mut healthy = Vec::new();
    for name in ["Atlas", "Catapult", "Jenner", "Wasp"] {
        let id = unit(&mut state, name, Some(name));
        state.units.get_mut(&id).unwrap().tech = Some(tech);
        healthy.push(id);
    }
    let broken = unit(&mut state, "Orphan", None);
    state.units.get_mut(&broken).unwrap().tech = Some(tech);

    let summary = commit(&mut DayAdvancer::new(), &mut state);

    assert_eq!(summary.contained_failures, 1);
    let diagnostics: Vec<&String> = state
        .reports()
        .entries(ReportCategory::Technical)
        .iter()
        .filter(|entry| entry.starts_with("Could not process"))
        .collect();
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].contains("Orphan"));
    for id in healthy {
        let unit = &state.units[&id];
        assert_eq!(unit.days_since_maintenance, 0);
        assert_eq!(unit.engineer, Some(tech));
    }
}

#[test]
fn arriving_part_completes_its_task_the_same_day() {
    let mut state = CampaignState::new(options_starting(date(3025, 3, 10)));
    let tech = person(&mut state, "Jenna", PersonnelRole::Tech);
    let mut gyro = Part::spare(PartId::new(), "Gyro", 3, 1);
    gyro.days_to_arrival = 1;
    let gyro_id = gyro.id;
    state.add_part(gyro);
    assign_repair(&mut state, gyro_id, tech, 90);

    commit(&mut DayAdvancer::new(), &mut state);

    let gyro = &state.parts[&gyro_id];
    assert!(gyro.is_present());
    assert!(!gyro.damaged);
    assert!(gyro.assigned_tech.is_none());
    let technical = state.reports().entries(ReportCategory::Technical);
    assert!(technical.iter().any(|entry| entry == "Jenna has repaired Gyro."));
    let acquisitions = state.reports().entries(ReportCategory::Acquisitions);
    assert!(acquisitions.iter().any(|entry| entry.contains("Gyro")));
}

#[test]
fn purged_tech_leaves_no_dangling_repair_task() {
    let mut options = options_starting(date(3025, 3, 31));
    options.personnel.purge_departed_days = 10;
    let mut state = CampaignState::new(options);
    let tech = person(&mut state, "Old Hand", PersonnelRole::Tech);
    let retired = state.personnel.get_mut(&tech).unwrap();
    retired.status = PersonnelStatus::Retired;
    retired.departed_on = Some(date(3025, 1, 1));
    let mut gyro = Part::spare(PartId::new(), "Gyro", 3, 1);
    gyro.damaged = true;
    gyro.assigned_tech = Some(tech);
    gyro.repair_minutes_remaining = 600;
    let gyro_id = gyro.id;
    state.add_part(gyro);

    let mut advancer = DayAdvancer::new();
    for _ in 0..4 {
        let summary = commit(&mut advancer, &mut state);
        assert_eq!(summary.contained_failures, 0, "failure on {}", summary.date);
    }

    assert!(!state.personnel.contains_key(&tech));
    let gyro = &state.parts[&gyro_id];
    assert!(gyro.assigned_tech.is_none());
    assert!(gyro.damaged);
}

// ---------------------------------------------------------------------------
// Contract status
// ---------------------------------------------------------------------------

#[test]
fn contract_starting_today_is_active_before_the_markets_run() {
    // 2025-09-07 is a Sunday.
    let mut state = CampaignState::new(options_starting(date(2025, 9, 7)));
    let mut pending = contract(date(2025, 9, 8), date(2026, 3, 8));
    pending.status = ContractStatus::Pending;
    state.add_contract(pending);

    let summary = commit(&mut DayAdvancer::new(), &mut state);

    assert!(summary.triggers.is_monday);
    assert!(state.has_active_contract);
    assert!(state.contracts.values().all(|c| c.status == ContractStatus::Active));
    // Four weekly applicants plus one for the contract in force.
    assert_eq!(state.applicants.len(), 5);
    let battle = state.reports().entries(ReportCategory::Battle);
    assert!(battle.iter().any(|entry| entry == "Contract Garrison Duty has begun."));
}

// ---------------------------------------------------------------------------
// Phase failure
// ---------------------------------------------------------------------------

#[test]
fn rejected_ledger_entry_aborts_the_tick_with_the_clock_advanced() {
    let mut state = CampaignState::new(options_starting(date(3025, 3, 31)));
    let mut bad = contract(date(3025, 1, 1), date(3026, 1, 1));
    bad.monthly_payment = Decimal::from(-5_000);
    state.add_contract(bad);
    let opening = state.finances.balance();
    let mut advancer = DayAdvancer::new();

    let result = advancer.advance_one_day(&mut state);

    assert!(matches!(
        result,
        Err(TickError::Phase {
            phase: Phase::Finances,
            ..
        })
    ));
    assert_eq!(state.today(), date(3025, 4, 1));
    assert_eq!(advancer.stage(), TickStage::Advancing);
    assert_eq!(state.finances.balance(), opening);
}

// ---------------------------------------------------------------------------
// Determinism
// ---------------------------------------------------------------------------

#[test]
fn identical_state_and_seed_give_identical_days() {
    let first = busy_campaign(date(3025, 2, 20));
    let mut a = first.clone();
    let mut b = first;
    let mut advancer_a = DayAdvancer::new();
    let mut advancer_b = DayAdvancer::new();

    for _ in 0..45 {
        let summary_a = advancer_a.advance_one_day(&mut a).unwrap();
        let summary_b = advancer_b.advance_one_day(&mut b).unwrap();
        assert_eq!(summary_a, summary_b);
        assert_eq!(a.reports(), b.reports());
    }
    assert_eq!(a.snapshot(), b.snapshot());
}

// ---------------------------------------------------------------------------
// Calendar scenarios
// ---------------------------------------------------------------------------

#[test]
fn end_of_january_rolls_into_first_of_february() {
    // 2025-01-31 is a Friday.
    let mut options = options_starting(date(2025, 1, 31));
    options.finances.hospital_beds = 2;
    options.finances.bed_rent = 100;
    options.personnel.purge_departed_days = 30;
    let mut state = CampaignState::new(options);
    person(&mut state, "Brenna Castellan", PersonnelRole::Soldier);

    let summary = commit(&mut DayAdvancer::new(), &mut state);

    assert_eq!(summary.date, date(2025, 2, 1));
    assert!(summary.triggers.is_first_of_month);
    assert!(!summary.triggers.is_monday);
    for phase in [
        Phase::Dependents,
        Phase::Awards,
        Phase::Prisoners,
        Phase::FacilityRent,
        Phase::PurgePersonnel,
        Phase::FactionRelations,
    ] {
        let runs = summary.phases.iter().filter(|ran| **ran == phase).count();
        assert_eq!(runs, 1, "{phase:?} should run exactly once");
    }
    assert!(!summary.ran(Phase::WeeklyMedical));
    assert!(!summary.ran(Phase::BayRent));
    assert!(!summary.ran(Phase::StockUp));

    let finances = state.reports().entries(ReportCategory::Finances);
    assert!(finances.iter().any(|entry| entry.contains("facility rent")));
}

#[test]
fn monday_first_runs_weekly_before_monthly_in_fixed_order() {
    // 2025-08-31 is a Sunday; 2025-09-01 is a Monday.
    let mut state = busy_campaign(date(2025, 8, 31));
    let summary = commit(&mut DayAdvancer::new(), &mut state);

    assert!(summary.triggers.is_monday);
    assert!(summary.triggers.is_first_of_month);

    let order = [
        Phase::AdvanceClock,
        Phase::ClearReports,
        Phase::Travel,
        Phase::FacilityCapacity,
        Phase::Personnel,
        Phase::Disease,
        Phase::WeeklyMedical,
        Phase::Markets,
        Phase::Dependents,
        Phase::ContractLifecycle,
        Phase::Reputation,
        Phase::Awards,
        Phase::Prisoners,
        Phase::FacilityRent,
        Phase::BayRent,
        Phase::ResetLabor,
        Phase::MaintenanceTasks,
        Phase::MaintenanceUnits,
        Phase::Forces,
        Phase::Procurement,
        Phase::Finances,
        Phase::ResurfaceTurnover,
        Phase::StockUp,
        Phase::FactionStanding,
        Phase::FactionRelations,
        Phase::Notify,
    ];
    let positions: Vec<usize> = order
        .iter()
        .map(|phase| {
            summary
                .position(*phase)
                .unwrap_or_else(|| panic!("{phase:?} did not run"))
        })
        .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn month_of_days_pays_payroll_and_contract_once() {
    let mut state = busy_campaign(date(3025, 3, 15));
    state.options.contracts.morale_swing_percent = 0;
    let opening = state.finances.balance();
    let mut advancer = DayAdvancer::new();

    for _ in 0..30 {
        commit(&mut advancer, &mut state);
    }

    let received = state
        .finances
        .transactions()
        .iter()
        .filter(|tx| tx.description.contains("Garrison Duty"))
        .count();
    assert_eq!(received, 1);
    assert_ne!(state.finances.balance(), opening);
}
