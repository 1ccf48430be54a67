//! Starting roster for a fresh campaign.
//!
//! Builds a single reinforced lance with its support staff, a warehouse of
//! spares and one garrison contract. Every identifier is drawn from the
//! campaign's random stream, so the same seed always produces the same
//! roster.

use campaign_core::CampaignState;
use campaign_core::config::CampaignOptions;
use campaign_types::{
    Contract, ContractId, ContractStatus, Enrollment, Force, ForceId, MoraleLevel, Part, PartId,
    Person, PersonId, PersonnelRole, PersonnelStatus, ShoppingItem, Unit, UnitId,
};
use chrono::{Datelike, Days, Months, NaiveDate};
use rust_decimal::Decimal;
use tracing::info;

// -----------------------------------------------------------------------
// Roster tables
// -----------------------------------------------------------------------

/// (name, role, age in years, monthly salary).
const STAFF: &[(&str, PersonnelRole, u32, i64)] = &[
    ("Vera Kowalczyk", PersonnelRole::MekWarrior, 32, 1_500),
    ("Aldric Moss", PersonnelRole::MekWarrior, 48, 1_500),
    ("Daniel Ashby", PersonnelRole::MekWarrior, 29, 1_200),
    ("Kai Hollis", PersonnelRole::MekWarrior, 23, 1_200),
    ("Mara Okonkwo", PersonnelRole::Tech, 41, 800),
    ("Piet Vandermeer", PersonnelRole::Tech, 64, 800),
    ("Dr. Ilse Brandt", PersonnelRole::Doctor, 52, 1_000),
    ("Tomas Reyes", PersonnelRole::AdminLogistics, 37, 600),
    ("Yuki Tanaka", PersonnelRole::AdminHr, 35, 600),
];

/// (name, chassis).
const LANCE: &[(&str, &str)] = &[
    ("Hammerfall", "Archer ARC-2R"),
    ("Red Fury", "Marauder MAD-3R"),
    ("Longshot", "Rifleman RFL-3N"),
    ("Scout", "Jenner JR7-D"),
];

fn next_person(state: &mut CampaignState) -> PersonId {
    PersonId::from_random_bytes(state.mint_bytes())
}

fn years_before(date: NaiveDate, years: u32) -> NaiveDate {
    date.with_year(date.year().saturating_sub(i32::try_from(years).unwrap_or(0)))
        .unwrap_or(date)
}

/// Build the starting campaign for `options`.
pub fn starting_campaign(options: CampaignOptions) -> CampaignState {
    let mut state = CampaignState::new(options);
    let today = state.today();

    // Staggered birthdays, so a few fall early in the campaign.
    let mut techs = Vec::new();
    let mut pilots = Vec::new();
    for (index, (name, role, age, salary)) in STAFF.iter().enumerate() {
        let id = next_person(&mut state);
        let offset = u64::try_from(index).unwrap_or(0).saturating_mul(11);
        let born = years_before(today, *age)
            .checked_add_days(Days::new(offset))
            .unwrap_or(today);
        let recruited = years_before(today, 2);
        let mut person = Person::new(id, *name, *role, born, recruited);
        person.salary = Decimal::from(*salary);
        match role {
            PersonnelRole::Tech => techs.push(id),
            PersonnelRole::MekWarrior => pilots.push(id),
            _ => {}
        }
        state.add_person(person);
    }

    let student_id = next_person(&mut state);
    let mut student = Person::new(
        student_id,
        "Cadet Lena Ross",
        PersonnelRole::MekWarrior,
        years_before(today, 19),
        today,
    );
    student.status = PersonnelStatus::Student;
    student.enrollment = Some(Enrollment {
        academy: String::from("Sanglamore Academy"),
        graduation_date: today.checked_add_days(Days::new(20)).unwrap_or(today),
    });
    state.add_person(student);

    let prisoner_id = next_person(&mut state);
    let mut prisoner = Person::new(
        prisoner_id,
        "Captured Pilot Chen Wei",
        PersonnelRole::MekWarrior,
        years_before(today, 27),
        today,
    );
    prisoner.status = PersonnelStatus::Prisoner;
    state.add_person(prisoner);

    // The lance, maintained by the two techs in turn.
    let mut lance_units = Vec::new();
    for (index, (name, chassis)) in LANCE.iter().enumerate() {
        let id = UnitId::from_random_bytes(state.mint_bytes());
        let mut unit = Unit::new(id, *name, Some(String::from(*chassis)));
        unit.tech = techs.get(index % 2).copied();
        unit.days_since_maintenance = u32::try_from(index).unwrap_or(0);
        if let Some(pilot) = pilots.get(index).and_then(|p| state.personnel.get_mut(p)) {
            pilot.unit = Some(id);
        }
        state.add_unit(unit);
        lance_units.push(id);
    }

    let company = Force::new(
        ForceId::from_random_bytes(state.mint_bytes()),
        "Headquarters Company",
        None,
    );
    let lance = Force::new(
        ForceId::from_random_bytes(state.mint_bytes()),
        "Command Lance",
        Some(company.id),
    );
    state.add_force(company, &[]);
    state.add_force(lance, &lance_units);

    // A damaged actuator on the Archer, already assigned for repair.
    if let (Some(unit), Some(tech)) = (lance_units.first(), techs.first()) {
        let mut actuator = Part::spare(
            PartId::from_random_bytes(state.mint_bytes()),
            "Lower Arm Actuator",
            3,
            1,
        );
        actuator.unit = Some(*unit);
        actuator.damaged = true;
        actuator.assigned_tech = Some(*tech);
        actuator.repair_minutes_remaining = 600;
        state.add_part(actuator);
    }

    for (name, quantity) in [("Medium Laser", 4), ("Heat Sink", 6), ("Armor Plate", 20)] {
        let id = PartId::from_random_bytes(state.mint_bytes());
        state.add_part(Part::spare(id, name, 3, quantity));
    }
    state.shopping_list.push(ShoppingItem {
        name: String::from("Gyro"),
        quantity: 1,
        cost: Decimal::from(30_000),
    });

    let contract_id = ContractId::from_random_bytes(state.mint_bytes());
    state.add_contract(Contract {
        id: contract_id,
        name: String::from("Garrison of Helm"),
        employer: String::from("FS"),
        enemy: String::from("CC"),
        clan_opponent: false,
        start: today,
        end: today.checked_add_months(Months::new(6)).unwrap_or(today),
        status: ContractStatus::Active,
        morale: MoraleLevel::Normal,
        monthly_payment: Decimal::from(120_000),
        ship_search_active: false,
        scenarios: Vec::new(),
    });

    info!(
        personnel = state.personnel.len(),
        units = state.units.len(),
        parts = state.parts.len(),
        "Starting roster created"
    );
    state
}
