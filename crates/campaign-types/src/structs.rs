//! Roster entity structs: people, units, parts, forces, contracts, and the
//! campaign's location and market listings.
//!
//! These are plain data. The day-advance pipeline in `campaign-core` owns
//! all mutation; helper methods here only answer questions about a single
//! entity.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::enums::{
    ContractStatus, FormationLevel, ForceIconStatus, MoraleLevel, MothballState, PersonnelRole,
    PersonnelStatus, RepairSite, ScenarioStatus,
};
use crate::ids::{ContractId, ForceId, OfferId, PartId, PersonId, ScenarioId, UnitId};

// ---------------------------------------------------------------------------
// Personnel
// ---------------------------------------------------------------------------

/// An active infection carried by a person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Infection {
    /// Disease name.
    pub name: String,
    /// Severity from 1 (mild) upward; the person dies past the fatal threshold.
    pub severity: u8,
}

/// Academy enrollment of a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    /// Academy name.
    pub academy: String,
    /// Date the course completes.
    pub graduation_date: NaiveDate,
}

/// A person on the campaign roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Unique identifier.
    pub id: PersonId,
    /// Full name.
    pub name: String,
    /// Primary role.
    pub role: PersonnelRole,
    /// Duty status.
    pub status: PersonnelStatus,
    /// Date of birth.
    pub birth_date: NaiveDate,
    /// Date the person joined the campaign.
    pub recruited_on: NaiveDate,
    /// Wounds; zero means healthy.
    pub hits: u8,
    /// Accumulated fatigue points.
    pub fatigue: u8,
    /// Unit this person crews or maintains, if any.
    pub unit: Option<UnitId>,
    /// Monthly salary.
    pub salary: Decimal,
    /// Technical labor minutes left today (technicians only).
    pub minutes_available: u32,
    /// Current infection, if any.
    pub infection: Option<Infection>,
    /// Academy enrollment while a student.
    pub enrollment: Option<Enrollment>,
    /// Awards already granted (by name).
    pub awards: BTreeSet<String>,
    /// Date the person left the campaign, once departed.
    pub departed_on: Option<NaiveDate>,
}

impl Person {
    /// Build an active, healthy person with no assignment.
    pub fn new(
        id: PersonId,
        name: impl Into<String>,
        role: PersonnelRole,
        birth_date: NaiveDate,
        recruited_on: NaiveDate,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            role,
            status: PersonnelStatus::Active,
            birth_date,
            recruited_on,
            hits: 0,
            fatigue: 0,
            unit: None,
            salary: Decimal::ZERO,
            minutes_available: 0,
            infection: None,
            enrollment: None,
            awards: BTreeSet::new(),
            departed_on: None,
        }
    }

    /// Age in whole years on `today`.
    ///
    /// Counts the birthday itself, including a leap-day birthday observed
    /// on February 28th.
    pub fn age_on(&self, today: NaiveDate) -> u32 {
        if self.is_birthday(today) {
            let years = today.year().saturating_sub(self.birth_date.year());
            return u32::try_from(years).unwrap_or(0);
        }
        today.years_since(self.birth_date).unwrap_or(0)
    }

    /// Whether `today` is this person's birthday.
    ///
    /// People born on February 29th celebrate on the 28th in common years.
    pub fn is_birthday(&self, today: NaiveDate) -> bool {
        let (month, day) = (self.birth_date.month(), self.birth_date.day());
        if month == 2 && day == 29 && NaiveDate::from_ymd_opt(today.year(), 2, 29).is_none() {
            return today.month() == 2 && today.day() == 28;
        }
        month == today.month() && day == today.day()
    }

    /// Whether the person is on duty.
    pub fn is_active(&self) -> bool {
        self.status == PersonnelStatus::Active
    }

    /// Whether the person is a working technician.
    pub fn is_working_tech(&self) -> bool {
        self.is_active() && self.role.is_tech()
    }
}

// ---------------------------------------------------------------------------
// Units
// ---------------------------------------------------------------------------

/// An in-progress refit of a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Refit {
    /// Name of the target configuration.
    pub target: String,
    /// Days of work remaining.
    pub days_remaining: u32,
}

/// An equipment unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Unique identifier.
    pub id: UnitId,
    /// Display name.
    pub name: String,
    /// Linked chassis record. Missing chassis data makes maintenance fail.
    pub chassis: Option<String>,
    /// Force the unit belongs to.
    pub force: Option<ForceId>,
    /// Technician responsible for the unit.
    pub tech: Option<PersonId>,
    /// Engineer assigned to the unit for the current day.
    pub engineer: Option<PersonId>,
    /// Where repairs take place.
    pub site: RepairSite,
    /// Days until the unit is delivered; zero once present.
    pub days_to_arrival: u32,
    /// Active refit, if any.
    pub refit: Option<Refit>,
    /// Mothball lifecycle.
    pub mothball: MothballState,
    /// Days since the last maintenance check.
    pub days_since_maintenance: u32,
    /// Quality grade, 0 (worst) to 5 (best).
    pub quality: u8,
    /// Destroyed beyond repair; removed from the roster by maintenance.
    pub unsalvageable: bool,
    /// Deployed to a scenario.
    pub deployed: bool,
    /// Occupying a rented repair bay.
    pub in_rented_bay: bool,
}

impl Unit {
    /// Build a present, active unit at an improvised repair site.
    pub fn new(id: UnitId, name: impl Into<String>, chassis: Option<String>) -> Self {
        Self {
            id,
            name: name.into(),
            chassis,
            force: None,
            tech: None,
            engineer: None,
            site: RepairSite::Improvised,
            days_to_arrival: 0,
            refit: None,
            mothball: MothballState::Active,
            days_since_maintenance: 0,
            quality: 3,
            unsalvageable: false,
            deployed: false,
            in_rented_bay: false,
        }
    }

    /// Whether the unit has been delivered.
    pub const fn is_present(&self) -> bool {
        self.days_to_arrival == 0
    }

    /// Whether the unit is in active service (not stored or in storage work).
    pub const fn is_in_service(&self) -> bool {
        matches!(self.mothball, MothballState::Active)
    }
}

// ---------------------------------------------------------------------------
// Parts
// ---------------------------------------------------------------------------

/// A part: installed on a unit, or a spare in the warehouse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    /// Unique identifier.
    pub id: PartId,
    /// Part name; spares with equal name and quality are interchangeable.
    pub name: String,
    /// Quality grade, 0 (worst) to 5 (best).
    pub quality: u8,
    /// Unit the part is installed on; `None` for spares.
    pub unit: Option<UnitId>,
    /// Stack size (spares only; installed parts are always 1).
    pub quantity: u32,
    /// Days until delivery; zero once present.
    pub days_to_arrival: u32,
    /// Needs repair.
    pub damaged: bool,
    /// Technician assigned to repair this part.
    pub assigned_tech: Option<PersonId>,
    /// Labor minutes left on the repair task.
    pub repair_minutes_remaining: u32,
    /// Unit price.
    pub cost: Decimal,
}

impl Part {
    /// Build an undamaged spare, present in the warehouse.
    pub fn spare(id: PartId, name: impl Into<String>, quality: u8, quantity: u32) -> Self {
        Self {
            id,
            name: name.into(),
            quality,
            unit: None,
            quantity,
            days_to_arrival: 0,
            damaged: false,
            assigned_tech: None,
            repair_minutes_remaining: 0,
            cost: Decimal::ZERO,
        }
    }

    /// Whether the part is a warehouse spare.
    pub const fn is_spare(&self) -> bool {
        self.unit.is_none()
    }

    /// Whether the part has been delivered.
    pub const fn is_present(&self) -> bool {
        self.days_to_arrival == 0
    }

    /// Whether a technician is working on this part.
    pub const fn has_assignment(&self) -> bool {
        self.assigned_tech.is_some()
    }

    /// Whether this spare can be stacked onto `other`.
    pub fn is_same_stock_as(&self, other: &Self) -> bool {
        self.is_spare()
            && other.is_spare()
            && self.is_present()
            && other.is_present()
            && !self.damaged
            && !other.damaged
            && !self.has_assignment()
            && !other.has_assignment()
            && self.quality == other.quality
            && self.name == other.name
    }
}

// ---------------------------------------------------------------------------
// Forces
// ---------------------------------------------------------------------------

/// A node in the table of organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Force {
    /// Unique identifier.
    pub id: ForceId,
    /// Display name.
    pub name: String,
    /// Parent force; `None` for a root.
    pub parent: Option<ForceId>,
    /// Units directly assigned.
    pub units: Vec<UnitId>,
    /// Derived formation level.
    pub formation: FormationLevel,
    /// Derived combat-team flag.
    pub combat_team: bool,
    /// Derived icon status.
    pub icon: ForceIconStatus,
}

impl Force {
    /// Build a force with no derived values computed yet.
    pub fn new(id: ForceId, name: impl Into<String>, parent: Option<ForceId>) -> Self {
        Self {
            id,
            name: name.into(),
            parent,
            units: Vec::new(),
            formation: FormationLevel::Lance,
            combat_team: false,
            icon: ForceIconStatus::Empty,
        }
    }
}

// ---------------------------------------------------------------------------
// Contracts
// ---------------------------------------------------------------------------

/// A scenario generated under a contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Unique identifier.
    pub id: ScenarioId,
    /// Display name.
    pub name: String,
    /// Day the scenario takes place.
    pub date: NaiveDate,
    /// Resolution status.
    pub status: ScenarioStatus,
    /// Whether a batchall has been issued for it.
    pub batchall_issued: bool,
}

/// An employment contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    /// Unique identifier.
    pub id: ContractId,
    /// Display name.
    pub name: String,
    /// Employer faction code.
    pub employer: String,
    /// Enemy faction code.
    pub enemy: String,
    /// Whether the opponent follows clan customs (batchalls).
    pub clan_opponent: bool,
    /// First day of the contract.
    pub start: NaiveDate,
    /// Last day of the contract.
    pub end: NaiveDate,
    /// Lifecycle status.
    pub status: ContractStatus,
    /// Enemy morale.
    pub morale: MoraleLevel,
    /// Paid on the first of each month while active.
    pub monthly_payment: Decimal,
    /// Whether the campaign is searching for a transport ship.
    pub ship_search_active: bool,
    /// Generated scenarios.
    pub scenarios: Vec<Scenario>,
}

impl Contract {
    /// Whether the contract is in force on `today`.
    pub fn is_active_on(&self, today: NaiveDate) -> bool {
        self.status == ContractStatus::Active && self.start <= today && today <= self.end
    }
}

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

/// A system on the campaign's jump path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Star system name.
    pub system: String,
    /// Controlling faction code.
    pub owner: String,
}

/// Where the campaign is and where it is going.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Current star system.
    pub system: String,
    /// Faction controlling the current system.
    pub owner: String,
    /// Whether the campaign is on the planet surface.
    pub on_planet: bool,
    /// Remaining systems to jump through, in order.
    pub jump_path: Vec<Waypoint>,
    /// Days until the current leg completes.
    pub transit_days: u32,
    /// Travel days per leg.
    pub days_per_leg: u32,
    /// Daily infection chance on this world, in percent.
    pub disease_risk: u8,
}

impl Location {
    /// A campaign sitting on a planet with nowhere to go.
    pub fn planetside(system: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            owner: owner.into(),
            on_planet: true,
            jump_path: Vec::new(),
            transit_days: 0,
            days_per_leg: 7,
            disease_risk: 0,
        }
    }

    /// Whether the campaign is travelling.
    pub const fn is_travelling(&self) -> bool {
        !self.on_planet || !self.jump_path.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Markets and logistics
// ---------------------------------------------------------------------------

/// A recruit available in the personnel market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applicant {
    /// Listing identifier.
    pub id: OfferId,
    /// Applicant name.
    pub name: String,
    /// Role sought.
    pub role: PersonnelRole,
    /// Last day the listing is open.
    pub expires_on: NaiveDate,
}

/// A unit for sale in the unit market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitOffer {
    /// Listing identifier.
    pub id: OfferId,
    /// Chassis offered.
    pub chassis: String,
    /// Asking price.
    pub price: Decimal,
    /// Last day the listing is open.
    pub expires_on: NaiveDate,
}

/// An item waiting to be procured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingItem {
    /// Part name.
    pub name: String,
    /// Quantity still wanted.
    pub quantity: u32,
    /// Unit price.
    pub cost: Decimal,
}

/// Standing faction regard tracked by the campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionStanding {
    /// Faction code.
    pub faction: String,
    /// Regard score; positive is favourable.
    pub regard: i32,
    /// Whether the faction has censured the campaign.
    pub censured: bool,
    /// Accolades received.
    pub accolades: u32,
}

impl FactionStanding {
    /// Neutral standing with `faction`.
    pub fn neutral(faction: impl Into<String>) -> Self {
        Self {
            faction: faction.into(),
            regard: 0,
            censured: false,
            accolades: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
    }

    #[test]
    fn age_and_birthday() {
        let person = Person::new(
            PersonId::new(),
            "Ada",
            PersonnelRole::Tech,
            date(3000, 3, 15),
            date(3020, 1, 1),
        );
        assert_eq!(person.age_on(date(3025, 3, 14)), 24);
        assert_eq!(person.age_on(date(3025, 3, 15)), 25);
        assert!(person.is_birthday(date(3025, 3, 15)));
        assert!(person.is_working_tech());
    }

    #[test]
    fn leap_day_birthday_falls_on_the_28th_in_common_years() {
        let person = Person::new(
            PersonId::new(),
            "Leap",
            PersonnelRole::MekWarrior,
            date(3004, 2, 29),
            date(3020, 1, 1),
        );
        assert!(person.is_birthday(date(3025, 2, 28)));
        assert!(!person.is_birthday(date(3025, 3, 1)));
        assert_eq!(person.age_on(date(3025, 2, 28)), 21);
        assert_eq!(person.age_on(date(3025, 2, 27)), 20);

        assert!(!person.is_birthday(date(3028, 2, 28)));
        assert!(person.is_birthday(date(3028, 2, 29)));
        assert_eq!(person.age_on(date(3028, 2, 29)), 24);
    }

    #[test]
    fn spares_stack_only_when_interchangeable() {
        let a = Part::spare(PartId::new(), "Actuator", 3, 1);
        let mut b = Part::spare(PartId::new(), "Actuator", 3, 2);
        assert!(a.is_same_stock_as(&b));

        b.days_to_arrival = 2;
        assert!(!a.is_same_stock_as(&b));

        b.days_to_arrival = 0;
        b.quality = 4;
        assert!(!a.is_same_stock_as(&b));
    }

    #[test]
    fn contract_activity_window() {
        let contract = Contract {
            id: ContractId::new(),
            name: String::from("Garrison"),
            employer: String::from("FS"),
            enemy: String::from("CC"),
            clan_opponent: false,
            start: date(3025, 1, 1),
            end: date(3025, 6, 30),
            status: ContractStatus::Active,
            morale: MoraleLevel::Normal,
            monthly_payment: Decimal::ZERO,
            ship_search_active: false,
            scenarios: Vec::new(),
        };
        assert!(contract.is_active_on(date(3025, 1, 1)));
        assert!(contract.is_active_on(date(3025, 6, 30)));
        assert!(!contract.is_active_on(date(3025, 7, 1)));
    }

    #[test]
    fn planetside_location_is_not_travelling() {
        let location = Location::planetside("Galax", "FS");
        assert!(!location.is_travelling());
    }
}
