//! The mutable campaign state threaded through every phase of a tick.
//!
//! [`CampaignState`] bundles the clock, the entity roster, finances,
//! standings, markets, the per-tick report channels and the random number
//! stream. It is passed explicitly by `&mut` to each phase; there is no
//! global state, so several campaigns can be simulated side by side in one
//! process.

use std::collections::BTreeMap;

use campaign_finances::Finances;
use campaign_types::{
    Applicant, Contract, ContractId, Force, ForceId, FactionStanding, Location, Part, PartId,
    Person, PersonId, PersonnelRole, ReportCategory, ShoppingItem, Unit, UnitId, UnitOffer,
};
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::clock::SimulationClock;
use crate::config::CampaignOptions;
use crate::isolation::FailureSink;
use crate::report::{ReportChannels, ReportSink};

/// Sizes of the automated labor pools.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaborPools {
    /// Astechs supporting technicians.
    pub astechs: u32,
    /// Medics supporting doctors.
    pub medics: u32,
}

/// Facility capacity derived from the roster at the start of each tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityCapacity {
    /// Patients that can be treated today.
    pub hospital_beds: u32,
    /// Patients already treated today.
    pub beds_in_use: u32,
    /// Technical labor minutes available across all technicians.
    pub tech_minutes: u32,
}

/// Reputation derived from contract history and force readiness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reputation {
    /// Raw score.
    pub score: i32,
    /// Letter rating.
    pub rating: char,
}

impl Default for Reputation {
    fn default() -> Self {
        Self {
            score: 0,
            rating: 'D',
        }
    }
}

/// Complete simulation state for one campaign.
#[derive(Debug, Clone)]
pub struct CampaignState {
    /// Campaign (unit) name.
    pub name: String,
    /// Date the campaign was founded.
    pub founded_on: NaiveDate,
    /// Faction the campaign belongs to.
    pub faction: String,
    /// The campaign date.
    pub clock: SimulationClock,
    /// Live options; a snapshot is taken at the start of each tick.
    pub options: CampaignOptions,
    /// Personnel roster.
    pub personnel: BTreeMap<PersonId, Person>,
    /// Equipment units.
    pub units: BTreeMap<UnitId, Unit>,
    /// Installed and spare parts.
    pub parts: BTreeMap<PartId, Part>,
    /// Table of organization.
    pub forces: BTreeMap<ForceId, Force>,
    /// Contracts, past and present.
    pub contracts: BTreeMap<ContractId, Contract>,
    /// Where the campaign is.
    pub location: Location,
    /// Finance ledger.
    pub finances: Finances,
    /// Standing with each tracked faction, keyed by faction code.
    pub standings: BTreeMap<String, FactionStanding>,
    /// Reputation rating.
    pub reputation: Reputation,
    /// Personnel market listings.
    pub applicants: Vec<Applicant>,
    /// Unit market listings.
    pub unit_offers: Vec<UnitOffer>,
    /// Items waiting to be procured.
    pub shopping_list: Vec<ShoppingItem>,
    /// Automated labor pools.
    pub pools: LaborPools,
    /// Derived facility capacity.
    pub capacity: FacilityCapacity,
    /// Whether any contract is in force today.
    pub has_active_contract: bool,
    /// Turnover and retirement notices accumulated since the last tick.
    pub turnover_log: Vec<String>,
    reports: ReportChannels,
    contained_failures: u32,
    rng: StdRng,
}

impl CampaignState {
    /// Build an empty campaign from `options`.
    ///
    /// The clock starts at `campaign.start_date`, the ledger holds
    /// `campaign.starting_funds`, and the random stream is seeded from
    /// `campaign.seed`.
    pub fn new(options: CampaignOptions) -> Self {
        let section = &options.campaign;
        let start = section.start_date;
        let finances =
            Finances::with_opening_balance(start, Decimal::from(section.starting_funds))
                .unwrap_or_default();

        Self {
            name: section.name.clone(),
            founded_on: start,
            faction: section.faction.clone(),
            clock: SimulationClock::new(start),
            location: Location::planetside(
                section.home_system.clone(),
                section.home_owner.clone(),
            ),
            rng: StdRng::seed_from_u64(section.seed),
            options,
            personnel: BTreeMap::new(),
            units: BTreeMap::new(),
            parts: BTreeMap::new(),
            forces: BTreeMap::new(),
            contracts: BTreeMap::new(),
            finances,
            standings: BTreeMap::new(),
            reputation: Reputation::default(),
            applicants: Vec::new(),
            unit_offers: Vec::new(),
            shopping_list: Vec::new(),
            pools: LaborPools::default(),
            capacity: FacilityCapacity::default(),
            has_active_contract: false,
            turnover_log: Vec::new(),
            reports: ReportChannels::new(),
            contained_failures: 0,
        }
    }

    /// Current campaign date.
    pub const fn today(&self) -> NaiveDate {
        self.clock.date()
    }

    /// Report channels of the most recent tick.
    pub const fn reports(&self) -> &ReportChannels {
        &self.reports
    }

    /// Entity failures contained since the last call to
    /// [`CampaignState::take_contained_failures`].
    pub const fn contained_failures(&self) -> u32 {
        self.contained_failures
    }

    /// Return and reset the contained failure counter.
    pub const fn take_contained_failures(&mut self) -> u32 {
        let count = self.contained_failures;
        self.contained_failures = 0;
        count
    }

    /// Add a person to the roster.
    pub fn add_person(&mut self, person: Person) {
        self.personnel.insert(person.id, person);
    }

    /// Add a unit to the roster.
    pub fn add_unit(&mut self, unit: Unit) {
        self.units.insert(unit.id, unit);
    }

    /// Add a part to the warehouse or a unit.
    pub fn add_part(&mut self, part: Part) {
        self.parts.insert(part.id, part);
    }

    /// Add a force, linking `units` to it.
    pub fn add_force(&mut self, mut force: Force, units: &[UnitId]) {
        for unit_id in units {
            if let Some(unit) = self.units.get_mut(unit_id) {
                unit.force = Some(force.id);
                force.units.push(*unit_id);
            }
        }
        self.forces.insert(force.id, force);
    }

    /// Add a contract.
    pub fn add_contract(&mut self, contract: Contract) {
        self.contracts.insert(contract.id, contract);
    }

    /// Number of active personnel matching `predicate`.
    pub fn count_active(&self, predicate: impl Fn(PersonnelRole) -> bool) -> u32 {
        let count = self
            .personnel
            .values()
            .filter(|person| person.is_active() && predicate(person.role))
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Whether an active person fills `role`.
    pub fn has_active(&self, role: PersonnelRole) -> bool {
        self.personnel
            .values()
            .any(|person| person.is_active() && person.role == role)
    }

    /// Clear every technician, engineer and repair assignment held by
    /// `people`, leaving the work free to be reassigned.
    ///
    /// Returns how many units and parts lost an assignment.
    pub fn release_assignments(&mut self, people: &[PersonId]) -> usize {
        let held = |holder: Option<PersonId>| holder.is_some_and(|id| people.contains(&id));
        let mut released = 0_usize;
        for unit in self.units.values_mut() {
            let before = (unit.tech, unit.engineer);
            if held(unit.tech) {
                unit.tech = None;
            }
            if held(unit.engineer) {
                unit.engineer = None;
            }
            if (unit.tech, unit.engineer) != before {
                released = released.saturating_add(1);
            }
        }
        for part in self.parts.values_mut() {
            if held(part.assigned_tech) {
                part.assigned_tech = None;
                released = released.saturating_add(1);
            }
        }
        released
    }

    // -----------------------------------------------------------------------
    // Random stream
    // -----------------------------------------------------------------------

    /// Roll against a percentage chance.
    pub fn roll_percent(&mut self, chance: u8) -> bool {
        self.rng.random_range(0..100_u8) < chance
    }

    /// Draw an index below `len`; `None` when `len` is zero.
    pub fn random_index(&mut self, len: usize) -> Option<usize> {
        (len > 0).then(|| self.rng.random_range(0..len))
    }

    /// Draw a value from `low..=high`.
    pub fn random_between(&mut self, low: u32, high: u32) -> u32 {
        if high <= low {
            return low;
        }
        self.rng.random_range(low..=high)
    }

    /// Draw 16 bytes for a new identifier.
    pub fn mint_bytes(&mut self) -> [u8; 16] {
        self.rng.random()
    }

    // -----------------------------------------------------------------------
    // Per-tick bookkeeping, owned by the orchestrator
    // -----------------------------------------------------------------------

    pub(crate) fn clear_reports(&mut self) {
        self.reports.clear_all();
    }

    /// Serializable copy of everything but the random stream.
    pub fn snapshot(&self) -> CampaignSnapshot {
        CampaignSnapshot {
            name: self.name.clone(),
            date: self.today(),
            personnel: self.personnel.clone(),
            units: self.units.clone(),
            parts: self.parts.clone(),
            forces: self.forces.clone(),
            contracts: self.contracts.clone(),
            location: self.location.clone(),
            finances: self.finances.clone(),
            standings: self.standings.clone(),
            reputation: self.reputation.clone(),
            applicants: self.applicants.clone(),
            unit_offers: self.unit_offers.clone(),
            shopping_list: self.shopping_list.clone(),
            pools: self.pools,
            turnover_log: self.turnover_log.clone(),
        }
    }
}

impl ReportSink for CampaignState {
    fn reports_mut(&mut self) -> &mut ReportChannels {
        &mut self.reports
    }
}

impl FailureSink for CampaignState {
    fn record_contained_failure(&mut self, label: &str, error: &dyn std::fmt::Display) {
        self.contained_failures = self.contained_failures.saturating_add(1);
        self.reports.write(
            ReportCategory::Technical,
            format!("Could not process {label}: {error}"),
        );
    }
}

/// Persistent view of a campaign, written by the auto-save collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignSnapshot {
    /// Campaign name.
    pub name: String,
    /// Campaign date.
    pub date: NaiveDate,
    /// Personnel roster.
    pub personnel: BTreeMap<PersonId, Person>,
    /// Equipment units.
    pub units: BTreeMap<UnitId, Unit>,
    /// Installed and spare parts.
    pub parts: BTreeMap<PartId, Part>,
    /// Table of organization.
    pub forces: BTreeMap<ForceId, Force>,
    /// Contracts.
    pub contracts: BTreeMap<ContractId, Contract>,
    /// Location.
    pub location: Location,
    /// Finance ledger.
    pub finances: Finances,
    /// Faction standings.
    pub standings: BTreeMap<String, FactionStanding>,
    /// Reputation rating.
    pub reputation: Reputation,
    /// Personnel market listings.
    pub applicants: Vec<Applicant>,
    /// Unit market listings.
    pub unit_offers: Vec<UnitOffer>,
    /// Shopping list.
    pub shopping_list: Vec<ShoppingItem>,
    /// Labor pools.
    pub pools: LaborPools,
    /// Pending turnover notices.
    pub turnover_log: Vec<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use campaign_types::PersonnelStatus;

    fn options() -> CampaignOptions {
        let mut options = CampaignOptions::default();
        options.campaign.seed = 7;
        options.campaign.start_date = NaiveDate::from_ymd_opt(3025, 3, 1).unwrap();
        options
    }

    #[test]
    fn new_state_starts_on_configured_date_with_funds() {
        let state = CampaignState::new(options());
        assert_eq!(state.today(), NaiveDate::from_ymd_opt(3025, 3, 1).unwrap());
        assert_eq!(state.finances.balance(), Decimal::from(5_000_000));
        assert!(state.reports().is_empty());
        assert!(!state.location.is_travelling());
    }

    #[test]
    fn zero_starting_funds_gives_empty_ledger() {
        let mut options = options();
        options.campaign.starting_funds = 0;
        let state = CampaignState::new(options);
        assert!(state.finances.transactions().is_empty());
    }

    #[test]
    fn same_seed_same_stream() {
        let mut a = CampaignState::new(options());
        let mut b = CampaignState::new(options());
        for _ in 0..20 {
            assert_eq!(a.mint_bytes(), b.mint_bytes());
            assert_eq!(a.roll_percent(50), b.roll_percent(50));
        }
    }

    #[test]
    fn roll_percent_extremes() {
        let mut state = CampaignState::new(options());
        for _ in 0..50 {
            assert!(!state.roll_percent(0));
            assert!(state.roll_percent(100));
        }
    }

    #[test]
    fn count_active_ignores_departed() {
        let mut state = CampaignState::new(options());
        let born = NaiveDate::from_ymd_opt(3000, 1, 1).unwrap();
        let today = state.today();
        let tech = Person::new(PersonId::new(), "Tech", PersonnelRole::Tech, born, today);
        let mut gone = Person::new(PersonId::new(), "Gone", PersonnelRole::Tech, born, today);
        gone.status = PersonnelStatus::Departed;
        state.add_person(tech);
        state.add_person(gone);
        assert_eq!(state.count_active(PersonnelRole::is_tech), 1);
    }

    #[test]
    fn contained_failures_are_counted_and_reported() {
        let mut state = CampaignState::new(options());
        state.record_contained_failure("Atlas", &"missing chassis data");
        assert_eq!(state.contained_failures(), 1);
        assert_eq!(state.reports().entries(ReportCategory::Technical).len(), 1);
        assert_eq!(state.take_contained_failures(), 1);
        assert_eq!(state.contained_failures(), 0);
    }
}
