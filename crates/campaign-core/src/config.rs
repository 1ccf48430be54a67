//! Configuration loading and typed option structures for the campaign.
//!
//! The canonical options live in `campaign-options.yaml` at the project
//! root. Every field carries a serde default, so an empty document yields
//! [`CampaignOptions::default`]. The tick orchestrator copies the options
//! into an [`OptionsSnapshot`] at tick start; phases consult only that
//! snapshot, never the live options.

use std::ops::Deref;
use std::path::Path;

use campaign_types::ContractMode;
use chrono::NaiveDate;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read options file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse options YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level campaign options.
///
/// Mirrors the structure of `campaign-options.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CampaignOptions {
    /// Campaign identity and starting conditions.
    #[serde(default)]
    pub campaign: CampaignSection,

    /// Personnel processing and labor pools.
    #[serde(default)]
    pub personnel: PersonnelOptions,

    /// Healing and disease.
    #[serde(default)]
    pub medical: MedicalOptions,

    /// Personnel and unit markets.
    #[serde(default)]
    pub markets: MarketOptions,

    /// Contract-driven play.
    #[serde(default)]
    pub contracts: ContractOptions,

    /// Procurement, stock-up and maintenance.
    #[serde(default)]
    pub logistics: LogisticsOptions,

    /// Rented facilities.
    #[serde(default)]
    pub finances: FinanceOptions,

    /// Academy module.
    #[serde(default)]
    pub education: ToggleOptions,

    /// Automated awards.
    #[serde(default)]
    pub awards: ToggleOptions,

    /// Prisoner events.
    #[serde(default)]
    pub prisoners: PrisonerOptions,

    /// Faction standing tracking.
    #[serde(default)]
    pub factions: FactionOptions,

    /// Narrative and random events.
    #[serde(default)]
    pub events: EventOptions,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingOptions,
}

impl CampaignOptions {
    /// Load options from a YAML file at the given path.
    ///
    /// The `CAMPAIGN_SEED` environment variable, when set to a valid
    /// integer, overrides `campaign.seed`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse options from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut options: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        options.campaign.apply_env_overrides();
        Ok(options)
    }
}

/// Immutable copy of the options taken at the start of a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionsSnapshot {
    options: CampaignOptions,
}

impl OptionsSnapshot {
    /// Capture the current options.
    pub fn capture(options: &CampaignOptions) -> Self {
        Self {
            options: options.clone(),
        }
    }
}

impl Deref for OptionsSnapshot {
    type Target = CampaignOptions;

    fn deref(&self) -> &Self::Target {
        &self.options
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Campaign identity and starting conditions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CampaignSection {
    /// Campaign (unit) name.
    #[serde(default = "default_campaign_name")]
    pub name: String,

    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Date the campaign starts on.
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,

    /// Faction code the campaign belongs to.
    #[serde(default = "default_faction")]
    pub faction: String,

    /// Star system the campaign starts in.
    #[serde(default = "default_home_system")]
    pub home_system: String,

    /// Faction controlling the starting system.
    #[serde(default = "default_home_owner")]
    pub home_owner: String,

    /// Opening balance in C-bills.
    #[serde(default = "default_starting_funds")]
    pub starting_funds: i64,
}

impl CampaignSection {
    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("CAMPAIGN_SEED")
            && let Ok(seed) = val.trim().parse::<u64>()
        {
            self.seed = seed;
        }
    }
}

impl Default for CampaignSection {
    fn default() -> Self {
        Self {
            name: default_campaign_name(),
            seed: default_seed(),
            start_date: default_start_date(),
            faction: default_faction(),
            home_system: default_home_system(),
            home_owner: default_home_owner(),
            starting_funds: default_starting_funds(),
        }
    }
}

/// Personnel processing options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[allow(clippy::struct_field_names)]
pub struct PersonnelOptions {
    /// Top up astech and medic pools before each tick.
    #[serde(default = "default_true")]
    pub auto_refill_pools: bool,

    /// Astechs required per technician.
    #[serde(default = "default_astechs_per_tech")]
    pub astechs_per_tech: u32,

    /// Medics required per doctor.
    #[serde(default = "default_medics_per_doctor")]
    pub medics_per_doctor: u32,

    /// Age at which personnel retire.
    #[serde(default = "default_retirement_age")]
    pub retirement_age: u32,

    /// Fatigue above which a Monday fatigue response sends a person on leave.
    #[serde(default = "default_fatigue_threshold")]
    pub fatigue_threshold: u8,

    /// Fatigue recovered per day.
    #[serde(default = "default_one_u8")]
    pub fatigue_recovery: u8,

    /// Simulate dependents joining and leaving.
    #[serde(default = "default_true")]
    pub dependents_enabled: bool,

    /// Monthly chance, in percent, of a dependent joining or leaving.
    #[serde(default = "default_dependent_churn_percent")]
    pub dependent_churn_percent: u8,

    /// Days after departure before a record is purged; zero disables purging.
    #[serde(default)]
    pub purge_departed_days: u32,

    /// Labor minutes each technician has per day.
    #[serde(default = "default_tech_daily_minutes")]
    pub tech_daily_minutes: u32,
}

impl Default for PersonnelOptions {
    fn default() -> Self {
        Self {
            auto_refill_pools: true,
            astechs_per_tech: default_astechs_per_tech(),
            medics_per_doctor: default_medics_per_doctor(),
            retirement_age: default_retirement_age(),
            fatigue_threshold: default_fatigue_threshold(),
            fatigue_recovery: default_one_u8(),
            dependents_enabled: true,
            dependent_churn_percent: default_dependent_churn_percent(),
            purge_departed_days: 0,
            tech_daily_minutes: default_tech_daily_minutes(),
        }
    }
}

/// Healing and disease options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MedicalOptions {
    /// Patients a single doctor can treat.
    #[serde(default = "default_patients_per_doctor")]
    pub patients_per_doctor: u32,

    /// Daily chance, in percent, that a treated patient heals one wound.
    #[serde(default = "default_heal_percent")]
    pub heal_percent: u8,

    /// Simulate location-dependent disease.
    #[serde(default)]
    pub disease_enabled: bool,

    /// Weekly chance, in percent, that an infected person recovers.
    #[serde(default = "default_recovery_percent")]
    pub recovery_percent: u8,

    /// Weekly chance, in percent, that an infection worsens.
    #[serde(default = "default_worsen_percent")]
    pub worsen_percent: u8,

    /// Severity at which an infection is fatal.
    #[serde(default = "default_fatal_severity")]
    pub fatal_severity: u8,
}

impl Default for MedicalOptions {
    fn default() -> Self {
        Self {
            patients_per_doctor: default_patients_per_doctor(),
            heal_percent: default_heal_percent(),
            disease_enabled: false,
            recovery_percent: default_recovery_percent(),
            worsen_percent: default_worsen_percent(),
            fatal_severity: default_fatal_severity(),
        }
    }
}

/// Market options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MarketOptions {
    /// Run the personnel market.
    #[serde(default = "default_true")]
    pub personnel_market_enabled: bool,

    /// Applicants generated each Monday.
    #[serde(default = "default_applicants_per_week")]
    pub applicants_per_week: u32,

    /// Days an applicant stays on the market.
    #[serde(default = "default_applicant_days")]
    pub applicant_days: u32,

    /// Run the unit market.
    #[serde(default = "default_true")]
    pub unit_market_enabled: bool,

    /// Unit offers generated on the first of each month.
    #[serde(default = "default_offers_per_month")]
    pub offers_per_month: u32,

    /// Days a unit offer stays on the market.
    #[serde(default = "default_offer_days")]
    pub offer_days: u32,
}

impl Default for MarketOptions {
    fn default() -> Self {
        Self {
            personnel_market_enabled: true,
            applicants_per_week: default_applicants_per_week(),
            applicant_days: default_applicant_days(),
            unit_market_enabled: true,
            offers_per_month: default_offers_per_month(),
            offer_days: default_offer_days(),
        }
    }
}

/// Contract-driven play options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContractOptions {
    /// Contract-driven mode; `none` disables the contract lifecycle.
    #[serde(default)]
    pub mode: ContractMode,

    /// Clan opponents issue batchalls.
    #[serde(default = "default_true")]
    pub batchalls: bool,

    /// Weekly chance, in percent, that a ship search succeeds.
    #[serde(default = "default_ship_search_percent")]
    pub ship_search_percent: u8,

    /// Weekly chance, in percent, that enemy morale shifts.
    #[serde(default = "default_morale_swing_percent")]
    pub morale_swing_percent: u8,
}

impl Default for ContractOptions {
    fn default() -> Self {
        Self {
            mode: ContractMode::None,
            batchalls: true,
            ship_search_percent: default_ship_search_percent(),
            morale_swing_percent: default_morale_swing_percent(),
        }
    }
}

/// A part the campaign keeps in stock.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StockTarget {
    /// Part name.
    pub name: String,
    /// Quantity to keep on hand.
    pub quantity: u32,
    /// Unit price in C-bills.
    #[serde(default)]
    pub cost: i64,
}

/// Procurement and maintenance options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogisticsOptions {
    /// Roll for shopping list items every day.
    #[serde(default = "default_true")]
    pub auto_logistics: bool,

    /// Chance, in percent, that a shopping list item is acquired.
    #[serde(default = "default_acquisition_percent")]
    pub acquisition_percent: u8,

    /// Days until an acquired part arrives.
    #[serde(default = "default_delivery_days")]
    pub delivery_days: u32,

    /// Add stock deficits to the shopping list on Mondays.
    #[serde(default)]
    pub auto_stock_up: bool,

    /// Parts kept in stock.
    #[serde(default)]
    pub stock_targets: Vec<StockTarget>,

    /// Days between unit maintenance checks.
    #[serde(default = "default_maintenance_cycle_days")]
    pub maintenance_cycle_days: u32,
}

impl Default for LogisticsOptions {
    fn default() -> Self {
        Self {
            auto_logistics: true,
            acquisition_percent: default_acquisition_percent(),
            delivery_days: default_delivery_days(),
            auto_stock_up: false,
            stock_targets: Vec::new(),
            maintenance_cycle_days: default_maintenance_cycle_days(),
        }
    }
}

/// Rented facilities, in C-bills.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FinanceOptions {
    /// Rented hospital beds.
    #[serde(default)]
    pub hospital_beds: u32,

    /// Monthly rent per hospital bed.
    #[serde(default)]
    pub bed_rent: i64,

    /// Rented kitchens.
    #[serde(default)]
    pub kitchens: u32,

    /// Monthly rent per kitchen.
    #[serde(default)]
    pub kitchen_rent: i64,

    /// Rented holding cells.
    #[serde(default)]
    pub holding_cells: u32,

    /// Monthly rent per holding cell.
    #[serde(default)]
    pub cell_rent: i64,

    /// Weekly rent per unit in a rented repair bay.
    #[serde(default)]
    pub bay_rent: i64,
}

/// A module that is simply on or off.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ToggleOptions {
    /// Whether the module runs.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for ToggleOptions {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Prisoner event options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PrisonerOptions {
    /// Run prisoner events.
    #[serde(default = "default_true")]
    pub events_enabled: bool,

    /// Weekly chance, in percent, of a minor event per prisoner.
    #[serde(default = "default_minor_event_percent")]
    pub minor_event_percent: u8,

    /// Monthly chance, in percent, that a prisoner escapes.
    #[serde(default = "default_escape_percent")]
    pub escape_percent: u8,

    /// Monthly chance, in percent, that a prisoner is released.
    #[serde(default = "default_release_percent")]
    pub release_percent: u8,
}

impl Default for PrisonerOptions {
    fn default() -> Self {
        Self {
            events_enabled: true,
            minor_event_percent: default_minor_event_percent(),
            escape_percent: default_escape_percent(),
            release_percent: default_release_percent(),
        }
    }
}

/// Faction standing options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FactionOptions {
    /// Track faction standing.
    #[serde(default = "default_true")]
    pub standing_enabled: bool,

    /// Regard gained with the employer for each day under contract.
    #[serde(default = "default_employer_daily_regard")]
    pub employer_daily_regard: i32,

    /// Regard at or below which a faction censures the campaign.
    #[serde(default = "default_censure_threshold")]
    pub censure_threshold: i32,

    /// Regard at or above which a faction grants an accolade.
    #[serde(default = "default_accolade_threshold")]
    pub accolade_threshold: i32,

    /// Lowest possible regard; factions at the floor issue an ultimatum.
    #[serde(default = "default_regard_floor")]
    pub regard_floor: i32,

    /// Regard drift toward zero applied each month.
    #[serde(default = "default_climate_drift")]
    pub climate_drift: i32,
}

impl Default for FactionOptions {
    fn default() -> Self {
        Self {
            standing_enabled: true,
            employer_daily_regard: default_employer_daily_regard(),
            censure_threshold: default_censure_threshold(),
            accolade_threshold: default_accolade_threshold(),
            regard_floor: default_regard_floor(),
            climate_drift: default_climate_drift(),
        }
    }
}

/// A calendar window during which a special event may occur.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SpecialEventWindow {
    /// Event name.
    pub name: String,
    /// First day of the window.
    pub start: NaiveDate,
    /// Last day of the window.
    pub end: NaiveDate,
    /// Daily chance, in percent, while the window is open.
    pub chance_percent: u8,
}

impl SpecialEventWindow {
    /// Whether `date` falls inside the window, both ends included.
    pub fn is_open(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Narrative event options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EventOptions {
    /// Announce holidays, anniversaries and birthdays.
    #[serde(default = "default_true")]
    pub celebrations: bool,

    /// Special random event windows.
    #[serde(default)]
    pub special_windows: Vec<SpecialEventWindow>,
}

impl EventOptions {
    /// Whether any special event window is open on `date`.
    pub fn any_window_open(&self, date: NaiveDate) -> bool {
        self.special_windows.iter().any(|window| window.is_open(date))
    }
}

impl Default for EventOptions {
    fn default() -> Self {
        Self {
            celebrations: true,
            special_windows: Vec::new(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingOptions {
    /// Default log level filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

const fn default_true() -> bool {
    true
}

const fn default_one_u8() -> u8 {
    1
}

fn default_campaign_name() -> String {
    String::from("Iron Anvil Company")
}

const fn default_seed() -> u64 {
    3025
}

fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(3025, 1, 1).unwrap_or_default()
}

fn default_faction() -> String {
    String::from("MERC")
}

fn default_home_system() -> String {
    String::from("Galatea")
}

fn default_home_owner() -> String {
    String::from("MERC")
}

const fn default_starting_funds() -> i64 {
    5_000_000
}

const fn default_astechs_per_tech() -> u32 {
    6
}

const fn default_medics_per_doctor() -> u32 {
    4
}

const fn default_retirement_age() -> u32 {
    65
}

const fn default_fatigue_threshold() -> u8 {
    12
}

const fn default_dependent_churn_percent() -> u8 {
    10
}

const fn default_tech_daily_minutes() -> u32 {
    480
}

const fn default_patients_per_doctor() -> u32 {
    25
}

const fn default_heal_percent() -> u8 {
    20
}

const fn default_recovery_percent() -> u8 {
    40
}

const fn default_worsen_percent() -> u8 {
    10
}

const fn default_fatal_severity() -> u8 {
    5
}

const fn default_applicants_per_week() -> u32 {
    4
}

const fn default_applicant_days() -> u32 {
    14
}

const fn default_offers_per_month() -> u32 {
    3
}

const fn default_offer_days() -> u32 {
    30
}

const fn default_ship_search_percent() -> u8 {
    30
}

const fn default_morale_swing_percent() -> u8 {
    50
}

const fn default_acquisition_percent() -> u8 {
    60
}

const fn default_delivery_days() -> u32 {
    7
}

const fn default_maintenance_cycle_days() -> u32 {
    7
}

const fn default_minor_event_percent() -> u8 {
    10
}

const fn default_escape_percent() -> u8 {
    5
}

const fn default_release_percent() -> u8 {
    5
}

const fn default_employer_daily_regard() -> i32 {
    1
}

const fn default_censure_threshold() -> i32 {
    -50
}

const fn default_accolade_threshold() -> i32 {
    50
}

const fn default_regard_floor() -> i32 {
    -100
}

const fn default_climate_drift() -> i32 {
    1
}

fn default_log_level() -> String {
    String::from("info")
}
