//! Phase modules of the daily tick.
//!
//! Each submodule owns one cohesive block of work. Phase functions take the
//! shared [`CampaignState`](crate::state::CampaignState) by `&mut` and the
//! read-only [`TickContext`]; they never call each other and communicate
//! only through the state. Deciding *whether* a phase runs on a given day
//! (configuration toggles, trigger flags) belongs to the orchestrator in
//! [`crate::tick`]; phases with internal sub-triggers branch on
//! [`TickContext::triggers`] themselves.

pub mod calendar;
pub mod contracts;
pub mod facilities;
pub mod finances;
pub mod forces;
pub mod logistics;
pub mod maintenance;
pub mod markets;
pub mod medical;
pub mod personnel;
pub mod standing;
pub mod travel;

use campaign_finances::FinanceError;
use campaign_types::Location;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::OptionsSnapshot;
use crate::triggers::TriggerFlags;

/// Errors that abort a phase, and with it the tick.
#[derive(Debug, thiserror::Error)]
pub enum PhaseError {
    /// The finance ledger rejected an entry.
    #[error("finance error: {source}")]
    Finance {
        /// The underlying ledger error.
        #[from]
        source: FinanceError,
    },

}

/// Everything a phase may read about the current tick.
#[derive(Debug, Clone)]
pub struct TickContext {
    /// Date before the advance.
    pub yesterday: NaiveDate,
    /// The new date.
    pub today: NaiveDate,
    /// Calendar flags of `today`.
    pub triggers: TriggerFlags,
    /// Options as they were when the tick started.
    pub options: OptionsSnapshot,
    /// Location after today's travel.
    pub location: Location,
}

impl TickContext {
    /// `today` plus `days`, saturating at `today` if the date would overflow.
    pub fn days_from_today(&self, days: u32) -> NaiveDate {
        self.today
            .checked_add_days(Days::new(u64::from(days)))
            .unwrap_or(self.today)
    }
}

/// A step of the daily tick, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Move pending turnover notices aside.
    ClearTurnover,
    /// Top up astech and medic pools.
    RefillLaborPools,
    /// Save the pre-advance state.
    AutoSave,
    /// Advance the clock and evaluate triggers.
    AdvanceClock,
    /// Holidays, anniversaries and birthdays.
    Celebrations,
    /// Recompute whether a contract is in force.
    ContractStatus,
    /// Empty every report channel.
    ClearReports,
    /// Jump and transit progress.
    Travel,
    /// Hospital and technical capacity.
    FacilityCapacity,
    /// Healing, fatigue, aging and assignments.
    Personnel,
    /// Daily infection checks.
    Disease,
    /// Monday fatigue response and weekly disease progression.
    WeeklyMedical,
    /// Personnel and unit markets.
    Markets,
    /// Dependents joining and leaving.
    Dependents,
    /// Contract and scenario lifecycle.
    ContractLifecycle,
    /// Reputation rating.
    Reputation,
    /// Academy graduations.
    Education,
    /// Automated awards.
    Awards,
    /// Prisoner events.
    Prisoners,
    /// Monthly facility rent.
    FacilityRent,
    /// Weekly repair bay rent.
    BayRent,
    /// Reset technician labor minutes.
    ResetLabor,
    /// Part arrivals and repair tasks.
    MaintenanceTasks,
    /// Unit-level maintenance consequences.
    MaintenanceUnits,
    /// Force aggregates.
    Forces,
    /// Procurement from the shopping list.
    Procurement,
    /// Ledger roll-forward.
    Finances,
    /// Purge departed personnel.
    PurgePersonnel,
    /// Re-surface turnover notices.
    ResurfaceTurnover,
    /// Weekly stock-up.
    StockUp,
    /// Calendar-window special events.
    SpecialEvents,
    /// Faction standing checks.
    FactionStanding,
    /// Inter-faction relations bulletin.
    FactionRelations,
    /// Notify day listeners.
    Notify,
}
