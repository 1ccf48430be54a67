//! The daily tick: one fixed sequence of phases that advances a campaign by
//! exactly one day.
//!
//! [`DayAdvancer::advance_one_day`] drives the sequence:
//!
//! 1. Move pending turnover notices aside and refill the labor pools.
//! 2. Ask every veto listener; a refusal ends the tick with the state exactly
//!    as it was.
//! 3. Auto-save the pre-advance state, advance the clock, evaluate the
//!    calendar triggers.
//! 4. Run the phase modules in their fixed order. Calendar-gated and
//!    option-gated phases are decided here, against the options snapshot
//!    taken when the tick started.
//! 5. Notify the day listeners and return the [`TickSummary`].
//!
//! A phase error aborts the tick after the clock has already moved. That
//! partially advanced state is not rolled back.

use campaign_types::ReportCategory;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::autosave::{AutoSave, NoAutoSave};
use crate::clock::ClockError;
use crate::config::OptionsSnapshot;
use crate::listeners::{ListenerRegistry, VetoDecision};
use crate::phases::{
    Phase, PhaseError, TickContext, calendar, contracts, facilities, finances, forces, logistics,
    maintenance, markets, medical, personnel, standing, travel,
};
use crate::report::ReportSink;
use crate::state::CampaignState;
use crate::triggers::TriggerFlags;

/// Errors that abort a tick.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// The clock could not advance.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// A phase failed as a whole.
    #[error("phase {phase:?} failed: {source}")]
    Phase {
        /// The phase that failed.
        phase: Phase,
        /// The underlying phase error.
        source: PhaseError,
    },
}

/// Where the orchestrator is in the current (or last) tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickStage {
    /// No tick in progress.
    #[default]
    Idle,
    /// The last tick was refused before anything changed.
    Vetoed,
    /// The clock has moved and phases are running.
    Advancing,
    /// The last tick ran to completion.
    Committed,
}

/// What a committed tick did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickSummary {
    /// Date before the advance.
    pub previous_date: NaiveDate,
    /// Date after the advance.
    pub date: NaiveDate,
    /// Calendar flags of the new date.
    pub triggers: TriggerFlags,
    /// Phases that ran, in execution order.
    pub phases: Vec<Phase>,
    /// Holiday, anniversary and birthday notices.
    pub celebrations: Vec<String>,
    /// Entity failures contained during the tick.
    pub contained_failures: u32,
}

impl TickSummary {
    /// Whether `phase` ran during the tick.
    pub fn ran(&self, phase: Phase) -> bool {
        self.phases.contains(&phase)
    }

    /// Position of `phase` in the executed sequence.
    pub fn position(&self, phase: Phase) -> Option<usize> {
        self.phases.iter().position(|ran| *ran == phase)
    }
}

/// Result of a call to [`DayAdvancer::advance_one_day`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// A listener refused the advance; nothing changed.
    Vetoed {
        /// The listener's reason.
        reason: String,
    },
    /// The day was advanced.
    Committed(TickSummary),
}

impl TickOutcome {
    /// Whether the day was advanced.
    pub const fn is_committed(&self) -> bool {
        matches!(self, Self::Committed(_))
    }

    /// The summary of a committed tick.
    pub const fn summary(&self) -> Option<&TickSummary> {
        match self {
            Self::Committed(summary) => Some(summary),
            Self::Vetoed { .. } => None,
        }
    }
}

/// The tick orchestrator.
///
/// Owns the listener registry and the auto-save collaborator. The campaign
/// state is passed in on every call, so one advancer can drive any number
/// of campaigns.
pub struct DayAdvancer {
    listeners: ListenerRegistry,
    autosave: Box<dyn AutoSave>,
    stage: TickStage,
}

impl std::fmt::Debug for DayAdvancer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DayAdvancer")
            .field("listeners", &self.listeners)
            .field("stage", &self.stage)
            .finish_non_exhaustive()
    }
}

impl Default for DayAdvancer {
    fn default() -> Self {
        Self::new()
    }
}

impl DayAdvancer {
    /// An advancer with no listeners and no auto-save.
    pub fn new() -> Self {
        Self::with_autosave(NoAutoSave)
    }

    /// An advancer that hands the pre-advance state to `autosave`.
    pub fn with_autosave(autosave: impl AutoSave + 'static) -> Self {
        Self {
            listeners: ListenerRegistry::new(),
            autosave: Box::new(autosave),
            stage: TickStage::Idle,
        }
    }

    /// Register veto and day listeners.
    pub const fn listeners_mut(&mut self) -> &mut ListenerRegistry {
        &mut self.listeners
    }

    /// Stage reached by the most recent tick.
    pub const fn stage(&self) -> TickStage {
        self.stage
    }

    /// Advance `state` by one day.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::Clock`] if the date cannot advance, and
    /// [`TickError::Phase`] if a phase fails as a whole. Either leaves the
    /// tick partially applied.
    #[allow(clippy::too_many_lines)]
    pub fn advance_one_day(
        &mut self,
        state: &mut CampaignState,
    ) -> Result<TickOutcome, TickError> {
        self.stage = TickStage::Idle;
        let options = OptionsSnapshot::capture(&state.options);
        let mut phases = Vec::with_capacity(34);
        debug!(date = %state.today(), "Tick started");

        // ---------------------------------------------------------------
        // Before the advance
        // ---------------------------------------------------------------

        let carried_turnover = std::mem::take(&mut state.turnover_log);
        ran(&mut phases, Phase::ClearTurnover);

        let pools_before = state.pools;
        if options.personnel.auto_refill_pools {
            personnel::refill_pools(state, &options);
            ran(&mut phases, Phase::RefillLaborPools);
        }

        if let VetoDecision::Veto { reason } = self.listeners.check_veto(state) {
            state.turnover_log = carried_turnover;
            state.pools = pools_before;
            self.stage = TickStage::Vetoed;
            info!(date = %state.today(), %reason, "Day advance vetoed");
            return Ok(TickOutcome::Vetoed { reason });
        }

        if let Err(error) = self.autosave.save(state) {
            warn!(%error, "Auto-save failed; advancing anyway");
        }
        ran(&mut phases, Phase::AutoSave);

        // ---------------------------------------------------------------
        // Advance the clock
        // ---------------------------------------------------------------

        self.stage = TickStage::Advancing;
        state.take_contained_failures();
        let yesterday = state.today();
        let today = state.clock.advance()?;
        let triggers = TriggerFlags::evaluate(today);
        ran(&mut phases, Phase::AdvanceClock);
        debug!(%today, triggers = ?triggers.active(), "Clock advanced");

        let mut ctx = TickContext {
            yesterday,
            today,
            triggers,
            options,
            location: state.location.clone(),
        };

        let celebrations = if ctx.options.events.celebrations {
            ran(&mut phases, Phase::Celebrations);
            calendar::celebrations(state, &ctx)
        } else {
            Vec::new()
        };

        let started = contracts::refresh_active_status(state, &ctx);
        ran(&mut phases, Phase::ContractStatus);

        state.clear_reports();
        ran(&mut phases, Phase::ClearReports);
        for notice in started {
            state.report(ReportCategory::Battle, notice);
        }

        // ---------------------------------------------------------------
        // Location, facilities and personnel
        // ---------------------------------------------------------------

        ctx.location = travel::advance(state, &ctx);
        ran(&mut phases, Phase::Travel);

        facilities::recompute_capacity(state, &ctx);
        ran(&mut phases, Phase::FacilityCapacity);

        personnel::process_personnel(state, &ctx);
        ran(&mut phases, Phase::Personnel);

        if ctx.options.medical.disease_enabled {
            medical::check_disease(state, &ctx);
            ran(&mut phases, Phase::Disease);
        }

        if triggers.is_monday {
            medical::fatigue_response(state, &ctx);
            if ctx.options.medical.disease_enabled {
                medical::progress_disease(state, &ctx);
            }
            ran(&mut phases, Phase::WeeklyMedical);
        }

        // ---------------------------------------------------------------
        // Markets, contracts and standing
        // ---------------------------------------------------------------

        markets::refresh(state, &ctx);
        ran(&mut phases, Phase::Markets);

        if triggers.is_first_of_month
            && ctx.location.on_planet
            && ctx.options.personnel.dependents_enabled
        {
            personnel::churn_dependents(state, &ctx);
            ran(&mut phases, Phase::Dependents);
        }

        if ctx.options.contracts.mode.is_enabled() {
            contracts::run_lifecycle(state, &ctx);
            ran(&mut phases, Phase::ContractLifecycle);
        }

        standing::recompute_reputation(state);
        ran(&mut phases, Phase::Reputation);

        if ctx.options.education.enabled {
            personnel::graduate_students(state, &ctx);
            ran(&mut phases, Phase::Education);
        }

        if ctx.options.awards.enabled && triggers.is_first_of_month {
            personnel::grant_awards(state, &ctx);
            ran(&mut phases, Phase::Awards);
        }

        if ctx.options.prisoners.events_enabled
            && (triggers.is_monday || triggers.is_first_of_month)
        {
            personnel::prisoner_events(state, &ctx);
            ran(&mut phases, Phase::Prisoners);
        }

        if triggers.is_first_of_month {
            facilities::pay_facility_rent(state, &ctx).map_err(failed(Phase::FacilityRent))?;
            ran(&mut phases, Phase::FacilityRent);
        }
        if triggers.is_monday {
            facilities::pay_bay_rent(state, &ctx).map_err(failed(Phase::BayRent))?;
            ran(&mut phases, Phase::BayRent);
        }

        // ---------------------------------------------------------------
        // Maintenance and logistics
        // ---------------------------------------------------------------

        maintenance::reset_labor(state, &ctx);
        ran(&mut phases, Phase::ResetLabor);

        maintenance::resolve_tasks(state, &ctx);
        ran(&mut phases, Phase::MaintenanceTasks);
        maintenance::resolve_units(state, &ctx);
        ran(&mut phases, Phase::MaintenanceUnits);

        forces::recompute(state);
        ran(&mut phases, Phase::Forces);

        if ctx.options.logistics.auto_logistics {
            logistics::procure(state, &ctx).map_err(failed(Phase::Procurement))?;
            ran(&mut phases, Phase::Procurement);
        }

        finances::roll_forward(state, &ctx).map_err(failed(Phase::Finances))?;
        ran(&mut phases, Phase::Finances);

        if triggers.is_first_of_month && ctx.options.personnel.purge_departed_days > 0 {
            personnel::purge_departed(state, &ctx);
            ran(&mut phases, Phase::PurgePersonnel);
        }

        for entry in carried_turnover {
            state.report(ReportCategory::General, entry);
        }
        ran(&mut phases, Phase::ResurfaceTurnover);

        if triggers.is_monday && ctx.options.logistics.auto_stock_up {
            logistics::stock_up(state, &ctx);
            ran(&mut phases, Phase::StockUp);
        }

        if ctx.options.events.any_window_open(today) {
            calendar::special_events(state, &ctx);
            ran(&mut phases, Phase::SpecialEvents);
        }

        if ctx.options.factions.standing_enabled {
            standing::check_faction_standing(state, &ctx);
            ran(&mut phases, Phase::FactionStanding);
            if triggers.is_first_of_month {
                standing::report_faction_relations(state);
                ran(&mut phases, Phase::FactionRelations);
            }
        }

        // ---------------------------------------------------------------
        // Commit
        // ---------------------------------------------------------------

        ran(&mut phases, Phase::Notify);
        let summary = TickSummary {
            previous_date: yesterday,
            date: today,
            triggers,
            phases,
            celebrations,
            contained_failures: state.take_contained_failures(),
        };
        self.stage = TickStage::Committed;
        info!(
            %today,
            reports = state.reports().len(),
            contained_failures = summary.contained_failures,
            "Day committed"
        );
        self.listeners.notify(state, &summary);

        Ok(TickOutcome::Committed(summary))
    }
}

fn ran(phases: &mut Vec<Phase>, phase: Phase) {
    debug!(?phase, "Phase complete");
    phases.push(phase);
}

fn failed(phase: Phase) -> impl FnOnce(PhaseError) -> TickError {
    move |source| TickError::Phase { phase, source }
}
