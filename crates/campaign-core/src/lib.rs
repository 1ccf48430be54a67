//! Simulation clock, trigger evaluation and the daily tick orchestrator for
//! the campaign simulation.
//!
//! This crate advances a campaign one day at a time through a fixed
//! sequence of phases. Calendar triggers gate weekly, monthly and yearly
//! work; per-entity failures are contained and reported instead of
//! aborting the day.
//!
//! # Modules
//!
//! - [`clock`] -- The campaign date, advanced exactly one day per tick.
//! - [`triggers`] -- Calendar flags (Monday, first of month, ...) derived
//!   fresh from each new date.
//! - [`config`] -- Options loaded from `campaign-options.yaml` and the
//!   per-tick [`OptionsSnapshot`].
//! - [`report`] -- Categorized per-tick report channels.
//! - [`isolation`] -- The fault-isolated per-entity processor.
//! - [`state`] -- [`CampaignState`], threaded through every phase.
//! - [`phases`] -- The phase modules.
//! - [`listeners`] -- Pre-tick veto and post-tick notification.
//! - [`autosave`] -- The auto-save collaborator.
//! - [`tick`] -- [`DayAdvancer`], the tick orchestrator.
//! - [`runner`] -- Multi-day runs.
//!
//! [`OptionsSnapshot`]: config::OptionsSnapshot
//! [`CampaignState`]: state::CampaignState
//! [`DayAdvancer`]: tick::DayAdvancer

pub mod autosave;
pub mod clock;
pub mod config;
pub mod isolation;
pub mod listeners;
pub mod phases;
pub mod report;
pub mod runner;
pub mod state;
pub mod tick;
pub mod triggers;

pub use autosave::{AutoSave, AutoSaveError, JsonAutoSave, NoAutoSave};
pub use config::{CampaignOptions, ConfigError, OptionsSnapshot};
pub use listeners::{
    BeforeDayListener, DayListener, ListenerRegistry, PendingScenarioVeto, VetoDecision,
};
pub use report::{ReportChannels, ReportSink};
pub use runner::{RunEndReason, RunResult, RunnerError, run_days};
pub use state::{CampaignSnapshot, CampaignState};
pub use tick::{DayAdvancer, TickError, TickOutcome, TickStage, TickSummary};
pub use triggers::{Trigger, TriggerFlags};
