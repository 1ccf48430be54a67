//! Campaign runner binary.
//!
//! Loads options, builds the starting roster and advances the campaign day
//! by day, printing every day's report channels.
//!
//! # Usage
//!
//! ```text
//! campaign-runner [DAYS] [OPTIONS]
//! ```
//!
//! `DAYS` defaults to 30. `OPTIONS` is a YAML options file; without it,
//! `campaign-options.yaml` in the working directory is used when it exists.
//! Set `CAMPAIGN_AUTOSAVE_DIR` to write a JSON snapshot before every day.
//!
//! # Startup Sequence
//!
//! 1. Parse arguments and load configuration
//! 2. Initialize structured logging (tracing)
//! 3. Build the starting roster
//! 4. Register the pending-scenario veto and the report printer
//! 5. Advance, resolving scenarios whenever they block the next day

mod error;
mod printer;
mod roster;

use std::path::{Path, PathBuf};

use campaign_core::config::CampaignOptions;
use campaign_core::phases::contracts;
use campaign_core::{
    CampaignState, DayAdvancer, JsonAutoSave, PendingScenarioVeto, RunEndReason, run_days,
};
use campaign_types::ScenarioId;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::CampaignRunnerError;
use crate::printer::ReportPrinter;

/// Days advanced when no count is given.
const DEFAULT_DAYS: u32 = 30;

/// Chance, in percent, that an auto-resolved scenario is a victory.
const VICTORY_PERCENT: u8 = 60;

/// Parsed command line.
#[derive(Debug, PartialEq, Eq)]
struct RunArgs {
    days: u32,
    options_path: Option<PathBuf>,
}

fn main() -> Result<(), CampaignRunnerError> {
    let args = parse_args(std::env::args().skip(1))?;
    let options = load_config(args.options_path.as_deref())?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(options.logging.level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let days = args.days;
    info!(
        campaign = %options.campaign.name,
        seed = options.campaign.seed,
        start = %options.campaign.start_date,
        days,
        "campaign-runner starting"
    );

    let mut state = roster::starting_campaign(options);

    let mut advancer = match std::env::var("CAMPAIGN_AUTOSAVE_DIR") {
        Ok(dir) => {
            info!(dir = %dir, "Auto-save enabled");
            DayAdvancer::with_autosave(JsonAutoSave::new(dir))
        }
        Err(_) => DayAdvancer::new(),
    };
    advancer.listeners_mut().on_before_day(PendingScenarioVeto);
    advancer.listeners_mut().on_day(ReportPrinter);

    let mut remaining = days;
    while remaining > 0 {
        let result = run_days(&mut advancer, &mut state, remaining)?;
        remaining = remaining.saturating_sub(result.days_advanced);
        match result.end_reason {
            RunEndReason::DaysReached => break,
            RunEndReason::Vetoed { reason } => {
                let resolved = resolve_pending(&mut state);
                if resolved == 0 {
                    return Err(CampaignRunnerError::Stuck {
                        date: state.today(),
                        reason,
                    });
                }
                info!(resolved, %reason, "Pending scenarios resolved");
            }
        }
    }

    info!(
        date = %state.today(),
        balance = %state.finances.balance(),
        personnel = state.personnel.len(),
        units = state.units.len(),
        rating = %state.reputation.rating,
        "Campaign run complete"
    );
    Ok(())
}

/// Load options from `explicit`, else from `campaign-options.yaml` when
/// present, else use defaults.
fn load_config(explicit: Option<&Path>) -> Result<CampaignOptions, CampaignRunnerError> {
    if let Some(path) = explicit {
        info!(path = %path.display(), "Loading options");
        return Ok(CampaignOptions::from_file(path)?);
    }
    let config_path = Path::new("campaign-options.yaml");
    if config_path.exists() {
        Ok(CampaignOptions::from_file(config_path)?)
    } else {
        let mut options = CampaignOptions::default();
        options.campaign.apply_env_overrides();
        Ok(options)
    }
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<RunArgs, CampaignRunnerError> {
    let days = match args.next() {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_parse| CampaignRunnerError::InvalidDays { value })?,
        None => DEFAULT_DAYS,
    };
    Ok(RunArgs {
        days,
        options_path: args.next().map(PathBuf::from),
    })
}

/// Resolve every unresolved scenario dated today or earlier. Returns how
/// many were resolved.
fn resolve_pending(state: &mut CampaignState) -> usize {
    let today = state.today();
    let pending: Vec<ScenarioId> = state
        .contracts
        .values()
        .flat_map(|contract| contract.scenarios.iter())
        .filter(|scenario| scenario.date <= today && scenario.status.is_unresolved())
        .map(|scenario| scenario.id)
        .collect();

    let mut resolved = 0_usize;
    for id in pending {
        let victory = state.roll_percent(VICTORY_PERCENT);
        if contracts::resolve_scenario(state, id, victory) {
            resolved = resolved.saturating_add(1);
        } else {
            warn!(scenario = %id, "Scenario could not be resolved");
        }
    }
    resolved
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn args<'a>(list: &'a [&'a str]) -> impl Iterator<Item = String> + 'a {
        list.iter().map(|arg| String::from(*arg))
    }

    #[test]
    fn no_arguments_use_defaults() {
        let parsed = parse_args(args(&[])).unwrap();
        assert_eq!(parsed.days, DEFAULT_DAYS);
        assert!(parsed.options_path.is_none());
    }

    #[test]
    fn days_and_options_path() {
        let parsed = parse_args(args(&["90", "configs/long-run.yaml"])).unwrap();
        assert_eq!(
            parsed,
            RunArgs {
                days: 90,
                options_path: Some(PathBuf::from("configs/long-run.yaml")),
            }
        );
    }

    #[test]
    fn bad_day_count_is_rejected() {
        let result = parse_args(args(&["soon"]));
        assert!(matches!(
            result,
            Err(CampaignRunnerError::InvalidDays { value }) if value == "soon"
        ));
    }

    #[test]
    fn explicit_options_file_must_exist() {
        let result = load_config(Some(Path::new("does-not-exist.yaml")));
        assert!(matches!(result, Err(CampaignRunnerError::Config { .. })));
    }
}
