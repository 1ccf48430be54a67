//! Multi-day runner.
//!
//! [`run_days`] repeats the single-day tick until the requested number of
//! days has been advanced or a listener vetoes the next day.

use tracing::{info, warn};

use crate::state::CampaignState;
use crate::tick::{DayAdvancer, TickError, TickOutcome, TickSummary};

/// Errors that can occur during a multi-day run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: TickError,
    },
}

/// Why a run stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEndReason {
    /// Every requested day was advanced.
    DaysReached,
    /// A listener refused to advance.
    Vetoed {
        /// The listener's reason.
        reason: String,
    },
}

/// Result of a multi-day run.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Days actually advanced.
    pub days_advanced: u32,
    /// Why the run stopped.
    pub end_reason: RunEndReason,
    /// Summary of the last committed day, if any.
    pub last_summary: Option<TickSummary>,
}

/// Advance `state` by up to `days` days.
///
/// Stops early, without error, at the first vetoed day.
///
/// # Errors
///
/// Returns [`RunnerError::Tick`] if a tick fails.
pub fn run_days(
    advancer: &mut DayAdvancer,
    state: &mut CampaignState,
    days: u32,
) -> Result<RunResult, RunnerError> {
    let mut last_summary = None;
    let mut days_advanced = 0_u32;
    info!(start = %state.today(), days, "Run starting");

    while days_advanced < days {
        match advancer.advance_one_day(state)? {
            TickOutcome::Committed(summary) => {
                days_advanced = days_advanced.saturating_add(1);
                last_summary = Some(summary);
            }
            TickOutcome::Vetoed { reason } => {
                warn!(date = %state.today(), %reason, days_advanced, "Run stopped by veto");
                return Ok(RunResult {
                    days_advanced,
                    end_reason: RunEndReason::Vetoed { reason },
                    last_summary,
                });
            }
        }
    }

    info!(end = %state.today(), days_advanced, "Run finished");
    Ok(RunResult {
        days_advanced,
        end_reason: RunEndReason::DaysReached,
        last_summary,
    })
}
