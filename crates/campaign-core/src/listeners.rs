//! Pre-tick veto and post-tick notification listeners.
//!
//! Listeners are registered on a [`ListenerRegistry`] owned by the
//! orchestrator and invoked synchronously at fixed points of the tick:
//! every [`BeforeDayListener`] before anything is committed, every
//! [`DayListener`] after the tick is committed. Veto listeners get a shared
//! reference to the state, so a veto check cannot mutate the campaign.

use tracing::{debug, info};

use crate::state::CampaignState;
use crate::tick::TickSummary;

/// Answer of a pre-tick check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VetoDecision {
    /// Let the day advance.
    Proceed,
    /// Refuse to advance the day.
    Veto {
        /// Why the advance was refused.
        reason: String,
    },
}

/// Consulted before a day is advanced; may refuse the advance.
pub trait BeforeDayListener {
    /// Decide whether the campaign may advance past its current date.
    fn before_new_day(&mut self, state: &CampaignState) -> VetoDecision;
}

/// Notified once a day has been committed.
pub trait DayListener {
    /// Called with the updated state and the tick summary.
    fn on_new_day(&mut self, state: &CampaignState, summary: &TickSummary);
}

/// Ordered collection of veto and notification listeners.
#[derive(Default)]
pub struct ListenerRegistry {
    before: Vec<Box<dyn BeforeDayListener>>,
    after: Vec<Box<dyn DayListener>>,
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("before", &self.before.len())
            .field("after", &self.after.len())
            .finish()
    }
}

impl ListenerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a veto listener.
    pub fn on_before_day(&mut self, listener: impl BeforeDayListener + 'static) {
        self.before.push(Box::new(listener));
    }

    /// Register a post-tick listener.
    pub fn on_day(&mut self, listener: impl DayListener + 'static) {
        self.after.push(Box::new(listener));
    }

    /// Consult every veto listener.
    ///
    /// All listeners are asked, in registration order; the first refusal's
    /// reason is returned.
    pub fn check_veto(&mut self, state: &CampaignState) -> VetoDecision {
        let mut decision = VetoDecision::Proceed;
        for listener in &mut self.before {
            let answer = listener.before_new_day(state);
            if let VetoDecision::Veto { reason } = answer {
                debug!(%reason, "Day advance refused by listener");
                if decision == VetoDecision::Proceed {
                    decision = VetoDecision::Veto { reason };
                }
            }
        }
        decision
    }

    /// Notify every post-tick listener in registration order.
    pub fn notify(&mut self, state: &CampaignState, summary: &TickSummary) {
        for listener in &mut self.after {
            listener.on_new_day(state, summary);
        }
        debug!(listeners = self.after.len(), date = %summary.date, "Day listeners notified");
    }
}

/// Refuses to advance while a scenario dated today or earlier is unresolved.
#[derive(Debug, Clone, Copy, Default)]
pub struct PendingScenarioVeto;

impl BeforeDayListener for PendingScenarioVeto {
    fn before_new_day(&mut self, state: &CampaignState) -> VetoDecision {
        let today = state.today();
        let pending = state
            .contracts
            .values()
            .flat_map(|contract| contract.scenarios.iter())
            .find(|scenario| scenario.date <= today && scenario.status.is_unresolved());
        match pending {
            Some(scenario) => {
                info!(
                    scenario = %scenario.name,
                    date = %scenario.date,
                    "Unresolved scenario blocks the day"
                );
                VetoDecision::Veto {
                    reason: format!(
                        "Scenario {} on {} must be resolved first.",
                        scenario.name, scenario.date
                    ),
                }
            }
            None => VetoDecision::Proceed,
        }
    }
}
