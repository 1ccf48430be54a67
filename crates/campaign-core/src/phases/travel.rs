//! Jump and transit progress.

use campaign_types::{Location, ReportCategory};
use tracing::info;

use super::TickContext;
use crate::report::ReportSink;
use crate::state::CampaignState;

/// Advance travel by one day and return the resulting location.
///
/// The in-transit counter counts down; when it reaches zero the next system
/// on the jump path becomes the current one. Arriving at the last system
/// puts the campaign on the planet.
pub fn advance(state: &mut CampaignState, _ctx: &TickContext) -> Location {
    if !state.location.is_travelling() {
        return state.location.clone();
    }

    let location = &mut state.location;
    location.transit_days = location.transit_days.saturating_sub(1);
    let mut notices = Vec::new();

    if location.transit_days == 0 {
        if location.jump_path.is_empty() {
            location.on_planet = true;
            notices.push(format!("Landed on {}.", location.system));
        } else {
            let next = location.jump_path.remove(0);
            location.system = next.system;
            location.owner = next.owner;
            if location.jump_path.is_empty() {
                location.on_planet = true;
                notices.push(format!("Arrived at {} and landed.", location.system));
            } else {
                location.transit_days = location.days_per_leg;
                notices.push(format!("Jumped to {}.", location.system));
            }
        }
        info!(system = %location.system, on_planet = location.on_planet, "Travel leg completed");
    }

    let result = state.location.clone();
    for notice in notices {
        state.report(ReportCategory::General, notice);
    }
    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::{CampaignOptions, OptionsSnapshot};
    use crate::triggers::TriggerFlags;
    use campaign_types::Waypoint;
    use chrono::NaiveDate;

    fn context(state: &CampaignState) -> TickContext {
        let today = NaiveDate::from_ymd_opt(3025, 2, 10).unwrap();
        TickContext {
            yesterday: today.pred_opt().unwrap(),
            today,
            triggers: TriggerFlags::evaluate(today),
            options: OptionsSnapshot::capture(&state.options),
            location: state.location.clone(),
        }
    }

    fn waypoint(system: &str) -> Waypoint {
        Waypoint {
            system: String::from(system),
            owner: String::from("FS"),
        }
    }

    #[test]
    fn planetside_campaign_stays_put() {
        let mut state = CampaignState::new(CampaignOptions::default());
        let ctx = context(&state);
        let location = advance(&mut state, &ctx);
        assert_eq!(location, state.location);
        assert!(state.reports().is_empty());
    }

    #[test]
    fn jumps_through_path_and_lands() {
        let mut state = CampaignState::new(CampaignOptions::default());
        state.location.on_planet = false;
        state.location.days_per_leg = 2;
        state.location.transit_days = 1;
        state.location.jump_path = vec![waypoint("Tikonov"), waypoint("New Avalon")];
        let ctx = context(&state);

        let location = advance(&mut state, &ctx);
        assert_eq!(location.system, "Tikonov");
        assert_eq!(location.transit_days, 2);
        assert!(!location.on_planet);

        advance(&mut state, &ctx);
        let location = advance(&mut state, &ctx);
        assert_eq!(location.system, "New Avalon");
        assert!(location.on_planet);
        assert!(!location.is_travelling());
    }
}
