//! Date-triggered narrative events.
//!
//! Celebrations run before the report channels are cleared, so their
//! notices are returned to the orchestrator instead of being written to a
//! channel. They only read simulation state.

use campaign_types::ReportCategory;
use chrono::Datelike;
use tracing::debug;

use super::TickContext;
use crate::report::ReportSink;
use crate::state::CampaignState;

/// Holiday, founding anniversary and birthday notices for today.
pub fn celebrations(state: &CampaignState, ctx: &TickContext) -> Vec<String> {
    let today = ctx.today;
    let mut notices = Vec::new();

    if ctx.triggers.is_first_of_year {
        notices.push(format!("Happy New Year {}!", today.year()));
    }

    let founded = state.founded_on;
    if founded.month() == today.month() && founded.day() == today.day() {
        let years = today.years_since(founded).unwrap_or(0);
        if years > 0 {
            notices.push(format!(
                "{} celebrates {years} years since its founding.",
                state.name
            ));
        }
    }

    for person in state.personnel.values() {
        if person.is_active() && person.is_birthday(today) {
            notices.push(format!(
                "{} turns {} today.",
                person.name,
                person.age_on(today)
            ));
        }
    }

    debug!(%today, count = notices.len(), "Celebrations evaluated");
    notices
}

/// Roll every configured special event window open today.
pub fn special_events(state: &mut CampaignState, ctx: &TickContext) {
    for window in &ctx.options.events.special_windows {
        if window.is_open(ctx.today) && state.roll_percent(window.chance_percent) {
            state.report(
                ReportCategory::General,
                format!("Special event: {}.", window.name),
            );
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::{CampaignOptions, OptionsSnapshot, SpecialEventWindow};
    use crate::triggers::TriggerFlags;
    use campaign_types::{Location, Person, PersonId, PersonnelRole};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn context(options: &CampaignOptions, today: NaiveDate) -> TickContext {
        TickContext {
            yesterday: today.pred_opt().unwrap(),
            today,
            triggers: TriggerFlags::evaluate(today),
            options: OptionsSnapshot::capture(options),
            location: Location::planetside("Galatea", "MERC"),
        }
    }

    #[test]
    fn new_year_anniversary_and_birthday() {
        let mut options = CampaignOptions::default();
        options.campaign.start_date = date(3024, 1, 1);
        let mut state = CampaignState::new(options.clone());
        state.add_person(Person::new(
            PersonId::new(),
            "Vera Kowalczyk",
            PersonnelRole::MekWarrior,
            date(3003, 1, 1),
            date(3024, 1, 1),
        ));

        let notices = celebrations(&state, &context(&options, date(3025, 1, 1)));
        assert_eq!(notices.len(), 3);
        assert!(notices.iter().any(|n| n.contains("3025")));
        assert!(notices.iter().any(|n| n.contains("1 years")));
        assert!(notices.iter().any(|n| n.contains("turns 22")));
    }

    #[test]
    fn ordinary_day_has_no_notices() {
        let options = CampaignOptions::default();
        let state = CampaignState::new(options.clone());
        assert!(celebrations(&state, &context(&options, date(3025, 4, 9))).is_empty());
    }

    #[test]
    fn special_event_fires_inside_window_only() {
        let mut options = CampaignOptions::default();
        options.events.special_windows.push(SpecialEventWindow {
            name: String::from("Founders Day"),
            start: date(3025, 6, 1),
            end: date(3025, 6, 3),
            chance_percent: 100,
        });
        let mut state = CampaignState::new(options.clone());

        special_events(&mut state, &context(&options, date(3025, 5, 31)));
        assert!(state.reports().is_empty());

        special_events(&mut state, &context(&options, date(3025, 6, 2)));
        assert_eq!(state.reports().entries(ReportCategory::General).len(), 1);
    }
}
