//! Disease and fatigue.
//!
//! The daily infection check depends on the location captured after
//! travel. The Monday block runs the fatigue response first, so it sees the
//! fatigue values the personnel pass produced earlier in the same tick.

use campaign_types::{Infection, PersonId, PersonnelStatus, ReportCategory};
use tracing::info;

use super::TickContext;
use crate::report::ReportSink;
use crate::state::CampaignState;

const LOCAL_DISEASE: &str = "Local fever";

/// Roll for new infections on a planet with a disease risk.
pub fn check_disease(state: &mut CampaignState, ctx: &TickContext) {
    let risk = ctx.location.disease_risk;
    if !ctx.location.on_planet || risk == 0 {
        return;
    }

    let exposed: Vec<PersonId> = state
        .personnel
        .values()
        .filter(|person| person.status.is_present() && person.infection.is_none())
        .map(|person| person.id)
        .collect();

    for id in exposed {
        if !state.roll_percent(risk) {
            continue;
        }
        let Some(person) = state.personnel.get_mut(&id) else {
            continue;
        };
        person.infection = Some(Infection {
            name: String::from(LOCAL_DISEASE),
            severity: 1,
        });
        let notice = format!(
            "{} has contracted {} on {}.",
            person.name, LOCAL_DISEASE, ctx.location.system
        );
        state.report(ReportCategory::Medical, notice);
    }
}

/// Send personnel whose fatigue exceeds the threshold on leave.
pub fn fatigue_response(state: &mut CampaignState, ctx: &TickContext) {
    let threshold = ctx.options.personnel.fatigue_threshold;
    let mut notices = Vec::new();
    for person in state.personnel.values_mut() {
        if person.is_active() && person.fatigue > threshold {
            person.status = PersonnelStatus::OnLeave;
            notices.push(format!(
                "{} is sent on leave to recover from fatigue.",
                person.name
            ));
        }
    }
    for notice in notices {
        state.report(ReportCategory::Medical, notice);
    }
}

/// Weekly progression of existing infections: recovery, worsening, death.
pub fn progress_disease(state: &mut CampaignState, ctx: &TickContext) {
    let medical = &ctx.options.medical;
    let infected: Vec<PersonId> = state
        .personnel
        .values()
        .filter(|person| person.status.is_present() && person.infection.is_some())
        .map(|person| person.id)
        .collect();

    for id in infected {
        let recovered = state.roll_percent(medical.recovery_percent);
        let worsened = !recovered && state.roll_percent(medical.worsen_percent);
        let Some(person) = state.personnel.get_mut(&id) else {
            continue;
        };
        let Some(infection) = person.infection.as_mut() else {
            continue;
        };

        if recovered {
            let notice = format!("{} has recovered from {}.", person.name, infection.name);
            person.infection = None;
            state.report(ReportCategory::Medical, notice);
        } else if worsened {
            infection.severity = infection.severity.saturating_add(1);
            if infection.severity >= medical.fatal_severity {
                let notice = format!("{} has died of {}.", person.name, infection.name);
                person.infection = None;
                person.status = PersonnelStatus::Killed;
                person.departed_on = Some(ctx.today);
                person.unit = None;
                info!(person = %person.name, "Person died of disease");
                state.report(ReportCategory::Medical, notice.clone());
                state.turnover_log.push(notice);
                state.release_assignments(&[id]);
            } else {
                let notice = format!("{}'s {} worsens.", person.name, infection.name);
                state.report(ReportCategory::Medical, notice);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::{CampaignOptions, OptionsSnapshot};
    use crate::triggers::TriggerFlags;
    use campaign_types::{Location, Person, PersonnelRole};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn context(options: &CampaignOptions, location: Location) -> TickContext {
        let today = date(3025, 3, 3);
        TickContext {
            yesterday: today.pred_opt().unwrap(),
            today,
            triggers: TriggerFlags::evaluate(today),
            options: OptionsSnapshot::capture(options),
            location,
        }
    }

    fn soldier(state: &mut CampaignState) -> PersonId {
        let person = Person::new(
            PersonId::new(),
            "Trooper",
            PersonnelRole::Soldier,
            date(3000, 1, 1),
            date(3020, 1, 1),
        );
        let id = person.id;
        state.add_person(person);
        id
    }

    #[test]
    fn certain_risk_infects_everyone_on_planet() {
        let options = CampaignOptions::default();
        let mut state = CampaignState::new(options.clone());
        let id = soldier(&mut state);
        let mut location = Location::planetside("Plague World", "CC");
        location.disease_risk = 100;

        check_disease(&mut state, &context(&options, location));
        assert!(state.personnel.get(&id).unwrap().infection.is_some());
    }

    #[test]
    fn no_infection_in_transit() {
        let options = CampaignOptions::default();
        let mut state = CampaignState::new(options.clone());
        let id = soldier(&mut state);
        let mut location = Location::planetside("Plague World", "CC");
        location.disease_risk = 100;
        location.on_planet = false;

        check_disease(&mut state, &context(&options, location));
        assert!(state.personnel.get(&id).unwrap().infection.is_none());
    }

    #[test]
    fn fatigue_above_threshold_sends_on_leave() {
        let options = CampaignOptions::default();
        let mut state = CampaignState::new(options.clone());
        let id = soldier(&mut state);
        state.personnel.get_mut(&id).unwrap().fatigue = 13;

        fatigue_response(&mut state, &context(&options, Location::planetside("A", "B")));
        assert_eq!(state.personnel.get(&id).unwrap().status, PersonnelStatus::OnLeave);
    }

    #[test]
    fn fatal_infection_kills_and_records_turnover() {
        let mut options = CampaignOptions::default();
        options.medical.recovery_percent = 0;
        options.medical.worsen_percent = 100;
        options.medical.fatal_severity = 2;
        let mut state = CampaignState::new(options.clone());
        let id = soldier(&mut state);
        state.personnel.get_mut(&id).unwrap().infection = Some(Infection {
            name: String::from("Blight"),
            severity: 1,
        });

        progress_disease(&mut state, &context(&options, Location::planetside("A", "B")));
        let person = state.personnel.get(&id).unwrap();
        assert_eq!(person.status, PersonnelStatus::Killed);
        assert_eq!(state.turnover_log.len(), 1);
    }

    #[test]
    fn certain_recovery_clears_infection() {
        let mut options = CampaignOptions::default();
        options.medical.recovery_percent = 100;
        let mut state = CampaignState::new(options.clone());
        let id = soldier(&mut state);
        state.personnel.get_mut(&id).unwrap().infection = Some(Infection {
            name: String::from("Blight"),
            severity: 3,
        });

        progress_disease(&mut state, &context(&options, Location::planetside("A", "B")));
        assert!(state.personnel.get(&id).unwrap().infection.is_none());
    }
}
