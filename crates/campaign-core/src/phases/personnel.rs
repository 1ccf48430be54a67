//! Personnel processing: labor pools, the daily personnel pass, dependents,
//! education, awards, prisoners and record purging.

use campaign_types::{Person, PersonId, PersonnelRole, PersonnelStatus, ReportCategory};
use chrono::Datelike;
use tracing::{debug, info};

use super::TickContext;
use crate::config::OptionsSnapshot;
use crate::isolation::{self, EntityError, Isolated};
use crate::phases::markets;
use crate::report::ReportSink;
use crate::state::CampaignState;

/// Top up the astech and medic pools to what the roster requires.
pub fn refill_pools(state: &mut CampaignState, options: &OptionsSnapshot) {
    let techs = state.count_active(PersonnelRole::is_tech);
    let doctors = state.count_active(PersonnelRole::is_doctor);
    let astechs = techs.saturating_mul(options.personnel.astechs_per_tech);
    let medics = doctors.saturating_mul(options.personnel.medics_per_doctor);
    state.pools.astechs = state.pools.astechs.max(astechs);
    state.pools.medics = state.pools.medics.max(medics);
    debug!(astechs = state.pools.astechs, medics = state.pools.medics, "Labor pools refilled");
}

/// Daily pass over every person still with the campaign.
///
/// Each person is processed in isolation: a person whose unit assignment
/// points at a unit that no longer exists is reported and skipped.
pub fn process_personnel(state: &mut CampaignState, ctx: &TickContext) {
    let queue: Vec<Isolated<PersonId>> = state
        .personnel
        .values()
        .filter(|person| person.status.is_present())
        .map(|person| Isolated::new(person.id, person.name.clone()))
        .collect();

    let outcome = isolation::for_each(state, queue, |state, id| process_person(state, ctx, *id));
    debug!(processed = outcome.processed, failed = outcome.failed.len(), "Personnel processed");
}

fn process_person(
    state: &mut CampaignState,
    ctx: &TickContext,
    id: PersonId,
) -> Result<(), EntityError> {
    let person = state.personnel.get(&id).ok_or(EntityError::Vanished)?;
    if let Some(unit) = person.unit
        && !state.units.contains_key(&unit)
    {
        return Err(EntityError::MissingLink {
            kind: "unit",
            id: unit.to_string(),
        });
    }

    let wounded = person.hits > 0;
    let bed_free = state.capacity.beds_in_use < state.capacity.hospital_beds;
    let mut healed = false;
    if wounded && bed_free {
        state.capacity.beds_in_use = state.capacity.beds_in_use.saturating_add(1);
        healed = state.roll_percent(ctx.options.medical.heal_percent);
    }

    let recovery = ctx.options.personnel.fatigue_recovery;
    let retirement_age = ctx.options.personnel.retirement_age;
    let mut notices = Vec::new();
    let mut turnover = None;

    let person = state.personnel.get_mut(&id).ok_or(EntityError::Vanished)?;
    if wounded {
        if healed {
            person.hits = person.hits.saturating_sub(1);
            notices.push((
                ReportCategory::Medical,
                if person.hits == 0 {
                    format!("{} is fully healed.", person.name)
                } else {
                    format!("{} recovers from a wound.", person.name)
                },
            ));
        } else if !bed_free {
            notices.push((
                ReportCategory::Medical,
                format!("{} cannot be treated: no hospital capacity.", person.name),
            ));
        }
    }

    if matches!(person.status, PersonnelStatus::Active | PersonnelStatus::OnLeave) {
        person.fatigue = person.fatigue.saturating_sub(recovery);
    }
    if person.status == PersonnelStatus::OnLeave && person.fatigue == 0 {
        person.status = PersonnelStatus::Active;
        notices.push((
            ReportCategory::Personnel,
            format!("{} returns from leave.", person.name),
        ));
    }

    let age = person.age_on(ctx.today);
    if person.is_active()
        && person.role != PersonnelRole::Dependent
        && person.is_birthday(ctx.today)
        && age >= retirement_age
    {
        person.status = PersonnelStatus::Retired;
        person.departed_on = Some(ctx.today);
        person.unit = None;
        let notice = format!("{} retires at age {age}.", person.name);
        info!(person = %person.name, age, "Person retired");
        turnover = Some(notice);
    }

    for (category, notice) in notices {
        state.report(category, notice);
    }
    if let Some(notice) = turnover {
        state.report(ReportCategory::Personnel, notice.clone());
        state.turnover_log.push(notice);
        state.release_assignments(&[id]);
    }
    Ok(())
}

/// Dependents join or leave the campaign.
pub fn churn_dependents(state: &mut CampaignState, ctx: &TickContext) {
    if !state.roll_percent(ctx.options.personnel.dependent_churn_percent) {
        return;
    }

    let leaving: Vec<PersonId> = state
        .personnel
        .values()
        .filter(|person| person.is_active() && person.role == PersonnelRole::Dependent)
        .map(|person| person.id)
        .collect();

    let join = leaving.is_empty() || state.roll_percent(50);
    if join {
        let id = PersonId::from_random_bytes(state.mint_bytes());
        let name = markets::random_name(state);
        let age = state.random_between(1, 60);
        let birth = ctx
            .today
            .with_year(ctx.today.year().saturating_sub(i32::try_from(age).unwrap_or(0)))
            .unwrap_or(ctx.today);
        let person = Person::new(id, name.clone(), PersonnelRole::Dependent, birth, ctx.today);
        state.add_person(person);
        state.report(
            ReportCategory::Personnel,
            format!("{name} has joined the campaign as a dependent."),
        );
        return;
    }

    let Some(index) = state.random_index(leaving.len()) else {
        return;
    };
    let Some(person) = leaving
        .get(index)
        .and_then(|id| state.personnel.get_mut(id))
    else {
        return;
    };
    person.status = PersonnelStatus::Departed;
    person.departed_on = Some(ctx.today);
    let notice = format!("{} has left the campaign.", person.name);
    state.report(ReportCategory::Personnel, notice);
}

/// Students whose course has finished return to active duty.
pub fn graduate_students(state: &mut CampaignState, ctx: &TickContext) {
    let mut notices = Vec::new();
    for person in state.personnel.values_mut() {
        if person.status != PersonnelStatus::Student {
            continue;
        }
        let Some(enrollment) = &person.enrollment else {
            continue;
        };
        if enrollment.graduation_date <= ctx.today {
            notices.push(format!(
                "{} graduates from {}.",
                person.name, enrollment.academy
            ));
            person.enrollment = None;
            person.status = PersonnelStatus::Active;
        }
    }
    for notice in notices {
        state.report(ReportCategory::Personnel, notice);
    }
}

/// Grant one service award per full year with the campaign.
pub fn grant_awards(state: &mut CampaignState, ctx: &TickContext) {
    let mut notices = Vec::new();
    for person in state.personnel.values_mut() {
        if !person.is_active() || person.role == PersonnelRole::Dependent {
            continue;
        }
        let years = ctx.today.years_since(person.recruited_on).unwrap_or(0);
        for year in 1..=years {
            let award = format!("Service Ribbon ({year} years)");
            if person.awards.insert(award.clone()) {
                notices.push(format!("{} receives the {award}.", person.name));
            }
        }
    }
    for notice in notices {
        state.report(ReportCategory::Personnel, notice);
    }
}

/// Minor prisoner events on Mondays, escapes and releases on the first.
pub fn prisoner_events(state: &mut CampaignState, ctx: &TickContext) {
    let prisoners: Vec<PersonId> = state
        .personnel
        .values()
        .filter(|person| person.status == PersonnelStatus::Prisoner)
        .map(|person| person.id)
        .collect();
    let options = &ctx.options.prisoners;

    for id in prisoners {
        let Some(name) = state.personnel.get(&id).map(|person| person.name.clone()) else {
            continue;
        };

        if ctx.triggers.is_monday && state.roll_percent(options.minor_event_percent) {
            state.report(
                ReportCategory::Personnel,
                format!("Minor incident in the holding cells involving {name}."),
            );
        }

        if !ctx.triggers.is_first_of_month {
            continue;
        }
        let outcome = if state.roll_percent(options.escape_percent) {
            Some((PersonnelStatus::Escaped, format!("Prisoner {name} has escaped.")))
        } else if state.roll_percent(options.release_percent) {
            Some((PersonnelStatus::Departed, format!("Prisoner {name} has been released.")))
        } else {
            None
        };
        if let Some((status, notice)) = outcome {
            if let Some(person) = state.personnel.get_mut(&id) {
                person.status = status;
                person.departed_on = Some(ctx.today);
            }
            state.report(ReportCategory::Personnel, notice);
        }
    }
}

/// Remove records of personnel who departed more than the configured number
/// of days ago, and clear any assignments still pointing at them.
pub fn purge_departed(state: &mut CampaignState, ctx: &TickContext) {
    let days = i64::from(ctx.options.personnel.purge_departed_days);
    let stale: Vec<PersonId> = state
        .personnel
        .values()
        .filter(|person| person.status.is_departed())
        .filter(|person| {
            person
                .departed_on
                .is_some_and(|left| ctx.today.signed_duration_since(left).num_days() > days)
        })
        .map(|person| person.id)
        .collect();

    if stale.is_empty() {
        return;
    }
    for id in &stale {
        state.personnel.remove(id);
    }
    let released = state.release_assignments(&stale);
    info!(count = stale.len(), released, "Departed personnel purged");
    state.report(
        ReportCategory::Personnel,
        format!("Purged {} departed personnel records.", stale.len()),
    );
}
