//! Technical labor, part and unit maintenance.
//!
//! Maintenance runs as two passes on every tick:
//!
//! 1. [`resolve_tasks`]: clear yesterday's engineer assignments, run the
//!    periodic unit maintenance checks, then resolve part arrivals and only
//!    after that the assigned repair tasks, so a part delivered today can be
//!    repaired today. Repaired spares are merged back into matching stock.
//! 2. [`resolve_units`]: unit-level consequences, namely delivery and
//!    repair-site assignment, refit progress, mothballing and removal of
//!    unsalvageable units.
//!
//! Labor minutes are reset once per tick by [`reset_labor`] before the first
//! pass; each repair task draws on them at most once per day.
//!
//! Every per-unit and per-part operation goes through the fault-isolated
//! processor: one malformed entity is reported and the rest of the fleet is
//! still maintained.

use campaign_types::{MothballState, PartId, PersonId, RepairSite, ReportCategory, UnitId};
use tracing::{debug, info};

use super::TickContext;
use crate::isolation::{self, EntityError, Isolated};
use crate::report::ReportSink;
use crate::state::CampaignState;

/// Labor minutes a routine maintenance check costs the technician.
pub const MAINTENANCE_MINUTES: u32 = 60;

/// Chance, in percent, that a maintenance check costs a quality grade.
const QUALITY_LOSS_PERCENT: u8 = 10;

/// Give every working technician a full day of labor minutes.
pub fn reset_labor(state: &mut CampaignState, ctx: &TickContext) {
    let minutes = ctx.options.personnel.tech_daily_minutes;
    for person in state.personnel.values_mut() {
        person.minutes_available = if person.is_working_tech() { minutes } else { 0 };
    }
}

/// First maintenance pass: unit checks, part arrivals, then repair tasks.
pub fn resolve_tasks(state: &mut CampaignState, ctx: &TickContext) {
    for unit in state.units.values_mut() {
        unit.engineer = None;
    }

    let units: Vec<Isolated<UnitId>> = state
        .units
        .values()
        .filter(|unit| unit.is_present() && !unit.unsalvageable)
        .map(|unit| Isolated::new(unit.id, unit.name.clone()))
        .collect();
    let checked = isolation::for_each(state, units, |state, id| maintain_unit(state, ctx, *id));

    let assigned: Vec<Isolated<PartId>> = state
        .parts
        .values()
        .filter(|part| part.has_assignment())
        .map(|part| Isolated::new(part.id, part.name.clone()))
        .collect();
    let in_transit: Vec<Isolated<PartId>> = state
        .parts
        .values()
        .filter(|part| !part.is_present())
        .map(|part| Isolated::new(part.id, part.name.clone()))
        .collect();

    let arrivals = isolation::for_each(state, in_transit, |state, id| resolve_arrival(state, *id));
    let tasks = isolation::for_each(state, assigned, |state, id| resolve_task(state, *id));
    let merged = merge_spares(state);

    debug!(
        units = checked.processed,
        arrivals = arrivals.processed,
        tasks = tasks.processed,
        merged,
        "Maintenance tasks resolved"
    );
}

fn maintain_unit(
    state: &mut CampaignState,
    ctx: &TickContext,
    id: UnitId,
) -> Result<(), EntityError> {
    let cycle = ctx.options.logistics.maintenance_cycle_days;
    let unit = state.units.get_mut(&id).ok_or(EntityError::Vanished)?;
    unit.days_since_maintenance = unit.days_since_maintenance.saturating_add(1);
    if unit.days_since_maintenance < cycle {
        return Ok(());
    }
    if unit.chassis.is_none() {
        return Err(EntityError::MissingData("chassis data"));
    }
    let unit_name = unit.name.clone();

    let Some(tech_id) = unit.tech else {
        state.report(
            ReportCategory::Technical,
            format!("{unit_name} has no technician; maintenance is overdue."),
        );
        return Ok(());
    };
    let tech = state
        .personnel
        .get_mut(&tech_id)
        .ok_or_else(|| EntityError::MissingLink {
            kind: "technician",
            id: tech_id.to_string(),
        })?;
    if !tech.is_working_tech() || tech.minutes_available < MAINTENANCE_MINUTES {
        let notice = format!("{} has no time to maintain {unit_name} today.", tech.name);
        state.report(ReportCategory::Technical, notice);
        return Ok(());
    }
    tech.minutes_available = tech.minutes_available.saturating_sub(MAINTENANCE_MINUTES);

    let quality_lost = state.roll_percent(QUALITY_LOSS_PERCENT);
    let unit = state.units.get_mut(&id).ok_or(EntityError::Vanished)?;
    unit.engineer = Some(tech_id);
    unit.days_since_maintenance = 0;
    if quality_lost && unit.quality > 0 {
        unit.quality = unit.quality.saturating_sub(1);
        let notice = format!(
            "{} failed its maintenance check; quality drops to {}.",
            unit.name, unit.quality
        );
        state.report(ReportCategory::Technical, notice);
    }
    Ok(())
}

fn resolve_arrival(state: &mut CampaignState, id: PartId) -> Result<(), EntityError> {
    let part = state.parts.get(&id).ok_or(EntityError::Vanished)?;
    if let Some(unit) = part.unit
        && !state.units.contains_key(&unit)
    {
        return Err(EntityError::MissingLink {
            kind: "unit",
            id: unit.to_string(),
        });
    }

    let part = state.parts.get_mut(&id).ok_or(EntityError::Vanished)?;
    part.days_to_arrival = part.days_to_arrival.saturating_sub(1);
    if part.is_present() {
        let notice = format!("{} x{} has arrived.", part.name, part.quantity);
        state.report(ReportCategory::Acquisitions, notice);
    }
    Ok(())
}

fn resolve_task(state: &mut CampaignState, id: PartId) -> Result<(), EntityError> {
    let part = state.parts.get(&id).ok_or(EntityError::Vanished)?;
    if !part.is_present() {
        return Ok(());
    }
    let Some(tech_id) = part.assigned_tech else {
        return Ok(());
    };
    let remaining = part.repair_minutes_remaining;
    let part_name = part.name.clone();

    let tech = state
        .personnel
        .get_mut(&tech_id)
        .ok_or_else(|| EntityError::MissingLink {
            kind: "technician",
            id: tech_id.to_string(),
        })?;
    if !tech.is_working_tech() {
        let notice = format!("{} is unavailable to repair {part_name}.", tech.name);
        state.report(ReportCategory::Technical, notice);
        return Ok(());
    }
    let worked = tech.minutes_available.min(remaining);
    tech.minutes_available = tech.minutes_available.saturating_sub(worked);
    let tech_name = tech.name.clone();

    let part = state.parts.get_mut(&id).ok_or(EntityError::Vanished)?;
    part.repair_minutes_remaining = remaining.saturating_sub(worked);
    if part.repair_minutes_remaining == 0 {
        part.damaged = false;
        part.assigned_tech = None;
        state.report(
            ReportCategory::Technical,
            format!("{tech_name} has repaired {part_name}."),
        );
    } else if worked == 0 {
        state.report(
            ReportCategory::Technical,
            format!("{tech_name} has no time left to work on {part_name}."),
        );
    }
    Ok(())
}

/// Merge interchangeable spares into a single stack. Returns the number of
/// stacks folded away.
fn merge_spares(state: &mut CampaignState) -> usize {
    let ids: Vec<PartId> = state
        .parts
        .values()
        .filter(|part| part.is_spare())
        .map(|part| part.id)
        .collect();

    let mut merged = 0_usize;
    let mut kept: Vec<PartId> = Vec::new();
    for id in ids {
        let Some(part) = state.parts.get(&id) else {
            continue;
        };
        let target = kept.iter().copied().find(|kept_id| {
            state
                .parts
                .get(kept_id)
                .is_some_and(|existing| existing.is_same_stock_as(part))
        });
        match target {
            Some(target_id) => {
                let quantity = part.quantity;
                state.parts.remove(&id);
                if let Some(stock) = state.parts.get_mut(&target_id) {
                    stock.quantity = stock.quantity.saturating_add(quantity);
                }
                merged = merged.saturating_add(1);
            }
            None => kept.push(id),
        }
    }
    merged
}

/// Second maintenance pass: deliveries, refits, mothballing and removal of
/// unsalvageable units.
pub fn resolve_units(state: &mut CampaignState, ctx: &TickContext) {
    let units: Vec<Isolated<UnitId>> = state
        .units
        .values()
        .map(|unit| Isolated::new(unit.id, unit.name.clone()))
        .collect();

    let mut doomed = Vec::new();
    let outcome = isolation::for_each(state, units, |state, id| {
        let unsalvageable = advance_unit(state, ctx, *id)?;
        if unsalvageable {
            doomed.push(*id);
        }
        Ok::<(), EntityError>(())
    });

    for id in doomed {
        remove_unit(state, id);
    }
    debug!(units = outcome.processed, "Unit states resolved");
}

fn advance_unit(
    state: &mut CampaignState,
    ctx: &TickContext,
    id: UnitId,
) -> Result<bool, EntityError> {
    let unit = state.units.get_mut(&id).ok_or(EntityError::Vanished)?;
    let mut notices = Vec::new();

    if !unit.is_present() {
        unit.days_to_arrival = unit.days_to_arrival.saturating_sub(1);
        if unit.is_present() {
            unit.site = if ctx.location.on_planet {
                RepairSite::Field
            } else {
                RepairSite::Mobile
            };
            notices.push(format!("{} has been delivered.", unit.name));
        }
    }

    if let Some(refit) = unit.refit.as_mut() {
        refit.days_remaining = refit.days_remaining.saturating_sub(1);
        if refit.days_remaining == 0 {
            notices.push(format!(
                "{} has completed its refit to {}.",
                unit.name, refit.target
            ));
            unit.refit = None;
        }
    }

    unit.mothball = match unit.mothball {
        MothballState::Mothballing { days_remaining } => {
            let days_remaining = days_remaining.saturating_sub(1);
            if days_remaining == 0 {
                notices.push(format!("{} has been mothballed.", unit.name));
                MothballState::Mothballed
            } else {
                MothballState::Mothballing { days_remaining }
            }
        }
        MothballState::Activating { days_remaining } => {
            let days_remaining = days_remaining.saturating_sub(1);
            if days_remaining == 0 {
                notices.push(format!("{} has returned to active service.", unit.name));
                MothballState::Active
            } else {
                MothballState::Activating { days_remaining }
            }
        }
        other => other,
    };

    let unsalvageable = unit.unsalvageable;
    for notice in notices {
        state.report(ReportCategory::Technical, notice);
    }
    Ok(unsalvageable)
}

fn remove_unit(state: &mut CampaignState, id: UnitId) {
    let Some(unit) = state.units.remove(&id) else {
        return;
    };
    state.parts.retain(|_, part| part.unit != Some(id));
    for person in state.personnel.values_mut() {
        if person.unit == Some(id) {
            person.unit = None;
        }
    }
    for force in state.forces.values_mut() {
        force.units.retain(|unit_id| *unit_id != id);
    }
    info!(unit = %unit.name, "Unsalvageable unit removed");
    state.report(
        ReportCategory::Technical,
        format!("{} is unsalvageable and has been removed.", unit.name),
    );
}

/// Assign `tech` to repair `part`, requiring `minutes` of labor.
pub fn assign_repair(
    state: &mut CampaignState,
    part: PartId,
    tech: PersonId,
    minutes: u32,
) -> bool {
    match state.parts.get_mut(&part) {
        Some(part) => {
            part.damaged = true;
            part.assigned_tech = Some(tech);
            part.repair_minutes_remaining = minutes;
            true
        }
        None => false,
    }
}
