//! Derived force aggregates: formation level, combat-team flag and icon.

use std::collections::BTreeSet;

use campaign_types::{ForceIconStatus, ForceId, FormationLevel, UnitId};
use tracing::debug;

use crate::state::CampaignState;

/// Recompute every force's derived values from the current roster.
///
/// References to units that are no longer on the roster are dropped first.
/// A parent chain that loops back on itself is cut at the repeat, so the
/// depth of a malformed tree is still finite.
pub fn recompute(state: &mut CampaignState) {
    let ids: Vec<ForceId> = state.forces.keys().copied().collect();
    for id in ids {
        let depth = depth_of(state, id);
        let icon = icon_for(state, id);
        let Some(force) = state.forces.get_mut(&id) else {
            continue;
        };
        let units = &state.units;
        force.units.retain(|unit| units.contains_key(unit));
        force.formation = FormationLevel::from_depth(depth);
        force.combat_team = force.formation == FormationLevel::Lance && !force.units.is_empty();
        force.icon = icon;
    }
    debug!(forces = state.forces.len(), "Force aggregates recomputed");
}

fn depth_of(state: &CampaignState, id: ForceId) -> usize {
    let mut seen = BTreeSet::from([id]);
    let mut depth = 0_usize;
    let mut current = state.forces.get(&id).and_then(|force| force.parent);
    while let Some(parent) = current {
        if !seen.insert(parent) {
            break;
        }
        depth = depth.saturating_add(1);
        current = state.forces.get(&parent).and_then(|force| force.parent);
    }
    depth
}

fn icon_for(state: &CampaignState, id: ForceId) -> ForceIconStatus {
    let units: Vec<UnitId> = state
        .forces
        .get(&id)
        .map(|force| {
            force
                .units
                .iter()
                .copied()
                .filter(|unit| state.units.contains_key(unit))
                .collect()
        })
        .unwrap_or_default();
    if units.is_empty() {
        return ForceIconStatus::Empty;
    }

    let deployed = units
        .iter()
        .filter_map(|unit| state.units.get(unit))
        .any(|unit| unit.deployed);
    if deployed {
        return ForceIconStatus::Deployed;
    }

    let damaged = units.iter().any(|unit_id| {
        let unfit = state
            .units
            .get(unit_id)
            .is_some_and(|unit| unit.refit.is_some() || !unit.is_in_service());
        unfit
            || state
                .parts
                .values()
                .any(|part| part.unit == Some(*unit_id) && part.damaged)
    });
    if damaged {
        ForceIconStatus::Damaged
    } else {
        ForceIconStatus::Ready
    }
}
