//! Enumeration types for the campaign simulation.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Report categories
// ---------------------------------------------------------------------------

/// A named report channel. Phases write human-readable outcomes into one of
/// these categories during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ReportCategory {
    /// Catch-all channel, also used for re-surfaced turnover entries.
    General,
    /// Recruitment, departures, awards, education.
    Personnel,
    /// Payments, rent and ledger roll-forward.
    Finances,
    /// Scenarios, batchalls and contract events.
    Battle,
    /// Healing, disease and fatigue.
    Medical,
    /// Maintenance, repairs, refits and contained entity failures.
    Technical,
    /// Procurement and part deliveries.
    Acquisitions,
    /// Faction standing and inter-faction relations.
    Politics,
}

impl ReportCategory {
    /// Every category, in display order.
    pub const ALL: [Self; 8] = [
        Self::General,
        Self::Personnel,
        Self::Finances,
        Self::Battle,
        Self::Medical,
        Self::Technical,
        Self::Acquisitions,
        Self::Politics,
    ];

    /// Human-readable channel label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Personnel => "personnel",
            Self::Finances => "finances",
            Self::Battle => "battle",
            Self::Medical => "medical",
            Self::Technical => "technical",
            Self::Acquisitions => "acquisitions",
            Self::Politics => "politics",
        }
    }
}

impl core::fmt::Display for ReportCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Personnel
// ---------------------------------------------------------------------------

/// The primary role a person fills in the campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PersonnelRole {
    /// Pilot of a ground combat unit.
    MekWarrior,
    /// Pilot of an aerospace unit.
    AeroPilot,
    /// Crew of a combat vehicle.
    VehicleCrew,
    /// Conventional infantry.
    Soldier,
    /// Technician performing maintenance and repairs.
    Tech,
    /// Doctor treating wounded personnel.
    Doctor,
    /// Command staff.
    AdminCommand,
    /// Logistics staff; required for procurement and resupply.
    AdminLogistics,
    /// Human resources staff.
    AdminHr,
    /// Transport staff.
    AdminTransport,
    /// Non-combatant dependent.
    Dependent,
}

impl PersonnelRole {
    /// Whether this role draws on the technical labor pool.
    pub const fn is_tech(self) -> bool {
        matches!(self, Self::Tech)
    }

    /// Whether this role treats patients.
    pub const fn is_doctor(self) -> bool {
        matches!(self, Self::Doctor)
    }

    /// Whether this role fights.
    pub const fn is_combat(self) -> bool {
        matches!(
            self,
            Self::MekWarrior | Self::AeroPilot | Self::VehicleCrew | Self::Soldier
        )
    }
}

/// Duty status of a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PersonnelStatus {
    /// On duty.
    Active,
    /// Temporarily off duty (fatigue response).
    OnLeave,
    /// Enrolled at an academy.
    Student,
    /// Held as a prisoner of the campaign.
    Prisoner,
    /// Left the campaign at retirement age.
    Retired,
    /// Left the campaign for any other reason.
    Departed,
    /// Prisoner who escaped custody.
    Escaped,
    /// Killed.
    Killed,
}

impl PersonnelStatus {
    /// Whether the person has permanently left the campaign.
    pub const fn is_departed(self) -> bool {
        matches!(
            self,
            Self::Retired | Self::Departed | Self::Escaped | Self::Killed
        )
    }

    /// Whether the person is still carried on the working roster.
    pub const fn is_present(self) -> bool {
        !self.is_departed()
    }
}

// ---------------------------------------------------------------------------
// Units and parts
// ---------------------------------------------------------------------------

/// Where repairs on a unit take place; better sites reduce repair time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RepairSite {
    /// No facilities at all.
    Improvised,
    /// Field kitchen and tents.
    Field,
    /// Mobile repair base.
    Mobile,
    /// Rented repair bay.
    Bay,
    /// Permanent facility.
    Facility,
    /// Factory conditions.
    Factory,
}

/// Mothball lifecycle of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MothballState {
    /// In active service.
    Active,
    /// Being prepared for storage; completes when the counter reaches zero.
    Mothballing {
        /// Days of work remaining.
        days_remaining: u32,
    },
    /// In storage.
    Mothballed,
    /// Being returned to service; completes when the counter reaches zero.
    Activating {
        /// Days of work remaining.
        days_remaining: u32,
    },
}

// ---------------------------------------------------------------------------
// Forces
// ---------------------------------------------------------------------------

/// Organizational level of a force, derived from its depth in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FormationLevel {
    /// Top-level formation.
    Regiment,
    /// Second level.
    Battalion,
    /// Third level.
    Company,
    /// Fourth level and below.
    Lance,
}

impl FormationLevel {
    /// Formation level for a force at `depth` (0 = root).
    pub const fn from_depth(depth: usize) -> Self {
        match depth {
            0 => Self::Regiment,
            1 => Self::Battalion,
            2 => Self::Company,
            _ => Self::Lance,
        }
    }
}

/// Readiness marker shown on a force icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ForceIconStatus {
    /// No units assigned.
    Empty,
    /// Every unit is operational.
    Ready,
    /// At least one unit is damaged, refitting or otherwise unavailable.
    Damaged,
    /// At least one unit is deployed to a scenario.
    Deployed,
}

// ---------------------------------------------------------------------------
// Contracts
// ---------------------------------------------------------------------------

/// Which contract-driven mode is in force.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractMode {
    /// No contract-driven scenario generation.
    #[default]
    None,
    /// Weekly scenario generation per contract.
    AgainstTheBot,
    /// Campaign-map driven generation; shares the weekly lifecycle.
    StratCon,
}

impl ContractMode {
    /// Whether a contract-driven mode is enabled.
    pub const fn is_enabled(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Lifecycle status of a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ContractStatus {
    /// Signed but not yet started.
    Pending,
    /// In force.
    Active,
    /// Ran to term or ended early in the campaign's favour.
    Completed,
    /// Ended early by the employer.
    Breached,
}

/// Enemy morale under a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MoraleLevel {
    /// The enemy is routed.
    Rout,
    /// Very low.
    VeryLow,
    /// Low.
    Low,
    /// Normal.
    Normal,
    /// High.
    High,
    /// Very high.
    VeryHigh,
    /// The enemy is overwhelming the campaign.
    Overwhelming,
}

impl MoraleLevel {
    /// One step lower, saturating at [`MoraleLevel::Rout`].
    pub const fn lower(self) -> Self {
        match self {
            Self::Rout | Self::VeryLow => Self::Rout,
            Self::Low => Self::VeryLow,
            Self::Normal => Self::Low,
            Self::High => Self::Normal,
            Self::VeryHigh => Self::High,
            Self::Overwhelming => Self::VeryHigh,
        }
    }

    /// One step higher, saturating at [`MoraleLevel::Overwhelming`].
    pub const fn higher(self) -> Self {
        match self {
            Self::Rout => Self::VeryLow,
            Self::VeryLow => Self::Low,
            Self::Low => Self::Normal,
            Self::Normal => Self::High,
            Self::High => Self::VeryHigh,
            Self::VeryHigh | Self::Overwhelming => Self::Overwhelming,
        }
    }
}

/// Resolution status of a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ScenarioStatus {
    /// Generated, not yet reached.
    Pending,
    /// Forces deployed; awaiting resolution.
    Deployed,
    /// Resolved as a victory.
    Victory,
    /// Resolved as a defeat.
    Defeat,
}

impl ScenarioStatus {
    /// Whether the scenario still awaits resolution.
    pub const fn is_unresolved(self) -> bool {
        matches!(self, Self::Pending | Self::Deployed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn morale_saturates_at_both_ends() {
        assert_eq!(MoraleLevel::Rout.lower(), MoraleLevel::Rout);
        assert_eq!(MoraleLevel::Overwhelming.higher(), MoraleLevel::Overwhelming);
        assert_eq!(MoraleLevel::Normal.higher().lower(), MoraleLevel::Normal);
    }

    #[test]
    fn departed_statuses() {
        assert!(PersonnelStatus::Killed.is_departed());
        assert!(PersonnelStatus::Retired.is_departed());
        assert!(!PersonnelStatus::Prisoner.is_departed());
        assert!(PersonnelStatus::Student.is_present());
    }

    #[test]
    fn formation_level_by_depth() {
        assert_eq!(FormationLevel::from_depth(0), FormationLevel::Regiment);
        assert_eq!(FormationLevel::from_depth(2), FormationLevel::Company);
        assert_eq!(FormationLevel::from_depth(9), FormationLevel::Lance);
    }

    #[test]
    fn contract_mode_deserializes_snake_case() {
        let mode: ContractMode = serde_json::from_str("\"against_the_bot\"").unwrap_or_default();
        assert_eq!(mode, ContractMode::AgainstTheBot);
        assert!(mode.is_enabled());
        assert!(!ContractMode::None.is_enabled());
    }

    #[test]
    fn report_categories_are_ordered_and_labelled() {
        assert_eq!(ReportCategory::ALL.len(), 8);
        assert_eq!(ReportCategory::Technical.to_string(), "technical");
    }
}
