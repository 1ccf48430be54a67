//! Shared domain types for the campaign day-advance simulation.
//!
//! This crate is the single source of truth for the roster entities that
//! every phase of the daily tick reads and mutates.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for all entity identifiers
//! - [`enums`] -- Report categories, roles, statuses and lifecycle enums
//! - [`structs`] -- People, units, parts, forces, contracts, location, markets

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{
    ContractMode, ContractStatus, FormationLevel, ForceIconStatus, MoraleLevel, MothballState,
    PersonnelRole, PersonnelStatus, RepairSite, ReportCategory, ScenarioStatus,
};
pub use ids::{ContractId, ForceId, OfferId, PartId, PersonId, ScenarioId, UnitId};
pub use structs::{
    Applicant, Contract, Enrollment, FactionStanding, Force, Infection, Location, Part, Person,
    Refit, Scenario, ShoppingItem, Unit, UnitOffer, Waypoint,
};
