//! Interfaces to the host game and the event payloads it delivers.
//!
//! The career log never reaches into the host directly. The embedding
//! environment implements [`CareerHost`] for clock and metric queries and
//! [`ContractNamer`] for contract identification, and translates its own
//! callbacks into the payload structs defined here.

use careerlog_types::{Facility, TransactionReason, VesselSituation};

/// A host query failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// The subsystem that answers the query is not loaded.
    #[error("host subsystem unavailable: {0}")]
    Unavailable(String),

    /// The query ran but raised an error.
    #[error("host query failed: {0}")]
    Query(String),
}

/// Clock and metric queries answered by the host game.
///
/// The infallible queries read core game state that always exists. The
/// fallible ones go through optional host mods; callers log failures and
/// substitute zero.
pub trait CareerHost {
    /// Current simulated time in UT seconds.
    fn now(&self) -> f64;

    /// Funds on hand.
    fn funds(&self) -> f64;

    /// Science on hand.
    fn science(&self) -> f64;

    /// Career funds-gain multiplier setting.
    fn funds_gain_multiplier(&self) -> f64;

    /// Upgrade points spent on `facility`.
    ///
    /// # Errors
    ///
    /// Returns [`HostError`] if the construction subsystem cannot answer.
    fn spent_upgrades(&self, facility: Facility) -> Result<i32, HostError>;

    /// Total science points earned over the career. The host reports `-1`
    /// before any science has been earned.
    ///
    /// # Errors
    ///
    /// Returns [`HostError`] if the construction subsystem cannot answer.
    fn science_points_total(&self) -> Result<f64, HostError>;
}

/// Resolves the stable internal name of a contract.
pub trait ContractNamer {
    /// Internal name of `contract`.
    fn internal_name(&self, contract: &ContractInfo) -> String;
}

/// Namer that uses the contract type name reported by the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeNameNamer;

impl ContractNamer for TypeNameNamer {
    fn internal_name(&self, contract: &ContractInfo) -> String {
        contract.type_name.clone()
    }
}

// ---------------------------------------------------------------------------
// Event payloads
// ---------------------------------------------------------------------------

/// Contract metadata delivered with contract lifecycle events.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContractInfo {
    /// Player-facing title.
    pub title: String,
    /// Host type name of the contract.
    pub type_name: String,
    /// Whether the host accepted the contract automatically (record
    /// contracts).
    pub auto_accept: bool,
    /// Advance paid on acceptance.
    pub funds_advance: f64,
    /// Reward paid on completion.
    pub funds_completion: f64,
    /// Funds change on failure (negative for a penalty).
    pub funds_failure: f64,
    /// Reputation gained on completion.
    pub reputation_completion: f64,
    /// Reputation change on failure.
    pub reputation_failure: f64,
}

/// Per-currency totals of one host currency modification.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CurrencyModifierQuery {
    /// Why the currencies changed.
    pub reason: TransactionReason,
    /// Total funds delta.
    pub funds: f64,
    /// Total science delta.
    pub science: f64,
    /// Total reputation delta.
    pub reputation: f64,
}

/// A vessel changed situation.
#[derive(Debug, Clone, PartialEq)]
pub struct VesselSituationChange {
    /// Name of the vessel.
    pub vessel_name: String,
    /// Whether the vessel is the one the player is flying.
    pub is_active_vessel: bool,
    /// Situation before the change.
    pub from: VesselSituation,
    /// Situation after the change.
    pub to: VesselSituation,
}

/// A facility upgrade reported by the construction subsystem.
#[derive(Debug, Clone, PartialEq)]
pub struct FacilityUpgrade {
    /// The facility, or `None` for facilities added by third-party mods.
    pub facility: Option<Facility>,
    /// Zero-based target level.
    pub upgrade_level: i32,
    /// Upgrade cost.
    pub cost: f64,
}

/// A tech node finished research.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TechNode {
    /// Tech tree node identifier.
    pub tech_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_name_namer_uses_type_name() {
        let contract = ContractInfo {
            title: "Launch a satellite".to_owned(),
            type_name: "FirstSatellite".to_owned(),
            ..ContractInfo::default()
        };
        assert_eq!(TypeNameNamer.internal_name(&contract), "FirstSatellite");
    }
}
