//! Enumeration types for the career log.
//!
//! Every enum here has a stable textual form (`as_str`) that is used both in
//! the persisted save tree and in the CSV export. Parsing goes through
//! [`core::str::FromStr`] and reports [`ParseEnumError`] on unknown input.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A textual value did not match any variant of the named enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value: {value:?}")]
pub struct ParseEnumError {
    /// Name of the enum that was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

/// Generates `as_str`, `Display` and `FromStr` for a fieldless enum whose
/// textual form equals the variant name.
macro_rules! text_enum {
    ($name:ident { $($variant:ident),+ $(,)? }) => {
        impl $name {
            /// Stable textual form of this variant.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant),)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $(stringify!($variant) => Ok(Self::$variant),)+
                    other => Err(ParseEnumError::new(stringify!($name), other)),
                }
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Contract lifecycle
// ---------------------------------------------------------------------------

/// A contract lifecycle transition recorded in the contract log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ContractEventType {
    /// The player accepted the contract (advance paid out).
    Accept,
    /// The contract was completed (reward paid out).
    Complete,
    /// The contract failed (deadline missed or objective lost).
    Fail,
    /// The player cancelled the contract (penalty charged).
    Cancel,
}

text_enum!(ContractEventType {
    Accept,
    Complete,
    Fail,
    Cancel
});

// ---------------------------------------------------------------------------
// Facility construction
// ---------------------------------------------------------------------------

/// Progress of a facility upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ConstructionState {
    /// The upgrade was queued and its cost committed.
    Started,
    /// The upgrade finished building.
    Completed,
}

text_enum!(ConstructionState { Started, Completed });

/// A space-center facility that can be upgraded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Facility {
    /// Vehicle Assembly Building.
    VehicleAssemblyBuilding,
    /// Spaceplane Hangar.
    SpaceplaneHangar,
    /// Research and Development complex.
    ResearchAndDevelopment,
    /// Launch pad.
    LaunchPad,
    /// Runway.
    Runway,
    /// Administration building.
    Administration,
    /// Astronaut complex.
    AstronautComplex,
    /// Mission control.
    MissionControl,
    /// Tracking station.
    TrackingStation,
}

text_enum!(Facility {
    VehicleAssemblyBuilding,
    SpaceplaneHangar,
    ResearchAndDevelopment,
    LaunchPad,
    Runway,
    Administration,
    AstronautComplex,
    MissionControl,
    TrackingStation,
});

// ---------------------------------------------------------------------------
// Funds transactions
// ---------------------------------------------------------------------------

/// Why the host changed the player's currencies.
///
/// Only a handful of reasons drive classification; the rest land in the
/// "other" buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransactionReason {
    /// No specific reason given.
    #[default]
    None,
    /// Advance paid when accepting a contract.
    ContractAdvance,
    /// Reward paid when completing a contract.
    ContractReward,
    /// Penalty charged when a contract fails or is cancelled.
    ContractPenalty,
    /// Charge for declining an offered contract.
    ContractDecline,
    /// Cost of rolling a vessel out to the pad or runway.
    VesselRollout,
    /// Refund for recovering a vessel.
    VesselRecovery,
    /// A vessel was lost.
    VesselLoss,
    /// Entry cost paid to unlock a part.
    RnDPartPurchase,
    /// A tech node was researched.
    RnDTechResearch,
    /// Income from a strategy.
    StrategyOutput,
    /// Cost of activating a strategy.
    StrategySetup,
    /// Science transmitted from a vessel.
    ScienceTransmission,
    /// Facility repair.
    StructureRepair,
    /// Facility construction.
    StructureConstruction,
    /// Crew hired.
    CrewRecruited,
    /// Milestone or world-first reward.
    ProgressionAchievement,
    /// Changed through a debug cheat.
    Cheating,
}

text_enum!(TransactionReason {
    None,
    ContractAdvance,
    ContractReward,
    ContractPenalty,
    ContractDecline,
    VesselRollout,
    VesselRecovery,
    VesselLoss,
    RnDPartPurchase,
    RnDTechResearch,
    StrategyOutput,
    StrategySetup,
    ScienceTransmission,
    StructureRepair,
    StructureConstruction,
    CrewRecruited,
    ProgressionAchievement,
    Cheating,
});

impl TransactionReason {
    /// Whether the reason is one of the four contract payment reasons.
    pub const fn is_contract_payment(self) -> bool {
        matches!(
            self,
            Self::ContractPenalty
                | Self::ContractDecline
                | Self::ContractAdvance
                | Self::ContractReward
        )
    }

    /// Whether the reason is a vessel rollout or recovery.
    pub const fn is_launch_fee(self) -> bool {
        matches!(self, Self::VesselRollout | Self::VesselRecovery)
    }
}

// ---------------------------------------------------------------------------
// Vessel situation
// ---------------------------------------------------------------------------

/// Situation of a vessel as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VesselSituation {
    /// Sitting on the pad or runway, not yet launched.
    Prelaunch,
    /// Landed on a surface.
    Landed,
    /// Splashed down in water.
    Splashed,
    /// Flying in atmosphere.
    Flying,
    /// Suborbital trajectory.
    SubOrbital,
    /// Stable orbit.
    Orbiting,
    /// Escaping the current body.
    Escaping,
    /// Docked to another vessel.
    Docked,
}

text_enum!(VesselSituation {
    Prelaunch,
    Landed,
    Splashed,
    Flying,
    SubOrbital,
    Orbiting,
    Escaping,
    Docked,
});

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn text_form_matches_variant_name() {
        assert_eq!(ContractEventType::Cancel.as_str(), "Cancel");
        assert_eq!(
            Facility::VehicleAssemblyBuilding.to_string(),
            "VehicleAssemblyBuilding"
        );
        assert_eq!(
            "RnDPartPurchase".parse::<TransactionReason>().unwrap(),
            TransactionReason::RnDPartPurchase
        );
    }

    #[test]
    fn unknown_text_is_rejected() {
        let err = "Demolished".parse::<ConstructionState>().unwrap_err();
        assert_eq!(err.kind, "ConstructionState");
        assert_eq!(err.value, "Demolished");
    }

    #[test]
    fn contract_payment_reasons() {
        assert!(TransactionReason::ContractPenalty.is_contract_payment());
        assert!(TransactionReason::ContractDecline.is_contract_payment());
        assert!(!TransactionReason::VesselRollout.is_contract_payment());
        assert!(TransactionReason::VesselRecovery.is_launch_fee());
        assert!(!TransactionReason::RnDPartPurchase.is_launch_fee());
    }

    #[test]
    fn serde_uses_variant_names() {
        let json = serde_json::to_string(&ConstructionState::Completed).unwrap();
        assert_eq!(json, "\"Completed\"");
    }
}
