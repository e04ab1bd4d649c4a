//! Career log records: calendar periods and the four event kinds.
//!
//! A [`LogPeriod`] covers the half-open interval `[start_ut, end_ut)` and
//! accumulates funds totals while it is current. Events are standalone
//! timestamped records; which period an event belongs to is always derived
//! from its timestamp via [`Timestamped::is_in_period`].

use crate::enums::{ConstructionState, ContractEventType, Facility};

// ---------------------------------------------------------------------------
// Period
// ---------------------------------------------------------------------------

/// One calendar bucket of career activity.
///
/// The snapshot fields (`current_funds` through `funds_gain_mult`) are
/// written once when the period is closed by a rollover. The running totals
/// (`contract_rewards` through `other_fees`) are accumulated while the
/// period is current. Fees are stored as positive magnitudes.
#[derive(Debug, Clone, PartialEq)]
pub struct LogPeriod {
    /// Inclusive start of the period in UT seconds.
    pub start_ut: f64,
    /// Exclusive end of the period in UT seconds.
    pub end_ut: f64,

    /// Funds on hand when the period closed.
    pub current_funds: f64,
    /// Science on hand when the period closed.
    pub current_sci: f64,
    /// Cumulative science earned over the whole career when the period closed.
    pub science_earned: f64,
    /// Spent upgrade points in the Vehicle Assembly Building.
    pub vab_upgrades: i32,
    /// Spent upgrade points in the Spaceplane Hangar.
    pub sph_upgrades: i32,
    /// Spent upgrade points in Research and Development.
    pub rnd_upgrades: i32,

    /// Net contract advances, rewards, penalties and decline charges.
    pub contract_rewards: f64,
    /// Facility maintenance paid.
    pub maintenance_fees: f64,
    /// Part tooling paid.
    pub tooling_fees: f64,
    /// Vessel rollout costs net of recovery refunds.
    pub launch_fees: f64,
    /// Part entry costs paid.
    pub entry_costs: f64,
    /// Unclassified income.
    pub other_funds_earned: f64,
    /// Unclassified spending.
    pub other_fees: f64,

    /// Career funds-gain multiplier in effect when the period closed.
    pub funds_gain_mult: f64,
}

impl LogPeriod {
    /// Create an empty period covering `[start_ut, end_ut)`.
    pub const fn new(start_ut: f64, end_ut: f64) -> Self {
        Self {
            start_ut,
            end_ut,
            current_funds: 0.0,
            current_sci: 0.0,
            science_earned: 0.0,
            vab_upgrades: 0,
            sph_upgrades: 0,
            rnd_upgrades: 0,
            contract_rewards: 0.0,
            maintenance_fees: 0.0,
            tooling_fees: 0.0,
            launch_fees: 0.0,
            entry_costs: 0.0,
            other_funds_earned: 0.0,
            other_fees: 0.0,
            funds_gain_mult: 1.0,
        }
    }

    /// Whether `ut` falls inside `[start_ut, end_ut)`.
    pub fn contains(&self, ut: f64) -> bool {
        self.start_ut <= ut && ut < self.end_ut
    }

    /// Net funds movement accumulated in this period.
    ///
    /// Income counts positive, fees negative. This equals the sum of every
    /// funds delta classified into the period.
    pub fn net_funds_change(&self) -> f64 {
        self.contract_rewards + self.other_funds_earned
            - self.maintenance_fees
            - self.tooling_fees
            - self.launch_fees
            - self.entry_costs
            - self.other_fees
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// A record stamped with the UT at which it happened.
pub trait Timestamped {
    /// UT seconds at which the event was recorded.
    fn ut(&self) -> f64;

    /// Whether the event falls inside `period`.
    fn is_in_period(&self, period: &LogPeriod) -> bool {
        period.contains(self.ut())
    }
}

/// A contract lifecycle transition.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractEvent {
    /// When the transition happened.
    pub ut: f64,
    /// Which transition this is.
    pub event_type: ContractEventType,
    /// Funds paid (positive) or charged (negative) by the transition.
    pub funds_change: f64,
    /// Reputation gained or lost.
    pub rep_change: f64,
    /// Player-facing contract title.
    pub display_name: String,
    /// Stable contract type identifier.
    pub internal_name: String,
}

impl Timestamped for ContractEvent {
    fn ut(&self) -> f64 {
        self.ut
    }
}

/// A vessel launch.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchEvent {
    /// When the vessel left the pad.
    pub ut: f64,
    /// Name of the launched vessel.
    pub vessel_name: String,
}

impl Timestamped for LaunchEvent {
    fn ut(&self) -> f64 {
        self.ut
    }
}

/// A facility upgrade being queued or finishing.
#[derive(Debug, Clone, PartialEq)]
pub struct FacilityConstructionEvent {
    /// When the construction state changed.
    pub ut: f64,
    /// The facility being upgraded.
    pub facility: Facility,
    /// Zero-based level the facility is being upgraded to.
    pub new_level: i32,
    /// Cost of the upgrade.
    pub cost: f64,
    /// Whether the upgrade started or completed.
    pub state: ConstructionState,
}

impl Timestamped for FacilityConstructionEvent {
    fn ut(&self) -> f64 {
        self.ut
    }
}

/// A tech node finishing research.
#[derive(Debug, Clone, PartialEq)]
pub struct TechResearchEvent {
    /// When research completed.
    pub ut: f64,
    /// Tech tree node identifier.
    pub node_name: String,
}

impl Timestamped for TechResearchEvent {
    fn ut(&self) -> f64 {
        self.ut
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn period_is_half_open() {
        let period = LogPeriod::new(100.0, 200.0);
        assert!(period.contains(100.0));
        assert!(period.contains(199.999));
        assert!(!period.contains(200.0));
        assert!(!period.contains(99.0));
    }

    #[test]
    fn new_period_defaults() {
        let period = LogPeriod::new(0.0, 10.0);
        assert_eq!(period.funds_gain_mult, 1.0);
        assert_eq!(period.net_funds_change(), 0.0);
    }

    #[test]
    fn net_funds_change_signs() {
        let mut period = LogPeriod::new(0.0, 10.0);
        period.contract_rewards = 1000.0;
        period.other_funds_earned = 50.0;
        period.maintenance_fees = 300.0;
        period.launch_fees = 200.0;
        assert_eq!(period.net_funds_change(), 550.0);
    }

    #[test]
    fn event_membership_uses_timestamp() {
        let period = LogPeriod::new(0.0, 10.0);
        let inside = TechResearchEvent {
            ut: 5.0,
            node_name: "basicRocketry".to_owned(),
        };
        let boundary = LaunchEvent {
            ut: 10.0,
            vessel_name: "Sounding Rocket".to_owned(),
        };
        assert!(inside.is_in_period(&period));
        assert!(!boundary.is_in_period(&period));
    }
}
