//! Funds-change classification.
//!
//! Every funds delta lands in exactly one [`FundsBucket`]. The decision is
//! a fixed priority table; the first matching rule wins:
//!
//! | # | Condition | Bucket |
//! |---|-----------|--------|
//! | 1 | contract penalty/decline/advance/reward | `ContractRewards` |
//! | 2 | maintenance scope | `MaintenanceFees` |
//! | 3 | tooling scope | `ToolingFees` |
//! | 4 | vessel rollout/recovery | `LaunchFees` |
//! | 5 | part entry purchase | `EntryCosts` |
//! | 6 | positive delta | `OtherFundsEarned` |
//! | 7 | otherwise | `OtherFees` |
//!
//! Income buckets add the delta; fee buckets subtract it, so fees are
//! stored as positive magnitudes.

use careerlog_types::{LogPeriod, TransactionReason};

use crate::scope::{EventScope, ScopeKind};

/// Accumulator field of a [`LogPeriod`] that receives a funds delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FundsBucket {
    /// Contract advances, rewards, penalties and decline charges.
    ContractRewards,
    /// Facility maintenance.
    MaintenanceFees,
    /// Part tooling.
    ToolingFees,
    /// Vessel rollout and recovery.
    LaunchFees,
    /// Part entry costs.
    EntryCosts,
    /// Unclassified income.
    OtherFundsEarned,
    /// Unclassified spending.
    OtherFees,
}

impl FundsBucket {
    /// Add `delta` to the matching field of `period`.
    pub fn apply(self, period: &mut LogPeriod, delta: f64) {
        match self {
            Self::ContractRewards => period.contract_rewards += delta,
            Self::MaintenanceFees => period.maintenance_fees -= delta,
            Self::ToolingFees => period.tooling_fees -= delta,
            Self::LaunchFees => period.launch_fees -= delta,
            Self::EntryCosts => period.entry_costs -= delta,
            Self::OtherFundsEarned => period.other_funds_earned += delta,
            Self::OtherFees => period.other_fees -= delta,
        }
    }
}

/// Pick the bucket for a funds delta.
pub fn classify_funds_change(
    delta: f64,
    reason: TransactionReason,
    scope: EventScope,
) -> FundsBucket {
    if reason.is_contract_payment() {
        return FundsBucket::ContractRewards;
    }
    match scope.kind() {
        Some(ScopeKind::Maintenance) => return FundsBucket::MaintenanceFees,
        Some(ScopeKind::Tooling) => return FundsBucket::ToolingFees,
        Some(ScopeKind::Ignore) | None => {}
    }
    if reason.is_launch_fee() {
        return FundsBucket::LaunchFees;
    }
    if reason == TransactionReason::RnDPartPurchase {
        return FundsBucket::EntryCosts;
    }
    if delta > 0.0 {
        FundsBucket::OtherFundsEarned
    } else {
        FundsBucket::OtherFees
    }
}
