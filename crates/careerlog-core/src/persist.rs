//! Mapping between career log records and save-tree nodes.
//!
//! Each record kind is stored as one node whose keys equal the record's
//! attribute names in the host save format (`StartUT`, `FundsChange`, ...).
//! Section and record node names are fixed by the host format. Only
//! timestamps and enum values are required; a missing name loads as empty.

use careerlog_types::{
    ContractEvent, FacilityConstructionEvent, LaunchEvent, LogPeriod, TechResearchEvent,
};

use crate::save::{SaveError, SaveNode};

/// Section holding `LOGPERIOD` records.
pub const PERIODS_SECTION: &str = "LOGPERIODS";
/// Section holding `CONTRACT` records.
pub const CONTRACTS_SECTION: &str = "CONTRACTS";
/// Section holding `LAUNCHEVENT` records.
pub const LAUNCHES_SECTION: &str = "LAUNCHEVENTS";
/// Section holding `FACILITYCONSTRUCTION` records.
pub const FACILITIES_SECTION: &str = "FACILITYCONSTRUCTIONS";
/// Section holding `TECH` records.
pub const TECHS_SECTION: &str = "TECHS";

/// A record that can be written to and read from a save node.
pub trait SaveRecord: Sized {
    /// Node name of one record (e.g. `LOGPERIOD`).
    const NODE_NAME: &'static str;

    /// Write the record's fields into `node`.
    fn save(&self, node: &mut SaveNode);

    /// Read a record from `node`.
    ///
    /// # Errors
    ///
    /// Returns [`SaveError`] if a required field is missing or malformed.
    fn load(node: &SaveNode) -> Result<Self, SaveError>;
}

impl SaveRecord for LogPeriod {
    const NODE_NAME: &'static str = "LOGPERIOD";

    fn save(&self, node: &mut SaveNode) {
        node.add_value("StartUT", self.start_ut);
        node.add_value("EndUT", self.end_ut);
        node.add_value("CurrentFunds", self.current_funds);
        node.add_value("CurrentSci", self.current_sci);
        node.add_value("ScienceEarned", self.science_earned);
        node.add_value("VABUpgrades", self.vab_upgrades);
        node.add_value("SPHUpgrades", self.sph_upgrades);
        node.add_value("RnDUpgrades", self.rnd_upgrades);
        node.add_value("ContractRewards", self.contract_rewards);
        node.add_value("MaintenanceFees", self.maintenance_fees);
        node.add_value("ToolingFees", self.tooling_fees);
        node.add_value("LaunchFees", self.launch_fees);
        node.add_value("EntryCosts", self.entry_costs);
        node.add_value("OtherFundsEarned", self.other_funds_earned);
        node.add_value("OtherFees", self.other_fees);
        node.add_value("FundsGainMult", self.funds_gain_mult);
    }

    fn load(node: &SaveNode) -> Result<Self, SaveError> {
        Ok(Self {
            start_ut: node.parse_value("StartUT")?,
            end_ut: node.parse_value("EndUT")?,
            current_funds: node.parse_value_or("CurrentFunds", 0.0)?,
            current_sci: node.parse_value_or("CurrentSci", 0.0)?,
            science_earned: node.parse_value_or("ScienceEarned", 0.0)?,
            vab_upgrades: node.parse_value_or("VABUpgrades", 0)?,
            sph_upgrades: node.parse_value_or("SPHUpgrades", 0)?,
            rnd_upgrades: node.parse_value_or("RnDUpgrades", 0)?,
            contract_rewards: node.parse_value_or("ContractRewards", 0.0)?,
            maintenance_fees: node.parse_value_or("MaintenanceFees", 0.0)?,
            tooling_fees: node.parse_value_or("ToolingFees", 0.0)?,
            launch_fees: node.parse_value_or("LaunchFees", 0.0)?,
            entry_costs: node.parse_value_or("EntryCosts", 0.0)?,
            other_funds_earned: node.parse_value_or("OtherFundsEarned", 0.0)?,
            other_fees: node.parse_value_or("OtherFees", 0.0)?,
            funds_gain_mult: node.parse_value_or("FundsGainMult", 1.0)?,
        })
    }
}

impl SaveRecord for ContractEvent {
    const NODE_NAME: &'static str = "CONTRACT";

    fn save(&self, node: &mut SaveNode) {
        node.add_value("UT", self.ut);
        node.add_value("Type", self.event_type);
        node.add_value("FundsChange", self.funds_change);
        node.add_value("RepChange", self.rep_change);
        node.add_value("DisplayName", &self.display_name);
        node.add_value("InternalName", &self.internal_name);
    }

    fn load(node: &SaveNode) -> Result<Self, SaveError> {
        Ok(Self {
            ut: node.parse_value("UT")?,
            event_type: node.parse_value("Type")?,
            funds_change: node.parse_value_or("FundsChange", 0.0)?,
            rep_change: node.parse_value_or("RepChange", 0.0)?,
            display_name: node.get_value("DisplayName").unwrap_or_default().to_owned(),
            internal_name: node.get_value("InternalName").unwrap_or_default().to_owned(),
        })
    }
}

impl SaveRecord for LaunchEvent {
    const NODE_NAME: &'static str = "LAUNCHEVENT";

    fn save(&self, node: &mut SaveNode) {
        node.add_value("UT", self.ut);
        node.add_value("VesselName", &self.vessel_name);
    }

    fn load(node: &SaveNode) -> Result<Self, SaveError> {
        Ok(Self {
            ut: node.parse_value("UT")?,
            vessel_name: node.get_value("VesselName").unwrap_or_default().to_owned(),
        })
    }
}

impl SaveRecord for FacilityConstructionEvent {
    const NODE_NAME: &'static str = "FACILITYCONSTRUCTION";

    fn save(&self, node: &mut SaveNode) {
        node.add_value("UT", self.ut);
        node.add_value("Facility", self.facility);
        node.add_value("NewLevel", self.new_level);
        node.add_value("Cost", self.cost);
        node.add_value("State", self.state);
    }

    fn load(node: &SaveNode) -> Result<Self, SaveError> {
        Ok(Self {
            ut: node.parse_value("UT")?,
            facility: node.parse_value("Facility")?,
            new_level: node.parse_value("NewLevel")?,
            cost: node.parse_value_or("Cost", 0.0)?,
            state: node.parse_value("State")?,
        })
    }
}

impl SaveRecord for TechResearchEvent {
    const NODE_NAME: &'static str = "TECH";

    fn save(&self, node: &mut SaveNode) {
        node.add_value("UT", self.ut);
        node.add_value("NodeName", &self.node_name);
    }

    fn load(node: &SaveNode) -> Result<Self, SaveError> {
        Ok(Self {
            ut: node.parse_value("UT")?,
            node_name: node.get_value("NodeName").unwrap_or_default().to_owned(),
        })
    }
}

/// Write `records` into a new `section` child of `parent`.
pub fn save_section<'a, R>(
    parent: &mut SaveNode,
    section: &str,
    records: impl IntoIterator<Item = &'a R>,
) where
    R: SaveRecord + 'a,
{
    let section = parent.add_node(section);
    for record in records {
        record.save(section.add_node(R::NODE_NAME));
    }
}

/// Read every record from every `section` child of `parent`.
///
/// Each entry is the record or the error that prevented reading it, so the
/// caller can skip bad records and keep the rest.
pub fn load_section<R: SaveRecord>(
    parent: &SaveNode,
    section: &str,
) -> Vec<Result<R, SaveError>> {
    parent
        .nodes_named(section)
        .flat_map(|s| s.nodes_named(R::NODE_NAME))
        .map(R::load)
        .collect()
}
