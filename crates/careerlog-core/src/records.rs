//! Career records: the period store plus the four append-only event logs.
//!
//! [`CareerRecords`] is the state that gets persisted and exported. It
//! knows how to save itself into the host save tree, load from it while
//! skipping bad records, and summarise the events that fall inside one
//! period.

use careerlog_types::{
    ConstructionState, ContractEvent, ContractEventType, FacilityConstructionEvent, LaunchEvent,
    LogPeriod, TechResearchEvent, Timestamped,
};
use tracing::error;

use crate::periods::PeriodStore;
use crate::persist::{
    load_section, save_section, SaveRecord, CONTRACTS_SECTION, FACILITIES_SECTION,
    LAUNCHES_SECTION, PERIODS_SECTION, TECHS_SECTION,
};
use crate::save::{SaveError, SaveNode};

/// Counts of what a load read and what it skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadReport {
    /// Periods registered.
    pub periods: usize,
    /// Contract events appended.
    pub contracts: usize,
    /// Launch events appended.
    pub launches: usize,
    /// Facility construction events appended.
    pub facility_constructions: usize,
    /// Tech research events appended.
    pub techs: usize,
    /// Records dropped because they were malformed or duplicated.
    pub skipped: usize,
}

/// Derived per-period aggregates shared by both exporters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PeriodSummary {
    /// Funds change of contracts accepted in the period.
    pub advance_funds: f64,
    /// Funds change of contracts completed in the period.
    pub reward_funds: f64,
    /// Negated funds change of contracts failed or cancelled in the period.
    pub failure_funds: f64,
    /// Cost of facility upgrades started in the period.
    pub construction_fees: f64,
    /// Names of vessels launched.
    pub launches: Vec<String>,
    /// Titles of contracts accepted.
    pub accepted_contracts: Vec<String>,
    /// Titles of contracts completed.
    pub completed_contracts: Vec<String>,
    /// Tech nodes researched.
    pub techs: Vec<String>,
    /// Facility events as `"{facility} ({level}) - {state}"`, with a
    /// one-based level.
    pub facilities: Vec<String>,
}

/// Sum starting from positive zero so an empty total is `0`, not `-0`.
fn total(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(0.0, |acc, v| acc + v)
}

/// Every record the career log keeps.
#[derive(Debug, Clone, Default)]
pub struct CareerRecords {
    periods: PeriodStore,
    contracts: Vec<ContractEvent>,
    launches: Vec<LaunchEvent>,
    facility_constructions: Vec<FacilityConstructionEvent>,
    techs: Vec<TechResearchEvent>,
}

impl CareerRecords {
    /// Create empty records.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build records from a save tree.
    pub fn from_save(node: &SaveNode) -> (Self, LoadReport) {
        let mut records = Self::new();
        let report = records.load(node);
        (records, report)
    }

    /// The period store.
    pub const fn periods(&self) -> &PeriodStore {
        &self.periods
    }

    /// Mutable access to the period store.
    pub const fn periods_mut(&mut self) -> &mut PeriodStore {
        &mut self.periods
    }

    /// Contract events in recording order.
    pub fn contracts(&self) -> &[ContractEvent] {
        &self.contracts
    }

    /// Launch events in recording order.
    pub fn launches(&self) -> &[LaunchEvent] {
        &self.launches
    }

    /// Facility construction events in recording order.
    pub fn facility_constructions(&self) -> &[FacilityConstructionEvent] {
        &self.facility_constructions
    }

    /// Tech research events in recording order.
    pub fn techs(&self) -> &[TechResearchEvent] {
        &self.techs
    }

    /// Append a contract event.
    pub fn push_contract(&mut self, event: ContractEvent) {
        self.contracts.push(event);
    }

    /// Append a launch event.
    pub fn push_launch(&mut self, event: LaunchEvent) {
        self.launches.push(event);
    }

    /// Append a facility construction event.
    pub fn push_facility_construction(&mut self, event: FacilityConstructionEvent) {
        self.facility_constructions.push(event);
    }

    /// Append a tech research event.
    pub fn push_tech(&mut self, event: TechResearchEvent) {
        self.techs.push(event);
    }

    /// Whether a contract event with exactly this timestamp and internal
    /// name has been recorded.
    #[allow(clippy::float_cmp)]
    pub fn has_contract_event(&self, ut: f64, internal_name: &str) -> bool {
        self.contracts
            .iter()
            .any(|c| c.ut == ut && c.internal_name == internal_name)
    }

    /// Contract events of `event_type` inside `period`.
    pub fn contracts_in<'a>(
        &'a self,
        period: &'a LogPeriod,
        event_type: ContractEventType,
    ) -> impl Iterator<Item = &'a ContractEvent> + 'a {
        self.contracts
            .iter()
            .filter(move |c| c.event_type == event_type && c.is_in_period(period))
    }

    /// Compute the derived aggregates and event lists for `period`.
    pub fn summarize(&self, period: &LogPeriod) -> PeriodSummary {
        let failed_or_cancelled = self.contracts.iter().filter(|c| {
            matches!(
                c.event_type,
                ContractEventType::Cancel | ContractEventType::Fail
            ) && c.is_in_period(period)
        });

        PeriodSummary {
            advance_funds: total(
                self.contracts_in(period, ContractEventType::Accept)
                    .map(|c| c.funds_change),
            ),
            reward_funds: total(
                self.contracts_in(period, ContractEventType::Complete)
                    .map(|c| c.funds_change),
            ),
            failure_funds: 0.0 - total(failed_or_cancelled.map(|c| c.funds_change)),
            construction_fees: total(
                self.facility_constructions
                    .iter()
                    .filter(|f| f.state == ConstructionState::Started && f.is_in_period(period))
                    .map(|f| f.cost),
            ),
            launches: self
                .launches
                .iter()
                .filter(|l| l.is_in_period(period))
                .map(|l| l.vessel_name.clone())
                .collect(),
            accepted_contracts: self
                .contracts_in(period, ContractEventType::Accept)
                .map(|c| c.display_name.clone())
                .collect(),
            completed_contracts: self
                .contracts_in(period, ContractEventType::Complete)
                .map(|c| c.display_name.clone())
                .collect(),
            techs: self
                .techs
                .iter()
                .filter(|t| t.is_in_period(period))
                .map(|t| t.node_name.clone())
                .collect(),
            facilities: self
                .facility_constructions
                .iter()
                .filter(|f| f.is_in_period(period))
                .map(|f| {
                    format!(
                        "{} ({}) - {}",
                        f.facility,
                        f.new_level.saturating_add(1),
                        f.state
                    )
                })
                .collect(),
        }
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Write every record into `node` as the five host sections.
    pub fn save(&self, node: &mut SaveNode) {
        save_section(node, PERIODS_SECTION, self.periods.iter());
        save_section(node, CONTRACTS_SECTION, &self.contracts);
        save_section(node, LAUNCHES_SECTION, &self.launches);
        save_section(node, FACILITIES_SECTION, &self.facility_constructions);
        save_section(node, TECHS_SECTION, &self.techs);
    }

    /// Read every record from `node`, appending to what is already held.
    ///
    /// Malformed records and periods whose start time is already registered
    /// are logged and skipped; the rest of the load continues. A skipped
    /// duplicate period loses whatever that record held.
    pub fn load(&mut self, node: &SaveNode) -> LoadReport {
        let mut report = LoadReport::default();

        for result in load_section::<LogPeriod>(node, PERIODS_SECTION) {
            let Some(period) = keep(result, &mut report) else {
                continue;
            };
            let start_ut = period.start_ut;
            match self.periods.insert(period) {
                Ok(_) => report.periods = report.periods.saturating_add(1),
                Err(e) => {
                    error!(start_ut, error = %e, "LOGPERIOD already exists, skipping");
                    report.skipped = report.skipped.saturating_add(1);
                }
            }
        }

        for event in load_section::<ContractEvent>(node, CONTRACTS_SECTION) {
            if let Some(event) = keep(event, &mut report) {
                self.contracts.push(event);
                report.contracts = report.contracts.saturating_add(1);
            }
        }
        for event in load_section::<LaunchEvent>(node, LAUNCHES_SECTION) {
            if let Some(event) = keep(event, &mut report) {
                self.launches.push(event);
                report.launches = report.launches.saturating_add(1);
            }
        }
        for event in load_section::<FacilityConstructionEvent>(node, FACILITIES_SECTION) {
            if let Some(event) = keep(event, &mut report) {
                self.facility_constructions.push(event);
                report.facility_constructions = report.facility_constructions.saturating_add(1);
            }
        }
        for event in load_section::<TechResearchEvent>(node, TECHS_SECTION) {
            if let Some(event) = keep(event, &mut report) {
                self.techs.push(event);
                report.techs = report.techs.saturating_add(1);
            }
        }

        report
    }
}

/// Unwrap a loaded record, logging and counting it as skipped on error.
fn keep<R: SaveRecord>(result: Result<R, SaveError>, report: &mut LoadReport) -> Option<R> {
    match result {
        Ok(record) => Some(record),
        Err(e) => {
            error!(record = R::NODE_NAME, error = %e, "Malformed record, skipping");
            report.skipped = report.skipped.saturating_add(1);
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::indexing_slicing)]
mod tests {
    use careerlog_types::Facility;

    use super::*;

    fn contract(ut: f64, event_type: ContractEventType, funds: f64, name: &str) -> ContractEvent {
        ContractEvent {
            ut,
            event_type,
            funds_change: funds,
            rep_change: 0.0,
            display_name: name.to_owned(),
            internal_name: name.to_owned(),
        }
    }

    #[test]
    fn empty_period_summary_is_zero_and_empty() {
        let records = CareerRecords::new();
        let summary = records.summarize(&LogPeriod::new(0.0, 100.0));
        assert_eq!(summary, PeriodSummary::default());
        assert!(summary.failure_funds.is_sign_positive());
        assert!(summary.advance_funds.is_sign_positive());
    }

    #[test]
    fn summary_only_counts_events_in_range() {
        let mut records = CareerRecords::new();
        records.push_contract(contract(10.0, ContractEventType::Accept, 500.0, "A"));
        records.push_contract(contract(20.0, ContractEventType::Complete, 2000.0, "A"));
        records.push_contract(contract(30.0, ContractEventType::Cancel, -300.0, "B"));
        records.push_contract(contract(40.0, ContractEventType::Fail, -200.0, "C"));
        records.push_contract(contract(150.0, ContractEventType::Accept, 999.0, "D"));
        records.push_facility_construction(FacilityConstructionEvent {
            ut: 50.0,
            facility: Facility::VehicleAssemblyBuilding,
            new_level: 1,
            cost: 10_000.0,
            state: ConstructionState::Started,
        });
        records.push_facility_construction(FacilityConstructionEvent {
            ut: 60.0,
            facility: Facility::VehicleAssemblyBuilding,
            new_level: 1,
            cost: 10_000.0,
            state: ConstructionState::Completed,
        });
        records.push_launch(LaunchEvent {
            ut: 70.0,
            vessel_name: "WAC Corporal".to_owned(),
        });

        let summary = records.summarize(&LogPeriod::new(0.0, 100.0));
        assert_eq!(summary.advance_funds, 500.0);
        assert_eq!(summary.reward_funds, 2000.0);
        assert_eq!(summary.failure_funds, 500.0);
        assert_eq!(summary.construction_fees, 10_000.0);
        assert_eq!(summary.accepted_contracts, vec!["A"]);
        assert_eq!(summary.completed_contracts, vec!["A"]);
        assert_eq!(summary.launches, vec!["WAC Corporal"]);
        assert_eq!(
            summary.facilities,
            vec![
                "VehicleAssemblyBuilding (2) - Started",
                "VehicleAssemblyBuilding (2) - Completed"
            ]
        );
    }

    #[test]
    fn contract_event_lookup_matches_time_and_name() {
        let mut records = CareerRecords::new();
        records.push_contract(contract(10.0, ContractEventType::Cancel, 0.0, "X"));
        assert!(records.has_contract_event(10.0, "X"));
        assert!(!records.has_contract_event(10.0, "Y"));
        assert!(!records.has_contract_event(11.0, "X"));
    }

    #[test]
    fn load_skips_malformed_records() {
        let mut root = SaveNode::default();
        let techs = root.add_node(TECHS_SECTION);
        techs.add_node("TECH").add_value("NodeName", "noTimestamp");
        let good = techs.add_node("TECH");
        good.add_value("UT", 5.0);
        good.add_value("NodeName", "start");

        let (records, report) = CareerRecords::from_save(&root);
        assert_eq!(report.techs, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(records.techs()[0].node_name, "start");
    }

    #[test]
    fn text_round_trip_keeps_names_verbatim() {
        let mut records = CareerRecords::new();
        records.push_contract(contract(
            10.0,
            ContractEventType::Accept,
            500.0,
            "Relay // Phase 2",
        ));
        records.push_launch(LaunchEvent {
            ut: 20.0,
            vessel_name: "  Padded ".to_owned(),
        });
        records.push_tech(TechResearchEvent {
            ut: 30.0,
            node_name: "basicRocketry".to_owned(),
        });

        let mut root = SaveNode::default();
        records.save(&mut root);
        let parsed = SaveNode::parse(&root.to_text()).unwrap();
        let (loaded, report) = CareerRecords::from_save(&parsed);

        assert_eq!(report.skipped, 0);
        assert_eq!(loaded.contracts(), records.contracts());
        assert_eq!(loaded.contracts()[0].display_name, "Relay // Phase 2");
        assert_eq!(loaded.launches()[0].vessel_name, "  Padded ");
        assert_eq!(loaded.techs(), records.techs());
    }
}
