//! The career log aggregate.
//!
//! [`CareerLog`] owns the records and the two persisted period pointers,
//! reacts to host events, and rolls periods over as the game clock moves.
//! Every mutating entry point takes an [`EventScope`]; a suppressed scope
//! or a disabled log drops the event with [`EventOutcome::Ignored`].
//!
//! # Rollover
//!
//! Reading the current period first closes every period whose end the
//! clock has reached. Closing a period snapshots funds, science, facility
//! upgrade counts, total science earned and the funds-gain multiplier into
//! it, then advances `CurPeriodStart` and `NextPeriodStart` by one period.
//! A jump across several boundaries closes one period per iteration.

use careerlog_types::{
    ConstructionState, ContractEvent, ContractEventType, Facility, FacilityConstructionEvent,
    LaunchEvent, LogPeriod, TechResearchEvent, TransactionReason, VesselSituation,
};
use tracing::{debug, info, warn};

use crate::bus::{EventOutcome, EventSubscriber, GameEvent, GameEventHandler, GameEventKind};
use crate::classify::classify_funds_change;
use crate::config::CareerLogSettings;
use crate::error::CareerLogError;
use crate::host::{
    CareerHost, ContractInfo, ContractNamer, CurrencyModifierQuery, FacilityUpgrade, TechNode,
    TypeNameNamer, VesselSituationChange,
};
use crate::records::{CareerRecords, LoadReport};
use crate::save::SaveNode;
use crate::scope::EventScope;

/// Name the career log subscribes to host events under.
pub const HANDLER_NAME: &str = "career_log";

/// Save key of the current period start pointer.
pub const CUR_PERIOD_START_KEY: &str = "CurPeriodStart";

/// Save key of the next period start pointer.
pub const NEXT_PERIOD_START_KEY: &str = "NextPeriodStart";

/// Values copied into a period when it closes.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Snapshot {
    funds: f64,
    science: f64,
    vab_upgrades: i32,
    sph_upgrades: i32,
    rnd_upgrades: i32,
    science_earned: f64,
    funds_gain_mult: f64,
}

impl Snapshot {
    fn write_into(self, period: &mut LogPeriod) {
        period.current_funds = self.funds;
        period.current_sci = self.science;
        period.vab_upgrades = self.vab_upgrades;
        period.sph_upgrades = self.sph_upgrades;
        period.rnd_upgrades = self.rnd_upgrades;
        period.science_earned = self.science_earned;
        period.funds_gain_mult = self.funds_gain_mult;
    }
}

/// Per-career bookkeeping of funds flows and milestones.
pub struct CareerLog<H> {
    host: H,
    namer: Box<dyn ContractNamer>,
    log_period_months: u32,
    enabled: bool,
    records: CareerRecords,
    cur_period_start: f64,
    next_period_start: f64,
    /// One-shot launch guard for this session.
    launched: bool,
    prev_funds_change: Option<(f64, TransactionReason)>,
    events_bound: bool,
}

impl<H: CareerHost> CareerLog<H> {
    /// Create an empty career log over `host`.
    ///
    /// Contracts are identified by their host type name until
    /// [`with_namer`](Self::with_namer) installs another namer.
    pub fn new(host: H, settings: &CareerLogSettings) -> Self {
        Self {
            host,
            namer: Box::new(TypeNameNamer),
            log_period_months: settings.log_period_months.max(1),
            enabled: settings.enabled,
            records: CareerRecords::new(),
            cur_period_start: 0.0,
            next_period_start: 0.0,
            launched: false,
            prev_funds_change: None,
            events_bound: false,
        }
    }

    /// Replace the contract namer.
    #[must_use]
    pub fn with_namer(mut self, namer: impl ContractNamer + 'static) -> Self {
        self.namer = Box::new(namer);
        self
    }

    /// The host.
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host.
    pub const fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Recorded periods and events.
    pub const fn records(&self) -> &CareerRecords {
        &self.records
    }

    /// Whether events are being recorded.
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Calendar months per period.
    pub const fn log_period_months(&self) -> u32 {
        self.log_period_months
    }

    /// Start of the period currently accumulating.
    pub const fn cur_period_start(&self) -> f64 {
        self.cur_period_start
    }

    /// Start of the period after the current one.
    pub const fn next_period_start(&self) -> f64 {
        self.next_period_start
    }

    /// Whether the core game events have been subscribed.
    pub const fn events_bound(&self) -> bool {
        self.events_bound
    }

    // -----------------------------------------------------------------------
    // Periods
    // -----------------------------------------------------------------------

    /// The period the current clock falls into, after rolling over every
    /// boundary the clock has reached.
    pub fn current_period(&mut self) -> Result<&mut LogPeriod, CareerLogError> {
        let now = self.host.now();
        while now >= self.next_period_start {
            self.roll_over()?;
        }
        self.get_or_create_period(self.cur_period_start)
    }

    /// The period starting exactly at `start_ut`, created one period long
    /// if it does not exist.
    pub fn get_or_create_period(&mut self, start_ut: f64) -> Result<&mut LogPeriod, CareerLogError> {
        let months = self.log_period_months;
        Ok(self.records.periods_mut().get_or_create(start_ut, months)?)
    }

    fn roll_over(&mut self) -> Result<(), CareerLogError> {
        let snapshot = self.snapshot();
        snapshot.write_into(self.get_or_create_period(self.cur_period_start)?);

        let next_start = self.next_period_start;
        let next_end = self.get_or_create_period(next_start)?.end_ut;
        if next_end <= next_start {
            return Err(CareerLogError::StalledRollover {
                next_period_start: next_start,
            });
        }

        info!(
            closed = self.cur_period_start,
            start = next_start,
            end = next_end,
            funds = snapshot.funds,
            "Switched to next log period"
        );
        self.cur_period_start = next_start;
        self.next_period_start = next_end;
        Ok(())
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            funds: self.host.funds(),
            science: self.host.science(),
            vab_upgrades: self.upgrade_count(Facility::VehicleAssemblyBuilding),
            sph_upgrades: self.upgrade_count(Facility::SpaceplaneHangar),
            rnd_upgrades: self.upgrade_count(Facility::ResearchAndDevelopment),
            science_earned: self.science_earned(),
            funds_gain_mult: self.host.funds_gain_multiplier(),
        }
    }

    fn upgrade_count(&self, facility: Facility) -> i32 {
        self.host.spent_upgrades(facility).unwrap_or_else(|e| {
            warn!(%facility, error = %e, "Failed to read spent upgrades, using 0");
            0
        })
    }

    fn science_earned(&self) -> f64 {
        // The host reports -1 before any science is earned.
        self.host
            .science_points_total()
            .map(|total| total.max(0.0))
            .unwrap_or_else(|e| {
                warn!(error = %e, "Failed to read science points total, using 0");
                0.0
            })
    }

    const fn ignores(&self, scope: EventScope) -> bool {
        scope.should_ignore() || !self.enabled
    }

    // -----------------------------------------------------------------------
    // Funds
    // -----------------------------------------------------------------------

    /// Classify a funds delta into the current period.
    ///
    /// The delta and reason are remembered for a following contract
    /// cancellation even when they land in a non-contract bucket.
    pub fn record_funds_change(
        &mut self,
        delta: f64,
        reason: TransactionReason,
        scope: EventScope,
    ) -> Result<EventOutcome, CareerLogError> {
        if self.ignores(scope) {
            return Ok(EventOutcome::Ignored);
        }
        self.prev_funds_change = Some((delta, reason));

        let bucket = classify_funds_change(delta, reason, scope);
        bucket.apply(self.current_period()?, delta);
        debug!(delta, %reason, ?bucket, "Funds change recorded");
        Ok(EventOutcome::Recorded)
    }

    /// Handle a currency modification. Only the funds total is logged; a
    /// zero funds total is ignored.
    pub fn on_currency_modified(
        &mut self,
        query: &CurrencyModifierQuery,
        scope: EventScope,
    ) -> Result<EventOutcome, CareerLogError> {
        if query.funds == 0.0 {
            return Ok(EventOutcome::Ignored);
        }
        self.record_funds_change(query.funds, query.reason, scope)
    }

    // -----------------------------------------------------------------------
    // Contracts
    // -----------------------------------------------------------------------

    fn push_contract(
        &mut self,
        ut: f64,
        event_type: ContractEventType,
        funds_change: f64,
        rep_change: f64,
        contract: &ContractInfo,
        internal_name: String,
    ) -> EventOutcome {
        debug!(%event_type, contract = %internal_name, funds_change, "Contract event recorded");
        self.records.push_contract(ContractEvent {
            ut,
            event_type,
            funds_change,
            rep_change,
            display_name: contract.title.clone(),
            internal_name,
        });
        EventOutcome::Recorded
    }

    /// Record a contract acceptance with its advance. Contracts the host
    /// accepted automatically are not recorded.
    pub fn on_contract_accepted(&mut self, contract: &ContractInfo, scope: EventScope) -> EventOutcome {
        if self.ignores(scope) || contract.auto_accept {
            return EventOutcome::Ignored;
        }
        let name = self.namer.internal_name(contract);
        self.push_contract(
            self.host.now(),
            ContractEventType::Accept,
            contract.funds_advance,
            0.0,
            contract,
            name,
        )
    }

    /// Record a contract completion with its reward and reputation.
    pub fn on_contract_completed(&mut self, contract: &ContractInfo, scope: EventScope) -> EventOutcome {
        if self.ignores(scope) {
            return EventOutcome::Ignored;
        }
        let name = self.namer.internal_name(contract);
        self.push_contract(
            self.host.now(),
            ContractEventType::Complete,
            contract.funds_completion,
            contract.reputation_completion,
            contract,
            name,
        )
    }

    /// Record a contract cancellation.
    ///
    /// The host charges the cancellation penalty before raising this event,
    /// so if the last funds change was a contract penalty its amount is
    /// recorded as the cancellation's funds change. Otherwise it is zero.
    pub fn on_contract_cancelled(&mut self, contract: &ContractInfo, scope: EventScope) -> EventOutcome {
        if self.ignores(scope) {
            return EventOutcome::Ignored;
        }
        let funds_change = match self.prev_funds_change {
            Some((amount, TransactionReason::ContractPenalty)) => {
                debug!(amount, "Last funds change was a contract penalty");
                amount
            }
            _ => 0.0,
        };
        let name = self.namer.internal_name(contract);
        self.push_contract(
            self.host.now(),
            ContractEventType::Cancel,
            funds_change,
            0.0,
            contract,
            name,
        )
    }

    /// Record a contract failure with its penalty and reputation.
    ///
    /// The host raises a failure right after a cancellation; a failure with
    /// the same timestamp and internal name as a recorded contract event is
    /// dropped.
    pub fn on_contract_failed(&mut self, contract: &ContractInfo, scope: EventScope) -> EventOutcome {
        if self.ignores(scope) {
            return EventOutcome::Ignored;
        }
        let name = self.namer.internal_name(contract);
        let ut = self.host.now();
        if self.records.has_contract_event(ut, &name) {
            debug!(contract = %name, ut, "Failure duplicates a cancellation, skipping");
            return EventOutcome::Ignored;
        }
        self.push_contract(
            ut,
            ContractEventType::Fail,
            contract.funds_failure,
            contract.reputation_failure,
            contract,
            name,
        )
    }

    // -----------------------------------------------------------------------
    // Launches, tech and facilities
    // -----------------------------------------------------------------------

    /// Record the first launch of the session: the active vessel leaving
    /// the pre-launch situation. Later transitions, including a vessel
    /// knocked back to pre-launch and released again, are ignored.
    pub fn on_vessel_situation_change(
        &mut self,
        change: &VesselSituationChange,
        scope: EventScope,
    ) -> EventOutcome {
        if self.ignores(scope)
            || self.launched
            || change.from != VesselSituation::Prelaunch
            || !change.is_active_vessel
        {
            return EventOutcome::Ignored;
        }
        info!(vessel = %change.vessel_name, "Launching");
        self.launched = true;
        self.records.push_launch(LaunchEvent {
            ut: self.host.now(),
            vessel_name: change.vessel_name.clone(),
        });
        EventOutcome::Recorded
    }

    /// Record a researched tech node.
    pub fn add_tech_event(&mut self, node_name: &str, scope: EventScope) -> EventOutcome {
        if self.ignores(scope) {
            return EventOutcome::Ignored;
        }
        debug!(node = node_name, "Tech researched");
        self.records.push_tech(TechResearchEvent {
            ut: self.host.now(),
            node_name: node_name.to_owned(),
        });
        EventOutcome::Recorded
    }

    /// Record a facility construction milestone.
    pub fn add_facility_construction_event(
        &mut self,
        facility: Facility,
        new_level: i32,
        cost: f64,
        state: ConstructionState,
        scope: EventScope,
    ) -> EventOutcome {
        if self.ignores(scope) {
            return EventOutcome::Ignored;
        }
        debug!(%facility, new_level, cost, %state, "Facility construction recorded");
        self.records
            .push_facility_construction(FacilityConstructionEvent {
                ut: self.host.now(),
                facility,
                new_level,
                cost,
                state,
            });
        EventOutcome::Recorded
    }

    /// Handle a tech node completed by the construction subsystem.
    pub fn on_tech_researched(&mut self, node: &TechNode, scope: EventScope) -> EventOutcome {
        self.add_tech_event(&node.tech_id, scope)
    }

    fn on_facility_upgrade(
        &mut self,
        upgrade: &FacilityUpgrade,
        state: ConstructionState,
        scope: EventScope,
    ) -> EventOutcome {
        // Facilities added by third-party mods have no known type.
        let Some(facility) = upgrade.facility else {
            return EventOutcome::Ignored;
        };
        self.add_facility_construction_event(
            facility,
            upgrade.upgrade_level,
            upgrade.cost,
            state,
            scope,
        )
    }

    /// Handle a queued facility upgrade.
    pub fn on_facility_upgrade_queued(
        &mut self,
        upgrade: &FacilityUpgrade,
        scope: EventScope,
    ) -> EventOutcome {
        self.on_facility_upgrade(upgrade, ConstructionState::Started, scope)
    }

    /// Handle a completed facility upgrade.
    pub fn on_facility_upgrade_completed(
        &mut self,
        upgrade: &FacilityUpgrade,
        scope: EventScope,
    ) -> EventOutcome {
        self.on_facility_upgrade(upgrade, ConstructionState::Completed, scope)
    }

    // -----------------------------------------------------------------------
    // Event binding
    // -----------------------------------------------------------------------

    /// Subscribe to the construction subsystem events and, if enabled, to
    /// the core game events.
    pub fn attach(&mut self, subscriber: &mut dyn EventSubscriber) {
        for kind in GameEventKind::CONSTRUCTION {
            subscriber.subscribe(kind, HANDLER_NAME);
        }
        self.bind_events(subscriber);
    }

    /// Apply changed settings. The core game events are bound the first
    /// time the log becomes enabled and stay bound if it is disabled
    /// again; handlers drop events while disabled.
    pub fn apply_settings(
        &mut self,
        settings: &CareerLogSettings,
        subscriber: &mut dyn EventSubscriber,
    ) {
        self.enabled = settings.enabled;
        self.log_period_months = settings.log_period_months.max(1);
        self.bind_events(subscriber);
    }

    /// Subscribe to the core game events once, if enabled.
    pub fn bind_events(&mut self, subscriber: &mut dyn EventSubscriber) {
        if !self.enabled || self.events_bound {
            return;
        }
        for kind in GameEventKind::CORE {
            subscriber.subscribe(kind, HANDLER_NAME);
        }
        self.events_bound = true;
        debug!("Core game events bound");
    }

    /// Remove every subscription made by [`attach`](Self::attach) and
    /// [`bind_events`](Self::bind_events).
    pub fn unbind_events(&mut self, subscriber: &mut dyn EventSubscriber) {
        for kind in GameEventKind::CONSTRUCTION {
            subscriber.unsubscribe(kind, HANDLER_NAME);
        }
        if self.events_bound {
            for kind in GameEventKind::CORE {
                subscriber.unsubscribe(kind, HANDLER_NAME);
            }
            self.events_bound = false;
        }
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Write the period pointers and every record into `node`.
    pub fn save(&self, node: &mut SaveNode) {
        node.set_value(CUR_PERIOD_START_KEY, self.cur_period_start);
        node.set_value(NEXT_PERIOD_START_KEY, self.next_period_start);
        self.records.save(node);
    }

    /// Restore the period pointers and append every record from `node`.
    ///
    /// Missing pointers default to zero. Bad records are logged and
    /// skipped; see [`CareerRecords::load`].
    pub fn load(&mut self, node: &SaveNode) -> Result<LoadReport, CareerLogError> {
        self.cur_period_start = node.parse_value_or(CUR_PERIOD_START_KEY, 0.0)?;
        self.next_period_start = node.parse_value_or(NEXT_PERIOD_START_KEY, 0.0)?;
        let report = self.records.load(node);
        info!(
            periods = report.periods,
            contracts = report.contracts,
            launches = report.launches,
            skipped = report.skipped,
            "Career log loaded"
        );
        Ok(report)
    }
}

impl<H: CareerHost> GameEventHandler for CareerLog<H> {
    fn handler_name(&self) -> &'static str {
        HANDLER_NAME
    }

    fn handle(
        &mut self,
        event: &GameEvent,
        scope: EventScope,
    ) -> Result<EventOutcome, CareerLogError> {
        let outcome = match event {
            GameEvent::CurrencyModified(query) => return self.on_currency_modified(query, scope),
            GameEvent::ContractAccepted(c) => self.on_contract_accepted(c, scope),
            GameEvent::ContractCompleted(c) => self.on_contract_completed(c, scope),
            GameEvent::ContractFailed(c) => self.on_contract_failed(c, scope),
            GameEvent::ContractCancelled(c) => self.on_contract_cancelled(c, scope),
            GameEvent::VesselSituationChanged(change) => {
                self.on_vessel_situation_change(change, scope)
            }
            GameEvent::TechResearched(node) => self.on_tech_researched(node, scope),
            GameEvent::FacilityUpgradeQueued(u) => self.on_facility_upgrade_queued(u, scope),
            GameEvent::FacilityUpgradeCompleted(u) => self.on_facility_upgrade_completed(u, scope),
        };
        Ok(outcome)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::bus::EventBus;
    use crate::host::HostError;

    const JAN_1951: f64 = 31.0 * 86_400.0;
    const FEB_1951: f64 = 28.0 * 86_400.0;

    struct MockHost {
        now: f64,
        funds: f64,
        science: f64,
        science_total: f64,
        construction_available: bool,
    }

    impl MockHost {
        fn at(now: f64) -> Self {
            Self {
                now,
                funds: 25_000.0,
                science: 12.5,
                science_total: -1.0,
                construction_available: true,
            }
        }
    }

    impl CareerHost for MockHost {
        fn now(&self) -> f64 {
            self.now
        }

        fn funds(&self) -> f64 {
            self.funds
        }

        fn science(&self) -> f64 {
            self.science
        }

        fn funds_gain_multiplier(&self) -> f64 {
            0.8
        }

        fn spent_upgrades(&self, facility: Facility) -> Result<i32, HostError> {
            if !self.construction_available {
                return Err(HostError::Unavailable("construction".to_owned()));
            }
            Ok(match facility {
                Facility::VehicleAssemblyBuilding => 3,
                Facility::SpaceplaneHangar => 1,
                _ => 2,
            })
        }

        fn science_points_total(&self) -> Result<f64, HostError> {
            if self.construction_available {
                Ok(self.science_total)
            } else {
                Err(HostError::Query("not loaded".to_owned()))
            }
        }
    }

    fn log_at(now: f64) -> CareerLog<MockHost> {
        CareerLog::new(MockHost::at(now), &CareerLogSettings::default())
    }

    fn contract(name: &str) -> ContractInfo {
        ContractInfo {
            title: format!("{name} title"),
            type_name: name.to_owned(),
            funds_advance: 1_000.0,
            funds_completion: 5_000.0,
            funds_failure: -2_000.0,
            reputation_completion: 10.0,
            reputation_failure: -15.0,
            ..ContractInfo::default()
        }
    }

    #[test]
    fn funds_changes_land_in_current_period() {
        let mut log = log_at(100.0);
        log.record_funds_change(-300.0, TransactionReason::VesselRollout, EventScope::NONE)
            .unwrap();
        log.record_funds_change(50.0, TransactionReason::None, EventScope::NONE)
            .unwrap();
        log.record_funds_change(-20.0, TransactionReason::None, EventScope::maintenance())
            .unwrap();

        assert_eq!(log.cur_period_start(), 0.0);
        assert_eq!(log.next_period_start(), JAN_1951);
        let period = log.records().periods().get(0.0).unwrap();
        assert_eq!(period.launch_fees, 300.0);
        assert_eq!(period.other_funds_earned, 50.0);
        assert_eq!(period.maintenance_fees, 20.0);
    }

    #[test]
    fn ignored_scope_and_disabled_log_change_nothing() {
        let mut log = log_at(100.0);
        let outcome = log
            .record_funds_change(-300.0, TransactionReason::None, EventScope::ignored())
            .unwrap();
        assert_eq!(outcome, EventOutcome::Ignored);
        assert!(log.records().periods().is_empty());

        let mut bus = EventBus::new();
        log.apply_settings(
            &CareerLogSettings {
                enabled: false,
                log_period_months: 1,
            },
            &mut bus,
        );
        assert_eq!(
            log.on_contract_accepted(&contract("A"), EventScope::NONE),
            EventOutcome::Ignored
        );
        assert!(log.records().contracts().is_empty());
    }

    #[test]
    fn zero_funds_currency_query_is_ignored() {
        let mut log = log_at(100.0);
        let query = CurrencyModifierQuery {
            reason: TransactionReason::ScienceTransmission,
            science: 4.0,
            ..CurrencyModifierQuery::default()
        };
        assert_eq!(
            log.on_currency_modified(&query, EventScope::NONE).unwrap(),
            EventOutcome::Ignored
        );
        assert!(log.records().periods().is_empty());
    }

    #[test]
    fn rollover_snapshots_closing_period() {
        let mut log = log_at(100.0);
        log.current_period().unwrap();
        log.host_mut().now = JAN_1951 + 10.0;
        log.host_mut().funds = 40_000.0;
        log.current_period().unwrap();

        let january = log.records().periods().get(0.0).unwrap();
        assert_eq!(january.current_funds, 40_000.0);
        assert_eq!(january.current_sci, 12.5);
        assert_eq!(january.vab_upgrades, 3);
        assert_eq!(january.sph_upgrades, 1);
        assert_eq!(january.rnd_upgrades, 2);
        assert_eq!(january.science_earned, 0.0);
        assert_eq!(january.funds_gain_mult, 0.8);
        assert_eq!(log.cur_period_start(), JAN_1951);
        assert_eq!(log.next_period_start(), JAN_1951 + FEB_1951);
    }

    #[test]
    fn host_query_failures_snapshot_zero() {
        let mut log = log_at(100.0);
        log.host_mut().construction_available = false;
        log.current_period().unwrap();
        log.host_mut().now = JAN_1951;
        log.current_period().unwrap();

        let january = log.records().periods().get(0.0).unwrap();
        assert_eq!(january.vab_upgrades, 0);
        assert_eq!(january.science_earned, 0.0);
    }

    #[test]
    fn time_jump_closes_one_period_per_boundary() {
        let mut log = log_at(0.0);
        log.current_period().unwrap();
        log.host_mut().now = JAN_1951 + FEB_1951 + 86_400.0;
        let start = log.current_period().unwrap().start_ut;

        assert_eq!(start, JAN_1951 + FEB_1951);
        let periods = log.records().periods().as_slice();
        assert_eq!(periods.len(), 3);
        for pair in periods.windows(2) {
            assert_eq!(pair[0].end_ut, pair[1].start_ut);
        }
    }

    #[test]
    fn stalled_pointer_is_an_error() {
        let mut log = log_at(500.0);
        log.load(&SaveNode::parse("CurPeriodStart = 0\nNextPeriodStart = 100\nLOGPERIODS\n{\n\tLOGPERIOD\n\t{\n\t\tStartUT = 100\n\t\tEndUT = 100\n\t}\n}\n").unwrap())
            .unwrap();
        assert!(matches!(
            log.current_period(),
            Err(CareerLogError::StalledRollover { next_period_start }) if next_period_start == 100.0
        ));
    }

    #[test]
    fn penalty_then_cancel_records_penalty() {
        let mut log = log_at(100.0);
        log.record_funds_change(-750.0, TransactionReason::ContractPenalty, EventScope::NONE)
            .unwrap();
        log.on_contract_cancelled(&contract("Orbit"), EventScope::NONE);

        let cancel = &log.records().contracts()[0];
        assert_eq!(cancel.event_type, ContractEventType::Cancel);
        assert_eq!(cancel.funds_change, -750.0);
        assert_eq!(cancel.internal_name, "Orbit");
        assert_eq!(cancel.display_name, "Orbit title");
    }

    #[test]
    fn cancel_without_penalty_records_zero() {
        let mut log = log_at(100.0);
        log.record_funds_change(-750.0, TransactionReason::VesselRollout, EventScope::NONE)
            .unwrap();
        log.on_contract_cancelled(&contract("Orbit"), EventScope::NONE);
        assert_eq!(log.records().contracts()[0].funds_change, 0.0);
    }

    #[test]
    fn failure_after_cancel_at_same_time_is_dropped() {
        let mut log = log_at(100.0);
        log.on_contract_cancelled(&contract("Orbit"), EventScope::NONE);
        assert_eq!(
            log.on_contract_failed(&contract("Orbit"), EventScope::NONE),
            EventOutcome::Ignored
        );
        log.host_mut().now = 101.0;
        assert_eq!(
            log.on_contract_failed(&contract("Orbit"), EventScope::NONE),
            EventOutcome::Recorded
        );
        let fail = &log.records().contracts()[1];
        assert_eq!(fail.funds_change, -2_000.0);
        assert_eq!(fail.rep_change, -15.0);
    }

    #[test]
    fn accept_and_complete_carry_contract_values() {
        let mut log = log_at(100.0);
        let mut auto = contract("Record");
        auto.auto_accept = true;
        assert_eq!(
            log.on_contract_accepted(&auto, EventScope::NONE),
            EventOutcome::Ignored
        );

        log.on_contract_accepted(&contract("A"), EventScope::NONE);
        log.on_contract_completed(&contract("A"), EventScope::NONE);
        let events = log.records().contracts();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].funds_change, 1_000.0);
        assert_eq!(events[0].rep_change, 0.0);
        assert_eq!(events[1].funds_change, 5_000.0);
        assert_eq!(events[1].rep_change, 10.0);
    }

    #[test]
    fn custom_namer_identifies_contracts() {
        struct Prefixed;
        impl ContractNamer for Prefixed {
            fn internal_name(&self, contract: &ContractInfo) -> String {
                format!("cc.{}", contract.type_name)
            }
        }

        let mut log = log_at(100.0).with_namer(Prefixed);
        log.on_contract_completed(&contract("A"), EventScope::NONE);
        assert_eq!(log.records().contracts()[0].internal_name, "cc.A");
    }

    #[test]
    fn only_first_active_prelaunch_departure_is_a_launch() {
        let mut log = log_at(100.0);
        let mut change = VesselSituationChange {
            vessel_name: "Bumper 8".to_owned(),
            is_active_vessel: false,
            from: VesselSituation::Prelaunch,
            to: VesselSituation::Flying,
        };
        assert_eq!(
            log.on_vessel_situation_change(&change, EventScope::NONE),
            EventOutcome::Ignored
        );
        change.is_active_vessel = true;
        assert_eq!(
            log.on_vessel_situation_change(&change, EventScope::NONE),
            EventOutcome::Recorded
        );
        assert_eq!(
            log.on_vessel_situation_change(&change, EventScope::NONE),
            EventOutcome::Ignored
        );
        assert_eq!(log.records().launches().len(), 1);
        assert_eq!(log.records().launches()[0].vessel_name, "Bumper 8");
    }

    #[test]
    fn unknown_facility_upgrades_are_ignored() {
        let mut log = log_at(100.0);
        let mut upgrade = FacilityUpgrade {
            facility: None,
            upgrade_level: 1,
            cost: 5_000.0,
        };
        assert_eq!(
            log.on_facility_upgrade_queued(&upgrade, EventScope::NONE),
            EventOutcome::Ignored
        );
        upgrade.facility = Some(Facility::LaunchPad);
        log.on_facility_upgrade_queued(&upgrade, EventScope::NONE);
        log.on_facility_upgrade_completed(&upgrade, EventScope::NONE);
        let states: Vec<ConstructionState> = log
            .records()
            .facility_constructions()
            .iter()
            .map(|f| f.state)
            .collect();
        assert_eq!(
            states,
            vec![ConstructionState::Started, ConstructionState::Completed]
        );
    }

    #[test]
    fn core_events_bind_once_when_enabled() {
        let mut bus = EventBus::new();
        let mut log = CareerLog::new(
            MockHost::at(0.0),
            &CareerLogSettings {
                enabled: false,
                log_period_months: 1,
            },
        );
        log.attach(&mut bus);
        assert!(bus.is_subscribed(GameEventKind::TechResearched, HANDLER_NAME));
        assert!(!bus.is_subscribed(GameEventKind::ContractAccepted, HANDLER_NAME));
        assert!(!log.events_bound());

        log.apply_settings(&CareerLogSettings::default(), &mut bus);
        log.apply_settings(&CareerLogSettings::default(), &mut bus);
        assert!(log.events_bound());
        for kind in GameEventKind::CORE {
            assert_eq!(bus.subscriber_count(kind), 1);
        }

        log.unbind_events(&mut bus);
        assert!(!log.events_bound());
        assert_eq!(bus.subscriber_count(GameEventKind::ContractAccepted), 0);
        assert_eq!(bus.subscriber_count(GameEventKind::TechResearched), 0);
    }

    #[test]
    fn save_and_load_restore_pointers() {
        let mut log = log_at(JAN_1951 + 5.0);
        log.current_period().unwrap();
        let mut node = SaveNode::default();
        log.save(&mut node);

        let mut restored = log_at(JAN_1951 + 5.0);
        let report = restored.load(&node).unwrap();
        assert_eq!(report.periods, 2);
        assert_eq!(restored.cur_period_start(), JAN_1951);
        assert_eq!(restored.next_period_start(), log.next_period_start());
        assert_eq!(restored.current_period().unwrap().start_ut, JAN_1951);
        assert_eq!(restored.records().periods().len(), 2);
    }
}
