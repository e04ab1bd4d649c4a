//! Host event subscription and dispatch.
//!
//! The host owns the event sources; the career log only asks to be told
//! about some of them. [`EventSubscriber`] is the registration interface
//! the host hands in, and [`EventBus`] is an in-process implementation
//! that remembers who subscribed to what and routes [`GameEvent`]s to a
//! [`GameEventHandler`] only for the kinds it is subscribed to.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::CareerLogError;
use crate::host::{
    ContractInfo, CurrencyModifierQuery, FacilityUpgrade, TechNode, VesselSituationChange,
};
use crate::scope::EventScope;

/// Kinds of host event the career log can listen to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GameEventKind {
    /// Currencies changed; carries per-currency totals.
    CurrencyModified,
    /// A contract was accepted.
    ContractAccepted,
    /// A contract was completed.
    ContractCompleted,
    /// A contract failed.
    ContractFailed,
    /// A contract was cancelled.
    ContractCancelled,
    /// A vessel changed situation.
    VesselSituationChanged,
    /// The construction subsystem finished researching a tech node.
    TechResearched,
    /// The construction subsystem queued a facility upgrade.
    FacilityUpgradeQueued,
    /// The construction subsystem finished a facility upgrade.
    FacilityUpgradeCompleted,
}

impl GameEventKind {
    /// Core game events, bound the first time the log is enabled.
    pub const CORE: [Self; 6] = [
        Self::VesselSituationChanged,
        Self::CurrencyModified,
        Self::ContractAccepted,
        Self::ContractCompleted,
        Self::ContractFailed,
        Self::ContractCancelled,
    ];

    /// Events raised by the construction subsystem, bound on attach.
    pub const CONSTRUCTION: [Self; 3] = [
        Self::TechResearched,
        Self::FacilityUpgradeQueued,
        Self::FacilityUpgradeCompleted,
    ];
}

/// A host event with its payload.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// See [`GameEventKind::CurrencyModified`].
    CurrencyModified(CurrencyModifierQuery),
    /// See [`GameEventKind::ContractAccepted`].
    ContractAccepted(ContractInfo),
    /// See [`GameEventKind::ContractCompleted`].
    ContractCompleted(ContractInfo),
    /// See [`GameEventKind::ContractFailed`].
    ContractFailed(ContractInfo),
    /// See [`GameEventKind::ContractCancelled`].
    ContractCancelled(ContractInfo),
    /// See [`GameEventKind::VesselSituationChanged`].
    VesselSituationChanged(VesselSituationChange),
    /// See [`GameEventKind::TechResearched`].
    TechResearched(TechNode),
    /// See [`GameEventKind::FacilityUpgradeQueued`].
    FacilityUpgradeQueued(FacilityUpgrade),
    /// See [`GameEventKind::FacilityUpgradeCompleted`].
    FacilityUpgradeCompleted(FacilityUpgrade),
}

impl GameEvent {
    /// The kind of this event.
    pub const fn kind(&self) -> GameEventKind {
        match self {
            Self::CurrencyModified(_) => GameEventKind::CurrencyModified,
            Self::ContractAccepted(_) => GameEventKind::ContractAccepted,
            Self::ContractCompleted(_) => GameEventKind::ContractCompleted,
            Self::ContractFailed(_) => GameEventKind::ContractFailed,
            Self::ContractCancelled(_) => GameEventKind::ContractCancelled,
            Self::VesselSituationChanged(_) => GameEventKind::VesselSituationChanged,
            Self::TechResearched(_) => GameEventKind::TechResearched,
            Self::FacilityUpgradeQueued(_) => GameEventKind::FacilityUpgradeQueued,
            Self::FacilityUpgradeCompleted(_) => GameEventKind::FacilityUpgradeCompleted,
        }
    }
}

/// What a handler did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// The event changed the career log.
    Recorded,
    /// The event was dropped without any state change.
    Ignored,
}

/// Registration interface for host events.
pub trait EventSubscriber {
    /// Register `handler` for events of `kind`. Registering twice is a
    /// no-op.
    fn subscribe(&mut self, kind: GameEventKind, handler: &'static str);

    /// Remove `handler` from events of `kind`.
    fn unsubscribe(&mut self, kind: GameEventKind, handler: &'static str);
}

/// A component that reacts to dispatched host events.
pub trait GameEventHandler {
    /// Name the handler subscribes under.
    fn handler_name(&self) -> &'static str;

    /// React to `event` raised under `scope`.
    ///
    /// # Errors
    ///
    /// Returns [`CareerLogError`] if the event could not be applied.
    fn handle(
        &mut self,
        event: &GameEvent,
        scope: EventScope,
    ) -> Result<EventOutcome, CareerLogError>;
}

/// In-process subscription table and dispatcher.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    subscriptions: BTreeMap<GameEventKind, BTreeSet<&'static str>>,
}

impl EventBus {
    /// Create a bus with no subscriptions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `handler` is subscribed to `kind`.
    pub fn is_subscribed(&self, kind: GameEventKind, handler: &str) -> bool {
        self.subscriptions
            .get(&kind)
            .is_some_and(|handlers| handlers.contains(handler))
    }

    /// Number of handlers subscribed to `kind`.
    pub fn subscriber_count(&self, kind: GameEventKind) -> usize {
        self.subscriptions.get(&kind).map_or(0, BTreeSet::len)
    }

    /// Deliver `event` to `handler` if it is subscribed to the event kind.
    ///
    /// # Errors
    ///
    /// Propagates the handler's error.
    pub fn dispatch(
        &self,
        handler: &mut dyn GameEventHandler,
        event: &GameEvent,
        scope: EventScope,
    ) -> Result<EventOutcome, CareerLogError> {
        if !self.is_subscribed(event.kind(), handler.handler_name()) {
            return Ok(EventOutcome::Ignored);
        }
        handler.handle(event, scope)
    }
}

impl EventSubscriber for EventBus {
    fn subscribe(&mut self, kind: GameEventKind, handler: &'static str) {
        self.subscriptions.entry(kind).or_default().insert(handler);
    }

    fn unsubscribe(&mut self, kind: GameEventKind, handler: &'static str) {
        if let Some(handlers) = self.subscriptions.get_mut(&kind) {
            handlers.remove(handler);
            if handlers.is_empty() {
                self.subscriptions.remove(&kind);
            }
        }
    }
}
