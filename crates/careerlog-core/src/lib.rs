//! Career log bookkeeping: event classification, calendar periods and
//! persistence.
//!
//! A [`CareerLog`] sits between the host game and the career records. The
//! host hands it events (directly or through an [`EventBus`]) along with an
//! [`EventScope`] describing the transaction they happened in; the log
//! classifies funds deltas into the current [`LogPeriod`], appends contract,
//! launch, facility and tech events, and rolls periods over as the game
//! clock crosses month boundaries.
//!
//! # Modules
//!
//! - [`career_log`] -- The [`CareerLog`] aggregate and its event handlers
//! - [`classify`] -- Funds-change decision table
//! - [`periods`] -- Ordered period store keyed by start time
//! - [`records`] -- [`CareerRecords`] and per-period summaries
//! - [`bus`] -- Event kinds, subscription interface and in-process bus
//! - [`host`] -- Host query traits and event payloads
//! - [`scope`] -- Explicit transaction scope tokens
//! - [`save`] -- Brace-delimited save tree and its text codec
//! - [`persist`] -- Record layout inside the save tree
//! - [`config`] -- YAML configuration
//! - [`error`] -- Aggregate error type
//!
//! [`LogPeriod`]: careerlog_types::LogPeriod

pub mod bus;
pub mod career_log;
pub mod classify;
pub mod config;
pub mod error;
pub mod host;
pub mod periods;
pub mod persist;
pub mod records;
pub mod save;
pub mod scope;

pub use bus::{EventBus, EventOutcome, EventSubscriber, GameEvent, GameEventHandler, GameEventKind};
pub use career_log::CareerLog;
pub use classify::{classify_funds_change, FundsBucket};
pub use config::{CareerLogConfig, CareerLogSettings, ConfigError, ExportConfig, LoggingConfig};
pub use error::CareerLogError;
pub use host::{
    CareerHost, ContractInfo, ContractNamer, CurrencyModifierQuery, FacilityUpgrade, HostError,
    TechNode, TypeNameNamer, VesselSituationChange,
};
pub use periods::{PeriodError, PeriodStore};
pub use records::{CareerRecords, LoadReport, PeriodSummary};
pub use save::{SaveError, SaveNode};
pub use scope::{EventScope, ScopeKind};
