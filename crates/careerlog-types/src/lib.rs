//! Shared type definitions for the career log.
//!
//! This crate holds the records every other crate works with. Types that
//! travel to the career log server flow downstream to `TypeScript` via
//! `ts-rs`.
//!
//! # Modules
//!
//! - [`enums`] -- Contract, construction, facility, transaction and vessel
//!   enumerations with stable text forms
//! - [`records`] -- [`LogPeriod`] and the four timestamped event records
//! - [`time`] -- UT to calendar-date conversion and month arithmetic
//! - [`dto`] -- JSON upload shapes

pub mod dto;
pub mod enums;
pub mod records;
pub mod time;

// Re-export all public types at crate root for convenience.
pub use dto::{
    CareerLogDto, CareerLogPayload, ContractEventDto, FacilityConstructionEventDto,
    LaunchEventDto, TechResearchEventDto,
};
pub use enums::{
    ConstructionState, ContractEventType, Facility, ParseEnumError, TransactionReason,
    VesselSituation,
};
pub use records::{
    ContractEvent, FacilityConstructionEvent, LaunchEvent, LogPeriod, TechResearchEvent,
    Timestamped,
};
pub use time::TimeError;
