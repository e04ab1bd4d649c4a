//! Wire shapes for the career log web upload.
//!
//! Every DTO is a flat object of primitive fields with camelCase keys;
//! dates are ISO-8601 strings. TypeScript bindings are generated by
//! `ts-rs` so the receiving dashboard can share the definitions.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{ConstructionState, ContractEventType, Facility};
use crate::records::{ContractEvent, FacilityConstructionEvent, LaunchEvent, TechResearchEvent};
use crate::time::{iso8601, TimeError};

/// One period as uploaded to the career log server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct CareerLogDto {
    /// Identifier of the career this period belongs to.
    pub career_uuid: String,
    /// Period start, ISO-8601.
    pub start_date: String,
    /// Period end, ISO-8601.
    pub end_date: String,
    /// Spent VAB upgrade points.
    pub vab_upgrades: i32,
    /// Spent SPH upgrade points.
    pub sph_upgrades: i32,
    /// Spent R&D upgrade points.
    pub rnd_upgrades: i32,
    /// Funds on hand at period close.
    pub current_funds: f64,
    /// Science on hand at period close.
    pub current_sci: f64,
    /// Cumulative science earned at period close.
    pub science_earned: f64,
    /// Sum of contract advances accepted in the period.
    pub advance_funds: f64,
    /// Sum of contract completion rewards in the period.
    pub reward_funds: f64,
    /// Negated sum of funds changes of failed and cancelled contracts.
    pub failure_funds: f64,
    /// Unclassified income.
    pub other_funds_earned: f64,
    /// Launch fees.
    pub launch_fees: f64,
    /// Maintenance fees.
    pub maintenance_fees: f64,
    /// Tooling fees.
    pub tooling_fees: f64,
    /// Part entry costs.
    pub entry_costs: f64,
    /// Construction fees as reported by the upload format.
    pub construction_fees: f64,
    /// Unclassified spending minus construction costs.
    pub other_fees: f64,
    /// Funds-gain multiplier.
    pub funds_gain_mult: f64,
}

/// A contract event as uploaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct ContractEventDto {
    /// When it happened, ISO-8601.
    pub date: String,
    /// Lifecycle transition.
    #[serde(rename = "type")]
    pub event_type: ContractEventType,
    /// Funds change.
    pub funds_change: f64,
    /// Reputation change.
    pub rep_change: f64,
    /// Player-facing title.
    pub contract_display_name: String,
    /// Contract type identifier.
    pub contract_internal_name: String,
}

impl ContractEventDto {
    /// Build the wire form of a contract event.
    ///
    /// # Errors
    ///
    /// Returns [`TimeError`] if the event timestamp cannot be formatted.
    pub fn from_event(event: &ContractEvent) -> Result<Self, TimeError> {
        Ok(Self {
            date: iso8601(event.ut)?,
            event_type: event.event_type,
            funds_change: event.funds_change,
            rep_change: event.rep_change,
            contract_display_name: event.display_name.clone(),
            contract_internal_name: event.internal_name.clone(),
        })
    }
}

/// A facility construction event as uploaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct FacilityConstructionEventDto {
    /// When it happened, ISO-8601.
    pub date: String,
    /// Facility being upgraded.
    pub facility: Facility,
    /// Zero-based target level.
    pub new_level: i32,
    /// Upgrade cost.
    pub cost: f64,
    /// Started or completed.
    pub state: ConstructionState,
}

impl FacilityConstructionEventDto {
    /// Build the wire form of a facility construction event.
    ///
    /// # Errors
    ///
    /// Returns [`TimeError`] if the event timestamp cannot be formatted.
    pub fn from_event(event: &FacilityConstructionEvent) -> Result<Self, TimeError> {
        Ok(Self {
            date: iso8601(event.ut)?,
            facility: event.facility,
            new_level: event.new_level,
            cost: event.cost,
            state: event.state,
        })
    }
}

/// A tech research event as uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct TechResearchEventDto {
    /// When it happened, ISO-8601.
    pub date: String,
    /// Tech node identifier.
    pub node_name: String,
}

impl TechResearchEventDto {
    /// Build the wire form of a tech research event.
    ///
    /// # Errors
    ///
    /// Returns [`TimeError`] if the event timestamp cannot be formatted.
    pub fn from_event(event: &TechResearchEvent) -> Result<Self, TimeError> {
        Ok(Self {
            date: iso8601(event.ut)?,
            node_name: event.node_name.clone(),
        })
    }
}

/// A launch event as uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct LaunchEventDto {
    /// When it happened, ISO-8601.
    pub date: String,
    /// Vessel name.
    pub vessel_name: String,
}

impl LaunchEventDto {
    /// Build the wire form of a launch event.
    ///
    /// # Errors
    ///
    /// Returns [`TimeError`] if the event timestamp cannot be formatted.
    pub fn from_event(event: &LaunchEvent) -> Result<Self, TimeError> {
        Ok(Self {
            date: iso8601(event.ut)?,
            vessel_name: event.vessel_name.clone(),
        })
    }
}

/// The complete upload document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct CareerLogPayload {
    /// Every period, in insertion order.
    pub periods: Vec<CareerLogDto>,
    /// Every contract event.
    pub contract_events: Vec<ContractEventDto>,
    /// Every facility construction event.
    pub facility_events: Vec<FacilityConstructionEventDto>,
    /// Every tech research event.
    pub tech_events: Vec<TechResearchEventDto>,
    /// Every launch event.
    pub launch_events: Vec<LaunchEventDto>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn contract_dto_uses_wire_names() {
        let event = ContractEvent {
            ut: 86_400.0,
            event_type: ContractEventType::Complete,
            funds_change: 12_000.0,
            rep_change: 5.0,
            display_name: "First Orbit".to_owned(),
            internal_name: "FirstOrbit".to_owned(),
        };
        let dto = ContractEventDto::from_event(&event).unwrap();
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["date"], "1951-01-02T00:00:00.000Z");
        assert_eq!(json["type"], "Complete");
        assert_eq!(json["fundsChange"], 12_000.0);
        assert_eq!(json["contractInternalName"], "FirstOrbit");
    }

    #[test]
    fn empty_payload_has_five_arrays() {
        let json = serde_json::to_value(CareerLogPayload::default()).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 5);
        for key in [
            "periods",
            "contractEvents",
            "facilityEvents",
            "techEvents",
            "launchEvents",
        ] {
            assert!(obj[key].as_array().unwrap().is_empty(), "{key}");
        }
    }

    #[test]
    fn facility_dto_fields() {
        let event = FacilityConstructionEvent {
            ut: 0.0,
            facility: Facility::LaunchPad,
            new_level: 2,
            cost: 75_000.0,
            state: ConstructionState::Started,
        };
        let json =
            serde_json::to_value(FacilityConstructionEventDto::from_event(&event).unwrap())
                .unwrap();
        assert_eq!(json["facility"], "LaunchPad");
        assert_eq!(json["newLevel"], 2);
        assert_eq!(json["state"], "Started");
    }
}
