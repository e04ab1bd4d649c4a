//! Build the JSON upload document from career records.

use careerlog_core::CareerRecords;
use careerlog_types::time::iso8601;
use careerlog_types::{
    CareerLogDto, CareerLogPayload, ContractEventDto, FacilityConstructionEventDto,
    LaunchEventDto, LogPeriod, TechResearchEventDto, TimeError,
};

/// Convert one period into its upload shape.
///
/// `constructionFees` carries the period's accumulated other fees and
/// `otherFees` the other fees minus the cost of facility upgrades started
/// in the period. The receiving server depends on these exact values, so
/// they differ from the CSV columns of the same name.
pub fn period_dto(
    records: &CareerRecords,
    period: &LogPeriod,
    career_uuid: &str,
) -> Result<CareerLogDto, TimeError> {
    let summary = records.summarize(period);
    Ok(CareerLogDto {
        career_uuid: career_uuid.to_owned(),
        start_date: iso8601(period.start_ut)?,
        end_date: iso8601(period.end_ut)?,
        vab_upgrades: period.vab_upgrades,
        sph_upgrades: period.sph_upgrades,
        rnd_upgrades: period.rnd_upgrades,
        current_funds: period.current_funds,
        current_sci: period.current_sci,
        science_earned: period.science_earned,
        advance_funds: summary.advance_funds,
        reward_funds: summary.reward_funds,
        failure_funds: summary.failure_funds,
        other_funds_earned: period.other_funds_earned,
        launch_fees: period.launch_fees,
        maintenance_fees: period.maintenance_fees,
        tooling_fees: period.tooling_fees,
        entry_costs: period.entry_costs,
        construction_fees: period.other_fees,
        other_fees: period.other_fees - summary.construction_fees,
        funds_gain_mult: period.funds_gain_mult,
    })
}

/// Build the complete upload document: every period in insertion order
/// plus the four event logs.
pub fn build_payload(
    records: &CareerRecords,
    career_uuid: &str,
) -> Result<CareerLogPayload, TimeError> {
    Ok(CareerLogPayload {
        periods: records
            .periods()
            .iter()
            .map(|p| period_dto(records, p, career_uuid))
            .collect::<Result<_, _>>()?,
        contract_events: records
            .contracts()
            .iter()
            .map(ContractEventDto::from_event)
            .collect::<Result<_, _>>()?,
        facility_events: records
            .facility_constructions()
            .iter()
            .map(FacilityConstructionEventDto::from_event)
            .collect::<Result<_, _>>()?,
        tech_events: records
            .techs()
            .iter()
            .map(TechResearchEventDto::from_event)
            .collect::<Result<_, _>>()?,
        launch_events: records
            .launches()
            .iter()
            .map(LaunchEventDto::from_event)
            .collect::<Result<_, _>>()?,
    })
}
