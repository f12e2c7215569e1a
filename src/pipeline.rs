//! End-to-end scenario runner: load -> solar -> sizing -> simulation ->
//! economics -> policies.

use tracing::info;

use crate::config::ScenarioConfig;
use crate::economics::{self, EconomicMetrics};
use crate::error::Error;
use crate::policy::{self, Policy};
use crate::sim::{SimulationResult, SummaryReport, SystemParams};
use crate::sizing::{self, SystemSizing};
use crate::solar;

/// Everything a scenario run produces.
#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    pub sizing: SystemSizing,
    pub simulation: SimulationResult,
    pub summary: SummaryReport,
    pub metrics: EconomicMetrics,
    /// Metrics after applying the scenario's policies, when any are defined.
    pub policy_adjusted: Option<EconomicMetrics>,
}

/// Runs a full scenario from config to economics.
///
/// Stages run in a fixed order and each consumes only its predecessors'
/// outputs, so identical configs produce bit-identical outcomes.
///
/// # Errors
///
/// The first validation error from the config, or any stage error
/// (`ReliabilityTargetUnreachable`, `NoPayback`, `NoConvergence`,
/// `InvalidPolicy`).
pub fn run_scenario(config: &ScenarioConfig) -> Result<ScenarioOutcome, Error> {
    let errors = config.validate();
    if let Some(err) = errors.into_iter().next() {
        return Err(err);
    }

    let horizon = config.simulation.horizon;
    let params = SystemParams::default();

    let load = crate::load::build_load_profile(&config.load, horizon)?;
    info!(
        %horizon,
        daily_demand_kwh = load.total_demand().daily_total(),
        peak_kw = load.total_demand().peak(),
        "load profile built"
    );

    let resource = solar::build_solar_resource(&config.solar, horizon, config.simulation.seed)?;
    info!(peak_sun_hours = resource.peak_sun_hours(), "solar resource built");

    let outcome = sizing::size(&load, &resource, &config.sizing, &params)?;
    info!(
        pv_kw = outcome.sizing.pv_capacity_kw,
        battery_kwh = outcome.sizing.battery_capacity_kwh,
        inverter_kw = outcome.sizing.inverter_capacity_kw,
        lpsp = outcome.simulation.realized_lpsp(),
        "system sized"
    );

    let summary = SummaryReport::from_result(&outcome.simulation, outcome.sizing.battery_capacity_kwh);

    let metrics = economics::evaluate(
        &outcome.sizing,
        &outcome.simulation,
        &config.costs,
        &config.finance,
    )?;
    info!(capex = metrics.capex, lcoe = metrics.lcoe, "economics evaluated");

    let policy_adjusted = if config.policies.is_empty() {
        None
    } else {
        let policies = config
            .policies
            .iter()
            .map(Policy::from_config)
            .collect::<Result<Vec<_>, _>>()?;
        let adjusted = policy::apply_policies(
            &metrics,
            &policies,
            config.costs.om_escalation,
            &config.finance,
        )?;
        info!(
            policies = policies.len(),
            lcoe = adjusted.lcoe,
            "policies applied"
        );
        Some(adjusted)
    };

    Ok(ScenarioOutcome {
        sizing: outcome.sizing,
        simulation: outcome.simulation,
        summary,
        metrics,
        policy_adjusted,
    })
}
