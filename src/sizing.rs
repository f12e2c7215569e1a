//! Component sizing from demand and solar resource, with a bounded
//! reliability search.

use tracing::debug;

use crate::error::Error;
use crate::config::SizingTargets;
use crate::profile::LoadComponents;
use crate::sim::engine::{SystemParams, run_energy_balance};
use crate::sim::types::SimulationResult;
use crate::solar::SolarResource;

/// Standard PV capacity increment; initial PV sizing rounds up to this.
pub const PV_INCREMENT_KW: f32 = 0.5;
/// Battery capacity increment used by the reliability search.
pub const BATTERY_INCREMENT_KWH: f32 = 1.0;
/// Iteration budget for the reliability search.
const MAX_SEARCH_ITERATIONS: usize = 200;

/// Capacities selected for one scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemSizing {
    /// PV array capacity (kW at STC).
    pub pv_capacity_kw: f32,
    /// Usable battery capacity (kWh).
    pub battery_capacity_kwh: f32,
    /// Inverter capacity (kW).
    pub inverter_capacity_kw: f32,
    /// Autonomy target the battery was sized for (days).
    pub autonomy_days: f32,
}

/// An accepted sizing together with the simulation run that accepted it,
/// so the realized LPSP is available without re-simulating.
#[derive(Debug, Clone)]
pub struct SizingOutcome {
    pub sizing: SystemSizing,
    pub simulation: SimulationResult,
}

/// Sizes PV, battery, and inverter for the given demand and solar resource.
///
/// Initial capacities come from the closed-form rules (daily energy over
/// peak sun hours for PV, autonomy days over round-trip efficiency for the
/// battery, peak demand plus margin for the inverter). The energy balance
/// is then simulated, and PV and battery grow in fixed increments until the
/// realized LPSP meets `targets.lpsp_max` or the iteration budget runs out.
///
/// # Errors
///
/// - `InvalidConfig` when `autonomy_days` <= 0, `lpsp_max` is outside
///   [0, 1], the safety margin is negative, or the solar resource carries
///   no energy.
/// - `ReliabilityTargetUnreachable` when the search budget is exhausted.
pub fn size(
    load: &LoadComponents,
    solar: &SolarResource,
    targets: &SizingTargets,
    params: &SystemParams,
) -> Result<SizingOutcome, Error> {
    if !targets.autonomy_days.is_finite() || targets.autonomy_days <= 0.0 {
        return Err(Error::invalid_config("sizing.autonomy_days", "must be > 0"));
    }
    if !(0.0..=1.0).contains(&targets.lpsp_max) {
        return Err(Error::invalid_config("sizing.lpsp_max", "must be in [0.0, 1.0]"));
    }
    if !targets.peak_safety_margin.is_finite() || targets.peak_safety_margin < 0.0 {
        return Err(Error::invalid_config("sizing.peak_safety_margin", "must be >= 0"));
    }

    let demand = load.total_demand();
    let daily_energy_kwh = demand.daily_total();
    let peak_demand_kw = demand.peak();
    let peak_sun_hours = solar.peak_sun_hours();
    if peak_sun_hours <= 0.0 {
        return Err(Error::invalid_config(
            "solar.base_irradiance",
            "must carry non-zero energy for PV sizing",
        ));
    }

    let mut pv_capacity_kw = round_up_to_increment(
        daily_energy_kwh / (peak_sun_hours * params.system_efficiency),
        PV_INCREMENT_KW,
    );
    let mut battery_capacity_kwh = round_up_to_increment(
        daily_energy_kwh * targets.autonomy_days / params.round_trip_efficiency(),
        BATTERY_INCREMENT_KWH,
    );
    let inverter_capacity_kw = peak_demand_kw * (1.0 + targets.peak_safety_margin);

    let mut last_lpsp = 1.0_f32;
    for iteration in 0..MAX_SEARCH_ITERATIONS {
        let sizing = SystemSizing {
            pv_capacity_kw,
            battery_capacity_kwh,
            inverter_capacity_kw,
            autonomy_days: targets.autonomy_days,
        };
        let simulation = run_energy_balance(&sizing, &demand, solar, params)?;
        last_lpsp = simulation.realized_lpsp();
        debug!(
            iteration,
            pv_capacity_kw, battery_capacity_kwh, last_lpsp, "sizing search step"
        );

        if last_lpsp <= targets.lpsp_max {
            return Ok(SizingOutcome { sizing, simulation });
        }
        pv_capacity_kw += PV_INCREMENT_KW;
        battery_capacity_kwh += BATTERY_INCREMENT_KWH;
    }

    Err(Error::ReliabilityTargetUnreachable {
        iterations: MAX_SEARCH_ITERATIONS,
        realized_lpsp: last_lpsp,
        lpsp_max: targets.lpsp_max,
    })
}

fn round_up_to_increment(value: f32, increment: f32) -> f32 {
    (value / increment).ceil() * increment
}
