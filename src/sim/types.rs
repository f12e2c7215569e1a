//! Simulation step records and results.

use std::fmt;

use crate::profile::{DAYS_PER_YEAR, Horizon};

/// Complete record of one simulated hour.
#[derive(Debug, Clone, PartialEq)]
pub struct StepRecord {
    /// Hour index within the horizon.
    pub hour: usize,
    /// PV supply after derating and the inverter cap (kW).
    pub supply_kw: f32,
    /// Total demand (kW).
    pub demand_kw: f32,
    /// Battery state of charge after this hour (kWh).
    pub soc_kwh: f32,
    /// Demand left unserved this hour (kW, >= 0).
    pub unmet_kw: f32,
}

impl fmt::Display for StepRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "h={:>4} | supply={:>7.2} kW  demand={:>7.2} kW  \
             soc={:>8.2} kWh  unmet={:>6.2} kW",
            self.hour, self.supply_kw, self.demand_kw, self.soc_kwh, self.unmet_kw
        )
    }
}

/// Outcome of a full energy-balance run.
///
/// Built once by the simulator and immutable afterwards.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    horizon: Horizon,
    steps: Vec<StepRecord>,
    realized_lpsp: f32,
    delivered_kwh: f32,
    unmet_kwh: f32,
    generated_kwh: f32,
}

impl SimulationResult {
    pub(crate) fn new(
        horizon: Horizon,
        steps: Vec<StepRecord>,
        realized_lpsp: f32,
        delivered_kwh: f32,
        unmet_kwh: f32,
        generated_kwh: f32,
    ) -> Self {
        Self {
            horizon,
            steps,
            realized_lpsp,
            delivered_kwh,
            unmet_kwh,
            generated_kwh,
        }
    }

    pub fn horizon(&self) -> Horizon {
        self.horizon
    }

    /// Per-hour records in time order.
    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    /// Fraction of hours with unserved demand.
    pub fn realized_lpsp(&self) -> f32 {
        self.realized_lpsp
    }

    /// Energy delivered to loads over the horizon (kWh).
    pub fn delivered_kwh(&self) -> f32 {
        self.delivered_kwh
    }

    /// Demand left unserved over the horizon (kWh).
    pub fn unmet_kwh(&self) -> f32 {
        self.unmet_kwh
    }

    /// PV energy generated over the horizon (kWh).
    pub fn generated_kwh(&self) -> f32 {
        self.generated_kwh
    }

    /// Delivered energy extrapolated to one year (kWh).
    pub fn annual_delivered_kwh(&self) -> f32 {
        self.delivered_kwh * (DAYS_PER_YEAR as f32 / self.horizon.days() as f32)
    }
}
