//! Post-hoc summary indicators derived from a complete simulation run.

use std::fmt;

use super::types::SimulationResult;

/// Aggregate indicators computed from the step records, kept consistent
/// with the per-step data by deriving everything post-hoc.
#[derive(Debug, Clone)]
pub struct SummaryReport {
    /// Share of demand actually served (1.0 when no load went unserved).
    pub served_fraction: f32,
    /// PV generation over total demand. Exceeds 1.0 when generation
    /// outruns consumption and the surplus is stored or spilled.
    pub renewable_fraction: f32,
    /// Largest hourly demand (kW).
    pub peak_demand_kw: f32,
    /// Mean demand over peak demand.
    pub load_factor: f32,
    /// Fraction of hours with unserved demand.
    pub realized_lpsp: f32,
    /// Total battery energy moved in and out (kWh, sum of |SoC deltas|).
    pub battery_throughput_kwh: f32,
    /// Battery equivalent full cycles (throughput / 2 x capacity).
    pub equivalent_full_cycles: f32,
}

impl SummaryReport {
    /// Computes all indicators from a finished run.
    pub fn from_result(result: &SimulationResult, battery_capacity_kwh: f32) -> Self {
        let steps = result.steps();
        if steps.is_empty() {
            return Self {
                served_fraction: 0.0,
                renewable_fraction: 0.0,
                peak_demand_kw: 0.0,
                load_factor: 0.0,
                realized_lpsp: 0.0,
                battery_throughput_kwh: 0.0,
                equivalent_full_cycles: 0.0,
            };
        }

        let mut peak_demand = 0.0_f32;
        let mut demand_sum = 0.0_f32;
        let mut throughput = 0.0_f32;
        let mut prev_soc = battery_capacity_kwh; // simulator starts full

        for step in steps {
            peak_demand = peak_demand.max(step.demand_kw);
            demand_sum += step.demand_kw;
            throughput += (step.soc_kwh - prev_soc).abs();
            prev_soc = step.soc_kwh;
        }

        let mean_demand = demand_sum / steps.len() as f32;
        let load_factor = if peak_demand > 0.0 {
            mean_demand / peak_demand
        } else {
            0.0
        };
        let served_fraction = if demand_sum > 0.0 {
            result.delivered_kwh() / demand_sum
        } else {
            0.0
        };
        let renewable_fraction = if demand_sum > 0.0 {
            result.generated_kwh() / demand_sum
        } else {
            0.0
        };
        let cycles = if battery_capacity_kwh > 0.0 {
            throughput / (2.0 * battery_capacity_kwh)
        } else {
            0.0
        };

        Self {
            served_fraction,
            renewable_fraction,
            peak_demand_kw: peak_demand,
            load_factor,
            realized_lpsp: result.realized_lpsp(),
            battery_throughput_kwh: throughput,
            equivalent_full_cycles: cycles,
        }
    }
}

impl fmt::Display for SummaryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Simulation Summary ---")?;
        writeln!(f, "Served demand:         {:.1}%", self.served_fraction * 100.0)?;
        writeln!(f, "Renewable fraction:    {:.1}%", self.renewable_fraction * 100.0)?;
        writeln!(f, "Peak demand:           {:.2} kW", self.peak_demand_kw)?;
        writeln!(f, "Load factor:           {:.2}", self.load_factor)?;
        writeln!(f, "Realized LPSP:         {:.4}", self.realized_lpsp)?;
        write!(
            f,
            "Battery throughput:    {:.2} kWh ({:.2} equiv. cycles)",
            self.battery_throughput_kwh, self.equivalent_full_cycles
        )
    }
}
