//! Economic evaluation: CAPEX/OPEX aggregation, discounted LCOE, payback
//! period, and IRR over the project cash flows.

use tracing::debug;

use crate::config::{CostTable, FinanceConfig};
use crate::error::Error;
use crate::sim::types::SimulationResult;
use crate::sizing::SystemSizing;

/// IRR bisection bracket and budget.
const IRR_RATE_LOW: f32 = -0.99;
const IRR_RATE_HIGH: f32 = 10.0;
const IRR_MAX_ITERATIONS: usize = 200;
const IRR_TOLERANCE: f32 = 1e-6;

/// Financial metrics for one sized system.
///
/// Carries the annualized energy and savings it was derived from so the
/// policy step can recompute the derived metrics from adjusted costs.
#[derive(Debug, Clone)]
pub struct EconomicMetrics {
    /// Total capital expenditure.
    pub capex: f32,
    /// First-year operating expenditure.
    pub opex_annual: f32,
    /// Levelized cost of energy per kWh delivered.
    pub lcoe: f32,
    /// Simple payback period in years.
    pub payback_years: f32,
    /// Internal rate of return on the project cash flows.
    pub irr: f32,
    /// Energy delivered per year (kWh), extrapolated from the horizon.
    pub annual_delivered_kwh: f32,
    /// Avoided-cost savings per year at the applied tariff.
    pub annual_savings: f32,
    /// Avoided grid emissions per year (kg CO2).
    pub avoided_co2_kg_per_year: f32,
}

/// Evaluates the financial metrics of a sized system.
///
/// CAPEX sums capacity × unit cost over PV, battery, inverter, and
/// balance-of-system; OPEX is a CAPEX fraction with optional escalation;
/// LCOE discounts lifetime cost over lifetime delivered energy (unmet load
/// excluded); payback and IRR work on the annual net savings.
///
/// # Errors
///
/// - `InvalidConfig` for negative costs, a zero lifetime, or a simulation
///   that delivered no energy.
/// - `NoPayback` when annual net savings are <= 0.
/// - `NoConvergence` when IRR bisection fails.
pub fn evaluate(
    sizing: &SystemSizing,
    simulation: &SimulationResult,
    costs: &CostTable,
    finance: &FinanceConfig,
) -> Result<EconomicMetrics, Error> {
    validate_costs(costs)?;
    validate_finance(finance)?;

    let capex = sizing.pv_capacity_kw * costs.pv_per_kw
        + sizing.battery_capacity_kwh * costs.battery_per_kwh
        + sizing.inverter_capacity_kw * costs.inverter_per_kw
        + sizing.pv_capacity_kw * costs.bos_per_kw;
    let opex_annual = capex * costs.om_fraction;
    let annual_delivered_kwh = simulation.annual_delivered_kwh();
    debug!(capex, opex_annual, annual_delivered_kwh, "evaluating economics");

    metrics_from_costs(
        capex,
        opex_annual,
        costs.om_escalation,
        annual_delivered_kwh,
        finance.tariff_per_kwh,
        finance,
    )
}

/// Core metric computation shared with the policy step.
///
/// `tariff_per_kwh` is passed separately from `finance` so tariff-adjusting
/// policies can override it.
pub(crate) fn metrics_from_costs(
    capex: f32,
    opex_annual: f32,
    om_escalation: f32,
    annual_delivered_kwh: f32,
    tariff_per_kwh: f32,
    finance: &FinanceConfig,
) -> Result<EconomicMetrics, Error> {
    if annual_delivered_kwh <= 0.0 {
        return Err(Error::invalid_config(
            "simulation",
            "no delivered energy to levelize",
        ));
    }

    let rate = finance.discount_rate;
    let years = finance.project_lifetime_years;
    let annual_savings = annual_delivered_kwh * tariff_per_kwh;

    // LCOE: discounted lifetime cost over discounted lifetime energy.
    let mut discounted_cost = capex;
    let mut discounted_energy = 0.0_f32;
    for year in 1..=years {
        let factor = discount_factor(rate, year);
        discounted_cost += opex_for_year(opex_annual, om_escalation, year) * factor;
        discounted_energy += annual_delivered_kwh * factor;
    }
    let lcoe = discounted_cost / discounted_energy;

    // Simple payback on first-year net savings.
    let annual_net_savings = annual_savings - opex_annual;
    if annual_net_savings <= 0.0 {
        return Err(Error::NoPayback { annual_net_savings });
    }
    let payback_years = capex / annual_net_savings;

    // IRR over [-capex, net_1, .., net_L].
    let net_flows: Vec<f32> = (1..=years)
        .map(|year| annual_savings - opex_for_year(opex_annual, om_escalation, year))
        .collect();
    let irr = internal_rate_of_return(capex, &net_flows)?;

    Ok(EconomicMetrics {
        capex,
        opex_annual,
        lcoe,
        payback_years,
        irr,
        annual_delivered_kwh,
        annual_savings,
        avoided_co2_kg_per_year: annual_delivered_kwh * finance.grid_emission_factor,
    })
}

fn opex_for_year(opex_annual: f32, escalation: f32, year: u32) -> f32 {
    opex_annual * (1.0 + escalation).powi(year as i32 - 1)
}

fn discount_factor(rate: f32, year: u32) -> f32 {
    1.0 / (1.0 + rate).powi(year as i32)
}

/// Net present value of the cash-flow series at the given rate.
fn npv(rate: f32, capex: f32, net_flows: &[f32]) -> f32 {
    let mut value = -capex;
    for (i, flow) in net_flows.iter().enumerate() {
        value += flow * discount_factor(rate, i as u32 + 1);
    }
    value
}

/// IRR via bisection over a fixed rate bracket.
///
/// # Errors
///
/// `NoConvergence` when the bracket does not straddle a sign change or the
/// interval fails to shrink below tolerance within the budget.
fn internal_rate_of_return(capex: f32, net_flows: &[f32]) -> Result<f32, Error> {
    // A fully subsidized system with positive net flows repays at any rate.
    if capex <= 0.0 && net_flows.iter().all(|f| *f >= 0.0) {
        return Ok(f32::INFINITY);
    }

    let mut low = IRR_RATE_LOW;
    let mut high = IRR_RATE_HIGH;
    let mut f_low = npv(low, capex, net_flows);
    let f_high = npv(high, capex, net_flows);

    if f_low == 0.0 {
        return Ok(low);
    }
    if f_high == 0.0 {
        return Ok(high);
    }
    if f_low.signum() == f_high.signum() {
        return Err(Error::NoConvergence {
            iterations: IRR_MAX_ITERATIONS,
        });
    }

    for _ in 0..IRR_MAX_ITERATIONS {
        let mid = (low + high) / 2.0;
        if high - low < IRR_TOLERANCE {
            return Ok(mid);
        }
        let f_mid = npv(mid, capex, net_flows);
        if f_mid == 0.0 {
            return Ok(mid);
        }
        if f_mid.signum() == f_low.signum() {
            low = mid;
            f_low = f_mid;
        } else {
            high = mid;
        }
    }
    Err(Error::NoConvergence {
        iterations: IRR_MAX_ITERATIONS,
    })
}

fn validate_costs(costs: &CostTable) -> Result<(), Error> {
    for (field, value) in [
        ("costs.pv_per_kw", costs.pv_per_kw),
        ("costs.battery_per_kwh", costs.battery_per_kwh),
        ("costs.inverter_per_kw", costs.inverter_per_kw),
        ("costs.bos_per_kw", costs.bos_per_kw),
        ("costs.om_escalation", costs.om_escalation),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(Error::invalid_config(field, "must be finite and >= 0"));
        }
    }
    if !(0.0..=1.0).contains(&costs.om_fraction) {
        return Err(Error::invalid_config("costs.om_fraction", "must be in [0.0, 1.0]"));
    }
    Ok(())
}

fn validate_finance(finance: &FinanceConfig) -> Result<(), Error> {
    if !finance.discount_rate.is_finite() || finance.discount_rate < 0.0 {
        return Err(Error::invalid_config("finance.discount_rate", "must be >= 0"));
    }
    if finance.project_lifetime_years == 0 {
        return Err(Error::invalid_config("finance.project_lifetime_years", "must be > 0"));
    }
    if !finance.tariff_per_kwh.is_finite() || finance.tariff_per_kwh < 0.0 {
        return Err(Error::invalid_config("finance.tariff_per_kwh", "must be >= 0"));
    }
    Ok(())
}
