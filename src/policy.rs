//! Subsidy and incentive adjustments applied on top of the economic
//! evaluation.

use tracing::debug;

use crate::config::{FinanceConfig, PolicyConfig};
use crate::economics::{EconomicMetrics, metrics_from_costs};
use crate::error::Error;

/// Field of the economics a policy adjusts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyTarget {
    Capex,
    Opex,
    Tariff,
}

/// How the adjustment value is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustmentKind {
    /// Value is a percentage (0-100) of the targeted quantity.
    Percent,
    /// Value is subtracted from (capex/opex) or added to (tariff) the
    /// targeted quantity.
    Flat,
}

/// A validated subsidy/incentive rule.
#[derive(Debug, Clone)]
pub struct Policy {
    pub name: String,
    pub target: PolicyTarget,
    pub kind: AdjustmentKind,
    pub value: f32,
}

impl Policy {
    /// Validates a raw config entry into a typed policy.
    ///
    /// # Errors
    ///
    /// `InvalidPolicy` when the target or kind name is unknown.
    pub fn from_config(config: &PolicyConfig) -> Result<Self, Error> {
        let target = match config.target.as_str() {
            "capex" => PolicyTarget::Capex,
            "opex" => PolicyTarget::Opex,
            "tariff" => PolicyTarget::Tariff,
            other => {
                return Err(Error::InvalidPolicy {
                    name: config.name.clone(),
                    target: other.to_string(),
                });
            }
        };
        let kind = match config.kind.as_str() {
            "percent" => AdjustmentKind::Percent,
            "flat" => AdjustmentKind::Flat,
            other => {
                return Err(Error::InvalidPolicy {
                    name: config.name.clone(),
                    target: other.to_string(),
                });
            }
        };
        Ok(Self {
            name: config.name.clone(),
            target,
            kind,
            value: config.value,
        })
    }
}

/// Applies policies in list order and recomputes the derived metrics.
///
/// CAPEX and OPEX subsidies reduce the respective cost (clamped at zero);
/// tariff adjustments raise the avoided tariff the savings are computed
/// from. LCOE, payback, and IRR are recomputed from the adjusted values
/// with the same formulas as the base evaluation.
///
/// # Errors
///
/// Propagates `NoPayback` / `NoConvergence` when the adjusted cash flows no
/// longer admit a finite payback or IRR.
pub fn apply_policies(
    metrics: &EconomicMetrics,
    policies: &[Policy],
    om_escalation: f32,
    finance: &FinanceConfig,
) -> Result<EconomicMetrics, Error> {
    let mut capex = metrics.capex;
    let mut opex_annual = metrics.opex_annual;
    // Effective tariff backing the base savings figure.
    let mut tariff = metrics.annual_savings / metrics.annual_delivered_kwh;

    for policy in policies {
        match (policy.target, policy.kind) {
            (PolicyTarget::Capex, AdjustmentKind::Percent) => {
                capex -= capex * policy.value / 100.0;
            }
            (PolicyTarget::Capex, AdjustmentKind::Flat) => {
                capex -= policy.value;
            }
            (PolicyTarget::Opex, AdjustmentKind::Percent) => {
                opex_annual -= opex_annual * policy.value / 100.0;
            }
            (PolicyTarget::Opex, AdjustmentKind::Flat) => {
                opex_annual -= policy.value;
            }
            (PolicyTarget::Tariff, AdjustmentKind::Percent) => {
                tariff += tariff * policy.value / 100.0;
            }
            (PolicyTarget::Tariff, AdjustmentKind::Flat) => {
                tariff += policy.value;
            }
        }
        capex = capex.max(0.0);
        opex_annual = opex_annual.max(0.0);
        debug!(policy = %policy.name, capex, opex_annual, tariff, "applied policy");
    }

    metrics_from_costs(
        capex,
        opex_annual,
        om_escalation,
        metrics.annual_delivered_kwh,
        tariff,
        finance,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CostTable, FinanceConfig};
    use crate::economics::evaluate;
    use crate::profile::Horizon;
    use crate::sim::types::SimulationResult;
    use crate::sizing::SystemSizing;

    fn base_metrics() -> EconomicMetrics {
        let sizing = SystemSizing {
            pv_capacity_kw: 30.0,
            battery_capacity_kwh: 344.0,
            inverter_capacity_kw: 30.0,
            autonomy_days: 2.0,
        };
        let result =
            SimulationResult::new(Horizon::Daily, Vec::new(), 0.0, 155.0, 0.0, 155.0);
        evaluate(&sizing, &result, &CostTable::default(), &FinanceConfig::default()).unwrap()
    }

    fn policy(name: &str, target: PolicyTarget, kind: AdjustmentKind, value: f32) -> Policy {
        Policy {
            name: name.to_string(),
            target,
            kind,
            value,
        }
    }

    #[test]
    fn from_config_rejects_unknown_target() {
        let config = PolicyConfig {
            name: "bad".to_string(),
            target: "irr".to_string(),
            kind: "percent".to_string(),
            value: 5.0,
        };
        let err = Policy::from_config(&config);
        assert!(matches!(err, Err(Error::InvalidPolicy { .. })));
    }

    #[test]
    fn from_config_rejects_unknown_kind_with_readable_message() {
        let config = PolicyConfig {
            name: "typo".to_string(),
            target: "capex".to_string(),
            kind: "percnt".to_string(),
            value: 5.0,
        };
        let err = Policy::from_config(&config).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("percnt"), "message should carry the bad string: {msg}");
        assert!(msg.contains("kind"), "message should mention kinds: {msg}");
    }

    #[test]
    fn from_config_accepts_all_targets() {
        for target in ["capex", "opex", "tariff"] {
            let config = PolicyConfig {
                name: "p".to_string(),
                target: target.to_string(),
                kind: "flat".to_string(),
                value: 1.0,
            };
            assert!(Policy::from_config(&config).is_ok(), "target {target}");
        }
    }

    #[test]
    fn capex_subsidy_reduces_capex_and_lcoe() {
        let base = base_metrics();
        let subsidized = apply_policies(
            &base,
            &[policy("grant", PolicyTarget::Capex, AdjustmentKind::Percent, 30.0)],
            0.0,
            &FinanceConfig::default(),
        )
        .unwrap();
        assert!((subsidized.capex - base.capex * 0.7).abs() < 1e-2);
        assert!(subsidized.lcoe < base.lcoe);
        assert!(subsidized.payback_years < base.payback_years);
    }

    #[test]
    fn flat_subsidy_clamps_at_zero() {
        let base = base_metrics();
        let adjusted = apply_policies(
            &base,
            &[policy("huge", PolicyTarget::Capex, AdjustmentKind::Flat, base.capex * 2.0)],
            0.0,
            &FinanceConfig::default(),
        )
        .unwrap();
        assert_eq!(adjusted.capex, 0.0);
        assert!(adjusted.lcoe >= 0.0);
        assert_eq!(adjusted.payback_years, 0.0);
        assert!(adjusted.irr.is_infinite());
    }

    #[test]
    fn tariff_premium_raises_savings() {
        let base = base_metrics();
        let adjusted = apply_policies(
            &base,
            &[policy("feed_in", PolicyTarget::Tariff, AdjustmentKind::Flat, 0.05)],
            0.0,
            &FinanceConfig::default(),
        )
        .unwrap();
        assert!(adjusted.annual_savings > base.annual_savings);
        assert!(adjusted.payback_years < base.payback_years);
    }

    #[test]
    fn disjoint_policies_commute_on_lcoe() {
        let base = base_metrics();
        let capex_grant = policy("grant", PolicyTarget::Capex, AdjustmentKind::Percent, 20.0);
        let opex_relief = policy("relief", PolicyTarget::Opex, AdjustmentKind::Percent, 50.0);
        let finance = FinanceConfig::default();

        let ab = apply_policies(
            &base,
            &[capex_grant.clone(), opex_relief.clone()],
            0.0,
            &finance,
        )
        .unwrap();
        let ba = apply_policies(&base, &[opex_relief, capex_grant], 0.0, &finance).unwrap();
        assert!((ab.lcoe - ba.lcoe).abs() < 1e-6);
        assert!((ab.capex - ba.capex).abs() < 1e-3);
    }

    #[test]
    fn empty_policy_list_is_identity_up_to_rounding() {
        let base = base_metrics();
        let same = apply_policies(&base, &[], 0.0, &FinanceConfig::default()).unwrap();
        assert!((same.lcoe - base.lcoe).abs() < 1e-6);
        assert!((same.capex - base.capex).abs() < 1e-3);
        assert!((same.irr - base.irr).abs() < 1e-5);
    }
}
