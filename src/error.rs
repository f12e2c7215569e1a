//! Crate-wide error type.

use thiserror::Error;

/// Failure modes surfaced by the sizing and evaluation pipeline.
///
/// Every stage returns the first error it hits to its immediate caller;
/// nothing is recovered internally and no partial results are produced.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Malformed or out-of-range configuration, detected eagerly at the
    /// start of the offending operation. `field` is a dotted path such as
    /// `"solar.monthly_variation"`.
    #[error("invalid config: {field}: {message}")]
    InvalidConfig { field: String, message: String },

    /// The sizing search exhausted its iteration budget without meeting the
    /// loss-of-power-supply-probability target.
    #[error(
        "reliability target unreachable: realized LPSP {realized_lpsp:.4} > \
         target {lpsp_max:.4} after {iterations} search iterations"
    )]
    ReliabilityTargetUnreachable {
        iterations: usize,
        realized_lpsp: f32,
        lpsp_max: f32,
    },

    /// Annual net savings are non-positive, so the payback period is
    /// infinite.
    #[error("no payback: annual net savings {annual_net_savings:.2} <= 0")]
    NoPayback { annual_net_savings: f32 },

    /// IRR root-finding did not converge within its iteration budget, or the
    /// cash-flow series admits no sign change in the bracketed range.
    #[error("IRR did not converge within {iterations} iterations")]
    NoConvergence { iterations: usize },

    /// A policy referenced a target field that does not exist on the
    /// economic metrics, or an unrecognized adjustment kind. `target`
    /// carries whichever string failed to parse.
    #[error("invalid policy \"{name}\": unknown target or kind \"{target}\"")]
    InvalidPolicy { name: String, target: String },
}

impl Error {
    /// Shorthand for the most common variant.
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_config_display_includes_field_path() {
        let err = Error::invalid_config("solar.monthly_variation", "must have 12 entries");
        let msg = err.to_string();
        assert!(msg.contains("solar.monthly_variation"));
        assert!(msg.contains("12 entries"));
    }

    #[test]
    fn invalid_policy_display_names_policy_and_target() {
        let err = Error::InvalidPolicy {
            name: "pv_grant".to_string(),
            target: "bogus".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("pv_grant"));
        assert!(msg.contains("bogus"));
    }
}
