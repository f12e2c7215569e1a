//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::Error;
use crate::profile::{HOURS_PER_DAY, Horizon, MONTHS_PER_YEAR};

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the `village_baseline` preset. Load
/// from TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::village_baseline`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Horizon and seed.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Sectoral demand parameters.
    #[serde(default)]
    pub load: LoadConfig,
    /// Solar resource parameters.
    #[serde(default)]
    pub solar: SolarConfig,
    /// Reliability and autonomy targets.
    #[serde(default)]
    pub sizing: SizingTargets,
    /// Component unit costs and O&M.
    #[serde(default)]
    pub costs: CostTable,
    /// Discounting and tariff parameters.
    #[serde(default)]
    pub finance: FinanceConfig,
    /// Subsidy/incentive adjustments, applied in list order.
    #[serde(default, rename = "policy")]
    pub policies: Vec<PolicyConfig>,
}

/// Horizon and seed.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Simulation horizon: `"daily"` or `"annual"`.
    pub horizon: Horizon,
    /// Master random seed for weather perturbation.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            horizon: Horizon::Daily,
            seed: 42,
        }
    }
}

/// Sectoral demand parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadConfig {
    /// Number of households.
    pub household_count: u32,
    /// Number of schools.
    pub school_count: u32,
    /// Number of irrigation pumps.
    pub irrigation_pump_count: u32,
    /// Per-household 24-hour load pattern (kW), evening peak.
    pub household_pattern_kw: Vec<f32>,
    /// Per-school 24-hour load pattern (kW), daytime peak.
    pub school_pattern_kw: Vec<f32>,
    /// Per-pump 24-hour load pattern (kW), daytime irrigation window.
    pub pump_pattern_kw: Vec<f32>,
    /// Aggregate 24-hour pattern for loads outside the named sectors (kW).
    /// Empty means no such sector.
    pub other_pattern_kw: Vec<f32>,
    /// Monthly demand multipliers (12 entries, mean ~1). Applied on the
    /// annual horizon only.
    pub seasonal_multipliers: Vec<f32>,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            household_count: 50,
            school_count: 1,
            irrigation_pump_count: 0,
            household_pattern_kw: default_household_pattern(),
            school_pattern_kw: default_school_pattern(),
            pump_pattern_kw: default_pump_pattern(),
            other_pattern_kw: Vec::new(),
            seasonal_multipliers: vec![1.0; MONTHS_PER_YEAR],
        }
    }
}

/// Per-household hourly pattern summing to 3.0 kWh/day, 18:00-20:00 peak.
fn default_household_pattern() -> Vec<f32> {
    vec![
        0.04, 0.04, 0.04, 0.04, 0.04, 0.05, // night
        0.12, 0.15, 0.10, 0.06, 0.06, 0.06, // morning
        0.08, 0.06, 0.06, 0.06, 0.10, 0.18, // afternoon
        0.45, 0.50, 0.35, 0.20, 0.10, 0.06, // evening peak
    ]
}

/// Per-school hourly pattern summing to 5.0 kWh/day, school-hours peak.
fn default_school_pattern() -> Vec<f32> {
    vec![
        0.0, 0.0, 0.0, 0.0, 0.0, 0.0, //
        0.0, 0.2, 0.6, 0.7, 0.7, 0.7, //
        0.6, 0.6, 0.5, 0.3, 0.1, 0.0, //
        0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
    ]
}

/// Per-pump hourly pattern summing to 11.0 kWh/day, daytime irrigation.
fn default_pump_pattern() -> Vec<f32> {
    vec![
        0.0, 0.0, 0.0, 0.0, 0.0, 0.0, //
        1.0, 2.0, 2.2, 2.2, 2.2, 1.4, //
        0.0, 0.0, 0.0, 0.0, 0.0, 0.0, //
        0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
    ]
}

/// Solar resource parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolarConfig {
    /// 24-hour base irradiance profile (kW/m²).
    pub base_irradiance: Vec<f32>,
    /// Monthly irradiance scaling factors (12 entries, positive, mean ~1).
    pub monthly_variation: Vec<f32>,
    /// Std dev of the multiplicative weather perturbation (0 = deterministic).
    pub weather_noise_std: f32,
}

impl Default for SolarConfig {
    fn default() -> Self {
        Self {
            base_irradiance: default_irradiance_profile(),
            monthly_variation: vec![1.0; MONTHS_PER_YEAR],
            weather_noise_std: 0.0,
        }
    }
}

/// Half-sine irradiance between 06:00 and 18:00, ~6.5 peak sun hours.
fn default_irradiance_profile() -> Vec<f32> {
    vec![
        0.0, 0.0, 0.0, 0.0, 0.0, 0.0, //
        0.111, 0.325, 0.517, 0.674, 0.785, 0.843, //
        0.843, 0.785, 0.674, 0.517, 0.325, 0.111, //
        0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
    ]
}

/// Reliability and autonomy targets for the sizing search.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SizingTargets {
    /// Loss-of-power-supply-probability ceiling (fraction of hours).
    pub lpsp_max: f32,
    /// Days of demand the battery must cover on its own.
    pub autonomy_days: f32,
    /// Inverter headroom above peak demand (fraction).
    pub peak_safety_margin: f32,
}

impl Default for SizingTargets {
    fn default() -> Self {
        Self {
            lpsp_max: 0.05,
            autonomy_days: 2.0,
            peak_safety_margin: 0.2,
        }
    }
}

/// Component unit costs and O&M.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CostTable {
    /// PV array cost per kW.
    pub pv_per_kw: f32,
    /// Battery cost per kWh.
    pub battery_per_kwh: f32,
    /// Inverter cost per kW.
    pub inverter_per_kw: f32,
    /// Balance-of-system cost per kW of PV.
    pub bos_per_kw: f32,
    /// Annual O&M as a fraction of CAPEX.
    pub om_fraction: f32,
    /// Annual O&M escalation rate (0 = flat).
    pub om_escalation: f32,
}

impl Default for CostTable {
    fn default() -> Self {
        Self {
            pv_per_kw: 700.0,
            battery_per_kwh: 250.0,
            inverter_per_kw: 150.0,
            bos_per_kw: 120.0,
            om_fraction: 0.02,
            om_escalation: 0.0,
        }
    }
}

/// Discounting and tariff parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FinanceConfig {
    /// Annual discount rate.
    pub discount_rate: f32,
    /// Project lifetime in years.
    pub project_lifetime_years: u32,
    /// Avoided electricity tariff per kWh delivered.
    pub tariff_per_kwh: f32,
    /// Grid emission factor for avoided-CO2 accounting (kg CO2 per kWh).
    pub grid_emission_factor: f32,
}

impl Default for FinanceConfig {
    fn default() -> Self {
        Self {
            discount_rate: 0.08,
            project_lifetime_years: 20,
            tariff_per_kwh: 0.25,
            grid_emission_factor: 0.82,
        }
    }
}

/// One subsidy/incentive adjustment as written in scenario TOML.
///
/// `target` and `kind` are validated into typed values by
/// [`crate::policy::Policy::from_config`].
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    /// Human-readable policy name.
    pub name: String,
    /// Adjusted field: `"capex"`, `"opex"`, or `"tariff"`.
    pub target: String,
    /// Adjustment kind: `"percent"` or `"flat"`.
    pub kind: String,
    /// Percentage (0-100) or flat currency/tariff amount.
    pub value: f32,
}

impl ScenarioConfig {
    /// Returns the baseline village scenario: 50 households, one school,
    /// no irrigation, deterministic weather.
    pub fn village_baseline() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            load: LoadConfig::default(),
            solar: SolarConfig::default(),
            sizing: SizingTargets::default(),
            costs: CostTable::default(),
            finance: FinanceConfig::default(),
            policies: Vec::new(),
        }
    }

    /// Returns the agricultural preset: fewer households, heavy daytime
    /// pumping, annual horizon with monsoon-shaped irradiance and noise.
    pub fn agricultural() -> Self {
        Self {
            simulation: SimulationConfig {
                horizon: Horizon::Annual,
                ..SimulationConfig::default()
            },
            load: LoadConfig {
                household_count: 25,
                school_count: 0,
                irrigation_pump_count: 6,
                seasonal_multipliers: vec![
                    0.9, 0.9, 1.0, 1.1, 1.2, 1.2, //
                    1.1, 1.0, 1.0, 0.9, 0.9, 0.9,
                ],
                ..LoadConfig::default()
            },
            solar: SolarConfig {
                monthly_variation: vec![
                    0.95, 1.0, 1.1, 1.15, 1.15, 0.9, //
                    0.75, 0.8, 0.95, 1.05, 1.1, 1.1,
                ],
                weather_noise_std: 0.08,
                ..SolarConfig::default()
            },
            sizing: SizingTargets {
                autonomy_days: 1.5,
                ..SizingTargets::default()
            },
            costs: CostTable::default(),
            finance: FinanceConfig::default(),
            policies: Vec::new(),
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["village_baseline", "agricultural"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, Error> {
        match name {
            "village_baseline" => Ok(Self::village_baseline()),
            "agricultural" => Ok(Self::agricultural()),
            _ => Err(Error::invalid_config(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the file cannot be read or the TOML is
    /// invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, Error> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::invalid_config("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the TOML is invalid or contains unknown
    /// fields.
    pub fn from_toml_str(s: &str) -> Result<Self, Error> {
        toml::from_str(s).map_err(|e| Error::invalid_config("toml", e.to_string()))
    }

    /// Validates all fields and returns the list of violations.
    ///
    /// Returns an empty vector if the configuration is valid.
    pub fn validate(&self) -> Vec<Error> {
        let mut errors = Vec::new();

        let load = &self.load;
        for (field, pattern) in [
            ("load.household_pattern_kw", &load.household_pattern_kw),
            ("load.school_pattern_kw", &load.school_pattern_kw),
            ("load.pump_pattern_kw", &load.pump_pattern_kw),
        ] {
            if pattern.len() != HOURS_PER_DAY {
                errors.push(Error::invalid_config(
                    field,
                    format!("must have {HOURS_PER_DAY} entries, got {}", pattern.len()),
                ));
            }
            if pattern.iter().any(|v| !v.is_finite() || *v < 0.0) {
                errors.push(Error::invalid_config(field, "values must be finite and >= 0"));
            }
        }
        if !load.other_pattern_kw.is_empty() && load.other_pattern_kw.len() != HOURS_PER_DAY {
            errors.push(Error::invalid_config(
                "load.other_pattern_kw",
                format!(
                    "must be empty or have {HOURS_PER_DAY} entries, got {}",
                    load.other_pattern_kw.len()
                ),
            ));
        }
        if load.seasonal_multipliers.len() != MONTHS_PER_YEAR {
            errors.push(Error::invalid_config(
                "load.seasonal_multipliers",
                format!(
                    "must have {MONTHS_PER_YEAR} entries, got {}",
                    load.seasonal_multipliers.len()
                ),
            ));
        }
        if load.seasonal_multipliers.iter().any(|m| !m.is_finite() || *m <= 0.0) {
            errors.push(Error::invalid_config(
                "load.seasonal_multipliers",
                "entries must be finite and > 0",
            ));
        }

        let solar = &self.solar;
        if solar.base_irradiance.len() != HOURS_PER_DAY {
            errors.push(Error::invalid_config(
                "solar.base_irradiance",
                format!(
                    "must have {HOURS_PER_DAY} entries, got {}",
                    solar.base_irradiance.len()
                ),
            ));
        }
        if solar.base_irradiance.iter().any(|v| !v.is_finite() || *v < 0.0) {
            errors.push(Error::invalid_config(
                "solar.base_irradiance",
                "values must be finite and >= 0",
            ));
        }
        if solar.monthly_variation.len() != MONTHS_PER_YEAR {
            errors.push(Error::invalid_config(
                "solar.monthly_variation",
                format!(
                    "must have {MONTHS_PER_YEAR} entries, got {}",
                    solar.monthly_variation.len()
                ),
            ));
        }
        if solar.monthly_variation.iter().any(|m| !m.is_finite() || *m <= 0.0) {
            errors.push(Error::invalid_config(
                "solar.monthly_variation",
                "entries must be finite and > 0",
            ));
        }
        if !solar.weather_noise_std.is_finite() || solar.weather_noise_std < 0.0 {
            errors.push(Error::invalid_config(
                "solar.weather_noise_std",
                "must be finite and >= 0",
            ));
        }

        let sizing = &self.sizing;
        if !(0.0..=1.0).contains(&sizing.lpsp_max) {
            errors.push(Error::invalid_config("sizing.lpsp_max", "must be in [0.0, 1.0]"));
        }
        if !sizing.autonomy_days.is_finite() || sizing.autonomy_days <= 0.0 {
            errors.push(Error::invalid_config("sizing.autonomy_days", "must be > 0"));
        }
        if !sizing.peak_safety_margin.is_finite() || sizing.peak_safety_margin < 0.0 {
            errors.push(Error::invalid_config("sizing.peak_safety_margin", "must be >= 0"));
        }

        let costs = &self.costs;
        for (field, value) in [
            ("costs.pv_per_kw", costs.pv_per_kw),
            ("costs.battery_per_kwh", costs.battery_per_kwh),
            ("costs.inverter_per_kw", costs.inverter_per_kw),
            ("costs.bos_per_kw", costs.bos_per_kw),
            ("costs.om_escalation", costs.om_escalation),
        ] {
            if !value.is_finite() || value < 0.0 {
                errors.push(Error::invalid_config(field, "must be finite and >= 0"));
            }
        }
        if !(0.0..=1.0).contains(&costs.om_fraction) {
            errors.push(Error::invalid_config("costs.om_fraction", "must be in [0.0, 1.0]"));
        }

        let fin = &self.finance;
        if !fin.discount_rate.is_finite() || fin.discount_rate < 0.0 {
            errors.push(Error::invalid_config("finance.discount_rate", "must be >= 0"));
        }
        if fin.project_lifetime_years == 0 {
            errors.push(Error::invalid_config("finance.project_lifetime_years", "must be > 0"));
        }
        if !fin.tariff_per_kwh.is_finite() || fin.tariff_per_kwh < 0.0 {
            errors.push(Error::invalid_config("finance.tariff_per_kwh", "must be >= 0"));
        }
        if !fin.grid_emission_factor.is_finite() || fin.grid_emission_factor < 0.0 {
            errors.push(Error::invalid_config("finance.grid_emission_factor", "must be >= 0"));
        }

        for (i, policy) in self.policies.iter().enumerate() {
            if !matches!(policy.target.as_str(), "capex" | "opex" | "tariff") {
                errors.push(Error::invalid_config(
                    format!("policy[{i}].target"),
                    format!(
                        "must be \"capex\", \"opex\", or \"tariff\", got \"{}\"",
                        policy.target
                    ),
                ));
            }
            if !matches!(policy.kind.as_str(), "percent" | "flat") {
                errors.push(Error::invalid_config(
                    format!("policy[{i}].kind"),
                    format!("must be \"percent\" or \"flat\", got \"{}\"", policy.kind),
                ));
            }
            if !policy.value.is_finite() || policy.value < 0.0 {
                errors.push(Error::invalid_config(
                    format!("policy[{i}].value"),
                    "must be finite and >= 0",
                ));
            }
        }

        errors
    }
}
