//! Solar resource modeling.
//!
//! Expands a 24-hour base irradiance profile across the horizon, applying
//! monthly variation factors and an optional seeded weather perturbation.

use rand::{SeedableRng, rngs::StdRng};

use crate::config::SolarConfig;
use crate::error::Error;
use crate::profile::{HOURS_PER_DAY, HourlyProfile, Horizon, MONTHS_PER_YEAR};

/// Hourly irradiance series plus the monthly factors it was built from.
///
/// Irradiance is in kW/m², so each value doubles as a capacity factor
/// against the 1 kW/m² standard test condition.
#[derive(Debug, Clone)]
pub struct SolarResource {
    irradiance: HourlyProfile,
    monthly_factors: Vec<f32>,
}

impl SolarResource {
    pub fn irradiance(&self) -> &HourlyProfile {
        &self.irradiance
    }

    pub fn monthly_factors(&self) -> &[f32] {
        &self.monthly_factors
    }

    /// Average daily irradiance sum (kWh/m²/day), i.e. peak sun hours.
    pub fn peak_sun_hours(&self) -> f32 {
        self.irradiance.daily_total()
    }
}

/// Builds the solar resource for the given horizon.
///
/// Deterministic when `weather_noise_std` is zero; otherwise each hour gets
/// a multiplicative Gaussian perturbation drawn from a `StdRng` seeded with
/// `seed`, clipped to non-negative irradiance.
///
/// # Errors
///
/// `InvalidConfig` when the base profile has != 24 entries, the monthly
/// table has != 12 entries, or any entry is out of range.
pub fn build_solar_resource(
    config: &SolarConfig,
    horizon: Horizon,
    seed: u64,
) -> Result<SolarResource, Error> {
    if config.base_irradiance.len() != HOURS_PER_DAY {
        return Err(Error::invalid_config(
            "solar.base_irradiance",
            format!(
                "must have {HOURS_PER_DAY} entries, got {}",
                config.base_irradiance.len()
            ),
        ));
    }
    if config
        .base_irradiance
        .iter()
        .any(|v| !v.is_finite() || *v < 0.0)
    {
        return Err(Error::invalid_config(
            "solar.base_irradiance",
            "values must be finite and >= 0",
        ));
    }
    if config.monthly_variation.len() != MONTHS_PER_YEAR {
        return Err(Error::invalid_config(
            "solar.monthly_variation",
            format!(
                "must have {MONTHS_PER_YEAR} entries, got {}",
                config.monthly_variation.len()
            ),
        ));
    }
    if config
        .monthly_variation
        .iter()
        .any(|m| !m.is_finite() || *m <= 0.0)
    {
        return Err(Error::invalid_config(
            "solar.monthly_variation",
            "entries must be finite and > 0",
        ));
    }
    if !config.weather_noise_std.is_finite() || config.weather_noise_std < 0.0 {
        return Err(Error::invalid_config(
            "solar.weather_noise_std",
            "must be finite and >= 0",
        ));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut values = Vec::with_capacity(horizon.hours());
    for day in 0..horizon.days() {
        let monthly = match horizon {
            Horizon::Daily => 1.0,
            Horizon::Annual => config.monthly_variation[horizon.month_of_day(day)],
        };
        for hour in 0..HOURS_PER_DAY {
            let base = config.base_irradiance[hour] * monthly;
            let perturbed = if config.weather_noise_std > 0.0 {
                base * (1.0 + gaussian_noise(&mut rng, config.weather_noise_std))
            } else {
                base
            };
            values.push(perturbed.max(0.0));
        }
    }

    Ok(SolarResource {
        irradiance: HourlyProfile::new(horizon, values)?,
        monthly_factors: config.monthly_variation.clone(),
    })
}

/// Gaussian sample with mean 0 via the Box-Muller transform.
pub(crate) fn gaussian_noise(rng: &mut StdRng, std_dev: f32) -> f32 {
    use rand::Rng;

    if std_dev <= 0.0 {
        return 0.0;
    }
    let u1: f32 = rng.random::<f32>().clamp(1e-6, 1.0);
    let u2: f32 = rng.random::<f32>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f32::consts::PI * u2).cos();
    z0 * std_dev
}
