//! Sectoral demand modeling.
//!
//! Builds an hourly demand time series from per-unit consumption patterns
//! (residential, educational, agricultural, other) scaled by unit counts and
//! monthly seasonal multipliers.

use crate::config::LoadConfig;
use crate::error::Error;
use crate::profile::{HOURS_PER_DAY, HourlyProfile, Horizon, LoadComponents, MONTHS_PER_YEAR, Sector};

/// Builds per-sector demand profiles for the given horizon.
///
/// Each configured sector contributes `pattern[hour] × unit count`, scaled
/// by that month's seasonal multiplier on the annual horizon. Sectors with
/// zero units are omitted.
///
/// # Errors
///
/// `InvalidConfig` when a pattern has the wrong length, the seasonal table
/// has != 12 entries, or any value is negative.
pub fn build_load_profile(config: &LoadConfig, horizon: Horizon) -> Result<LoadComponents, Error> {
    validate(config)?;

    let mut sectors = Vec::new();
    let mut push_sector = |sector: Sector, pattern: &[f32], count: f32| -> Result<(), Error> {
        if count == 0.0 || pattern.is_empty() {
            return Ok(());
        }
        let profile = tile_pattern(pattern, count, &config.seasonal_multipliers, horizon)?;
        sectors.push((sector, profile));
        Ok(())
    };

    push_sector(
        Sector::Residential,
        &config.household_pattern_kw,
        config.household_count as f32,
    )?;
    push_sector(
        Sector::Educational,
        &config.school_pattern_kw,
        config.school_count as f32,
    )?;
    push_sector(
        Sector::Agricultural,
        &config.pump_pattern_kw,
        config.irrigation_pump_count as f32,
    )?;
    push_sector(Sector::Other, &config.other_pattern_kw, 1.0)?;

    Ok(LoadComponents::new(horizon, sectors))
}

/// Repeats a 24-hour pattern across the horizon with per-month scaling.
fn tile_pattern(
    pattern: &[f32],
    count: f32,
    seasonal: &[f32],
    horizon: Horizon,
) -> Result<HourlyProfile, Error> {
    let mut values = Vec::with_capacity(horizon.hours());
    for day in 0..horizon.days() {
        let multiplier = match horizon {
            Horizon::Daily => 1.0,
            Horizon::Annual => seasonal[horizon.month_of_day(day)],
        };
        for hour in 0..HOURS_PER_DAY {
            values.push(pattern[hour] * count * multiplier);
        }
    }
    HourlyProfile::new(horizon, values)
}

fn validate(config: &LoadConfig) -> Result<(), Error> {
    for (field, pattern) in [
        ("load.household_pattern_kw", &config.household_pattern_kw),
        ("load.school_pattern_kw", &config.school_pattern_kw),
        ("load.pump_pattern_kw", &config.pump_pattern_kw),
    ] {
        if pattern.len() != HOURS_PER_DAY {
            return Err(Error::invalid_config(
                field,
                format!("must have {HOURS_PER_DAY} entries, got {}", pattern.len()),
            ));
        }
        check_non_negative(field, pattern)?;
    }
    if !config.other_pattern_kw.is_empty() {
        if config.other_pattern_kw.len() != HOURS_PER_DAY {
            return Err(Error::invalid_config(
                "load.other_pattern_kw",
                format!(
                    "must be empty or have {HOURS_PER_DAY} entries, got {}",
                    config.other_pattern_kw.len()
                ),
            ));
        }
        check_non_negative("load.other_pattern_kw", &config.other_pattern_kw)?;
    }
    if config.seasonal_multipliers.len() != MONTHS_PER_YEAR {
        return Err(Error::invalid_config(
            "load.seasonal_multipliers",
            format!(
                "must have {MONTHS_PER_YEAR} entries, got {}",
                config.seasonal_multipliers.len()
            ),
        ));
    }
    if config
        .seasonal_multipliers
        .iter()
        .any(|m| !m.is_finite() || *m <= 0.0)
    {
        return Err(Error::invalid_config(
            "load.seasonal_multipliers",
            "entries must be finite and > 0",
        ));
    }
    Ok(())
}

fn check_non_negative(field: &str, values: &[f32]) -> Result<(), Error> {
    if let Some((i, v)) = values
        .iter()
        .enumerate()
        .find(|(_, v)| !v.is_finite() || **v < 0.0)
    {
        return Err(Error::invalid_config(
            field,
            format!("value at hour {i} must be finite and >= 0, got {v}"),
        ));
    }
    Ok(())
}
