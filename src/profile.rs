//! Core value types: simulation horizon, hourly profiles, and sectoral load
//! components.

use std::fmt;

use serde::Deserialize;

use crate::error::Error;

/// Hours in one simulated day.
pub const HOURS_PER_DAY: usize = 24;
/// Hours in one simulated (non-leap) year.
pub const HOURS_PER_YEAR: usize = 8760;
/// Days in one simulated year.
pub const DAYS_PER_YEAR: usize = 365;
/// Months in one simulated year.
pub const MONTHS_PER_YEAR: usize = 12;

/// Day counts per month for the annual horizon.
const DAYS_IN_MONTH: [usize; MONTHS_PER_YEAR] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Simulation horizon: one representative day or a full year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Horizon {
    /// 24 hourly steps.
    Daily,
    /// 8760 hourly steps.
    Annual,
}

impl Horizon {
    /// Number of hourly steps in this horizon.
    pub fn hours(self) -> usize {
        match self {
            Horizon::Daily => HOURS_PER_DAY,
            Horizon::Annual => HOURS_PER_YEAR,
        }
    }

    /// Number of days in this horizon.
    pub fn days(self) -> usize {
        match self {
            Horizon::Daily => 1,
            Horizon::Annual => DAYS_PER_YEAR,
        }
    }

    /// Month index (0-11) containing the given day-of-year (0-364).
    /// Always 0 on the daily horizon.
    pub fn month_of_day(self, day: usize) -> usize {
        if self == Horizon::Daily {
            return 0;
        }
        let mut d = day % DAYS_PER_YEAR;
        for (month, &len) in DAYS_IN_MONTH.iter().enumerate() {
            if d < len {
                return month;
            }
            d -= len;
        }
        MONTHS_PER_YEAR - 1
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Horizon::Daily => write!(f, "daily (24 h)"),
            Horizon::Annual => write!(f, "annual (8760 h)"),
        }
    }
}

/// An ordered hourly series of non-negative values (kW or kWh/m² per hour).
///
/// Length always matches the declared horizon; the constructor rejects
/// anything else, so downstream code can index freely.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyProfile {
    horizon: Horizon,
    values: Vec<f32>,
}

impl HourlyProfile {
    /// Validates and wraps an hourly series.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` when the length does not match the horizon or any
    /// value is negative or non-finite.
    pub fn new(horizon: Horizon, values: Vec<f32>) -> Result<Self, Error> {
        if values.len() != horizon.hours() {
            return Err(Error::invalid_config(
                "profile",
                format!("expected {} hourly values, got {}", horizon.hours(), values.len()),
            ));
        }
        if let Some((i, v)) = values
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(Error::invalid_config(
                "profile",
                format!("value at hour {i} must be finite and >= 0, got {v}"),
            ));
        }
        Ok(Self { horizon, values })
    }

    /// A profile of all zeros.
    pub fn zeros(horizon: Horizon) -> Self {
        Self {
            horizon,
            values: vec![0.0; horizon.hours()],
        }
    }

    pub fn horizon(&self) -> Horizon {
        self.horizon
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Largest hourly value.
    pub fn peak(&self) -> f32 {
        self.values.iter().copied().fold(0.0, f32::max)
    }

    /// Sum over the whole horizon. With 1-hour steps a kW series sums
    /// directly to kWh.
    pub fn total(&self) -> f32 {
        self.values.iter().sum()
    }

    /// Average per-day sum over the horizon.
    pub fn daily_total(&self) -> f32 {
        self.total() / self.horizon.days() as f32
    }

    /// Elementwise sum with another profile of the same horizon.
    pub(crate) fn add(&self, other: &HourlyProfile) -> HourlyProfile {
        debug_assert_eq!(self.horizon, other.horizon);
        let values = self
            .values
            .iter()
            .zip(&other.values)
            .map(|(a, b)| a + b)
            .collect();
        HourlyProfile {
            horizon: self.horizon,
            values,
        }
    }
}

/// Demand sector served by the microgrid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sector {
    Residential,
    Educational,
    Agricultural,
    Other,
}

impl Sector {
    pub fn as_str(self) -> &'static str {
        match self {
            Sector::Residential => "residential",
            Sector::Educational => "educational",
            Sector::Agricultural => "agricultural",
            Sector::Other => "other",
        }
    }
}

/// Per-sector demand profiles sharing one horizon.
///
/// Produced by [`crate::load::build_load_profile`] and immutable afterwards.
#[derive(Debug, Clone)]
pub struct LoadComponents {
    horizon: Horizon,
    sectors: Vec<(Sector, HourlyProfile)>,
}

impl LoadComponents {
    pub(crate) fn new(horizon: Horizon, sectors: Vec<(Sector, HourlyProfile)>) -> Self {
        debug_assert!(sectors.iter().all(|(_, p)| p.horizon() == horizon));
        Self { horizon, sectors }
    }

    pub fn horizon(&self) -> Horizon {
        self.horizon
    }

    /// The per-sector profiles in construction order.
    pub fn sectors(&self) -> &[(Sector, HourlyProfile)] {
        &self.sectors
    }

    /// Profile for one sector, if that sector has any units configured.
    pub fn sector(&self, sector: Sector) -> Option<&HourlyProfile> {
        self.sectors
            .iter()
            .find(|(s, _)| *s == sector)
            .map(|(_, p)| p)
    }

    /// Aggregate demand: elementwise sum across sectors.
    pub fn total_demand(&self) -> HourlyProfile {
        self.sectors
            .iter()
            .fold(HourlyProfile::zeros(self.horizon), |acc, (_, p)| acc.add(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizon_hours_and_days() {
        assert_eq!(Horizon::Daily.hours(), 24);
        assert_eq!(Horizon::Annual.hours(), 8760);
        assert_eq!(Horizon::Daily.days(), 1);
        assert_eq!(Horizon::Annual.days(), 365);
    }

    #[test]
    fn month_of_day_boundaries() {
        let h = Horizon::Annual;
        assert_eq!(h.month_of_day(0), 0);
        assert_eq!(h.month_of_day(30), 0);
        assert_eq!(h.month_of_day(31), 1);
        assert_eq!(h.month_of_day(58), 1);
        assert_eq!(h.month_of_day(59), 2);
        assert_eq!(h.month_of_day(364), 11);
        // Daily horizon pins everything to month 0
        assert_eq!(Horizon::Daily.month_of_day(200), 0);
    }

    #[test]
    fn profile_rejects_wrong_length() {
        let err = HourlyProfile::new(Horizon::Daily, vec![1.0; 23]);
        assert!(err.is_err());
    }

    #[test]
    fn profile_rejects_negative_value() {
        let mut values = vec![1.0; 24];
        values[5] = -0.1;
        let err = HourlyProfile::new(Horizon::Daily, values);
        assert!(err.is_err());
    }

    #[test]
    fn profile_peak_and_totals() {
        let mut values = vec![1.0; 24];
        values[12] = 4.0;
        let p = HourlyProfile::new(Horizon::Daily, values).unwrap();
        assert_eq!(p.peak(), 4.0);
        assert_eq!(p.total(), 27.0);
        assert_eq!(p.daily_total(), 27.0);
    }

    #[test]
    fn load_components_total_is_elementwise_sum() {
        let a = HourlyProfile::new(Horizon::Daily, vec![1.0; 24]).unwrap();
        let b = HourlyProfile::new(Horizon::Daily, vec![2.0; 24]).unwrap();
        let lc = LoadComponents::new(
            Horizon::Daily,
            vec![(Sector::Residential, a), (Sector::Educational, b)],
        );
        let total = lc.total_demand();
        assert!(total.values().iter().all(|&v| (v - 3.0).abs() < 1e-6));
    }

    #[test]
    fn sector_lookup() {
        let a = HourlyProfile::new(Horizon::Daily, vec![1.0; 24]).unwrap();
        let lc = LoadComponents::new(Horizon::Daily, vec![(Sector::Residential, a)]);
        assert!(lc.sector(Sector::Residential).is_some());
        assert!(lc.sector(Sector::Agricultural).is_none());
    }
}
