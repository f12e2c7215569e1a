//! Shared test fixtures for integration tests.

use microgrid_sim::config::ScenarioConfig;
use microgrid_sim::load::build_load_profile;
use microgrid_sim::profile::LoadComponents;
use microgrid_sim::sim::SystemParams;
use microgrid_sim::solar::{SolarResource, build_solar_resource};

/// Baseline village scenario: 50 households, one school, daily horizon.
pub fn village_config() -> ScenarioConfig {
    ScenarioConfig::village_baseline()
}

/// Load components for a given config.
pub fn build_load(config: &ScenarioConfig) -> LoadComponents {
    build_load_profile(&config.load, config.simulation.horizon)
        .unwrap_or_else(|e| panic!("load profile should build: {e}"))
}

/// Solar resource for a given config, seeded from its simulation section.
pub fn build_solar(config: &ScenarioConfig) -> SolarResource {
    build_solar_resource(&config.solar, config.simulation.horizon, config.simulation.seed)
        .unwrap_or_else(|e| panic!("solar resource should build: {e}"))
}

/// Default derating and battery efficiencies.
pub fn default_params() -> SystemParams {
    SystemParams::default()
}
