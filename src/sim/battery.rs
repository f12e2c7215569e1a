//! Battery energy storage model used by the energy-balance simulator.

/// A battery tracked in absolute energy terms (kWh of state of charge).
///
/// Charge and discharge go through separate efficiencies; losses are taken
/// on the way in when charging and on the way out when discharging.
#[derive(Debug, Clone)]
pub struct Battery {
    /// Usable capacity in kWh.
    pub capacity_kwh: f32,

    /// Charging efficiency (0..1.0].
    pub eta_charge: f32,

    /// Discharging efficiency (0..1.0].
    pub eta_discharge: f32,

    /// Current state of charge in kWh.
    soc_kwh: f32,
}

impl Battery {
    /// Creates a battery at full charge.
    ///
    /// # Panics
    ///
    /// Panics if capacity is negative or an efficiency is outside (0, 1].
    pub fn full(capacity_kwh: f32, eta_charge: f32, eta_discharge: f32) -> Self {
        assert!(capacity_kwh >= 0.0);
        assert!(eta_charge > 0.0 && eta_charge <= 1.0);
        assert!(eta_discharge > 0.0 && eta_discharge <= 1.0);
        Self {
            capacity_kwh,
            eta_charge,
            eta_discharge,
            soc_kwh: capacity_kwh,
        }
    }

    /// Current state of charge in kWh.
    pub fn soc_kwh(&self) -> f32 {
        self.soc_kwh
    }

    /// Absorbs surplus bus energy (kWh), storing `surplus × eta_charge` up
    /// to the remaining headroom. Returns the energy actually stored;
    /// anything beyond headroom is spilled by the caller.
    pub fn charge(&mut self, surplus_kwh: f32) -> f32 {
        debug_assert!(surplus_kwh >= 0.0);
        let stored = (surplus_kwh * self.eta_charge).min(self.capacity_kwh - self.soc_kwh);
        self.soc_kwh = (self.soc_kwh + stored).min(self.capacity_kwh);
        stored
    }

    /// Covers a bus deficit (kWh), drawing `delivered / eta_discharge` from
    /// the stored energy. Returns the energy actually delivered to the bus,
    /// limited by the state of charge.
    pub fn discharge(&mut self, deficit_kwh: f32) -> f32 {
        debug_assert!(deficit_kwh >= 0.0);
        let drawn = (deficit_kwh / self.eta_discharge).min(self.soc_kwh);
        self.soc_kwh = (self.soc_kwh - drawn).max(0.0);
        drawn * self.eta_discharge
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_battery_starts_full() {
        let battery = Battery::full(10.0, 0.95, 0.95);
        assert_eq!(battery.soc_kwh(), 10.0);
    }

    #[test]
    #[should_panic]
    fn invalid_charge_efficiency_panics() {
        Battery::full(10.0, 0.0, 0.95);
    }

    #[test]
    fn charge_applies_efficiency() {
        let mut battery = Battery::full(10.0, 0.9, 0.9);
        battery.soc_kwh = 0.0;
        let stored = battery.charge(2.0);
        // 2 kWh from the bus stores 1.8 kWh
        assert!((stored - 1.8).abs() < 1e-6);
        assert!((battery.soc_kwh() - 1.8).abs() < 1e-6);
    }

    #[test]
    fn charge_clamps_at_capacity() {
        let mut battery = Battery::full(10.0, 1.0, 1.0);
        battery.soc_kwh = 9.5;
        let stored = battery.charge(2.0);
        assert!((stored - 0.5).abs() < 1e-6);
        assert_eq!(battery.soc_kwh(), 10.0);
    }

    #[test]
    fn discharge_applies_efficiency() {
        let mut battery = Battery::full(10.0, 0.9, 0.8);
        let delivered = battery.discharge(4.0);
        // 4 kWh delivered draws 5 kWh from storage
        assert!((delivered - 4.0).abs() < 1e-6);
        assert!((battery.soc_kwh() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn discharge_limited_by_stored_energy() {
        let mut battery = Battery::full(2.0, 1.0, 0.9);
        let delivered = battery.discharge(10.0);
        // only 2 kWh stored, 1.8 kWh deliverable
        assert!((delivered - 1.8).abs() < 1e-6);
        assert!(battery.soc_kwh() < 1e-6);
    }

    #[test]
    fn full_cycle_round_trip_loss() {
        let mut battery = Battery::full(10.0, 0.95, 0.95);
        battery.soc_kwh = 0.0;
        battery.charge(100.0); // fills to capacity
        assert_eq!(battery.soc_kwh(), 10.0);
        let delivered = battery.discharge(100.0);
        assert!((delivered - 9.5).abs() < 1e-5);
    }
}
