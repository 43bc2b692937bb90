//! Battery product specifications and the configurations sized from them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ratings of one battery product with its own inverter.
#[derive(Debug, Clone, PartialEq)]
pub struct BatterySpec {
    pub name: &'static str,
    /// Usable energy per unit (kWh).
    pub usable_kwh: f64,
    /// Continuous output per unit (kW).
    pub continuous_kw: f64,
    /// Locked rotor amps one unit can start, when the product is rated for it.
    pub motor_start_lra: Option<f64>,
    /// Largest number of units one system supports.
    pub max_units: u32,
}

/// Energy-only add-on with no inverter, attached to a leader unit.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpansionSpec {
    pub name: &'static str,
    pub usable_kwh: f64,
    pub max_per_leader: u32,
}

pub const ENPHASE_IQ_5P: BatterySpec = BatterySpec {
    name: "Enphase IQ Battery 5P",
    usable_kwh: 5.0,
    continuous_kw: 3.84,
    motor_start_lra: Some(28.0),
    max_units: 16,
};

pub const ENPHASE_IQ_10C: BatterySpec = BatterySpec {
    name: "Enphase IQ Battery 10C",
    usable_kwh: 10.0,
    continuous_kw: 7.08,
    motor_start_lra: Some(58.0),
    max_units: 8,
};

pub const TESLA_POWERWALL_3: BatterySpec = BatterySpec {
    name: "Tesla Powerwall 3",
    usable_kwh: 13.5,
    continuous_kw: 11.5,
    motor_start_lra: Some(185.0),
    max_units: 4,
};

pub const TESLA_POWERWALL_3_EXPANSION: ExpansionSpec = ExpansionSpec {
    name: "Tesla Powerwall 3 Expansion",
    usable_kwh: 13.5,
    max_per_leader: 3,
};

/// The battery configurations every sizing run produces a result for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatteryConfiguration {
    /// Enphase IQ 5P units only.
    Enphase5P,
    /// Enphase IQ 10C units only.
    Enphase10C,
    /// 10C units for power and motor start, topped up with 5P units for energy.
    EnphaseMixed,
    /// Powerwall 3 units only.
    TeslaPw3,
    /// Powerwall 3 leaders for power, expansion packs for energy.
    TeslaPw3Expansion,
}

impl BatteryConfiguration {
    pub const ALL: [BatteryConfiguration; 5] = [
        BatteryConfiguration::Enphase5P,
        BatteryConfiguration::Enphase10C,
        BatteryConfiguration::EnphaseMixed,
        BatteryConfiguration::TeslaPw3,
        BatteryConfiguration::TeslaPw3Expansion,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BatteryConfiguration::Enphase5P => "Enphase IQ 5P",
            BatteryConfiguration::Enphase10C => "Enphase IQ 10C",
            BatteryConfiguration::EnphaseMixed => "Enphase 10C + 5P",
            BatteryConfiguration::TeslaPw3 => "Tesla Powerwall 3",
            BatteryConfiguration::TeslaPw3Expansion => "Tesla Powerwall 3 + Expansion",
        }
    }
}

impl fmt::Display for BatteryConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
