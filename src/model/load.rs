//! One electrical circuit entry and its per-load derived quantities.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ids::{IdSource, LoadId};
use super::panel::Service;
use crate::catalog::{self, CategoryDefaults};

/// Voltage of a single-pole branch circuit.
pub const SINGLE_POLE_VOLTS: f64 = 120.0;

/// Appliance category of a load.
///
/// Drives the catalog defaults a new load starts from and the demand bucket
/// the NEC estimator places it in. Unknown category strings in a snapshot
/// deserialize to [`LoadCategory::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadCategory {
    GeneralLighting,
    SmallAppliance,
    Laundry,
    Refrigerator,
    Freezer,
    Dishwasher,
    Disposal,
    Microwave,
    Washer,
    ElectricWaterHeater,
    Dehumidifier,
    RangeOven,
    Cooktop,
    Dryer,
    AcCondenser,
    HeatPump,
    AirHandler,
    Furnace,
    Boiler,
    EvCharger,
    WellPump,
    PoolPump,
    HotTub,
    SumpPump,
    #[serde(other)]
    Other,
}

impl LoadCategory {
    /// Every category, in catalog order.
    pub const ALL: [LoadCategory; 25] = [
        LoadCategory::GeneralLighting,
        LoadCategory::SmallAppliance,
        LoadCategory::Laundry,
        LoadCategory::Refrigerator,
        LoadCategory::Freezer,
        LoadCategory::Dishwasher,
        LoadCategory::Disposal,
        LoadCategory::Microwave,
        LoadCategory::Washer,
        LoadCategory::ElectricWaterHeater,
        LoadCategory::Dehumidifier,
        LoadCategory::RangeOven,
        LoadCategory::Cooktop,
        LoadCategory::Dryer,
        LoadCategory::AcCondenser,
        LoadCategory::HeatPump,
        LoadCategory::AirHandler,
        LoadCategory::Furnace,
        LoadCategory::Boiler,
        LoadCategory::EvCharger,
        LoadCategory::WellPump,
        LoadCategory::PoolPump,
        LoadCategory::HotTub,
        LoadCategory::SumpPump,
        LoadCategory::Other,
    ];

    /// Catalog defaults for this category.
    pub fn defaults(self) -> &'static CategoryDefaults {
        catalog::category_defaults(self)
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        self.defaults().label
    }
}

impl fmt::Display for LoadCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Breaker pole count. Serialized as the integer `1` or `2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Poles {
    Single,
    Double,
}

impl Poles {
    /// Number of panel slots a standard breaker with this pole count occupies.
    pub fn count(self) -> u32 {
        match self {
            Poles::Single => 1,
            Poles::Double => 2,
        }
    }
}

impl TryFrom<u8> for Poles {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Poles::Single),
            2 => Ok(Poles::Double),
            other => Err(format!("breaker poles must be 1 or 2, got {other}")),
        }
    }
}

impl From<Poles> for u8 {
    fn from(poles: Poles) -> Self {
        poles.count() as u8
    }
}

/// Physical breaker style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BreakerType {
    #[default]
    Standard,
    Tandem,
}

/// Breaker protecting a load's circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breaker {
    pub poles: Poles,
    pub amps: u32,
    #[serde(rename = "type", default)]
    pub breaker_type: BreakerType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voltage_override: Option<u32>,
}

/// Second circuit sharing a tandem breaker's slot. Informational only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TandemCircuit {
    #[serde(default)]
    pub description: String,
    pub amps: u32,
    #[serde(default)]
    pub assumed_watts: f64,
}

/// How a load is used day to day and which calculations include it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    pub assumed_watts: f64,
    pub hours_per_day: f64,
    #[serde(default = "default_true")]
    pub include_in_service_calc: bool,
    #[serde(default = "default_true")]
    pub include_in_battery_calc: bool,
}

/// Motor characteristics used for battery motor-start sizing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MotorInfo {
    #[serde(default)]
    pub is_motor: bool,
    /// Locked rotor amps, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lra: Option<f64>,
}

/// Where a load's figures came from. Does not affect any calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SourceTag {
    #[default]
    Assumed,
    #[serde(rename = "User-entered")]
    UserEntered,
    Nameplate,
}

/// One circuit entry in a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Load {
    #[serde(default = "LoadId::random")]
    pub id: LoadId,
    pub category: LoadCategory,
    #[serde(default)]
    pub description: String,
    pub breaker: Breaker,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tandem_circuit_b: Option<TandemCircuit>,
    pub usage: Usage,
    #[serde(default)]
    pub motor: MotorInfo,
    #[serde(default)]
    pub source_tag: SourceTag,
    #[serde(rename = "isNECBaseline", default)]
    pub is_nec_baseline: bool,
    #[serde(rename = "_wattsManuallySet", default)]
    pub watts_manually_set: bool,
    #[serde(rename = "_necEdited", default)]
    pub nec_edited: bool,
}

fn default_true() -> bool {
    true
}

impl Load {
    /// Creates a load from the catalog defaults of `category`.
    pub fn from_category(category: LoadCategory, ids: &mut impl IdSource) -> Self {
        let d = category.defaults();
        Self {
            id: ids.next_id(),
            category,
            description: d.label.to_string(),
            breaker: Breaker {
                poles: d.poles,
                amps: d.breaker_amps,
                breaker_type: BreakerType::Standard,
                voltage_override: None,
            },
            tandem_circuit_b: None,
            usage: Usage {
                assumed_watts: d.watts,
                hours_per_day: d.hours_per_day,
                include_in_service_calc: true,
                include_in_battery_calc: true,
            },
            motor: MotorInfo {
                is_motor: d.is_motor,
                lra: d.lra,
            },
            source_tag: SourceTag::Assumed,
            is_nec_baseline: false,
            watts_manually_set: false,
            nec_edited: false,
        }
    }

    /// Replaces the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Replaces the assumed running watts and marks them as user-entered.
    pub fn with_watts(mut self, watts: f64) -> Self {
        self.usage.assumed_watts = watts.max(0.0);
        self.watts_manually_set = true;
        self.source_tag = SourceTag::UserEntered;
        self
    }

    /// Replaces the daily run hours, clamped to 0–24.
    pub fn with_hours(mut self, hours_per_day: f64) -> Self {
        self.usage.hours_per_day = hours_per_day.clamp(0.0, 24.0);
        self
    }

    /// Panel slots this load's breaker occupies: 1 for a tandem, else the pole count.
    pub fn slots_consumed(&self) -> u32 {
        match self.breaker.breaker_type {
            BreakerType::Tandem => 1,
            BreakerType::Standard => self.breaker.poles.count(),
        }
    }

    /// Whether this load sits on a tandem breaker.
    pub fn is_tandem(&self) -> bool {
        self.breaker.breaker_type == BreakerType::Tandem
    }

    /// Baseline loads always exist and cannot be deleted.
    pub fn is_deletable(&self) -> bool {
        !self.is_nec_baseline
    }

    /// Changes the pole count. Going to two poles drops any tandem arrangement.
    pub fn set_poles(&mut self, poles: Poles) {
        self.breaker.poles = poles;
        if poles == Poles::Double {
            self.breaker.breaker_type = BreakerType::Standard;
            self.tandem_circuit_b = None;
        }
    }

    /// Changes the breaker type.
    ///
    /// Returns `false` and leaves the breaker untouched when asked to make a
    /// two-pole breaker tandem.
    pub fn set_breaker_type(&mut self, breaker_type: BreakerType) -> bool {
        match breaker_type {
            BreakerType::Tandem if self.breaker.poles == Poles::Double => false,
            BreakerType::Tandem => {
                self.breaker.breaker_type = BreakerType::Tandem;
                true
            }
            BreakerType::Standard => {
                self.breaker.breaker_type = BreakerType::Standard;
                self.tandem_circuit_b = None;
                true
            }
        }
    }

    /// Attaches the second circuit of a single-pole tandem breaker.
    ///
    /// Returns `false` when the breaker is not a single-pole tandem.
    pub fn set_tandem_circuit_b(&mut self, circuit: TandemCircuit) -> bool {
        if self.is_tandem() && self.breaker.poles == Poles::Single {
            self.tandem_circuit_b = Some(circuit);
            true
        } else {
            false
        }
    }

    /// Circuit voltage: the override if set, else line-to-line for two poles
    /// and 120 V for one.
    pub fn circuit_voltage(&self, service: &Service) -> f64 {
        if let Some(v) = self.breaker.voltage_override {
            return f64::from(v);
        }
        match self.breaker.poles {
            Poles::Double => service.service_voltage.volts(),
            Poles::Single => SINGLE_POLE_VOLTS,
        }
    }

    /// Running current at the circuit voltage.
    pub fn running_amps(&self, service: &Service) -> f64 {
        let volts = self.circuit_voltage(service);
        if volts > 0.0 {
            self.usage.assumed_watts / volts
        } else {
            0.0
        }
    }

    /// Daily energy in watt-hours.
    pub fn daily_wh(&self) -> f64 {
        self.usage.assumed_watts * self.usage.hours_per_day
    }

    /// Whether the load is flagged as a motor without a locked rotor rating.
    pub fn missing_lra(&self) -> bool {
        self.motor.is_motor && self.motor.lra.is_none()
    }
}
