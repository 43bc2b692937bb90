//! Electrical service and breaker panel configuration.

use serde::{Deserialize, Serialize};

/// Nominal service voltage. Serialized as the integer `240` or `208`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum ServiceVoltage {
    #[default]
    V240,
    V208,
}

impl ServiceVoltage {
    /// Line-to-line volts.
    pub fn volts(self) -> f64 {
        f64::from(u32::from(self))
    }
}

impl TryFrom<u32> for ServiceVoltage {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            240 => Ok(ServiceVoltage::V240),
            208 => Ok(ServiceVoltage::V208),
            other => Err(format!("service voltage must be 240 or 208, got {other}")),
        }
    }
}

impl From<ServiceVoltage> for u32 {
    fn from(v: ServiceVoltage) -> Self {
        match v {
            ServiceVoltage::V240 => 240,
            ServiceVoltage::V208 => 208,
        }
    }
}

/// Utility service entrance ratings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Service {
    pub service_voltage: ServiceVoltage,
    pub main_breaker_amps: u32,
    pub bus_rating_amps: u32,
}

impl Default for Service {
    fn default() -> Self {
        Self {
            service_voltage: ServiceVoltage::V240,
            main_breaker_amps: 200,
            bus_rating_amps: 200,
        }
    }
}

/// Whether the panel's listing permits tandem breakers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TandemsAllowed {
    Allowed,
    NotAllowed,
    #[default]
    Unknown,
}

/// Which slot positions accept tandem breakers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TandemPositions {
    #[default]
    AllSlots,
    BottomHalfOnly,
    Custom,
}

/// Tandem placement rules from the panel label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TandemPolicy {
    pub allowed_positions: TandemPositions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_max_tandem_slots: Option<u32>,
}

/// Breaker panel as declared by the installer.
///
/// `used_slots` and `tandem_slots_used` are what the installer counted on
/// site. They are kept independent from the count modeled from the load list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Panel {
    pub total_slots: u32,
    pub used_slots: u32,
    pub tandem_slots_used: u32,
    pub tandems_allowed: TandemsAllowed,
    pub tandem_policy: TandemPolicy,
}

impl Default for Panel {
    fn default() -> Self {
        Self {
            total_slots: 40,
            used_slots: 0,
            tandem_slots_used: 0,
            tandems_allowed: TandemsAllowed::Unknown,
            tandem_policy: TandemPolicy::default(),
        }
    }
}
