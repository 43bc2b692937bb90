//! Guided questionnaire: bulk load generation from a short home profile.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calc::baseline::baseline_loads;
use crate::calc::slots;
use crate::model::ids::IdSource;
use crate::model::load::{Load, LoadCategory};
use crate::model::panel::Panel;
use crate::model::project::{Metadata, ProjectSnapshot};

/// Primary heating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Heating {
    #[default]
    None,
    /// Gas furnace; only its blower is electrical.
    GasFurnace,
    ElectricFurnace,
    HeatPump,
    ElectricBoiler,
}

/// Energy source of a fuel-switchable appliance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fuel {
    #[default]
    None,
    Gas,
    Electric,
}

/// Answers to the guided questionnaire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HomeProfile {
    pub square_footage: Option<f64>,
    pub heating: Heating,
    pub central_ac: bool,
    pub water_heater: Fuel,
    pub range: Fuel,
    pub dryer: Fuel,
    pub washer: bool,
    pub dishwasher: bool,
    pub disposal: bool,
    pub microwave: bool,
    pub refrigerators: u32,
    pub freezer: bool,
    pub well_pump: bool,
    pub sump_pump: bool,
    pub pool_pump: bool,
    pub hot_tub: bool,
    pub existing_ev_charger: bool,
}

/// Baseline loads plus one load per answered appliance, using catalog defaults.
pub fn generate_loads(profile: &HomeProfile, ids: &mut impl IdSource) -> Vec<Load> {
    let mut loads = baseline_loads(ids);
    let mut add = |category: LoadCategory| loads.push(Load::from_category(category, ids));

    match profile.heating {
        Heating::None => {}
        Heating::GasFurnace => add(LoadCategory::AirHandler),
        Heating::ElectricFurnace => add(LoadCategory::Furnace),
        Heating::HeatPump => {
            add(LoadCategory::HeatPump);
            add(LoadCategory::AirHandler);
        }
        Heating::ElectricBoiler => add(LoadCategory::Boiler),
    }
    // A heat pump already cools.
    if profile.central_ac && profile.heating != Heating::HeatPump {
        add(LoadCategory::AcCondenser);
        if !matches!(profile.heating, Heating::GasFurnace) {
            add(LoadCategory::AirHandler);
        }
    }

    if profile.water_heater == Fuel::Electric {
        add(LoadCategory::ElectricWaterHeater);
    }
    if profile.range == Fuel::Electric {
        add(LoadCategory::RangeOven);
    }
    if profile.dryer == Fuel::Electric {
        add(LoadCategory::Dryer);
    }

    let flags = [
        (profile.washer, LoadCategory::Washer),
        (profile.dishwasher, LoadCategory::Dishwasher),
        (profile.disposal, LoadCategory::Disposal),
        (profile.microwave, LoadCategory::Microwave),
        (profile.freezer, LoadCategory::Freezer),
        (profile.well_pump, LoadCategory::WellPump),
        (profile.sump_pump, LoadCategory::SumpPump),
        (profile.pool_pump, LoadCategory::PoolPump),
        (profile.hot_tub, LoadCategory::HotTub),
        (profile.existing_ev_charger, LoadCategory::EvCharger),
    ];
    for (present, category) in flags {
        if present {
            add(category);
        }
    }
    for _ in 0..profile.refrigerators {
        add(LoadCategory::Refrigerator);
    }

    debug!(count = loads.len(), "questionnaire generated loads");
    loads
}

impl HomeProfile {
    /// Full project for this profile on a 200 A / 240 V service and a
    /// 40-slot panel whose declared usage matches the generated loads.
    pub fn into_project(self, name: impl Into<String>, ids: &mut impl IdSource) -> ProjectSnapshot {
        let loads = generate_loads(&self, ids);
        let panel = Panel {
            used_slots: slots::modeled_slots_consumed(&loads),
            ..Panel::default()
        };
        ProjectSnapshot {
            metadata: Metadata {
                name: name.into(),
                square_footage: self.square_footage,
                ..Metadata::default()
            },
            panel,
            loads,
            ..ProjectSnapshot::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ids::SequentialIds;

    fn categories(loads: &[Load]) -> Vec<LoadCategory> {
        loads.iter().map(|l| l.category).collect()
    }

    #[test]
    fn empty_profile_yields_baseline_only() {
        let loads = generate_loads(&HomeProfile::default(), &mut SequentialIds::default());
        assert_eq!(loads.len(), 4);
        assert!(loads.iter().all(|l| l.is_nec_baseline));
    }

    #[test]
    fn heat_pump_covers_cooling() {
        let profile = HomeProfile {
            heating: Heating::HeatPump,
            central_ac: true,
            ..HomeProfile::default()
        };
        let cats = categories(&generate_loads(&profile, &mut SequentialIds::default()));
        assert!(cats.contains(&LoadCategory::HeatPump));
        assert!(!cats.contains(&LoadCategory::AcCondenser));
        assert_eq!(cats.iter().filter(|c| **c == LoadCategory::AirHandler).count(), 1);
    }

    #[test]
    fn gas_appliances_add_nothing() {
        let profile = HomeProfile {
            water_heater: Fuel::Gas,
            range: Fuel::Gas,
            dryer: Fuel::Gas,
            ..HomeProfile::default()
        };
        assert_eq!(generate_loads(&profile, &mut SequentialIds::default()).len(), 4);
    }

    #[test]
    fn refrigerator_count_respected() {
        let profile = HomeProfile {
            refrigerators: 2,
            ..HomeProfile::default()
        };
        let cats = categories(&generate_loads(&profile, &mut SequentialIds::default()));
        assert_eq!(cats.iter().filter(|c| **c == LoadCategory::Refrigerator).count(), 2);
    }

    #[test]
    fn project_panel_matches_loads() {
        let profile = HomeProfile {
            square_footage: Some(1800.0),
            range: Fuel::Electric,
            ..HomeProfile::default()
        };
        let p = profile.into_project("Test", &mut SequentialIds::default());
        assert_eq!(p.metadata.square_footage, Some(1800.0));
        assert_eq!(p.service.main_breaker_amps, 200);
        assert_eq!(p.panel.total_slots, 40);
        // four single-pole baseline loads plus a two-pole range
        assert_eq!(p.panel.used_slots, 6);
    }
}
