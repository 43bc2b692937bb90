//! Project loading from TOML or JSON, built-in presets and structural validation.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::calc::ev::MAX_CHARGERS;
use crate::calc::battery::MIN_BACKUP_DAYS;
use crate::catalog::{find_charger, is_standard_breaker, is_standard_main_breaker};
use crate::error::{CalcError, Result};
use crate::model::ids::IdSource;
use crate::model::load::{LoadCategory, Poles};
use crate::model::panel::TandemPositions;
use crate::model::project::{BatteryScenario, EvChargerSelection, ProjectSnapshot};
use crate::questionnaire::{Fuel, Heating, HomeProfile};

/// Problem found by [`ProjectSnapshot::validate`], with a dotted field path.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"loads[3].breaker.amps"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

/// Available preset names.
pub const PRESETS: &[&str] = &["baseline", "gas_home", "all_electric", "ev_ready"];

const PRESET_SQFT: f64 = 2000.0;

/// Baseline loads only.
pub fn baseline(ids: &mut impl IdSource) -> ProjectSnapshot {
    HomeProfile::default().into_project("Baseline", ids)
}

/// Gas heat, water, range and dryer with central air.
pub fn gas_home(ids: &mut impl IdSource) -> ProjectSnapshot {
    HomeProfile {
        square_footage: Some(PRESET_SQFT),
        heating: Heating::GasFurnace,
        central_ac: true,
        water_heater: Fuel::Gas,
        range: Fuel::Gas,
        dryer: Fuel::Gas,
        washer: true,
        dishwasher: true,
        disposal: true,
        microwave: true,
        refrigerators: 1,
        ..HomeProfile::default()
    }
    .into_project("Gas home", ids)
}

/// Heat pump with electric water heater, range and dryer. The partial-home
/// scenario backs up the kitchen essentials and the heat pump.
pub fn all_electric(ids: &mut impl IdSource) -> ProjectSnapshot {
    let mut project = HomeProfile {
        square_footage: Some(PRESET_SQFT),
        heating: Heating::HeatPump,
        central_ac: true,
        water_heater: Fuel::Electric,
        range: Fuel::Electric,
        dryer: Fuel::Electric,
        washer: true,
        dishwasher: true,
        disposal: true,
        microwave: true,
        refrigerators: 1,
        ..HomeProfile::default()
    }
    .into_project("All-electric home", ids);

    let critical = [
        LoadCategory::Refrigerator,
        LoadCategory::Microwave,
        LoadCategory::HeatPump,
        LoadCategory::AirHandler,
    ];
    let include: Vec<_> = project
        .loads
        .iter()
        .filter(|l| critical.contains(&l.category))
        .map(|l| l.id)
        .collect();
    project.battery.partial_home = Some(BatteryScenario {
        include_load_ids: Some(include),
        ..BatteryScenario::default()
    });
    project
}

/// All-electric with a planned 48 A charger included in whole-home backup.
pub fn ev_ready(ids: &mut impl IdSource) -> ProjectSnapshot {
    let mut project = all_electric(ids);
    project.metadata.name = "EV-ready home".to_string();
    project.ev.charger = Some(EvChargerSelection::Catalog {
        id: "tesla-wall-connector-48a".to_string(),
    });
    project.battery.whole_home.include_proposed_ev = true;
    project
}

impl ProjectSnapshot {
    /// Builds a project from a named preset.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::UnknownPreset`] if the name is unknown.
    pub fn from_preset(name: &str, ids: &mut impl IdSource) -> Result<Self> {
        let project = match name {
            "baseline" => baseline(ids),
            "gas_home" => gas_home(ids),
            "all_electric" => all_electric(ids),
            "ev_ready" => ev_ready(ids),
            _ => {
                return Err(CalcError::UnknownPreset {
                    name: name.to_string(),
                    available: PRESETS.join(", "),
                });
            }
        };
        debug!(preset = name, loads = project.loads.len(), "preset loaded");
        Ok(project)
    }

    /// Parses a project from a TOML or JSON file, chosen by extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, has another extension,
    /// or does not parse.
    pub fn from_file(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let content = fs::read_to_string(path).map_err(|source| CalcError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let project = match ext.as_deref() {
            Some("toml") => Self::from_toml_str(&content)?,
            Some("json") => Self::from_json_str(&content)?,
            _ => return Err(CalcError::UnsupportedFormat(path.to_path_buf())),
        };
        info!(path = %path.display(), loads = project.loads.len(), "project loaded");
        Ok(project)
    }

    /// Parses a project from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Parses a project from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid or contains unknown fields.
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Serializes the project as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if a value has no TOML representation.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if the project is valid. Slot inconsistencies
    /// are not errors here; they are reported as panel warnings.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let s = &self.service;
        if !is_standard_main_breaker(s.main_breaker_amps) {
            errors.push(ConfigError::new(
                "service.mainBreakerAmps",
                format!("{} is not a standard main breaker size", s.main_breaker_amps),
            ));
        }
        if !is_standard_main_breaker(s.bus_rating_amps) {
            errors.push(ConfigError::new(
                "service.busRatingAmps",
                format!("{} is not a standard bus rating", s.bus_rating_amps),
            ));
        }
        if s.bus_rating_amps < s.main_breaker_amps {
            errors.push(ConfigError::new(
                "service.busRatingAmps",
                "must be >= service.mainBreakerAmps",
            ));
        }

        let p = &self.panel;
        if p.total_slots == 0 {
            errors.push(ConfigError::new("panel.totalSlots", "must be > 0"));
        }
        if p.tandem_policy.allowed_positions == TandemPositions::Custom
            && p.tandem_policy.custom_max_tandem_slots.unwrap_or(0) > p.total_slots
        {
            errors.push(ConfigError::new(
                "panel.tandemPolicy.customMaxTandemSlots",
                "must be <= panel.totalSlots",
            ));
        }

        let mut ids = HashSet::new();
        for (i, load) in self.loads.iter().enumerate() {
            let field = |name: &str| format!("loads[{i}].{name}");
            if !ids.insert(load.id) {
                errors.push(ConfigError::new(field("id"), format!("duplicate id {}", load.id)));
            }
            if !is_standard_breaker(load.breaker.amps) {
                errors.push(ConfigError::new(
                    field("breaker.amps"),
                    format!("{} is not a standard breaker size", load.breaker.amps),
                ));
            }
            if load.tandem_circuit_b.is_some()
                && !(load.is_tandem() && load.breaker.poles == Poles::Single)
            {
                errors.push(ConfigError::new(
                    field("tandemCircuitB"),
                    "only allowed on a single-pole tandem breaker",
                ));
            }
            if load.is_tandem() && load.breaker.poles == Poles::Double {
                errors.push(ConfigError::new(
                    field("breaker.type"),
                    "a two-pole breaker cannot be tandem",
                ));
            }
            let watts = load.usage.assumed_watts;
            if !watts.is_finite() || watts < 0.0 {
                errors.push(ConfigError::new(field("usage.assumedWatts"), "must be >= 0"));
            }
            if !(0.0..=24.0).contains(&load.usage.hours_per_day) {
                errors.push(ConfigError::new(
                    field("usage.hoursPerDay"),
                    "must be in [0, 24]",
                ));
            }
            if load.motor.lra.is_some_and(|lra| lra < 0.0) {
                errors.push(ConfigError::new(field("motor.lra"), "must be >= 0"));
            }
        }

        let ev = &self.ev;
        if !(1..=MAX_CHARGERS).contains(&ev.charger_count) {
            errors.push(ConfigError::new(
                "ev.chargerCount",
                format!("must be in [1, {MAX_CHARGERS}]"),
            ));
        }
        match &ev.charger {
            Some(EvChargerSelection::Catalog { id }) if find_charger(id).is_none() => {
                errors.push(ConfigError::new(
                    "ev.charger.id",
                    format!("unknown charger \"{id}\""),
                ));
            }
            Some(EvChargerSelection::Custom { continuous_amps }) if *continuous_amps <= 0.0 => {
                errors.push(ConfigError::new("ev.charger.continuousAmps", "must be > 0"));
            }
            _ => {}
        }

        self.validate_scenario("battery.wholeHome", &self.battery.whole_home, &ids, &mut errors);
        if let Some(partial) = &self.battery.partial_home {
            self.validate_scenario("battery.partialHome", partial, &ids, &mut errors);
        }

        errors
    }

    fn validate_scenario(
        &self,
        prefix: &str,
        scenario: &BatteryScenario,
        known: &HashSet<crate::model::ids::LoadId>,
        errors: &mut Vec<ConfigError>,
    ) {
        if scenario.backup_days < MIN_BACKUP_DAYS {
            errors.push(ConfigError::new(
                format!("{prefix}.backupDays"),
                format!("must be >= {MIN_BACKUP_DAYS}"),
            ));
        }
        if !(0.0..=100.0).contains(&scenario.solar_offset_percent) {
            errors.push(ConfigError::new(
                format!("{prefix}.solarOffsetPercent"),
                "must be in [0, 100]",
            ));
        }
        for id in scenario.include_load_ids.iter().flatten() {
            if !known.contains(id) {
                errors.push(ConfigError::new(
                    format!("{prefix}.includeLoadIds"),
                    format!("unknown load id {id}"),
                ));
            }
        }
        for (id, hours) in scenario.partial_selections.iter().flatten() {
            if !(0.0..=24.0).contains(hours) {
                errors.push(ConfigError::new(
                    format!("{prefix}.partialSelections.{id}"),
                    "must be in [0, 24]",
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ids::SequentialIds;
    use crate::model::load::{BreakerType, Load};

    fn preset(name: &str) -> ProjectSnapshot {
        ProjectSnapshot::from_preset(name, &mut SequentialIds::default()).unwrap_or_default()
    }

    #[test]
    fn all_presets_are_valid() {
        for name in PRESETS {
            let cfg = ProjectSnapshot::from_preset(name, &mut SequentialIds::default());
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn from_preset_unknown() {
        let err = ProjectSnapshot::from_preset("nonexistent", &mut SequentialIds::default());
        assert!(matches!(err, Err(CalcError::UnknownPreset { .. })));
        let msg = err.err().map(|e| e.to_string()).unwrap_or_default();
        assert!(msg.contains("gas_home"));
    }

    #[test]
    fn all_electric_has_partial_scenario() {
        let p = preset("all_electric");
        let ids = p
            .battery
            .partial_home
            .as_ref()
            .and_then(|s| s.include_load_ids.clone())
            .unwrap_or_default();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn ev_ready_selects_charger() {
        let p = preset("ev_ready");
        assert!(p.ev.charger.is_some());
        assert!(p.battery.whole_home.include_proposed_ev);
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[metadata]
name = "Cottage"
squareFootage = 900.0

[service]
mainBreakerAmps = 100
busRatingAmps = 125
"#;
        let cfg = ProjectSnapshot::from_toml_str(toml).ok();
        assert_eq!(cfg.as_ref().map(|c| c.service.main_breaker_amps), Some(100));
        assert_eq!(cfg.as_ref().map(|c| c.panel.total_slots), Some(40));
        assert_eq!(cfg.as_ref().and_then(|c| c.metadata.square_footage), Some(900.0));
        assert_eq!(cfg.as_ref().map(|c| c.battery.whole_home.backup_days), Some(1.0));
    }

    #[test]
    fn unknown_top_level_field_rejected() {
        let toml = r#"
[simulation]
days = 2
"#;
        assert!(ProjectSnapshot::from_toml_str(toml).is_err());
    }

    #[test]
    fn json_loads_with_bookkeeping_fields() {
        let json = r#"{
            "service": {"serviceVoltage": 208, "mainBreakerAmps": 200, "busRatingAmps": 200},
            "loads": [{
                "id": "00000000-0000-0000-0000-000000000007",
                "category": "sauna_heater",
                "description": "Sauna",
                "breaker": {"poles": 2, "amps": 40, "type": "Standard"},
                "usage": {"assumedWatts": 6000, "hoursPerDay": 1},
                "_wattsManuallySet": true
            }]
        }"#;
        let cfg = ProjectSnapshot::from_json_str(json);
        assert!(cfg.is_ok(), "{:?}", cfg.err());
        let cfg = cfg.unwrap_or_default();
        assert_eq!(cfg.loads[0].category, LoadCategory::Other);
        assert!(cfg.loads[0].watts_manually_set);
        assert!(cfg.loads[0].usage.include_in_service_calc);
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn validation_catches_bad_breaker_and_hours() {
        let mut p = preset("baseline");
        p.loads[0].breaker.amps = 17;
        p.loads[1].usage.hours_per_day = 30.0;
        let errors = p.validate();
        assert!(errors.iter().any(|e| e.field == "loads[0].breaker.amps"));
        assert!(errors.iter().any(|e| e.field == "loads[1].usage.hoursPerDay"));
    }

    #[test]
    fn validation_catches_two_pole_tandem() {
        let mut p = preset("baseline");
        let mut ids = SequentialIds::starting_at(100);
        let mut load = Load::from_category(LoadCategory::Dryer, &mut ids);
        load.breaker.breaker_type = BreakerType::Tandem;
        p.add_load(load);
        assert!(p.validate().iter().any(|e| e.field == "loads[4].breaker.type"));
    }

    #[test]
    fn validation_catches_duplicate_ids() {
        let mut p = preset("baseline");
        let dup = p.loads[0].clone();
        p.add_load(dup);
        assert!(p.validate().iter().any(|e| e.field == "loads[4].id"));
    }

    #[test]
    fn validation_catches_service_and_ev() {
        let mut p = preset("baseline");
        p.service.main_breaker_amps = 210;
        p.ev.charger_count = 5;
        p.ev.charger = Some(EvChargerSelection::Catalog { id: "bogus".into() });
        let errors = p.validate();
        assert!(errors.iter().any(|e| e.field == "service.mainBreakerAmps"));
        assert!(errors.iter().any(|e| e.field == "ev.chargerCount"));
        assert!(errors.iter().any(|e| e.field == "ev.charger.id"));
    }

    #[test]
    fn validation_catches_battery_scenario() {
        let mut p = preset("baseline");
        p.battery.whole_home.backup_days = 0.1;
        p.battery.whole_home.solar_offset_percent = 120.0;
        let stray = SequentialIds::starting_at(999).next_id();
        p.battery.whole_home.include_load_ids = Some(vec![stray]);
        let errors = p.validate();
        assert!(errors.iter().any(|e| e.field == "battery.wholeHome.backupDays"));
        assert!(errors.iter().any(|e| e.field == "battery.wholeHome.solarOffsetPercent"));
        assert!(errors.iter().any(|e| e.field == "battery.wholeHome.includeLoadIds"));
    }

    #[test]
    fn toml_round_trip_preserves_loads() {
        let p = preset("gas_home");
        let text = p.to_toml_string().unwrap_or_default();
        let back = ProjectSnapshot::from_toml_str(&text).ok();
        assert_eq!(back.as_ref(), Some(&p));
    }
}
