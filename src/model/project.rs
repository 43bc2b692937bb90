//! The project snapshot: the single input to every calculation and the unit
//! of save, load, import and export.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ids::LoadId;
use super::load::Load;
use super::panel::{Panel, Service};

/// Complete state of one planning project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ProjectSnapshot {
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub service: Service,
    #[serde(default)]
    pub panel: Panel,
    #[serde(default)]
    pub loads: Vec<Load>,
    #[serde(default)]
    pub ev: EvPlan,
    #[serde(default)]
    pub battery: BatteryPlan,
}

/// Descriptive project fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Metadata {
    pub name: String,
    pub address: String,
    pub notes: String,
    /// Conditioned floor area. When positive it drives general lighting VA.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub square_footage: Option<f64>,
}

/// Charger being considered for addition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EvChargerSelection {
    /// A charger from the catalog, referenced by id.
    Catalog { id: String },
    /// A charger described only by its continuous current draw.
    Custom {
        #[serde(rename = "continuousAmps")]
        continuous_amps: f64,
    },
}

/// Planned EV charger addition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EvPlan {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charger: Option<EvChargerSelection>,
    /// Number of chargers, 1–4.
    pub charger_count: u32,
}

impl Default for EvPlan {
    fn default() -> Self {
        Self {
            charger: None,
            charger_count: 1,
        }
    }
}

/// Inputs of one battery backup sizing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BatteryScenario {
    /// Days of autonomy. Fractional values allowed, minimum 0.25.
    pub backup_days: f64,
    /// Share of daily energy covered by solar, 0–100.
    pub solar_offset_percent: f64,
    /// When set, exactly these loads are backed up.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_load_ids: Option<Vec<LoadId>>,
    /// Per-load daily hour overrides.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partial_selections: Option<BTreeMap<LoadId, f64>>,
    /// Append the planned EV chargers as backed-up loads.
    pub include_proposed_ev: bool,
}

impl Default for BatteryScenario {
    fn default() -> Self {
        Self {
            backup_days: 1.0,
            solar_offset_percent: 0.0,
            include_load_ids: None,
            partial_selections: None,
            include_proposed_ev: false,
        }
    }
}

/// Whole-home and optional partial-home (critical loads) backup scenarios.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BatteryPlan {
    pub whole_home: BatteryScenario,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partial_home: Option<BatteryScenario>,
}

impl ProjectSnapshot {
    /// Appends a load.
    pub fn add_load(&mut self, load: Load) {
        self.loads.push(load);
    }

    /// Removes the load with `id`.
    ///
    /// Returns `false` when no such load exists or it is an NEC baseline load.
    pub fn remove_load(&mut self, id: LoadId) -> bool {
        match self.loads.iter().position(|l| l.id == id) {
            Some(idx) if self.loads[idx].is_deletable() => {
                self.loads.remove(idx);
                true
            }
            _ => false,
        }
    }
}
