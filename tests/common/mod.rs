//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use load_calc::model::ids::SequentialIds;
use load_calc::model::load::{Load, LoadCategory};
use load_calc::model::panel::{Panel, Service};
use load_calc::model::project::{Metadata, ProjectSnapshot};

/// Deterministic id source for fixtures.
pub fn ids() -> SequentialIds {
    SequentialIds::starting_at(1)
}

/// A load of `category` with explicit watts and daily hours.
pub fn load(ids: &mut SequentialIds, category: LoadCategory, watts: f64, hours: f64) -> Load {
    Load::from_category(category, ids)
        .with_watts(watts)
        .with_hours(hours)
}

/// Default service: 240 V, 200 A main, 200 A bus.
pub fn default_service() -> Service {
    Service::default()
}

/// Project on the default service with `loads` and an optional floor area.
pub fn project(loads: Vec<Load>, square_footage: Option<f64>) -> ProjectSnapshot {
    ProjectSnapshot {
        metadata: Metadata {
            name: "Fixture".to_string(),
            square_footage,
            ..Metadata::default()
        },
        loads,
        ..ProjectSnapshot::default()
    }
}

/// Panel with the given slot counts and no tandems.
pub fn panel(total: u32, used: u32) -> Panel {
    Panel {
        total_slots: total,
        used_slots: used,
        ..Panel::default()
    }
}

/// Path of a bundled project file under `scenarios/`.
pub fn scenario(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("scenarios")
        .join(name)
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}
