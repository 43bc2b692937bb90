//! EV charger addition feasibility: service capacity and panel space.

use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use super::nec::{self, NecDemand, ServiceStatus};
use super::slots;
use crate::catalog::find_charger;
use crate::model::ids::IdSource;
use crate::model::load::{Load, LoadCategory, Poles};
use crate::model::panel::Service;
use crate::model::project::{EvChargerSelection, ProjectSnapshot};

/// Continuous loads are protected at 125 % of their draw.
pub const CONTINUOUS_LOAD_FACTOR: f64 = 1.25;
pub const BREAKER_STEP_AMPS: f64 = 5.0;
pub const MAX_CHARGERS: u32 = 4;
/// Each charger takes a two-pole breaker.
pub const SLOTS_PER_CHARGER: u32 = 2;

/// Breaker size for a charger drawing `continuous_amps`, rounded up to the next 5 A step.
pub fn required_breaker_amps(continuous_amps: f64) -> u32 {
    let amps = continuous_amps.max(0.0) * CONTINUOUS_LOAD_FACTOR;
    ((amps / BREAKER_STEP_AMPS).ceil() * BREAKER_STEP_AMPS) as u32
}

/// Charger being evaluated, resolved from the catalog or a custom rating.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvCharger {
    pub name: String,
    pub continuous_amps: f64,
    pub breaker_amps: u32,
}

impl EvCharger {
    pub fn custom(continuous_amps: f64) -> Self {
        let continuous_amps = continuous_amps.max(0.0);
        Self {
            name: format!("Custom {continuous_amps} A"),
            continuous_amps,
            breaker_amps: required_breaker_amps(continuous_amps),
        }
    }

    /// Resolves a selection. Unknown catalog ids yield `None`.
    pub fn from_selection(selection: &EvChargerSelection) -> Option<Self> {
        match selection {
            EvChargerSelection::Catalog { id } => find_charger(id).map(|spec| Self {
                name: spec.name.to_string(),
                continuous_amps: spec.continuous_amps,
                breaker_amps: spec.breaker_amps,
            }),
            EvChargerSelection::Custom { continuous_amps } => Some(Self::custom(*continuous_amps)),
        }
    }

    /// Running watts of one charger on `service`.
    pub fn watts(&self, service: &Service) -> f64 {
        self.continuous_amps * service.service_voltage.volts()
    }
}

/// Clamps a charger count to 1–4.
pub fn clamp_charger_count(count: u32) -> u32 {
    count.clamp(1, MAX_CHARGERS)
}

/// Synthetic two-pole EV loads, one per charger.
pub fn proposed_ev_loads(
    charger: &EvCharger,
    count: u32,
    service: &Service,
    ids: &mut impl IdSource,
) -> Vec<Load> {
    let count = clamp_charger_count(count);
    (1..=count)
        .map(|n| {
            let mut load = Load::from_category(LoadCategory::EvCharger, ids)
                .with_description(format!("Proposed EV charger {n} ({})", charger.name));
            load.set_poles(Poles::Double);
            load.breaker.amps = charger.breaker_amps;
            load.usage.assumed_watts = charger.watts(service);
            load
        })
        .collect()
}

/// Recommendation tier for an EV addition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EvRecommendation {
    ServiceUpgrade,
    Subpanel,
    RequiresTandems,
    FeasibleBorderline,
    AddAsIs,
}

impl fmt::Display for EvRecommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EvRecommendation::ServiceUpgrade => "Service upgrade recommended",
            EvRecommendation::Subpanel => "Subpanel recommended",
            EvRecommendation::RequiresTandems => "Requires tandems to free space",
            EvRecommendation::FeasibleBorderline => "Feasible but borderline capacity",
            EvRecommendation::AddAsIs => "Add as-is",
        })
    }
}

/// First matching tier wins.
pub fn recommend(
    with_ev: ServiceStatus,
    has_space: bool,
    spare_tandem_slots: u32,
) -> EvRecommendation {
    if with_ev == ServiceStatus::Undersized {
        EvRecommendation::ServiceUpgrade
    } else if !has_space && spare_tandem_slots == 0 {
        EvRecommendation::Subpanel
    } else if !has_space {
        EvRecommendation::RequiresTandems
    } else if with_ev == ServiceStatus::Borderline {
        EvRecommendation::FeasibleBorderline
    } else {
        EvRecommendation::AddAsIs
    }
}

/// Outcome of one EV feasibility evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct EvFeasibility {
    pub charger: EvCharger,
    pub charger_count: u32,
    pub total_ev_watts: f64,
    pub slots_needed: u32,
    /// Slots in use per the load list, or the declared count when the list is empty.
    pub used_slots: u32,
    pub available_slots: u32,
    pub has_space: bool,
    /// Tandem-capable slots not yet holding a tandem.
    pub spare_tandem_slots: u32,
    pub without_ev: NecDemand,
    pub with_ev: NecDemand,
    pub recommendation: EvRecommendation,
}

/// Evaluates adding `count` of `charger` to the project.
pub fn evaluate(
    snapshot: &ProjectSnapshot,
    charger: &EvCharger,
    count: u32,
    ids: &mut impl IdSource,
) -> EvFeasibility {
    let count = clamp_charger_count(count);
    let service = &snapshot.service;
    let panel = &snapshot.panel;
    let sqft = snapshot.metadata.square_footage;

    let ev_loads = proposed_ev_loads(charger, count, service, ids);
    let without_ev = nec::estimate_demand(&snapshot.loads, service, sqft);
    let mut with_loads = snapshot.loads.clone();
    with_loads.extend(ev_loads);
    let with_ev = nec::estimate_demand(&with_loads, service, sqft);

    let (used_slots, tandems_in_use) = if snapshot.loads.is_empty() {
        (panel.used_slots, panel.tandem_slots_used)
    } else {
        (
            slots::modeled_slots_consumed(&snapshot.loads),
            slots::modeled_tandem_slots(&snapshot.loads),
        )
    };
    let available_slots = panel.total_slots.saturating_sub(used_slots);
    let slots_needed = SLOTS_PER_CHARGER * count;
    let has_space = available_slots >= slots_needed;
    let spare_tandem_slots = slots::tandem_capable_slots(panel).saturating_sub(tandems_in_use);

    let recommendation = recommend(with_ev.status, has_space, spare_tandem_slots);
    debug!(
        charger = %charger.name,
        count,
        without = %without_ev.status,
        with = %with_ev.status,
        available_slots,
        slots_needed,
        spare_tandem_slots,
        %recommendation,
        "ev feasibility"
    );

    EvFeasibility {
        charger: charger.clone(),
        charger_count: count,
        total_ev_watts: charger.watts(service) * f64::from(count),
        slots_needed,
        used_slots,
        available_slots,
        has_space,
        spare_tandem_slots,
        without_ev,
        with_ev,
        recommendation,
    }
}

/// Evaluates the project's own EV plan. `None` when no charger is selected
/// or the catalog id is unknown.
pub fn evaluate_plan(snapshot: &ProjectSnapshot, ids: &mut impl IdSource) -> Option<EvFeasibility> {
    let selection = snapshot.ev.charger.as_ref()?;
    let Some(charger) = EvCharger::from_selection(selection) else {
        warn!(?selection, "unknown EV charger, skipping feasibility");
        return None;
    };
    Some(evaluate(snapshot, &charger, snapshot.ev.charger_count, ids))
}
