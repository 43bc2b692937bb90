//! Battery backup sizing across the five product configurations.
//!
//! Each configuration is sized independently with fixed greedy formulas
//! against three requirements: energy over the backup period, peak running
//! power, and the largest motor-start current. Results are best effort: a
//! configuration that cannot meet the requirement within its product limits
//! is still returned, flagged infeasible with a reason.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use super::practical::{self, LRA_ESTIMATE_MULTIPLIER};
use crate::catalog::{
    BatteryConfiguration, BatterySpec, ENPHASE_IQ_5P, ENPHASE_IQ_10C, ExpansionSpec,
    TESLA_POWERWALL_3, TESLA_POWERWALL_3_EXPANSION,
};
use crate::model::ids::LoadId;
use crate::model::load::Load;
use crate::model::panel::Service;
use crate::model::project::BatteryScenario;

/// Shortest backup period considered (days).
pub const MIN_BACKUP_DAYS: f64 = 0.25;

/// Absorbs float noise so that e.g. 10.000000001 / 5 still needs 2 units.
const CEIL_EPSILON: f64 = 1e-9;

/// Load selection and adjustments for one sizing run.
#[derive(Debug, Clone, Default)]
pub struct SizingOptions {
    /// When set, exactly these loads are sized for.
    pub include_load_ids: Option<Vec<LoadId>>,
    /// Per-load daily hour overrides.
    pub partial_selections: Option<BTreeMap<LoadId, f64>>,
    /// Share of daily energy covered by solar, 0–100. Never reduces power.
    pub solar_offset_percent: f64,
    /// Synthetic loads appended after selection.
    pub proposed_ev_loads: Vec<Load>,
}

impl SizingOptions {
    /// Options for a stored scenario, with `proposed_ev_loads` appended only
    /// when the scenario asks for them.
    pub fn from_scenario(scenario: &BatteryScenario, proposed_ev_loads: &[Load]) -> Self {
        Self {
            include_load_ids: scenario.include_load_ids.clone(),
            partial_selections: scenario.partial_selections.clone(),
            solar_offset_percent: scenario.solar_offset_percent,
            proposed_ev_loads: if scenario.include_proposed_ev {
                proposed_ev_loads.to_vec()
            } else {
                Vec::new()
            },
        }
    }
}

/// What the backed-up loads demand of a battery system.
#[derive(Debug, Clone, Serialize)]
pub struct BatteryRequirements {
    pub selected_load_count: usize,
    pub backup_days: f64,
    pub daily_kwh: f64,
    /// Energy over the backup period after solar offset (kWh).
    pub energy_kwh: f64,
    pub peak_kw: f64,
    /// Largest single motor-start current (A), estimated where LRA is missing.
    pub motor_start_lra: f64,
    pub motors_missing_lra: usize,
}

/// Requirement that set the unit count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BindingConstraint {
    Energy,
    Power,
    MotorStart,
}

impl fmt::Display for BindingConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BindingConstraint::Energy => "Energy",
            BindingConstraint::Power => "Power",
            BindingConstraint::MotorStart => "Motor Start",
        })
    }
}

/// Units each requirement would need on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SizingDrivers {
    pub for_energy: u32,
    pub for_power: u32,
    pub for_motor_start: u32,
}

/// Required unit mix of a configuration, before any product cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnitComposition {
    Single { units: u32 },
    Mixed { units_10c: u32, units_5p: u32 },
    LeaderExpansion { leaders: u32, expansions: u32 },
}

impl fmt::Display for UnitComposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitComposition::Single { units } => write!(f, "{units} unit(s)"),
            UnitComposition::Mixed {
                units_10c,
                units_5p,
            } => write!(f, "{units_10c} x 10C + {units_5p} x 5P"),
            UnitComposition::LeaderExpansion {
                leaders,
                expansions,
            } => write!(f, "{leaders} leader(s) + {expansions} expansion(s)"),
        }
    }
}

/// Sizing outcome of one configuration.
#[derive(Debug, Clone, Serialize)]
pub struct BatterySizingResult {
    pub configuration: BatteryConfiguration,
    /// Units required to meet every requirement. Not clamped to product limits.
    pub units: u32,
    pub composition: UnitComposition,
    /// Units actually installable, which the delivered totals are based on.
    pub installed_units: u32,
    pub drivers: SizingDrivers,
    pub binding: BindingConstraint,
    pub total_kwh: f64,
    pub total_kw: f64,
    pub feasible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motor_start_advisory: Option<String>,
}

/// Requirements plus one result per configuration, in [`BatteryConfiguration::ALL`] order.
#[derive(Debug, Clone, Serialize)]
pub struct BatterySizing {
    pub requirements: BatteryRequirements,
    pub results: Vec<BatterySizingResult>,
}

impl BatterySizing {
    pub fn result(&self, configuration: BatteryConfiguration) -> Option<&BatterySizingResult> {
        self.results.iter().find(|r| r.configuration == configuration)
    }
}

/// Units of `per_unit` needed to cover `required`. Zero when nothing is required,
/// `u32::MAX` when the count does not fit.
pub fn units_for(required: f64, per_unit: f64) -> u32 {
    if required <= 0.0 || per_unit <= 0.0 {
        return 0;
    }
    (required / per_unit - CEIL_EPSILON).ceil().max(0.0) as u32
}

/// Largest driver wins; ties go to energy, then power, then motor start.
pub fn binding_constraint(drivers: SizingDrivers) -> BindingConstraint {
    let SizingDrivers {
        for_energy,
        for_power,
        for_motor_start,
    } = drivers;
    if for_energy >= for_power && for_energy >= for_motor_start {
        BindingConstraint::Energy
    } else if for_power >= for_motor_start {
        BindingConstraint::Power
    } else {
        BindingConstraint::MotorStart
    }
}

/// Loads the run sizes for, with hour overrides applied. Inputs are not modified.
pub fn select_loads(loads: &[Load], options: &SizingOptions) -> Vec<Load> {
    let mut selected: Vec<Load> = match &options.include_load_ids {
        Some(ids) => loads.iter().filter(|l| ids.contains(&l.id)).cloned().collect(),
        None => loads
            .iter()
            .filter(|l| l.usage.include_in_battery_calc)
            .cloned()
            .collect(),
    };
    selected.extend(options.proposed_ev_loads.iter().cloned());
    if let Some(overrides) = &options.partial_selections {
        for load in &mut selected {
            if let Some(hours) = overrides.get(&load.id) {
                load.usage.hours_per_day = hours.clamp(0.0, 24.0);
            }
        }
    }
    selected
}

/// Derives energy, power and motor-start requirements.
pub fn requirements(
    loads: &[Load],
    service: &Service,
    backup_days: f64,
    options: &SizingOptions,
) -> BatteryRequirements {
    let selected = select_loads(loads, options);
    let totals = practical::aggregate(&selected);
    let backup_days = backup_days.max(MIN_BACKUP_DAYS);
    let offset = options.solar_offset_percent.clamp(0.0, 100.0);

    let mut energy_kwh = totals.daily_kwh() * backup_days;
    if offset > 0.0 {
        energy_kwh *= 1.0 - offset / 100.0;
    }

    BatteryRequirements {
        selected_load_count: selected.len(),
        backup_days,
        daily_kwh: totals.daily_kwh(),
        energy_kwh: energy_kwh.max(0.0),
        peak_kw: totals.total_kw(),
        motor_start_lra: practical::motor_start_requirement(&selected, service),
        motors_missing_lra: totals.motors_missing_lra,
    }
}

fn motor_advisory(req: &BatteryRequirements, rated: bool) -> Option<String> {
    (rated && req.motors_missing_lra > 0).then(|| {
        format!(
            "{} motor load(s) have no LRA; motor-start sizing uses a conservative estimate of {}x running amps",
            req.motors_missing_lra, LRA_ESTIMATE_MULTIPLIER
        )
    })
}

fn motor_units(req: &BatteryRequirements, spec: &BatterySpec) -> u32 {
    spec.motor_start_lra
        .map_or(0, |rating| units_for(req.motor_start_lra, rating))
}

/// Sizes a configuration built from one product only.
pub fn size_single(
    configuration: BatteryConfiguration,
    spec: &BatterySpec,
    req: &BatteryRequirements,
) -> BatterySizingResult {
    let drivers = SizingDrivers {
        for_energy: units_for(req.energy_kwh, spec.usable_kwh),
        for_power: units_for(req.peak_kw, spec.continuous_kw),
        for_motor_start: motor_units(req, spec),
    };
    let units = drivers
        .for_energy
        .max(drivers.for_power)
        .max(drivers.for_motor_start)
        .max(1);
    let installed = units.min(spec.max_units);
    let feasible = units <= spec.max_units;
    let reason = (!feasible).then(|| {
        format!(
            "Requires {units} x {}; a system supports at most {}",
            spec.name, spec.max_units
        )
    });

    BatterySizingResult {
        configuration,
        units,
        composition: UnitComposition::Single { units },
        installed_units: installed,
        drivers,
        binding: binding_constraint(drivers),
        total_kwh: f64::from(installed) * spec.usable_kwh,
        total_kw: f64::from(installed) * spec.continuous_kw,
        feasible,
        reason,
        motor_start_advisory: motor_advisory(req, spec.motor_start_lra.is_some()),
    }
}

/// Sizes the mixed configuration: `power_unit` for power and motor start,
/// `energy_unit` to top up the remaining energy.
pub fn size_mixed(
    power_unit: &BatterySpec,
    energy_unit: &BatterySpec,
    req: &BatteryRequirements,
) -> BatterySizingResult {
    let for_power = units_for(req.peak_kw, power_unit.continuous_kw);
    let for_motor_start = motor_units(req, power_unit);
    let power_units = for_power.max(for_motor_start).max(1);

    let remaining_kwh = (req.energy_kwh - f64::from(power_units) * power_unit.usable_kwh).max(0.0);
    let energy_units = units_for(remaining_kwh, energy_unit.usable_kwh);

    let units = power_units.saturating_add(energy_units);
    let combined_max = power_unit.max_units + energy_unit.max_units;
    let feasible = units <= combined_max;

    let installed_power = power_units.min(combined_max);
    let installed_energy = energy_units.min(combined_max - installed_power);

    let drivers = SizingDrivers {
        for_energy: energy_units,
        for_power,
        for_motor_start,
    };
    let binding = if energy_units > 0 {
        BindingConstraint::Energy
    } else {
        binding_constraint(SizingDrivers {
            for_energy: units_for(req.energy_kwh, power_unit.usable_kwh),
            ..drivers
        })
    };
    let reason = (!feasible).then(|| {
        format!(
            "Requires {power_units} x {} + {energy_units} x {}; combined maximum is {combined_max} units",
            power_unit.name, energy_unit.name
        )
    });

    BatterySizingResult {
        configuration: BatteryConfiguration::EnphaseMixed,
        units,
        composition: UnitComposition::Mixed {
            units_10c: power_units,
            units_5p: energy_units,
        },
        installed_units: installed_power + installed_energy,
        drivers,
        binding,
        total_kwh: f64::from(installed_power) * power_unit.usable_kwh
            + f64::from(installed_energy) * energy_unit.usable_kwh,
        total_kw: f64::from(installed_power) * power_unit.continuous_kw
            + f64::from(installed_energy) * energy_unit.continuous_kw,
        feasible,
        reason,
        motor_start_advisory: motor_advisory(
            req,
            power_unit.motor_start_lra.is_some() || energy_unit.motor_start_lra.is_some(),
        ),
    }
}

/// Sizes a leader + expansion configuration.
///
/// Leaders cover power and motor start only; expansions add energy and no
/// power, and each leader carries at most `expansion.max_per_leader` of them.
pub fn size_leader_expansion(
    leader: &BatterySpec,
    expansion: &ExpansionSpec,
    req: &BatteryRequirements,
) -> BatterySizingResult {
    let for_power = units_for(req.peak_kw, leader.continuous_kw);
    let for_motor_start = motor_units(req, leader);
    let leaders_required = for_power.max(for_motor_start).max(1);
    let leaders = leaders_required.min(leader.max_units);

    let remaining_kwh = (req.energy_kwh - f64::from(leaders) * leader.usable_kwh).max(0.0);
    let expansions_required = units_for(remaining_kwh, expansion.usable_kwh);
    let expansion_cap = leaders.saturating_mul(expansion.max_per_leader);
    let expansions = expansions_required.min(expansion_cap);

    let mut reasons = Vec::new();
    if leaders_required > leader.max_units {
        reasons.push(format!(
            "Power and motor start need {leaders_required} x {}; a system supports at most {}",
            leader.name, leader.max_units
        ));
    }
    if expansions_required > expansion_cap {
        let delivered = f64::from(leaders) * leader.usable_kwh
            + f64::from(expansion_cap) * expansion.usable_kwh;
        reasons.push(format!(
            "Energy shortfall of {:.1} kWh: {leaders} leader(s) carry at most {expansion_cap} x {}, {expansions_required} needed",
            req.energy_kwh - delivered,
            expansion.name
        ));
    }
    let feasible = reasons.is_empty();

    let drivers = SizingDrivers {
        for_energy: expansions_required,
        for_power,
        for_motor_start,
    };
    let binding = if expansions_required > 0 {
        BindingConstraint::Energy
    } else {
        binding_constraint(SizingDrivers {
            for_energy: units_for(req.energy_kwh, leader.usable_kwh),
            ..drivers
        })
    };

    BatterySizingResult {
        configuration: BatteryConfiguration::TeslaPw3Expansion,
        units: leaders_required.saturating_add(expansions_required),
        composition: UnitComposition::LeaderExpansion {
            leaders: leaders_required,
            expansions: expansions_required,
        },
        installed_units: leaders.saturating_add(expansions),
        drivers,
        binding,
        total_kwh: f64::from(leaders) * leader.usable_kwh
            + f64::from(expansions) * expansion.usable_kwh,
        total_kw: f64::from(leaders) * leader.continuous_kw,
        feasible,
        reason: (!feasible).then(|| reasons.join("; ")),
        motor_start_advisory: motor_advisory(req, leader.motor_start_lra.is_some()),
    }
}

/// Sizes every configuration for `requirements`.
pub fn size_all(req: &BatteryRequirements) -> Vec<BatterySizingResult> {
    BatteryConfiguration::ALL
        .into_iter()
        .map(|configuration| match configuration {
            BatteryConfiguration::Enphase5P => size_single(configuration, &ENPHASE_IQ_5P, req),
            BatteryConfiguration::Enphase10C => size_single(configuration, &ENPHASE_IQ_10C, req),
            BatteryConfiguration::EnphaseMixed => size_mixed(&ENPHASE_IQ_10C, &ENPHASE_IQ_5P, req),
            BatteryConfiguration::TeslaPw3 => size_single(configuration, &TESLA_POWERWALL_3, req),
            BatteryConfiguration::TeslaPw3Expansion => {
                size_leader_expansion(&TESLA_POWERWALL_3, &TESLA_POWERWALL_3_EXPANSION, req)
            }
        })
        .collect()
}

/// Full sizing run: select loads, derive requirements, size every configuration.
pub fn size_batteries(
    loads: &[Load],
    service: &Service,
    backup_days: f64,
    options: &SizingOptions,
) -> BatterySizing {
    let requirements = requirements(loads, service, backup_days, options);
    debug!(
        loads = requirements.selected_load_count,
        energy_kwh = requirements.energy_kwh,
        peak_kw = requirements.peak_kw,
        motor_start_lra = requirements.motor_start_lra,
        "battery requirements"
    );
    if requirements.motors_missing_lra > 0 {
        warn!(
            motors = requirements.motors_missing_lra,
            multiplier = LRA_ESTIMATE_MULTIPLIER,
            "motor loads without LRA; motor-start requirement is estimated"
        );
    }
    let results = size_all(&requirements);
    for r in results.iter().filter(|r| !r.feasible) {
        warn!(
            configuration = %r.configuration,
            reason = r.reason.as_deref().unwrap_or_default(),
            "battery configuration not feasible"
        );
    }
    BatterySizing {
        requirements,
        results,
    }
}
