//! Every calculation for one project snapshot, gathered into a single report.

use std::fmt;

use serde::Serialize;
use tracing::info;

use crate::calc::battery::{self, BatterySizing, SizingOptions};
use crate::calc::ev::{self, EvCharger, EvFeasibility};
use crate::calc::nec::{self, NecDemand};
use crate::calc::practical::{self, PracticalTotals};
use crate::calc::slots::PanelSlotReport;
use crate::model::ids::{IdSource, RandomIds};
use crate::model::load::Load;
use crate::model::project::{BatteryScenario, ProjectSnapshot};

/// Derived figures for a project. Recomputed from scratch on every build.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectReport {
    pub name: String,
    pub panel: PanelSlotReport,
    pub demand: NecDemand,
    /// Raw totals of the loads included in battery sizing.
    pub practical: PracticalTotals,
    pub whole_home: BatterySizing,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partial_home: Option<BatterySizing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ev: Option<EvFeasibility>,
}

impl ProjectReport {
    /// Builds the report, issuing random ids for the synthetic EV loads.
    pub fn build(snapshot: &ProjectSnapshot) -> Self {
        Self::build_with_ids(snapshot, &mut RandomIds)
    }

    /// Builds the report with an explicit id source for the synthetic EV loads.
    pub fn build_with_ids(snapshot: &ProjectSnapshot, ids: &mut impl IdSource) -> Self {
        let service = &snapshot.service;
        let panel = PanelSlotReport::build(&snapshot.panel, &snapshot.loads);
        let demand =
            nec::estimate_demand(&snapshot.loads, service, snapshot.metadata.square_footage);

        let battery_loads: Vec<Load> = snapshot
            .loads
            .iter()
            .filter(|l| l.usage.include_in_battery_calc)
            .cloned()
            .collect();
        let practical = practical::aggregate(&battery_loads);

        let proposed_ev: Vec<Load> = snapshot
            .ev
            .charger
            .as_ref()
            .and_then(EvCharger::from_selection)
            .map(|c| ev::proposed_ev_loads(&c, snapshot.ev.charger_count, service, ids))
            .unwrap_or_default();
        let size = |scenario: &BatteryScenario| {
            battery::size_batteries(
                &snapshot.loads,
                service,
                scenario.backup_days,
                &SizingOptions::from_scenario(scenario, &proposed_ev),
            )
        };
        let whole_home = size(&snapshot.battery.whole_home);
        let partial_home = snapshot.battery.partial_home.as_ref().map(size);

        let ev = ev::evaluate_plan(snapshot, ids);

        info!(
            project = %snapshot.metadata.name,
            demand_kva = demand.total_demand_kva,
            status = %demand.status,
            ev = ev.as_ref().map(|e| e.recommendation.to_string()).unwrap_or_default(),
            "report built"
        );

        Self {
            name: snapshot.metadata.name.clone(),
            panel,
            demand,
            practical,
            whole_home,
            partial_home,
            ev,
        }
    }
}

fn write_sizing(f: &mut fmt::Formatter<'_>, title: &str, sizing: &BatterySizing) -> fmt::Result {
    let r = &sizing.requirements;
    writeln!(f, "--- Battery Backup: {title} ---")?;
    writeln!(
        f,
        "Loads: {}  Backup: {} day(s)  Energy: {:.1} kWh  Peak: {:.2} kW  Motor start: {:.0} A",
        r.selected_load_count, r.backup_days, r.energy_kwh, r.peak_kw, r.motor_start_lra
    )?;
    for res in &sizing.results {
        write!(
            f,
            "  {:<30} {:>3} units  {:>6.1} kWh  {:>6.2} kW  bound by {:<11}",
            res.configuration.label(),
            res.units,
            res.total_kwh,
            res.total_kw,
            res.binding.to_string(),
        )?;
        match &res.reason {
            Some(reason) => writeln!(f, "  NOT FEASIBLE: {reason}")?,
            None => writeln!(f, "  {}", res.composition)?,
        }
    }
    if let Some(advisory) = sizing.results.iter().find_map(|r| r.motor_start_advisory.as_ref()) {
        writeln!(f, "  Note: {advisory}")?;
    }
    Ok(())
}

impl fmt::Display for ProjectReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.name.is_empty() {
            writeln!(f, "=== {} ===", self.name)?;
        }

        let p = &self.panel;
        writeln!(f, "--- Panel ---")?;
        writeln!(
            f,
            "Slots: {} total, {} declared used, {} tandem, {} available",
            p.total_slots, p.declared_used_slots, p.declared_tandem_slots, p.available_slots
        )?;
        writeln!(
            f,
            "Modeled from loads: {} (delta {:+})  Tandem-capable: {}",
            p.modeled_slots_consumed, p.delta, p.tandem_capable_slots
        )?;
        for w in &p.warnings {
            writeln!(f, "  Warning: {w}")?;
        }

        let d = &self.demand;
        let b = &d.breakdown;
        writeln!(f, "--- Service Demand (NEC optional method estimate) ---")?;
        writeln!(f, "General (lighting + allowances): {:.0} VA", b.general_demand_va)?;
        writeln!(f, "Fixed appliances:                {:.0} VA", b.fixed_appliance_demand_va)?;
        writeln!(f, "Cooking:                         {:.0} VA", b.cooking_demand_va)?;
        writeln!(f, "Dryer:                           {:.0} VA", b.dryer_demand_va)?;
        writeln!(f, "Heating / cooling:               {:.0} VA", b.hvac_demand_va)?;
        writeln!(f, "Other large loads:               {:.0} VA", b.other_va)?;
        writeln!(f, "EV chargers:                     {:.0} VA", b.ev_va)?;
        writeln!(
            f,
            "Total: {:.2} kVA  {:.1} A  {:.0}% of main  {}",
            d.total_demand_kva,
            d.service_amps,
            d.utilization_percent(),
            d.status
        )?;

        let t = &self.practical;
        writeln!(f, "--- Practical Load ---")?;
        writeln!(
            f,
            "{} loads  {:.2} kW running  {:.1} kWh/day  {} motor(s)",
            t.load_count,
            t.total_kw(),
            t.daily_kwh(),
            t.motor_count
        )?;

        write_sizing(f, "Whole Home", &self.whole_home)?;
        if let Some(partial) = &self.partial_home {
            write_sizing(f, "Partial Home", partial)?;
        }

        if let Some(ev) = &self.ev {
            writeln!(f, "--- EV Charger ---")?;
            writeln!(
                f,
                "{} x {} ({} A breaker): {:.0} W",
                ev.charger_count, ev.charger.name, ev.charger.breaker_amps, ev.total_ev_watts
            )?;
            writeln!(
                f,
                "Service: {} -> {} ({:.0}%)  Slots: {} needed, {} available",
                ev.without_ev.status,
                ev.with_ev.status,
                ev.with_ev.utilization_percent(),
                ev.slots_needed,
                ev.available_slots
            )?;
            writeln!(f, "Recommendation: {}", ev.recommendation)?;
        }
        Ok(())
    }
}
