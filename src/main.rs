//! load-calc entry point: CLI wiring, project loading and report output.

use std::process;

use clap::Parser;
use tracing::info;

use load_calc::calc::baseline::reconcile_baseline;
use load_calc::cli::Cli;
use load_calc::error::{CalcError, Result};
use load_calc::io::export::{export_battery_csv, export_loads_csv, save_project_json};
use load_calc::model::ids::RandomIds;
use load_calc::model::project::{EvChargerSelection, ProjectSnapshot};
use load_calc::report::ProjectReport;
use load_calc::telemetry::init_tracing;

/// Loads the project named on the command line and applies the overrides.
fn load_project(cli: &Cli, ids: &mut RandomIds) -> Result<ProjectSnapshot> {
    let mut project = match &cli.project {
        Some(path) => ProjectSnapshot::from_file(path)?,
        None => ProjectSnapshot::from_preset(cli.preset_name(), ids)?,
    };

    if let Some(sqft) = cli.sqft {
        project.metadata.square_footage = Some(sqft);
    }
    if let Some(amps) = cli.ev_amps {
        project.ev.charger = Some(EvChargerSelection::Custom {
            continuous_amps: amps,
        });
    }
    if let Some(id) = &cli.ev_charger {
        project.ev.charger = Some(EvChargerSelection::Catalog { id: id.clone() });
    }
    if let Some(count) = cli.ev_count {
        project.ev.charger_count = count;
    }
    if let Some(days) = cli.backup_days {
        project.battery.whole_home.backup_days = days;
    }
    if let Some(offset) = cli.solar_offset {
        project.battery.whole_home.solar_offset_percent = offset;
    }

    project.loads = reconcile_baseline(&project.loads, ids);

    let errors = project.validate();
    if !errors.is_empty() {
        return Err(CalcError::Invalid(errors));
    }
    Ok(project)
}

fn run(cli: &Cli) -> Result<()> {
    let mut ids = RandomIds;
    let project = load_project(cli, &mut ids)?;
    let report = ProjectReport::build_with_ids(&project, &mut ids);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
    }

    if let Some(path) = &cli.loads_csv {
        export_loads_csv(&project.loads, path)?;
    }
    if let Some(path) = &cli.battery_csv {
        let mut scenarios = vec![("whole_home", &report.whole_home)];
        if let Some(partial) = &report.partial_home {
            scenarios.push(("partial_home", partial));
        }
        export_battery_csv(&scenarios, path)?;
    }
    if let Some(path) = &cli.save {
        save_project_json(&project, path)?;
    }

    info!("done");
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
