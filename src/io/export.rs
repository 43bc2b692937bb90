//! CSV export of the load table and battery comparison, JSON project save.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use tracing::info;

use crate::calc::battery::BatterySizing;
use crate::error::Result;
use crate::model::load::Load;
use crate::model::project::ProjectSnapshot;

/// Column header for the load table export.
const LOADS_HEADER: &str = "id,description,category,poles,amps,type,slots,\
                            watts,hours_per_day,daily_kwh,motor,lra,\
                            in_service_calc,in_battery_calc,source";

/// Column header for the battery comparison export.
const BATTERY_HEADER: &str = "scenario,configuration,units,installed_units,composition,\
                              units_for_energy,units_for_power,units_for_motor_start,\
                              binding,total_kwh,total_kw,feasible,reason";

/// Writes one row per load to any writer.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_loads_csv(loads: &[Load], writer: impl Write) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(LOADS_HEADER.split(',').map(str::trim))?;

    for l in loads {
        wtr.write_record(&[
            l.id.to_string(),
            l.description.clone(),
            l.category.label().to_string(),
            l.breaker.poles.count().to_string(),
            l.breaker.amps.to_string(),
            format!("{:?}", l.breaker.breaker_type),
            l.slots_consumed().to_string(),
            format!("{:.0}", l.usage.assumed_watts),
            format!("{:.2}", l.usage.hours_per_day),
            format!("{:.3}", l.daily_wh() / 1000.0),
            l.motor.is_motor.to_string(),
            l.motor.lra.map(|v| format!("{v:.0}")).unwrap_or_default(),
            l.usage.include_in_service_calc.to_string(),
            l.usage.include_in_battery_calc.to_string(),
            format!("{:?}", l.source_tag),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes one row per scenario and battery configuration to any writer.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_battery_csv(scenarios: &[(&str, &BatterySizing)], writer: impl Write) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(BATTERY_HEADER.split(',').map(str::trim))?;

    for (scenario, sizing) in scenarios {
        for r in &sizing.results {
            wtr.write_record(&[
                (*scenario).to_string(),
                r.configuration.label().to_string(),
                r.units.to_string(),
                r.installed_units.to_string(),
                r.composition.to_string(),
                r.drivers.for_energy.to_string(),
                r.drivers.for_power.to_string(),
                r.drivers.for_motor_start.to_string(),
                r.binding.to_string(),
                format!("{:.1}", r.total_kwh),
                format!("{:.2}", r.total_kw),
                r.feasible.to_string(),
                r.reason.clone().unwrap_or_default(),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

/// Exports the load table to a CSV file at the given path.
///
/// # Errors
///
/// Returns an error if file creation or writing fails.
pub fn export_loads_csv(loads: &[Load], path: &Path) -> Result<()> {
    let file = File::create(path)?;
    write_loads_csv(loads, io::BufWriter::new(file))?;
    info!(path = %path.display(), rows = loads.len(), "load table written");
    Ok(())
}

/// Exports the battery comparison to a CSV file at the given path.
///
/// # Errors
///
/// Returns an error if file creation or writing fails.
pub fn export_battery_csv(scenarios: &[(&str, &BatterySizing)], path: &Path) -> Result<()> {
    let file = File::create(path)?;
    write_battery_csv(scenarios, io::BufWriter::new(file))?;
    info!(path = %path.display(), "battery comparison written");
    Ok(())
}

/// Saves the project as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if file creation, serialization or writing fails.
pub fn save_project_json(project: &ProjectSnapshot, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = io::BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, project)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    info!(path = %path.display(), "project saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::battery::{SizingOptions, size_batteries};
    use crate::model::ids::SequentialIds;
    use crate::model::load::LoadCategory;
    use crate::model::panel::Service;

    fn loads() -> Vec<Load> {
        let mut ids = SequentialIds::default();
        vec![
            Load::from_category(LoadCategory::Refrigerator, &mut ids),
            Load::from_category(LoadCategory::WellPump, &mut ids),
            Load::from_category(LoadCategory::Other, &mut ids).with_description("Shop, bench"),
        ]
    }

    #[test]
    fn loads_csv_has_header_and_row_per_load() {
        let mut buf = Vec::new();
        write_loads_csv(&loads(), &mut buf).ok();
        let output = String::from_utf8(buf).ok();
        let lines: Vec<&str> = output.as_deref().unwrap_or("").lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("id,description,category,poles"));
        // descriptions with commas are quoted
        assert!(lines[3].contains("\"Shop, bench\""));
    }

    #[test]
    fn loads_csv_is_parseable() {
        let mut buf = Vec::new();
        write_loads_csv(&loads(), &mut buf).ok();
        let mut rdr = csv::ReaderBuilder::new().from_reader(buf.as_slice());
        let headers = rdr.headers().cloned().ok();
        assert_eq!(headers.as_ref().map(csv::StringRecord::len), Some(15));
        let rows: Vec<_> = rdr.records().filter_map(|r| r.ok()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[1][11], "60");
        assert_eq!(rows[0][9].parse::<f64>().ok(), Some(2.0));
    }

    #[test]
    fn battery_csv_has_row_per_configuration() {
        let sizing = size_batteries(&loads(), &Service::default(), 1.0, &SizingOptions::default());
        let mut buf = Vec::new();
        write_battery_csv(&[("whole_home", &sizing), ("partial_home", &sizing)], &mut buf).ok();
        let output = String::from_utf8(buf).ok();
        assert_eq!(output.as_deref().unwrap_or("").lines().count(), 11);
    }

    #[test]
    fn json_save_round_trips() {
        let dir = tempfile::tempdir().ok();
        let path = dir.as_ref().map(|d| d.path().join("project.json"));
        let project = ProjectSnapshot {
            loads: loads(),
            ..ProjectSnapshot::default()
        };
        if let Some(path) = path {
            assert!(save_project_json(&project, &path).is_ok());
            let text = std::fs::read_to_string(&path).unwrap_or_default();
            assert!(text.contains("\"_wattsManuallySet\""));
            let back = ProjectSnapshot::from_json_str(&text).ok();
            assert_eq!(back, Some(project));
        }
    }
}
