use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::config::PRESETS;

/// Residential service load, panel space, EV and battery backup planner.
///
/// Planning-grade estimates only; not a code-compliance calculation.
#[derive(Parser, Debug, Clone)]
#[command(name = "load-calc", version, about)]
pub struct Cli {
    /// Project file (.toml or .json).
    #[arg(long, env = "LOAD_CALC_PROJECT", conflicts_with = "preset")]
    pub project: Option<PathBuf>,

    /// Built-in preset used when no project file is given.
    #[arg(long, value_parser = clap::builder::PossibleValuesParser::new(PRESETS.iter().copied()))]
    pub preset: Option<String>,

    /// Override the conditioned floor area (sq ft).
    #[arg(long)]
    pub sqft: Option<f64>,

    /// Evaluate a custom charger with this continuous draw (A).
    #[arg(long, conflicts_with = "ev_charger")]
    pub ev_amps: Option<f64>,

    /// Evaluate a catalog charger by id.
    #[arg(long)]
    pub ev_charger: Option<String>,

    /// Number of chargers to evaluate.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=4))]
    pub ev_count: Option<u32>,

    /// Whole-home backup duration in days.
    #[arg(long)]
    pub backup_days: Option<f64>,

    /// Share of daily energy covered by solar (0-100).
    #[arg(long)]
    pub solar_offset: Option<f64>,

    /// Print the report as JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// Write the load table as CSV.
    #[arg(long)]
    pub loads_csv: Option<PathBuf>,

    /// Write the battery comparison as CSV.
    #[arg(long)]
    pub battery_csv: Option<PathBuf>,

    /// Save the reconciled project as JSON.
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Preset to load when no project file is given.
    pub fn preset_name(&self) -> &str {
        self.preset.as_deref().unwrap_or("baseline")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("load-calc").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_to_baseline_preset() {
        let cli = parse(&[]).ok();
        assert_eq!(cli.as_ref().map(Cli::preset_name), Some("baseline"));
        assert_eq!(cli.as_ref().map(|c| c.verbose), Some(0));
    }

    #[test]
    fn supports_project_cli() {
        let cli = parse(&["--project", "home.toml", "--json"]).ok();
        assert_eq!(
            cli.as_ref().and_then(|c| c.project.as_deref()).and_then(|p| p.to_str()),
            Some("home.toml")
        );
        assert_eq!(cli.as_ref().map(|c| c.json), Some(true));
    }

    #[test]
    fn project_and_preset_are_exclusive() {
        assert!(parse(&["--project", "a.toml", "--preset", "gas_home"]).is_err());
    }

    #[test]
    fn unknown_preset_rejected() {
        assert!(parse(&["--preset", "mansion"]).is_err());
    }

    #[test]
    fn charger_count_bounded() {
        assert!(parse(&["--ev-count", "5"]).is_err());
        assert!(parse(&["--ev-count", "0"]).is_err());
        let cli = parse(&["--ev-amps", "40", "--ev-count", "2", "-vv"]).ok();
        assert_eq!(cli.as_ref().and_then(|c| c.ev_count), Some(2));
        assert_eq!(cli.as_ref().map(|c| c.verbose), Some(2));
    }
}
