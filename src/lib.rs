//! Residential electrical service planning: NEC-style demand, panel slot
//! accounting, EV charger feasibility and battery backup sizing.

/// The calculation engine.
pub mod calc;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod io;
pub mod model;
pub mod questionnaire;
pub mod report;
pub mod telemetry;

pub use error::{CalcError, Result};
pub use model::project::ProjectSnapshot;
pub use report::ProjectReport;
