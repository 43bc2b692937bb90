//! The calculation engine. Every function here is a pure function of its
//! inputs: nothing is mutated, nothing fails, and inconsistencies come back
//! as advisories alongside the figures.

pub mod baseline;
pub mod battery;
pub mod ev;
pub mod nec;
pub mod practical;
pub mod slots;

pub use baseline::{baseline_loads, reconcile_baseline};
pub use battery::{
    BatteryRequirements, BatterySizing, BatterySizingResult, BindingConstraint, SizingDrivers,
    SizingOptions, UnitComposition, size_batteries,
};
pub use ev::{EvCharger, EvFeasibility, EvRecommendation, evaluate_plan};
pub use nec::{NecDemand, ServiceStatus, estimate_demand};
pub use practical::{PracticalTotals, aggregate};
pub use slots::{PanelSlotReport, PanelWarning};
