//! Project data model: loads, panel, service and the project snapshot.

/// Load identifiers and injectable id sources.
pub mod ids;
/// Circuit entries and their per-load quantities.
pub mod load;
pub mod panel;
pub mod project;

pub use ids::{IdSource, LoadId, RandomIds, SequentialIds};
pub use load::{
    Breaker, BreakerType, Load, LoadCategory, MotorInfo, Poles, SourceTag, TandemCircuit, Usage,
};
pub use panel::{Panel, Service, ServiceVoltage, TandemPolicy, TandemPositions, TandemsAllowed};
pub use project::{
    BatteryPlan, BatteryScenario, EvChargerSelection, EvPlan, Metadata, ProjectSnapshot,
};
