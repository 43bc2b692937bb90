//! Static reference tables: load categories, breaker sizes, EV chargers and
//! battery products. Not user-editable.

/// Battery product specifications.
pub mod batteries;
pub mod categories;
/// EV charger library.
pub mod chargers;

pub use batteries::{
    BatteryConfiguration, BatterySpec, ENPHASE_IQ_5P, ENPHASE_IQ_10C, ExpansionSpec,
    TESLA_POWERWALL_3, TESLA_POWERWALL_3_EXPANSION,
};
pub use categories::{CategoryDefaults, DemandBucket, bucket_of, category_defaults};
pub use chargers::{EV_CHARGERS, EvChargerSpec, find_charger};

/// Standard branch breaker ratings (A).
pub const STANDARD_BREAKER_AMPS: &[u32] = &[
    15, 20, 25, 30, 35, 40, 45, 50, 60, 70, 80, 90, 100, 110, 125,
];

/// Standard main breaker and bus ratings (A).
pub const MAIN_BREAKER_AMPS: &[u32] = &[
    60, 100, 125, 150, 175, 200, 225, 250, 300, 320, 400,
];

/// Whether `amps` is a standard branch breaker rating.
pub fn is_standard_breaker(amps: u32) -> bool {
    STANDARD_BREAKER_AMPS.contains(&amps)
}

/// Whether `amps` is a standard main breaker rating.
pub fn is_standard_main_breaker(amps: u32) -> bool {
    MAIN_BREAKER_AMPS.contains(&amps)
}
