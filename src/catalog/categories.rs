//! Load-category library and NEC demand bucket membership.

use crate::model::load::LoadCategory;
use crate::model::load::Poles::{self, Double, Single};

use self::DemandBucket as B;

/// Catalog defaults a new load of a category starts from.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryDefaults {
    pub label: &'static str,
    pub watts: f64,
    pub breaker_amps: u32,
    pub poles: Poles,
    pub hours_per_day: f64,
    pub is_motor: bool,
    pub lra: Option<f64>,
    pub bucket: DemandBucket,
}

/// Demand-calculation bucket a category belongs to.
///
/// Every category maps to exactly one bucket, so no load is ever counted twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DemandBucket {
    /// General lighting, replaced by the floor-area figure when known.
    Lighting,
    /// Small-appliance and laundry circuits, covered by the fixed allowances.
    GeneralAllowance,
    FixedAppliance,
    Cooking,
    Dryer,
    Cooling,
    Heating,
    Ev,
    Other,
}

const fn entry(
    label: &'static str,
    watts: f64,
    breaker_amps: u32,
    poles: Poles,
    hours_per_day: f64,
    lra: Option<f64>,
    bucket: DemandBucket,
) -> CategoryDefaults {
    CategoryDefaults {
        label,
        watts,
        breaker_amps,
        poles,
        hours_per_day,
        is_motor: lra.is_some(),
        lra,
        bucket,
    }
}

static GENERAL_LIGHTING: CategoryDefaults =
    entry("General Lighting", 4500.0, 15, Single, 5.0, None, B::Lighting);
static SMALL_APPLIANCE: CategoryDefaults = entry(
    "Small Appliance Circuit",
    1500.0,
    20,
    Single,
    2.0,
    None,
    B::GeneralAllowance,
);
static LAUNDRY: CategoryDefaults =
    entry("Laundry Circuit", 1500.0, 20, Single, 1.0, None, B::GeneralAllowance);
static REFRIGERATOR: CategoryDefaults =
    entry("Refrigerator", 200.0, 15, Single, 10.0, Some(15.0), B::Other);
static FREEZER: CategoryDefaults = entry("Freezer", 150.0, 15, Single, 10.0, Some(12.0), B::Other);
static DISHWASHER: CategoryDefaults =
    entry("Dishwasher", 1200.0, 20, Single, 1.0, None, B::FixedAppliance);
static DISPOSAL: CategoryDefaults =
    entry("Garbage Disposal", 800.0, 20, Single, 0.1, Some(20.0), B::FixedAppliance);
static MICROWAVE: CategoryDefaults =
    entry("Microwave", 1500.0, 20, Single, 0.5, None, B::FixedAppliance);
static WASHER: CategoryDefaults =
    entry("Clothes Washer", 500.0, 20, Single, 1.0, Some(20.0), B::FixedAppliance);
static ELECTRIC_WATER_HEATER: CategoryDefaults = entry(
    "Electric Water Heater",
    4500.0,
    30,
    Double,
    3.0,
    None,
    B::FixedAppliance,
);
static DEHUMIDIFIER: CategoryDefaults =
    entry("Dehumidifier", 700.0, 15, Single, 8.0, Some(15.0), B::FixedAppliance);
static RANGE_OVEN: CategoryDefaults =
    entry("Range / Oven", 12000.0, 50, Double, 1.0, None, B::Cooking);
static COOKTOP: CategoryDefaults = entry("Cooktop", 7200.0, 40, Double, 1.0, None, B::Cooking);
static DRYER: CategoryDefaults = entry("Clothes Dryer", 5000.0, 30, Double, 1.0, None, B::Dryer);
static AC_CONDENSER: CategoryDefaults =
    entry("AC Condenser", 3500.0, 30, Double, 8.0, Some(90.0), B::Cooling);
static HEAT_PUMP: CategoryDefaults =
    entry("Heat Pump", 4000.0, 40, Double, 8.0, Some(100.0), B::Cooling);
static AIR_HANDLER: CategoryDefaults =
    entry("Air Handler", 750.0, 20, Double, 8.0, Some(12.0), B::Cooling);
static FURNACE: CategoryDefaults =
    entry("Electric Furnace", 10000.0, 60, Double, 6.0, None, B::Heating);
static BOILER: CategoryDefaults =
    entry("Electric Boiler", 9000.0, 50, Double, 6.0, None, B::Heating);
static EV_CHARGER: CategoryDefaults = entry("EV Charger", 7680.0, 40, Double, 3.0, None, B::Ev);
static WELL_PUMP: CategoryDefaults =
    entry("Well Pump", 1500.0, 20, Double, 2.0, Some(60.0), B::Other);
static POOL_PUMP: CategoryDefaults =
    entry("Pool Pump", 1500.0, 20, Double, 8.0, Some(50.0), B::Other);
static HOT_TUB: CategoryDefaults = entry("Hot Tub", 5000.0, 50, Double, 3.0, None, B::Other);
static SUMP_PUMP: CategoryDefaults =
    entry("Sump Pump", 800.0, 15, Single, 1.0, Some(25.0), B::Other);
static OTHER: CategoryDefaults = entry("Other", 1000.0, 20, Single, 2.0, None, B::Other);

/// Catalog defaults for `category`.
pub fn category_defaults(category: LoadCategory) -> &'static CategoryDefaults {
    use LoadCategory as C;
    match category {
        C::GeneralLighting => &GENERAL_LIGHTING,
        C::SmallAppliance => &SMALL_APPLIANCE,
        C::Laundry => &LAUNDRY,
        C::Refrigerator => &REFRIGERATOR,
        C::Freezer => &FREEZER,
        C::Dishwasher => &DISHWASHER,
        C::Disposal => &DISPOSAL,
        C::Microwave => &MICROWAVE,
        C::Washer => &WASHER,
        C::ElectricWaterHeater => &ELECTRIC_WATER_HEATER,
        C::Dehumidifier => &DEHUMIDIFIER,
        C::RangeOven => &RANGE_OVEN,
        C::Cooktop => &COOKTOP,
        C::Dryer => &DRYER,
        C::AcCondenser => &AC_CONDENSER,
        C::HeatPump => &HEAT_PUMP,
        C::AirHandler => &AIR_HANDLER,
        C::Furnace => &FURNACE,
        C::Boiler => &BOILER,
        C::EvCharger => &EV_CHARGER,
        C::WellPump => &WELL_PUMP,
        C::PoolPump => &POOL_PUMP,
        C::HotTub => &HOT_TUB,
        C::SumpPump => &SUMP_PUMP,
        C::Other => &OTHER,
    }
}

/// Demand bucket of `category`.
pub fn bucket_of(category: LoadCategory) -> DemandBucket {
    category_defaults(category).bucket
}
