//! NEC Optional-Method-style service demand estimate.
//!
//! A planning approximation, not a code-compliance calculation. Buckets are
//! evaluated in a fixed order and summed:
//!
//! 1. general lighting (floor area × 3 VA, else lighting loads, else 4500 VA
//!    when the list has no lighting load at all)
//! 2. plus the small-appliance and laundry allowances
//! 3. first 10 kVA of that at 100 %, the rest at 40 %
//! 4. fixed appliances, 75 % when four or more are present
//! 5. cooking
//! 6. dryer
//! 7. the larger of heating and cooling
//! 8. everything else at 100 %
//! 9. EV chargers at 100 %

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::catalog::{DemandBucket, bucket_of};
use crate::model::load::Load;
use crate::model::panel::Service;

pub const LIGHTING_VA_PER_SQFT: f64 = 3.0;
pub const FALLBACK_LIGHTING_VA: f64 = 4500.0;
pub const SMALL_APPLIANCE_ALLOWANCE_VA: f64 = 3000.0;
pub const LAUNDRY_ALLOWANCE_VA: f64 = 1500.0;
pub const GENERAL_FULL_DEMAND_VA: f64 = 10_000.0;
pub const GENERAL_REMAINDER_FACTOR: f64 = 0.40;
pub const FIXED_APPLIANCE_FACTOR: f64 = 0.75;
pub const FIXED_APPLIANCE_MIN_COUNT: usize = 4;
pub const SINGLE_COOKING_MAX_W: f64 = 12_000.0;
pub const SINGLE_COOKING_DEMAND_VA: f64 = 8_000.0;
pub const COOKING_FACTOR: f64 = 0.65;
pub const DRYER_MIN_VA: f64 = 5_000.0;
pub const BORDERLINE_RATIO: f64 = 0.80;

/// Service utilization verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ServiceStatus {
    #[serde(rename = "OK")]
    Ok,
    Borderline,
    Undersized,
}

impl ServiceStatus {
    /// Classifies a utilization ratio (estimated amps / main breaker amps).
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio > 1.0 {
            ServiceStatus::Undersized
        } else if ratio > BORDERLINE_RATIO {
            ServiceStatus::Borderline
        } else {
            ServiceStatus::Ok
        }
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ServiceStatus::Ok => "OK",
            ServiceStatus::Borderline => "Borderline",
            ServiceStatus::Undersized => "Undersized",
        })
    }
}

/// Where the general lighting figure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LightingBasis {
    SquareFootage,
    LightingLoads,
    Fallback,
}

/// Per-bucket demand figures, all in VA.
#[derive(Debug, Clone, Serialize)]
pub struct DemandBreakdown {
    pub lighting_basis: LightingBasis,
    pub general_lighting_va: f64,
    pub general_total_va: f64,
    pub general_demand_va: f64,
    pub fixed_appliance_count: usize,
    pub fixed_appliance_connected_va: f64,
    pub fixed_appliance_demand_va: f64,
    pub cooking_count: usize,
    pub cooking_connected_va: f64,
    pub cooking_demand_va: f64,
    pub dryer_demand_va: f64,
    pub cooling_va: f64,
    pub heating_va: f64,
    pub hvac_demand_va: f64,
    pub other_va: f64,
    pub ev_va: f64,
}

/// Result of one demand estimate.
#[derive(Debug, Clone, Serialize)]
pub struct NecDemand {
    pub total_demand_va: f64,
    pub total_demand_kva: f64,
    pub service_amps: f64,
    /// `service_amps / main_breaker_amps`.
    pub utilization: f64,
    pub status: ServiceStatus,
    pub breakdown: DemandBreakdown,
}

impl NecDemand {
    /// Utilization as a whole-number percentage.
    pub fn utilization_percent(&self) -> f64 {
        (self.utilization * 100.0).round()
    }
}

/// Applies the 100 % / 40 % split to the general lighting plus allowances total.
pub fn general_demand_va(general_total_va: f64) -> f64 {
    if general_total_va <= GENERAL_FULL_DEMAND_VA {
        general_total_va
    } else {
        GENERAL_FULL_DEMAND_VA
            + (general_total_va - GENERAL_FULL_DEMAND_VA) * GENERAL_REMAINDER_FACTOR
    }
}

fn cooking_demand_va(count: usize, connected_va: f64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    if count == 1 {
        if connected_va <= SINGLE_COOKING_MAX_W {
            return SINGLE_COOKING_DEMAND_VA;
        }
        // Above the cliff, never below what 12 kW would have received.
        return (connected_va * COOKING_FACTOR).max(SINGLE_COOKING_DEMAND_VA);
    }
    connected_va * COOKING_FACTOR
}

/// Estimates service demand for the loads included in the service calculation.
///
/// `square_footage` overrides lighting-load summation when positive.
pub fn estimate_demand(
    loads: &[Load],
    service: &Service,
    square_footage: Option<f64>,
) -> NecDemand {
    let mut lighting_count = 0usize;
    let mut lighting_loads_va = 0.0;
    let mut fixed_count = 0usize;
    let mut fixed_va = 0.0;
    let mut cooking_count = 0usize;
    let mut cooking_va = 0.0;
    let mut dryer_count = 0usize;
    let mut dryer_va = 0.0;
    let mut cooling_va = 0.0;
    let mut heating_va = 0.0;
    let mut other_va = 0.0;
    let mut ev_va = 0.0;

    for load in loads.iter().filter(|l| l.usage.include_in_service_calc) {
        let watts = load.usage.assumed_watts.max(0.0);
        match bucket_of(load.category) {
            DemandBucket::Lighting => {
                lighting_count += 1;
                lighting_loads_va += watts;
            }
            DemandBucket::GeneralAllowance => {}
            DemandBucket::FixedAppliance => {
                fixed_count += 1;
                fixed_va += watts;
            }
            DemandBucket::Cooking => {
                cooking_count += 1;
                cooking_va += watts;
            }
            DemandBucket::Dryer => {
                dryer_count += 1;
                dryer_va += watts;
            }
            DemandBucket::Cooling => cooling_va += watts,
            DemandBucket::Heating => heating_va += watts,
            DemandBucket::Ev => ev_va += watts,
            DemandBucket::Other => other_va += watts,
        }
    }

    let (lighting_basis, general_lighting_va) = match square_footage {
        Some(sqft) if sqft > 0.0 => (LightingBasis::SquareFootage, sqft * LIGHTING_VA_PER_SQFT),
        _ if lighting_count > 0 => (LightingBasis::LightingLoads, lighting_loads_va),
        _ => (LightingBasis::Fallback, FALLBACK_LIGHTING_VA),
    };
    let general_total_va =
        general_lighting_va + SMALL_APPLIANCE_ALLOWANCE_VA + LAUNDRY_ALLOWANCE_VA;
    let general_demand = general_demand_va(general_total_va);

    let fixed_demand = if fixed_count >= FIXED_APPLIANCE_MIN_COUNT {
        fixed_va * FIXED_APPLIANCE_FACTOR
    } else {
        fixed_va
    };
    let cooking_demand = cooking_demand_va(cooking_count, cooking_va);
    let dryer_demand = if dryer_count > 0 {
        dryer_va.max(DRYER_MIN_VA)
    } else {
        0.0
    };
    let hvac_demand = cooling_va.max(heating_va);

    let total_demand_va = general_demand
        + fixed_demand
        + cooking_demand
        + dryer_demand
        + hvac_demand
        + other_va
        + ev_va;
    let volts = service.service_voltage.volts();
    let service_amps = total_demand_va / volts;
    let utilization = if service.main_breaker_amps > 0 {
        service_amps / f64::from(service.main_breaker_amps)
    } else {
        f64::INFINITY
    };
    let status = ServiceStatus::from_ratio(utilization);

    debug!(
        general_demand,
        fixed_demand,
        cooking_demand,
        dryer_demand,
        hvac_demand,
        other_va,
        ev_va,
        total_demand_va,
        service_amps,
        %status,
        "nec demand estimate"
    );

    NecDemand {
        total_demand_va,
        total_demand_kva: total_demand_va / 1000.0,
        service_amps,
        utilization,
        status,
        breakdown: DemandBreakdown {
            lighting_basis,
            general_lighting_va,
            general_total_va,
            general_demand_va: general_demand,
            fixed_appliance_count: fixed_count,
            fixed_appliance_connected_va: fixed_va,
            fixed_appliance_demand_va: fixed_demand,
            cooking_count,
            cooking_connected_va: cooking_va,
            cooking_demand_va: cooking_demand,
            dryer_demand_va: dryer_demand,
            cooling_va,
            heating_va,
            hvac_demand_va: hvac_demand,
            other_va,
            ev_va,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ids::SequentialIds;
    use crate::model::load::LoadCategory;

    fn service() -> Service {
        Service::default()
    }

    fn loads(spec: &[(LoadCategory, f64)]) -> Vec<Load> {
        let mut ids = SequentialIds::default();
        spec.iter()
            .map(|(c, w)| Load::from_category(*c, &mut ids).with_watts(*w))
            .collect()
    }

    #[test]
    fn general_demand_threshold() {
        assert_eq!(general_demand_va(10_000.0), 10_000.0);
        assert!((general_demand_va(10_001.0) - 10_000.4).abs() < 1e-9);
        assert_eq!(general_demand_va(9_000.0), 9_000.0);
    }

    #[test]
    fn lighting_basis_precedence() {
        let l = loads(&[(LoadCategory::GeneralLighting, 2000.0)]);
        let by_area = estimate_demand(&l, &service(), Some(1000.0));
        assert_eq!(by_area.breakdown.lighting_basis, LightingBasis::SquareFootage);
        assert_eq!(by_area.breakdown.general_lighting_va, 3000.0);

        let by_loads = estimate_demand(&l, &service(), Some(0.0));
        assert_eq!(by_loads.breakdown.lighting_basis, LightingBasis::LightingLoads);
        assert_eq!(by_loads.breakdown.general_lighting_va, 2000.0);

        let fallback = estimate_demand(&[], &service(), None);
        assert_eq!(fallback.breakdown.lighting_basis, LightingBasis::Fallback);
        assert_eq!(fallback.breakdown.general_total_va, 9000.0);
        assert_eq!(fallback.total_demand_va, 9000.0);
    }

    #[test]
    fn fixed_appliance_factor_is_all_or_nothing() {
        let three = loads(&[
            (LoadCategory::Dishwasher, 1000.0),
            (LoadCategory::Disposal, 1000.0),
            (LoadCategory::Microwave, 1000.0),
        ]);
        let d = estimate_demand(&three, &service(), None);
        assert_eq!(d.breakdown.fixed_appliance_demand_va, 3000.0);

        let four = loads(&[
            (LoadCategory::Dishwasher, 1000.0),
            (LoadCategory::Disposal, 1000.0),
            (LoadCategory::Microwave, 1000.0),
            (LoadCategory::ElectricWaterHeater, 1000.0),
        ]);
        let d = estimate_demand(&four, &service(), None);
        assert_eq!(d.breakdown.fixed_appliance_demand_va, 3000.0);
        assert_eq!(d.breakdown.fixed_appliance_connected_va, 4000.0);
    }

    #[test]
    fn cooking_rules() {
        let single = loads(&[(LoadCategory::RangeOven, 12_000.0)]);
        assert_eq!(
            estimate_demand(&single, &service(), None).breakdown.cooking_demand_va,
            8000.0
        );
        let small = loads(&[(LoadCategory::Cooktop, 3_000.0)]);
        assert_eq!(
            estimate_demand(&small, &service(), None).breakdown.cooking_demand_va,
            8000.0
        );
        let big = loads(&[(LoadCategory::RangeOven, 16_000.0)]);
        assert!(
            (estimate_demand(&big, &service(), None).breakdown.cooking_demand_va - 10_400.0).abs()
                < 1e-9
        );
        let two = loads(&[
            (LoadCategory::Cooktop, 6_000.0),
            (LoadCategory::RangeOven, 4_000.0),
        ]);
        assert!(
            (estimate_demand(&two, &service(), None).breakdown.cooking_demand_va - 6_500.0).abs()
                < 1e-9
        );
    }

    #[test]
    fn dryer_minimum() {
        let small = loads(&[(LoadCategory::Dryer, 3_000.0)]);
        assert_eq!(
            estimate_demand(&small, &service(), None).breakdown.dryer_demand_va,
            5000.0
        );
        let big = loads(&[(LoadCategory::Dryer, 5_600.0)]);
        assert_eq!(
            estimate_demand(&big, &service(), None).breakdown.dryer_demand_va,
            5600.0
        );
        assert_eq!(
            estimate_demand(&[], &service(), None).breakdown.dryer_demand_va,
            0.0
        );
    }

    #[test]
    fn hvac_is_non_coincident() {
        let l = loads(&[
            (LoadCategory::AcCondenser, 3_500.0),
            (LoadCategory::AirHandler, 700.0),
            (LoadCategory::Furnace, 10_000.0),
        ]);
        let d = estimate_demand(&l, &service(), None);
        assert_eq!(d.breakdown.cooling_va, 4_200.0);
        assert_eq!(d.breakdown.heating_va, 10_000.0);
        assert_eq!(d.breakdown.hvac_demand_va, 10_000.0);
    }

    #[test]
    fn ev_and_other_at_full_value() {
        let l = loads(&[
            (LoadCategory::EvCharger, 9_600.0),
            (LoadCategory::HotTub, 5_000.0),
            (LoadCategory::SmallAppliance, 1_500.0),
        ]);
        let d = estimate_demand(&l, &service(), None);
        assert_eq!(d.breakdown.ev_va, 9_600.0);
        assert_eq!(d.breakdown.other_va, 5_000.0);
    }

    #[test]
    fn excluded_loads_are_ignored() {
        let mut l = loads(&[(LoadCategory::HotTub, 5_000.0)]);
        l[0].usage.include_in_service_calc = false;
        assert_eq!(estimate_demand(&l, &service(), None).breakdown.other_va, 0.0);
    }

    #[test]
    fn status_thresholds() {
        assert_eq!(ServiceStatus::from_ratio(0.80), ServiceStatus::Ok);
        assert_eq!(ServiceStatus::from_ratio(0.81), ServiceStatus::Borderline);
        assert_eq!(ServiceStatus::from_ratio(1.0), ServiceStatus::Borderline);
        assert_eq!(ServiceStatus::from_ratio(1.01), ServiceStatus::Undersized);
    }

    #[test]
    fn demand_is_monotonic_in_watts() {
        let categories = [
            LoadCategory::GeneralLighting,
            LoadCategory::Dishwasher,
            LoadCategory::RangeOven,
            LoadCategory::Dryer,
            LoadCategory::HeatPump,
            LoadCategory::Boiler,
            LoadCategory::EvCharger,
            LoadCategory::PoolPump,
        ];
        for category in categories {
            let mut previous = 0.0;
            for step in 0..40 {
                let l = loads(&[(category, f64::from(step) * 500.0)]);
                let total = estimate_demand(&l, &service(), None).total_demand_va;
                assert!(total >= previous, "{category:?} dropped at step {step}");
                previous = total;
            }
        }
    }
}
