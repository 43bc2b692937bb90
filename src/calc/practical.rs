//! Raw running-power and daily-energy totals with no demand factors applied.

use serde::Serialize;

use crate::model::load::Load;
use crate::model::panel::Service;

/// Multiple of running amps assumed when a motor has no declared LRA.
pub const LRA_ESTIMATE_MULTIPLIER: f64 = 6.0;

/// Sum-everything view of a load list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PracticalTotals {
    pub load_count: usize,
    pub total_watts: f64,
    pub daily_wh: f64,
    pub motor_count: usize,
    /// Running watts of the largest motor by watts.
    pub largest_motor_watts: f64,
    /// Declared LRA of the largest motor by watts.
    pub largest_motor_lra: Option<f64>,
    /// Largest declared LRA across all motors.
    pub max_declared_lra: Option<f64>,
    /// Motors flagged without an LRA.
    pub motors_missing_lra: usize,
}

impl PracticalTotals {
    pub fn total_kw(&self) -> f64 {
        self.total_watts / 1000.0
    }

    pub fn daily_kwh(&self) -> f64 {
        self.daily_wh / 1000.0
    }
}

/// Totals running watts and daily energy over `loads` as given.
pub fn aggregate(loads: &[Load]) -> PracticalTotals {
    let mut totals = PracticalTotals::default();
    for load in loads {
        let watts = load.usage.assumed_watts.max(0.0);
        totals.load_count += 1;
        totals.total_watts += watts;
        totals.daily_wh += watts * load.usage.hours_per_day.clamp(0.0, 24.0);

        if !load.motor.is_motor {
            continue;
        }
        totals.motor_count += 1;
        if totals.motor_count == 1 || watts > totals.largest_motor_watts {
            totals.largest_motor_watts = watts;
            totals.largest_motor_lra = load.motor.lra;
        }
        if load.missing_lra() {
            totals.motors_missing_lra += 1;
        } else if let Some(lra) = load.motor.lra {
            totals.max_declared_lra = Some(totals.max_declared_lra.map_or(lra, |m| m.max(lra)));
        }
    }
    totals
}

/// Largest motor-start current the loads need, in amps.
///
/// Motors without a declared LRA are counted at
/// [`LRA_ESTIMATE_MULTIPLIER`] × running amps.
pub fn motor_start_requirement(loads: &[Load], service: &Service) -> f64 {
    loads
        .iter()
        .filter(|l| l.motor.is_motor)
        .map(|l| {
            l.motor
                .lra
                .unwrap_or_else(|| l.running_amps(service) * LRA_ESTIMATE_MULTIPLIER)
        })
        .fold(0.0, f64::max)
}
