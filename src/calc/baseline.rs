//! The four NEC baseline loads every project carries.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::model::ids::IdSource;
use crate::model::load::{Load, LoadCategory};

pub const BASELINE_LOAD_COUNT: usize = 4;

const BASELINE: [(LoadCategory, &str); BASELINE_LOAD_COUNT] = [
    (LoadCategory::GeneralLighting, "General Lighting"),
    (LoadCategory::SmallAppliance, "Small Appliance Circuit 1"),
    (LoadCategory::SmallAppliance, "Small Appliance Circuit 2"),
    (LoadCategory::Laundry, "Laundry Circuit"),
];

/// Fresh baseline loads. They count toward service demand but are left out
/// of battery sizing.
pub fn baseline_loads(ids: &mut impl IdSource) -> Vec<Load> {
    BASELINE
        .iter()
        .map(|(category, description)| {
            let mut load = Load::from_category(*category, ids).with_description(*description);
            load.is_nec_baseline = true;
            load.usage.include_in_battery_calc = false;
            load
        })
        .collect()
}

/// Returns `loads` with the baseline restored to its expected shape.
///
/// No baseline loads: the four are prepended. More than four: duplicates
/// by description are dropped, first occurrence kept. One to three are
/// treated as deliberate edits and left alone.
pub fn reconcile_baseline(loads: &[Load], ids: &mut impl IdSource) -> Vec<Load> {
    let count = loads.iter().filter(|l| l.is_nec_baseline).count();
    if count == 0 {
        debug!("no baseline loads, regenerating");
        let mut out = baseline_loads(ids);
        out.extend(loads.iter().cloned());
        return out;
    }
    if count <= BASELINE_LOAD_COUNT {
        return loads.to_vec();
    }

    warn!(count, "duplicate baseline loads, removing");
    let mut seen = HashSet::new();
    loads
        .iter()
        .filter(|l| !l.is_nec_baseline || seen.insert(l.description.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ids::SequentialIds;

    #[test]
    fn baseline_shape() {
        let loads = baseline_loads(&mut SequentialIds::default());
        assert_eq!(loads.len(), 4);
        assert!(loads.iter().all(|l| l.is_nec_baseline));
        assert!(loads.iter().all(|l| !l.usage.include_in_battery_calc));
        assert!(loads.iter().all(|l| l.usage.include_in_service_calc));
        assert_eq!(loads[2].description, "Small Appliance Circuit 2");
    }

    #[test]
    fn regenerates_when_missing() {
        let mut ids = SequentialIds::default();
        let existing = vec![Load::from_category(LoadCategory::Dryer, &mut ids)];
        let out = reconcile_baseline(&existing, &mut ids);
        assert_eq!(out.len(), 5);
        assert_eq!(out[0].description, "General Lighting");
        assert_eq!(out[4].category, LoadCategory::Dryer);
        assert_eq!(existing.len(), 1);
    }

    #[test]
    fn partial_baseline_untouched() {
        let mut ids = SequentialIds::default();
        let mut loads = baseline_loads(&mut ids);
        loads.truncate(2);
        assert_eq!(reconcile_baseline(&loads, &mut ids), loads);
    }

    #[test]
    fn duplicates_dropped_keeping_first() {
        let mut ids = SequentialIds::default();
        let mut loads = baseline_loads(&mut ids);
        let first_lighting = loads[0].id;
        loads.push(Load::from_category(LoadCategory::Other, &mut ids));
        loads.extend(baseline_loads(&mut ids));
        let out = reconcile_baseline(&loads, &mut ids);
        assert_eq!(out.len(), 5);
        assert_eq!(out[0].id, first_lighting);
        assert_eq!(out.iter().filter(|l| l.is_nec_baseline).count(), 4);
    }
}
