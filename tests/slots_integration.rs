mod common;

use common::{ids, panel};
use load_calc::calc::slots::{
    PanelSlotReport, PanelWarning, available_slots, modeled_slots_consumed, validate_panel,
};
use load_calc::model::load::{BreakerType, Load, LoadCategory, Poles};

#[test]
fn overfull_panel_clamps_and_warns() {
    let p = panel(40, 45);
    assert_eq!(available_slots(&p), 0);
    let warnings = validate_panel(&p);
    assert_eq!(warnings.len(), 1);
    assert!(matches!(warnings[0], PanelWarning::UsedExceedsTotal { used: 45, total: 40 }));
    assert_eq!(
        warnings[0].to_string(),
        "Used slots (45) exceed total slots (40)"
    );
}

#[test]
fn every_load_consumes_one_slot_if_tandem_else_its_poles() {
    let mut ids = ids();
    for category in LoadCategory::ALL {
        for poles in [Poles::Single, Poles::Double] {
            for breaker_type in [BreakerType::Standard, BreakerType::Tandem] {
                let mut load = Load::from_category(category, &mut ids);
                load.breaker.poles = poles;
                load.breaker.breaker_type = breaker_type;
                let expected = match breaker_type {
                    BreakerType::Tandem => 1,
                    BreakerType::Standard => poles.count(),
                };
                assert_eq!(modeled_slots_consumed(std::slice::from_ref(&load)), expected);
            }
        }
    }
}

#[test]
fn delta_is_reported_not_reconciled() {
    let mut ids = ids();
    let loads: Vec<Load> = [LoadCategory::RangeOven, LoadCategory::Dryer, LoadCategory::Microwave]
        .into_iter()
        .map(|c| Load::from_category(c, &mut ids))
        .collect();
    let p = panel(30, 2);
    let report = PanelSlotReport::build(&p, &loads);
    assert_eq!(report.modeled_slots_consumed, 5);
    assert_eq!(report.declared_used_slots, 2);
    assert_eq!(report.delta, 3);
    assert_eq!(report.available_slots, 28);
    assert!(report.warnings.is_empty());
}
