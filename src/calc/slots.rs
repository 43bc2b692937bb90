//! Panel slot accounting: available and tandem-capable slots from the panel
//! declaration, consumed slots modeled from the load list.

use std::fmt;

use serde::Serialize;
use tracing::warn;

use crate::model::load::Load;
use crate::model::panel::{Panel, TandemPositions, TandemsAllowed};

/// Non-fatal inconsistency in the declared panel figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PanelWarning {
    UsedExceedsTotal { used: u32, total: u32 },
    TandemsExceedCapacity { used: u32, capable: u32 },
    TandemsNotPermitted { used: u32 },
}

impl fmt::Display for PanelWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelWarning::UsedExceedsTotal { used, total } => {
                write!(f, "Used slots ({used}) exceed total slots ({total})")
            }
            PanelWarning::TandemsExceedCapacity { used, capable } => write!(
                f,
                "Tandem slots used ({used}) exceed tandem-capable slots ({capable})"
            ),
            PanelWarning::TandemsNotPermitted { used } => write!(
                f,
                "{used} tandem slot(s) in use but the panel does not list tandems as allowed"
            ),
        }
    }
}

/// Slots in the panel that accept tandem breakers.
pub fn tandem_capable_slots(panel: &Panel) -> u32 {
    if panel.tandems_allowed != TandemsAllowed::Allowed {
        return 0;
    }
    match panel.tandem_policy.allowed_positions {
        TandemPositions::AllSlots => panel.total_slots,
        TandemPositions::BottomHalfOnly => panel.total_slots / 2,
        TandemPositions::Custom => panel.tandem_policy.custom_max_tandem_slots.unwrap_or(0),
    }
}

/// Open slots according to the installer's declaration, never negative.
pub fn available_slots(panel: &Panel) -> u32 {
    panel
        .total_slots
        .saturating_sub(panel.used_slots.saturating_add(panel.tandem_slots_used))
}

/// Slots the load list implies are in use.
pub fn modeled_slots_consumed(loads: &[Load]) -> u32 {
    loads.iter().map(Load::slots_consumed).sum()
}

/// Tandem breakers in the load list.
pub fn modeled_tandem_slots(loads: &[Load]) -> u32 {
    loads.iter().filter(|l| l.is_tandem()).count() as u32
}

/// Checks the declared figures for internal consistency.
pub fn validate_panel(panel: &Panel) -> Vec<PanelWarning> {
    let mut warnings = Vec::new();
    if panel.used_slots > panel.total_slots {
        warnings.push(PanelWarning::UsedExceedsTotal {
            used: panel.used_slots,
            total: panel.total_slots,
        });
    }
    if panel.tandem_slots_used > 0 {
        if panel.tandems_allowed == TandemsAllowed::Allowed {
            let capable = tandem_capable_slots(panel);
            if panel.tandem_slots_used > capable {
                warnings.push(PanelWarning::TandemsExceedCapacity {
                    used: panel.tandem_slots_used,
                    capable,
                });
            }
        } else {
            warnings.push(PanelWarning::TandemsNotPermitted {
                used: panel.tandem_slots_used,
            });
        }
    }
    warnings
}

/// Declared and modeled slot usage side by side.
#[derive(Debug, Clone, Serialize)]
pub struct PanelSlotReport {
    pub total_slots: u32,
    pub declared_used_slots: u32,
    pub declared_tandem_slots: u32,
    pub available_slots: u32,
    pub tandem_capable_slots: u32,
    pub modeled_slots_consumed: u32,
    /// `modeled - declared`; positive when the load list implies more breakers
    /// than were counted on site. Reported, never reconciled.
    pub delta: i64,
    pub warnings: Vec<PanelWarning>,
}

impl PanelSlotReport {
    pub fn build(panel: &Panel, loads: &[Load]) -> Self {
        let modeled = modeled_slots_consumed(loads);
        let warnings = validate_panel(panel);
        for w in &warnings {
            warn!(warning = %w, "panel configuration inconsistency");
        }
        Self {
            total_slots: panel.total_slots,
            declared_used_slots: panel.used_slots,
            declared_tandem_slots: panel.tandem_slots_used,
            available_slots: available_slots(panel),
            tandem_capable_slots: tandem_capable_slots(panel),
            modeled_slots_consumed: modeled,
            delta: i64::from(modeled) - i64::from(panel.used_slots),
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ids::SequentialIds;
    use crate::model::load::{BreakerType, LoadCategory};
    use crate::model::panel::TandemPolicy;

    fn panel(total: u32, used: u32, tandem: u32) -> Panel {
        Panel {
            total_slots: total,
            used_slots: used,
            tandem_slots_used: tandem,
            tandems_allowed: TandemsAllowed::Allowed,
            tandem_policy: TandemPolicy::default(),
        }
    }

    #[test]
    fn tandem_capacity_by_policy() {
        let mut p = panel(40, 0, 0);
        assert_eq!(tandem_capable_slots(&p), 40);
        p.tandem_policy.allowed_positions = TandemPositions::BottomHalfOnly;
        assert_eq!(tandem_capable_slots(&p), 20);
        p.total_slots = 41;
        assert_eq!(tandem_capable_slots(&p), 20);
        p.tandem_policy.allowed_positions = TandemPositions::Custom;
        assert_eq!(tandem_capable_slots(&p), 0);
        p.tandem_policy.custom_max_tandem_slots = Some(8);
        assert_eq!(tandem_capable_slots(&p), 8);
        p.tandems_allowed = TandemsAllowed::Unknown;
        assert_eq!(tandem_capable_slots(&p), 0);
        p.tandems_allowed = TandemsAllowed::NotAllowed;
        assert_eq!(tandem_capable_slots(&p), 0);
    }

    #[test]
    fn available_slots_never_negative() {
        assert_eq!(available_slots(&panel(40, 30, 4)), 6);
        assert_eq!(available_slots(&panel(40, 45, 0)), 0);
        assert_eq!(available_slots(&panel(0, u32::MAX, u32::MAX)), 0);
    }

    #[test]
    fn overfull_panel_warns() {
        let warnings = validate_panel(&panel(40, 45, 0));
        assert_eq!(
            warnings,
            vec![PanelWarning::UsedExceedsTotal {
                used: 45,
                total: 40
            }]
        );
    }

    #[test]
    fn tandem_warnings() {
        let mut p = panel(40, 10, 6);
        p.tandem_policy.allowed_positions = TandemPositions::Custom;
        p.tandem_policy.custom_max_tandem_slots = Some(4);
        assert!(
            validate_panel(&p).contains(&PanelWarning::TandemsExceedCapacity {
                used: 6,
                capable: 4
            })
        );

        p.tandems_allowed = TandemsAllowed::Unknown;
        assert_eq!(
            validate_panel(&p),
            vec![PanelWarning::TandemsNotPermitted { used: 6 }]
        );
    }

    #[test]
    fn modeled_consumption_and_delta() {
        let mut ids = SequentialIds::default();
        let mut tandem = Load::from_category(LoadCategory::Other, &mut ids);
        tandem.set_breaker_type(BreakerType::Tandem);
        let loads = vec![
            Load::from_category(LoadCategory::Dryer, &mut ids),
            Load::from_category(LoadCategory::Microwave, &mut ids),
            tandem,
        ];
        assert_eq!(modeled_slots_consumed(&loads), 4);
        assert_eq!(modeled_tandem_slots(&loads), 1);

        let report = PanelSlotReport::build(&panel(40, 10, 0), &loads);
        assert_eq!(report.modeled_slots_consumed, 4);
        assert_eq!(report.delta, -6);
        assert_eq!(report.available_slots, 30);
    }
}
