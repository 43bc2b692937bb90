//! EV charger library.

/// A catalog EV charger with its listed continuous draw and breaker size.
#[derive(Debug, Clone, PartialEq)]
pub struct EvChargerSpec {
    pub id: &'static str,
    pub name: &'static str,
    pub continuous_amps: f64,
    pub breaker_amps: u32,
}

pub const EV_CHARGERS: &[EvChargerSpec] = &[
    EvChargerSpec {
        id: "level2-16a",
        name: "Level 2, 16 A (portable)",
        continuous_amps: 16.0,
        breaker_amps: 20,
    },
    EvChargerSpec {
        id: "level2-24a",
        name: "Level 2, 24 A",
        continuous_amps: 24.0,
        breaker_amps: 30,
    },
    EvChargerSpec {
        id: "level2-32a",
        name: "Level 2, 32 A",
        continuous_amps: 32.0,
        breaker_amps: 40,
    },
    EvChargerSpec {
        id: "level2-40a",
        name: "Level 2, 40 A",
        continuous_amps: 40.0,
        breaker_amps: 50,
    },
    EvChargerSpec {
        id: "tesla-wall-connector-48a",
        name: "Tesla Wall Connector, 48 A",
        continuous_amps: 48.0,
        breaker_amps: 60,
    },
    EvChargerSpec {
        id: "level2-80a",
        name: "Level 2, 80 A (hardwired)",
        continuous_amps: 80.0,
        breaker_amps: 100,
    },
];

/// Looks up a catalog charger by id.
pub fn find_charger(id: &str) -> Option<&'static EvChargerSpec> {
    EV_CHARGERS.iter().find(|c| c.id == id)
}
