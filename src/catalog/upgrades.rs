//! Shop upgrades bought with coins. Levels reset on prestige.

/// What a shop upgrade's effect value feeds into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UpgradeKind {
    TapPower,
    GrowthSpeed,
    CoinMultiplier,
    AutoEnergy,
    AutoGrowth,
    AutoCoin,
}

/// Static definition of a leveled shop upgrade.
#[derive(Clone, Debug, PartialEq)]
pub struct UpgradeDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub kind: UpgradeKind,
    pub base_cost: f64,
    /// Cost grows by this factor per level owned.
    pub cost_multiplier: f64,
    /// Effect at level 0.
    pub base_value: f64,
    pub value_per_level: f64,
    pub max_level: u32,
}

/// Full shop catalogue in display order.
pub static UPGRADES: &[UpgradeDef] = &[
    UpgradeDef {
        id: "tap_power",
        name: "Stronger Taps",
        description: "More energy per tap",
        kind: UpgradeKind::TapPower,
        base_cost: 15.0,
        cost_multiplier: 1.5,
        base_value: 1.0,
        value_per_level: 1.0,
        max_level: 50,
    },
    UpgradeDef {
        id: "growth_speed",
        name: "Fertilizer",
        description: "Trees grow taller per tap",
        kind: UpgradeKind::GrowthSpeed,
        base_cost: 25.0,
        cost_multiplier: 1.6,
        base_value: 1.0,
        value_per_level: 0.25,
        max_level: 40,
    },
    UpgradeDef {
        id: "coin_multiplier",
        name: "Golden Leaves",
        description: "Multiplies every coin gain",
        kind: UpgradeKind::CoinMultiplier,
        base_cost: 100.0,
        cost_multiplier: 1.8,
        base_value: 1.0,
        value_per_level: 0.1,
        max_level: 30,
    },
    UpgradeDef {
        id: "auto_energy",
        name: "Sap Collector",
        description: "Produces energy every second",
        kind: UpgradeKind::AutoEnergy,
        base_cost: 50.0,
        cost_multiplier: 1.55,
        base_value: 0.0,
        value_per_level: 0.5,
        max_level: 50,
    },
    UpgradeDef {
        id: "auto_growth",
        name: "Sprinklers",
        description: "The tree grows on its own",
        kind: UpgradeKind::AutoGrowth,
        base_cost: 75.0,
        cost_multiplier: 1.6,
        base_value: 0.0,
        value_per_level: 0.25,
        max_level: 40,
    },
    UpgradeDef {
        id: "auto_coin",
        name: "Leaf Market",
        description: "Earns coins every second",
        kind: UpgradeKind::AutoCoin,
        base_cost: 150.0,
        cost_multiplier: 1.7,
        base_value: 0.0,
        value_per_level: 0.1,
        max_level: 30,
    },
];

pub fn upgrade(id: &str) -> Option<&'static UpgradeDef> {
    UPGRADES.iter().find(|u| u.id == id)
}

pub fn upgrade_by_kind(kind: UpgradeKind) -> &'static UpgradeDef {
    // Every kind has exactly one entry; the table test pins that down.
    UPGRADES
        .iter()
        .find(|u| u.kind == kind)
        .unwrap_or(&UPGRADES[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_one_upgrade() {
        for kind in [
            UpgradeKind::TapPower,
            UpgradeKind::GrowthSpeed,
            UpgradeKind::CoinMultiplier,
            UpgradeKind::AutoEnergy,
            UpgradeKind::AutoGrowth,
            UpgradeKind::AutoCoin,
        ] {
            assert_eq!(UPGRADES.iter().filter(|u| u.kind == kind).count(), 1);
            assert_eq!(upgrade_by_kind(kind).kind, kind);
        }
    }

    #[test]
    fn lookup_by_id() {
        assert_eq!(upgrade("auto_coin").unwrap().kind, UpgradeKind::AutoCoin);
        assert!(upgrade("does_not_exist").is_none());
    }

    #[test]
    fn cost_multipliers_grow() {
        assert!(UPGRADES.iter().all(|u| u.cost_multiplier > 1.0 && u.base_cost > 0.0));
    }
}
