//! Permanent upgrades bought with prestige shards. Survive every reset.

/// Which derived rate a prestige upgrade adds to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BonusKind {
    /// Multiplicative `(1 + bonus)` on tap power.
    Tap,
    /// Multiplicative `(1 + bonus)` on every energy gain.
    Energy,
    /// Multiplicative `(1 + bonus)` on growth speed.
    Growth,
    /// Multiplicative `(1 + bonus)` on the coin multiplier.
    Coin,
    /// Flat addition to the auto-energy rate.
    AutoEnergy,
    /// Flat addition to the auto-growth rate.
    AutoGrowth,
    /// Flat addition to the auto-coin rate.
    AutoCoin,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PrestigeUpgradeDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub bonus: BonusKind,
    pub base_cost: u64,
    /// Linear cost step per level owned.
    pub cost_increase: u64,
    pub value_per_level: f64,
    pub max_level: u32,
}

pub static PRESTIGE_UPGRADES: &[PrestigeUpgradeDef] = &[
    PrestigeUpgradeDef {
        id: "deep_roots",
        name: "Deep Roots",
        description: "+10% tap power per level",
        bonus: BonusKind::Tap,
        base_cost: 1,
        cost_increase: 1,
        value_per_level: 0.10,
        max_level: 25,
    },
    PrestigeUpgradeDef {
        id: "ancient_sap",
        name: "Ancient Sap",
        description: "+10% energy from every source",
        bonus: BonusKind::Energy,
        base_cost: 2,
        cost_increase: 1,
        value_per_level: 0.10,
        max_level: 25,
    },
    PrestigeUpgradeDef {
        id: "eternal_spring",
        name: "Eternal Spring",
        description: "+15% growth speed per level",
        bonus: BonusKind::Growth,
        base_cost: 1,
        cost_increase: 1,
        value_per_level: 0.15,
        max_level: 20,
    },
    PrestigeUpgradeDef {
        id: "gilded_bark",
        name: "Gilded Bark",
        description: "+10% coin multiplier per level",
        bonus: BonusKind::Coin,
        base_cost: 2,
        cost_increase: 2,
        value_per_level: 0.10,
        max_level: 20,
    },
    PrestigeUpgradeDef {
        id: "sap_wells",
        name: "Sap Wells",
        description: "+1 auto-energy per second per level",
        bonus: BonusKind::AutoEnergy,
        base_cost: 3,
        cost_increase: 2,
        value_per_level: 1.0,
        max_level: 20,
    },
    PrestigeUpgradeDef {
        id: "root_network",
        name: "Root Network",
        description: "+0.5 auto-growth per second per level",
        bonus: BonusKind::AutoGrowth,
        base_cost: 3,
        cost_increase: 2,
        value_per_level: 0.5,
        max_level: 20,
    },
    PrestigeUpgradeDef {
        id: "leaf_bank",
        name: "Leaf Bank",
        description: "+0.2 auto-coins per second per level",
        bonus: BonusKind::AutoCoin,
        base_cost: 3,
        cost_increase: 2,
        value_per_level: 0.2,
        max_level: 20,
    },
];

pub fn prestige_upgrade(id: &str) -> Option<&'static PrestigeUpgradeDef> {
    PRESTIGE_UPGRADES.iter().find(|u| u.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_id() {
        assert_eq!(prestige_upgrade("sap_wells").unwrap().bonus, BonusKind::AutoEnergy);
        assert!(prestige_upgrade("unknown").is_none());
    }

    #[test]
    fn costs_are_positive() {
        assert!(PRESTIGE_UPGRADES.iter().all(|u| u.base_cost > 0 && u.max_level > 0));
    }
}
