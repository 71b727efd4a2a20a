//! Static game data: species, shop upgrades, prestige upgrades and quests.
//!
//! Built-in tables never change at runtime. The only dynamic part is the
//! [`quests::QuestRegistry`], which gains two quests per synthesized species.

pub mod prestige;
pub mod quests;
pub mod species;
pub mod upgrades;

pub use prestige::{prestige_upgrade, BonusKind, PrestigeUpgradeDef, PRESTIGE_UPGRADES};
pub use quests::{Goal, Objective, Quest, QuestRegistry, QuestReward};
pub use species::{builtin_species, find_species, Rarity, Species, DEFAULT_SPECIES_ID};
pub use upgrades::{upgrade, upgrade_by_kind, UpgradeDef, UpgradeKind, UPGRADES};
