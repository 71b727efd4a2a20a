//! Quest definitions and the registry that owns them.
//!
//! The registry starts with the built-in quests. Every synthesized species
//! registers two more (reach level 5, then level 10 on that species).
//! Registration is idempotent so load-time replay can call it freely.

use super::species::{Rarity, Species};

/// What a quest measures. Progress is always computed from state on read.
#[derive(Clone, Debug, PartialEq)]
pub enum Goal {
    TapCount,
    /// Height of the given species, or of the active one when `None`.
    TreeHeight(Option<String>),
    TotalEnergy,
    UnlockSpecies,
    /// Highest level across every species owned.
    TreeLevel,
    SpecificTreeLevel(String),
    RouletteSpins,
    UpgradesPurchased,
    /// Synthesized species, optionally only those of one rarity.
    LabTreesCreated(Option<Rarity>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Objective {
    pub goal: Goal,
    pub target: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct QuestReward {
    pub coins: f64,
    pub seeds: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Quest {
    pub id: String,
    pub name: String,
    pub description: String,
    pub objective: Objective,
    pub reward: QuestReward,
    /// Quest that must be completed before this one is listed.
    pub prerequisite: Option<String>,
}

#[allow(clippy::too_many_arguments)]
fn quest(
    id: &str,
    name: &str,
    description: &str,
    goal: Goal,
    target: f64,
    coins: f64,
    seeds: f64,
    prerequisite: Option<&str>,
) -> Quest {
    Quest {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        objective: Objective { goal, target },
        reward: QuestReward { coins, seeds },
        prerequisite: prerequisite.map(Into::into),
    }
}

fn builtin_quests() -> Vec<Quest> {
    vec![
        quest("first_steps", "First Steps", "Tap 50 times", Goal::TapCount, 50.0, 25.0, 5.0, None),
        quest(
            "busy_fingers",
            "Busy Fingers",
            "Tap 500 times",
            Goal::TapCount,
            500.0,
            150.0,
            15.0,
            Some("first_steps"),
        ),
        quest(
            "tap_master",
            "Tap Master",
            "Tap 5,000 times",
            Goal::TapCount,
            5_000.0,
            1_000.0,
            60.0,
            Some("busy_fingers"),
        ),
        quest(
            "sapling",
            "Sapling",
            "Grow your tree to 100",
            Goal::TreeHeight(None),
            100.0,
            50.0,
            10.0,
            None,
        ),
        quest(
            "grow_tall",
            "Growing Tall",
            "Grow your tree to 500",
            Goal::TreeHeight(None),
            500.0,
            300.0,
            30.0,
            Some("sapling"),
        ),
        quest(
            "energy_novice",
            "Energy Novice",
            "Earn 1,000 energy",
            Goal::TotalEnergy,
            1_000.0,
            100.0,
            15.0,
            None,
        ),
        quest(
            "energy_tycoon",
            "Energy Tycoon",
            "Earn 50,000 energy",
            Goal::TotalEnergy,
            50_000.0,
            2_500.0,
            100.0,
            Some("energy_novice"),
        ),
        quest(
            "collector",
            "Collector",
            "Own 3 species",
            Goal::UnlockSpecies,
            3.0,
            200.0,
            40.0,
            None,
        ),
        quest("level_up", "Level Up", "Reach level 5", Goal::TreeLevel, 5.0, 150.0, 20.0, None),
        quest(
            "seasoned_grower",
            "Seasoned Grower",
            "Reach level 10",
            Goal::TreeLevel,
            10.0,
            800.0,
            50.0,
            Some("level_up"),
        ),
        quest(
            "oak_elder",
            "Oak Elder",
            "Raise the oak to level 15",
            Goal::SpecificTreeLevel("oak".into()),
            15.0,
            1_500.0,
            80.0,
            None,
        ),
        quest(
            "roulette_regular",
            "Roulette Regular",
            "Spin 10 times",
            Goal::RouletteSpins,
            10.0,
            200.0,
            25.0,
            None,
        ),
        quest(
            "upgrade_hoarder",
            "Upgrade Hoarder",
            "Buy 25 upgrades",
            Goal::UpgradesPurchased,
            25.0,
            500.0,
            40.0,
            None,
        ),
        quest(
            "lab_assistant",
            "Lab Assistant",
            "Synthesize a species",
            Goal::LabTreesCreated(None),
            1.0,
            100.0,
            20.0,
            None,
        ),
        quest(
            "rare_breeder",
            "Rare Breeder",
            "Synthesize a rare species",
            Goal::LabTreesCreated(Some(Rarity::Rare)),
            1.0,
            400.0,
            50.0,
            Some("lab_assistant"),
        ),
    ]
}

/// Ids of the two quests derived from a synthesized species.
pub fn species_quest_ids(species_id: &str) -> (String, String) {
    (
        format!("{species_id}_level_5"),
        format!("{species_id}_level_10"),
    )
}

/// Ordered quest table owned by one game instance.
#[derive(Clone, Debug)]
pub struct QuestRegistry {
    quests: Vec<Quest>,
}

impl QuestRegistry {
    /// Registry holding only the built-in quests.
    pub fn new() -> Self {
        Self {
            quests: builtin_quests(),
        }
    }

    /// Add a quest, replacing any existing one with the same id in place.
    pub fn register(&mut self, quest: Quest) {
        match self.quests.iter_mut().find(|q| q.id == quest.id) {
            Some(existing) => *existing = quest,
            None => self.quests.push(quest),
        }
    }

    /// Register the level-5 and level-10 quests for a synthesized species.
    pub fn register_species_quests(&mut self, species: &Species) {
        let (lvl5, lvl10) = species_quest_ids(&species.id);
        self.register(Quest {
            id: lvl5.clone(),
            name: format!("Nurture {}", species.name),
            description: format!("Raise {} to level 5", species.name),
            objective: Objective {
                goal: Goal::SpecificTreeLevel(species.id.clone()),
                target: 5.0,
            },
            reward: QuestReward {
                coins: 200.0,
                seeds: 20.0,
            },
            prerequisite: None,
        });
        self.register(Quest {
            id: lvl10,
            name: format!("Master {}", species.name),
            description: format!("Raise {} to level 10", species.name),
            objective: Objective {
                goal: Goal::SpecificTreeLevel(species.id.clone()),
                target: 10.0,
            },
            reward: QuestReward {
                coins: 800.0,
                seeds: 60.0,
            },
            prerequisite: Some(lvl5),
        });
    }

    pub fn get(&self, id: &str) -> Option<&Quest> {
        self.quests.iter().find(|q| q.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Quest> {
        self.quests.iter()
    }

    pub fn len(&self) -> usize {
        self.quests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quests.is_empty()
    }
}

impl Default for QuestRegistry {
    fn default() -> Self {
        Self::new()
    }
}
