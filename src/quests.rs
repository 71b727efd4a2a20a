//! Quest objective evaluation and listing.
//!
//! Progress is never stored; it is read off the state each time.

use crate::catalog::{Goal, Objective, Quest, QuestRegistry};
use crate::state::GameState;

/// Current progress toward `objective`, in the objective's own units.
pub fn progress(state: &GameState, objective: &Objective) -> f64 {
    match &objective.goal {
        Goal::TapCount => state.total_taps as f64,
        Goal::TreeHeight(species) => {
            let id = species.as_deref().unwrap_or(&state.current_tree_id);
            state.tree_stats.get(id).map_or(0.0, |s| s.height)
        }
        Goal::TotalEnergy => state.total_energy_earned,
        Goal::UnlockSpecies => state.unlocked_trees.len() as f64,
        Goal::TreeLevel => state
            .tree_stats
            .values()
            .map(|s| s.level)
            .max()
            .unwrap_or(0) as f64,
        Goal::SpecificTreeLevel(id) => state.tree_stats.get(id).map_or(0.0, |s| s.level as f64),
        Goal::RouletteSpins => state.total_spins as f64,
        Goal::UpgradesPurchased => state.total_upgrades_purchased as f64,
        Goal::LabTreesCreated(None) => state.total_lab_trees_created as f64,
        Goal::LabTreesCreated(Some(rarity)) => state
            .custom_trees
            .values()
            .filter(|s| s.rarity == *rarity)
            .count() as f64,
    }
}

pub fn is_completed(state: &GameState, quest: &Quest) -> bool {
    state.completed_quests.contains(&quest.id)
}

/// Objective met and reward not yet taken.
pub fn is_claimable(state: &GameState, quest: &Quest) -> bool {
    !is_completed(state, quest) && progress(state, &quest.objective) >= quest.objective.target
}

/// Prerequisite (if any) already completed.
pub fn is_available(state: &GameState, quest: &Quest) -> bool {
    quest
        .prerequisite
        .as_ref()
        .map_or(true, |pre| state.completed_quests.contains(pre))
}

/// One row of the quest panel.
#[derive(Clone, Debug, PartialEq)]
pub struct QuestView<'a> {
    pub quest: &'a Quest,
    pub progress: f64,
    pub claimable: bool,
    pub completed: bool,
}

impl QuestView<'_> {
    /// Progress as a 0..=1 fraction for progress bars.
    pub fn fraction(&self) -> f64 {
        if self.quest.objective.target <= 0.0 {
            return 1.0;
        }
        (self.progress / self.quest.objective.target).clamp(0.0, 1.0)
    }
}

/// Quests whose prerequisites are met, in registry order.
pub fn available_quests<'a>(state: &GameState, registry: &'a QuestRegistry) -> Vec<QuestView<'a>> {
    registry
        .iter()
        .filter(|q| is_available(state, q))
        .map(|q| QuestView {
            quest: q,
            progress: progress(state, &q.objective),
            claimable: is_claimable(state, q),
            completed: is_completed(state, q),
        })
        .collect()
}

/// Registry for `state`: built-ins plus the quests of every custom species.
pub fn registry_for(state: &GameState) -> QuestRegistry {
    let mut registry = QuestRegistry::new();
    for species in state.custom_trees.values() {
        registry.register_species_quests(species);
    }
    registry
}
