//! Balance simulator for Tree Tapper.
//! Run with: cargo test simulate_ -- --nocapture

#[cfg(test)]
mod tests {
    use crate::catalog::{builtin_species, QuestRegistry, UPGRADES};
    use crate::formula::upgrade_cost;
    use crate::income::IncomeScheduler;
    use crate::logic;
    use crate::quests;
    use crate::rates;
    use crate::state::GameState;

    /// Cheapest affordable shop upgrade.
    fn cheapest_upgrade(state: &GameState) -> Option<&'static str> {
        UPGRADES
            .iter()
            .filter_map(|u| upgrade_cost(u, state.upgrade_level(u.id)).map(|c| (c, u.id)))
            .filter(|(cost, _)| *cost <= state.coins)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, id)| id)
    }

    /// Claim everything claimable. Returns how many quests were claimed.
    fn claim_all(state: &mut GameState, registry: &QuestRegistry) -> u32 {
        let ids: Vec<String> = quests::available_quests(state, registry)
            .into_iter()
            .filter(|v| v.claimable)
            .map(|v| v.quest.id.clone())
            .collect();
        ids.iter()
            .filter(|id| logic::claim_quest_reward(state, registry, id))
            .count() as u32
    }

    /// Unlock the next built-in species if possible and move onto it.
    fn grow_collection(state: &mut GameState) -> bool {
        let next = builtin_species()
            .iter()
            .find(|s| logic::can_unlock_tree(state, &s.id))
            .map(|s| s.id.clone());
        match next {
            Some(id) if logic::unlock_tree(state, &id) => logic::switch_tree(state, &id),
            _ => false,
        }
    }

    fn report_stats(state: &GameState, seconds: u32, purchases: u32) {
        eprintln!("┌─── {}分{}秒 ─────────────────────────", seconds / 60, seconds % 60);
        eprintln!(
            "│ Energy: {:.0}  Coins: {:.1}  Seeds: {:.0}  Gems: {:.0}",
            state.energy, state.coins, state.seeds, state.gems
        );
        eprintln!(
            "│ 今回の獲得エネルギー: {:.0}  タップ: {}  購入: {}",
            state.total_energy_earned, state.total_taps, purchases
        );
        eprintln!(
            "│ 木: {} Lv{}  タップ毎エネルギー: {:.2}  自動: {:.2}/s",
            state.current_tree_id,
            state.current_stats().level,
            rates::energy_per_tap(state),
            rates::auto_energy_per_tick(state) * rates::time_multiplier(state),
        );
        eprintln!(
            "│ 転生: {}回  シャード: {} (累計 {})  クエスト: {}",
            state.prestige.prestige_count,
            state.prestige.shards,
            state.prestige.total_shards,
            state.completed_quests.len()
        );
        eprintln!("└────────────────────────────────────");
    }

    struct Summary {
        state: GameState,
        lifetime_energy: f64,
        quests_claimed: u32,
    }

    /// Simulate a greedy player for `total_seconds`.
    fn simulate(total_seconds: u32) -> Summary {
        let mut state = GameState::new();
        let mut registry = QuestRegistry::new();
        let mut income = IncomeScheduler::for_state(&state);
        let taps_per_second = 5;

        let mut purchases = 0u32;
        let mut quests_claimed = 0u32;
        let mut banked_energy = 0.0;
        let report_times = [60, 300, 600, 900, 1200, 1800, 2700, 3600];
        let mut next_report = 0;

        eprintln!("\n========================================");
        eprintln!("  Tree Tapper バランスシミュレーター");
        eprintln!("  プレイ時間: {}分", total_seconds / 60);
        eprintln!("========================================\n");

        for second in 1..=total_seconds {
            let before = state.total_energy_earned;
            for _ in 0..taps_per_second {
                logic::tap(&mut state);
            }
            income.advance(&mut state, 1000.0);
            assert!(state.total_energy_earned >= before, "lifetime energy dropped");

            quests_claimed += claim_all(&mut state, &registry);
            for _ in 0..20 {
                match cheapest_upgrade(&state) {
                    Some(id) if logic::buy_upgrade(&mut state, id) => purchases += 1,
                    _ => break,
                }
            }
            grow_collection(&mut state);

            let target_shards = 3 + 2 * state.prestige.prestige_count as u64;
            if logic::pending_shards(&state) >= target_shards {
                banked_energy += state.total_energy_earned;
                logic::perform_prestige(&mut state);
                registry = quests::registry_for(&state);
                for def in crate::catalog::PRESTIGE_UPGRADES.iter() {
                    while logic::buy_prestige_upgrade(&mut state, def.id) {}
                }
                eprintln!("★ {}秒: 転生 #{}", second, state.prestige.prestige_count);
            }
            income.sync(&state);

            assert!(state.coins >= 0.0, "coins went negative at {second}s");
            assert!(state.seeds >= 0.0, "seeds went negative at {second}s");

            if next_report < report_times.len() && second >= report_times[next_report] {
                report_stats(&state, second, purchases);
                next_report += 1;
            }
        }

        eprintln!("\n======== 最終サマリー ========");
        report_stats(&state, total_seconds, purchases);

        Summary {
            lifetime_energy: banked_energy + state.total_energy_earned,
            state,
            quests_claimed,
        }
    }

    #[test]
    fn simulate_optimal_30min() {
        let summary = simulate(1800);
        assert!(summary.state.prestige.prestige_count >= 1);
        // Every tap yields at least one energy.
        assert!(summary.lifetime_energy >= 5.0 * 1800.0);
        assert!(summary.quests_claimed >= 3);
    }

    #[test]
    fn simulate_optimal_1hour() {
        let summary = simulate(3600);
        let prestige = &summary.state.prestige;
        assert!(prestige.total_shards >= prestige.shards);
        assert!(prestige.prestige_count >= 1);
    }
}
