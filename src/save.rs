//! Tree Tapper セーブ/ロード機能。
//!
//! ## バージョニング方針
//!
//! - `SAVE_VERSION`: 現在のセーブ形式バージョン。フィールド追加時にインクリメントする。
//! - `MIN_COMPATIBLE_VERSION`: 互換性を維持できる最小バージョン。
//!   新フィールドの追加のみの場合はこの値を変えない（旧データを維持できる）。
//!   既存フィールドの意味変更や削除など破壊的変更を行った場合のみインクリメントする。
//!
//! 旧バージョンのセーブデータは、`MIN_COMPATIBLE_VERSION` 以上であれば
//! 不足フィールドにデフォルト値を補完し、[`migrate`] で整合性を回復して読み込む。
//!
//! 保存先は [`KeyValueStore`] で抽象化する。WASM では localStorage、
//! それ以外（テスト含む）では [`MemoryStore`] を使う。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{find_species, prestige_upgrade, upgrade, DEFAULT_SPECIES_ID};
use crate::error::SaveError;
use crate::lab;
use crate::state::{GameState, TreeStats, MAX_TREE_LEVEL};

/// セーブデータのフォーマットバージョン。
/// v1: ギャンブル通貨のフィールド名が `grow`。v2: `gems` に改名。
pub const SAVE_VERSION: u32 = 2;

/// 互換性を維持できる最小バージョン。
/// 既存フィールドの意味変更や削除など破壊的変更を行った場合のみインクリメントする。
pub const MIN_COMPATIBLE_VERSION: u32 = 1;

/// ストレージのキー。
pub const STORAGE_KEY: &str = "tree_tapper_save";

/// オートセーブの間隔 (ミリ秒)。
pub const AUTOSAVE_INTERVAL_MS: u64 = 30_000;

/// 書き込み用のセーブデータ。状態はコピーせず借用する。
#[derive(Serialize)]
struct SaveDataRef<'a> {
    version: u32,
    game: &'a GameState,
}

/// 読み込み用のセーブデータ。
#[derive(Deserialize)]
struct SaveData {
    version: u32,
    #[serde(default)]
    game: GameState,
}

// ── ストレージ ────────────────────────────────────────────────────────

/// 文字列を格納するキー・バリューストア。
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, SaveError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), SaveError>;
    fn remove(&mut self, key: &str) -> Result<(), SaveError>;
}

/// メモリ上のストア。ネイティブ実行とテスト用。
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 書き込みが常に失敗するストア（エラー経路のテスト用）。
    pub fn failing_writes() -> Self {
        Self {
            entries: BTreeMap::new(),
            fail_writes: true,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, SaveError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SaveError> {
        if self.fail_writes {
            return Err(SaveError::Storage(format!("write to {key} refused")));
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SaveError> {
        self.entries.remove(key);
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> Result<Option<String>, SaveError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SaveError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), SaveError> {
        (**self).remove(key)
    }
}

/// localStorage。WASM 環境でのみ動作。
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    /// localStorage が使えない環境（プライベートモード等）では None。
    pub fn open() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok()??;
        Some(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, SaveError> {
        self.storage
            .get_item(key)
            .map_err(|e| SaveError::Storage(format!("{e:?}")))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SaveError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| SaveError::Storage(format!("{e:?}")))
    }

    fn remove(&mut self, key: &str) -> Result<(), SaveError> {
        self.storage
            .remove_item(key)
            .map_err(|e| SaveError::Storage(format!("{e:?}")))
    }
}

// ── エンコード/デコード ──────────────────────────────────────────────

/// 状態を JSON にする。
pub fn encode(state: &GameState) -> Result<String, SaveError> {
    let data = SaveDataRef {
        version: SAVE_VERSION,
        game: state,
    };
    Ok(serde_json::to_string(&data)?)
}

/// JSON から状態を復元し、[`migrate`] を適用する。
pub fn decode(json: &str) -> Result<GameState, SaveError> {
    let data: SaveData = serde_json::from_str(json)?;
    if data.version < MIN_COMPATIBLE_VERSION {
        return Err(SaveError::IncompatibleVersion {
            saved: data.version,
            min_compatible: MIN_COMPATIBLE_VERSION,
        });
    }
    if data.version < SAVE_VERSION {
        tracing::info!(
            saved = data.version,
            current = SAVE_VERSION,
            "migrating save from an older version"
        );
    }
    let mut game = data.game;
    migrate(&mut game);
    Ok(game)
}

/// 読み込んだ状態の整合性を回復する。何度適用しても結果は同じ。
///
/// - 集計カウンタを、実データから導かれる値以上に補正する
/// - 不明な種・アップグレードのレベルを取り除き、上限でクランプする
/// - デフォルト種の所持、所持種すべての `tree_stats`、有効な現在の種を保証する
/// - 有限でない・負の通貨を 0 にする
pub fn migrate(state: &mut GameState) {
    for species in state.custom_trees.values_mut() {
        lab::sanitize_species(species);
    }
    for value in [
        &mut state.energy,
        &mut state.coins,
        &mut state.seeds,
        &mut state.gems,
        &mut state.total_energy_earned,
    ] {
        if !value.is_finite() || *value < 0.0 {
            *value = 0.0;
        }
    }

    state.upgrade_levels.retain(|id, _| upgrade(id).is_some());
    for (id, level) in state.upgrade_levels.iter_mut() {
        if let Some(def) = upgrade(id) {
            *level = (*level).min(def.max_level);
        }
    }
    state
        .prestige
        .upgrade_levels
        .retain(|id, _| prestige_upgrade(id).is_some());
    for (id, level) in state.prestige.upgrade_levels.iter_mut() {
        if let Some(def) = prestige_upgrade(id) {
            *level = (*level).min(def.max_level);
        }
    }
    state.prestige.total_shards = state.prestige.total_shards.max(state.prestige.shards);

    let purchased: u64 = state.upgrade_levels.values().map(|&l| l as u64).sum();
    state.total_upgrades_purchased = state.total_upgrades_purchased.max(purchased);
    state.total_lab_trees_created = state
        .total_lab_trees_created
        .max(state.custom_trees.len() as u64);

    let custom = &state.custom_trees;
    state
        .unlocked_trees
        .retain(|id| find_species(custom, id).is_some());
    state.unlocked_trees.insert(DEFAULT_SPECIES_ID.to_string());
    for id in &state.unlocked_trees {
        state.tree_stats.entry(id.clone()).or_default();
    }
    for stats in state.tree_stats.values_mut() {
        stats.level = stats.level.clamp(1, MAX_TREE_LEVEL);
        if !stats.height.is_finite() {
            stats.height = TreeStats::default().height;
        }
    }

    if !state.unlocked_trees.contains(&state.current_tree_id) {
        state.current_tree_id = DEFAULT_SPECIES_ID.to_string();
    }
}

// ── ストアとの入出力 ──────────────────────────────────────────────────

/// タイムスタンプを `now_ms` に更新して保存する。
pub fn save_game(
    store: &mut impl KeyValueStore,
    key: &str,
    state: &mut GameState,
    now_ms: u64,
) -> Result<(), SaveError> {
    state.last_save_time = now_ms;
    let json = encode(state)?;
    store.set(key, &json)?;
    tracing::debug!(key, bytes = json.len(), "game saved");
    Ok(())
}

/// 保存済みの状態を読み込む。セーブが無ければ `Ok(None)`。
///
/// 壊れたデータや互換性の無いバージョンは削除して `Ok(None)`（新規ゲーム）。
/// ストア自体の失敗だけがエラーになる。
pub fn load_game(
    store: &mut impl KeyValueStore,
    key: &str,
) -> Result<Option<GameState>, SaveError> {
    let json = match store.get(key)? {
        Some(j) => j,
        None => return Ok(None),
    };
    match decode(&json) {
        Ok(state) => {
            tracing::info!(key, "save loaded");
            Ok(Some(state))
        }
        Err(e) => {
            tracing::warn!(key, error = %e, "discarding unreadable save");
            store.remove(key)?;
            Ok(None)
        }
    }
}

/// 読み込みに失敗したら新規ゲーム。
pub fn load_or_default(store: &mut impl KeyValueStore, key: &str) -> GameState {
    match load_game(store, key) {
        Ok(Some(state)) => state,
        Ok(None) => GameState::new(),
        Err(e) => {
            tracing::warn!(key, error = %e, "storage unavailable, starting a new game");
            GameState::new()
        }
    }
}

/// セーブデータを削除する。
pub fn delete_save(store: &mut impl KeyValueStore, key: &str) -> Result<(), SaveError> {
    store.remove(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Species;
    use crate::state::PrestigeState;

    fn played_state() -> GameState {
        let mut state = GameState::new();
        state.energy = 1234.5;
        state.coins = 99.25;
        state.seeds = 12.0;
        state.gems = 7.0;
        state.total_taps = 420;
        state.total_energy_earned = 8000.0;
        state.total_spins = 3;
        state.upgrade_levels.insert("tap_power".into(), 4);
        state.total_upgrades_purchased = 4;
        state.unlocked_trees.insert("birch".into());
        state.tree_stats.insert(
            "birch".into(),
            TreeStats {
                level: 3,
                xp: 10,
                total_energy: 55.0,
                height: 60.0,
            },
        );
        state.current_tree_id = "birch".into();
        state.completed_quests.insert("first_steps".into());
        state.prestige.shards = 2;
        state.prestige.total_shards = 5;
        state.prestige.prestige_count = 1;
        state.prestige.upgrade_levels.insert("deep_roots".into(), 3);
        state
    }

    #[test]
    fn encode_and_decode_roundtrip() {
        let original = played_state();
        let json = encode(&original).unwrap();
        let restored = decode(&json).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn save_refreshes_timestamp() {
        let mut store = MemoryStore::new();
        let mut state = played_state();
        save_game(&mut store, STORAGE_KEY, &mut state, 1_700_000_000_000).unwrap();
        assert_eq!(state.last_save_time, 1_700_000_000_000);
        let loaded = load_game(&mut store, STORAGE_KEY).unwrap().unwrap();
        assert_eq!(loaded.last_save_time, 1_700_000_000_000);
        assert_eq!(loaded, state);
    }

    #[test]
    fn missing_save_is_none() {
        let mut store = MemoryStore::new();
        assert!(load_game(&mut store, STORAGE_KEY).unwrap().is_none());
        assert_eq!(load_or_default(&mut store, STORAGE_KEY), GameState::new());
    }

    /// v1 のセーブ（`grow` フィールド、prestige 無し）が読み込めることを検証。
    #[test]
    fn migrate_old_version_preserves_compatible_fields() {
        let old_json = r#"{
            "version": 1,
            "game": {
                "energy": 500.0,
                "coins": 40.0,
                "grow": 9.0,
                "total_taps": 77,
                "total_energy_earned": 600.0,
                "current_tree_id": "oak",
                "unlocked_trees": ["oak"],
                "upgrade_levels": {"tap_power": 2, "auto_coin": 1}
            }
        }"#;
        let state = decode(old_json).unwrap();
        assert!((state.gems - 9.0).abs() < 0.001);
        assert!((state.coins - 40.0).abs() < 0.001);
        assert_eq!(state.total_taps, 77);
        // 旧セーブに存在しないフィールドはデフォルト値
        assert_eq!(state.prestige, PrestigeState::default());
        assert!(state.custom_trees.is_empty());
        // 補完されたデータ
        assert_eq!(state.tree_stats["oak"], TreeStats::default());
        assert_eq!(state.total_upgrades_purchased, 3);
    }

    /// MIN_COMPATIBLE_VERSION 未満のバージョンは互換性なしと判定される。
    #[test]
    fn version_below_min_compatible_is_rejected() {
        let json = r#"{"version": 0, "game": {}}"#;
        match decode(json) {
            Err(SaveError::IncompatibleVersion { saved, min_compatible }) => {
                assert_eq!(saved, 0);
                assert_eq!(min_compatible, MIN_COMPATIBLE_VERSION);
            }
            other => panic!("expected IncompatibleVersion, got {other:?}"),
        }
    }

    /// 未知の追加フィールドは無視される。
    #[test]
    fn unknown_fields_in_json_are_ignored() {
        let json = r#"{
            "version": 2,
            "game": {
                "coins": 100.0,
                "future_unknown_field": "should be ignored"
            },
            "also_unknown": 1
        }"#;
        let state = decode(json).unwrap();
        assert!((state.coins - 100.0).abs() < 0.001);
    }

    #[test]
    fn corrupt_save_is_discarded() {
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, "{not json").unwrap();
        assert!(load_game(&mut store, STORAGE_KEY).unwrap().is_none());
        assert!(!store.contains(STORAGE_KEY));
    }

    #[test]
    fn incompatible_save_is_discarded() {
        let mut store = MemoryStore::new();
        store
            .set(STORAGE_KEY, r#"{"version": 0, "game": {}}"#)
            .unwrap();
        assert_eq!(load_or_default(&mut store, STORAGE_KEY), GameState::new());
        assert!(!store.contains(STORAGE_KEY));
    }

    #[test]
    fn failing_store_reports_storage_error() {
        let mut store = MemoryStore::failing_writes();
        let mut state = GameState::new();
        let err = save_game(&mut store, STORAGE_KEY, &mut state, 1).unwrap_err();
        assert!(matches!(err, SaveError::Storage(_)));
    }

    #[test]
    fn migrate_resyncs_stale_counters() {
        let mut state = GameState::new();
        state.upgrade_levels.insert("tap_power".into(), 5);
        state.upgrade_levels.insert("growth_speed".into(), 2);
        state.total_upgrades_purchased = 1;
        let species = Species {
            id: "custom_1".into(),
            name: "Glowbark".into(),
            rarity: crate::catalog::Rarity::Common,
            unlock_cost: 0.0,
            growth_rate: 1.0,
            energy_per_tap: 1.0,
            coin_multiplier: 1.0,
            time_multiplier: 1.0,
            required_quest: None,
        };
        state.custom_trees.insert("custom_1".into(), species);
        state.total_lab_trees_created = 0;

        migrate(&mut state);
        assert_eq!(state.total_upgrades_purchased, 7);
        assert_eq!(state.total_lab_trees_created, 1);

        // Never lowers a counter that is already ahead.
        state.total_upgrades_purchased = 50;
        migrate(&mut state);
        assert_eq!(state.total_upgrades_purchased, 50);
    }

    #[test]
    fn migrate_clamps_custom_multipliers() {
        let mut state = GameState::new();
        let species = Species {
            id: "custom_9".into(),
            name: "Hotwood".into(),
            rarity: crate::catalog::Rarity::Epic,
            unlock_cost: 0.0,
            growth_rate: 1.5,
            energy_per_tap: f64::NAN,
            coin_multiplier: 0.0,
            time_multiplier: 1e9,
            required_quest: None,
        };
        state.custom_trees.insert("custom_9".into(), species);

        migrate(&mut state);
        let s = &state.custom_trees["custom_9"];
        assert_eq!(s.growth_rate, 1.5);
        assert_eq!(s.energy_per_tap, 1.0);
        assert_eq!(s.coin_multiplier, lab::MIN_MULTIPLIER);
        assert_eq!(s.time_multiplier, lab::MAX_MULTIPLIER);
    }

    #[test]
    fn migrate_repairs_dangling_references() {
        let mut state = GameState::new();
        state.unlocked_trees.clear();
        state.unlocked_trees.insert("birch".into());
        state.unlocked_trees.insert("mangrove".into());
        state.tree_stats.clear();
        state.current_tree_id = "mangrove".into();
        state.upgrade_levels.insert("tap_power".into(), 999);
        state.upgrade_levels.insert("laser_axe".into(), 3);
        state.coins = f64::NAN;

        migrate(&mut state);
        assert!(state.is_unlocked(DEFAULT_SPECIES_ID));
        assert!(state.is_unlocked("birch"));
        assert!(!state.is_unlocked("mangrove"));
        assert!(state.tree_stats.contains_key("birch"));
        assert!(state.tree_stats.contains_key(DEFAULT_SPECIES_ID));
        assert_eq!(state.current_tree_id, DEFAULT_SPECIES_ID);
        assert_eq!(state.upgrade_level("tap_power"), 50);
        assert!(!state.upgrade_levels.contains_key("laser_axe"));
        assert_eq!(state.coins, 0.0);
    }

    #[test]
    fn migrate_is_idempotent() {
        let mut once = played_state();
        migrate(&mut once);
        let mut twice = once.clone();
        migrate(&mut twice);
        assert_eq!(once, twice);
    }

    #[test]
    fn custom_species_survive_roundtrip() {
        let mut state = GameState::new();
        let species = Species {
            id: "custom_42".into(),
            name: "Emberleaf".into(),
            rarity: crate::catalog::Rarity::Epic,
            unlock_cost: 0.0,
            growth_rate: 1.4,
            energy_per_tap: 2.1,
            coin_multiplier: 1.2,
            time_multiplier: 1.1,
            required_quest: None,
        };
        state.custom_trees.insert(species.id.clone(), species);
        state.unlocked_trees.insert("custom_42".into());
        state.current_tree_id = "custom_42".into();
        let restored = decode(&encode(&state).unwrap()).unwrap();
        assert_eq!(restored.current_tree_id, "custom_42");
        assert!((restored.current_species().energy_per_tap - 2.1).abs() < 0.001);
        assert!(restored.tree_stats.contains_key("custom_42"));
    }
}
