use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{info, warn};
use wri_model::{ClanIndexRow, GameTypeBucket, MatchRecord, PlayerIndexRow, ShipIndexRow, StatsRecord, UploadRecord};

use crate::error::StoreError;
use crate::index_rows::build_index_rows;
use crate::kv::{Item, KeyValueStore};

const MAX_MERGE_ATTEMPTS: u32 = 8;
const INDEX_TABLE_SHIP: &str = "ship-index";
const INDEX_TABLE_PLAYER: &str = "player-index";
const INDEX_TABLE_CLAN: &str = "clan-index";

/// Table name for a game-type bucket's MATCH/STATS/UPLOAD rows. Exposed so
/// callers outside this crate (the Orchestrator) can address the same row
/// for out-of-band operations like the video-update write.
pub fn match_table(game_type: GameTypeBucket) -> String {
    format!("matches-{}", game_type.table_suffix().to_ascii_lowercase())
}

/// What `persist` actually did, so callers (the Orchestrator) can decide
/// whether to emit a render-eligibility event. Reverse indexes are built
/// only on `MatchOutcome::Created` (spec.md §4.4 step 5).
#[derive(Debug, PartialEq, Eq)]
pub enum MatchOutcome {
    Created,
    Merged,
}

pub struct PersistResult {
    pub match_outcome: MatchOutcome,
    pub stats_written: bool,
    /// `true` exactly when this call flipped `hasDualReplay` from `false`
    /// to `true` -- the trigger for enqueuing the dual-render variant
    /// (spec.md §4.5: "invoked only when hasDualReplay flipped for the
    /// first time").
    pub dual_replay_flipped: bool,
}

/// Implements spec.md §4.4's conditional write protocol over a
/// [`KeyValueStore`]. Holds no in-process state of its own -- every call is
/// independently safe to retry, matching the teacher's stateless-handler
/// style in its server crate.
pub struct Persister {
    store: Arc<dyn KeyValueStore>,
}

impl Persister {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn persist(
        &self,
        match_record: &MatchRecord,
        stats: Option<&StatsRecord>,
        upload: &UploadRecord,
    ) -> Result<PersistResult, StoreError> {
        let table = match_table(match_record.game_type);

        let (match_outcome, dual_replay_flipped) = self.write_match(&table, match_record).await?;

        let stats_written = match stats {
            Some(stats) => self.write_stats_once(&table, stats).await?,
            None => false,
        };

        self.write_upload(&table, upload).await?;

        if match_outcome == MatchOutcome::Created {
            self.write_index_rows(match_record, stats).await?;
        }

        Ok(PersistResult { match_outcome, stats_written, dual_replay_flipped })
    }

    /// Step 2: create-or-merge. A brand-new arena creates the row outright;
    /// a second uploader for the same arena merges into `uploaders` and
    /// flips `hasDualReplay`, never dropping an already-recorded uploader.
    async fn write_match(&self, table: &str, incoming: &MatchRecord) -> Result<(MatchOutcome, bool), StoreError> {
        let created = self
            .store
            .put_if_not_exists(
                table,
                Item { pk: incoming.arena_unique_id.clone(), sk: "MATCH".to_string(), value: serde_json::to_value(incoming)? },
            )
            .await?;

        if created {
            info!(arena_unique_id = %incoming.arena_unique_id, "created match record");
            return Ok((MatchOutcome::Created, false));
        }

        let before = self.store.get_item(table, &incoming.arena_unique_id, "MATCH").await?;
        let was_dual = before
            .and_then(|i| serde_json::from_value::<MatchRecord>(i.value).ok())
            .map(|m| m.has_dual_replay)
            .unwrap_or(false);

        let incoming_json = serde_json::to_value(incoming)?;
        let merged = self
            .store
            .conditional_update(
                table,
                &incoming.arena_unique_id,
                "MATCH",
                &move |current: Option<Value>| merge_match(current, &incoming_json),
                MAX_MERGE_ATTEMPTS,
            )
            .await?;
        let merged_record: MatchRecord = serde_json::from_value(merged)?;
        info!(arena_unique_id = %incoming.arena_unique_id, "merged uploader into existing match record");
        Ok((MatchOutcome::Merged, !was_dual && merged_record.has_dual_replay))
    }

    /// Step 3: first-wins. Later uploads of the same arena never overwrite
    /// the stats already on file, even if their own decode produced a
    /// (theoretically identical) `StatsRecord`.
    async fn write_stats_once(&self, table: &str, stats: &StatsRecord) -> Result<bool, StoreError> {
        let created = self
            .store
            .put_if_not_exists(
                table,
                Item { pk: stats.arena_unique_id.clone(), sk: "STATS".to_string(), value: serde_json::to_value(stats)? },
            )
            .await?;
        if !created {
            warn!(arena_unique_id = %stats.arena_unique_id, "stats record already exists, not overwriting");
        }
        Ok(created)
    }

    /// Step 4: unconditional upsert, keyed by the uploading player.
    async fn write_upload(&self, table: &str, upload: &UploadRecord) -> Result<(), StoreError> {
        let sk = format!("UPLOAD#{}", upload.player_id);
        self.store
            .put(table, Item { pk: upload.arena_unique_id.clone(), sk, value: serde_json::to_value(upload)? })
            .await
    }

    /// Step 5: reverse indexes, written only once per arena.
    async fn write_index_rows(&self, match_record: &MatchRecord, stats: Option<&StatsRecord>) -> Result<(), StoreError> {
        let (ships, players, clans) = build_index_rows(match_record, stats);
        for row in ships {
            self.put_ship_row(row).await?;
        }
        for row in players {
            self.put_player_row(row).await?;
        }
        for row in clans {
            self.put_clan_row(row).await?;
        }
        Ok(())
    }

    async fn put_ship_row(&self, row: ShipIndexRow) -> Result<(), StoreError> {
        let sk = row.sort_key.clone();
        self.store.put(INDEX_TABLE_SHIP, Item { pk: row.ship_name.clone(), sk, value: serde_json::to_value(row)? }).await
    }

    async fn put_player_row(&self, row: PlayerIndexRow) -> Result<(), StoreError> {
        let sk = row.sort_key.clone();
        self.store.put(INDEX_TABLE_PLAYER, Item { pk: row.player_name.clone(), sk, value: serde_json::to_value(row)? }).await
    }

    async fn put_clan_row(&self, row: ClanIndexRow) -> Result<(), StoreError> {
        let sk = row.sort_key.clone();
        self.store.put(INDEX_TABLE_CLAN, Item { pk: row.clan_tag.clone(), sk, value: serde_json::to_value(row)? }).await
    }

    /// VideoRenderer's video-update operation (spec.md §4.5): records the
    /// object-storage key for a completed render and the time it finished.
    /// `dual` selects `dualMp4S3Key` over `mp4S3Key`. Never called for a
    /// render that failed -- `RenderFailure` is surfaced by leaving the key
    /// unset, not by writing an error marker onto the MATCH row.
    pub async fn record_render_success(
        &self,
        game_type: GameTypeBucket,
        arena_unique_id: &str,
        s3_key: &str,
        generated_at_unix: i64,
        dual: bool,
    ) -> Result<(), StoreError> {
        let table = match_table(game_type);
        let key = s3_key.to_string();
        self.store
            .conditional_update(
                &table,
                arena_unique_id,
                "MATCH",
                &move |current: Option<Value>| {
                    let Some(current) = current else { return Value::Null };
                    let Ok(mut record) = serde_json::from_value::<MatchRecord>(current.clone()) else { return current };
                    if dual {
                        record.dual_mp4_s3_key = Some(key.clone());
                    } else {
                        record.mp4_s3_key = Some(key.clone());
                    }
                    record.mp4_generated_at = Some(generated_at_unix);
                    json!(record)
                },
                MAX_MERGE_ATTEMPTS,
            )
            .await?;
        Ok(())
    }
}

/// Merges a freshly-decoded upload's view of a match into whatever is
/// already stored. `current` is `None` only in the narrow race where the
/// row was deleted between the failed `put_if_not_exists` and this read --
/// treated the same as "nothing to merge into", so the incoming record
/// simply becomes the row.
fn merge_match(current: Option<Value>, incoming: &Value) -> Value {
    let Some(current) = current else {
        return incoming.clone();
    };
    let Ok(mut existing) = serde_json::from_value::<MatchRecord>(current.clone()) else {
        return incoming.clone();
    };
    let Ok(incoming_record) = serde_json::from_value::<MatchRecord>(incoming.clone()) else {
        return current;
    };

    // Every uploader's own replay is self-centric: `assemble()` always
    // records its uploader as `Team::Ally` relative to *that* replay.
    // The already-established roster (first upload wins) is the only
    // canonical frame, so a merging uploader's real side is resolved by
    // checking which of the existing record's name lists they fall in.
    for uploader in incoming_record.uploaders {
        if existing.uploaders.iter().any(|u| u.player_id == uploader.player_id) {
            continue;
        }
        let resolved_team = if existing.enemies.contains(&uploader.player_name) { wri_model::Team::Enemy } else { wri_model::Team::Ally };
        existing.uploaders.push(wri_model::Uploader { team: resolved_team, ..uploader });
    }
    existing.has_dual_replay = existing.uploaders.iter().any(|u| u.team == wri_model::Team::Ally)
        && existing.uploaders.iter().any(|u| u.team == wri_model::Team::Enemy);
    json!(existing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;
    use wri_model::{Team, WinLoss};

    fn base_match(arena: &str, player_id: i64, player_name: &str) -> MatchRecord {
        MatchRecord {
            arena_unique_id: arena.to_string(),
            game_type: GameTypeBucket::Clan,
            listing_key: "ACTIVE".to_string(),
            unix_time: 1700,
            date_time: "03.01.2026 23:28:22".to_string(),
            date_time_sortable: "20260103232822".to_string(),
            map_id: 19,
            map_display_name: "Fault Line".to_string(),
            client_version: "14.11.0".to_string(),
            ally_perspective_player_id: player_id,
            win_loss: WinLoss::Win,
            ally_main_clan_tag: None,
            enemy_main_clan_tag: None,
            allies: vec![player_name.to_string()],
            enemies: vec!["enemy".to_string()],
            mp4_s3_key: None,
            mp4_generated_at: None,
            dual_mp4_s3_key: None,
            has_dual_replay: false,
            uploaders: vec![wri_model::Uploader { player_id, player_name: player_name.to_string(), team: Team::Ally }],
            match_key: "k".to_string(),
        }
    }

    fn upload_for(arena: &str, player_id: i64) -> UploadRecord {
        UploadRecord {
            arena_unique_id: arena.to_string(),
            player_id,
            uploader_discord_id: "discord#1".to_string(),
            object_store_key: format!("replays/{}/a.wowsreplay", player_id),
            file_size_bytes: 100,
            uploaded_at_unix: 1700,
            own_stats: None,
        }
    }

    #[tokio::test]
    async fn first_upload_creates_match_and_writes_indexes() {
        let store = Arc::new(InMemoryStore::new());
        let persister = Persister::new(store.clone());
        let m = base_match("arena-1", 1, "own");
        let result = persister.persist(&m, None, &upload_for("arena-1", 1)).await.unwrap();
        assert_eq!(result.match_outcome, MatchOutcome::Created);

        let table = match_table(GameTypeBucket::Clan);
        let row = store.get_item(&table, "arena-1", "MATCH").await.unwrap().unwrap();
        let stored: MatchRecord = serde_json::from_value(row.value).unwrap();
        assert_eq!(stored.uploaders.len(), 1);
        assert!(!stored.has_dual_replay);
    }

    #[tokio::test]
    async fn second_upload_merges_uploaders_and_flips_dual_flag() {
        let store = Arc::new(InMemoryStore::new());
        let persister = Persister::new(store.clone());
        let first = base_match("arena-2", 1, "own");
        persister.persist(&first, None, &upload_for("arena-2", 1)).await.unwrap();

        let mut second = base_match("arena-2", 2, "enemy");
        second.uploaders = vec![wri_model::Uploader { player_id: 2, player_name: "enemy".to_string(), team: Team::Ally }];
        let result = persister.persist(&second, None, &upload_for("arena-2", 2)).await.unwrap();
        assert_eq!(result.match_outcome, MatchOutcome::Merged);

        let table = match_table(GameTypeBucket::Clan);
        let row = store.get_item(&table, "arena-2", "MATCH").await.unwrap().unwrap();
        let stored: MatchRecord = serde_json::from_value(row.value).unwrap();
        assert_eq!(stored.uploaders.len(), 2);
        assert!(stored.has_dual_replay);
    }

    #[tokio::test]
    async fn stats_are_never_overwritten_by_a_later_upload() {
        let store = Arc::new(InMemoryStore::new());
        let persister = Persister::new(store.clone());
        let m = base_match("arena-3", 1, "own");
        let mut stats_a = StatsRecord { arena_unique_id: "arena-3".to_string(), all_players_stats: vec![] };
        persister.persist(&m, Some(&stats_a), &upload_for("arena-3", 1)).await.unwrap();

        stats_a.all_players_stats.push(wri_model::PlayerStats {
            player_id: 99,
            player_name: "ghost".to_string(),
            clan_tag: None,
            team: Team::Ally,
            is_own: false,
            ship_id: 0,
            ship_name: "Yamato".to_string(),
            ship_class: wri_model::ShipClass::Battleship,
            damage: 0.0,
            damage_breakdown: Default::default(),
            spotting_damage: 0.0,
            potential_damage: 0.0,
            received_damage: 0.0,
            hits: Default::default(),
            fires_caused: 0,
            floods_caused: 0,
            citadels: 0,
            crits: 0,
            kills: 0,
            base_xp: 0,
            captain_skills: vec![],
            upgrades: vec![],
            ship_components: vec![],
        });
        let second = base_match("arena-3", 2, "enemy");
        let result = persister.persist(&second, Some(&stats_a), &upload_for("arena-3", 2)).await.unwrap();
        assert!(!result.stats_written);

        let table = match_table(GameTypeBucket::Clan);
        let row = store.get_item(&table, "arena-3", "STATS").await.unwrap().unwrap();
        let stored: StatsRecord = serde_json::from_value(row.value).unwrap();
        assert!(stored.all_players_stats.is_empty(), "first-written stats must survive untouched");
    }

    #[tokio::test]
    async fn indexes_are_written_only_on_the_created_branch() {
        let store = Arc::new(InMemoryStore::new());
        let persister = Persister::new(store.clone());
        let m = base_match("arena-4", 1, "own");
        let stats = StatsRecord {
            arena_unique_id: "arena-4".to_string(),
            all_players_stats: vec![wri_model::PlayerStats {
                player_id: 1,
                player_name: "own".to_string(),
                clan_tag: Some("OZEKI".to_string()),
                team: Team::Ally,
                is_own: true,
                ship_id: 1,
                ship_name: "Des Moines".to_string(),
                ship_class: wri_model::ShipClass::Cruiser,
                damage: 0.0,
                damage_breakdown: Default::default(),
                spotting_damage: 0.0,
                potential_damage: 0.0,
                received_damage: 0.0,
                hits: Default::default(),
                fires_caused: 0,
                floods_caused: 0,
                citadels: 0,
                crits: 0,
                kills: 0,
                base_xp: 0,
                captain_skills: vec![],
                upgrades: vec![],
                ship_components: vec![],
            }],
        };
        persister.persist(&m, Some(&stats), &upload_for("arena-4", 1)).await.unwrap();
        let ship_rows = store.list_by_pk(INDEX_TABLE_SHIP, "Des Moines").await.unwrap();
        assert_eq!(ship_rows.len(), 1);

        let second = base_match("arena-4", 2, "enemy");
        persister.persist(&second, Some(&stats), &upload_for("arena-4", 2)).await.unwrap();
        let ship_rows_after_merge = store.list_by_pk(INDEX_TABLE_SHIP, "Des Moines").await.unwrap();
        assert_eq!(ship_rows_after_merge.len(), 1, "merge branch must not recompute indexes");
    }
}
