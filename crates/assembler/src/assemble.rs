use wri_model::{
    format_date_time_sortable, unix_time, DecodedReplay, GameTypeBucket, MatchRecord, PlayerStats, StatsRecord,
    Team, UploadRecord, Uploader, WinLoss,
};

use crate::clan_tag::majority_clan_tag;
use crate::match_key::compute_match_key;

pub struct AssembleInput<'a> {
    pub replay: &'a DecodedReplay,
    pub player_stats: &'a [PlayerStats],
    pub win_loss: WinLoss,
    pub uploader_discord_id: String,
    pub object_store_key: String,
    pub file_size_bytes: u64,
    pub uploaded_at_unix: i64,
}

pub struct Assembled {
    pub match_record: MatchRecord,
    pub stats_record: Option<StatsRecord>,
    pub upload_record: UploadRecord,
}

/// Normalizes one decoded+parsed replay into the three persistence records.
/// Does not decide dual-render eligibility or merge against an existing
/// MATCH row -- that is the Persister's conditional-write responsibility
/// (spec.md §4.4), since it requires cross-upload state this function, by
/// design, never sees.
pub fn assemble(input: AssembleInput<'_>) -> Assembled {
    let replay = input.replay;
    let arena_unique_id = replay.arena_unique_id.clone().unwrap_or_default();
    let game_type = GameTypeBucket::from_raw(&replay.game_type);

    let mut ally_names: Vec<String> = vec![replay.own_player.name.clone()];
    ally_names.extend(replay.allies.iter().map(|p| p.name.clone()));
    let enemy_names: Vec<String> = replay.enemies.iter().map(|p| p.name.clone()).collect();

    let mut all_names = ally_names.clone();
    all_names.extend(enemy_names.iter().cloned());
    let match_key = compute_match_key(&replay.date_time, replay.map_id, game_type, &all_names);

    let ally_main_clan_tag = majority_clan_tag(input.player_stats.iter().filter(|p| p.team == Team::Ally));
    let enemy_main_clan_tag = majority_clan_tag(input.player_stats.iter().filter(|p| p.team == Team::Enemy));

    let match_record = MatchRecord {
        arena_unique_id: arena_unique_id.clone(),
        game_type,
        listing_key: "ACTIVE".to_string(),
        unix_time: unix_time(&replay.date_time),
        date_time: replay.date_time.clone(),
        date_time_sortable: format_date_time_sortable(&replay.date_time),
        map_id: replay.map_id,
        map_display_name: replay.map_display_name.clone(),
        client_version: replay.client_version.clone(),
        ally_perspective_player_id: replay.own_player.player_id,
        win_loss: input.win_loss,
        ally_main_clan_tag,
        enemy_main_clan_tag,
        allies: ally_names,
        enemies: enemy_names,
        mp4_s3_key: None,
        mp4_generated_at: None,
        dual_mp4_s3_key: None,
        has_dual_replay: false,
        uploaders: vec![Uploader {
            player_id: replay.own_player.player_id,
            player_name: replay.own_player.name.clone(),
            team: Team::Ally,
        }],
        match_key,
    };

    let stats_record = if replay.has_battle_stats() {
        Some(StatsRecord { arena_unique_id: arena_unique_id.clone(), all_players_stats: input.player_stats.to_vec() })
    } else {
        None
    };

    let own_stats = input.player_stats.iter().find(|p| p.is_own).cloned();
    let upload_record = UploadRecord {
        arena_unique_id,
        player_id: replay.own_player.player_id,
        uploader_discord_id: input.uploader_discord_id,
        object_store_key: input.object_store_key,
        file_size_bytes: input.file_size_bytes,
        uploaded_at_unix: input.uploaded_at_unix,
        own_stats,
    };

    Assembled { match_record, stats_record, upload_record }
}
