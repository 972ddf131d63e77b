use serde::{Deserialize, Serialize};

use crate::game_type::GameTypeBucket;
use crate::stats::{PlayerStats, WinLoss};

/// PK `arenaUniqueID`, SK `"MATCH"`, in table `matches-{gameType}`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchRecord {
    pub arena_unique_id: String,
    pub game_type: GameTypeBucket,
    /// Fixed `"ACTIVE"`; GSI partition key for the by-time listing index.
    pub listing_key: String,
    /// GSI sort key for `(listingKey, unixTime)` and `(mapId, unixTime)`.
    pub unix_time: i64,
    pub date_time: String,
    pub date_time_sortable: String,
    pub map_id: u32,
    pub map_display_name: String,
    pub client_version: String,
    pub ally_perspective_player_id: i64,
    pub win_loss: WinLoss,
    pub ally_main_clan_tag: Option<String>,
    pub enemy_main_clan_tag: Option<String>,
    pub allies: Vec<String>,
    pub enemies: Vec<String>,
    pub mp4_s3_key: Option<String>,
    pub mp4_generated_at: Option<i64>,
    pub dual_mp4_s3_key: Option<String>,
    pub has_dual_replay: bool,
    pub uploaders: Vec<Uploader>,
    pub match_key: String,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Uploader {
    pub player_id: i64,
    pub player_name: String,
    pub team: crate::stats::Team,
}

/// PK `arenaUniqueID`, SK `"STATS"`. Written exactly once.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StatsRecord {
    pub arena_unique_id: String,
    pub all_players_stats: Vec<PlayerStats>,
}

/// PK `arenaUniqueID`, SK `"UPLOAD#"+playerID`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UploadRecord {
    pub arena_unique_id: String,
    pub player_id: i64,
    pub uploader_discord_id: String,
    pub object_store_key: String,
    pub file_size_bytes: u64,
    pub uploaded_at_unix: i64,
    pub own_stats: Option<PlayerStats>,
}
