use serde::{Deserialize, Serialize};

use crate::game_type::GameTypeBucket;
use crate::stats::Team;

/// Sort key shape shared by all three reverse indexes: monotonic by time
/// within a dimension value, so range queries need no post-sort.
pub fn index_sort_key(game_type: GameTypeBucket, unix_time: i64, arena_unique_id: &str) -> String {
    format!("{}#{}#{}", game_type.table_suffix(), unix_time, arena_unique_id)
}

/// PK `shipName`, SK `index_sort_key(..)`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShipIndexRow {
    pub ship_name: String,
    pub sort_key: String,
    pub arena_unique_id: String,
    pub ally_count: u32,
    pub enemy_count: u32,
    pub total_count: u32,
}

/// PK `playerName`, SK `index_sort_key(..)`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerIndexRow {
    pub player_name: String,
    pub sort_key: String,
    pub arena_unique_id: String,
    pub team: Team,
    pub clan_tag: Option<String>,
    pub ship_name: String,
}

/// PK `clanTag`, SK `index_sort_key(..)`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClanIndexRow {
    pub clan_tag: String,
    pub sort_key: String,
    pub arena_unique_id: String,
    pub team: Team,
    pub member_count: u32,
    pub is_main_clan: bool,
}
