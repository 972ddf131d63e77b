use serde::{Deserialize, Serialize};
use wri_model::{GameTypeBucket, MatchRecord, StatsRecord, Team, UploadRecord};

use crate::error::ApiError;
use crate::state::AppState;

const DEFAULT_LIMIT: usize = 30;

#[derive(Debug, Default, Deserialize)]
pub struct SearchFilters {
    pub game_type: Option<GameTypeBucket>,
    pub map_id: Option<u32>,
    pub ally_clan_tag: Option<String>,
    pub enemy_clan_tag: Option<String>,
    pub ship_name: Option<String>,
    pub ship_team: Option<Team>,
    pub ship_min_count: Option<u32>,
    pub player_name: Option<String>,
    pub win_loss: Option<wri_model::WinLoss>,
    pub date_from: Option<i64>,
    pub date_to: Option<i64>,
    pub cursor_unix_time: Option<i64>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub items: Vec<MatchRecord>,
    pub count: usize,
    pub cursor_unix_time: Option<i64>,
    pub has_more: bool,
}

/// Which GSI/reverse-index this search routes through, chosen by the most
/// selective filter present (spec.md §4.7). Remaining filters in
/// [`SearchFilters`] always apply afterwards as in-memory predicates over
/// whatever the chosen index already narrowed down.
#[derive(Debug, Eq, PartialEq)]
enum SearchStrategy {
    ShipIndex,
    PlayerIndex,
    ClanIndex,
    MatchTable,
}

fn choose_strategy(filters: &SearchFilters) -> SearchStrategy {
    if filters.ship_name.is_some() {
        SearchStrategy::ShipIndex
    } else if filters.player_name.is_some() {
        SearchStrategy::PlayerIndex
    } else if filters.ally_clan_tag.is_some() || filters.enemy_clan_tag.is_some() {
        SearchStrategy::ClanIndex
    } else {
        SearchStrategy::MatchTable
    }
}

/// Implements the §4.7 search contract: route to the most selective
/// reverse index, then apply the rest of the filter set as predicates over
/// that candidate set, then page on `unixTime`.
pub async fn search(state: &AppState, filters: SearchFilters) -> Result<SearchResponse, ApiError> {
    let limit = filters.limit.unwrap_or(DEFAULT_LIMIT);
    let game_type = filters.game_type.unwrap_or(GameTypeBucket::Random);
    let table = wri_store::match_table(game_type);

    let arena_ids = match choose_strategy(&filters) {
        SearchStrategy::ShipIndex => {
            let ship_name = filters.ship_name.clone().unwrap();
            let rows = state.store.list_by_pk("ship-index", &ship_name).await.map_err(|e| ApiError::Internal(e.to_string()))?;
            rows.into_iter()
                .filter_map(|r| serde_json::from_value::<wri_model::ShipIndexRow>(r.value).ok())
                .filter(|r| filters.ship_min_count.map(|min| r.total_count >= min).unwrap_or(true))
                .filter(|r| match filters.ship_team {
                    Some(Team::Ally) => r.ally_count > 0,
                    Some(Team::Enemy) => r.enemy_count > 0,
                    None => true,
                })
                .map(|r| r.arena_unique_id)
                .collect::<Vec<_>>()
        }
        SearchStrategy::PlayerIndex => {
            let player_name = filters.player_name.clone().unwrap();
            let rows = state.store.list_by_pk("player-index", &player_name).await.map_err(|e| ApiError::Internal(e.to_string()))?;
            rows.into_iter()
                .filter_map(|r| serde_json::from_value::<wri_model::PlayerIndexRow>(r.value).ok())
                .map(|r| r.arena_unique_id)
                .collect::<Vec<_>>()
        }
        SearchStrategy::ClanIndex => {
            let tag = filters.ally_clan_tag.clone().or_else(|| filters.enemy_clan_tag.clone()).unwrap();
            let rows = state.store.list_by_pk("clan-index", &tag).await.map_err(|e| ApiError::Internal(e.to_string()))?;
            rows.into_iter()
                .filter_map(|r| serde_json::from_value::<wri_model::ClanIndexRow>(r.value).ok())
                .map(|r| r.arena_unique_id)
                .collect::<Vec<_>>()
        }
        SearchStrategy::MatchTable => {
            let rows = state.store.list_by_pk(&table, "ACTIVE").await.map_err(|e| ApiError::Internal(e.to_string()))?;
            rows.into_iter().map(|r| r.pk).collect::<Vec<_>>()
        }
    };

    let mut matches = Vec::new();
    for arena_id in arena_ids {
        if let Some(item) = state.store.get_item(&table, &arena_id, "MATCH").await.map_err(|e| ApiError::Internal(e.to_string()))? {
            if let Ok(record) = serde_json::from_value::<MatchRecord>(item.value) {
                if matches_filters(&record, &filters) {
                    matches.push(record);
                }
            }
        }
    }

    matches.sort_by(|a, b| b.unix_time.cmp(&a.unix_time));
    if let Some(cursor) = filters.cursor_unix_time {
        matches.retain(|m| m.unix_time < cursor);
    }

    let has_more = matches.len() > limit;
    matches.truncate(limit);
    let cursor_unix_time = matches.last().map(|m| m.unix_time);

    Ok(SearchResponse { count: matches.len(), items: matches, cursor_unix_time, has_more })
}

fn matches_filters(record: &MatchRecord, filters: &SearchFilters) -> bool {
    if let Some(map_id) = filters.map_id {
        if record.map_id != map_id {
            return false;
        }
    }
    if let Some(tag) = &filters.ally_clan_tag {
        if record.ally_main_clan_tag.as_deref() != Some(tag.as_str()) {
            return false;
        }
    }
    if let Some(tag) = &filters.enemy_clan_tag {
        if record.enemy_main_clan_tag.as_deref() != Some(tag.as_str()) {
            return false;
        }
    }
    if let Some(win_loss) = filters.win_loss {
        if record.win_loss != win_loss {
            return false;
        }
    }
    if let Some(from) = filters.date_from {
        if record.unix_time < from {
            return false;
        }
    }
    if let Some(to) = filters.date_to {
        if record.unix_time > to {
            return false;
        }
    }
    true
}

#[derive(Debug, Serialize)]
pub struct MatchDetail {
    pub match_record: MatchRecord,
    pub stats_record: Option<StatsRecord>,
    pub uploads: Vec<UploadRecord>,
}

/// Match-detail contract: one MATCH read, one STATS read, up to N UPLOAD
/// reads under the same partition key, assembled into a single response.
pub async fn match_detail(state: &AppState, game_type: GameTypeBucket, arena_unique_id: &str) -> Result<MatchDetail, ApiError> {
    let table = wri_store::match_table(game_type);
    let rows = state.store.list_by_pk(&table, arena_unique_id).await.map_err(|e| ApiError::Internal(e.to_string()))?;

    let mut match_record = None;
    let mut stats_record = None;
    let mut uploads = Vec::new();

    for row in rows {
        match row.sk.as_str() {
            "MATCH" => match_record = serde_json::from_value(row.value).ok(),
            "STATS" => stats_record = serde_json::from_value(row.value).ok(),
            sk if sk.starts_with("UPLOAD#") => {
                if let Ok(upload) = serde_json::from_value(row.value) {
                    uploads.push(upload);
                }
            }
            _ => {}
        }
    }

    let match_record = match_record.ok_or(ApiError::NotFound)?;
    Ok(MatchDetail { match_record, stats_record, uploads })
}
