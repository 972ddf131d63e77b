use std::collections::HashMap;

use wri_model::{index_sort_key, ClanIndexRow, MatchRecord, PlayerIndexRow, ShipIndexRow, StatsRecord, Team};

/// Builds every reverse-index row implied by a freshly-created MATCH (plus
/// its STATS, when present). Written only on the "created" branch of the
/// MATCH conditional write (spec.md §4.4) -- never recomputed on merge.
pub fn build_index_rows(
    match_record: &MatchRecord,
    stats: Option<&StatsRecord>,
) -> (Vec<ShipIndexRow>, Vec<PlayerIndexRow>, Vec<ClanIndexRow>) {
    let sort_key = index_sort_key(match_record.game_type, match_record.unix_time, &match_record.arena_unique_id);

    let Some(stats) = stats else {
        return (vec![], vec![], vec![]);
    };

    let mut ship_counts: HashMap<&str, (u32, u32)> = HashMap::new();
    for p in &stats.all_players_stats {
        let entry = ship_counts.entry(p.ship_name.as_str()).or_insert((0, 0));
        match p.team {
            Team::Ally => entry.0 += 1,
            Team::Enemy => entry.1 += 1,
        }
    }
    let ship_rows = ship_counts
        .into_iter()
        .map(|(ship_name, (ally, enemy))| ShipIndexRow {
            ship_name: ship_name.to_string(),
            sort_key: sort_key.clone(),
            arena_unique_id: match_record.arena_unique_id.clone(),
            ally_count: ally,
            enemy_count: enemy,
            total_count: ally + enemy,
        })
        .collect();

    let player_rows = stats
        .all_players_stats
        .iter()
        .map(|p| PlayerIndexRow {
            player_name: p.player_name.clone(),
            sort_key: sort_key.clone(),
            arena_unique_id: match_record.arena_unique_id.clone(),
            team: p.team,
            clan_tag: p.clan_tag.clone(),
            ship_name: p.ship_name.clone(),
        })
        .collect();

    let mut clan_counts: HashMap<(&str, Team), u32> = HashMap::new();
    for p in &stats.all_players_stats {
        if let Some(tag) = p.clan_tag.as_deref() {
            *clan_counts.entry((tag, p.team)).or_insert(0) += 1;
        }
    }
    let clan_rows = clan_counts
        .into_iter()
        .map(|((tag, team), member_count)| {
            let is_main_clan = match team {
                Team::Ally => match_record.ally_main_clan_tag.as_deref() == Some(tag),
                Team::Enemy => match_record.enemy_main_clan_tag.as_deref() == Some(tag),
            };
            ClanIndexRow {
                clan_tag: tag.to_string(),
                sort_key: sort_key.clone(),
                arena_unique_id: match_record.arena_unique_id.clone(),
                team,
                member_count,
                is_main_clan,
            }
        })
        .collect();

    (ship_rows, player_rows, clan_rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wri_model::{DamageBreakdown, GameTypeBucket, HitsByShellType, ShipClass, Uploader, WinLoss};

    fn player(name: &str, ship: &str, team: Team, clan: Option<&str>) -> wri_model::PlayerStats {
        wri_model::PlayerStats {
            player_id: 0,
            player_name: name.to_string(),
            clan_tag: clan.map(str::to_string),
            team,
            is_own: false,
            ship_id: 0,
            ship_name: ship.to_string(),
            ship_class: ShipClass::Cruiser,
            damage: 0.0,
            damage_breakdown: DamageBreakdown::default(),
            spotting_damage: 0.0,
            potential_damage: 0.0,
            received_damage: 0.0,
            hits: HitsByShellType::default(),
            fires_caused: 0,
            floods_caused: 0,
            citadels: 0,
            crits: 0,
            kills: 0,
            base_xp: 0,
            captain_skills: vec![],
            upgrades: vec![],
            ship_components: vec![],
        }
    }

    fn sample_match() -> MatchRecord {
        MatchRecord {
            arena_unique_id: "42".to_string(),
            game_type: GameTypeBucket::Clan,
            listing_key: "ACTIVE".to_string(),
            unix_time: 1000,
            date_time: "03.01.2026 23:28:22".to_string(),
            date_time_sortable: "20260103232822".to_string(),
            map_id: 19,
            map_display_name: "Fault Line".to_string(),
            client_version: "14.11.0".to_string(),
            ally_perspective_player_id: 1,
            win_loss: WinLoss::Win,
            ally_main_clan_tag: Some("OZEKI".to_string()),
            enemy_main_clan_tag: None,
            allies: vec!["own".to_string()],
            enemies: vec!["enemy".to_string()],
            mp4_s3_key: None,
            mp4_generated_at: None,
            dual_mp4_s3_key: None,
            has_dual_replay: false,
            uploaders: vec![Uploader { player_id: 1, player_name: "own".to_string(), team: Team::Ally }],
            match_key: "k".to_string(),
        }
    }

    #[test]
    fn one_row_per_distinct_ship_name() {
        let stats = StatsRecord {
            arena_unique_id: "42".to_string(),
            all_players_stats: vec![
                player("a", "Des Moines", Team::Ally, Some("OZEKI")),
                player("b", "Des Moines", Team::Enemy, None),
                player("c", "Yamato", Team::Enemy, None),
            ],
        };
        let (ships, players, clans) = build_index_rows(&sample_match(), Some(&stats));
        assert_eq!(ships.len(), 2);
        let des_moines = ships.iter().find(|s| s.ship_name == "Des Moines").unwrap();
        assert_eq!(des_moines.ally_count, 1);
        assert_eq!(des_moines.enemy_count, 1);
        assert_eq!(players.len(), 3);
        assert_eq!(clans.len(), 1); // a single player carrying a clan tag still emits one row for it
        let ozeki = &clans[0];
        assert_eq!(ozeki.clan_tag, "OZEKI");
        assert_eq!(ozeki.team, Team::Ally);
        assert_eq!(ozeki.member_count, 1);
        assert!(ozeki.is_main_clan);
    }

    #[test]
    fn absent_stats_yields_no_index_rows() {
        let (ships, players, clans) = build_index_rows(&sample_match(), None);
        assert!(ships.is_empty() && players.is_empty() && clans.is_empty());
    }
}
