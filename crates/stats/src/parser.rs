use wri_model::{DamageBreakdown, DecodedReplay, GameTypeBucket, HitsByShellType, PlayerStats, Team, WinLoss};

use crate::error::StatsError;
use crate::index_table::{self, decode_slot, IndexTable, SlotDecoder, StatField};
use crate::ship_params::ShipParamsProvider;
use crate::skills::{captain_skills_for, SkillNameTable};
use crate::upgrades::{decode_upgrades, UpgradeNameTable};
use crate::winloss::determine_win_loss;

fn get_int(table: &IndexTable, slots: &[serde_json::Value], field: StatField, player_id: i64) -> Result<i64, StatsError> {
    let raw = table.get(field, slots).ok_or(StatsError::MissingSlot { player_id, slot: 0, field: field.name() })?;
    let decoder = table.decoder_for(field).unwrap_or(SlotDecoder::AsInt);
    decode_slot(raw, decoder)
        .and_then(|v| v.as_i64())
        .ok_or(StatsError::WrongSlotType { player_id, slot: 0, field: field.name() })
}

fn get_float(table: &IndexTable, slots: &[serde_json::Value], field: StatField, player_id: i64) -> f64 {
    table
        .get(field, slots)
        .and_then(|raw| decode_slot(raw, SlotDecoder::AsFloatToInt))
        .and_then(|v| v.as_i64())
        .map(|i| i as f64)
        .unwrap_or_else(|| {
            tracing::debug!(player_id, field = field.name(), "stat slot missing, defaulting to 0");
            0.0
        })
}

fn get_string(table: &IndexTable, slots: &[serde_json::Value], field: StatField, decoder: SlotDecoder) -> String {
    table
        .get(field, slots)
        .and_then(|raw| decode_slot(raw, decoder))
        .and_then(|v| v.as_str().map(|s| s.to_string()))
        .unwrap_or_default()
}

fn get_u32(table: &IndexTable, slots: &[serde_json::Value], field: StatField) -> u32 {
    table
        .get(field, slots)
        .and_then(|raw| decode_slot(raw, SlotDecoder::AsInt))
        .and_then(|v| v.as_i64())
        .map(|i| i.max(0) as u32)
        .unwrap_or(0)
}

/// Maps every entry in `replay.battle_stats` into a named `PlayerStats`.
/// Precondition: `replay.has_battle_stats()`; callers that skip the check
/// simply get an empty vec back, matching the decoder's own lenient style.
pub fn parse_stats(
    replay: &DecodedReplay,
    ship_params: &dyn ShipParamsProvider,
    skill_names: &SkillNameTable,
    upgrade_names: &UpgradeNameTable,
) -> Result<Vec<PlayerStats>, StatsError> {
    let Some(battle_stats) = replay.battle_stats.as_ref() else {
        return Ok(vec![]);
    };
    let table = index_table::table_for(&replay.client_version)?;

    let own_player_id = replay.own_player.player_id;
    let own_team_id = battle_stats
        .get(&own_player_id)
        .map(|slots| get_int(&table, slots, StatField::TeamId, own_player_id))
        .transpose()?
        .unwrap_or(0);

    let mut out = Vec::with_capacity(battle_stats.len());
    for (&player_id, slots) in battle_stats {
        let team_id = get_int(&table, slots, StatField::TeamId, player_id)?;
        let team = if team_id == own_team_id { Team::Ally } else { Team::Enemy };
        let ship_id = get_int(&table, slots, StatField::ShipId, player_id)?;
        let ship_class = ship_params.ship_class(ship_id).unwrap_or(wri_model::ShipClass::Cruiser);

        let damage_breakdown = DamageBreakdown {
            ap: get_float(&table, slots, StatField::DamageAp, player_id),
            he: get_float(&table, slots, StatField::DamageHe, player_id),
            he_secondaries: get_float(&table, slots, StatField::DamageHeSecondaries, player_id),
            torps: get_float(&table, slots, StatField::DamageTorps, player_id),
            deep_water_torps: get_float(&table, slots, StatField::DamageDeepWaterTorps, player_id),
            fire: get_float(&table, slots, StatField::DamageFire, player_id),
            flooding: get_float(&table, slots, StatField::DamageFlooding, player_id),
            other: get_float(&table, slots, StatField::DamageOther, player_id),
        };

        let captain_skills = captain_skills_for(&replay.hidden, ship_class, skill_names);
        let upgrades = replay
            .hidden
            .ship_config_dumps
            .get(&player_id)
            .map(|dump| decode_upgrades(dump, upgrade_names))
            .unwrap_or_default();

        out.push(PlayerStats {
            player_id,
            player_name: get_string(&table, slots, StatField::PlayerName, SlotDecoder::AsString),
            clan_tag: {
                let tag = get_string(&table, slots, StatField::ClanTag, SlotDecoder::AsStringOrEmpty);
                if tag.is_empty() { None } else { Some(tag) }
            },
            team,
            is_own: player_id == own_player_id,
            ship_id,
            ship_name: get_string(&table, slots, StatField::ShipName, SlotDecoder::AsString),
            ship_class,
            damage: damage_breakdown.total(),
            damage_breakdown,
            spotting_damage: get_float(&table, slots, StatField::SpottingDamage, player_id),
            potential_damage: get_float(&table, slots, StatField::PotentialDamage, player_id),
            received_damage: get_float(&table, slots, StatField::ReceivedDamage, player_id),
            hits: HitsByShellType {
                ap_hits: get_u32(&table, slots, StatField::ApHits),
                he_hits: get_u32(&table, slots, StatField::HeHits),
                secondary_hits: get_u32(&table, slots, StatField::SecondaryHits),
                torp_hits: get_u32(&table, slots, StatField::TorpHits),
            },
            fires_caused: get_u32(&table, slots, StatField::FiresCaused),
            floods_caused: get_u32(&table, slots, StatField::FloodsCaused),
            citadels: get_u32(&table, slots, StatField::Citadels),
            crits: get_u32(&table, slots, StatField::Crits),
            kills: get_u32(&table, slots, StatField::Kills),
            base_xp: get_int(&table, slots, StatField::BaseXp, player_id).unwrap_or(0),
            captain_skills,
            upgrades,
            ship_components: vec![],
        });
    }

    out.sort_by_key(|p| p.player_id);
    Ok(out)
}

/// `parse_stats` plus the win/loss determination from spec.md §4.2, which
/// needs the same own-player raw team-id lookup the stat mapping already
/// does. Returns `WinLoss::Unknown` when `battle_stats` is absent, since
/// `hidden.battle_result` only ever arrives alongside it.
pub fn parse_stats_and_outcome(
    replay: &DecodedReplay,
    ship_params: &dyn ShipParamsProvider,
    skill_names: &SkillNameTable,
    upgrade_names: &UpgradeNameTable,
) -> Result<(Vec<PlayerStats>, WinLoss), StatsError> {
    let stats = parse_stats(replay, ship_params, skill_names, upgrade_names)?;
    let own_base_xp = stats.iter().find(|s| s.is_own).map(|s| s.base_xp);
    let own_team_id = battle_stats_own_team_id(replay, &stats);
    let game_type = GameTypeBucket::from_raw(&replay.game_type);
    let win_loss = determine_win_loss(&replay.hidden, own_team_id, game_type, own_base_xp);
    Ok((stats, win_loss))
}

fn battle_stats_own_team_id(replay: &DecodedReplay, stats: &[PlayerStats]) -> i64 {
    // `PlayerStats.team` is already relative to the own player (Ally), so the
    // own player's raw slot value isn't retained on the struct; re-derive it
    // from the decoded slots directly when present.
    let Some(battle_stats) = replay.battle_stats.as_ref() else {
        return 0;
    };
    let Ok(table) = index_table::table_for(&replay.client_version) else {
        return 0;
    };
    battle_stats
        .get(&replay.own_player.player_id)
        .and_then(|slots| get_int(&table, slots, StatField::TeamId, replay.own_player.player_id).ok())
        .unwrap_or_else(|| {
            let _ = stats;
            0
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ship_params::StaticShipParamsTable;
    use std::collections::HashMap;
    use wri_model::{HiddenState, PlayerRef};

    fn slots_for(player_name: &str, clan_tag: &str, team_id: i64, ship_id: i64, ship_name: &str) -> Vec<serde_json::Value> {
        let mut v = vec![serde_json::Value::Null; 200];
        v[0] = serde_json::Value::from(player_name);
        v[3] = serde_json::Value::from(clan_tag);
        v[6] = serde_json::Value::from(team_id);
        v[10] = serde_json::Value::from(ship_id);
        v[11] = serde_json::Value::from(ship_name);
        v[42] = serde_json::Value::from(1000.0);
        v[150] = serde_json::Value::from(300_000.0);
        v
    }

    fn sample_replay() -> DecodedReplay {
        let mut battle_stats = HashMap::new();
        battle_stats.insert(1, slots_for("own", "OZEKI", 0, 300, "Cruiser A"));
        battle_stats.insert(2, slots_for("enemy", "", 1, 100, "Destroyer A"));

        DecodedReplay {
            client_version: "14.11.0".to_string(),
            map_id: 19,
            map_display_name: "Fault Line".to_string(),
            date_time: "03.01.2026 23:28:22".to_string(),
            game_type: "CLAN".to_string(),
            arena_unique_id: Some("42".to_string()),
            own_player: PlayerRef { player_id: 1, ship_id: 300, name: "own".to_string() },
            allies: vec![],
            enemies: vec![PlayerRef { player_id: 2, ship_id: 100, name: "enemy".to_string() }],
            battle_stats: Some(battle_stats),
            hidden: HiddenState::default(),
        }
    }

    #[test]
    fn parses_every_player_and_assigns_team_relative_to_own() {
        let replay = sample_replay();
        let ship_params = StaticShipParamsTable::sample();
        let skills = SkillNameTable::sample();
        let upgrades = UpgradeNameTable::sample();

        let stats = parse_stats(&replay, &ship_params, &skills, &upgrades).unwrap();
        assert_eq!(stats.len(), 2);

        let own = stats.iter().find(|s| s.is_own).unwrap();
        assert_eq!(own.team, Team::Ally);
        assert_eq!(own.ship_class, wri_model::ShipClass::Cruiser);
        assert_eq!(own.clan_tag.as_deref(), Some("OZEKI"));

        let enemy = stats.iter().find(|s| !s.is_own).unwrap();
        assert_eq!(enemy.team, Team::Enemy);
        assert_eq!(enemy.clan_tag, None);
    }

    #[test]
    fn damage_breakdown_sums_to_total_damage() {
        let replay = sample_replay();
        let ship_params = StaticShipParamsTable::sample();
        let skills = SkillNameTable::sample();
        let upgrades = UpgradeNameTable::sample();
        let stats = parse_stats(&replay, &ship_params, &skills, &upgrades).unwrap();
        for s in &stats {
            assert_eq!(s.damage, s.damage_breakdown.total());
        }
    }

    #[test]
    fn outcome_uses_winner_team_id_when_present() {
        let mut replay = sample_replay();
        replay.hidden.winner_team_id = Some(0);
        let ship_params = StaticShipParamsTable::sample();
        let skills = SkillNameTable::sample();
        let upgrades = UpgradeNameTable::sample();
        let (stats, outcome) = parse_stats_and_outcome(&replay, &ship_params, &skills, &upgrades).unwrap();
        assert_eq!(stats.len(), 2);
        assert_eq!(outcome, wri_model::WinLoss::Win);
    }

    #[test]
    fn returns_empty_when_no_battle_stats() {
        let mut replay = sample_replay();
        replay.battle_stats = None;
        let ship_params = StaticShipParamsTable::sample();
        let skills = SkillNameTable::sample();
        let upgrades = UpgradeNameTable::sample();
        assert!(parse_stats(&replay, &ship_params, &skills, &upgrades).unwrap().is_empty());
    }
}
