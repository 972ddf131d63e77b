use std::collections::HashMap;

use serde::Deserialize;
use wri_model::HiddenState;

use crate::error::DecodeError;

/// On-wire shape of the terminal results packet payload. Field names match
/// the game client's `serverData` object (spec.md §4.1); unknown keys are
/// dropped at this boundary, not propagated further into `DecodedReplay`.
#[derive(Deserialize)]
struct BattleResultsWire {
    #[serde(rename = "arenaUniqueID")]
    arena_unique_id: String,
    #[serde(rename = "playersPublicInfo")]
    players_public_info: HashMap<String, Vec<serde_json::Value>>,
    #[serde(default)]
    hidden: HiddenWire,
}

#[derive(Deserialize, Default)]
struct HiddenWire {
    #[serde(default)]
    battle_result: Option<BattleResultWire>,
    #[serde(default)]
    crew: Option<CrewWire>,
    #[serde(default)]
    players: HashMap<String, HiddenPlayerWire>,
}

#[derive(Deserialize)]
struct BattleResultWire {
    winner_team_id: i64,
}

#[derive(Deserialize)]
struct CrewWire {
    #[serde(default)]
    learned_skills: HashMap<String, Vec<u32>>,
}

#[derive(Deserialize)]
struct HiddenPlayerWire {
    #[serde(default)]
    ship_config_dump: Option<String>,
}

pub struct ParsedBattleStats {
    pub arena_unique_id: String,
    pub players_public_info: HashMap<i64, Vec<serde_json::Value>>,
    pub hidden: HiddenState,
}

/// Parses the results packet's payload, framed as `len:u32 | json[len]`
/// (`parser/src/packet2.rs`'s `parse_battle_results`) -- the `len` prefix
/// is checked against the remaining bytes before the JSON is decoded. A
/// malformed payload is treated the same as an absent packet
/// (`NoBattleStats`) by the caller, not a hard decode failure -- the
/// replay's metadata is still useful.
pub fn parse_battle_results(payload: &[u8]) -> Result<ParsedBattleStats, DecodeError> {
    if payload.len() < 4 {
        return Err(DecodeError::TruncatedStream);
    }
    let len = u32::from_le_bytes(payload[0..4].try_into().unwrap()) as usize;
    let json_bytes = payload.get(4..).ok_or(DecodeError::TruncatedStream)?;
    if len != json_bytes.len() {
        return Err(DecodeError::TruncatedStream);
    }

    let text = std::str::from_utf8(json_bytes)?;
    let wire: BattleResultsWire = serde_json::from_str(text)?;

    let players_public_info = wire
        .players_public_info
        .into_iter()
        .filter_map(|(k, v)| k.parse::<i64>().ok().map(|id| (id, v)))
        .collect();

    let mut ship_config_dumps = HashMap::new();
    for (player_id, player) in wire.hidden.players {
        if let (Ok(id), Some(hex)) = (player_id.parse::<i64>(), player.ship_config_dump) {
            if let Ok(bytes) = decode_hex(&hex) {
                ship_config_dumps.insert(id, bytes);
            }
        }
    }

    let hidden = HiddenState {
        winner_team_id: wire.hidden.battle_result.map(|r| r.winner_team_id),
        learned_skills: wire.hidden.crew.map(|c| c.learned_skills).unwrap_or_default(),
        ship_config_dumps,
    };

    Ok(ParsedBattleStats {
        arena_unique_id: wire.arena_unique_id,
        players_public_info,
        hidden,
    })
}

fn decode_hex(s: &str) -> Result<Vec<u8>, std::num::ParseIntError> {
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16))
        .collect()
}
