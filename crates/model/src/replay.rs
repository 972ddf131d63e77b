use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The `meta` JSON block that precedes the encrypted packet stream.
///
/// Field names mirror the on-wire JSON exactly (the game client emits
/// camelCase); unknown keys are dropped at this boundary rather than
/// propagated, per the decoder's normalized-struct design.
#[allow(non_snake_case)]
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ReplayMeta {
    pub matchGroup: String,
    pub gameType: String,
    pub clientVersionFromExe: String,
    pub mapDisplayName: String,
    pub mapId: u32,
    pub mapName: String,
    pub dateTime: String,
    pub playerID: i64,
    pub playerName: String,
    pub playerVehicle: String,
    pub playersPerTeam: u32,
    pub teamsCount: u32,
    pub vehicles: Vec<VehicleInfoMeta>,
    #[serde(default)]
    pub weatherParams: HashMap<String, Vec<String>>,
}

/// One row of `meta.vehicles`: relation is 0 for the uploader's own ship,
/// 1 for allies, 2 for enemies (observer slots use higher values and are
/// dropped during assembly).
#[allow(non_snake_case)]
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct VehicleInfoMeta {
    pub shipId: i64,
    pub relation: u32,
    pub id: i64,
    pub name: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Relation {
    Own,
    Ally,
    Enemy,
    Observer,
}

impl From<u32> for Relation {
    fn from(raw: u32) -> Self {
        match raw {
            0 => Relation::Own,
            1 => Relation::Ally,
            2 => Relation::Enemy,
            _ => Relation::Observer,
        }
    }
}

/// A resolved participant, derived from `ReplayMeta.vehicles` by relation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerRef {
    pub player_id: i64,
    pub ship_id: i64,
    pub name: String,
}

/// State recovered from the `hidden` side-channel of the terminal results
/// packet: crew skills keyed by ship class, and per-player ship config.
///
/// The core does not replay the full `EntityMethod` stream to reconstruct
/// this state (that requires the version's external entity-definition
/// scripts, which are game-client data, not replay data); it is read
/// directly off the `hidden` object nested in the same results payload
/// that carries `playersPublicInfo`. See DESIGN.md.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct HiddenState {
    pub winner_team_id: Option<i64>,
    /// Ship-class name (as emitted by the client, e.g. "Cruiser") -> skill ids.
    #[serde(default)]
    pub learned_skills: HashMap<String, Vec<u32>>,
    /// player id -> raw shipConfigDump bytes (upgrade/PCM codes), base64-less,
    /// already decoded from the JSON's hex/array encoding by the decoder.
    #[serde(default)]
    pub ship_config_dumps: HashMap<i64, Vec<u8>>,
}

/// Pure output of the ReplayDecoder. Never persisted verbatim; the
/// MatchAssembler and StatsParser read it to produce the persisted records.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DecodedReplay {
    pub client_version: String,
    pub map_id: u32,
    pub map_display_name: String,
    pub date_time: String,
    pub game_type: String,
    pub arena_unique_id: Option<String>,
    pub own_player: PlayerRef,
    pub allies: Vec<PlayerRef>,
    pub enemies: Vec<PlayerRef>,
    /// `playerId -> positional array of raw decoded values`, taken from
    /// `BattleStats.playersPublicInfo`. `None` when the replay ended before
    /// the terminal packet arrived (`NoBattleStats`, non-fatal).
    pub battle_stats: Option<HashMap<i64, Vec<serde_json::Value>>>,
    pub hidden: HiddenState,
}

impl DecodedReplay {
    pub fn has_battle_stats(&self) -> bool {
        self.battle_stats.is_some()
    }
}
