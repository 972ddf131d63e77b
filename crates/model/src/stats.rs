use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Team {
    Ally,
    Enemy,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum WinLoss {
    Win,
    Loss,
    Draw,
    Unknown,
}

/// Mirrors `game_params::Species` from the teacher's game-data side table,
/// restricted to the six classes the spec names.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum ShipClass {
    Destroyer,
    Cruiser,
    Battleship,
    AirCarrier,
    Submarine,
    Auxiliary,
}

impl ShipClass {
    /// Key used to index `HiddenState.learned_skills`, which the game
    /// client keys by this same display name.
    pub fn skill_table_key(&self) -> &'static str {
        match self {
            ShipClass::Destroyer => "Destroyer",
            ShipClass::Cruiser => "Cruiser",
            ShipClass::Battleship => "Battleship",
            ShipClass::AirCarrier => "AirCarrier",
            ShipClass::Submarine => "Submarine",
            ShipClass::Auxiliary => "Auxiliary",
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DamageBreakdown {
    pub ap: f64,
    pub he: f64,
    pub he_secondaries: f64,
    pub torps: f64,
    pub deep_water_torps: f64,
    pub fire: f64,
    pub flooding: f64,
    pub other: f64,
}

impl DamageBreakdown {
    pub fn total(&self) -> f64 {
        self.ap
            + self.he
            + self.he_secondaries
            + self.torps
            + self.deep_water_torps
            + self.fire
            + self.flooding
            + self.other
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct HitsByShellType {
    pub ap_hits: u32,
    pub he_hits: u32,
    pub secondary_hits: u32,
    pub torp_hits: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerStats {
    pub player_id: i64,
    pub player_name: String,
    pub clan_tag: Option<String>,
    pub team: Team,
    pub is_own: bool,
    pub ship_id: i64,
    pub ship_name: String,
    pub ship_class: ShipClass,

    pub damage: f64,
    pub damage_breakdown: DamageBreakdown,
    pub spotting_damage: f64,
    pub potential_damage: f64,
    pub received_damage: f64,

    pub hits: HitsByShellType,
    pub fires_caused: u32,
    pub floods_caused: u32,
    pub citadels: u32,
    pub crits: u32,

    pub kills: u32,
    pub base_xp: i64,

    pub captain_skills: Vec<String>,
    pub upgrades: Vec<String>,
    pub ship_components: Vec<String>,
}
