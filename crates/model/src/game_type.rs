use serde::{Deserialize, Serialize};

/// Normalized game-type bucket. Controls which `matches-{gameType}` table a
/// match is written to. Unknown raw values bucket to `Other`, never error.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameTypeBucket {
    Clan,
    Ranked,
    Random,
    Other,
}

impl GameTypeBucket {
    /// Table-name suffix, e.g. `matches-clan`.
    pub fn table_suffix(&self) -> &'static str {
        match self {
            GameTypeBucket::Clan => "clan",
            GameTypeBucket::Ranked => "ranked",
            GameTypeBucket::Random => "random",
            GameTypeBucket::Other => "other",
        }
    }

    /// Explicit lookup table from the raw `meta.gameType`/`matchGroup`
    /// strings the WoWS client emits. Anything not named here is `Other`.
    pub fn from_raw(raw: &str) -> GameTypeBucket {
        match raw {
            "CLAN" | "CLAN_SEASON" | "BRAWL" => GameTypeBucket::Clan,
            "RANKED" | "RANKED_TEAM" | "RANKED_SOLO" => GameTypeBucket::Ranked,
            "RANDOM" | "PVP" | "DOMINATION" => GameTypeBucket::Random,
            _ => GameTypeBucket::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_raw_buckets_to_other() {
        assert_eq!(GameTypeBucket::from_raw("SOME_FUTURE_EVENT"), GameTypeBucket::Other);
    }

    #[test]
    fn known_raws_bucket_correctly() {
        assert_eq!(GameTypeBucket::from_raw("CLAN"), GameTypeBucket::Clan);
        assert_eq!(GameTypeBucket::from_raw("RANKED_SOLO"), GameTypeBucket::Ranked);
        assert_eq!(GameTypeBucket::from_raw("PVP"), GameTypeBucket::Random);
    }

    #[test]
    fn table_suffix_matches_bucket_name() {
        assert_eq!(GameTypeBucket::Clan.table_suffix(), "clan");
        assert_eq!(GameTypeBucket::Other.table_suffix(), "other");
    }
}
