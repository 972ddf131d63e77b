use chrono::NaiveDateTime;
use sha2::{Digest, Sha256};
use wri_model::{round_to_five_minutes, GameTypeBucket};

const WIRE_FMT: &str = "%d.%m.%Y %H:%M:%S";

/// `hash(dateTime-rounded-to-5-minutes | mapId | gameType | sorted-player-names)`.
///
/// Deterministic and insensitive to which uploader submitted first: a
/// secondary dedupe key for cross-uploader grouping when two uploads of the
/// same server match disagree on `arenaUniqueID` (timezone skew producing a
/// different `dateTime` string is tolerated by the 5-minute rounding).
pub fn compute_match_key(date_time: &str, map_id: u32, game_type: GameTypeBucket, player_names: &[String]) -> String {
    let rounded = NaiveDateTime::parse_from_str(date_time, WIRE_FMT)
        .map(round_to_five_minutes)
        .map(|dt| dt.format("%Y%m%d%H%M").to_string())
        .unwrap_or_else(|_| "00000000000".to_string());

    let mut sorted_names: Vec<&str> = player_names.iter().map(String::as_str).collect();
    sorted_names.sort_unstable();

    let mut hasher = Sha256::new();
    hasher.update(rounded.as_bytes());
    hasher.update(b"|");
    hasher.update(map_id.to_le_bytes());
    hasher.update(b"|");
    hasher.update(game_type.table_suffix().as_bytes());
    hasher.update(b"|");
    hasher.update(sorted_names.join(",").as_bytes());

    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_deterministic_and_order_insensitive() {
        let a = compute_match_key("03.01.2026 23:28:22", 19, GameTypeBucket::Clan, &["bob".into(), "alice".into()]);
        let b = compute_match_key("03.01.2026 23:28:22", 19, GameTypeBucket::Clan, &["alice".into(), "bob".into()]);
        assert_eq!(a, b);
    }

    #[test]
    fn tolerates_timezone_skew_within_the_same_five_minute_bucket() {
        let a = compute_match_key("03.01.2026 23:25:01", 19, GameTypeBucket::Clan, &["alice".into()]);
        let b = compute_match_key("03.01.2026 23:29:59", 19, GameTypeBucket::Clan, &["alice".into()]);
        assert_eq!(a, b);
    }

    #[test]
    fn different_maps_yield_different_keys() {
        let a = compute_match_key("03.01.2026 23:25:01", 19, GameTypeBucket::Clan, &["alice".into()]);
        let b = compute_match_key("03.01.2026 23:25:01", 20, GameTypeBucket::Clan, &["alice".into()]);
        assert_ne!(a, b);
    }
}
