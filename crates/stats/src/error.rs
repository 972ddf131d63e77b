use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("no index table for client version {0}")]
    IndexMissing(String),
    #[error("player {player_id} missing slot {slot} ({field})")]
    MissingSlot { player_id: i64, slot: usize, field: &'static str },
    #[error("player {player_id} slot {slot} ({field}) had the wrong JSON type")]
    WrongSlotType { player_id: i64, slot: usize, field: &'static str },
}
