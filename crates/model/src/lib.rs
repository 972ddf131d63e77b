mod game_type;
mod index;
mod records;
mod replay;
mod stats;
mod time;

pub use game_type::GameTypeBucket;
pub use index::{index_sort_key, ClanIndexRow, PlayerIndexRow, ShipIndexRow};
pub use records::{MatchRecord, StatsRecord, UploadRecord, Uploader};
pub use replay::{DecodedReplay, HiddenState, PlayerRef, Relation, ReplayMeta, VehicleInfoMeta};
pub use stats::{DamageBreakdown, HitsByShellType, PlayerStats, ShipClass, Team, WinLoss};
pub use time::{format_date_time_sortable, parse_date_time_sortable, round_to_five_minutes, unix_time, TimeError};
