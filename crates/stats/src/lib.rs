pub mod error;
mod index_table;
mod parser;
mod ship_params;
mod skills;
mod upgrades;
mod winloss;

pub use error::StatsError;
pub use parser::{parse_stats, parse_stats_and_outcome};
pub use ship_params::{ShipParamsProvider, StaticShipParamsTable};
pub use skills::SkillNameTable;
pub use upgrades::UpgradeNameTable;
pub use winloss::determine_win_loss;
