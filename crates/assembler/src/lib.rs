mod assemble;
mod clan_tag;
mod match_key;

pub use assemble::{assemble, AssembleInput, Assembled};
pub use clan_tag::majority_clan_tag;
pub use match_key::compute_match_key;
