use std::collections::HashMap;

use wri_model::PlayerStats;

/// Mode of `clanTag` among a team's players. Ties break lexicographically,
/// deterministically. Omitted (returns `None`) when fewer than two players
/// share a tag -- a lone clan-tagged player does not make this a clan
/// battle even if the raw game type said so.
pub fn majority_clan_tag<'a>(team: impl Iterator<Item = &'a PlayerStats>) -> Option<String> {
    let mut counts: HashMap<&str, u32> = HashMap::new();
    for player in team {
        if let Some(tag) = player.clan_tag.as_deref() {
            *counts.entry(tag).or_insert(0) += 1;
        }
    }

    counts
        .into_iter()
        .filter(|(_, count)| *count >= 2)
        .max_by(|(tag_a, count_a), (tag_b, count_b)| count_a.cmp(count_b).then_with(|| tag_b.cmp(tag_a)))
        .map(|(tag, _)| tag.to_string())
}
