use std::collections::HashMap;

use wri_model::{HiddenState, ShipClass};

/// Skill-id -> display-name side table, constructed once at process start.
pub struct SkillNameTable {
    names: HashMap<u32, String>,
}

impl SkillNameTable {
    pub fn new(names: HashMap<u32, String>) -> Self {
        Self { names }
    }

    pub fn sample() -> Self {
        let mut names = HashMap::new();
        names.insert(1, "Priority Target".to_string());
        names.insert(4, "Adrenaline Rush".to_string());
        names.insert(9, "Last Stand".to_string());
        Self::new(names)
    }

    fn display_name(&self, id: u32) -> String {
        self.names.get(&id).cloned().unwrap_or_else(|| format!("Unknown Skill #{id}"))
    }
}

/// `hidden.crew.learned_skills` is keyed by ship class, not by player. The
/// parser must resolve which sub-list belongs to a given player by that
/// player's *actual* resolved `ShipClass`, never by positional order in the
/// map -- spec.md §4.2 calls out the wrong-sub-list bug explicitly.
pub fn captain_skills_for(hidden: &HiddenState, ship_class: ShipClass, names: &SkillNameTable) -> Vec<String> {
    hidden
        .learned_skills
        .get(ship_class.skill_table_key())
        .map(|ids| ids.iter().map(|id| names.display_name(*id)).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap as Map;

    #[test]
    fn resolves_by_ship_class_not_positional_fallback() {
        let mut learned = Map::new();
        learned.insert("Cruiser".to_string(), vec![1, 4]);
        learned.insert("Destroyer".to_string(), vec![9]);
        let hidden = HiddenState { winner_team_id: None, learned_skills: learned, ship_config_dumps: Map::new() };
        let names = SkillNameTable::sample();

        let cruiser_skills = captain_skills_for(&hidden, ShipClass::Cruiser, &names);
        assert_eq!(cruiser_skills, vec!["Priority Target", "Adrenaline Rush"]);

        let dd_skills = captain_skills_for(&hidden, ShipClass::Destroyer, &names);
        assert_eq!(dd_skills, vec!["Last Stand"]);

        let bb_skills = captain_skills_for(&hidden, ShipClass::Battleship, &names);
        assert!(bb_skills.is_empty());
    }
}
