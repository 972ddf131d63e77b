use wri_model::{PlayerRef, Relation, ReplayMeta};

use crate::error::DecodeError;

pub fn parse_meta(raw_meta: &str) -> Result<ReplayMeta, DecodeError> {
    Ok(serde_json::from_str(raw_meta)?)
}

pub struct Participants {
    pub own: PlayerRef,
    pub allies: Vec<PlayerRef>,
    pub enemies: Vec<PlayerRef>,
}

/// Splits `meta.vehicles` by relation. Observer-relation rows are dropped;
/// they are not battle participants. Errors if the meta block names no
/// own-relation vehicle, which would make the rest of the pipeline
/// (team comparisons, `isOwn`) meaningless.
pub fn resolve_participants(meta: &ReplayMeta) -> Result<Participants, DecodeError> {
    let mut own = None;
    let mut allies = vec![];
    let mut enemies = vec![];

    for v in &meta.vehicles {
        let player_ref = PlayerRef { player_id: v.id, ship_id: v.shipId, name: v.name.clone() };
        match Relation::from(v.relation) {
            Relation::Own => own = Some(player_ref),
            Relation::Ally => allies.push(player_ref),
            Relation::Enemy => enemies.push(player_ref),
            Relation::Observer => {}
        }
    }

    let own = own.ok_or(DecodeError::MalformedHeader)?;
    Ok(Participants { own, allies, enemies })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_meta() -> String {
        r#"{
            "matchGroup": "pvp",
            "gameType": "RANDOM",
            "clientVersionFromExe": "14,11,0,1",
            "mapDisplayName": "Fault Line",
            "mapId": 19,
            "mapName": "spaces/19_OC_prey",
            "dateTime": "03.01.2026 23:28:22",
            "playerID": 1,
            "playerName": "_meteor0090",
            "playerVehicle": "PZSD109-Chung-Mu",
            "playersPerTeam": 1,
            "teamsCount": 2,
            "vehicles": [
                {"shipId": 100, "relation": 0, "id": 1, "name": "_meteor0090"},
                {"shipId": 200, "relation": 2, "id": 2, "name": "enemy_one"}
            ]
        }"#
        .to_string()
    }

    #[test]
    fn splits_vehicles_by_relation() {
        let meta = parse_meta(&sample_meta()).unwrap();
        let participants = resolve_participants(&meta).unwrap();
        assert_eq!(participants.own.name, "_meteor0090");
        assert_eq!(participants.allies.len(), 0);
        assert_eq!(participants.enemies.len(), 1);
    }
}
