mod battle_stats;
mod container;
mod crypto;
pub mod error;
mod meta;
mod packet;
pub mod version;

pub use error::{DecodeError, NoBattleStats};
pub use version::ClientVersion;

use wri_model::DecodedReplay;

/// Decodes a raw `.wowsreplay` file into a [`DecodedReplay`].
///
/// Runs non-strict: a replay that ends before the terminal results packet
/// arrives (player disconnected, game crashed) still yields a
/// `DecodedReplay` with `battle_stats = None`, per spec.md §4.1. Only the
/// container/crypto/version stages are hard failures.
pub fn decode(bytes: &[u8]) -> Result<DecodedReplay, DecodeError> {
    let container = container::parse_container(bytes)?;
    let meta = meta::parse_meta(container.raw_meta)?;

    let client_version = ClientVersion::parse_from_exe(&meta.clientVersionFromExe)?;
    version::require_supported(&client_version)?;

    let participants = meta::resolve_participants(&meta)?;

    let decrypted = crypto::decrypt(container.encrypted)?;
    let stream = crypto::inflate(&decrypted)?;
    let packets = packet::walk_packets(&stream)?;

    let results_packet_type = client_version.battle_results_packet_type();
    let terminal = packet::find_last_of_type(&packets, results_packet_type);

    let (arena_unique_id, battle_stats, hidden) = match terminal {
        Some(p) => match battle_stats::parse_battle_results(p.payload) {
            Ok(parsed) => (
                Some(parsed.arena_unique_id),
                Some(parsed.players_public_info),
                parsed.hidden,
            ),
            Err(_) => {
                tracing::warn!("terminal results packet present but malformed; treating as NoBattleStats");
                (None, None, Default::default())
            }
        },
        None => {
            tracing::info!(client_version = %client_version.dotted(), "replay has no terminal BattleStats packet (incomplete battle)");
            (None, None, Default::default())
        }
    };

    Ok(DecodedReplay {
        client_version: client_version.dotted(),
        map_id: meta.mapId,
        map_display_name: meta.mapDisplayName,
        date_time: meta.dateTime,
        game_type: meta.gameType,
        arena_unique_id,
        own_player: participants.own,
        allies: participants.allies,
        enemies: participants.enemies,
        battle_stats,
        hidden,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::crypto::blowfish::Blowfish;
    use ::crypto::symmetriccipher::BlockEncryptor;
    use std::io::Write;

    const KEY: [u8; 16] = [
        0x29, 0xB7, 0xC9, 0x09, 0x38, 0x3F, 0x84, 0x88, 0xFA, 0x98, 0xEC, 0x4E, 0x13, 0x19, 0x79, 0xFB,
    ];

    fn encrypt(plaintext: &[u8]) -> Vec<u8> {
        let mut padded = plaintext.to_vec();
        while padded.len() % 8 != 0 {
            padded.push(0);
        }
        let blowfish = Blowfish::new(&KEY);
        let mut out = vec![0u8; padded.len()];
        let mut previous = [0u8; 8];
        for offset in (0..padded.len()).step_by(8) {
            let mut xored = [0u8; 8];
            for j in 0..8 {
                xored[j] = padded[offset + j] ^ previous[j];
            }
            blowfish.encrypt_block(&xored, &mut out[offset..offset + 8]);
            previous.copy_from_slice(&out[offset..offset + 8]);
        }
        out
    }

    fn frame(packet_type: u32, payload: &[u8]) -> Vec<u8> {
        let size = payload.len() as u32;
        let mut out = vec![];
        out.extend_from_slice(&size.to_le_bytes());
        out.extend_from_slice(&packet_type.to_le_bytes());
        out.extend_from_slice(&0f32.to_le_bytes());
        out.extend_from_slice(payload);
        out
    }

    /// Wraps a results-packet JSON body in its own `len:u32` prefix, the
    /// shape `battle_stats::parse_battle_results` expects.
    fn results_payload(json: &str) -> Vec<u8> {
        let mut out = (json.len() as u32).to_le_bytes().to_vec();
        out.extend_from_slice(json.as_bytes());
        out
    }

    fn build_replay(meta_json: &str, packets: &[u8]) -> Vec<u8> {
        let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(packets).unwrap();
        let compressed = encoder.finish().unwrap();
        let encrypted = encrypt(&compressed);

        let mut out = vec![];
        out.extend_from_slice(&0x11223344u32.to_le_bytes());
        out.extend_from_slice(&1u32.to_le_bytes());
        out.extend_from_slice(&(meta_json.len() as u32).to_le_bytes());
        out.extend_from_slice(meta_json.as_bytes());
        out.extend_from_slice(&(packets.len() as u32).to_le_bytes());
        out.extend_from_slice(&(encrypted.len() as u32).to_le_bytes());
        out.extend_from_slice(&encrypted);
        out
    }

    fn meta_json() -> String {
        r#"{
            "matchGroup": "pvp", "gameType": "CLAN", "clientVersionFromExe": "14,11,0,1",
            "mapDisplayName": "Fault Line", "mapId": 19, "mapName": "spaces/19_OC_prey",
            "dateTime": "03.01.2026 23:28:22", "playerID": 1, "playerName": "_meteor0090",
            "playerVehicle": "PZSD109-Chung-Mu", "playersPerTeam": 1, "teamsCount": 2,
            "vehicles": [
                {"shipId": 100, "relation": 0, "id": 1, "name": "_meteor0090"},
                {"shipId": 200, "relation": 2, "id": 2, "name": "enemy_one"}
            ]
        }"#
        .to_string()
    }

    #[test]
    fn decodes_a_complete_replay_with_battle_stats() {
        let results = r#"{"arenaUniqueID":"42","playersPublicInfo":{"1":[1,2,3]},"hidden":{"battle_result":{"winner_team_id":0}}}"#;
        let packets = frame(0x22, &results_payload(results));
        let bytes = build_replay(&meta_json(), &packets);
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.arena_unique_id.as_deref(), Some("42"));
        assert!(decoded.has_battle_stats());
        assert_eq!(decoded.hidden.winner_team_id, Some(0));
    }

    #[test]
    fn decodes_an_incomplete_replay_without_battle_stats() {
        let packets = frame(1, b"not a results packet");
        let bytes = build_replay(&meta_json(), &packets);
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.arena_unique_id, None);
        assert!(!decoded.has_battle_stats());
    }

    #[test]
    fn decode_is_idempotent() {
        let results = r#"{"arenaUniqueID":"42","playersPublicInfo":{"1":[1]},"hidden":{}}"#;
        let packets = frame(0x22, &results_payload(results));
        let bytes = build_replay(&meta_json(), &packets);
        let a = decode(&bytes).unwrap();
        let b = decode(&bytes).unwrap();
        assert_eq!(a.arena_unique_id, b.arena_unique_id);
        assert_eq!(a.map_id, b.map_id);
    }

    #[test]
    fn unsupported_version_fails_fast() {
        let meta = meta_json().replace("14,11,0,1", "1,0,0,1");
        let bytes = build_replay(&meta, &frame(1, b"x"));
        assert!(matches!(decode(&bytes), Err(DecodeError::UnsupportedVersion(_))));
    }
}
