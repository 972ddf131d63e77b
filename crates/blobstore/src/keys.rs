/// Key under which a raw `.wowsreplay` upload is stored, namespaced by
/// uploader so two players' files never collide even if they pick the same
/// filename.
pub fn replay_key(uploader_player_id: i64, file_name: &str) -> String {
    format!("replays/{}/{}", uploader_player_id, file_name)
}

/// Key for a rendered highlight video. `tag` is `"single"` or `"dual"`,
/// matching the MATCH record's `mp4S3Key` / `dualMp4S3Key` fields.
pub fn video_key(arena_unique_id: &str, tag: &str) -> String {
    format!("videos/{}/{}.mp4", arena_unique_id, tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replay_key_namespaces_by_uploader() {
        assert_eq!(replay_key(42, "battle.wowsreplay"), "replays/42/battle.wowsreplay");
    }

    #[test]
    fn video_key_is_tagged_single_or_dual() {
        assert_eq!(video_key("arena-1", "single"), "videos/arena-1/single.mp4");
        assert_eq!(video_key("arena-1", "dual"), "videos/arena-1/dual.mp4");
    }
}
