use std::time::Duration;

use tracing::{error, info, warn};
use wri_assembler::{assemble, AssembleInput};
use wri_blobstore::{replay_key, video_key};
use wri_model::{DecodedReplay, GameTypeBucket};
use wri_store::MatchOutcome;

use crate::error::ApiError;
use crate::state::AppState;
use crate::webhook;

/// Upload-boundary state machine (spec.md §4.6):
/// `UPLOADED -> DECODING -> PERSISTED -> (RENDER_QUEUED -> RENDERED | RENDER_FAILED)`, with
/// `DECODING -> DECODE_FAILED` on the way. The orchestrator keeps no state
/// of its own between calls -- which records exist for an arena-id *is*
/// the state, per spec.md §4.6.
#[derive(Debug, Eq, PartialEq)]
pub enum IngestOutcome {
    Persisted { arena_unique_id: String, render_queued: RenderQueue },
    DecodeFailed(String),
}

#[derive(Debug, Eq, PartialEq)]
pub enum RenderQueue {
    None,
    Single,
    Dual,
}

pub struct UploadRequest {
    pub replay_bytes: Vec<u8>,
    pub uploader_discord_id: String,
    pub uploaded_at_unix: i64,
}

/// Runs `UPLOADED -> DECODING -> PERSISTED` (or `-> DECODE_FAILED`)
/// synchronously, writes the raw blob, then enqueues a render as a
/// detached task if eligibility was reached -- VideoRenderer's own wall
/// clock is minutes-long and must not hold the interactive handler open
/// (spec.md §5's ≤30s decode deadline).
pub async fn ingest(state: &AppState, request: UploadRequest) -> Result<IngestOutcome, ApiError> {
    let UploadRequest { replay_bytes, uploader_discord_id, uploaded_at_unix } = request;
    let raw_bytes = replay_bytes.clone();
    let file_size_bytes = replay_bytes.len() as u64;

    let decode_result =
        tokio::time::timeout(Duration::from_secs(state.config.decode_deadline_secs), tokio::task::spawn_blocking(move || wri_decoder::decode(&replay_bytes))).await;

    let replay = match decode_result {
        Err(_) => return Err(ApiError::TimedOut),
        Ok(Err(join_err)) => return Err(ApiError::Internal(join_err.to_string())),
        Ok(Ok(Err(decode_err))) => {
            warn!(error = %decode_err, "decode failed, recording DECODE_FAILED");
            return Ok(IngestOutcome::DecodeFailed(decode_err.to_string()));
        }
        Ok(Ok(Ok(replay))) => replay,
    };

    let object_store_key = replay_key(replay.own_player.player_id, "upload.wowsreplay");
    state.blobs.put(&object_store_key, raw_bytes).await.map_err(|e| ApiError::Internal(e.to_string()))?;

    let (player_stats, win_loss) = wri_stats::parse_stats_and_outcome(&replay, state.ship_params.as_ref(), &state.skill_names, &state.upgrade_names)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let assembled = assemble(AssembleInput {
        replay: &replay,
        player_stats: &player_stats,
        win_loss,
        uploader_discord_id,
        object_store_key,
        file_size_bytes,
        uploaded_at_unix,
    });

    let arena_unique_id = assembled.match_record.arena_unique_id.clone();
    let game_type = assembled.match_record.game_type;

    let persist_result = state
        .persister
        .persist(&assembled.match_record, assembled.stats_record.as_ref(), &assembled.upload_record)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    info!(arena_unique_id = %arena_unique_id, outcome = ?persist_result.match_outcome, "persisted match");

    let render_queue = if persist_result.match_outcome == MatchOutcome::Created {
        RenderQueue::Single
    } else if persist_result.dual_replay_flipped {
        RenderQueue::Dual
    } else {
        RenderQueue::None
    };

    match &render_queue {
        RenderQueue::Single => spawn_single_render(state.clone(), arena_unique_id.clone(), game_type, replay),
        RenderQueue::Dual => spawn_dual_render(state.clone(), arena_unique_id.clone(), game_type, replay),
        RenderQueue::None => {}
    }

    Ok(IngestOutcome::Persisted { arena_unique_id, render_queued: render_queue })
}

/// `RENDER_QUEUED -> RENDERED | RENDER_FAILED` for the single-replay
/// variant: runs detached so the upload handler returns immediately. A
/// failure here is `RenderFailure` (spec.md §7) -- logged, never retried
/// automatically, left for a user-initiated "regenerate video" request.
fn spawn_single_render(state: AppState, arena_unique_id: String, game_type: GameTypeBucket, replay: DecodedReplay) {
    tokio::spawn(async move {
        let renderer = state.renderer.clone();
        let rendered = tokio::task::spawn_blocking(move || renderer.render_single(&replay)).await;
        finish_render(&state, &arena_unique_id, game_type, "single", false, rendered).await;
    });
}

/// Dual-render variant: re-fetches and re-decodes the opposing uploader's
/// replay from object storage (the only copy of it this worker ever had),
/// then renders the combined minimap.
fn spawn_dual_render(state: AppState, arena_unique_id: String, game_type: GameTypeBucket, ally_side: DecodedReplay) {
    tokio::spawn(async move {
        let table = wri_store::match_table(game_type);
        let opposing = match fetch_opposing_replay(&state, &table, &arena_unique_id, ally_side.own_player.player_id).await {
            Ok(Some(replay)) => replay,
            Ok(None) => {
                warn!(arena_unique_id = %arena_unique_id, "dual render queued but no opposing upload found yet");
                return;
            }
            Err(e) => {
                error!(arena_unique_id = %arena_unique_id, error = %e, "failed to fetch opposing replay for dual render");
                return;
            }
        };
        let renderer = state.renderer.clone();
        let rendered = tokio::task::spawn_blocking(move || renderer.render_dual(&ally_side, &opposing)).await;
        finish_render(&state, &arena_unique_id, game_type, "dual", true, rendered).await;
    });
}

async fn fetch_opposing_replay(
    state: &AppState,
    table: &str,
    arena_unique_id: &str,
    own_player_id: i64,
) -> Result<Option<DecodedReplay>, String> {
    let rows = state.store.list_by_pk(table, arena_unique_id).await.map_err(|e| e.to_string())?;
    for row in rows {
        if !row.sk.starts_with("UPLOAD#") || row.sk == format!("UPLOAD#{own_player_id}") {
            continue;
        }
        let upload: wri_model::UploadRecord = serde_json::from_value(row.value).map_err(|e| e.to_string())?;
        let bytes = state.blobs.get(&upload.object_store_key).await.map_err(|e| e.to_string())?;
        let replay = wri_decoder::decode(&bytes).map_err(|e| e.to_string())?;
        return Ok(Some(replay));
    }
    Ok(None)
}

async fn finish_render(
    state: &AppState,
    arena_unique_id: &str,
    game_type: GameTypeBucket,
    tag: &str,
    dual: bool,
    rendered: Result<Result<Vec<u8>, wri_render::RenderError>, tokio::task::JoinError>,
) {
    let mp4_bytes = match rendered {
        Ok(Ok(bytes)) => bytes,
        Ok(Err(e)) => {
            warn!(arena_unique_id, tag, error = %e, "render failed, MATCH keeps no mp4 key");
            return;
        }
        Err(join_err) => {
            error!(arena_unique_id, tag, error = %join_err, "render task panicked");
            return;
        }
    };

    let key = video_key(arena_unique_id, tag);
    if let Err(e) = state.blobs.put(&key, mp4_bytes).await {
        error!(arena_unique_id, tag, error = %e, "failed to write rendered video");
        return;
    }
    if let Err(e) = state.persister.record_render_success(game_type, arena_unique_id, &key, 0, dual).await {
        error!(arena_unique_id, error = %e, "failed to record render result");
        return;
    }
    if game_type == GameTypeBucket::Clan {
        webhook::notify_rendered(state, arena_unique_id).await;
    }
}
