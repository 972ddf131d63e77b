use serde_json::json;
use tracing::{info, warn};

use crate::state::AppState;

/// Outbound notification sink (spec.md §6): on `RENDERED` for a clan-game
/// match, post an embed linking to the match-detail page. Best-effort --
/// a webhook failure never unwinds the render pipeline that triggered it.
pub async fn notify_rendered(state: &AppState, arena_unique_id: &str) {
    let Some(url) = state.config.webhook_url.as_ref() else {
        return;
    };

    let body = json!({
        "embeds": [{
            "title": "Match ready",
            "url": format!("/api/match/{arena_unique_id}"),
        }]
    });

    match state.http.post(url).json(&body).send().await {
        Ok(response) if response.status().is_success() => {
            info!(arena_unique_id, "posted match-ready webhook");
        }
        Ok(response) => {
            warn!(arena_unique_id, status = %response.status(), "webhook rejected by receiver");
        }
        Err(e) => {
            warn!(arena_unique_id, error = %e, "failed to deliver match-ready webhook");
        }
    }
}
