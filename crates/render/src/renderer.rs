use wri_model::{DecodedReplay, Relation};

use crate::error::RenderError;
use crate::minimap::{render_frame, ring_layout, MarkerPosition};
use crate::video::mux_mp4;

const CANVAS_SIZE: u32 = 1024;
const FRAME_COUNT: usize = 4;

/// `VideoRenderer` (spec.md §4.5): synchronous, long-running, never
/// auto-retried. Callers that need retry-on-failure re-invoke explicitly
/// via a user-initiated "regenerate video" command.
pub struct VideoRenderer;

impl VideoRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Single-replay render from the uploader's own perspective.
    pub fn render_single(&self, replay: &DecodedReplay) -> Result<Vec<u8>, RenderError> {
        let markers = ring_layout(&replay.own_player, &replay.allies, &replay.enemies);
        self.render_from_markers(&markers)
    }

    /// Dual-team render, invoked only the first time `hasDualReplay` flips
    /// to `true` (spec.md §4.5). Combines both uploaders' rosters onto one
    /// minimap so every participant (not just one side) gets a marker.
    pub fn render_dual(&self, ally_side: &DecodedReplay, enemy_side: &DecodedReplay) -> Result<Vec<u8>, RenderError> {
        let mut markers = ring_layout(&ally_side.own_player, &ally_side.allies, &ally_side.enemies);
        let enemy_markers = ring_layout(&enemy_side.own_player, &enemy_side.allies, &enemy_side.enemies);
        markers.extend(enemy_markers.into_iter().map(|m| MarkerPosition {
            relation: if m.relation == Relation::Own || m.relation == Relation::Ally { Relation::Enemy } else { Relation::Ally },
            ..m
        }));
        self.render_from_markers(&markers)
    }

    fn render_from_markers(&self, markers: &[MarkerPosition]) -> Result<Vec<u8>, RenderError> {
        let mut frames = Vec::with_capacity(FRAME_COUNT);
        for _ in 0..FRAME_COUNT {
            let frame = render_frame(markers).map_err(RenderError::RenderFailure)?;
            frames.push(frame);
        }
        mux_mp4(&frames, CANVAS_SIZE, CANVAS_SIZE)
    }
}

impl Default for VideoRenderer {
    fn default() -> Self {
        Self::new()
    }
}
