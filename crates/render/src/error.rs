use thiserror::Error;

/// Corresponds to spec.md §4.5's `RenderFailure`: the render is never
/// retried automatically, so the cause string is what a user sees on a
/// "regenerate video" request.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("render failed: {0}")]
    RenderFailure(String),
}
