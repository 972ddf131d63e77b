use thiserror::Error;

/// Failure taxonomy from spec.md §7. Variants are kinds, not wrapped
/// stringly-typed catch-alls, matching the teacher's `ErrorKind` shape.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed container header")]
    MalformedHeader,
    #[error("failed to decrypt packet stream")]
    DecryptFailure,
    #[error("packet stream ended mid-frame")]
    TruncatedStream,
    #[error("unsupported client version: {0}")]
    UnsupportedVersion(String),
    #[error("invalid UTF-8 in meta block")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("invalid JSON in meta block")]
    Json(#[from] serde_json::Error),
    #[error("zlib inflate failed")]
    Inflate(#[source] std::io::Error),
}

/// Non-fatal: the decoder runs in lenient mode and returns a `DecodedReplay`
/// with `battle_stats = None` rather than failing the whole decode. Kept as
/// a distinct type so callers can `match` the ok-but-incomplete case instead
/// of threading a bool through `DecodedReplay`.
#[derive(Debug, Error)]
#[error("replay ended before the terminal BattleStats packet arrived")]
pub struct NoBattleStats;
