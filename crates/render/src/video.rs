use std::io::Write;
use std::process::{Command, Stdio};

use crate::error::RenderError;

/// Frame duration; short enough to keep renders fast, long enough that a
/// handful of frames is a watchable clip.
const FRAME_SECONDS: f64 = 2.0;

/// Muxes RGB frames (each `width*height*3` bytes) into an MP4 by piping raw
/// video into `ffmpeg`. Encoding itself is delegated to the system binary
/// -- matching the renderer's black-box contract, which specifies only the
/// input/output shape, not an encoding algorithm to reimplement.
pub fn mux_mp4(frames: &[Vec<u8>], width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
    if frames.is_empty() {
        return Err(RenderError::RenderFailure("no frames to encode".to_string()));
    }

    let fps = format!("{}", 1.0 / FRAME_SECONDS);
    let size = format!("{}x{}", width, height);
    let mut child = Command::new("ffmpeg")
        .args([
            "-y",
            "-f", "rawvideo",
            "-pix_fmt", "rgb24",
            "-s", &size,
            "-r", &fps,
            "-i", "-",
            "-c:v", "libx264",
            "-pix_fmt", "yuv420p",
            "-f", "mp4",
            "-movflags", "frag_keyframe+empty_moov",
            "-",
        ])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| RenderError::RenderFailure(format!("failed to spawn ffmpeg: {e}")))?;

    {
        let stdin = child.stdin.as_mut().ok_or_else(|| RenderError::RenderFailure("ffmpeg stdin unavailable".to_string()))?;
        for frame in frames {
            stdin.write_all(frame).map_err(|e| RenderError::RenderFailure(format!("writing frame to ffmpeg: {e}")))?;
        }
    }

    let output = child.wait_with_output().map_err(|e| RenderError::RenderFailure(format!("ffmpeg exited abnormally: {e}")))?;
    if !output.status.success() {
        return Err(RenderError::RenderFailure(format!(
            "ffmpeg failed with status {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr)
        )));
    }
    Ok(output.stdout)
}
