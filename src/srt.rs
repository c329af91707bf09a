use std::path::Path;

use crate::error::{Result, SublateError};
use crate::timeline::GlobalSegment;

/// Formats seconds as an SRT timestamp (HH:MM:SS,mmm). Each field is
/// truncated, not rounded, so 1.9999 renders as 00:00:01,999.
pub fn format_timestamp(seconds: f64) -> Result<String> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(SublateError::InvalidTimestamp(format!(
            "{seconds} is not a valid cue time"
        )));
    }

    let hours = (seconds / 3600.0).floor() as u64;
    let minutes = ((seconds % 3600.0) / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    let millis = ((seconds - seconds.floor()) * 1000.0).floor() as u64;

    Ok(format!("{hours:02}:{minutes:02}:{secs:02},{millis:03}"))
}

/// Serializes segments into SRT text. Cues are renumbered from 1 by
/// position; any upstream numbering is ignored. A segment with
/// `start >= end` is a contract violation, not something to repair here.
pub fn encode(segments: &[GlobalSegment]) -> Result<String> {
    let mut out = String::new();

    for (i, segment) in segments.iter().enumerate() {
        if segment.start >= segment.end {
            return Err(SublateError::InvalidTimestamp(format!(
                "cue {} has start {} >= end {}",
                i + 1,
                segment.start,
                segment.end
            )));
        }

        out.push_str(&format!("{}\n", i + 1));
        out.push_str(&format!(
            "{} --> {}\n",
            format_timestamp(segment.start)?,
            format_timestamp(segment.end)?
        ));
        out.push_str(segment.text.trim());
        out.push('\n');
        out.push('\n');
    }

    Ok(out)
}

/// Encodes and writes the subtitle file as UTF-8, overwriting any existing
/// file at `path`.
pub fn write_srt(path: &Path, segments: &[GlobalSegment]) -> Result<()> {
    let content = encode(segments)?;
    std::fs::write(path, content)?;
    Ok(())
}
