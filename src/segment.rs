use std::path::{Path, PathBuf};

use crate::error::{Result, SublateError};
use crate::media::Splitter;

/// One planned slice of the source audio. Descriptors tile the whole
/// duration with no gaps or overlaps.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkDescriptor {
    pub index: usize,
    pub nominal_start: f64,
    pub nominal_length: f64,
    pub artifact_path: PathBuf,
}

/// Computes the chunk plan for a recording of `total_duration` seconds cut
/// into at most `chunk_length`-second pieces. Artifact paths are assigned
/// under `work_dir` but nothing is written here.
pub fn plan_chunks(
    total_duration: f64,
    chunk_length: f64,
    work_dir: &Path,
) -> Result<Vec<ChunkDescriptor>> {
    if !total_duration.is_finite() || total_duration <= 0.0 {
        return Err(SublateError::InvalidInput(format!(
            "total duration must be positive, got {total_duration}"
        )));
    }
    if !chunk_length.is_finite() || chunk_length <= 0.0 {
        return Err(SublateError::InvalidInput(format!(
            "chunk length must be positive, got {chunk_length}"
        )));
    }

    let count = (total_duration / chunk_length).ceil() as usize;

    let chunks = (0..count)
        .map(|index| {
            let nominal_start = index as f64 * chunk_length;
            ChunkDescriptor {
                index,
                nominal_start,
                nominal_length: chunk_length.min(total_duration - nominal_start),
                artifact_path: work_dir.join(format!("chunk-{index:04}.mp3")),
            }
        })
        .collect();

    Ok(chunks)
}

/// Cuts one artifact per descriptor out of `audio`. The first failing cut
/// aborts the whole step; no partial chunk set is usable after an error.
pub async fn materialize(
    audio: &Path,
    chunks: &[ChunkDescriptor],
    splitter: &dyn Splitter,
) -> Result<()> {
    for chunk in chunks {
        log::debug!(
            "splitting chunk {} at {:.1}s (+{:.1}s)",
            chunk.index,
            chunk.nominal_start,
            chunk.nominal_length
        );
        splitter
            .split(
                audio,
                chunk.nominal_start,
                chunk.nominal_length,
                &chunk.artifact_path,
            )
            .await?;
    }
    Ok(())
}
