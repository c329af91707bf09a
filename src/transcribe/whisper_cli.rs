use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use tokio::process::Command;

use super::{TranscriptFragment, TranscriptionClient};
use crate::config::{Language, WhisperProviderConfig};
use crate::error::{Result, SublateError};

const DEFAULT_BINARY: &str = "whisper-cli";

/// Transcription through a whisper.cpp command-line binary. The binary is
/// asked for JSON output into a scratch directory, which is parsed into
/// fragments and discarded.
pub struct WhisperCli {
    binary: String,
    model: String,
}

impl WhisperCli {
    pub fn new(conf: &WhisperProviderConfig) -> Self {
        Self {
            binary: conf
                .binary
                .clone()
                .unwrap_or_else(|| DEFAULT_BINARY.to_string()),
            model: conf.model.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WhisperOutput {
    transcription: Vec<WhisperSegment>,
}

#[derive(Debug, Deserialize)]
struct WhisperSegment {
    offsets: WhisperOffsets,
    text: String,
}

// whisper.cpp reports offsets in milliseconds
#[derive(Debug, Deserialize)]
struct WhisperOffsets {
    from: i64,
    to: i64,
}

#[async_trait]
impl TranscriptionClient for WhisperCli {
    async fn transcribe(
        &self,
        audio: &Path,
        language_hint: Language,
    ) -> Result<Vec<TranscriptFragment>> {
        let scratch = tempfile::tempdir()?;
        let out_base = scratch.path().join("transcript");

        let output = Command::new(&self.binary)
            .arg("-m")
            .arg(&self.model)
            .arg("-l")
            .arg(language_hint.as_str())
            .arg("-f")
            .arg(audio)
            .arg("-oj")
            .arg("-of")
            .arg(&out_base)
            .arg("-np")
            .output()
            .await
            .map_err(|e| SublateError::Transcription {
                path: audio.to_path_buf(),
                message: format!("failed to run {}: {}", self.binary, e),
            })?;

        if !output.status.success() {
            return Err(SublateError::Transcription {
                path: audio.to_path_buf(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let json_path = out_base.with_extension("json");
        let content = tokio::fs::read_to_string(&json_path).await?;
        let parsed: WhisperOutput =
            serde_json::from_str(&content).map_err(|e| SublateError::Transcription {
                path: audio.to_path_buf(),
                message: format!("unparsable whisper output: {e}"),
            })?;

        log::debug!(
            "whisper produced {} segments for {:?}",
            parsed.transcription.len(),
            audio
        );

        parsed
            .transcription
            .into_iter()
            // whisper occasionally emits zero-length placeholder segments
            .filter(|seg| seg.offsets.to > seg.offsets.from)
            .map(|seg| {
                TranscriptFragment::new(
                    seg.offsets.from as f64 / 1000.0,
                    seg.offsets.to as f64 / 1000.0,
                    seg.text.trim(),
                )
            })
            .collect()
    }
}
