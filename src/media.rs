use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;

use crate::error::{Result, SublateError};

/// Queries the duration of a media file from its container metadata.
#[async_trait]
pub trait DurationProbe: Send + Sync {
    async fn duration_seconds(&self, path: &Path) -> Result<f64>;
}

/// Materializes media artifacts with an external tool: extracts the audio
/// track of an asset, and cuts bounded time ranges out of it without
/// re-encoding.
#[async_trait]
pub trait Splitter: Send + Sync {
    async fn extract_audio(&self, input: &Path, output: &Path) -> Result<()>;

    async fn split(
        &self,
        input: &Path,
        start_seconds: f64,
        length_seconds: f64,
        output: &Path,
    ) -> Result<()>;
}

/// `ffprobe`-backed duration probe.
pub struct Ffprobe;

#[async_trait]
impl DurationProbe for Ffprobe {
    async fn duration_seconds(&self, path: &Path) -> Result<f64> {
        let output = Command::new("ffprobe")
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(path)
            .output()
            .await
            .map_err(|e| SublateError::Probe {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(SublateError::Probe {
                path: path.to_path_buf(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let duration = stdout
            .trim()
            .parse::<f64>()
            .map_err(|e| SublateError::Probe {
                path: path.to_path_buf(),
                message: format!("unparsable duration {:?}: {}", stdout.trim(), e),
            })?;

        log::debug!("probed {:?}: {:.3}s", path, duration);
        Ok(duration)
    }
}

/// `ffmpeg`-backed audio extraction and range splitting.
pub struct FfmpegSplitter;

#[async_trait]
impl Splitter for FfmpegSplitter {
    // ffmpeg -y -i input -vn -acodec libmp3lame -b:a 160k -ar 16000 -ac 1 output.mp3
    async fn extract_audio(&self, input: &Path, output: &Path) -> Result<()> {
        let mut cmd = Command::new("ffmpeg");
        cmd.arg("-y")
            .arg("-i")
            .arg(input)
            .args([
                "-vn", "-acodec", "libmp3lame", "-b:a", "160k", "-ar", "16000", "-ac", "1",
            ])
            .arg(output)
            .args(["-hide_banner", "-loglevel", "error"]);

        run_ffmpeg(cmd, input).await
    }

    // ffmpeg -y -i input -ss start -t length -acodec copy output
    async fn split(
        &self,
        input: &Path,
        start_seconds: f64,
        length_seconds: f64,
        output: &Path,
    ) -> Result<()> {
        let mut cmd = Command::new("ffmpeg");
        cmd.arg("-y")
            .arg("-i")
            .arg(input)
            .args([
                "-ss",
                &start_seconds.to_string(),
                "-t",
                &length_seconds.to_string(),
                "-acodec",
                "copy",
            ])
            .arg(output)
            .args(["-hide_banner", "-loglevel", "error"]);

        run_ffmpeg(cmd, input).await
    }
}

async fn run_ffmpeg(mut cmd: Command, input: &Path) -> Result<()> {
    let output = cmd.output().await.map_err(|e| SublateError::Tool {
        tool: "ffmpeg",
        path: input.to_path_buf(),
        message: e.to_string(),
    })?;

    if !output.status.success() {
        return Err(SublateError::Tool {
            tool: "ffmpeg",
            path: input.to_path_buf(),
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(())
}
