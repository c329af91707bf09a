mod config;
mod error;
mod media;
mod pipeline;
mod segment;
mod srt;
mod timeline;
mod transcribe;
mod translate;

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{Language, PipelineConfig};
use crate::media::{Ffprobe, FfmpegSplitter};
use crate::pipeline::Pipeline;
use crate::transcribe::whisper_cli::WhisperCli;
use crate::translate::llm::LlmTranslator;
use crate::translate::{Retrying, RetryPolicy, TranslationClient};

const MEDIA_EXTENSIONS: &[&str] = &[
    "mp4", "mkv", "mov", "avi", "webm", "mp3", "m4a", "wav", "flac",
];

#[derive(Parser)]
#[command(name = "sublate")]
#[command(about = "Chunked transcription and subtitle generation tool", long_about = None)]
struct Cli {
    /// Input media file, or a directory to scan for media files
    input: PathBuf,

    /// Source language hint for transcription (default: auto-detect)
    #[arg(short, long, default_value = "auto")]
    lang: Language,

    /// Target language for the subtitle text
    #[arg(short, long, default_value = "en")]
    target_lang: Language,

    /// Maximum chunk duration in seconds
    #[arg(short, long, default_value_t = 900)]
    chunk_duration: u32,

    /// Transcription provider id from the config file
    #[arg(long, default_value = "whisper")]
    transcription_provider: String,

    /// Translation provider id from the config file
    #[arg(long, default_value = "openai")]
    translation_provider: String,
}

fn scan_media_files(dir: &PathBuf) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in std::fs::read_dir(dir).with_context(|| format!("Failed to read {:?}", dir))? {
        let path = entry?.path();
        let is_media = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| MEDIA_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
            .unwrap_or(false);
        if path.is_file() && is_media {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let app_config = config::load_app_config().context("Failed to load app config")?;

    let pipeline_config = PipelineConfig {
        chunk_length_seconds: cli.chunk_duration,
        source_language: cli.lang,
        target_language: cli.target_lang,
        transcription_provider: cli.transcription_provider,
        translation_provider: cli.translation_provider,
    };

    let whisper_config = app_config
        .transcription
        .providers
        .iter()
        .find(|p| p.id == pipeline_config.transcription_provider)
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Transcription provider {} not found in config",
                pipeline_config.transcription_provider
            )
        })?;
    let transcriber = Arc::new(WhisperCli::new(whisper_config));

    let translator: Option<Arc<dyn TranslationClient>> = if pipeline_config.wants_translation() {
        let provider = app_config
            .llm
            .providers
            .iter()
            .find(|p| p.id == pipeline_config.translation_provider)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Translation provider {} not found in config",
                    pipeline_config.translation_provider
                )
            })?;
        Some(Arc::new(Retrying::new(
            LlmTranslator::new(provider.clone()),
            RetryPolicy::default(),
        )))
    } else {
        None
    };

    let pipeline = Pipeline::new(
        Arc::new(Ffprobe),
        Arc::new(FfmpegSplitter),
        transcriber,
        translator,
        pipeline_config,
    );

    let files = if cli.input.is_dir() {
        scan_media_files(&cli.input)?
    } else {
        vec![cli.input.clone()]
    };

    if files.is_empty() {
        anyhow::bail!("No media files found in {:?}", cli.input);
    }

    for file in files {
        println!("Processing {:?}", file);

        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
                .unwrap()
                .progress_chars("#>-"),
        );

        let output = pipeline
            .run(&file, &pb)
            .await
            .with_context(|| format!("Failed to generate subtitles for {:?}", file))?;

        pb.finish_and_clear();
        println!("Saved SRT to {:?}", output);
    }

    Ok(())
}
