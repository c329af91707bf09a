use indicatif::ProgressBar;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::PipelineConfig;
use crate::error::{Result, SublateError};
use crate::media::{DurationProbe, Splitter};
use crate::segment;
use crate::srt;
use crate::timeline::{self, ChunkTranscript};
use crate::transcribe::TranscriptionClient;
use crate::translate::TranslationClient;

/// Sequences one media asset through the whole pipeline: probe, extract,
/// split, per-chunk transcribe (and optionally translate), reconcile,
/// encode, write. Chunk artifacts live in a scoped temp directory that is
/// removed when the run ends, on success and on failure alike.
pub struct Pipeline {
    probe: Arc<dyn DurationProbe>,
    splitter: Arc<dyn Splitter>,
    transcriber: Arc<dyn TranscriptionClient>,
    translator: Option<Arc<dyn TranslationClient>>,
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(
        probe: Arc<dyn DurationProbe>,
        splitter: Arc<dyn Splitter>,
        transcriber: Arc<dyn TranscriptionClient>,
        translator: Option<Arc<dyn TranslationClient>>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            probe,
            splitter,
            transcriber,
            translator,
            config,
        }
    }

    /// Runs the pipeline for one asset and returns the path of the written
    /// subtitle file.
    pub async fn run(&self, asset: &Path, pb: &ProgressBar) -> Result<PathBuf> {
        let duration = self.probe.duration_seconds(asset).await?;
        log::info!("{:?} is {:.1}s long", asset, duration);

        // scope guard: dropping the dir deletes the extracted audio and all
        // chunk artifacts, also when an error path returns early
        let work_dir = tempfile::tempdir()?;

        let audio_path = work_dir.path().join("audio.mp3");
        self.splitter.extract_audio(asset, &audio_path).await?;

        let chunks = segment::plan_chunks(
            duration,
            self.config.chunk_length_seconds as f64,
            work_dir.path(),
        )?;
        segment::materialize(&audio_path, &chunks, self.splitter.as_ref()).await?;

        pb.set_length(chunks.len() as u64);

        let translate = self.config.wants_translation();
        if translate && self.translator.is_none() {
            return Err(SublateError::InvalidInput(format!(
                "target language {} requires a translation provider",
                self.config.target_language
            )));
        }

        let mut transcripts = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            log::info!("transcribing chunk {}/{}", chunk.index + 1, chunks.len());

            // re-probe the artifact: its real length may differ from the
            // nominal one, and the offset fold must use what was measured
            let measured_length = self.probe.duration_seconds(&chunk.artifact_path).await?;

            let mut fragments = self
                .transcriber
                .transcribe(&chunk.artifact_path, self.config.source_language)
                .await?;

            if translate {
                if let Some(translator) = &self.translator {
                    fragments = timeline::translate_fragments(
                        fragments,
                        translator.as_ref(),
                        self.config.target_language,
                    )
                    .await?;
                }
            }

            transcripts.push(ChunkTranscript {
                measured_length,
                fragments,
            });
            pb.inc(1);
        }

        let segments = timeline::reconcile(&transcripts);

        let stem = asset
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                SublateError::InvalidInput(format!("{:?} has no usable file name", asset))
            })?;
        let output_path = asset
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(format!("{stem}.srt"));

        srt::write_srt(&output_path, &segments)?;
        log::info!("wrote {} cues to {:?}", segments.len(), output_path);

        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Language;
    use crate::transcribe::TranscriptFragment;
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn chunk_index(path: &Path) -> Option<usize> {
        path.file_name()?
            .to_str()?
            .strip_prefix("chunk-")?
            .strip_suffix(".mp3")?
            .parse()
            .ok()
    }

    struct FakeProbe {
        asset_duration: f64,
        chunk_durations: Vec<f64>,
    }

    #[async_trait]
    impl DurationProbe for FakeProbe {
        async fn duration_seconds(&self, path: &Path) -> Result<f64> {
            match chunk_index(path) {
                Some(i) => Ok(self.chunk_durations[i]),
                None => Ok(self.asset_duration),
            }
        }
    }

    #[derive(Default)]
    struct FakeSplitter {
        created: Mutex<Vec<PathBuf>>,
    }

    impl FakeSplitter {
        fn touch(&self, path: &Path) -> Result<()> {
            std::fs::write(path, b"")?;
            self.created.lock().unwrap().push(path.to_path_buf());
            Ok(())
        }
    }

    #[async_trait]
    impl Splitter for FakeSplitter {
        async fn extract_audio(&self, _input: &Path, output: &Path) -> Result<()> {
            self.touch(output)
        }

        async fn split(
            &self,
            _input: &Path,
            _start_seconds: f64,
            _length_seconds: f64,
            output: &Path,
        ) -> Result<()> {
            self.touch(output)
        }
    }

    struct FakeTranscriber {
        per_chunk: Vec<Vec<TranscriptFragment>>,
        fail_at: Option<usize>,
    }

    #[async_trait]
    impl TranscriptionClient for FakeTranscriber {
        async fn transcribe(
            &self,
            audio: &Path,
            _language_hint: Language,
        ) -> Result<Vec<TranscriptFragment>> {
            let index = chunk_index(audio).unwrap();
            if self.fail_at == Some(index) {
                return Err(SublateError::Transcription {
                    path: audio.to_path_buf(),
                    message: "model refused".to_string(),
                });
            }
            Ok(self.per_chunk[index].clone())
        }
    }

    struct StarTranslator;

    #[async_trait]
    impl TranslationClient for StarTranslator {
        async fn translate(&self, text: &str, _target: Language) -> Result<String> {
            Ok(format!("{text}*"))
        }
    }

    fn fragment(start: f64, end: f64, text: &str) -> TranscriptFragment {
        TranscriptFragment::new(start, end, text).unwrap()
    }

    fn two_chunk_setup(
        fail_at: Option<usize>,
        translator: Option<Arc<dyn TranslationClient>>,
        target: Language,
    ) -> (Pipeline, Arc<FakeSplitter>) {
        let splitter = Arc::new(FakeSplitter::default());
        let pipeline = Pipeline::new(
            Arc::new(FakeProbe {
                asset_duration: 12.0,
                chunk_durations: vec![9.5, 2.5],
            }),
            splitter.clone(),
            Arc::new(FakeTranscriber {
                per_chunk: vec![
                    vec![fragment(0.0, 2.0, "a")],
                    vec![fragment(0.5, 1.5, "b")],
                ],
                fail_at,
            }),
            translator,
            PipelineConfig {
                chunk_length_seconds: 10,
                source_language: Language::Auto,
                target_language: target,
                ..PipelineConfig::default()
            },
        );
        (pipeline, splitter)
    }

    #[tokio::test]
    async fn writes_srt_with_measured_offsets() {
        let dir = tempfile::tempdir().unwrap();
        let asset = dir.path().join("talk.mp4");
        std::fs::write(&asset, b"").unwrap();

        let (pipeline, _) = two_chunk_setup(None, None, Language::English);
        let output = pipeline.run(&asset, &ProgressBar::hidden()).await.unwrap();

        assert_eq!(output, dir.path().join("talk.srt"));
        let srt = std::fs::read_to_string(&output).unwrap();
        // second cue offset is the first chunk's measured 9.5s, not the
        // nominal 10s
        assert_eq!(
            srt,
            "1\n00:00:00,000 --> 00:00:02,000\na\n\n\
             2\n00:00:10,000 --> 00:00:11,000\nb\n\n"
        );
    }

    #[tokio::test]
    async fn translates_text_without_touching_times() {
        let dir = tempfile::tempdir().unwrap();
        let asset = dir.path().join("talk.mp4");
        std::fs::write(&asset, b"").unwrap();

        let (pipeline, _) =
            two_chunk_setup(None, Some(Arc::new(StarTranslator)), Language::Korean);
        let output = pipeline.run(&asset, &ProgressBar::hidden()).await.unwrap();

        let srt = std::fs::read_to_string(&output).unwrap();
        assert_eq!(
            srt,
            "1\n00:00:00,000 --> 00:00:02,000\na*\n\n\
             2\n00:00:10,000 --> 00:00:11,000\nb*\n\n"
        );
    }

    #[tokio::test]
    async fn cleans_up_artifacts_when_a_chunk_fails() {
        let dir = tempfile::tempdir().unwrap();
        let asset = dir.path().join("talk.mp4");
        std::fs::write(&asset, b"").unwrap();

        let (pipeline, splitter) = two_chunk_setup(Some(1), None, Language::English);
        let err = pipeline
            .run(&asset, &ProgressBar::hidden())
            .await
            .unwrap_err();
        assert!(matches!(err, SublateError::Transcription { .. }));

        let created = splitter.created.lock().unwrap();
        assert_eq!(created.len(), 3); // extracted audio + two chunks
        for path in created.iter() {
            assert!(!path.exists(), "{:?} should have been cleaned up", path);
        }
        assert!(!dir.path().join("talk.srt").exists());
    }

    #[tokio::test]
    async fn missing_translator_is_an_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let asset = dir.path().join("talk.mp4");
        std::fs::write(&asset, b"").unwrap();

        let (pipeline, _) = two_chunk_setup(None, None, Language::Korean);
        let err = pipeline
            .run(&asset, &ProgressBar::hidden())
            .await
            .unwrap_err();
        assert!(matches!(err, SublateError::InvalidInput(_)));
    }
}
