use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub enum Language {
    Auto,
    English,
    Korean,
    Japanese,
    Chinese,
    French,
    German,
    Spanish,
    Italian,
    Portuguese,
    Russian,
    Dutch,
    Polish,
    Turkish,
    Vietnamese,
    Arabic,
    Hindi,
    Indonesian,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Auto => "auto",
            Language::English => "en",
            Language::Korean => "ko",
            Language::Japanese => "ja",
            Language::Chinese => "zh",
            Language::French => "fr",
            Language::German => "de",
            Language::Spanish => "es",
            Language::Italian => "it",
            Language::Portuguese => "pt",
            Language::Russian => "ru",
            Language::Dutch => "nl",
            Language::Polish => "pl",
            Language::Turkish => "tr",
            Language::Vietnamese => "vi",
            Language::Arabic => "ar",
            Language::Hindi => "hi",
            Language::Indonesian => "id",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for Language {
    fn from(s: &str) -> Self {
        match s {
            "en" => Language::English,
            "ko" => Language::Korean,
            "ja" => Language::Japanese,
            "zh" => Language::Chinese,
            "fr" => Language::French,
            "de" => Language::German,
            "es" => Language::Spanish,
            "it" => Language::Italian,
            "pt" => Language::Portuguese,
            "ru" => Language::Russian,
            "nl" => Language::Dutch,
            "pl" => Language::Polish,
            "tr" => Language::Turkish,
            "vi" => Language::Vietnamese,
            "ar" => Language::Arabic,
            "hi" => Language::Hindi,
            "id" => Language::Indonesian,
            _ => Language::Auto,
        }
    }
}

impl std::str::FromStr for Language {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Language::from(s))
    }
}

impl Serialize for Language {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Language::from(s.as_str()))
    }
}

/// Per-run options, threaded through the pipeline constructor.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub chunk_length_seconds: u32,
    pub source_language: Language,
    pub target_language: Language,
    pub transcription_provider: String,
    pub translation_provider: String,
}

impl PipelineConfig {
    /// Translation runs when the target differs from the source hint. With
    /// an auto source the actual language is unknown, so an English target
    /// is assumed to be covered by the transcription output itself and
    /// anything else gets translated.
    pub fn wants_translation(&self) -> bool {
        match self.source_language {
            Language::Auto => self.target_language != Language::English,
            src => self.target_language != src && self.target_language != Language::Auto,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunk_length_seconds: 900,
            source_language: Language::Auto,
            target_language: Language::English,
            transcription_provider: "whisper".to_string(),
            translation_provider: "openai".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub transcription: TranscriptionConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TranscriptionConfig {
    pub providers: Vec<WhisperProviderConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WhisperProviderConfig {
    pub id: String,
    /// Name or path of the whisper.cpp CLI binary. Defaults to `whisper-cli`.
    pub binary: Option<String>,
    pub model: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct LlmConfig {
    #[serde(default)]
    pub providers: Vec<LlmProviderConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LlmProviderConfig {
    pub id: String,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub model: String,
}

pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let home = dirs::home_dir().context("Could not find home directory")?;
    let config_path = home.join(".sublate/config.yaml");

    if !config_path.exists() {
        anyhow::bail!("Config file not found at {:?}", config_path);
    }

    load_app_config_from(&config_path)
}

pub fn load_app_config_from(path: &Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}
