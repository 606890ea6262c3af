use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result, anyhow};
use jsonschema::{JSONSchema, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    agent::AgentLimits,
    arena::RuntimeSettings,
    discussion::DiscussionWindow,
    types::RoleName,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub r#match: MatchRulesConfig,
    #[serde(default)]
    pub discussion: DiscussionConfig,
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub demo: DemoConfig,
}

fn default_min_players() -> usize {
    4
}

fn default_max_players() -> usize {
    10
}

fn default_night_secs() -> u64 {
    180
}

fn default_day_report_secs() -> u64 {
    60
}

fn default_day_discussion_secs() -> u64 {
    300
}

fn default_day_vote_secs() -> u64 {
    90
}

fn default_min_interval_ms() -> u64 {
    30_000
}

fn default_max_interval_ms() -> u64 {
    90_000
}

fn default_recent_messages() -> usize {
    10
}

fn default_generation_timeout_ms() -> u64 {
    8_000
}

fn default_noise_probability() -> f64 {
    0.1
}

fn default_transcript_capacity() -> usize {
    50
}

fn default_transcript_retain() -> usize {
    30
}

fn default_generation_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_generation_model() -> String {
    "gpt-4".to_string()
}

fn default_api_key_env() -> Option<String> {
    Some("OPENAI_API_KEY".to_string())
}

fn default_max_output_tokens() -> u32 {
    150
}

fn default_temperature() -> f32 {
    0.8
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_demo_bots() -> usize {
    8
}

fn default_enabled_true() -> bool {
    true
}

fn default_logging_dir() -> PathBuf {
    PathBuf::from("./logs/jin")
}

fn default_logging_filter() -> String {
    "info".to_string()
}

fn default_logging_rotation() -> LoggingRotation {
    LoggingRotation::Daily
}

fn default_logging_retention_days() -> usize {
    14
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseDurationsConfig {
    #[serde(default = "default_night_secs")]
    pub night_secs: u64,
    #[serde(default = "default_day_report_secs")]
    pub day_report_secs: u64,
    #[serde(default = "default_day_discussion_secs")]
    pub day_discussion_secs: u64,
    #[serde(default = "default_day_vote_secs")]
    pub day_vote_secs: u64,
}

impl Default for PhaseDurationsConfig {
    fn default() -> Self {
        Self {
            night_secs: default_night_secs(),
            day_report_secs: default_day_report_secs(),
            day_discussion_secs: default_day_discussion_secs(),
            day_vote_secs: default_day_vote_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRulesConfig {
    #[serde(default = "default_min_players")]
    pub min_players: usize,
    #[serde(default = "default_max_players")]
    pub max_players: usize,
    #[serde(default)]
    pub phases: PhaseDurationsConfig,
    /// Rows replacing the standard table, keyed by player count.
    #[serde(default)]
    pub role_distribution: BTreeMap<usize, BTreeMap<RoleName, u8>>,
}

impl Default for MatchRulesConfig {
    fn default() -> Self {
        Self {
            min_players: default_min_players(),
            max_players: default_max_players(),
            phases: PhaseDurationsConfig::default(),
            role_distribution: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscussionConfig {
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,
    #[serde(default = "default_max_interval_ms")]
    pub max_interval_ms: u64,
    #[serde(default = "default_recent_messages")]
    pub recent_messages: usize,
}

impl Default for DiscussionConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: default_min_interval_ms(),
            max_interval_ms: default_max_interval_ms(),
            recent_messages: default_recent_messages(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default = "default_generation_timeout_ms")]
    pub generation_timeout_ms: u64,
    #[serde(default = "default_noise_probability")]
    pub noise_probability: f64,
    #[serde(default = "default_transcript_capacity")]
    pub transcript_capacity: usize,
    #[serde(default = "default_transcript_retain")]
    pub transcript_retain: usize,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            generation_timeout_ms: default_generation_timeout_ms(),
            noise_probability: default_noise_probability(),
            transcript_capacity: default_transcript_capacity(),
            transcript_retain: default_transcript_retain(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_generation_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_generation_model")]
    pub model: String,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: Option<String>,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_generation_endpoint(),
            model: default_generation_model(),
            api_key_env: default_api_key_env(),
            max_output_tokens: default_max_output_tokens(),
            temperature: default_temperature(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    #[serde(default = "default_demo_bots")]
    pub bots: usize,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            bots: default_demo_bots(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LoggingRotation {
    Daily,
    Hourly,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_logging_filter")]
    pub filter: String,
    #[serde(default = "default_logging_rotation")]
    pub rotation: LoggingRotation,
    #[serde(default = "default_logging_retention_days")]
    pub retention_days: usize,
    #[serde(default = "default_enabled_true")]
    pub stderr_warn_enabled: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_logging_dir(),
            filter: default_logging_filter(),
            rotation: default_logging_rotation(),
            retention_days: default_logging_retention_days(),
            stderr_warn_enabled: true,
        }
    }
}

impl Config {
    pub fn load(config_path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let config_value: Value = json5::from_str(&config_content)
            .with_context(|| format!("failed to parse {}", config_path.display()))?;

        let config_base = config_path.parent().unwrap_or_else(|| Path::new("."));
        let schema_path = resolve_schema_path(config_base, &config_value)?;
        validate_against_schema(&config_value, &schema_path)?;

        let mut config: Config =
            serde_json::from_value(config_value).context("failed to deserialize jin config")?;
        if !config.logging.dir.is_absolute() {
            config.logging.dir = config_base.join(&config.logging.dir);
        }

        Ok(config)
    }

    pub fn runtime_settings(&self) -> RuntimeSettings {
        RuntimeSettings {
            discussion_window: DiscussionWindow::new(
                Duration::from_millis(self.discussion.min_interval_ms),
                Duration::from_millis(self.discussion.max_interval_ms),
            ),
            agent_limits: AgentLimits {
                generation_timeout: Duration::from_millis(self.agent.generation_timeout_ms),
                max_output_tokens: self.generation.max_output_tokens,
                noise_probability: self.agent.noise_probability,
                transcript_capacity: self.agent.transcript_capacity,
                transcript_retain: self.agent.transcript_retain,
            },
            recent_chat: self.discussion.recent_messages,
            seed: self.agent.seed,
            ..RuntimeSettings::default()
        }
    }
}

fn resolve_schema_path(config_base: &Path, config_value: &Value) -> Result<PathBuf> {
    if let Some(path_text) = config_value.get("$schema").and_then(|value| value.as_str()) {
        let configured = PathBuf::from(path_text);
        if configured.is_absolute() {
            return Ok(configured);
        }
        return Ok(config_base.join(&configured));
    }

    let local_default = config_base.join("jin.schema.json");
    if local_default.exists() {
        return Ok(local_default);
    }

    Err(anyhow!(
        "unable to resolve schema path: expected $schema in config or jin.schema.json next to it"
    ))
}

fn validate_against_schema(config_value: &Value, schema_path: &Path) -> Result<()> {
    let schema_content = fs::read_to_string(schema_path)
        .with_context(|| format!("failed to read schema {}", schema_path.display()))?;
    let schema: Value = serde_json::from_str(&schema_content)
        .with_context(|| format!("failed to parse schema {}", schema_path.display()))?;

    let compiled =
        JSONSchema::compile(&schema).map_err(|e| anyhow!("failed to compile schema: {e}"))?;

    match compiled.validate(config_value) {
        Ok(()) => Ok(()),
        Err(errors_iter) => {
            let validation_errors: Vec<ValidationError> = errors_iter.collect();
            let messages: Vec<String> = validation_errors
                .into_iter()
                .map(|error| error.to_string())
                .collect();
            Err(anyhow!("config validation failed: {}", messages.join("; ")))
        }
    }
}
