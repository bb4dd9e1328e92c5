//! Engine configuration
//!
//! Built once at startup, usually from the environment:
//!
//! | Variable | Default |
//! |---|---|
//! | `COMPLIANCE_SOURCES` | `catalog` |
//! | `LLM_BASE_URL` | `https://api.openai.com/v1` |
//! | `LLM_API_KEY` | unset (AI source and narrative reports need it) |
//! | `LLM_MODEL` | `gpt-4o-mini` |
//! | `FEDERAL_REGISTER_URL` | `https://www.federalregister.gov/api/v1` |
//! | `SOURCE_TIMEOUT_MS` | `30000` |
//! | `GENERATION_TIMEOUT_MS` | `60000` |
//! | `PERSISTENCE_MODE` | `disabled` |
//! | `DATABASE_URL` | unset (required for `sqlite`) |

use serde::{Deserialize, Serialize};

use crate::aggregator::DEFAULT_SOURCE_TIMEOUT_MS;
use crate::dedup::DedupConfig;
use crate::error::ConfigError;
use crate::planner::PlannerConfig;
use crate::report::DEFAULT_GENERATION_TIMEOUT_MS;
use crate::sources::SourceConfig;
use crate::store::PersistenceMode;

pub const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_LLM_BASE_URL.to_string(),
            api_key: None,
            model: DEFAULT_LLM_MODEL.to_string(),
            temperature: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Queried in this order for every planned query
    pub sources: Vec<SourceConfig>,
    pub llm: LlmConfig,
    /// Ask the LLM for the narrative report instead of always using the template
    pub narrative_reports: bool,
    pub source_timeout_ms: u64,
    pub generation_timeout_ms: u64,
    pub planner: PlannerConfig,
    pub dedup: DedupConfig,
    pub persistence: PersistenceMode,
    pub database_url: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sources: vec![SourceConfig::Catalog],
            llm: LlmConfig::default(),
            narrative_reports: false,
            source_timeout_ms: DEFAULT_SOURCE_TIMEOUT_MS,
            generation_timeout_ms: DEFAULT_GENERATION_TIMEOUT_MS,
            planner: PlannerConfig::default(),
            dedup: DedupConfig::default(),
            persistence: PersistenceMode::default(),
            database_url: None,
        }
    }
}

fn parse_ms(key: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
        key,
        reason: e.to_string(),
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn check_url(key: &'static str, url: &str) -> Result<(), ConfigError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            key,
            reason: format!("'{}' is not an http(s) URL", url),
        })
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| non_blank(lookup(key));
        let mut config = Self::default();

        if let Some(list) = get("COMPLIANCE_SOURCES") {
            config.sources = SourceConfig::parse_list(&list)?;
        }

        if let Some(url) = get("LLM_BASE_URL") {
            config.llm.base_url = url;
        }
        config.llm.api_key = get("LLM_API_KEY");
        if let Some(model) = get("LLM_MODEL") {
            config.llm.model = model;
        }
        config.narrative_reports = config.llm.api_key.is_some();

        if let Some(url) = get("FEDERAL_REGISTER_URL") {
            for source in config.sources.iter_mut() {
                if let SourceConfig::FederalRegister { base_url, .. } = source {
                    *base_url = url.clone();
                }
            }
        }

        if let Some(ms) = get("SOURCE_TIMEOUT_MS") {
            config.source_timeout_ms = parse_ms("SOURCE_TIMEOUT_MS", &ms)?;
        }
        if let Some(ms) = get("GENERATION_TIMEOUT_MS") {
            config.generation_timeout_ms = parse_ms("GENERATION_TIMEOUT_MS", &ms)?;
        }

        if let Some(mode) = get("PERSISTENCE_MODE") {
            config.persistence = PersistenceMode::parse(&mode)?;
        }
        config.database_url = get("DATABASE_URL");

        config.validate()?;
        Ok(config)
    }

    pub fn uses_llm(&self) -> bool {
        self.narrative_reports
            || self
                .sources
                .iter()
                .any(|s| matches!(s, SourceConfig::AiGenerated { .. }))
    }

    /// Reject configurations that cannot work, before anything is built
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sources.is_empty() {
            return Err(ConfigError::Missing("COMPLIANCE_SOURCES"));
        }

        if self.uses_llm() {
            check_url("LLM_BASE_URL", &self.llm.base_url)?;
            if non_blank(self.llm.api_key.clone()).is_none() {
                return Err(ConfigError::Missing("LLM_API_KEY"));
            }
            if self.llm.model.trim().is_empty() {
                return Err(ConfigError::Missing("LLM_MODEL"));
            }
        }

        for source in &self.sources {
            if let SourceConfig::FederalRegister { base_url, .. } = source {
                check_url("FEDERAL_REGISTER_URL", base_url)?;
            }
        }

        for (key, ms) in [
            ("SOURCE_TIMEOUT_MS", self.source_timeout_ms),
            ("GENERATION_TIMEOUT_MS", self.generation_timeout_ms),
        ] {
            if ms == 0 {
                return Err(ConfigError::Invalid {
                    key,
                    reason: "timeout must be greater than zero".to_string(),
                });
            }
        }

        if self.persistence == PersistenceMode::Sqlite && self.database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        Ok(())
    }
}
