//! Rule sources
//!
//! Every source answers the same capability, `search(query, industry,
//! profile)`, and reports the `SourceType` it produces. The set of sources is
//! closed and chosen by configuration through [`SourceConfig`]:
//!
//! - `catalog` - curated federal and state baseline obligations (`manual`)
//! - `ai_generated` - rules drafted by a chat-completions model (`ai_generated`)
//! - `federal_register` - documents from the Federal Register API (`api`)

pub mod ai;
pub mod catalog;
pub mod federal_register;

pub use ai::AiRuleSource;
pub use catalog::CatalogSource;
pub use federal_register::FederalRegisterSource;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared_types::{BusinessProfile, ComplianceRule, SourceType};

use crate::error::{ConfigError, SourceError};

#[async_trait]
pub trait RuleSource: Send + Sync {
    /// Stable name used in logs and failure records
    fn name(&self) -> &str;

    fn source_type(&self) -> SourceType;

    async fn search(
        &self,
        query: &str,
        industry: &str,
        profile: &BusinessProfile,
    ) -> Result<Vec<ComplianceRule>, SourceError>;
}

pub const DEFAULT_FEDERAL_REGISTER_URL: &str = "https://www.federalregister.gov/api/v1";

/// Which sources an engine queries, in dispatch order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    Catalog,
    AiGenerated {
        /// Total attempts per query, including the first
        #[serde(default = "default_max_attempts")]
        max_attempts: u32,
    },
    FederalRegister {
        #[serde(default = "default_federal_register_url")]
        base_url: String,
        #[serde(default = "default_per_page")]
        per_page: u32,
        /// Pause between consecutive search terms against the API
        #[serde(default = "default_request_delay_ms")]
        request_delay_ms: u64,
    },
}

fn default_max_attempts() -> u32 {
    2
}

fn default_federal_register_url() -> String {
    DEFAULT_FEDERAL_REGISTER_URL.to_string()
}

fn default_per_page() -> u32 {
    10
}

fn default_request_delay_ms() -> u64 {
    500
}

impl SourceConfig {
    pub fn ai_generated() -> Self {
        SourceConfig::AiGenerated {
            max_attempts: default_max_attempts(),
        }
    }

    pub fn federal_register() -> Self {
        SourceConfig::FederalRegister {
            base_url: default_federal_register_url(),
            per_page: default_per_page(),
            request_delay_ms: default_request_delay_ms(),
        }
    }

    /// Parse one entry of a comma-separated source list
    /// (e.g. `COMPLIANCE_SOURCES=catalog,ai,federal_register`)
    pub fn parse_name(name: &str) -> Result<Self, ConfigError> {
        match name.trim().to_lowercase().as_str() {
            "catalog" | "manual" => Ok(SourceConfig::Catalog),
            "ai" | "ai_generated" | "llm" => Ok(Self::ai_generated()),
            "federal_register" | "federalregister" | "api" => Ok(Self::federal_register()),
            other => Err(ConfigError::Invalid {
                key: "COMPLIANCE_SOURCES",
                reason: format!("unknown source '{}'", other),
            }),
        }
    }

    pub fn parse_list(list: &str) -> Result<Vec<Self>, ConfigError> {
        list.split(',')
            .filter(|s| !s.trim().is_empty())
            .map(Self::parse_name)
            .collect()
    }

    pub fn source_type(&self) -> SourceType {
        match self {
            SourceConfig::Catalog => SourceType::Manual,
            SourceConfig::AiGenerated { .. } => SourceType::AiGenerated,
            SourceConfig::FederalRegister { .. } => SourceType::Api,
        }
    }
}
