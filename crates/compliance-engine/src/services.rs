//! Long-lived collaborators, built once per process
//!
//! `EngineServices::init` turns an [`EngineConfig`] into the shared HTTP
//! client, rule sources, narrative generator and store. The services are then
//! handed to an [`Analyzer`](crate::Analyzer); tests build them from fakes with
//! [`EngineServices::new`].

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::aggregator::SourceAggregator;
use crate::config::EngineConfig;
use crate::dedup::Deduplicator;
use crate::error::ConfigError;
use crate::llm::{ChatCompletionsClient, TextGenerator};
use crate::planner::QueryPlanner;
use crate::report::{LlmNarrativeGenerator, NarrativeGenerator, ReportSynthesizer};
use crate::sources::{AiRuleSource, CatalogSource, FederalRegisterSource, RuleSource, SourceConfig};
use crate::store::{DisabledStore, InMemoryStore, PersistenceMode, RuleStore};

const USER_AGENT: &str = concat!("compliance-engine/", env!("CARGO_PKG_VERSION"));

pub struct EngineServices {
    pub planner: QueryPlanner,
    pub aggregator: SourceAggregator,
    pub deduplicator: Deduplicator,
    pub synthesizer: ReportSynthesizer,
    pub store: Arc<dyn RuleStore>,
}

impl EngineServices {
    pub fn new(
        planner: QueryPlanner,
        aggregator: SourceAggregator,
        deduplicator: Deduplicator,
        synthesizer: ReportSynthesizer,
        store: Arc<dyn RuleStore>,
    ) -> Self {
        Self {
            planner,
            aggregator,
            deduplicator,
            synthesizer,
            store,
        }
    }

    /// Build every collaborator the configuration asks for.
    ///
    /// SQLite persistence lives outside this crate; use
    /// [`EngineServices::init_with_store`] for it.
    pub fn init(config: &EngineConfig) -> Result<Self, ConfigError> {
        let store: Arc<dyn RuleStore> = match config.persistence {
            PersistenceMode::Disabled => Arc::new(DisabledStore),
            PersistenceMode::Memory => Arc::new(InMemoryStore::new()),
            PersistenceMode::Sqlite => {
                return Err(ConfigError::Invalid {
                    key: "PERSISTENCE_MODE",
                    reason: "sqlite persistence requires a store supplied by the host".to_string(),
                })
            }
        };
        Self::init_with_store(config, store)
    }

    pub fn init_with_store(
        config: &EngineConfig,
        store: Arc<dyn RuleStore>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))?;

        let text_generator: Option<Arc<dyn TextGenerator>> = if config.uses_llm() {
            let llm = ChatCompletionsClient::new(
                client.clone(),
                &config.llm.base_url,
                config.llm.api_key.clone(),
                &config.llm.model,
            )
            .with_temperature(config.llm.temperature);
            Some(Arc::new(llm))
        } else {
            None
        };

        let mut sources: Vec<Arc<dyn RuleSource>> = Vec::with_capacity(config.sources.len());
        for source in &config.sources {
            let built: Arc<dyn RuleSource> = match source {
                SourceConfig::Catalog => Arc::new(CatalogSource::new()),
                SourceConfig::AiGenerated { max_attempts } => {
                    let generator = text_generator
                        .clone()
                        .ok_or(ConfigError::Missing("LLM_API_KEY"))?;
                    Arc::new(AiRuleSource::new(generator, *max_attempts))
                }
                SourceConfig::FederalRegister {
                    base_url,
                    per_page,
                    request_delay_ms,
                } => Arc::new(FederalRegisterSource::new(
                    client.clone(),
                    base_url,
                    *per_page,
                    *request_delay_ms,
                )),
            };
            sources.push(built);
        }

        let narrative: Option<Arc<dyn NarrativeGenerator>> =
            match (&text_generator, config.narrative_reports) {
                (Some(generator), true) => {
                    Some(Arc::new(LlmNarrativeGenerator::new(generator.clone())))
                }
                _ => None,
            };

        let source_types: Vec<String> = config
            .sources
            .iter()
            .map(|s| s.source_type().to_string())
            .collect();
        info!(
            sources = ?source_types,
            narrative = narrative.is_some(),
            persistence = %store.mode(),
            "engine services initialized"
        );

        Ok(Self::new(
            QueryPlanner::new(config.planner.clone()),
            SourceAggregator::new(sources, Duration::from_millis(config.source_timeout_ms)),
            Deduplicator::new(config.dedup.clone()),
            ReportSynthesizer::new(narrative, Duration::from_millis(config.generation_timeout_ms)),
            store,
        ))
    }

    /// Release the store's resources. Other collaborators close on drop.
    pub async fn shutdown(&self) {
        self.store.close().await;
        info!("engine services shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::SourceType;

    #[test]
    fn test_init_default_config() {
        let services = EngineServices::init(&EngineConfig::default()).unwrap();
        assert_eq!(services.aggregator.source_types(), vec![SourceType::Manual]);
        assert_eq!(services.store.mode(), PersistenceMode::Disabled);
    }

    #[test]
    fn test_init_all_sources() {
        let mut config = EngineConfig {
            sources: vec![
                SourceConfig::Catalog,
                SourceConfig::ai_generated(),
                SourceConfig::federal_register(),
            ],
            persistence: PersistenceMode::Memory,
            ..EngineConfig::default()
        };
        config.llm.api_key = Some("sk-test".to_string());

        let services = EngineServices::init(&config).unwrap();
        assert_eq!(
            services.aggregator.source_types(),
            vec![SourceType::Manual, SourceType::AiGenerated, SourceType::Api]
        );
        assert!(services.store.is_active());
    }

    #[test]
    fn test_init_fails_fast_without_key() {
        let config = EngineConfig {
            sources: vec![SourceConfig::ai_generated()],
            ..EngineConfig::default()
        };
        assert_eq!(
            EngineServices::init(&config).err(),
            Some(ConfigError::Missing("LLM_API_KEY"))
        );
    }

    #[test]
    fn test_sqlite_needs_host_store() {
        let config = EngineConfig {
            persistence: PersistenceMode::Sqlite,
            database_url: Some("sqlite::memory:".to_string()),
            ..EngineConfig::default()
        };
        assert!(matches!(
            EngineServices::init(&config),
            Err(ConfigError::Invalid { key: "PERSISTENCE_MODE", .. })
        ));
        assert!(EngineServices::init_with_store(&config, Arc::new(InMemoryStore::new())).is_ok());
    }
}
