//! Rule persistence interface
//!
//! The analyzer treats persistence as optional: reads that fail are treated
//! as empty, writes are best effort. [`PersistenceMode`] makes "persistence
//! is off" an explicit, inspectable state instead of a missing client.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared_types::{BusinessProfile, ComplianceRule};
use tokio::sync::RwLock;

use crate::applicability::evaluate;
use crate::error::{ConfigError, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersistenceMode {
    /// Real-time analysis only
    #[default]
    Disabled,
    Memory,
    Sqlite,
}

impl PersistenceMode {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_lowercase().as_str() {
            "" | "disabled" | "none" | "off" => Ok(PersistenceMode::Disabled),
            "memory" | "in_memory" => Ok(PersistenceMode::Memory),
            "sqlite" => Ok(PersistenceMode::Sqlite),
            other => Err(ConfigError::Invalid {
                key: "PERSISTENCE_MODE",
                reason: format!("unknown persistence mode '{}'", other),
            }),
        }
    }
}

impl std::fmt::Display for PersistenceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PersistenceMode::Disabled => write!(f, "disabled"),
            PersistenceMode::Memory => write!(f, "memory"),
            PersistenceMode::Sqlite => write!(f, "sqlite"),
        }
    }
}

#[async_trait]
pub trait RuleStore: Send + Sync {
    fn mode(&self) -> PersistenceMode;

    fn is_active(&self) -> bool {
        self.mode() != PersistenceMode::Disabled
    }

    /// Persisted rules that apply to the profile
    async fn get_matching_rules(
        &self,
        profile: &BusinessProfile,
    ) -> Result<Vec<ComplianceRule>, StoreError>;

    /// Insert or replace rules by id. Returns the number written.
    async fn store_rules(&self, rules: &[ComplianceRule]) -> Result<usize, StoreError>;

    async fn get_all_rules(&self) -> Result<Vec<ComplianceRule>, StoreError>;

    /// Release backend resources
    async fn close(&self) {}
}

/// Persistence turned off: reads are empty, writes are dropped
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledStore;

#[async_trait]
impl RuleStore for DisabledStore {
    fn mode(&self) -> PersistenceMode {
        PersistenceMode::Disabled
    }

    async fn get_matching_rules(
        &self,
        _profile: &BusinessProfile,
    ) -> Result<Vec<ComplianceRule>, StoreError> {
        Ok(Vec::new())
    }

    async fn store_rules(&self, _rules: &[ComplianceRule]) -> Result<usize, StoreError> {
        Ok(0)
    }

    async fn get_all_rules(&self) -> Result<Vec<ComplianceRule>, StoreError> {
        Ok(Vec::new())
    }
}

/// Process-local store keyed by rule id
#[derive(Debug, Default)]
pub struct InMemoryStore {
    rules: RwLock<HashMap<String, ComplianceRule>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RuleStore for InMemoryStore {
    fn mode(&self) -> PersistenceMode {
        PersistenceMode::Memory
    }

    async fn get_matching_rules(
        &self,
        profile: &BusinessProfile,
    ) -> Result<Vec<ComplianceRule>, StoreError> {
        let rules = self.rules.read().await;
        let mut matching: Vec<ComplianceRule> = rules
            .values()
            .filter(|rule| evaluate(rule, profile).applies)
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(matching)
    }

    async fn store_rules(&self, rules: &[ComplianceRule]) -> Result<usize, StoreError> {
        let mut stored = self.rules.write().await;
        for rule in rules {
            stored.insert(rule.id.clone(), rule.clone());
        }
        Ok(rules.len())
    }

    async fn get_all_rules(&self) -> Result<Vec<ComplianceRule>, StoreError> {
        let mut all: Vec<ComplianceRule> = self.rules.read().await.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(all)
    }
}
