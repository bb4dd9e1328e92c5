//! Per-request analysis pipeline
//!
//! profile -> plan -> aggregate (+ stored matches) -> dedupe -> filter -> report
//!
//! Only misconfiguration aborts an analysis. Source, store and narrative
//! failures degrade the result and are reported in the metadata.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{BusinessProfile, ComplianceRule};
use tracing::{info, instrument, warn};

use crate::aggregator::SourceFailure;
use crate::applicability::filter_with_flags;
use crate::error::{AnalysisError, ConfigError};
use crate::report::{Report, ReportMode};
use crate::services::EngineServices;
use crate::validation::{
    clamp_scores, dedupe_flags, validate_profile, validate_rule, DataQualityFlag,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    pub total_queries: usize,
    pub queries: Vec<String>,
    pub source_calls: usize,
    pub source_failures: Vec<SourceFailure>,
    pub results_before_dedup: usize,
    pub results_after_dedup: usize,
    pub applicable_count: usize,
    pub report_mode: ReportMode,
    pub persistence_active: bool,
    pub data_quality_flags: Vec<DataQualityFlag>,
    pub analyzed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    pub rules: Vec<ComplianceRule>,
    pub report: Report,
    pub metadata: AnalysisMetadata,
}

#[derive(Clone)]
pub struct Analyzer {
    services: Arc<EngineServices>,
}

impl Analyzer {
    pub fn new(services: Arc<EngineServices>) -> Self {
        Self { services }
    }

    pub fn services(&self) -> &EngineServices {
        &self.services
    }

    #[instrument(
        skip_all,
        fields(state = %profile.headquarters_state, industry = %profile.primary_industry)
    )]
    pub async fn analyze(
        &self,
        profile: &BusinessProfile,
    ) -> Result<AnalysisOutcome, AnalysisError> {
        let services = &self.services;
        if services.aggregator.source_count() == 0 {
            return Err(ConfigError::Missing("COMPLIANCE_SOURCES").into());
        }

        let mut flags = validate_profile(profile);

        let queries = services.planner.plan(profile);
        let aggregation = services.aggregator.aggregate(&queries, profile).await;

        let store = &services.store;
        let mut candidates = aggregation.rules;
        if store.is_active() {
            match store.get_matching_rules(profile).await {
                Ok(stored) => candidates.extend(stored),
                Err(e) => warn!(error = %e, "failed to read stored rules, continuing without them"),
            }
        }

        for rule in candidates.iter_mut() {
            flags.extend(clamp_scores(rule));
        }

        let (deduped, dedup_stats) = services.deduplicator.dedupe_with_stats(candidates);
        for rule in &deduped {
            flags.extend(validate_rule(rule));
        }

        let (applicable, filter_flags) = filter_with_flags(deduped, profile);
        flags.extend(filter_flags);

        let report = services.synthesizer.synthesize(profile, &applicable).await;

        if store.is_active() && !applicable.is_empty() {
            match store.store_rules(&applicable).await {
                Ok(stored) => info!(stored, "persisted applicable rules"),
                Err(e) => warn!(error = %e, "failed to persist rules"),
            }
        }

        let metadata = AnalysisMetadata {
            total_queries: queries.len(),
            queries,
            source_calls: aggregation.calls,
            source_failures: aggregation.failures,
            results_before_dedup: dedup_stats.before,
            results_after_dedup: dedup_stats.after,
            applicable_count: applicable.len(),
            report_mode: report.mode,
            persistence_active: store.is_active(),
            data_quality_flags: dedupe_flags(flags),
            analyzed_at: Utc::now(),
        };

        info!(
            queries = metadata.total_queries,
            candidates = metadata.results_before_dedup,
            unique = metadata.results_after_dedup,
            applicable = metadata.applicable_count,
            failures = metadata.source_failures.len(),
            "analysis complete"
        );

        Ok(AnalysisOutcome {
            rules: applicable,
            report,
            metadata,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::SourceAggregator;
    use crate::dedup::Deduplicator;
    use crate::error::{GenerationError, SourceError, StoreError};
    use crate::planner::{PlannerConfig, QueryPlanner};
    use crate::report::{NarrativeGenerator, ReportSynthesizer};
    use crate::sources::{CatalogSource, RuleSource};
    use crate::store::{DisabledStore, InMemoryStore, PersistenceMode, RuleStore};
    use crate::validation::FlagKind;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use shared_types::{
        ApplicabilityCriteria, EmployeeRange, Priority, RuleLevel, SourceReference, SourceType,
        VerificationStatus,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct FixedSource {
        name: &'static str,
        rules: Vec<ComplianceRule>,
        fail: bool,
    }

    #[async_trait]
    impl RuleSource for FixedSource {
        fn name(&self) -> &str {
            self.name
        }

        fn source_type(&self) -> SourceType {
            SourceType::Api
        }

        async fn search(
            &self,
            _query: &str,
            _industry: &str,
            _profile: &BusinessProfile,
        ) -> Result<Vec<ComplianceRule>, SourceError> {
            if self.fail {
                Err(SourceError::Parse("bad payload".to_string()))
            } else {
                Ok(self.rules.clone())
            }
        }
    }

    struct CountingNarrative {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl NarrativeGenerator for CountingNarrative {
        async fn generate_report(
            &self,
            _profile: &BusinessProfile,
            rules: &[ComplianceRule],
        ) -> Result<String, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("{} requirements", rules.len()))
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl RuleStore for BrokenStore {
        fn mode(&self) -> PersistenceMode {
            PersistenceMode::Sqlite
        }

        async fn get_matching_rules(
            &self,
            _profile: &BusinessProfile,
        ) -> Result<Vec<ComplianceRule>, StoreError> {
            Err(StoreError::Backend("database is locked".to_string()))
        }

        async fn store_rules(&self, _rules: &[ComplianceRule]) -> Result<usize, StoreError> {
            Err(StoreError::Backend("database is locked".to_string()))
        }

        async fn get_all_rules(&self) -> Result<Vec<ComplianceRule>, StoreError> {
            Err(StoreError::Backend("database is locked".to_string()))
        }
    }

    fn sourced(rule: ComplianceRule, score: f64, hash: &str) -> ComplianceRule {
        rule.with_source(SourceReference {
            source_id: "test".to_string(),
            source_type: SourceType::Api,
            source_name: "test".to_string(),
            source_url: String::new(),
            external_id: None,
            reliability_score: score,
            last_updated: Utc::now(),
            verification_status: VerificationStatus::Verified,
            content_hash: hash.to_string(),
        })
    }

    fn california_rule(id: &str, score: f64, hash: &str) -> ComplianceRule {
        let rule = ComplianceRule::new(id, "Food handler card", RuleLevel::State, "California")
            .with_priority(Priority::High)
            .with_criteria(ApplicabilityCriteria {
                business_types: vec!["LLC".to_string(), "Corporation".to_string()],
                states: vec!["California".to_string()],
                employee_count: Some(EmployeeRange::between(5, 50)),
                industries: None,
            });
        sourced(rule, score, hash)
    }

    fn texas_rule() -> ComplianceRule {
        let rule = ComplianceRule::new("tx", "Texas permit", RuleLevel::State, "Texas")
            .with_criteria(ApplicabilityCriteria {
                states: vec!["Texas".to_string()],
                ..ApplicabilityCriteria::default()
            });
        sourced(rule, 8.0, "h-tx")
    }

    fn restaurant() -> BusinessProfile {
        BusinessProfile::new("LLC", "Restaurant", "California").with_employees(12)
    }

    fn analyzer(
        sources: Vec<Arc<dyn RuleSource>>,
        narrative: Arc<CountingNarrative>,
        store: Arc<dyn RuleStore>,
    ) -> Analyzer {
        let services = EngineServices::new(
            QueryPlanner::new(PlannerConfig::default()),
            SourceAggregator::new(sources, Duration::from_secs(5)),
            Deduplicator::default(),
            ReportSynthesizer::new(Some(narrative), Duration::from_secs(5)),
            store,
        );
        Analyzer::new(Arc::new(services))
    }

    fn counting() -> Arc<CountingNarrative> {
        Arc::new(CountingNarrative {
            calls: AtomicUsize::new(0),
        })
    }

    fn fixed(name: &'static str, rules: Vec<ComplianceRule>, fail: bool) -> Arc<dyn RuleSource> {
        Arc::new(FixedSource { name, rules, fail })
    }

    #[tokio::test]
    async fn test_pipeline_dedupes_filters_and_reports() {
        let narrative = counting();
        let analyzer = analyzer(
            vec![
                fixed("a", vec![california_rule("low", 7.0, "h-ca"), texas_rule()], false),
                fixed("b", vec![california_rule("high", 9.0, "h-ca")], false),
                fixed("broken", Vec::new(), true),
            ],
            narrative.clone(),
            Arc::new(DisabledStore),
        );

        let outcome = analyzer.analyze(&restaurant()).await.unwrap();

        let ids: Vec<&str> = outcome.rules.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["high"]);
        assert_eq!(outcome.report.mode, ReportMode::Generated);
        assert_eq!(outcome.report.text, "1 requirements");

        let meta = &outcome.metadata;
        // Restaurants get a dedicated industry query
        assert_eq!(meta.total_queries, 2);
        assert_eq!(meta.source_calls, 6);
        assert_eq!(meta.source_failures.len(), 2);
        assert_eq!(meta.results_before_dedup, 6);
        assert_eq!(meta.results_after_dedup, 2);
        assert_eq!(meta.applicable_count, 1);
        assert!(!meta.persistence_active);
        assert_eq!(narrative.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_no_applicable_rules_skips_generation() {
        let narrative = counting();
        let analyzer = analyzer(
            vec![fixed("a", vec![texas_rule()], false)],
            narrative.clone(),
            Arc::new(DisabledStore),
        );

        let outcome = analyzer.analyze(&restaurant()).await.unwrap();

        assert!(outcome.rules.is_empty());
        assert_eq!(outcome.report.mode, ReportMode::NoFindings);
        assert_eq!(narrative.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_no_sources_is_a_configuration_error() {
        let analyzer = analyzer(Vec::new(), counting(), Arc::new(DisabledStore));
        let err = analyzer.analyze(&restaurant()).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Configuration(ConfigError::Missing(_))));
    }

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = Arc::new(InMemoryStore::new());
        let analyzer = analyzer(
            vec![fixed("a", vec![california_rule("ca", 9.0, "h-ca")], false)],
            counting(),
            store.clone(),
        );

        let first = analyzer.analyze(&restaurant()).await.unwrap();
        assert!(first.metadata.persistence_active);
        assert_eq!(store.get_all_rules().await.unwrap().len(), 1);

        // Stored rules feed back in and collapse with the fresh copy
        let second = analyzer.analyze(&restaurant()).await.unwrap();
        assert_eq!(second.rules.len(), 1);
        assert!(second.metadata.results_before_dedup > second.metadata.results_after_dedup);
    }

    #[tokio::test]
    async fn test_store_failures_are_not_fatal() {
        let analyzer = analyzer(
            vec![fixed("a", vec![california_rule("ca", 9.0, "h-ca")], false)],
            counting(),
            Arc::new(BrokenStore),
        );
        let outcome = analyzer.analyze(&restaurant()).await.unwrap();
        assert_eq!(outcome.rules.len(), 1);
        assert!(outcome.metadata.persistence_active);
    }

    #[tokio::test]
    async fn test_flags_are_collected() {
        let unscoped = sourced(
            ComplianceRule::new("unscoped", "Local permit", RuleLevel::Local, "Somewhere")
                .with_criteria(ApplicabilityCriteria::default()),
            14.0,
            "h-local",
        );
        let analyzer = analyzer(
            vec![fixed("a", vec![unscoped], false)],
            counting(),
            Arc::new(DisabledStore),
        );
        let profile = restaurant().with_revenue(-1.0);

        let outcome = analyzer.analyze(&profile).await.unwrap();
        let kinds: Vec<FlagKind> = outcome
            .metadata
            .data_quality_flags
            .iter()
            .map(|f| f.kind)
            .collect();

        assert!(kinds.contains(&FlagKind::InvalidRevenue));
        assert!(kinds.contains(&FlagKind::ScoreOutOfRange));
        assert!(kinds.contains(&FlagKind::MissingStateScope));
        assert_eq!(
            kinds.iter().filter(|k| **k == FlagKind::MissingStateScope).count(),
            1
        );
        assert_eq!(outcome.rules[0].reliability(), 10.0);
    }

    #[tokio::test]
    async fn test_catalog_only_analysis() {
        let analyzer = analyzer(
            vec![Arc::new(CatalogSource::new())],
            counting(),
            Arc::new(DisabledStore),
        );
        let outcome = analyzer.analyze(&restaurant()).await.unwrap();

        assert!(outcome.rules.iter().any(|r| r.id == "catalog-ca-sellers-permit"));
        assert!(outcome.rules.iter().any(|r| r.id == "catalog-fed-form-941"));
        assert!(outcome.rules.iter().all(|r| r.id != "catalog-fed-fmla"));
        assert!(outcome.rules.iter().all(|r| r.jurisdiction != "Texas"));
        // Same catalog rules for both queries collapse to one copy each
        assert_eq!(
            outcome.metadata.results_after_dedup * 2,
            outcome.metadata.results_before_dedup
        );
        for pair in outcome.rules.windows(2) {
            assert!(pair[0].priority >= pair[1].priority);
        }
    }
}
