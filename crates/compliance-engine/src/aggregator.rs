//! Source aggregation
//!
//! Every configured source is asked every planned query. All calls run
//! concurrently and the aggregator waits for the full set before returning.
//! Results are concatenated in (query, source) order, so the output does not
//! depend on which call finished first.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use shared_types::{BusinessProfile, ComplianceRule, SourceType};
use tracing::{debug, warn};

use crate::error::SourceError;
use crate::sources::RuleSource;

pub const DEFAULT_SOURCE_TIMEOUT_MS: u64 = 30_000;

/// One source call that produced no rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFailure {
    pub source: String,
    pub query: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct AggregationOutcome {
    pub rules: Vec<ComplianceRule>,
    pub failures: Vec<SourceFailure>,
    /// Number of (query, source) calls dispatched
    pub calls: usize,
}

pub struct SourceAggregator {
    sources: Vec<Arc<dyn RuleSource>>,
    timeout: Duration,
}

impl SourceAggregator {
    pub fn new(sources: Vec<Arc<dyn RuleSource>>, timeout: Duration) -> Self {
        Self { sources, timeout }
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    pub fn source_types(&self) -> Vec<SourceType> {
        self.sources.iter().map(|s| s.source_type()).collect()
    }

    async fn call(
        &self,
        source: &Arc<dyn RuleSource>,
        query: &str,
        profile: &BusinessProfile,
    ) -> Result<Vec<ComplianceRule>, SourceError> {
        let search = source.search(query, &profile.primary_industry, profile);
        match tokio::time::timeout(self.timeout, search).await {
            Ok(result) => result,
            Err(_) => Err(SourceError::Timeout(self.timeout.as_millis() as u64)),
        }
    }

    pub async fn aggregate(
        &self,
        queries: &[String],
        profile: &BusinessProfile,
    ) -> AggregationOutcome {
        let calls: Vec<(&str, &Arc<dyn RuleSource>)> = queries
            .iter()
            .flat_map(|query| self.sources.iter().map(move |source| (query.as_str(), source)))
            .collect();

        let results = join_all(
            calls
                .iter()
                .map(|(query, source)| self.call(source, query, profile)),
        )
        .await;

        let mut outcome = AggregationOutcome {
            calls: calls.len(),
            ..AggregationOutcome::default()
        };

        for ((query, source), result) in calls.iter().zip(results) {
            match result {
                Ok(rules) => {
                    debug!(
                        source = source.name(),
                        query = %query,
                        count = rules.len(),
                        "source returned rules"
                    );
                    outcome.rules.extend(rules);
                }
                Err(e) => {
                    warn!(source = source.name(), query = %query, error = %e, "source call failed");
                    outcome.failures.push(SourceFailure {
                        source: source.name().to_string(),
                        query: query.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use shared_types::RuleLevel;

    /// Returns one rule per query, named `{name}:{query}`, unless told to fail
    struct EchoSource {
        name: &'static str,
        fail_on: Option<&'static str>,
        delay: Duration,
    }

    impl EchoSource {
        fn new(name: &'static str) -> Arc<dyn RuleSource> {
            Self::build(name, None, Duration::ZERO)
        }

        fn failing(name: &'static str, query: &'static str) -> Arc<dyn RuleSource> {
            Self::build(name, Some(query), Duration::ZERO)
        }

        fn slow(name: &'static str, delay: Duration) -> Arc<dyn RuleSource> {
            Self::build(name, None, delay)
        }

        fn build(
            name: &'static str,
            fail_on: Option<&'static str>,
            delay: Duration,
        ) -> Arc<dyn RuleSource> {
            Arc::new(Self { name, fail_on, delay })
        }
    }

    #[async_trait]
    impl RuleSource for EchoSource {
        fn name(&self) -> &str {
            self.name
        }

        fn source_type(&self) -> SourceType {
            SourceType::Manual
        }

        async fn search(
            &self,
            query: &str,
            _industry: &str,
            _profile: &BusinessProfile,
        ) -> Result<Vec<ComplianceRule>, SourceError> {
            tokio::time::sleep(self.delay).await;
            if self.fail_on == Some(query) {
                return Err(SourceError::Server {
                    status: 503,
                    body: "unavailable".to_string(),
                });
            }
            let id = format!("{}:{}", self.name, query);
            Ok(vec![ComplianceRule::new(&id, &id, RuleLevel::Federal, "US")])
        }
    }

    fn queries() -> Vec<String> {
        vec!["q1".to_string(), "q2".to_string(), "q3".to_string()]
    }

    fn profile() -> BusinessProfile {
        BusinessProfile::new("LLC", "Restaurant", "CA")
    }

    fn ids(outcome: &AggregationOutcome) -> Vec<&str> {
        outcome.rules.iter().map(|r| r.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_failing_source_does_not_abort_batch() {
        let aggregator = SourceAggregator::new(
            vec![
                EchoSource::new("a"),
                EchoSource::failing("b", "q2"),
            ],
            Duration::from_secs(5),
        );

        let outcome = aggregator.aggregate(&queries(), &profile()).await;

        assert_eq!(outcome.calls, 6);
        assert_eq!(ids(&outcome), vec!["a:q1", "b:q1", "a:q2", "a:q3", "b:q3"]);
        assert_eq!(
            outcome.failures,
            vec![SourceFailure {
                source: "b".to_string(),
                query: "q2".to_string(),
                reason: "server returned 503: unavailable".to_string(),
            }]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_source_times_out() {
        let aggregator = SourceAggregator::new(
            vec![
                EchoSource::slow("slow", Duration::from_secs(60)),
                EchoSource::new("fast"),
            ],
            Duration::from_secs(1),
        );

        let outcome = aggregator.aggregate(&["q".to_string()], &profile()).await;

        assert_eq!(ids(&outcome), vec!["fast:q"]);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].reason, "source timed out after 1000ms");
    }

    #[tokio::test(start_paused = true)]
    async fn test_order_is_independent_of_completion_order() {
        let aggregator = SourceAggregator::new(
            vec![
                EchoSource::slow("slow", Duration::from_millis(500)),
                EchoSource::new("fast"),
            ],
            Duration::from_secs(5),
        );

        let outcome = aggregator.aggregate(&queries()[..2], &profile()).await;
        assert_eq!(ids(&outcome), vec!["slow:q1", "fast:q1", "slow:q2", "fast:q2"]);
    }

    #[tokio::test]
    async fn test_no_sources() {
        let aggregator = SourceAggregator::new(Vec::new(), Duration::from_secs(1));
        let outcome = aggregator.aggregate(&queries(), &profile()).await;
        assert_eq!(outcome.calls, 0);
        assert!(outcome.rules.is_empty());
    }
}
