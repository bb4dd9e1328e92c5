//! Compliance rule applicability and aggregation engine
//!
//! Given a [`BusinessProfile`](shared_types::BusinessProfile), the engine plans
//! search queries, asks every configured rule source, merges duplicate
//! candidates, keeps the rules that bind the business and writes a report.
//!
//! ```text
//! profile -> QueryPlanner -> SourceAggregator -> Deduplicator
//!         -> applicability filter -> ReportSynthesizer -> AnalysisOutcome
//! ```

pub mod aggregator;
pub mod applicability;
pub mod config;
pub mod dedup;
pub mod engine;
pub mod error;
pub mod jurisdiction;
pub mod llm;
pub mod patterns;
pub mod planner;
pub mod report;
pub mod services;
pub mod sources;
pub mod store;
pub mod validation;

pub use aggregator::{AggregationOutcome, SourceAggregator, SourceFailure};
pub use applicability::{evaluate, filter, filter_with_flags, Applicability};
pub use config::{EngineConfig, LlmConfig};
pub use dedup::{dedupe, DedupConfig, DedupStats, Deduplicator};
pub use engine::{AnalysisMetadata, AnalysisOutcome, Analyzer};
pub use error::{AnalysisError, ConfigError, GenerationError, LlmError, SourceError, StoreError};
pub use jurisdiction::State;
pub use llm::{ChatCompletionsClient, TextGenerator};
pub use planner::{PlannerConfig, QueryPlanner};
pub use report::{LlmNarrativeGenerator, NarrativeGenerator, Report, ReportMode, ReportSynthesizer};
pub use services::EngineServices;
pub use sources::{RuleSource, SourceConfig};
pub use store::{DisabledStore, InMemoryStore, PersistenceMode, RuleStore};
pub use validation::{validate_profile, validate_rule, DataQualityFlag, FlagKind};
