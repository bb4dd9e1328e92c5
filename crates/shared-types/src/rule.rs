//! Canonical compliance rule shape shared by every source and consumer

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fingerprint::{content_fingerprint, normalize_hash};

/// Government level that issues a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleLevel {
    Federal,
    State,
    Local,
}

impl std::fmt::Display for RuleLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleLevel::Federal => write!(f, "federal"),
            RuleLevel::State => write!(f, "state"),
            RuleLevel::Local => write!(f, "local"),
        }
    }
}

/// Rule priority. Variant order is the ordinal: `Critical > High > Medium > Low`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
            Priority::Critical => write!(f, "critical"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleStatus {
    #[default]
    Active,
    Proposed,
    Repealed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Deadlines {
    #[serde(default)]
    pub initial_deadline: String,
    #[serde(default)]
    pub recurring_deadline: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RequiredForm {
    pub form_name: String,
    #[serde(default)]
    pub form_url: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ComplianceStep {
    /// 1-based position within the rule
    pub step_number: u32,
    pub step_description: String,
    #[serde(default)]
    pub deadline: String,
    #[serde(default)]
    pub estimated_cost: f64,
    #[serde(default)]
    pub estimated_time: String,
    #[serde(default)]
    pub required_forms: Vec<RequiredForm>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Penalties {
    #[serde(default)]
    pub monetary_penalty: Option<f64>,
    #[serde(default)]
    pub other_penalties: Vec<String>,
    #[serde(default)]
    pub enforcement_agency: String,
}

/// Inclusive employee-count bounds. A missing side is unbounded.
///
/// Signed so that malformed (negative) bounds from upstream sources survive
/// deserialization and can be flagged instead of rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmployeeRange {
    #[serde(default)]
    pub min: Option<i64>,
    #[serde(default)]
    pub max: Option<i64>,
}

impl EmployeeRange {
    pub fn between(min: i64, max: i64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn at_least(min: i64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    /// Bounds are usable: non-negative and `min <= max` when both are present
    pub fn is_well_formed(&self) -> bool {
        let non_negative = self.min.map_or(true, |v| v >= 0) && self.max.map_or(true, |v| v >= 0);
        let ordered = match (self.min, self.max) {
            (Some(min), Some(max)) => min <= max,
            _ => true,
        };
        non_negative && ordered
    }

    pub fn contains(&self, employees: u32) -> bool {
        let employees = i64::from(employees);
        self.min.map_or(true, |min| employees >= min)
            && self.max.map_or(true, |max| employees <= max)
    }
}

/// Who a rule binds. Every field is optional on the wire; an absent or empty
/// field places no constraint on that dimension.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ApplicabilityCriteria {
    #[serde(default)]
    pub business_types: Vec<String>,
    /// Empty means all states
    #[serde(default)]
    pub states: Vec<String>,
    #[serde(default)]
    pub employee_count: Option<EmployeeRange>,
    #[serde(default)]
    pub industries: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    Api,
    Website,
    Pdf,
    Manual,
    AiGenerated,
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SourceType::Api => "api",
            SourceType::Website => "website",
            SourceType::Pdf => "pdf",
            SourceType::Manual => "manual",
            SourceType::AiGenerated => "ai_generated",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Verified,
    #[default]
    Pending,
    Outdated,
}

/// Provenance of a rule: where it came from and how far it can be trusted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceReference {
    pub source_id: String,
    pub source_type: SourceType,
    pub source_name: String,
    #[serde(default)]
    pub source_url: String,
    #[serde(default)]
    pub external_id: Option<String>,
    /// 0-10, higher is more trusted
    pub reliability_score: f64,
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub verification_status: VerificationStatus,
    /// Fingerprint of the rule's normalized title and content
    #[serde(default)]
    pub content_hash: String,
}

pub const MIN_RELIABILITY: f64 = 0.0;
pub const MAX_RELIABILITY: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceRule {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub authority: String,
    pub level: RuleLevel,
    #[serde(default)]
    pub jurisdiction: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: RuleStatus,
    #[serde(default)]
    pub estimated_cost: f64,
    #[serde(default)]
    pub estimated_time: String,
    #[serde(default)]
    pub deadlines: Deadlines,
    #[serde(default)]
    pub compliance_steps: Vec<ComplianceStep>,
    #[serde(default)]
    pub penalties: Penalties,
    #[serde(default)]
    pub applicability_criteria: Option<ApplicabilityCriteria>,
    #[serde(default)]
    pub sources: Vec<SourceReference>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl ComplianceRule {
    pub fn new(id: &str, title: &str, level: RuleLevel, jurisdiction: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            authority: String::new(),
            level,
            jurisdiction: jurisdiction.to_string(),
            priority: Priority::default(),
            status: RuleStatus::default(),
            estimated_cost: 0.0,
            estimated_time: String::new(),
            deadlines: Deadlines::default(),
            compliance_steps: Vec::new(),
            penalties: Penalties::default(),
            applicability_criteria: None,
            sources: Vec::new(),
            tags: BTreeSet::new(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_authority(mut self, authority: &str) -> Self {
        self.authority = authority.to_string();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_cost(mut self, estimated_cost: f64) -> Self {
        self.estimated_cost = estimated_cost;
        self
    }

    pub fn with_criteria(mut self, criteria: ApplicabilityCriteria) -> Self {
        self.applicability_criteria = Some(criteria);
        self
    }

    pub fn with_source(mut self, source: SourceReference) -> Self {
        self.sources.push(source);
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags.extend(tags.iter().map(|t| t.to_string()));
        self
    }

    /// Highest reliability score among the rule's sources (0 when unsourced)
    pub fn reliability(&self) -> f64 {
        self.sources
            .iter()
            .map(|s| s.reliability_score)
            .fold(MIN_RELIABILITY, f64::max)
    }

    /// Most recent update across the rule's sources
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.sources.iter().map(|s| s.last_updated).max()
    }

    /// Deduplication key.
    ///
    /// Uses the primary source's hash when one was supplied, otherwise the
    /// fingerprint of the rule's own title and description.
    pub fn content_hash(&self) -> String {
        self.sources
            .iter()
            .map(|s| normalize_hash(&s.content_hash))
            .find(|h| !h.is_empty())
            .unwrap_or_else(|| self.computed_hash())
    }

    pub fn computed_hash(&self) -> String {
        content_fingerprint(&self.title, &self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(score: f64, hash: &str) -> SourceReference {
        SourceReference {
            source_id: "src".to_string(),
            source_type: SourceType::Manual,
            source_name: "test".to_string(),
            source_url: String::new(),
            external_id: None,
            reliability_score: score,
            last_updated: Utc::now(),
            verification_status: VerificationStatus::Verified,
            content_hash: hash.to_string(),
        }
    }

    #[test]
    fn test_priority_ordinal() {
        assert!(Priority::Critical > Priority::High);
        assert!(Priority::High > Priority::Medium);
        assert!(Priority::Medium > Priority::Low);
    }

    #[test]
    fn test_employee_range() {
        let range = EmployeeRange::between(5, 50);
        assert!(range.contains(5));
        assert!(range.contains(50));
        assert!(!range.contains(4));
        assert!(!range.contains(51));

        assert!(EmployeeRange::at_least(50).contains(10_000));
        assert!(EmployeeRange::default().contains(0));

        assert!(!EmployeeRange::between(50, 5).is_well_formed());
        assert!(!EmployeeRange::at_least(-1).is_well_formed());
    }

    #[test]
    fn test_content_hash_prefers_source_hash() {
        let rule = ComplianceRule::new("r1", "Title", RuleLevel::Federal, "US")
            .with_source(source(8.0, "  ABC123 "));
        assert_eq!(rule.content_hash(), "abc123");

        let unsourced = ComplianceRule::new("r2", "Title", RuleLevel::Federal, "US");
        assert_eq!(unsourced.content_hash(), unsourced.computed_hash());
    }

    #[test]
    fn test_reliability_is_max_of_sources() {
        let rule = ComplianceRule::new("r1", "Title", RuleLevel::Federal, "US")
            .with_source(source(6.0, ""))
            .with_source(source(9.0, ""));
        assert_eq!(rule.reliability(), 9.0);
        assert_eq!(
            ComplianceRule::new("r2", "T", RuleLevel::State, "TX").reliability(),
            0.0
        );
    }

    #[test]
    fn test_sparse_rule_deserializes() {
        let json = r#"{
            "id": "x",
            "title": "Food Handler Card",
            "level": "state",
            "priority": "high",
            "status": "something-new",
            "applicability_criteria": { "states": ["California"] }
        }"#;
        let rule: ComplianceRule = serde_json::from_str(json).unwrap();

        assert_eq!(rule.priority, Priority::High);
        assert_eq!(rule.status, RuleStatus::Unknown);
        let criteria = rule.applicability_criteria.unwrap();
        assert!(criteria.business_types.is_empty());
        assert!(criteria.employee_count.is_none());
        assert!(criteria.industries.is_none());
    }

    #[test]
    fn test_wire_format_is_lowercase() {
        let rule = ComplianceRule::new("x", "T", RuleLevel::Local, "San Francisco")
            .with_priority(Priority::Critical);
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["level"], "local");
        assert_eq!(json["priority"], "critical");
        assert_eq!(json["status"], "active");
    }
}
