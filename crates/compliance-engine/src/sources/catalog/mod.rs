//! Curated catalog of baseline obligations
//!
//! Layers follow the jurisdiction "Layer Cake":
//! 1. Federal - IRS, DOL, EEOC, OSHA, USCIS obligations every employer meets
//! 2. State - registration, tax and labor requirements for covered states
//!
//! The catalog never touches the network. It returns every federal entry plus
//! the entries for the profile's state; the applicability filter decides what
//! actually binds.

mod federal;
mod states;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared_types::{
    content_fingerprint, ApplicabilityCriteria, BusinessProfile, ComplianceRule, ComplianceStep,
    Deadlines, EmployeeRange, Penalties, Priority, RequiredForm, RuleLevel, SourceReference,
    SourceType, VerificationStatus,
};
use tracing::debug;

use super::RuleSource;
use crate::error::SourceError;
use crate::jurisdiction::{is_national, states_match};

/// Catalog entries are reviewed together; this is the last review date
const CATALOG_REVIEWED_AT: i64 = 1_735_689_600; // 2025-01-01T00:00:00Z

const CATALOG_RELIABILITY: f64 = 9.0;

/// One curated obligation, kept as static data
pub(crate) struct Entry {
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub authority: &'static str,
    pub level: RuleLevel,
    pub jurisdiction: &'static str,
    pub priority: Priority,
    pub cost: f64,
    pub time: &'static str,
    pub initial_deadline: &'static str,
    pub recurring_deadline: Option<&'static str>,
    /// (description, forms as (name, url))
    pub steps: &'static [(&'static str, &'static [(&'static str, &'static str)])],
    pub monetary_penalty: Option<f64>,
    pub other_penalties: &'static [&'static str],
    pub business_types: &'static [&'static str],
    pub employees: (Option<i64>, Option<i64>),
    pub industries: Option<&'static [&'static str]>,
    pub url: &'static str,
    pub tags: &'static [&'static str],
}

impl Entry {
    fn to_rule(&self, reviewed_at: DateTime<Utc>) -> ComplianceRule {
        let states = match self.level {
            RuleLevel::Federal => Vec::new(),
            _ => vec![self.jurisdiction.to_string()],
        };
        let employee_count = match self.employees {
            (None, None) => None,
            (min, max) => Some(EmployeeRange { min, max }),
        };

        let criteria = ApplicabilityCriteria {
            business_types: self.business_types.iter().map(|s| s.to_string()).collect(),
            states,
            employee_count,
            industries: self
                .industries
                .map(|list| list.iter().map(|s| s.to_string()).collect()),
        };

        let steps = self
            .steps
            .iter()
            .enumerate()
            .map(|(i, (description, forms))| ComplianceStep {
                step_number: i as u32 + 1,
                step_description: description.to_string(),
                deadline: self.initial_deadline.to_string(),
                estimated_cost: 0.0,
                estimated_time: String::new(),
                required_forms: forms
                    .iter()
                    .map(|(name, url)| RequiredForm {
                        form_name: name.to_string(),
                        form_url: url.to_string(),
                    })
                    .collect(),
            })
            .collect();

        let source = SourceReference {
            source_id: format!("catalog:{}", self.key),
            source_type: SourceType::Manual,
            source_name: "Curated compliance catalog".to_string(),
            source_url: self.url.to_string(),
            external_id: Some(self.key.to_string()),
            reliability_score: CATALOG_RELIABILITY,
            last_updated: reviewed_at,
            verification_status: VerificationStatus::Verified,
            content_hash: content_fingerprint(self.title, self.description),
        };

        let mut rule = ComplianceRule::new(
            &format!("catalog-{}", self.key),
            self.title,
            self.level,
            self.jurisdiction,
        )
        .with_description(self.description)
        .with_authority(self.authority)
        .with_priority(self.priority)
        .with_cost(self.cost)
        .with_criteria(criteria)
        .with_source(source)
        .with_tags(self.tags);

        rule.estimated_time = self.time.to_string();
        rule.deadlines = Deadlines {
            initial_deadline: self.initial_deadline.to_string(),
            recurring_deadline: self.recurring_deadline.map(str::to_string),
        };
        rule.compliance_steps = steps;
        rule.penalties = Penalties {
            monetary_penalty: self.monetary_penalty,
            other_penalties: self.other_penalties.iter().map(|s| s.to_string()).collect(),
            enforcement_agency: self.authority.to_string(),
        };
        rule
    }
}

/// Curated, offline rule source
pub struct CatalogSource {
    rules: Vec<ComplianceRule>,
}

impl CatalogSource {
    pub fn new() -> Self {
        let reviewed_at = DateTime::from_timestamp(CATALOG_REVIEWED_AT, 0).unwrap_or_default();
        let rules = federal::ENTRIES
            .iter()
            .chain(states::ENTRIES.iter())
            .map(|entry| entry.to_rule(reviewed_at))
            .collect();
        Self { rules }
    }

    pub fn rules(&self) -> &[ComplianceRule] {
        &self.rules
    }

    /// Federal entries plus entries for the given state
    pub fn rules_for_state(&self, state: &str) -> Vec<ComplianceRule> {
        self.rules
            .iter()
            .filter(|rule| {
                rule.level == RuleLevel::Federal
                    || is_national(&rule.jurisdiction)
                    || states_match(&rule.jurisdiction, state)
            })
            .cloned()
            .collect()
    }

    /// States with at least one state-level entry
    pub fn covered_states(&self) -> Vec<String> {
        let mut covered: Vec<String> = self
            .rules
            .iter()
            .filter(|r| r.level != RuleLevel::Federal)
            .map(|r| r.jurisdiction.clone())
            .collect();
        covered.sort();
        covered.dedup();
        covered
    }
}

impl Default for CatalogSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RuleSource for CatalogSource {
    fn name(&self) -> &str {
        "catalog"
    }

    fn source_type(&self) -> SourceType {
        SourceType::Manual
    }

    async fn search(
        &self,
        query: &str,
        _industry: &str,
        profile: &BusinessProfile,
    ) -> Result<Vec<ComplianceRule>, SourceError> {
        let rules = self.rules_for_state(&profile.headquarters_state);
        debug!(query = %query, count = rules.len(), "catalog candidates");
        Ok(rules)
    }
}
