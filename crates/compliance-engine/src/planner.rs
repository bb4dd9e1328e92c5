//! Query planning: turn a business profile into search queries
//!
//! One information-dense query is the default. Every extra query multiplies
//! search, generation and merge work downstream, so a second query is only
//! planned for industries the general query is known to under-cover.

use serde::{Deserialize, Serialize};
use shared_types::BusinessProfile;

use crate::jurisdiction::display_state;
use crate::patterns::{
    COMPLIANCE_TOPICS, GENERIC_INDUSTRIES, INDUSTRY_TOPICS, UNDER_COVERED_INDUSTRIES,
};

/// Coverage hints that decide when an industry gets its own query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Industry keywords (lowercase) the general query under-covers
    pub under_covered_industries: Vec<String>,
    pub topics: Vec<String>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            under_covered_industries: UNDER_COVERED_INDUSTRIES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            topics: COMPLIANCE_TOPICS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct QueryPlanner {
    config: PlannerConfig,
}

impl QueryPlanner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// Build the search queries for a profile. Always returns at least one
    /// query and never returns duplicates.
    pub fn plan(&self, profile: &BusinessProfile) -> Vec<String> {
        let business_type = clean(&profile.business_type);
        let industry = clean(&profile.primary_industry);
        let state = display_state(&profile.headquarters_state);

        let mut general = Vec::new();
        push_part(&mut general, &business_type);
        push_part(&mut general, &industry);
        general.push("business compliance requirements".to_string());
        if !state.is_empty() {
            general.push(format!("in {}", state));
        }
        if !self.config.topics.is_empty() {
            general.push(self.config.topics.join(", "));
        }

        let mut queries = vec![general.join(" ")];

        if self.needs_industry_query(&industry) {
            let mut dedicated = vec![industry.clone(), "industry regulations".to_string()];
            if !state.is_empty() {
                dedicated.push(format!("in {}", state));
            }
            dedicated.push(INDUSTRY_TOPICS.join(", "));
            let dedicated = dedicated.join(" ");
            if !queries.contains(&dedicated) {
                queries.push(dedicated);
            }
        }

        queries
    }

    fn needs_industry_query(&self, industry: &str) -> bool {
        let industry = industry.to_lowercase();
        if industry.is_empty() || GENERIC_INDUSTRIES.contains(&industry.as_str()) {
            return false;
        }
        self.config
            .under_covered_industries
            .iter()
            .any(|keyword| !keyword.is_empty() && industry.contains(&keyword.to_lowercase()))
    }
}

fn clean(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn push_part(parts: &mut Vec<String>, part: &str) {
    if !part.is_empty() {
        parts.push(part.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_query_for_well_covered_industry() {
        let profile = BusinessProfile::new("LLC", "Software Consulting", "TX");
        let queries = QueryPlanner::default().plan(&profile);

        assert_eq!(queries.len(), 1);
        let q = &queries[0];
        assert!(q.contains("LLC"));
        assert!(q.contains("Software Consulting"));
        assert!(q.contains("Texas"));
        assert!(q.contains("employment law"));
        assert!(q.contains("payroll tax"));
    }

    #[test]
    fn test_under_covered_industry_gets_dedicated_query() {
        let profile = BusinessProfile::new("LLC", "Restaurant", "California");
        let queries = QueryPlanner::default().plan(&profile);

        assert_eq!(queries.len(), 2);
        assert!(queries[1].starts_with("Restaurant industry regulations"));
        assert!(queries[1].contains("California"));
    }

    #[test]
    fn test_generic_industry_never_splits() {
        let config = PlannerConfig {
            under_covered_industries: vec!["other".to_string()],
            ..PlannerConfig::default()
        };
        let profile = BusinessProfile::new("Corporation", "Other", "NY");
        assert_eq!(QueryPlanner::new(config).plan(&profile).len(), 1);
    }

    #[test]
    fn test_sparse_profile_still_yields_query() {
        let profile = BusinessProfile::new("", "", "");
        let queries = QueryPlanner::default().plan(&profile);

        assert_eq!(queries.len(), 1);
        assert!(!queries[0].trim().is_empty());
    }

    #[test]
    fn test_plan_is_pure() {
        let planner = QueryPlanner::default();
        let profile = BusinessProfile::new("LLC", "Construction", "FL").with_employees(30);
        assert_eq!(planner.plan(&profile), planner.plan(&profile));
    }
}
