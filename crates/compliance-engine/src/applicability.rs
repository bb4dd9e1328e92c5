//! Applicability filter: which rules bind a business profile
//!
//! A rule applies when every dimension it constrains matches:
//! - Jurisdiction: federal, or its jurisdiction / state list names the
//!   profile's state, or it lists no states at all
//! - Business type: listed (case-insensitive) or unconstrained
//! - Employee count: inside the inclusive bounds
//! - Industry: an entry overlaps the profile's industry or equals its code
//!
//! Evaluation is total. Missing criteria constrain nothing, and malformed
//! bounds are ignored and flagged instead of failing the rule.

use std::cmp::Ordering;

use shared_types::{BusinessProfile, ComplianceRule, RuleLevel};

use crate::jurisdiction::states_match;
use crate::patterns::is_wildcard;
use crate::validation::{employee_range_flag, state_scope_flag, DataQualityFlag};

/// Per-rule decision plus any data-quality defects noticed on the way
#[derive(Debug, Clone, PartialEq)]
pub struct Applicability {
    pub applies: bool,
    pub flags: Vec<DataQualityFlag>,
}

fn jurisdiction_matches(rule: &ComplianceRule, state: &str) -> bool {
    if rule.level == RuleLevel::Federal || states_match(&rule.jurisdiction, state) {
        return true;
    }
    match &rule.applicability_criteria {
        None => true,
        Some(criteria) => {
            let states: Vec<&String> = criteria
                .states
                .iter()
                .filter(|s| !s.trim().is_empty())
                .collect();
            states.is_empty() || states.iter().any(|s| states_match(s, state))
        }
    }
}

fn business_type_matches(types: &[String], business_type: &str) -> bool {
    let business_type = business_type.trim();
    let listed: Vec<&str> = types.iter().map(|t| t.trim()).filter(|t| !t.is_empty()).collect();
    listed.is_empty()
        || listed
            .iter()
            .any(|t| is_wildcard(t) || t.eq_ignore_ascii_case(business_type))
}

fn industry_matches(industries: &[String], profile: &BusinessProfile) -> bool {
    let industry = profile.primary_industry.trim().to_lowercase();
    let code = profile
        .industry_code
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());

    let listed: Vec<String> = industries
        .iter()
        .map(|i| i.trim().to_lowercase())
        .filter(|i| !i.is_empty())
        .collect();

    listed.is_empty()
        || listed.iter().any(|entry| {
            is_wildcard(entry)
                || (!industry.is_empty()
                    && (industry.contains(entry.as_str()) || entry.contains(industry.as_str())))
                || code.is_some_and(|c| c.eq_ignore_ascii_case(entry))
        })
}

/// Decide whether `rule` binds `profile`
pub fn evaluate(rule: &ComplianceRule, profile: &BusinessProfile) -> Applicability {
    let mut flags = Vec::new();
    flags.extend(state_scope_flag(rule));
    let range_flag = employee_range_flag(rule);
    let range_usable = range_flag.is_none();
    flags.extend(range_flag);

    let applies = jurisdiction_matches(rule, &profile.headquarters_state)
        && match &rule.applicability_criteria {
            None => true,
            Some(criteria) => {
                business_type_matches(&criteria.business_types, &profile.business_type)
                    && (!range_usable
                        || criteria
                            .employee_count
                            .map_or(true, |range| range.contains(profile.employee_count)))
                    && criteria
                        .industries
                        .as_deref()
                        .map_or(true, |industries| industry_matches(industries, profile))
            }
        };

    Applicability { applies, flags }
}

/// Priority descending, estimated cost descending, title ascending.
/// Ids break any remaining tie so the order is total.
pub fn report_order(a: &ComplianceRule, b: &ComplianceRule) -> Ordering {
    b.priority
        .cmp(&a.priority)
        .then_with(|| b.estimated_cost.total_cmp(&a.estimated_cost))
        .then_with(|| a.title.cmp(&b.title))
        .then_with(|| a.id.cmp(&b.id))
}

pub fn filter_with_flags(
    rules: Vec<ComplianceRule>,
    profile: &BusinessProfile,
) -> (Vec<ComplianceRule>, Vec<DataQualityFlag>) {
    let mut flags = Vec::new();
    let mut applicable: Vec<ComplianceRule> = rules
        .into_iter()
        .filter(|rule| {
            let decision = evaluate(rule, profile);
            flags.extend(decision.flags);
            decision.applies
        })
        .collect();
    applicable.sort_by(report_order);
    (applicable, flags)
}

pub fn filter(rules: Vec<ComplianceRule>, profile: &BusinessProfile) -> Vec<ComplianceRule> {
    filter_with_flags(rules, profile).0
}
