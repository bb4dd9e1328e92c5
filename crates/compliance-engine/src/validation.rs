//! Data-quality checks for rules and profiles
//!
//! Nothing here rejects input. Defects are reported as [`DataQualityFlag`]s
//! and travel with the analysis metadata.

use serde::{Deserialize, Serialize};
use shared_types::{BusinessProfile, ComplianceRule, RuleLevel, MAX_RELIABILITY, MIN_RELIABILITY};

/// Subject used for flags raised against the business profile
pub const PROFILE_SUBJECT: &str = "profile";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagKind {
    NonSequentialSteps,
    ScoreOutOfRange,
    MalformedEmployeeRange,
    MissingStateScope,
    MissingCriteria,
    EmptyTitle,
    InvalidRevenue,
    MissingProfileField,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataQualityFlag {
    pub rule_id: String,
    pub kind: FlagKind,
    pub detail: String,
}

impl DataQualityFlag {
    pub fn new(rule_id: &str, kind: FlagKind, detail: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            kind,
            detail: detail.into(),
        }
    }
}

pub(crate) fn employee_range_flag(rule: &ComplianceRule) -> Option<DataQualityFlag> {
    let range = rule.applicability_criteria.as_ref()?.employee_count?;
    if range.is_well_formed() {
        return None;
    }
    Some(DataQualityFlag::new(
        &rule.id,
        FlagKind::MalformedEmployeeRange,
        format!(
            "employee bounds min={:?} max={:?} ignored",
            range.min, range.max
        ),
    ))
}

pub(crate) fn state_scope_flag(rule: &ComplianceRule) -> Option<DataQualityFlag> {
    if rule.level == RuleLevel::Federal {
        return None;
    }
    let scoped = rule
        .applicability_criteria
        .as_ref()
        .is_some_and(|c| c.states.iter().any(|s| !s.trim().is_empty()));
    if scoped {
        return None;
    }
    Some(DataQualityFlag::new(
        &rule.id,
        FlagKind::MissingStateScope,
        format!("{} rule for '{}' lists no states", rule.level, rule.jurisdiction),
    ))
}

fn score_in_range(score: f64) -> bool {
    (MIN_RELIABILITY..=MAX_RELIABILITY).contains(&score)
}

pub fn validate_rule(rule: &ComplianceRule) -> Vec<DataQualityFlag> {
    let mut flags = Vec::new();

    if rule.title.trim().is_empty() {
        flags.push(DataQualityFlag::new(&rule.id, FlagKind::EmptyTitle, "rule has no title"));
    }

    let sequential = rule
        .compliance_steps
        .iter()
        .enumerate()
        .all(|(i, step)| step.step_number as usize == i + 1);
    if !sequential {
        let numbers: Vec<u32> = rule.compliance_steps.iter().map(|s| s.step_number).collect();
        flags.push(DataQualityFlag::new(
            &rule.id,
            FlagKind::NonSequentialSteps,
            format!("step numbers {:?}", numbers),
        ));
    }

    for source in rule.sources.iter().filter(|s| !score_in_range(s.reliability_score)) {
        flags.push(DataQualityFlag::new(
            &rule.id,
            FlagKind::ScoreOutOfRange,
            format!("{} reliability {}", source.source_id, source.reliability_score),
        ));
    }

    if rule.applicability_criteria.is_none() {
        flags.push(DataQualityFlag::new(
            &rule.id,
            FlagKind::MissingCriteria,
            "no applicability criteria",
        ));
    }

    flags.extend(employee_range_flag(rule));
    flags.extend(state_scope_flag(rule));
    flags
}

/// Clamp source reliability scores into `[0, 10]`, flagging each change.
/// Non-finite scores become 0.
pub fn clamp_scores(rule: &mut ComplianceRule) -> Vec<DataQualityFlag> {
    let mut flags = Vec::new();
    for source in rule.sources.iter_mut() {
        if score_in_range(source.reliability_score) {
            continue;
        }
        let clamped = if source.reliability_score.is_finite() {
            source.reliability_score.clamp(MIN_RELIABILITY, MAX_RELIABILITY)
        } else {
            MIN_RELIABILITY
        };
        flags.push(DataQualityFlag::new(
            &rule.id,
            FlagKind::ScoreOutOfRange,
            format!(
                "{} reliability {} clamped to {}",
                source.source_id, source.reliability_score, clamped
            ),
        ));
        source.reliability_score = clamped;
    }
    flags
}

pub fn validate_profile(profile: &BusinessProfile) -> Vec<DataQualityFlag> {
    let mut flags = Vec::new();

    if !profile.annual_revenue.is_finite() || profile.annual_revenue < 0.0 {
        flags.push(DataQualityFlag::new(
            PROFILE_SUBJECT,
            FlagKind::InvalidRevenue,
            format!("annual revenue {}", profile.annual_revenue),
        ));
    }

    for (field, value) in [
        ("business_type", &profile.business_type),
        ("primary_industry", &profile.primary_industry),
        ("headquarters_state", &profile.headquarters_state),
    ] {
        if value.trim().is_empty() {
            flags.push(DataQualityFlag::new(
                PROFILE_SUBJECT,
                FlagKind::MissingProfileField,
                format!("{} is blank", field),
            ));
        }
    }

    flags
}

/// Drop repeated flags, keeping first occurrences in order
pub fn dedupe_flags(flags: Vec<DataQualityFlag>) -> Vec<DataQualityFlag> {
    let mut seen = std::collections::HashSet::new();
    flags.into_iter().filter(|f| seen.insert(f.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared_types::{
        ApplicabilityCriteria, ComplianceStep, EmployeeRange, SourceReference, SourceType,
        VerificationStatus,
    };

    fn step(n: u32) -> ComplianceStep {
        ComplianceStep {
            step_number: n,
            step_description: format!("step {}", n),
            ..ComplianceStep::default()
        }
    }

    fn source(score: f64) -> SourceReference {
        SourceReference {
            source_id: "src".to_string(),
            source_type: SourceType::Api,
            source_name: "test".to_string(),
            source_url: String::new(),
            external_id: None,
            reliability_score: score,
            last_updated: Utc::now(),
            verification_status: VerificationStatus::Verified,
            content_hash: String::new(),
        }
    }

    fn kinds(flags: &[DataQualityFlag]) -> Vec<FlagKind> {
        flags.iter().map(|f| f.kind).collect()
    }

    #[test]
    fn test_clean_rule_has_no_flags() {
        let mut rule = ComplianceRule::new("r1", "Permit", RuleLevel::State, "Texas")
            .with_criteria(ApplicabilityCriteria {
                states: vec!["Texas".to_string()],
                ..ApplicabilityCriteria::default()
            })
            .with_source(source(8.0));
        rule.compliance_steps = vec![step(1), step(2)];
        assert!(validate_rule(&rule).is_empty());
    }

    #[test]
    fn test_defective_rule_flags() {
        let mut rule = ComplianceRule::new("r1", "  ", RuleLevel::Local, "Austin")
            .with_criteria(ApplicabilityCriteria {
                employee_count: Some(EmployeeRange::between(50, 5)),
                ..ApplicabilityCriteria::default()
            })
            .with_source(source(12.0));
        rule.compliance_steps = vec![step(2), step(3)];

        assert_eq!(
            kinds(&validate_rule(&rule)),
            vec![
                FlagKind::EmptyTitle,
                FlagKind::NonSequentialSteps,
                FlagKind::ScoreOutOfRange,
                FlagKind::MalformedEmployeeRange,
                FlagKind::MissingStateScope,
            ]
        );
    }

    #[test]
    fn test_missing_criteria() {
        let federal = ComplianceRule::new("f", "Federal", RuleLevel::Federal, "US");
        assert_eq!(kinds(&validate_rule(&federal)), vec![FlagKind::MissingCriteria]);

        let state = ComplianceRule::new("s", "State", RuleLevel::State, "Ohio");
        assert_eq!(
            kinds(&validate_rule(&state)),
            vec![FlagKind::MissingCriteria, FlagKind::MissingStateScope]
        );
    }

    #[test]
    fn test_clamp_scores() {
        let mut rule = ComplianceRule::new("r", "T", RuleLevel::Federal, "US")
            .with_source(source(-1.0))
            .with_source(source(7.0))
            .with_source(source(f64::NAN))
            .with_source(source(11.5));
        let flags = clamp_scores(&mut rule);

        assert_eq!(flags.len(), 3);
        let scores: Vec<f64> = rule.sources.iter().map(|s| s.reliability_score).collect();
        assert_eq!(scores, vec![0.0, 7.0, 0.0, 10.0]);
        assert!(clamp_scores(&mut rule).is_empty());
    }

    #[test]
    fn test_validate_profile() {
        let ok = BusinessProfile::new("LLC", "Retail", "TX").with_revenue(10_000.0);
        assert!(validate_profile(&ok).is_empty());

        let bad = BusinessProfile::new("", "Retail", " ").with_revenue(-5.0);
        assert_eq!(
            kinds(&validate_profile(&bad)),
            vec![
                FlagKind::InvalidRevenue,
                FlagKind::MissingProfileField,
                FlagKind::MissingProfileField,
            ]
        );
    }

    #[test]
    fn test_dedupe_flags() {
        let a = DataQualityFlag::new("r", FlagKind::EmptyTitle, "x");
        let b = DataQualityFlag::new("r", FlagKind::MissingCriteria, "y");
        assert_eq!(dedupe_flags(vec![a.clone(), b.clone(), a.clone()]), vec![a, b]);
    }
}
