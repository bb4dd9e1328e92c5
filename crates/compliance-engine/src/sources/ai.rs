//! Rules drafted by a chat-completions model
//!
//! The model is asked for a JSON array of rules. Responses are parsed
//! leniently: surrounding prose and code fences are ignored, and array
//! elements that do not look like rules are skipped rather than failing the
//! whole response. Every accepted rule is sanitized before it leaves the
//! source (renumbered steps, clamped scores, computed fingerprint, stable id).

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use shared_types::{
    content_fingerprint, stable_id, ApplicabilityCriteria, BusinessProfile, ComplianceRule,
    ComplianceStep, Deadlines, Penalties, Priority, RuleLevel, SourceReference, SourceType,
    VerificationStatus, MAX_RELIABILITY, MIN_RELIABILITY,
};
use tracing::{debug, instrument, warn};

use super::RuleSource;
use crate::error::SourceError;
use crate::jurisdiction::{display_state, is_national};
use crate::llm::TextGenerator;

/// Reliability given to generated rules when the model reports no confidence
const DEFAULT_AI_RELIABILITY: f64 = 6.0;

/// Generated rules never outrank verified sources
const MAX_AI_RELIABILITY: f64 = 7.0;

const SYSTEM_PROMPT: &str = "You are a U.S. regulatory compliance analyst. \
Answer only with a JSON array of compliance requirements. Do not add commentary.";

pub struct AiRuleSource {
    generator: Arc<dyn TextGenerator>,
    max_attempts: u32,
}

impl AiRuleSource {
    pub fn new(generator: Arc<dyn TextGenerator>, max_attempts: u32) -> Self {
        Self {
            generator,
            max_attempts: max_attempts.max(1),
        }
    }
}

#[async_trait]
impl RuleSource for AiRuleSource {
    fn name(&self) -> &str {
        "ai_generated"
    }

    fn source_type(&self) -> SourceType {
        SourceType::AiGenerated
    }

    #[instrument(skip(self, profile), fields(source = "ai_generated"))]
    async fn search(
        &self,
        query: &str,
        industry: &str,
        profile: &BusinessProfile,
    ) -> Result<Vec<ComplianceRule>, SourceError> {
        let prompt = build_prompt(query, industry, profile);
        let mut last_error = SourceError::Parse("no attempts made".to_string());

        for attempt in 1..=self.max_attempts {
            let outcome = match self.generator.generate(SYSTEM_PROMPT, &prompt).await {
                Ok(text) => parse_rules(&text, profile),
                Err(e) => Err(SourceError::Generation(e)),
            };

            match outcome {
                Ok(rules) => {
                    debug!(attempt, count = rules.len(), "generated rules parsed");
                    return Ok(rules);
                }
                Err(e) => {
                    warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %e,
                        "rule generation attempt failed"
                    );
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }
}

fn build_prompt(query: &str, industry: &str, profile: &BusinessProfile) -> String {
    format!(
        "Search: {query}\n\
         Business: {name} ({business_type}) in the {industry} industry, headquartered in {state}, \
         {employees} employees, annual revenue ${revenue:.0}.\n\
         {description}\n\n\
         List the federal, state and local compliance requirements that apply. \
         Return a JSON array where each element has: title, description, authority, \
         level (federal|state|local), jurisdiction, priority (critical|high|medium|low), \
         estimated_cost (number), estimated_time, \
         deadlines {{initial_deadline, recurring_deadline}}, \
         compliance_steps [{{step_number, step_description, deadline, estimated_cost, estimated_time, \
         required_forms [{{form_name, form_url}}]}}], \
         penalties {{monetary_penalty, other_penalties, enforcement_agency}}, \
         applicability_criteria {{business_types, states, employee_count {{min, max}}, industries}}, \
         source_url, confidence (0-10), tags.",
        name = profile.display_name(),
        business_type = profile.business_type,
        state = display_state(&profile.headquarters_state),
        employees = profile.employee_count,
        revenue = profile.annual_revenue.max(0.0),
        description = profile.business_description,
    )
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GeneratedRule {
    title: String,
    description: String,
    authority: String,
    level: Option<String>,
    jurisdiction: String,
    priority: Option<String>,
    estimated_cost: Option<f64>,
    estimated_time: String,
    deadlines: Option<Deadlines>,
    compliance_steps: Vec<GeneratedStep>,
    penalties: Option<Penalties>,
    applicability_criteria: Option<ApplicabilityCriteria>,
    source_url: String,
    confidence: Option<f64>,
    tags: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GeneratedStep {
    step_number: Option<u32>,
    step_description: String,
    deadline: String,
    estimated_cost: Option<f64>,
    estimated_time: String,
    required_forms: Vec<shared_types::RequiredForm>,
}

/// First JSON array in the reply that holds objects.
///
/// Every `[` is tried as a start position so bracketed prose ahead of the
/// payload (markdown links, citations) is skipped. An array without objects
/// is only returned when nothing better follows.
fn extract_json_array(text: &str) -> Result<Vec<Value>, SourceError> {
    let mut fallback = None;
    let mut last_error = None;

    for (start, _) in text.match_indices('[') {
        let mut stream =
            serde_json::Deserializer::from_str(&text[start..]).into_iter::<Vec<Value>>();
        match stream.next() {
            Some(Ok(items)) if items.iter().any(Value::is_object) => return Ok(items),
            Some(Ok(items)) => {
                fallback.get_or_insert(items);
            }
            Some(Err(e)) => last_error = Some(e.to_string()),
            None => {}
        }
    }

    fallback.ok_or_else(|| {
        SourceError::Parse(
            last_error.unwrap_or_else(|| "response contained no JSON array".to_string()),
        )
    })
}

fn parse_rules(
    text: &str,
    profile: &BusinessProfile,
) -> Result<Vec<ComplianceRule>, SourceError> {
    let items = extract_json_array(text)?;

    let mut rules = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value::<GeneratedRule>(item) {
            Ok(generated) if !generated.title.trim().is_empty() => {
                rules.push(sanitize(generated, profile));
            }
            Ok(_) => debug!("skipping generated rule without a title"),
            Err(e) => debug!(error = %e, "skipping malformed generated rule"),
        }
    }
    Ok(rules)
}

fn parse_level(level: Option<&str>, jurisdiction: &str) -> RuleLevel {
    match level.map(|l| l.trim().to_lowercase()).as_deref() {
        Some("federal") => RuleLevel::Federal,
        Some("state") => RuleLevel::State,
        Some("local") | Some("city") | Some("county") => RuleLevel::Local,
        _ if is_national(jurisdiction) => RuleLevel::Federal,
        _ => RuleLevel::State,
    }
}

fn parse_priority(priority: Option<&str>) -> Priority {
    match priority.map(|p| p.trim().to_lowercase()).as_deref() {
        Some("critical") => Priority::Critical,
        Some("high") => Priority::High,
        Some("low") => Priority::Low,
        _ => Priority::Medium,
    }
}

fn non_negative(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite() && *v > 0.0).unwrap_or(0.0)
}

fn sanitize(generated: GeneratedRule, profile: &BusinessProfile) -> ComplianceRule {
    let title = generated.title.trim().to_string();
    let description = generated.description.trim().to_string();
    let level = parse_level(generated.level.as_deref(), &generated.jurisdiction);

    let jurisdiction = match (level, generated.jurisdiction.trim()) {
        (RuleLevel::Federal, "") => "US".to_string(),
        (_, "") => display_state(&profile.headquarters_state),
        (_, j) => j.to_string(),
    };

    let mut criteria = generated.applicability_criteria.unwrap_or_default();
    if level != RuleLevel::Federal && criteria.states.is_empty() {
        criteria.states.push(display_state(&profile.headquarters_state));
    }

    let mut steps = generated.compliance_steps;
    steps.sort_by_key(|s| s.step_number.unwrap_or(u32::MAX));
    let compliance_steps = steps
        .into_iter()
        .filter(|s| !s.step_description.trim().is_empty())
        .enumerate()
        .map(|(i, s)| ComplianceStep {
            step_number: i as u32 + 1,
            step_description: s.step_description,
            deadline: s.deadline,
            estimated_cost: non_negative(s.estimated_cost),
            estimated_time: s.estimated_time,
            required_forms: s.required_forms,
        })
        .collect();

    let reliability = generated
        .confidence
        .filter(|c| c.is_finite())
        .unwrap_or(DEFAULT_AI_RELIABILITY)
        .clamp(MIN_RELIABILITY, MAX_RELIABILITY)
        .min(MAX_AI_RELIABILITY);

    let id = stable_id("ai", &[&title, &generated.authority, &jurisdiction]);
    let source = SourceReference {
        source_id: format!("ai_generated:{}", id),
        source_type: SourceType::AiGenerated,
        source_name: "AI-generated analysis".to_string(),
        source_url: generated.source_url,
        external_id: None,
        reliability_score: reliability,
        last_updated: Utc::now(),
        verification_status: VerificationStatus::Pending,
        content_hash: content_fingerprint(&title, &description),
    };

    let mut rule = ComplianceRule::new(&id, &title, level, &jurisdiction)
        .with_description(&description)
        .with_authority(generated.authority.trim())
        .with_priority(parse_priority(generated.priority.as_deref()))
        .with_cost(non_negative(generated.estimated_cost))
        .with_criteria(criteria)
        .with_source(source);

    rule.estimated_time = generated.estimated_time;
    rule.deadlines = generated.deadlines.unwrap_or_default();
    rule.compliance_steps = compliance_steps;
    rule.penalties = generated.penalties.unwrap_or_default();
    rule.tags.extend(
        generated
            .tags
            .into_iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty()),
    );
    rule.tags.insert("ai-generated".to_string());
    rule
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LlmError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct ScriptedGenerator {
        responses: Mutex<Vec<Result<String, LlmError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedGenerator {
        fn new(responses: Vec<Result<String, LlmError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, _system: &str, _prompt: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                Err(LlmError::EmptyResponse)
            } else {
                responses.remove(0)
            }
        }
    }

    fn profile() -> BusinessProfile {
        BusinessProfile::new("LLC", "Restaurant", "CA").with_employees(12)
    }

    const RESPONSE: &str = r#"Here are the requirements:
```json
[
  {
    "title": "Obtain a Health Permit",
    "description": "Food facilities need a county health permit.",
    "authority": "County Environmental Health",
    "level": "local",
    "priority": "CRITICAL",
    "estimated_cost": 750,
    "compliance_steps": [
      {"step_number": 3, "step_description": "Pass inspection"},
      {"step_number": 1, "step_description": "Submit plans"},
      {"step_number": 1, "step_description": "Pay fee"}
    ],
    "confidence": 42
  },
  "not a rule",
  {"description": "missing title"},
  {
    "title": "Register for federal payroll taxes",
    "jurisdiction": "United States",
    "estimated_cost": -5
  }
]
```"#;

    #[test]
    fn test_parse_lenient_response() {
        let rules = parse_rules(RESPONSE, &profile()).unwrap();
        assert_eq!(rules.len(), 2);

        let permit = &rules[0];
        assert_eq!(permit.level, RuleLevel::Local);
        assert_eq!(permit.priority, Priority::Critical);
        assert_eq!(permit.jurisdiction, "California");
        assert_eq!(
            permit.applicability_criteria.as_ref().unwrap().states,
            vec!["California".to_string()]
        );
        let numbers: Vec<u32> = permit.compliance_steps.iter().map(|s| s.step_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(permit.compliance_steps[2].step_description, "Pass inspection");
        assert_eq!(permit.reliability(), MAX_AI_RELIABILITY);
        assert_eq!(permit.sources[0].source_type, SourceType::AiGenerated);
        assert_eq!(permit.sources[0].verification_status, VerificationStatus::Pending);
        assert_eq!(
            permit.content_hash(),
            content_fingerprint(
                "Obtain a Health Permit",
                "Food facilities need a county health permit."
            )
        );

        let payroll = &rules[1];
        assert_eq!(payroll.level, RuleLevel::Federal);
        assert_eq!(payroll.estimated_cost, 0.0);
        assert_eq!(payroll.reliability(), DEFAULT_AI_RELIABILITY);
    }

    #[test]
    fn test_ids_are_stable() {
        let first = parse_rules(RESPONSE, &profile()).unwrap();
        let second = parse_rules(RESPONSE, &profile()).unwrap();
        assert_eq!(first[0].id, second[0].id);
        assert!(first[0].id.starts_with("ai-"));
    }

    #[test]
    fn test_parse_skips_bracketed_prose_before_payload() {
        let text = "Sources: [CDTFA](https://cdtfa.ca.gov) and [1]\n```json\n\
                    [{\"title\":\"Seller's permit\",\"level\":\"state\"}]\n```\n\
                    See also [2].";
        let rules = parse_rules(text, &profile()).unwrap();

        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].title, "Seller's permit");
        assert_eq!(rules[0].level, RuleLevel::State);
    }

    #[test]
    fn test_parse_accepts_empty_array() {
        assert!(parse_rules("Nothing applies: []", &profile()).unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_prose() {
        let err = parse_rules("I cannot help with that.", &profile()).unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
    }

    #[tokio::test]
    async fn test_search_retries_then_succeeds() {
        let generator = ScriptedGenerator::new(vec![
            Err(LlmError::EmptyResponse),
            Ok("no json here".to_string()),
            Ok(RESPONSE.to_string()),
        ]);
        let source = AiRuleSource::new(generator.clone(), 3);
        let rules = source.search("q", "Restaurant", &profile()).await.unwrap();

        assert_eq!(rules.len(), 2);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_search_gives_up_after_max_attempts() {
        let generator = ScriptedGenerator::new(vec![]);
        let source = AiRuleSource::new(generator.clone(), 2);
        let err = source.search("q", "Restaurant", &profile()).await.unwrap_err();

        assert!(matches!(err, SourceError::Generation(LlmError::EmptyResponse)));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_empty_array_is_not_an_error() {
        let generator = ScriptedGenerator::new(vec![Ok("[]".to_string())]);
        let source = AiRuleSource::new(generator.clone(), 2);
        let rules = source.search("q", "Restaurant", &profile()).await.unwrap();
        assert!(rules.is_empty());
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }
}
