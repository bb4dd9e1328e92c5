//! Report synthesis
//!
//! A narrative collaborator writes the report when it can. When it fails,
//! times out or returns nothing, a deterministic summary is produced instead
//! and its header says so. An empty rule set never reaches the collaborator.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared_types::{BusinessProfile, ComplianceRule, Priority, RuleLevel};
use tracing::{info, warn};

use crate::error::GenerationError;
use crate::jurisdiction::display_state;
use crate::llm::TextGenerator;

pub const DEFAULT_GENERATION_TIMEOUT_MS: u64 = 60_000;

/// Rules included in a narrative prompt
const MAX_PROMPT_RULES: usize = 40;

const NEXT_STEPS: &[&str] = &[
    "Start with the critical items: registrations and tax accounts usually gate everything else.",
    "Put every recurring deadline on a shared compliance calendar.",
    "Confirm local (city and county) licensing requirements with your municipality.",
    "Have an attorney or accountant review this list before relying on it.",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportMode {
    Generated,
    Fallback,
    NoFindings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub text: String,
    pub mode: ReportMode,
}

#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    async fn generate_report(
        &self,
        profile: &BusinessProfile,
        rules: &[ComplianceRule],
    ) -> Result<String, GenerationError>;
}

/// Narrative generator backed by a chat-completions model
pub struct LlmNarrativeGenerator {
    generator: Arc<dyn TextGenerator>,
}

const NARRATIVE_SYSTEM_PROMPT: &str = "You are a compliance advisor writing for small business owners. \
Write a clear, well-organized Markdown report. Only discuss the requirements provided.";

impl LlmNarrativeGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }
}

fn narrative_prompt(profile: &BusinessProfile, rules: &[ComplianceRule]) -> String {
    let mut prompt = format!(
        "Business: {} ({}), industry {}, {} employees, located in {}.\n\n\
         Applicable requirements ({} total):\n",
        profile.display_name(),
        profile.business_type,
        profile.primary_industry,
        profile.employee_count,
        display_state(&profile.headquarters_state),
        rules.len(),
    );
    for rule in rules.iter().take(MAX_PROMPT_RULES) {
        prompt.push_str(&format!(
            "- [{}] {} ({}, {}): {}\n",
            rule.priority, rule.title, rule.level, rule.authority, rule.description
        ));
    }
    if rules.len() > MAX_PROMPT_RULES {
        prompt.push_str(&format!("- ... and {} more\n", rules.len() - MAX_PROMPT_RULES));
    }
    prompt.push_str(
        "\nWrite an executive summary, group the requirements by priority, \
         call out deadlines and estimated costs, and end with recommended next steps.",
    );
    prompt
}

#[async_trait]
impl NarrativeGenerator for LlmNarrativeGenerator {
    async fn generate_report(
        &self,
        profile: &BusinessProfile,
        rules: &[ComplianceRule],
    ) -> Result<String, GenerationError> {
        let prompt = narrative_prompt(profile, rules);
        Ok(self.generator.generate(NARRATIVE_SYSTEM_PROMPT, &prompt).await?)
    }
}

pub struct ReportSynthesizer {
    generator: Option<Arc<dyn NarrativeGenerator>>,
    timeout: Duration,
}

impl ReportSynthesizer {
    pub fn new(generator: Option<Arc<dyn NarrativeGenerator>>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    /// Template-only synthesizer
    pub fn template_only() -> Self {
        Self::new(None, Duration::from_millis(DEFAULT_GENERATION_TIMEOUT_MS))
    }

    pub async fn synthesize(&self, profile: &BusinessProfile, rules: &[ComplianceRule]) -> Report {
        if rules.is_empty() {
            return Report {
                text: no_findings_report(profile),
                mode: ReportMode::NoFindings,
            };
        }

        let Some(generator) = &self.generator else {
            return Report {
                text: fallback_report(profile, rules),
                mode: ReportMode::Fallback,
            };
        };

        let generation = generator.generate_report(profile, rules);
        let outcome = match tokio::time::timeout(self.timeout, generation).await {
            Ok(Ok(text)) if !text.trim().is_empty() => Ok(text),
            Ok(Ok(_)) => Err(GenerationError::Empty),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(GenerationError::Timeout(self.timeout.as_millis() as u64)),
        };

        match outcome {
            Ok(text) => {
                info!(rules = rules.len(), "narrative report generated");
                Report {
                    text,
                    mode: ReportMode::Generated,
                }
            }
            Err(e) => {
                warn!(error = %e, "narrative generation failed, using fallback report");
                Report {
                    text: fallback_report(profile, rules),
                    mode: ReportMode::Fallback,
                }
            }
        }
    }
}

fn format_cost(cost: f64) -> String {
    if cost.is_finite() && cost > 0.0 {
        format!("${:.0}", cost)
    } else {
        "no direct cost listed".to_string()
    }
}

/// Deterministic summary used when no narrative is available
pub fn fallback_report(profile: &BusinessProfile, rules: &[ComplianceRule]) -> String {
    let mut by_priority: BTreeMap<Priority, usize> = BTreeMap::new();
    let mut by_level: BTreeMap<&'static str, usize> = BTreeMap::new();
    for rule in rules {
        *by_priority.entry(rule.priority).or_default() += 1;
        let level = match rule.level {
            RuleLevel::Federal => "Federal",
            RuleLevel::State => "State",
            RuleLevel::Local => "Local",
        };
        *by_level.entry(level).or_default() += 1;
    }

    let mut out = String::new();
    out.push_str(&format!(
        "# Compliance Summary for {} (automated narrative unavailable)\n\n",
        profile.display_name()
    ));
    out.push_str(
        "The narrative report could not be generated, so this is a structured summary \
         of the applicable requirements.\n\n",
    );

    out.push_str("## Overview\n\n");
    out.push_str(&format!(
        "- Location: {}\n- Applicable requirements: {}\n",
        display_state(&profile.headquarters_state),
        rules.len()
    ));
    for (priority, count) in by_priority.iter().rev() {
        out.push_str(&format!("- {} priority: {}\n", capitalize(&priority.to_string()), count));
    }
    for level in ["Federal", "State", "Local"] {
        if let Some(count) = by_level.get(level) {
            out.push_str(&format!("- {}: {}\n", level, count));
        }
    }

    out.push_str("\n## Requirements\n\n");
    for (i, rule) in rules.iter().enumerate() {
        out.push_str(&format!(
            "{}. [{}] {}",
            i + 1,
            rule.priority.to_string().to_uppercase(),
            rule.title
        ));
        if !rule.authority.is_empty() {
            out.push_str(&format!(" ({})", rule.authority));
        }
        out.push_str(&format!(" - {}\n", format_cost(rule.estimated_cost)));
    }

    out.push_str("\n## Next Steps\n\n");
    for (i, step) in NEXT_STEPS.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, step));
    }
    out
}

pub fn no_findings_report(profile: &BusinessProfile) -> String {
    format!(
        "# Compliance Summary for {}\n\n\
         No applicable requirements were found for this profile. This usually means the \
         sources returned nothing for {} rather than that no regulations apply.\n\n\
         Review federal, state and local requirements manually or consult a compliance professional.\n",
        profile.display_name(),
        display_state(&profile.headquarters_state),
    )
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
