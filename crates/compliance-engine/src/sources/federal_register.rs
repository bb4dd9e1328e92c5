//! Federal Register documents search
//!
//! Each query is expanded into a small set of search terms which are sent to
//! `GET {base}/documents.json` one after another, pausing between requests so
//! a single analysis never bursts the public API. Final and proposed rules
//! become federal-level `ComplianceRule`s; notices and presidential documents
//! are dropped.

use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use shared_types::{
    content_fingerprint, normalize_text, ApplicabilityCriteria, BusinessProfile, ComplianceRule,
    Priority, RuleLevel, RuleStatus, SourceReference, SourceType, VerificationStatus,
};
use tracing::{debug, info, instrument, warn};

use super::RuleSource;
use crate::error::SourceError;

const FEDERAL_REGISTER_RELIABILITY: f64 = 8.0;

lazy_static! {
    static ref HTML_TAG: Regex = Regex::new(r"<[^>]+>").unwrap();
    static ref CFR_CITATION: Regex =
        Regex::new(r"(?i)\b(\d{1,2})\s+CFR\s+(?:parts?\s+)?(\d{1,4})\b").unwrap();
}

pub struct FederalRegisterSource {
    client: reqwest::Client,
    base_url: String,
    per_page: u32,
    request_delay: Duration,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Document>,
}

#[derive(Debug, Deserialize)]
struct Document {
    document_number: String,
    #[serde(default)]
    title: String,
    #[serde(default, rename = "abstract")]
    summary: Option<String>,
    #[serde(default)]
    html_url: String,
    #[serde(default)]
    publication_date: Option<String>,
    #[serde(default, rename = "type")]
    document_type: String,
    #[serde(default)]
    agencies: Vec<Agency>,
}

#[derive(Debug, Deserialize)]
struct Agency {
    #[serde(default)]
    name: Option<String>,
}

impl FederalRegisterSource {
    /// `base_url` should be like `https://www.federalregister.gov/api/v1` (no trailing slash)
    pub fn new(
        client: reqwest::Client,
        base_url: &str,
        per_page: u32,
        request_delay_ms: u64,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            per_page: per_page.clamp(1, 100),
            request_delay: Duration::from_millis(request_delay_ms),
        }
    }

    async fn fetch(&self, term: &str) -> Result<Vec<Document>, SourceError> {
        let url = format!("{}/documents.json", self.base_url);
        let per_page = self.per_page.to_string();

        debug!(url = %url, term = %term, "searching federal register");
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("conditions[term]", term),
                ("per_page", per_page.as_str()),
                ("order", "relevance"),
            ])
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SourceError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let text = resp.text().await?;
        let parsed: SearchResponse =
            serde_json::from_str(&text).map_err(|e| SourceError::Parse(e.to_string()))?;
        Ok(parsed.results)
    }
}

/// The query itself plus an industry-focused term, without repeats
fn search_terms(query: &str, industry: &str) -> Vec<String> {
    let mut terms = vec![query.trim().to_string()];
    let industry = industry.trim();
    if !industry.is_empty() {
        let focused = format!("{} compliance", industry);
        if normalize_text(&focused) != normalize_text(&terms[0]) {
            terms.push(focused);
        }
    }
    terms.retain(|t| !t.is_empty());
    terms
}

/// Fetch every term in order, sleeping `delay` between requests.
///
/// A failed term is logged and skipped; the call only fails when no term
/// succeeded, returning the last error.
async fn fetch_terms<F, Fut>(
    terms: &[String],
    delay: Duration,
    mut fetch: F,
) -> Result<Vec<Document>, SourceError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<Vec<Document>, SourceError>>,
{
    let mut documents = Vec::new();
    let mut succeeded = 0;
    let mut last_error = None;

    for (i, term) in terms.iter().enumerate() {
        if i > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        match fetch(term.clone()).await {
            Ok(found) => {
                succeeded += 1;
                documents.extend(found);
            }
            Err(e) => {
                warn!(term = %term, error = %e, "federal register term failed");
                last_error = Some(e);
            }
        }
    }

    match last_error {
        Some(e) if succeeded == 0 => Err(e),
        _ => Ok(documents),
    }
}

#[async_trait]
impl RuleSource for FederalRegisterSource {
    fn name(&self) -> &str {
        "federal_register"
    }

    fn source_type(&self) -> SourceType {
        SourceType::Api
    }

    #[instrument(skip(self, _profile), fields(source = "federal_register"))]
    async fn search(
        &self,
        query: &str,
        industry: &str,
        _profile: &BusinessProfile,
    ) -> Result<Vec<ComplianceRule>, SourceError> {
        let terms = search_terms(query, industry);
        let documents = fetch_terms(&terms, self.request_delay, |term| async move {
            self.fetch(&term).await
        })
        .await?;

        let mut seen = HashSet::new();
        let mut rules = Vec::new();
        for document in documents {
            if !seen.insert(document.document_number.clone()) {
                continue;
            }
            if let Some(rule) = document_to_rule(&document) {
                rules.push(rule);
            }
        }

        info!(count = rules.len(), "federal register documents mapped");
        Ok(rules)
    }
}

fn clean_text(text: &str) -> String {
    let stripped = HTML_TAG.replace_all(text, " ");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn parse_publication_date(date: Option<&str>) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(date?.trim(), "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

fn cfr_tags(text: &str) -> Vec<String> {
    CFR_CITATION
        .captures_iter(text)
        .map(|c| format!("{} cfr {}", &c[1], &c[2]))
        .collect()
}

fn document_to_rule(document: &Document) -> Option<ComplianceRule> {
    let (status, priority) = match document.document_type.trim().to_lowercase().as_str() {
        "rule" => (RuleStatus::Active, Priority::Medium),
        "proposed rule" => (RuleStatus::Proposed, Priority::Low),
        _ => return None,
    };

    let title = clean_text(&document.title);
    if title.is_empty() || document.document_number.trim().is_empty() {
        return None;
    }
    let description = clean_text(document.summary.as_deref().unwrap_or_default());
    let authority = document
        .agencies
        .iter()
        .filter_map(|a| a.name.as_deref())
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .collect::<Vec<_>>()
        .join("; ");

    let source = SourceReference {
        source_id: format!("federal_register:{}", document.document_number),
        source_type: SourceType::Api,
        source_name: "Federal Register".to_string(),
        source_url: document.html_url.clone(),
        external_id: Some(document.document_number.clone()),
        reliability_score: FEDERAL_REGISTER_RELIABILITY,
        last_updated: parse_publication_date(document.publication_date.as_deref())
            .unwrap_or_else(Utc::now),
        verification_status: VerificationStatus::Verified,
        content_hash: content_fingerprint(&title, &description),
    };

    let mut rule = ComplianceRule::new(
        &format!("fr-{}", document.document_number.trim()),
        &title,
        RuleLevel::Federal,
        "US",
    )
    .with_description(&description)
    .with_authority(&authority)
    .with_priority(priority)
    .with_criteria(ApplicabilityCriteria::default())
    .with_source(source)
    .with_tags(&["federal register"]);

    rule.status = status;
    rule.penalties.enforcement_agency = authority;
    rule.tags.extend(cfr_tags(&description));
    Some(rule)
}
