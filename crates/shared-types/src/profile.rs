//! Business profile submitted for an applicability analysis

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of a business at the time an analysis is requested.
///
/// A profile is never mutated once submitted; a new request carries a new
/// snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessProfile {
    #[serde(default)]
    pub business_name: String,
    /// Legal form, e.g. "LLC", "Corporation", "Sole Proprietorship"
    pub business_type: String,
    pub primary_industry: String,
    /// Optional industry classification code (NAICS, SIC)
    #[serde(default)]
    pub industry_code: Option<String>,
    /// Full state name or two-letter code
    pub headquarters_state: String,
    #[serde(default)]
    pub employee_count: u32,
    #[serde(default)]
    pub annual_revenue: f64,
    #[serde(default)]
    pub business_description: String,
    #[serde(default)]
    pub session_id: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl BusinessProfile {
    pub fn new(business_type: &str, primary_industry: &str, headquarters_state: &str) -> Self {
        let now = Utc::now();
        Self {
            business_name: String::new(),
            business_type: business_type.to_string(),
            primary_industry: primary_industry.to_string(),
            industry_code: None,
            headquarters_state: headquarters_state.to_string(),
            employee_count: 0,
            annual_revenue: 0.0,
            business_description: String::new(),
            session_id: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.business_name = name.to_string();
        self
    }

    pub fn with_employees(mut self, employee_count: u32) -> Self {
        self.employee_count = employee_count;
        self
    }

    pub fn with_revenue(mut self, annual_revenue: f64) -> Self {
        self.annual_revenue = annual_revenue;
        self
    }

    pub fn with_industry_code(mut self, code: &str) -> Self {
        self.industry_code = Some(code.to_string());
        self
    }

    /// Name used in reports; falls back to a description of the business
    pub fn display_name(&self) -> String {
        if self.business_name.trim().is_empty() {
            format!("{} {}", self.primary_industry, self.business_type)
        } else {
            self.business_name.trim().to_string()
        }
    }
}
