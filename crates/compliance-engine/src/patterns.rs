//! Fixed vocabularies used for query planning and criteria matching

/// Compliance topics appended to every general query
pub const COMPLIANCE_TOPICS: &[&str] = &[
    "business licensing",
    "employment law",
    "payroll tax",
    "workplace safety",
    "business requirements",
];

/// Topics for the dedicated industry query
pub const INDUSTRY_TOPICS: &[&str] = &[
    "industry-specific licenses",
    "permits",
    "health and safety inspections",
];

/// Industries whose rules the general query under-covers. A profile in one
/// of these gets a second, industry-dedicated query.
pub const UNDER_COVERED_INDUSTRIES: &[&str] = &[
    "restaurant",
    "food",
    "brewery",
    "healthcare",
    "medical",
    "dental",
    "pharmacy",
    "construction",
    "contractor",
    "alcohol",
    "cannabis",
    "childcare",
    "child care",
    "daycare",
    "transportation",
    "trucking",
    "financial services",
    "banking",
    "lending",
    "firearms",
];

/// Industry labels too generic to be worth a dedicated query
pub const GENERIC_INDUSTRIES: &[&str] = &["general", "other", "n/a", "none", "unknown"];

/// Criteria entries that match every value on their dimension
pub const WILDCARD_VALUES: &[&str] = &["all", "any", "*", "all businesses", "all industries"];

pub fn is_wildcard(value: &str) -> bool {
    let value = value.trim().to_lowercase();
    WILDCARD_VALUES.contains(&value.as_str())
}
