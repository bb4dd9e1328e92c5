//! Shared data model for compliance analysis: business profiles, compliance
//! rules and the content fingerprints used to deduplicate them.

pub mod fingerprint;
pub mod profile;
pub mod rule;

pub use fingerprint::{content_fingerprint, normalize_hash, normalize_text, stable_id};
pub use profile::BusinessProfile;
pub use rule::{
    ApplicabilityCriteria, ComplianceRule, ComplianceStep, Deadlines, EmployeeRange, Penalties,
    Priority, RequiredForm, RuleLevel, RuleStatus, SourceReference, SourceType,
    VerificationStatus, MAX_RELIABILITY, MIN_RELIABILITY,
};
