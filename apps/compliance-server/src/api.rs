//! API handlers for the compliance server

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use compliance_engine::{AnalysisMetadata, PersistenceMode};
use serde::Serialize;
use shared_types::{BusinessProfile, ComplianceRule};
use tracing::info;

use crate::error::ServerError;
use crate::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub persistence: PersistenceMode,
}

/// Handler: GET /health
pub async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "compliance-server",
        version: env!("CARGO_PKG_VERSION"),
        persistence: state.analyzer.services().store.mode(),
    })
}

/// Success envelope shared by the data endpoints
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }
}

#[derive(Serialize)]
pub struct AnalysisData {
    pub matching_rules: Vec<ComplianceRule>,
    pub ai_report: String,
    pub metadata: AnalysisMetadata,
}

/// Handler: POST /api/compliance/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    payload: Result<Json<BusinessProfile>, JsonRejection>,
) -> Result<Json<ApiResponse<AnalysisData>>, ServerError> {
    let Json(mut profile) = payload.map_err(|e| ServerError::InvalidRequest(e.body_text()))?;

    if profile.session_id.trim().is_empty() {
        profile.session_id = uuid::Uuid::new_v4().to_string();
    }

    info!(
        "Analyze request: session={}, type={}, industry={}, state={}",
        profile.session_id,
        profile.business_type,
        profile.primary_industry,
        profile.headquarters_state
    );

    let outcome = state.analyzer.analyze(&profile).await?;

    Ok(ApiResponse::ok(AnalysisData {
        matching_rules: outcome.rules,
        ai_report: outcome.report.text,
        metadata: outcome.metadata,
    }))
}

#[derive(Serialize)]
pub struct RuleListData {
    pub rules: Vec<ComplianceRule>,
    pub count: usize,
    pub persistence: PersistenceMode,
}

/// Handler: GET /api/rules
pub async fn handle_list_rules(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<RuleListData>>, ServerError> {
    let store = &state.analyzer.services().store;
    let rules = store.get_all_rules().await?;
    let count = rules.len();

    Ok(ApiResponse::ok(RuleListData {
        rules,
        count,
        persistence: store.mode(),
    }))
}
