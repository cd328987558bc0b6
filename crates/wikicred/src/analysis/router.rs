use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{AnalysisError, AnalyzeRequest, ReliabilityService};
use crate::error::AppError;
use crate::resolver::ResolveOptions;
use crate::scoring::{Policy, PolicyOverrides, ScoreResult, StrictnessProfile};
use crate::signals::Signals;
use crate::wiki::WikiApi;

/// Router builder exposing the analysis endpoints.
pub fn analysis_router<A>(service: Arc<ReliabilityService<A>>) -> Router
where
    A: WikiApi + 'static,
{
    Router::new()
        .route("/api/analyze", post(analyze_handler::<A>))
        .route("/api/resolve", post(resolve_handler::<A>))
        .route("/api/score", post(score_handler::<A>))
        .route("/api/policies", get(policies_handler))
        .with_state(service)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ResolveRequest {
    title: String,
    #[serde(default)]
    lang: Option<String>,
    #[serde(default)]
    with_alternatives: Option<bool>,
    #[serde(default)]
    limit: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ScoreRequest {
    signals: Signals,
    #[serde(default)]
    policy: Option<PolicyOverrides>,
}

#[derive(Serialize)]
struct ScoreView {
    #[serde(flatten)]
    outcome: ScoreResult,
    policy: Policy,
}

#[derive(Serialize)]
pub(crate) struct ProfileView {
    name: &'static str,
    policy: Policy,
}

pub(crate) async fn analyze_handler<A>(
    State(service): State<Arc<ReliabilityService<A>>>,
    Json(request): Json<AnalyzeRequest>,
) -> Response
where
    A: WikiApi + 'static,
{
    match service.analyze(request).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn resolve_handler<A>(
    State(service): State<Arc<ReliabilityService<A>>>,
    Json(request): Json<ResolveRequest>,
) -> Response
where
    A: WikiApi + 'static,
{
    let lang = match service.language(request.lang.as_deref()) {
        Ok(lang) => lang,
        Err(error) => return AppError::from(error).into_response(),
    };

    let defaults = service.default_resolve_options();
    let options = ResolveOptions {
        with_alternatives: request
            .with_alternatives
            .unwrap_or(defaults.with_alternatives),
        limit: request.limit.unwrap_or(defaults.limit),
    };

    match service.resolve(&request.title, &lang, options).await {
        Ok(result) => {
            let mut payload = serde_json::to_value(&result).unwrap_or_else(|_| json!({}));
            if let Some(body) = payload.as_object_mut() {
                body.insert("lang".to_string(), json!(lang));
            }
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn score_handler<A>(
    State(service): State<Arc<ReliabilityService<A>>>,
    Json(request): Json<ScoreRequest>,
) -> Response
where
    A: WikiApi + 'static,
{
    if let Err(error) = request.signals.validate() {
        return AppError::from(AnalysisError::from(error)).into_response();
    }

    let policy = match request.policy.unwrap_or_default().build() {
        Ok(policy) => policy,
        Err(error) => return AppError::from(AnalysisError::from(error)).into_response(),
    };

    let outcome = service.score(&request.signals, &policy);
    (StatusCode::OK, Json(ScoreView { outcome, policy })).into_response()
}

pub(crate) async fn policies_handler() -> Json<Vec<ProfileView>> {
    let profiles = StrictnessProfile::ALL
        .iter()
        .map(|profile| ProfileView {
            name: profile.label(),
            policy: profile.policy(),
        })
        .collect();
    Json(profiles)
}
