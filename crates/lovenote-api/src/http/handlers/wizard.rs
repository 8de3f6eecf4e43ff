//! Submission wizard over HTTP.
//!
//! Each `POST /wizard` opens a wizard on the caller's draft slot (selected
//! by `X-Session-Id`) and parks it in `AppState::wizards` under a fresh id.
//! Every later call locks that one wizard, so a client drives it one step
//! at a time.

use std::sync::Arc;
use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lovenote_core::draft::CONFESSION_DRAFT_KEY;
use lovenote_core::wizard::WizardSnapshot;
use lovenote_types::confession::PublicConfession;
use lovenote_types::wizard::{Notice, Redirect, StepInput};

use crate::http::error::AppError;
use crate::http::extractors::session::ClientSession;
use crate::http::handlers::confession::confession_href;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::{AppState, ConcreteWizard};

/// Wizard state returned by every wizard endpoint.
#[derive(Debug, Serialize)]
pub struct WizardResponse {
    pub wizard_id: Uuid,
    /// Only set on creation when the server minted the session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(flatten)]
    pub snapshot: WizardSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

#[derive(Debug, Serialize)]
pub struct SubmittedResponse {
    pub confession: PublicConfession,
    pub redirect: Redirect,
}

#[derive(Debug, Deserialize)]
pub struct EnhancementBody {
    pub enabled: bool,
}

/// Draft slot for one HTTP session.
pub fn draft_key(session: &str) -> String {
    format!("{CONFESSION_DRAFT_KEY}:{session}")
}

fn parse_id(id: &str) -> Result<Uuid, AppError> {
    id.parse().map_err(|_| AppError::WizardNotFound)
}

fn lookup(
    state: &AppState,
    id: &str,
) -> Result<(Uuid, Arc<tokio::sync::Mutex<ConcreteWizard>>), AppError> {
    let id = parse_id(id)?;
    let mut entry = state.wizards.get_mut(&id).ok_or(AppError::WizardNotFound)?;
    if entry.touched.elapsed() >= state.wizard_idle_timeout() {
        drop(entry);
        state.wizards.remove(&id);
        return Err(AppError::WizardNotFound);
    }
    entry.touched = Instant::now();
    Ok((id, entry.wizard.clone()))
}

fn respond(
    timer: RequestTimer,
    wizard_id: Uuid,
    snapshot: WizardSnapshot,
    notice: Option<Notice>,
) -> Json<ApiResponse<WizardResponse>> {
    let href = format!("/api/v1/wizard/{wizard_id}");
    Json(
        timer
            .success(WizardResponse {
                wizard_id,
                session_id: None,
                snapshot,
                notice,
            })
            .with_link("self", &href)
            .with_link("advance", &format!("{href}/advance"))
            .with_link("submit", &format!("{href}/submit")),
    )
}

/// POST /api/v1/wizard - Open a wizard, resuming the session's saved draft.
pub async fn open_wizard(
    State(state): State<AppState>,
    session: ClientSession,
) -> Json<ApiResponse<WizardResponse>> {
    let timer = RequestTimer::start();

    let (session_id, minted) = match session.0 {
        Some(existing) => (existing, false),
        None => (Uuid::new_v4().to_string(), true),
    };
    let wizard = state.open_wizard(draft_key(&session_id)).await;
    let snapshot = wizard.snapshot();
    let wizard_id = state.register_wizard(wizard);
    tracing::debug!(%wizard_id, open = state.wizards.len(), "wizard opened");

    let mut response = respond(timer, wizard_id, snapshot, None);
    if let Some(data) = response.0.data.as_mut() {
        data.session_id = minted.then_some(session_id);
    }
    response
}

/// GET /api/v1/wizard/{id}
pub async fn get_wizard(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<WizardResponse>>, AppError> {
    let timer = RequestTimer::start();
    let (id, wizard) = lookup(&state, &id)?;
    let wizard = wizard.lock().await;
    Ok(respond(timer, id, wizard.snapshot(), None))
}

/// DELETE /api/v1/wizard/{id} - Forget the wizard; its saved draft stays.
pub async fn close_wizard(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let timer = RequestTimer::start();
    let id = parse_id(&id)?;
    state.wizards.remove(&id).ok_or(AppError::WizardNotFound)?;
    Ok(Json(timer.success(serde_json::json!({ "closed": true }))))
}

/// POST /api/v1/wizard/{id}/advance - Body is the current step's fields,
/// tagged with `"step"`.
pub async fn advance(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<StepInput>,
) -> Result<Json<ApiResponse<WizardResponse>>, AppError> {
    let timer = RequestTimer::start();
    let (id, wizard) = lookup(&state, &id)?;
    let mut wizard = wizard.lock().await;
    let advanced = wizard.advance(input).await?;
    Ok(respond(timer, id, wizard.snapshot(), advanced.notice))
}

/// POST /api/v1/wizard/{id}/retreat
pub async fn retreat(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<WizardResponse>>, AppError> {
    let timer = RequestTimer::start();
    let (id, wizard) = lookup(&state, &id)?;
    let mut wizard = wizard.lock().await;
    wizard.retreat()?;
    Ok(respond(timer, id, wizard.snapshot(), None))
}

/// PUT /api/v1/wizard/{id}/enhancement - Body `{"enabled": bool}`.
pub async fn set_enhancement(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<EnhancementBody>,
) -> Result<Json<ApiResponse<WizardResponse>>, AppError> {
    let timer = RequestTimer::start();
    let (id, wizard) = lookup(&state, &id)?;
    let mut wizard = wizard.lock().await;
    let notice = wizard.set_enhancement(body.enabled).await?;
    Ok(respond(timer, id, wizard.snapshot(), notice))
}

/// POST /api/v1/wizard/{id}/revert-enhancement
pub async fn revert_enhancement(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<WizardResponse>>, AppError> {
    let timer = RequestTimer::start();
    let (id, wizard) = lookup(&state, &id)?;
    let mut wizard = wizard.lock().await;
    wizard.revert_enhancement().await?;
    Ok(respond(timer, id, wizard.snapshot(), None))
}

/// POST /api/v1/wizard/{id}/submit
///
/// The create runs on its own task so a client that hangs up mid-request
/// does not cancel it.
pub async fn submit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<SubmittedResponse>>, AppError> {
    let timer = RequestTimer::start();
    let (id, wizard) = lookup(&state, &id)?;

    let service = state.confession_service.clone();
    let submission = tokio::spawn(async move {
        let mut wizard = wizard.lock().await;
        wizard.submit(service.repository()).await
    })
    .await
    .map_err(|e| AppError::Internal(format!("submission task failed: {e}")))??;

    state.wizards.remove(&id);
    let href = confession_href(&submission.confession.unique_code);

    Ok(Json(
        timer
            .success(SubmittedResponse {
                confession: PublicConfession::from(&submission.confession),
                redirect: submission.redirect,
            })
            .with_link("confession", &href),
    ))
}
