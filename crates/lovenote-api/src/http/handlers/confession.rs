//! Public confession handlers: submit, feed, search, retrieval, reactions.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use lovenote_core::service::confession::{ConfessionView, SearchCriteria};
use lovenote_types::confession::{PublicConfession, ReactionCounts, ReactionType};
use lovenote_types::draft::SubmissionFields;
use lovenote_types::error::ConfessionError;
use lovenote_types::music::MusicEmbed;

use crate::http::error::AppError;
use crate::http::extractors::query::FeedQuery;
use crate::http::extractors::session::ClientSession;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

/// A confession page as served to the public.
#[derive(Debug, Serialize)]
pub struct ConfessionPage {
    pub confession: PublicConfession,
    pub reactions: ReactionCounts,
    pub my_reactions: Vec<ReactionType>,
    pub music: Option<MusicEmbed>,
}

impl From<ConfessionView> for ConfessionPage {
    fn from(view: ConfessionView) -> Self {
        Self {
            confession: PublicConfession::from(&view.confession),
            reactions: view.reactions,
            my_reactions: view.my_reactions,
            music: view.music,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ReactBody {
    pub reaction_type: String,
}

pub(crate) fn confession_href(code: &str) -> String {
    format!("/api/v1/confessions/{code}")
}

/// POST /api/v1/confessions - One-shot submission of a complete draft.
pub async fn submit_confession(
    State(state): State<AppState>,
    Json(body): Json<SubmissionFields>,
) -> Result<Json<ApiResponse<PublicConfession>>, AppError> {
    let timer = RequestTimer::start();

    let confession = state.confession_service.submit(body).await?;
    let href = confession_href(&confession.unique_code);

    Ok(Json(
        timer
            .success(PublicConfession::from(&confession))
            .with_link("self", &href)
            .with_link("reactions", &format!("{href}/reactions")),
    ))
}

/// GET /api/v1/confessions - Public feed, newest first.
pub async fn list_feed(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<ApiResponse<Vec<PublicConfession>>>, AppError> {
    let timer = RequestTimer::start();

    let confessions = state
        .confession_service
        .feed(query.limit, query.offset)
        .await?;
    let data = confessions.iter().map(PublicConfession::from).collect();

    Ok(Json(
        timer
            .success(data)
            .with_link("self", "/api/v1/confessions")
            .with_link("search", "/api/v1/confessions/search"),
    ))
}

/// GET /api/v1/confessions/search - Detail search over approved confessions.
pub async fn search_confessions(
    State(state): State<AppState>,
    Query(criteria): Query<SearchCriteria>,
) -> Result<Json<ApiResponse<Vec<PublicConfession>>>, AppError> {
    let timer = RequestTimer::start();

    let confessions = state.confession_service.search(&criteria).await?;
    let data = confessions.iter().map(PublicConfession::from).collect();

    Ok(Json(timer.success(data)))
}

/// GET /api/v1/confessions/{code} - Retrieve by code; counts a view.
pub async fn get_confession(
    State(state): State<AppState>,
    session: ClientSession,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<ConfessionPage>>, AppError> {
    let timer = RequestTimer::start();

    let view = state
        .confession_service
        .find_by_code(&code, session.as_deref())
        .await?
        .ok_or(ConfessionError::NotFound)?;
    let href = confession_href(&view.confession.unique_code);

    Ok(Json(
        timer
            .success(ConfessionPage::from(view))
            .with_link("self", &href)
            .with_link("reactions", &format!("{href}/reactions")),
    ))
}

/// POST /api/v1/confessions/{code}/reactions - React once per type per session.
pub async fn add_reaction(
    State(state): State<AppState>,
    session: ClientSession,
    Path(code): Path<String>,
    Json(body): Json<ReactBody>,
) -> Result<Json<ApiResponse<ReactionCounts>>, AppError> {
    let timer = RequestTimer::start();

    let reaction_type = body
        .reaction_type
        .parse::<ReactionType>()
        .map_err(AppError::Validation)?;
    let session = session.0.ok_or_else(|| {
        AppError::Validation("Missing X-Session-Id header".to_string())
    })?;

    let counts = state
        .confession_service
        .react(&code, reaction_type, &session)
        .await?;

    Ok(Json(
        timer
            .success(counts)
            .with_link("confession", &confession_href(&code.trim().to_uppercase())),
    ))
}
