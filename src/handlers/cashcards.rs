use axum::{
    extract::{Extension, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::ApiError;
use crate::middleware::Principal;
use crate::state::AppState;
use crate::store::{CashCard, PageRequest};

/// Client-supplied fields for create and update. The id and owner always
/// come from the server side, so the body carries the amount alone; any
/// extra fields are ignored.
#[derive(Debug, Deserialize)]
pub struct CashCardRequest {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    page: Option<u32>,
    size: Option<u32>,
    sort: Option<String>,
}

/// GET /cashcards/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
) -> Result<Json<CashCard>, ApiError> {
    let card = state
        .store
        .find_by_id_and_owner(id, &principal.username)
        .await?
        .ok_or_else(ApiError::record_not_found)?;

    Ok(Json(card))
}

/// POST /cashcards
pub async fn create(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<CashCardRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let saved = state
        .store
        .save(CashCard::new(body.amount, &principal.username))
        .await?;

    let id = saved
        .id
        .ok_or_else(|| ApiError::internal_server_error("Saved record has no id"))?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/cashcards/{}", id))],
    ))
}

/// GET /cashcards
pub async fn list(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<CashCard>>, ApiError> {
    let page = PageRequest::resolve(query.page, query.size, query.sort.as_deref())?;

    let cards = state
        .store
        .find_by_owner(&principal.username, &page)
        .await?;

    Ok(Json(cards))
}

/// PUT /cashcards/:id
pub async fn update_by_id(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
    Json(body): Json<CashCardRequest>,
) -> Result<StatusCode, ApiError> {
    let existing = state
        .store
        .find_by_id_and_owner(id, &principal.username)
        .await?
        .ok_or_else(ApiError::record_not_found)?;

    // Keep the stored id and owner; only the amount is client-writable
    let updated = CashCard {
        id: existing.id,
        amount: body.amount,
        owner: existing.owner,
    };
    state.store.save(updated).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /cashcards/:id
pub async fn delete_by_id(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state
        .store
        .find_by_id_and_owner(id, &principal.username)
        .await?
        .ok_or_else(ApiError::record_not_found)?;

    state.store.delete_by_id(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
