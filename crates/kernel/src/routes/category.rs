//! Category endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use uuid::Uuid;

use crate::error::AppResult;
use crate::listing::PaginatedList;
use crate::models::{Category, NameOrdering};
use crate::routes::helpers::{ListQuery, ResourceInput};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/categories", get(list).post(create))
        .route(
            "/v1/categories/{id}",
            get(get_one).put(edit).delete(remove),
        )
}

async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery<NameOrdering>>,
) -> AppResult<Json<PaginatedList<Category>>> {
    let params = query.into_params()?;
    Ok(Json(state.categories().get_list(params).await?))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Category>> {
    Ok(Json(state.categories().get(id).await?))
}

async fn create(
    State(state): State<AppState>,
    Json(input): Json<ResourceInput>,
) -> AppResult<(StatusCode, Json<Category>)> {
    let created = state.categories().create(&input.name).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn edit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<ResourceInput>,
) -> AppResult<Json<Category>> {
    Ok(Json(state.categories().edit(id, &input.name).await?))
}

async fn remove(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<StatusCode> {
    state.categories().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
