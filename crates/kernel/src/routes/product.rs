//! Product endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use uuid::Uuid;

use crate::error::AppResult;
use crate::listing::PaginatedList;
use crate::models::{NameOrdering, Product};
use crate::routes::helpers::{ListQuery, ResourceInput};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/products", get(list).post(create))
        .route("/v1/products/{id}", get(get_one).put(edit).delete(remove))
}

async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery<NameOrdering>>,
) -> AppResult<Json<PaginatedList<Product>>> {
    let params = query.into_params()?;
    Ok(Json(state.products().get_list(params).await?))
}

async fn get_one(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Json<Product>> {
    Ok(Json(state.products().get(id).await?))
}

async fn create(
    State(state): State<AppState>,
    Json(input): Json<ResourceInput>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let created = state.products().create(&input.name).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn edit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<ResourceInput>,
) -> AppResult<Json<Product>> {
    Ok(Json(state.products().edit(id, &input.name).await?))
}

async fn remove(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<StatusCode> {
    state.products().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
