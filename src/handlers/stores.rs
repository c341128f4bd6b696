// src/handlers/stores.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::catalog::Store,
};

// ---
// Payload: criação e edição usam o mesmo "formulário"
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StorePayload {
    #[validate(length(min = 1, message = "O nome da loja é obrigatório."))]
    pub name: String,
    pub marketplace: Option<String>,
    pub description: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/stores",
    tag = "Catalog",
    responses((status = 200, description = "Lojas do usuário", body = [Store])),
    security(("api_jwt" = []))
)]
pub async fn list_stores(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let stores = app_state.catalog_repo.list_stores(user.0.id).await?;
    Ok((StatusCode::OK, Json(stores)))
}

#[utoipa::path(
    post,
    path = "/api/stores",
    tag = "Catalog",
    request_body = StorePayload,
    responses((status = 201, description = "Loja criada", body = Store)),
    security(("api_jwt" = []))
)]
pub async fn create_store(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<StorePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let store = app_state
        .catalog_repo
        .create_store(
            user.0.id,
            &payload.name,
            payload.marketplace.as_deref(),
            payload.description.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(store)))
}

#[utoipa::path(
    put,
    path = "/api/stores/{store_id}",
    tag = "Catalog",
    request_body = StorePayload,
    params(("store_id" = Uuid, Path, description = "ID da Loja")),
    responses(
        (status = 200, description = "Loja atualizada", body = Store),
        (status = 404, description = "Loja não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_store(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(store_id): Path<Uuid>,
    Json(payload): Json<StorePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let store = app_state
        .catalog_repo
        .update_store(
            store_id,
            user.0.id,
            &payload.name,
            payload.marketplace.as_deref(),
            payload.description.as_deref(),
        )
        .await?;

    Ok((StatusCode::OK, Json(store)))
}

#[utoipa::path(
    delete,
    path = "/api/stores/{store_id}",
    tag = "Catalog",
    params(("store_id" = Uuid, Path, description = "ID da Loja")),
    responses(
        (status = 204, description = "Loja removida"),
        (status = 404, description = "Loja não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_store(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(store_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    // A exclusão não cascateia para produtos/vendas: isso fica a cargo
    // do schema do banco, não deste código.
    app_state.catalog_repo.delete_store(store_id, user.0.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
