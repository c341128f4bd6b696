// src/handlers/warehouses.rs

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
    models::catalog::Warehouse,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WarehousePayload {
    #[validate(length(min = 1, message = "O nome do armazém é obrigatório."))]
    pub name: String,
    pub location: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/warehouses",
    tag = "Catalog",
    responses((status = 200, description = "Armazéns do usuário", body = [Warehouse])),
    security(("api_jwt" = []))
)]
pub async fn list_warehouses(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let warehouses = app_state.catalog_repo.list_warehouses(user.0.id).await?;
    Ok((StatusCode::OK, Json(warehouses)))
}

#[utoipa::path(
    post,
    path = "/api/warehouses",
    tag = "Catalog",
    request_body = WarehousePayload,
    responses((status = 201, description = "Armazém criado", body = Warehouse)),
    security(("api_jwt" = []))
)]
pub async fn create_warehouse(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<WarehousePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let warehouse = app_state
        .catalog_repo
        .create_warehouse(user.0.id, &payload.name, payload.location.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(warehouse)))
}

#[utoipa::path(
    put,
    path = "/api/warehouses/{warehouse_id}",
    tag = "Catalog",
    request_body = WarehousePayload,
    params(("warehouse_id" = Uuid, Path, description = "ID do Armazém")),
    responses(
        (status = 200, description = "Armazém atualizado", body = Warehouse),
        (status = 404, description = "Armazém não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_warehouse(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(warehouse_id): Path<Uuid>,
    Json(payload): Json<WarehousePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let warehouse = app_state
        .catalog_repo
        .update_warehouse(warehouse_id, user.0.id, &payload.name, payload.location.as_deref())
        .await?;

    Ok((StatusCode::OK, Json(warehouse)))
}

#[utoipa::path(
    delete,
    path = "/api/warehouses/{warehouse_id}",
    tag = "Catalog",
    params(("warehouse_id" = Uuid, Path, description = "ID do Armazém")),
    responses(
        (status = 204, description = "Armazém removido"),
        (status = 404, description = "Armazém não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_warehouse(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(warehouse_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.catalog_repo.delete_warehouse(warehouse_id, user.0.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
