// src/handlers/products.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, store_access::ensure_store_access, validation::validate_not_negative},
    config::AppState,
    middleware::{auth::AuthenticatedUser, store::StoreContext},
    models::catalog::Product,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub warehouse_id: Option<Uuid>,

    #[validate(length(min = 1, message = "O SKU é obrigatório."))]
    pub sku: String,

    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    #[validate(custom(function = "validate_not_negative"))]
    pub price: Decimal,

    // Se o JSON não tiver esse campo, assume 0
    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub stock_quantity: Decimal,

    // Código do anúncio no marketplace (opcional, vem da sincronização)
    pub listing_code: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Catalog",
    params(("x-store-id" = Uuid, Header, description = "ID da Loja")),
    responses((status = 200, description = "Produtos da loja", body = [Product])),
    security(("api_jwt" = []))
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    store: StoreContext,
) -> Result<impl IntoResponse, AppError> {
    ensure_store_access(&app_state, store.0, &user).await?;

    let products = app_state.catalog_repo.list_products(store.0).await?;
    Ok((StatusCode::OK, Json(products)))
}

#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Catalog",
    request_body = ProductPayload,
    params(("x-store-id" = Uuid, Header, description = "ID da Loja")),
    responses(
        (status = 201, description = "Produto criado", body = Product),
        (status = 409, description = "SKU duplicado na loja")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    store: StoreContext,
    Json(payload): Json<ProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;
    ensure_store_access(&app_state, store.0, &user).await?;

    let product = app_state
        .catalog_repo
        .create_product(
            store.0,
            payload.warehouse_id,
            &payload.sku,
            &payload.name,
            payload.price,
            payload.stock_quantity,
            payload.listing_code.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    put,
    path = "/api/products/{product_id}",
    tag = "Catalog",
    request_body = ProductPayload,
    params(
        ("product_id" = Uuid, Path, description = "ID do Produto"),
        ("x-store-id" = Uuid, Header, description = "ID da Loja")
    ),
    responses(
        (status = 200, description = "Produto atualizado", body = Product),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    store: StoreContext,
    Path(product_id): Path<Uuid>,
    Json(payload): Json<ProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;
    ensure_store_access(&app_state, store.0, &user).await?;

    let product = app_state
        .catalog_repo
        .update_product(
            product_id,
            store.0,
            payload.warehouse_id,
            &payload.sku,
            &payload.name,
            payload.price,
            payload.stock_quantity,
            payload.listing_code.as_deref(),
        )
        .await?;

    Ok((StatusCode::OK, Json(product)))
}

#[utoipa::path(
    delete,
    path = "/api/products/{product_id}",
    tag = "Catalog",
    params(
        ("product_id" = Uuid, Path, description = "ID do Produto"),
        ("x-store-id" = Uuid, Header, description = "ID da Loja")
    ),
    responses(
        (status = 204, description = "Produto removido"),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    store: StoreContext,
    Path(product_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    ensure_store_access(&app_state, store.0, &user).await?;

    app_state.catalog_repo.delete_product(product_id, store.0).await?;
    Ok(StatusCode::NO_CONTENT)
}
