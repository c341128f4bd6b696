// src/handlers/sales.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, store_access::ensure_store_access, validation::validate_not_negative},
    config::AppState,
    middleware::{auth::AuthenticatedUser, store::StoreContext},
    models::finance::Sale,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalePayload {
    pub product_id: Option<Uuid>,

    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    pub description: String,

    #[validate(custom(function = "validate_not_negative"))]
    pub quantity: Decimal,

    #[validate(custom(function = "validate_not_negative"))]
    pub unit_price: Decimal,

    // Se ausente, calculamos quantidade * preço unitário
    #[validate(custom(function = "validate_not_negative"))]
    pub total_amount: Option<Decimal>,

    pub sold_at: NaiveDate,
}

impl SalePayload {
    fn total(&self) -> Decimal {
        self.total_amount.unwrap_or(self.quantity * self.unit_price)
    }
}

#[utoipa::path(
    get,
    path = "/api/sales",
    tag = "Finance",
    params(("x-store-id" = Uuid, Header, description = "ID da Loja")),
    responses((status = 200, description = "Vendas da loja", body = [Sale])),
    security(("api_jwt" = []))
)]
pub async fn list_sales(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    store: StoreContext,
) -> Result<impl IntoResponse, AppError> {
    ensure_store_access(&app_state, store.0, &user).await?;

    let sales = app_state.finance_repo.list_sales(store.0).await?;
    Ok((StatusCode::OK, Json(sales)))
}

#[utoipa::path(
    post,
    path = "/api/sales",
    tag = "Finance",
    request_body = SalePayload,
    params(("x-store-id" = Uuid, Header, description = "ID da Loja")),
    responses((status = 201, description = "Venda registrada", body = Sale)),
    security(("api_jwt" = []))
)]
pub async fn create_sale(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    store: StoreContext,
    Json(payload): Json<SalePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;
    ensure_store_access(&app_state, store.0, &user).await?;

    let sale = app_state
        .finance_repo
        .create_sale(
            store.0,
            payload.product_id,
            &payload.description,
            payload.quantity,
            payload.unit_price,
            payload.total(),
            payload.sold_at,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(sale)))
}

#[utoipa::path(
    put,
    path = "/api/sales/{sale_id}",
    tag = "Finance",
    request_body = SalePayload,
    params(
        ("sale_id" = Uuid, Path, description = "ID da Venda"),
        ("x-store-id" = Uuid, Header, description = "ID da Loja")
    ),
    responses(
        (status = 200, description = "Venda atualizada", body = Sale),
        (status = 404, description = "Venda não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_sale(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    store: StoreContext,
    Path(sale_id): Path<Uuid>,
    Json(payload): Json<SalePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;
    ensure_store_access(&app_state, store.0, &user).await?;

    let sale = app_state
        .finance_repo
        .update_sale(
            sale_id,
            store.0,
            &payload.description,
            payload.quantity,
            payload.unit_price,
            payload.total(),
            payload.sold_at,
        )
        .await?;

    Ok((StatusCode::OK, Json(sale)))
}

#[utoipa::path(
    delete,
    path = "/api/sales/{sale_id}",
    tag = "Finance",
    params(
        ("sale_id" = Uuid, Path, description = "ID da Venda"),
        ("x-store-id" = Uuid, Header, description = "ID da Loja")
    ),
    responses(
        (status = 204, description = "Venda removida"),
        (status = 404, description = "Venda não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_sale(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    store: StoreContext,
    Path(sale_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    ensure_store_access(&app_state, store.0, &user).await?;

    app_state.finance_repo.delete_sale(sale_id, store.0).await?;
    Ok(StatusCode::NO_CONTENT)
}
