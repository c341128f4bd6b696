// src/handlers/withdrawals.rs

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
    models::finance::Withdrawal,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalPayload {
    #[validate(custom(function = "validate_not_negative"))]
    pub amount: Decimal,

    pub description: Option<String>,

    pub withdrawn_at: NaiveDate,
}

#[utoipa::path(
    get,
    path = "/api/withdrawals",
    tag = "Finance",
    params(("x-store-id" = Uuid, Header, description = "ID da Loja")),
    responses((status = 200, description = "Retiradas da loja", body = [Withdrawal])),
    security(("api_jwt" = []))
)]
pub async fn list_withdrawals(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    store: StoreContext,
) -> Result<impl IntoResponse, AppError> {
    ensure_store_access(&app_state, store.0, &user).await?;

    let withdrawals = app_state.finance_repo.list_withdrawals(store.0).await?;
    Ok((StatusCode::OK, Json(withdrawals)))
}

#[utoipa::path(
    post,
    path = "/api/withdrawals",
    tag = "Finance",
    request_body = WithdrawalPayload,
    params(("x-store-id" = Uuid, Header, description = "ID da Loja")),
    responses((status = 201, description = "Retirada registrada", body = Withdrawal)),
    security(("api_jwt" = []))
)]
pub async fn create_withdrawal(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    store: StoreContext,
    Json(payload): Json<WithdrawalPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;
    ensure_store_access(&app_state, store.0, &user).await?;

    let withdrawal = app_state
        .finance_repo
        .create_withdrawal(
            store.0,
            payload.amount,
            payload.description.as_deref(),
            payload.withdrawn_at,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(withdrawal)))
}

#[utoipa::path(
    put,
    path = "/api/withdrawals/{withdrawal_id}",
    tag = "Finance",
    request_body = WithdrawalPayload,
    params(
        ("withdrawal_id" = Uuid, Path, description = "ID da Retirada"),
        ("x-store-id" = Uuid, Header, description = "ID da Loja")
    ),
    responses(
        (status = 200, description = "Retirada atualizada", body = Withdrawal),
        (status = 404, description = "Retirada não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_withdrawal(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    store: StoreContext,
    Path(withdrawal_id): Path<Uuid>,
    Json(payload): Json<WithdrawalPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;
    ensure_store_access(&app_state, store.0, &user).await?;

    let withdrawal = app_state
        .finance_repo
        .update_withdrawal(
            withdrawal_id,
            store.0,
            payload.amount,
            payload.description.as_deref(),
            payload.withdrawn_at,
        )
        .await?;

    Ok((StatusCode::OK, Json(withdrawal)))
}

#[utoipa::path(
    delete,
    path = "/api/withdrawals/{withdrawal_id}",
    tag = "Finance",
    params(
        ("withdrawal_id" = Uuid, Path, description = "ID da Retirada"),
        ("x-store-id" = Uuid, Header, description = "ID da Loja")
    ),
    responses(
        (status = 204, description = "Retirada removida"),
        (status = 404, description = "Retirada não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_withdrawal(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    store: StoreContext,
    Path(withdrawal_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    ensure_store_access(&app_state, store.0, &user).await?;

    app_state.finance_repo.delete_withdrawal(withdrawal_id, store.0).await?;
    Ok(StatusCode::NO_CONTENT)
}
