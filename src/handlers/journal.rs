// src/handlers/journal.rs

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
    common::{error::AppError, validation::validate_not_negative},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::finance::{JournalEntry, JournalEntryKind},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntryPayload {
    pub kind: JournalEntryKind,

    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    pub description: String,

    #[validate(custom(function = "validate_not_negative"))]
    pub amount: Decimal,

    pub entry_date: NaiveDate,
}

#[utoipa::path(
    get,
    path = "/api/journal",
    tag = "Finance",
    responses((status = 200, description = "Lançamentos do usuário", body = [JournalEntry])),
    security(("api_jwt" = []))
)]
pub async fn list_journal_entries(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let entries = app_state.finance_repo.list_journal_entries(user.0.id).await?;
    Ok((StatusCode::OK, Json(entries)))
}

#[utoipa::path(
    post,
    path = "/api/journal",
    tag = "Finance",
    request_body = JournalEntryPayload,
    responses((status = 201, description = "Lançamento registrado", body = JournalEntry)),
    security(("api_jwt" = []))
)]
pub async fn create_journal_entry(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<JournalEntryPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let entry = app_state
        .finance_repo
        .create_journal_entry(
            user.0.id,
            payload.kind,
            &payload.description,
            payload.amount,
            payload.entry_date,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(entry)))
}

#[utoipa::path(
    put,
    path = "/api/journal/{entry_id}",
    tag = "Finance",
    request_body = JournalEntryPayload,
    params(("entry_id" = Uuid, Path, description = "ID do Lançamento")),
    responses(
        (status = 200, description = "Lançamento atualizado", body = JournalEntry),
        (status = 404, description = "Lançamento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_journal_entry(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(entry_id): Path<Uuid>,
    Json(payload): Json<JournalEntryPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let entry = app_state
        .finance_repo
        .update_journal_entry(
            entry_id,
            user.0.id,
            payload.kind,
            &payload.description,
            payload.amount,
            payload.entry_date,
        )
        .await?;

    Ok((StatusCode::OK, Json(entry)))
}

#[utoipa::path(
    delete,
    path = "/api/journal/{entry_id}",
    tag = "Finance",
    params(("entry_id" = Uuid, Path, description = "ID do Lançamento")),
    responses(
        (status = 204, description = "Lançamento removido"),
        (status = 404, description = "Lançamento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_journal_entry(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(entry_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.finance_repo.delete_journal_entry(entry_id, user.0.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
