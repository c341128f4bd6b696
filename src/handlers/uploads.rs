// src/handlers/uploads.rs

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    common::{error::AppError, store_access::ensure_store_access},
    config::AppState,
    middleware::{auth::AuthenticatedUser, store::StoreContext},
};

// Recebe a planilha de produtos e repassa para o webhook de sincronização
// do marketplace. O arquivo não é interpretado aqui.
#[utoipa::path(
    post,
    path = "/api/uploads/products",
    tag = "Catalog",
    params(("x-store-id" = Uuid, Header, description = "ID da Loja")),
    responses(
        (status = 200, description = "Planilha encaminhada"),
        (status = 400, description = "Arquivo ausente"),
        (status = 502, description = "Webhook recusou o arquivo")
    ),
    security(("api_jwt" = []))
)]
pub async fn upload_products_sheet(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    store: StoreContext,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    ensure_store_access(&app_state, store.0, &user).await?;

    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::UploadFailed(format!("formulário ilegível: {}", e)))?
    {
        if field.name() == Some("file") {
            let name = field
                .file_name()
                .unwrap_or("planilha.xlsx")
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::UploadFailed(format!("leitura do arquivo falhou: {}", e)))?;
            file = Some((name, data.to_vec()));
        }
    }

    let (file_name, content) = file.ok_or(AppError::UploadMissingFile)?;

    app_state
        .upload_service
        .forward_spreadsheet(&file_name, content, store.0, user.0.id)
        .await?;

    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Planilha enviada para processamento." })),
    ))
}
