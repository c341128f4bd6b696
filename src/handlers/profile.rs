use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{SessionState, TenantUser, UpdateProfilePayload},
};

// Handler da rota protegida /me
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    responses((status = 200, description = "Usuário da sessão", body = TenantUser)),
    security(("api_jwt" = []))
)]
pub async fn get_me(AuthenticatedUser(user): AuthenticatedUser) -> Json<TenantUser> {
    Json(user)
}

// Estado da sessão (a "assinatura de auth-state" em forma de consulta)
#[utoipa::path(
    get,
    path = "/api/users/session",
    tag = "Users",
    responses((status = 200, description = "Estado da sessão do usuário", body = SessionState)),
    security(("api_jwt" = []))
)]
pub async fn get_session(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Json<SessionState> {
    Json(app_state.session_service.session_state(&user.0.email).await)
}

#[utoipa::path(
    patch,
    path = "/api/users/me",
    tag = "Users",
    request_body = UpdateProfilePayload,
    responses(
        (status = 200, description = "Perfil atualizado", body = TenantUser),
        (status = 401, description = "Nenhuma sessão ativa")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_me(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<UpdateProfilePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let updated = app_state
        .session_service
        .update_profile(&user.0.email, &payload)
        .await?;

    // Espelha nome/avatar no provedor; falha lá não desfaz a atualização local.
    if payload.full_name.is_some() || payload.avatar_url.is_some() {
        if let Err(e) = app_state
            .identity
            .update_profile(
                &updated.email,
                payload.full_name.as_deref(),
                payload.avatar_url.as_deref(),
            )
            .await
        {
            tracing::warn!("Falha ao espelhar perfil no provedor: {}", e);
        }
    }

    Ok((StatusCode::OK, Json(updated)))
}
