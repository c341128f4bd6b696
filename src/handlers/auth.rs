use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{
        AuthResponse, FederatedLoginPayload, ForgotPasswordPayload, LoginUserPayload,
        RegisterUserPayload, ResetPasswordPayload,
    },
};

// Handler de registro: cria a conta no provedor de identidade e
// reconcilia o registro local em seguida.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterUserPayload,
    responses(
        (status = 201, description = "Conta criada e usuário reconciliado", body = AuthResponse)
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let principal = app_state
        .identity
        .sign_up(&payload.email, &payload.password, payload.display_name.as_deref())
        .await?;

    let user = app_state.session_service.reconcile_sign_in(&principal).await?;
    let token = app_state.session_service.create_token(user.id)?;

    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

// Handler de login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Sessão aberta", body = AuthResponse),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let principal = app_state
        .identity
        .sign_in(&payload.email, &payload.password)
        .await?;

    let user = app_state.session_service.reconcile_sign_in(&principal).await?;
    let token = app_state.session_service.create_token(user.id)?;

    Ok((StatusCode::OK, Json(AuthResponse { token, user })))
}

// Login federado (Google etc.): troca o token do provedor social.
#[utoipa::path(
    post,
    path = "/api/auth/login/federated",
    tag = "Auth",
    request_body = FederatedLoginPayload,
    responses(
        (status = 200, description = "Sessão aberta via provedor social", body = AuthResponse)
    )
)]
pub async fn login_federated(
    State(app_state): State<AppState>,
    Json(payload): Json<FederatedLoginPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let principal = app_state
        .identity
        .sign_in_federated(&payload.provider_token, &payload.provider_id)
        .await?;

    let user = app_state.session_service.reconcile_sign_in(&principal).await?;
    let token = app_state.session_service.create_token(user.id)?;

    Ok((StatusCode::OK, Json(AuthResponse { token, user })))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogoutPayload {
    // Token do provedor, se o cliente quiser revogá-lo junto
    #[serde(default)]
    pub provider_token: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    request_body = LogoutPayload,
    responses((status = 204, description = "Sessão encerrada")),
    security(("api_jwt" = []))
)]
pub async fn logout(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<LogoutPayload>,
) -> Result<impl IntoResponse, AppError> {
    if let Some(token) = payload.provider_token.as_deref() {
        // A revogação no provedor não pode impedir o sign-out local.
        if let Err(e) = app_state.identity.sign_out(token).await {
            tracing::warn!("Falha ao revogar token no provedor: {}", e);
        }
    }

    app_state.session_service.sign_out(&user.0.email).await;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/auth/password-reset",
    tag = "Auth",
    request_body = ForgotPasswordPayload,
    responses((status = 200, description = "E-mail de redefinição disparado"))
)]
pub async fn forgot_password(
    State(app_state): State<AppState>,
    Json(payload): Json<ForgotPasswordPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    app_state.identity.send_password_reset(&payload.email).await?;

    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Se o e-mail existir, a redefinição foi enviada." })),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/password-reset/confirm",
    tag = "Auth",
    request_body = ResetPasswordPayload,
    responses((status = 200, description = "Senha redefinida"))
)]
pub async fn reset_password(
    State(app_state): State<AppState>,
    Json(payload): Json<ResetPasswordPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    app_state
        .identity
        .confirm_password_reset(&payload.oob_code, &payload.new_password)
        .await?;

    Ok((StatusCode::OK, Json(json!({ "message": "Senha redefinida com sucesso." }))))
}
