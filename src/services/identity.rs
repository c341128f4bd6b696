// src/services/identity.rs

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::{common::error::AppError, models::auth::IdentityPrincipal};

// Cliente HTTP do provedor de identidade externo. Toda a custódia de
// credenciais (senhas, tokens de reset) fica do lado do provedor; daqui
// saem apenas chamadas REST e volta um IdentityPrincipal.
#[derive(Clone)]
pub struct IdentityClient {
    http: Client,
    base_url: String,
    api_key: String,
    // Chave privilegiada, usada só nas operações administrativas (update de perfil)
    service_key: String,
}

// O formato de conta que o provedor devolve nas operações de sign-in/sign-up.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    photo_url: Option<String>,
    #[serde(default)]
    provider_id: Option<String>,
}

// Corpo de erro do provedor: {"error": {"message": "EMAIL_NOT_FOUND"}}
#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

// Provedores devolvem string vazia no lugar de null para campos de perfil.
fn none_if_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl IdentityClient {
    pub fn new(base_url: String, api_key: String, service_key: String) -> Self {
        Self {
            http: Client::new(),
            base_url,
            api_key,
            service_key,
        }
    }

    // POST genérico para os endpoints "accounts:*" do provedor.
    async fn post_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &serde_json::Value,
        privileged: bool,
    ) -> Result<T, AppError> {
        let url = format!("{}/v1/{}?key={}", self.base_url, endpoint, self.api_key);

        let mut request = self.http.post(&url).json(body);
        if privileged {
            request = request.bearer_auth(&self.service_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::IdentityProvider(format!("falha de rede: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let raw = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ProviderError>(&raw)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| format!("status {}", status));

            // Códigos de credencial viram 401 para o cliente; o resto é 502.
            return Err(match message.as_str() {
                "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS"
                | "USER_DISABLED" => AppError::InvalidCredentials,
                _ => AppError::IdentityProvider(message),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::IdentityProvider(format!("resposta ilegível: {}", e)))
    }

    fn principal_from(&self, account: AccountResponse, fallback_email: Option<&str>, provider: &str) -> Result<IdentityPrincipal, AppError> {
        let email = account
            .email
            .or_else(|| fallback_email.map(|e| e.to_string()))
            .ok_or_else(|| AppError::IdentityProvider("resposta sem e-mail".to_string()))?;

        Ok(IdentityPrincipal {
            id: account.local_id,
            email,
            display_name: none_if_empty(account.display_name),
            photo_url: none_if_empty(account.photo_url),
            provider: account.provider_id.unwrap_or_else(|| provider.to_string()),
        })
    }

    /// Cria a conta no provedor e devolve o principal autenticado.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<IdentityPrincipal, AppError> {
        let account: AccountResponse = self
            .post_json(
                "accounts:signUp",
                &json!({
                    "email": email,
                    "password": password,
                    "displayName": display_name,
                    "returnSecureToken": true,
                }),
                false,
            )
            .await?;

        self.principal_from(account, Some(email), "password")
    }

    /// Sign-in com e-mail e senha.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<IdentityPrincipal, AppError> {
        let account: AccountResponse = self
            .post_json(
                "accounts:signInWithPassword",
                &json!({
                    "email": email,
                    "password": password,
                    "returnSecureToken": true,
                }),
                false,
            )
            .await?;

        self.principal_from(account, Some(email), "password")
    }

    /// Troca o token de um provedor social (Google etc.) por um principal.
    pub async fn sign_in_federated(
        &self,
        provider_token: &str,
        provider_id: &str,
    ) -> Result<IdentityPrincipal, AppError> {
        let account: AccountResponse = self
            .post_json(
                "accounts:signInWithIdp",
                &json!({
                    "postBody": format!("id_token={}&providerId={}", provider_token, provider_id),
                    "requestUri": "http://localhost",
                    "returnSecureToken": true,
                }),
                false,
            )
            .await?;

        self.principal_from(account, None, provider_id)
    }

    /// Revoga o token do provedor no sign-out.
    pub async fn sign_out(&self, provider_token: &str) -> Result<(), AppError> {
        let _: serde_json::Value = self
            .post_json(
                "accounts:revokeToken",
                &json!({ "token": provider_token }),
                false,
            )
            .await?;
        Ok(())
    }

    /// Dispara o e-mail de redefinição de senha.
    pub async fn send_password_reset(&self, email: &str) -> Result<(), AppError> {
        let _: serde_json::Value = self
            .post_json(
                "accounts:sendOobCode",
                &json!({ "requestType": "PASSWORD_RESET", "email": email }),
                false,
            )
            .await?;
        Ok(())
    }

    /// Confirma a redefinição com o código recebido por e-mail.
    pub async fn confirm_password_reset(
        &self,
        oob_code: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let _: serde_json::Value = self
            .post_json(
                "accounts:resetPassword",
                &json!({ "oobCode": oob_code, "newPassword": new_password }),
                false,
            )
            .await?;
        Ok(())
    }

    /// Empurra nome/avatar para o provedor (operação privilegiada).
    pub async fn update_profile(
        &self,
        principal_email: &str,
        display_name: Option<&str>,
        photo_url: Option<&str>,
    ) -> Result<(), AppError> {
        let _: serde_json::Value = self
            .post_json(
                "accounts:update",
                &json!({
                    "email": principal_email,
                    "displayName": display_name,
                    "photoUrl": photo_url,
                }),
                true,
            )
            .await?;
        Ok(())
    }
}
