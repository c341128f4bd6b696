// src/models/auth.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// ---
// 1. O principal autenticado (visão do provedor de identidade)
// ---
// Somente leitura do nosso lado: o provedor é dono destes campos.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityPrincipal {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub provider: String,
}

// ---
// 2. O usuário do diretório local (tabela 'users')
// ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TenantUser {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub provider: String,
    // Flag de aprovação: nasce FALSE e nada aqui bloqueia acesso por ela.
    pub status: bool,
    pub birth_date: Option<NaiveDate>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Linha nova, montada pela reconciliação antes do INSERT.
#[derive(Debug, Clone)]
pub struct NewTenantUser {
    pub email: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub provider: String,
    pub status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Patch parcial: campo None = "não mexa". A reconciliação nunca
// sobrescreve um campo preenchido com um valor vazio do provedor.
#[derive(Debug, Clone)]
pub struct TenantUserPatch {
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub provider: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub phone: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl TenantUserPatch {
    /// Patch vazio não gera nenhuma chamada de escrita.
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.avatar_url.is_none()
            && self.provider.is_none()
            && self.birth_date.is_none()
            && self.phone.is_none()
    }
}

// ---
// 3. Estado da sessão por principal
// ---
// União explícita em vez de um "usuário atual" anulável pendurado num
// singleton. Failed guarda o último erro de sincronização observável.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum SessionState {
    Unresolved,
    Resolving,
    Resolved { user: TenantUser },
    Failed { error: String },
}

// ---
// 4. Payloads da API de autenticação
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterUserPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
    // Nome de exibição é opcional: sem ele, usamos a parte local do e-mail.
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

// Login federado: o frontend troca o token do provedor social aqui.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FederatedLoginPayload {
    #[validate(length(min = 1, message = "O token do provedor é obrigatório."))]
    pub provider_token: String,
    #[validate(length(min = 1, message = "O identificador do provedor é obrigatório."))]
    pub provider_id: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ForgotPasswordPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordPayload {
    #[validate(length(min = 1, message = "O código de confirmação é obrigatório."))]
    pub oob_code: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub new_password: String,
}

// Atualização de perfil: só os campos permitidos.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfilePayload {
    #[validate(length(min = 1, message = "O nome não pode ficar vazio."))]
    pub full_name: Option<String>,
    #[validate(url(message = "A URL do avatar é inválida."))]
    pub avatar_url: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub phone: Option<String>,
}

// Resposta de autenticação com o token e o usuário reconciliado
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: TenantUser,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registro_exige_email_valido_e_senha_minima() {
        let payload = RegisterUserPayload {
            email: "nao-e-um-email".to_string(),
            password: "123".to_string(),
            display_name: None,
        };

        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn patch_sem_campos_e_vazio() {
        let patch = TenantUserPatch {
            full_name: None,
            avatar_url: None,
            provider: None,
            birth_date: None,
            phone: None,
            updated_at: Utc::now(),
        };
        assert!(patch.is_empty());

        let patch = TenantUserPatch {
            provider: Some("google.com".to_string()),
            ..patch
        };
        assert!(!patch.is_empty());
    }
}
