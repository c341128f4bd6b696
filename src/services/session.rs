// src/services/session.rs

use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserDirectory,
    models::auth::{
        Claims, IdentityPrincipal, NewTenantUser, SessionState, TenantUser, TenantUserPatch,
        UpdateProfilePayload,
    },
};

// O serviço de sessão: reconcilia o principal do provedor de identidade
// com o registro local e mantém o estado de sessão por e-mail.
//
// O estado é uma união explícita (Unresolved/Resolving/Resolved/Failed)
// em vez de um "usuário atual" anulável: um erro de sincronização fica
// observável em Failed, nunca é descartado em silêncio.
#[derive(Clone)]
pub struct SessionService {
    directory: Arc<dyn UserDirectory>,
    sessions: Arc<RwLock<HashMap<String, SessionState>>>,
    jwt_secret: String,
}

impl SessionService {
    pub fn new(directory: Arc<dyn UserDirectory>, jwt_secret: String) -> Self {
        Self {
            directory,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            jwt_secret,
        }
    }

    // ---
    // Reconciliação (roda uma vez por evento de sign-in, não por request)
    // ---

    /// Sincroniza o registro local com o principal recém-autenticado.
    ///
    /// No máximo uma leitura e uma escrita por invocação:
    /// - sem linha para o e-mail: cria (status = false, nome com fallback);
    /// - linha existente: aplica só os campos que faltam localmente;
    /// - nada faltando: nenhuma escrita.
    ///
    /// Falha de leitura propaga como LookupError, falha de escrita como
    /// PersistenceError; nos dois casos a sessão fica em Failed e o
    /// usuário ativo NÃO fica definido.
    pub async fn reconcile_sign_in(
        &self,
        principal: &IdentityPrincipal,
    ) -> Result<TenantUser, AppError> {
        {
            let mut sessions = self.sessions.write().await;
            sessions.insert(principal.email.clone(), SessionState::Resolving);
        }

        let result = self.reconcile_inner(principal).await;

        let mut sessions = self.sessions.write().await;
        match &result {
            Ok(user) => {
                sessions.insert(
                    principal.email.clone(),
                    SessionState::Resolved { user: user.clone() },
                );
            }
            Err(e) => {
                sessions.insert(
                    principal.email.clone(),
                    SessionState::Failed { error: e.to_string() },
                );
            }
        }

        result
    }

    async fn reconcile_inner(
        &self,
        principal: &IdentityPrincipal,
    ) -> Result<TenantUser, AppError> {
        match self.directory.find_by_email(&principal.email).await? {
            Some(existing) => self.patch_existing(existing, principal).await,
            None => {
                let now = Utc::now();
                let new_user = NewTenantUser {
                    email: principal.email.clone(),
                    full_name: resolve_full_name(principal),
                    avatar_url: principal.photo_url.clone(),
                    provider: principal.provider.clone(),
                    status: false,
                    created_at: now,
                    updated_at: now,
                };

                match self.directory.insert(&new_user).await {
                    Ok(created) => Ok(created),
                    // Dois sign-ins correram (duas abas): o banco garantiu a
                    // unicidade; refaz como update sobre a linha vencedora.
                    Err(AppError::EmailAlreadyExists) => {
                        let existing = self
                            .directory
                            .find_by_email(&principal.email)
                            .await?
                            .ok_or(AppError::UserNotFound)?;
                        self.patch_existing(existing, principal).await
                    }
                    Err(e) => Err(e),
                }
            }
        }
    }

    async fn patch_existing(
        &self,
        existing: TenantUser,
        principal: &IdentityPrincipal,
    ) -> Result<TenantUser, AppError> {
        let patch = compute_patch(&existing, principal);
        if patch.is_empty() {
            return Ok(existing);
        }
        self.directory.patch(existing.id, &patch).await
    }

    // ---
    // Sessão
    // ---

    /// Estado atual da sessão para um e-mail (Unresolved se nunca visto).
    pub async fn session_state(&self, email: &str) -> SessionState {
        let sessions = self.sessions.read().await;
        sessions.get(email).cloned().unwrap_or(SessionState::Unresolved)
    }

    /// Sign-out: volta para Unresolved e limpa o usuário ativo.
    pub async fn sign_out(&self, email: &str) {
        let mut sessions = self.sessions.write().await;
        sessions.remove(email);
    }

    /// Atualiza os campos permitidos do perfil do usuário ativo.
    /// Sem sessão Resolved para o e-mail, falha com NotAuthenticated.
    pub async fn update_profile(
        &self,
        email: &str,
        payload: &UpdateProfilePayload,
    ) -> Result<TenantUser, AppError> {
        let current = {
            let sessions = self.sessions.read().await;
            match sessions.get(email) {
                Some(SessionState::Resolved { user }) => user.clone(),
                _ => return Err(AppError::NotAuthenticated),
            }
        };

        let patch = TenantUserPatch {
            full_name: payload.full_name.clone(),
            avatar_url: payload.avatar_url.clone(),
            provider: None,
            birth_date: payload.birth_date,
            phone: payload.phone.clone(),
            updated_at: Utc::now(),
        };

        let updated = self.directory.patch(current.id, &patch).await?;

        let mut sessions = self.sessions.write().await;
        sessions.insert(email.to_string(), SessionState::Resolved { user: updated.clone() });

        Ok(updated)
    }

    // ---
    // Tokens locais (emitidos depois da reconciliação)
    // ---

    pub fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }

    pub async fn validate_token(&self, token: &str) -> Result<TenantUser, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        self.directory
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)
    }
}

/// Nome de exibição do provedor, ou a parte local do e-mail como fallback
/// ("jdoe@x.com" vira "jdoe").
pub fn resolve_full_name(principal: &IdentityPrincipal) -> String {
    if let Some(name) = &principal.display_name {
        if !name.trim().is_empty() {
            return name.clone();
        }
    }
    principal
        .email
        .split('@')
        .next()
        .unwrap_or(&principal.email)
        .to_string()
}

/// Calcula o patch entre o registro local e o principal do provedor.
/// Só preenche o que falta localmente; nunca substitui um campo
/// preenchido por um valor vazio vindo do provedor.
pub fn compute_patch(user: &TenantUser, principal: &IdentityPrincipal) -> TenantUserPatch {
    let mut patch = TenantUserPatch {
        full_name: None,
        avatar_url: None,
        provider: None,
        birth_date: None,
        phone: None,
        updated_at: Utc::now(),
    };

    if user.full_name.trim().is_empty() {
        if let Some(name) = &principal.display_name {
            if !name.trim().is_empty() {
                patch.full_name = Some(name.clone());
            }
        }
    }

    let local_avatar_empty = user
        .avatar_url
        .as_ref()
        .map(|a| a.trim().is_empty())
        .unwrap_or(true);
    if local_avatar_empty {
        if let Some(url) = &principal.photo_url {
            if !url.trim().is_empty() {
                patch.avatar_url = Some(url.clone());
            }
        }
    }

    if user.provider != principal.provider {
        patch.provider = Some(principal.provider.clone());
    }

    patch
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn principal(email: &str, name: Option<&str>, photo: Option<&str>, provider: &str) -> IdentityPrincipal {
        IdentityPrincipal {
            id: "principal-1".to_string(),
            email: email.to_string(),
            display_name: name.map(|s| s.to_string()),
            photo_url: photo.map(|s| s.to_string()),
            provider: provider.to_string(),
        }
    }

    fn tenant_user(full_name: &str, avatar: Option<&str>, provider: &str) -> TenantUser {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        TenantUser {
            id: Uuid::new_v4(),
            email: "a@b.com".to_string(),
            full_name: full_name.to_string(),
            avatar_url: avatar.map(|s| s.to_string()),
            provider: provider.to_string(),
            status: false,
            birth_date: None,
            phone: None,
            created_at: t,
            updated_at: t,
        }
    }

    #[test]
    fn nome_cai_para_parte_local_do_email() {
        let p = principal("jdoe@x.com", None, None, "password");
        assert_eq!(resolve_full_name(&p), "jdoe");

        // String vazia do provedor conta como ausente
        let p = principal("jdoe@x.com", Some(""), None, "password");
        assert_eq!(resolve_full_name(&p), "jdoe");

        let p = principal("jdoe@x.com", Some("John Doe"), None, "password");
        assert_eq!(resolve_full_name(&p), "John Doe");
    }

    #[test]
    fn patch_vazio_quando_nada_mudou() {
        let user = tenant_user("A", Some("http://x/p.png"), "password");
        let p = principal("a@b.com", Some("A"), Some("http://x/p.png"), "password");
        assert!(compute_patch(&user, &p).is_empty());
    }

    #[test]
    fn patch_preenche_somente_o_que_falta() {
        // Cenário do avatar + provedor novos, nome local preservado
        let user = tenant_user("A", None, "password");
        let p = principal("a@b.com", Some("A"), Some("http://y"), "google.com");

        let patch = compute_patch(&user, &p);
        assert_eq!(patch.full_name, None);
        assert_eq!(patch.avatar_url.as_deref(), Some("http://y"));
        assert_eq!(patch.provider.as_deref(), Some("google.com"));
    }

    #[test]
    fn patch_nao_apaga_campo_preenchido_com_valor_vazio() {
        // Avatar definido manualmente não é apagado quando o provedor
        // não reporta foto.
        let user = tenant_user("A", Some("http://manual.png"), "password");
        let p = principal("a@b.com", Some("A"), None, "password");

        let patch = compute_patch(&user, &p);
        assert_eq!(patch.avatar_url, None);
        assert!(patch.is_empty());
    }

    #[test]
    fn patch_completa_nome_vazio_local() {
        let user = tenant_user("", None, "password");
        let p = principal("a@b.com", Some("Ana"), None, "password");

        let patch = compute_patch(&user, &p);
        assert_eq!(patch.full_name.as_deref(), Some("Ana"));
    }
}
