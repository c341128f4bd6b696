// Diretório de usuários em memória para exercitar a reconciliação
// sem um Postgres de pé. Conta as chamadas de escrita para as
// asserções de "no máximo uma leitura e uma escrita".

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use painel_backend::common::error::AppError;
use painel_backend::db::UserDirectory;
use painel_backend::models::auth::{NewTenantUser, TenantUser, TenantUserPatch};

#[derive(Default)]
pub struct MockDirectory {
    rows: Mutex<Vec<TenantUser>>,
    pub insert_calls: AtomicUsize,
    pub patch_calls: AtomicUsize,

    // Falhas injetáveis
    pub fail_lookup: AtomicBool,
    pub fail_insert: AtomicBool,
    // Simula a corrida de dois sign-ins: o primeiro insert perde para
    // uma linha criada "pela outra aba" e recebe EmailAlreadyExists.
    pub conflict_once: AtomicBool,
}

#[allow(dead_code)]
impl MockDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, user: TenantUser) {
        self.rows.lock().unwrap().push(user);
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn inserts(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    pub fn patches(&self) -> usize {
        self.patch_calls.load(Ordering::SeqCst)
    }
}

#[allow(dead_code)]
pub fn make_user(email: &str, full_name: &str, avatar: Option<&str>, provider: &str) -> TenantUser {
    let now = Utc::now();
    TenantUser {
        id: Uuid::new_v4(),
        email: email.to_string(),
        full_name: full_name.to_string(),
        avatar_url: avatar.map(|s| s.to_string()),
        provider: provider.to_string(),
        status: false,
        birth_date: None,
        phone: None,
        created_at: now,
        updated_at: now,
    }
}

#[async_trait]
impl UserDirectory for MockDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<TenantUser>, AppError> {
        if self.fail_lookup.load(Ordering::SeqCst) {
            return Err(AppError::LookupError(sqlx::Error::PoolTimedOut));
        }
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<TenantUser>, AppError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|u| u.id == id).cloned())
    }

    async fn insert(&self, new_user: &NewTenantUser) -> Result<TenantUser, AppError> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_insert.load(Ordering::SeqCst) {
            return Err(AppError::PersistenceError(sqlx::Error::PoolTimedOut));
        }

        if self.conflict_once.swap(false, Ordering::SeqCst) {
            // A "outra aba" venceu a corrida: a linha dela já está lá.
            let winner = make_user(&new_user.email, "", None, &new_user.provider);
            self.rows.lock().unwrap().push(winner);
            return Err(AppError::EmailAlreadyExists);
        }

        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|u| u.email == new_user.email) {
            return Err(AppError::EmailAlreadyExists);
        }

        let created = TenantUser {
            id: Uuid::new_v4(),
            email: new_user.email.clone(),
            full_name: new_user.full_name.clone(),
            avatar_url: new_user.avatar_url.clone(),
            provider: new_user.provider.clone(),
            status: new_user.status,
            birth_date: None,
            phone: None,
            created_at: new_user.created_at,
            updated_at: new_user.updated_at,
        };
        rows.push(created.clone());
        Ok(created)
    }

    async fn patch(&self, id: Uuid, patch: &TenantUserPatch) -> Result<TenantUser, AppError> {
        self.patch_calls.fetch_add(1, Ordering::SeqCst);

        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(AppError::UserNotFound)?;

        // Mesma semântica de COALESCE do Postgres
        if let Some(name) = &patch.full_name {
            row.full_name = name.clone();
        }
        if let Some(url) = &patch.avatar_url {
            row.avatar_url = Some(url.clone());
        }
        if let Some(provider) = &patch.provider {
            row.provider = provider.clone();
        }
        if let Some(birth_date) = patch.birth_date {
            row.birth_date = Some(birth_date);
        }
        if let Some(phone) = &patch.phone {
            row.phone = Some(phone.clone());
        }
        row.updated_at = patch.updated_at;

        Ok(row.clone())
    }
}
