// src/db/user_directory.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{NewTenantUser, TenantUser, TenantUserPatch},
};

// A porta de acesso à tabela 'users'. Fica atrás de um trait para a
// reconciliação poder ser exercitada sem um Postgres de pé.
//
// Contrato de erros: leituras que falham viram LookupError; escritas que
// falham viram PersistenceError, exceto a violação de unicidade do e-mail,
// que vira EmailAlreadyExists e sinaliza "já existe, tente como update".
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<TenantUser>, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<TenantUser>, AppError>;
    async fn insert(&self, new_user: &NewTenantUser) -> Result<TenantUser, AppError>;
    async fn patch(&self, id: Uuid, patch: &TenantUserPatch) -> Result<TenantUser, AppError>;
}

#[derive(Clone)]
pub struct PostgresUserDirectory {
    pool: PgPool,
}

impl PostgresUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const USER_COLUMNS: &str =
    "id, email, full_name, avatar_url, provider, status, birth_date, phone, created_at, updated_at";

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    // Busca um usuário pelo seu e-mail. `None` é o sinal de "linha não
    // encontrada"; qualquer erro real do banco é um LookupError.
    async fn find_by_email(&self, email: &str) -> Result<Option<TenantUser>, AppError> {
        sqlx::query_as::<_, TenantUser>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::LookupError)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<TenantUser>, AppError> {
        sqlx::query_as::<_, TenantUser>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::LookupError)
    }

    // Cria o registro local do usuário. A unicidade por e-mail mora no
    // banco (constraint users_email_key): se dois sign-ins correrem,
    // o perdedor recebe EmailAlreadyExists e refaz o caminho como update.
    async fn insert(&self, new_user: &NewTenantUser) -> Result<TenantUser, AppError> {
        sqlx::query_as::<_, TenantUser>(&format!(
            r#"
            INSERT INTO users (email, full_name, avatar_url, provider, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&new_user.email)
        .bind(&new_user.full_name)
        .bind(&new_user.avatar_url)
        .bind(&new_user.provider)
        .bind(new_user.status)
        .bind(new_user.created_at)
        .bind(new_user.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::EmailAlreadyExists;
                }
            }
            AppError::PersistenceError(e)
        })
    }

    // Patch parcial: COALESCE preserva o que já está preenchido quando o
    // campo vem como None.
    async fn patch(&self, id: Uuid, patch: &TenantUserPatch) -> Result<TenantUser, AppError> {
        let updated = sqlx::query_as::<_, TenantUser>(&format!(
            r#"
            UPDATE users SET
                full_name  = COALESCE($2, full_name),
                avatar_url = COALESCE($3, avatar_url),
                provider   = COALESCE($4, provider),
                birth_date = COALESCE($5, birth_date),
                phone      = COALESCE($6, phone),
                updated_at = $7
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&patch.full_name)
        .bind(&patch.avatar_url)
        .bind(&patch.provider)
        .bind(patch.birth_date)
        .bind(&patch.phone)
        .bind(patch.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::PersistenceError)?;

        updated.ok_or(AppError::UserNotFound)
    }
}
