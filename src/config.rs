// src/config.rs

use std::{env, sync::Arc, time::Duration};

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{CatalogRepository, FinanceRepository, PostgresUserDirectory},
    services::{identity::IdentityClient, session::SessionService, upload::UploadService},
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub catalog_repo: CatalogRepository,
    pub finance_repo: FinanceRepository,
    pub identity: IdentityClient,
    pub session_service: SessionService,
    pub upload_service: UploadService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        // Configuração lida UMA vez, na subida do processo.
        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");
        let identity_base_url =
            env::var("IDENTITY_BASE_URL").expect("IDENTITY_BASE_URL deve ser definida");
        let identity_api_key =
            env::var("IDENTITY_API_KEY").expect("IDENTITY_API_KEY deve ser definida");
        let identity_service_key =
            env::var("IDENTITY_SERVICE_KEY").expect("IDENTITY_SERVICE_KEY deve ser definida");
        let upload_webhook_url =
            env::var("UPLOAD_WEBHOOK_URL").expect("UPLOAD_WEBHOOK_URL deve ser definida");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_directory = Arc::new(PostgresUserDirectory::new(db_pool.clone()));
        let catalog_repo = CatalogRepository::new(db_pool.clone());
        let finance_repo = FinanceRepository::new(db_pool.clone());

        let identity = IdentityClient::new(
            identity_base_url,
            identity_api_key,
            identity_service_key,
        );
        let session_service = SessionService::new(user_directory, jwt_secret);
        let upload_service = UploadService::new(upload_webhook_url);

        Ok(Self {
            db_pool,
            catalog_repo,
            finance_repo,
            identity,
            session_service,
            upload_service,
        })
    }
}
