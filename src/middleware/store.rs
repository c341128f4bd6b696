// src/middleware/store.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::common::error::AppError;

// O nome do nosso cabeçalho HTTP customizado
const STORE_ID_HEADER: &str = "x-store-id";

// O extrator de escopo de loja: rotas de produto, venda e retirada
// operam sempre sobre UMA loja, identificada por este cabeçalho.
#[derive(Debug, Clone)]
pub struct StoreContext(pub Uuid);

impl<S> FromRequestParts<S> for StoreContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header_value = parts.headers.get(STORE_ID_HEADER);

        match header_value {
            Some(value) => {
                let value_str = value.to_str().map_err(|_| {
                    AppError::InvalidStoreHeader(
                        "O cabeçalho X-Store-ID contém caracteres inválidos.".to_string(),
                    )
                })?;

                let store_id = Uuid::parse_str(value_str).map_err(|_| {
                    AppError::InvalidStoreHeader(
                        "O cabeçalho X-Store-ID não é um UUID.".to_string(),
                    )
                })?;

                Ok(StoreContext(store_id))
            }
            None => Err(AppError::InvalidStoreHeader(
                "O cabeçalho X-Store-ID é obrigatório.".to_string(),
            )),
        }
    }
}
