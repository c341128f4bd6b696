use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// A taxonomia separa leitura (Lookup) de escrita (Persistence) no banco:
// quem chama a reconciliação precisa saber se algo chegou a ser gravado.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Erro de leitura no banco de dados: {0}")]
    LookupError(#[source] sqlx::Error),

    #[error("Erro de escrita no banco de dados: {0}")]
    PersistenceError(#[source] sqlx::Error),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("SKU já cadastrado nesta loja")]
    SkuAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Nenhuma sessão ativa")]
    NotAuthenticated,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Recurso não encontrado: {0}")]
    ResourceNotFound(String),

    #[error("Loja não pertence ao usuário autenticado")]
    StoreAccessDenied,

    #[error("Cabeçalho X-Store-ID inválido: {0}")]
    InvalidStoreHeader(String),

    #[error("Provedor de identidade respondeu com erro: {0}")]
    IdentityProvider(String),

    #[error("Falha no envio da planilha: {0}")]
    UploadFailed(String),

    #[error("Arquivo da planilha ausente no formulário")]
    UploadMissingFile,

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::EmailAlreadyExists => {
                (StatusCode::CONFLICT, "Este e-mail já está em uso.".to_string())
            }
            AppError::SkuAlreadyExists => (
                StatusCode::CONFLICT,
                "Já existe um produto com este SKU nesta loja.".to_string(),
            ),
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "E-mail ou senha inválidos.".to_string())
            }
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Token de autenticação inválido ou ausente.".to_string(),
            ),
            AppError::NotAuthenticated => (
                StatusCode::UNAUTHORIZED,
                "Nenhuma sessão ativa. Faça login novamente.".to_string(),
            ),
            AppError::UserNotFound => {
                (StatusCode::NOT_FOUND, "Usuário não encontrado.".to_string())
            }
            AppError::ResourceNotFound(what) => {
                (StatusCode::NOT_FOUND, format!("{} não encontrado(a).", what))
            }
            AppError::StoreAccessDenied => (
                StatusCode::FORBIDDEN,
                "Esta loja não pertence ao usuário autenticado.".to_string(),
            ),
            AppError::InvalidStoreHeader(ref msg) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            AppError::IdentityProvider(ref msg) => {
                tracing::error!("Provedor de identidade falhou: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "O provedor de identidade recusou a operação.".to_string(),
                )
            }
            AppError::UploadFailed(ref msg) => {
                tracing::error!("Envio de planilha falhou: {}", msg);
                (StatusCode::BAD_GATEWAY, "Não foi possível enviar a planilha.".to_string())
            }
            AppError::UploadMissingFile => (
                StatusCode::BAD_REQUEST,
                "Envie o arquivo da planilha no campo 'file'.".to_string(),
            ),

            // Todos os outros erros (Lookup, Persistence, JWT, interno) viram 500.
            // O `tracing` loga a mensagem detalhada que o `thiserror` montou.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.".to_string())
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapeia_erros_para_status_http() {
        assert_eq!(
            AppError::EmailAlreadyExists.into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::NotAuthenticated.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::InvalidToken.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::StoreAccessDenied.into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::UserNotFound.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::UploadFailed("sem rede".to_string())
                .into_response()
                .status(),
            StatusCode::BAD_GATEWAY
        );
        // Erros de banco não vazam detalhe: viram 500 genérico
        assert_eq!(
            AppError::LookupError(sqlx::Error::PoolTimedOut)
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::PersistenceError(sqlx::Error::PoolTimedOut)
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
