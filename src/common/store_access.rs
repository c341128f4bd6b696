use uuid::Uuid;

use crate::{common::error::AppError, config::AppState, middleware::auth::AuthenticatedUser};

// ---
// Helper de autorização por loja
// ---
/// Confere no banco que a loja do cabeçalho X-Store-ID pertence ao
/// usuário autenticado antes de qualquer operação escopada.
pub(crate) async fn ensure_store_access(
    app_state: &AppState,
    store_id: Uuid,
    user: &AuthenticatedUser,
) -> Result<(), AppError> {
    let owns = app_state
        .catalog_repo
        .check_store_owner(store_id, user.0.id)
        .await?;

    if !owns {
        return Err(AppError::StoreAccessDenied);
    }
    Ok(())
}
