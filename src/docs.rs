// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::login_federated,
        handlers::auth::logout,
        handlers::auth::forgot_password,
        handlers::auth::reset_password,

        // --- Users ---
        handlers::profile::get_me,
        handlers::profile::get_session,
        handlers::profile::update_me,

        // --- Catalog ---
        handlers::stores::list_stores,
        handlers::stores::create_store,
        handlers::stores::update_store,
        handlers::stores::delete_store,
        handlers::warehouses::list_warehouses,
        handlers::warehouses::create_warehouse,
        handlers::warehouses::update_warehouse,
        handlers::warehouses::delete_warehouse,
        handlers::products::list_products,
        handlers::products::create_product,
        handlers::products::update_product,
        handlers::products::delete_product,
        handlers::uploads::upload_products_sheet,

        // --- Finance ---
        handlers::sales::list_sales,
        handlers::sales::create_sale,
        handlers::sales::update_sale,
        handlers::sales::delete_sale,
        handlers::withdrawals::list_withdrawals,
        handlers::withdrawals::create_withdrawal,
        handlers::withdrawals::update_withdrawal,
        handlers::withdrawals::delete_withdrawal,
        handlers::journal::list_journal_entries,
        handlers::journal::create_journal_entry,
        handlers::journal::update_journal_entry,
        handlers::journal::delete_journal_entry,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::TenantUser,
            models::auth::SessionState,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::FederatedLoginPayload,
            models::auth::ForgotPasswordPayload,
            models::auth::ResetPasswordPayload,
            models::auth::UpdateProfilePayload,
            models::auth::AuthResponse,
            handlers::auth::LogoutPayload,

            // --- Catalog ---
            models::catalog::Store,
            models::catalog::Warehouse,
            models::catalog::Product,
            handlers::stores::StorePayload,
            handlers::warehouses::WarehousePayload,
            handlers::products::ProductPayload,

            // --- Finance ---
            models::finance::Sale,
            models::finance::Withdrawal,
            models::finance::JournalEntry,
            models::finance::JournalEntryKind,
            handlers::sales::SalePayload,
            handlers::withdrawals::WithdrawalPayload,
            handlers::journal::JournalEntryPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e reconciliação de usuários"),
        (name = "Users", description = "Dados do Usuário, Sessão e Perfil"),
        (name = "Catalog", description = "Lojas, Armazéns e Produtos"),
        (name = "Finance", description = "Vendas, Retiradas e Diário Contábil")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
