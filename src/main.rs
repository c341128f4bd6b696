//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Importações principais
use painel_backend::config::AppState;
use painel_backend::docs::ApiDoc;
use painel_backend::handlers;
use painel_backend::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    // Inicializa o logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas de autenticação: públicas, com exceção do logout,
    // que precisa saber quem está saindo.
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/login/federated", post(handlers::auth::login_federated))
        .route("/password-reset", post(handlers::auth::forgot_password))
        .route("/password-reset/confirm", post(handlers::auth::reset_password))
        .route(
            "/logout",
            post(handlers::auth::logout).layer(axum_middleware::from_fn_with_state(
                app_state.clone(),
                auth_guard,
            )),
        );

    // Rotas de usuário (protegidas pelo middleware)
    let user_routes = Router::new()
        .route(
            "/me",
            get(handlers::profile::get_me).patch(handlers::profile::update_me),
        )
        .route("/session", get(handlers::profile::get_session))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let store_routes = Router::new()
        .route(
            "/",
            post(handlers::stores::create_store).get(handlers::stores::list_stores),
        )
        .route(
            "/{store_id}",
            put(handlers::stores::update_store).delete(handlers::stores::delete_store),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let warehouse_routes = Router::new()
        .route(
            "/",
            post(handlers::warehouses::create_warehouse).get(handlers::warehouses::list_warehouses),
        )
        .route(
            "/{warehouse_id}",
            put(handlers::warehouses::update_warehouse)
                .delete(handlers::warehouses::delete_warehouse),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Rotas escopadas por loja: exigem também o cabeçalho X-Store-ID
    let product_routes = Router::new()
        .route(
            "/",
            post(handlers::products::create_product).get(handlers::products::list_products),
        )
        .route(
            "/{product_id}",
            put(handlers::products::update_product).delete(handlers::products::delete_product),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let sale_routes = Router::new()
        .route(
            "/",
            post(handlers::sales::create_sale).get(handlers::sales::list_sales),
        )
        .route(
            "/{sale_id}",
            put(handlers::sales::update_sale).delete(handlers::sales::delete_sale),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let withdrawal_routes = Router::new()
        .route(
            "/",
            post(handlers::withdrawals::create_withdrawal)
                .get(handlers::withdrawals::list_withdrawals),
        )
        .route(
            "/{withdrawal_id}",
            put(handlers::withdrawals::update_withdrawal)
                .delete(handlers::withdrawals::delete_withdrawal),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let journal_routes = Router::new()
        .route(
            "/",
            post(handlers::journal::create_journal_entry)
                .get(handlers::journal::list_journal_entries),
        )
        .route(
            "/{entry_id}",
            put(handlers::journal::update_journal_entry)
                .delete(handlers::journal::delete_journal_entry),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let upload_routes = Router::new()
        .route("/products", post(handlers::uploads::upload_products_sheet))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/stores", store_routes)
        .nest("/api/warehouses", warehouse_routes)
        .nest("/api/products", product_routes)
        .nest("/api/sales", sale_routes)
        .nest("/api/withdrawals", withdrawal_routes)
        .nest("/api/journal", journal_routes)
        .nest("/api/uploads", upload_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
