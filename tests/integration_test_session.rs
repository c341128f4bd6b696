mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use common::{make_user, MockDirectory};
use painel_backend::common::error::AppError;
use painel_backend::models::auth::{IdentityPrincipal, SessionState, UpdateProfilePayload};
use painel_backend::services::session::SessionService;

fn principal(email: &str) -> IdentityPrincipal {
    IdentityPrincipal {
        id: "principal-1".to_string(),
        email: email.to_string(),
        display_name: Some("Ana".to_string()),
        photo_url: None,
        provider: "password".to_string(),
    }
}

fn service(directory: Arc<MockDirectory>) -> SessionService {
    SessionService::new(directory, "segredo-de-teste".to_string())
}

#[tokio::test]
async fn sessao_comeca_unresolved() {
    let service = service(Arc::new(MockDirectory::new()));
    let state = service.session_state("ninguem@x.com").await;
    assert!(matches!(state, SessionState::Unresolved));
}

#[tokio::test]
async fn sign_in_resolve_e_sign_out_limpa() {
    let directory = Arc::new(MockDirectory::new());
    let service = service(directory);

    let p = principal("ana@x.com");
    let user = service.reconcile_sign_in(&p).await.unwrap();

    match service.session_state("ana@x.com").await {
        SessionState::Resolved { user: active } => assert_eq!(active.id, user.id),
        other => panic!("esperava Resolved, veio {:?}", other),
    }

    service.sign_out("ana@x.com").await;
    assert!(matches!(
        service.session_state("ana@x.com").await,
        SessionState::Unresolved
    ));
}

#[tokio::test]
async fn falha_de_sincronizacao_fica_observavel() {
    let directory = Arc::new(MockDirectory::new());
    directory.fail_lookup.store(true, Ordering::SeqCst);
    let service = service(directory);

    let p = principal("ana@x.com");
    let _ = service.reconcile_sign_in(&p).await;

    // O erro não é engolido: a sessão guarda o último erro de sync
    match service.session_state("ana@x.com").await {
        SessionState::Failed { error } => assert!(!error.is_empty()),
        other => panic!("esperava Failed, veio {:?}", other),
    }
}

#[tokio::test]
async fn update_profile_sem_sessao_falha() {
    let directory = Arc::new(MockDirectory::new());
    directory.seed(make_user("ana@x.com", "Ana", None, "password"));
    let service = service(directory);

    let payload = UpdateProfilePayload {
        full_name: Some("Novo Nome".to_string()),
        avatar_url: None,
        birth_date: None,
        phone: None,
    };

    // Existe linha no diretório, mas nenhuma sessão ativa
    let result = service.update_profile("ana@x.com", &payload).await;
    assert!(matches!(result, Err(AppError::NotAuthenticated)));
}

#[tokio::test]
async fn update_profile_substitui_usuario_ativo() {
    let directory = Arc::new(MockDirectory::new());
    let service = service(directory.clone());

    let p = principal("ana@x.com");
    service.reconcile_sign_in(&p).await.unwrap();

    let payload = UpdateProfilePayload {
        full_name: Some("Ana Maria".to_string()),
        avatar_url: None,
        birth_date: None,
        phone: Some("+55 11 99999-0000".to_string()),
    };

    let updated = service.update_profile("ana@x.com", &payload).await.unwrap();
    assert_eq!(updated.full_name, "Ana Maria");
    assert_eq!(updated.phone.as_deref(), Some("+55 11 99999-0000"));
    assert_eq!(directory.patches(), 1);

    // O usuário ativo é a linha que o "servidor" devolveu
    match service.session_state("ana@x.com").await {
        SessionState::Resolved { user } => assert_eq!(user.full_name, "Ana Maria"),
        other => panic!("esperava Resolved, veio {:?}", other),
    }
}

#[tokio::test]
async fn token_emitido_valida_de_volta_para_o_mesmo_usuario() {
    let directory = Arc::new(MockDirectory::new());
    let service = service(directory);

    let p = principal("ana@x.com");
    let user = service.reconcile_sign_in(&p).await.unwrap();

    let token = service.create_token(user.id).unwrap();
    let validated = service.validate_token(&token).await.unwrap();

    assert_eq!(validated.id, user.id);
    assert_eq!(validated.email, "ana@x.com");
}

#[tokio::test]
async fn token_invalido_e_rejeitado() {
    let service = service(Arc::new(MockDirectory::new()));
    let result = service.validate_token("nem-de-longe-um-jwt").await;
    assert!(matches!(result, Err(AppError::InvalidToken)));
}
