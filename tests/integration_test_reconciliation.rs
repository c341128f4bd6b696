mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use common::{make_user, MockDirectory};
use painel_backend::common::error::AppError;
use painel_backend::models::auth::IdentityPrincipal;
use painel_backend::services::session::SessionService;

fn principal(email: &str, name: Option<&str>, photo: Option<&str>, provider: &str) -> IdentityPrincipal {
    IdentityPrincipal {
        id: "principal-1".to_string(),
        email: email.to_string(),
        display_name: name.map(|s| s.to_string()),
        photo_url: photo.map(|s| s.to_string()),
        provider: provider.to_string(),
    }
}

fn service(directory: Arc<MockDirectory>) -> SessionService {
    SessionService::new(directory, "segredo-de-teste".to_string())
}

#[tokio::test]
async fn cria_usuario_no_primeiro_sign_in() {
    let directory = Arc::new(MockDirectory::new());
    let service = service(directory.clone());

    // Principal sem nome de exibição: o nome cai para a parte local do e-mail
    let p = principal("a@b.com", Some(""), Some("http://x/p.png"), "password");
    let user = service.reconcile_sign_in(&p).await.unwrap();

    assert_eq!(directory.inserts(), 1);
    assert_eq!(directory.patches(), 0);
    assert_eq!(user.full_name, "a");
    assert_eq!(user.avatar_url.as_deref(), Some("http://x/p.png"));
    assert_eq!(user.provider, "password");
    assert!(!user.status, "novo usuário nasce pendente");
}

#[tokio::test]
async fn sign_ins_repetidos_mantem_uma_unica_linha() {
    let directory = Arc::new(MockDirectory::new());
    let service = service(directory.clone());

    let p = principal("jdoe@x.com", None, None, "password");
    for _ in 0..3 {
        service.reconcile_sign_in(&p).await.unwrap();
    }

    assert_eq!(directory.row_count(), 1);
    assert_eq!(directory.inserts(), 1);
    // Nada mudou entre os sign-ins: zero escritas depois da criação
    assert_eq!(directory.patches(), 0);
}

#[tokio::test]
async fn nome_cai_para_parte_local_do_email() {
    let directory = Arc::new(MockDirectory::new());
    let service = service(directory.clone());

    let p = principal("jdoe@x.com", None, None, "password");
    let user = service.reconcile_sign_in(&p).await.unwrap();

    assert_eq!(user.full_name, "jdoe");
}

#[tokio::test]
async fn preenche_somente_campos_faltantes_no_sign_in() {
    let directory = Arc::new(MockDirectory::new());
    directory.seed(make_user("a@b.com", "A", None, "password"));
    let service = service(directory.clone());

    // O provedor agora reporta avatar e provedor novos; o nome local fica
    let p = principal("a@b.com", Some("A"), Some("http://y"), "google.com");
    let user = service.reconcile_sign_in(&p).await.unwrap();

    assert_eq!(directory.inserts(), 0);
    assert_eq!(directory.patches(), 1);
    assert_eq!(user.full_name, "A");
    assert_eq!(user.avatar_url.as_deref(), Some("http://y"));
    assert_eq!(user.provider, "google.com");
}

#[tokio::test]
async fn avatar_manual_nao_e_apagado() {
    let directory = Arc::new(MockDirectory::new());
    directory.seed(make_user("a@b.com", "A", Some("http://manual.png"), "password"));
    let service = service(directory.clone());

    // Provedor sem foto: o avatar definido manualmente permanece
    let p = principal("a@b.com", Some("A"), None, "password");
    let user = service.reconcile_sign_in(&p).await.unwrap();

    assert_eq!(directory.patches(), 0);
    assert_eq!(user.avatar_url.as_deref(), Some("http://manual.png"));
}

#[tokio::test]
async fn erro_de_leitura_aborta_sem_escrever() {
    let directory = Arc::new(MockDirectory::new());
    directory.fail_lookup.store(true, Ordering::SeqCst);
    let service = service(directory.clone());

    let p = principal("a@b.com", None, None, "password");
    let result = service.reconcile_sign_in(&p).await;

    assert!(matches!(result, Err(AppError::LookupError(_))));
    // Nenhuma tentativa de escrita aconteceu
    assert_eq!(directory.inserts(), 0);
    assert_eq!(directory.patches(), 0);
    assert_eq!(directory.row_count(), 0);
}

#[tokio::test]
async fn erro_de_escrita_propaga_como_persistencia() {
    let directory = Arc::new(MockDirectory::new());
    directory.fail_insert.store(true, Ordering::SeqCst);
    let service = service(directory.clone());

    let p = principal("a@b.com", None, None, "password");
    let result = service.reconcile_sign_in(&p).await;

    assert!(matches!(result, Err(AppError::PersistenceError(_))));
    assert_eq!(directory.row_count(), 0);
}

#[tokio::test]
async fn corrida_de_insert_refaz_como_update() {
    let directory = Arc::new(MockDirectory::new());
    directory.conflict_once.store(true, Ordering::SeqCst);
    let service = service(directory.clone());

    // O insert perde a corrida para "a outra aba"; a reconciliação deve
    // reaproveitar a linha vencedora em vez de duplicar.
    let p = principal("a@b.com", Some("Ana"), None, "password");
    let user = service.reconcile_sign_in(&p).await.unwrap();

    assert_eq!(directory.row_count(), 1);
    // A linha vencedora estava sem nome; o patch completou
    assert_eq!(user.full_name, "Ana");
    assert_eq!(directory.patches(), 1);
}
