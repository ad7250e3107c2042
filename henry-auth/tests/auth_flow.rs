//! End-to-end sign-in, sign-up, sign-out and profile flows.

use std::sync::{Arc, Mutex};

use henry_auth::{
    AuthError, AuthService, CredentialHasher, Identity, ProfileFields, SeedAccount, UserDirectory,
    DEFAULT_DISPLAY_NAME, SAMPLE_SECRET,
};
use henry_common::{AuthConfig, AuthLatencyConfig, Latency, Permission, Role};
use serde_json::{json, Value};
use test_case::test_case;

fn fast_config() -> AuthConfig {
    AuthConfig {
        hash_memory_kib: 8,
        hash_iterations: 1,
        latency: AuthLatencyConfig::none(),
        ..AuthConfig::default()
    }
}

fn service_with(accounts: &[SeedAccount]) -> AuthService {
    let config = fast_config();
    let hasher = CredentialHasher::from_config(&config).unwrap();
    let directory = UserDirectory::with_accounts(&hasher, accounts).unwrap();
    AuthService::new(Arc::new(directory), hasher, config)
}

fn u1_service() -> AuthService {
    service_with(&[SeedAccount::new("u1", "a@x.com", "demo123").display_name("Ana")])
}

fn seeded_service() -> AuthService {
    AuthService::from_config(&fast_config()).unwrap()
}

type Events = Arc<Mutex<Vec<Option<String>>>>;

fn record_events(service: &AuthService) -> (Events, henry_auth::Subscription) {
    let events: Events = Arc::default();
    let sink = Arc::clone(&events);
    let sub = service.subscribe(move |identity: Option<&Identity>| {
        sink.lock().unwrap().push(identity.map(|i| i.id.clone()));
    });
    (events, sub)
}

fn form(value: Value) -> ProfileFields {
    value.as_object().cloned().unwrap()
}

#[tokio::test]
async fn test_u1_scenario() {
    let service = u1_service();

    let identity = service.sign_in("a@x.com", "demo123").await.unwrap();
    assert_eq!(identity.id, "u1");
    assert_eq!(identity.email, "a@x.com");
    assert_eq!(identity.display_name, "Ana");

    let err = service.sign_in("a@x.com", "wrong").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredential));

    let err = service
        .sign_up("a@x.com", "...", ProfileFields::new())
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::AlreadyExists(_)));
    assert_eq!(err.code(), "auth/email-already-in-use");
}

#[test_case("profesor@henry.edu", "prof-001", Role::Teacher ; "teacher")]
#[test_case("estudiante@henry.edu", "student-001", Role::Student ; "student")]
#[test_case("admin@henry.edu", "admin-001", Role::Admin ; "admin")]
#[tokio::test]
async fn test_seeded_accounts_sign_in(email: &str, id: &str, role: Role) {
    let service = seeded_service();
    let (events, _sub) = record_events(&service);

    let identity = service.sign_in(email, SAMPLE_SECRET).await.unwrap();
    assert_eq!(identity.id, id);

    // replay plus exactly one notification
    assert_eq!(*events.lock().unwrap(), vec![None, Some(id.to_string())]);

    let profile = service.current_profile().await.unwrap();
    assert_eq!(profile.role, role);
    assert!(profile.last_login_at.is_some());
}

#[tokio::test]
async fn test_wrong_secret_leaves_session_untouched() {
    let service = u1_service();
    service.sign_in("a@x.com", "demo123").await.unwrap();
    let (events, _sub) = record_events(&service);

    let err = service.sign_in("a@x.com", "nope").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredential));
    assert_eq!(service.current_user().map(|i| i.id), Some("u1".into()));
    assert_eq!(*events.lock().unwrap(), vec![Some("u1".to_string())]);
}

#[tokio::test]
async fn test_unknown_email_not_found() {
    let service = u1_service();
    let err = service.sign_in("ghost@x.com", "demo123").await.unwrap_err();
    assert!(matches!(err, AuthError::NotFound(ref e) if e == "ghost@x.com"));
    assert!(service.current_user().is_none());
}

#[tokio::test]
async fn test_duplicate_sign_up_keeps_record_count() {
    let service = seeded_service();
    let before = service.directory().len().await;

    let err = service
        .sign_up("Profesor@Henry.edu", "demo123", form(json!({ "fullName": "X" })))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::AlreadyExists(_)));
    assert_eq!(service.directory().len().await, before);
}

#[tokio::test]
async fn test_sign_up_creates_record_and_signs_in() {
    let service = seeded_service();
    let (events, _sub) = record_events(&service);

    let identity = service
        .sign_up(
            "nuevo@henry.edu",
            "secreto1",
            form(json!({
                "fullName": "Laura Pérez",
                "role": "profesor",
                "institution": "Universidad Nacional",
                "password": "should-not-be-stored"
            })),
        )
        .await
        .unwrap();

    assert_eq!(identity.display_name, "Laura Pérez");
    assert!(uuid_like(&identity.id));
    assert_eq!(service.directory().len().await, 4);
    assert_eq!(*events.lock().unwrap(), vec![None, Some(identity.id.clone())]);

    let record = service.profiles().get(&identity.id).await.unwrap();
    assert_eq!(record.role, Role::Teacher);
    assert_eq!(record.field("institution"), Some(&json!("Universidad Nacional")));
    assert!(record.field("password").is_none());
    assert!(record.field("role").is_none());

    service.sign_out().await;
    let again = service.sign_in("nuevo@henry.edu", "secreto1").await.unwrap();
    assert_eq!(again.id, identity.id);
}

fn uuid_like(id: &str) -> bool {
    id.len() == 36 && id.chars().filter(|c| *c == '-').count() == 4
}

#[tokio::test]
async fn test_sign_up_defaults() {
    let service = u1_service();
    let identity = service
        .sign_up("b@x.com", "demo123", ProfileFields::new())
        .await
        .unwrap();
    assert_eq!(identity.display_name, DEFAULT_DISPLAY_NAME);

    let record = service.profiles().get(&identity.id).await.unwrap();
    assert_eq!(record.role, Role::Student);
}

#[tokio::test]
async fn test_sign_up_validation() {
    let service = u1_service();

    let err = service
        .sign_up("not-an-email", "demo123", ProfileFields::new())
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidEmail(_)));

    let err = service
        .sign_up("b@x.com", "123", ProfileFields::new())
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::WeakSecret { min_len: 6 }));

    let err = service
        .sign_up("b@x.com", "demo123", form(json!({ "role": "janitor" })))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidRole(_)));

    assert_eq!(service.directory().len().await, 1);
    assert!(service.current_user().is_none());
}

#[tokio::test]
async fn test_sign_out_keeps_data_and_replays_null() {
    let service = u1_service();
    let (events, sub) = record_events(&service);
    service.sign_in("a@x.com", "demo123").await.unwrap();
    service.sign_out().await;

    assert!(service.profiles().get("u1").await.is_some());
    assert_eq!(
        *events.lock().unwrap(),
        vec![None, Some("u1".to_string()), None]
    );
    assert!(sub.unsubscribe());

    let (late, _late_sub) = record_events(&service);
    assert_eq!(*late.lock().unwrap(), vec![None]);
}

#[tokio::test]
async fn test_subscriptions_do_not_interfere() {
    let service = u1_service();
    let (first, first_sub) = record_events(&service);
    let (second, _second_sub) = record_events(&service);

    service.sign_in("a@x.com", "demo123").await.unwrap();
    assert!(first_sub.unsubscribe());
    service.sign_out().await;

    assert_eq!(*first.lock().unwrap(), vec![None, Some("u1".to_string())]);
    assert_eq!(
        *second.lock().unwrap(),
        vec![None, Some("u1".to_string()), None]
    );
}

#[tokio::test]
async fn test_watch_follows_session() {
    let service = u1_service();
    let mut rx = service.watch();

    service.sign_in("a@x.com", "demo123").await.unwrap();
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().as_ref().map(|i| i.id.clone()), Some("u1".into()));

    service.sign_out().await;
    rx.changed().await.unwrap();
    assert!(rx.borrow().is_none());
}

#[tokio::test]
async fn test_merge_through_service() {
    let service = u1_service();
    service
        .profiles()
        .merge("u1", form(json!({ "bio": "Docente de física" })))
        .await
        .unwrap();

    let record = service.profiles().get("u1").await.unwrap();
    assert_eq!(record.field("bio"), Some(&json!("Docente de física")));
    assert_eq!(record.display_name, "Ana");
}

#[tokio::test]
async fn test_disabled_account_cannot_sign_in() {
    let service = u1_service();
    service
        .profiles()
        .merge("u1", form(json!({ "enabled": false })))
        .await
        .unwrap();

    let err = service.sign_in("a@x.com", "demo123").await.unwrap_err();
    assert!(matches!(err, AuthError::AccountDisabled(_)));
    assert!(!service.has_permission("u1", Permission::ProfileRead).await);
}

#[tokio::test]
async fn test_update_display_name_notifies() {
    let service = u1_service();
    assert!(matches!(
        service.update_display_name("Nadie").await,
        Err(AuthError::NotSignedIn)
    ));

    service.sign_in("a@x.com", "demo123").await.unwrap();
    let names: Arc<Mutex<Vec<String>>> = Arc::default();
    let sink = Arc::clone(&names);
    let _sub = service.subscribe(move |identity: Option<&Identity>| {
        if let Some(i) = identity {
            sink.lock().unwrap().push(i.display_name.clone());
        }
    });

    let identity = service.update_display_name("Ana María").await.unwrap();
    assert_eq!(identity.display_name, "Ana María");
    assert_eq!(*names.lock().unwrap(), vec!["Ana", "Ana María"]);
    assert_eq!(
        service.current_user().unwrap().display_name,
        "Ana María"
    );
}

#[tokio::test(start_paused = true)]
async fn test_rename_does_not_undo_concurrent_sign_out() {
    let mut config = fast_config();
    config.latency.profile_write = Latency::fixed(500);
    config.latency.sign_out = Latency::fixed(100);
    let hasher = CredentialHasher::from_config(&config).unwrap();
    let directory = UserDirectory::with_accounts(
        &hasher,
        &[SeedAccount::new("u1", "a@x.com", "demo123").display_name("Ana")],
    )
    .unwrap();
    let service = AuthService::new(Arc::new(directory), hasher, config);
    service.sign_in("a@x.com", "demo123").await.unwrap();
    let (events, _sub) = record_events(&service);

    let (renamed, ()) = tokio::join!(service.update_display_name("Ana María"), service.sign_out());

    assert!(matches!(renamed, Err(AuthError::NotSignedIn)));
    assert!(service.current_user().is_none());
    assert_eq!(*events.lock().unwrap(), vec![Some("u1".to_string()), None]);
    let record = service.directory().get("u1").await.unwrap();
    assert_eq!(record.display_name, "Ana María");
}

#[tokio::test]
async fn test_change_password() {
    let service = u1_service();
    assert!(matches!(
        service.change_password("demo123", "nuevo123").await,
        Err(AuthError::NotSignedIn)
    ));

    service.sign_in("a@x.com", "demo123").await.unwrap();
    assert!(matches!(
        service.change_password("wrong", "nuevo123").await,
        Err(AuthError::InvalidCredential)
    ));
    assert!(matches!(
        service.change_password("demo123", "abc").await,
        Err(AuthError::WeakSecret { .. })
    ));
    service.change_password("demo123", "nuevo123").await.unwrap();

    service.sign_out().await;
    assert!(service.sign_in("a@x.com", "demo123").await.is_err());
    assert!(service.sign_in("a@x.com", "nuevo123").await.is_ok());
}

#[test_case(Role::Teacher, Permission::ContentGenerate, true ; "teacher generates")]
#[test_case(Role::Student, Permission::ContentGenerate, false ; "student cannot generate")]
#[test_case(Role::Student, Permission::AssistantChat, true ; "student chats")]
#[test_case(Role::Admin, Permission::UserAdmin, true ; "admin manages users")]
#[tokio::test]
async fn test_has_permission(role: Role, permission: Permission, expected: bool) {
    let service = service_with(&[SeedAccount::new("u1", "a@x.com", "demo123").role(role)]);
    assert_eq!(service.has_permission("u1", permission).await, expected);
    assert!(!service.has_permission("ghost", permission).await);
}

#[tokio::test(start_paused = true)]
async fn test_sign_in_waits_for_latency() {
    let mut config = fast_config();
    config.latency.sign_in = Latency::fixed(1000);
    let hasher = CredentialHasher::from_config(&config).unwrap();
    let directory =
        UserDirectory::with_accounts(&hasher, &[SeedAccount::new("u1", "a@x.com", "demo123")])
            .unwrap();
    let service = AuthService::new(Arc::new(directory), hasher, config);

    let start = tokio::time::Instant::now();
    service.sign_in("a@x.com", "demo123").await.unwrap();
    assert!(start.elapsed() >= std::time::Duration::from_millis(1000));
}

#[tokio::test]
async fn test_concurrent_sign_ins_notify_once_each() {
    let service = seeded_service();
    let (events, _sub) = record_events(&service);

    let a = service.clone();
    let b = service.clone();
    let (ra, rb) = tokio::join!(
        a.sign_in("profesor@henry.edu", SAMPLE_SECRET),
        b.sign_in("estudiante@henry.edu", SAMPLE_SECRET)
    );
    ra.unwrap();
    rb.unwrap();

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 3);
    let last = events.last().cloned().flatten();
    assert_eq!(service.current_user().map(|i| i.id), last);
}
