use rust_bigo_request::errors::BigOError;
use rust_bigo_request::models::auth::LoginRequest;
use rust_bigo_request::models::users::{
    entities::UserRole,
    requests::{RegisterRequest, UpdateProfileRequest},
};
use rust_bigo_request::runtime::lifetime::startup::{SEED_MODERATOR_LOGIN, seed_moderator};
use rust_bigo_request::services::auth::{
    login::authenticate, profile::update_profile, register::register_user,
};
use rust_bigo_request::storage::Storage;

use crate::common;

fn register(login: &str, password: &str) -> RegisterRequest {
    RegisterRequest {
        login: login.into(),
        password: password.into(),
    }
}

#[tokio::test]
async fn registration_validates_and_rejects_duplicates() {
    let storage = common::storage().await;

    let user = register_user(&storage, register("alice", "s3cretpass"))
        .await
        .unwrap();
    assert_eq!(user.role, UserRole::User);
    assert_ne!(user.password_hash, "s3cretpass");

    let err = register_user(&storage, register("alice", "an0therpass"))
        .await
        .unwrap_err();
    assert!(matches!(err, BigOError::AlreadyExists(_)));

    let err = register_user(&storage, register("bob", "short"))
        .await
        .unwrap_err();
    assert!(matches!(err, BigOError::Validation(_)));

    let err = register_user(&storage, register("b o b", "s3cretpass"))
        .await
        .unwrap_err();
    assert!(matches!(err, BigOError::Validation(_)));
}

#[tokio::test]
async fn login_checks_the_password() {
    let storage = common::storage().await;
    register_user(&storage, register("alice", "s3cretpass"))
        .await
        .unwrap();

    let user = authenticate(
        &storage,
        &LoginRequest {
            login: "alice".into(),
            password: "s3cretpass".into(),
        },
    )
    .await
    .unwrap();
    assert_eq!(user.login, "alice");

    for (login, password) in [("alice", "wrongpass1"), ("nobody", "s3cretpass")] {
        let err = authenticate(
            &storage,
            &LoginRequest {
                login: login.into(),
                password: password.into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, BigOError::Authentication(_)));
    }
}

#[tokio::test]
async fn profile_update_changes_login_but_not_role() {
    let storage = common::storage().await;
    let alice = register_user(&storage, register("alice", "s3cretpass"))
        .await
        .unwrap();
    common::user(&storage, "taken").await;

    let updated = update_profile(
        &storage,
        &alice,
        UpdateProfileRequest {
            login: Some("alice2".into()),
            password: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.login, "alice2");
    assert_eq!(updated.role, UserRole::User);

    let err = update_profile(
        &storage,
        &alice,
        UpdateProfileRequest {
            login: Some("taken".into()),
            password: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, BigOError::AlreadyExists(_)));
}

#[tokio::test]
async fn moderator_is_seeded_only_into_an_empty_database() {
    let storage = common::storage().await;

    seed_moderator(&storage).await.unwrap();
    let seeded = storage
        .get_user_by_login(SEED_MODERATOR_LOGIN)
        .await
        .unwrap()
        .expect("seeded moderator");
    assert!(seeded.is_moderator());

    seed_moderator(&storage).await.unwrap();
    assert_eq!(storage.count_users().await.unwrap(), 1);
}
