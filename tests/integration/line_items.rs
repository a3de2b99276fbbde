use rust_bigo_request::errors::BigOError;
use rust_bigo_request::models::comp_class_requests::{
    entities::DEFAULT_ARRAY_SIZE, requests::UpdateRequestItemRequest,
};
use rust_bigo_request::services::bigo_requests::lifecycle;
use rust_bigo_request::services::comp_class_requests::line_items;
use rust_bigo_request::storage::Storage;

use crate::common;

#[tokio::test]
async fn duplicate_add_is_rejected_without_side_effects() {
    let storage = common::storage().await;
    let alice = common::user(&storage, "alice").await;
    let class = common::class(&storage, "O(n)", 1.0, "linear").await;

    let (added, _) = line_items::add_to_draft(&storage, &alice, class.id).await.unwrap();
    let id = added.request.id;

    let err = line_items::add_to_draft(&storage, &alice, class.id)
        .await
        .unwrap_err();
    assert!(matches!(err, BigOError::AlreadyExists(_)));
    let err = line_items::add(&storage, &alice, id, class.id).await.unwrap_err();
    assert!(matches!(err, BigOError::AlreadyExists(_)));

    assert_eq!(storage.count_request_items(id).await.unwrap(), 1);
}

#[tokio::test]
async fn new_items_use_the_default_array_size() {
    let storage = common::storage().await;
    let alice = common::user(&storage, "alice").await;
    let class = common::class(&storage, "O(n)", 1.0, "linear").await;

    let (added, _) = line_items::add_to_draft(&storage, &alice, class.id).await.unwrap();
    let items = storage.list_request_items(added.request.id).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].array_size, DEFAULT_ARRAY_SIZE);
    assert_eq!(items[0].complexity, "O(n)");
}

#[tokio::test]
async fn unknown_or_deleted_classes_cannot_be_added() {
    let storage = common::storage().await;
    let alice = common::user(&storage, "alice").await;
    let class = common::class(&storage, "O(n)", 1.0, "linear").await;

    let err = line_items::add_to_draft(&storage, &alice, 999).await.unwrap_err();
    assert!(matches!(err, BigOError::NotFound(_)));
    // 类别不存在时不创建草稿
    assert!(storage.find_draft_request(alice.id).await.unwrap().is_none());

    storage.soft_delete_complex_class(class.id).await.unwrap();
    let err = line_items::add_to_draft(&storage, &alice, class.id)
        .await
        .unwrap_err();
    assert!(matches!(err, BigOError::NotFound(_)));
}

#[tokio::test]
async fn remove_and_edit_missing_pairing_is_not_found() {
    let storage = common::storage().await;
    let alice = common::user(&storage, "alice").await;
    let linear = common::class(&storage, "O(n)", 1.0, "linear").await;
    let cubic = common::class(&storage, "O(n^3)", 3.0, "cubic").await;

    let (added, _) = line_items::add_to_draft(&storage, &alice, linear.id).await.unwrap();
    let id = added.request.id;

    let err = line_items::remove(&storage, &alice, id, cubic.id).await.unwrap_err();
    assert!(matches!(err, BigOError::NotFound(_)));
    let err = line_items::edit(
        &storage,
        &alice,
        id,
        cubic.id,
        UpdateRequestItemRequest { array_size: 3 },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, BigOError::NotFound(_)));

    line_items::remove(&storage, &alice, id, linear.id).await.unwrap();
    assert_eq!(storage.count_request_items(id).await.unwrap(), 0);

    let err = line_items::remove(&storage, &alice, id, linear.id).await.unwrap_err();
    assert!(matches!(err, BigOError::NotFound(_)));
}

#[tokio::test]
async fn negative_array_size_is_a_validation_error() {
    let storage = common::storage().await;
    let alice = common::user(&storage, "alice").await;
    let class = common::class(&storage, "O(n)", 1.0, "linear").await;
    let (added, _) = line_items::add_to_draft(&storage, &alice, class.id).await.unwrap();

    let err = line_items::edit(
        &storage,
        &alice,
        added.request.id,
        class.id,
        UpdateRequestItemRequest { array_size: -5 },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, BigOError::Validation(_)));
}

#[tokio::test]
async fn only_the_owner_edits_only_drafts() {
    let storage = common::storage().await;
    let alice = common::user(&storage, "alice").await;
    let mallory = common::user(&storage, "mallory").await;
    let linear = common::class(&storage, "O(n)", 1.0, "linear").await;
    let cubic = common::class(&storage, "O(n^3)", 3.0, "cubic").await;

    let (added, _) = line_items::add_to_draft(&storage, &alice, linear.id).await.unwrap();
    let id = added.request.id;

    let err = line_items::add(&storage, &mallory, id, cubic.id).await.unwrap_err();
    assert!(matches!(err, BigOError::NotAllowed(_)));
    let err = line_items::remove(&storage, &mallory, id, linear.id)
        .await
        .unwrap_err();
    assert!(matches!(err, BigOError::NotAllowed(_)));

    lifecycle::form(&storage, &alice, id).await.unwrap();

    let err = line_items::add(&storage, &alice, id, cubic.id).await.unwrap_err();
    assert!(matches!(err, BigOError::NotAllowed(_)));
    let err = line_items::remove(&storage, &alice, id, linear.id).await.unwrap_err();
    assert!(matches!(err, BigOError::NotAllowed(_)));
    assert_eq!(storage.count_request_items(id).await.unwrap(), 1);

    // 已删除的请求视为不存在
    lifecycle::delete(&storage, &alice, id).await.unwrap();
    let err = line_items::add(&storage, &alice, id, cubic.id).await.unwrap_err();
    assert!(matches!(err, BigOError::NotFound(_)));
}
