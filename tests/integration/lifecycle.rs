use rust_bigo_request::entity::bigo_requests;
use rust_bigo_request::errors::BigOError;
use rust_bigo_request::models::bigo_requests::{
    entities::BigORequestStatus,
    requests::{BigORequestListParams, BigORequestListQuery, UpdateBigORequestRequest},
};
use rust_bigo_request::models::comp_class_requests::requests::UpdateRequestItemRequest;
use rust_bigo_request::services::bigo_requests::lifecycle;
use rust_bigo_request::services::comp_class_requests::line_items;
use rust_bigo_request::storage::Storage;
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, Set};

use crate::common;

#[tokio::test]
async fn each_user_has_at_most_one_draft() {
    let storage = common::storage().await;
    let alice = common::user(&storage, "alice").await;
    let bob = common::user(&storage, "bob").await;

    let first = lifecycle::get_or_create_draft(&storage, &alice).await.unwrap();
    let second = lifecycle::get_or_create_draft(&storage, &alice).await.unwrap();
    assert!(first.created);
    assert!(!second.created);
    assert_eq!(first.request.id, second.request.id);

    let other = lifecycle::get_or_create_draft(&storage, &bob).await.unwrap();
    assert!(other.created);
    assert_ne!(other.request.id, first.request.id);

    // 提交后可以再开新草稿
    lifecycle::form(&storage, &alice, first.request.id).await.unwrap();
    let next = lifecycle::get_or_create_draft(&storage, &alice).await.unwrap();
    assert!(next.created);
    assert_ne!(next.request.id, first.request.id);
}

#[tokio::test]
async fn second_draft_row_violates_unique_index() {
    let storage = common::storage().await;
    let alice = common::user(&storage, "alice").await;

    lifecycle::get_or_create_draft(&storage, &alice).await.unwrap();

    let duplicate = bigo_requests::ActiveModel {
        status: Set(BigORequestStatus::DRAFT.to_string()),
        created_at: Set(chrono::Utc::now().timestamp()),
        creator_id: Set(alice.id),
        calculated_time: Set(0.0),
        calculated_complexity: Set(String::new()),
        ..Default::default()
    };
    assert!(duplicate.insert(storage.connection()).await.is_err());

    // 非草稿状态不受约束
    let formed = bigo_requests::ActiveModel {
        status: Set(BigORequestStatus::FORMED.to_string()),
        created_at: Set(chrono::Utc::now().timestamp()),
        creator_id: Set(alice.id),
        calculated_time: Set(0.0),
        calculated_complexity: Set(String::new()),
        ..Default::default()
    };
    assert!(formed.insert(storage.connection()).await.is_ok());
}

#[tokio::test]
async fn concurrent_draft_creation_yields_one_draft() {
    let storage = common::storage().await;
    let alice = common::user(&storage, "alice").await;

    let (first, second) = tokio::join!(
        lifecycle::get_or_create_draft(&storage, &alice),
        lifecycle::get_or_create_draft(&storage, &alice),
    );
    let (first, second) = (first.unwrap(), second.unwrap());

    assert_eq!(first.request.id, second.request.id);
    assert_eq!([first.created, second.created].iter().filter(|c| **c).count(), 1);

    let draft = storage.find_draft_request(alice.id).await.unwrap().unwrap();
    assert_eq!(draft.id, first.request.id);
}

#[tokio::test]
async fn finishing_computes_total_and_label() {
    let storage = common::storage().await;
    let alice = common::user(&storage, "alice").await;
    let moderator = common::moderator(&storage, "moder").await;
    let quadratic = common::class(&storage, "O(n^2)", 2.0, "quadratic").await;
    let constant = common::class(&storage, "O(1)", 0.0, "constant").await;

    let (added, created) = line_items::add_to_draft(&storage, &alice, quadratic.id)
        .await
        .unwrap();
    assert!(created);
    let request_id = added.request.id;
    let (added, created) = line_items::add_to_draft(&storage, &alice, constant.id)
        .await
        .unwrap();
    assert!(!created);
    assert_eq!(added.compclass_count, 2);

    line_items::edit(
        &storage,
        &alice,
        request_id,
        quadratic.id,
        UpdateRequestItemRequest { array_size: 10 },
    )
    .await
    .unwrap();
    line_items::edit(
        &storage,
        &alice,
        request_id,
        constant.id,
        UpdateRequestItemRequest { array_size: 5 },
    )
    .await
    .unwrap();

    lifecycle::form(&storage, &alice, request_id).await.unwrap();
    let outcome = lifecycle::finish(&storage, &moderator, request_id, BigORequestStatus::Finished)
        .await
        .unwrap();

    assert_eq!(outcome.request.status, BigORequestStatus::Finished);
    assert_eq!(outcome.request.calculated_time, 101.0);
    assert_eq!(outcome.request.calculated_complexity, "O(n^2)");
    assert_eq!(outcome.request.moderator_id, Some(moderator.id));
    assert!(outcome.request.finished_at.is_some());

    let payload = outcome.payload.expect("payload for finished request");
    assert_eq!(payload.request_id, request_id);
    assert_eq!(payload.compclasses.len(), 2);

    let detail = lifecycle::get_single(&storage, &alice, request_id).await.unwrap();
    assert_eq!(detail.request.creator_login, "alice");
    assert_eq!(detail.request.moderator_login.as_deref(), Some("moder"));
    assert_eq!(detail.items.len(), 2);
}

#[tokio::test]
async fn transitions_outside_the_table_are_rejected() {
    let storage = common::storage().await;
    let alice = common::user(&storage, "alice").await;
    let moderator = common::moderator(&storage, "moder").await;
    let class = common::class(&storage, "O(n)", 1.0, "linear").await;

    let draft = lifecycle::get_or_create_draft(&storage, &alice).await.unwrap();
    let id = draft.request.id;

    // 草稿不能直接完成
    let err = lifecycle::finish(&storage, &moderator, id, BigORequestStatus::Finished)
        .await
        .unwrap_err();
    assert!(matches!(err, BigOError::NotAllowed(_)));

    line_items::add(&storage, &alice, id, class.id).await.unwrap();
    lifecycle::form(&storage, &alice, id).await.unwrap();

    // 重复提交
    let err = lifecycle::form(&storage, &alice, id).await.unwrap_err();
    assert!(matches!(err, BigOError::NotAllowed(_)));

    // 完成目标只能是 finished 或 rejected
    let err = lifecycle::finish(&storage, &moderator, id, BigORequestStatus::Draft)
        .await
        .unwrap_err();
    assert!(matches!(err, BigOError::Validation(_)));

    let deleted = lifecycle::delete(&storage, &alice, id).await.unwrap();
    assert_eq!(deleted.status, BigORequestStatus::Deleted);

    for err in [
        lifecycle::form(&storage, &alice, id).await.unwrap_err(),
        lifecycle::delete(&storage, &alice, id).await.unwrap_err(),
        lifecycle::finish(&storage, &moderator, id, BigORequestStatus::Rejected)
            .await
            .unwrap_err(),
    ] {
        assert!(matches!(err, BigOError::NotAllowed(_)), "{err}");
    }

    let err = lifecycle::edit(
        &storage,
        &alice,
        id,
        UpdateBigORequestRequest {
            calculated_time: Some(1.0),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, BigOError::NotFound(_)));
}

#[tokio::test]
async fn finished_request_cannot_be_finished_again() {
    let storage = common::storage().await;
    let alice = common::user(&storage, "alice").await;
    let moderator = common::moderator(&storage, "moder").await;
    let class = common::class(&storage, "O(n)", 1.0, "linear").await;
    let id = common::formed_request(&storage, &alice, class.id).await;

    lifecycle::finish(&storage, &moderator, id, BigORequestStatus::Finished)
        .await
        .unwrap();

    for target in [BigORequestStatus::Rejected, BigORequestStatus::Finished] {
        let err = lifecycle::finish(&storage, &moderator, id, target)
            .await
            .unwrap_err();
        assert!(matches!(err, BigOError::NotAllowed(_)));
    }

    let request = storage.get_bigo_request_by_id(id).await.unwrap().unwrap();
    assert_eq!(request.status, BigORequestStatus::Finished);
}

#[tokio::test]
async fn rejected_request_is_terminal() {
    let storage = common::storage().await;
    let alice = common::user(&storage, "alice").await;
    let moderator = common::moderator(&storage, "moder").await;
    let class = common::class(&storage, "O(n)", 1.0, "linear").await;
    let id = common::formed_request(&storage, &alice, class.id).await;

    let rejected = lifecycle::finish(&storage, &moderator, id, BigORequestStatus::Rejected)
        .await
        .unwrap();
    assert_eq!(rejected.request.status, BigORequestStatus::Rejected);
    assert!(rejected.payload.is_none());

    let err = lifecycle::finish(&storage, &moderator, id, BigORequestStatus::Finished)
        .await
        .unwrap_err();
    assert!(matches!(err, BigOError::NotAllowed(_)));
    let err = lifecycle::delete(&storage, &alice, id).await.unwrap_err();
    assert!(matches!(err, BigOError::NotAllowed(_)));
}

#[tokio::test]
async fn only_moderators_finish() {
    let storage = common::storage().await;
    let alice = common::user(&storage, "alice").await;
    let moderator = common::moderator(&storage, "moder").await;
    let class = common::class(&storage, "O(n)", 1.0, "linear").await;

    let formed = common::formed_request(&storage, &alice, class.id).await;
    let finished = common::formed_request(&storage, &alice, class.id).await;
    lifecycle::finish(&storage, &moderator, finished, BigORequestStatus::Finished)
        .await
        .unwrap();
    let (added, _) = line_items::add_to_draft(&storage, &alice, class.id)
        .await
        .unwrap();
    let draft = added.request.id;

    for (id, status) in [
        (draft, BigORequestStatus::Draft),
        (formed, BigORequestStatus::Formed),
        (finished, BigORequestStatus::Finished),
    ] {
        for target in [BigORequestStatus::Finished, BigORequestStatus::Rejected] {
            let err = lifecycle::finish(&storage, &alice, id, target)
                .await
                .unwrap_err();
            assert!(matches!(err, BigOError::NotAllowed(_)));
        }

        let request = storage.get_bigo_request_by_id(id).await.unwrap().unwrap();
        assert_eq!(request.status, status);
    }
}

#[tokio::test]
async fn strangers_cannot_touch_foreign_requests() {
    let storage = common::storage().await;
    let alice = common::user(&storage, "alice").await;
    let mallory = common::user(&storage, "mallory").await;
    let moderator = common::moderator(&storage, "moder").await;
    let class = common::class(&storage, "O(n)", 1.0, "linear").await;
    let id = common::formed_request(&storage, &alice, class.id).await;

    let err = lifecycle::get_single(&storage, &mallory, id).await.unwrap_err();
    assert!(matches!(err, BigOError::NotAllowed(_)));
    let err = lifecycle::delete(&storage, &mallory, id).await.unwrap_err();
    assert!(matches!(err, BigOError::NotAllowed(_)));

    // 审核员可以查看任何请求
    assert!(lifecycle::get_single(&storage, &moderator, id).await.is_ok());

    let own = lifecycle::list(&storage, &mallory, BigORequestListQuery::default())
        .await
        .unwrap();
    assert!(own.is_empty());
    let all = lifecycle::list(&storage, &moderator, BigORequestListQuery::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn list_filters_by_inclusive_date_range() {
    let storage = common::storage().await;
    let alice = common::user(&storage, "alice").await;
    let class = common::class(&storage, "O(n)", 1.0, "linear").await;

    let january = common::formed_request(&storage, &alice, class.id).await;
    let march = common::formed_request(&storage, &alice, class.id).await;
    // 草稿不会出现在列表中
    lifecycle::get_or_create_draft(&storage, &alice).await.unwrap();

    for (id, created_at) in [
        // 2024-01-31T23:59:59Z
        (january, 1_706_745_599_i64),
        // 2024-03-01T00:00:00Z
        (march, 1_709_251_200_i64),
    ] {
        let model = bigo_requests::Entity::find_by_id(id)
            .one(storage.connection())
            .await
            .unwrap()
            .unwrap();
        let mut active = model.into_active_model();
        active.created_at = Set(created_at);
        active.update(storage.connection()).await.unwrap();
    }

    let query = BigORequestListQuery::try_from(BigORequestListParams {
        from_date: Some("2024-01-01".into()),
        to_date: Some("2024-01-31".into()),
        status: None,
    })
    .unwrap();
    let listed = lifecycle::list(&storage, &alice, query).await.unwrap();
    assert_eq!(listed.iter().map(|r| r.id).collect::<Vec<_>>(), vec![january]);

    let all = lifecycle::list(&storage, &alice, BigORequestListQuery::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    let finished_only = lifecycle::list(
        &storage,
        &alice,
        BigORequestListQuery {
            status: Some(BigORequestStatus::Finished),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(finished_only.is_empty());
}

#[tokio::test]
async fn cart_reports_draft_and_count() {
    let storage = common::storage().await;
    let alice = common::user(&storage, "alice").await;
    let class = common::class(&storage, "O(n)", 1.0, "linear").await;

    let empty = lifecycle::cart(&storage, &alice).await.unwrap();
    assert_eq!(empty.request_id, None);
    assert_eq!(empty.compclass_count, 0);
    assert_eq!(line_items::count(&storage, &alice).await.unwrap(), 0);
    let err = lifecycle::current_draft(&storage, &alice).await.unwrap_err();
    assert!(matches!(err, BigOError::NoDraft(_)));

    let (added, _) = line_items::add_to_draft(&storage, &alice, class.id).await.unwrap();
    let cart = lifecycle::cart(&storage, &alice).await.unwrap();
    assert_eq!(cart.request_id, Some(added.request.id));
    assert_eq!(cart.compclass_count, 1);
    assert_eq!(line_items::count(&storage, &alice).await.unwrap(), 1);

    let draft = lifecycle::current_draft(&storage, &alice).await.unwrap();
    assert_eq!(draft.request.id, added.request.id);
    assert_eq!(draft.items.len(), 1);
}
