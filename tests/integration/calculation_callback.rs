use rust_bigo_request::errors::BigOError;
use rust_bigo_request::models::bigo_requests::{
    entities::BigORequestStatus, requests::CalculationCallbackRequest,
};
use rust_bigo_request::services::bigo_requests::lifecycle;

use crate::common;

const KEY: &str = "shared-secret";

fn callback(success: bool, auth_key: &str) -> CalculationCallbackRequest {
    CalculationCallbackRequest {
        calculated_time: 42.5,
        calculated_complexity: "O(n^2)".into(),
        success,
        auth_key: auth_key.into(),
    }
}

#[tokio::test]
async fn callback_requires_the_shared_key() {
    let storage = common::storage().await;
    let alice = common::user(&storage, "alice").await;
    let class = common::class(&storage, "O(n)", 1.0, "linear").await;
    let id = common::formed_request(&storage, &alice, class.id).await;

    let err = lifecycle::apply_calculation(&storage, id, callback(true, "wrong"), KEY)
        .await
        .unwrap_err();
    assert!(matches!(err, BigOError::Authentication(_)));

    // 未配置密钥时拒绝所有回调
    let err = lifecycle::apply_calculation(&storage, id, callback(true, ""), "")
        .await
        .unwrap_err();
    assert!(matches!(err, BigOError::Authentication(_)));
}

#[tokio::test]
async fn callback_only_applies_to_finished_requests() {
    let storage = common::storage().await;
    let alice = common::user(&storage, "alice").await;
    let moderator = common::moderator(&storage, "moder").await;
    let class = common::class(&storage, "O(n)", 1.0, "linear").await;
    let id = common::formed_request(&storage, &alice, class.id).await;

    let err = lifecycle::apply_calculation(&storage, id, callback(true, KEY), KEY)
        .await
        .unwrap_err();
    assert!(matches!(err, BigOError::NotAllowed(_)));

    let err = lifecycle::apply_calculation(&storage, 999, callback(true, KEY), KEY)
        .await
        .unwrap_err();
    assert!(matches!(err, BigOError::NotFound(_)));

    lifecycle::finish(&storage, &moderator, id, BigORequestStatus::Finished)
        .await
        .unwrap();
    let updated = lifecycle::apply_calculation(&storage, id, callback(true, KEY), KEY)
        .await
        .unwrap();
    assert_eq!(updated.status, BigORequestStatus::Finished);
    assert_eq!(updated.calculated_time, 42.5);
    assert_eq!(updated.calculated_complexity, "O(n^2)");
}

#[tokio::test]
async fn failed_calculation_rejects_the_request() {
    let storage = common::storage().await;
    let alice = common::user(&storage, "alice").await;
    let moderator = common::moderator(&storage, "moder").await;
    let class = common::class(&storage, "O(n)", 1.0, "linear").await;
    let id = common::formed_request(&storage, &alice, class.id).await;

    lifecycle::finish(&storage, &moderator, id, BigORequestStatus::Finished)
        .await
        .unwrap();
    let updated = lifecycle::apply_calculation(&storage, id, callback(false, KEY), KEY)
        .await
        .unwrap();
    assert_eq!(updated.status, BigORequestStatus::Rejected);

    // 驳回后不再接受结果
    let err = lifecycle::apply_calculation(&storage, id, callback(true, KEY), KEY)
        .await
        .unwrap_err();
    assert!(matches!(err, BigOError::NotAllowed(_)));
}
