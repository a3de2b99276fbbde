use rust_bigo_request::config::ImageConfig;
use rust_bigo_request::errors::BigOError;
use rust_bigo_request::images::{ImageStore, LocalImageStore};
use rust_bigo_request::models::complex_classes::requests::{
    ComplexClassListQuery, CreateComplexClassRequest, UpdateComplexClassRequest,
};
use rust_bigo_request::services::bigo_requests::lifecycle;
use rust_bigo_request::services::comp_class_requests::line_items;
use rust_bigo_request::services::complex_classes::catalog::{self, ImageUpload};

use crate::common;

const PNG: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

fn image_config() -> ImageConfig {
    ImageConfig {
        dir: String::new(),
        max_size: 1024,
        allowed_types: vec![".png".into(), ".jpg".into()],
    }
}

fn png_upload() -> ImageUpload {
    ImageUpload {
        extension: ".png".into(),
        data: PNG.to_vec(),
    }
}

fn query(search: Option<&str>) -> ComplexClassListQuery {
    ComplexClassListQuery {
        page: 1,
        size: 20,
        search: search.map(str::to_string),
    }
}

#[tokio::test]
async fn soft_deleted_class_stays_in_existing_requests() {
    let storage = common::storage().await;
    let dir = tempfile::tempdir().unwrap();
    let images = LocalImageStore::new(dir.path()).await.unwrap();
    let alice = common::user(&storage, "alice").await;
    let moderator = common::moderator(&storage, "moder").await;
    let class = common::class(&storage, "O(n log n)", 1.0, "linearithmic").await;

    let (added, _) = line_items::add_to_draft(&storage, &alice, class.id).await.unwrap();

    catalog::delete(&storage, &images, &moderator, class.id)
        .await
        .unwrap();

    let err = catalog::get(&storage, class.id).await.unwrap_err();
    assert!(matches!(err, BigOError::NotFound(_)));
    let listed = catalog::list(&storage, None, query(None)).await.unwrap();
    assert!(listed.items.is_empty());

    let detail = lifecycle::get_single(&storage, &alice, added.request.id)
        .await
        .unwrap();
    assert_eq!(detail.items.len(), 1);
    assert_eq!(detail.items[0].complex_class_id, class.id);

    // 重复删除
    let err = catalog::delete(&storage, &images, &moderator, class.id)
        .await
        .unwrap_err();
    assert!(matches!(err, BigOError::NotFound(_)));
}

#[tokio::test]
async fn out_of_range_paging_is_clamped() {
    let storage = common::storage().await;
    for degree in 0..3 {
        common::class(&storage, "O(n^k)", degree as f64, "polynomial").await;
    }

    let listed = catalog::list(
        &storage,
        None,
        ComplexClassListQuery {
            page: 0,
            size: 500,
            search: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(listed.items.len(), 3);
    assert_eq!(listed.pagination.page, 1);
    assert_eq!(listed.pagination.page_size, 100);
    assert_eq!(listed.pagination.total, 3);

    let listed = catalog::list(
        &storage,
        None,
        ComplexClassListQuery {
            page: 2,
            size: 0,
            search: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(listed.pagination.page_size, 1);
    assert_eq!(listed.items.len(), 1);
    assert_eq!(listed.items[0].degree, 1.0);
}

#[tokio::test]
async fn search_is_case_insensitive_substring() {
    let storage = common::storage().await;
    common::class(&storage, "O(n^2)", 2.0, "Quadratic").await;
    common::class(&storage, "O(n)", 1.0, "linear").await;
    common::class(&storage, "O(2^n)", 2.5, "100% exponential").await;

    let found = catalog::list(&storage, None, query(Some("QUAD"))).await.unwrap();
    assert_eq!(found.items.len(), 1);
    assert_eq!(found.items[0].degree_text, "Quadratic");

    // 通配符按字面匹配
    let found = catalog::list(&storage, None, query(Some("%"))).await.unwrap();
    assert_eq!(found.items.len(), 1);

    let all = catalog::list(&storage, None, query(None)).await.unwrap();
    assert_eq!(all.items.len(), 3);
    assert_eq!(all.pagination.total, 3);
    assert!(all.cart.is_none());
}

#[tokio::test]
async fn list_includes_cart_for_known_viewer() {
    let storage = common::storage().await;
    let alice = common::user(&storage, "alice").await;
    let class = common::class(&storage, "O(n)", 1.0, "linear").await;
    let (added, _) = line_items::add_to_draft(&storage, &alice, class.id).await.unwrap();

    let listed = catalog::list(&storage, Some(&alice), query(None)).await.unwrap();
    let cart = listed.cart.expect("cart for authenticated viewer");
    assert_eq!(cart.request_id, Some(added.request.id));
    assert_eq!(cart.compclass_count, 1);
}

#[tokio::test]
async fn editing_requires_moderator_and_valid_degree() {
    let storage = common::storage().await;
    let alice = common::user(&storage, "alice").await;
    let moderator = common::moderator(&storage, "moder").await;

    let req = CreateComplexClassRequest {
        complexity: "O(n)".into(),
        degree: 1.0,
        degree_text: "linear".into(),
        description: "one pass".into(),
    };
    let err = catalog::create(&storage, &alice, req.clone()).await.unwrap_err();
    assert!(matches!(err, BigOError::NotAllowed(_)));

    let err = catalog::create(
        &storage,
        &moderator,
        CreateComplexClassRequest {
            degree: -1.0,
            ..req.clone()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, BigOError::Validation(_)));

    let class = catalog::create(&storage, &moderator, req).await.unwrap();
    let err = catalog::update(
        &storage,
        &moderator,
        class.id,
        UpdateComplexClassRequest {
            degree: Some(-2.0),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, BigOError::Validation(_)));

    let updated = catalog::update(
        &storage,
        &moderator,
        class.id,
        UpdateComplexClassRequest {
            degree: Some(1.5),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.degree, 1.5);
    assert_eq!(updated.degree_text, "linear");
}

#[tokio::test]
async fn new_image_replaces_and_releases_the_old_one() {
    let storage = common::storage().await;
    let dir = tempfile::tempdir().unwrap();
    let images = LocalImageStore::new(dir.path()).await.unwrap();
    let moderator = common::moderator(&storage, "moder").await;
    let class = common::class(&storage, "O(1)", 0.0, "constant").await;

    let first = catalog::set_image(
        &storage,
        &images,
        &image_config(),
        &moderator,
        class.id,
        png_upload(),
    )
    .await
    .unwrap();
    let second = catalog::set_image(
        &storage,
        &images,
        &image_config(),
        &moderator,
        class.id,
        png_upload(),
    )
    .await
    .unwrap();
    assert_ne!(first.image, second.image);

    assert!(images.get(&first.image).await.unwrap().is_none());
    assert_eq!(
        catalog::get_image(&images, &second.image).await.unwrap(),
        PNG.to_vec()
    );
    assert_eq!(
        catalog::get(&storage, class.id).await.unwrap().image.as_deref(),
        Some(second.image.as_str())
    );

    // 删除类别时释放插图
    catalog::delete(&storage, &images, &moderator, class.id)
        .await
        .unwrap();
    assert!(images.get(&second.image).await.unwrap().is_none());
}

#[tokio::test]
async fn mismatched_image_content_is_rejected() {
    let storage = common::storage().await;
    let dir = tempfile::tempdir().unwrap();
    let images = LocalImageStore::new(dir.path()).await.unwrap();
    let moderator = common::moderator(&storage, "moder").await;
    let class = common::class(&storage, "O(1)", 0.0, "constant").await;

    let err = catalog::set_image(
        &storage,
        &images,
        &image_config(),
        &moderator,
        class.id,
        ImageUpload {
            extension: ".jpg".into(),
            data: PNG.to_vec(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, BigOError::Validation(_)));
    assert!(catalog::get(&storage, class.id).await.unwrap().image.is_none());
}
