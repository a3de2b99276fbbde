//! 目录操作
//!
//! 读操作对所有人开放；创建、修改、删除与插图上传仅限审核员。

use tracing::{error, info};

use crate::config::ImageConfig;
use crate::errors::{BigOError, Result};
use crate::images::{ImageStore, generate_image_key};
use crate::models::complex_classes::{
    entities::ComplexClass,
    requests::{ComplexClassListQuery, CreateComplexClassRequest, UpdateComplexClassRequest},
    responses::{ComplexClassImageResponse, ComplexClassListResponse},
};
use crate::models::users::entities::User;
use crate::services::bigo_requests::{access::require_moderator, lifecycle};
use crate::storage::Storage;
use crate::utils::validate_magic_bytes;

/// 上传的插图
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// 小写扩展名，含点号
    pub extension: String,
    pub data: Vec<u8>,
}

fn class_not_found(id: i64) -> BigOError {
    BigOError::not_found(format!("complex class {id} not found"))
}

/// 列出目录；已登录时附带购物车概要
pub async fn list(
    storage: &dyn Storage,
    viewer: Option<&User>,
    query: ComplexClassListQuery,
) -> Result<ComplexClassListResponse> {
    let page = storage.list_complex_classes(query).await?;
    let cart = match viewer {
        Some(user) => Some(lifecycle::cart(storage, user).await?),
        None => None,
    };

    Ok(ComplexClassListResponse {
        items: page.items,
        pagination: page.pagination,
        cart,
    })
}

pub async fn get(storage: &dyn Storage, id: i64) -> Result<ComplexClass> {
    storage
        .get_complex_class_by_id(id)
        .await?
        .ok_or_else(|| class_not_found(id))
}

pub async fn create(
    storage: &dyn Storage,
    actor: &User,
    req: CreateComplexClassRequest,
) -> Result<ComplexClass> {
    require_moderator(actor)?;
    req.validate()?;
    let class = storage.create_complex_class(req).await?;
    info!("用户 {} 创建复杂度类别 {}", actor.id, class.id);
    Ok(class)
}

pub async fn update(
    storage: &dyn Storage,
    actor: &User,
    id: i64,
    patch: UpdateComplexClassRequest,
) -> Result<ComplexClass> {
    require_moderator(actor)?;
    patch.validate()?;
    storage
        .update_complex_class(id, patch)
        .await?
        .ok_or_else(|| class_not_found(id))
}

/// 软删除复杂度类别并释放其插图；插图释放失败会作为错误返回
pub async fn delete(
    storage: &dyn Storage,
    images: &dyn ImageStore,
    actor: &User,
    id: i64,
) -> Result<()> {
    require_moderator(actor)?;
    let removed = storage
        .soft_delete_complex_class(id)
        .await?
        .ok_or_else(|| class_not_found(id))?;
    info!("用户 {} 删除复杂度类别 {}", actor.id, id);

    if let Some(key) = removed.image {
        images.delete(&key).await.inspect_err(|e| {
            error!("释放复杂度类别 {} 的插图 {} 失败: {}", id, key, e);
        })?;
    }
    Ok(())
}

/// 校验上传的插图：扩展名、大小、魔术字节
pub fn check_upload(upload: &ImageUpload, config: &ImageConfig) -> Result<()> {
    if !config
        .allowed_types
        .iter()
        .any(|t| t.eq_ignore_ascii_case(&upload.extension))
    {
        return Err(BigOError::validation(format!(
            "image type {} is not allowed",
            upload.extension
        )));
    }
    if upload.data.len() > config.max_size {
        return Err(BigOError::validation(format!(
            "image exceeds {} bytes",
            config.max_size
        )));
    }
    if !validate_magic_bytes(&upload.data, &upload.extension) {
        return Err(BigOError::validation(
            "image content does not match its extension",
        ));
    }
    Ok(())
}

/// 上传插图并替换旧图
pub async fn set_image(
    storage: &dyn Storage,
    images: &dyn ImageStore,
    config: &ImageConfig,
    actor: &User,
    id: i64,
    upload: ImageUpload,
) -> Result<ComplexClassImageResponse> {
    require_moderator(actor)?;
    check_upload(&upload, config)?;
    let previous = get(storage, id).await?.image;

    let key = images
        .put(upload.data, &generate_image_key(&upload.extension))
        .await?;

    let Some(class) = storage.set_complex_class_image(id, Some(key.clone())).await? else {
        // 上传期间类别已被删除
        if let Err(e) = images.delete(&key).await {
            error!("清理孤立插图 {} 失败: {}", key, e);
        }
        return Err(class_not_found(id));
    };

    if let Some(old) = previous.filter(|old| *old != key)
        && let Err(e) = images.delete(&old).await
    {
        error!("释放复杂度类别 {} 的旧插图 {} 失败: {}", id, old, e);
    }

    info!("用户 {} 更新复杂度类别 {} 的插图", actor.id, class.id);
    Ok(ComplexClassImageResponse { id: class.id, image: key })
}

/// 读取插图
pub async fn get_image(images: &dyn ImageStore, key: &str) -> Result<Vec<u8>> {
    images
        .get(key)
        .await?
        .ok_or_else(|| BigOError::not_found(format!("image {key} not found")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ImageConfig {
        ImageConfig {
            dir: String::new(),
            max_size: 16,
            allowed_types: vec![".png".into(), ".jpg".into()],
        }
    }

    const PNG: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn accepts_matching_png() {
        let upload = ImageUpload {
            extension: ".png".into(),
            data: PNG.to_vec(),
        };
        assert!(check_upload(&upload, &config()).is_ok());
    }

    #[test]
    fn rejects_disallowed_extension() {
        let upload = ImageUpload {
            extension: ".gif".into(),
            data: b"GIF89a".to_vec(),
        };
        assert!(matches!(
            check_upload(&upload, &config()),
            Err(BigOError::Validation(_))
        ));
    }

    #[test]
    fn rejects_oversized_and_mismatched_content() {
        let mut data = PNG.to_vec();
        data.extend_from_slice(&[0u8; 16]);
        let upload = ImageUpload {
            extension: ".png".into(),
            data,
        };
        assert!(check_upload(&upload, &config()).is_err());

        let upload = ImageUpload {
            extension: ".jpg".into(),
            data: PNG.to_vec(),
        };
        assert!(check_upload(&upload, &config()).is_err());
    }
}
