pub mod catalog;

use actix_multipart::Multipart;
use actix_web::{
    HttpRequest, HttpResponse, Result as ActixResult,
    http::{StatusCode, header},
    web,
};
use futures_util::TryStreamExt;
use std::path::Path;
use std::sync::Arc;

use self::catalog::ImageUpload;
use super::{current_user, respond};
use crate::config::AppConfig;
use crate::errors::{BigOError, Result};
use crate::images::ImageStore;
use crate::middlewares::RequireJWT;
use crate::models::complex_classes::requests::{
    ComplexClassListParams, CreateComplexClassRequest, UpdateComplexClassRequest,
};
use crate::models::{ApiResponse, error_response};
use crate::storage::Storage;
use crate::utils::file_magic::image_content_type;

pub struct ComplexClassService {
    storage: Option<Arc<dyn Storage>>,
}

impl ComplexClassService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub(crate) fn get_image_store(&self, request: &HttpRequest) -> Arc<dyn ImageStore> {
        request
            .app_data::<web::Data<Arc<dyn ImageStore>>>()
            .expect("ImageStore not found in app data")
            .get_ref()
            .clone()
    }

    // 目录列表（可匿名访问）
    pub async fn list_classes(
        &self,
        request: &HttpRequest,
        params: ComplexClassListParams,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        let viewer = RequireJWT::try_authenticate(request).await;
        let result = catalog::list(storage.as_ref(), viewer.as_ref(), params.into()).await;
        respond(result, StatusCode::OK, "Complex classes retrieved successfully")
    }

    pub async fn get_class(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        let result = catalog::get(storage.as_ref(), id).await;
        respond(result, StatusCode::OK, "Complex class retrieved successfully")
    }

    pub async fn create_class(
        &self,
        request: &HttpRequest,
        body: CreateComplexClassRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        let result = async {
            let user = current_user(request)?;
            catalog::create(storage.as_ref(), &user, body).await
        }
        .await;
        respond(result, StatusCode::CREATED, "Complex class created successfully")
    }

    pub async fn update_class(
        &self,
        request: &HttpRequest,
        id: i64,
        body: UpdateComplexClassRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        let result = async {
            let user = current_user(request)?;
            catalog::update(storage.as_ref(), &user, id, body).await
        }
        .await;
        respond(result, StatusCode::OK, "Complex class updated successfully")
    }

    pub async fn delete_class(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        let images = self.get_image_store(request);
        let result = async {
            let user = current_user(request)?;
            catalog::delete(storage.as_ref(), images.as_ref(), &user, id).await
        }
        .await;

        Ok(match result {
            Ok(()) => HttpResponse::Ok()
                .json(ApiResponse::success_empty("Complex class deleted successfully")),
            Err(e) => error_response(&e),
        })
    }

    // 上传插图
    pub async fn upload_image(
        &self,
        request: &HttpRequest,
        id: i64,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        let images = self.get_image_store(request);
        let config = &AppConfig::get().images;
        let result = async {
            let user = current_user(request)?;
            let upload = read_image_field(payload, config.max_size).await?;
            catalog::set_image(storage.as_ref(), images.as_ref(), config, &user, id, upload).await
        }
        .await;
        respond(result, StatusCode::OK, "Image uploaded successfully")
    }

    // 读取插图
    pub async fn get_image(&self, request: &HttpRequest, key: &str) -> ActixResult<HttpResponse> {
        let images = self.get_image_store(request);
        match catalog::get_image(images.as_ref(), key).await {
            Ok(data) => {
                let extension = Path::new(key)
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| format!(".{ext}"))
                    .unwrap_or_default();
                Ok(HttpResponse::Ok()
                    .insert_header((header::CONTENT_TYPE, image_content_type(&extension)))
                    .body(data))
            }
            Err(e) => Ok(error_response(&e)),
        }
    }
}

/// 从 multipart 请求中读取唯一的 `file` 字段
///
/// 读取过程中超过 `max_size` 即停止，不把超大文件整个读入内存。
async fn read_image_field(mut payload: Multipart, max_size: usize) -> Result<ImageUpload> {
    let mut upload: Option<ImageUpload> = None;

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| BigOError::validation(format!("invalid multipart payload: {e}")))?
    {
        let content_disposition = field.content_disposition();
        let name = content_disposition
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();
        if name != "file" {
            continue;
        }
        if upload.is_some() {
            return Err(BigOError::validation("only one image can be uploaded at a time"));
        }

        let extension = content_disposition
            .and_then(|cd| cd.get_filename())
            .and_then(|filename| Path::new(filename).extension())
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext.to_lowercase()))
            .unwrap_or_default();

        let mut data = Vec::new();
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|e| BigOError::validation(format!("failed to read upload: {e}")))?
        {
            if data.len() + chunk.len() > max_size {
                return Err(BigOError::validation(format!("image exceeds {max_size} bytes")));
            }
            data.extend_from_slice(&chunk);
        }

        upload = Some(ImageUpload { extension, data });
    }

    upload.ok_or_else(|| BigOError::validation("no file found in upload payload"))
}
