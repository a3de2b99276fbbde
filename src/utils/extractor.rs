//! 路径参数提取器
//!
//! 在进入业务逻辑之前校验路径参数，非法参数直接返回 400 与统一的 JSON 错误。

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn bad_request(message: String) -> actix_web::Error {
    let response =
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, &message));
    InternalError::from_response(message, response).into()
}

fn parse_positive_id(req: &HttpRequest, name: &str) -> Result<i64, actix_web::Error> {
    let raw = req
        .match_info()
        .get(name)
        .ok_or_else(|| bad_request(format!("Missing path parameter: {name}")))?;
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(bad_request(format!(
            "Invalid {name}: must be a positive integer"
        ))),
    }
}

/// 定义从单个路径参数提取正整数 ID 的提取器
macro_rules! define_safe_id_extractor {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name(pub i64);

        impl FromRequest for $name {
            type Error = actix_web::Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                ready(parse_positive_id(req, $param).map($name))
            }
        }
    };
}

define_safe_id_extractor!(SafeIDI64, "id");
define_safe_id_extractor!(SafeComplexClassIdI64, "class_id");

/// `/requests/{request_id}/items/{class_id}` 形式的明细路径
#[derive(Debug, Clone, Copy)]
pub struct SafeRequestItemPath {
    pub request_id: i64,
    pub class_id: i64,
}

impl FromRequest for SafeRequestItemPath {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = parse_positive_id(req, "request_id").and_then(|request_id| {
            parse_positive_id(req, "class_id").map(|class_id| SafeRequestItemPath {
                request_id,
                class_id,
            })
        });
        ready(result)
    }
}

/// 图片存储键：只允许字母、数字、`-`、`_` 以及一个扩展名点号，防止路径穿越
#[derive(Debug, Clone)]
pub struct SafeImageKey(pub String);

impl SafeImageKey {
    pub fn is_valid(key: &str) -> bool {
        !key.is_empty()
            && key.len() <= 128
            && !key.starts_with('.')
            && key.matches('.').count() <= 1
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    }
}

impl FromRequest for SafeImageKey {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = match req.match_info().get("key") {
            Some(key) if Self::is_valid(key) => Ok(SafeImageKey(key.to_string())),
            _ => Err(bad_request("Invalid image key".to_string())),
        };
        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn positive_id_is_extracted() {
        let req = TestRequest::default().param("id", "42").to_http_request();
        let id = SafeIDI64::extract(&req).await.unwrap();
        assert_eq!(id.0, 42);
    }

    #[actix_web::test]
    async fn non_positive_or_garbage_id_is_rejected() {
        for raw in ["0", "-3", "abc", "1.5"] {
            let req = TestRequest::default().param("id", raw).to_http_request();
            assert!(SafeIDI64::extract(&req).await.is_err(), "{raw}");
        }
    }

    #[actix_web::test]
    async fn item_path_needs_both_ids() {
        let req = TestRequest::default()
            .param("request_id", "7")
            .param("class_id", "3")
            .to_http_request();
        let path = SafeRequestItemPath::extract(&req).await.unwrap();
        assert_eq!((path.request_id, path.class_id), (7, 3));

        let req = TestRequest::default()
            .param("request_id", "7")
            .to_http_request();
        assert!(SafeRequestItemPath::extract(&req).await.is_err());
    }

    #[test]
    fn image_keys_cannot_escape_the_directory() {
        assert!(SafeImageKey::is_valid("3f2a-11aa_b.png"));
        assert!(!SafeImageKey::is_valid("../etc/passwd"));
        assert!(!SafeImageKey::is_valid("a/b.png"));
        assert!(!SafeImageKey::is_valid(".hidden"));
        assert!(!SafeImageKey::is_valid("a.tar.gz"));
        assert!(!SafeImageKey::is_valid(""));
    }
}
