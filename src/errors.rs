//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。
//! 业务层的每个失败都对应一个具名变体，由边界层映射为 HTTP 状态码和 [`ErrorCode`]。

use std::fmt;

use actix_web::http::StatusCode;

use crate::models::ErrorCode;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_bigo_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum BigOError {
            $($variant(String),)*
        }

        impl BigOError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(BigOError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(BigOError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(BigOError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl BigOError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        BigOError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_bigo_errors! {
    DatabaseConfig("E001", "Database Configuration Error"),
    DatabaseConnection("E002", "Database Connection Error"),
    DatabaseOperation("E003", "Database Operation Error"),
    FileOperation("E004", "File Operation Error"),
    Serialization("E005", "Serialization Error"),
    ExternalService("E006", "External Service Error"),
    Authentication("E007", "Authentication Error"),
    Validation("E010", "Validation Error"),
    NotFound("E011", "Resource Not Found"),
    AlreadyExists("E012", "Resource Already Exists"),
    NotAllowed("E013", "Operation Not Allowed"),
    NoDraft("E014", "No Draft Request"),
}

impl BigOError {
    /// 是否属于内部错误（存储层、文件、外部服务等），这类错误不向客户端暴露细节
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            BigOError::DatabaseConfig(_)
                | BigOError::DatabaseConnection(_)
                | BigOError::DatabaseOperation(_)
                | BigOError::FileOperation(_)
                | BigOError::Serialization(_)
                | BigOError::ExternalService(_)
        )
    }

    /// 对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            BigOError::Validation(_) => StatusCode::BAD_REQUEST,
            BigOError::Authentication(_) => StatusCode::UNAUTHORIZED,
            BigOError::NotAllowed(_) => StatusCode::FORBIDDEN,
            BigOError::NotFound(_) | BigOError::NoDraft(_) => StatusCode::NOT_FOUND,
            BigOError::AlreadyExists(_) => StatusCode::CONFLICT,
            BigOError::ExternalService(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 对应的 API 错误码
    pub fn error_code(&self) -> ErrorCode {
        match self {
            BigOError::Validation(_) => ErrorCode::BadRequest,
            BigOError::Authentication(_) => ErrorCode::Unauthorized,
            BigOError::NotAllowed(_) => ErrorCode::NotAllowed,
            BigOError::NotFound(_) => ErrorCode::NotFound,
            BigOError::NoDraft(_) => ErrorCode::NoDraft,
            BigOError::AlreadyExists(_) => ErrorCode::AlreadyExists,
            _ => ErrorCode::InternalServerError,
        }
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for BigOError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for BigOError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for BigOError {
    fn from(err: sea_orm::DbErr) -> Self {
        BigOError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for BigOError {
    fn from(err: std::io::Error) -> Self {
        BigOError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for BigOError {
    fn from(err: serde_json::Error) -> Self {
        BigOError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for BigOError {
    fn from(err: chrono::ParseError) -> Self {
        BigOError::Validation(format!("invalid date: {err}"))
    }
}

impl From<reqwest::Error> for BigOError {
    fn from(err: reqwest::Error) -> Self {
        BigOError::ExternalService(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BigOError>;
