//! 复杂度类别插图存储
//!
//! 业务层只通过 [`ImageStore`] 访问图片，键由调用方生成，实现负责持久化。

mod local;

pub use local::LocalImageStore;

use crate::errors::Result;

#[async_trait::async_trait]
pub trait ImageStore: Send + Sync {
    /// 以 `key` 保存图片，返回实际使用的键
    async fn put(&self, data: Vec<u8>, key: &str) -> Result<String>;
    /// 读取图片，不存在时返回 None
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
    /// 删除图片；键不存在视为成功
    async fn delete(&self, key: &str) -> Result<()>;
}

/// 生成新的图片键，保留原扩展名（含点号，小写）
pub fn generate_image_key(extension: &str) -> String {
    format!(
        "{}-{}{}",
        chrono::Utc::now().timestamp(),
        uuid::Uuid::new_v4().simple(),
        extension.to_lowercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::SafeImageKey;

    #[test]
    fn generated_keys_are_safe_and_unique() {
        let a = generate_image_key(".PNG");
        let b = generate_image_key(".PNG");
        assert_ne!(a, b);
        assert!(a.ends_with(".png"));
        assert!(SafeImageKey::is_valid(&a));
    }
}
