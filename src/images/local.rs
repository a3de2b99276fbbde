use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::ImageStore;
use crate::errors::{BigOError, Result};
use crate::utils::SafeImageKey;

/// 本地磁盘图片存储
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    dir: PathBuf,
}

impl LocalImageStore {
    /// 创建存储并确保目录存在
    pub async fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            BigOError::file_operation(format!("创建图片目录 {} 失败: {e}", dir.display()))
        })?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        if !SafeImageKey::is_valid(key) {
            return Err(BigOError::validation(format!("invalid image key: {key}")));
        }
        Ok(self.dir.join(key))
    }
}

#[async_trait::async_trait]
impl ImageStore for LocalImageStore {
    async fn put(&self, data: Vec<u8>, key: &str) -> Result<String> {
        let path = self.path_for(key)?;
        tokio::fs::write(&path, data).await?;
        debug!("图片已保存: {}", path.display());
        Ok(key.to_string())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!("图片已删除: {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_get_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalImageStore::new(dir.path().join("images")).await.unwrap();

        let key = store.put(vec![1, 2, 3], "a-1.png").await.unwrap();
        assert_eq!(key, "a-1.png");
        assert_eq!(store.get("a-1.png").await.unwrap(), Some(vec![1, 2, 3]));

        store.delete("a-1.png").await.unwrap();
        assert_eq!(store.get("a-1.png").await.unwrap(), None);
        // 再次删除不是错误
        store.delete("a-1.png").await.unwrap();
    }

    #[tokio::test]
    async fn traversal_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalImageStore::new(dir.path()).await.unwrap();
        assert!(matches!(
            store.put(vec![0], "../x.png").await,
            Err(BigOError::Validation(_))
        ));
    }
}
