use crate::config::AppConfig;
use crate::errors::Result;
use crate::images::{ImageStore, LocalImageStore};
use crate::models::users::entities::UserRole;
use crate::models::users::requests::CreateUserRequest;
use crate::storage::Storage;
use crate::utils::password::hash_password;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 初始审核员账号的登录名
pub const SEED_MODERATOR_LOGIN: &str = "moderator";

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub images: Arc<dyn ImageStore>,
}

/// 生成随机密码
fn generate_random_password(length: usize) -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();
    let mut password: String = (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect();
    // 保证满足密码策略（至少一个字母和一个数字）
    password.push('a');
    password.push('1');
    password
}

/// 初始化默认审核员账号
/// 如果数据库中没有任何用户，则创建一个审核员账号
pub async fn seed_moderator(storage: &dyn Storage) -> Result<()> {
    let count = storage.count_users().await?;
    if count > 0 {
        debug!(
            "Database already has {} user(s), skipping moderator seed",
            count
        );
        return Ok(());
    }
    info!("No users found in database, creating default moderator account...");

    // 获取密码：优先从环境变量，否则生成随机密码
    let password = std::env::var("MODERATOR_PASSWORD").unwrap_or_else(|_| {
        let pwd = generate_random_password(16);
        warn!("==========================================================");
        warn!("  MODERATOR PASSWORD NOT SET - USING GENERATED PASSWORD");
        warn!("  Generated moderator password: {}", pwd);
        warn!("  Please save this password or set MODERATOR_PASSWORD env var");
        warn!("==========================================================");
        pwd
    });

    let user = storage
        .create_user(CreateUserRequest {
            login: SEED_MODERATOR_LOGIN.to_string(),
            password_hash: hash_password(&password)?,
            role: UserRole::Moderator,
        })
        .await?;

    info!(
        "Default moderator account created successfully (ID: {}, login: {})",
        user.id, user.login
    );
    Ok(())
}

/// 准备服务器启动的上下文
/// 包括存储与图片存储
pub async fn prepare_server_startup() -> Result<StartupContext> {
    // 可能已由其他组件安装
    let _ = rustls::crypto::ring::default_provider().install_default();

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    // 初始化默认审核员账号（如果需要）
    if let Err(e) = seed_moderator(storage.as_ref()).await {
        warn!("Failed to seed moderator account: {}", e);
    }

    let config = AppConfig::get();
    let images: Arc<dyn ImageStore> = Arc::new(LocalImageStore::new(&config.images.dir).await?);
    warn!("Image store initialized at {}", config.images.dir);

    if config.calculator_enabled() {
        warn!("External calculator enabled: {}", config.calculator.url);
    } else {
        debug!("External calculator disabled");
    }

    Ok(StartupContext { storage, images })
}
