use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cache::UserCache;
use crate::client::{ReqwestTransport, Transport};
use crate::config::AppConfig;
use crate::errors::Result;

pub struct StartupContext {
    pub transport: Arc<dyn Transport>,
    pub cache: UserCache,
}

/// 创建上游传输层
fn create_transport(config: &AppConfig) -> Result<Arc<dyn Transport>> {
    let transport = ReqwestTransport::from_config(config)?;
    match config.upstream_timeout() {
        Some(timeout) => info!(
            "Upstream API at {} (timeout {:?})",
            config.upstream.base_url, timeout
        ),
        None => info!("Upstream API at {} (no timeout)", config.upstream.base_url),
    }
    Ok(Arc::new(transport))
}

/// 准备服务器启动的上下文
/// 包括上游客户端与用户缓存
pub async fn prepare_server_startup() -> Result<StartupContext> {
    // 重复安装时返回 Err，已有的提供者可以继续使用
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    let config = AppConfig::get();
    if config.upstream.base_url.starts_with("http://") && config.is_production() {
        warn!("Upstream API is reached over plain HTTP in production");
    }

    let transport = create_transport(config)?;
    let cache = UserCache::from_config(config);
    warn!(
        "User cache initialized (capacity {}, ttl {}s)",
        config.cache.max_capacity, config.cache.user_ttl
    );

    Ok(StartupContext { transport, cache })
}
