use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::api::identity::IdentityCodec;
use crate::api::services::AppState;
use crate::config::StaticConfig;
use crate::services::Encoder;
use crate::storage::{StorageFactory, UrlStorage};

pub struct StartupContext {
    pub storage: Arc<dyn UrlStorage>,
    pub state: AppState,
    pub identity: Arc<IdentityCodec>,
}

/// 准备服务器启动的上下文
/// 包括存储后端、编码服务和身份签名
pub async fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    config.validate().context("Invalid configuration")?;

    let storage = StorageFactory::create(&config.storage)
        .await
        .context("Failed to create storage backend")?;

    let encoder = Encoder::new(storage.clone())
        .with_code_length(config.storage.code_length)
        .with_max_attempts(config.storage.max_attempts);

    let identity = Arc::new(IdentityCodec::from_config(&config.identity));
    let state = AppState::new(encoder, config.server.base_url.clone());

    info!(
        "Pre-startup completed in {:.2}ms (backend: {})",
        start_time.elapsed().as_secs_f64() * 1000.0,
        storage.backend_name()
    );

    Ok(StartupContext {
        storage,
        state,
        identity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_prepare_with_defaults_uses_memory() {
        let mut config = StaticConfig::default();
        config.identity.secret = Some("test-secret".to_string());

        let ctx = prepare_server_startup(&config).await.unwrap();
        assert_eq!(ctx.storage.backend_name(), "memory");
        assert_eq!(ctx.state.base_url, "http://localhost:8080");
    }

    #[tokio::test]
    async fn test_prepare_rejects_invalid_config() {
        let mut config = StaticConfig::default();
        config.storage.code_length = 0;
        assert!(prepare_server_startup(&config).await.is_err());
    }
}
