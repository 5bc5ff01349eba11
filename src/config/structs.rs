use serde::{Deserialize, Serialize};

use super::args::Cli;
use crate::errors::{Result, SnaplinkError};

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 环境变量前缀，示例：SNAPLINK__SERVER__ADDRESS=:9090
pub const ENV_PREFIX: &str = "SNAPLINK";

/// 与 short_urls.short_url 列宽一致
pub const MAX_CODE_LENGTH: usize = 32;

/// 静态配置（启动时加载一次）
///
/// 优先级：命令行参数 > ENV > config.toml > 默认值
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和 `SNAPLINK__*` 环境变量加载配置
    ///
    /// `path` 为 None 时读取 `config.toml`，文件不存在时使用默认值。
    pub fn load(path: Option<&str>) -> Result<Self> {
        use config::{Config, Environment, File};

        let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| SnaplinkError::config(format!("Failed to read {}: {}", path, e)))?;

        let config = settings
            .try_deserialize::<StaticConfig>()
            .map_err(|e| SnaplinkError::config(format!("Invalid configuration: {}", e)))?;

        if std::path::Path::new(path).exists() {
            eprintln!("[INFO] Configuration loaded from: {}", path);
        }
        Ok(config)
    }

    /// 用命令行参数（及其对应的环境变量）覆盖配置
    pub fn apply_args(&mut self, args: &Cli) {
        if let Some(address) = &args.address {
            self.server.address = address.clone();
        }
        if let Some(base_url) = &args.base_url {
            self.server.base_url = base_url.clone();
        }
        if let Some(file_path) = &args.file_storage_path {
            self.storage.file_path = Some(file_path.clone());
        }
        if let Some(dsn) = &args.database_dsn {
            self.storage.database_dsn = Some(dsn.clone());
        }
    }

    /// 检查取值是否可用
    pub fn validate(&self) -> Result<()> {
        if self.server.address.trim().is_empty() {
            return Err(SnaplinkError::config("server.address must not be empty"));
        }
        if !(1..=MAX_CODE_LENGTH).contains(&self.storage.code_length) {
            return Err(SnaplinkError::config(format!(
                "storage.code_length must be between 1 and {}",
                MAX_CODE_LENGTH
            )));
        }
        if self.storage.max_attempts == 0 {
            return Err(SnaplinkError::config("storage.max_attempts must be at least 1"));
        }
        if self.identity.cookie_name.trim().is_empty() {
            return Err(SnaplinkError::config("identity.cookie_name must not be empty"));
        }
        if self.identity.max_age_days <= 0 {
            return Err(SnaplinkError::config("identity.max_age_days must be positive"));
        }
        Ok(())
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// `host:port`；以 `:` 开头时监听所有地址
    #[serde(default = "default_server_address")]
    pub address: String,
    /// 短链接前缀；为空时使用请求的 Host
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_workers")]
    pub workers: usize,
}

impl ServerConfig {
    /// 可直接传给 `HttpServer::bind` 的地址
    pub fn listen_addr(&self) -> String {
        let address = self.address.trim();
        if address.starts_with(':') {
            format!("0.0.0.0{}", address)
        } else {
            address.to_string()
        }
    }
}

/// 存储配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub database_dsn: Option<String>,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
    #[serde(default = "default_code_length")]
    pub code_length: usize,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

/// 访客身份 Cookie 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// HS256 签名密钥；为空时启动时随机生成
    #[serde(default)]
    pub secret: Option<String>,
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    #[serde(default = "default_max_age_days")]
    pub max_age_days: i64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions
// ============================================================

fn default_server_address() -> String {
    ":8080".to_string()
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_workers() -> usize {
    num_cpus::get()
}

fn default_pool_size() -> u32 {
    10
}

fn default_code_length() -> usize {
    crate::utils::DEFAULT_CODE_LENGTH
}

fn default_max_attempts() -> u32 {
    crate::services::DEFAULT_MAX_ATTEMPTS
}

fn default_cookie_name() -> String {
    "Authorization".to_string()
}

fn default_max_age_days() -> i64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_server_address(),
            base_url: default_base_url(),
            workers: default_workers(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            file_path: None,
            database_dsn: None,
            pool_size: default_pool_size(),
            code_length: default_code_length(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            secret: None,
            cookie_name: default_cookie_name(),
            max_age_days: default_max_age_days(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = StaticConfig::default();
        assert_eq!(config.server.address, ":8080");
        assert_eq!(config.server.base_url, "http://localhost:8080");
        assert_eq!(config.storage.code_length, 5);
        assert_eq!(config.storage.max_attempts, 16);
        assert_eq!(config.identity.cookie_name, "Authorization");
        assert_eq!(config.identity.max_age_days, 30);
        assert!(config.storage.file_path.is_none());
        assert!(config.storage.database_dsn.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_listen_addr() {
        let mut server = ServerConfig::default();
        assert_eq!(server.listen_addr(), "0.0.0.0:8080");

        server.address = "127.0.0.1:9000".to_string();
        assert_eq!(server.listen_addr(), "127.0.0.1:9000");
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
address = "127.0.0.1:9999"
base_url = ""

[storage]
file_path = "/tmp/urls.log"
code_length = 7

[identity]
secret = "hunter2"
"#
        )
        .unwrap();

        let config = StaticConfig::load(file.path().to_str()).unwrap();
        assert_eq!(config.server.address, "127.0.0.1:9999");
        assert!(config.server.base_url.is_empty());
        assert_eq!(config.storage.file_path.as_deref(), Some("/tmp/urls.log"));
        assert_eq!(config.storage.code_length, 7);
        assert_eq!(config.storage.max_attempts, 16);
        assert_eq!(config.identity.secret.as_deref(), Some("hunter2"));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("absent.toml");
        let config = StaticConfig::load(path.to_str()).unwrap();
        assert_eq!(config.storage.pool_size, 10);
    }

    #[test]
    fn test_load_rejects_bad_types() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[storage]\ncode_length = \"long\"").unwrap();
        assert!(StaticConfig::load(file.path().to_str()).is_err());
    }

    #[test]
    fn test_args_override_config() {
        let args = Cli::try_parse_from([
            "snaplink",
            "-a",
            ":9090",
            "-b",
            "https://sho.rt",
            "-f",
            "urls.log",
            "-d",
            "sqlite://urls.db",
        ])
        .unwrap();

        let mut config = StaticConfig::default();
        config.apply_args(&args);
        assert_eq!(config.server.address, ":9090");
        assert_eq!(config.server.base_url, "https://sho.rt");
        assert_eq!(config.storage.file_path.as_deref(), Some("urls.log"));
        assert_eq!(config.storage.database_dsn.as_deref(), Some("sqlite://urls.db"));
    }

    #[test]
    fn test_validate_rejects_zero_attempts() {
        let mut config = StaticConfig::default();
        config.storage.max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_code_length_bounds() {
        let mut config = StaticConfig::default();
        config.storage.code_length = MAX_CODE_LENGTH;
        assert!(config.validate().is_ok());

        config.storage.code_length = MAX_CODE_LENGTH + 1;
        assert!(config.validate().is_err());

        config.storage.code_length = 0;
        assert!(config.validate().is_err());
    }
}
