use std::fmt;

#[derive(Debug, Clone)]
pub enum SnaplinkError {
    Config(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    Serialization(String),
    Identity(String),
    KeyspaceExhausted(String),
    Validation(String),
}

impl SnaplinkError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            SnaplinkError::Config(_) => "E001",
            SnaplinkError::DatabaseConfig(_) => "E002",
            SnaplinkError::DatabaseConnection(_) => "E003",
            SnaplinkError::DatabaseOperation(_) => "E004",
            SnaplinkError::FileOperation(_) => "E005",
            SnaplinkError::Serialization(_) => "E006",
            SnaplinkError::Identity(_) => "E007",
            SnaplinkError::KeyspaceExhausted(_) => "E008",
            SnaplinkError::Validation(_) => "E009",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            SnaplinkError::Config(_) => "Configuration Error",
            SnaplinkError::DatabaseConfig(_) => "Database Configuration Error",
            SnaplinkError::DatabaseConnection(_) => "Database Connection Error",
            SnaplinkError::DatabaseOperation(_) => "Database Operation Error",
            SnaplinkError::FileOperation(_) => "File Operation Error",
            SnaplinkError::Serialization(_) => "Serialization Error",
            SnaplinkError::Identity(_) => "Identity Token Error",
            SnaplinkError::KeyspaceExhausted(_) => "Short Code Keyspace Exhausted",
            SnaplinkError::Validation(_) => "Validation Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            SnaplinkError::Config(msg)
            | SnaplinkError::DatabaseConfig(msg)
            | SnaplinkError::DatabaseConnection(msg)
            | SnaplinkError::DatabaseOperation(msg)
            | SnaplinkError::FileOperation(msg)
            | SnaplinkError::Serialization(msg)
            | SnaplinkError::Identity(msg)
            | SnaplinkError::KeyspaceExhausted(msg)
            | SnaplinkError::Validation(msg) => msg,
        }
    }

    /// 格式化为彩色输出（用于启动失败）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for SnaplinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for SnaplinkError {}

// 便捷的构造函数
impl SnaplinkError {
    pub fn config<T: Into<String>>(msg: T) -> Self {
        SnaplinkError::Config(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        SnaplinkError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        SnaplinkError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        SnaplinkError::DatabaseOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        SnaplinkError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        SnaplinkError::Serialization(msg.into())
    }

    pub fn identity<T: Into<String>>(msg: T) -> Self {
        SnaplinkError::Identity(msg.into())
    }

    pub fn keyspace_exhausted<T: Into<String>>(msg: T) -> Self {
        SnaplinkError::KeyspaceExhausted(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        SnaplinkError::Validation(msg.into())
    }
}

impl From<sea_orm::DbErr> for SnaplinkError {
    fn from(err: sea_orm::DbErr) -> Self {
        SnaplinkError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for SnaplinkError {
    fn from(err: std::io::Error) -> Self {
        SnaplinkError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for SnaplinkError {
    fn from(err: serde_json::Error) -> Self {
        SnaplinkError::Serialization(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for SnaplinkError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        SnaplinkError::Identity(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SnaplinkError>;
