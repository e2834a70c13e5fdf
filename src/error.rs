//! 统一错误类型模块
//!
//! 提供 tagged-password 库中所有操作的错误类型定义。
//!
//! 注意区分两类结果：`matches` 返回 `Ok(false)` 表示密码错误；
//! 返回 `Err` 则表示存储的哈希本身有问题（格式损坏或算法已下线），
//! 调用方不应把两者合并成同一种失败。

use std::fmt;

/// tagged-password 库的统一结果类型
pub type Result<T> = std::result::Result<T, Error>;

/// tagged-password 库的错误类型
#[derive(Debug)]
pub enum Error {
    /// 密码哈希错误
    PasswordHash(PasswordHashError),

    /// 算法注册表构建错误（仅在启动时出现）
    Registry(RegistryError),

    /// 配置错误
    Config(ConfigError),

    /// 存储错误
    Storage(StorageError),
}

impl Error {
    /// 创建一个无效配置值错误
    pub fn invalid_config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Config(ConfigError::InvalidValue {
            key: key.into(),
            message: message.into(),
        })
    }

    /// 存储的值不是合法的带标签哈希
    pub fn is_malformed_hash(&self) -> bool {
        matches!(self, Error::PasswordHash(PasswordHashError::MalformedHash(_)))
    }

    /// 存储的哈希使用了未注册的算法
    pub fn is_unsupported_algorithm(&self) -> bool {
        matches!(
            self,
            Error::PasswordHash(PasswordHashError::UnsupportedAlgorithm(_))
        )
    }
}

/// 密码哈希相关错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordHashError {
    /// 哈希生成失败
    HashFailed(String),
    /// 不是合法的 `{id}payload` 格式
    MalformedHash(String),
    /// 标签中的算法没有注册
    UnsupportedAlgorithm(String),
    /// 算法 ID 为空或包含 `{` / `}`
    InvalidAlgorithmId(String),
}

/// 算法注册表相关错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// 同一个算法 ID 注册了多次
    DuplicateAlgorithmId(String),
    /// 默认算法 ID 不在注册列表中
    UnknownDefaultAlgorithm(String),
    /// 注册时使用了非法的算法 ID
    InvalidAlgorithmId(String),
}

/// 配置相关错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// 缺少必需的配置
    MissingRequired(String),
    /// 无效的配置值
    InvalidValue { key: String, message: String },
    /// 配置文件读取或解析失败
    Parse(String),
}

/// 存储相关错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// 记录未找到
    NotFound(String),
    /// 记录已存在
    AlreadyExists(String),
    /// 操作失败
    OperationFailed(String),
}

// ============================================================================
// Display 实现
// ============================================================================

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::PasswordHash(e) => write!(f, "Password hash error: {}", e),
            Error::Registry(e) => write!(f, "Registry error: {}", e),
            Error::Config(e) => write!(f, "Config error: {}", e),
            Error::Storage(e) => write!(f, "Storage error: {}", e),
        }
    }
}

impl fmt::Display for PasswordHashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PasswordHashError::HashFailed(msg) => write!(f, "hash generation failed: {}", msg),
            PasswordHashError::MalformedHash(msg) => write!(f, "malformed hash: {}", msg),
            PasswordHashError::UnsupportedAlgorithm(id) => {
                write!(f, "unsupported algorithm: {}", id)
            }
            PasswordHashError::InvalidAlgorithmId(id) => {
                write!(f, "invalid algorithm id: '{}'", id)
            }
        }
    }
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::DuplicateAlgorithmId(id) => {
                write!(f, "algorithm id registered more than once: {}", id)
            }
            RegistryError::UnknownDefaultAlgorithm(id) => {
                write!(f, "default algorithm is not registered: {}", id)
            }
            RegistryError::InvalidAlgorithmId(id) => {
                write!(f, "invalid algorithm id: '{}'", id)
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingRequired(key) => {
                write!(f, "missing required configuration: {}", key)
            }
            ConfigError::InvalidValue { key, message } => {
                write!(f, "invalid configuration value for '{}': {}", key, message)
            }
            ConfigError::Parse(msg) => write!(f, "failed to parse configuration: {}", msg),
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::NotFound(item) => write!(f, "not found: {}", item),
            StorageError::AlreadyExists(item) => write!(f, "already exists: {}", item),
            StorageError::OperationFailed(msg) => write!(f, "storage operation failed: {}", msg),
        }
    }
}

// ============================================================================
// std::error::Error 实现
// ============================================================================

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::PasswordHash(e) => Some(e),
            Error::Registry(e) => Some(e),
            Error::Config(e) => Some(e),
            Error::Storage(e) => Some(e),
        }
    }
}

impl std::error::Error for PasswordHashError {}
impl std::error::Error for RegistryError {}
impl std::error::Error for ConfigError {}
impl std::error::Error for StorageError {}

// ============================================================================
// From 实现 - 方便错误转换
// ============================================================================

impl From<PasswordHashError> for Error {
    fn from(err: PasswordHashError) -> Self {
        Error::PasswordHash(err)
    }
}

impl From<RegistryError> for Error {
    fn from(err: RegistryError) -> Self {
        Error::Registry(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        Error::Storage(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::PasswordHash(PasswordHashError::UnsupportedAlgorithm("md5".into()));
        assert_eq!(
            err.to_string(),
            "Password hash error: unsupported algorithm: md5"
        );
    }

    #[test]
    fn test_error_from_registry() {
        let err: Error = RegistryError::DuplicateAlgorithmId("bcrypt".to_string()).into();
        assert!(matches!(err, Error::Registry(_)));
        assert_eq!(
            err.to_string(),
            "Registry error: algorithm id registered more than once: bcrypt"
        );
    }

    #[test]
    fn test_error_predicates() {
        let malformed: Error = PasswordHashError::MalformedHash("no prefix".into()).into();
        assert!(malformed.is_malformed_hash());
        assert!(!malformed.is_unsupported_algorithm());

        let unsupported: Error = PasswordHashError::UnsupportedAlgorithm("sha1".into()).into();
        assert!(unsupported.is_unsupported_algorithm());
        assert!(!unsupported.is_malformed_hash());
    }

    #[test]
    fn test_config_error_display() {
        let err = Error::invalid_config("bcrypt.cost", "must be between 4 and 31");
        assert_eq!(
            err.to_string(),
            "Config error: invalid configuration value for 'bcrypt.cost': must be between 4 and 31"
        );
    }

    #[test]
    fn test_error_source() {
        use std::error::Error as _;

        let err: Error = StorageError::NotFound("alice".into()).into();
        assert!(err.source().is_some());
        assert_eq!(err.source().unwrap().to_string(), "not found: alice");
    }
}
