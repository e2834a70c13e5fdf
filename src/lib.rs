//! # tagged-password
//!
//! 带算法标签的多策略密码编码库。
//!
//! 每个哈希都以 `{算法 ID}` 开头，校验时根据标签把请求委托给对应的算法，
//! 调用方无需关心某个存储的哈希是用哪种算法生成的。新哈希使用的默认算法由
//! 启动时确定的租户分类决定：受监管租户默认使用带 pepper 的 PBKDF2，
//! 其他租户默认使用 bcrypt。
//!
//! ## 功能特性
//!
//! - **带标签的哈希格式**: `{bcrypt}$2a$10$...`、`{pbkdf2}$pbkdf2-sha256$...`
//! - **算法注册表**: 启动时构建一次，之后只读
//! - **租户选择策略**: 按租户分类选择默认算法
//! - **按需升级**: `needs_upgrade` 判断旧哈希是否应在登录成功后重新生成
//! - **配置**: TOML 文件与环境变量
//! - **凭据流程**: 注册、登录（可选自动升级）、改密
//!
//! ## Features
//!
//! - `argon2` - 注册 Argon2id 算法（默认启用）
//! - `scrypt` - 注册 scrypt 算法
//! - `full` - 启用所有算法
//!
//! ## 示例
//!
//! ```rust
//! use tagged_password::{EncoderConfig, Pepper};
//! use tagged_password::password::Pbkdf2Config;
//!
//! let encoder = EncoderConfig::new()
//!     .with_tenant_class("retail")
//!     .with_pepper(Pepper::new("StrongPepperUsedAcrossAllHashes"))
//!     .with_bcrypt_cost(4)
//!     .with_pbkdf2(Pbkdf2Config::new().with_iterations(1_000))
//!     .build()
//!     .unwrap();
//!
//! let stored = encoder.encode("password123").unwrap();
//! assert!(stored.starts_with("{bcrypt}"));
//!
//! assert!(encoder.matches("password123", &stored).unwrap());
//! assert!(!encoder.matches("wrongpass", &stored).unwrap());
//! assert!(!encoder.needs_upgrade(&stored).unwrap());
//! ```
//!
//! ## 错误与密码错误的区别
//!
//! `matches` 对密码错误返回 `Ok(false)`；存储值格式错误或算法未注册时返回 `Err`：
//!
//! ```rust
//! # use tagged_password::{EncoderConfig, Pepper};
//! # use tagged_password::password::Pbkdf2Config;
//! # let encoder = EncoderConfig::new()
//! #     .with_pepper(Pepper::new("pepper"))
//! #     .with_bcrypt_cost(4)
//! #     .with_pbkdf2(Pbkdf2Config::new().with_iterations(1_000))
//! #     .build()
//! #     .unwrap();
//! let err = encoder.matches("password", "{nonexistent}abc").unwrap_err();
//! assert!(err.is_unsupported_algorithm());
//!
//! let err = encoder.matches("password", "{}abc").unwrap_err();
//! assert!(err.is_malformed_hash());
//! ```

pub mod config;
pub mod credential;
pub mod error;
pub mod password;
pub mod random;

pub use error::{Error, Result};

// ============================================================================
// 编码器相关导出
// ============================================================================

pub use password::{
    Algorithm, AlgorithmRegistry, DelegatingPasswordEncoder, PasswordAlgorithm, Pepper,
    SelectionPolicy, TenantClass,
};

// ============================================================================
// 配置与凭据流程导出
// ============================================================================

pub use config::EncoderConfig;
pub use credential::{CredentialRecord, CredentialService, CredentialStore, InMemoryCredentialStore};
