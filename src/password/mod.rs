//! 密码编码模块
//!
//! 按租户分类选择默认算法生成带标签的哈希（`{id}payload`），
//! 校验时根据标签把请求委托给对应的算法。
//!
//! ## 支持的算法
//!
//! - **bcrypt**: 自适应加盐哈希，普通租户的默认算法
//! - **PBKDF2**: 带全局 pepper 的密钥派生哈希，受监管租户的默认算法
//! - **Argon2id**: 内存硬哈希（需启用 `argon2` feature，默认启用），仅用于校验和显式注册
//! - **scrypt**: 需启用 `scrypt` feature
//!
//! ## 示例
//!
//! ```rust
//! use tagged_password::password::{
//!     AlgorithmRegistry, BcryptHasher, DelegatingPasswordEncoder, Pbkdf2Config, Pbkdf2Hasher,
//!     Pepper, SelectionPolicy, TenantClass,
//! };
//!
//! let policy = SelectionPolicy::default();
//! let default_id = policy.select(&TenantClass::from("healthcare"));
//!
//! let pbkdf2 = Pbkdf2Hasher::new(Pepper::new("pepper"), Pbkdf2Config::new().with_iterations(1_000))
//!     .unwrap();
//! let registry = AlgorithmRegistry::new(
//!     [
//!         (policy.adaptive_id(), BcryptHasher::new(4).unwrap().into()),
//!         (policy.keyed_id(), pbkdf2.into()),
//!     ],
//!     default_id,
//! )
//! .unwrap();
//! let encoder = DelegatingPasswordEncoder::new(registry);
//!
//! let stored = encoder.encode("my_password").unwrap();
//! assert!(stored.starts_with("{pbkdf2}$pbkdf2-sha256$"));
//! assert!(encoder.matches("my_password", &stored).unwrap());
//! ```

mod algorithm;
#[cfg(feature = "argon2")]
mod argon2;
mod bcrypt;
pub mod codec;
mod delegating;
mod pbkdf2;
mod pepper;
mod policy;
mod registry;
#[cfg(feature = "scrypt")]
mod scrypt;

pub use self::algorithm::{Algorithm, PasswordAlgorithm};
#[cfg(feature = "argon2")]
pub use self::argon2::{Argon2Config, Argon2Hasher};
pub use self::bcrypt::BcryptHasher;
pub use self::codec::TaggedHash;
pub use self::delegating::DelegatingPasswordEncoder;
pub use self::pbkdf2::{Pbkdf2Config, Pbkdf2Digest, Pbkdf2Hasher};
pub use self::pepper::Pepper;
pub use self::policy::{SelectionPolicy, TenantClass};
pub use self::registry::AlgorithmRegistry;
#[cfg(feature = "scrypt")]
pub use self::scrypt::{ScryptConfig, ScryptHasher};

/// bcrypt 的默认注册 ID
pub const DEFAULT_ADAPTIVE_ID: &str = "bcrypt";

/// PBKDF2 的默认注册 ID
pub const DEFAULT_KEYED_ID: &str = "pbkdf2";

/// Argon2id 的注册 ID
#[cfg(feature = "argon2")]
pub const ARGON2_ID: &str = "argon2";

/// scrypt 的注册 ID
#[cfg(feature = "scrypt")]
pub const SCRYPT_ID: &str = "scrypt";
