//! 委托式密码编码器
//!
//! 对外只暴露三个操作：
//!
//! - `encode`：使用注册表的默认算法哈希，并加上 `{id}` 标签
//! - `matches`：按标签找到算法并校验
//! - `needs_upgrade`：标签中的算法是否不是当前默认算法
//!
//! 升级是可选的、由调用方驱动的：`matches` 成功后如果 `needs_upgrade`
//! 为真，调用方可以重新 `encode` 并保存。

use tracing::{debug, warn};

use super::algorithm::PasswordAlgorithm;
use super::codec;
use super::registry::AlgorithmRegistry;
use crate::error::Result;

/// 委托式密码编码器
///
/// 内部只有启动时构建的只读注册表，可以通过 `Arc` 在多个线程间共享。
///
/// # Example
///
/// ```rust
/// use tagged_password::password::{
///     AlgorithmRegistry, BcryptHasher, DelegatingPasswordEncoder, Pbkdf2Config, Pbkdf2Hasher,
///     Pepper,
/// };
///
/// let pbkdf2 = Pbkdf2Hasher::new(Pepper::new("pepper"), Pbkdf2Config::new().with_iterations(1_000))
///     .unwrap();
/// let registry = AlgorithmRegistry::new(
///     [
///         ("bcrypt", BcryptHasher::new(4).unwrap().into()),
///         ("pbkdf2", pbkdf2.into()),
///     ],
///     "bcrypt",
/// )
/// .unwrap();
/// let encoder = DelegatingPasswordEncoder::new(registry);
///
/// let stored = encoder.encode("password123").unwrap();
/// assert!(stored.starts_with("{bcrypt}$2a$04$"));
/// assert!(encoder.matches("password123", &stored).unwrap());
/// assert!(!encoder.matches("wrongpass", &stored).unwrap());
/// assert!(!encoder.needs_upgrade(&stored).unwrap());
/// ```
#[derive(Debug)]
pub struct DelegatingPasswordEncoder {
    registry: AlgorithmRegistry,
}

impl DelegatingPasswordEncoder {
    /// 使用已构建的注册表创建编码器
    pub fn new(registry: AlgorithmRegistry) -> Self {
        Self { registry }
    }

    /// 使用默认算法哈希密码，返回带标签的哈希
    ///
    /// # Errors
    ///
    /// 只有底层算法内部失败时才会返回错误
    pub fn encode(&self, raw: impl AsRef<[u8]>) -> Result<String> {
        let id = self.registry.default_algorithm_id();
        let payload = self.registry.default_algorithm().hash(raw.as_ref())?;
        debug!(algorithm = id, "encoded password");
        codec::encode(id, &payload)
    }

    /// 校验原始密码与存储的带标签哈希是否匹配
    ///
    /// # Returns
    ///
    /// 密码正确返回 `Ok(true)`，密码错误返回 `Ok(false)`
    ///
    /// # Errors
    ///
    /// - 存储值格式错误：`PasswordHashError::MalformedHash`
    /// - 标签中的算法未注册：`PasswordHashError::UnsupportedAlgorithm`
    pub fn matches(&self, raw: impl AsRef<[u8]>, stored: &str) -> Result<bool> {
        let tagged = codec::decode(stored).inspect_err(|_| {
            warn!("stored password hash is malformed");
        })?;

        let algorithm = self.registry.get(tagged.algorithm_id).inspect_err(|_| {
            warn!(
                algorithm = tagged.algorithm_id,
                "stored password hash uses an unregistered algorithm"
            );
        })?;

        let matched = algorithm.verify(raw.as_ref(), tagged.payload);
        debug!(algorithm = tagged.algorithm_id, matched, "verified password");
        Ok(matched)
    }

    /// 判断存储的哈希是否需要用当前默认算法重新生成
    ///
    /// # Errors
    ///
    /// 与 [`matches`](Self::matches) 相同：格式错误或算法未注册时返回错误
    pub fn needs_upgrade(&self, stored: &str) -> Result<bool> {
        let tagged = codec::decode(stored)?;
        self.registry.get(tagged.algorithm_id)?;
        Ok(tagged.algorithm_id != self.registry.default_algorithm_id())
    }

    /// 当前默认算法 ID
    pub fn default_algorithm_id(&self) -> &str {
        self.registry.default_algorithm_id()
    }

    /// 底层注册表
    pub fn registry(&self) -> &AlgorithmRegistry {
        &self.registry
    }
}
