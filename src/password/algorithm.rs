//! 密码哈希算法抽象
//!
//! 每个算法只处理不带标签的 payload：`hash` 生成 payload，
//! `verify` 用 payload 中记录的参数重新计算并比较。

#[cfg(feature = "argon2")]
use super::argon2::Argon2Hasher;
use super::bcrypt::BcryptHasher;
use super::pbkdf2::Pbkdf2Hasher;
#[cfg(feature = "scrypt")]
use super::scrypt::ScryptHasher;
use crate::error::Result;

/// 密码哈希算法的统一接口
///
/// 实现必须可以在多个线程中并发调用。
pub trait PasswordAlgorithm: Send + Sync {
    /// 哈希原始密码，返回算法自己的 payload
    ///
    /// 每次调用都会生成新的随机盐，因此同一输入两次哈希的结果不同。
    /// 任何输入（包括空字节串）都能得到合法的 payload。
    fn hash(&self, raw: &[u8]) -> Result<String>;

    /// 校验原始密码是否与 payload 匹配
    ///
    /// payload 损坏、被截断或属于其他算法时返回 `false`，不会报错。
    fn verify(&self, raw: &[u8], payload: &str) -> bool;
}

/// 内置的哈希算法
///
/// 注册表中的每一项都是其中一种算法及其配置。
#[derive(Debug, Clone)]
pub enum Algorithm {
    /// bcrypt，自描述 payload（包含 cost 与盐）
    Bcrypt(BcryptHasher),

    /// PBKDF2 + 全局 pepper
    Pbkdf2(Pbkdf2Hasher),

    /// Argon2id
    #[cfg(feature = "argon2")]
    Argon2id(Argon2Hasher),

    /// scrypt
    #[cfg(feature = "scrypt")]
    Scrypt(ScryptHasher),
}

impl Algorithm {
    /// 算法名称，仅用于日志
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Bcrypt(_) => "bcrypt",
            Algorithm::Pbkdf2(_) => "pbkdf2",
            #[cfg(feature = "argon2")]
            Algorithm::Argon2id(_) => "argon2id",
            #[cfg(feature = "scrypt")]
            Algorithm::Scrypt(_) => "scrypt",
        }
    }

    fn inner(&self) -> &dyn PasswordAlgorithm {
        match self {
            Algorithm::Bcrypt(h) => h,
            Algorithm::Pbkdf2(h) => h,
            #[cfg(feature = "argon2")]
            Algorithm::Argon2id(h) => h,
            #[cfg(feature = "scrypt")]
            Algorithm::Scrypt(h) => h,
        }
    }
}

impl PasswordAlgorithm for Algorithm {
    fn hash(&self, raw: &[u8]) -> Result<String> {
        self.inner().hash(raw)
    }

    fn verify(&self, raw: &[u8], payload: &str) -> bool {
        self.inner().verify(raw, payload)
    }
}

impl From<BcryptHasher> for Algorithm {
    fn from(hasher: BcryptHasher) -> Self {
        Algorithm::Bcrypt(hasher)
    }
}

impl From<Pbkdf2Hasher> for Algorithm {
    fn from(hasher: Pbkdf2Hasher) -> Self {
        Algorithm::Pbkdf2(hasher)
    }
}

#[cfg(feature = "argon2")]
impl From<Argon2Hasher> for Algorithm {
    fn from(hasher: Argon2Hasher) -> Self {
        Algorithm::Argon2id(hasher)
    }
}

#[cfg(feature = "scrypt")]
impl From<ScryptHasher> for Algorithm {
    fn from(hasher: ScryptHasher) -> Self {
        Algorithm::Scrypt(hasher)
    }
}
