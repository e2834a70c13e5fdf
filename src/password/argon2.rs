//! Argon2id 算法
//!
//! payload 为 PHC 字符串（`$argon2id$v=19$m=..,t=..,p=..$salt$hash`），
//! 校验时使用字符串中的参数。

use argon2::{Algorithm as Argon2Variant, Argon2, Params, Version};
use password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString};
use serde::Deserialize;

use super::algorithm::PasswordAlgorithm;
use crate::error::{Error, PasswordHashError, Result};
use crate::random::generate_salt;

/// Argon2id 参数
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Argon2Config {
    /// 内存开销（KiB）
    pub memory_kib: u32,
    /// 迭代次数
    pub iterations: u32,
    /// 并行度
    pub parallelism: u32,
}

impl Default for Argon2Config {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

/// Argon2id 哈希器
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    /// 创建 Argon2id 哈希器
    ///
    /// # Errors
    ///
    /// 参数组合不合法时返回配置错误
    pub fn new(config: &Argon2Config) -> Result<Self> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(|e| Error::invalid_config("argon2", e.to_string()))?;
        Ok(Self { params })
    }

    fn engine(&self) -> Argon2<'static> {
        Argon2::new(Argon2Variant::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl PasswordAlgorithm for Argon2Hasher {
    fn hash(&self, raw: &[u8]) -> Result<String> {
        let salt = SaltString::encode_b64(&generate_salt(16)).map_err(|e| {
            PasswordHashError::HashFailed(format!("Failed to encode salt: {}", e))
        })?;

        self.engine()
            .hash_password(raw, &salt)
            .map(|h| h.to_string())
            .map_err(|e| {
                PasswordHashError::HashFailed(format!("Argon2 hash failed: {}", e)).into()
            })
    }

    fn verify(&self, raw: &[u8], payload: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(payload) else {
            return false;
        };
        self.engine().verify_password(raw, &parsed).is_ok()
    }
}
