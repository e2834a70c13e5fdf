//! scrypt 算法
//!
//! payload 为 PHC 字符串（`$scrypt$ln=..,r=..,p=..$salt$hash`）。

use password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString};
use scrypt::{Params, Scrypt};
use serde::Deserialize;

use super::algorithm::PasswordAlgorithm;
use crate::error::{Error, PasswordHashError, Result};
use crate::random::generate_salt;

/// scrypt 参数
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScryptConfig {
    /// log2(N)
    pub log_n: u8,
    /// 块大小
    pub r: u32,
    /// 并行度
    pub p: u32,
}

impl Default for ScryptConfig {
    fn default() -> Self {
        Self {
            log_n: Params::RECOMMENDED_LOG_N,
            r: Params::RECOMMENDED_R,
            p: Params::RECOMMENDED_P,
        }
    }
}

/// scrypt 哈希器
#[derive(Debug, Clone)]
pub struct ScryptHasher {
    params: Params,
}

impl ScryptHasher {
    /// 创建 scrypt 哈希器
    pub fn new(config: &ScryptConfig) -> Result<Self> {
        let params = Params::new(config.log_n, config.r, config.p, Params::RECOMMENDED_LEN)
            .map_err(|e| Error::invalid_config("scrypt", e.to_string()))?;
        Ok(Self { params })
    }
}

impl PasswordAlgorithm for ScryptHasher {
    fn hash(&self, raw: &[u8]) -> Result<String> {
        let salt = SaltString::encode_b64(&generate_salt(16)).map_err(|e| {
            PasswordHashError::HashFailed(format!("Failed to encode salt: {}", e))
        })?;

        Scrypt
            .hash_password_customized(raw, None, None, self.params, &salt)
            .map(|h| h.to_string())
            .map_err(|e| {
                PasswordHashError::HashFailed(format!("scrypt hash failed: {}", e)).into()
            })
    }

    fn verify(&self, raw: &[u8], payload: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(payload) else {
            return false;
        };
        Scrypt.verify_password(raw, &parsed).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> ScryptHasher {
        ScryptHasher::new(&ScryptConfig { log_n: 4, r: 8, p: 1 }).unwrap()
    }

    #[test]
    fn test_scrypt_hash_and_verify() {
        let hasher = hasher();
        let payload = hasher.hash(b"test_password_123").unwrap();
        assert!(payload.starts_with("$scrypt$"));

        assert!(hasher.verify(b"test_password_123", &payload));
        assert!(!hasher.verify(b"wrong_password", &payload));
    }

    #[test]
    fn test_malformed_payload_fails_closed() {
        let hasher = hasher();
        assert!(!hasher.verify(b"password", "$scrypt$"));
        assert!(!hasher.verify(b"password", "not a phc string"));
    }
}
