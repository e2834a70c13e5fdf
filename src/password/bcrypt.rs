//! bcrypt 算法
//!
//! payload 为标准的 `$2a$<cost>$<salt><digest>` 字符串，cost 和盐都在 payload 中，
//! 因此调整 cost 之后旧哈希仍然可以校验。

use std::borrow::Cow;

use base64::{Engine, engine::general_purpose::STANDARD};
use bcrypt::Version;
use sha2::{Digest, Sha256};

use super::algorithm::PasswordAlgorithm;
use crate::error::{Error, PasswordHashError, Result};
use crate::random::generate_salt_array;

/// 最小 cost
pub const MIN_COST: u32 = 4;

/// 最大 cost
pub const MAX_COST: u32 = 31;

/// 默认 cost
pub const DEFAULT_COST: u32 = 10;

/// bcrypt 只使用输入的前 72 个字节
const MAX_INPUT_BYTES: usize = 72;

/// bcrypt 哈希器
#[derive(Debug, Clone)]
pub struct BcryptHasher {
    cost: u32,
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

impl BcryptHasher {
    /// 创建 bcrypt 哈希器
    ///
    /// # Arguments
    ///
    /// * `cost` - cost 参数，范围 4-31
    ///
    /// # Errors
    ///
    /// cost 超出范围时返回配置错误
    ///
    /// # Example
    ///
    /// ```rust
    /// use tagged_password::password::{BcryptHasher, PasswordAlgorithm};
    ///
    /// let hasher = BcryptHasher::new(4).unwrap();
    /// let payload = hasher.hash(b"my_password").unwrap();
    /// assert!(payload.starts_with("$2a$04$"));
    /// assert!(hasher.verify(b"my_password", &payload));
    ///
    /// assert!(BcryptHasher::new(3).is_err());
    /// ```
    pub fn new(cost: u32) -> Result<Self> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(Error::invalid_config(
                "bcrypt.cost",
                format!("must be between {} and {}, got {}", MIN_COST, MAX_COST, cost),
            ));
        }
        Ok(Self { cost })
    }

    /// 当前用于新哈希的 cost
    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl PasswordAlgorithm for BcryptHasher {
    fn hash(&self, raw: &[u8]) -> Result<String> {
        let input = prepare_input(raw);
        bcrypt::hash_with_salt(&input, self.cost, generate_salt_array::<16>())
            .map(|parts| parts.format_for_version(Version::TwoA))
            .map_err(|e| {
                PasswordHashError::HashFailed(format!("bcrypt hash failed: {}", e)).into()
            })
    }

    fn verify(&self, raw: &[u8], payload: &str) -> bool {
        // cost 与盐取自 payload 本身
        bcrypt::verify(prepare_input(raw), payload).unwrap_or(false)
    }
}

/// 超过 72 字节的输入先压缩为 `base64(SHA-256(raw))`，
/// 避免前 72 字节相同的不同密码互相匹配。
fn prepare_input(raw: &[u8]) -> Cow<'_, [u8]> {
    if raw.len() > MAX_INPUT_BYTES {
        Cow::Owned(STANDARD.encode(Sha256::digest(raw)).into_bytes())
    } else {
        Cow::Borrowed(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> BcryptHasher {
        // 使用低 cost 加快测试
        BcryptHasher::new(4).unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = hasher();
        let payload = hasher.hash(b"test_password_123").unwrap();
        assert!(payload.starts_with("$2a$04$"));
        assert_eq!(payload.len(), 60);

        assert!(hasher.verify(b"test_password_123", &payload));
        assert!(!hasher.verify(b"wrong_password", &payload));
    }

    #[test]
    fn test_different_hashes_same_password() {
        let hasher = hasher();
        let a = hasher.hash(b"same_password").unwrap();
        let b = hasher.hash(b"same_password").unwrap();

        // 盐不同，payload 不同
        assert_ne!(a, b);
        assert!(hasher.verify(b"same_password", &a));
        assert!(hasher.verify(b"same_password", &b));
    }

    #[test]
    fn test_empty_password() {
        let hasher = hasher();
        let payload = hasher.hash(b"").unwrap();
        assert!(hasher.verify(b"", &payload));
        assert!(!hasher.verify(b"not_empty", &payload));
    }

    #[test]
    fn test_verify_uses_embedded_cost() {
        let old = BcryptHasher::new(4).unwrap();
        let payload = old.hash(b"password").unwrap();

        // 配置的 cost 提高后，旧 payload 仍可校验
        let current = BcryptHasher::new(5).unwrap();
        assert!(current.verify(b"password", &payload));
    }

    #[test]
    fn test_long_passwords_do_not_collide() {
        let hasher = hasher();
        let base = "a".repeat(72);
        let long_a = format!("{}x", base);
        let long_b = format!("{}y", base);

        let payload = hasher.hash(long_a.as_bytes()).unwrap();
        assert!(hasher.verify(long_a.as_bytes(), &payload));
        assert!(!hasher.verify(long_b.as_bytes(), &payload));
        assert!(!hasher.verify(base.as_bytes(), &payload));
    }

    #[test]
    fn test_exactly_72_bytes_is_not_prehashed() {
        let raw = [b'z'; 72];
        assert!(matches!(prepare_input(&raw), Cow::Borrowed(_)));
        assert!(matches!(prepare_input(&[b'z'; 73]), Cow::Owned(_)));
    }

    #[test]
    fn test_malformed_payload_fails_closed() {
        let hasher = hasher();
        let payload = hasher.hash(b"password").unwrap();

        assert!(!hasher.verify(b"password", ""));
        assert!(!hasher.verify(b"password", "$2a$04$"));
        assert!(!hasher.verify(b"password", &payload[..payload.len() - 5]));
        assert!(!hasher.verify(b"password", "$pbkdf2-sha256$i=1000,l=32$AAAA$BBBB"));
    }

    #[test]
    fn test_invalid_cost() {
        assert!(BcryptHasher::new(3).is_err());
        assert!(BcryptHasher::new(32).is_err());
        assert_eq!(BcryptHasher::new(31).unwrap().cost(), 31);
        assert_eq!(BcryptHasher::default().cost(), DEFAULT_COST);
    }

    #[test]
    fn test_verifies_other_bcrypt_versions() {
        // `$2b$` 格式同样可以校验
        let payload = bcrypt::hash("password", 4).unwrap();
        assert!(payload.starts_with("$2b$04$"));

        let hasher = hasher();
        assert!(hasher.verify(b"password", &payload));
        assert!(!hasher.verify(b"not-password", &payload));
    }
}
