//! PBKDF2 算法（带全局 pepper）
//!
//! 派生输入为 `raw ++ pepper`，每次哈希使用新的随机盐。payload 格式：
//!
//! ```text
//! $pbkdf2-sha256$i=<iterations>,l=<key length>$<salt>$<key>
//! ```
//!
//! 盐和派生密钥使用无填充的标准 Base64。校验时使用 payload 中记录的
//! 摘要算法、迭代次数和盐，而不是当前配置，所以提高迭代次数不会影响旧哈希。

use base64::{Engine, engine::general_purpose::STANDARD_NO_PAD};
use pbkdf2::pbkdf2_hmac;
use serde::Deserialize;
use sha2::{Sha256, Sha512};
use zeroize::Zeroizing;

use super::algorithm::PasswordAlgorithm;
use super::pepper::Pepper;
use crate::error::{Error, Result};
use crate::random::{constant_time_compare, generate_salt};

/// 默认盐长度（字节）
pub const DEFAULT_SALT_LENGTH: usize = 16;

/// 默认迭代次数
pub const DEFAULT_ITERATIONS: u32 = 310_000;

/// 默认派生密钥长度（字节）
pub const DEFAULT_OUTPUT_LENGTH: usize = 32;

const MIN_SALT_LENGTH: usize = 8;
const MAX_SALT_LENGTH: usize = 64;
const MIN_OUTPUT_LENGTH: usize = 16;
const MAX_OUTPUT_LENGTH: usize = 64;

/// 迭代次数上限，超过上限的 payload 视为损坏
pub const MAX_ITERATIONS: u32 = 10_000_000;

/// PBKDF2 使用的 HMAC 摘要算法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pbkdf2Digest {
    /// HMAC-SHA256
    #[default]
    #[serde(alias = "PBKDF2WithHmacSHA256", alias = "pbkdf2-sha256")]
    Sha256,
    /// HMAC-SHA512
    #[serde(alias = "PBKDF2WithHmacSHA512", alias = "pbkdf2-sha512")]
    Sha512,
}

impl Pbkdf2Digest {
    /// payload 中使用的标识
    pub fn ident(&self) -> &'static str {
        match self {
            Pbkdf2Digest::Sha256 => "pbkdf2-sha256",
            Pbkdf2Digest::Sha512 => "pbkdf2-sha512",
        }
    }

    fn from_ident(ident: &str) -> Option<Self> {
        match ident {
            "pbkdf2-sha256" => Some(Pbkdf2Digest::Sha256),
            "pbkdf2-sha512" => Some(Pbkdf2Digest::Sha512),
            _ => None,
        }
    }

    fn derive(&self, input: &[u8], salt: &[u8], iterations: u32, out: &mut [u8]) {
        match self {
            Pbkdf2Digest::Sha256 => pbkdf2_hmac::<Sha256>(input, salt, iterations, out),
            Pbkdf2Digest::Sha512 => pbkdf2_hmac::<Sha512>(input, salt, iterations, out),
        }
    }
}

/// PBKDF2 参数
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Pbkdf2Config {
    /// 盐长度（字节）
    pub salt_length: usize,

    /// 迭代次数（只影响新哈希）
    pub iterations: u32,

    /// 派生密钥长度（字节）
    pub output_length: usize,

    /// 摘要算法
    pub digest: Pbkdf2Digest,
}

impl Default for Pbkdf2Config {
    fn default() -> Self {
        Self {
            salt_length: DEFAULT_SALT_LENGTH,
            iterations: DEFAULT_ITERATIONS,
            output_length: DEFAULT_OUTPUT_LENGTH,
            digest: Pbkdf2Digest::default(),
        }
    }
}

impl Pbkdf2Config {
    /// 创建默认配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置盐长度
    pub fn with_salt_length(mut self, salt_length: usize) -> Self {
        self.salt_length = salt_length;
        self
    }

    /// 设置迭代次数
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// 设置派生密钥长度
    pub fn with_output_length(mut self, output_length: usize) -> Self {
        self.output_length = output_length;
        self
    }

    /// 设置摘要算法
    pub fn with_digest(mut self, digest: Pbkdf2Digest) -> Self {
        self.digest = digest;
        self
    }

    /// 检查参数范围
    pub fn validate(&self) -> Result<()> {
        if !(MIN_SALT_LENGTH..=MAX_SALT_LENGTH).contains(&self.salt_length) {
            return Err(Error::invalid_config(
                "pbkdf2.salt_length",
                format!(
                    "must be between {} and {} bytes, got {}",
                    MIN_SALT_LENGTH, MAX_SALT_LENGTH, self.salt_length
                ),
            ));
        }
        if !(1..=MAX_ITERATIONS).contains(&self.iterations) {
            return Err(Error::invalid_config(
                "pbkdf2.iterations",
                format!(
                    "must be between 1 and {}, got {}",
                    MAX_ITERATIONS, self.iterations
                ),
            ));
        }
        if !(MIN_OUTPUT_LENGTH..=MAX_OUTPUT_LENGTH).contains(&self.output_length) {
            return Err(Error::invalid_config(
                "pbkdf2.output_length",
                format!(
                    "must be between {} and {} bytes, got {}",
                    MIN_OUTPUT_LENGTH, MAX_OUTPUT_LENGTH, self.output_length
                ),
            ));
        }
        Ok(())
    }
}

/// PBKDF2 哈希器
#[derive(Debug, Clone)]
pub struct Pbkdf2Hasher {
    pepper: Pepper,
    config: Pbkdf2Config,
}

impl Pbkdf2Hasher {
    /// 创建 PBKDF2 哈希器
    ///
    /// # Errors
    ///
    /// 参数超出范围时返回配置错误
    ///
    /// # Example
    ///
    /// ```rust
    /// use tagged_password::password::{
    ///     PasswordAlgorithm, Pbkdf2Config, Pbkdf2Hasher, Pepper,
    /// };
    ///
    /// let hasher = Pbkdf2Hasher::new(
    ///     Pepper::new("global-pepper"),
    ///     Pbkdf2Config::new().with_iterations(1_000),
    /// )
    /// .unwrap();
    ///
    /// let payload = hasher.hash(b"my_password").unwrap();
    /// assert!(payload.starts_with("$pbkdf2-sha256$i=1000,l=32$"));
    /// assert!(hasher.verify(b"my_password", &payload));
    /// ```
    pub fn new(pepper: Pepper, config: Pbkdf2Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { pepper, config })
    }

    /// 当前用于新哈希的参数
    pub fn config(&self) -> &Pbkdf2Config {
        &self.config
    }

    fn derive(
        &self,
        raw: &[u8],
        digest: Pbkdf2Digest,
        salt: &[u8],
        iterations: u32,
        output_length: usize,
    ) -> Zeroizing<Vec<u8>> {
        let pepper = self.pepper.expose();
        let mut input = Zeroizing::new(Vec::with_capacity(raw.len() + pepper.len()));
        input.extend_from_slice(raw);
        input.extend_from_slice(pepper);

        let mut key = Zeroizing::new(vec![0u8; output_length]);
        digest.derive(&input, salt, iterations, &mut key);
        key
    }
}

impl PasswordAlgorithm for Pbkdf2Hasher {
    fn hash(&self, raw: &[u8]) -> Result<String> {
        let config = &self.config;
        let salt = generate_salt(config.salt_length);
        let key = self.derive(
            raw,
            config.digest,
            &salt,
            config.iterations,
            config.output_length,
        );

        Ok(format!(
            "${}$i={},l={}${}${}",
            config.digest.ident(),
            config.iterations,
            config.output_length,
            STANDARD_NO_PAD.encode(&salt),
            STANDARD_NO_PAD.encode(key.as_slice()),
        ))
    }

    fn verify(&self, raw: &[u8], payload: &str) -> bool {
        let Some(parsed) = ParsedPayload::parse(payload) else {
            return false;
        };

        let derived = self.derive(
            raw,
            parsed.digest,
            &parsed.salt,
            parsed.iterations,
            parsed.key.len(),
        );
        constant_time_compare(&derived, &parsed.key)
    }
}

/// 从 payload 中恢复的参数
struct ParsedPayload {
    digest: Pbkdf2Digest,
    iterations: u32,
    salt: Vec<u8>,
    key: Vec<u8>,
}

impl ParsedPayload {
    fn parse(payload: &str) -> Option<Self> {
        let mut parts = payload.split('$');
        if !parts.next()?.is_empty() {
            return None;
        }

        let digest = Pbkdf2Digest::from_ident(parts.next()?)?;
        let (iterations, output_length) = parse_params(parts.next()?)?;
        let salt = STANDARD_NO_PAD.decode(parts.next()?).ok()?;
        let key = STANDARD_NO_PAD.decode(parts.next()?).ok()?;

        if parts.next().is_some()
            || !(1..=MAX_ITERATIONS).contains(&iterations)
            || salt.is_empty()
            || key.is_empty()
            || key.len() != output_length
        {
            return None;
        }

        Some(Self {
            digest,
            iterations,
            salt,
            key,
        })
    }
}

/// 解析 `i=<iterations>,l=<length>`
fn parse_params(params: &str) -> Option<(u32, usize)> {
    let (iterations, length) = params.split_once(',')?;
    let iterations = iterations.strip_prefix("i=")?.parse().ok()?;
    let length = length.strip_prefix("l=")?.parse().ok()?;
    Some((iterations, length))
}
