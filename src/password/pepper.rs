//! 全局 pepper
//!
//! pepper 是进程级的秘密值，只由 PBKDF2 算法使用。它不会写入 payload，
//! `Debug` 输出也不会暴露内容。

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};

/// 进程级秘密值
pub struct Pepper(SecretString);

impl Pepper {
    /// 从配置值创建 pepper
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretString::from(value.into()))
    }

    /// pepper 是否为空
    pub fn is_empty(&self) -> bool {
        self.0.expose_secret().is_empty()
    }

    pub(crate) fn expose(&self) -> &[u8] {
        self.0.expose_secret().as_bytes()
    }
}

impl Clone for Pepper {
    fn clone(&self) -> Self {
        Self::new(self.0.expose_secret())
    }
}

impl fmt::Debug for Pepper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Pepper([REDACTED])")
    }
}

impl<'de> Deserialize<'de> for Pepper {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Pepper::new)
    }
}
