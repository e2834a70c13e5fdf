//! 租户分类与默认算法选择策略
//!
//! 租户分类在启动时确定，整个进程生命周期内不变。策略只决定*新*哈希
//! 使用哪个算法；已存储的哈希始终按标签中的算法校验。

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use super::{DEFAULT_ADAPTIVE_ID, DEFAULT_KEYED_ID};

/// 租户分类
///
/// 解析时不区分大小写：
///
/// - `regulated` / `healthcare` → [`TenantClass::Regulated`]
/// - `standard` / `retail` / `general` / 空字符串 → [`TenantClass::Standard`]
/// - 其他任意值 → [`TenantClass::Unrecognized`]（不是错误，按普通租户处理）
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TenantClass {
    /// 普通用户群体
    #[default]
    Standard,
    /// 受监管行业（需要合规的密钥派生算法）
    Regulated,
    /// 未识别的分类
    Unrecognized(String),
}

impl TenantClass {
    /// 分类名称
    pub fn as_str(&self) -> &str {
        match self {
            TenantClass::Standard => "standard",
            TenantClass::Regulated => "regulated",
            TenantClass::Unrecognized(name) => name,
        }
    }
}

impl From<&str> for TenantClass {
    fn from(s: &str) -> Self {
        let name = s.trim();
        match name.to_ascii_lowercase().as_str() {
            "regulated" | "healthcare" => TenantClass::Regulated,
            "" | "standard" | "retail" | "general" => TenantClass::Standard,
            _ => TenantClass::Unrecognized(name.to_string()),
        }
    }
}

impl FromStr for TenantClass {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(TenantClass::from(s))
    }
}

impl fmt::Display for TenantClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TenantClass {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(TenantClass::from(name.as_str()))
    }
}

/// 默认算法选择策略
///
/// 纯函数：`TenantClass -> 算法 ID`。
///
/// # Example
///
/// ```rust
/// use tagged_password::password::{SelectionPolicy, TenantClass};
///
/// let policy = SelectionPolicy::default();
/// assert_eq!(policy.select(&TenantClass::Regulated), "pbkdf2");
/// assert_eq!(policy.select(&TenantClass::Standard), "bcrypt");
/// assert_eq!(policy.select(&TenantClass::from("logistics")), "bcrypt");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionPolicy {
    adaptive_id: String,
    keyed_id: String,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_ADAPTIVE_ID, DEFAULT_KEYED_ID)
    }
}

impl SelectionPolicy {
    /// 创建策略
    ///
    /// # Arguments
    ///
    /// * `adaptive_id` - 自适应加盐哈希（bcrypt）的注册 ID
    /// * `keyed_id` - 密钥派生哈希（PBKDF2）的注册 ID
    pub fn new(adaptive_id: impl Into<String>, keyed_id: impl Into<String>) -> Self {
        Self {
            adaptive_id: adaptive_id.into(),
            keyed_id: keyed_id.into(),
        }
    }

    /// 为租户分类选择默认算法 ID
    pub fn select(&self, tenant: &TenantClass) -> &str {
        match tenant {
            TenantClass::Regulated => &self.keyed_id,
            TenantClass::Standard | TenantClass::Unrecognized(_) => &self.adaptive_id,
        }
    }

    /// 自适应加盐哈希的 ID
    pub fn adaptive_id(&self) -> &str {
        &self.adaptive_id
    }

    /// 密钥派生哈希的 ID
    pub fn keyed_id(&self) -> &str {
        &self.keyed_id
    }
}
