//! 编码器配置
//!
//! 启动时从 TOML 文件和/或环境变量解析一次，然后通过 [`EncoderConfig::build`]
//! 构建算法、应用选择策略并生成 [`DelegatingPasswordEncoder`]。运行期间不支持重新加载。
//!
//! ## 示例
//!
//! ```rust
//! use tagged_password::config::EncoderConfig;
//!
//! let config = EncoderConfig::from_toml_str(
//!     r#"
//! tenant_class = "healthcare"
//! pepper = "StrongPepperUsedAcrossAllHashes"
//!
//! [bcrypt]
//! cost = 4
//!
//! [pbkdf2]
//! iterations = 1000
//! "#,
//! )
//! .unwrap();
//!
//! let encoder = config.build().unwrap();
//! assert_eq!(encoder.default_algorithm_id(), "pbkdf2");
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::{ConfigError, Error, Result};
#[cfg(feature = "argon2")]
use crate::password::{ARGON2_ID, Argon2Config, Argon2Hasher};
use crate::password::{
    Algorithm, AlgorithmRegistry, BcryptHasher, DEFAULT_ADAPTIVE_ID, DEFAULT_KEYED_ID,
    DelegatingPasswordEncoder, Pbkdf2Config, Pbkdf2Hasher, Pepper, SelectionPolicy, TenantClass,
};
#[cfg(feature = "scrypt")]
use crate::password::{SCRYPT_ID, ScryptConfig, ScryptHasher};

/// 租户分类
pub const ENV_TENANT_CLASS: &str = "TAGGED_PASSWORD_TENANT_CLASS";
/// 全局 pepper
pub const ENV_PEPPER: &str = "TAGGED_PASSWORD_PEPPER";
/// bcrypt cost
pub const ENV_BCRYPT_COST: &str = "TAGGED_PASSWORD_BCRYPT_COST";
/// PBKDF2 迭代次数
pub const ENV_PBKDF2_ITERATIONS: &str = "TAGGED_PASSWORD_PBKDF2_ITERATIONS";
/// PBKDF2 盐长度
pub const ENV_PBKDF2_SALT_LENGTH: &str = "TAGGED_PASSWORD_PBKDF2_SALT_LENGTH";

/// bcrypt 配置
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BcryptConfig {
    /// cost 参数 (4-31, 默认 10)
    pub cost: u32,
}

impl Default for BcryptConfig {
    fn default() -> Self {
        Self { cost: 10 }
    }
}

/// 编码器配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// 租户分类，决定新哈希的默认算法
    pub tenant_class: TenantClass,

    /// bcrypt 的注册 ID
    pub adaptive_id: String,

    /// PBKDF2 的注册 ID
    pub keyed_id: String,

    /// PBKDF2 使用的全局 pepper（必填）
    pub pepper: Option<Pepper>,

    /// bcrypt 参数
    pub bcrypt: BcryptConfig,

    /// PBKDF2 参数
    pub pbkdf2: Pbkdf2Config,

    /// Argon2id 参数
    #[cfg(feature = "argon2")]
    pub argon2: Argon2Config,

    /// scrypt 参数
    #[cfg(feature = "scrypt")]
    pub scrypt: ScryptConfig,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            tenant_class: TenantClass::default(),
            adaptive_id: DEFAULT_ADAPTIVE_ID.to_string(),
            keyed_id: DEFAULT_KEYED_ID.to_string(),
            pepper: None,
            bcrypt: BcryptConfig::default(),
            pbkdf2: Pbkdf2Config::default(),
            #[cfg(feature = "argon2")]
            argon2: Argon2Config::default(),
            #[cfg(feature = "scrypt")]
            scrypt: ScryptConfig::default(),
        }
    }
}

impl EncoderConfig {
    /// 创建默认配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置租户分类
    pub fn with_tenant_class(mut self, tenant_class: impl Into<TenantClass>) -> Self {
        self.tenant_class = tenant_class.into();
        self
    }

    /// 设置全局 pepper
    pub fn with_pepper(mut self, pepper: Pepper) -> Self {
        self.pepper = Some(pepper);
        self
    }

    /// 设置两个核心算法的注册 ID
    pub fn with_algorithm_ids(
        mut self,
        adaptive_id: impl Into<String>,
        keyed_id: impl Into<String>,
    ) -> Self {
        self.adaptive_id = adaptive_id.into();
        self.keyed_id = keyed_id.into();
        self
    }

    /// 设置 bcrypt cost
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt.cost = cost;
        self
    }

    /// 设置 PBKDF2 参数
    pub fn with_pbkdf2(mut self, pbkdf2: Pbkdf2Config) -> Self {
        self.pbkdf2 = pbkdf2;
        self
    }

    /// 设置 Argon2id 参数
    #[cfg(feature = "argon2")]
    pub fn with_argon2(mut self, argon2: Argon2Config) -> Self {
        self.argon2 = argon2;
        self
    }

    /// 设置 scrypt 参数
    #[cfg(feature = "scrypt")]
    pub fn with_scrypt(mut self, scrypt: ScryptConfig) -> Self {
        self.scrypt = scrypt;
        self
    }

    /// 从 TOML 字符串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()).into())
    }

    /// 从 TOML 文件加载配置
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(ConfigError::Parse(format!(
                "failed to read {}: {}",
                path.display(),
                e
            )))
        })?;
        Self::from_toml_str(&content)
    }

    /// 从环境变量读取配置（其余项使用默认值）
    pub fn from_env() -> Result<Self> {
        Self::default().apply_env()
    }

    /// 用环境变量覆盖已有配置
    ///
    /// 支持的变量：`TAGGED_PASSWORD_TENANT_CLASS`、`TAGGED_PASSWORD_PEPPER`、
    /// `TAGGED_PASSWORD_BCRYPT_COST`、`TAGGED_PASSWORD_PBKDF2_ITERATIONS`、
    /// `TAGGED_PASSWORD_PBKDF2_SALT_LENGTH`。
    pub fn apply_env(self) -> Result<Self> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    fn apply_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(tenant) = lookup(ENV_TENANT_CLASS) {
            self.tenant_class = TenantClass::from(tenant.as_str());
        }
        if let Some(pepper) = lookup(ENV_PEPPER) {
            self.pepper = Some(Pepper::new(pepper));
        }
        if let Some(cost) = lookup(ENV_BCRYPT_COST) {
            self.bcrypt.cost = parse_var(ENV_BCRYPT_COST, &cost)?;
        }
        if let Some(iterations) = lookup(ENV_PBKDF2_ITERATIONS) {
            self.pbkdf2.iterations = parse_var(ENV_PBKDF2_ITERATIONS, &iterations)?;
        }
        if let Some(salt_length) = lookup(ENV_PBKDF2_SALT_LENGTH) {
            self.pbkdf2.salt_length = parse_var(ENV_PBKDF2_SALT_LENGTH, &salt_length)?;
        }
        Ok(self)
    }

    /// 由注册 ID 组成的选择策略
    pub fn selection_policy(&self) -> SelectionPolicy {
        SelectionPolicy::new(&self.adaptive_id, &self.keyed_id)
    }

    /// 默认算法 ID（由租户分类决定）
    pub fn default_algorithm_id(&self) -> String {
        self.selection_policy()
            .select(&self.tenant_class)
            .to_string()
    }

    /// 构建委托式编码器
    ///
    /// 所有算法都会注册（以便校验旧哈希），默认算法由租户分类决定。
    ///
    /// # Errors
    ///
    /// - 缺少 pepper：`ConfigError::MissingRequired`
    /// - 参数超出范围：`ConfigError::InvalidValue`
    /// - 注册 ID 非法或重复：`RegistryError`
    pub fn build(&self) -> Result<DelegatingPasswordEncoder> {
        let pepper = self
            .pepper
            .clone()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ConfigError::MissingRequired("pepper".to_string()))?;

        let policy = self.selection_policy();
        let default_id = policy.select(&self.tenant_class);

        let mut entries: Vec<(&str, Algorithm)> = vec![
            (
                policy.adaptive_id(),
                BcryptHasher::new(self.bcrypt.cost)?.into(),
            ),
            (
                policy.keyed_id(),
                Pbkdf2Hasher::new(pepper, self.pbkdf2.clone())?.into(),
            ),
        ];
        #[cfg(feature = "argon2")]
        entries.push((ARGON2_ID, Argon2Hasher::new(&self.argon2)?.into()));
        #[cfg(feature = "scrypt")]
        entries.push((SCRYPT_ID, ScryptHasher::new(&self.scrypt)?.into()));

        let registry = AlgorithmRegistry::new(entries, default_id)?;

        info!(
            tenant_class = %self.tenant_class,
            default_algorithm = registry.default_algorithm_id(),
            algorithms = ?registry.algorithm_ids(),
            "password encoder initialised"
        );

        Ok(DelegatingPasswordEncoder::new(registry))
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| Error::invalid_config(key, e.to_string()))
}
