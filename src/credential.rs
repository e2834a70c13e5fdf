//! 凭据存储与注册/登录流程
//!
//! 编码器本身不访问存储。这里定义存储接口（按身份标识读写带标签的哈希），
//! 以及把编码器和存储串起来的注册、登录、改密流程。
//!
//! ## 示例
//!
//! ```rust
//! use std::sync::Arc;
//! use tagged_password::config::EncoderConfig;
//! use tagged_password::credential::{CredentialService, InMemoryCredentialStore};
//! use tagged_password::password::{Pbkdf2Config, Pepper};
//!
//! let encoder = EncoderConfig::new()
//!     .with_pepper(Pepper::new("pepper"))
//!     .with_bcrypt_cost(4)
//!     .with_pbkdf2(Pbkdf2Config::new().with_iterations(1_000))
//!     .build()
//!     .unwrap();
//!
//! let service = CredentialService::new(Arc::new(encoder), InMemoryCredentialStore::new());
//! service.register("alice", "password123").unwrap();
//!
//! assert!(service.authenticate("alice", "password123").unwrap());
//! assert!(!service.authenticate("alice", "wrong").unwrap());
//! assert!(!service.authenticate("nobody", "password123").unwrap());
//! ```

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result, StorageError};
use crate::password::DelegatingPasswordEncoder;

/// 凭据记录
///
/// 只保存带标签的哈希，从不保存原始密码。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// 身份标识（如用户名）
    pub identity: String,

    /// 带标签的哈希
    pub password_hash: String,

    /// 创建时间
    pub created_at: DateTime<Utc>,

    /// 最后一次更新哈希的时间
    pub updated_at: DateTime<Utc>,
}

impl CredentialRecord {
    /// 创建新的记录
    pub fn new(identity: impl Into<String>, password_hash: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            identity: identity.into(),
            password_hash: password_hash.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// 替换哈希并更新时间
    pub fn replace_hash(&mut self, password_hash: impl Into<String>) {
        self.password_hash = password_hash.into();
        self.updated_at = Utc::now();
    }
}

/// 凭据存储 trait
///
/// 实现此 trait 可以接入任意键值存储
pub trait CredentialStore: Send + Sync {
    /// 按身份标识查找记录
    fn find(&self, identity: &str) -> Result<Option<CredentialRecord>>;

    /// 仅在身份标识不存在时插入记录
    ///
    /// 检查与写入必须是一个原子操作。已存在时返回 `StorageError::AlreadyExists`。
    fn insert(&self, record: &CredentialRecord) -> Result<()>;

    /// 保存（插入或覆盖）记录
    fn save(&self, record: &CredentialRecord) -> Result<()>;

    /// 仅当存储的哈希仍等于 `expected_hash` 时替换记录
    ///
    /// 比较与替换必须是一个原子操作。返回是否发生了替换；
    /// 记录不存在或哈希已被改动时返回 `Ok(false)`。
    fn replace_if(
        &self,
        identity: &str,
        expected_hash: &str,
        record: &CredentialRecord,
    ) -> Result<bool>;

    /// 删除记录，返回是否存在
    fn delete(&self, identity: &str) -> Result<bool>;
}

impl<S: CredentialStore + ?Sized> CredentialStore for Arc<S> {
    fn find(&self, identity: &str) -> Result<Option<CredentialRecord>> {
        (**self).find(identity)
    }

    fn insert(&self, record: &CredentialRecord) -> Result<()> {
        (**self).insert(record)
    }

    fn save(&self, record: &CredentialRecord) -> Result<()> {
        (**self).save(record)
    }

    fn replace_if(
        &self,
        identity: &str,
        expected_hash: &str,
        record: &CredentialRecord,
    ) -> Result<bool> {
        (**self).replace_if(identity, expected_hash, record)
    }

    fn delete(&self, identity: &str) -> Result<bool> {
        (**self).delete(identity)
    }
}

/// 内存凭据存储
///
/// 用于开发和测试
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    records: RwLock<HashMap<String, CredentialRecord>>,
}

impl InMemoryCredentialStore {
    /// 创建新的内存存储
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录数量
    pub fn len(&self) -> Result<usize> {
        let records = self.records.read().map_err(|_| lock_poisoned())?;
        Ok(records.len())
    }

    /// 是否为空
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

fn lock_poisoned() -> Error {
    Error::Storage(StorageError::OperationFailed("lock poisoned".into()))
}

impl CredentialStore for InMemoryCredentialStore {
    fn find(&self, identity: &str) -> Result<Option<CredentialRecord>> {
        let records = self.records.read().map_err(|_| lock_poisoned())?;
        Ok(records.get(identity).cloned())
    }

    fn insert(&self, record: &CredentialRecord) -> Result<()> {
        let mut records = self.records.write().map_err(|_| lock_poisoned())?;
        match records.entry(record.identity.clone()) {
            Entry::Occupied(_) => {
                Err(StorageError::AlreadyExists(record.identity.clone()).into())
            }
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(())
            }
        }
    }

    fn save(&self, record: &CredentialRecord) -> Result<()> {
        let mut records = self.records.write().map_err(|_| lock_poisoned())?;
        records.insert(record.identity.clone(), record.clone());
        Ok(())
    }

    fn replace_if(
        &self,
        identity: &str,
        expected_hash: &str,
        record: &CredentialRecord,
    ) -> Result<bool> {
        let mut records = self.records.write().map_err(|_| lock_poisoned())?;
        match records.get_mut(identity) {
            Some(current) if current.password_hash == expected_hash => {
                *current = record.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn delete(&self, identity: &str) -> Result<bool> {
        let mut records = self.records.write().map_err(|_| lock_poisoned())?;
        Ok(records.remove(identity).is_some())
    }
}

/// 注册/登录流程
///
/// 哈希升级由调用方选择开启：启用 `with_upgrade_on_login(true)` 后，
/// 登录成功且存储的哈希不是当前默认算法时，会重新编码并保存。
pub struct CredentialService<S> {
    encoder: Arc<DelegatingPasswordEncoder>,
    store: S,
    upgrade_on_login: bool,
}

impl<S: CredentialStore> CredentialService<S> {
    /// 创建服务
    pub fn new(encoder: Arc<DelegatingPasswordEncoder>, store: S) -> Self {
        Self {
            encoder,
            store,
            upgrade_on_login: false,
        }
    }

    /// 设置登录成功后是否自动升级哈希
    pub fn with_upgrade_on_login(mut self, enabled: bool) -> Self {
        self.upgrade_on_login = enabled;
        self
    }

    /// 使用的编码器
    pub fn encoder(&self) -> &DelegatingPasswordEncoder {
        &self.encoder
    }

    /// 使用的存储
    pub fn store(&self) -> &S {
        &self.store
    }

    /// 注册新凭据
    ///
    /// # Errors
    ///
    /// 身份标识已存在时返回 `StorageError::AlreadyExists`
    pub fn register(
        &self,
        identity: &str,
        raw: impl AsRef<[u8]>,
    ) -> Result<CredentialRecord> {
        // 提前返回，避免为已存在的身份计算哈希
        if self.store.find(identity)?.is_some() {
            return Err(StorageError::AlreadyExists(identity.to_string()).into());
        }

        let record = CredentialRecord::new(identity, self.encoder.encode(raw)?);
        self.store.insert(&record)?;
        info!(
            identity,
            algorithm = self.encoder.default_algorithm_id(),
            "registered credential"
        );
        Ok(record)
    }

    /// 仅在身份标识不存在时注册，返回是否插入了新记录
    ///
    /// 适合启动时写入初始账号。
    pub fn seed(&self, identity: &str, raw: impl AsRef<[u8]>) -> Result<bool> {
        match self.register(identity, raw) {
            Ok(_) => Ok(true),
            Err(Error::Storage(StorageError::AlreadyExists(_))) => {
                debug!(identity, "credential already present, skipping seed");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// 校验登录
    ///
    /// # Returns
    ///
    /// 身份不存在或密码错误返回 `Ok(false)`
    ///
    /// # Errors
    ///
    /// 存储的哈希格式错误或算法未注册时返回错误，不会当作密码错误
    pub fn authenticate(&self, identity: &str, raw: impl AsRef<[u8]>) -> Result<bool> {
        let raw = raw.as_ref();

        let Some(mut record) = self.store.find(identity)? else {
            debug!(identity, "unknown identity");
            return Ok(false);
        };

        if !self.encoder.matches(raw, &record.password_hash)? {
            return Ok(false);
        }

        if self.upgrade_on_login && self.encoder.needs_upgrade(&record.password_hash)? {
            let matched_hash = record.password_hash.clone();
            record.replace_hash(self.encoder.encode(raw)?);

            // 只在存储的哈希仍是刚才校验通过的那个时写回
            if self.store.replace_if(identity, &matched_hash, &record)? {
                info!(
                    identity,
                    algorithm = self.encoder.default_algorithm_id(),
                    "upgraded password hash"
                );
            } else {
                debug!(identity, "credential changed during upgrade, skipping");
            }
        }

        Ok(true)
    }

    /// 修改密码，使用当前默认算法
    ///
    /// # Errors
    ///
    /// 身份标识不存在时返回 `StorageError::NotFound`
    pub fn change_password(&self, identity: &str, raw: impl AsRef<[u8]>) -> Result<()> {
        let mut record = self
            .store
            .find(identity)?
            .ok_or_else(|| StorageError::NotFound(identity.to_string()))?;

        record.replace_hash(self.encoder.encode(raw)?);
        self.store.save(&record)?;
        info!(identity, "changed password");
        Ok(())
    }
}
