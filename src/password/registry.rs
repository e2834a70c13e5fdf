//! 算法注册表
//!
//! 在启动时构建一次，之后只读。注册表保存 `算法 ID -> 算法` 的映射，
//! 以及新哈希使用的默认算法 ID。

use std::collections::HashMap;

use super::algorithm::Algorithm;
use super::codec::validate_algorithm_id;
use crate::error::{PasswordHashError, RegistryError, Result};

/// 不可变的算法注册表
#[derive(Debug)]
pub struct AlgorithmRegistry {
    algorithms: HashMap<String, Algorithm>,
    default_id: String,
}

impl AlgorithmRegistry {
    /// 从 `(算法 ID, 算法)` 列表构建注册表
    ///
    /// # Errors
    ///
    /// - ID 为空或包含花括号：`RegistryError::InvalidAlgorithmId`
    /// - ID 重复：`RegistryError::DuplicateAlgorithmId`
    /// - `default_id` 不在列表中：`RegistryError::UnknownDefaultAlgorithm`
    ///
    /// # Example
    ///
    /// ```rust
    /// use tagged_password::password::{AlgorithmRegistry, BcryptHasher};
    ///
    /// let registry = AlgorithmRegistry::new(
    ///     [("bcrypt", BcryptHasher::new(4).unwrap().into())],
    ///     "bcrypt",
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(registry.default_algorithm_id(), "bcrypt");
    /// assert!(registry.get("md5").is_err());
    /// ```
    pub fn new<I, S>(entries: I, default_id: impl Into<String>) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Algorithm)>,
        S: Into<String>,
    {
        let mut algorithms = HashMap::new();

        for (id, algorithm) in entries {
            let id = id.into();
            if validate_algorithm_id(&id).is_err() {
                return Err(RegistryError::InvalidAlgorithmId(id).into());
            }
            if algorithms.contains_key(&id) {
                return Err(RegistryError::DuplicateAlgorithmId(id).into());
            }
            algorithms.insert(id, algorithm);
        }

        let default_id = default_id.into();
        if !algorithms.contains_key(&default_id) {
            return Err(RegistryError::UnknownDefaultAlgorithm(default_id).into());
        }

        Ok(Self {
            algorithms,
            default_id,
        })
    }

    /// 按 ID 查找算法
    ///
    /// # Errors
    ///
    /// 未注册时返回 `PasswordHashError::UnsupportedAlgorithm`
    pub fn get(&self, id: &str) -> Result<&Algorithm> {
        self.algorithms
            .get(id)
            .ok_or_else(|| PasswordHashError::UnsupportedAlgorithm(id.to_string()).into())
    }

    /// 新哈希使用的算法 ID
    pub fn default_algorithm_id(&self) -> &str {
        &self.default_id
    }

    /// 默认算法
    pub fn default_algorithm(&self) -> &Algorithm {
        // 构建时已保证默认 ID 存在
        &self.algorithms[&self.default_id]
    }

    /// 是否注册了某个 ID
    pub fn contains(&self, id: &str) -> bool {
        self.algorithms.contains_key(id)
    }

    /// 已注册的 ID（排序后）
    pub fn algorithm_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.algorithms.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}
