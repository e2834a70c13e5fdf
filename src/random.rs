//! 安全随机数与常量时间比较
//!
//! 为各个哈希算法提供盐值，并提供常量时间的字节比较。

use rand::RngCore;
use subtle::ConstantTimeEq;

/// 生成指定长度的随机盐
///
/// 使用线程本地的密码学安全随机数生成器（由操作系统熵源播种），
/// 可以在多个线程中同时调用，且不会失败。
///
/// # Example
///
/// ```rust
/// use tagged_password::random::generate_salt;
///
/// let salt = generate_salt(16);
/// assert_eq!(salt.len(), 16);
/// ```
pub fn generate_salt(length: usize) -> Vec<u8> {
    let mut salt = vec![0u8; length];
    rand::rng().fill_bytes(&mut salt);
    salt
}

/// 生成固定长度的随机盐
///
/// bcrypt 等算法要求盐是定长数组。
pub fn generate_salt_array<const N: usize>() -> [u8; N] {
    let mut salt = [0u8; N];
    rand::rng().fill_bytes(&mut salt);
    salt
}

/// 常量时间比较两个字节切片
///
/// 用于防止时序攻击。长度不同时直接返回 false（长度本身不是秘密）。
///
/// # Example
///
/// ```rust
/// use tagged_password::random::constant_time_compare;
///
/// assert!(constant_time_compare(b"derived_key", b"derived_key"));
/// assert!(!constant_time_compare(b"derived_key", b"derived_kez"));
/// ```
pub fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}
