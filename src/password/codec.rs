//! 带标签哈希的编解码
//!
//! 存储格式为 `{algorithm-id}payload`。编解码器只负责识别前缀，
//! 从不解释 payload 的内容，payload 完全由对应算法决定。

use crate::error::{PasswordHashError, Result};

const PREFIX: char = '{';
const SUFFIX: char = '}';

/// 解码后的带标签哈希视图
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaggedHash<'a> {
    /// 算法 ID（不含花括号）
    pub algorithm_id: &'a str,
    /// 算法自己的 payload
    pub payload: &'a str,
}

/// 检查算法 ID 是否合法：非空，且不包含 `{` 或 `}`
pub fn validate_algorithm_id(algorithm_id: &str) -> Result<()> {
    if algorithm_id.is_empty() || algorithm_id.contains([PREFIX, SUFFIX]) {
        return Err(PasswordHashError::InvalidAlgorithmId(algorithm_id.to_string()).into());
    }
    Ok(())
}

/// 为 payload 加上算法标签
///
/// # Example
///
/// ```rust
/// use tagged_password::password::codec;
///
/// let tagged = codec::encode("bcrypt", "$2a$10$abc").unwrap();
/// assert_eq!(tagged, "{bcrypt}$2a$10$abc");
///
/// assert!(codec::encode("", "payload").is_err());
/// assert!(codec::encode("a}b", "payload").is_err());
/// ```
pub fn encode(algorithm_id: &str, payload: &str) -> Result<String> {
    validate_algorithm_id(algorithm_id)?;

    let mut tagged = String::with_capacity(algorithm_id.len() + payload.len() + 2);
    tagged.push(PREFIX);
    tagged.push_str(algorithm_id);
    tagged.push(SUFFIX);
    tagged.push_str(payload);
    Ok(tagged)
}

/// 拆分带标签的哈希
///
/// 标签必须从第 0 个字符开始，取第一个 `}` 作为结束；
/// 缺少前缀、没有闭合、ID 为空或 ID 中含有 `{` 都视为格式错误。
///
/// # Example
///
/// ```rust
/// use tagged_password::password::codec;
///
/// let tagged = codec::decode("{pbkdf2}$pbkdf2-sha256$i=1000,l=32$c2FsdA$a2V5").unwrap();
/// assert_eq!(tagged.algorithm_id, "pbkdf2");
/// assert_eq!(tagged.payload, "$pbkdf2-sha256$i=1000,l=32$c2FsdA$a2V5");
///
/// assert!(codec::decode("{}payload").is_err());
/// assert!(codec::decode("{bcrypt").is_err());
/// ```
pub fn decode(tagged: &str) -> Result<TaggedHash<'_>> {
    let rest = tagged
        .strip_prefix(PREFIX)
        .ok_or_else(|| malformed("missing '{' prefix"))?;

    let end = rest
        .find(SUFFIX)
        .ok_or_else(|| malformed("unterminated algorithm id"))?;

    let algorithm_id = &rest[..end];
    if algorithm_id.is_empty() {
        return Err(malformed("empty algorithm id"));
    }
    if algorithm_id.contains(PREFIX) {
        return Err(malformed("nested '{' in algorithm id"));
    }

    Ok(TaggedHash {
        algorithm_id,
        payload: &rest[end + SUFFIX.len_utf8()..],
    })
}

fn malformed(reason: &str) -> crate::error::Error {
    PasswordHashError::MalformedHash(reason.to_string()).into()
}
