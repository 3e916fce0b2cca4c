//! COS连接凭证

use serde::{Deserialize, Serialize};

/// Connection credentials for one invocation / 单次调用的连接凭证
///
/// Values are opaque pass-through; only presence is ever checked. Owned by
/// the caller for the duration of one invocation, never persisted
/// 凭证仅做存在性校验，随调用结束丢弃，不落盘
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CosCredentials {
    /// 区域，如 ap-guangzhou
    #[serde(default)]
    pub region: String,
    /// 存储桶名称
    #[serde(default)]
    pub bucket: String,
    /// SecretId
    #[serde(default)]
    pub secret_id: String,
    /// SecretKey
    #[serde(default)]
    pub secret_key: String,
}
