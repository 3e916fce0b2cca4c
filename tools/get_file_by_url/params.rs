//! URL取回参数

use serde::Deserialize;

/// Parameters of one retrieval invocation / 单次取回的参数包
#[derive(Debug, Clone, Deserialize)]
pub struct GetFileByUrlParams {
    /// 对象访问URL，支持标准COS域名与自定义域名
    #[serde(default)]
    pub file_url: String,
}
