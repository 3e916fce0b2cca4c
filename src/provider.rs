//! Provider credential validation / 凭证校验
//!
//! Presence and format checks run first; the remote bucket probe only
//! happens after every local check passes / 本地校验全部通过后才发起远程探测

use serde::Deserialize;

use crate::cos::{CosClient, CosCredentials};
use crate::tool::ToolError;
use crate::utils::has_forbidden_prefix;

/// Validation request: credentials plus the optional default paths
/// 校验请求：凭证及可选的默认目录与文件名
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValidateRequest {
    #[serde(flatten)]
    pub credentials: CosCredentials,
    #[serde(default)]
    pub directory: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
}

/// All four connection fields must be present and non-empty
/// 四个连接字段必须存在且非空
pub fn ensure_credentials(credentials: &CosCredentials) -> Result<(), ToolError> {
    let required: [(&'static str, &str); 4] = [
        ("region", &credentials.region),
        ("bucket", &credentials.bucket),
        ("secret_id", &credentials.secret_id),
        ("secret_key", &credentials.secret_key),
    ];
    for (field, value) in required {
        if value.is_empty() {
            return Err(ToolError::MissingCredential(field));
        }
    }
    Ok(())
}

/// Leading-character rule for directory and filename inputs
/// 目录与文件名的开头字符规则
pub fn check_path_prefix(value: &str, field: &'static str) -> Result<(), ToolError> {
    if has_forbidden_prefix(value) {
        return Err(ToolError::InvalidPrefix(field));
    }
    Ok(())
}

/// Full provider validation including the remote bucket probe
/// 完整凭证校验，含远程桶探测
pub async fn validate(request: &ValidateRequest) -> Result<(), ToolError> {
    ensure_credentials(&request.credentials)?;

    if let Some(directory) = request.directory.as_deref().filter(|d| !d.is_empty()) {
        check_path_prefix(directory, "directory")?;
    }
    if let Some(filename) = request.filename.as_deref().filter(|f| !f.is_empty()) {
        check_path_prefix(filename, "filename")?;
    }

    let client = CosClient::new(&request.credentials)?;
    client.head_bucket().await?;
    Ok(())
}
