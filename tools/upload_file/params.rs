//! 单文件上传参数

use serde::Deserialize;

use crate::naming::{DirectoryMode, FilenameMode};

/// Parameters of one upload invocation / 单次上传的参数包
#[derive(Debug, Clone, Deserialize)]
pub struct UploadFileParams {
    /// 目标目录（必填）
    #[serde(default)]
    pub directory: String,
    /// 目录布局模式
    #[serde(default)]
    pub directory_mode: DirectoryMode,
    /// 用户指定的文件名（可选）
    #[serde(default)]
    pub filename: Option<String>,
    /// 文件名后缀策略
    #[serde(default)]
    pub filename_mode: FilenameMode,
}
