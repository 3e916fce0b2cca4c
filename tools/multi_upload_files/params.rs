//! 批量上传参数

use serde::Deserialize;

use crate::naming::{DirectoryMode, FilenameMode};

/// Parameters of one batch upload invocation / 单次批量上传的参数包
/// 批量上传不支持自定义文件名，文件名取各文件的原始名称
#[derive(Debug, Clone, Deserialize)]
pub struct MultiUploadFilesParams {
    /// 目标目录（必填）
    #[serde(default)]
    pub directory: String,
    /// 目录布局模式
    #[serde(default)]
    pub directory_mode: DirectoryMode,
    /// 文件名后缀策略
    #[serde(default)]
    pub filename_mode: FilenameMode,
}
