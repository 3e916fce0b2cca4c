// Tool package / 工具包
pub mod get_file_by_url;
pub mod multi_upload_files;
pub mod upload_file;

use std::sync::Arc;

use crate::tool::ToolRegistry;

/// Register all tools / 注册所有工具
pub async fn register_all(registry: &ToolRegistry) -> anyhow::Result<()> {
    // Register single-file upload tool / 注册单文件上传工具
    registry
        .register(Arc::new(upload_file::UploadFileTool))
        .await?;
    // Register batch upload tool / 注册批量上传工具
    registry
        .register(Arc::new(multi_upload_files::MultiUploadFilesTool))
        .await?;
    // Register URL retrieval tool / 注册URL取回工具
    registry
        .register(Arc::new(get_file_by_url::GetFileByUrlTool))
        .await?;
    Ok(())
}
