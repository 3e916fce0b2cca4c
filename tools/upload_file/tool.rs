//! 单文件上传工具
//!
//! 校验全部通过后才创建网关客户端发起上传，失败不产生部分副作用

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Local;

use crate::content_type::category_for;
use crate::models::{size_in_mb, UploadResult};
use crate::naming::{build_object_key, resolve_filename, NameSources};
use crate::provider::{check_path_prefix, ensure_credentials};
use crate::tool::{MessageSink, ParamItem, Tool, ToolContext, ToolError, ToolInvocation};

use super::params::UploadFileParams;

pub struct UploadFileTool;

impl UploadFileTool {
    async fn run(
        &self,
        ctx: &ToolContext,
        invocation: ToolInvocation,
        out: &mut MessageSink,
    ) -> Result<()> {
        ensure_credentials(&ctx.credentials)?;

        let ToolInvocation { params, files } = invocation;
        let params: UploadFileParams =
            serde_json::from_value(params).map_err(|e| anyhow!("Invalid parameters: {}", e))?;

        let mut file = files
            .into_iter()
            .next()
            .ok_or(ToolError::MissingParameter("file"))?;

        let directory = params.directory.trim().to_string();
        if directory.is_empty() {
            return Err(ToolError::MissingParameter("directory").into());
        }
        check_path_prefix(&directory, "directory")?;

        let explicit = params
            .filename
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        if let Some(name) = explicit {
            check_path_prefix(name, "filename")?;
        }

        // 上传前探测大小与类型，流位置会被恢复
        let file_size = file.size().await?;
        let original_name = file.original_name();
        let declared_type = file.content_type().map(str::to_string);
        let category = category_for(declared_type.as_deref(), original_name.as_deref());

        let now = Local::now();
        let filename = resolve_filename(
            NameSources {
                explicit,
                original: original_name.as_deref(),
                content_type: declared_type.as_deref(),
            },
            params.filename_mode,
            None,
            &now,
        )?;
        let object_key = build_object_key(&directory, params.directory_mode, &filename, &now);

        let client = ctx.client()?;
        let content_type = declared_type
            .unwrap_or_else(|| "application/octet-stream".to_string());
        file.upload_to(&client, &object_key, &content_type).await?;

        let source_filename = explicit
            .map(str::to_string)
            .or(original_name)
            .unwrap_or_else(|| "unknown".to_string());

        let result = UploadResult {
            filename,
            source_filename,
            file_url: client.object_url(&object_key),
            object_key,
            bucket: client.bucket_name().to_string(),
            region: client.region().to_string(),
        };
        out.json(serde_json::to_value(&result)?);

        out.text(format!(
            "File uploaded successfully!\nFilename: {}\nFile type: {}\nFile size: {:.2} MB\nAccess URL: {}\nObject key: {}",
            result.filename,
            category,
            size_in_mb(file_size),
            result.file_url,
            result.object_key
        ));
        Ok(())
    }
}

#[async_trait]
impl Tool for UploadFileTool {
    fn name(&self) -> &'static str {
        "upload_file"
    }

    fn description(&self) -> &'static str {
        "Upload a single file to Tencent COS"
    }

    fn parameters(&self) -> Vec<ParamItem> {
        vec![
            ParamItem::new("file", "file")
                .title("文件")
                .help("要上传的文件")
                .required(),
            ParamItem::new("directory", "string")
                .title("目标目录")
                .help("存储桶内的目标目录，不能以空格、/或\\开头")
                .required(),
            ParamItem::new("directory_mode", "select")
                .title("目录模式")
                .options("no_subdirectory,yyyy_mm_dd_hierarchy,yyyy_mm_dd_combined")
                .default("no_subdirectory")
                .help("是否在目录下插入日期子目录"),
            ParamItem::new("filename", "string")
                .title("文件名")
                .help("自定义文件名（可选），不能以空格、/或\\开头"),
            ParamItem::new("filename_mode", "select")
                .title("文件名模式")
                .options("filename,filename_timestamp")
                .default("filename")
                .help("是否在文件名后追加毫秒时间戳"),
        ]
    }

    async fn invoke(
        &self,
        ctx: &ToolContext,
        invocation: ToolInvocation,
        out: &mut MessageSink,
    ) -> Result<()> {
        match self.run(ctx, invocation, out).await {
            Ok(()) => Ok(()),
            Err(e) => {
                out.text(format!("Failed to upload file: {}", e));
                Err(anyhow!("Failed to upload file: {}", e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cos::CosCredentials;
    use crate::payload::FilePayload;
    use bytes::Bytes;
    use serde_json::json;

    fn ctx() -> ToolContext {
        ToolContext::new(CosCredentials {
            region: "ap-guangzhou".to_string(),
            bucket: "mybucket".to_string(),
            secret_id: "id".to_string(),
            secret_key: "key".to_string(),
        })
    }

    fn blob(name: &str) -> FilePayload {
        FilePayload::Blob {
            data: Bytes::from_static(b"data"),
            name: Some(name.to_string()),
            content_type: Some("text/plain".to_string()),
        }
    }

    #[tokio::test]
    async fn test_missing_credentials_fails_first() {
        let tool = UploadFileTool;
        let ctx = ToolContext::new(CosCredentials::default());
        let mut sink = MessageSink::new();
        let invocation =
            ToolInvocation::with_files(json!({"directory": "reports"}), vec![blob("a.txt")]);
        let err = tool.invoke(&ctx, invocation, &mut sink).await.unwrap_err();
        assert!(err.to_string().contains("Missing required credential: region"));
        // 失败信息也会以文本消息形式产出
        assert_eq!(sink.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let tool = UploadFileTool;
        let mut sink = MessageSink::new();
        let invocation = ToolInvocation::new(json!({"directory": "reports"}));
        let err = tool.invoke(&ctx(), invocation, &mut sink).await.unwrap_err();
        assert!(err.to_string().contains("Missing required parameter: file"));
    }

    #[tokio::test]
    async fn test_missing_directory() {
        let tool = UploadFileTool;
        let mut sink = MessageSink::new();
        let invocation = ToolInvocation::with_files(json!({}), vec![blob("a.txt")]);
        let err = tool.invoke(&ctx(), invocation, &mut sink).await.unwrap_err();
        assert!(err
            .to_string()
            .contains("Missing required parameter: directory"));
    }

    #[tokio::test]
    async fn test_directory_prefix_rejected() {
        let tool = UploadFileTool;
        let mut sink = MessageSink::new();
        let invocation =
            ToolInvocation::with_files(json!({"directory": "/reports"}), vec![blob("a.txt")]);
        let err = tool.invoke(&ctx(), invocation, &mut sink).await.unwrap_err();
        assert!(err
            .to_string()
            .contains("directory cannot start with space, / or \\"));
    }

    #[tokio::test]
    async fn test_explicit_filename_prefix_rejected() {
        let tool = UploadFileTool;
        let mut sink = MessageSink::new();
        let invocation = ToolInvocation::with_files(
            json!({"directory": "reports", "filename": "\\evil.txt"}),
            vec![blob("a.txt")],
        );
        let err = tool.invoke(&ctx(), invocation, &mut sink).await.unwrap_err();
        assert!(err
            .to_string()
            .contains("filename cannot start with space, / or \\"));
    }
}
