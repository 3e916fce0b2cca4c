//! 批量上传工具
//!
//! 任一文件失败则整个批次失败，但失败前仍会输出逐文件的诊断明细

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Local;

use crate::content_type::category_for;
use crate::models::{size_in_mb, BatchFileReport, BatchUploadReport, UploadResult};
use crate::naming::{build_object_key, resolve_filename, NameSources};
use crate::payload::FilePayload;
use crate::provider::{check_path_prefix, ensure_credentials};
use crate::tool::{MessageSink, ParamItem, Tool, ToolContext, ToolError, ToolInvocation};

use super::params::MultiUploadFilesParams;

/// 单次批量上传的最大文件数
pub const MAX_FILES: usize = 10;

pub struct MultiUploadFilesTool;

/// Metadata probed per item before any upload / 上传前逐文件探测到的元数据
struct ItemInfo {
    original_name: Option<String>,
    content_type: Option<String>,
    size: u64,
    category: String,
}

/// Probe every payload up front; stream positions are restored
/// 预先探测全部负载，流位置会被恢复
async fn probe_items(files: &mut [FilePayload]) -> Vec<ItemInfo> {
    let mut infos = Vec::with_capacity(files.len());
    for file in files.iter_mut() {
        let size = file.size().await.unwrap_or(0);
        let original_name = file.original_name();
        let content_type = file.content_type().map(str::to_string);
        let category = category_for(content_type.as_deref(), original_name.as_deref()).to_string();
        infos.push(ItemInfo {
            original_name,
            content_type,
            size,
            category,
        });
    }
    infos
}

impl MultiUploadFilesTool {
    async fn run(
        &self,
        ctx: &ToolContext,
        params: serde_json::Value,
        files: &mut [FilePayload],
        infos: &[ItemInfo],
    ) -> Result<Vec<UploadResult>> {
        ensure_credentials(&ctx.credentials)?;

        let params: MultiUploadFilesParams =
            serde_json::from_value(params).map_err(|e| anyhow!("Invalid parameters: {}", e))?;

        if files.is_empty() {
            return Err(ToolError::MissingParameter("files").into());
        }

        let directory = params.directory.trim().to_string();
        if directory.is_empty() {
            return Err(ToolError::MissingParameter("directory").into());
        }

        if files.len() > MAX_FILES {
            return Err(ToolError::BatchSizeExceeded(MAX_FILES).into());
        }

        check_path_prefix(&directory, "directory")?;

        let client = ctx.client()?;
        let batch = files.len();
        let mut results = Vec::with_capacity(batch);

        for (idx, (file, info)) in files.iter_mut().zip(infos).enumerate() {
            let now = Local::now();
            let filename = resolve_filename(
                NameSources {
                    explicit: None,
                    original: info.original_name.as_deref(),
                    content_type: info.content_type.as_deref(),
                },
                params.filename_mode,
                (batch > 1).then_some(idx + 1),
                &now,
            )
            .map_err(|e| anyhow!("Error processing file {}: {}", idx + 1, e))?;

            let object_key = build_object_key(&directory, params.directory_mode, &filename, &now);
            let content_type = info
                .content_type
                .clone()
                .unwrap_or_else(|| "application/octet-stream".to_string());

            file.upload_to(&client, &object_key, &content_type)
                .await
                .map_err(|e| anyhow!("Failed to upload file {}: {}", idx + 1, e))?;

            results.push(UploadResult {
                filename,
                source_filename: info
                    .original_name
                    .clone()
                    .unwrap_or_else(|| "unknown".to_string()),
                file_url: client.object_url(&object_key),
                object_key,
                bucket: client.bucket_name().to_string(),
                region: client.region().to_string(),
            });
        }

        Ok(results)
    }

    fn success_report(infos: &[ItemInfo], results: &[UploadResult]) -> BatchUploadReport {
        let files = infos
            .iter()
            .zip(results)
            .map(|(info, result)| BatchFileReport {
                filename: result.filename.clone(),
                file_size_bytes: info.size,
                file_size_mb: size_in_mb(info.size),
                file_type: info.category.clone(),
                file_url: result.file_url.clone(),
                status: "success".to_string(),
            })
            .collect();
        BatchUploadReport {
            status: "completed".to_string(),
            success_count: results.len(),
            error_count: 0,
            error_message: None,
            files,
        }
    }

    fn failure_report(infos: &[ItemInfo], error_message: &str) -> BatchUploadReport {
        let files = infos
            .iter()
            .map(|info| BatchFileReport {
                filename: info
                    .original_name
                    .clone()
                    .unwrap_or_else(|| "unknown".to_string()),
                file_size_bytes: info.size,
                file_size_mb: size_in_mb(info.size),
                file_type: info.category.clone(),
                file_url: String::new(),
                status: "failed".to_string(),
            })
            .collect();
        BatchUploadReport {
            status: "failed".to_string(),
            success_count: 0,
            error_count: infos.len(),
            error_message: Some(error_message.to_string()),
            files,
        }
    }
}

#[async_trait]
impl Tool for MultiUploadFilesTool {
    fn name(&self) -> &'static str {
        "multi_upload_files"
    }

    fn description(&self) -> &'static str {
        "Upload up to 10 files to Tencent COS in one batch"
    }

    fn parameters(&self) -> Vec<ParamItem> {
        vec![
            ParamItem::new("files", "files")
                .title("文件列表")
                .help("要上传的文件，一次最多10个")
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
        let ToolInvocation { params, mut files } = invocation;
        let infos = probe_items(&mut files).await;

        match self.run(ctx, params, &mut files, &infos).await {
            Ok(results) => {
                let report = Self::success_report(&infos, &results);
                let mut text = format!(
                    "Batch upload completed\nSuccess: {} files\nFailed: 0 files\n\nSuccessful files:\n",
                    results.len()
                );
                for file in &report.files {
                    text.push_str(&format!(
                        "- File name: {}\n  File size: {} MB ({} bytes)\n  File type: {}\n  File URL: {}\n\n",
                        file.filename,
                        file.file_size_mb,
                        file.file_size_bytes,
                        file.file_type,
                        file.file_url
                    ));
                }
                out.json(serde_json::to_value(&report)?);
                out.text(text);
                Ok(())
            }
            Err(e) => {
                let error_message = e.to_string();
                let report = Self::failure_report(&infos, &error_message);
                let mut text = format!(
                    "Batch upload failed\nSuccess: 0 files\nFailed: {} files\nError: {}\n\nFailed files:\n",
                    infos.len(),
                    error_message
                );
                for file in &report.files {
                    text.push_str(&format!(
                        "- File name: {}\n  File size: {} MB ({} bytes)\n  File type: {}\n  Status: Failed\n\n",
                        file.filename, file.file_size_mb, file.file_size_bytes, file.file_type
                    ));
                }
                out.json(serde_json::to_value(&report)?);
                out.text(text);
                Err(anyhow!("Failed to upload files: {}", error_message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cos::CosCredentials;
    use crate::tool::ToolMessage;
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
    async fn test_batch_size_limit() {
        let tool = MultiUploadFilesTool;
        let mut sink = MessageSink::new();
        let files: Vec<FilePayload> = (0..11).map(|i| blob(&format!("f{}.txt", i))).collect();
        let invocation = ToolInvocation::with_files(json!({"directory": "reports"}), files);

        let err = tool.invoke(&ctx(), invocation, &mut sink).await.unwrap_err();
        assert!(err
            .to_string()
            .contains("Maximum number of files allowed is 10"));
    }

    #[tokio::test]
    async fn test_missing_files() {
        let tool = MultiUploadFilesTool;
        let mut sink = MessageSink::new();
        let invocation = ToolInvocation::new(json!({"directory": "reports"}));
        let err = tool.invoke(&ctx(), invocation, &mut sink).await.unwrap_err();
        assert!(err.to_string().contains("Missing required parameter: files"));
    }

    #[tokio::test]
    async fn test_failure_emits_diagnostics_before_error() {
        let tool = MultiUploadFilesTool;
        let mut sink = MessageSink::new();
        // 缺少directory会在上传前失败，但逐文件明细仍应产出
        let invocation =
            ToolInvocation::with_files(json!({}), vec![blob("a.txt"), blob("b.txt")]);
        assert!(tool.invoke(&ctx(), invocation, &mut sink).await.is_err());

        let messages = sink.messages();
        assert_eq!(messages.len(), 2);
        match &messages[0] {
            ToolMessage::Json { data } => {
                assert_eq!(data["status"], "failed");
                assert_eq!(data["error_count"], 2);
                assert_eq!(data["files"][0]["filename"], "a.txt");
                assert_eq!(data["files"][0]["status"], "failed");
                assert_eq!(data["files"][0]["file_type"], "text");
            }
            other => panic!("expected json message, got {:?}", other),
        }
        match &messages[1] {
            ToolMessage::Text { text } => {
                assert!(text.starts_with("Batch upload failed"));
                assert!(text.contains("Failed: 2 files"));
            }
            other => panic!("expected text message, got {:?}", other),
        }
    }
}
