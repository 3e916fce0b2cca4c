//! Upload payload variants / 上传负载的三种形态
//!
//! A payload arrives as an in-memory blob, a seekable open file handle, or
//! a reference to a local path. Dispatch is explicit on the variant; no
//! capability probing / 负载形态显式分派，不做能力探测

use std::io::SeekFrom;
use std::path::PathBuf;

use anyhow::Result;
use bytes::Bytes;
use tokio::io::AsyncSeekExt;

use crate::cos::{CosClient, CosError};
use crate::tool::ToolError;
use crate::utils::base_name;

/// File payload / 文件负载
pub enum FilePayload {
    /// In-memory content with optional metadata / 内存中的完整内容
    Blob {
        data: Bytes,
        name: Option<String>,
        content_type: Option<String>,
    },
    /// Seekable open handle; rewound before upload / 可定位的已打开句柄
    Stream {
        file: tokio::fs::File,
        name: Option<String>,
        content_type: Option<String>,
    },
    /// Reference to a file on the local filesystem / 本地文件路径引用
    Local { path: PathBuf },
}

impl FilePayload {
    /// Original filename, when one is known / 原始文件名（若可知）
    pub fn original_name(&self) -> Option<String> {
        match self {
            FilePayload::Blob { name, .. } | FilePayload::Stream { name, .. } => name.clone(),
            FilePayload::Local { path } => path
                .to_str()
                .map(|p| base_name(p).to_string())
                .filter(|n| !n.is_empty()),
        }
    }

    /// Declared content type / 声明的内容类型
    pub fn content_type(&self) -> Option<&str> {
        match self {
            FilePayload::Blob { content_type, .. } | FilePayload::Stream { content_type, .. } => {
                content_type.as_deref()
            }
            FilePayload::Local { .. } => None,
        }
    }

    /// Payload size in bytes / 负载大小（字节）
    ///
    /// For stream payloads the current position is saved and restored around
    /// the probe so the later upload still sees the full content
    /// 流式负载探测前后保存并恢复读取位置，避免消耗内容
    pub async fn size(&mut self) -> Result<u64> {
        match self {
            FilePayload::Blob { data, .. } => Ok(data.len() as u64),
            FilePayload::Stream { file, .. } => {
                let pos = file.seek(SeekFrom::Current(0)).await?;
                let end = file.seek(SeekFrom::End(0)).await?;
                file.seek(SeekFrom::Start(pos)).await?;
                Ok(end)
            }
            FilePayload::Local { path } => Ok(tokio::fs::metadata(path).await?.len()),
        }
    }

    /// Deliver the payload to the gateway / 将负载交付网关
    ///
    /// Blob uploads the buffer; Stream rewinds to the start first; Local
    /// hands the path to the gateway. A local reference that does not point
    /// at a file is not a usable payload
    /// Blob整体上传；Stream先回卷到起点；Local按路径交付，路径无效则拒绝
    pub async fn upload_to(
        &mut self,
        client: &CosClient,
        object_key: &str,
        content_type: &str,
    ) -> Result<(), ToolError> {
        match self {
            FilePayload::Blob { data, .. } => {
                client.put_object(object_key, data, content_type).await?;
            }
            FilePayload::Stream { file, .. } => {
                file.seek(SeekFrom::Start(0)).await.map_err(|e| {
                    CosError::Request(format!("failed to rewind stream: {}", e))
                })?;
                client.put_stream(file, object_key, content_type).await?;
            }
            FilePayload::Local { path } => {
                if !path.is_file() {
                    return Err(ToolError::UnsupportedPayload);
                }
                client.upload_local_file(path, object_key).await?;
            }
        }
        Ok(())
    }
}
