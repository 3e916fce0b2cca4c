//! URL取回工具
//!
//! URL中解析出的桶与区域优先于凭证值，签名凭证不变

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::content_type;
use crate::cos::{parse_cos_url, CosClient};
use crate::models::size_in_mb;
use crate::provider::ensure_credentials;
use crate::tool::{BlobMeta, MessageSink, ParamItem, Tool, ToolContext, ToolError, ToolInvocation};
use crate::utils::{base_name, ext_of};

use super::params::GetFileByUrlParams;

pub struct GetFileByUrlTool;

impl GetFileByUrlTool {
    async fn run(
        &self,
        ctx: &ToolContext,
        invocation: ToolInvocation,
        out: &mut MessageSink,
    ) -> Result<()> {
        ensure_credentials(&ctx.credentials)?;

        let params: GetFileByUrlParams = serde_json::from_value(invocation.params)
            .map_err(|e| anyhow!("Invalid parameters: {}", e))?;

        let file_url = params.file_url.trim();
        if file_url.is_empty() {
            return Err(ToolError::MissingParameter("file_url").into());
        }

        let location = parse_cos_url(file_url)?;
        let bucket = location
            .bucket
            .unwrap_or_else(|| ctx.credentials.bucket.clone());
        let region = location
            .region
            .unwrap_or_else(|| ctx.credentials.region.clone());

        let client = CosClient::for_location(&ctx.credentials, &bucket, &region)?;
        let fetched = client.get_object(&location.key).await?;

        let mut filename = base_name(&location.key).to_string();
        let mut extension = ext_of(&filename);
        if extension.is_empty() {
            // 对象键没有扩展名时按内容类型补全，便于前端展示
            if let Some(ext) = content_type::lookup(&fetched.content_type) {
                extension = format!(".{}", ext);
                filename.push_str(&extension);
            }
        }

        let size = fetched.data.len() as u64;
        let is_image = fetched.content_type.starts_with("image/");
        let meta = BlobMeta {
            filename: filename.clone(),
            content_type: fetched.content_type.clone(),
            mime_type: fetched.content_type.clone(),
            size,
            extension,
            is_image: is_image.then_some(true),
            display_as_image: is_image.then_some(true),
            file_type: is_image.then(|| "image".to_string()),
        };
        let content_type = fetched.content_type;
        out.blob(fetched.data, meta);

        out.text(format!(
            "File downloaded successfully: {}\nFile size: {:.2} MB\nFile type: {}",
            filename,
            size_in_mb(size),
            content_type
        ));
        Ok(())
    }
}

#[async_trait]
impl Tool for GetFileByUrlTool {
    fn name(&self) -> &'static str {
        "get_file_by_url"
    }

    fn description(&self) -> &'static str {
        "Fetch an object from Tencent COS by its URL"
    }

    fn parameters(&self) -> Vec<ParamItem> {
        vec![ParamItem::new("file_url", "string")
            .title("文件URL")
            .help("标准COS地址或自定义域名地址")
            .required()]
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
                out.text(format!("Failed to download file: {}", e));
                Err(anyhow!("Failed to download file: {}", e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cos::CosCredentials;
    use serde_json::json;

    fn ctx() -> ToolContext {
        ToolContext::new(CosCredentials {
            region: "ap-guangzhou".to_string(),
            bucket: "mybucket".to_string(),
            secret_id: "id".to_string(),
            secret_key: "key".to_string(),
        })
    }

    #[tokio::test]
    async fn test_missing_file_url() {
        let tool = GetFileByUrlTool;
        let mut sink = MessageSink::new();
        let invocation = ToolInvocation::new(json!({}));
        let err = tool.invoke(&ctx(), invocation, &mut sink).await.unwrap_err();
        assert!(err
            .to_string()
            .contains("Missing required parameter: file_url"));
        assert_eq!(sink.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let tool = GetFileByUrlTool;
        let mut sink = MessageSink::new();
        let invocation = ToolInvocation::new(json!({"file_url": "not a url"}));
        let err = tool.invoke(&ctx(), invocation, &mut sink).await.unwrap_err();
        assert!(err.to_string().contains("Invalid file URL"));
    }
}
