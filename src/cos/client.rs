//! COS网关客户端
//!
//! COS speaks the S3 protocol; the bucket client is pointed at the
//! `cos.{region}.myqcloud.com` endpoint with virtual-host addressing, so
//! requests and public URLs share the `{bucket}.cos.{region}.myqcloud.com`
//! host / COS兼容S3协议，虚拟主机寻址

use s3::bucket::Bucket;
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::Region;
use thiserror::Error;
use tokio::io::AsyncRead;

use super::config::CosCredentials;

/// Gateway errors, with the credential-validation status mapping
/// 网关错误，403/404映射为凭证与桶错误
#[derive(Debug, Error)]
pub enum CosError {
    #[error("Invalid SecretId or SecretKey")]
    InvalidCredentials,
    #[error("Bucket does not exist")]
    BucketNotFound,
    #[error("COS service error: {status} {message}")]
    Service { status: u16, message: String },
    #[error("COS request failed: {0}")]
    Request(String),
    #[error("Invalid file URL: {0}")]
    InvalidUrl(String),
}

impl CosError {
    fn from_status(status: u16, message: String) -> Self {
        match status {
            403 => CosError::InvalidCredentials,
            404 => CosError::BucketNotFound,
            status => CosError::Service { status, message },
        }
    }
}

impl From<S3Error> for CosError {
    fn from(err: S3Error) -> Self {
        match err {
            S3Error::HttpFailWithBody(status, body) => CosError::from_status(status, body),
            other => CosError::Request(other.to_string()),
        }
    }
}

/// Location parsed from an object URL / 从URL解析出的对象位置
///
/// Standard COS hosts yield bucket and region; custom domains yield only
/// the decoded key / 标准域名解析出桶与区域，自定义域名仅保留对象键
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CosLocation {
    pub bucket: Option<String>,
    pub region: Option<String>,
    pub key: String,
}

/// Parse a COS-style or custom-domain object URL / 解析COS对象URL
/// 标准格式: https://{bucket}.cos.{region}.myqcloud.com/{object_key}
/// 自定义域名: https://{domain}/{object_key}
pub fn parse_cos_url(url: &str) -> Result<CosLocation, CosError> {
    let parsed = url::Url::parse(url).map_err(|_| CosError::InvalidUrl(url.to_string()))?;

    let raw_key = parsed.path().trim_start_matches('/');
    let key = urlencoding::decode(raw_key)
        .map_err(|_| CosError::InvalidUrl(url.to_string()))?
        .into_owned();

    if let Some(host) = parsed.host_str() {
        if host.ends_with(".myqcloud.com") {
            let parts: Vec<&str> = host.split('.').collect();
            if parts.len() >= 4 && parts[1] == "cos" {
                return Ok(CosLocation {
                    bucket: Some(parts[0].to_string()),
                    region: Some(parts[2].to_string()),
                    key,
                });
            }
        }
    }

    Ok(CosLocation {
        bucket: None,
        region: None,
        key,
    })
}

/// Object content and headers as fetched / 拉取到的对象内容与头部
pub struct FetchedObject {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// COS client bound to one bucket in one region / 绑定单桶单区域的COS客户端
pub struct CosClient {
    bucket: Box<Bucket>,
    bucket_name: String,
    region: String,
}

impl CosClient {
    /// Client for the credential bucket / 使用凭证中的桶与区域
    pub fn new(credentials: &CosCredentials) -> Result<Self, CosError> {
        Self::for_location(credentials, &credentials.bucket, &credentials.region)
    }

    /// Client for an explicit bucket/region, signing with the same secrets
    /// 指定桶与区域（URL解析覆盖凭证时使用），签名凭证不变
    pub fn for_location(
        credentials: &CosCredentials,
        bucket: &str,
        region: &str,
    ) -> Result<Self, CosError> {
        let creds = Credentials::new(
            Some(&credentials.secret_id),
            Some(&credentials.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| CosError::Request(format!("failed to build credentials: {}", e)))?;

        let region_cfg = Region::Custom {
            region: region.to_string(),
            endpoint: format!("https://cos.{}.myqcloud.com", region),
        };

        let bucket_client = Bucket::new(bucket, region_cfg, creds)
            .map_err(|e| CosError::Request(format!("failed to build bucket client: {}", e)))?;

        Ok(Self {
            bucket: bucket_client,
            bucket_name: bucket.to_string(),
            region: region.to_string(),
        })
    }

    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Public URL of an object / 对象的公网访问URL
    /// 格式固定: https://{bucket}.cos.{region}.myqcloud.com/{object_key}
    pub fn object_url(&self, object_key: &str) -> String {
        format!(
            "https://{}.cos.{}.myqcloud.com/{}",
            self.bucket_name, self.region, object_key
        )
    }

    /// Bucket existence / permission probe / 桶存在性与权限探测
    pub async fn head_bucket(&self) -> Result<(), CosError> {
        let (_, code) = self.bucket.head_object("/").await?;
        match code {
            200 => Ok(()),
            403 => Err(CosError::InvalidCredentials),
            404 => Err(CosError::BucketNotFound),
            code => Err(CosError::Service {
                status: code,
                message: format!("head bucket returned {}", code),
            }),
        }
    }

    /// Whole-buffer object PUT / 整体上传对象内容
    pub async fn put_object(
        &self,
        object_key: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<(), CosError> {
        self.bucket
            .put_object_with_content_type(object_key, data, content_type)
            .await?;
        Ok(())
    }

    /// PUT from an async reader / 从异步读取器上传
    pub async fn put_stream<R: AsyncRead + Unpin>(
        &self,
        reader: &mut R,
        object_key: &str,
        content_type: &str,
    ) -> Result<(), CosError> {
        self.bucket
            .put_object_stream_with_content_type(reader, object_key, content_type)
            .await?;
        Ok(())
    }

    /// PUT a file from the local filesystem / 上传本地文件
    pub async fn upload_local_file(
        &self,
        path: &std::path::Path,
        object_key: &str,
    ) -> Result<(), CosError> {
        let mut file = tokio::fs::File::open(path)
            .await
            .map_err(|e| CosError::Request(format!("failed to open {}: {}", path.display(), e)))?;
        self.put_stream(&mut file, object_key, "application/octet-stream")
            .await
    }

    /// GET object content and content type / 拉取对象内容与内容类型
    pub async fn get_object(&self, object_key: &str) -> Result<FetchedObject, CosError> {
        let response = self.bucket.get_object(object_key).await?;
        let content_type = response
            .headers()
            .get("content-type")
            .cloned()
            .unwrap_or_else(|| "application/octet-stream".to_string());
        Ok(FetchedObject {
            data: response.bytes().to_vec(),
            content_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_standard_cos_url() {
        let loc =
            parse_cos_url("https://mybucket.cos.ap-guangzhou.myqcloud.com/dir/file.pdf").unwrap();
        assert_eq!(loc.bucket.as_deref(), Some("mybucket"));
        assert_eq!(loc.region.as_deref(), Some("ap-guangzhou"));
        assert_eq!(loc.key, "dir/file.pdf");
    }

    #[test]
    fn test_parse_custom_domain_url() {
        let loc = parse_cos_url("https://cdn.example.com/dir/file.pdf").unwrap();
        assert_eq!(loc.bucket, None);
        assert_eq!(loc.region, None);
        assert_eq!(loc.key, "dir/file.pdf");
    }

    #[test]
    fn test_parse_url_decodes_key() {
        let loc =
            parse_cos_url("https://mybucket.cos.ap-beijing.myqcloud.com/docs/%E6%8A%A5%E5%91%8A.pdf")
                .unwrap();
        assert_eq!(loc.key, "docs/报告.pdf");
    }

    #[test]
    fn test_parse_myqcloud_without_cos_label() {
        // myqcloud域名但不符合{bucket}.cos.{region}形态时按自定义域名处理
        let loc = parse_cos_url("https://static.myqcloud.com/a/b.txt").unwrap();
        assert_eq!(loc.bucket, None);
        assert_eq!(loc.key, "a/b.txt");
    }

    #[test]
    fn test_parse_invalid_url() {
        assert!(matches!(
            parse_cos_url("not a url"),
            Err(CosError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_object_url_format() {
        let creds = CosCredentials {
            region: "ap-guangzhou".to_string(),
            bucket: "mybucket".to_string(),
            secret_id: "id".to_string(),
            secret_key: "key".to_string(),
        };
        let client = CosClient::new(&creds).unwrap();
        assert_eq!(
            client.object_url("reports/20240305/x.txt"),
            "https://mybucket.cos.ap-guangzhou.myqcloud.com/reports/20240305/x.txt"
        );
    }
}
