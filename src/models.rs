use serde::{Deserialize, Serialize};

/// Result of a single object upload / 单个文件上传结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResult {
    pub filename: String,
    pub source_filename: String,
    pub file_url: String,
    pub object_key: String,
    pub bucket: String,
    pub region: String,
}

/// Per-file entry in a batch upload report / 批量上传报告中的单文件条目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchFileReport {
    pub filename: String,
    pub file_size_bytes: u64,
    pub file_size_mb: f64,
    pub file_type: String,
    pub file_url: String,
    pub status: String,
}

/// Batch upload report envelope / 批量上传报告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchUploadReport {
    pub status: String,
    pub success_count: usize,
    pub error_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub files: Vec<BatchFileReport>,
}

/// Bytes to megabytes, rounded to two decimals / 字节换算为MB，保留两位小数
pub fn size_in_mb(bytes: u64) -> f64 {
    if bytes == 0 {
        return 0.0;
    }
    (bytes as f64 / (1024.0 * 1024.0) * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_in_mb() {
        assert_eq!(size_in_mb(0), 0.0);
        assert_eq!(size_in_mb(1024 * 1024), 1.0);
        assert_eq!(size_in_mb(1536 * 1024), 1.5);
        assert_eq!(size_in_mb(10), 0.0);
    }
}
