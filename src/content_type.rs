//! Content-type registry / 文件类型与扩展名映射
//!
//! Fixed MIME-to-extension table plus coarse file-type classification.
//! The table never changes at runtime / 表在构建期固定，运行期不变

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;

use crate::utils::ext_of;

/// MIME string -> extension (without dot) / MIME类型到扩展名（不含点号）
const CONTENT_TYPE_TABLE: &[(&str, &str)] = &[
    // 图片类型
    ("image/jpeg", "jpg"),
    ("image/jpg", "jpg"),
    ("image/png", "png"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
    ("image/bmp", "bmp"),
    ("image/tiff", "tiff"),
    ("image/svg+xml", "svg"),
    ("image/x-icon", "ico"),
    // 文档类型
    ("application/pdf", "pdf"),
    ("application/msword", "doc"),
    (
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "docx",
    ),
    ("application/vnd.ms-excel", "xls"),
    (
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "xlsx",
    ),
    ("application/vnd.ms-powerpoint", "ppt"),
    (
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "pptx",
    ),
    // 文本类型
    ("text/plain", "txt"),
    ("text/html", "html"),
    ("text/css", "css"),
    ("text/javascript", "js"),
    ("application/json", "json"),
    ("application/xml", "xml"),
    ("text/xml", "xml"),
    // 压缩文件
    ("application/zip", "zip"),
    ("application/x-rar-compressed", "rar"),
    ("application/x-tar", "tar"),
    ("application/x-gzip", "gz"),
    ("application/x-7z-compressed", "7z"),
    // 音频类型
    ("audio/mpeg", "mp3"),
    ("audio/wav", "wav"),
    ("audio/ogg", "ogg"),
    ("audio/x-wav", "wav"),
    ("audio/aac", "aac"),
    ("audio/flac", "flac"),
    // 视频类型
    ("video/mp4", "mp4"),
    ("video/mpeg", "mpeg"),
    ("video/quicktime", "mov"),
    ("video/x-msvideo", "avi"),
    ("video/x-ms-wmv", "wmv"),
    ("video/webm", "webm"),
    ("video/x-flv", "flv"),
    // 其他类型
    ("application/octet-stream", "bin"),
    ("application/x-shockwave-flash", "swf"),
    ("application/x-www-form-urlencoded", "txt"),
];

static EXACT: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| CONTENT_TYPE_TABLE.iter().copied().collect());

/// Look up the bare extension for a content type / 查找内容类型对应的扩展名
/// Exact match first, then the longest table key that is a prefix of the
/// input (vendor variants carry version suffixes) / 先精确匹配，再取最长前缀匹配
pub fn lookup(content_type: &str) -> Option<&'static str> {
    let ct = content_type.trim().to_lowercase();
    if let Some(ext) = EXACT.get(ct.as_str()).copied() {
        return Some(ext);
    }
    CONTENT_TYPE_TABLE
        .iter()
        .filter(|(mime, _)| ct.starts_with(mime))
        .max_by_key(|(mime, _)| mime.len())
        .map(|&(_, ext)| ext)
}

/// Extension with leading dot, ".dat" when unknown / 含点号扩展名，未知时返回.dat
pub fn extension_for(content_type: &str) -> String {
    format!(".{}", extension_bare_for(content_type))
}

/// Extension without dot, "dat" when unknown / 不含点号扩展名，未知时返回dat
pub fn extension_bare_for(content_type: &str) -> String {
    lookup(content_type).unwrap_or("dat").to_string()
}

/// Coarse file-type label / 粗粒度文件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCategory {
    Image,
    Document,
    Text,
    Archive,
    Audio,
    Video,
    Unknown,
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FileCategory::Image => "image",
            FileCategory::Document => "document",
            FileCategory::Text => "text",
            FileCategory::Archive => "archive",
            FileCategory::Audio => "audio",
            FileCategory::Video => "video",
            FileCategory::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

const IMAGE_EXTS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".webp", ".tiff", ".svg", ".ico",
];
const DOCUMENT_EXTS: &[&str] = &[".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx"];
const TEXT_EXTS: &[&str] = &[".txt", ".html", ".css", ".js", ".json", ".xml"];
const ARCHIVE_EXTS: &[&str] = &[".zip", ".rar", ".tar", ".gz", ".7z"];
const AUDIO_EXTS: &[&str] = &[".mp3", ".wav", ".ogg", ".aac", ".flac"];
const VIDEO_EXTS: &[&str] = &[".mp4", ".mpeg", ".mov", ".avi", ".wmv", ".webm", ".flv"];

fn category_of_ext(ext: &str) -> FileCategory {
    if IMAGE_EXTS.contains(&ext) {
        FileCategory::Image
    } else if DOCUMENT_EXTS.contains(&ext) {
        FileCategory::Document
    } else if TEXT_EXTS.contains(&ext) {
        FileCategory::Text
    } else if ARCHIVE_EXTS.contains(&ext) {
        FileCategory::Archive
    } else if AUDIO_EXTS.contains(&ext) {
        FileCategory::Audio
    } else if VIDEO_EXTS.contains(&ext) {
        FileCategory::Video
    } else {
        FileCategory::Unknown
    }
}

/// Classify a payload by content type, falling back to the filename suffix
/// 根据内容类型分类，内容类型不可用时回退到文件名后缀
///
/// The main MIME segment settles image/audio/video/text directly;
/// application/* goes through the suffix groups so office documents and
/// archives land in their own buckets.
pub fn category_for(content_type: Option<&str>, filename: Option<&str>) -> FileCategory {
    if let Some(ct) = content_type.filter(|c| !c.is_empty()) {
        let ct = ct.trim().to_lowercase();
        match ct.split('/').next().unwrap_or("") {
            "image" => return FileCategory::Image,
            "audio" => return FileCategory::Audio,
            "video" => return FileCategory::Video,
            "text" => return FileCategory::Text,
            _ => {
                // 已知的application/*类型先换算成扩展名再分组
                if let Some(ext) = lookup(&ct) {
                    let cat = category_of_ext(&format!(".{}", ext));
                    if cat != FileCategory::Unknown {
                        return cat;
                    }
                }
            }
        }
    }

    if let Some(name) = filename.filter(|n| !n.is_empty()) {
        return category_of_ext(&ext_of(name));
    }

    FileCategory::Unknown
}
