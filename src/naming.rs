//! Filename resolution and object-key construction / 文件名解析与对象键构造
//!
//! All date and timestamp segments come from the caller-supplied clock so
//! invocations stay deterministic under test / 时间由调用方注入，便于测试

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::content_type;
use crate::tool::ToolError;
use crate::utils::{has_forbidden_prefix, normalize_ext, split_name_ext};

/// Directory layout mode / 目录布局模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectoryMode {
    /// {directory}/{filename}
    #[default]
    NoSubdirectory,
    /// {directory}/{YYYY}/{MM}/{DD}/{filename}
    YyyyMmDdHierarchy,
    /// {directory}/{YYYYMMDD}/{filename}
    YyyyMmDdCombined,
}

/// Filename suffix policy / 文件名后缀策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilenameMode {
    /// base + extension unchanged / 保持原样
    #[default]
    Filename,
    /// base + "_YYYYMMDDHHMMSSmmm" + extension / 追加毫秒时间戳
    FilenameTimestamp,
}

/// Name inputs in priority order / 按优先级排列的命名来源
#[derive(Debug, Clone, Copy, Default)]
pub struct NameSources<'a> {
    /// User-specified filename / 用户指定的文件名
    pub explicit: Option<&'a str>,
    /// Original filename of the uploaded payload / 上传文件的原始文件名
    pub original: Option<&'a str>,
    /// Declared content type of the payload / 上传文件声明的内容类型
    pub content_type: Option<&'a str>,
}

/// Millisecond-precision timestamp suffix / 毫秒精度时间戳
fn timestamp(now: &DateTime<Local>) -> String {
    now.format("%Y%m%d%H%M%S%3f").to_string()
}

/// Resolve the final filename for an upload / 生成最终上传文件名
///
/// `batch_slot` is the 1-based position within a multi-file batch; it is
/// only set when the batch holds more than one file and only affects the
/// default "upload" base name / batch_slot仅在多文件批次中参与默认文件名
///
/// Precedence when no explicit name is given: content type beats the
/// original filename's extension, but an unknown content type leaves the
/// previous choice standing / 内容类型优先于原始扩展名，未知类型不参与覆盖
pub fn resolve_filename(
    sources: NameSources<'_>,
    mode: FilenameMode,
    batch_slot: Option<usize>,
    now: &DateTime<Local>,
) -> Result<String, ToolError> {
    let (base, extension) = match sources.explicit {
        Some(raw) => {
            let name = raw.trim();
            if has_forbidden_prefix(name) {
                return Err(ToolError::InvalidPrefix("filename"));
            }
            let (base, ext) = split_name_ext(name);
            let ext = if ext.is_empty() {
                // 用户名称没有扩展名时，从原始文件名借用
                sources
                    .original
                    .map(|orig| split_name_ext(orig).1)
                    .unwrap_or("")
            } else {
                ext
            };
            (base.to_string(), normalize_ext(ext))
        }
        None => {
            let mut base = String::from("upload");
            if let Some(slot) = batch_slot {
                base = format!("{}_{}", base, slot);
            }
            let mut ext = String::from(".dat");

            if let Some(orig) = sources.original {
                let (orig_base, orig_ext) = split_name_ext(orig);
                if !orig_ext.is_empty() {
                    base = orig_base.to_string();
                    ext = orig_ext.to_string();
                }
            }
            if let Some(ct) = sources.content_type {
                if let Some(mapped) = content_type::lookup(ct) {
                    ext = format!(".{}", mapped);
                }
            }
            (base, normalize_ext(&ext))
        }
    };

    let filename = match mode {
        FilenameMode::FilenameTimestamp => {
            format!("{}_{}{}", base, timestamp(now), extension)
        }
        FilenameMode::Filename => format!("{}{}", base, extension),
    };
    Ok(filename)
}

/// Compose the object key from directory, layout mode and filename
/// 根据目录布局模式生成完整的对象键
///
/// Always forward-slash delimited regardless of host OS; leading-character
/// validation happens upstream / 始终使用正斜杠分隔，开头字符校验在上游完成
pub fn build_object_key(
    directory: &str,
    mode: DirectoryMode,
    filename: &str,
    now: &DateTime<Local>,
) -> String {
    let directory = directory.trim();
    match mode {
        DirectoryMode::YyyyMmDdHierarchy => {
            format!("{}/{}/{}", directory, now.format("%Y/%m/%d"), filename)
        }
        DirectoryMode::YyyyMmDdCombined => {
            format!("{}/{}/{}", directory, now.format("%Y%m%d"), filename)
        }
        DirectoryMode::NoSubdirectory => format!("{}/{}", directory, filename),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32, ms: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(y, mo, d, h, mi, s)
            .unwrap()
            .checked_add_signed(chrono::Duration::milliseconds(ms as i64))
            .unwrap()
    }

    #[test]
    fn test_explicit_name_kept() {
        let now = at(2024, 3, 5, 10, 0, 0, 0);
        let name = resolve_filename(
            NameSources {
                explicit: Some("  report.PDF  "),
                ..Default::default()
            },
            FilenameMode::Filename,
            None,
            &now,
        )
        .unwrap();
        assert_eq!(name, "report.pdf");
    }

    #[test]
    fn test_explicit_name_borrows_original_extension() {
        let now = at(2024, 3, 5, 10, 0, 0, 0);
        let name = resolve_filename(
            NameSources {
                explicit: Some("renamed"),
                original: Some("scan.TIFF"),
                content_type: Some("image/png"),
            },
            FilenameMode::Filename,
            None,
            &now,
        )
        .unwrap();
        // 显式命名只借用原始扩展名，不参考内容类型
        assert_eq!(name, "renamed.tiff");
    }

    #[test]
    fn test_explicit_name_without_any_extension() {
        let now = at(2024, 3, 5, 10, 0, 0, 0);
        let name = resolve_filename(
            NameSources {
                explicit: Some("notes"),
                ..Default::default()
            },
            FilenameMode::Filename,
            None,
            &now,
        )
        .unwrap();
        assert_eq!(name, "notes");
    }

    #[test]
    fn test_explicit_name_forbidden_prefix() {
        let now = at(2024, 3, 5, 10, 0, 0, 0);
        for bad in ["/name.txt", "\\name.txt"] {
            let err = resolve_filename(
                NameSources {
                    explicit: Some(bad),
                    ..Default::default()
                },
                FilenameMode::Filename,
                None,
                &now,
            )
            .unwrap_err();
            assert!(matches!(err, ToolError::InvalidPrefix("filename")));
        }
    }

    #[test]
    fn test_content_type_overrides_original_extension() {
        let now = at(2024, 3, 5, 10, 0, 0, 0);
        let name = resolve_filename(
            NameSources {
                explicit: None,
                original: Some("photo.JPG"),
                content_type: Some("image/png"),
            },
            FilenameMode::Filename,
            None,
            &now,
        )
        .unwrap();
        // 内容类型优先于原始扩展名
        assert_eq!(name, "photo.png");
    }

    #[test]
    fn test_unknown_content_type_keeps_original_extension() {
        let now = at(2024, 3, 5, 10, 0, 0, 0);
        let name = resolve_filename(
            NameSources {
                explicit: None,
                original: Some("photo.jpg"),
                content_type: Some("application/x-no-such-type"),
            },
            FilenameMode::Filename,
            None,
            &now,
        )
        .unwrap();
        assert_eq!(name, "photo.jpg");
    }

    #[test]
    fn test_defaults_without_sources() {
        let now = at(2024, 3, 5, 10, 0, 0, 0);
        let name = resolve_filename(
            NameSources::default(),
            FilenameMode::Filename,
            None,
            &now,
        )
        .unwrap();
        assert_eq!(name, "upload.dat");
    }

    #[test]
    fn test_batch_slot_suffix() {
        let now = at(2024, 3, 5, 10, 0, 0, 0);
        let name = resolve_filename(
            NameSources::default(),
            FilenameMode::Filename,
            Some(3),
            &now,
        )
        .unwrap();
        assert_eq!(name, "upload_3.dat");
    }

    #[test]
    fn test_timestamp_mode_format() {
        let now = at(2024, 3, 5, 9, 8, 7, 123);
        let name = resolve_filename(
            NameSources {
                explicit: Some("log.txt"),
                ..Default::default()
            },
            FilenameMode::FilenameTimestamp,
            None,
            &now,
        )
        .unwrap();
        assert_eq!(name, "log_20240305090807123.txt");
    }

    #[test]
    fn test_timestamp_mode_distinct_instants() {
        let a = at(2024, 3, 5, 9, 8, 7, 123);
        let b = at(2024, 3, 5, 9, 8, 7, 124);
        let sources = NameSources {
            explicit: Some("log.txt"),
            ..Default::default()
        };
        let fa = resolve_filename(sources, FilenameMode::FilenameTimestamp, None, &a).unwrap();
        let fb = resolve_filename(sources, FilenameMode::FilenameTimestamp, None, &b).unwrap();
        assert_ne!(fa, fb);
    }

    #[test]
    fn test_build_key_no_subdirectory() {
        let now = at(2024, 3, 5, 10, 0, 0, 0);
        assert_eq!(
            build_object_key("reports", DirectoryMode::NoSubdirectory, "x.txt", &now),
            "reports/x.txt"
        );
        // 目录前后空白会被剔除
        assert_eq!(
            build_object_key(" reports ", DirectoryMode::NoSubdirectory, "x.txt", &now),
            "reports/x.txt"
        );
    }

    #[test]
    fn test_build_key_date_layouts() {
        let now = at(2024, 3, 5, 10, 0, 0, 0);
        assert_eq!(
            build_object_key("reports", DirectoryMode::YyyyMmDdCombined, "x.txt", &now),
            "reports/20240305/x.txt"
        );
        assert_eq!(
            build_object_key("reports", DirectoryMode::YyyyMmDdHierarchy, "x.txt", &now),
            "reports/2024/03/05/x.txt"
        );
    }

    #[test]
    fn test_build_key_injective_in_filename() {
        let now = at(2024, 3, 5, 10, 0, 0, 0);
        let names = ["a.txt", "b.txt", "a.dat", "a", "a_1.txt"];
        for mode in [
            DirectoryMode::NoSubdirectory,
            DirectoryMode::YyyyMmDdHierarchy,
            DirectoryMode::YyyyMmDdCombined,
        ] {
            let mut keys: Vec<String> = names
                .iter()
                .map(|n| build_object_key("dir", mode, n, &now))
                .collect();
            keys.sort();
            keys.dedup();
            assert_eq!(keys.len(), names.len());
        }
    }

    #[test]
    fn test_mode_serde_names() {
        let m: DirectoryMode = serde_json::from_str("\"yyyy_mm_dd_combined\"").unwrap();
        assert_eq!(m, DirectoryMode::YyyyMmDdCombined);
        let f: FilenameMode = serde_json::from_str("\"filename_timestamp\"").unwrap();
        assert_eq!(f, FilenameMode::FilenameTimestamp);
    }
}
