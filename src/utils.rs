/// Filename processing utility functions / 文件名处理工具函数

/// Split a filename into base and extension / 将文件名拆分为主体和扩展名
/// Last-dot rule: a dot in first position is part of the base
/// (".bashrc" has no extension) / 末位点号规则，首位点号属于主体
pub fn split_name_ext(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(pos) if pos > 0 => (&name[..pos], &name[pos..]),
        _ => (name, ""),
    }
}

/// Normalize an extension: leading dot, lowercase / 规范化扩展名：补点号并转小写
/// Empty input stays empty / 空输入保持为空
pub fn normalize_ext(ext: &str) -> String {
    if ext.is_empty() {
        return String::new();
    }
    if ext.starts_with('.') {
        ext.to_lowercase()
    } else {
        format!(".{}", ext.to_lowercase())
    }
}

/// Extension of a filename, lowercase, with dot / 获取文件扩展名（小写，含点号）
pub fn ext_of(name: &str) -> String {
    let (_, ext) = split_name_ext(name);
    ext.to_lowercase()
}

/// Last slash-delimited segment of an object key or path / 取最后一个路径段
pub fn base_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Directory and filename inputs must not begin with space, / or \
/// 目录和文件名输入禁止以空格、/ 或 \ 开头
pub fn has_forbidden_prefix(value: &str) -> bool {
    value.starts_with(' ') || value.starts_with('/') || value.starts_with('\\')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_name_ext() {
        assert_eq!(split_name_ext("photo.JPG"), ("photo", ".JPG"));
        assert_eq!(split_name_ext("archive.tar.gz"), ("archive.tar", ".gz"));
        assert_eq!(split_name_ext("README"), ("README", ""));
        assert_eq!(split_name_ext(".bashrc"), (".bashrc", ""));
        assert_eq!(split_name_ext(""), ("", ""));
    }

    #[test]
    fn test_normalize_ext() {
        assert_eq!(normalize_ext(""), "");
        assert_eq!(normalize_ext("JPG"), ".jpg");
        assert_eq!(normalize_ext(".PnG"), ".png");
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("dir/sub/file.pdf"), "file.pdf");
        assert_eq!(base_name("file.pdf"), "file.pdf");
        assert_eq!(base_name("a\\b\\c.txt"), "c.txt");
    }

    #[test]
    fn test_has_forbidden_prefix() {
        assert!(has_forbidden_prefix(" reports"));
        assert!(has_forbidden_prefix("/reports"));
        assert!(has_forbidden_prefix("\\reports"));
        assert!(!has_forbidden_prefix("reports"));
        assert!(!has_forbidden_prefix("r eports"));
        assert!(!has_forbidden_prefix(".hidden"));
    }
}
