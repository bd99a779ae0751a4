//! Filename convention applied to newly created files.
//!
//! The last path segment is converted to snake_case. Directory segments and
//! the extension are left untouched.

use regex::Regex;
use std::sync::LazyLock;

static CAMEL_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.)([A-Z][a-z]+)").expect("valid regex"));
static CAMEL_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("valid regex"));
static UNDERSCORES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_+").expect("valid regex"));

/// A path after the naming convention has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    /// The full path with its file name normalized.
    pub path: String,
    /// Whether the file name changed.
    pub changed: bool,
    /// Human-readable note about what happened to the name.
    pub explanation: String,
}

/// Convert a file name stem to snake_case.
pub fn snake_case(stem: &str) -> String {
    let s = stem.replace([' ', '-'], "_");
    let s = CAMEL_WORD.replace_all(&s, "${1}_${2}");
    let s = CAMEL_BOUNDARY.replace_all(&s, "${1}_${2}");
    let s = s.to_lowercase();
    let s = UNDERSCORES.replace_all(&s, "_");
    s.trim_matches('_').to_owned()
}

/// Apply the naming convention to the last segment of `path`.
pub fn normalize_file_name(path: &str) -> Normalized {
    let (dir, original) = match path.rsplit_once('/') {
        Some((dir, name)) => (Some(dir), name),
        None => (None, path),
    };
    let (stem, extension) = match original.rsplit_once('.') {
        Some((stem, ext)) => (stem, ext),
        None => (original, ""),
    };

    let stem = snake_case(stem);
    let file_name = if extension.is_empty() {
        stem
    } else {
        format!("{stem}.{extension}")
    };

    let changed = original != file_name;
    let explanation = if changed {
        format!("Naming convention applied: '{original}' → '{file_name}'")
    } else {
        format!("Filename already follows convention: '{file_name}'")
    };
    let path = match dir {
        Some(dir) => format!("{dir}/{file_name}"),
        None => file_name,
    };

    Normalized {
        path,
        changed,
        explanation,
    }
}

#[cfg(test)]
mod tests {
    use crate::naming::{normalize_file_name, snake_case};

    #[test]
    fn converts_camel_case() {
        assert_eq!(snake_case("myDocument"), "my_document");
        assert_eq!(snake_case("HTTPServer"), "http_server");
        assert_eq!(snake_case("getHTTPResponseCode"), "get_http_response_code");
    }

    #[test]
    fn replaces_spaces_and_hyphens() {
        assert_eq!(snake_case("Quarterly Report - Final"), "quarterly_report_final");
        assert_eq!(snake_case("__already__snake__"), "already_snake");
    }

    #[test]
    fn keeps_extension_and_directories() {
        let n = normalize_file_name("Reports/Q1/MyDocument File.TXT");
        assert_eq!(n.path, "Reports/Q1/my_document_file.TXT");
        assert!(n.changed);
        assert_eq!(
            n.explanation,
            "Naming convention applied: 'MyDocument File.TXT' → 'my_document_file.TXT'"
        );
    }

    #[test]
    fn only_last_dot_splits_extension() {
        let n = normalize_file_name("Backup Copy.tar.gz");
        assert_eq!(n.path, "backup_copy.tar.gz");
    }

    #[test]
    fn conforming_name_is_unchanged() {
        let n = normalize_file_name("notes/meeting_notes.md");
        assert_eq!(n.path, "notes/meeting_notes.md");
        assert!(!n.changed);
        assert_eq!(
            n.explanation,
            "Filename already follows convention: 'meeting_notes.md'"
        );
    }

    #[test]
    fn trailing_dot_is_dropped() {
        let n = normalize_file_name("Draft.");
        assert_eq!(n.path, "draft");
    }
}
