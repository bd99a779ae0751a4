//! File operations scoped to the protected directory.

use crate::error::FileError;
use crate::naming::normalize_file_name;
use crate::validate::{ValidateError, canonicalize_root, resolve_path};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use url::Url;

/// CRUD operations on files under a single protected directory.
#[derive(Debug, Clone)]
pub struct FileManager {
    root: PathBuf,
}

impl FileManager {
    /// Create a manager for `root`, which must be an existing directory.
    pub fn new(root: &Path) -> Result<Self, ValidateError> {
        Ok(Self {
            root: canonicalize_root(root)?,
        })
    }

    /// The canonical protected directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Percent-encoded `file://` URI of the protected directory.
    pub fn root_uri(&self) -> String {
        Url::from_file_path(&self.root)
            .map(String::from)
            .unwrap_or_else(|()| format!("file://{}", self.root.display()))
    }

    /// Display name of the protected directory.
    pub fn root_name(&self) -> String {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.root.display().to_string())
    }

    /// Create a new file, renaming it to snake_case first.
    pub async fn create_file(&self, path: &str, content: &str) -> Result<String, FileError> {
        let normalized = normalize_file_name(path);
        let full = resolve_path(&normalized.path, &self.root)?;
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&full)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(FileError::AlreadyExists(normalized.path));
            }
            Err(e) => return Err(e.into()),
        };
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        tracing::info!(requested = path, path = %full.display(), "file created");
        Ok(format!(
            "{}\nFile created successfully: {}",
            normalized.explanation, normalized.path
        ))
    }

    /// Read a file as UTF-8 text.
    pub async fn read_file(&self, path: &str) -> Result<String, FileError> {
        let full = resolve_path(path, &self.root)?;
        if !tokio::fs::try_exists(&full).await? {
            return Err(FileError::NotFound(path.into()));
        }
        Ok(tokio::fs::read_to_string(&full).await?)
    }

    /// Overwrite an existing file. The name is used as given.
    pub async fn write_file(&self, path: &str, content: &str) -> Result<String, FileError> {
        let full = resolve_path(path, &self.root)?;
        if !tokio::fs::try_exists(&full).await? {
            return Err(FileError::NotCreated(path.into()));
        }
        tokio::fs::write(&full, content).await?;
        tracing::info!(path = %full.display(), "file updated");
        Ok(format!("File updated: {path}"))
    }

    /// Delete an existing file.
    pub async fn delete_file(&self, path: &str) -> Result<String, FileError> {
        let full = resolve_path(path, &self.root)?;
        if !tokio::fs::try_exists(&full).await? {
            return Err(FileError::NotFound(path.into()));
        }
        tokio::fs::remove_file(&full).await?;
        tracing::info!(path = %full.display(), "file deleted");
        Ok(format!("File deleted: {path}"))
    }

    /// Recursively list regular files under `path`, relative to the root.
    pub async fn list_files(&self, path: &str) -> Result<String, FileError> {
        let dir = resolve_path(path, &self.root)?;
        if !tokio::fs::try_exists(&dir).await? {
            return Err(FileError::DirectoryNotFound);
        }
        let pattern = format!(
            "{}/**/*",
            glob::Pattern::escape(&dir.to_string_lossy())
        );
        let mut files: Vec<String> = glob::glob(&pattern)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?
            .filter_map(|entry| entry.ok())
            .filter(|p| p.is_file())
            .filter_map(|p| {
                p.strip_prefix(&self.root)
                    .ok()
                    .map(|rel| rel.to_string_lossy().into_owned())
            })
            .collect();
        if files.is_empty() {
            return Ok("No files found".into());
        }
        files.sort();
        Ok(files.join("\n"))
    }

    /// Read a `file://` resource inside the protected directory.
    ///
    /// Directories yield their entry names, one per line. Files yield their
    /// text content.
    pub async fn read_resource(&self, uri: &str) -> Result<String, FileError> {
        let raw = match Url::parse(uri) {
            Ok(url) if url.scheme() == "file" => url
                .to_file_path()
                .map_err(|()| FileError::UnknownResource(uri.into()))?,
            Ok(_) => return Err(FileError::UnknownResource(uri.into())),
            Err(_) => PathBuf::from(uri),
        };
        let path = resolve_path(&raw.to_string_lossy(), &self.root)?;
        let meta = match tokio::fs::metadata(&path).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(FileError::UnknownResource(uri.into()));
            }
            Err(e) => return Err(e.into()),
        };
        if meta.is_dir() {
            let mut names = Vec::new();
            let mut read_dir = tokio::fs::read_dir(&path).await?;
            while let Some(entry) = read_dir.next_entry().await? {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
            names.sort();
            Ok(names.join("\n"))
        } else if meta.is_file() {
            Ok(tokio::fs::read_to_string(&path).await?)
        } else {
            Err(FileError::UnknownResource(uri.into()))
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::error::FileError;
    use crate::manager::FileManager;
    use std::fs;

    fn manager() -> (tempfile::TempDir, FileManager) {
        let tmp = tempfile::tempdir().unwrap();
        let manager = FileManager::new(tmp.path()).unwrap();
        (tmp, manager)
    }

    #[tokio::test]
    async fn create_normalizes_name() {
        let (_tmp, fm) = manager();
        let msg = fm.create_file("docs/Meeting Notes.md", "hello").await.unwrap();
        assert!(msg.contains("Naming convention applied"));
        assert!(msg.ends_with("File created successfully: docs/meeting_notes.md"));
        let content = fs::read_to_string(fm.root().join("docs/meeting_notes.md")).unwrap();
        assert_eq!(content, "hello");
    }

    #[tokio::test]
    async fn create_refuses_existing_file() {
        let (_tmp, fm) = manager();
        fm.create_file("report.txt", "").await.unwrap();
        let err = fm.create_file("Report.txt", "x").await.unwrap_err();
        assert!(matches!(err, FileError::AlreadyExists(ref p) if p == "report.txt"));
        assert_eq!(
            err.to_string(),
            "File 'report.txt' already exists. Use write_file to update it."
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn create_does_not_follow_dangling_symlink() {
        let (_tmp, fm) = manager();
        let outside = tempfile::tempdir().unwrap();
        let target = outside.path().join("escaped.txt");
        std::os::unix::fs::symlink(&target, fm.root().join("link")).unwrap();
        let result = fm.create_file("link", "pwned").await;
        assert!(matches!(result, Err(FileError::Path(_))));
        assert!(!target.exists());
    }

    #[tokio::test]
    async fn root_uri_is_percent_encoded() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("my docs");
        fs::create_dir(&root).unwrap();
        let fm = FileManager::new(&root).unwrap();
        let uri = fm.root_uri();
        assert!(uri.starts_with("file://"));
        assert!(uri.ends_with("/my%20docs"));
        fm.create_file("notes.txt", "hi").await.unwrap();
        assert_eq!(fm.read_resource(&uri).await.unwrap(), "notes.txt");
        let file_uri = format!("{uri}/notes.txt");
        assert_eq!(fm.read_resource(&file_uri).await.unwrap(), "hi");
    }

    #[tokio::test]
    async fn write_requires_existing_file() {
        let (_tmp, fm) = manager();
        let err = fm.write_file("missing.txt", "x").await.unwrap_err();
        assert!(matches!(err, FileError::NotCreated(_)));

        fm.create_file("kept.txt", "old").await.unwrap();
        let msg = fm.write_file("kept.txt", "new").await.unwrap();
        assert_eq!(msg, "File updated: kept.txt");
        assert_eq!(fm.read_file("kept.txt").await.unwrap(), "new");
    }

    #[tokio::test]
    async fn delete_removes_file() {
        let (_tmp, fm) = manager();
        fm.create_file("gone.txt", "").await.unwrap();
        assert_eq!(fm.delete_file("gone.txt").await.unwrap(), "File deleted: gone.txt");
        assert!(matches!(
            fm.read_file("gone.txt").await,
            Err(FileError::NotFound(_))
        ));
        assert!(matches!(
            fm.delete_file("gone.txt").await,
            Err(FileError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn list_files_is_sorted_and_relative() {
        let (_tmp, fm) = manager();
        assert_eq!(fm.list_files("").await.unwrap(), "No files found");
        fm.create_file("b.txt", "").await.unwrap();
        fm.create_file("a/c.txt", "").await.unwrap();
        fm.create_file("a.txt", "").await.unwrap();
        assert_eq!(fm.list_files("").await.unwrap(), "a.txt\na/c.txt\nb.txt");
        assert_eq!(fm.list_files("a").await.unwrap(), "a/c.txt");
        assert!(matches!(
            fm.list_files("nope").await,
            Err(FileError::DirectoryNotFound)
        ));
    }

    #[tokio::test]
    async fn operations_stay_inside_root() {
        let (_tmp, fm) = manager();
        assert!(matches!(
            fm.read_file("../../etc/passwd").await,
            Err(FileError::Path(_))
        ));
        assert!(matches!(
            fm.create_file("/tmp/escape.txt", "").await,
            Err(FileError::Path(_))
        ));
    }

    #[tokio::test]
    async fn reads_directory_and_file_resources() {
        let (_tmp, fm) = manager();
        fm.create_file("z.txt", "zed").await.unwrap();
        fm.create_file("sub/y.txt", "").await.unwrap();
        assert_eq!(fm.read_resource(&fm.root_uri()).await.unwrap(), "sub\nz.txt");
        let uri = format!("{}/z.txt", fm.root_uri());
        assert_eq!(fm.read_resource(&uri).await.unwrap(), "zed");
        let missing = format!("{}/nothing", fm.root_uri());
        assert!(matches!(
            fm.read_resource(&missing).await,
            Err(FileError::UnknownResource(_))
        ));
    }
}
