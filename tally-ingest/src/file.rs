//! Read the task document from the local filesystem.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tally_core::TaskSource;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TaskSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<String> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("read {}", self.path.display()))?;
        debug!(path = %self.path.display(), bytes = text.len(), "read task document");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_reads_file_contents() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"[{{"title":"x"}}]"#).unwrap();

        let src = FileSource::new(f.path());
        assert_eq!(src.fetch().await.unwrap(), r#"[{"title":"x"}]"#);
    }

    #[tokio::test]
    async fn test_missing_file_error_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let err = FileSource::new(&path).fetch().await.unwrap_err();
        assert!(format!("{err:#}").contains("absent.json"));
    }
}
