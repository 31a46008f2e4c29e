use anyhow::Result;
use async_trait::async_trait;
use std::ffi::OsStr;

use super::{Action, Workspace};
use crate::process;

const DOCUMENT: &str = "format.md";

/// Formats `format.md` in place with an external formatter.
pub struct FormatDocument {
    formatter: String,
}

impl FormatDocument {
    pub fn new(formatter: impl Into<String>) -> Self {
        Self {
            formatter: formatter.into(),
        }
    }
}

#[async_trait]
impl Action for FormatDocument {
    fn name(&self) -> &str {
        "format"
    }

    fn trigger(&self) -> &str {
        "format"
    }

    async fn execute(&self, workspace: &Workspace) -> Result<String> {
        let path = workspace.path(DOCUMENT);
        process::run(&self.formatter, &[OsStr::new("--write"), path.as_os_str()], None).await?;
        Ok("File formatted successfully.".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn succeeds_when_formatter_exits_zero() {
        let dir = tempfile::tempdir().unwrap();
        let action = FormatDocument::new("true");
        let message = action.execute(&Workspace::new(dir.path())).await.unwrap();
        assert_eq!(message, "File formatted successfully.");
    }

    #[tokio::test]
    async fn fails_when_formatter_exits_nonzero() {
        let dir = tempfile::tempdir().unwrap();
        let action = FormatDocument::new("false");
        let err = action
            .execute(&Workspace::new(dir.path()))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("exited with code"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn accepts_non_utf8_data_root() {
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join(OsStr::from_bytes(b"d\xffata"));
        let action = FormatDocument::new("true");
        let message = action.execute(&Workspace::new(root)).await.unwrap();
        assert_eq!(message, "File formatted successfully.");
    }
}
