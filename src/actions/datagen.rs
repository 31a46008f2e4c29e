use anyhow::{Result, anyhow};
use async_trait::async_trait;
use tracing::info;

use super::{Action, Workspace};
use crate::process;

/// Installs `uv`, then runs the remote data-generation script with the
/// configured user email as its only argument.
pub struct DataGen {
    user_email: Option<String>,
    script_url: String,
}

impl DataGen {
    pub fn new(user_email: Option<String>, script_url: impl Into<String>) -> Self {
        Self {
            user_email,
            script_url: script_url.into(),
        }
    }
}

#[async_trait]
impl Action for DataGen {
    fn name(&self) -> &str {
        "datagen"
    }

    fn trigger(&self) -> &str {
        "install uv"
    }

    async fn execute(&self, workspace: &Workspace) -> Result<String> {
        let email = self.user_email.as_deref().ok_or_else(|| {
            anyhow!("no user email configured. Pass --user-email or set USER_EMAIL.")
        })?;

        process::run("pip", &["install", "uv"], None).await?;
        info!(url = %self.script_url, "running data generation script");
        process::run(
            "uv",
            &["run", self.script_url.as_str(), email],
            Some(workspace.root()),
        )
        .await?;

        Ok("Data generated successfully.".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_email_fails_without_spawning() {
        let dir = tempfile::tempdir().unwrap();
        let action = DataGen::new(None, "https://example.invalid/datagen.py");
        let err = action
            .execute(&Workspace::new(dir.path()))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no user email configured"));
    }

    #[test]
    fn trigger_phrase() {
        let action = DataGen::new(Some("a@b.c".to_string()), "u");
        assert_eq!(action.trigger(), "install uv");
        assert_eq!(action.name(), "datagen");
    }
}
