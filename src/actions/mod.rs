//! The fixed catalog of file-processing actions.
//!
//! Each action owns one trigger phrase. The [`ActionRegistry`] keeps them in
//! registration order and hands back the first whose trigger appears in a
//! task description, so earlier registrations shadow later ones when a
//! description mentions both.

pub mod comments;
pub mod contacts;
pub mod datagen;
pub mod dates;
pub mod extract;
pub mod format;
pub mod logs;
pub mod markdown;
pub mod tickets;

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Settings;
use crate::extractor::Extractor;

/// One file-to-file transform the dispatcher can run.
#[async_trait]
pub trait Action: Send + Sync {
    /// Stable identifier, used in logs.
    fn name(&self) -> &str;
    /// Substring that selects this action.
    fn trigger(&self) -> &str;
    /// Run to completion and return the success message.
    async fn execute(&self, workspace: &Workspace) -> Result<String>;
}

/// The data root every action reads from and writes to.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a path relative to the data root.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    pub async fn read_to_string(&self, relative: &str) -> Result<String> {
        let path = self.path(relative);
        tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))
    }

    pub async fn read_bytes(&self, relative: &str) -> Result<Vec<u8>> {
        let path = self.path(relative);
        tokio::fs::read(&path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))
    }

    /// Write the whole output in one step.
    pub async fn write(&self, relative: &str, contents: impl AsRef<[u8]>) -> Result<()> {
        let path = self.path(relative);
        tokio::fs::write(&path, contents)
            .await
            .with_context(|| format!("failed to write {}", path.display()))
    }

    /// Files directly inside `dir` whose extension is `extension`, sorted
    /// by path. Follows `*.ext` glob rules: symlinks to files count, dotfiles
    /// are skipped and a missing directory has no matches.
    pub async fn files_with_extension(&self, dir: &str, extension: &str) -> Result<Vec<PathBuf>> {
        let dir = self.path(dir);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("failed to list {}", dir.display()));
            }
        };

        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .with_context(|| format!("failed to list {}", dir.display()))?
        {
            let path = entry.path();
            if entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some(extension) {
                continue;
            }
            match tokio::fs::metadata(&path).await {
                Ok(meta) if meta.is_file() => files.push(path),
                Ok(_) => {}
                // Dangling symlink.
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(e).with_context(|| format!("failed to stat {}", path.display()));
                }
            }
        }
        files.sort();
        Ok(files)
    }
}

/// Ordered list of actions. First match wins.
#[derive(Default)]
pub struct ActionRegistry {
    actions: Vec<Arc<dyn Action>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The ten built-in actions in their precedence order.
    pub fn standard(settings: &Settings, extractor: Arc<dyn Extractor>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(datagen::DataGen::new(
            settings.user_email.clone(),
            settings.datagen_url.clone(),
        )));
        registry.register(Arc::new(format::FormatDocument::new(
            settings.formatter.clone(),
        )));
        registry.register(Arc::new(dates::CountWednesdays));
        registry.register(Arc::new(contacts::SortContacts));
        registry.register(Arc::new(logs::RecentLogs));
        registry.register(Arc::new(markdown::IndexMarkdown));
        registry.register(Arc::new(extract::ExtractEmail::new(extractor.clone())));
        registry.register(Arc::new(extract::ExtractCreditCard::new(extractor.clone())));
        registry.register(Arc::new(comments::SimilarComments::new(extractor)));
        registry.register(Arc::new(tickets::TotalSalesGold));
        registry
    }

    pub fn register(&mut self, action: Arc<dyn Action>) {
        self.actions.push(action);
    }

    /// The first action whose trigger occurs in `task`.
    pub fn find(&self, task: &str) -> Option<&Arc<dyn Action>> {
        self.actions
            .iter()
            .find(|action| task.contains(action.trigger()))
    }

    pub fn triggers(&self) -> Vec<&str> {
        self.actions.iter().map(|a| a.trigger()).collect()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
