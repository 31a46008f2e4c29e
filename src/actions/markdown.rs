use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{Action, Workspace};

const DOCS_DIR: &str = "docs";
const OUTPUT: &str = "docs/index.json";

/// Builds `docs/index.json`, mapping each Markdown file to its first H1.
pub struct IndexMarkdown;

/// Text of the first line starting with `# `, trimmed.
pub fn first_heading(line: &str) -> Option<&str> {
    line.strip_prefix("# ").map(str::trim)
}

#[async_trait]
impl Action for IndexMarkdown {
    fn name(&self) -> &str {
        "index_markdown"
    }

    fn trigger(&self) -> &str {
        "index markdown"
    }

    async fn execute(&self, workspace: &Workspace) -> Result<String> {
        let mut index = BTreeMap::new();

        for path in workspace.files_with_extension(DOCS_DIR, "md").await? {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let file = tokio::fs::File::open(&path)
                .await
                .with_context(|| format!("failed to open {}", path.display()))?;
            let mut lines = BufReader::new(file).lines();
            while let Some(line) = lines
                .next_line()
                .await
                .with_context(|| format!("failed to read {}", path.display()))?
            {
                if let Some(heading) = first_heading(&line) {
                    index.insert(name.to_string(), heading.to_string());
                    break;
                }
            }
        }

        workspace.write(OUTPUT, serde_json::to_string(&index)?).await?;
        Ok("Index created successfully.".to_string())
    }
}
