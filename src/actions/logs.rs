use anyhow::{Context, Result};
use async_trait::async_trait;
use std::cmp::Reverse;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{Action, Workspace};
use crate::consts::RECENT_LOG_LIMIT;

const LOG_DIR: &str = "logs";
const OUTPUT: &str = "logs-recent.txt";

/// Writes the first line of each of the most recently modified `.log` files.
pub struct RecentLogs;

/// Order `files` newest first and keep at most `limit`. Ties keep the
/// incoming order.
pub fn most_recent(mut files: Vec<(PathBuf, SystemTime)>, limit: usize) -> Vec<PathBuf> {
    files.sort_by_key(|(_, modified)| Reverse(*modified));
    files.into_iter().take(limit).map(|(path, _)| path).collect()
}

/// The first line of `path`, newline included when present. `\r\n` and a
/// lone `\r` both end a line and come back as `\n`.
async fn first_line(path: &Path) -> Result<String> {
    let file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("failed to open {}", path.display()))?;
    let mut line = String::new();
    BufReader::new(file)
        .read_line(&mut line)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    if let Some(pos) = line.find('\r') {
        line.truncate(pos);
        line.push('\n');
    }
    Ok(line)
}

#[async_trait]
impl Action for RecentLogs {
    fn name(&self) -> &str {
        "recent_logs"
    }

    fn trigger(&self) -> &str {
        "recent logs"
    }

    async fn execute(&self, workspace: &Workspace) -> Result<String> {
        let mut stamped = Vec::new();
        for path in workspace.files_with_extension(LOG_DIR, "log").await? {
            let modified = tokio::fs::metadata(&path)
                .await
                .and_then(|m| m.modified())
                .with_context(|| format!("failed to stat {}", path.display()))?;
            stamped.push((path, modified));
        }

        let mut output = String::new();
        for path in most_recent(stamped, RECENT_LOG_LIMIT) {
            output.push_str(&first_line(&path).await?);
        }

        workspace.write(OUTPUT, output).await?;
        Ok("Recent logs written successfully.".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn at(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn most_recent_orders_descending() {
        let files = vec![
            (PathBuf::from("a"), at(10)),
            (PathBuf::from("b"), at(30)),
            (PathBuf::from("c"), at(20)),
        ];
        assert_eq!(
            most_recent(files, 10),
            vec![PathBuf::from("b"), PathBuf::from("c"), PathBuf::from("a")]
        );
    }

    #[test]
    fn most_recent_caps_at_limit() {
        let files = (0..15)
            .map(|i| (PathBuf::from(format!("{i}.log")), at(i)))
            .collect();
        let picked = most_recent(files, 10);
        assert_eq!(picked.len(), 10);
        assert_eq!(picked[0], PathBuf::from("14.log"));
        assert_eq!(picked[9], PathBuf::from("5.log"));
    }

    #[test]
    fn most_recent_ties_keep_input_order() {
        let files = vec![(PathBuf::from("a"), at(5)), (PathBuf::from("b"), at(5))];
        assert_eq!(
            most_recent(files, 10),
            vec![PathBuf::from("a"), PathBuf::from("b")]
        );
    }

    #[tokio::test]
    async fn first_line_keeps_newline_and_handles_empty() {
        let dir = tempfile::tempdir().unwrap();
        let full = dir.path().join("full.log");
        let single = dir.path().join("single.log");
        let empty = dir.path().join("empty.log");
        std::fs::write(&full, "one\ntwo\n").unwrap();
        std::fs::write(&single, "only").unwrap();
        std::fs::write(&empty, "").unwrap();

        assert_eq!(first_line(&full).await.unwrap(), "one\n");
        assert_eq!(first_line(&single).await.unwrap(), "only");
        assert_eq!(first_line(&empty).await.unwrap(), "");
    }

    #[tokio::test]
    async fn first_line_normalizes_carriage_returns() {
        let dir = tempfile::tempdir().unwrap();
        let crlf = dir.path().join("crlf.log");
        let cr = dir.path().join("cr.log");
        std::fs::write(&crlf, "one\r\ntwo\r\n").unwrap();
        std::fs::write(&cr, "one\rtwo\r").unwrap();

        assert_eq!(first_line(&crlf).await.unwrap(), "one\n");
        assert_eq!(first_line(&cr).await.unwrap(), "one\n");
    }

    #[tokio::test]
    async fn missing_log_dir_writes_empty_output() {
        let dir = tempfile::tempdir().unwrap();
        let message = RecentLogs
            .execute(&Workspace::new(dir.path()))
            .await
            .unwrap();
        assert_eq!(message, "Recent logs written successfully.");
        assert_eq!(
            std::fs::read_to_string(dir.path().join(OUTPUT)).unwrap(),
            ""
        );
    }
}
