//! Runs external programs for the actions that shell out.

use anyhow::{Context, Result, bail};
use std::ffi::OsStr;
use std::fmt::Debug;
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

use crate::consts::MAX_OUTPUT_BYTES;

/// Run `program` with `args` to completion. A non-zero exit is an error
/// carrying the exit code plus truncated stdout/stderr.
pub async fn run<S>(program: &str, args: &[S], work_dir: Option<&Path>) -> Result<String>
where
    S: AsRef<OsStr> + Debug,
{
    debug!(program, ?args, "spawning");

    let mut command = Command::new(program);
    command.args(args).kill_on_drop(true);
    if let Some(dir) = work_dir {
        command.current_dir(dir);
    }

    let output = command
        .output()
        .await
        .with_context(|| format!("failed to run {program}"))?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    if output.status.success() {
        Ok(truncate_output(&stdout, MAX_OUTPUT_BYTES))
    } else {
        bail!(
            "{} exited with code {}\nstdout: {}\nstderr: {}",
            program,
            output.status.code().unwrap_or(-1),
            truncate_output(&stdout, MAX_OUTPUT_BYTES),
            truncate_output(&stderr, MAX_OUTPUT_BYTES)
        )
    }
}

fn truncate_output(output: &str, max_bytes: usize) -> String {
    if output.len() <= max_bytes {
        return output.to_string();
    }
    let mut end = max_bytes;
    while !output.is_char_boundary(end) {
        end -= 1;
    }
    format!(
        "{}\n\n[truncated: showing {}/{} bytes]",
        &output[..end],
        end,
        output.len()
    )
}
