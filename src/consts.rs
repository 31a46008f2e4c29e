//! Project-wide constants.

/// Default directory housing every task input and output.
pub const DEFAULT_DATA_ROOT: &str = "/data";

/// Default listen address for the HTTP server.
pub const DEFAULT_BIND: &str = "0.0.0.0:8000";

/// Default Anthropic model when none is specified.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Default document formatter, invoked as `<formatter> --write <file>`.
pub const DEFAULT_FORMATTER: &str = "prettier";

/// Remote data-generation script run by the `install uv` task.
pub const DEFAULT_DATAGEN_URL: &str = "https://raw.githubusercontent.com/sanand0/tools-in-data-science-public/tds-2025-01/project-1/datagen.py";

/// How many log files the `recent logs` task samples.
pub const RECENT_LOG_LIMIT: usize = 10;

/// Maximum subprocess output kept in an error message.
pub const MAX_OUTPUT_BYTES: usize = 50_000;
