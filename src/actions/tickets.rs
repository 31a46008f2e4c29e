use anyhow::{Context, Result};
use async_trait::async_trait;
use rusqlite::types::Value;
use rusqlite::{Connection, OpenFlags};
use std::path::Path;

use super::{Action, Workspace};

const DATABASE: &str = "ticket-sales.db";
const OUTPUT: &str = "ticket-sales-gold.txt";
const GOLD_SALES_QUERY: &str = "SELECT SUM(units * price) FROM tickets WHERE type = 'Gold'";

/// Writes the total sales of Gold tickets.
pub struct TotalSalesGold;

/// Run the Gold aggregate against the database at `path`. The database is
/// opened read-only so a missing file is an error, not a new empty database.
pub fn gold_sales(path: &Path) -> Result<Value> {
    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let total = conn
        .query_row(GOLD_SALES_QUERY, [], |row| row.get::<_, Value>(0))
        .context("failed to query ticket sales")?;
    Ok(total)
}

/// Text form of the aggregate. NULL (no Gold rows) renders as empty.
pub fn render_total(total: &Value) -> String {
    match total {
        Value::Null => String::new(),
        Value::Integer(n) => n.to_string(),
        Value::Real(x) => x.to_string(),
        Value::Text(s) => s.clone(),
        Value::Blob(b) => String::from_utf8_lossy(b).into_owned(),
    }
}

#[async_trait]
impl Action for TotalSalesGold {
    fn name(&self) -> &str {
        "total_sales_gold"
    }

    fn trigger(&self) -> &str {
        "total sales gold"
    }

    async fn execute(&self, workspace: &Workspace) -> Result<String> {
        let path = workspace.path(DATABASE);
        let total = tokio::task::spawn_blocking(move || gold_sales(&path))
            .await
            .context("ticket sales query did not complete")??;
        workspace.write(OUTPUT, render_total(&total)).await?;
        Ok("Total sales calculated successfully.".to_string())
    }
}
