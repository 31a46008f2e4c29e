use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Weekday};

use super::{Action, Workspace};

const INPUT: &str = "dates.txt";
const OUTPUT: &str = "dates-wednesdays.txt";

/// Counts the Wednesdays in a list of `YYYY-MM-DD` dates.
pub struct CountWednesdays;

/// Number of Wednesdays among the non-blank lines of `text`.
pub fn count_wednesdays(text: &str) -> Result<usize> {
    let mut count = 0;
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let date = NaiveDate::parse_from_str(line, "%Y-%m-%d")
            .with_context(|| format!("line {}: invalid date {line:?}", i + 1))?;
        if date.weekday() == Weekday::Wed {
            count += 1;
        }
    }
    Ok(count)
}

#[async_trait]
impl Action for CountWednesdays {
    fn name(&self) -> &str {
        "count_wednesdays"
    }

    fn trigger(&self) -> &str {
        "count Wednesdays"
    }

    async fn execute(&self, workspace: &Workspace) -> Result<String> {
        let text = workspace.read_to_string(INPUT).await?;
        let count = count_wednesdays(&text)?;
        workspace.write(OUTPUT, count.to_string()).await?;
        Ok("Counted Wednesdays successfully.".to_string())
    }
}
