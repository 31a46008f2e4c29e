use anyhow::{Result, bail};
use async_trait::async_trait;
use std::sync::Arc;

use super::{Action, Workspace};
use crate::extractor::Extractor;

const INPUT: &str = "comments.txt";
const OUTPUT: &str = "comments-similar.txt";

/// Asks the extractor for the most similar pair of comments and writes
/// them one per line.
pub struct SimilarComments {
    extractor: Arc<dyn Extractor>,
}

impl SimilarComments {
    pub fn new(extractor: Arc<dyn Extractor>) -> Self {
        Self { extractor }
    }
}

#[async_trait]
impl Action for SimilarComments {
    fn name(&self) -> &str {
        "similar_comments"
    }

    fn trigger(&self) -> &str {
        "similar comments"
    }

    async fn execute(&self, workspace: &Workspace) -> Result<String> {
        let text = workspace.read_to_string(INPUT).await?;
        let comments: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        if comments.len() < 2 {
            bail!("need at least two comments, found {}", comments.len());
        }

        let (first, second) = self.extractor.most_similar_pair(&comments).await?;
        if first == second || first >= comments.len() || second >= comments.len() {
            bail!(
                "similarity service returned invalid pair ({first}, {second}) for {} comments",
                comments.len()
            );
        }

        workspace
            .write(OUTPUT, format!("{}\n{}", comments[first], comments[second]))
            .await?;
        Ok("Similar comments found successfully.".to_string())
    }
}
