use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::sync::Mutex;

use super::{Extractor, Image};

/// A canned extractor for tests. Each capability returns its configured
/// answer, or fails if none was set.
#[derive(Default)]
pub struct ScriptedExtractor {
    text: Option<String>,
    image: Option<String>,
    pair: Option<(usize, usize)>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, answer: impl Into<String>) -> Self {
        self.text = Some(answer.into());
        self
    }

    pub fn with_image(mut self, answer: impl Into<String>) -> Self {
        self.image = Some(answer.into());
        self
    }

    pub fn with_pair(mut self, first: usize, second: usize) -> Self {
        self.pair = Some((first, second));
        self
    }

    /// Every input the extractor was shown, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, entry: String) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(entry);
        }
    }
}

#[async_trait]
impl Extractor for ScriptedExtractor {
    async fn extract_from_text(&self, _instruction: &str, text: &str) -> Result<String> {
        self.record(text.to_string());
        self.text
            .clone()
            .ok_or_else(|| anyhow!("ScriptedExtractor: no text answer configured"))
    }

    async fn extract_from_image(&self, _instruction: &str, image: &Image) -> Result<String> {
        self.record(format!("{} ({} bytes)", image.media_type, image.data.len()));
        self.image
            .clone()
            .ok_or_else(|| anyhow!("ScriptedExtractor: no image answer configured"))
    }

    async fn most_similar_pair(&self, items: &[String]) -> Result<(usize, usize)> {
        self.record(items.join("\n"));
        self.pair
            .ok_or_else(|| anyhow!("ScriptedExtractor: no pair configured"))
    }
}
