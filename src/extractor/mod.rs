pub mod anthropic;
pub mod scripted;

use anyhow::Result;
use async_trait::async_trait;

/// An image handed to the extractor, with its MIME type.
#[derive(Debug, Clone)]
pub struct Image {
    pub media_type: String,
    pub data: Vec<u8>,
}

impl Image {
    /// Guess the media type from a file extension. Unknown extensions fall
    /// back to PNG, which is what the credit-card task ships.
    pub fn media_type_for(extension: Option<&str>) -> &'static str {
        match extension.map(|e| e.to_ascii_lowercase()).as_deref() {
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            _ => "image/png",
        }
    }
}

/// The external understanding service. An LLM in production, a script in tests.
///
/// Correctness of what comes back is owned by the implementation; callers
/// write the result as-is.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Pull a single field out of unstructured text.
    async fn extract_from_text(&self, instruction: &str, text: &str) -> Result<String>;

    /// Pull a single field out of an image.
    async fn extract_from_image(&self, instruction: &str, image: &Image) -> Result<String>;

    /// Indices of the two most similar items.
    async fn most_similar_pair(&self, items: &[String]) -> Result<(usize, usize)>;
}
