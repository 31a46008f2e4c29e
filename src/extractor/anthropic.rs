use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Extractor, Image};

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 1024;

const SYSTEM_PROMPT: &str = "You extract exactly what is asked from the input you are given. \
Respond with the requested value only: no explanation, no quotes, no markdown.";

/// An extractor that calls the Anthropic Messages API.
pub struct AnthropicExtractor {
    model: String,
    api_key: Option<String>,
    api_url: String,
    client: reqwest::Client,
}

impl AnthropicExtractor {
    pub fn new(model: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            model: model.into(),
            api_key,
            api_url: API_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Send requests to `url` instead of the public Messages endpoint.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    fn similarity_prompt(items: &[String]) -> String {
        let mut listing = String::new();
        for (i, item) in items.iter().enumerate() {
            listing.push_str(&format!("{i}: {item}\n"));
        }
        format!(
            r#"Below is a numbered list of comments.

{listing}
Find the two comments that are most similar in meaning.
Respond with ONLY valid JSON of the form {{"first": <index>, "second": <index>}}, using the numbers above."#
        )
    }

    fn parse_pair(text: &str) -> Result<(usize, usize)> {
        let json = extract_json(text);
        let pair: PairResponse = serde_json::from_str(json)
            .map_err(|e| anyhow!("failed to parse similarity response as JSON: {e}\nraw: {text}"))?;
        Ok((pair.first, pair.second))
    }

    async fn complete(&self, content: Vec<ContentPart>) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            anyhow!("no Anthropic credentials found. Pass --anthropic-api-key or set ANTHROPIC_API_KEY.")
        })?;

        let messages = [Message {
            role: "user",
            content,
        }];
        let body = ApiRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            system: SYSTEM_PROMPT,
            messages: &messages,
        };

        let resp = self
            .client
            .post(&self.api_url)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .header("x-api-key", api_key)
            .json(&body)
            .send()
            .await
            .context("failed to reach Anthropic API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            bail!("Anthropic API error ({}): {}", status, text);
        }

        let api_resp: ApiResponse = resp
            .json()
            .await
            .context("failed to decode Anthropic response")?;

        if let Some(usage) = api_resp.usage {
            debug!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "anthropic usage"
            );
        }

        let text = collect_text(&api_resp.content);
        if text.is_empty() {
            bail!("Anthropic API returned empty response");
        }
        Ok(text)
    }
}

#[async_trait]
impl Extractor for AnthropicExtractor {
    async fn extract_from_text(&self, instruction: &str, text: &str) -> Result<String> {
        self.complete(vec![ContentPart::Text {
            text: format!("{instruction}\n\n{text}"),
        }])
        .await
    }

    async fn extract_from_image(&self, instruction: &str, image: &Image) -> Result<String> {
        self.complete(vec![
            ContentPart::Image {
                source: ImageSource {
                    kind: "base64",
                    media_type: image.media_type.clone(),
                    data: STANDARD.encode(&image.data),
                },
            },
            ContentPart::Text {
                text: instruction.to_string(),
            },
        ])
        .await
    }

    async fn most_similar_pair(&self, items: &[String]) -> Result<(usize, usize)> {
        let text = self
            .complete(vec![ContentPart::Text {
                text: Self::similarity_prompt(items),
            }])
            .await?;
        Self::parse_pair(&text)
    }
}

/// Join the text blocks of a response, trimmed.
fn collect_text(blocks: &[ContentBlock]) -> String {
    blocks
        .iter()
        .filter(|block| block.content_type == "text")
        .filter_map(|block| block.text.as_deref())
        .collect::<Vec<_>>()
        .join("")
        .trim()
        .to_string()
}

/// Extract JSON from text that may be wrapped in markdown code fences.
fn extract_json(text: &str) -> &str {
    let trimmed = text.trim();

    if let Some(after) = trimmed.strip_prefix("```json")
        && let Some(json) = after.strip_suffix("```")
    {
        return json.trim();
    }
    if let Some(after) = trimmed.strip_prefix("```")
        && let Some(json) = after.strip_suffix("```")
    {
        return json.trim();
    }

    trimmed
}

// --- API types ---

#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: &'a [Message],
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: Vec<ContentPart>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    Image { source: ImageSource },
}

#[derive(Serialize)]
struct ImageSource {
    #[serde(rename = "type")]
    kind: &'static str,
    media_type: String,
    data: String,
}

#[derive(Deserialize)]
struct ApiResponse {
    content: Vec<ContentBlock>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    text: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    input_tokens: u64,
    output_tokens: u64,
}

#[derive(Deserialize)]
struct PairResponse {
    first: usize,
    second: usize,
}
