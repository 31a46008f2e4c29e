//! Actions that hand a document to the [`Extractor`] and write back what it finds.

use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

use super::{Action, Workspace};
use crate::extractor::{Extractor, Image};

const EMAIL_INPUT: &str = "email.txt";
const EMAIL_OUTPUT: &str = "email-sender.txt";
const EMAIL_INSTRUCTION: &str =
    "Extract the sender's email address from the following email message. Reply with the address only.";

const CARD_INPUT: &str = "credit-card.png";
const CARD_OUTPUT: &str = "credit-card.txt";
const CARD_INSTRUCTION: &str =
    "This image contains a credit card. Reply with the card number only, digits as printed.";

/// Writes the sender address of `email.txt` to `email-sender.txt`.
pub struct ExtractEmail {
    extractor: Arc<dyn Extractor>,
}

impl ExtractEmail {
    pub fn new(extractor: Arc<dyn Extractor>) -> Self {
        Self { extractor }
    }
}

#[async_trait]
impl Action for ExtractEmail {
    fn name(&self) -> &str {
        "extract_email"
    }

    fn trigger(&self) -> &str {
        "extract email"
    }

    async fn execute(&self, workspace: &Workspace) -> Result<String> {
        let email = workspace.read_to_string(EMAIL_INPUT).await?;
        let sender = self
            .extractor
            .extract_from_text(EMAIL_INSTRUCTION, &email)
            .await?;
        workspace.write(EMAIL_OUTPUT, sender).await?;
        Ok("Email extracted successfully.".to_string())
    }
}

/// Writes the card number shown in `credit-card.png`, spaces removed.
pub struct ExtractCreditCard {
    extractor: Arc<dyn Extractor>,
}

impl ExtractCreditCard {
    pub fn new(extractor: Arc<dyn Extractor>) -> Self {
        Self { extractor }
    }
}

#[async_trait]
impl Action for ExtractCreditCard {
    fn name(&self) -> &str {
        "extract_credit_card"
    }

    fn trigger(&self) -> &str {
        "extract credit card"
    }

    async fn execute(&self, workspace: &Workspace) -> Result<String> {
        let image = Image {
            media_type: Image::media_type_for(
                Path::new(CARD_INPUT).extension().and_then(|e| e.to_str()),
            )
            .to_string(),
            data: workspace.read_bytes(CARD_INPUT).await?,
        };
        let number = self
            .extractor
            .extract_from_image(CARD_INSTRUCTION, &image)
            .await?;
        workspace.write(CARD_OUTPUT, number.replace(' ', "")).await?;
        Ok("Credit card number extracted successfully.".to_string())
    }
}
