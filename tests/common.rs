#![allow(dead_code)]

use std::path::Path;

use async_trait::async_trait;
use invoice_bot::conversation::{Attachment, Conversation, DeliveryError};
use invoice_bot::BotConfig;
use tokio::sync::Mutex;

/// Build a config whose documents land in `dir`.
pub fn test_config(dir: &Path) -> BotConfig {
    let mut config = BotConfig::new("test-token");
    config.temp_dir = dir.to_path_buf();
    config
}

/// A sent attachment, plus whether its file existed at send time.
#[derive(Debug, Clone)]
pub struct SentAttachment {
    pub attachment: Attachment,
    pub existed_when_sent: bool,
    pub bytes: Vec<u8>,
}

/// Mock implementation of Conversation for testing
#[derive(Default)]
pub struct MockConversation {
    replies: Mutex<Vec<String>>,
    attachments: Mutex<Vec<SentAttachment>>,
    fail_attachments: bool,
    fail_replies: bool,
}

impl MockConversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_uploads() -> Self {
        Self {
            fail_attachments: true,
            ..Self::default()
        }
    }

    pub fn failing_replies() -> Self {
        Self {
            fail_replies: true,
            ..Self::default()
        }
    }

    pub async fn replies(&self) -> Vec<String> {
        self.replies.lock().await.clone()
    }

    pub async fn attachments(&self) -> Vec<SentAttachment> {
        self.attachments.lock().await.clone()
    }
}

#[async_trait]
impl Conversation for MockConversation {
    async fn reply(&self, text: &str) -> Result<(), DeliveryError> {
        self.replies.lock().await.push(text.to_string());
        if self.fail_replies {
            return Err(DeliveryError("reply rejected".to_string()));
        }
        Ok(())
    }

    async fn send_attachment(&self, attachment: &Attachment) -> Result<(), DeliveryError> {
        let bytes = tokio::fs::read(&attachment.path).await.unwrap_or_default();
        self.attachments.lock().await.push(SentAttachment {
            attachment: attachment.clone(),
            existed_when_sent: attachment.path.exists(),
            bytes,
        });
        if self.fail_attachments {
            return Err(DeliveryError("upload rejected".to_string()));
        }
        Ok(())
    }
}

/// Number of entries in a directory.
pub fn file_count(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}

/// Every string shown with `Tj` on the first page of a PDF.
pub fn shown_strings(pdf: &[u8]) -> Vec<Vec<u8>> {
    let doc = lopdf::Document::load_mem(pdf).expect("valid PDF");
    let page_id = *doc.get_pages().values().next().expect("one page");
    let content = doc.get_page_content(page_id).expect("page content");
    lopdf::content::Content::decode(&content)
        .expect("decodable content")
        .operations
        .iter()
        .filter(|op| op.operator == "Tj")
        .filter_map(|op| op.operands.first()?.as_str().ok().map(<[u8]>::to_vec))
        .collect()
}

/// Glyph-id bytes for `text` in the bundled font, as written into the page.
pub fn glyph_bytes(text: &str) -> Vec<u8> {
    let face = ttf_parser::Face::parse(invoice_bot::invoice::engine::DEFAULT_FONT, 0).expect("font");
    text.chars()
        .filter_map(|c| face.glyph_index(c))
        .flat_map(|glyph| glyph.0.to_be_bytes())
        .collect()
}
