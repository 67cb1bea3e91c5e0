//! Command-to-document pipeline.
//!
//! One call handles one inbound message from start to finish:
//! parse, acknowledge, render, upload, clean up. Calls share no mutable
//! state, so the chat client may run any number of them concurrently.

use std::io;
use std::path::Path;

use thiserror::Error;

use crate::config::BotConfig;
use crate::conversation::{Attachment, Conversation, DeliveryError, InboundMessage};
use crate::invoice::{parse_command, CommandOutcome, InvoiceGenerator, RenderError};

pub const ACKNOWLEDGEMENT: &str = "Creating invoice...";
pub const GENERIC_FAILURE: &str = "Something went wrong creating the invoice.";

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

/// Terminal state of one pipeline pass.
#[derive(Debug)]
pub enum PipelineOutcome {
    /// Not an invoice command, or sent by a bot. Nothing was replied.
    Rejected,
    /// Amount missing or not numeric. The usage text was replied.
    UsageInvalid,
    Delivered {
        invoice_id: String,
        file_name: String,
    },
    Failed(PipelineError),
}

pub struct InvoicePipeline {
    prefix: char,
    company_name: String,
    generator: InvoiceGenerator,
}

impl InvoicePipeline {
    pub fn new(config: &BotConfig) -> Self {
        Self {
            prefix: config.command_prefix,
            company_name: config.company_name.clone(),
            generator: InvoiceGenerator::new(config),
        }
    }

    pub async fn handle(
        &self,
        message: &InboundMessage,
        conversation: &dyn Conversation,
    ) -> PipelineOutcome {
        if message.sender_is_automated {
            return PipelineOutcome::Rejected;
        }

        let parsed = match parse_command(message.content.as_deref(), self.prefix) {
            CommandOutcome::NotACommand => return PipelineOutcome::Rejected,
            CommandOutcome::Usage(usage) => {
                send_reply(conversation, &usage.message).await;
                return PipelineOutcome::UsageInvalid;
            }
            CommandOutcome::Invoice(parsed) => parsed,
        };

        log::info!(
            "Invoice requested for '{}' (amount {})",
            parsed.customer_name,
            parsed.amount
        );
        send_reply(conversation, ACKNOWLEDGEMENT).await;

        let request = parsed.into_request(self.company_name.as_str());
        let rendered = match self.generator.render(request).await {
            Ok(rendered) => rendered,
            Err(e) => return self.fail(conversation, e.into()).await,
        };

        let attachment = Attachment {
            path: rendered.path.clone(),
            file_name: rendered.file_name.clone(),
        };
        let delivered = conversation.send_attachment(&attachment).await;
        cleanup(&rendered.path).await;

        match delivered {
            Ok(()) => {
                log::info!("Delivered {} as {}", rendered.invoice_id, rendered.file_name);
                PipelineOutcome::Delivered {
                    invoice_id: rendered.invoice_id,
                    file_name: rendered.file_name,
                }
            }
            Err(e) => self.fail(conversation, e.into()).await,
        }
    }

    async fn fail(&self, conversation: &dyn Conversation, error: PipelineError) -> PipelineOutcome {
        log::error!("Error handling invoice command: {}", error);
        send_reply(conversation, GENERIC_FAILURE).await;
        PipelineOutcome::Failed(error)
    }
}

async fn send_reply(conversation: &dyn Conversation, text: &str) {
    if let Err(e) = conversation.reply(text).await {
        log::error!("Failed to send reply: {}", e);
    }
}

/// Delete the temporary file. A missing file is fine; anything else is a warning.
async fn cleanup(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::debug!("Temp file {} already gone", path.display());
        }
        Err(e) => log::warn!("Temp file unlink error for {}: {}", path.display(), e),
    }
}
