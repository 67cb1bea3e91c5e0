//! Discord gateway client.
//!
//! serenity owns the connection, reconnects and event dispatch; this module
//! only adapts its message events to the invoice pipeline.

use std::sync::Arc;

use async_trait::async_trait;
use serenity::all::{
    ChannelId, Client, Context, CreateAttachment, CreateMessage, EventHandler, GatewayIntents,
    Http, Message, Ready,
};

use crate::conversation::{Attachment, Conversation, DeliveryError, InboundMessage};
use crate::pipeline::{InvoicePipeline, PipelineOutcome};

/// The channel and message a command came from.
pub struct DiscordConversation {
    http: Arc<Http>,
    channel_id: ChannelId,
    message: Message,
}

impl DiscordConversation {
    pub fn new(http: Arc<Http>, message: Message) -> Self {
        Self {
            http,
            channel_id: message.channel_id,
            message,
        }
    }
}

#[async_trait]
impl Conversation for DiscordConversation {
    async fn reply(&self, text: &str) -> Result<(), DeliveryError> {
        self.message
            .reply(&self.http, text)
            .await
            .map(|_| ())
            .map_err(|e| DeliveryError(e.to_string()))
    }

    async fn send_attachment(&self, attachment: &Attachment) -> Result<(), DeliveryError> {
        let mut file = CreateAttachment::path(&attachment.path)
            .await
            .map_err(|e| DeliveryError(e.to_string()))?;
        file.filename = attachment.file_name.clone();

        self.channel_id
            .send_message(&self.http, CreateMessage::new().add_file(file))
            .await
            .map(|_| ())
            .map_err(|e| DeliveryError(e.to_string()))
    }
}

pub struct Handler {
    pipeline: Arc<InvoicePipeline>,
}

impl Handler {
    pub fn new(pipeline: Arc<InvoicePipeline>) -> Self {
        Self { pipeline }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        let inbound = InboundMessage {
            content: Some(msg.content.clone()).filter(|content| !content.is_empty()),
            sender_is_automated: msg.author.bot,
        };
        let message_id = msg.id;
        let conversation = DiscordConversation::new(ctx.http.clone(), msg);

        let outcome = self.pipeline.handle(&inbound, &conversation).await;
        if !matches!(outcome, PipelineOutcome::Rejected) {
            log::debug!("Message {} in channel {}: {:?}", message_id, conversation.channel_id, outcome);
        }
    }

    async fn ready(&self, _ctx: Context, ready: Ready) {
        log::info!("Logged in as {}", ready.user.tag());
    }
}

pub fn gateway_intents() -> GatewayIntents {
    GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
}

/// Build the gateway client. The connection is not opened until `start`.
pub async fn build_client(
    token: &str,
    pipeline: Arc<InvoicePipeline>,
) -> serenity::Result<Client> {
    Client::builder(token, gateway_intents())
        .event_handler(Handler::new(pipeline))
        .await
}
