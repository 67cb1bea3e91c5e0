use std::sync::Arc;

pub mod config;
pub mod conversation;
pub mod discord;
pub mod health;
pub mod invoice;
pub mod pipeline;

pub use crate::config::{BotConfig, ConfigError};
pub use crate::pipeline::{InvoicePipeline, PipelineOutcome};

pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

/// Run the bot until the gateway connection ends.
pub async fn run(config: BotConfig) -> anyhow::Result<()> {
    let server = health::start_server(config.port)?;
    let server_handle = server.handle();
    tokio::spawn(server);

    let pipeline = Arc::new(InvoicePipeline::new(&config));
    let mut client = discord::build_client(&config.bot_token, pipeline).await?;

    log::info!(
        "Listening for {}invoice commands (company: {})",
        config.command_prefix,
        config.company_name
    );

    let result = client.start().await;
    server_handle.stop(true).await;

    if let Err(e) = result {
        log::error!("Failed to login to Discord: {}", e);
        return Err(e.into());
    }
    Ok(())
}
