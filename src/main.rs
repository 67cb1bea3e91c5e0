use invoice_bot::BotConfig;

#[tokio::main]
async fn main() {
    invoice_bot::init_logging();

    let config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("ERROR: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = invoice_bot::run(config).await {
        log::error!("Invoice bot stopped: {:#}", e);
        std::process::exit(1);
    }
}
