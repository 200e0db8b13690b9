pub mod cli;
pub mod config;
pub mod error;
pub mod history;
pub mod llm;
pub mod logging;
pub mod rate_limit;
pub mod repl;
pub mod session;

use cli::Args;
use config::AppConfig;
use history::ConversationHistory;
use llm::xai::XAIChatClient;
use log::info;
use rate_limit::RateLimiter;
use session::Session;
use std::error::Error;
use std::sync::Arc;
use tokio::io::BufReader;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    let log_path = logging::init(&args)?;
    let config = AppConfig::from_args(&args)?;

    info!("--- Core Configuration ---");
    info!("API URL: {}", config.llm.base_url);
    info!("Model: {}", config.llm.model);
    info!("Timeout: {:?}", config.llm.timeout);
    info!(
        "Rate limits: {} per minute, {} per hour",
        config.rate_limit_per_minute,
        config.rate_limit_per_hour
    );
    info!("Max history: {}", config.max_history);
    if let Some(path) = &log_path {
        info!("Log file: {}", path.display());
    }
    info!("-------------------------");

    let client = Arc::new(XAIChatClient::from_config(&config.llm)?);
    let mut session = Session::new(
        client,
        RateLimiter::new(config.rate_limit_per_minute, config.rate_limit_per_hour),
        ConversationHistory::new(config.max_history)
    );

    repl::run(
        &mut session,
        config.history_page_size,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout()
    ).await?;

    info!("Session ended with {} conversation(s) in history", session.history().len());
    Ok(())
}
