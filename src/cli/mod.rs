use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Terminal interface for querying Grok over its HTTP API", long_about = None)]
pub struct Args {
    // --- Chat API Args ---
    /// Chat completions endpoint
    #[arg(long, env = "GROK_API_URL", default_value = "https://api.x.ai/v1/chat/completions")]
    pub api_url: String,

    /// Bearer token for the chat API
    #[arg(long, env = "GROK_API_KEY", default_value = "", hide_env_values = true)]
    pub api_key: String,

    /// Model name sent with every request
    #[arg(long, env = "GROK_MODEL", default_value = "grok-2-latest")]
    pub model: String,

    /// System message prepended to every query
    #[arg(long, env = "GROK_SYSTEM_PROMPT", default_value = "You are a helpful AI assistant.")]
    pub system_prompt: String,

    /// Sampling temperature (0.0 to 2.0)
    #[arg(long, env = "GROK_TEMPERATURE", default_value = "0.7")]
    pub temperature: f32,

    /// Request timeout in seconds
    #[arg(long, env = "GROK_TIMEOUT_SECS", default_value = "30")]
    pub timeout_secs: u64,

    // --- Rate Limit Args ---
    /// Maximum requests in any trailing minute
    #[arg(long, env = "RATE_LIMIT_PER_MINUTE", default_value = "10")]
    pub rate_limit_per_minute: u32,

    /// Maximum requests in any trailing hour
    #[arg(long, env = "RATE_LIMIT_PER_HOUR", default_value = "100")]
    pub rate_limit_per_hour: u32,

    // --- History Args ---
    /// Conversations kept in the session history; older ones are dropped
    #[arg(long, env = "MAX_HISTORY", default_value = "50")]
    pub max_history: usize,

    /// Conversations shown per history page
    #[arg(long, env = "HISTORY_PAGE_SIZE", default_value = "5")]
    pub history_page_size: usize,

    // --- General App Args ---
    /// Directory for the daily log file. Logs go to stderr when unset.
    #[arg(long, env = "LOG_DIR")]
    pub log_dir: Option<String>,

    /// Enable debug logging
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,
}
