use std::time::Duration;

use crate::cli::Args;
use crate::error::ConfigError;
use crate::llm::LlmConfig;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub rate_limit_per_minute: u32,
    pub rate_limit_per_hour: u32,
    pub max_history: usize,
    pub history_page_size: usize,
}

impl AppConfig {
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let api_key = args.api_key.trim();
        if api_key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if args.api_url.trim().is_empty() {
            return Err(invalid("api_url", "must not be empty"));
        }
        if !(0.0..=2.0).contains(&args.temperature) {
            return Err(invalid("temperature", format!("{} is outside 0.0..=2.0", args.temperature)));
        }
        if args.timeout_secs == 0 {
            return Err(invalid("timeout_secs", "must be at least 1"));
        }
        if args.rate_limit_per_minute == 0 || args.rate_limit_per_hour == 0 {
            return Err(invalid("rate_limit", "limits must be at least 1"));
        }
        if args.max_history == 0 {
            return Err(invalid("max_history", "must be at least 1"));
        }
        if args.history_page_size == 0 {
            return Err(invalid("history_page_size", "must be at least 1"));
        }

        Ok(Self {
            llm: LlmConfig {
                api_key: api_key.to_string(),
                base_url: args.api_url.trim().to_string(),
                model: args.model.clone(),
                system_prompt: args.system_prompt.clone(),
                temperature: args.temperature,
                timeout: Duration::from_secs(args.timeout_secs),
            },
            rate_limit_per_minute: args.rate_limit_per_minute,
            rate_limit_per_hour: args.rate_limit_per_hour,
            max_history: args.max_history,
            history_page_size: args.history_page_size,
        })
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { field, reason: reason.into() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec!["grok-query"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn builds_config_from_flags() {
        let args = parse(&[
            "--api-key", " secret ",
            "--api-url", "http://localhost:9000/v1/chat/completions",
            "--timeout-secs", "5",
            "--rate-limit-per-minute", "3",
        ]);
        let config = AppConfig::from_args(&args).unwrap();
        assert_eq!(config.llm.api_key, "secret");
        assert_eq!(config.llm.base_url, "http://localhost:9000/v1/chat/completions");
        assert_eq!(config.llm.timeout, Duration::from_secs(5));
        assert_eq!(config.rate_limit_per_minute, 3);
    }

    #[test]
    fn missing_key_is_rejected() {
        let mut args = parse(&[]);
        args.api_key = String::new();
        assert!(matches!(AppConfig::from_args(&args), Err(ConfigError::MissingApiKey)));
    }

    #[test]
    fn zero_limits_are_rejected() {
        let mut args = parse(&["--api-key", "k"]);
        args.rate_limit_per_hour = 0;
        assert!(matches!(
            AppConfig::from_args(&args),
            Err(ConfigError::Invalid { field: "rate_limit", .. })
        ));
    }

    #[test]
    fn temperature_out_of_range_is_rejected() {
        let mut args = parse(&["--api-key", "k"]);
        args.temperature = 3.5;
        assert!(matches!(
            AppConfig::from_args(&args),
            Err(ConfigError::Invalid { field: "temperature", .. })
        ));
    }
}
