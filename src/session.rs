use chrono::Local;
use log::{ error, info, warn };
use std::sync::Arc;
use std::time::{ Duration, Instant };
use thiserror::Error;

use crate::error::ApiError;
use crate::history::{ ConversationEntry, ConversationHistory };
use crate::llm::ChatClient;
use crate::rate_limit::{ format_wait, RateDecision, RateLimiter, UsageStats, Window };

pub const MAX_INPUT_LENGTH: usize = 4000;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("{0}")]
    Invalid(String),

    #[error("{window} rate limit exceeded")]
    RateLimited {
        window: Window,
        wait: Duration,
    },

    #[error("{source} (error id {error_id})")]
    Api {
        #[source]
        source: ApiError,
        error_id: String,
    },
}

impl SubmitError {
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::Invalid(reason) => reason.clone(),
            SubmitError::RateLimited { window: Window::Minute, wait } =>
                format!("Rate limit exceeded. Please wait {}.", format_wait(*wait)),
            SubmitError::RateLimited { window: Window::Hour, wait } =>
                format!("Hourly limit exceeded. Please wait {}.", format_wait(*wait)),
            SubmitError::Api { source, error_id } =>
                format!("{} (Error ID: {})", source.user_message(), error_id),
        }
    }
}

pub fn validate_query(query: &str) -> Result<(), SubmitError> {
    if query.trim().is_empty() {
        return Err(SubmitError::Invalid("Input cannot be empty".to_string()));
    }
    if query.chars().count() > MAX_INPUT_LENGTH {
        return Err(
            SubmitError::Invalid(
                format!("Input exceeds maximum length of {} characters", MAX_INPUT_LENGTH)
            )
        );
    }
    Ok(())
}

/// Everything one user session owns: the limiter, the history and the client.
pub struct Session {
    client: Arc<dyn ChatClient>,
    limiter: RateLimiter,
    history: ConversationHistory,
}

impl Session {
    pub fn new(
        client: Arc<dyn ChatClient>,
        limiter: RateLimiter,
        history: ConversationHistory
    ) -> Self {
        Self { client, limiter, history }
    }

    pub async fn submit(
        &mut self,
        query: &str,
        now: Instant
    ) -> Result<&ConversationEntry, SubmitError> {
        validate_query(query)?;

        if let RateDecision::Limited { window, wait } = self.limiter.check_and_record(now) {
            warn!("{} rate limit exceeded, wait {}", window, format_wait(wait));
            return Err(SubmitError::RateLimited { window, wait });
        }

        info!("Processing request of length: {}", query.len());
        let result = self.client.send(query).await;
        self.log_usage(now);

        match result {
            Ok(response) => Ok(self.history.push(query.to_string(), response)),
            Err(source) => {
                let error_id = Local::now().format("%Y%m%d_%H%M%S").to_string();
                error!(
                    "API Error {}: {} - Status: {:?}",
                    error_id,
                    source,
                    source.status()
                );
                Err(SubmitError::Api { source, error_id })
            }
        }
    }

    pub fn usage(&mut self, now: Instant) -> UsageStats {
        self.limiter.usage(now)
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn clear_history(&mut self) {
        info!("Clearing {} conversation(s)", self.history.len());
        self.history.clear();
    }

    pub fn client(&self) -> &dyn ChatClient {
        self.client.as_ref()
    }

    fn log_usage(&mut self, now: Instant) {
        let stats = self.limiter.usage(now);
        info!(
            "Usage Stats - Minute: {}/{}, Hour: {}/{}",
            stats.requests_this_minute,
            stats.minute_limit,
            stats.requests_this_hour,
            stats.hour_limit
        );
    }
}
