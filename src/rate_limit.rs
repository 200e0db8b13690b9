use std::collections::VecDeque;
use std::fmt;
use std::time::{ Duration, Instant };

pub const MINUTE: Duration = Duration::from_secs(60);
pub const HOUR: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    Minute,
    Hour,
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Window::Minute => write!(f, "per-minute"),
            Window::Hour => write!(f, "hourly"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed,
    Limited {
        window: Window,
        wait: Duration,
    },
}

impl RateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateDecision::Allowed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageStats {
    pub requests_this_minute: usize,
    pub requests_this_hour: usize,
    pub minute_limit: u32,
    pub hour_limit: u32,
}

/// Sliding-window limiter over the requests of a single session.
///
/// Only the hour window is stored; the minute count is derived from its tail.
/// Timestamps leave the window lazily, on the next `check_and_record` or `usage`.
#[derive(Debug)]
pub struct RateLimiter {
    requests: VecDeque<Instant>,
    minute_limit: u32,
    hour_limit: u32,
}

impl RateLimiter {
    pub fn new(minute_limit: u32, hour_limit: u32) -> Self {
        Self {
            requests: VecDeque::new(),
            minute_limit,
            hour_limit,
        }
    }

    pub fn check_and_record(&mut self, now: Instant) -> RateDecision {
        self.prune(now);

        let in_minute = self.in_window(now, MINUTE);
        if in_minute.len() >= self.minute_limit as usize {
            return RateDecision::Limited {
                window: Window::Minute,
                wait: Self::wait_for(in_minute.first().copied(), now, MINUTE),
            };
        }

        if self.requests.len() >= self.hour_limit as usize {
            return RateDecision::Limited {
                window: Window::Hour,
                wait: Self::wait_for(self.requests.front().copied(), now, HOUR),
            };
        }

        self.requests.push_back(now);
        RateDecision::Allowed
    }

    pub fn usage(&mut self, now: Instant) -> UsageStats {
        self.prune(now);
        UsageStats {
            requests_this_minute: self.in_window(now, MINUTE).len(),
            requests_this_hour: self.requests.len(),
            minute_limit: self.minute_limit,
            hour_limit: self.hour_limit,
        }
    }

    pub fn reset(&mut self) {
        self.requests.clear();
    }

    fn prune(&mut self, now: Instant) {
        while let Some(oldest) = self.requests.front() {
            if now.saturating_duration_since(*oldest) < HOUR {
                break;
            }
            self.requests.pop_front();
        }
    }

    fn in_window(&self, now: Instant, window: Duration) -> Vec<Instant> {
        self.requests
            .iter()
            .filter(|t| now.saturating_duration_since(**t) < window)
            .copied()
            .collect()
    }

    fn wait_for(oldest: Option<Instant>, now: Instant, window: Duration) -> Duration {
        let wait = oldest
            .map(|t| (t + window).saturating_duration_since(now))
            .unwrap_or(window);
        // a zero limit has nothing to expire; report a full window instead of zero
        if wait.is_zero() { window } else { wait }
    }
}

/// Renders a wait as "N seconds" under a minute, otherwise as whole minutes.
/// Both round up so the user never retries too early.
pub fn format_wait(wait: Duration) -> String {
    let secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
    if secs < 60 {
        let secs = secs.max(1);
        return format!("{} second{}", secs, if secs == 1 { "" } else { "s" });
    }
    let minutes = (secs + 59) / 60;
    format!("{} minute{}", minutes, if minutes == 1 { "" } else { "s" })
}
