//! Process-wide match timing configuration.

use std::env;

use tracing::{info, warn};

/// Default length of every period in minutes when no override is provided.
const DEFAULT_PERIOD_MINUTES: i64 = 15;

/// Environment variables carrying the period lengths, in minutes.
const HALF_DURATION_ENV: &str = "HALF_DURATION";
const EXTRA_TIME_DURATION_ENV: &str = "EXTRA_TIME_DURATION";
const PENALTY_SHOOTOUT_DURATION_ENV: &str = "PENALTY_SHOOTOUT_DURATION";

/// Durations, in seconds, of the periods of a match.
///
/// Loaded once at startup; the extra-time duration can additionally be
/// rewritten at runtime through the `match:set-extra-time` command and takes
/// effect on the next extra-time kick-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchTimings {
    /// Length of each half.
    pub half_duration_secs: i64,
    /// Length of the extra-time period.
    pub extra_time_duration_secs: i64,
    /// Nominal length reserved for the penalty shootout (untimed on air).
    pub penalty_shootout_duration_secs: i64,
}

impl Default for MatchTimings {
    fn default() -> Self {
        Self {
            half_duration_secs: DEFAULT_PERIOD_MINUTES * 60,
            extra_time_duration_secs: DEFAULT_PERIOD_MINUTES * 60,
            penalty_shootout_duration_secs: DEFAULT_PERIOD_MINUTES * 60,
        }
    }
}

impl MatchTimings {
    /// Load the timings from the environment, falling back to 15 minutes per
    /// period when a variable is absent or unparsable.
    pub fn from_env() -> Self {
        let timings = Self {
            half_duration_secs: minutes_from_env(HALF_DURATION_ENV) * 60,
            extra_time_duration_secs: minutes_from_env(EXTRA_TIME_DURATION_ENV) * 60,
            penalty_shootout_duration_secs: minutes_from_env(PENALTY_SHOOTOUT_DURATION_ENV) * 60,
        };
        info!(
            half_secs = timings.half_duration_secs,
            extra_time_secs = timings.extra_time_duration_secs,
            shootout_secs = timings.penalty_shootout_duration_secs,
            "loaded match timings"
        );
        timings
    }
}

fn minutes_from_env(var: &str) -> i64 {
    match env::var(var) {
        Ok(raw) => match parse_minutes(&raw) {
            Some(minutes) => minutes,
            None => {
                warn!(var, value = %raw, "invalid period duration; using default");
                DEFAULT_PERIOD_MINUTES
            }
        },
        Err(_) => DEFAULT_PERIOD_MINUTES,
    }
}

/// Parse a strictly positive whole number of minutes.
fn parse_minutes(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|minutes| *minutes > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_minutes() {
        assert_eq!(parse_minutes("15"), Some(15));
        assert_eq!(parse_minutes(" 45 "), Some(45));
    }

    #[test]
    fn rejects_non_positive_and_garbage() {
        assert_eq!(parse_minutes("0"), None);
        assert_eq!(parse_minutes("-3"), None);
        assert_eq!(parse_minutes("ninety"), None);
        assert_eq!(parse_minutes(""), None);
    }

    #[test]
    fn default_is_fifteen_minutes_per_period() {
        let timings = MatchTimings::default();
        assert_eq!(timings.half_duration_secs, 900);
        assert_eq!(timings.extra_time_duration_secs, 900);
        assert_eq!(timings.penalty_shootout_duration_secs, 900);
    }
}
