//! Conversion of configured lifetimes into durations

use chrono::Duration;

use crate::errors::DomainError;

/// Longest lifetime accepted from configuration (100 years)
pub const MAX_LIFETIME_SECONDS: i64 = 100 * 365 * 86_400;

/// Converts a configured lifetime in seconds.
///
/// # Returns
///
/// * `Ok(Duration)` - The lifetime
/// * `Err(DomainError::Config)` - Zero, negative or longer than [`MAX_LIFETIME_SECONDS`]
pub(crate) fn lifetime_from_seconds(
    setting: &str,
    seconds: i64,
) -> Result<Duration, DomainError> {
    if seconds <= 0 {
        return Err(DomainError::config(format!(
            "{} must be positive, got {}",
            setting, seconds
        )));
    }
    if seconds > MAX_LIFETIME_SECONDS {
        return Err(DomainError::config(format!(
            "{} is out of range: {} seconds",
            setting, seconds
        )));
    }
    Duration::try_seconds(seconds)
        .ok_or_else(|| DomainError::config(format!("{} is out of range", setting)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn test_accepts_positive_lifetime() {
        let ttl = lifetime_from_seconds("session ttl", 900).unwrap();
        assert_eq!(ttl, Duration::minutes(15));

        let ttl = lifetime_from_seconds("session ttl", MAX_LIFETIME_SECONDS).unwrap();
        assert_eq!(ttl.num_seconds(), MAX_LIFETIME_SECONDS);
    }

    #[test]
    fn test_rejects_zero_and_negative() {
        for seconds in [0, -1, i64::MIN] {
            let err = lifetime_from_seconds("session ttl", seconds).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Config);
        }
    }

    #[test]
    fn test_rejects_out_of_range() {
        for seconds in [MAX_LIFETIME_SECONDS + 1, i64::MAX / 10, i64::MAX] {
            let err = lifetime_from_seconds("refresh token expiry", seconds).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Config);
            assert!(err.to_string().contains("refresh token expiry"));
        }
    }
}
